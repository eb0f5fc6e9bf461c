//! Typed access to the BlueCarb prediction service
//!
//! Wire structs mirror the service's JSON contract; the client wraps the
//! three POST endpoints behind the [`client::PredictionApi`] trait.

pub mod client;
pub mod types;
