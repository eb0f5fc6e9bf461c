//! BlueCarb - Coastal Restoration Verification
//!
//! ML insight orchestration for restoration project review: typed access
//! to the prediction service, pure feature derivation from field and
//! review data, and a per-project insight cache with single-flight fetch
//! semantics. A deterministic stand-in service ships alongside so the
//! toolchain runs without the production model deployment.

pub mod commands;
pub mod config;
pub mod features;
pub mod insight;
pub mod mlapi;
pub mod mockml;
pub mod project;
