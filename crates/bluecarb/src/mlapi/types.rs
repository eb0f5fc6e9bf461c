//! Wire types for the BlueCarb prediction service
//!
//! Field names follow the service's JSON contract exactly; every struct
//! serializes to the payload the endpoints expect, nothing more.

use serde::{Deserialize, Serialize};

// Request Payloads
// ================

/// Request body for `/predict/co2`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Co2PredictionRequest {
  /// Restored area in hectares, non-negative
  pub area_restored_ha: f64,

  /// Ecosystem label, e.g. "mangrove" or "wetland"
  pub ecosystem_type: String,

  /// Months elapsed since restoration began, non-negative
  pub time_since_restoration_months: f64,

  /// Canopy density proxy in [0, 1]
  pub vegetation_density_index: f64,

  /// Hydrology label, e.g. "Tidal"
  pub coastal_zone_type: String,
}

/// Request body for `/classify/restoration`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestorationClassificationRequest {
  /// Change in NDVI across the observation window, in [-1, 1]
  pub ndvi_change: f64,

  /// Vegetation cover percentage, in [0, 100]
  pub vegetation_cover_percent: f64,

  /// Length of the observation window in months
  pub time_interval_months: f64,

  /// Agreement between claimed and observed area, in [0, 1]
  pub area_consistency_score: f64,
}

/// Request body for `/score/risk`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScoringRequest {
  /// Likelihood the field imagery is genuine, in [0, 1]
  pub image_authenticity_score: f64,

  /// Confidence in the satellite cross-check, in [0, 1]
  pub satellite_confidence_score: f64,

  /// Share of the NGO's past submissions that were accepted, in [0, 1]
  pub ngo_historical_acceptance_rate: f64,

  /// Recent submissions per month from this NGO
  pub upload_frequency: f64,

  /// Regulatory sensitivity of the project location, in [0, 1]
  pub location_sensitivity: f64,
}

// Response Payloads
// =================

/// One entry of a model's feature importance ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
  /// Feature name as the model saw it
  pub feature: String,

  /// Relative importance, rounded to four decimals by the service
  pub importance: f64,
}

/// Response body from `/predict/co2`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Co2PredictionResponse {
  /// Estimated annual sequestration in tonnes of CO2
  pub predicted_co2_tons_per_year: f64,

  /// Top features behind the estimate, highest first
  pub feature_importance: Vec<FeatureImportance>,

  /// Human-readable summary of what drove the estimate
  pub explanation: String,
}

/// Response body from `/classify/restoration`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestorationClassificationResponse {
  /// One of "NO_RESTORATION", "PARTIAL", "SUCCESSFUL"
  pub restoration_status: String,

  /// Model confidence in the predicted class, in [0, 1]
  pub confidence_score: f64,

  /// Top features behind the classification, highest first
  pub feature_importance: Vec<FeatureImportance>,

  /// Human-readable summary of the classification
  pub explanation: String,
}

/// Response body from `/score/risk`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScoringResponse {
  /// One of "LOW", "MEDIUM", "HIGH"
  pub risk_level: String,

  /// "AUTO" when the submission can skip human review, otherwise "MANUAL"
  pub review_priority: String,

  /// Model confidence in the predicted class, in [0, 1]
  pub confidence_score: f64,

  /// Top features behind the score, highest first
  pub feature_importance: Vec<FeatureImportance>,

  /// Human-readable summary of the risk signals
  pub explanation: String,
}
