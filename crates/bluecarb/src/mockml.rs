//! Stand-in prediction service
//!
//! Serves the same three endpoints as the production ML deployment with
//! deterministic heuristics calibrated to the training label rules, so the
//! rest of the toolchain can be exercised without model binaries. Every
//! served prediction lands in the audit trail.

use anyhow::Result;
use axum::extract::{Json, State};
use axum::routing::post;
use axum::Router;
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use foghorn::audit::AuditLog;

use crate::mlapi::client::{
  CO2_PREDICTION_PATH, RESTORATION_CLASSIFICATION_PATH, RISK_SCORING_PATH,
};
use crate::mlapi::types::{
  Co2PredictionRequest, Co2PredictionResponse, FeatureImportance,
  RestorationClassificationRequest, RestorationClassificationResponse, RiskScoringRequest,
  RiskScoringResponse,
};

/// Shared state for the stand-in service
#[derive(Clone)]
pub struct MockMlState {
  pub audit: AuditLog,
}

// Heuristics
// ==========

/// Annual sequestration rate for mangrove sites, tonnes CO2 per hectare
const MANGROVE_RATE: f64 = 9.0;
/// Wetland sites sequester at a discount relative to mangroves
const WETLAND_RATE_FACTOR: f64 = 0.8;
/// Months until a site is considered fully established
const ESTABLISHMENT_MONTHS: f64 = 36.0;

/// Risk score weights, matching how the training labels were synthesized
const AUTHENTICITY_WEIGHT: f64 = 0.35;
const SATELLITE_WEIGHT: f64 = 0.25;
const ACCEPTANCE_WEIGHT: f64 = 0.2;
const LOCATION_WEIGHT: f64 = 0.2;

/// Risk band boundaries over the composite score
const LOW_RISK_CEILING: f64 = 0.35;
const MEDIUM_RISK_CEILING: f64 = 0.6;

fn round2(value: f64) -> f64 {
  (value * 100.0).round() / 100.0
}

fn round4(value: f64) -> f64 {
  (value * 10_000.0).round() / 10_000.0
}

/// Deterministic annual sequestration estimate in tonnes of CO2
fn co2_estimate(request: &Co2PredictionRequest) -> f64 {
  let base_rate = match request.ecosystem_type.as_str() {
    "wetland" => MANGROVE_RATE * WETLAND_RATE_FACTOR,
    _ => MANGROVE_RATE,
  };
  let density_factor = 0.5 + 0.5 * request.vegetation_density_index.clamp(0.0, 1.0);
  let maturity = (request.time_since_restoration_months / ESTABLISHMENT_MONTHS).clamp(0.3, 1.0);
  round2(base_rate * density_factor * maturity * request.area_restored_ha.max(0.0))
}

/// Band the inputs into a restoration class with a confidence score
fn classify(request: &RestorationClassificationRequest) -> (&'static str, f64) {
  let ndvi = request.ndvi_change;
  let cover = request.vegetation_cover_percent;

  let status = if ndvi < 0.25 || cover < 40.0 {
    "NO_RESTORATION"
  } else if ndvi <= 0.55 || cover <= 70.0 {
    "PARTIAL"
  } else {
    "SUCCESSFUL"
  };

  let blend = (0.6 * ndvi + 0.4 * (cover / 100.0)).clamp(0.0, 1.0);
  let confidence = match status {
    "SUCCESSFUL" => blend,
    "NO_RESTORATION" => 1.0 - blend,
    _ => 1.0 - (blend - 0.45).abs(),
  };

  (status, round4(confidence.clamp(0.0, 1.0)))
}

/// Composite risk score and its band
fn score_risk_level(request: &RiskScoringRequest) -> (&'static str, f64) {
  let score = (1.0 - request.image_authenticity_score.clamp(0.0, 1.0)) * AUTHENTICITY_WEIGHT
    + (1.0 - request.satellite_confidence_score.clamp(0.0, 1.0)) * SATELLITE_WEIGHT
    + (1.0 - request.ngo_historical_acceptance_rate.clamp(0.0, 1.0)) * ACCEPTANCE_WEIGHT
    + request.location_sensitivity.clamp(0.0, 1.0) * LOCATION_WEIGHT;

  let level = if score <= LOW_RISK_CEILING {
    "LOW"
  } else if score <= MEDIUM_RISK_CEILING {
    "MEDIUM"
  } else {
    "HIGH"
  };

  (level, score)
}

/// Confidence falls off with distance from the band center
fn risk_confidence(score: f64, level: &str) -> f64 {
  let center = match level {
    "LOW" => 0.175,
    "MEDIUM" => 0.475,
    _ => 0.8,
  };
  round4((1.0 - (score - center).abs() * 2.0).clamp(0.5, 0.99))
}

/// Only low-risk submissions skip human review
fn review_priority(level: &str) -> &'static str {
  if level == "LOW" {
    "AUTO"
  } else {
    "MANUAL"
  }
}

// Feature Importance and Explanations
// ===================================

fn importance(feature: &str, importance: f64) -> FeatureImportance {
  FeatureImportance { feature: feature.to_string(), importance }
}

/// Top three aggregated importances of the CO2 regressor
fn co2_importance() -> Vec<FeatureImportance> {
  vec![
    importance("area_restored_ha", 0.4123),
    importance("vegetation_density_index", 0.2764),
    importance("time_since_restoration_months", 0.1892),
  ]
}

/// Top three importances of the restoration classifier
fn restoration_importance() -> Vec<FeatureImportance> {
  vec![
    importance("ndvi_change", 0.3817),
    importance("vegetation_cover_percent", 0.3344),
    importance("area_consistency_score", 0.1659),
  ]
}

/// Top three importances of the risk model
fn risk_importance() -> Vec<FeatureImportance> {
  vec![
    importance("image_authenticity_score", 0.3102),
    importance("satellite_confidence_score", 0.2418),
    importance("location_sensitivity", 0.2016),
  ]
}

fn feature_names(features: &[FeatureImportance]) -> String {
  features.iter().map(|item| item.feature.as_str()).collect::<Vec<_>>().join(", ")
}

fn co2_explanation(features: &[FeatureImportance]) -> String {
  format!(
    "Prediction is driven primarily by: {}. Larger restored area, higher vegetation density, \
     and longer restoration duration generally increase annual CO2 sequestration estimates.",
    feature_names(features)
  )
}

fn restoration_explanation(features: &[FeatureImportance], status: &str) -> String {
  format!(
    "Restoration classified as {status}. Key drivers: {}. Higher NDVI change and vegetation \
     cover usually push outcomes toward successful restoration.",
    feature_names(features)
  )
}

fn risk_explanation(features: &[FeatureImportance], level: &str) -> String {
  format!(
    "Risk scored as {level}. Top signals: {}. Lower authenticity or satellite confidence and \
     higher location sensitivity typically increase risk.",
    feature_names(features)
  )
}

// Handlers
// ========

/// POST /predict/co2 - annual sequestration estimate
pub async fn predict_co2(
  State(state): State<MockMlState>,
  Json(request): Json<Co2PredictionRequest>,
) -> Json<Co2PredictionResponse> {
  let feature_importance = co2_importance();
  let response = Co2PredictionResponse {
    predicted_co2_tons_per_year: co2_estimate(&request),
    explanation: co2_explanation(&feature_importance),
    feature_importance,
  };

  record(&state, CO2_PREDICTION_PATH, &request, &response).await;
  Json(response)
}

/// POST /classify/restoration - restoration outcome classification
pub async fn classify_restoration(
  State(state): State<MockMlState>,
  Json(request): Json<RestorationClassificationRequest>,
) -> Json<RestorationClassificationResponse> {
  let (status, confidence) = classify(&request);
  let feature_importance = restoration_importance();
  let response = RestorationClassificationResponse {
    restoration_status: status.to_string(),
    confidence_score: confidence,
    explanation: restoration_explanation(&feature_importance, status),
    feature_importance,
  };

  record(&state, RESTORATION_CLASSIFICATION_PATH, &request, &response).await;
  Json(response)
}

/// POST /score/risk - submission risk scoring
pub async fn score_risk(
  State(state): State<MockMlState>,
  Json(request): Json<RiskScoringRequest>,
) -> Json<RiskScoringResponse> {
  let (level, score) = score_risk_level(&request);
  let feature_importance = risk_importance();
  let response = RiskScoringResponse {
    risk_level: level.to_string(),
    review_priority: review_priority(level).to_string(),
    confidence_score: risk_confidence(score, level),
    explanation: risk_explanation(&feature_importance, level),
    feature_importance,
  };

  record(&state, RISK_SCORING_PATH, &request, &response).await;
  Json(response)
}

/// Append the served prediction to the audit trail, fire-and-forget
async fn record<Request, Response>(
  state: &MockMlState,
  endpoint: &str,
  request: &Request,
  response: &Response,
) where
  Request: Serialize,
  Response: Serialize,
{
  tracing::info!(endpoint, "served prediction");

  let payload = serde_json::to_value(request).unwrap_or_default();
  let answer = serde_json::to_value(response).unwrap_or_default();
  if let Err(err) = state.audit.record(endpoint, payload, answer).await {
    foghorn::warn(&format!("Failed to record prediction audit: {err}"));
  }
}

// Router and Startup
// ==================

/// Create the application router
pub fn create_router(state: MockMlState) -> Router {
  Router::new()
    .route(CO2_PREDICTION_PATH, post(predict_co2))
    .route(RESTORATION_CLASSIFICATION_PATH, post(classify_restoration))
    .route(RISK_SCORING_PATH, post(score_risk))
    .with_state(state)
}

/// Start the stand-in service on `addr`, auditing to `audit`
pub async fn start_server(addr: SocketAddr, audit: AuditLog) -> Result<()> {
  let audit_path = audit.path().await;
  foghorn::info(&format!("Starting BlueCarb stand-in ML service on {addr}"));
  foghorn::info(&format!("Auditing predictions to {}", audit_path.display()));

  let app = create_router(MockMlState { audit })
    .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()));

  let listener = TcpListener::bind(addr).await?;
  foghorn::success(&format!("Listening on {addr}"));

  axum::serve(listener, app).await?;
  Ok(())
}
