//! HTTP client for the BlueCarb prediction service
//!
//! This module provides a thin HTTP client wrapper around the three
//! prediction endpoints, plus the [`PredictionApi`] trait the insight
//! layer is written against so tests can substitute the transport.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::MlServiceConfig;
use crate::mlapi::types::{
  Co2PredictionRequest, Co2PredictionResponse, RestorationClassificationRequest,
  RestorationClassificationResponse, RiskScoringRequest, RiskScoringResponse,
};

/// Endpoint path for annual CO2 sequestration estimates
pub const CO2_PREDICTION_PATH: &str = "/predict/co2";
/// Endpoint path for restoration outcome classification
pub const RESTORATION_CLASSIFICATION_PATH: &str = "/classify/restoration";
/// Endpoint path for submission risk scoring
pub const RISK_SCORING_PATH: &str = "/score/risk";

/// Errors surfaced by the prediction client
#[derive(Debug, Error)]
pub enum MlApiError {
  /// The service answered with a non-success status
  #[error("ML API error: {}", .0.as_u16())]
  Status(StatusCode),

  /// The service could not be reached, timed out, or sent an undecodable body
  #[error("ML service request failed: {0}")]
  Transport(#[from] reqwest::Error),
}

/// The three prediction operations the insight layer depends on
#[async_trait]
pub trait PredictionApi: Send + Sync {
  async fn predict_co2(
    &self,
    request: &Co2PredictionRequest,
  ) -> Result<Co2PredictionResponse, MlApiError>;

  async fn classify_restoration(
    &self,
    request: &RestorationClassificationRequest,
  ) -> Result<RestorationClassificationResponse, MlApiError>;

  async fn score_risk(&self, request: &RiskScoringRequest)
    -> Result<RiskScoringResponse, MlApiError>;
}

/// HTTP client for the prediction service
pub struct MlClient {
  client: Client,
  config: MlServiceConfig,
}

impl Default for MlClient {
  fn default() -> Self {
    Self::new(MlServiceConfig::default())
  }
}

impl MlClient {
  /// Create a client with explicit configuration
  pub fn new(config: MlServiceConfig) -> Self {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .expect("Failed to create HTTP client");

    Self { client, config }
  }

  /// Create a client configured from the environment
  pub fn from_env() -> Self {
    Self::new(MlServiceConfig::from_env())
  }

  /// The configuration this client was built with
  pub fn config(&self) -> &MlServiceConfig {
    &self.config
  }

  async fn post_json<Request, Response>(
    &self,
    path: &str,
    payload: &Request,
  ) -> Result<Response, MlApiError>
  where
    Request: Serialize + Sync,
    Response: DeserializeOwned,
  {
    let url = self.config.endpoint(path);
    let response = self.client.post(&url).json(payload).send().await?;

    if !response.status().is_success() {
      return Err(MlApiError::Status(response.status()));
    }

    Ok(response.json().await?)
  }
}

#[async_trait]
impl PredictionApi for MlClient {
  async fn predict_co2(
    &self,
    request: &Co2PredictionRequest,
  ) -> Result<Co2PredictionResponse, MlApiError> {
    self.post_json(CO2_PREDICTION_PATH, request).await
  }

  async fn classify_restoration(
    &self,
    request: &RestorationClassificationRequest,
  ) -> Result<RestorationClassificationResponse, MlApiError> {
    self.post_json(RESTORATION_CLASSIFICATION_PATH, request).await
  }

  async fn score_risk(
    &self,
    request: &RiskScoringRequest,
  ) -> Result<RiskScoringResponse, MlApiError> {
    self.post_json(RISK_SCORING_PATH, request).await
  }
}
