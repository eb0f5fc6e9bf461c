//! Prediction client tests against the in-process stand-in service

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serial_test::serial;
use tempfile::TempDir;
use url::Url;

use bluecarb::config::{MlServiceConfig, DEFAULT_ML_BASE_URL, ML_URL_ENV};
use bluecarb::features;
use bluecarb::mlapi::client::{MlApiError, MlClient, PredictionApi, CO2_PREDICTION_PATH};
use bluecarb::mockml::{self, MockMlState};
use bluecarb::project::{find_demo_project, FieldSurvey};
use foghorn::audit::AuditLog;

async fn serve(app: Router) -> SocketAddr {
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });
  addr
}

fn client_for(addr: SocketAddr) -> MlClient {
  let config = MlServiceConfig {
    base_url: Url::parse(&format!("http://{addr}")).unwrap(),
    timeout_secs: 5,
  };
  MlClient::new(config)
}

/// Stand-in service on an ephemeral port, auditing into a temp dir
async fn start_stub() -> (SocketAddr, AuditLog, TempDir) {
  let dir = TempDir::new().unwrap();
  let audit = AuditLog::open(dir.path().join("audit.jsonl")).unwrap();
  let addr = serve(mockml::create_router(MockMlState { audit: audit.clone() })).await;
  (addr, audit, dir)
}

#[tokio::test]
async fn test_predict_co2_round_trip() {
  let (addr, _audit, _dir) = start_stub().await;
  let client = client_for(addr);

  let request = features::co2_features(&FieldSurvey::default());
  let response = client.predict_co2(&request).await.unwrap();

  assert!(response.predicted_co2_tons_per_year > 0.0);
  assert_eq!(response.feature_importance.len(), 3);
  assert!(response.explanation.starts_with("Prediction is driven primarily by:"));
}

#[tokio::test]
async fn test_insight_pair_for_a_strong_project() {
  let (addr, _audit, _dir) = start_stub().await;
  let client = client_for(addr);
  let project = find_demo_project(2).unwrap();

  let classification =
    client.classify_restoration(&features::classification_features(&project)).await.unwrap();
  assert_eq!(classification.restoration_status, "SUCCESSFUL");
  assert!(classification.confidence_score > 0.9);

  let risk = client.score_risk(&features::risk_features(&project)).await.unwrap();
  assert_eq!(risk.risk_level, "LOW");
  assert_eq!(risk.review_priority, "AUTO");
  assert!(risk.explanation.starts_with("Risk scored as LOW."));
}

#[tokio::test]
async fn test_http_error_maps_to_status() {
  let app = Router::new()
    .route(CO2_PREDICTION_PATH, post(|| async { axum::http::StatusCode::INTERNAL_SERVER_ERROR }));
  let addr = serve(app).await;
  let client = client_for(addr);

  let err =
    client.predict_co2(&features::co2_features(&FieldSurvey::default())).await.unwrap_err();
  assert_eq!(err.to_string(), "ML API error: 500");
  assert!(matches!(err, MlApiError::Status(status) if status.as_u16() == 500));
}

#[tokio::test]
async fn test_connection_refused_maps_to_transport() {
  // Bind then drop to get a loopback port with nothing behind it
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);

  let client = client_for(addr);
  let project = find_demo_project(1).unwrap();
  let err = client.score_risk(&features::risk_features(&project)).await.unwrap_err();
  assert!(matches!(err, MlApiError::Transport(_)));
}

#[derive(Clone, Default)]
struct Captured {
  payload: Arc<Mutex<Option<serde_json::Value>>>,
}

async fn capture_co2(
  State(captured): State<Captured>,
  Json(payload): Json<serde_json::Value>,
) -> Json<serde_json::Value> {
  *captured.payload.lock().unwrap() = Some(payload);
  Json(serde_json::json!({
    "predicted_co2_tons_per_year": 308.48,
    "feature_importance": [],
    "explanation": "Prediction is driven primarily by: area_restored_ha."
  }))
}

#[tokio::test]
async fn test_co2_payload_matches_the_wire_contract() {
  let captured = Captured::default();
  let app =
    Router::new().route(CO2_PREDICTION_PATH, post(capture_co2)).with_state(captured.clone());
  let addr = serve(app).await;
  let client = client_for(addr);

  client.predict_co2(&features::co2_features(&FieldSurvey::default())).await.unwrap();

  let payload = captured.payload.lock().unwrap().clone().unwrap();
  let object = payload.as_object().unwrap();
  assert_eq!(object.len(), 5);
  assert_eq!(object["area_restored_ha"], serde_json::json!(75.0));
  assert_eq!(object["ecosystem_type"], serde_json::json!("mangrove"));
  assert_eq!(object["time_since_restoration_months"], serde_json::json!(18.0));
  assert_eq!(object["coastal_zone_type"], serde_json::json!("Tidal"));
  let density = object["vegetation_density_index"].as_f64().unwrap();
  assert!((density - 0.828).abs() < 1e-9);
}

#[tokio::test]
async fn test_stub_audits_served_predictions() {
  let (addr, audit, _dir) = start_stub().await;
  let client = client_for(addr);

  client.predict_co2(&features::co2_features(&FieldSurvey::default())).await.unwrap();

  let records = audit.tail(None, Some(CO2_PREDICTION_PATH)).await.unwrap();
  assert_eq!(records.len(), 1);
  assert_eq!(records[0].payload["ecosystem_type"], serde_json::json!("mangrove"));
  assert!(records[0].response["predicted_co2_tons_per_year"].as_f64().unwrap() > 0.0);
}

#[test]
#[serial]
fn test_client_defaults_to_the_local_service() {
  std::env::remove_var(ML_URL_ENV);
  let client = MlClient::from_env();
  assert_eq!(client.config().endpoint(""), DEFAULT_ML_BASE_URL);
}

#[tokio::test]
#[serial]
async fn test_env_override_points_the_client_at_the_stub() {
  let (addr, _audit, _dir) = start_stub().await;
  std::env::set_var(ML_URL_ENV, format!("http://{addr}"));

  let client = MlClient::from_env();
  let response = client.predict_co2(&features::co2_features(&FieldSurvey::default())).await;

  std::env::remove_var(ML_URL_ENV);
  assert!(response.is_ok());
}
