//! ML service configuration
//!
//! Resolves where the prediction service lives. Everything defaults to a
//! local loopback deployment so the CLI works out of the box next to
//! `bluecarb_mock_ml`; environment variables point it elsewhere.

use url::Url;

/// Environment variable naming the prediction service base URL
pub const ML_URL_ENV: &str = "BLUECARB_ML_URL";
/// Environment variable overriding the request timeout in seconds
pub const ML_TIMEOUT_ENV: &str = "BLUECARB_ML_TIMEOUT_SECS";

/// Base URL used when `BLUECARB_ML_URL` is unset or unparseable
pub const DEFAULT_ML_BASE_URL: &str = "http://localhost:8000";
/// Request timeout used when `BLUECARB_ML_TIMEOUT_SECS` is unset or unparseable
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the prediction service client
#[derive(Debug, Clone)]
pub struct MlServiceConfig {
  /// Base URL of the prediction service (e.g., "http://localhost:8000")
  pub base_url: Url,
  /// Request timeout in seconds
  pub timeout_secs: u64,
}

impl Default for MlServiceConfig {
  fn default() -> Self {
    Self {
      base_url: Url::parse(DEFAULT_ML_BASE_URL).expect("default ML base URL must parse"),
      timeout_secs: DEFAULT_TIMEOUT_SECS,
    }
  }
}

impl MlServiceConfig {
  /// Resolve the configuration from the environment.
  ///
  /// A malformed `BLUECARB_ML_URL` logs a warning and falls back to the
  /// default rather than aborting.
  pub fn from_env() -> Self {
    let base_url = match std::env::var(ML_URL_ENV) {
      Ok(raw) => match Url::parse(&raw) {
        Ok(url) => url,
        Err(err) => {
          foghorn::warn(&format!(
            "Ignoring malformed {ML_URL_ENV} ({raw}): {err}; using {DEFAULT_ML_BASE_URL}"
          ));
          Url::parse(DEFAULT_ML_BASE_URL).expect("default ML base URL must parse")
        }
      },
      Err(_) => Url::parse(DEFAULT_ML_BASE_URL).expect("default ML base URL must parse"),
    };

    let timeout_secs = std::env::var(ML_TIMEOUT_ENV)
      .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
      .parse()
      .unwrap_or(DEFAULT_TIMEOUT_SECS);

    Self { base_url, timeout_secs }
  }

  /// Join an absolute endpoint path onto the base URL.
  ///
  /// String concatenation rather than `Url::join`, which would drop any
  /// path prefix the service is mounted under.
  pub fn endpoint(&self, path: &str) -> String {
    format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn test_defaults_when_env_unset() {
    std::env::remove_var(ML_URL_ENV);
    std::env::remove_var(ML_TIMEOUT_ENV);

    let config = MlServiceConfig::from_env();
    assert_eq!(config.endpoint(""), DEFAULT_ML_BASE_URL);
    assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
  }

  #[test]
  #[serial]
  fn test_env_overrides() {
    std::env::set_var(ML_URL_ENV, "http://ml.example.org:9090/api");
    std::env::set_var(ML_TIMEOUT_ENV, "5");

    let config = MlServiceConfig::from_env();
    assert_eq!(config.endpoint("/predict/co2"), "http://ml.example.org:9090/api/predict/co2");
    assert_eq!(config.timeout_secs, 5);

    std::env::remove_var(ML_URL_ENV);
    std::env::remove_var(ML_TIMEOUT_ENV);
  }

  #[test]
  #[serial]
  fn test_malformed_url_falls_back_to_default() {
    std::env::set_var(ML_URL_ENV, "not a url");

    let config = MlServiceConfig::from_env();
    assert_eq!(config.endpoint(""), DEFAULT_ML_BASE_URL);

    std::env::remove_var(ML_URL_ENV);
  }

  #[test]
  #[serial]
  fn test_malformed_timeout_falls_back_to_default() {
    std::env::remove_var(ML_URL_ENV);
    std::env::set_var(ML_TIMEOUT_ENV, "soon");

    let config = MlServiceConfig::from_env();
    assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);

    std::env::remove_var(ML_TIMEOUT_ENV);
  }

  #[test]
  fn test_endpoint_joins_without_double_slash() {
    let config = MlServiceConfig::default();
    // Url normalizes the base to a trailing slash; endpoint() must not double it
    assert_eq!(config.endpoint("/predict/co2"), "http://localhost:8000/predict/co2");
  }
}
