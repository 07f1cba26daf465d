//! Minimal client for the platform REST API.
//!
//! Every call is one JSON request/response. Non-2xx answers are turned into
//! `AdminError::Upstream` using the platform's `{error|message}` body. There
//! is no retry or backoff.
//!
//! Calls are instrumented and log method, path, status and latency (not
//! bodies). The bearer token is never logged.

use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::analytics::*;
use crate::config::UpstreamCfg;
use crate::error::{AdminError, AdminResult};
use crate::record::ModuleRecord;
use crate::util::trunc_for_log;

const CLIENT_UA: &str = "lingua-admin/0.1";

#[derive(Clone)]
pub struct PlatformClient {
  pub client: reqwest::Client,
  pub base_url: String,
  token: Option<String>,
}

impl PlatformClient {
  pub fn from_config(cfg: &UpstreamCfg) -> AdminResult<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(cfg.timeout_secs))
      .build()?;
    Ok(Self {
      client,
      base_url: cfg.base_url.trim_end_matches('/').to_string(),
      token: cfg.token.clone(),
    })
  }

  fn request(&self, method: Method, path: &str) -> RequestBuilder {
    let url = format!("{}{}", self.base_url, path);
    let req = self.client.request(method, &url).header(USER_AGENT, CLIENT_UA);
    match &self.token {
      Some(t) => req.header(AUTHORIZATION, format!("Bearer {t}")),
      None => req,
    }
  }

  /// Send and decode. Non-success statuses become `AdminError::Upstream`.
  #[instrument(level = "debug", skip_all, fields(%method, %path))]
  async fn execute<T: DeserializeOwned>(&self, method: Method, path: &str, req: RequestBuilder) -> AdminResult<T> {
    let start = Instant::now();
    let res = req.send().await.map_err(|e| {
      error!(target: "upstream", %method, %path, error = %e, "Platform API request failed");
      AdminError::Transport(e)
    })?;
    let status = res.status();
    let elapsed = start.elapsed();

    if !status.is_success() {
      let body = res.text().await.unwrap_or_default();
      let message = extract_api_error(&body).unwrap_or_else(|| {
        if body.trim().is_empty() { status.canonical_reason().unwrap_or("error").to_string() } else { trunc_for_log(&body, 200) }
      });
      error!(target: "upstream", %method, %path, status = status.as_u16(), ?elapsed, %message, "Platform API error");
      return Err(AdminError::Upstream { status: status.as_u16(), message });
    }

    let bytes = res.bytes().await?;
    info!(target: "upstream", %method, %path, status = status.as_u16(), ?elapsed, bytes = bytes.len(), "Platform API call");
    // 204 and other empty success bodies read as JSON `null`.
    let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) { b"null" } else { &bytes };
    serde_json::from_slice::<T>(body).map_err(|e| AdminError::Decode(format!("{method} {path}: {e}")))
  }

  pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AdminResult<T> {
    self.execute(Method::GET, path, self.request(Method::GET, path)).await
  }

  pub async fn send_json(&self, method: Method, path: &str, body: &Value) -> AdminResult<Value> {
    let req = self
      .request(method.clone(), path)
      .header(CONTENT_TYPE, "application/json")
      .json(body);
    self.execute(method, path, req).await
  }

  // --- Analytics collections ---

  pub async fn students(&self) -> AdminResult<Vec<Student>> {
    self.get_json("/api/students").await
  }

  pub async fn exam_results(&self) -> AdminResult<Vec<ExamResult>> {
    self.get_json("/api/analytics/exam-results").await
  }

  pub async fn overview_stats(&self) -> AdminResult<OverviewStats> {
    self.get_json("/api/analytics/overview-stats").await
  }

  pub async fn engagement_metrics(&self) -> AdminResult<EngagementMetrics> {
    self.get_json("/api/analytics/engagement-metrics").await
  }

  pub async fn language_distribution(&self) -> AdminResult<Vec<DistributionEntry>> {
    self.get_json("/api/analytics/language-distribution").await
  }

  pub async fn country_distribution(&self) -> AdminResult<Vec<DistributionEntry>> {
    self.get_json("/api/analytics/country-distribution").await
  }

  pub async fn level_distribution(&self) -> AdminResult<Vec<DistributionEntry>> {
    self.get_json("/api/analytics/level-distribution").await
  }

  pub async fn top_performers(&self) -> AdminResult<Vec<TopPerformer>> {
    self.get_json("/api/analytics/top-performers").await
  }

  pub async fn difficult_modules(&self) -> AdminResult<Vec<DifficultModule>> {
    self.get_json("/api/analytics/difficult-modules").await
  }

  pub async fn modules(&self) -> AdminResult<Vec<ModuleSummary>> {
    self.get_json("/api/modules").await
  }

  // --- Module editor ---

  pub async fn module(&self, id: i64) -> AdminResult<ModuleRecord> {
    self.get_json(&module_path(id)).await
  }

  pub async fn update_module(&self, id: i64, body: &Value) -> AdminResult<Value> {
    self.send_json(Method::PATCH, &module_path(id), body).await
  }

  pub async fn create_module(&self, body: &Value) -> AdminResult<Value> {
    self.send_json(Method::POST, NEW_MODULE_PATH, body).await
  }
}

pub const NEW_MODULE_PATH: &str = "/api/modules/new";

pub fn module_path(id: i64) -> String {
  format!("/api/modules/admin/{id}")
}

/// Try to extract a clean error message from a platform error body:
/// `{"error": "..."}`, `{"message": "..."}` or `{"error": {"message": "..."}}`.
pub fn extract_api_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum ErrField { Text(String), Obj { message: String } }
  #[derive(Deserialize)]
  struct EWrap {
    #[serde(default)] error: Option<ErrField>,
    #[serde(default)] message: Option<String>,
  }
  let w = serde_json::from_str::<EWrap>(body).ok()?;
  match (w.error, w.message) {
    (Some(ErrField::Text(t)), _) | (Some(ErrField::Obj { message: t }), _) => Some(t),
    (None, Some(m)) => Some(m),
    (None, None) => None,
  }
}
