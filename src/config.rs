//! Loading admin configuration (upstream, editor policy, analytics buckets,
//! page chrome) from TOML, with a couple of environment overrides.
//!
//! Every section and every key is optional; see the `Default` impls.

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

pub const DEFAULT_PLATFORM_API_URL: &str = "http://localhost:4000";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 20;

#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
pub struct AdminConfig {
  #[serde(default)] pub upstream: UpstreamCfg,
  #[serde(default)] pub editor: EditorCfg,
  #[serde(default)] pub analytics: AnalyticsCfg,
  #[serde(default)] pub chrome: ChromeCfg,
}

/// Where the platform REST API lives and how long we wait for it.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct UpstreamCfg {
  pub base_url: String,
  pub timeout_secs: u64,
  /// Bearer token forwarded on every upstream call, if set.
  pub token: Option<String>,
}

impl Default for UpstreamCfg {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_PLATFORM_API_URL.into(),
      timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
      token: None,
    }
  }
}

/// What happens to `_ru` fields when the editor hides them and then saves.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuFieldsPolicy {
  /// Hiding is display-only: stored Russian values are written back as they are.
  #[default]
  Preserve,
  /// Hidden Russian fields are saved as `null`.
  Clear,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorCfg {
  pub ru_fields_policy: RuFieldsPolicy,
  pub show_russian_default: bool,
}

impl Default for EditorCfg {
  fn default() -> Self {
    Self { ru_fields_policy: RuFieldsPolicy::Preserve, show_russian_default: true }
  }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyticsCfg {
  /// Upper bounds (minutes, exclusive) of the time-spent buckets. The last
  /// bucket is open-ended.
  pub time_bucket_minutes: Vec<u32>,
}

impl Default for AnalyticsCfg {
  fn default() -> Self {
    Self { time_bucket_minutes: vec![30, 60, 120, 300] }
  }
}

/// Body classes the frontend applies while a page is mounted.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChromeCfg {
  pub analytics_body_class: String,
  pub editor_body_class: String,
}

impl Default for ChromeCfg {
  fn default() -> Self {
    Self {
      analytics_body_class: "admin-analytics".into(),
      editor_body_class: "admin-module-editor".into(),
    }
  }
}

pub fn parse_admin_config(s: &str) -> Result<AdminConfig, toml::de::Error> {
  toml::from_str::<AdminConfig>(s)
}

/// Env values win over the file.
pub fn apply_env_overrides(mut cfg: AdminConfig, base_url: Option<String>, token: Option<String>) -> AdminConfig {
  if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
    cfg.upstream.base_url = url;
  }
  if let Some(t) = token.filter(|t| !t.trim().is_empty()) {
    cfg.upstream.token = Some(t);
  }
  cfg.upstream.base_url = cfg.upstream.base_url.trim_end_matches('/').to_string();
  cfg
}

/// Load `AdminConfig` from ADMIN_CONFIG_PATH (if set), then apply
/// PLATFORM_API_URL / PLATFORM_API_TOKEN. Read or parse errors are logged and
/// the defaults are used instead.
pub fn load_admin_config_from_env() -> AdminConfig {
  let from_file = match std::env::var("ADMIN_CONFIG_PATH").ok() {
    None => AdminConfig::default(),
    Some(path) => match std::fs::read_to_string(&path) {
      Ok(s) => match parse_admin_config(&s) {
        Ok(cfg) => {
          info!(target: "lingua_admin", %path, "Loaded admin config (TOML)");
          cfg
        }
        Err(e) => {
          error!(target: "lingua_admin", %path, error = %e, "Failed to parse TOML config; using defaults");
          AdminConfig::default()
        }
      },
      Err(e) => {
        error!(target: "lingua_admin", %path, error = %e, "Failed to read TOML config file; using defaults");
        AdminConfig::default()
      }
    },
  };

  let cfg = apply_env_overrides(
    from_file,
    std::env::var("PLATFORM_API_URL").ok(),
    std::env::var("PLATFORM_API_TOKEN").ok(),
  );
  if cfg.editor.ru_fields_policy == RuFieldsPolicy::Clear {
    warn!(target: "lingua_admin", "ru_fields_policy = clear: hidden Russian fields will be saved as null");
  }
  cfg
}
