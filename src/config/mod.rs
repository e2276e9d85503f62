use std::{fs, path::Path};

use serde::Deserialize;

use crate::core::corpus::{BrandEntry, HomoglyphPair};
use crate::core::error::SentryError;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// The advisory analyzer gets a tighter budget than the detectors.
    #[serde(default = "default_context_timeout_ms")]
    pub context_timeout_ms: u64,
    #[serde(default = "default_tcp_connect_timeout_ms")]
    pub tcp_connect_timeout_ms: u64,
    #[serde(default = "default_tls_handshake_timeout_ms")]
    pub tls_handshake_timeout_ms: u64,
    #[serde(default = "default_ct_window_days")]
    pub ct_window_days: i64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_rdap_base_url")]
    pub rdap_base_url: String,
    #[serde(default = "default_crtsh_base_url")]
    pub crtsh_base_url: String,
    #[serde(default = "default_context_base_url")]
    pub context_base_url: String,
    #[serde(default = "default_true")]
    pub context_enabled: bool,
    /// Non-empty tables replace the built-in corpus data.
    #[serde(default)]
    pub brands: Vec<BrandEntry>,
    #[serde(default)]
    pub trusted_issuers: Vec<String>,
    #[serde(default)]
    pub high_risk_tlds: Vec<String>,
    #[serde(default)]
    pub homoglyphs: Vec<HomoglyphPair>,
}

pub fn load_config(path: Option<&str>) -> Result<AppConfig, SentryError> {
    let default_path = Path::new("config/phish-sentry.toml");
    let path = path.map(Path::new).unwrap_or(default_path);

    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| SentryError::Config(e.to_string()))?;
    let cfg: AppConfig =
        toml::from_str(&content).map_err(|e| SentryError::Config(e.to_string()))?;
    Ok(cfg)
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            timeout_ms: default_timeout_ms(),
            context_timeout_ms: default_context_timeout_ms(),
            tcp_connect_timeout_ms: default_tcp_connect_timeout_ms(),
            tls_handshake_timeout_ms: default_tls_handshake_timeout_ms(),
            ct_window_days: default_ct_window_days(),
            user_agent: default_user_agent(),
            rdap_base_url: default_rdap_base_url(),
            crtsh_base_url: default_crtsh_base_url(),
            context_base_url: default_context_base_url(),
            context_enabled: true,
            brands: Vec::new(),
            trusted_issuers: Vec::new(),
            high_risk_tlds: Vec::new(),
            homoglyphs: Vec::new(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_context_timeout_ms() -> u64 {
    5_000
}

fn default_tcp_connect_timeout_ms() -> u64 {
    5_000
}

fn default_tls_handshake_timeout_ms() -> u64 {
    5_000
}

fn default_ct_window_days() -> i64 {
    30
}

fn default_user_agent() -> String {
    "phish-sentry/1.0".to_string()
}

fn default_rdap_base_url() -> String {
    "https://rdap.org".to_string()
}

fn default_crtsh_base_url() -> String {
    "https://crt.sh".to_string()
}

fn default_context_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-lite:generateContent"
        .to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_gets_defaults() {
        let cfg: AppConfig = toml::from_str("timeout_ms = 2000").unwrap();
        assert_eq!(cfg.timeout_ms, 2000);
        assert_eq!(cfg.ct_window_days, 30);
        assert!(cfg.context_enabled);
        assert!(cfg.brands.is_empty());
    }

    #[test]
    fn brand_table_overrides() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [[brands]]
            name = "acme"
            domains = ["acme.example"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.brands.len(), 1);
        assert_eq!(cfg.brands[0].name, "acme");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = load_config(Some("config/does-not-exist.toml")).unwrap();
        assert_eq!(cfg.rdap_base_url, "https://rdap.org");
    }
}
