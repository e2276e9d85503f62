//! Optional advisory analyzer backed by a Gemini generateContent proxy.
//!
//! Purely advisory: absent without an API key, bounded by its own
//! timeout, and its output never moves the numeric score.

use reqwest::Client;

use crate::config::AppConfig;
use crate::core::error::SentryError;
use crate::core::types::{AnalysisRequest, ContextInsight};

const API_KEY_ENV: &str = "GEMINI_API_KEY";

pub struct ContextAnalyzer {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ContextAnalyzer {
    /// None when the analyzer is disabled or no key is configured; that
    /// is the normal, expected state.
    pub fn from_env(config: &AppConfig, client: Client) -> Option<Self> {
        if !config.context_enabled {
            return None;
        }
        let api_key = std::env::var(API_KEY_ENV).ok()?.trim().to_string();
        if api_key.is_empty() {
            return None;
        }
        Some(Self {
            client,
            base_url: config.context_base_url.clone(),
            api_key,
        })
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<ContextInsight, SentryError> {
        let prompt = build_prompt(request);
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": 0.2, "maxOutputTokens": 300, "topP": 0.8 }
        });
        let resp = self
            .client
            .post(format!("{}?key={}", self.base_url, self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(SentryError::from)?;
        if !resp.status().is_success() {
            return Err(SentryError::Http(format!(
                "context analyzer returned {}",
                resp.status()
            )));
        }
        let data: serde_json::Value = resp.json().await.map_err(SentryError::from)?;
        let text = data
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(|t| t.as_str())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(SentryError::Parse("empty context response".to_string()));
        }
        Ok(parse_response(text))
    }
}

fn build_prompt(request: &AnalysisRequest) -> String {
    let password_forms = request.forms.iter().filter(|f| f.has_password).count();
    let external_forms = request
        .forms
        .iter()
        .filter(|f| f.submits_to_different_domain)
        .count();
    let patterns: Vec<&str> = request
        .suspicious_patterns
        .iter()
        .take(5)
        .map(|s| s.as_str())
        .collect();
    format!(
        "You are a cybersecurity expert analyzing a webpage for phishing indicators.\n\
         \n\
         WEBPAGE DATA:\n\
         - URL: {}\n\
         - Hostname: {}\n\
         \n\
         FORM ANALYSIS:\n\
         - Password input forms: {}\n\
         - Forms submitting to external domains: {}\n\
         \n\
         PAGE BEHAVIOR:\n\
         - Suspicious patterns: {}\n\
         - External links: {} of {}\n\
         \n\
         RESPOND IN THIS EXACT FORMAT:\n\
         SUMMARY: [one sentence about the security status, max 120 chars]\n\
         RISK_FACTORS: [comma-separated risks found, or \"None identified\"]\n\
         RECOMMENDATION: [one actionable user recommendation, max 80 chars]",
        request.url,
        request.hostname,
        password_forms,
        external_forms,
        if patterns.is_empty() {
            "None detected".to_string()
        } else {
            patterns.join(", ")
        },
        request.external_links.external,
        request.external_links.total,
    )
}

fn parse_response(text: &str) -> ContextInsight {
    let mut insight = ContextInsight::default();
    for line in text.lines() {
        let line = line.trim();
        if let Some(rest) = strip_prefix_ci(line, "SUMMARY:") {
            insight.summary = rest.trim().to_string();
        } else if let Some(rest) = strip_prefix_ci(line, "RISK_FACTORS:") {
            let rest = rest.trim();
            if !matches!(
                rest.to_lowercase().as_str(),
                "none identified" | "none" | "none detected"
            ) {
                insight.risk_factors = rest
                    .split(',')
                    .map(|f| f.trim().to_string())
                    .filter(|f| !f.is_empty())
                    .collect();
            }
        } else if let Some(rest) = strip_prefix_ci(line, "RECOMMENDATION:") {
            insight.recommendation = rest.trim().to_string();
        }
    }
    // unstructured reply: keep a truncated summary rather than nothing
    if insight.summary.is_empty() {
        let flat = text.replace('\n', " ");
        insight.summary = flat.chars().take(150).collect();
    }
    insight
}

fn strip_prefix_ci<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    match line.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => Some(&line[prefix.len()..]),
        _ => None,
    }
}
