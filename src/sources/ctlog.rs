//! Certificate-transparency history via a crt.sh-compatible endpoint.

use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::core::error::SentryError;
use crate::core::types::CTLogEntry;

/// crt.sh returns unbounded history; cap what we consider.
const MAX_ENTRIES: usize = 50;

#[derive(Debug, Deserialize, Default)]
struct CrtShEntry {
    #[serde(default)]
    issuer_name: String,
    #[serde(default)]
    not_before: String,
    #[serde(default)]
    entry_timestamp: String,
}

pub async fn query(
    client: &Client,
    base_url: &str,
    hostname: &str,
) -> Result<Vec<CTLogEntry>, SentryError> {
    let url = format!(
        "{}/?q={}&output=json",
        base_url.trim_end_matches('/'),
        hostname
    );
    let resp = client.get(&url).send().await.map_err(SentryError::from)?;
    if !resp.status().is_success() {
        return Err(SentryError::Http(format!(
            "ct log query returned {}",
            resp.status()
        )));
    }
    let text = resp.text().await.map_err(SentryError::from)?;
    // crt.sh serves an HTML error page on overload; treat it as no data.
    let entries: Vec<CrtShEntry> = serde_json::from_str(&text).unwrap_or_default();
    Ok(entries
        .into_iter()
        .take(MAX_ENTRIES)
        .filter_map(to_entry)
        .collect())
}

fn to_entry(raw: CrtShEntry) -> Option<CTLogEntry> {
    let ts = if raw.not_before.is_empty() {
        &raw.entry_timestamp
    } else {
        &raw.not_before
    };
    let not_before = parse_log_timestamp(ts)?;
    let issuer = if raw.issuer_name.is_empty() {
        "unknown".to_string()
    } else {
        raw.issuer_name
    };
    Some(CTLogEntry { issuer, not_before })
}

/// Log timestamps come without a zone and sometimes with subseconds.
fn parse_log_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.split('.').next().unwrap_or(value);
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
