//! Registration-date lookup via RDAP (the WHOIS successor).

use chrono::{DateTime, Utc};
use reqwest::Client;

use crate::core::error::SentryError;
use crate::core::types::WhoisRecord;

/// Fetch the registration event for a registrable domain. A non-success
/// response means the registry withheld the data: that is a record
/// without a date, not an error.
pub async fn lookup(
    client: &Client,
    base_url: &str,
    domain: &str,
) -> Result<WhoisRecord, SentryError> {
    let url = format!("{}/domain/{}", base_url.trim_end_matches('/'), domain);
    let resp = client.get(&url).send().await.map_err(SentryError::from)?;
    if !resp.status().is_success() {
        return Ok(WhoisRecord::default());
    }
    let json: serde_json::Value = resp.json().await.map_err(SentryError::from)?;
    Ok(WhoisRecord {
        registered_at: registration_date(&json),
    })
}

fn registration_date(json: &serde_json::Value) -> Option<DateTime<Utc>> {
    let events = json.get("events")?.as_array()?;
    for event in events {
        if event.get("eventAction").and_then(|a| a.as_str()) == Some("registration") {
            if let Some(date_str) = event.get("eventDate").and_then(|d| d.as_str()) {
                if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
                    return Some(dt.with_timezone(&Utc));
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_registration_event() {
        let json: serde_json::Value = serde_json::from_str(
            r#"{"events":[
                {"eventAction":"last changed","eventDate":"2024-05-01T00:00:00Z"},
                {"eventAction":"registration","eventDate":"2019-02-03T10:30:00Z"}
            ]}"#,
        )
        .unwrap();
        let date = registration_date(&json).unwrap();
        assert_eq!(date.to_rfc3339(), "2019-02-03T10:30:00+00:00");
    }

    #[test]
    fn missing_events_yield_none() {
        let json: serde_json::Value = serde_json::from_str(r#"{"handle":"X"}"#).unwrap();
        assert!(registration_date(&json).is_none());
    }

    #[test]
    fn malformed_date_is_ignored() {
        let json: serde_json::Value = serde_json::from_str(
            r#"{"events":[{"eventAction":"registration","eventDate":"yesterday"}]}"#,
        )
        .unwrap();
        assert!(registration_date(&json).is_none());
    }
}
