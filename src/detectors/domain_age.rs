//! Registration-age risk bucketing over WHOIS/RDAP data.

use chrono::{DateTime, Utc};

use crate::core::types::{FactorResult, WhoisRecord};

pub const FACTOR: &str = "domain_age";
pub const WEIGHT: f64 = 0.20;

/// Moderate default when the registry withheld the date or the lookup
/// failed: genuine uncertainty, never full trust.
const UNKNOWN_AGE_SCORE: f64 = 0.30;

pub fn classify(record: &WhoisRecord, now: DateTime<Utc>) -> FactorResult {
    let registered = match record.registered_at {
        Some(ts) => ts,
        None => return unknown(),
    };
    // A registration date in the future means broken registry data.
    if registered > now {
        return unknown();
    }
    let age_days = (now - registered).num_days();
    let (raw, note) = match age_days {
        d if d < 7 => (1.00, format!("domain registered {d} days ago")),
        d if d < 30 => (0.75, format!("domain registered {d} days ago")),
        d if d < 90 => (0.50, format!("domain is {d} days old")),
        d if d < 180 => (0.25, format!("domain is {d} days old")),
        d if d < 365 => (0.10, format!("domain is {d} days old")),
        d => (0.00, format!("established domain, {}+ years old", d / 365)),
    };
    FactorResult::scored(FACTOR, WEIGHT, raw, vec![note])
}

fn unknown() -> FactorResult {
    FactorResult::scored(
        FACTOR,
        WEIGHT,
        UNKNOWN_AGE_SCORE,
        vec!["domain age unknown".to_string()],
    )
}
