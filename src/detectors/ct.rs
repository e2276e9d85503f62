//! Issuance-pattern analysis over certificate-transparency history.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};

use crate::core::types::{CTLogEntry, FactorResult};

pub const FACTOR: &str = "ct";
pub const WEIGHT: f64 = 0.05;

pub const DEFAULT_WINDOW_DAYS: i64 = 30;

const MAX_DISTINCT_ISSUERS: usize = 2;
const MAX_RECENT_REISSUES: usize = 5;

/// The reissuance check looks only inside the lookback window; the
/// empty-history and multiple-issuer checks consider everything returned.
pub fn analyze(entries: &[CTLogEntry], window_days: i64, now: DateTime<Utc>) -> FactorResult {
    let mut raw = 0.0;
    let mut evidence = Vec::new();

    if entries.is_empty() {
        raw += 0.4;
        evidence.push("no certificates found in CT logs".to_string());
        return FactorResult::scored(FACTOR, WEIGHT, raw, evidence);
    }

    let issuers: BTreeSet<&str> = entries.iter().map(|e| e.issuer.as_str()).collect();
    if issuers.len() > MAX_DISTINCT_ISSUERS {
        raw += 0.3;
        evidence.push(format!(
            "multiple issuers observed ({} distinct)",
            issuers.len()
        ));
    }

    let cutoff = now - Duration::days(window_days);
    let recent = entries.iter().filter(|e| e.not_before > cutoff).count();
    if recent > MAX_RECENT_REISSUES {
        raw += 0.3;
        evidence.push(format!(
            "frequent reissuance ({recent} certificates in {window_days} days)"
        ));
    }

    if evidence.is_empty() {
        evidence.push(format!(
            "normal issuance pattern ({} certificates on record)",
            entries.len()
        ));
    }

    FactorResult::scored(FACTOR, WEIGHT, raw.min(1.0), evidence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(issuer: &str, days_ago: i64, now: DateTime<Utc>) -> CTLogEntry {
        CTLogEntry {
            issuer: issuer.to_string(),
            not_before: now - Duration::days(days_ago),
        }
    }

    #[test]
    fn empty_history_fires_missing_flag() {
        let result = analyze(&[], DEFAULT_WINDOW_DAYS, Utc::now());
        assert!(result.raw_score() >= 0.40);
        assert_eq!(result.evidence[0], "no certificates found in CT logs");
    }

    #[test]
    fn quiet_history_is_clean() {
        let now = Utc::now();
        let entries = vec![entry("R11", 200, now), entry("R11", 100, now)];
        let result = analyze(&entries, DEFAULT_WINDOW_DAYS, now);
        assert_eq!(result.raw_score(), 0.0);
        assert!(result.evidence[0].contains("normal issuance pattern"));
    }

    #[test]
    fn many_issuers_flagged_across_full_history() {
        let now = Utc::now();
        let entries = vec![
            entry("R11", 400, now),
            entry("DigiCert", 300, now),
            entry("Sectigo", 200, now),
        ];
        let result = analyze(&entries, DEFAULT_WINDOW_DAYS, now);
        assert!((result.raw_score() - 0.3).abs() < 1e-9);
        assert!(result.evidence[0].contains("multiple issuers observed"));
    }

    #[test]
    fn reissuance_counts_only_the_window() {
        let now = Utc::now();
        // six recent certificates, all from one issuer
        let mut entries: Vec<CTLogEntry> = (0..6).map(|i| entry("R11", i + 1, now)).collect();
        let result = analyze(&entries, DEFAULT_WINDOW_DAYS, now);
        assert!((result.raw_score() - 0.3).abs() < 1e-9);
        assert!(result.evidence[0].contains("frequent reissuance"));

        // push the same certificates outside the window and the flag clears
        entries.iter_mut().for_each(|e| e.not_before = now - Duration::days(90));
        let result = analyze(&entries, DEFAULT_WINDOW_DAYS, now);
        assert_eq!(result.raw_score(), 0.0);
    }

    #[test]
    fn combined_flags_accumulate() {
        let now = Utc::now();
        let mut entries: Vec<CTLogEntry> = (0..6).map(|i| entry("R11", i + 1, now)).collect();
        entries.push(entry("DigiCert", 2, now));
        entries.push(entry("Sectigo", 3, now));
        let result = analyze(&entries, DEFAULT_WINDOW_DAYS, now);
        assert!((result.raw_score() - 0.6).abs() < 1e-9);
        assert_eq!(result.evidence.len(), 2);
    }
}
