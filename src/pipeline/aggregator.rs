//! Fixed-weight aggregation of factor results into one verdict.
//!
//! The factor table is closed: a factor a detector never delivered is
//! filled in as unavailable at its full weight, so degraded scans are
//! visibly degraded instead of silently renormalized.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::core::types::{AnalysisResult, ContextInsight, FactorResult, Verdict};
use crate::detectors::{ct, domain, domain_age, page, ssl, typosquat};

pub const SUSPICIOUS_THRESHOLD: f64 = 0.25;
pub const PHISH_THRESHOLD: f64 = 0.55;

/// Canonical factor order; evidence is concatenated in this order.
const FACTOR_TABLE: &[(&str, f64)] = &[
    (typosquat::FACTOR, typosquat::WEIGHT),
    (domain_age::FACTOR, domain_age::WEIGHT),
    (ssl::FACTOR, ssl::WEIGHT),
    (ct::FACTOR, ct::WEIGHT),
    (domain::FACTOR, domain::WEIGHT),
    (page::FORMS_FACTOR, page::FORMS_WEIGHT),
    (page::DOM_FACTOR, page::DOM_WEIGHT),
];

/// Total over whatever the detectors produced. Never panics; missing
/// factors contribute weight x 0 with an explicit evidence note.
pub fn aggregate(
    factors: Vec<FactorResult>,
    context: Option<&ContextInsight>,
    timestamp: DateTime<Utc>,
) -> AnalysisResult {
    let mut delivered: BTreeMap<String, FactorResult> = factors
        .into_iter()
        .map(|f| (f.name.clone(), f))
        .collect();

    let mut per_factor = BTreeMap::new();
    let mut evidence = Vec::new();
    let mut score = 0.0;

    for (name, weight) in FACTOR_TABLE {
        let factor = delivered
            .remove(*name)
            .unwrap_or_else(|| FactorResult::unavailable(*name, *weight, "detector did not run"));
        score += factor.contribution();
        evidence.extend(factor.evidence.iter().cloned());
        per_factor.insert(factor.name.clone(), factor);
    }

    // Factors outside the canonical table still count, after it.
    for (_, factor) in delivered {
        score += factor.contribution();
        evidence.extend(factor.evidence.iter().cloned());
        per_factor.insert(factor.name.clone(), factor);
    }

    if let Some(insight) = context {
        if !insight.summary.is_empty() {
            evidence.push(format!("context: {}", insight.summary));
        }
        for risk in &insight.risk_factors {
            evidence.push(format!("context risk: {risk}"));
        }
        if !insight.recommendation.is_empty() {
            evidence.push(format!("recommendation: {}", insight.recommendation));
        }
    }

    let score = score.clamp(0.0, 1.0);
    AnalysisResult {
        verdict: verdict_for(score),
        score,
        evidence,
        per_factor,
        timestamp,
    }
}

/// Malformed request: no factors computed, terminal error verdict.
pub fn rejection(reason: &str, timestamp: DateTime<Utc>) -> AnalysisResult {
    AnalysisResult {
        verdict: Verdict::Error,
        score: 0.0,
        evidence: vec![reason.to_string()],
        per_factor: BTreeMap::new(),
        timestamp,
    }
}

pub fn verdict_for(score: f64) -> Verdict {
    if score >= PHISH_THRESHOLD {
        Verdict::Phish
    } else if score >= SUSPICIOUS_THRESHOLD {
        Verdict::Suspicious
    } else {
        Verdict::Safe
    }
}
