use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Page facts captured by the browser-side collector, one per scan.
/// The collector lower-cases the hostname and size-caps `forms` and
/// `suspicious_patterns` before handing the record over.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub hostname: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub forms: Vec<FormFact>,
    #[serde(default)]
    pub dom_signature: String,
    #[serde(default)]
    pub suspicious_patterns: BTreeSet<String>,
    #[serde(default)]
    pub external_links: LinkCounts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFact {
    #[serde(default)]
    pub has_password: bool,
    #[serde(default)]
    pub has_email: bool,
    #[serde(default)]
    pub submits_to_different_domain: bool,
    #[serde(default)]
    pub input_count: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LinkCounts {
    #[serde(default)]
    pub external: u32,
    #[serde(default)]
    pub total: u32,
}

/// Snapshot of the leaf certificate from one live TLS handshake.
/// Not cached across scans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateInfo {
    pub issuer: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub is_self_signed: bool,
    pub chain_valid: bool,
}

/// One historical issuance record from a transparency log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CTLogEntry {
    pub issuer: String,
    pub not_before: DateTime<Utc>,
}

/// Registration data; some registries withhold or refuse lookups, so the
/// date is optional and absence only downgrades confidence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WhoisRecord {
    pub registered_at: Option<DateTime<Utc>>,
}

/// Outcome of one detector. `Unavailable` is distinct from a zero score:
/// the factor's weight still counts toward the total, its contribution is
/// zero, and the evidence says so.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum FactorScore {
    Scored(f64),
    Unavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorResult {
    pub name: String,
    pub weight: f64,
    pub score: FactorScore,
    pub evidence: Vec<String>,
}

impl FactorResult {
    pub fn scored(
        name: impl Into<String>,
        weight: f64,
        raw: f64,
        evidence: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            weight,
            score: FactorScore::Scored(raw),
            evidence,
        }
    }

    pub fn unavailable(name: impl Into<String>, weight: f64, reason: impl Into<String>) -> Self {
        let name = name.into();
        let reason = reason.into();
        let evidence = vec![format!("{}: unavailable ({})", name, reason)];
        Self {
            name,
            weight,
            score: FactorScore::Unavailable { reason },
            evidence,
        }
    }

    pub fn raw_score(&self) -> f64 {
        match self.score {
            FactorScore::Scored(raw) => raw,
            FactorScore::Unavailable { .. } => 0.0,
        }
    }

    pub fn contribution(&self) -> f64 {
        self.weight * self.raw_score()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Safe,
    Suspicious,
    Phish,
    Error,
}

/// Advisory output of the optional context analyzer. Attached to the
/// evidence list verbatim; never moves the numeric score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextInsight {
    pub summary: String,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    #[serde(default)]
    pub recommendation: String,
}

/// Final verdict for one request. Created fresh per analysis and never
/// mutated; persistence, if any, is the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub verdict: Verdict,
    pub score: f64,
    pub evidence: Vec<String>,
    pub per_factor: BTreeMap<String, FactorResult>,
    pub timestamp: DateTime<Utc>,
}
