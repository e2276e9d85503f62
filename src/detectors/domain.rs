//! Domain-shape heuristics: IP-literal hosts, high-risk registries and
//! deep or brand-bait subdomain chains.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::corpus::Corpus;
use crate::core::types::FactorResult;

pub const FACTOR: &str = "domain";
pub const WEIGHT: f64 = 0.08;

const MAX_SUBDOMAIN_LABELS: usize = 2;

static IPV4_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}(\.\d{1,3}){3}$").expect("static pattern"));

pub fn inspect(hostname: &str, corpus: &Corpus) -> FactorResult {
    let host = hostname.trim().trim_end_matches('.').to_lowercase();
    let mut raw: f64 = 0.0;
    let mut evidence = Vec::new();

    if IPV4_LITERAL.is_match(&host) {
        raw += 0.6;
        evidence.push("uses IP address instead of domain name".to_string());
        return FactorResult::scored(FACTOR, WEIGHT, raw.min(1.0), evidence);
    }

    let parts = corpus.split_host(&host);

    if corpus.high_risk_tlds.iter().any(|t| *t == parts.suffix) {
        raw += 0.5;
        evidence.push(format!("high-risk TLD: .{}", parts.suffix));
    }

    let subdomain_labels = parts
        .subdomain
        .split('.')
        .filter(|s| !s.is_empty())
        .count();
    if subdomain_labels > MAX_SUBDOMAIN_LABELS {
        raw += 0.25;
        evidence.push(format!(
            "unusually deep subdomain chain ({subdomain_labels} labels)"
        ));
    }

    // Bait keywords in the subdomain are surfaced but not scored; the
    // typosquat factor owns brand-similarity risk.
    if !parts.subdomain.is_empty() {
        if let Some(keyword) = corpus
            .bait_subdomain_keywords
            .iter()
            .find(|k| parts.subdomain.contains(k.as_str()))
        {
            evidence.push(format!(
                "subdomain contains bait keyword \"{keyword}\": {}",
                parts.subdomain
            ));
        }
    }

    if evidence.is_empty() {
        evidence.push("no domain-shape anomalies".to_string());
    }
    FactorResult::scored(FACTOR, WEIGHT, raw.min(1.0), evidence)
}
