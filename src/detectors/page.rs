//! Heuristics over collector-extracted page facts: credential forms and
//! DOM/behavior patterns, reported as two separate factors.

use std::collections::BTreeSet;

use crate::core::types::{FactorResult, FormFact, LinkCounts};

pub const FORMS_FACTOR: &str = "page_forms";
pub const FORMS_WEIGHT: f64 = 0.10;

pub const DOM_FACTOR: &str = "page_dom";
pub const DOM_WEIGHT: f64 = 0.05;

const URGENCY_PREFIX: &str = "urgency:";
const HIDDEN_IFRAME_PATTERN: &str = "hidden_iframes";
const EXTERNAL_RATIO_THRESHOLD: f64 = 0.7;
const EXTERNAL_RATIO_MIN_LINKS: u32 = 5;

pub fn score_forms(forms: &[FormFact]) -> FactorResult {
    let mut raw: f64 = 0.0;
    let mut evidence = Vec::new();

    let cross_domain_credentials = forms
        .iter()
        .any(|f| f.has_password && f.submits_to_different_domain);
    let any_password = forms.iter().any(|f| f.has_password);

    if cross_domain_credentials {
        raw += 0.6;
        evidence.push("credential form submits cross-domain".to_string());
    } else if any_password {
        raw += 0.1;
        evidence.push("password field present".to_string());
    }

    if evidence.is_empty() {
        evidence.push("no risky form behavior".to_string());
    }
    FactorResult::scored(FORMS_FACTOR, FORMS_WEIGHT, raw.min(1.0), evidence)
}

pub fn score_dom(patterns: &BTreeSet<String>, links: &LinkCounts) -> FactorResult {
    let mut raw: f64 = 0.0;
    let mut evidence = Vec::new();

    let urgency_phrases = patterns
        .iter()
        .filter(|p| p.starts_with(URGENCY_PREFIX))
        .count();
    if urgency_phrases > 0 {
        raw += (urgency_phrases as f64 * 0.2).min(0.4);
        evidence.push(format!(
            "urgency language detected ({urgency_phrases} distinct phrases)"
        ));
    }

    if patterns.contains(HIDDEN_IFRAME_PATTERN) {
        raw += 0.2;
        evidence.push("hidden iframes detected".to_string());
    }

    if links.total >= EXTERNAL_RATIO_MIN_LINKS {
        let ratio = links.external as f64 / links.total as f64;
        if ratio > EXTERNAL_RATIO_THRESHOLD {
            raw += 0.1;
            evidence.push("unusually high external-link ratio".to_string());
        }
    }

    if evidence.is_empty() {
        evidence.push("no suspicious DOM patterns".to_string());
    }
    FactorResult::scored(DOM_FACTOR, DOM_WEIGHT, raw.min(1.0), evidence)
}
