//! Certificate trust scoring over one handshake snapshot.
//!
//! Trust runs 0-100 and is inverted into the 0-1 risk contribution. A
//! failed connection or invalid chain is worst-case trust, not a scan
//! failure.

use chrono::{DateTime, Utc};

use crate::core::corpus::Corpus;
use crate::core::types::{CertificateInfo, FactorResult};

pub const FACTOR: &str = "ssl";
pub const WEIGHT: f64 = 0.07;

const SELF_SIGNED_TRUST_CAP: i32 = 30;
const EXPIRY_SOON_DAYS: i64 = 7;

pub fn evaluate(cert: Option<&CertificateInfo>, corpus: &Corpus, now: DateTime<Utc>) -> FactorResult {
    let cert = match cert {
        Some(c) if c.chain_valid => c,
        _ => {
            return FactorResult::scored(
                FACTOR,
                WEIGHT,
                1.0,
                vec!["certificate chain invalid or unreachable".to_string()],
            )
        }
    };

    let mut trust: i32 = 100;
    let mut evidence = Vec::new();

    let days_left = (cert.valid_to - now).num_days();
    if days_left <= EXPIRY_SOON_DAYS {
        trust -= 20;
        evidence.push(format!("certificate expires in {days_left} days"));
    }

    let issuer_lower = cert.issuer.to_lowercase();
    let known_ca = corpus
        .trusted_issuers
        .iter()
        .any(|ca| issuer_lower.contains(ca.as_str()));
    if !known_ca {
        trust -= 15;
        evidence.push(format!("issuer outside well-known CA list: {}", cert.issuer));
    }

    if cert.is_self_signed {
        trust = trust.min(SELF_SIGNED_TRUST_CAP);
        evidence.push("self-signed certificate".to_string());
    }

    let trust = trust.max(0);
    if evidence.is_empty() {
        evidence.push(format!("valid certificate issued by {}", cert.issuer));
    }

    let risk = 1.0 - trust as f64 / 100.0;
    FactorResult::scored(FACTOR, WEIGHT, risk, evidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn cert(issuer: &str, days_left: i64, self_signed: bool, chain_valid: bool) -> CertificateInfo {
        let now = Utc::now();
        CertificateInfo {
            issuer: issuer.to_string(),
            valid_from: now - Duration::days(90),
            valid_to: now + Duration::days(days_left),
            is_self_signed: self_signed,
            chain_valid,
        }
    }

    #[test]
    fn unreachable_host_is_worst_case() {
        let result = evaluate(None, Corpus::builtin(), Utc::now());
        assert_eq!(result.raw_score(), 1.0);
        assert_eq!(
            result.evidence[0],
            "certificate chain invalid or unreachable"
        );
    }

    #[test]
    fn invalid_chain_is_worst_case() {
        let c = cert("C=US, O=Let's Encrypt, CN=R11", 60, false, false);
        let result = evaluate(Some(&c), Corpus::builtin(), Utc::now());
        assert_eq!(result.raw_score(), 1.0);
    }

    #[test]
    fn clean_certificate_carries_no_risk() {
        let c = cert("C=US, O=DigiCert Inc, CN=DigiCert TLS RSA", 120, false, true);
        let result = evaluate(Some(&c), Corpus::builtin(), Utc::now());
        assert_eq!(result.raw_score(), 0.0);
        assert!(result.evidence[0].contains("valid certificate"));
    }

    #[test]
    fn expiring_soon_loses_twenty_points() {
        let c = cert("C=US, O=Let's Encrypt, CN=R11", 3, false, true);
        let result = evaluate(Some(&c), Corpus::builtin(), Utc::now());
        assert!((result.raw_score() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn unknown_issuer_loses_fifteen_points() {
        let c = cert("CN=Shady CA Ltd", 120, false, true);
        let result = evaluate(Some(&c), Corpus::builtin(), Utc::now());
        assert!((result.raw_score() - 0.15).abs() < 1e-9);
    }

    #[test]
    fn self_signed_caps_trust_at_thirty() {
        let c = cert("CN=self.example.com", 120, true, true);
        let result = evaluate(Some(&c), Corpus::builtin(), Utc::now());
        assert!((result.raw_score() - 0.7).abs() < 1e-9);
    }
}
