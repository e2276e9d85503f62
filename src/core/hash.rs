use sha2::{Digest, Sha256};

use crate::core::types::AnalysisRequest;

/// Stable fingerprint for one collector capture, used to correlate log
/// lines for repeated scans of the same page state.
pub fn request_fingerprint(request: &AnalysisRequest) -> String {
    let mut hasher = Sha256::new();
    hasher.update(request.hostname.as_bytes());
    hasher.update([0u8]);
    hasher.update(request.dom_signature.as_bytes());
    for pattern in &request.suspicious_patterns {
        hasher.update([0u8]);
        hasher.update(pattern.as_bytes());
    }
    hex::encode(&hasher.finalize()[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_deterministic() {
        let mut a = AnalysisRequest {
            hostname: "example.com".into(),
            dom_signature: "sig".into(),
            ..Default::default()
        };
        a.suspicious_patterns.insert("urgency:act_now".into());
        a.suspicious_patterns.insert("hidden_iframes".into());

        let mut b = AnalysisRequest {
            hostname: "example.com".into(),
            dom_signature: "sig".into(),
            ..Default::default()
        };
        // insertion order must not matter
        b.suspicious_patterns.insert("hidden_iframes".into());
        b.suspicious_patterns.insert("urgency:act_now".into());

        assert_eq!(request_fingerprint(&a), request_fingerprint(&b));
    }

    #[test]
    fn fingerprint_changes_with_hostname() {
        let a = AnalysisRequest {
            hostname: "example.com".into(),
            ..Default::default()
        };
        let b = AnalysisRequest {
            hostname: "example.org".into(),
            ..Default::default()
        };
        assert_ne!(request_fingerprint(&a), request_fingerprint(&b));
    }
}
