//! Watched-brand corpus, homoglyph fold tables and related static data.
//!
//! Loaded once into immutable state at startup; the per-request detectors
//! only ever read it. Every table can be overridden from the config file;
//! the built-ins below are the shipped defaults.

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::config::AppConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct BrandEntry {
    pub name: String,
    pub domains: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HomoglyphPair {
    pub from: String,
    pub to: String,
}

/// Registrable-domain split of a hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostParts {
    pub subdomain: String,
    pub label: String,
    pub suffix: String,
}

#[derive(Debug, Clone)]
pub struct Corpus {
    pub brands: Vec<BrandEntry>,
    pub homoglyph_sequences: Vec<(String, String)>,
    pub homoglyph_chars: Vec<(char, char)>,
    pub trusted_issuers: Vec<String>,
    pub high_risk_tlds: Vec<String>,
    pub bait_subdomain_keywords: Vec<String>,
    pub compound_suffixes: Vec<String>,
}

static BUILTIN: Lazy<Corpus> = Lazy::new(|| Corpus {
    brands: default_brands(),
    homoglyph_sequences: default_homoglyph_sequences(),
    homoglyph_chars: default_homoglyph_chars(),
    trusted_issuers: default_trusted_issuers(),
    high_risk_tlds: default_high_risk_tlds(),
    bait_subdomain_keywords: default_bait_keywords(),
    compound_suffixes: default_compound_suffixes(),
});

impl Corpus {
    pub fn builtin() -> &'static Corpus {
        &BUILTIN
    }

    /// Built-ins with any non-empty config table swapped in.
    pub fn from_config(cfg: &AppConfig) -> Corpus {
        let mut corpus = Corpus::builtin().clone();
        if !cfg.brands.is_empty() {
            corpus.brands = cfg.brands.clone();
        }
        if !cfg.trusted_issuers.is_empty() {
            corpus.trusted_issuers = cfg.trusted_issuers.clone();
        }
        if !cfg.high_risk_tlds.is_empty() {
            corpus.high_risk_tlds = cfg.high_risk_tlds.clone();
        }
        if !cfg.homoglyphs.is_empty() {
            corpus.homoglyph_sequences = cfg
                .homoglyphs
                .iter()
                .map(|p| (p.from.to_lowercase(), p.to.to_lowercase()))
                .collect();
        }
        corpus
    }

    /// Fold visually-confusable sequences and code points to their Latin
    /// lookalikes so edit distance sees "go0gle" and "arnazon" as
    /// "google" and "amazon". Multi-char sequences first.
    pub fn fold(&self, input: &str) -> String {
        let mut folded = input.to_lowercase();
        for (seq, replacement) in &self.homoglyph_sequences {
            folded = folded.replace(seq.as_str(), replacement);
        }
        folded
            .chars()
            .map(|c| {
                self.homoglyph_chars
                    .iter()
                    .find(|(from, _)| *from == c)
                    .map(|(_, to)| *to)
                    .unwrap_or(c)
            })
            .collect()
    }

    /// Split a hostname into subdomain labels, registrable label and
    /// public suffix, with a small compound-suffix table for the common
    /// two-part registries.
    pub fn split_host(&self, hostname: &str) -> HostParts {
        let host = hostname.trim().trim_end_matches('.').to_lowercase();
        let parts: Vec<&str> = host.split('.').filter(|p| !p.is_empty()).collect();
        match parts.len() {
            0 => HostParts {
                subdomain: String::new(),
                label: String::new(),
                suffix: String::new(),
            },
            1 => HostParts {
                subdomain: String::new(),
                label: parts[0].to_string(),
                suffix: String::new(),
            },
            n => {
                let last_two = format!("{}.{}", parts[n - 2], parts[n - 1]);
                if n >= 3 && self.compound_suffixes.iter().any(|s| *s == last_two) {
                    HostParts {
                        subdomain: parts[..n - 3].join("."),
                        label: parts[n - 3].to_string(),
                        suffix: last_two,
                    }
                } else {
                    HostParts {
                        subdomain: parts[..n - 2].join("."),
                        label: parts[n - 2].to_string(),
                        suffix: parts[n - 1].to_string(),
                    }
                }
            }
        }
    }

    /// The label plus public suffix, e.g. "paypa1.com" from
    /// "secure.paypa1.com". Used for WHOIS/RDAP lookups.
    pub fn registrable_domain(&self, hostname: &str) -> String {
        let parts = self.split_host(hostname);
        if parts.suffix.is_empty() {
            parts.label
        } else {
            format!("{}.{}", parts.label, parts.suffix)
        }
    }
}

fn brand(name: &str, domains: &[&str]) -> BrandEntry {
    BrandEntry {
        name: name.to_string(),
        domains: domains.iter().map(|d| d.to_string()).collect(),
    }
}

fn default_brands() -> Vec<BrandEntry> {
    vec![
        brand("google", &["google.com", "gmail.com", "youtube.com"]),
        brand(
            "microsoft",
            &["microsoft.com", "outlook.com", "live.com", "office.com"],
        ),
        brand("apple", &["apple.com", "icloud.com"]),
        brand("amazon", &["amazon.com", "aws.amazon.com"]),
        brand("facebook", &["facebook.com", "fb.com", "meta.com"]),
        brand("instagram", &["instagram.com"]),
        brand("twitter", &["twitter.com", "x.com"]),
        brand("linkedin", &["linkedin.com"]),
        brand("netflix", &["netflix.com"]),
        brand("spotify", &["spotify.com"]),
        brand("discord", &["discord.com", "discord.gg"]),
        brand("github", &["github.com"]),
        brand("dropbox", &["dropbox.com"]),
        brand("paypal", &["paypal.com"]),
        brand("chase", &["chase.com"]),
        brand("bankofamerica", &["bankofamerica.com", "bofa.com"]),
        brand("wellsfargo", &["wellsfargo.com"]),
        brand("citibank", &["citi.com", "citibank.com"]),
        brand("venmo", &["venmo.com"]),
        brand("stripe", &["stripe.com"]),
        brand("coinbase", &["coinbase.com"]),
        brand("binance", &["binance.com"]),
        brand("fedex", &["fedex.com"]),
        brand("ups", &["ups.com"]),
        brand("usps", &["usps.com"]),
        brand("dhl", &["dhl.com"]),
        brand("walmart", &["walmart.com"]),
        brand("ebay", &["ebay.com"]),
        brand("adobe", &["adobe.com"]),
        brand("zoom", &["zoom.us"]),
    ]
}

fn default_homoglyph_sequences() -> Vec<(String, String)> {
    [("rn", "m"), ("vv", "w"), ("cl", "d"), ("nn", "m")]
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

fn default_homoglyph_chars() -> Vec<(char, char)> {
    vec![
        // digit and symbol substitutions
        ('0', 'o'),
        ('1', 'l'),
        ('3', 'e'),
        ('4', 'a'),
        ('5', 's'),
        ('7', 't'),
        ('8', 'b'),
        ('9', 'g'),
        ('@', 'a'),
        ('$', 's'),
        ('!', 'i'),
        ('|', 'l'),
        // Cyrillic lookalikes
        ('а', 'a'),
        ('е', 'e'),
        ('о', 'o'),
        ('р', 'p'),
        ('с', 'c'),
        ('х', 'x'),
        ('у', 'y'),
        ('і', 'i'),
        ('ѕ', 's'),
        // Greek lookalikes
        ('ο', 'o'),
        ('α', 'a'),
        ('ν', 'v'),
    ]
}

fn default_trusted_issuers() -> Vec<String> {
    [
        "let's encrypt",
        "digicert",
        "comodo",
        "godaddy",
        "globalsign",
        "sectigo",
        "entrust",
        "geotrust",
        "thawte",
        "verisign",
        "google",
        "amazon",
        "cloudflare",
        "microsoft",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_high_risk_tlds() -> Vec<String> {
    [
        "tk", "ml", "ga", "cf", "gq", "xyz", "top", "work", "click", "link", "buzz", "online",
        "site", "website", "space", "fun",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_bait_keywords() -> Vec<String> {
    [
        "secure", "login", "signin", "account", "verify", "update", "confirm", "banking",
        "support", "help", "paypal", "amazon", "google", "microsoft", "apple", "netflix",
        "facebook", "instagram",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_compound_suffixes() -> Vec<String> {
    ["co.uk", "com.au", "co.nz", "co.jp", "com.br", "co.in"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_collapses_homoglyphs() {
        let corpus = Corpus::builtin();
        assert_eq!(corpus.fold("g0ogle"), "google");
        assert_eq!(corpus.fold("paypa1"), "paypal");
        assert_eq!(corpus.fold("arnazon"), "amazon");
        assert_eq!(corpus.fold("vvells"), "wells");
    }

    #[test]
    fn split_host_handles_compound_suffixes() {
        let corpus = Corpus::builtin();
        let parts = corpus.split_host("mail.example.co.uk");
        assert_eq!(parts.subdomain, "mail");
        assert_eq!(parts.label, "example");
        assert_eq!(parts.suffix, "co.uk");
    }

    #[test]
    fn split_host_plain_domain() {
        let corpus = Corpus::builtin();
        let parts = corpus.split_host("go0gle.com");
        assert_eq!(parts.subdomain, "");
        assert_eq!(parts.label, "go0gle");
        assert_eq!(parts.suffix, "com");
        assert_eq!(corpus.registrable_domain("secure.go0gle.com"), "go0gle.com");
    }
}
