//! Lookalike-domain detection against the watched-brand corpus.
//!
//! The registrable label is folded through the homoglyph table, then
//! compared to every brand by normalized Levenshtein similarity. A label
//! at or above the threshold that is not literally the brand is a hit.

use strsim::levenshtein;

use crate::core::corpus::Corpus;
use crate::core::types::FactorResult;

pub const FACTOR: &str = "typosquat";
pub const WEIGHT: f64 = 0.25;

const SIMILARITY_THRESHOLD: f64 = 0.75;

struct Hit<'a> {
    brand: &'a str,
    similarity: f64,
    distance: usize,
}

pub fn detect(hostname: &str, corpus: &Corpus) -> FactorResult {
    let host = hostname.trim().trim_end_matches('.').to_lowercase();
    let label = corpus.split_host(&host).label;
    if label.is_empty() {
        return clean();
    }

    // A brand's own canonical domains (and their subdomains) are safe.
    for entry in &corpus.brands {
        for canonical in &entry.domains {
            if host == *canonical || host.ends_with(&format!(".{canonical}")) {
                return clean();
            }
        }
    }

    let folded_label = corpus.fold(&label);
    let mut best: Option<Hit<'_>> = None;
    for entry in &corpus.brands {
        // Exact label match is the brand itself, not a squat.
        if label == entry.name {
            continue;
        }
        let folded_brand = corpus.fold(&entry.name);
        let distance = levenshtein(&folded_label, &folded_brand);
        let denom = folded_label.chars().count().max(folded_brand.chars().count());
        if denom == 0 {
            continue;
        }
        let similarity = 1.0 - distance as f64 / denom as f64;
        if similarity < SIMILARITY_THRESHOLD {
            continue;
        }
        let candidate = Hit {
            brand: &entry.name,
            similarity,
            distance,
        };
        best = Some(match best {
            None => candidate,
            Some(current) => pick(current, candidate),
        });
    }

    match best {
        Some(hit) => FactorResult::scored(
            FACTOR,
            WEIGHT,
            hit.similarity,
            vec![format!(
                "typosquat: mimics {} (similarity={}%)",
                hit.brand,
                (hit.similarity * 100.0).round() as u32
            )],
        ),
        None => clean(),
    }
}

fn clean() -> FactorResult {
    FactorResult::scored(
        FACTOR,
        WEIGHT,
        0.0,
        vec!["no typosquat pattern detected".to_string()],
    )
}

/// Highest similarity wins; ties break by shortest edit distance, then
/// lexicographic brand name, so repeated scans stay deterministic.
fn pick<'a>(current: Hit<'a>, candidate: Hit<'a>) -> Hit<'a> {
    if candidate.similarity > current.similarity {
        return candidate;
    }
    if candidate.similarity < current.similarity {
        return current;
    }
    if candidate.distance != current.distance {
        return if candidate.distance < current.distance {
            candidate
        } else {
            current
        };
    }
    if candidate.brand < current.brand {
        candidate
    } else {
        current
    }
}
