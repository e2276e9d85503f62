//! Contract properties of the scoring pipeline, exercised through the
//! public API without any network involvement.

use chrono::{Duration, Utc};

use phish_sentry::core::corpus::Corpus;
use phish_sentry::core::types::{FactorResult, Verdict, WhoisRecord};
use phish_sentry::detectors::{ct, domain_age, page, ssl, typosquat};
use phish_sentry::pipeline::aggregator;

#[test]
fn verdict_is_always_in_domain() {
    for score_raws in [0.0, 0.3, 0.7, 1.0] {
        let factors = vec![
            FactorResult::scored(typosquat::FACTOR, typosquat::WEIGHT, score_raws, vec![]),
            FactorResult::scored(domain_age::FACTOR, domain_age::WEIGHT, score_raws, vec![]),
        ];
        let result = aggregator::aggregate(factors, None, Utc::now());
        assert!(matches!(
            result.verdict,
            Verdict::Safe | Verdict::Suspicious | Verdict::Phish
        ));
    }
}

#[test]
fn suspicious_and_phish_bounds_are_inclusive() {
    // exactly 0.25: typosquat at full similarity
    let factors = vec![FactorResult::scored(
        typosquat::FACTOR,
        typosquat::WEIGHT,
        1.0,
        vec![],
    )];
    let result = aggregator::aggregate(factors, None, Utc::now());
    assert_eq!(result.verdict, Verdict::Suspicious);

    // exactly 0.55: typosquat + age + forms at full score
    let factors = vec![
        FactorResult::scored(typosquat::FACTOR, typosquat::WEIGHT, 1.0, vec![]),
        FactorResult::scored(domain_age::FACTOR, domain_age::WEIGHT, 1.0, vec![]),
        FactorResult::scored(page::FORMS_FACTOR, page::FORMS_WEIGHT, 1.0, vec![]),
    ];
    let result = aggregator::aggregate(factors, None, Utc::now());
    assert_eq!(result.verdict, Verdict::Phish);
}

#[test]
fn raising_one_factor_never_lowers_the_score() {
    let now = Utc::now();
    let base: Vec<FactorResult> = vec![
        FactorResult::scored(typosquat::FACTOR, typosquat::WEIGHT, 0.4, vec![]),
        FactorResult::scored(ssl::FACTOR, ssl::WEIGHT, 0.4, vec![]),
        FactorResult::scored(ct::FACTOR, ct::WEIGHT, 0.4, vec![]),
    ];
    let baseline = aggregator::aggregate(base.clone(), None, now).score;
    for bump in 0..base.len() {
        let mut factors = base.clone();
        let name = factors[bump].name.clone();
        let weight = factors[bump].weight;
        factors[bump] = FactorResult::scored(name, weight, 1.0, vec![]);
        let bumped = aggregator::aggregate(factors, None, now).score;
        assert!(bumped >= baseline);
    }
}

#[test]
fn reference_inputs_score_as_documented() {
    let now = Utc::now();
    let corpus = Corpus::builtin();

    // typosquat reference pair
    assert!(typosquat::detect("go0gle.com", corpus).raw_score() >= 0.75);
    assert_eq!(typosquat::detect("google.com", corpus).raw_score(), 0.0);

    // domain-age reference points
    let three_days = WhoisRecord {
        registered_at: Some(now - Duration::days(3)),
    };
    assert_eq!(domain_age::classify(&three_days, now).raw_score(), 1.00);
    let four_hundred_days = WhoisRecord {
        registered_at: Some(now - Duration::days(400)),
    };
    assert_eq!(domain_age::classify(&four_hundred_days, now).raw_score(), 0.00);
    assert_eq!(
        domain_age::classify(&WhoisRecord::default(), now).raw_score(),
        0.30
    );

    // empty CT history fires the missing-certificates flag
    assert!(ct::analyze(&[], ct::DEFAULT_WINDOW_DAYS, now).raw_score() >= 0.40);
}

#[test]
fn degraded_ssl_is_the_only_contribution() {
    let now = Utc::now();
    let corpus = Corpus::builtin();
    let factors = vec![
        FactorResult::scored(typosquat::FACTOR, typosquat::WEIGHT, 0.0, vec![]),
        FactorResult::scored(domain_age::FACTOR, domain_age::WEIGHT, 0.0, vec![]),
        // connection failed entirely: worst-case trust
        ssl::evaluate(None, corpus, now),
        FactorResult::scored(ct::FACTOR, ct::WEIGHT, 0.0, vec![]),
        FactorResult::scored(page::FORMS_FACTOR, page::FORMS_WEIGHT, 0.0, vec![]),
        FactorResult::scored(page::DOM_FACTOR, page::DOM_WEIGHT, 0.0, vec![]),
    ];
    let result = aggregator::aggregate(factors, None, Utc::now());
    assert!((result.score - ssl::WEIGHT).abs() < 1e-12);
}
