use crate::checks::CheckStatus;
use crate::{
    format_summary, load_all_fixtures, run_fixture, run_harness, Check, ExpectedFailures,
    FailureEntry, FixtureFormat, HarnessConfig, KnpFixture,
};
use std::path::{Path, PathBuf};

fn manifest_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn corpus() -> Vec<(String, KnpFixture)> {
    load_all_fixtures(&manifest_dir().join("fixtures")).unwrap()
}

#[test]
fn test_fixture_corpus_has_no_regressions() {
    let expected = ExpectedFailures::load(&manifest_dir().join("expected-failures.toml")).unwrap();
    let result = run_harness(&corpus(), &HarnessConfig::standard(), &expected);
    assert!(result.success(), "{}", format_summary(&result));
    assert!(result.passed > 0);
}

#[test]
fn test_every_knp_fixture_passes_every_check() {
    for (path, fixture) in corpus() {
        if fixture.format != FixtureFormat::Knp {
            continue;
        }
        let report = run_fixture(&fixture, &HarnessConfig::standard());
        let failures: Vec<_> = report.failures().collect();
        assert!(failures.is_empty(), "{}: {:?}", path, failures);
        assert!(report
            .outcomes
            .iter()
            .all(|outcome| outcome.status == CheckStatus::Passed));
    }
}

#[test]
fn test_selected_checks_only() {
    let fixtures = corpus();
    let config = HarnessConfig::with_checks(vec![Check::RoundTrip]);
    let (_, fixture) = &fixtures[0];
    let report = run_fixture(fixture, &config);
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].check, Check::RoundTrip);
}

#[test]
fn test_expected_failure_is_not_a_regression() {
    let broken = KnpFixture::parse(
        "broken.knp",
        FixtureFormat::Knp,
        "* -1D\n+ -1D\n天気 てんき 天気 名詞 6 普通名詞 1 * 0 * 0\nEOS",
    )
    .unwrap();
    let fixtures = vec![("inline/broken.knp".to_string(), broken)];
    let config = HarnessConfig::standard();

    let result = run_harness(&fixtures, &config, &ExpectedFailures::default());
    assert_eq!(result.regressions, 1);
    insta::assert_snapshot!(format_summary(&result), @r###"
    6 checks: 5 passed, 0 expected failures, 1 regressions, 0 skipped
      regression: inline/broken.knp round-trip: emitted 72 bytes, fixture has 71
    "###);

    let expected = ExpectedFailures {
        known: vec![],
        pending: vec![FailureEntry {
            fixture: "inline/broken.knp".to_string(),
            check: "round-trip".to_string(),
            reason: Some("no final newline".to_string()),
            added: None,
            issue: None,
        }],
    };
    let result = run_harness(&fixtures, &config, &expected);
    assert!(result.success());
    assert_eq!(result.expected_failures, 1);
}

#[test]
fn test_jumanpp_fixture_skips_cohesion_checks() {
    let fixtures = corpus();
    let (_, fixture) = fixtures
        .iter()
        .find(|(path, _)| Path::new(path).extension().map_or(false, |e| e == "jumanpp"))
        .unwrap();
    let report = run_fixture(fixture, &HarnessConfig::standard());
    assert!(report.passed());
    let skipped: Vec<Check> = report
        .outcomes
        .iter()
        .filter(|outcome| outcome.status == CheckStatus::Skipped)
        .map(|outcome| outcome.check)
        .collect();
    assert_eq!(
        skipped,
        vec![
            Check::MentionSymmetry,
            Check::SingletonUniqueness,
            Check::DependencyAcyclic
        ]
    );
}
