//! Runs fixtures through the checks and tallies the outcomes.

use crate::checks::{Check, CheckStatus};
use crate::config::HarnessConfig;
use crate::failures::{ExpectedFailures, HarnessResult};
use crate::fixture::KnpFixture;

/// One check on one fixture.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub check: Check,
    pub status: CheckStatus,
}

/// All checks on one fixture.
#[derive(Debug, Clone)]
pub struct FixtureReport {
    pub fixture: String,
    pub outcomes: Vec<CheckOutcome>,
}

impl FixtureReport {
    pub fn failures(&self) -> impl Iterator<Item = (Check, &str)> {
        self.outcomes.iter().filter_map(|outcome| match &outcome.status {
            CheckStatus::Failed(message) => Some((outcome.check, message.as_str())),
            _ => None,
        })
    }

    pub fn passed(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Run the configured checks on a fixture.
pub fn run_fixture(fixture: &KnpFixture, config: &HarnessConfig) -> FixtureReport {
    FixtureReport {
        fixture: fixture.name.clone(),
        outcomes: config
            .checks
            .iter()
            .map(|&check| CheckOutcome {
                check,
                status: check.run(fixture),
            })
            .collect(),
    }
}

/// Run every fixture and classify failures against the expected ones.
///
/// Fixtures are keyed by the relative path they were loaded under.
pub fn run_harness(
    fixtures: &[(String, KnpFixture)],
    config: &HarnessConfig,
    expected: &ExpectedFailures,
) -> HarnessResult {
    let mut result = HarnessResult::new();
    for (path, fixture) in fixtures {
        for outcome in run_fixture(fixture, config).outcomes {
            match outcome.status {
                CheckStatus::Passed => result.record_pass(),
                CheckStatus::Skipped => result.record_skip(),
                CheckStatus::Failed(message) => {
                    let state = expected.is_expected(path, outcome.check.name());
                    result.record_failure(
                        state,
                        format!("{} {}: {}", path, outcome.check, message),
                    );
                }
            }
        }
    }
    result
}

/// Summary lines for a harness run.
pub fn format_summary(result: &HarnessResult) -> String {
    let mut out = format!(
        "{} checks: {} passed, {} expected failures, {} regressions, {} skipped\n",
        result.total, result.passed, result.expected_failures, result.regressions, result.skipped
    );
    for message in &result.messages {
        out.push_str("  regression: ");
        out.push_str(message);
        out.push('\n');
    }
    out
}
