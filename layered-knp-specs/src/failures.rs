//! Expected failures tracking via TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::{SpecError, SpecResult};

/// Loaded expected failures configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpectedFailures {
    /// Known failures (won't fix soon).
    #[serde(default)]
    pub known: Vec<FailureEntry>,
    /// Pending failures (awaiting fix).
    #[serde(default)]
    pub pending: Vec<FailureEntry>,
}

/// A single expected failure entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureEntry {
    /// Fixture path relative to the fixtures directory.
    pub fixture: String,
    /// Check name, e.g. `round-trip`.
    pub check: String,
    #[serde(default)]
    pub reason: Option<String>,
    /// Date added (YYYY-MM-DD).
    #[serde(default)]
    pub added: Option<String>,
    #[serde(default)]
    pub issue: Option<String>,
}

/// Failure lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureState {
    /// Known limitation, won't fix soon.
    Known,
    /// Awaiting fix, not blocking.
    Pending,
    /// Expected to pass - failure is a regression.
    Regression,
}

impl ExpectedFailures {
    /// Load from a TOML file. A missing file expects nothing to fail.
    pub fn load(path: &Path) -> SpecResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let load_error = |message: String| SpecError::Load {
            path: path.display().to_string(),
            message,
        };
        let content = fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
        toml::from_str(&content).map_err(|e| load_error(e.to_string()))
    }

    pub fn is_expected(&self, fixture: &str, check: &str) -> FailureState {
        if self.known.iter().any(|e| e.matches(fixture, check)) {
            return FailureState::Known;
        }
        if self.pending.iter().any(|e| e.matches(fixture, check)) {
            return FailureState::Pending;
        }
        FailureState::Regression
    }

    /// Fixtures with at least one expected failure, sorted.
    pub fn all_fixtures(&self) -> Vec<&str> {
        let mut fixtures: Vec<_> = self
            .known
            .iter()
            .chain(self.pending.iter())
            .map(|e| e.fixture.as_str())
            .collect();
        fixtures.sort();
        fixtures.dedup();
        fixtures
    }

    pub fn count(&self) -> usize {
        self.known.len() + self.pending.len()
    }

    pub fn get_entry(&self, fixture: &str, check: &str) -> Option<&FailureEntry> {
        self.known
            .iter()
            .chain(self.pending.iter())
            .find(|e| e.matches(fixture, check))
    }
}

impl FailureEntry {
    fn matches(&self, fixture: &str, check: &str) -> bool {
        self.fixture == fixture && self.check == check
    }
}

/// Result of running the harness.
#[derive(Debug, Clone, Default)]
pub struct HarnessResult {
    /// Checks run, skipped ones excluded.
    pub total: usize,
    pub passed: usize,
    pub skipped: usize,
    /// Expected failures (known + pending).
    pub expected_failures: usize,
    /// Unexpected failures.
    pub regressions: usize,
    /// One line per regression.
    pub messages: Vec<String>,
}

impl HarnessResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the exit code (0 = pass, 1 = regressions).
    pub fn exit_code(&self) -> i32 {
        if self.regressions > 0 {
            1
        } else {
            0
        }
    }

    pub fn success(&self) -> bool {
        self.regressions == 0
    }

    pub fn record_pass(&mut self) {
        self.total += 1;
        self.passed += 1;
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Record a failed check with its state.
    pub fn record_failure(&mut self, state: FailureState, message: impl Into<String>) {
        self.total += 1;
        match state {
            FailureState::Known | FailureState::Pending => {
                self.expected_failures += 1;
            }
            FailureState::Regression => {
                self.regressions += 1;
                self.messages.push(message.into());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn entry(fixture: &str, check: &str) -> FailureEntry {
        FailureEntry {
            fixture: fixture.to_string(),
            check: check.to_string(),
            reason: None,
            added: None,
            issue: None,
        }
    }

    #[test]
    fn test_is_expected() {
        let failures = ExpectedFailures {
            known: vec![entry("a.knp", "round-trip")],
            pending: vec![entry("b.knp", "span-partition")],
        };
        assert_eq!(failures.is_expected("a.knp", "round-trip"), FailureState::Known);
        assert_eq!(
            failures.is_expected("b.knp", "span-partition"),
            FailureState::Pending
        );
        assert_eq!(
            failures.is_expected("a.knp", "span-partition"),
            FailureState::Regression
        );
    }

    #[test]
    fn test_harness_result_record() {
        let mut result = HarnessResult::new();
        assert_eq!(result.exit_code(), 0);

        result.record_pass();
        result.record_skip();
        result.record_failure(FailureState::Known, "a.knp round-trip");
        assert_eq!(result.total, 2);
        assert_eq!(result.expected_failures, 1);
        assert!(result.messages.is_empty());
        assert!(result.success());

        result.record_failure(FailureState::Regression, "b.knp round-trip");
        assert_eq!(result.total, 3);
        assert_eq!(result.regressions, 1);
        assert_eq!(result.messages, vec!["b.knp round-trip"]);
        assert_eq!(result.exit_code(), 1);
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[pending]]
fixture = "cohesion/merge_entity_0.knp"
check = "mention-symmetry"
reason = "Awaiting implementation"
added = "2025-01-06"

[[known]]
fixture = "basic/tenki.knp"
check = "round-trip"
reason = "Known limitation"
"#
        )
        .unwrap();

        let failures = ExpectedFailures::load(file.path()).unwrap();
        assert_eq!(failures.count(), 2);
        assert_eq!(
            failures.all_fixtures(),
            vec!["basic/tenki.knp", "cohesion/merge_entity_0.knp"]
        );
        let entry = failures.get_entry("basic/tenki.knp", "round-trip").unwrap();
        assert_eq!(entry.reason.as_deref(), Some("Known limitation"));
        assert!(failures.get_entry("basic/tenki.knp", "global-index").is_none());
    }

    #[test]
    fn test_load_nonexistent_returns_empty() {
        let failures = ExpectedFailures::load(Path::new("/nonexistent/path.toml")).unwrap();
        assert_eq!(failures.count(), 0);
    }

    #[test]
    fn test_load_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[[known]]\nfixture = 1").unwrap();
        assert!(matches!(
            ExpectedFailures::load(file.path()),
            Err(SpecError::Load { .. })
        ));
    }
}
