//! Harness configuration.

use crate::checks::Check;

/// Which checks a harness run performs.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub checks: Vec<Check>,
}

impl HarnessConfig {
    /// Every check.
    pub fn standard() -> Self {
        Self {
            checks: Check::ALL.to_vec(),
        }
    }

    /// Create with specific checks.
    pub fn with_checks(checks: Vec<Check>) -> Self {
        Self { checks }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::standard()
    }
}
