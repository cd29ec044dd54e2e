#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Fixture-corpus testing infrastructure for layered-knp.
//!
//! Fixtures are real analyzer outputs stored as `.knp` and `.jumanpp`
//! files. Every fixture is parsed into a document and run through a fixed
//! set of structural checks: it must serialize back to the same text, and
//! the numbering, coreference and dependency invariants of the document
//! model must hold.
//!
//! Checks that are known to fail for a fixture are listed in
//! `expected-failures.toml`, so a harness run only fails on regressions.
//!
//! ## Modules
//!
//! - [`fixture`] - Fixture formats and parsing
//! - [`loader`] - Fixture file loading
//! - [`checks`] - The structural checks run on each fixture
//! - [`runner`] - Runs fixtures and tallies outcomes
//! - [`config`] - Which checks a run performs
//! - [`failures`] - Expected failures tracking via TOML
//! - [`errors`] - Error types for the harness

pub mod checks;
pub mod config;
pub mod errors;
pub mod failures;
pub mod fixture;
pub mod loader;
pub mod runner;

pub use checks::Check;
pub use config::HarnessConfig;
pub use errors::{SpecError, SpecResult};
pub use failures::{ExpectedFailures, FailureEntry, FailureState, HarnessResult};
pub use fixture::{FixtureFormat, KnpFixture};
pub use loader::{load_all_fixtures, load_fixture};
pub use runner::{format_summary, run_fixture, run_harness, CheckOutcome, FixtureReport};

#[cfg(test)]
mod tests;
