#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Analyzer drivers for layered-knp.
//!
//! Each analyzer runs as one long-lived child process. Requests to the same
//! process are serialized, bounded by a timeout, and a child that hangs or
//! dies is restarted before the error is returned.
//!
//! ## Modules
//!
//! - [`process`] - Supervised analyzer subprocess
//! - [`jumanpp`] - Juman++ morphological analysis
//! - [`knp`] - KNP dependency and case analysis
//! - [`kwja`] - KWJA document analysis
//! - [`senter`] - Regex sentence splitter
//! - [`processor`] - The trait shared by all of the above
//! - [`config`] - Analyzer settings, loadable from TOML
//! - [`errors`] - Error types

pub mod config;
pub mod errors;
pub mod jumanpp;
pub mod knp;
pub mod kwja;
pub mod process;
pub mod processor;
pub mod senter;

pub use config::{AnalyzerConfig, ProcessorsConfig};
pub use errors::{ProcessorError, ProcessorResult};
pub use jumanpp::Jumanpp;
pub use knp::Knp;
pub use kwja::Kwja;
pub use process::{AnalyzerProcess, Terminator};
pub use processor::Processor;
pub use senter::RegexSenter;

#[cfg(test)]
mod testing;
