//! Analyzer configuration.
//!
//! ```toml
//! [knp]
//! executable = "/opt/knp/bin/knp"
//! timeout_secs = 60
//!
//! [kwja]
//! options = ["--model-size", "base"]
//! ```
//!
//! Keys left out of a table keep their standard values.

use std::path::Path;
use std::process::Command;

use serde::Deserialize;

use crate::errors::{ProcessorError, ProcessorResult};

/// How to launch one analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    pub executable: String,
    pub options: Vec<String>,
    /// Deadline for a single request.
    pub timeout_secs: u64,
}

impl AnalyzerConfig {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            options: Vec::new(),
            timeout_secs: 30,
        }
    }

    /// `jumanpp` with no options.
    pub fn jumanpp() -> Self {
        Self::new("jumanpp")
    }

    /// `knp -tab`.
    pub fn knp() -> Self {
        Self::new("knp").with_options(vec!["-tab".into()])
    }

    /// `kwja`. Model loading is slow, so the deadline is longer.
    pub fn kwja() -> Self {
        Self::new("kwja").with_timeout_secs(300)
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub(crate) fn command(&self) -> Command {
        let mut command = Command::new(&self.executable);
        command.args(&self.options);
        command
    }

    fn apply(&mut self, overrides: AnalyzerOverrides) {
        if let Some(executable) = overrides.executable {
            self.executable = executable;
        }
        if let Some(options) = overrides.options {
            self.options = options;
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
    }
}

/// Settings for every analyzer this crate drives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorsConfig {
    pub jumanpp: AnalyzerConfig,
    pub knp: AnalyzerConfig,
    pub kwja: AnalyzerConfig,
}

impl ProcessorsConfig {
    /// Executables looked up on `PATH` with their usual options.
    pub fn standard() -> Self {
        Self {
            jumanpp: AnalyzerConfig::jumanpp(),
            knp: AnalyzerConfig::knp(),
            kwja: AnalyzerConfig::kwja(),
        }
    }

    /// Read a TOML file. A missing file yields the standard configuration.
    pub fn load(path: impl AsRef<Path>) -> ProcessorResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("{} not found, using standard analyzers", path.display());
            return Ok(Self::standard());
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, &path.display().to_string())
    }

    pub fn from_toml_str(text: &str) -> ProcessorResult<Self> {
        Self::parse(text, "<string>")
    }

    fn parse(text: &str, path: &str) -> ProcessorResult<Self> {
        let file: ConfigFile = toml::from_str(text).map_err(|err| ProcessorError::Config {
            path: path.to_string(),
            message: err.to_string(),
        })?;
        let mut config = Self::standard();
        if let Some(overrides) = file.jumanpp {
            config.jumanpp.apply(overrides);
        }
        if let Some(overrides) = file.knp {
            config.knp.apply(overrides);
        }
        if let Some(overrides) = file.kwja {
            config.kwja.apply(overrides);
        }
        Ok(config)
    }
}

impl Default for ProcessorsConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    jumanpp: Option<AnalyzerOverrides>,
    knp: Option<AnalyzerOverrides>,
    kwja: Option<AnalyzerOverrides>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AnalyzerOverrides {
    executable: Option<String>,
    options: Option<Vec<String>>,
    timeout_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_standard() {
        let config = ProcessorsConfig::default();
        assert_eq!(config.knp.executable, "knp");
        assert_eq!(config.knp.options, vec!["-tab"]);
        assert_eq!(config.jumanpp.timeout_secs, 30);
        assert_eq!(config.kwja.timeout_secs, 300);
    }

    #[test]
    fn test_partial_tables_keep_defaults() {
        let config = ProcessorsConfig::from_toml_str(
            r#"
            [knp]
            executable = "/opt/knp/bin/knp"

            [kwja]
            options = ["--model-size", "base"]
            timeout_secs = 600
            "#,
        )
        .unwrap();
        assert_eq!(config.knp.executable, "/opt/knp/bin/knp");
        assert_eq!(config.knp.options, vec!["-tab"]);
        assert_eq!(config.kwja.options, vec!["--model-size", "base"]);
        assert_eq!(config.kwja.timeout_secs, 600);
        assert_eq!(config.jumanpp, AnalyzerConfig::jumanpp());
    }

    #[test]
    fn test_unknown_key() {
        let err = ProcessorsConfig::from_toml_str("[knp]\npath = \"knp\"\n").unwrap_err();
        assert!(matches!(err, ProcessorError::Config { .. }));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[jumanpp]\ntimeout_secs = 5").unwrap();
        let config = ProcessorsConfig::load(file.path()).unwrap();
        assert_eq!(config.jumanpp.timeout_secs, 5);

        let dir = tempfile::tempdir().unwrap();
        let missing = ProcessorsConfig::load(dir.path().join("analyzers.toml")).unwrap();
        assert_eq!(missing, ProcessorsConfig::standard());
    }
}
