//! Fixture formats and parsing.

use layered_knp::Document;

use crate::errors::{SpecError, SpecResult};

/// The analyzer output a fixture holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureFormat {
    Knp,
    Jumanpp,
}

impl FixtureFormat {
    /// Format for a file extension, `knp` or `jumanpp`.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "knp" => Some(FixtureFormat::Knp),
            "jumanpp" => Some(FixtureFormat::Jumanpp),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            FixtureFormat::Knp => "knp",
            FixtureFormat::Jumanpp => "jumanpp",
        }
    }
}

/// A parsed fixture, keeping its source text for the round-trip check.
#[derive(Debug)]
pub struct KnpFixture {
    pub name: String,
    pub format: FixtureFormat,
    pub text: String,
    pub document: Document,
}

impl KnpFixture {
    pub fn parse(name: impl Into<String>, format: FixtureFormat, text: &str) -> SpecResult<Self> {
        let name = name.into();
        let parsed = match format {
            FixtureFormat::Knp => Document::from_knp(text),
            FixtureFormat::Jumanpp => Document::from_jumanpp(text),
        };
        let document = parsed.map_err(|e| SpecError::Parse {
            fixture: name.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            name,
            format,
            text: text.to_string(),
            document,
        })
    }

    /// Serialize the document back into the fixture's format.
    pub fn serialize(&self) -> SpecResult<String> {
        let emitted = match self.format {
            FixtureFormat::Knp => self.document.to_knp(),
            FixtureFormat::Jumanpp => self.document.to_jumanpp(),
        };
        emitted.map_err(|e| SpecError::Assertion {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(FixtureFormat::from_extension("knp"), Some(FixtureFormat::Knp));
        assert_eq!(
            FixtureFormat::from_extension("jumanpp"),
            Some(FixtureFormat::Jumanpp)
        );
        assert_eq!(FixtureFormat::from_extension("nlp"), None);
    }

    #[test]
    fn test_parse_error_names_fixture() {
        let err = KnpFixture::parse("broken.knp", FixtureFormat::Knp, "* 1D\n+ XD\nEOS\n")
            .unwrap_err();
        assert!(matches!(err, SpecError::Parse { ref fixture, .. } if fixture == "broken.knp"));
    }
}
