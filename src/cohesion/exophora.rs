use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::errors::{warn, KnpError};

static EXOPHORA_PAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<type>著者|読者|不特定:人|不特定:物|不特定:状況|前文|後文)(?P<index>[０-９\d]*)$")
        .expect("valid exophora pattern")
});

/// The closed vocabulary of exophoric referents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExophoraReferentType {
    Writer,
    Reader,
    UnspecifiedPerson,
    UnspecifiedMatter,
    UnspecifiedSituation,
    PreviousSentence,
    NextSentence,
    /// Anything outside the vocabulary, kept verbatim.
    Other(String),
}

impl ExophoraReferentType {
    pub fn as_str(&self) -> &str {
        match self {
            ExophoraReferentType::Writer => "著者",
            ExophoraReferentType::Reader => "読者",
            ExophoraReferentType::UnspecifiedPerson => "不特定:人",
            ExophoraReferentType::UnspecifiedMatter => "不特定:物",
            ExophoraReferentType::UnspecifiedSituation => "不特定:状況",
            ExophoraReferentType::PreviousSentence => "前文",
            ExophoraReferentType::NextSentence => "後文",
            ExophoraReferentType::Other(text) => text,
        }
    }

    fn from_known(text: &str) -> Option<Self> {
        Some(match text {
            "著者" => ExophoraReferentType::Writer,
            "読者" => ExophoraReferentType::Reader,
            "不特定:人" => ExophoraReferentType::UnspecifiedPerson,
            "不特定:物" => ExophoraReferentType::UnspecifiedMatter,
            "不特定:状況" => ExophoraReferentType::UnspecifiedSituation,
            "前文" => ExophoraReferentType::PreviousSentence,
            "後文" => ExophoraReferentType::NextSentence,
            _ => return None,
        })
    }
}

/// An exophoric referent such as `著者` or `不特定:人１`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExophoraReferent {
    pub referent_type: ExophoraReferentType,
    pub index: Option<u32>,
}

impl ExophoraReferent {
    /// Parse a referent; unknown text is reported and kept as [`ExophoraReferentType::Other`].
    pub fn new(text: &str) -> Self {
        let parsed = EXOPHORA_PAT.captures(text).and_then(|caps| {
            let referent_type = ExophoraReferentType::from_known(&caps["type"])?;
            let digits = &caps["index"];
            let index = if digits.is_empty() {
                None
            } else {
                Some(to_half_width_digits(digits).parse::<u32>().ok()?)
            };
            Some(ExophoraReferent {
                referent_type,
                index,
            })
        });
        match parsed {
            Some(referent) => referent,
            None => {
                warn(KnpError::UnknownLabel {
                    kind: "exophora referent",
                    label: text.to_string(),
                });
                ExophoraReferent {
                    referent_type: ExophoraReferentType::Other(text.to_string()),
                    index: None,
                }
            }
        }
    }

    /// Text form with a full-width index, e.g. `不特定:人１`.
    pub fn text(&self) -> String {
        match self.index {
            Some(index) => format!(
                "{}{}",
                self.referent_type.as_str(),
                to_full_width_digits(&index.to_string())
            ),
            None => self.referent_type.as_str().to_string(),
        }
    }

    /// Text form with a half-width index, e.g. `不特定:人1`.
    pub fn half_width_text(&self) -> String {
        match self.index {
            Some(index) => format!("{}{}", self.referent_type.as_str(), index),
            None => self.referent_type.as_str().to_string(),
        }
    }

    /// At most one entity per document may carry a singleton referent.
    pub fn is_singleton(&self) -> bool {
        matches!(
            self.referent_type,
            ExophoraReferentType::Writer | ExophoraReferentType::Reader
        ) || self.index.is_some()
    }
}

impl fmt::Display for ExophoraReferent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

pub(crate) fn to_full_width_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '0'..='9' => char::from_u32(c as u32 - '0' as u32 + '０' as u32).unwrap_or(c),
            _ => c,
        })
        .collect()
}

pub(crate) fn to_half_width_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_referents() {
        let writer = ExophoraReferent::new("著者");
        assert_eq!(writer.referent_type, ExophoraReferentType::Writer);
        assert!(writer.is_singleton());
        assert_eq!(writer.text(), "著者");

        let person = ExophoraReferent::new("不特定:人");
        assert!(!person.is_singleton());
    }

    #[test]
    fn test_indexed_referent() {
        let full = ExophoraReferent::new("不特定:人１");
        let half = ExophoraReferent::new("不特定:人1");
        assert_eq!(full, half);
        assert_eq!(full.index, Some(1));
        assert!(full.is_singleton());
        assert_eq!(full.text(), "不特定:人１");
        assert_eq!(full.half_width_text(), "不特定:人1");
    }

    #[test]
    fn test_other_referent() {
        let other = ExophoraReferent::new("ほげ");
        assert_eq!(
            other.referent_type,
            ExophoraReferentType::Other("ほげ".to_string())
        );
        assert!(!other.is_singleton());
        assert_eq!(other.text(), "ほげ");
    }
}
