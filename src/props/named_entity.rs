use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::errors::{warn, KnpError};

static NE_PAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<NE:(?P<cat>\w+):(?P<name>[^>]+)>").expect("valid named entity pattern")
});

/// Named entity categories of the IREX scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedEntityCategory {
    Organization,
    Person,
    Location,
    Artifact,
    Date,
    Time,
    Money,
    Percent,
    Optional,
}

impl NamedEntityCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            NamedEntityCategory::Organization => "ORGANIZATION",
            NamedEntityCategory::Person => "PERSON",
            NamedEntityCategory::Location => "LOCATION",
            NamedEntityCategory::Artifact => "ARTIFACT",
            NamedEntityCategory::Date => "DATE",
            NamedEntityCategory::Time => "TIME",
            NamedEntityCategory::Money => "MONEY",
            NamedEntityCategory::Percent => "PERCENT",
            NamedEntityCategory::Optional => "OPTIONAL",
        }
    }
}

impl FromStr for NamedEntityCategory {
    type Err = KnpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "ORGANIZATION" => NamedEntityCategory::Organization,
            "PERSON" => NamedEntityCategory::Person,
            "LOCATION" => NamedEntityCategory::Location,
            "ARTIFACT" => NamedEntityCategory::Artifact,
            "DATE" => NamedEntityCategory::Date,
            "TIME" => NamedEntityCategory::Time,
            "MONEY" => NamedEntityCategory::Money,
            "PERCENT" => NamedEntityCategory::Percent,
            "OPTIONAL" => NamedEntityCategory::Optional,
            _ => {
                return Err(KnpError::UnknownLabel {
                    kind: "named entity category",
                    label: s.to_string(),
                })
            }
        })
    }
}

impl fmt::Display for NamedEntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `<NE:CATEGORY:name>` tag. It sits on the last base phrase of the span.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NETag {
    pub category: NamedEntityCategory,
    pub name: String,
}

impl NETag {
    pub fn to_fstring(&self) -> String {
        format!("<NE:{}:{}>", self.category, self.name)
    }
}

/// Every named entity tag of an fstring, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NETagList(pub Vec<NETag>);

impl NETagList {
    /// Tags with an unknown category are reported and dropped.
    pub fn from_fstring(fstring: &str) -> Self {
        let mut tags = Vec::new();
        for caps in NE_PAT.captures_iter(fstring) {
            match caps["cat"].parse::<NamedEntityCategory>() {
                Ok(category) => tags.push(NETag {
                    category,
                    name: caps["name"].to_string(),
                }),
                Err(err) => warn(err),
            }
        }
        NETagList(tags)
    }

    pub fn to_fstring(&self) -> String {
        self.0.iter().map(NETag::to_fstring).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NETag> {
        self.0.iter()
    }
}

/// A resolved named entity: a category and a run of morphemes in one sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedEntity {
    pub category: NamedEntityCategory,
    /// Index of the sentence in its document (0 for a standalone sentence).
    pub sentence: usize,
    /// Sentence-local morpheme indices.
    pub morphemes: Range<usize>,
    pub text: String,
}

impl NamedEntity {
    pub fn to_fstring(&self) -> String {
        format!("<NE:{}:{}>", self.category, self.text)
    }
}

impl fmt::Display for NamedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Find the rightmost run of `surfaces[..end]` whose concatenation equals `name`.
///
/// The run must end no later than `end`. Runs closer to `end` are preferred,
/// and for a given stop position the shortest run wins.
pub(crate) fn find_rightmost_span(surfaces: &[&str], end: usize, name: &str) -> Option<Range<usize>> {
    let end = end.min(surfaces.len());
    for stop in (1..=end).rev() {
        let mut candidate = String::new();
        for start in (0..stop).rev() {
            candidate.insert_str(0, surfaces[start]);
            if candidate == name {
                return Some(start..stop);
            }
            if candidate.len() >= name.len() {
                break;
            }
        }
    }
    None
}
