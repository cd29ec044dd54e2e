use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::errors::{warn, KnpError};

const BASE_CASE_TYPES: &[&str] = &[
    "ガ", "デ", "ト", "ニ", "ノ", "ヘ", "ヲ", "カラ", "ガ２", "ノ？", "マデ", "ヨリ", "トイウ",
    "トシテ", "トスル", "ニオク", "ニシテ", "ニツク", "ニトル", "ニヨル", "マデニ", "ニオイテ",
    "ニカワル", "ニソッテ", "ニツイテ", "ニトッテ", "ニムケテ", "ニムケル", "ニヨッテ", "ニヨラズ",
    "ニアワセテ", "ニカギッテ", "ニカギラズ", "ニカランデ", "ニカワッテ", "ニカンシテ", "ニカンスル",
    "ニクラベテ", "ニクワエテ", "ニタイシテ", "ニタイスル", "ニツヅイテ", "ニナランデ", "ヲツウジテ",
    "ヲツウジル", "ヲノゾイテ", "ヲフクメテ", "ヲメグッテ", "ニトモナッテ", "ニモトヅイテ", "無",
    "修飾", "判ガ", "時間", "外の関係",
];

const BASE_COREF_TYPES: &[&str] = &["=", "=構", "=役"];

/// Case labels, each also present with a `≒` suffix.
pub static CASE_TYPES: Lazy<Vec<String>> = Lazy::new(|| with_nonidentical(BASE_CASE_TYPES));

/// Coreference relation types, each also present with a `≒` suffix.
pub static COREF_TYPES: Lazy<Vec<String>> = Lazy::new(|| with_nonidentical(BASE_COREF_TYPES));

fn with_nonidentical(base: &[&str]) -> Vec<String> {
    base.iter()
        .map(|t| t.to_string())
        .chain(base.iter().map(|t| format!("{}≒", t)))
        .collect()
}

pub fn is_case_type(rel_type: &str) -> bool {
    CASE_TYPES.iter().any(|t| t == rel_type)
}

pub fn is_coref_type(rel_type: &str) -> bool {
    COREF_TYPES.iter().any(|t| t == rel_type)
}

static REL_PAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"<rel type="(?P<type>\S+?)"(?: mode="(?P<mode>\S+?)")? target="(?P<target>.+?)"(?: sid="(?P<sid>.*?)" id="(?P<id>\d+?)")?/>"#,
    )
    .expect("valid rel pattern")
});

/// How repeated rel tags of the same type on one base phrase relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelMode {
    And,
    Or,
    /// `？`: either reading is valid and context cannot decide.
    Ambiguous,
}

impl RelMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RelMode::And => "AND",
            RelMode::Or => "OR",
            RelMode::Ambiguous => "？",
        }
    }
}

impl FromStr for RelMode {
    type Err = KnpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AND" => Ok(RelMode::And),
            "OR" => Ok(RelMode::Or),
            "？" => Ok(RelMode::Ambiguous),
            _ => Err(KnpError::UnknownLabel {
                kind: "rel mode",
                label: s.to_string(),
            }),
        }
    }
}

/// A `<rel .../>` annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelTag {
    pub rel_type: String,
    pub target: String,
    /// `None` for exophora; an empty string refers to the annotated sentence.
    pub sid: Option<String>,
    pub base_phrase_index: Option<usize>,
    pub mode: Option<RelMode>,
}

impl RelTag {
    pub fn to_fstring(&self) -> String {
        let mut ret = format!("<rel type=\"{}\"", self.rel_type);
        if let Some(mode) = self.mode {
            ret.push_str(&format!(" mode=\"{}\"", mode.as_str()));
        }
        ret.push_str(&format!(" target=\"{}\"", self.target));
        if let (Some(sid), Some(index)) = (&self.sid, self.base_phrase_index) {
            ret.push_str(&format!(" sid=\"{}\" id=\"{}\"", sid, index));
        }
        ret.push_str("/>");
        ret
    }

    pub fn is_coreference(&self) -> bool {
        self.rel_type.starts_with('=')
    }

    pub fn is_nonidentical(&self) -> bool {
        self.rel_type.ends_with('≒')
    }
}

impl fmt::Display for RelTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fstring())
    }
}

/// Every rel tag of an fstring. Repeated types are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelTagList(pub Vec<RelTag>);

impl RelTagList {
    pub fn from_fstring(fstring: &str) -> Self {
        let mut tags = Vec::new();
        for caps in REL_PAT.captures_iter(fstring) {
            let mode = match caps.name("mode") {
                Some(mode) => match mode.as_str().parse::<RelMode>() {
                    Ok(mode) => Some(mode),
                    Err(err) => {
                        warn(err);
                        continue;
                    }
                },
                None => None,
            };
            let tag = RelTag {
                rel_type: caps["type"].to_string(),
                target: caps["target"].to_string(),
                sid: caps.name("sid").map(|m| m.as_str().to_string()),
                base_phrase_index: caps.name("id").and_then(|m| m.as_str().parse().ok()),
                mode,
            };
            if tag.is_coreference() {
                if !is_coref_type(&tag.rel_type) {
                    tracing::warn!("unknown coreference type: {}", tag);
                }
            } else if !is_case_type(&tag.rel_type) {
                tracing::warn!("unknown case type: {}", tag);
            }
            tags.push(tag);
        }
        RelTagList(tags)
    }

    pub fn to_fstring(&self) -> String {
        self.0.iter().map(RelTag::to_fstring).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RelTag> {
        self.0.iter()
    }
}
