//! Line classification for Juman++ / KNP blocks.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{KnpError, KnpResult};
use crate::props::DepType;
use crate::units::Morpheme;

/// Line closing a sentence block.
pub const EOS: &str = "EOS";
/// Line closing a document in KWJA output.
pub const EOD: &str = "EOD";

static HEADER_PAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<marker>[*+])(?: (?P<pid>-1|\d+)(?P<dtype>[DPAI]))?(?: (?P<feats><.*>))?$")
        .expect("valid header pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineKind {
    Comment,
    PhraseHeader,
    BasePhraseHeader,
    Morpheme,
    Homograph,
    Eos,
}

pub(crate) fn is_eos(line: &str) -> bool {
    line.trim() == EOS
}

/// `#` lines that are not morphemes.
pub(crate) fn is_comment_line(line: &str) -> bool {
    line.starts_with('#') && !Morpheme::is_morpheme_line(line)
}

/// Classify a non-blank line, or `None` when it fits no grammar.
pub(crate) fn classify(line: &str) -> Option<LineKind> {
    if is_eos(line) {
        return Some(LineKind::Eos);
    }
    if let Some(caps) = HEADER_PAT.captures(line) {
        return Some(match &caps["marker"] {
            "*" => LineKind::PhraseHeader,
            _ => LineKind::BasePhraseHeader,
        });
    }
    if Morpheme::is_homograph_line(line) {
        return Some(LineKind::Homograph);
    }
    if is_comment_line(line) {
        return Some(LineKind::Comment);
    }
    if Morpheme::is_morpheme_line(line) {
        return Some(LineKind::Morpheme);
    }
    None
}

/// The dependency part and feature string of a `*` / `+` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Header<'l> {
    pub parent_index: Option<i32>,
    pub dep_type: Option<DepType>,
    pub fstring: &'l str,
}

pub(crate) fn parse_header(line: &str) -> KnpResult<Header<'_>> {
    let caps = HEADER_PAT
        .captures(line)
        .ok_or_else(|| KnpError::malformed(line, "not a phrase or base phrase header"))?;
    let parent_index = match caps.name("pid") {
        Some(pid) => Some(
            pid.as_str()
                .parse::<i32>()
                .map_err(|_| KnpError::malformed(line, "parent index is not an integer"))?,
        ),
        None => None,
    };
    let dep_type = caps
        .name("dtype")
        .and_then(|dtype| DepType::from_symbol(dtype.as_str()));
    Ok(Header {
        parent_index,
        dep_type,
        fstring: caps.name("feats").map_or("", |m| m.as_str()),
    })
}

/// `{marker} {pid}{dtype}` without a trailing space.
pub(crate) fn format_dependency(
    marker: char,
    parent_index: Option<i32>,
    dep_type: Option<DepType>,
) -> String {
    let mut out = String::new();
    out.push(marker);
    if let Some(pid) = parent_index {
        out.push(' ');
        out.push_str(&pid.to_string());
        out.push_str(dep_type.unwrap_or(DepType::Dependency).symbol());
    }
    out
}
