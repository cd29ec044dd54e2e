//! `# S-ID:...` comment lines and sentence id conventions.

use once_cell::sync::Lazy;
use regex::Regex;

static SID_COMMENT_PAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^# S-ID: ?(?P<sid>\S*)(?P<rest> .+)?$").expect("valid S-ID pattern"));

static SID_PAT_KWDLC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<did>w\d{6}-\d{10})(?:-\d+){1,2}$").expect("valid KWDLC sid pattern")
});
static SID_PAT_WAC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<did>wiki\d{8})-\d{2}(?:-\d{2})?$").expect("valid WAC sid pattern")
});
static SID_PAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<did>[A-Za-z0-9_-]+?)(?:-\d+)?$").expect("valid sid pattern")
});

/// Sentence id conventions, each deriving a document id from a sentence id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidFormat {
    /// `<doc>-<n>`, or a bare `<doc>` naming a one-sentence document.
    Default,
    /// `w201106-0000060050-1(-1)`.
    Kwdlc,
    /// `wiki00100176-00(-01)`.
    Wac,
}

impl SidFormat {
    fn pattern(self) -> &'static Regex {
        match self {
            SidFormat::Default => &SID_PAT,
            SidFormat::Kwdlc => &SID_PAT_KWDLC,
            SidFormat::Wac => &SID_PAT_WAC,
        }
    }

    /// `None` when the sid does not follow this convention.
    pub fn doc_id(self, sid: &str) -> Option<String> {
        let caps = self.pattern().captures(sid)?;
        Some(caps["did"].to_string())
    }
}

/// Document id of `sid`, trying KWDLC, WAC and then the default convention.
/// `None` when no convention accepts the sid.
pub(crate) fn infer_doc_id(sid: &str) -> Option<String> {
    [SidFormat::Kwdlc, SidFormat::Wac, SidFormat::Default]
        .iter()
        .find_map(|format| format.doc_id(sid))
}

/// A parsed comment line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Comment {
    pub sid: Option<String>,
    pub doc_id: Option<String>,
    pub misc: String,
}

/// Split a comment into sid, document id and the remaining text.
pub(crate) fn parse_comment(line: &str) -> Comment {
    if let Some(caps) = SID_COMMENT_PAT.captures(line) {
        let sid = caps["sid"].to_string();
        let misc = caps
            .name("rest")
            .map_or(String::new(), |m| m.as_str().trim().to_string());
        let doc_id = infer_doc_id(&sid);
        if doc_id.is_none() {
            tracing::warn!("unsupported S-ID format: {:?}", sid);
        }
        return Comment {
            sid: Some(sid),
            doc_id,
            misc,
        };
    }
    Comment {
        sid: None,
        doc_id: None,
        misc: line.trim_start_matches('#').trim_start().to_string(),
    }
}

/// The comment line for a sentence, or `None` when there is nothing to say.
pub(crate) fn format_comment(sid: Option<&str>, misc: &str) -> Option<String> {
    match (sid, misc.is_empty()) {
        (Some(sid), true) => Some(format!("# S-ID:{}", sid)),
        (Some(sid), false) => Some(format!("# S-ID:{} {}", sid, misc)),
        (None, false) => Some(format!("# {}", misc)),
        (None, true) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sid_formats() {
        assert_eq!(
            infer_doc_id("w201106-0000060050-1"),
            Some("w201106-0000060050".to_string())
        );
        assert_eq!(
            infer_doc_id("w201106-0000060050-1-01"),
            Some("w201106-0000060050".to_string())
        );
        assert_eq!(
            infer_doc_id("wiki00100176-00"),
            Some("wiki00100176".to_string())
        );
        assert_eq!(
            infer_doc_id("wiki00100176-00-01"),
            Some("wiki00100176".to_string())
        );
        assert_eq!(
            infer_doc_id("202212161839-0-1"),
            Some("202212161839-0".to_string())
        );
        assert_eq!(infer_doc_id("1"), Some("1".to_string()));
        assert_eq!(infer_doc_id("doc_a"), Some("doc_a".to_string()));
        assert_eq!(infer_doc_id("文-1"), None);
    }

    #[test]
    fn test_parse_comment() {
        let comment = parse_comment("# S-ID:w201106-0000060050-1 JUMAN:7.01 KNP:5.0");
        assert_eq!(comment.sid.as_deref(), Some("w201106-0000060050-1"));
        assert_eq!(comment.doc_id.as_deref(), Some("w201106-0000060050"));
        assert_eq!(comment.misc, "JUMAN:7.01 KNP:5.0");

        let unsupported = parse_comment("# S-ID:文-1");
        assert_eq!(unsupported.sid.as_deref(), Some("文-1"));
        assert_eq!(unsupported.doc_id, None);

        let plain = parse_comment("# 吾輩は猫である");
        assert_eq!(plain.sid, None);
        assert_eq!(plain.misc, "吾輩は猫である");
    }

    #[test]
    fn test_format_comment() {
        assert_eq!(format_comment(Some("1"), ""), Some("# S-ID:1".to_string()));
        assert_eq!(
            format_comment(Some("1"), "KNP:5.0"),
            Some("# S-ID:1 KNP:5.0".to_string())
        );
        assert_eq!(format_comment(None, "memo"), Some("# memo".to_string()));
        assert_eq!(format_comment(None, ""), None);
    }
}
