use once_cell::sync::Lazy;
use regex::Regex;

static MEMO_PAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<memo text="(?P<text>.*?)"/>"#).expect("valid memo pattern"));

/// A `<memo text="..."/>` annotation left by corpus annotators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MemoTag {
    pub text: String,
}

impl MemoTag {
    pub fn from_fstring(fstring: &str) -> Self {
        let text = MEMO_PAT
            .captures(fstring)
            .map(|caps| caps["text"].to_string())
            .unwrap_or_default();
        MemoTag { text }
    }

    pub fn to_fstring(&self) -> String {
        format!("<memo text=\"{}\"/>", self.text)
    }

    /// A memo counts as present only when its text is non-empty.
    pub fn is_present(&self) -> bool {
        !self.text.is_empty()
    }
}
