use once_cell::sync::Lazy;
use regex::Regex;

use super::feature::FeatureValue;

const NIL: &str = "NIL";

static SEM_PAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<key>[^:\s]+)(?::(?P<value>\S+))?(?:\s|$)").expect("valid semantics pattern")
});

/// Semantic information attached to a morpheme, e.g. `"代表表記:天気/てんき カテゴリ:抽象物"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SemanticsDict {
    entries: Vec<(String, FeatureValue)>,
    /// True when the source string was the literal `NIL`.
    pub is_nil: bool,
}

impl SemanticsDict {
    pub fn nil() -> Self {
        Self {
            entries: Vec::new(),
            is_nil: true,
        }
    }

    pub fn from_sstring(sstring: &str) -> Self {
        if sstring == NIL {
            return Self::nil();
        }
        let mut semantics = Self::default();
        let inner = sstring.trim_matches('"');
        for caps in SEM_PAT.captures_iter(inner) {
            let value = match caps.name("value") {
                Some(value) => FeatureValue::Text(value.as_str().to_string()),
                None => FeatureValue::Flag,
            };
            semantics.entries.push((caps["key"].to_string(), value));
        }
        semantics
    }

    /// `NIL` if flagged, empty if there is nothing to emit, a quoted list otherwise.
    pub fn to_sstring(&self) -> String {
        if self.entries.is_empty() {
            return if self.is_nil {
                NIL.to_string()
            } else {
                String::new()
            };
        }
        let items: Vec<String> = self
            .entries
            .iter()
            .map(|(key, value)| match value {
                FeatureValue::Flag => key.clone(),
                FeatureValue::Text(text) => format!("{}:{}", key, text),
            })
            .collect();
        format!("\"{}\"", items.join(" "))
    }

    pub fn get(&self, key: &str) -> Option<&FeatureValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FeatureValue::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FeatureValue>) {
        let key = key.into();
        let value = value.into();
        self.is_nil = false;
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
