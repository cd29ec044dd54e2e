//! The `<key:value>` feature sublanguage shared by morphemes, base phrases
//! and phrases.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Tags whose contents belong to a dedicated value object rather than to
/// the feature map.
const IGNORE_TAG_PREFIXES: &[&str] = &["rel ", "NE:", "memo ", "談話関係:"];

static FEATURE_PAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<(?P<key>(?:[^:"]|"[^"]*?")+?)(?::(?P<value>(?:[^>\\]|\\>?)+))?>"#)
        .expect("valid feature pattern")
});

/// Value of a feature or semantics entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeatureValue {
    /// A bare `<key>` flag.
    Flag,
    /// A `<key:value>` entry.
    Text(String),
}

impl FeatureValue {
    /// The textual value, if this is not a flag.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FeatureValue::Flag => None,
            FeatureValue::Text(text) => Some(text),
        }
    }
}

impl From<&str> for FeatureValue {
    fn from(text: &str) -> Self {
        FeatureValue::Text(text.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(text: String) -> Self {
        FeatureValue::Text(text)
    }
}

impl From<bool> for FeatureValue {
    fn from(_: bool) -> Self {
        FeatureValue::Flag
    }
}

/// Ordered map of features. Insertion order is kept for emission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureDict {
    entries: Vec<(String, FeatureValue)>,
}

impl FeatureDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every `<k>` / `<k:v>` token of an fstring.
    ///
    /// Tokens owned by rel, NE, memo and discourse-relation tags are
    /// skipped. `\>` in values is unescaped.
    pub fn from_fstring(fstring: &str) -> Self {
        let mut features = Self::new();
        for caps in FEATURE_PAT.captures_iter(fstring) {
            let whole = &caps[0];
            if IGNORE_TAG_PREFIXES
                .iter()
                .any(|prefix| whole[1..].starts_with(prefix))
            {
                continue;
            }
            let value = match caps.name("value") {
                Some(value) => FeatureValue::Text(value.as_str().replace("\\>", ">")),
                None => FeatureValue::Flag,
            };
            features.entries.push((caps["key"].to_string(), value));
        }
        features
    }

    /// Emit `<k>` for flags and `<k:v>` otherwise, escaping `>` in values.
    pub fn to_fstring(&self) -> String {
        let mut ret = String::new();
        for (key, value) in &self.entries {
            match value {
                FeatureValue::Flag => {
                    ret.push('<');
                    ret.push_str(key);
                    ret.push('>');
                }
                FeatureValue::Text(text) => {
                    ret.push('<');
                    ret.push_str(key);
                    ret.push(':');
                    ret.push_str(&text.replace('>', "\\>"));
                    ret.push('>');
                }
            }
        }
        ret
    }

    pub fn get(&self, key: &str) -> Option<&FeatureValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The value of `key` when it is a `<key:value>` entry.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FeatureValue::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Insert or replace an entry, keeping the position of an existing key.
    ///
    /// `rel` and `memo` are owned by dedicated tag objects; setting them here
    /// is refused with a warning.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FeatureValue>) {
        let key = key.into();
        if key == "rel" || key == "memo" {
            tracing::warn!(
                "adding {:?} to a feature dict is not supported and was ignored",
                key
            );
            return;
        }
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<FeatureValue> {
        let position = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(position).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for FeatureDict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fstring())
    }
}
