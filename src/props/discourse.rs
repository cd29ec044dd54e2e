use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{warn, KnpError};

static TAG_PAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<談話関係:(?P<values>[^>]*)>").expect("valid discourse tag pattern"));
static VALUE_PAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<sid>[^/]+)/(?P<index>\d+)/(?P<label>[^/]+)$").expect("valid discourse value pattern")
});

/// One `sid/index/label` item of a discourse-relation tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiscourseAnnotationItem {
    pub sid: String,
    pub base_phrase_index: usize,
    /// Raw label; checked against the closed vocabulary when the relation is resolved.
    pub label: String,
}

impl DiscourseAnnotationItem {
    pub fn to_fstring(&self) -> String {
        format!("{}/{}/{}", self.sid, self.base_phrase_index, self.label)
    }
}

/// `<談話関係:sid/idx/label;sid/idx/label;...>` on a clause-end base phrase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscourseAnnotation {
    pub values: Vec<DiscourseAnnotationItem>,
}

impl DiscourseAnnotation {
    /// Items that do not have the `sid/idx/label` shape are reported and dropped.
    pub fn from_fstring(fstring: &str) -> Self {
        let mut values = Vec::new();
        if let Some(caps) = TAG_PAT.captures(fstring) {
            for item in caps["values"].split(';') {
                match VALUE_PAT.captures(item) {
                    Some(value) => match value["index"].parse::<usize>() {
                        Ok(base_phrase_index) => values.push(DiscourseAnnotationItem {
                            sid: value["sid"].to_string(),
                            base_phrase_index,
                            label: value["label"].to_string(),
                        }),
                        Err(_) => warn(KnpError::malformed(item, "discourse relation index overflow")),
                    },
                    None => warn(KnpError::malformed(item, "not a valid discourse relation item")),
                }
            }
        }
        DiscourseAnnotation { values }
    }

    /// Empty when there is nothing to emit.
    pub fn to_fstring(&self) -> String {
        if self.values.is_empty() {
            return String::new();
        }
        let items: Vec<String> = self.values.iter().map(|v| v.to_fstring()).collect();
        format!("<談話関係:{}>", items.join(";"))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fstring() {
        let tag = DiscourseAnnotation::from_fstring("<節-区切><談話関係:1/0/原因・理由;2/1/原因・理由>");
        assert_eq!(
            tag.values,
            vec![
                DiscourseAnnotationItem {
                    sid: "1".into(),
                    base_phrase_index: 0,
                    label: "原因・理由".into(),
                },
                DiscourseAnnotationItem {
                    sid: "2".into(),
                    base_phrase_index: 1,
                    label: "原因・理由".into(),
                },
            ]
        );
        assert_eq!(tag.to_fstring(), "<談話関係:1/0/原因・理由;2/1/原因・理由>");
    }

    #[test]
    fn test_absent_tag() {
        let tag = DiscourseAnnotation::from_fstring("<節-区切>");
        assert!(tag.is_empty());
        assert_eq!(tag.to_fstring(), "");
    }

    #[test]
    fn test_malformed_items_are_dropped() {
        let tag = DiscourseAnnotation::from_fstring("<談話関係:1/3/条件;2/1/条;4>");
        assert_eq!(tag.values.len(), 2);
        assert_eq!(tag.values[1].label, "条");
    }
}
