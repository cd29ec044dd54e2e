use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::ops::Range;

use super::node::{BasePhraseRef, ClauseRef, MorphemeRef, PhraseRef};
use crate::errors::{KnpError, KnpResult};
use crate::props::{FeatureDict, SemanticsDict};

/// Eleven attributes, then optional semantics, then optional features.
/// A single-space surface, reading or lemma is allowed.
static MORPHEME_PAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^( |[^ ]+) ( |[^ ]+) ( |[^ ]+) ([^ ]+) (\d+) ([^ ]+) (\d+) ([^ ]+) (\d+) ([^ ]+) (\d+)",
        r#"(?: (NIL|"[^"]*"))?(?: (<.*>))?$"#,
    ))
    .expect("valid morpheme pattern")
});

const HOMOGRAPH_PREFIX: &str = "@ ";

/// The atomic unit: a surface form with its Juman++ attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Morpheme {
    pub surface: String,
    pub reading: String,
    pub lemma: String,
    pub pos: String,
    pub pos_id: u32,
    pub subpos: String,
    pub subpos_id: u32,
    pub conjtype: String,
    pub conjtype_id: u32,
    pub conjform: String,
    pub conjform_id: u32,
    pub semantics: SemanticsDict,
    pub features: FeatureDict,
    /// Alternative analyses from `@ ` continuation lines.
    pub homographs: Vec<Morpheme>,
}

impl Morpheme {
    /// True for a line that must be read as a morpheme.
    ///
    /// The full pattern wins over the leading character, so `# # # 未定義語 ...`
    /// and a surface `EOS` are morphemes.
    pub fn is_morpheme_line(line: &str) -> bool {
        if MORPHEME_PAT.is_match(line) {
            return true;
        }
        !["*", "+", "#", "@", "EOS"]
            .iter()
            .any(|prefix| line.starts_with(prefix))
    }

    pub fn is_homograph_line(line: &str) -> bool {
        line.strip_prefix(HOMOGRAPH_PREFIX)
            .map_or(false, |rest| MORPHEME_PAT.is_match(rest))
    }

    pub(crate) fn parse_line(line: &str) -> KnpResult<Morpheme> {
        let caps = MORPHEME_PAT
            .captures(line)
            .ok_or_else(|| KnpError::malformed(line, "not a morpheme line"))?;
        let id = |i: usize| -> KnpResult<u32> {
            caps[i]
                .parse::<u32>()
                .map_err(|_| KnpError::malformed(line, "attribute id is not an integer"))
        };
        Ok(Morpheme {
            surface: caps[1].to_string(),
            reading: caps[2].to_string(),
            lemma: caps[3].to_string(),
            pos: caps[4].to_string(),
            pos_id: id(5)?,
            subpos: caps[6].to_string(),
            subpos_id: id(7)?,
            conjtype: caps[8].to_string(),
            conjtype_id: id(9)?,
            conjform: caps[10].to_string(),
            conjform_id: id(11)?,
            semantics: caps
                .get(12)
                .map(|m| SemanticsDict::from_sstring(m.as_str()))
                .unwrap_or_default(),
            features: caps
                .get(13)
                .map(|m| FeatureDict::from_fstring(m.as_str()))
                .unwrap_or_default(),
            homographs: Vec::new(),
        })
    }

    /// Parse one Juman++ line plus any `@ ` homograph lines that follow it.
    pub fn from_jumanpp(text: &str) -> KnpResult<Morpheme> {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());
        let first = lines
            .next()
            .ok_or_else(|| KnpError::malformed(text, "empty morpheme"))?;
        let mut morpheme = Morpheme::parse_line(first)?;
        for line in lines {
            let rest = line
                .strip_prefix(HOMOGRAPH_PREFIX)
                .ok_or_else(|| KnpError::malformed(line, "expected a homograph line"))?;
            morpheme.homographs.push(Morpheme::parse_line(rest)?);
        }
        Ok(morpheme)
    }

    fn write_attributes(&self, out: &mut String) {
        out.push_str(&format!(
            "{} {} {} {} {} {} {} {} {} {} {}",
            self.surface,
            self.reading,
            self.lemma,
            self.pos,
            self.pos_id,
            self.subpos,
            self.subpos_id,
            self.conjtype,
            self.conjtype_id,
            self.conjform,
            self.conjform_id
        ));
        let sstring = self.semantics.to_sstring();
        if !sstring.is_empty() {
            out.push(' ');
            out.push_str(&sstring);
        }
        if !self.features.is_empty() {
            out.push(' ');
            out.push_str(&self.features.to_fstring());
        }
        out.push('\n');
    }

    /// The Juman++ line, newline-terminated, followed by homograph lines.
    pub fn to_jumanpp(&self) -> String {
        let mut out = String::new();
        self.write_attributes(&mut out);
        for homograph in &self.homographs {
            out.push_str(HOMOGRAPH_PREFIX);
            homograph.write_attributes(&mut out);
        }
        out
    }

    /// `代表表記` from the semantics, e.g. `天気/てんき`.
    pub fn canon(&self) -> Option<&str> {
        self.semantics.get_str("代表表記")
    }

    pub fn is_content_word(&self) -> bool {
        self.features.contains_key("内容語")
    }

    pub fn is_function_word(&self) -> bool {
        self.features.contains_key("付属")
    }

    pub fn char_len(&self) -> usize {
        self.surface.chars().count()
    }
}

impl fmt::Display for Morpheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.surface)
    }
}

impl<'a> MorphemeRef<'a> {
    /// Character offsets within the sentence text.
    pub fn span(&self) -> Range<usize> {
        let start = self.sentence_data().char_offset(self.index());
        start..start + self.char_len()
    }

    /// Character offsets within the document text.
    pub fn global_span(&self) -> Range<usize> {
        let base = self.offsets().map_or(0, |offsets| offsets.chars);
        let span = self.span();
        base + span.start..base + span.end
    }

    pub fn global_index(&self) -> usize {
        self.offsets().map_or(0, |offsets| offsets.morphemes) + self.index()
    }

    /// The containing base phrase; only available after KNP.
    pub fn base_phrase(&self) -> KnpResult<BasePhraseRef<'a>> {
        let sentence = self.sentence_data();
        let index = sentence
            .base_phrase_of_morpheme(self.index())
            .ok_or(KnpError::LayerNotAvailable {
                layer: "base phrase",
                unit: "morpheme",
            })?;
        self.base_phrase_in_sentence(index)
            .ok_or(KnpError::LayerNotAvailable {
                layer: "base phrase",
                unit: "morpheme",
            })
    }

    pub fn phrase(&self) -> KnpResult<PhraseRef<'a>> {
        self.base_phrase()?.phrase()
    }

    pub fn clause(&self) -> KnpResult<ClauseRef<'a>> {
        self.base_phrase()?.clause()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_jumanpp() {
        let line = "天気 てんき 天気 名詞 6 普通名詞 1 * 0 * 0 \"代表表記:天気/てんき カテゴリ:抽象物\"";
        let morpheme = Morpheme::from_jumanpp(line).unwrap();
        assert_eq!(morpheme.surface, "天気");
        assert_eq!(morpheme.pos_id, 6);
        assert_eq!(morpheme.subpos, "普通名詞");
        assert_eq!(morpheme.canon(), Some("天気/てんき"));
        assert_eq!(morpheme.to_jumanpp(), format!("{}\n", line));
    }

    #[test]
    fn test_features_and_no_semantics() {
        let with_features = "が が が 助詞 9 格助詞 1 * 0 * 0 NIL <かな漢字><ひらがな><付属>";
        let morpheme = Morpheme::from_jumanpp(with_features).unwrap();
        assert!(morpheme.semantics.is_nil);
        assert!(morpheme.is_function_word());
        assert!(!morpheme.is_content_word());
        assert_eq!(morpheme.to_jumanpp(), format!("{}\n", with_features));

        let bare = "しかし しかし しかし 接続詞 10 * 0 * 0 * 0";
        let morpheme = Morpheme::from_jumanpp(bare).unwrap();
        assert!(morpheme.semantics.is_empty());
        assert_eq!(morpheme.to_jumanpp(), format!("{}\n", bare));
    }

    #[test]
    fn test_homographs() {
        let text = "母 はは 母 名詞 6 普通名詞 1 * 0 * 0 \"代表表記:母/はは\"\n@ 母 ぼ 母 名詞 6 普通名詞 1 * 0 * 0 \"代表表記:母/ぼ\"\n";
        let morpheme = Morpheme::from_jumanpp(text).unwrap();
        assert_eq!(morpheme.homographs.len(), 1);
        assert_eq!(morpheme.homographs[0].reading, "ぼ");
        assert_eq!(morpheme.to_jumanpp(), text);
    }

    #[test]
    fn test_line_classification() {
        assert!(Morpheme::is_morpheme_line("# # # 未定義語 15 その他 1 * 0 * 0"));
        assert!(Morpheme::is_morpheme_line("EOS EOS EOS 未定義語 15 アルファベット 3 * 0 * 0"));
        assert!(Morpheme::is_morpheme_line("\u{3000} \u{3000} \u{3000} 特殊 1 空白 6 * 0 * 0"));
        assert!(!Morpheme::is_morpheme_line("EOS"));
        assert!(!Morpheme::is_morpheme_line("# S-ID:1"));
        assert!(!Morpheme::is_morpheme_line("* 1D"));
        assert!(Morpheme::is_homograph_line("@ 母 ぼ 母 名詞 6 普通名詞 1 * 0 * 0 NIL"));
        assert!(!Morpheme::is_homograph_line("@ foo"));
    }

    #[test]
    fn test_space_surface() {
        let line = "      特殊 1 空白 6 * 0 * 0";
        let morpheme = Morpheme::from_jumanpp(line).unwrap();
        assert_eq!(morpheme.surface, " ");
        assert_eq!(morpheme.lemma, " ");
        assert_eq!(morpheme.to_jumanpp(), format!("{}\n", line));
    }

    #[test]
    fn test_malformed() {
        assert!(Morpheme::from_jumanpp("天気 てんき 天気 名詞").is_err());
        assert!(Morpheme::from_jumanpp("").is_err());
    }
}
