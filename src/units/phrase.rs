use std::ops::Range;

use super::node::{BasePhraseRef, ClauseRef, DependencyUnit, MorphemeRef, PhraseRef, Unit};
use crate::errors::{KnpError, KnpResult};
use crate::props::{DepType, FeatureDict};

/// 文節: a run of base phrases introduced by a `*` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Phrase {
    pub parent_index: Option<i32>,
    pub dep_type: Option<DepType>,
    pub features: FeatureDict,
    pub(crate) base_phrase_range: Range<usize>,
    pub(crate) clause_index: Option<usize>,
}

impl Phrase {
    pub(crate) fn from_header(
        parent_index: Option<i32>,
        dep_type: Option<DepType>,
        fstring: &str,
        first_base_phrase: usize,
    ) -> Self {
        Phrase {
            parent_index,
            dep_type,
            features: FeatureDict::from_fstring(fstring),
            base_phrase_range: first_base_phrase..first_base_phrase,
            clause_index: None,
        }
    }
}

impl<'a> PhraseRef<'a> {
    pub fn global_index(&self) -> usize {
        self.offsets().map_or(0, |offsets| offsets.phrases) + self.index()
    }

    pub fn base_phrases(&self) -> Vec<BasePhraseRef<'a>> {
        self.base_phrase_range
            .clone()
            .filter_map(|i| self.base_phrase_in_sentence(i))
            .collect()
    }

    pub fn morphemes(&self) -> Vec<MorphemeRef<'a>> {
        self.base_phrases()
            .iter()
            .flat_map(|bp| bp.morphemes())
            .collect()
    }

    pub fn text(&self) -> String {
        self.base_phrases().iter().map(|bp| bp.text()).collect()
    }

    pub fn parent(&self) -> Option<PhraseRef<'a>> {
        let parent = usize::try_from(self.parent_index?).ok()?;
        self.phrase_in_sentence(parent)
    }

    pub fn children(&self) -> Vec<PhraseRef<'a>> {
        self.sentence_data()
            .phrase_children(self.index())
            .iter()
            .filter_map(|&i| self.phrase_in_sentence(i))
            .collect()
    }

    /// The head base phrase: the first one marked `文節主辞` (on itself or
    /// one of its morphemes), else the last one.
    pub fn head(&self) -> Option<BasePhraseRef<'a>> {
        let base_phrases = self.base_phrases();
        base_phrases
            .iter()
            .find(|bp| {
                bp.features.contains_key("文節主辞")
                    || bp
                        .morphemes()
                        .iter()
                        .any(|m| m.features.contains_key("文節主辞"))
            })
            .or_else(|| base_phrases.last())
            .copied()
    }

    pub fn clause(&self) -> KnpResult<ClauseRef<'a>> {
        self.clause_index
            .and_then(|index| self.clause_in_sentence(index))
            .ok_or(KnpError::LayerNotAvailable {
                layer: "clause",
                unit: "phrase",
            })
    }
}

impl<'a> Unit<'a> for PhraseRef<'a> {
    fn morphemes(&self) -> Vec<MorphemeRef<'a>> {
        PhraseRef::morphemes(self)
    }

    fn parent(&self) -> Option<Self> {
        PhraseRef::parent(self)
    }

    fn children(&self) -> Vec<Self> {
        PhraseRef::children(self)
    }
}

impl<'a> DependencyUnit<'a> for PhraseRef<'a> {
    fn parent_index(&self) -> Option<i32> {
        self.data().parent_index
    }

    fn dep_type(&self) -> Option<DepType> {
        self.data().dep_type
    }
}
