use std::ops::Range;

use super::node::{BasePhraseRef, ClauseRef, MorphemeRef, PhraseRef, Unit};
use super::ClauseId;
use crate::cohesion::DiscourseRelation;

/// 節: a run of phrases closed by a base phrase carrying `節-区切`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clause {
    pub(crate) phrase_range: Range<usize>,
}

impl<'a> ClauseRef<'a> {
    pub fn id(&self) -> ClauseId {
        ClauseId {
            sentence: self.sentence_data().index,
            index: self.index(),
        }
    }

    pub fn global_index(&self) -> usize {
        self.offsets().map_or(0, |offsets| offsets.clauses) + self.index()
    }

    pub fn phrases(&self) -> Vec<PhraseRef<'a>> {
        self.phrase_range
            .clone()
            .filter_map(|i| self.phrase_in_sentence(i))
            .collect()
    }

    pub fn base_phrases(&self) -> Vec<BasePhraseRef<'a>> {
        self.sentence_data()
            .clause_base_phrases(self.data())
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

    /// The base phrase carrying `節-区切`; the last one when none does.
    pub fn end(&self) -> Option<BasePhraseRef<'a>> {
        self.sentence_data()
            .clause_end(self.index())
            .and_then(|i| self.base_phrase_in_sentence(i))
    }

    /// The base phrase carrying `節-主辞`; the end when none does.
    pub fn head(&self) -> Option<BasePhraseRef<'a>> {
        self.base_phrases()
            .into_iter()
            .find(|bp| bp.is_clause_head())
            .or_else(|| self.end())
    }

    /// The clause containing the base phrase this clause's end depends on.
    pub fn parent(&self) -> Option<ClauseRef<'a>> {
        self.sentence_data()
            .clause_parent(self.index())
            .and_then(|i| self.clause_in_sentence(i))
    }

    pub fn children(&self) -> Vec<ClauseRef<'a>> {
        self.sentence_data()
            .clause_children(self.index())
            .iter()
            .filter_map(|&i| self.clause_in_sentence(i))
            .collect()
    }

    fn clause_type(&self) -> Option<&'a str> {
        let end = self.end()?;
        end.data().features.get_str("節-区切")
    }

    /// `節-区切:連体修飾`.
    pub fn is_adnominal(&self) -> bool {
        self.clause_type() == Some("連体修飾")
    }

    /// `節-区切:補文`.
    pub fn is_sentential_complement(&self) -> bool {
        self.clause_type() == Some("補文")
    }

    /// Relations whose modifier is this clause.
    pub fn discourse_relations(&self) -> &'a [DiscourseRelation] {
        match self.cohesion() {
            Some(cohesion) => cohesion.discourse_at(self.global_index()),
            None => &[],
        }
    }

    /// Resolve the head of a relation into a clause handle.
    pub fn relation_head(&self, relation: &DiscourseRelation) -> Option<ClauseRef<'a>> {
        self.clause_at(relation.head)
    }
}

impl<'a> Unit<'a> for ClauseRef<'a> {
    fn morphemes(&self) -> Vec<MorphemeRef<'a>> {
        ClauseRef::morphemes(self)
    }

    fn parent(&self) -> Option<Self> {
        ClauseRef::parent(self)
    }

    fn children(&self) -> Vec<Self> {
        ClauseRef::children(self)
    }
}
