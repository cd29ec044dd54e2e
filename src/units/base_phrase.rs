use std::collections::BTreeSet;
use std::ops::Range;

use super::node::{BasePhraseRef, ClauseRef, DependencyUnit, MorphemeRef, PhraseRef, Unit};
use super::BasePhraseId;
use crate::cohesion::{Argument, ArgumentQuery, Entity, Pas, RelTagList};
use crate::errors::{KnpError, KnpResult};
use crate::props::{DepType, DiscourseAnnotation, FeatureDict, MemoTag, NETagList};

/// 基本句: the unit rel tags, NE tags, PAS and coreference attach to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasePhrase {
    pub parent_index: Option<i32>,
    pub dep_type: Option<DepType>,
    pub features: FeatureDict,
    pub rel_tags: RelTagList,
    pub memo_tag: MemoTag,
    pub ne_tags: NETagList,
    pub discourse_annotation: DiscourseAnnotation,
    pub(crate) morpheme_range: Range<usize>,
    pub(crate) phrase_index: usize,
}

impl BasePhrase {
    /// Build a base phrase from the feature string of a `+` header.
    pub(crate) fn from_header(
        parent_index: Option<i32>,
        dep_type: Option<DepType>,
        fstring: &str,
        phrase_index: usize,
        first_morpheme: usize,
    ) -> Self {
        BasePhrase {
            parent_index,
            dep_type,
            features: FeatureDict::from_fstring(fstring),
            rel_tags: RelTagList::from_fstring(fstring),
            memo_tag: MemoTag::from_fstring(fstring),
            ne_tags: NETagList::from_fstring(fstring),
            discourse_annotation: DiscourseAnnotation::from_fstring(fstring),
            morpheme_range: first_morpheme..first_morpheme,
            phrase_index,
        }
    }

    /// Everything after the dependency part of the header.
    pub(crate) fn tag_string(&self) -> String {
        let mut out = self.rel_tags.to_fstring();
        if self.memo_tag.is_present() {
            out.push_str(&self.memo_tag.to_fstring());
        }
        out.push_str(&self.features.to_fstring());
        out.push_str(&self.ne_tags.to_fstring());
        out.push_str(&self.discourse_annotation.to_fstring());
        out
    }

    pub fn morpheme_count(&self) -> usize {
        self.morpheme_range.len()
    }
}

impl<'a> BasePhraseRef<'a> {
    pub fn id(&self) -> BasePhraseId {
        BasePhraseId {
            sentence: self.sentence_data().index,
            index: self.index(),
        }
    }

    /// Index among all base phrases of the document.
    pub fn global_index(&self) -> usize {
        self.offsets().map_or(0, |offsets| offsets.base_phrases) + self.index()
    }

    /// Covered morphemes, in order.
    pub fn morphemes(&self) -> Vec<MorphemeRef<'a>> {
        self.morpheme_range
            .clone()
            .filter_map(|i| self.morpheme_at(i))
            .collect()
    }

    pub fn text(&self) -> String {
        self.sentence_data().base_phrase_text(self.index())
    }

    /// The base phrase this one depends on; `None` for the root.
    pub fn parent(&self) -> Option<BasePhraseRef<'a>> {
        let parent = usize::try_from(self.parent_index?).ok()?;
        self.base_phrase_in_sentence(parent)
    }

    pub fn children(&self) -> Vec<BasePhraseRef<'a>> {
        self.sentence_data()
            .base_phrase_children(self.index())
            .iter()
            .filter_map(|&i| self.base_phrase_in_sentence(i))
            .collect()
    }

    /// The head morpheme: the last `準内容語`, else the first `内容語`,
    /// else the first morpheme.
    pub fn head(&self) -> Option<MorphemeRef<'a>> {
        let morphemes = self.morphemes();
        morphemes
            .iter()
            .rev()
            .find(|m| m.features.contains_key("準内容語"))
            .or_else(|| morphemes.iter().find(|m| m.features.contains_key("内容語")))
            .or_else(|| morphemes.first())
            .copied()
    }

    pub fn phrase(&self) -> KnpResult<PhraseRef<'a>> {
        self.phrase_in_sentence(self.phrase_index)
            .ok_or(KnpError::LayerNotAvailable {
                layer: "phrase",
                unit: "base phrase",
            })
    }

    pub fn clause(&self) -> KnpResult<ClauseRef<'a>> {
        self.sentence_data()
            .clause_of_base_phrase(self.index())
            .and_then(|index| self.clause_in_sentence(index))
            .ok_or(KnpError::LayerNotAvailable {
                layer: "clause",
                unit: "base phrase",
            })
    }

    pub fn is_clause_end(&self) -> bool {
        self.features.contains_key("節-区切")
    }

    pub fn is_clause_head(&self) -> bool {
        self.features.contains_key("節-主辞")
    }

    /// The predicate-argument structure rooted at this base phrase.
    pub fn pas(&self) -> Option<&'a Pas> {
        self.cohesion()?.pas_at(self.global_index())
    }

    /// Arguments of `case` for the PAS rooted here.
    ///
    /// Coreference expansion (`query.relax`) only applies inside a document;
    /// a standalone sentence returns its stored arguments.
    pub fn get_arguments(&self, case: &str, query: ArgumentQuery) -> Vec<Argument> {
        let query = query.with_relax(query.relax && self.has_document());
        match (self.cohesion(), self.pas()) {
            (Some(cohesion), Some(pas)) => {
                pas.get_arguments(case, query, &cohesion.entities, self.sentences_in_scope())
            }
            _ => Vec::new(),
        }
    }

    /// The base phrase an endophora argument points at.
    pub fn argument_base_phrase(&self, argument: &Argument) -> Option<BasePhraseRef<'a>> {
        self.base_phrase_at(argument.as_endophora()?.base_phrase)
    }

    fn entity_ids(&self, identical: bool, nonidentical: bool) -> BTreeSet<u32> {
        let cohesion = match self.cohesion() {
            Some(cohesion) => cohesion,
            None => return BTreeSet::new(),
        };
        let id = self.id();
        match (identical, nonidentical) {
            (true, true) => cohesion.entities.entities_all_of(id),
            (true, false) => cohesion.entities.entities_of(id),
            _ => cohesion.entities.entities_nonidentical_of(id),
        }
    }

    fn resolve_entities(&self, eids: BTreeSet<u32>) -> Vec<&'a Entity> {
        match self.cohesion() {
            Some(cohesion) => eids
                .into_iter()
                .filter_map(|eid| cohesion.entities.get(eid))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Entities this base phrase is an identical mention of.
    pub fn entities(&self) -> Vec<&'a Entity> {
        self.resolve_entities(self.entity_ids(true, false))
    }

    /// Entities this base phrase is a `≒` mention of.
    pub fn entities_nonidentical(&self) -> Vec<&'a Entity> {
        self.resolve_entities(self.entity_ids(false, true))
    }

    pub fn entities_all(&self) -> Vec<&'a Entity> {
        self.resolve_entities(self.entity_ids(true, true))
    }

    /// Base phrases sharing an entity with this one, in document order.
    pub fn get_coreferents(
        &self,
        include_nonidentical: bool,
        include_self: bool,
    ) -> Vec<BasePhraseRef<'a>> {
        let mut mentions: BTreeSet<BasePhraseId> = BTreeSet::new();
        for entity in self.entities() {
            mentions.extend(entity.mentions().iter().copied());
        }
        if include_nonidentical {
            for entity in self.entities_nonidentical() {
                mentions.extend(entity.mentions().iter().copied());
            }
        }
        if !include_self {
            mentions.remove(&self.id());
        }
        mentions
            .into_iter()
            .filter_map(|id| self.base_phrase_at(id))
            .collect()
    }
}

impl<'a> Unit<'a> for BasePhraseRef<'a> {
    fn morphemes(&self) -> Vec<MorphemeRef<'a>> {
        BasePhraseRef::morphemes(self)
    }

    fn parent(&self) -> Option<Self> {
        BasePhraseRef::parent(self)
    }

    fn children(&self) -> Vec<Self> {
        BasePhraseRef::children(self)
    }

    fn text(&self) -> String {
        BasePhraseRef::text(self)
    }
}

impl<'a> DependencyUnit<'a> for BasePhraseRef<'a> {
    fn parent_index(&self) -> Option<i32> {
        self.data().parent_index
    }

    fn dep_type(&self) -> Option<DepType> {
        self.data().dep_type
    }
}
