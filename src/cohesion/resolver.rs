//! Document-wide resolution of PAS, coreference and discourse relations.
//!
//! Resolution walks the base phrases in document order. For each base
//! phrase the case analysis string is read first, then its rel tags, so
//! entity ids are assigned in the order annotations appear.

use std::collections::BTreeSet;

use super::argument::{Argument, EndophoraArgument, ExophoraArgument};
use super::coreference::EntityManager;
use super::discourse::{DiscourseRelation, DiscourseRelationTag};
use super::exophora::ExophoraReferent;
use super::pas::{infer_argument_type, normalize_case, parse_pas_string, CaseInfoFormat, Pas};
use super::rel::{is_case_type, is_coref_type, RelMode, RelTag};
use crate::errors::{warn, KnpError};
use crate::units::{BasePhraseId, ClauseId, Sentence};

const CLAUSE_FUNCTION_PREFIX: &str = "節-機能-";
const BACKWARD_CLAUSE_FUNCTION_PREFIX: &str = "節-前向き機能-";

/// Everything resolved across a set of sentences: entities, one PAS per
/// base phrase and the discourse relations of each clause.
#[derive(Debug, Clone, Default)]
pub struct Cohesion {
    pub(crate) entities: EntityManager,
    pub(crate) pas: Vec<Pas>,
    pub(crate) discourse: Vec<Vec<DiscourseRelation>>,
}

impl Cohesion {
    /// Resolve `sentences`. Relations crossing sentence boundaries from the
    /// `節-前向き機能` features are only drawn when `in_document` is set.
    pub(crate) fn resolve(sentences: &[Sentence], in_document: bool) -> Cohesion {
        let mut resolver = Resolver::new(sentences);
        resolver.resolve_base_phrases();
        let discourse = resolve_discourse(sentences, in_document);
        Cohesion {
            entities: resolver.entities,
            pas: resolver.pas,
            discourse,
        }
    }

    pub fn entities(&self) -> &EntityManager {
        &self.entities
    }

    pub fn pas_list(&self) -> &[Pas] {
        &self.pas
    }

    pub(crate) fn pas_at(&self, global_index: usize) -> Option<&Pas> {
        self.pas.get(global_index)
    }

    pub(crate) fn discourse_at(&self, global_index: usize) -> &[DiscourseRelation] {
        self.discourse
            .get(global_index)
            .map_or(&[], Vec::as_slice)
    }
}

fn prefix_sums(counts: impl Iterator<Item = usize>) -> Vec<usize> {
    let mut total = 0;
    counts
        .map(|count| {
            let start = total;
            total += count;
            start
        })
        .collect()
}

struct Resolver<'s> {
    sentences: &'s [Sentence],
    base_phrase_offsets: Vec<usize>,
    entities: EntityManager,
    pas: Vec<Pas>,
}

impl<'s> Resolver<'s> {
    fn new(sentences: &'s [Sentence]) -> Self {
        let pas = sentences
            .iter()
            .enumerate()
            .flat_map(|(s, sentence)| {
                (0..sentence.base_phrases.len()).map(move |index| {
                    Pas::new(BasePhraseId {
                        sentence: s,
                        index,
                    })
                })
            })
            .collect();
        Resolver {
            sentences,
            base_phrase_offsets: prefix_sums(sentences.iter().map(|s| s.base_phrases.len())),
            entities: EntityManager::new(),
            pas,
        }
    }

    fn sid_of(&self, sentence: usize) -> String {
        self.sentences
            .get(sentence)
            .and_then(|s| s.sid.clone())
            .unwrap_or_default()
    }

    fn resolve_base_phrases(&mut self) {
        let sentences = self.sentences;
        for (s, sentence) in sentences.iter().enumerate() {
            for (index, base_phrase) in sentence.base_phrases.iter().enumerate() {
                let id = BasePhraseId { sentence: s, index };
                let global = self.base_phrase_offsets[s] + index;
                let case_info = base_phrase
                    .features
                    .get_str("述語項構造")
                    .map(|value| (value, CaseInfoFormat::Pas))
                    .or_else(|| {
                        base_phrase
                            .features
                            .get_str("格解析結果")
                            .map(|value| (value, CaseInfoFormat::Case))
                    });
                if let Some((value, format)) = case_info {
                    self.pas[global] =
                        parse_pas_string(id, value, format, sentences, &mut self.entities);
                }
                for rel_tag in base_phrase.rel_tags.iter() {
                    let mut rel_tag = rel_tag.clone();
                    if rel_tag.sid.as_deref() == Some("") && sentence.sid.is_some() {
                        rel_tag.sid = sentence.sid.clone();
                    }
                    if is_coref_type(&rel_tag.rel_type) {
                        if !matches!(rel_tag.mode, Some(RelMode::Or) | Some(RelMode::Ambiguous)) {
                            self.add_coreference(id, &rel_tag);
                        }
                    } else {
                        if !is_case_type(&rel_tag.rel_type) {
                            tracing::warn!("{}: unknown rel type found: {}", self.sid_of(s), rel_tag);
                        }
                        self.add_argument(id, global, &rel_tag);
                    }
                }
            }
        }
    }

    /// The base phrase a rel tag with a sid points at.
    fn target_of(&self, source: BasePhraseId, rel_tag: &RelTag) -> Option<BasePhraseId> {
        let sid = rel_tag.sid.as_deref()?;
        // an empty sid refers to the annotated sentence even when it has no id
        let found = if sid.is_empty() {
            self.sentences
                .get(source.sentence)
                .map(|sentence| (source.sentence, sentence))
        } else {
            self.sentences
                .iter()
                .enumerate()
                .find(|(_, sentence)| sentence.sid.as_deref() == Some(sid))
        };
        let (s, sentence) = match found {
            Some(found) => found,
            None => {
                warn(KnpError::IndexOutOfRange {
                    sid: self.sid_of(source.sentence),
                    message: format!("relation with unknown sid found: {}", sid),
                });
                return None;
            }
        };
        let index = match rel_tag.base_phrase_index {
            Some(index) if index < sentence.base_phrases.len() => index,
            other => {
                warn(KnpError::IndexOutOfRange {
                    sid: self.sid_of(source.sentence),
                    message: format!("base phrase index {:?} in {}", other, sid),
                });
                return None;
            }
        };
        let text = sentence.base_phrase_text(index);
        if !rel_tag.target.chars().any(|c| text.contains(c)) {
            warn(KnpError::SurfaceMismatch {
                sid: self.sid_of(source.sentence),
                expected: rel_tag.target.clone(),
                found: text,
            });
        }
        Some(BasePhraseId { sentence: s, index })
    }

    fn ensure_entity(&mut self, mention: BasePhraseId) {
        if self.entities.entities_of(mention).is_empty() {
            let eid = self.entities.get_or_create_entity(None, None);
            self.entities.add_mention(eid, mention, false);
        }
    }

    fn add_coreference(&mut self, source: BasePhraseId, rel_tag: &RelTag) {
        self.ensure_entity(source);
        let nonidentical = rel_tag.is_nonidentical();
        if rel_tag.sid.is_some() {
            let target = match self.target_of(source, rel_tag) {
                Some(target) => target,
                None => return,
            };
            if target == source {
                tracing::warn!("{}: coreference with self found", self.sid_of(source.sentence));
                return;
            }
            self.ensure_entity(target);
            let source_entities = self.entities.entities_all_of(source);
            let target_entities = self.entities.entities_all_of(target);
            for &source_eid in &source_entities {
                for &target_eid in &target_entities {
                    // merging deletes entities, so re-check both sides
                    if self.entities.entities_all_of(source).contains(&source_eid)
                        && self.entities.entities_all_of(target).contains(&target_eid)
                    {
                        self.entities.merge_entities(
                            source,
                            Some(target),
                            source_eid,
                            target_eid,
                            nonidentical,
                            &mut self.pas,
                        );
                    }
                }
            }
        } else {
            let referent = ExophoraReferent::new(&rel_tag.target);
            let target_eid = self.entities.get_or_create_entity(Some(referent), None);
            let source_entities: BTreeSet<u32> = self.entities.entities_all_of(source);
            for source_eid in source_entities {
                if self.entities.entities_all_of(source).contains(&source_eid)
                    && self.entities.contains(target_eid)
                {
                    self.entities.merge_entities(
                        source,
                        None,
                        source_eid,
                        target_eid,
                        nonidentical,
                        &mut self.pas,
                    );
                }
            }
        }
    }

    fn add_argument(&mut self, predicate: BasePhraseId, global: usize, rel_tag: &RelTag) {
        let case = normalize_case(&rel_tag.rel_type);
        let argument = if rel_tag.sid.is_some() {
            let target = match self.target_of(predicate, rel_tag) {
                Some(target) => target,
                None => return,
            };
            self.ensure_entity(target);
            Argument::Endophora(EndophoraArgument {
                arg_type: infer_argument_type(self.sentences, predicate, target, &case),
                case,
                base_phrase: target,
                optional: false,
            })
        } else if rel_tag.target == "なし" {
            self.pas[global].set_arguments_optional(&case);
            return;
        } else {
            let referent = ExophoraReferent::new(&rel_tag.target);
            let eid = self
                .entities
                .get_or_create_entity(Some(referent.clone()), None);
            Argument::Exophora(ExophoraArgument {
                case,
                exophora_referent: referent,
                eid,
                optional: false,
            })
        };
        self.pas[global].add_argument(argument, rel_tag.mode);
    }
}

/// Push a relation onto its modifier clause unless the same edge is there.
fn push_relation(
    discourse: &mut [Vec<DiscourseRelation>],
    clause_offsets: &[usize],
    relation: DiscourseRelation,
) {
    let global = clause_offsets[relation.modifier.sentence] + relation.modifier.index;
    if let Some(relations) = discourse.get_mut(global) {
        if !relations.iter().any(|r| r.same_edge(&relation)) {
            relations.push(relation);
        }
    }
}

/// A relation drawn from a clause-function feature. Backward tags swap
/// the two clauses; the sid names the modifier's sentence, or the head's
/// when `sid_from_head` is set.
fn explicit_relation(
    sentences: &[Sentence],
    tag: DiscourseRelationTag,
    modifier: ClauseId,
    head: ClauseId,
    sid_from_head: bool,
) -> Option<DiscourseRelation> {
    let (modifier, head) = if tag.need_swap() {
        (head, modifier)
    } else {
        (modifier, head)
    };
    let sid_sentence = if sid_from_head {
        head.sentence
    } else {
        modifier.sentence
    };
    let sid = sentences[sid_sentence].sid.clone().unwrap_or_default();
    let head_end = sentences[head.sentence].clause_end(head.index)?;
    Some(DiscourseRelation::new(sid, head_end, tag, modifier, head, true))
}

fn resolve_discourse(sentences: &[Sentence], in_document: bool) -> Vec<Vec<DiscourseRelation>> {
    let clause_offsets = prefix_sums(sentences.iter().map(|s| s.clauses.len()));
    let total: usize = sentences.iter().map(|s| s.clauses.len()).sum();
    let mut discourse = vec![Vec::new(); total];

    for (s, sentence) in sentences.iter().enumerate() {
        // explicit relations from the clause function of each clause end
        for c in 0..sentence.clauses.len() {
            let end = match sentence.clause_end(c) {
                Some(end) => end,
                None => continue,
            };
            let head = match sentence.clause_parent(c) {
                Some(head) => head,
                None => continue,
            };
            for key in sentence.base_phrases[end].features.keys() {
                let tag = match key
                    .strip_prefix(CLAUSE_FUNCTION_PREFIX)
                    .and_then(|label| label.parse::<DiscourseRelationTag>().ok())
                {
                    Some(tag) => tag,
                    None => continue,
                };
                let modifier = ClauseId { sentence: s, index: c };
                let head = ClauseId { sentence: s, index: head };
                if let Some(relation) = explicit_relation(sentences, tag, modifier, head, false) {
                    push_relation(&mut discourse, &clause_offsets, relation);
                }
            }
        }

        // explicit relations to the previous sentence from 節-前向き機能
        if in_document && s > 0 {
            let previous = &sentences[s - 1];
            if let Some(last) = previous.clauses.len().checked_sub(1) {
                for (b, base_phrase) in sentence.base_phrases.iter().enumerate() {
                    for key in base_phrase.features.keys() {
                        let tag = match key
                            .strip_prefix(BACKWARD_CLAUSE_FUNCTION_PREFIX)
                            .and_then(|label| label.parse::<DiscourseRelationTag>().ok())
                        {
                            Some(tag) => tag,
                            None => continue,
                        };
                        let anchor = base_phrase
                            .parent_index
                            .and_then(|p| usize::try_from(p).ok())
                            .unwrap_or(b);
                        let head = match sentence.clause_of_base_phrase(anchor) {
                            Some(head) => head,
                            None => continue,
                        };
                        let modifier = ClauseId { sentence: s - 1, index: last };
                        let head = ClauseId { sentence: s, index: head };
                        if let Some(relation) =
                            explicit_relation(sentences, tag, modifier, head, true)
                        {
                            push_relation(&mut discourse, &clause_offsets, relation);
                        }
                    }
                }
            }
        }

        // annotated relations from <談話関係:...>
        for c in 0..sentence.clauses.len() {
            let end = match sentence.clause_end(c) {
                Some(end) => end,
                None => continue,
            };
            for item in &sentence.base_phrases[end].discourse_annotation.values {
                let tag = match item.label.parse::<DiscourseRelationTag>() {
                    Ok(tag) => tag,
                    Err(err) => {
                        warn(err);
                        continue;
                    }
                };
                let found = sentences
                    .iter()
                    .enumerate()
                    .find(|(_, candidate)| candidate.sid.as_deref() == Some(item.sid.as_str()));
                let (head_s, head_sentence) = match found {
                    Some(found) => found,
                    None => {
                        warn(KnpError::IndexOutOfRange {
                            sid: sentence.sid.clone().unwrap_or_default(),
                            message: format!("{} not found", item.sid),
                        });
                        continue;
                    }
                };
                if item.base_phrase_index >= head_sentence.base_phrases.len() {
                    warn(KnpError::IndexOutOfRange {
                        sid: item.sid.clone(),
                        message: format!("base phrase index {}", item.base_phrase_index),
                    });
                    continue;
                }
                let head = match head_sentence.clause_of_base_phrase(item.base_phrase_index) {
                    Some(head) if head_sentence.clause_end(head) == Some(item.base_phrase_index) => {
                        head
                    }
                    _ => {
                        tracing::warn!("invalid clause tag in {}", item.sid);
                        continue;
                    }
                };
                let (modifier, head) = {
                    let modifier = ClauseId { sentence: s, index: c };
                    let head = ClauseId {
                        sentence: head_s,
                        index: head,
                    };
                    if tag.need_swap() {
                        (head, modifier)
                    } else {
                        (modifier, head)
                    }
                };
                let relation = DiscourseRelation::new(
                    item.sid.clone(),
                    item.base_phrase_index,
                    tag,
                    modifier,
                    head,
                    false,
                );
                push_relation(&mut discourse, &clause_offsets, relation);
            }
        }
    }
    discourse
}
