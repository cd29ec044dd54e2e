//! Coreference entities and their per-document manager.
//!
//! Mentions are base phrases, addressed by [`BasePhraseId`]. The manager keeps
//! both directions of the mention/entity relation so that
//! `mention ∈ entity.mentions ⇔ entity ∈ entities_of(mention)` always holds.

use std::collections::{BTreeMap, BTreeSet};

use super::argument::Argument;
use super::exophora::ExophoraReferent;
use super::pas::Pas;
use crate::errors::{warn, KnpError};
use crate::units::BasePhraseId;

/// A coreference cluster, optionally bound to an exophoric referent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub eid: u32,
    pub exophora_referent: Option<ExophoraReferent>,
    mentions: BTreeSet<BasePhraseId>,
    mentions_nonidentical: BTreeSet<BasePhraseId>,
}

impl Entity {
    fn new(eid: u32, exophora_referent: Option<ExophoraReferent>) -> Self {
        Self {
            eid,
            exophora_referent,
            mentions: BTreeSet::new(),
            mentions_nonidentical: BTreeSet::new(),
        }
    }

    /// Mentions annotated as identical to this entity.
    pub fn mentions(&self) -> &BTreeSet<BasePhraseId> {
        &self.mentions
    }

    /// Mentions annotated with `≒`.
    pub fn mentions_nonidentical(&self) -> &BTreeSet<BasePhraseId> {
        &self.mentions_nonidentical
    }

    pub fn mentions_all(&self) -> BTreeSet<BasePhraseId> {
        self.mentions
            .union(&self.mentions_nonidentical)
            .copied()
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct MentionEntities {
    identical: BTreeSet<u32>,
    nonidentical: BTreeSet<u32>,
}

/// Owns every entity of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityManager {
    entities: BTreeMap<u32, Entity>,
    mention_entities: BTreeMap<BasePhraseId, MentionEntities>,
}

impl EntityManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, eid: u32) -> Option<&Entity> {
        self.entities.get(&eid)
    }

    pub fn contains(&self, eid: u32) -> bool {
        self.entities.contains_key(&eid)
    }

    /// Entities in ascending eid order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities the mention refers to identically.
    pub fn entities_of(&self, mention: BasePhraseId) -> BTreeSet<u32> {
        self.mention_entities
            .get(&mention)
            .map(|m| m.identical.clone())
            .unwrap_or_default()
    }

    /// Entities the mention refers to with `≒`.
    pub fn entities_nonidentical_of(&self, mention: BasePhraseId) -> BTreeSet<u32> {
        self.mention_entities
            .get(&mention)
            .map(|m| m.nonidentical.clone())
            .unwrap_or_default()
    }

    pub fn entities_all_of(&self, mention: BasePhraseId) -> BTreeSet<u32> {
        self.mention_entities
            .get(&mention)
            .map(|m| m.identical.union(&m.nonidentical).copied().collect())
            .unwrap_or_default()
    }

    fn next_eid(&self) -> u32 {
        self.entities.keys().next_back().map_or(0, |max| max + 1)
    }

    /// Return the entity for a singleton referent if one exists, otherwise create one.
    ///
    /// A requested eid that is already taken is reported and replaced by the
    /// next free id; a missing or negative eid is always auto-assigned.
    pub fn get_or_create_entity(
        &mut self,
        exophora_referent: Option<ExophoraReferent>,
        eid: Option<i64>,
    ) -> u32 {
        if let Some(referent) = &exophora_referent {
            if referent.is_singleton() {
                let existing = self
                    .entities
                    .values()
                    .find(|e| e.exophora_referent.as_ref() == Some(referent));
                if let Some(entity) = existing {
                    return entity.eid;
                }
            }
        }
        let requested = eid.and_then(|eid| u32::try_from(eid).ok());
        let eid = match requested {
            Some(requested) if self.entities.contains_key(&requested) => {
                let assigned = self.next_eid();
                warn(KnpError::DuplicateEid {
                    requested,
                    assigned,
                });
                assigned
            }
            Some(requested) => requested,
            None => self.next_eid(),
        };
        self.entities
            .insert(eid, Entity::new(eid, exophora_referent));
        eid
    }

    /// Attach a mention to an entity.
    ///
    /// An identical mention replaces a non-identical one; a non-identical
    /// mention never downgrades an existing attachment.
    pub fn add_mention(&mut self, eid: u32, mention: BasePhraseId, nonidentical: bool) {
        let entity = match self.entities.get_mut(&eid) {
            Some(entity) => entity,
            None => return,
        };
        let links = self.mention_entities.entry(mention).or_default();
        if nonidentical {
            if entity.mentions.contains(&mention) || entity.mentions_nonidentical.contains(&mention) {
                return;
            }
            entity.mentions_nonidentical.insert(mention);
            links.nonidentical.insert(eid);
        } else {
            if entity.mentions_nonidentical.remove(&mention) {
                links.nonidentical.remove(&eid);
            }
            entity.mentions.insert(mention);
            links.identical.insert(eid);
        }
    }

    pub fn remove_mention(&mut self, eid: u32, mention: BasePhraseId) {
        if let Some(entity) = self.entities.get_mut(&eid) {
            entity.mentions.remove(&mention);
            entity.mentions_nonidentical.remove(&mention);
        }
        if let Some(links) = self.mention_entities.get_mut(&mention) {
            links.identical.remove(&eid);
            links.nonidentical.remove(&eid);
            if links.identical.is_empty() && links.nonidentical.is_empty() {
                self.mention_entities.remove(&mention);
            }
        }
    }

    fn is_nonidentical(&self, mention: BasePhraseId, eid: u32) -> bool {
        self.mention_entities
            .get(&mention)
            .map_or(false, |links| links.nonidentical.contains(&eid))
    }

    /// Merge `target` into `source` after linking the two mentions.
    ///
    /// The target entity survives when any edge is non-identical or when the
    /// two entities are bound to different referents. Otherwise its mentions
    /// and referent move to `source`, exophora arguments in `pas_list` are
    /// re-pointed, and the target is deleted.
    pub fn merge_entities(
        &mut self,
        source_mention: BasePhraseId,
        target_mention: Option<BasePhraseId>,
        source_eid: u32,
        target_eid: u32,
        nonidentical: bool,
        pas_list: &mut [Pas],
    ) {
        if !self.contains(source_eid) || !self.contains(target_eid) {
            return;
        }
        let tgt_nonidentical =
            target_mention.map_or(false, |mention| self.is_nonidentical(mention, target_eid));
        let src_nonidentical = self.is_nonidentical(source_mention, source_eid);

        if source_eid == target_eid {
            if !nonidentical {
                // two identical sides of the triangle make the third identical
                if !src_nonidentical && tgt_nonidentical {
                    if let Some(mention) = target_mention {
                        self.add_mention(source_eid, mention, false);
                    }
                }
                if src_nonidentical && !tgt_nonidentical {
                    self.add_mention(source_eid, source_mention, false);
                }
            }
            return;
        }

        if let Some(mention) = target_mention {
            self.add_mention(source_eid, mention, nonidentical || src_nonidentical);
        }
        self.add_mention(target_eid, source_mention, nonidentical || tgt_nonidentical);

        if nonidentical || tgt_nonidentical || src_nonidentical {
            return;
        }
        let source_referent = self.entities[&source_eid].exophora_referent.clone();
        let target_referent = self.entities[&target_eid].exophora_referent.clone();
        if let (Some(source), Some(target)) = (&source_referent, &target_referent) {
            if source != target {
                return;
            }
        }

        if source_referent.is_none() {
            if let Some(entity) = self.entities.get_mut(&source_eid) {
                entity.exophora_referent = target_referent;
            }
        }
        for mention in self.entities[&target_eid].mentions_all() {
            let moved_nonidentical = self.is_nonidentical(mention, target_eid);
            self.add_mention(source_eid, mention, moved_nonidentical);
        }
        for pas in pas_list.iter_mut() {
            for argument in pas.arguments_mut() {
                if let Argument::Exophora(arg) = argument {
                    if arg.eid == target_eid {
                        arg.eid = source_eid;
                    }
                }
            }
        }
        self.delete_entity(target_eid);
    }

    /// Detach the entity from all its mentions and drop it. Eids may become sparse.
    pub fn delete_entity(&mut self, eid: u32) {
        let mentions = match self.entities.get(&eid) {
            Some(entity) => entity.mentions_all(),
            None => return,
        };
        for mention in mentions {
            self.remove_mention(eid, mention);
        }
        self.entities.remove(&eid);
    }
}
