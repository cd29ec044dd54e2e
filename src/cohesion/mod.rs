//! Cohesion: predicate-argument structure, coreference and discourse.
//!
//! Annotations live as tags on base phrases ([`RelTagList`], `述語項構造`,
//! `格解析結果`, `談話関係`, `節-機能-*`). [`Cohesion`] resolves them into
//! entities, [`Pas`] values and [`DiscourseRelation`]s when a sentence or
//! document is built.

mod argument;
mod coreference;
mod discourse;
mod exophora;
mod pas;
mod rel;
mod resolver;

pub use argument::{Argument, ArgumentType, EndophoraArgument, ExophoraArgument};
pub use coreference::{Entity, EntityManager};
pub use discourse::{DiscourseRelation, DiscourseRelationLabel, DiscourseRelationTag};
pub use exophora::{ExophoraReferent, ExophoraReferentType};
pub use pas::{katakanize, normalize_case, ArgumentQuery, CaseInfoFormat, Pas};
pub use rel::{is_case_type, is_coref_type, RelMode, RelTag, RelTagList, CASE_TYPES, COREF_TYPES};
pub use resolver::Cohesion;
