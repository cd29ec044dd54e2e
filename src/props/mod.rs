//! Value objects for the small tag sublanguages embedded in KNP lines.

mod dependency;
mod discourse;
mod feature;
mod memo;
mod named_entity;
mod semantics;

pub use dependency::DepType;
pub use discourse::{DiscourseAnnotation, DiscourseAnnotationItem};
pub use feature::{FeatureDict, FeatureValue};
pub use memo::MemoTag;
pub use named_entity::{NETag, NETagList, NamedEntity, NamedEntityCategory};
pub(crate) use named_entity::find_rightmost_span;
pub use semantics::SemanticsDict;
