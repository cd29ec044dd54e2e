#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Layered in-memory representation of Japanese text analyzed by Juman++ and KNP.
//!
//! A [`Document`] holds [`Sentence`]s, and each sentence holds one populated
//! layer: morphemes after Juman++, phrases after KNP, or clauses after KNP
//! with clause tags. The other layers are derived by composition.
//!
//! ```
//! use layered_knp::Document;
//!
//! let knp = "# S-ID:1\n\
//! * -1D\n\
//! + -1D\n\
//! 晴れ はれ 晴れ 名詞 6 普通名詞 1 * 0 * 0\n\
//! EOS\n";
//! let document = Document::from_knp(knp).unwrap();
//! assert_eq!(document.text(), "晴れ");
//! assert_eq!(document.to_knp().unwrap(), knp);
//! ```
//!
//! ## Modules
//!
//! - [`codec`] - Line-oriented Juman++ / KNP parsing and emission
//! - [`units`] - Documents, sentences, clauses, phrases, base phrases and morphemes
//! - [`props`] - Feature, semantics, NE, memo and discourse tag value objects
//! - [`cohesion`] - Predicate-argument structures, coreference and discourse relations
//! - [`reader`] - Streaming sentence / document chunking
//! - [`display`] - Dependency tree rendering
//! - [`errors`] - Error types

pub mod codec;
pub mod cohesion;
pub mod display;
pub mod errors;
pub mod props;
pub mod reader;
pub mod units;

pub use codec::SidFormat;
pub use cohesion::{
    Argument, ArgumentQuery, ArgumentType, DiscourseRelation, DiscourseRelationLabel,
    DiscourseRelationTag, EndophoraArgument, Entity, EntityManager, ExophoraArgument,
    ExophoraReferent, ExophoraReferentType, Pas, RelMode, RelTag, RelTagList,
};
pub use display::{sprint_tree, TreeDisplay};
pub use errors::{KnpError, KnpResult};
pub use props::{
    DepType, DiscourseAnnotation, FeatureDict, FeatureValue, MemoTag, NETag, NETagList,
    NamedEntity, NamedEntityCategory, SemanticsDict,
};
pub use reader::{chunk_by_document, chunk_by_sentence, DocIdFormat};
pub use units::{
    BasePhrase, BasePhraseId, BasePhraseRef, Clause, ClauseId, ClauseRef, DependencyUnit,
    Document, Layer, Morpheme, MorphemeRef, Node, Phrase, PhraseRef, Sentence, SentenceRef, Unit,
};

#[cfg(test)]
mod tests;
