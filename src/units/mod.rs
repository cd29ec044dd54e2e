//! The linguistic unit hierarchy.
//!
//! A [`Document`] owns its [`Sentence`]s and every sentence owns flat arenas of
//! morphemes, base phrases, phrases and clauses. Containment is expressed with
//! index ranges into those arenas, so only parents own their children.
//! Navigation goes through [`Node`] handles, which pair a borrowed unit with the
//! sentence (and, when attached, the document) it lives in.

mod base_phrase;
mod clause;
mod document;
mod morpheme;
mod node;
mod phrase;
mod sentence;

pub use base_phrase::BasePhrase;
pub use clause::Clause;
pub use document::Document;
pub use morpheme::Morpheme;
pub use node::{
    BasePhraseRef, ClauseRef, DependencyUnit, MorphemeRef, Node, PhraseRef, SentenceRef, Unit,
};
pub use phrase::Phrase;
pub use sentence::Sentence;

pub(crate) use document::Offsets;

/// The deepest analysis a sentence carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// Only text; a sentence splitter or Juman++ still has to run.
    RawText,
    /// Juman++ output.
    Morphemes,
    /// KNP output without clause tags.
    Phrases,
    /// KNP output with `節-区切` / `節-主辞`.
    Clauses,
}

impl Default for Layer {
    fn default() -> Self {
        Layer::RawText
    }
}

impl Layer {
    pub fn name(self) -> &'static str {
        match self {
            Layer::RawText => "raw text",
            Layer::Morphemes => "morpheme",
            Layer::Phrases => "phrase",
            Layer::Clauses => "clause",
        }
    }
}

/// Address of a base phrase: sentence position in its document plus sentence-local index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BasePhraseId {
    pub sentence: usize,
    pub index: usize,
}

/// Address of a clause: sentence position in its document plus sentence-local index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClauseId {
    pub sentence: usize,
    pub index: usize,
}
