use std::fmt;
use std::ops::Deref;

use super::{
    BasePhrase, BasePhraseId, Clause, ClauseId, Document, Morpheme, Offsets, Phrase, Sentence,
};
use crate::cohesion::Cohesion;
use crate::errors::{KnpError, KnpResult};
use crate::props::DepType;

/// A borrowed unit together with the sentence and document that contain it.
///
/// Nodes are cheap to copy. They dereference to the unit's data, so
/// `base_phrase.features` and `morpheme.surface` read straight through.
pub struct Node<'a, T> {
    document: Option<&'a Document>,
    sentence: &'a Sentence,
    index: usize,
    data: &'a T,
}

pub type MorphemeRef<'a> = Node<'a, Morpheme>;
pub type BasePhraseRef<'a> = Node<'a, BasePhrase>;
pub type PhraseRef<'a> = Node<'a, Phrase>;
pub type ClauseRef<'a> = Node<'a, Clause>;
pub type SentenceRef<'a> = Node<'a, Sentence>;

impl<'a, T> Clone for Node<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Node<'a, T> {}

impl<'a, T> Deref for Node<'a, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.data
    }
}

/// Identity, not structural equality: the same unit of the same sentence.
impl<'a, T> PartialEq for Node<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.sentence, other.sentence)
            && self.index == other.index
            && std::ptr::eq(self.data, other.data)
    }
}

impl<'a, T> Eq for Node<'a, T> {}

impl<'a, T: fmt::Debug> fmt::Debug for Node<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("sentence", &self.sentence.index)
            .field("index", &self.index)
            .field("data", self.data)
            .finish()
    }
}

impl<'a, T> Node<'a, T> {
    pub(crate) fn new(
        document: Option<&'a Document>,
        sentence: &'a Sentence,
        index: usize,
        data: &'a T,
    ) -> Self {
        Self {
            document,
            sentence,
            index,
            data,
        }
    }

    /// Index within the sentence (for a sentence: within the document).
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn data(&self) -> &'a T {
        self.data
    }

    pub fn sentence(&self) -> SentenceRef<'a> {
        Node::new(self.document, self.sentence, self.sentence.index, self.sentence)
    }

    /// The containing document; fails for units of a standalone sentence.
    pub fn document(&self) -> KnpResult<&'a Document> {
        self.document.ok_or(KnpError::NotAttached {
            unit: "sentence",
            container: "document",
        })
    }

    pub fn has_document(&self) -> bool {
        self.document.is_some()
    }

    pub(crate) fn sentence_data(&self) -> &'a Sentence {
        self.sentence
    }

    pub(crate) fn cohesion(&self) -> Option<&'a Cohesion> {
        match self.document {
            Some(document) => Some(document.cohesion()),
            None => self.sentence.standalone.as_deref(),
        }
    }

    pub(crate) fn offsets(&self) -> Option<&'a Offsets> {
        self.document
            .and_then(|document| document.offsets.get(self.sentence.index))
    }

    /// A sibling handle into the same sentence.
    pub(crate) fn sibling<U>(&self, index: usize, data: &'a U) -> Node<'a, U> {
        Node::new(self.document, self.sentence, index, data)
    }

    pub(crate) fn morpheme_at(&self, index: usize) -> Option<MorphemeRef<'a>> {
        self.sentence
            .morphemes
            .get(index)
            .map(|m| self.sibling(index, m))
    }

    pub(crate) fn base_phrase_in_sentence(&self, index: usize) -> Option<BasePhraseRef<'a>> {
        self.sentence
            .base_phrases
            .get(index)
            .map(|bp| self.sibling(index, bp))
    }

    pub(crate) fn phrase_in_sentence(&self, index: usize) -> Option<PhraseRef<'a>> {
        self.sentence
            .phrases
            .get(index)
            .map(|phrase| self.sibling(index, phrase))
    }

    pub(crate) fn clause_in_sentence(&self, index: usize) -> Option<ClauseRef<'a>> {
        self.sentence
            .clauses
            .get(index)
            .map(|clause| self.sibling(index, clause))
    }

    fn sentence_at(&self, index: usize) -> Option<(Option<&'a Document>, &'a Sentence)> {
        match self.document {
            Some(document) => document
                .sentences
                .get(index)
                .map(|sentence| (Some(document), sentence)),
            None if index == self.sentence.index => Some((None, self.sentence)),
            None => None,
        }
    }

    /// The sentences that cohesion ids index into: the document's, or just this one.
    pub(crate) fn sentences_in_scope(&self) -> &'a [Sentence] {
        match self.document {
            Some(document) => &document.sentences,
            None => std::slice::from_ref(self.sentence),
        }
    }

    /// Resolve a base phrase address against this node's document (or sentence).
    pub(crate) fn base_phrase_at(&self, id: BasePhraseId) -> Option<BasePhraseRef<'a>> {
        let (document, sentence) = self.sentence_at(id.sentence)?;
        let bp = sentence.base_phrases.get(id.index)?;
        Some(Node::new(document, sentence, id.index, bp))
    }

    /// Resolve a clause address against this node's document (or sentence).
    pub(crate) fn clause_at(&self, id: ClauseId) -> Option<ClauseRef<'a>> {
        let (document, sentence) = self.sentence_at(id.sentence)?;
        let clause = sentence.clauses.get(id.index)?;
        Some(Node::new(document, sentence, id.index, clause))
    }
}

/// Capabilities shared by the units above the morpheme.
pub trait Unit<'a>: Sized {
    /// Covered morphemes, in order.
    fn morphemes(&self) -> Vec<MorphemeRef<'a>>;

    /// The unit this one depends on, if any.
    fn parent(&self) -> Option<Self>;

    /// Units of the same layer that depend on this one.
    fn children(&self) -> Vec<Self>;

    fn text(&self) -> String {
        self.morphemes()
            .iter()
            .map(|morpheme| morpheme.surface.as_str())
            .collect()
    }
}

/// Units that carry an explicit dependency edge in KNP output.
pub trait DependencyUnit<'a>: Unit<'a> {
    fn parent_index(&self) -> Option<i32>;

    fn dep_type(&self) -> Option<DepType>;
}
