use super::node::{BasePhraseRef, ClauseRef, MorphemeRef, PhraseRef, SentenceRef};
use super::{BasePhraseId, Node, Sentence};
use crate::codec::{self, is_comment_line};
use crate::cohesion::{Cohesion, Entity, EntityManager, Pas};
use crate::errors::KnpResult;
use crate::props::NamedEntity;
use crate::reader::chunk_by_sentence;

/// Where a sentence's units start in the document-wide numbering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Offsets {
    pub morphemes: usize,
    pub base_phrases: usize,
    pub phrases: usize,
    pub clauses: usize,
    pub chars: usize,
}

impl Offsets {
    fn compute(sentences: &[Sentence]) -> Vec<Offsets> {
        let mut running = Offsets::default();
        let mut offsets = Vec::with_capacity(sentences.len());
        for sentence in sentences {
            offsets.push(running);
            running.morphemes += sentence.morphemes.len();
            running.base_phrases += sentence.base_phrases.len();
            running.phrases += sentence.phrases.len();
            running.clauses += sentence.clauses.len();
            running.chars += sentence.char_len();
        }
        offsets
    }
}

/// An ordered collection of sentences sharing one entity space.
///
/// Constructing a document re-resolves coreference, predicate-argument
/// structures and discourse relations over all of its sentences.
#[derive(Debug, Clone, Default)]
pub struct Document {
    doc_id: Option<String>,
    pub(crate) sentences: Vec<Sentence>,
    /// Unsplit text, kept until a sentence splitter runs.
    raw_text: Option<String>,
    pub(crate) offsets: Vec<Offsets>,
    cohesion: Cohesion,
}

impl Document {
    /// A document that still needs sentence splitting.
    pub fn from_raw_text(text: &str) -> Document {
        Document {
            raw_text: Some(text.to_string()),
            ..Default::default()
        }
    }

    /// Adopt `sentences`, in order. Their standalone analyses are dropped
    /// and cohesion is resolved across the whole document.
    pub fn from_sentences(sentences: Vec<Sentence>) -> Document {
        let mut sentences = sentences;
        for (index, sentence) in sentences.iter_mut().enumerate() {
            sentence.index = index;
            sentence.standalone = None;
            sentence.reset_cache();
        }
        let doc_id = common_doc_id(&sentences);
        let offsets = Offsets::compute(&sentences);
        let cohesion = Cohesion::resolve(&sentences, true);
        Document {
            doc_id,
            sentences,
            raw_text: None,
            offsets,
            cohesion,
        }
    }

    /// One sentence per non-comment line; comment lines belong to the next sentence.
    pub fn from_line_by_line_text(text: &str) -> Document {
        let mut sentences = Vec::new();
        let mut pending: Vec<&str> = Vec::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if is_comment_line(line) {
                pending.push(line);
                continue;
            }
            let mut sentence = Sentence::from_raw_text(line);
            for comment in pending.drain(..) {
                sentence.set_comment(comment);
            }
            sentences.push(sentence);
        }
        if !pending.is_empty() {
            tracing::debug!("{} trailing comment line(s) dropped", pending.len());
        }
        Document::from_sentences(sentences)
    }

    pub fn from_jumanpp(text: &str) -> KnpResult<Document> {
        let mut sentences = Vec::new();
        for chunk in chunk_by_sentence(text.as_bytes()) {
            sentences.push(codec::parse_jumanpp(&chunk?)?);
        }
        Ok(Document::from_sentences(sentences))
    }

    pub fn from_knp(text: &str) -> KnpResult<Document> {
        let mut sentences = Vec::new();
        for chunk in chunk_by_sentence(text.as_bytes()) {
            sentences.push(codec::parse_knp(&chunk?)?);
        }
        Ok(Document::from_sentences(sentences))
    }

    /// Sentences as plain text, one per line, each preceded by its comment.
    pub fn to_raw_text(&self) -> String {
        if self.sentences.is_empty() {
            let text = self.raw_text.as_deref().unwrap_or("");
            return format!("{}\n", text.trim_end_matches('\n'));
        }
        self.sentences.iter().map(Sentence::to_raw_text).collect()
    }

    pub fn to_jumanpp(&self) -> KnpResult<String> {
        self.sentences.iter().map(Sentence::to_jumanpp).collect()
    }

    pub fn to_knp(&self) -> KnpResult<String> {
        self.sentences.iter().map(Sentence::to_knp).collect()
    }

    pub fn doc_id(&self) -> Option<&str> {
        self.doc_id.as_deref()
    }

    /// Set the document id on the document and every sentence.
    pub fn set_doc_id(&mut self, doc_id: impl Into<String>) {
        let doc_id = doc_id.into();
        for sentence in &mut self.sentences {
            sentence.doc_id = Some(doc_id.clone());
        }
        self.doc_id = Some(doc_id);
    }

    pub fn text(&self) -> String {
        if self.sentences.is_empty() {
            return self.raw_text.clone().unwrap_or_default();
        }
        self.sentences.iter().map(Sentence::text).collect()
    }

    pub fn is_senter_required(&self) -> bool {
        self.sentences.is_empty() && self.raw_text.is_some()
    }

    pub fn is_jumanpp_required(&self) -> bool {
        self.is_senter_required() || self.sentences.iter().any(Sentence::is_jumanpp_required)
    }

    pub fn is_knp_required(&self) -> bool {
        self.is_senter_required() || self.sentences.iter().any(Sentence::is_knp_required)
    }

    pub fn is_clause_tag_required(&self) -> bool {
        self.is_senter_required() || self.sentences.iter().any(Sentence::is_clause_tag_required)
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Give the sentences back, e.g. to run an analyzer over them.
    ///
    /// Cohesion lives on the document and is dropped here. The returned
    /// sentences answer entity and argument queries with nothing until
    /// [`from_sentences`](Self::from_sentences) resolves them again from the
    /// stored `<rel>` tags.
    pub fn into_sentences(self) -> Vec<Sentence> {
        self.sentences
    }

    pub fn sentence(&self, index: usize) -> Option<SentenceRef<'_>> {
        self.sentences
            .get(index)
            .map(|sentence| Node::new(Some(self), sentence, index, sentence))
    }

    pub fn sentences(&self) -> Vec<SentenceRef<'_>> {
        (0..self.sentences.len())
            .filter_map(|index| self.sentence(index))
            .collect()
    }

    /// Look up a base phrase by the address used in entities and arguments.
    pub fn base_phrase(&self, id: BasePhraseId) -> Option<BasePhraseRef<'_>> {
        let sentence = self.sentences.get(id.sentence)?;
        let base_phrase = sentence.base_phrases.get(id.index)?;
        Some(Node::new(Some(self), sentence, id.index, base_phrase))
    }

    pub fn morphemes(&self) -> KnpResult<Vec<MorphemeRef<'_>>> {
        self.flat_units(|sentence| sentence.morphemes())
    }

    pub fn base_phrases(&self) -> KnpResult<Vec<BasePhraseRef<'_>>> {
        self.flat_units(|sentence| sentence.base_phrases())
    }

    pub fn phrases(&self) -> KnpResult<Vec<PhraseRef<'_>>> {
        self.flat_units(|sentence| sentence.phrases())
    }

    pub fn clauses(&self) -> KnpResult<Vec<ClauseRef<'_>>> {
        self.flat_units(|sentence| sentence.clauses())
    }

    fn flat_units<'a, T>(
        &'a self,
        units: impl Fn(SentenceRef<'a>) -> KnpResult<Vec<T>>,
    ) -> KnpResult<Vec<T>> {
        let mut all = Vec::new();
        for sentence in self.sentences() {
            all.extend(units(sentence)?);
        }
        Ok(all)
    }

    /// The predicate-argument structure of every base phrase, in document order.
    pub fn pas_list(&self) -> &[Pas] {
        &self.cohesion.pas
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.cohesion.entities.iter()
    }

    pub fn entity_manager(&self) -> &EntityManager {
        &self.cohesion.entities
    }

    pub fn named_entities(&self) -> Vec<NamedEntity> {
        self.sentences()
            .iter()
            .flat_map(|sentence| sentence.named_entities())
            .collect()
    }

    pub(crate) fn cohesion(&self) -> &Cohesion {
        &self.cohesion
    }
}

/// The doc id every sentence agrees on, if any.
fn common_doc_id(sentences: &[Sentence]) -> Option<String> {
    let first = sentences.first()?.doc_id.clone()?;
    sentences
        .iter()
        .all(|sentence| sentence.doc_id.as_deref() == Some(first.as_str()))
        .then_some(first)
}
