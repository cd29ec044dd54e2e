use once_cell::sync::OnceCell;

use super::node::{BasePhraseRef, ClauseRef, MorphemeRef, PhraseRef, SentenceRef};
use super::{BasePhrase, Clause, Layer, Morpheme, Node, Phrase};
use crate::codec;
use crate::cohesion::Cohesion;
use crate::errors::{warn, KnpError, KnpResult};
use crate::props::{find_rightmost_span, NamedEntity};

/// Lazily computed views over a sentence's arenas.
#[derive(Debug, Clone, Default)]
pub(crate) struct SentenceCache {
    char_offsets: OnceCell<Vec<usize>>,
    base_phrase_children: OnceCell<Vec<Vec<usize>>>,
    phrase_children: OnceCell<Vec<Vec<usize>>>,
    clause_children: OnceCell<Vec<Vec<usize>>>,
}

/// One sentence and whatever analysis layer it carries.
///
/// Morphemes, base phrases, phrases and clauses are stored flat; each
/// higher unit refers to a contiguous range of the layer below it.
#[derive(Debug, Clone, Default)]
pub struct Sentence {
    pub(crate) sid: Option<String>,
    pub(crate) doc_id: Option<String>,
    /// Comment text other than the S-ID.
    pub misc_comment: String,
    pub(crate) raw_text: Option<String>,
    pub(crate) layer: Layer,
    pub(crate) morphemes: Vec<Morpheme>,
    pub(crate) base_phrases: Vec<BasePhrase>,
    pub(crate) phrases: Vec<Phrase>,
    pub(crate) clauses: Vec<Clause>,
    /// Position in the document; 0 when standalone.
    pub(crate) index: usize,
    /// Cohesion resolved over this sentence alone, when it is not in a document.
    pub(crate) standalone: Option<Box<Cohesion>>,
    pub(crate) cache: SentenceCache,
}

impl Sentence {
    /// A sentence of raw text. `#` comment lines set the sid and comment.
    pub fn from_raw_text(text: &str) -> Sentence {
        codec::parse_raw_text(text)
    }

    /// Parse one Juman++ sentence block.
    pub fn from_jumanpp(text: &str) -> KnpResult<Sentence> {
        codec::parse_jumanpp(text)
    }

    /// Parse one KNP sentence block and resolve its cohesion on its own.
    pub fn from_knp(text: &str) -> KnpResult<Sentence> {
        let mut sentence = codec::parse_knp(text)?;
        let cohesion = Cohesion::resolve(std::slice::from_ref(&sentence), false);
        sentence.standalone = Some(Box::new(cohesion));
        Ok(sentence)
    }

    pub fn to_raw_text(&self) -> String {
        codec::emit_raw_text(self)
    }

    pub fn to_jumanpp(&self) -> KnpResult<String> {
        codec::emit_jumanpp(self)
    }

    pub fn to_knp(&self) -> KnpResult<String> {
        codec::emit_knp(self)
    }

    pub fn sid(&self) -> Option<&str> {
        self.sid.as_deref()
    }

    pub fn set_sid(&mut self, sid: impl Into<String>) {
        self.sid = Some(sid.into());
    }

    pub fn doc_id(&self) -> Option<&str> {
        self.doc_id.as_deref()
    }

    pub fn set_doc_id(&mut self, doc_id: impl Into<String>) {
        self.doc_id = Some(doc_id.into());
    }

    /// The comment line this sentence serializes with, without a newline.
    ///
    /// The line is rebuilt from [`sid`](Self::sid) and
    /// [`misc_comment`](Self::misc_comment) rather than kept verbatim:
    /// `# S-ID: x` comes back as `# S-ID:x`, `#memo` as `# memo`, and
    /// several comment lines collapse into one.
    pub fn comment(&self) -> Option<String> {
        codec::format_comment(self.sid.as_deref(), &self.misc_comment)
    }

    /// Read a comment line. The first S-ID sets sid and doc_id; everything
    /// else accumulates in [`misc_comment`](Self::misc_comment).
    pub fn set_comment(&mut self, line: &str) {
        let comment = codec::parse_comment(line);
        if comment.sid.is_some() && self.sid.is_none() {
            self.sid = comment.sid;
            if comment.doc_id.is_some() {
                self.doc_id = comment.doc_id;
            }
        } else if let Some(sid) = comment.sid {
            // a second S-ID line is kept verbatim
            self.push_misc(&format!("S-ID:{}", sid));
        }
        self.push_misc(&comment.misc);
    }

    fn push_misc(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.misc_comment.is_empty() {
            self.misc_comment.push(' ');
        }
        self.misc_comment.push_str(text);
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> String {
        match (&self.raw_text, self.layer) {
            (Some(text), Layer::RawText) => text.clone(),
            _ => self.morphemes.iter().map(|m| m.surface.as_str()).collect(),
        }
    }

    pub fn is_jumanpp_required(&self) -> bool {
        self.layer < Layer::Morphemes
    }

    pub fn is_knp_required(&self) -> bool {
        self.layer < Layer::Phrases
    }

    pub fn is_clause_tag_required(&self) -> bool {
        self.layer < Layer::Clauses
    }

    /// A handle for navigating this sentence on its own.
    pub fn as_node(&self) -> SentenceRef<'_> {
        Node::new(None, self, self.index, self)
    }

    pub fn morphemes(&self) -> KnpResult<Vec<MorphemeRef<'_>>> {
        self.as_node().morphemes()
    }

    pub fn base_phrases(&self) -> KnpResult<Vec<BasePhraseRef<'_>>> {
        self.as_node().base_phrases()
    }

    pub fn phrases(&self) -> KnpResult<Vec<PhraseRef<'_>>> {
        self.as_node().phrases()
    }

    pub fn clauses(&self) -> KnpResult<Vec<ClauseRef<'_>>> {
        self.as_node().clauses()
    }

    pub fn named_entities(&self) -> Vec<NamedEntity> {
        self.as_node().named_entities()
    }

    pub(crate) fn require(&self, layer: Layer, unit: &'static str) -> KnpResult<()> {
        if self.layer < layer {
            return Err(KnpError::LayerNotAvailable {
                layer: layer.name(),
                unit,
            });
        }
        Ok(())
    }

    pub(crate) fn char_offset(&self, morpheme: usize) -> usize {
        let offsets = self.cache.char_offsets.get_or_init(|| {
            let mut offsets = Vec::with_capacity(self.morphemes.len() + 1);
            let mut total = 0;
            offsets.push(0);
            for m in &self.morphemes {
                total += m.char_len();
                offsets.push(total);
            }
            offsets
        });
        offsets.get(morpheme).copied().unwrap_or_default()
    }

    pub(crate) fn char_len(&self) -> usize {
        self.text().chars().count()
    }

    pub(crate) fn base_phrase_of_morpheme(&self, morpheme: usize) -> Option<usize> {
        let index = self
            .base_phrases
            .partition_point(|bp| bp.morpheme_range.end <= morpheme);
        self.base_phrases
            .get(index)
            .filter(|bp| bp.morpheme_range.contains(&morpheme))
            .map(|_| index)
    }

    /// Text of a base phrase, used when checking annotated surfaces.
    pub(crate) fn base_phrase_text(&self, index: usize) -> String {
        self.base_phrases
            .get(index)
            .map(|bp| {
                self.morphemes[bp.morpheme_range.clone()]
                    .iter()
                    .map(|m| m.surface.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn base_phrase_children(&self, index: usize) -> &[usize] {
        let children = self
            .cache
            .base_phrase_children
            .get_or_init(|| children_of(self.base_phrases.iter().map(|bp| bp.parent_index)));
        children.get(index).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn phrase_children(&self, index: usize) -> &[usize] {
        let children = self
            .cache
            .phrase_children
            .get_or_init(|| children_of(self.phrases.iter().map(|phrase| phrase.parent_index)));
        children.get(index).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn clause_children(&self, index: usize) -> &[usize] {
        let children = self.cache.clause_children.get_or_init(|| {
            let parents: Vec<Option<i32>> = (0..self.clauses.len())
                .map(|i| self.clause_parent(i).map(|p| p as i32))
                .collect();
            children_of(parents.into_iter())
        });
        children.get(index).map_or(&[], Vec::as_slice)
    }

    /// Index of the base phrase that ends clause `index`.
    pub(crate) fn clause_end(&self, index: usize) -> Option<usize> {
        let clause = self.clauses.get(index)?;
        let range = self.clause_base_phrases(clause);
        range
            .clone()
            .rev()
            .find(|&i| self.base_phrases[i].features.contains_key("節-区切"))
            .or_else(|| range.clone().last())
    }

    pub(crate) fn clause_base_phrases(&self, clause: &Clause) -> std::ops::Range<usize> {
        let start = self
            .phrases
            .get(clause.phrase_range.start)
            .map_or(0, |p| p.base_phrase_range.start);
        let end = clause
            .phrase_range
            .end
            .checked_sub(1)
            .and_then(|last| self.phrases.get(last))
            .map_or(start, |p| p.base_phrase_range.end);
        start..end
    }

    /// Index of the clause containing a base phrase.
    pub(crate) fn clause_of_base_phrase(&self, base_phrase: usize) -> Option<usize> {
        let phrase = self.base_phrases.get(base_phrase)?.phrase_index;
        self.phrases.get(phrase)?.clause_index
    }

    pub(crate) fn clause_parent(&self, index: usize) -> Option<usize> {
        let end = self.clause_end(index)?;
        let parent = self.base_phrases[end].parent_index?;
        let parent = usize::try_from(parent).ok()?;
        self.clause_of_base_phrase(parent)
    }

    pub(crate) fn reset_cache(&mut self) {
        self.cache = SentenceCache::default();
    }
}

fn children_of(parents: impl Iterator<Item = Option<i32>>) -> Vec<Vec<usize>> {
    let parents: Vec<Option<i32>> = parents.collect();
    let mut children = vec![Vec::new(); parents.len()];
    for (child, parent) in parents.iter().enumerate() {
        if let Some(parent) = parent.and_then(|p| usize::try_from(p).ok()) {
            if let Some(slot) = children.get_mut(parent) {
                slot.push(child);
            }
        }
    }
    children
}

impl<'a> SentenceRef<'a> {
    pub fn global_index(&self) -> usize {
        self.index()
    }

    pub fn morphemes(&self) -> KnpResult<Vec<MorphemeRef<'a>>> {
        let sentence = self.data();
        sentence.require(Layer::Morphemes, "sentence")?;
        Ok(sentence
            .morphemes
            .iter()
            .enumerate()
            .map(|(i, m)| self.sibling(i, m))
            .collect())
    }

    pub fn base_phrases(&self) -> KnpResult<Vec<BasePhraseRef<'a>>> {
        let sentence = self.data();
        sentence.require(Layer::Phrases, "sentence")?;
        Ok(sentence
            .base_phrases
            .iter()
            .enumerate()
            .map(|(i, bp)| self.sibling(i, bp))
            .collect())
    }

    pub fn phrases(&self) -> KnpResult<Vec<PhraseRef<'a>>> {
        let sentence = self.data();
        sentence.require(Layer::Phrases, "sentence")?;
        Ok(sentence
            .phrases
            .iter()
            .enumerate()
            .map(|(i, phrase)| self.sibling(i, phrase))
            .collect())
    }

    pub fn clauses(&self) -> KnpResult<Vec<ClauseRef<'a>>> {
        let sentence = self.data();
        sentence.require(Layer::Clauses, "sentence")?;
        Ok(sentence
            .clauses
            .iter()
            .enumerate()
            .map(|(i, clause)| self.sibling(i, clause))
            .collect())
    }

    /// Named entities resolved from the NE tags of each base phrase.
    ///
    /// A tag names the span ending at or before the end of its base phrase;
    /// the rightmost matching run of morphemes is taken.
    pub fn named_entities(&self) -> Vec<NamedEntity> {
        let sentence = self.data();
        let surfaces: Vec<&str> = sentence.morphemes.iter().map(|m| m.surface.as_str()).collect();
        let mut entities = Vec::new();
        for bp in &sentence.base_phrases {
            for tag in bp.ne_tags.iter() {
                match find_rightmost_span(&surfaces, bp.morpheme_range.end, &tag.name) {
                    Some(span) => entities.push(NamedEntity {
                        category: tag.category,
                        sentence: sentence.index,
                        morphemes: span,
                        text: tag.name.clone(),
                    }),
                    None => warn(KnpError::SurfaceMismatch {
                        sid: sentence.sid.clone().unwrap_or_default(),
                        expected: tag.name.clone(),
                        found: surfaces[..bp.morpheme_range.end].concat(),
                    }),
                }
            }
        }
        entities
    }
}
