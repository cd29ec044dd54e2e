use layered_knp::{Document, Sentence};

use crate::errors::ProcessorResult;

/// A stage that turns a document or sentence into a more analyzed one.
pub trait Processor {
    fn apply_to_document(&self, document: Document) -> ProcessorResult<Document>;

    fn apply_to_sentence(&self, sentence: Sentence) -> ProcessorResult<Sentence>;

    /// Analyze unsplit text.
    fn apply_to_text(&self, text: &str) -> ProcessorResult<Document> {
        self.apply_to_document(Document::from_raw_text(text))
    }
}

/// Keep the ids of `source` on an analyzer's reply that dropped them.
pub(crate) fn inherit_ids(source: &Sentence, analyzed: &mut Sentence) {
    if analyzed.sid().is_none() {
        if let Some(sid) = source.sid() {
            analyzed.set_sid(sid);
        }
    }
    if analyzed.doc_id().is_none() {
        if let Some(doc_id) = source.doc_id() {
            analyzed.set_doc_id(doc_id);
        }
    }
    if analyzed.misc_comment.is_empty() {
        analyzed.misc_comment = source.misc_comment.clone();
    }
}
