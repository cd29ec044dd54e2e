use layered_knp::{Document, Sentence};

use crate::config::AnalyzerConfig;
use crate::errors::ProcessorResult;
use crate::process::{AnalyzerProcess, Terminator};
use crate::processor::{inherit_ids, Processor};
use crate::senter::RegexSenter;

/// Morphological analysis with Juman++.
///
/// Unsplit documents are split with [`RegexSenter`] first. Each sentence is
/// sent as plain text, preceded by its comment line, which Juman++ echoes.
#[derive(Debug)]
pub struct Jumanpp {
    process: AnalyzerProcess,
    senter: RegexSenter,
}

impl Jumanpp {
    pub fn new(config: AnalyzerConfig) -> Self {
        Jumanpp {
            process: AnalyzerProcess::new("jumanpp", config, Terminator::Eos),
            senter: RegexSenter,
        }
    }

    pub fn standard() -> Self {
        Self::new(AnalyzerConfig::jumanpp())
    }

    pub fn is_available(&self) -> bool {
        self.process.is_available()
    }
}

impl Processor for Jumanpp {
    fn apply_to_document(&self, document: Document) -> ProcessorResult<Document> {
        let document = self.senter.apply_to_document(document)?;
        let doc_id = document.doc_id().map(str::to_string);
        let sentences = document
            .into_sentences()
            .into_iter()
            .map(|sentence| self.apply_to_sentence(sentence))
            .collect::<ProcessorResult<Vec<_>>>()?;
        let mut document = Document::from_sentences(sentences);
        if let (None, Some(doc_id)) = (document.doc_id(), doc_id) {
            document.set_doc_id(doc_id);
        }
        Ok(document)
    }

    fn apply_to_sentence(&self, sentence: Sentence) -> ProcessorResult<Sentence> {
        let reply = self.process.communicate(&sentence.to_raw_text())?;
        let mut analyzed = Sentence::from_jumanpp(&reply)?;
        inherit_ids(&sentence, &mut analyzed);
        Ok(analyzed)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::errors::ProcessorError;
    use crate::testing::{missing, FakeAnalyzer, FAKE_JUMANPP};

    #[test]
    fn test_apply_to_text() {
        let fake = FakeAnalyzer::new(FAKE_JUMANPP);
        let jumanpp = Jumanpp::new(fake.config());
        let document = jumanpp.apply_to_text("晴れた。散歩した。").unwrap();
        assert_eq!(document.len(), 2);
        assert_eq!(document.morphemes().unwrap().len(), 2);
        assert!(!document.is_jumanpp_required());
        assert!(document.is_knp_required());
    }

    #[test]
    fn test_apply_to_sentence_keeps_ids() {
        let fake = FakeAnalyzer::new(FAKE_JUMANPP);
        let jumanpp = Jumanpp::new(fake.config());
        let sentence = Sentence::from_raw_text("# S-ID:w201106-0000060050-1\n天気");
        let analyzed = jumanpp.apply_to_sentence(sentence).unwrap();
        assert_eq!(analyzed.sid(), Some("w201106-0000060050-1"));
        assert_eq!(analyzed.text(), "天気");
    }

    #[test]
    fn test_document_id_survives() {
        let fake = FakeAnalyzer::new(FAKE_JUMANPP);
        let jumanpp = Jumanpp::new(fake.config());
        let mut document = Document::from_raw_text("晴れた。");
        document.set_doc_id("doc");
        let document = jumanpp.apply_to_document(document).unwrap();
        assert_eq!(document.doc_id(), Some("doc"));
        assert_eq!(document.sentences()[0].sid(), Some("doc-0"));
    }

    #[test]
    fn test_missing_executable() {
        let jumanpp = Jumanpp::new(missing());
        assert!(!jumanpp.is_available());
        let err = jumanpp.apply_to_text("晴れた。").unwrap_err();
        assert!(matches!(err, ProcessorError::AnalyzerUnavailable { .. }));
    }
}
