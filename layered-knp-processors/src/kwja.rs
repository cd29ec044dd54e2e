use layered_knp::codec::EOD;
use layered_knp::{Document, Sentence};

use crate::config::AnalyzerConfig;
use crate::errors::ProcessorResult;
use crate::process::{AnalyzerProcess, Terminator};
use crate::processor::Processor;

/// Whole-document analysis with KWJA.
///
/// KWJA splits and analyzes text on its own, so the document is sent as
/// one request closed by `EOD`. The reply is KNP format.
#[derive(Debug)]
pub struct Kwja {
    process: AnalyzerProcess,
}

impl Kwja {
    pub fn new(config: AnalyzerConfig) -> Self {
        Kwja {
            process: AnalyzerProcess::new("kwja", config, Terminator::Eod),
        }
    }

    pub fn standard() -> Self {
        Self::new(AnalyzerConfig::kwja())
    }

    pub fn is_available(&self) -> bool {
        self.process.is_available()
    }

    fn analyze(&self, text: &str) -> ProcessorResult<String> {
        let request = format!("{}\n{}\n", text.trim(), EOD);
        self.process.communicate(&request)
    }
}

impl Processor for Kwja {
    fn apply_to_document(&self, document: Document) -> ProcessorResult<Document> {
        let reply = self.analyze(&document.text())?;
        let mut analyzed = Document::from_knp(&reply)?;
        if let (None, Some(doc_id)) = (analyzed.doc_id(), document.doc_id()) {
            analyzed.set_doc_id(doc_id);
        }
        Ok(analyzed)
    }

    fn apply_to_sentence(&self, sentence: Sentence) -> ProcessorResult<Sentence> {
        let reply = self.analyze(&sentence.text())?;
        Ok(Sentence::from_knp(&reply)?)
    }
}
