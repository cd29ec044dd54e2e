use layered_knp::{Document, Sentence};
use once_cell::sync::OnceCell;

use crate::config::{AnalyzerConfig, ProcessorsConfig};
use crate::errors::ProcessorResult;
use crate::jumanpp::Jumanpp;
use crate::process::{AnalyzerProcess, Terminator};
use crate::processor::{inherit_ids, Processor};
use crate::senter::RegexSenter;

/// Dependency and case analysis with KNP.
///
/// Input that still lacks morphemes goes through Juman++ first. The Juman++
/// process is started on first use, so a KNP that only ever sees analyzed
/// input never needs Juman++ installed.
#[derive(Debug)]
pub struct Knp {
    process: AnalyzerProcess,
    jumanpp_config: AnalyzerConfig,
    jumanpp: OnceCell<Jumanpp>,
    senter: RegexSenter,
}

impl Knp {
    pub fn new(config: AnalyzerConfig, jumanpp: AnalyzerConfig) -> Self {
        Knp {
            process: AnalyzerProcess::new("knp", config, Terminator::Eos),
            jumanpp_config: jumanpp,
            jumanpp: OnceCell::new(),
            senter: RegexSenter,
        }
    }

    pub fn standard() -> Self {
        Self::from_config(&ProcessorsConfig::standard())
    }

    pub fn from_config(config: &ProcessorsConfig) -> Self {
        Self::new(config.knp.clone(), config.jumanpp.clone())
    }

    pub fn is_available(&self) -> bool {
        self.process.is_available()
    }

    fn jumanpp(&self) -> &Jumanpp {
        self.jumanpp
            .get_or_init(|| Jumanpp::new(self.jumanpp_config.clone()))
    }
}

impl Processor for Knp {
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
        let sentence = if sentence.is_jumanpp_required() {
            tracing::debug!("running jumanpp before knp");
            self.jumanpp().apply_to_sentence(sentence)?
        } else {
            sentence
        };
        let reply = self.process.communicate(&sentence.to_jumanpp()?)?;
        let mut analyzed = Sentence::from_knp(&reply)?;
        inherit_ids(&sentence, &mut analyzed);
        Ok(analyzed)
    }
}
