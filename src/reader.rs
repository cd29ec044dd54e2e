//! Streaming chunkers that split analyzer output into sentences or documents.
//!
//! Both chunkers read line by line and never hold more than one chunk.

use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use crate::codec::{parse_comment, SidFormat, EOS};
use crate::errors::{KnpError, KnpResult};

/// How [`chunk_by_document`] derives a document id from the first line of a sentence.
#[derive(Clone, Copy)]
pub enum DocIdFormat {
    /// `<doc>-<n>`.
    Default,
    /// KWDLC sentence ids, e.g. `w201106-0000060050-1`.
    Kwdlc,
    /// WAC sentence ids, e.g. `wiki00100176-00`.
    Wac,
    /// A caller-supplied extractor over the first line of the chunk.
    Custom(fn(&str) -> Option<String>),
}

impl Default for DocIdFormat {
    fn default() -> Self {
        DocIdFormat::Default
    }
}

impl fmt::Debug for DocIdFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocIdFormat::Default => f.write_str("Default"),
            DocIdFormat::Kwdlc => f.write_str("Kwdlc"),
            DocIdFormat::Wac => f.write_str("Wac"),
            DocIdFormat::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl FromStr for DocIdFormat {
    type Err = KnpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(DocIdFormat::Default),
            "kwdlc" => Ok(DocIdFormat::Kwdlc),
            "wac" => Ok(DocIdFormat::Wac),
            _ => Err(KnpError::UnknownLabel {
                kind: "doc id format",
                label: s.to_string(),
            }),
        }
    }
}

impl DocIdFormat {
    /// The document id announced by `line`, if it is an S-ID comment this format understands.
    pub fn extract(self, line: &str) -> Option<String> {
        let sid_format = match self {
            DocIdFormat::Custom(extract) => return extract(line),
            DocIdFormat::Default => SidFormat::Default,
            DocIdFormat::Kwdlc => SidFormat::Kwdlc,
            DocIdFormat::Wac => SidFormat::Wac,
        };
        if !line.starts_with("# S-ID:") {
            return None;
        }
        let sid = parse_comment(line).sid?;
        let doc_id = sid_format.doc_id(&sid);
        if doc_id.is_none() {
            tracing::warn!("invalid S-ID: {:?}", sid);
        }
        doc_id
    }
}

/// Iterator returned by [`chunk_by_sentence`].
pub struct SentenceChunks<R> {
    reader: R,
    buffer: String,
    done: bool,
}

impl<R: BufRead> Iterator for SentenceChunks<R> {
    type Item = KnpResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    self.done = true;
                    if self.buffer.is_empty() {
                        return None;
                    }
                    return Some(Ok(std::mem::take(&mut self.buffer)));
                }
                Ok(_) => {}
                Err(err) => {
                    self.done = true;
                    return Some(Err(err.into()));
                }
            }
            if line.trim().is_empty() {
                continue;
            }
            self.buffer.push_str(&line);
            if line.trim_end_matches(['\n', '\r']) == EOS {
                return Some(Ok(std::mem::take(&mut self.buffer)));
            }
        }
    }
}

/// Split a stream into sentence chunks, each ending with its own `EOS` line.
///
/// Blank lines are dropped. Lines after the last `EOS` form a final chunk.
pub fn chunk_by_sentence<R: BufRead>(reader: R) -> SentenceChunks<R> {
    SentenceChunks {
        reader,
        buffer: String::new(),
        done: false,
    }
}

/// Iterator returned by [`chunk_by_document`].
pub struct DocumentChunks<R> {
    sentences: SentenceChunks<R>,
    format: DocIdFormat,
    buffer: String,
    prev_doc_id: Option<String>,
}

impl<R: BufRead> Iterator for DocumentChunks<R> {
    type Item = KnpResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        for sentence in self.sentences.by_ref() {
            let sentence = match sentence {
                Ok(sentence) => sentence,
                Err(err) => return Some(Err(err)),
            };
            let first_line = sentence.lines().next().unwrap_or("");
            let doc_id = self.format.extract(first_line);
            let boundary = doc_id.is_none() || doc_id != self.prev_doc_id;
            let finished = if !self.buffer.is_empty() && boundary {
                Some(std::mem::take(&mut self.buffer))
            } else {
                None
            };
            self.buffer.push_str(&sentence);
            self.prev_doc_id = doc_id;
            if finished.is_some() {
                return finished.map(Ok);
            }
        }
        if self.buffer.is_empty() {
            None
        } else {
            Some(Ok(std::mem::take(&mut self.buffer)))
        }
    }
}

/// Group consecutive sentence chunks that share a document id.
///
/// A sentence whose document id cannot be determined starts a new document.
pub fn chunk_by_document<R: BufRead>(reader: R, format: DocIdFormat) -> DocumentChunks<R> {
    DocumentChunks {
        sentences: chunk_by_sentence(reader),
        format,
        buffer: String::new(),
        prev_doc_id: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Write};

    fn sentences(text: &str) -> Vec<String> {
        chunk_by_sentence(text.as_bytes())
            .collect::<KnpResult<Vec<_>>>()
            .unwrap()
    }

    fn documents(text: &str, format: DocIdFormat) -> Vec<String> {
        chunk_by_document(text.as_bytes(), format)
            .collect::<KnpResult<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_chunk_by_sentence() {
        let text = "# S-ID:1-1\nEOS\n\n# S-ID:1-2\nEOS\n";
        assert_eq!(
            sentences(text),
            vec!["# S-ID:1-1\nEOS\n", "# S-ID:1-2\nEOS\n"]
        );
    }

    #[test]
    fn test_trailing_lines_form_a_chunk() {
        let text = "# S-ID:1-1\nEOS\n# S-ID:1-2\n";
        assert_eq!(sentences(text), vec!["# S-ID:1-1\nEOS\n", "# S-ID:1-2\n"]);
        assert!(sentences("").is_empty());
    }

    #[test]
    fn test_chunk_by_document_default() {
        let text = "# S-ID:1-1\nEOS\n# S-ID:1-2\nEOS\n# S-ID:2-1\nEOS\n";
        assert_eq!(
            documents(text, DocIdFormat::Default),
            vec!["# S-ID:1-1\nEOS\n# S-ID:1-2\nEOS\n", "# S-ID:2-1\nEOS\n"]
        );
    }

    #[test]
    fn test_bare_sids_share_a_document() {
        let text = "# S-ID:1\nEOS\n# S-ID:1\nEOS\n# S-ID:2\nEOS\n";
        assert_eq!(
            documents(text, DocIdFormat::Default),
            vec!["# S-ID:1\nEOS\n# S-ID:1\nEOS\n", "# S-ID:2\nEOS\n"]
        );
    }

    #[test]
    fn test_chunk_by_document_kwdlc() {
        let text = "# S-ID:w201106-0000060050-1\nEOS\n\
# S-ID:w201106-0000060050-2\nEOS\n\
# S-ID:w201106-0000060877-1\nEOS\n";
        let chunks = documents(text, "kwdlc".parse().unwrap());
        assert_eq!(chunks.len(), 2);
        assert_eq!(
            chunks[0],
            "# S-ID:w201106-0000060050-1\nEOS\n# S-ID:w201106-0000060050-2\nEOS\n"
        );
        assert_eq!(chunks[1], "# S-ID:w201106-0000060877-1\nEOS\n");
    }

    #[test]
    fn test_chunk_by_document_wac() {
        let text = "# S-ID:wiki00100176-00\nEOS\n# S-ID:wiki00100176-01\nEOS\n";
        assert_eq!(documents(text, DocIdFormat::Wac).len(), 1);
    }

    #[test]
    fn test_chunk_by_document_custom() {
        fn prefix(line: &str) -> Option<String> {
            line.trim_start_matches("# ")
                .split('-')
                .next()
                .map(str::to_string)
        }
        let text = "# 1-1\nEOS\n# 1-2\nEOS\n# 2-1\nEOS\n";
        assert_eq!(
            documents(text, DocIdFormat::Custom(prefix)),
            vec!["# 1-1\nEOS\n# 1-2\nEOS\n", "# 2-1\nEOS\n"]
        );
    }

    #[test]
    fn test_missing_doc_id_starts_a_document() {
        let text = "# 1-1\nEOS\n# 1-2\nEOS\n";
        assert_eq!(
            documents(text, DocIdFormat::Default),
            vec!["# 1-1\nEOS\n", "# 1-2\nEOS\n"]
        );
    }

    #[test]
    fn test_unknown_format() {
        assert!("jumanpp".parse::<DocIdFormat>().is_err());
    }

    #[test]
    fn test_chunk_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "# S-ID:a-1\nEOS\n# S-ID:a-2\nEOS\n").unwrap();
        let reader = BufReader::new(file.reopen().unwrap());
        let chunks: Vec<String> = chunk_by_document(reader, DocIdFormat::Default)
            .collect::<KnpResult<_>>()
            .unwrap();
        assert_eq!(chunks, vec!["# S-ID:a-1\nEOS\n# S-ID:a-2\nEOS\n"]);
    }
}
