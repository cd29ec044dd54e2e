//! Rule-based sentence splitting.

use std::collections::VecDeque;

use layered_knp::{Document, Sentence};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ProcessorResult;
use crate::processor::Processor;

/// Characters that end a sentence.
pub const PERIODS: &str = "。．？！♪☆★…?!";

static CANDIDATE_PAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("[^{p}]*[{p}]|[^{p}]*$", p = PERIODS)).expect("valid candidate pattern")
});

/// Splits at periods, keeping bracketed and quoted spans together.
///
/// ```
/// use layered_knp_processors::{Processor, RegexSenter};
///
/// let document = RegexSenter.apply_to_text("天気が良かったので散歩した。途中で先生に会った。").unwrap();
/// assert_eq!(document.len(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexSenter;

impl RegexSenter {
    pub fn split(&self, text: &str) -> Vec<String> {
        let mut candidates = Vec::new();
        for line in text.split('\n') {
            let line = format!("{}\n", line);
            candidates.extend(CANDIDATE_PAT.find_iter(&line).map(|m| m.as_str().to_string()));
        }
        let candidates = merge_single_periods(candidates);
        let candidates = merge_brackets(candidates);
        candidates
            .iter()
            .map(|candidate| candidate.trim())
            .filter(|candidate| !candidate.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn is_single_period(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if PERIODS.contains(c))
}

/// `？？？` is one sentence end, not three sentences.
fn merge_single_periods(candidates: Vec<String>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for candidate in candidates {
        match merged.last_mut() {
            Some(last) if is_single_period(&candidate) => last.push_str(&candidate),
            _ => merged.push(candidate),
        }
    }
    merged
}

fn count(text: &str, chars: &[char]) -> i64 {
    text.chars().filter(|c| chars.contains(c)).count() as i64
}

/// Join candidates inside open brackets or quotes. An unclosed bracket
/// does not reach past the end of its line.
fn merge_brackets(candidates: Vec<String>) -> Vec<String> {
    let mut queue: VecDeque<String> = candidates.into();
    let mut merged = Vec::new();
    let mut prefix = String::new();
    let mut parenthesis_level = 0;
    let mut quotation_level = 0;
    while let Some(candidate) = queue.pop_front() {
        parenthesis_level += count(&candidate, &['（', '(']) - count(&candidate, &['）', ')']);
        quotation_level += count(&candidate, &['「', '“']) - count(&candidate, &['」', '”']);
        if parenthesis_level == 0 && quotation_level == 0 {
            prefix.push_str(&candidate);
            merged.push(std::mem::take(&mut prefix));
        } else if let Some((head, rest)) = candidate.split_once('\n') {
            prefix.push_str(head);
            merged.push(std::mem::take(&mut prefix));
            queue.push_front(rest.to_string());
            parenthesis_level = 0;
            quotation_level = 0;
        } else {
            prefix.push_str(&candidate);
        }
    }
    if !prefix.is_empty() {
        merged.push(prefix);
    }
    merged
}

impl Processor for RegexSenter {
    /// Split a document that has no sentences yet. Sentences inherit the
    /// document id and are numbered `<doc_id>-<n>` from 0.
    fn apply_to_document(&self, document: Document) -> ProcessorResult<Document> {
        if !document.is_senter_required() {
            tracing::debug!("document is already split into sentences");
            return Ok(document);
        }
        let doc_id = document.doc_id().map(str::to_string);
        let sentences: Vec<Sentence> = self
            .split(&document.text())
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let mut sentence = Sentence::from_raw_text(text);
                if let Some(doc_id) = &doc_id {
                    sentence.set_sid(format!("{}-{}", doc_id, index));
                    sentence.set_doc_id(doc_id.clone());
                }
                sentence
            })
            .collect();
        let mut document = Document::from_sentences(sentences);
        if let Some(doc_id) = doc_id {
            document.set_doc_id(doc_id);
        }
        Ok(document)
    }

    /// A sentence is already split.
    fn apply_to_sentence(&self, sentence: Sentence) -> ProcessorResult<Sentence> {
        Ok(sentence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> Vec<String> {
        RegexSenter.split(text)
    }

    #[test]
    fn test_periods() {
        assert_eq!(split("天気がいいので散歩した。"), vec!["天気がいいので散歩した。"]);
        assert_eq!(
            split("天気がいいので散歩した．散歩の途中で先生に出会った．"),
            vec!["天気がいいので散歩した．", "散歩の途中で先生に出会った．"]
        );
        assert_eq!(
            split("天気がいいので散歩した。散歩の途中で Michael に出会った。"),
            vec!["天気がいいので散歩した。", "散歩の途中で Michael に出会った。"]
        );
        assert_eq!(
            split("今何時ですか! 次の予定があるので失礼します。"),
            vec!["今何時ですか!", "次の予定があるので失礼します。"]
        );
        assert_eq!(
            split("お疲れ様です♪次の予定があるので失礼します。"),
            vec!["お疲れ様です♪", "次の予定があるので失礼します。"]
        );
        assert_eq!(
            split("なるほど…これは難しい問題ですね。"),
            vec!["なるほど…", "これは難しい問題ですね。"]
        );
    }

    #[test]
    fn test_newlines() {
        assert_eq!(
            split("天気がいいので散歩した\n散歩の途中で先生に出会った"),
            vec!["天気がいいので散歩した", "散歩の途中で先生に出会った"]
        );
    }

    #[test]
    fn test_repeated_periods_merge() {
        assert_eq!(
            split("今何時ですか？？？次の予定があるので失礼します！！！"),
            vec!["今何時ですか？？？", "次の予定があるので失礼します！！！"]
        );
    }

    #[test]
    fn test_brackets() {
        assert_eq!(
            split("テレビで「今年の夏は暑いので、熱中症に注意しましょう。」と言っていた。"),
            vec!["テレビで「今年の夏は暑いので、熱中症に注意しましょう。」と言っていた。"]
        );
        assert_eq!(
            split("そんな（笑\n安心してください（笑"),
            vec!["そんな（笑", "安心してください（笑"]
        );
    }

    #[test]
    fn test_apply_to_document() {
        let mut document = Document::from_raw_text("天気がいいので散歩した。途中で先生に会った。");
        document.set_doc_id("w201106-0000060050");
        let document = RegexSenter.apply_to_document(document).unwrap();
        let sids: Vec<_> = document
            .sentences()
            .iter()
            .map(|s| s.sid().map(str::to_string))
            .collect();
        assert_eq!(
            sids,
            vec![
                Some("w201106-0000060050-0".to_string()),
                Some("w201106-0000060050-1".to_string())
            ]
        );
        assert_eq!(document.doc_id(), Some("w201106-0000060050"));
        assert!(!document.is_senter_required());
        assert!(document.is_jumanpp_required());

        let again = RegexSenter.apply_to_document(document).unwrap();
        assert_eq!(again.len(), 2);
    }

    #[test]
    fn test_apply_to_sentence() {
        let sentence = Sentence::from_raw_text("天気がいいので散歩した。");
        let sentence = RegexSenter.apply_to_sentence(sentence).unwrap();
        assert_eq!(sentence.text(), "天気がいいので散歩した。");
    }
}
