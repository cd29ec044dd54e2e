//! Single forward passes that turn sentence blocks into [`Sentence`]s.

use super::lines::{classify, parse_header, LineKind};
use crate::errors::{KnpError, KnpResult};
use crate::units::{BasePhrase, Clause, Layer, Morpheme, Phrase, Sentence};

const HOMOGRAPH_PREFIX: &str = "@ ";

/// Comment lines go to the sid / misc comment, everything else is text.
pub(crate) fn parse_raw_text(text: &str) -> Sentence {
    let mut sentence = Sentence::default();
    let mut body = String::new();
    for line in text.lines() {
        if super::is_comment_line(line) {
            sentence.set_comment(line);
        } else if !line.trim().is_empty() {
            body.push_str(line);
        }
    }
    sentence.raw_text = Some(body);
    sentence
}

fn parse_homograph(line: &str) -> KnpResult<Morpheme> {
    let rest = line
        .strip_prefix(HOMOGRAPH_PREFIX)
        .ok_or_else(|| KnpError::malformed(line, "expected a homograph line"))?;
    Morpheme::parse_line(rest)
}

/// Lines of a block with blank lines removed, failing on anything after `EOS`.
fn block_lines(text: &str) -> KnpResult<Vec<(&str, LineKind)>> {
    let mut lines = Vec::new();
    let mut terminated = false;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if terminated {
            return Err(KnpError::malformed(line, "content after EOS"));
        }
        let kind = classify(line).ok_or_else(|| KnpError::malformed(line, "unrecognized line"))?;
        if kind == LineKind::Eos {
            terminated = true;
        }
        lines.push((line, kind));
    }
    Ok(lines)
}

/// Parse one Juman++ sentence block.
pub(crate) fn parse_jumanpp(text: &str) -> KnpResult<Sentence> {
    let mut sentence = Sentence {
        layer: Layer::Morphemes,
        ..Default::default()
    };
    for (line, kind) in block_lines(text)? {
        match kind {
            LineKind::Eos => {}
            LineKind::Comment if sentence.morphemes.is_empty() => sentence.set_comment(line),
            LineKind::Comment => {
                return Err(KnpError::malformed(line, "comment after the first morpheme"))
            }
            LineKind::Morpheme => sentence.morphemes.push(Morpheme::parse_line(line)?),
            LineKind::Homograph => {
                let homograph = parse_homograph(line)?;
                sentence
                    .morphemes
                    .last_mut()
                    .ok_or_else(|| KnpError::malformed(line, "homograph without a morpheme"))?
                    .homographs
                    .push(homograph);
            }
            LineKind::PhraseHeader | LineKind::BasePhraseHeader => {
                return Err(KnpError::malformed(line, "phrase header in Juman++ input"))
            }
        }
    }
    Ok(sentence)
}

/// Parse one KNP sentence block.
///
/// The clause layer exists only when some `+` header carries `節-区切`;
/// a clause closes at the first `*` after its `節-区切` base phrase.
pub(crate) fn parse_knp(text: &str) -> KnpResult<Sentence> {
    let lines = block_lines(text)?;
    let has_clause = lines
        .iter()
        .any(|(line, kind)| *kind == LineKind::BasePhraseHeader && line.contains("節-区切"));
    let mut sentence = Sentence {
        layer: if has_clause {
            Layer::Clauses
        } else {
            Layer::Phrases
        },
        ..Default::default()
    };
    let mut clause_start = 0;
    let mut clause_end_seen = false;

    for (line, kind) in lines {
        match kind {
            LineKind::Eos => {}
            LineKind::Comment => {
                if !sentence.phrases.is_empty() {
                    return Err(KnpError::malformed(line, "comment after the first phrase"));
                }
                sentence.set_comment(line);
            }
            LineKind::PhraseHeader => {
                if has_clause && clause_end_seen {
                    sentence.clauses.push(Clause {
                        phrase_range: clause_start..sentence.phrases.len(),
                    });
                    clause_start = sentence.phrases.len();
                    clause_end_seen = false;
                }
                let header = parse_header(line)?;
                sentence.phrases.push(Phrase::from_header(
                    header.parent_index,
                    header.dep_type,
                    header.fstring,
                    sentence.base_phrases.len(),
                ));
            }
            LineKind::BasePhraseHeader => {
                if sentence.phrases.is_empty() {
                    return Err(KnpError::malformed(line, "base phrase before any phrase"));
                }
                let header = parse_header(line)?;
                if header.fstring.contains("節-区切") {
                    clause_end_seen = true;
                }
                let phrase_index = sentence.phrases.len() - 1;
                sentence.base_phrases.push(BasePhrase::from_header(
                    header.parent_index,
                    header.dep_type,
                    header.fstring,
                    phrase_index,
                    sentence.morphemes.len(),
                ));
                let end = sentence.base_phrases.len();
                if let Some(phrase) = sentence.phrases.last_mut() {
                    phrase.base_phrase_range.end = end;
                }
            }
            LineKind::Morpheme => {
                if sentence.base_phrases.is_empty() {
                    return Err(KnpError::malformed(line, "morpheme before any base phrase"));
                }
                sentence.morphemes.push(Morpheme::parse_line(line)?);
                let end = sentence.morphemes.len();
                if let Some(base_phrase) = sentence.base_phrases.last_mut() {
                    base_phrase.morpheme_range.end = end;
                }
            }
            LineKind::Homograph => {
                let homograph = parse_homograph(line)?;
                sentence
                    .morphemes
                    .last_mut()
                    .ok_or_else(|| KnpError::malformed(line, "homograph without a morpheme"))?
                    .homographs
                    .push(homograph);
            }
        }
    }

    if has_clause && clause_start < sentence.phrases.len() {
        sentence.clauses.push(Clause {
            phrase_range: clause_start..sentence.phrases.len(),
        });
    }
    validate(&sentence, text)?;
    for (clause_index, clause) in sentence.clauses.iter().enumerate() {
        for phrase in clause.phrase_range.clone() {
            sentence.phrases[phrase].clause_index = Some(clause_index);
        }
    }
    Ok(sentence)
}

fn validate(sentence: &Sentence, text: &str) -> KnpResult<()> {
    let first_line = |fallback: &str| -> String {
        text.lines()
            .find(|line| line.starts_with(fallback))
            .unwrap_or(fallback)
            .to_string()
    };
    if sentence.phrases.iter().any(|p| p.base_phrase_range.is_empty()) {
        return Err(KnpError::malformed(&first_line("*"), "phrase without base phrases"));
    }
    if sentence.base_phrases.iter().any(|bp| bp.morpheme_range.is_empty()) {
        return Err(KnpError::malformed(&first_line("+"), "base phrase without morphemes"));
    }
    let in_range = |parent: Option<i32>, len: usize| match parent {
        None | Some(-1) => true,
        Some(parent) => usize::try_from(parent).map_or(false, |p| p < len),
    };
    let phrase_count = sentence.phrases.len();
    if let Some(phrase) = sentence
        .phrases
        .iter()
        .find(|p| !in_range(p.parent_index, phrase_count))
    {
        return Err(KnpError::malformed(
            &format!("* {}", phrase.parent_index.unwrap_or_default()),
            "phrase parent index out of range",
        ));
    }
    let base_phrase_count = sentence.base_phrases.len();
    if let Some(base_phrase) = sentence
        .base_phrases
        .iter()
        .find(|bp| !in_range(bp.parent_index, base_phrase_count))
    {
        return Err(KnpError::malformed(
            &format!("+ {}", base_phrase.parent_index.unwrap_or_default()),
            "base phrase parent index out of range",
        ));
    }
    Ok(())
}
