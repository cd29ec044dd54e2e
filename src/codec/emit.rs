use super::lines::{format_dependency, EOS};
use crate::errors::KnpResult;
use crate::units::{Layer, Sentence};

fn push_comment(sentence: &Sentence, out: &mut String) {
    if let Some(comment) = sentence.comment() {
        out.push_str(&comment);
        out.push('\n');
    }
}

pub(crate) fn emit_raw_text(sentence: &Sentence) -> String {
    let mut out = String::new();
    push_comment(sentence, &mut out);
    out.push_str(&sentence.text());
    out.push('\n');
    out
}

pub(crate) fn emit_jumanpp(sentence: &Sentence) -> KnpResult<String> {
    sentence.require(Layer::Morphemes, "sentence")?;
    let mut out = String::new();
    push_comment(sentence, &mut out);
    for morpheme in &sentence.morphemes {
        out.push_str(&morpheme.to_jumanpp());
    }
    out.push_str(EOS);
    out.push('\n');
    Ok(out)
}

pub(crate) fn emit_knp(sentence: &Sentence) -> KnpResult<String> {
    sentence.require(Layer::Phrases, "sentence")?;
    let mut out = String::new();
    push_comment(sentence, &mut out);
    for phrase in &sentence.phrases {
        out.push_str(&format_dependency('*', phrase.parent_index, phrase.dep_type));
        if !phrase.features.is_empty() {
            out.push(' ');
            out.push_str(&phrase.features.to_fstring());
        }
        out.push('\n');
        for base_phrase in &sentence.base_phrases[phrase.base_phrase_range.clone()] {
            out.push_str(&format_dependency(
                '+',
                base_phrase.parent_index,
                base_phrase.dep_type,
            ));
            let tags = base_phrase.tag_string();
            if !tags.is_empty() {
                out.push(' ');
                out.push_str(&tags);
            }
            out.push('\n');
            for morpheme in &sentence.morphemes[base_phrase.morpheme_range.clone()] {
                out.push_str(&morpheme.to_jumanpp());
            }
        }
    }
    out.push_str(EOS);
    out.push('\n');
    Ok(out)
}
