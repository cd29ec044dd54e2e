//! Predicate-argument structures.

use once_cell::sync::Lazy;
use regex::Regex;

use super::argument::{Argument, ArgumentType, EndophoraArgument, ExophoraArgument};
use super::coreference::EntityManager;
use super::exophora::{to_full_width_digits, ExophoraReferent};
use super::rel::{is_case_type, RelMode};
use crate::errors::{warn, KnpError};
use crate::units::{BasePhraseId, Sentence};

/// Which feature a case-analysis string came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseInfoFormat {
    /// `<格解析結果:...>`, argument fields `tid/sdist/sid`.
    Case,
    /// `<述語項構造:...>`, argument fields `sdist/tid/eid`.
    Pas,
}

const ARGUMENT: &str = r"[^/;]+/[CNODEU\-]/[^/]+/-?\d*/-?\d*/[^/;]+";

static PAS_PAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?P<lemma>.*?):(?P<cf>[^:/]+?)(?::(?P<args>{arg}(?:;{arg})*))?$",
        arg = ARGUMENT
    ))
    .expect("valid pas pattern")
});

/// Katakanize hiragana, leaving every other character untouched.
pub fn katakanize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'ぁ'..='ゖ' | 'ゝ' | 'ゞ' => char::from_u32(c as u32 + 0x60).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Normalize a case label: digits become full-width and hiragana is
/// katakanized when that yields a known case. A `≒` suffix is kept.
pub fn normalize_case(case: &str) -> String {
    let case = to_full_width_digits(case);
    let katakana = katakanize(&case);
    if katakana != case && is_case_type(&katakana) {
        katakana
    } else {
        case
    }
}

/// Options for [`Pas::get_arguments`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentQuery {
    /// Expand arguments through their coreference entities.
    pub relax: bool,
    /// Also return `≒` arguments and non-identical coreferents.
    pub include_nonidentical: bool,
    /// Also return arguments marked optional.
    pub include_optional: bool,
}

impl Default for ArgumentQuery {
    fn default() -> Self {
        Self {
            relax: true,
            include_nonidentical: false,
            include_optional: false,
        }
    }
}

impl ArgumentQuery {
    pub fn with_relax(mut self, relax: bool) -> Self {
        self.relax = relax;
        self
    }

    pub fn with_nonidentical(mut self, include: bool) -> Self {
        self.include_nonidentical = include;
        self
    }

    pub fn with_optional(mut self, include: bool) -> Self {
        self.include_optional = include;
        self
    }
}

/// A predicate base phrase and its arguments grouped by case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pas {
    predicate: BasePhraseId,
    cfid: Option<String>,
    arguments: Vec<(String, Vec<Argument>)>,
    modes: Vec<(String, RelMode)>,
}

impl Pas {
    pub fn new(predicate: BasePhraseId) -> Self {
        Self {
            predicate,
            cfid: None,
            arguments: Vec::new(),
            modes: Vec::new(),
        }
    }

    pub fn predicate(&self) -> BasePhraseId {
        self.predicate
    }

    /// Case frame id such as `行く/いく:動12`.
    pub fn cfid(&self) -> Option<&str> {
        self.cfid.as_deref()
    }

    /// Cases that have at least one argument, in insertion order.
    pub fn cases(&self) -> Vec<&str> {
        self.arguments
            .iter()
            .filter(|(_, args)| !args.is_empty())
            .map(|(case, _)| case.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.iter().all(|(_, args)| args.is_empty())
    }

    pub fn mode(&self, case: &str) -> Option<RelMode> {
        let case = normalize_case(case);
        self.modes
            .iter()
            .find(|(c, _)| *c == case)
            .map(|(_, mode)| *mode)
    }

    /// The arguments stored for a case, without coreference expansion or filtering.
    pub fn arguments(&self, case: &str) -> &[Argument] {
        let case = normalize_case(case);
        self.arguments
            .iter()
            .find(|(c, _)| *c == case)
            .map(|(_, args)| args.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn arguments_mut(&mut self) -> impl Iterator<Item = &mut Argument> {
        self.arguments.iter_mut().flat_map(|(_, args)| args.iter_mut())
    }

    fn slot(&mut self, case: &str) -> &mut Vec<Argument> {
        let position = match self.arguments.iter().position(|(c, _)| c == case) {
            Some(position) => position,
            None => {
                self.arguments.push((case.to_string(), Vec::new()));
                self.arguments.len() - 1
            }
        };
        &mut self.arguments[position].1
    }

    /// Add an argument under its (already normalized) case unless an equal one exists.
    pub(crate) fn add_argument(&mut self, argument: Argument, mode: Option<RelMode>) {
        let case = argument.case().to_string();
        if let Some(mode) = mode {
            match self.modes.iter_mut().find(|(c, _)| *c == case) {
                Some(entry) => entry.1 = mode,
                None => self.modes.push((case.clone(), mode)),
            }
        }
        let slot = self.slot(&case);
        if !slot.contains(&argument) {
            slot.push(argument);
        }
    }

    /// Mark every argument already stored for `case` as optional.
    pub(crate) fn set_arguments_optional(&mut self, case: &str) {
        let case = normalize_case(case);
        let slot = self.slot(&case);
        if slot.is_empty() {
            tracing::info!("no preceding argument found for {}; なし is ignored", case);
            return;
        }
        for argument in slot.iter_mut() {
            argument.set_optional();
        }
    }

    /// Arguments of `case`, optionally expanded through coreference.
    pub fn get_arguments(
        &self,
        case: &str,
        query: ArgumentQuery,
        entities: &EntityManager,
        sentences: &[Sentence],
    ) -> Vec<Argument> {
        let case = normalize_case(case);
        let mut args: Vec<Argument> = self.arguments(&case).to_vec();
        if query.include_nonidentical {
            args.extend(self.arguments(&format!("{}≒", case)).iter().cloned());
        }
        if !query.include_optional {
            args.retain(|arg| !arg.is_optional());
        }
        if !query.relax {
            return args;
        }

        let mut expanded = args.clone();
        let push = |argument: Argument, expanded: &mut Vec<Argument>| {
            if !expanded.contains(&argument) {
                expanded.push(argument);
            }
        };
        for arg in &args {
            let eids = match arg {
                Argument::Exophora(exo) => {
                    if entities.contains(exo.eid) {
                        std::iter::once(exo.eid).collect()
                    } else {
                        Default::default()
                    }
                }
                Argument::Endophora(endo) if query.include_nonidentical => {
                    entities.entities_all_of(endo.base_phrase)
                }
                Argument::Endophora(endo) => entities.entities_of(endo.base_phrase),
            };
            for eid in eids {
                let entity = match entities.get(eid) {
                    Some(entity) => entity,
                    None => continue,
                };
                if let Some(referent) = &entity.exophora_referent {
                    push(
                        Argument::Exophora(ExophoraArgument {
                            case: case.clone(),
                            exophora_referent: referent.clone(),
                            eid,
                            optional: false,
                        }),
                        &mut expanded,
                    );
                }
                for &mention in entity.mentions() {
                    if let Argument::Endophora(endo) = arg {
                        if endo.base_phrase == mention {
                            continue;
                        }
                    }
                    let arg_type = infer_argument_type(sentences, self.predicate, mention, &case);
                    push(
                        Argument::Endophora(EndophoraArgument {
                            case: case.clone(),
                            base_phrase: mention,
                            arg_type,
                            optional: false,
                        }),
                        &mut expanded,
                    );
                }
            }
        }
        expanded
    }

    /// [`get_arguments`](Self::get_arguments) for every case that has arguments.
    pub fn get_all_arguments(
        &self,
        query: ArgumentQuery,
        entities: &EntityManager,
        sentences: &[Sentence],
    ) -> Vec<(String, Vec<Argument>)> {
        self.cases()
            .into_iter()
            .map(|case| {
                (
                    case.to_string(),
                    self.get_arguments(case, query, entities, sentences),
                )
            })
            .collect()
    }
}

/// Infer how `argument` relates to `predicate` when no explicit flag is given.
pub(crate) fn infer_argument_type(
    sentences: &[Sentence],
    predicate: BasePhraseId,
    argument: BasePhraseId,
    case: &str,
) -> ArgumentType {
    let pred_sentence = match sentences.get(predicate.sentence) {
        Some(sentence) => sentence,
        None => return ArgumentType::Unassigned,
    };
    let pred = match pred_sentence.base_phrases.get(predicate.index) {
        Some(bp) => bp,
        None => return ArgumentType::Unassigned,
    };
    let pred_parent = match pred.parent_index {
        Some(parent) => parent,
        None => return ArgumentType::Unassigned,
    };
    if argument.sentence != predicate.sentence {
        return ArgumentType::Omission;
    }
    let arg = match pred_sentence.base_phrases.get(argument.index) {
        Some(bp) => bp,
        None => return ArgumentType::Omission,
    };
    if arg.parent_index == Some(predicate.index as i32) {
        let tail = arg
            .morpheme_range
            .end
            .checked_sub(1)
            .and_then(|i| pred_sentence.morphemes.get(i));
        return match tail {
            Some(m) if m.subpos == "格助詞" && katakanize(&m.surface) == case => {
                ArgumentType::CaseExplicit
            }
            _ => ArgumentType::CaseHidden,
        };
    }
    if pred_parent >= 0 && pred_parent as usize == argument.index {
        return ArgumentType::CaseHidden;
    }
    ArgumentType::Omission
}

/// Build the PAS of `predicate` from a `述語項構造` or `格解析結果` value.
///
/// Arguments with flag `U` or `-` are skipped, as are references to
/// sentences or base phrases that do not exist.
pub(crate) fn parse_pas_string(
    predicate: BasePhraseId,
    value: &str,
    format: CaseInfoFormat,
    sentences: &[Sentence],
    entities: &mut EntityManager,
) -> Pas {
    let mut pas = Pas::new(predicate);
    let sid = sentences
        .get(predicate.sentence)
        .and_then(|s| s.sid.clone())
        .unwrap_or_default();
    let caps = match PAS_PAT.captures(value) {
        Some(caps) => caps,
        None => {
            tracing::warn!("{}: invalid case analysis string {:?} is ignored", sid, value);
            return pas;
        }
    };
    pas.cfid = Some(format!("{}:{}", &caps["lemma"], &caps["cf"]));
    let args = match caps.name("args") {
        Some(args) => args.as_str(),
        None => return pas,
    };

    for item in args.split(';') {
        let fields: Vec<&str> = item.split('/').collect();
        if fields.len() != 6 {
            warn(KnpError::malformed(item, "case analysis item must have six fields"));
            continue;
        }
        let (case, flag, surf) = (fields[0], fields[1], fields[2]);
        if flag == "U" || flag == "-" {
            continue;
        }
        let arg_type = match ArgumentType::from_flag(flag) {
            Some(arg_type) => arg_type,
            None => continue,
        };
        let case = normalize_case(case);

        if format == CaseInfoFormat::Pas && arg_type == ArgumentType::Exophora {
            let referent = ExophoraReferent::new(surf);
            // The analyzer's own entity numbering is kept as annotated.
            let eid = match fields[5].parse::<u32>() {
                Ok(eid) => eid,
                Err(_) => entities.get_or_create_entity(Some(referent.clone()), None),
            };
            pas.add_argument(
                Argument::Exophora(ExophoraArgument {
                    case,
                    exophora_referent: referent,
                    eid,
                    optional: false,
                }),
                None,
            );
            continue;
        }
        if arg_type == ArgumentType::Exophora {
            warn(KnpError::malformed(item, "exophora is not allowed in 格解析結果"));
            continue;
        }

        let (sdist, tid, expected_sid) = match format {
            CaseInfoFormat::Case => (fields[4].parse::<i64>(), fields[3].parse::<i64>(), Some(fields[5])),
            CaseInfoFormat::Pas => (fields[3].parse::<i64>(), fields[4].parse::<i64>(), None),
        };
        let (sdist, tid) = match (sdist, tid) {
            (Ok(sdist), Ok(tid)) => (sdist, tid),
            _ => {
                warn(KnpError::malformed(item, "non-numeric argument position"));
                continue;
            }
        };
        let sentence_index = predicate.sentence as i64 - sdist;
        let target = match usize::try_from(sentence_index).ok().and_then(|i| sentences.get(i).map(|s| (i, s))) {
            Some(target) => target,
            None => {
                warn(KnpError::IndexOutOfRange {
                    sid: sid.clone(),
                    message: format!("sentence index {} in {:?}", sentence_index, item),
                });
                continue;
            }
        };
        let (target_index, target_sentence) = target;
        if let Some(expected) = expected_sid {
            if target_sentence.sid.as_deref() != Some(expected) {
                warn(KnpError::IndexOutOfRange {
                    sid: sid.clone(),
                    message: format!(
                        "sentence id mismatch: {:?} vs {:?}",
                        target_sentence.sid.as_deref().unwrap_or(""),
                        expected
                    ),
                });
                continue;
            }
        }
        let tid = match usize::try_from(tid).ok().filter(|&t| t < target_sentence.base_phrases.len()) {
            Some(tid) => tid,
            None => {
                warn(KnpError::IndexOutOfRange {
                    sid: target_sentence.sid.clone().unwrap_or_default(),
                    message: format!("base phrase index {} in {:?}", tid, item),
                });
                continue;
            }
        };
        let found = target_sentence.base_phrase_text(tid);
        if !found.contains(surf) {
            warn(KnpError::SurfaceMismatch {
                sid: target_sentence.sid.clone().unwrap_or_default(),
                expected: surf.to_string(),
                found,
            });
        }
        pas.add_argument(
            Argument::Endophora(EndophoraArgument {
                case,
                base_phrase: BasePhraseId {
                    sentence: target_index,
                    index: tid,
                },
                arg_type,
                optional: false,
            }),
            None,
        );
    }
    pas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_katakanize() {
        assert_eq!(katakanize("が"), "ガ");
        assert_eq!(katakanize("にたいして"), "ニタイシテ");
        assert_eq!(katakanize("外の関係"), "外の関係");
    }

    #[test]
    fn test_normalize_case() {
        assert_eq!(normalize_case("ガ2"), "ガ２");
        assert_eq!(normalize_case("を"), "ヲ");
        assert_eq!(normalize_case("を≒"), "ヲ≒");
        assert_eq!(normalize_case("時間"), "時間");
        // katakanized form is not a case label
        assert_eq!(normalize_case("ほげ"), "ほげ");
    }

    #[test]
    fn test_add_argument_dedup_and_optional() {
        let predicate = BasePhraseId {
            sentence: 0,
            index: 2,
        };
        let mut pas = Pas::new(predicate);
        let arg = Argument::Endophora(EndophoraArgument {
            case: "ガ".into(),
            base_phrase: BasePhraseId {
                sentence: 0,
                index: 0,
            },
            arg_type: ArgumentType::CaseHidden,
            optional: false,
        });
        pas.add_argument(arg.clone(), None);
        pas.add_argument(arg, Some(RelMode::And));
        assert_eq!(pas.arguments("ガ").len(), 1);
        assert_eq!(pas.mode("ガ"), Some(RelMode::And));
        assert_eq!(pas.cases(), vec!["ガ"]);

        pas.set_arguments_optional("が");
        assert!(pas.arguments("ガ")[0].is_optional());
        let query = ArgumentQuery::default();
        let entities = EntityManager::new();
        assert!(pas.get_arguments("ガ", query, &entities, &[]).is_empty());
        assert_eq!(
            pas.get_arguments("ガ", query.with_optional(true), &entities, &[])
                .len(),
            1
        );
    }
}
