//! Structural checks run on every fixture.
//!
//! A check that needs a layer the fixture does not carry (cohesion on a
//! Juman++ fixture) is skipped rather than failed.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use layered_knp::{DependencyUnit, Document};

use crate::errors::SpecError;
use crate::fixture::KnpFixture;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    /// Serializing the document reproduces the fixture text.
    RoundTrip,
    /// Global indices count morphemes and base phrases across sentences.
    GlobalIndex,
    /// An entity lists a mention exactly when the mention lists the entity.
    MentionSymmetry,
    /// At most one entity per singleton exophora referent.
    SingletonUniqueness,
    /// Morpheme spans tile the document text without gaps.
    SpanPartition,
    /// Following parents always reaches a root.
    DependencyAcyclic,
}

/// Result of one check on one fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Passed,
    Skipped,
    Failed(String),
}

impl Check {
    pub const ALL: [Check; 6] = [
        Check::RoundTrip,
        Check::GlobalIndex,
        Check::MentionSymmetry,
        Check::SingletonUniqueness,
        Check::SpanPartition,
        Check::DependencyAcyclic,
    ];

    /// The name used in `expected-failures.toml`.
    pub fn name(self) -> &'static str {
        match self {
            Check::RoundTrip => "round-trip",
            Check::GlobalIndex => "global-index",
            Check::MentionSymmetry => "mention-symmetry",
            Check::SingletonUniqueness => "singleton-uniqueness",
            Check::SpanPartition => "span-partition",
            Check::DependencyAcyclic => "dependency-acyclic",
        }
    }

    pub fn run(self, fixture: &KnpFixture) -> CheckStatus {
        let document = &fixture.document;
        let result = match self {
            Check::RoundTrip => round_trip(fixture),
            Check::GlobalIndex => global_index(document),
            Check::MentionSymmetry => mention_symmetry(document),
            Check::SingletonUniqueness => singleton_uniqueness(document),
            Check::SpanPartition => span_partition(document),
            Check::DependencyAcyclic => dependency_acyclic(document),
        };
        match result {
            Ok(true) => CheckStatus::Passed,
            Ok(false) => CheckStatus::Skipped,
            Err(message) => CheckStatus::Failed(message),
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Check {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Check::ALL
            .iter()
            .copied()
            .find(|check| check.name() == s)
            .ok_or_else(|| SpecError::Assertion {
                message: format!("unknown check: {:?}", s),
            })
    }
}

/// `Ok(true)` when the check held, `Ok(false)` when it did not apply.
type Outcome = Result<bool, String>;

fn round_trip(fixture: &KnpFixture) -> Outcome {
    let emitted = fixture.serialize().map_err(|e| e.to_string())?;
    if emitted == fixture.text {
        return Ok(true);
    }
    let expected = fixture.text.lines().chain(std::iter::repeat("<end>"));
    for (number, (found, expected)) in emitted.lines().zip(expected).enumerate() {
        if found != expected {
            return Err(format!(
                "line {}: expected {:?}, found {:?}",
                number + 1,
                expected,
                found
            ));
        }
    }
    Err(format!(
        "emitted {} bytes, fixture has {}",
        emitted.len(),
        fixture.text.len()
    ))
}

fn global_index(document: &Document) -> Outcome {
    let mut next_morpheme = 0;
    let mut next_base_phrase = 0;
    for sentence in document.sentences() {
        let morphemes = sentence.morphemes().map_err(|e| e.to_string())?;
        for morpheme in morphemes {
            if morpheme.global_index() != next_morpheme {
                return Err(format!(
                    "morpheme {} of sentence {} has global index {}, expected {}",
                    morpheme.index(),
                    sentence.index(),
                    morpheme.global_index(),
                    next_morpheme
                ));
            }
            next_morpheme += 1;
        }
        let base_phrases = match sentence.base_phrases() {
            Ok(base_phrases) => base_phrases,
            Err(_) => continue,
        };
        for base_phrase in base_phrases {
            if base_phrase.global_index() != next_base_phrase {
                return Err(format!(
                    "base phrase {} of sentence {} has global index {}, expected {}",
                    base_phrase.index(),
                    sentence.index(),
                    base_phrase.global_index(),
                    next_base_phrase
                ));
            }
            next_base_phrase += 1;
        }
    }
    Ok(true)
}

fn mention_symmetry(document: &Document) -> Outcome {
    let base_phrases = match document.base_phrases() {
        Ok(base_phrases) => base_phrases,
        Err(_) => return Ok(false),
    };
    for entity in document.entities() {
        for (mentions, nonidentical) in [
            (entity.mentions(), false),
            (entity.mentions_nonidentical(), true),
        ] {
            for &id in mentions {
                let base_phrase = document
                    .base_phrase(id)
                    .ok_or_else(|| format!("entity {} mentions missing {:?}", entity.eid, id))?;
                let listed = if nonidentical {
                    base_phrase.entities_nonidentical()
                } else {
                    base_phrase.entities()
                };
                if !listed.iter().any(|e| e.eid == entity.eid) {
                    return Err(format!(
                        "entity {} mentions {:?}, which does not list it",
                        entity.eid, id
                    ));
                }
            }
        }
    }
    for base_phrase in base_phrases {
        let id = base_phrase.id();
        for entity in base_phrase.entities() {
            if !entity.mentions().contains(&id) {
                return Err(format!("{:?} lists entity {}, which does not mention it", id, entity.eid));
            }
        }
        for entity in base_phrase.entities_nonidentical() {
            if !entity.mentions_nonidentical().contains(&id) {
                return Err(format!(
                    "{:?} lists entity {} as nonidentical, which does not mention it",
                    id, entity.eid
                ));
            }
        }
    }
    Ok(true)
}

fn singleton_uniqueness(document: &Document) -> Outcome {
    if document.base_phrases().is_err() {
        return Ok(false);
    }
    let mut seen: HashMap<String, u32> = HashMap::new();
    for entity in document.entities() {
        let referent = match &entity.exophora_referent {
            Some(referent) if referent.is_singleton() => referent,
            _ => continue,
        };
        if let Some(other) = seen.insert(referent.text(), entity.eid) {
            return Err(format!(
                "entities {} and {} both refer to {}",
                other,
                entity.eid,
                referent.text()
            ));
        }
    }
    Ok(true)
}

fn span_partition(document: &Document) -> Outcome {
    let morphemes = document.morphemes().map_err(|e| e.to_string())?;
    let mut end = 0;
    for morpheme in &morphemes {
        let span = morpheme.global_span();
        if span.start != end {
            return Err(format!(
                "morpheme {:?} starts at {}, previous ends at {}",
                morpheme.surface, span.start, end
            ));
        }
        end = span.end;
    }
    let length = document.text().chars().count();
    if end != length {
        return Err(format!("morphemes cover {} of {} characters", end, length));
    }
    Ok(true)
}

/// Walk from every node to a root; a walk longer than the node count is a cycle.
fn find_cycle(parents: &[Option<i32>]) -> Result<(), String> {
    for start in 0..parents.len() {
        let mut current = start;
        let mut steps = 0;
        while let Some(parent) = parents[current].and_then(|p| usize::try_from(p).ok()) {
            if parent >= parents.len() {
                return Err(format!("{} depends on missing {}", current, parent));
            }
            current = parent;
            steps += 1;
            if steps > parents.len() {
                return Err(format!("{} is on a dependency cycle", start));
            }
        }
    }
    Ok(())
}

fn dependency_acyclic(document: &Document) -> Outcome {
    if document.base_phrases().is_err() {
        return Ok(false);
    }
    for sentence in document.sentences() {
        let base_phrases = sentence.base_phrases().map_err(|e| e.to_string())?;
        let parents: Vec<_> = base_phrases.iter().map(|bp| bp.parent_index()).collect();
        find_cycle(&parents)
            .map_err(|e| format!("sentence {}: base phrase {}", sentence.index(), e))?;
        let phrases = sentence.phrases().map_err(|e| e.to_string())?;
        let parents: Vec<_> = phrases.iter().map(|phrase| phrase.parent_index()).collect();
        find_cycle(&parents).map_err(|e| format!("sentence {}: phrase {}", sentence.index(), e))?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::FixtureFormat;

    const MORPHEME: &str = "天気 てんき 天気 名詞 6 普通名詞 1 * 0 * 0";

    fn knp(text: &str) -> KnpFixture {
        KnpFixture::parse("inline.knp", FixtureFormat::Knp, text).unwrap()
    }

    #[test]
    fn test_names_round_trip() {
        for check in Check::ALL {
            assert_eq!(check.name().parse::<Check>().unwrap(), check);
        }
        assert!("spelling".parse::<Check>().is_err());
    }

    #[test]
    fn test_missing_final_newline_fails_round_trip() {
        let fixture = knp(&format!("* -1D\n+ -1D\n{}\nEOS", MORPHEME));
        assert!(matches!(Check::RoundTrip.run(&fixture), CheckStatus::Failed(_)));
        assert_eq!(Check::SpanPartition.run(&fixture), CheckStatus::Passed);
    }

    #[test]
    fn test_dependency_cycle() {
        let fixture = knp(&format!(
            "* 1D\n+ 1D\n{m}\n* 0D\n+ 0D\n{m}\nEOS\n",
            m = MORPHEME
        ));
        match Check::DependencyAcyclic.run(&fixture) {
            CheckStatus::Failed(message) => {
                insta::assert_snapshot!(message, @"sentence 0: base phrase 0 is on a dependency cycle")
            }
            status => panic!("expected a failure, got {:?}", status),
        }
    }

    #[test]
    fn test_cohesion_skipped_for_jumanpp() {
        let fixture =
            KnpFixture::parse("inline.jumanpp", FixtureFormat::Jumanpp, &format!("{}\nEOS\n", MORPHEME))
                .unwrap();
        assert_eq!(Check::MentionSymmetry.run(&fixture), CheckStatus::Skipped);
        assert_eq!(Check::DependencyAcyclic.run(&fixture), CheckStatus::Skipped);
        assert_eq!(Check::GlobalIndex.run(&fixture), CheckStatus::Passed);
        assert_eq!(Check::RoundTrip.run(&fixture), CheckStatus::Passed);
    }
}
