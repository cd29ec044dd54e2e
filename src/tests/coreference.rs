use std::collections::BTreeSet;

use crate::{ArgumentQuery, BasePhraseId, Document, Entity, ExophoraReferent, Sentence};

const MERGE_KNP: [&str; 4] = [
    include_str!("data/merge_entity_0.knp"),
    include_str!("data/merge_entity_1.knp"),
    include_str!("data/merge_entity_2.knp"),
    include_str!("data/merge_entity_3.knp"),
];
const UPDATE_ARGUMENT_EID_KNP: &str = include_str!("data/update_argument_eid.knp");

fn ids(indices: &[usize]) -> BTreeSet<BasePhraseId> {
    indices
        .iter()
        .map(|&index| BasePhraseId { sentence: 0, index })
        .collect()
}

fn referent_of(entity: &Entity) -> Option<String> {
    entity.exophora_referent.as_ref().map(ExophoraReferent::text)
}

#[test]
fn test_merge_nonidentical_keeps_both_entities() {
    let document = Document::from_knp(MERGE_KNP[0]).unwrap();
    let entities: Vec<&Entity> = document.entities().collect();
    assert_eq!(entities.len(), 2);

    let writer = entities
        .iter()
        .find(|e| referent_of(e).as_deref() == Some("著者"))
        .unwrap();
    assert_eq!(writer.mentions(), &ids(&[0, 1]));
    assert_eq!(writer.mentions_nonidentical(), &ids(&[2]));

    let other = entities.iter().find(|e| e.exophora_referent.is_none()).unwrap();
    assert_eq!(other.mentions(), &ids(&[2]));
    assert_eq!(other.mentions_nonidentical(), &ids(&[0]));
    assert_eq!(other.mentions_all(), ids(&[0, 2]));
}

#[test]
fn test_identical_link_upgrades_nonidentical_mention() {
    for knp in &MERGE_KNP[1..3] {
        let document = Document::from_knp(knp).unwrap();
        let entities: Vec<&Entity> = document.entities().collect();
        assert_eq!(entities.len(), 1);
        assert_eq!(referent_of(entities[0]).as_deref(), Some("著者"));
        assert_eq!(entities[0].mentions(), &ids(&[0, 1]));
        assert!(entities[0].mentions_nonidentical().is_empty());
    }
}

#[test]
fn test_different_referents_are_not_merged() {
    let document = Document::from_knp(MERGE_KNP[3]).unwrap();
    let mut referents: Vec<String> = document.entities().filter_map(referent_of).collect();
    referents.sort();
    assert_eq!(referents, vec!["著者", "読者"]);
    for entity in document.entities() {
        assert_eq!(entity.mentions(), &ids(&[0, 1]));
    }
    for base_phrase in document.base_phrases().unwrap() {
        assert_eq!(base_phrase.entities().len(), 2);
    }
}

#[test]
fn test_merge_rewrites_argument_eids() {
    let document = Document::from_knp(UPDATE_ARGUMENT_EID_KNP).unwrap();
    let base_phrases = document.base_phrases().unwrap();
    let arguments = base_phrases[1].get_arguments("ヲ", ArgumentQuery::default());
    let exophora: Vec<_> = arguments.iter().filter_map(|arg| arg.as_exophora()).collect();
    assert_eq!(exophora.len(), 1);
    assert_eq!(exophora[0].eid, 2);
    assert_eq!(document.entity_manager().len(), 2);

    let entity = document.entity_manager().get(2).unwrap();
    assert_eq!(referent_of(entity).as_deref(), Some("不特定:人１"));
    assert!(entity.mentions().contains(&BasePhraseId {
        sentence: 1,
        index: 0
    }));

    let expanded = base_phrases[1].get_arguments("ヲ", ArgumentQuery::default());
    assert!(expanded
        .iter()
        .filter_map(|arg| arg.as_endophora())
        .any(|arg| arg.base_phrase == base_phrases[2].id()));
}

#[test]
fn test_singleton_referent_shares_one_entity() {
    let knp = "# S-ID:1\n\
* 1D\n\
+ 1D <rel type=\"=\" target=\"著者\"/>\n\
私 わたし 私 名詞 6 普通名詞 1 * 0 * 0\n\
* -1D\n\
+ -1D <rel type=\"=\" target=\"著者\"/>\n\
僕 ぼく 僕 名詞 6 普通名詞 1 * 0 * 0\n\
EOS\n";
    let sentence = Sentence::from_knp(knp).unwrap();
    let base_phrases = sentence.base_phrases().unwrap();
    let entities = base_phrases[0].entities();
    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].mentions(), &ids(&[0, 1]));
    assert_eq!(base_phrases[1].entities(), entities);
    assert_eq!(
        base_phrases[0].get_coreferents(false, false),
        vec![base_phrases[1]]
    );
    assert_eq!(base_phrases[0].get_coreferents(false, true).len(), 2);

    let document = Document::from_sentences(vec![sentence]);
    assert_eq!(document.entity_manager().len(), 1);
}

#[test]
fn test_entities_are_resolved_again_from_sentences() {
    let document = Document::from_knp(UPDATE_ARGUMENT_EID_KNP).unwrap();
    let sentences = document.into_sentences();
    let base_phrases = sentences[0].base_phrases().unwrap();
    assert!(base_phrases[0].entities().is_empty());
    assert!(base_phrases[1]
        .get_arguments("ヲ", ArgumentQuery::default())
        .is_empty());

    let document = Document::from_sentences(sentences);
    assert_eq!(document.entity_manager().len(), 2);
    let base_phrases = document.base_phrases().unwrap();
    assert_eq!(base_phrases[0].entities().len(), 1);
    assert_eq!(
        base_phrases[1]
            .get_arguments("ヲ", ArgumentQuery::default().with_relax(false))
            .len(),
        1
    );
}
