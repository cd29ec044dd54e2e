use crate::{Document, Layer, Sentence};

const TENKI_KNP: &str = include_str!("data/tenki.knp");
const TENKI_NO_CLAUSE_KNP: &str = include_str!("data/tenki.noclause.knp");
const TENKI_JUMANPP: &str = include_str!("data/tenki.jumanpp");
const DISCOURSE_KNP: &str = include_str!("data/discourse_document.knp");

#[test]
fn test_knp_round_trip() {
    let document = Document::from_knp(TENKI_KNP).unwrap();
    assert_eq!(document.text(), "天気がいいので散歩した。");
    assert_eq!(document.to_knp().unwrap(), TENKI_KNP);

    let sentence = document.sentence(0).unwrap();
    assert_eq!(sentence.layer(), Layer::Clauses);
    assert_eq!(sentence.sid(), Some("1"));
    assert_eq!(document.phrases().unwrap().len(), 3);
    assert_eq!(document.base_phrases().unwrap().len(), 3);
    assert_eq!(document.morphemes().unwrap().len(), 7);

    let clauses = document.clauses().unwrap();
    assert_eq!(clauses.len(), 2);
    assert_eq!(clauses[0].text(), "天気がいいので");
    assert_eq!(clauses[0].parent(), Some(clauses[1]));
    assert_eq!(clauses[1].parent(), None);
    assert_eq!(clauses[1].children(), vec![clauses[0]]);
}

#[test]
fn test_memo_survives_round_trip() {
    let sentence = Sentence::from_knp(TENKI_KNP).unwrap();
    let base_phrases = sentence.base_phrases().unwrap();
    assert_eq!(base_phrases[0].memo_tag.text, "メモ");
    assert!(!base_phrases[1].memo_tag.is_present());
    assert_eq!(sentence.to_knp().unwrap(), TENKI_KNP);
}

#[test]
fn test_knp_without_clause_tags() {
    let sentence = Sentence::from_knp(TENKI_NO_CLAUSE_KNP).unwrap();
    assert_eq!(sentence.layer(), Layer::Phrases);
    assert!(sentence.is_clause_tag_required());
    assert!(sentence.clauses().is_err());
    assert_eq!(sentence.phrases().unwrap().len(), 3);
    assert_eq!(sentence.to_knp().unwrap(), TENKI_NO_CLAUSE_KNP);
}

#[test]
fn test_jumanpp_round_trip() {
    let document = Document::from_jumanpp(TENKI_JUMANPP).unwrap();
    assert_eq!(document.to_jumanpp().unwrap(), TENKI_JUMANPP);
    assert!(document.is_knp_required());
    assert!(!document.is_jumanpp_required());
    assert!(document.base_phrases().is_err());

    let morphemes = document.morphemes().unwrap();
    assert_eq!(morphemes.len(), 7);
    assert_eq!(morphemes[2].lemma, "いい");
    assert_eq!(morphemes[2].canon(), Some("良い/よい"));
    assert_eq!(morphemes[3].conjform, "ダ列タ系連用テ形");
}

#[test]
fn test_knp_downgrades_to_jumanpp() {
    let document = Document::from_knp(TENKI_KNP).unwrap();
    let jumanpp = document.to_jumanpp().unwrap();
    assert!(jumanpp.starts_with("# S-ID:1\n天気 てんき 天気 名詞"));
    assert_eq!(jumanpp.lines().count(), 9);
    assert_eq!(document.to_raw_text(), "# S-ID:1\n天気がいいので散歩した。\n");
}

#[test]
fn test_line_by_line_text() {
    let document = Document::from_line_by_line_text("# S-ID:1\n天気がいいので散歩した。\n");
    assert_eq!(document.len(), 1);
    assert_eq!(document.sentence(0).unwrap().sid(), Some("1"));
    assert!(document.is_jumanpp_required());
    assert!(!document.is_senter_required());
    assert_eq!(document.to_raw_text(), "# S-ID:1\n天気がいいので散歩した。\n");
}

#[test]
fn test_global_numbering() {
    let document = Document::from_knp(DISCOURSE_KNP).unwrap();
    assert_eq!(document.len(), 2);
    assert_eq!(document.to_knp().unwrap(), DISCOURSE_KNP);

    let base_phrases = document.base_phrases().unwrap();
    for (i, base_phrase) in base_phrases.iter().enumerate() {
        assert_eq!(base_phrase.global_index(), i);
    }
    assert_eq!(base_phrases[5].id().sentence, 1);
    assert_eq!(base_phrases[5].id().index, 0);

    let morphemes = document.morphemes().unwrap();
    let mut end = 0;
    for morpheme in &morphemes {
        let span = morpheme.global_span();
        assert_eq!(span.start, end);
        end = span.end;
    }
    assert_eq!(end, document.text().chars().count());
}

#[test]
fn test_standalone_sentence_numbering() {
    let knp: String = DISCOURSE_KNP
        .split_inclusive('\n')
        .skip_while(|line| *line != "# S-ID:2\n")
        .collect();
    let sentence = Sentence::from_knp(&knp).unwrap();
    let node = sentence.as_node();
    assert!(!node.has_document());
    assert!(node.document().is_err());
    let base_phrases = sentence.base_phrases().unwrap();
    assert_eq!(base_phrases[1].global_index(), 1);
    assert_eq!(base_phrases[0].parent(), Some(base_phrases[1]));
}
