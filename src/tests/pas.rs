use crate::{ArgumentQuery, ArgumentType, BasePhraseRef, Document, ExophoraReferent, Sentence};

const CASE_ANALYSIS_KNP: &str = include_str!("data/pas_case_analysis.knp");
const PAS_KNP: &str = include_str!("data/pas_pas.knp");
const INTER_SENTENTIAL_KNP: &str = include_str!("data/pas_inter_sentential.knp");
const INTERJECTION_KNP: &str = include_str!("data/pas_interjection.knp");

fn strict() -> ArgumentQuery {
    ArgumentQuery::default().with_relax(false)
}

fn endophora_target<'a>(predicate: &BasePhraseRef<'a>, case: &str) -> (BasePhraseRef<'a>, ArgumentType) {
    let arguments = predicate.get_arguments(case, strict());
    assert_eq!(arguments.len(), 1, "case {}", case);
    let target = predicate.argument_base_phrase(&arguments[0]).unwrap();
    (target, arguments[0].arg_type())
}

#[test]
fn test_case_analysis_result() {
    let document = Document::from_knp(CASE_ANALYSIS_KNP).unwrap();
    let base_phrases = document.base_phrases().unwrap();
    let pas = base_phrases[4].pas().unwrap();
    assert_eq!(pas.cfid(), Some("行く/いく:動12"));
    assert_eq!(pas.cases(), vec!["ガ", "ヘ"]);
    assert_eq!(pas.predicate(), base_phrases[4].id());

    let (target, arg_type) = endophora_target(&base_phrases[4], "ガ");
    assert_eq!(target, base_phrases[0]);
    assert_eq!(arg_type, ArgumentType::CaseHidden);

    let (target, arg_type) = endophora_target(&base_phrases[4], "ヘ");
    assert_eq!(target, base_phrases[3]);
    assert_eq!(arg_type, ArgumentType::CaseExplicit);

    let (target, _) = endophora_target(&base_phrases[2], "ヲ");
    assert_eq!(target.text(), "ご飯を");
    assert!(base_phrases[0].pas().map_or(true, |pas| pas.is_empty()));
}

#[test]
fn test_predicate_argument_structure() {
    let document = Document::from_knp(PAS_KNP).unwrap();
    let base_phrases = document.base_phrases().unwrap();
    let predicate = base_phrases[4];
    let pas = predicate.pas().unwrap();
    assert_eq!(pas.cfid(), Some("行く/いく:動12"));
    assert_eq!(pas.cases(), vec!["ガ", "ニ", "ヘ"]);

    let (target, arg_type) = endophora_target(&predicate, "ガ");
    assert_eq!(target.text(), "彼は");
    assert_eq!(arg_type, ArgumentType::CaseHidden);

    let arguments = predicate.get_arguments("ニ", strict());
    assert_eq!(arguments.len(), 1);
    let exophora = arguments[0].as_exophora().unwrap();
    assert_eq!(exophora.exophora_referent, ExophoraReferent::new("著者"));
    assert_eq!(exophora.eid, 0);
    assert_eq!(arguments[0].arg_type(), ArgumentType::Exophora);

    let (target, arg_type) = endophora_target(&predicate, "ヘ");
    assert_eq!(target.text(), "大学へ");
    assert_eq!(arg_type, ArgumentType::CaseExplicit);
}

#[test]
fn test_inter_sentential_argument() {
    let document = Document::from_knp(INTER_SENTENTIAL_KNP).unwrap();
    let base_phrases = document.base_phrases().unwrap();
    let predicate = base_phrases[4];
    assert_eq!(predicate.sentence().sid(), Some("000-1"));

    let (target, arg_type) = endophora_target(&predicate, "ガ");
    assert_eq!(target, base_phrases[0]);
    assert_eq!(target.id().sentence, 0);
    assert_eq!(arg_type, ArgumentType::Omission);

    let arguments = predicate.get_arguments("ニ", strict());
    assert_eq!(arguments[0].as_exophora().unwrap().eid, 2);
    assert_eq!(document.pas_list().len(), base_phrases.len());
}

#[test]
fn test_interjection_has_no_arguments() {
    let document = Document::from_knp(INTERJECTION_KNP).unwrap();
    let base_phrases = document.base_phrases().unwrap();
    let pas = base_phrases[1].pas().unwrap();
    assert_eq!(pas.cfid(), Some(":/::判0"));
    assert!(pas.cases().is_empty());
}

#[test]
fn test_relaxed_arguments_need_a_document() {
    let knp = "# S-ID:1\n\
* 1D\n\
+ 1D <rel type=\"=\" target=\"著者\"/>\n\
私 わたし 私 名詞 6 普通名詞 1 * 0 * 0\n\
は は は 助詞 9 副助詞 2 * 0 * 0\n\
* -1D\n\
+ -1D <rel type=\"ガ\" target=\"著者\"/>\n\
行く いく 行く 動詞 2 * 0 子音動詞カ行促音便形 3 基本形 2\n\
EOS\n";
    let sentence = Sentence::from_knp(knp).unwrap();
    let predicate = sentence.base_phrases().unwrap()[1];
    let arguments = predicate.get_arguments("ガ", ArgumentQuery::default());
    assert_eq!(arguments.len(), 1);
    assert!(arguments[0].as_exophora().is_some());

    let document = Document::from_sentences(vec![sentence]);
    let base_phrases = document.base_phrases().unwrap();
    let arguments = base_phrases[1].get_arguments("ガ", ArgumentQuery::default());
    assert_eq!(arguments.len(), 2);
    assert!(arguments
        .iter()
        .filter_map(|arg| arg.as_endophora())
        .any(|arg| arg.base_phrase == base_phrases[0].id()));
}
