use crate::{ClauseRef, Document, Sentence};

const DOCUMENT_KNP: &str = include_str!("data/discourse_document.knp");
const INVALID_KNP: &str = include_str!("data/discourse_invalid.knp");
const CLAUSE_FUNCTION_KNP: &str = include_str!("data/discourse_clause_function.knp");
const INVALID_CLAUSE_FUNCTION_KNP: &str = include_str!("data/discourse_invalid_clause_function.knp");
const BOTH_KNP: &str = include_str!("data/discourse_both.knp");
const BACKWARD_KNP: [&str; 4] = [
    include_str!("data/discourse_backward_0.knp"),
    include_str!("data/discourse_backward_1.knp"),
    include_str!("data/discourse_backward_2.knp"),
    include_str!("data/discourse_backward_3.knp"),
];

/// Indices of the head clauses each clause points at, in document order.
fn heads(clauses: &[ClauseRef<'_>]) -> Vec<Vec<usize>> {
    clauses
        .iter()
        .map(|clause| {
            clause
                .discourse_relations()
                .iter()
                .filter_map(|relation| clause.relation_head(relation))
                .map(|head| head.global_index())
                .collect()
        })
        .collect()
}

#[test]
fn test_annotated_relations() {
    let document = Document::from_knp(DOCUMENT_KNP).unwrap();
    let clauses = document.clauses().unwrap();
    let relations = clauses[0].discourse_relations();
    assert_eq!(relations.len(), 2);

    assert_eq!(relations[0].sid, "1");
    assert_eq!(relations[0].base_phrase_index, 4);
    assert_eq!(relations[0].label.as_str(), "条件");
    assert_eq!(relations[0].modifier, clauses[0].id());
    assert_eq!(relations[0].head, clauses[1].id());
    assert!(!relations[0].is_explicit);
    assert_eq!(relations[0].to_fstring(), "<談話関係:1/4/条件>");

    assert_eq!(relations[1].sid, "2");
    assert_eq!(relations[1].base_phrase_index, 1);
    assert_eq!(clauses[0].relation_head(&relations[1]), Some(clauses[2]));

    assert_eq!(document.to_knp().unwrap(), DOCUMENT_KNP);
}

#[test]
fn test_relations_within_a_sentence() {
    let first: String = DOCUMENT_KNP
        .split_inclusive('\n')
        .take_while(|line| *line != "# S-ID:2\n")
        .collect();
    let sentence = Sentence::from_knp(&first).unwrap();
    let clauses = sentence.clauses().unwrap();
    assert_eq!(clauses[0].discourse_relations().len(), 1);
    assert_eq!(clauses[0].relation_head(&clauses[0].discourse_relations()[0]), Some(clauses[1]));
}

#[test]
fn test_invalid_annotations_are_skipped() {
    let document = Document::from_knp(INVALID_KNP).unwrap();
    let clauses = document.clauses().unwrap();
    assert!(clauses[0].discourse_relations().is_empty());
    assert_eq!(document.to_knp().unwrap(), INVALID_KNP);
}

#[test]
fn test_clause_function() {
    let document = Document::from_knp(CLAUSE_FUNCTION_KNP).unwrap();
    let clauses = document.clauses().unwrap();
    let relations = clauses[0].discourse_relations();
    assert_eq!(relations.len(), 1);
    assert!(relations[0].is_explicit);
    assert_eq!(relations[0].label.as_str(), "条件");
    assert_eq!(relations[0].base_phrase_index, 4);
    assert_eq!(heads(&clauses), vec![vec![1], vec![]]);

    let document = Document::from_knp(INVALID_CLAUSE_FUNCTION_KNP).unwrap();
    let clauses = document.clauses().unwrap();
    assert_eq!(heads(&clauses), vec![vec![], vec![]]);
}

#[test]
fn test_explicit_and_annotated_relation_merge() {
    let document = Document::from_knp(BOTH_KNP).unwrap();
    let clauses = document.clauses().unwrap();
    assert_eq!(clauses[0].discourse_relations().len(), 1);
}

#[test]
fn test_backward_clause_function() {
    let expected: [Vec<Vec<usize>>; 4] = [
        vec![vec![1], vec![]],
        vec![vec![1], vec![]],
        vec![vec![2], vec![2], vec![]],
        vec![vec![], vec![0]],
    ];
    for (knp, expected) in BACKWARD_KNP.iter().zip(expected.iter()) {
        let document = Document::from_knp(knp).unwrap();
        let clauses = document.clauses().unwrap();
        assert_eq!(&heads(&clauses), expected);
    }
}

#[test]
fn test_backward_clause_function_needs_a_document() {
    let second: String = BACKWARD_KNP[0]
        .split_inclusive('\n')
        .skip_while(|line| *line != "# S-ID:2\n")
        .collect();
    let sentence = Sentence::from_knp(&second).unwrap();
    let clauses = sentence.clauses().unwrap();
    assert!(clauses.iter().all(|clause| clause.discourse_relations().is_empty()));
}
