use std::fmt;
use std::str::FromStr;

use crate::errors::KnpError;
use crate::units::ClauseId;

/// The seven coarse discourse relation labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscourseRelationLabel {
    NoRelation,
    CauseReason,
    Purpose,
    Condition,
    Evidence,
    Contrast,
    Concession,
}

impl DiscourseRelationLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            DiscourseRelationLabel::NoRelation => "談話関係なし",
            DiscourseRelationLabel::CauseReason => "原因・理由",
            DiscourseRelationLabel::Purpose => "目的",
            DiscourseRelationLabel::Condition => "条件",
            DiscourseRelationLabel::Evidence => "根拠",
            DiscourseRelationLabel::Contrast => "対比",
            DiscourseRelationLabel::Concession => "逆接",
        }
    }
}

impl fmt::Display for DiscourseRelationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fine-grained tags found in annotations, each mapping to one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscourseRelationTag {
    NoRelation,
    CauseReason,
    CauseReasonForward,
    CauseReasonBackward,
    /// `原因・理由-逆`, the clause-function spelling of a backward cause.
    CauseReasonBackward2,
    Purpose,
    PurposeForward,
    PurposeBackward,
    Condition,
    ConditionForward,
    ConditionBackward,
    NegativeCondition,
    Contrast,
    ContrastNoDirection,
    Concession,
    ConcessionForward,
    ConcessionBackward,
    ConcessiveCondition,
    Evidence,
    EvidenceForward,
    EvidenceBackward,
}

const TAGS: &[(DiscourseRelationTag, &str)] = &[
    (DiscourseRelationTag::NoRelation, "談話関係なし"),
    (DiscourseRelationTag::CauseReason, "原因・理由"),
    (DiscourseRelationTag::CauseReasonForward, "原因・理由(順方向)"),
    (DiscourseRelationTag::CauseReasonBackward, "原因・理由(逆方向)"),
    (DiscourseRelationTag::CauseReasonBackward2, "原因・理由-逆"),
    (DiscourseRelationTag::Purpose, "目的"),
    (DiscourseRelationTag::PurposeForward, "目的(順方向)"),
    (DiscourseRelationTag::PurposeBackward, "目的(逆方向)"),
    (DiscourseRelationTag::Condition, "条件"),
    (DiscourseRelationTag::ConditionForward, "条件(順方向)"),
    (DiscourseRelationTag::ConditionBackward, "条件(逆方向)"),
    (DiscourseRelationTag::NegativeCondition, "否定条件"),
    (DiscourseRelationTag::Contrast, "対比"),
    (DiscourseRelationTag::ContrastNoDirection, "対比(方向なし)"),
    (DiscourseRelationTag::Concession, "逆接"),
    (DiscourseRelationTag::ConcessionForward, "逆接・譲歩(順方向)"),
    (DiscourseRelationTag::ConcessionBackward, "逆接・譲歩(逆方向)"),
    (DiscourseRelationTag::ConcessiveCondition, "条件-逆条件"),
    (DiscourseRelationTag::Evidence, "根拠"),
    (DiscourseRelationTag::EvidenceForward, "その他根拠(順方向)"),
    (DiscourseRelationTag::EvidenceBackward, "その他根拠(逆方向)"),
];

impl DiscourseRelationTag {
    pub fn as_str(self) -> &'static str {
        TAGS.iter()
            .find(|(tag, _)| *tag == self)
            .map(|(_, text)| *text)
            .unwrap_or_default()
    }

    pub fn all() -> impl Iterator<Item = DiscourseRelationTag> {
        TAGS.iter().map(|(tag, _)| *tag)
    }

    pub fn label(self) -> DiscourseRelationLabel {
        use DiscourseRelationTag::*;
        match self {
            NoRelation => DiscourseRelationLabel::NoRelation,
            CauseReason | CauseReasonForward | CauseReasonBackward | CauseReasonBackward2 => {
                DiscourseRelationLabel::CauseReason
            }
            Purpose | PurposeForward | PurposeBackward => DiscourseRelationLabel::Purpose,
            Condition | ConditionForward | ConditionBackward | NegativeCondition => {
                DiscourseRelationLabel::Condition
            }
            Contrast | ContrastNoDirection => DiscourseRelationLabel::Contrast,
            Concession | ConcessionForward | ConcessionBackward | ConcessiveCondition => {
                DiscourseRelationLabel::Concession
            }
            Evidence | EvidenceForward | EvidenceBackward => DiscourseRelationLabel::Evidence,
        }
    }

    /// True for backward tags: the annotated clause is the head, not the modifier.
    pub fn need_swap(self) -> bool {
        use DiscourseRelationTag::*;
        matches!(
            self,
            CauseReasonBackward
                | CauseReasonBackward2
                | PurposeBackward
                | ConditionBackward
                | ConcessionBackward
                | EvidenceBackward
        )
    }
}

impl FromStr for DiscourseRelationTag {
    type Err = KnpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TAGS.iter()
            .find(|(_, text)| *text == s)
            .map(|(tag, _)| *tag)
            .ok_or_else(|| KnpError::UnknownLabel {
                kind: "discourse relation",
                label: s.to_string(),
            })
    }
}

impl fmt::Display for DiscourseRelationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed, labeled edge from a modifier clause to a head clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscourseRelation {
    /// Sentence id used in the fstring form.
    pub sid: String,
    /// Sentence-local index of the head clause's end base phrase.
    pub base_phrase_index: usize,
    pub label: DiscourseRelationLabel,
    pub tag: DiscourseRelationTag,
    pub modifier: ClauseId,
    pub head: ClauseId,
    /// True for relations derived from clause-function features.
    pub is_explicit: bool,
}

impl DiscourseRelation {
    pub(crate) fn new(
        sid: String,
        base_phrase_index: usize,
        tag: DiscourseRelationTag,
        modifier: ClauseId,
        head: ClauseId,
        is_explicit: bool,
    ) -> Self {
        Self {
            sid,
            base_phrase_index,
            label: tag.label(),
            tag,
            modifier,
            head,
            is_explicit,
        }
    }

    /// Two relations are the same edge when label and both clauses agree.
    pub fn same_edge(&self, other: &DiscourseRelation) -> bool {
        self.label == other.label && self.modifier == other.modifier && self.head == other.head
    }

    pub fn to_fstring(&self) -> String {
        format!(
            "<談話関係:{}/{}/{}>",
            self.sid, self.base_phrase_index, self.label
        )
    }
}
