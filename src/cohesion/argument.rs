use std::fmt;

use super::exophora::ExophoraReferent;
use crate::units::BasePhraseId;

/// How an argument is realized relative to its predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentType {
    /// `C`: overt case marking.
    CaseExplicit,
    /// `N`: direct dependency without a matching case marker.
    CaseHidden,
    /// `O`: zero anaphora.
    Omission,
    /// `D`: demonstrative.
    Demonstrative,
    /// `E`: exophora.
    Exophora,
    /// `U`: the predicate has no dependency assignment.
    Unassigned,
}

impl ArgumentType {
    pub fn from_flag(flag: &str) -> Option<Self> {
        Some(match flag {
            "C" => ArgumentType::CaseExplicit,
            "N" => ArgumentType::CaseHidden,
            "O" => ArgumentType::Omission,
            "D" => ArgumentType::Demonstrative,
            "E" => ArgumentType::Exophora,
            "U" => ArgumentType::Unassigned,
            _ => return None,
        })
    }

    pub fn flag(self) -> &'static str {
        match self {
            ArgumentType::CaseExplicit => "C",
            ArgumentType::CaseHidden => "N",
            ArgumentType::Omission => "O",
            ArgumentType::Demonstrative => "D",
            ArgumentType::Exophora => "E",
            ArgumentType::Unassigned => "U",
        }
    }
}

/// An argument pointing at a base phrase of the document.
#[derive(Debug, Clone)]
pub struct EndophoraArgument {
    pub case: String,
    pub base_phrase: BasePhraseId,
    pub arg_type: ArgumentType,
    pub optional: bool,
}

/// An argument pointing outside the text.
#[derive(Debug, Clone)]
pub struct ExophoraArgument {
    pub case: String,
    pub exophora_referent: ExophoraReferent,
    /// Entity id; rewritten when entities are merged.
    pub eid: u32,
    pub optional: bool,
}

#[derive(Debug, Clone)]
pub enum Argument {
    Endophora(EndophoraArgument),
    Exophora(ExophoraArgument),
}

impl Argument {
    pub fn case(&self) -> &str {
        match self {
            Argument::Endophora(arg) => &arg.case,
            Argument::Exophora(arg) => &arg.case,
        }
    }

    pub fn arg_type(&self) -> ArgumentType {
        match self {
            Argument::Endophora(arg) => arg.arg_type,
            Argument::Exophora(_) => ArgumentType::Exophora,
        }
    }

    pub fn is_optional(&self) -> bool {
        match self {
            Argument::Endophora(arg) => arg.optional,
            Argument::Exophora(arg) => arg.optional,
        }
    }

    pub(crate) fn set_optional(&mut self) {
        match self {
            Argument::Endophora(arg) => arg.optional = true,
            Argument::Exophora(arg) => arg.optional = true,
        }
    }

    pub fn is_special(&self) -> bool {
        matches!(self, Argument::Exophora(_))
    }

    pub fn as_endophora(&self) -> Option<&EndophoraArgument> {
        match self {
            Argument::Endophora(arg) => Some(arg),
            Argument::Exophora(_) => None,
        }
    }

    pub fn as_exophora(&self) -> Option<&ExophoraArgument> {
        match self {
            Argument::Exophora(arg) => Some(arg),
            Argument::Endophora(_) => None,
        }
    }
}

/// Two arguments are equal when they fill the same case with the same target.
impl PartialEq for Argument {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Argument::Endophora(a), Argument::Endophora(b)) => {
                a.case == b.case && a.base_phrase == b.base_phrase
            }
            (Argument::Exophora(a), Argument::Exophora(b)) => {
                a.case == b.case && a.exophora_referent == b.exophora_referent
            }
            _ => false,
        }
    }
}

impl Eq for Argument {}

impl fmt::Display for ExophoraArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.exophora_referent.half_width_text())
    }
}
