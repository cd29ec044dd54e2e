use std::fmt;

/// Dependency type of a phrase or base phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepType {
    Dependency,
    Parallel,
    Apposition,
    ImperfectParallel,
}

impl DepType {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "D" => Some(DepType::Dependency),
            "P" => Some(DepType::Parallel),
            "A" => Some(DepType::Apposition),
            "I" => Some(DepType::ImperfectParallel),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            DepType::Dependency => "D",
            DepType::Parallel => "P",
            DepType::Apposition => "A",
            DepType::ImperfectParallel => "I",
        }
    }
}

impl fmt::Display for DepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
