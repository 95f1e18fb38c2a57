//! Decisions and their console vocabulary

use std::fmt;

use serde::{Deserialize, Serialize};

/// A choice made by one agent in one round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Cooperate. The classic table calls this "keep silent".
    Trust,
    Betray,
}

impl Decision {
    /// Label shown to the operator
    pub fn label(self, dialect: Dialect) -> &'static str {
        match (self, dialect) {
            (Decision::Trust, Dialect::Classic) => "Keep silent",
            (Decision::Trust, Dialect::Trust) => "Trust",
            (Decision::Betray, _) => "Betray",
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Decision::Trust => Decision::Betray,
            Decision::Betray => Decision::Trust,
        }
    }

    pub fn is_betray(self) -> bool {
        self == Decision::Betray
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(Dialect::Trust))
    }
}

/// Which letters and labels the interactive agent uses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// `s` = keep silent, `b` = betray
    Classic,
    /// `t` = trust, `b` = betray
    #[default]
    Trust,
}

impl Dialect {
    pub fn prompt(self) -> &'static str {
        match self {
            Dialect::Classic => "Keep silent or betray? (s/b)",
            Dialect::Trust => "Trust or betray? (t/b)",
        }
    }

    pub(crate) fn trust_key(self) -> char {
        match self {
            Dialect::Classic => 's',
            Dialect::Trust => 't',
        }
    }
}

/// Map one input character to a decision, ignoring case.
///
/// Returns `None` for any character the dialect does not recognize.
pub fn parse_decision(input: char, dialect: Dialect) -> Option<Decision> {
    let c = input.to_ascii_lowercase();
    if c == dialect.trust_key() {
        Some(Decision::Trust)
    } else if c == 'b' {
        Some(Decision::Betray)
    } else {
        None
    }
}
