use serde::{Deserialize, Serialize};
use std::fmt;

use crate::terms::Term;

/// A reachability claim `lhs => rhs requires R ensures E`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub label: String,
    pub lhs: Term,
    pub rhs: Term,
    #[serde(default)]
    pub requires: Vec<Term>,
    #[serde(default)]
    pub ensures: Vec<Term>,
}

impl Claim {
    pub fn new(label: impl Into<String>, lhs: Term, rhs: Term) -> Self {
        Self {
            label: label.into(),
            lhs,
            rhs,
            requires: Vec::new(),
            ensures: Vec::new(),
        }
    }

    pub fn with_requires(mut self, requires: impl IntoIterator<Item = Term>) -> Self {
        self.requires.extend(requires);
        self
    }

    pub fn with_ensures(mut self, ensures: impl IntoIterator<Item = Term>) -> Self {
        self.ensures.extend(ensures);
        self
    }

    /// Conjunction of the side conditions on `lhs`.
    pub fn requires_pred(&self) -> Term {
        Term::ml_and(self.requires.iter().cloned())
    }

    /// Conjunction of the side conditions on `rhs`.
    pub fn ensures_pred(&self) -> Term {
        Term::ml_and(self.ensures.iter().cloned())
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "claim [{}]: {} => {}", self.label, self.lhs, self.rhs)?;
        if !self.requires.is_empty() {
            write!(f, " requires {}", self.requires_pred())?;
        }
        if !self.ensures.is_empty() {
            write!(f, " ensures {}", self.ensures_pred())?;
        }
        Ok(())
    }
}
