use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::hash::sha256_hex_str;
use crate::subst::CSubst;
use crate::terms::Term;

/// A constrained term: a configuration plus the path constraints under which
/// it is reachable.
///
/// Constraints are kept normalized (conjunctions flattened, `#Top` removed,
/// sorted and deduplicated), so two states that differ only in how their
/// constraints were accumulated compare and hash equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawCTerm")]
pub struct CTerm {
    config: Term,
    constraints: Vec<Term>,
}

#[derive(Deserialize)]
struct RawCTerm {
    config: Term,
    #[serde(default)]
    constraints: Vec<Term>,
}

impl From<RawCTerm> for CTerm {
    fn from(raw: RawCTerm) -> Self {
        CTerm::new(raw.config, raw.constraints)
    }
}

impl CTerm {
    pub fn new(config: Term, constraints: impl IntoIterator<Item = Term>) -> Self {
        let normalized: BTreeSet<Term> = constraints
            .into_iter()
            .flat_map(Term::flatten_and)
            .collect();
        Self {
            config,
            constraints: normalized.into_iter().collect(),
        }
    }

    /// An unconstrained state.
    pub fn from_config(config: Term) -> Self {
        Self::new(config, [])
    }

    pub fn config(&self) -> &Term {
        &self.config
    }

    pub fn constraints(&self) -> &[Term] {
        &self.constraints
    }

    /// Conjunction of all constraints.
    pub fn constraint(&self) -> Term {
        Term::ml_and(self.constraints.iter().cloned())
    }

    /// Contents of the first cell labelled `label` in the configuration.
    pub fn cell(&self, label: &str) -> Option<&Term> {
        self.config.cell(label)
    }

    /// A copy of this state with `constraint` conjoined.
    pub fn add_constraint(&self, constraint: Term) -> Self {
        Self::new(
            self.config.clone(),
            self.constraints.iter().cloned().chain([constraint]),
        )
    }

    /// Deterministic content hash of the configuration and constraints.
    pub fn hash(&self) -> String {
        // Term serialization has a fixed field order, so the encoding is canonical.
        let encoded = serde_json::to_string(&(&self.config, &self.constraints))
            .unwrap_or_else(|_| format!("{self:?}"));
        sha256_hex_str(&encoded)
    }

    /// Match `pattern` (a more general state) against this state.
    ///
    /// On success returns the substitution instantiating the pattern's
    /// configuration to this one, together with the constraints of `self`
    /// that the instantiated pattern does not already carry. Those remaining
    /// constraints are what a Cover from `self` to `pattern` must record.
    pub fn match_with_constraint(&self, pattern: &CTerm) -> Option<CSubst> {
        let subst = pattern.config.match_term(&self.config)?;
        let instantiated: BTreeSet<Term> = pattern
            .constraints
            .iter()
            .flat_map(|c| subst.apply(c).flatten_and())
            .collect();
        let remaining = self
            .constraints
            .iter()
            .filter(|c| !instantiated.contains(*c))
            .cloned();
        Some(CSubst::new(subst, remaining))
    }

    /// Free variables of the configuration and constraints.
    pub fn free_vars(&self) -> BTreeSet<String> {
        let mut vars = self.config.free_vars();
        for c in &self.constraints {
            vars.extend(c.free_vars());
        }
        vars
    }
}

impl fmt::Display for CTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config)?;
        for c in &self.constraints {
            write!(f, "\n  #And {c}")?;
        }
        Ok(())
    }
}
