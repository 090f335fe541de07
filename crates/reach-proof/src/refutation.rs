use reach_ir::{Sort, Term};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::meta::ProofMeta;
use crate::record::ProofRecord;
use crate::store::ProofDir;
use crate::{ProofError, ProofStatus};

/// Answer of a satisfiability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SatResult {
    Sat,
    Unsat,
    Unknown,
}

impl fmt::Display for SatResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SatResult::Sat => write!(f, "sat"),
            SatResult::Unsat => write!(f, "unsat"),
            SatResult::Unknown => write!(f, "unknown"),
        }
    }
}

/// Sub-proof that a branch guard is infeasible under the path condition
/// before the branch.
///
/// Passes once the conjunction of `pre_constraints` and `last_constraint`
/// is shown unsatisfiable.
#[derive(Debug, Clone)]
pub struct RefutationProof {
    pub meta: ProofMeta,
    /// Sort of the constraint formulas (`Bool`).
    pub sort: Sort,
    /// Path condition before the refuted branch, as boolean equalities.
    pub pre_constraints: Vec<Term>,
    /// The branch guard being refuted, as a boolean equality.
    pub last_constraint: Term,
    /// Backend-simplified form of the whole query, once computed.
    pub simplified: Option<Term>,
    /// Solver answer, once computed.
    pub result: Option<SatResult>,
}

impl RefutationProof {
    pub fn new(
        id: impl Into<String>,
        sort: Sort,
        pre_constraints: Vec<Term>,
        last_constraint: Term,
        proof_dir: Option<ProofDir>,
    ) -> Self {
        Self {
            meta: ProofMeta::new(id, proof_dir),
            sort,
            pre_constraints,
            last_constraint,
            simplified: None,
            result: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.meta.id
    }

    /// Conjunction of all premises and the refuted guard.
    pub fn query(&self) -> Term {
        Term::ml_and(
            self.pre_constraints
                .iter()
                .cloned()
                .chain([self.last_constraint.clone()]),
        )
    }

    pub fn status(&self) -> ProofStatus {
        if self.meta.admitted {
            return ProofStatus::Passed;
        }
        match self.result {
            Some(SatResult::Unsat) => ProofStatus::Passed,
            Some(SatResult::Sat) => ProofStatus::Failed,
            Some(SatResult::Unknown) | None => ProofStatus::Pending,
        }
    }

    pub fn summary(&self) -> Vec<String> {
        vec![
            format!("RefutationProof: {}", self.meta.id),
            format!("    status: {}", self.status()),
            format!("    admitted: {}", self.meta.admitted),
            format!("    pre-constraints: {}", self.pre_constraints.len()),
            format!("    last constraint: {}", self.last_constraint),
            format!(
                "    result: {}",
                self.result.map_or_else(|| "none".to_string(), |r| r.to_string())
            ),
        ]
    }

    pub fn to_record(&self) -> ProofRecord {
        ProofRecord::Refutation(self.to_refutation_record())
    }

    pub fn write_proof(&self) -> Result<(), ProofError> {
        self.meta.write(&self.to_record())
    }
}
