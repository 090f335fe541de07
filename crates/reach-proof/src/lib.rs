#![doc = include_str!("../README.md")]

//! Proof state for all-path reachability.
//!
//! Status is never stored: [`Reachability::status`] recomputes it from the
//! current graph and from the sub-proofs, which are read back from the proof
//! directory each time.

pub mod apr;
pub mod bmc;
pub mod meta;
pub mod proof;
pub mod record;
pub mod refutation;
pub mod store;

pub use apr::{AprProof, LeafClass, Reachability};
pub use bmc::AprBmcProof;
pub use meta::ProofMeta;
pub use proof::Proof;
pub use record::ProofRecord;
pub use refutation::{RefutationProof, SatResult};
pub use store::ProofDir;

use reach_ir::SortError;
use reach_kcfg::{KcfgError, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Derived outcome of a proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProofStatus {
    Pending,
    Passed,
    Failed,
}

impl fmt::Display for ProofStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProofStatus::Pending => write!(f, "PENDING"),
            ProofStatus::Passed => write!(f, "PASSED"),
            ProofStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// Errors raised while building, classifying or persisting proofs.
#[derive(Debug, Error)]
pub enum ProofError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed proof record: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Kcfg(#[from] KcfgError),
    #[error(transparent)]
    Sort(#[from] SortError),
    #[error("All node refutations must be included in subproofs, violators are: {}", .0.join(", "))]
    UndeclaredRefutation(Vec<String>),
    #[error("Subproof {0} is neither cached nor stored in the proof directory")]
    SubproofUnavailable(String),
    #[error("Proof {id} is a {found}, expected {expected}")]
    UnexpectedProofType {
        id: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Could not load proof {id}: {path} does not exist")]
    ProofNotFound { id: String, path: PathBuf },
    #[error("Node {0} is not reachable from the initial node")]
    Unreachable(NodeId),
}
