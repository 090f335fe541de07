#![doc = include_str!("../README.md")]

//! Reachability proving engine.
//!
//! The engine never inspects program syntax itself: stepping, simplification
//! and implication checks go to a [`Backend`], and domain knowledge enters
//! through the strategy closures handed to the provers.

pub mod backend;
pub mod bmc;
pub mod explore;
pub mod options;
pub mod prover;
pub mod refute;
pub mod runner;

pub use backend::{Backend, ConstraintSolver, ExecuteRequest, ExecuteResult};
pub use bmc::{AprBmcProver, SameLoop};
pub use explore::{Extension, KcfgExplore};
pub use options::{AdvanceOutcome, ProverOptions, StopReason};
pub use prover::{AprProver, BranchExtractor, NodeAbstraction, TerminalCheck};
pub use refute::{construct_node_refutation, RefutationProver, RefuteError};
pub use runner::{RunError, RunOptions, RunOutput, RunRequest};

use reach_ir::SortError;
use reach_kcfg::KcfgError;
use reach_proof::ProofError;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by a proving step. None of them is retried.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Backend error: {0}")]
    Backend(#[source] BoxError),
    #[error("Constraint solver error: {0}")]
    Solver(#[source] BoxError),
    #[error(transparent)]
    Proof(#[from] ProofError),
    #[error(transparent)]
    Kcfg(#[from] KcfgError),
    #[error(transparent)]
    Sort(#[from] SortError),
    #[error(transparent)]
    Refute(#[from] RefuteError),
    #[error("{0}")]
    Policy(String),
}

impl EngineError {
    pub(crate) fn backend<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        EngineError::Backend(Box::new(err))
    }

    pub(crate) fn solver<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        EngineError::Solver(Box::new(err))
    }
}
