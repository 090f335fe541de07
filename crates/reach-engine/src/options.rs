use serde::{Deserialize, Serialize};
use std::fmt;

/// Options for [`crate::AprProver::advance_proof`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProverOptions {
    /// Stop after this many iterations; unbounded when `None`.
    pub max_iterations: Option<usize>,
    /// Step budget per backend call; backend default when `None`.
    pub execute_depth: Option<usize>,
    #[serde(default)]
    pub cut_point_rules: Vec<String>,
    #[serde(default)]
    pub terminal_rules: Vec<String>,
}

/// Why the proving loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// No pending leaves remain.
    Exhausted,
    /// The iteration budget ran out.
    IterationBound,
    /// An iteration left the graph unchanged.
    NoProgress,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Exhausted => write!(f, "exhausted"),
            StopReason::IterationBound => write!(f, "iteration bound"),
            StopReason::NoProgress => write!(f, "no progress"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceOutcome {
    pub iterations: usize,
    pub stop: StopReason,
}
