use reach_ir::{CSubst, CTerm, Claim, LogEntry, Term};
use reach_proof::SatResult;

/// Parameters of one symbolic execution request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecuteRequest {
    /// Maximum number of rewrite steps; the backend default when `None`.
    pub max_depth: Option<usize>,
    /// Rules before which execution stops.
    pub cut_point_rules: Vec<String>,
    /// Rules after which execution stops.
    pub terminal_rules: Vec<String>,
    /// Rule set to execute with; the main module when `None`.
    pub module_name: Option<String>,
}

/// Response to an execution request.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteResult {
    /// Number of steps taken from the input state to `state`.
    pub depth: usize,
    /// The state execution stopped at.
    pub state: CTerm,
    /// Possible successors of `state` when execution stopped at a branch or
    /// cut point. Empty when `state` cannot step.
    pub next_states: Vec<CTerm>,
    /// Rules applied along the way.
    pub rules: Vec<String>,
    pub logs: Vec<LogEntry>,
}

/// The rewrite backend: a request/response oracle over symbolic states.
///
/// Calls are blocking and never overlap within one proof.
pub trait Backend {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Symbolically execute `cterm` until a branch, a cut point, a terminal
    /// rule or the depth bound.
    fn execute(
        &mut self,
        cterm: &CTerm,
        request: &ExecuteRequest,
    ) -> Result<ExecuteResult, Self::Error>;

    fn simplify(&mut self, cterm: &CTerm) -> Result<CTerm, Self::Error>;

    /// Whether `antecedent` implies `consequent`; on success the witness
    /// instantiates `consequent` to `antecedent`.
    fn implies(
        &mut self,
        antecedent: &CTerm,
        consequent: &CTerm,
    ) -> Result<Option<CSubst>, Self::Error>;

    /// Make `claims` available as rewrite rules in module `module_name`,
    /// importing `main_module`.
    fn add_module(
        &mut self,
        main_module: &str,
        module_name: &str,
        claims: &[Claim],
        priority: u32,
    ) -> Result<(), Self::Error>;
}

/// Satisfiability oracle for refutation queries.
pub trait ConstraintSolver {
    type Error: std::error::Error + Send + Sync + 'static;

    fn check_sat(&mut self, constraints: &[Term]) -> Result<SatResult, Self::Error>;
}
