//! Shared fixtures: a scripted rewrite backend and a table-driven solver.

#![allow(dead_code)]

use reach_engine::{Backend, ConstraintSolver, ExecuteRequest, ExecuteResult, KcfgExplore};
use reach_ir::{CSubst, CTerm, Claim, Definition, LogEntry, SortLattice, Term};
use reach_proof::SatResult;
use std::collections::{HashMap, HashSet};
use std::convert::Infallible;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("no scripted step for {0}")]
pub struct ScriptError(pub String);

/// What the backend does from a given configuration.
#[derive(Debug, Clone)]
pub enum Step {
    /// Take `depth` steps to `next`, keeping the path constraints.
    Block { depth: usize, next: Term },
    /// Stop at a branch; one successor per `(guard, next)` pair.
    Branch(Vec<(Term, Term)>),
    /// Two successors without guards.
    Choice(Term, Term),
    Stuck,
}

/// Backend whose behavior is a lookup table keyed by configuration.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    steps: HashMap<Term, Step>,
    subsumed: HashSet<Term>,
    /// `(module, claim labels, priority)` per registered rule set.
    pub modules: Vec<(String, Vec<String>, u32)>,
    pub requests: Vec<ExecuteRequest>,
    pub simplified: usize,
}

impl ScriptedBackend {
    pub fn step(mut self, from: Term, step: Step) -> Self {
        self.steps.insert(from, step);
        self
    }

    /// States with this configuration imply the target.
    pub fn subsumed(mut self, config: Term) -> Self {
        self.subsumed.insert(config);
        self
    }
}

impl Backend for ScriptedBackend {
    type Error = ScriptError;

    fn execute(
        &mut self,
        cterm: &CTerm,
        request: &ExecuteRequest,
    ) -> Result<ExecuteResult, ScriptError> {
        self.requests.push(request.clone());
        let step = self
            .steps
            .get(cterm.config())
            .cloned()
            .ok_or_else(|| ScriptError(cterm.config().to_string()))?;
        let logs = vec![LogEntry::rewrite("scripted", "STEP")];
        let result = match step {
            Step::Block { depth, next } => ExecuteResult {
                depth,
                state: CTerm::new(next, cterm.constraints().to_vec()),
                next_states: vec![],
                rules: vec!["STEP".to_string()],
                logs,
            },
            Step::Branch(guards) => ExecuteResult {
                depth: 0,
                state: cterm.clone(),
                next_states: guards
                    .into_iter()
                    .map(|(guard, next)| {
                        CTerm::new(next, cterm.constraints().iter().cloned().chain([guard]))
                    })
                    .collect(),
                rules: vec![],
                logs,
            },
            Step::Choice(a, b) => ExecuteResult {
                depth: 0,
                state: cterm.clone(),
                next_states: vec![
                    CTerm::new(a, cterm.constraints().to_vec()),
                    CTerm::new(b, cterm.constraints().to_vec()),
                ],
                rules: vec![],
                logs,
            },
            Step::Stuck => ExecuteResult {
                depth: 0,
                state: cterm.clone(),
                next_states: vec![],
                rules: vec![],
                logs: vec![],
            },
        };
        Ok(result)
    }

    fn simplify(&mut self, cterm: &CTerm) -> Result<CTerm, ScriptError> {
        self.simplified += 1;
        Ok(cterm.clone())
    }

    fn implies(
        &mut self,
        antecedent: &CTerm,
        _consequent: &CTerm,
    ) -> Result<Option<CSubst>, ScriptError> {
        Ok(self
            .subsumed
            .contains(antecedent.config())
            .then(CSubst::empty))
    }

    fn add_module(
        &mut self,
        _main_module: &str,
        module_name: &str,
        claims: &[Claim],
        priority: u32,
    ) -> Result<(), ScriptError> {
        self.modules.push((
            module_name.to_string(),
            claims.iter().map(|c| c.label.clone()).collect(),
            priority,
        ));
        Ok(())
    }
}

/// Unsat exactly when one of the listed constraints is asserted.
#[derive(Debug, Default)]
pub struct TableSolver {
    pub infeasible: Vec<Term>,
    pub queries: Vec<Vec<Term>>,
}

impl ConstraintSolver for TableSolver {
    type Error = Infallible;

    fn check_sat(&mut self, constraints: &[Term]) -> Result<SatResult, Infallible> {
        self.queries.push(constraints.to_vec());
        if constraints.iter().any(|c| self.infeasible.contains(c)) {
            Ok(SatResult::Unsat)
        } else {
            Ok(SatResult::Sat)
        }
    }
}

pub fn definition() -> Definition {
    Definition::new("IMP", SortLattice::new([]), [])
}

pub fn explore(backend: ScriptedBackend) -> KcfgExplore<ScriptedBackend> {
    KcfgExplore::new(backend, definition())
}

/// `<generatedTop>` with a `<k>` cell holding `k` and a `<pc>` cell.
pub fn config(k: Term, pc: i64) -> Term {
    Term::apply(
        "<generatedTop>",
        vec![
            Term::apply("<k>", vec![k]),
            Term::apply("<pc>", vec![Term::int(pc)]),
        ],
    )
}

/// A straight-line program point.
pub fn at(n: i64) -> Term {
    config(Term::apply("step", vec![Term::int(n)]), n)
}

/// The `n`th visit of the loop head at program counter 5.
pub fn loop_head(n: i64) -> Term {
    config(Term::apply("jumpi", vec![Term::int(n)]), 5)
}

/// Same loop: same `<pc>` and a `jumpi` at the top of `<k>`.
pub fn same_loop(a: &CTerm, b: &CTerm) -> bool {
    let is_jump = |c: &CTerm| {
        matches!(
            c.cell("<k>"),
            Some(Term::Apply { label, .. }) if label == "jumpi"
        )
    };
    a.cell("<pc>") == b.cell("<pc>") && is_jump(a) && is_jump(b)
}

pub fn guard(name: &str) -> Term {
    Term::equals_true(Term::var(name))
}
