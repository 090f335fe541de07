//! Refuting infeasible branches of a proof.
//!
//! These tests verify that:
//! 1. A stuck branch of a Split can be refuted and, once the solver shows
//!    its guard infeasible, the proof passes
//! 2. A refuted leaf is excluded from the failing set before it is solved
//! 3. Linear paths and nondeterministic branches cannot be refuted
//! 4. Undoing a refutation restores the leaf to failing

mod common;

use common::{at, explore, guard, ScriptedBackend, Step, TableSolver};
use reach_engine::{AprProver, EngineError, ProverOptions, RefuteError};
use reach_ir::{CTerm, Claim, Term};
use reach_kcfg::NodeId;
use reach_proof::{AprProof, LeafClass, ProofDir, ProofStatus, Reachability, SatResult};

fn negated() -> Term {
    Term::equals_true(Term::not_bool(Term::var("B")))
}

/// at(0) splits on B into at(1) (subsumed) and at(2) (stuck).
fn split_backend() -> ScriptedBackend {
    ScriptedBackend::default()
        .step(
            at(0),
            Step::Branch(vec![(guard("B"), at(1)), (negated(), at(2))]),
        )
        .step(at(2), Step::Stuck)
        .subsumed(at(1))
}

fn stuck_branch() -> NodeId {
    NodeId::of(&CTerm::new(at(2), [negated()]))
}

#[test]
fn refuted_branch_passes_once_solved_unsat() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = ProofDir::new(tmp.path());
    let mut explore = explore(split_backend());
    let proof = AprProof::from_claim(&Claim::new("branchy", at(0), at(100)), Some(dir.clone()));
    let mut prover = AprProver::new(proof, &mut explore).unwrap();
    prover.advance_proof(&ProverOptions::default()).unwrap();

    let leaf = stuck_branch();
    assert_eq!(prover.proof.classify(&leaf), Some(LeafClass::Stuck));
    assert_eq!(prover.proof.status().unwrap(), ProofStatus::Failed);

    let refutation = prover.refute_node(&leaf).unwrap();
    assert_eq!(refutation.id(), format!("branchy.node-infeasible-{leaf}"));
    assert!(refutation.pre_constraints.is_empty());
    assert_eq!(refutation.last_constraint, negated());
    assert_eq!(prover.proof.classify(&leaf), Some(LeafClass::Refuted));
    assert!(prover.proof.failing().is_empty());
    assert_eq!(prover.proof.status().unwrap(), ProofStatus::Pending);

    let mut solver = TableSolver {
        infeasible: vec![negated()],
        ..TableSolver::default()
    };
    let result = prover.solve_refutation(&leaf, &mut solver).unwrap();
    assert_eq!(result, SatResult::Unsat);
    assert_eq!(solver.queries, vec![vec![negated()]]);
    assert_eq!(prover.proof.status().unwrap(), ProofStatus::Passed);
    drop(prover);
    assert_eq!(explore.backend().simplified, 1);

    let restored = dir.read("branchy").unwrap();
    assert_eq!(restored.status().unwrap(), ProofStatus::Passed);
}

#[test]
fn satisfiable_guard_fails_the_refutation() {
    let mut explore = explore(split_backend());
    let proof = AprProof::from_claim(&Claim::new("branchy", at(0), at(100)), None);
    let mut prover = AprProver::new(proof, &mut explore).unwrap();
    prover.advance_proof(&ProverOptions::default()).unwrap();

    let leaf = stuck_branch();
    prover.refute_node(&leaf).unwrap();
    let result = prover
        .solve_refutation(&leaf, &mut TableSolver::default())
        .unwrap();
    assert_eq!(result, SatResult::Sat);
    assert_eq!(prover.proof.status().unwrap(), ProofStatus::Failed);
}

#[test]
fn unrefuting_restores_the_failing_leaf() {
    let mut explore = explore(split_backend());
    let proof = AprProof::from_claim(&Claim::new("branchy", at(0), at(100)), None);
    let mut prover = AprProver::new(proof, &mut explore).unwrap();
    prover.advance_proof(&ProverOptions::default()).unwrap();

    let leaf = stuck_branch();
    prover.refute_node(&leaf).unwrap();
    assert!(prover.unrefute_node(&leaf).unwrap());
    assert!(!prover.unrefute_node(&leaf).unwrap());
    assert!(prover.proof.meta.subproof_ids().is_empty());
    assert_eq!(prover.proof.failing().len(), 1);
    assert!(matches!(
        prover.solve_refutation(&leaf, &mut TableSolver::default()),
        Err(EngineError::Policy(_))
    ));
}

#[test]
fn linear_path_cannot_be_refuted() {
    let backend = ScriptedBackend::default()
        .step(at(0), Step::Block { depth: 1, next: at(1) })
        .step(at(1), Step::Stuck);
    let mut explore = explore(backend);
    let proof = AprProof::from_claim(&Claim::new("linear", at(0), at(100)), None);
    let mut prover = AprProver::new(proof, &mut explore).unwrap();
    prover.advance_proof(&ProverOptions::default()).unwrap();

    let leaf = NodeId::of(&CTerm::from_config(at(1)));
    let err = prover.refute_node(&leaf).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Refute(RefuteError::LinearPath(ref id)) if id == &leaf
    ));
    assert_eq!(prover.proof.node_refutations().count(), 0);
}

#[test]
fn nondeterministic_branch_cannot_be_refuted() {
    let backend = ScriptedBackend::default()
        .step(at(0), Step::Choice(at(1), at(2)))
        .step(at(1), Step::Stuck)
        .step(at(2), Step::Stuck);
    let mut explore = explore(backend);
    let proof = AprProof::from_claim(&Claim::new("choice", at(0), at(100)), None);
    let mut prover = AprProver::new(proof, &mut explore).unwrap();
    prover.advance_proof(&ProverOptions::default()).unwrap();
    assert_eq!(prover.proof.kcfg.ndbranches(&prover.proof.init).len(), 1);

    let leaf = NodeId::of(&CTerm::from_config(at(1)));
    assert!(matches!(
        prover.refute_node(&leaf),
        Err(EngineError::Refute(RefuteError::NondeterministicBranch { .. }))
    ));
}
