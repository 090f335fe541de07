//! End-to-end runs of the reachability prover against a scripted backend.
//!
//! These tests verify that:
//! 1. A linear execution subsumed into the target converges to PASSED
//! 2. Execution requests use the dependencies rule set only at init
//! 3. Passed sub-proofs (and the proof itself, when circular) are wired in
//!    as rule sets before proving starts
//! 4. The terminal, abstraction and branch heuristics fire in order
//! 5. The iteration bound stops the loop without failing the proof

mod common;

use common::{at, config, explore, guard, ScriptedBackend, Step};
use reach_engine::{AprProver, EngineError, ProverOptions, StopReason};
use reach_kcfg::KcfgError;
use reach_ir::{Claim, Term};
use reach_proof::{AprProof, LeafClass, Proof, ProofDir, ProofStatus, Reachability};

fn claim() -> Claim {
    Claim::new("main", at(0), at(100))
}

#[test]
fn linear_chain_subsumed_into_target_passes() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = ProofDir::new(tmp.path());
    let backend = ScriptedBackend::default()
        .step(at(0), Step::Block { depth: 3, next: at(1) })
        .step(at(1), Step::Block { depth: 2, next: at(2) })
        .subsumed(at(2));
    let mut explore = explore(backend);
    let proof = AprProof::from_claim(&claim(), Some(dir.clone()));
    let mut prover = AprProver::new(proof, &mut explore).unwrap();

    let outcome = prover.advance_proof(&ProverOptions::default()).unwrap();
    assert_eq!(outcome.stop, StopReason::Exhausted);
    assert_eq!(outcome.iterations, 3);

    let proof = prover.into_proof();
    assert_eq!(proof.status().unwrap(), ProofStatus::Passed);
    let leaves = proof.kcfg.leaves();
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].id, proof.target);
    assert!(proof.pending().is_empty());
    assert!(proof.failing().is_empty());
    assert_eq!(proof.classify(&proof.target), Some(LeafClass::Target));
    assert_eq!(proof.logs.len(), 2);

    let restored = dir.read("main").unwrap();
    assert_eq!(restored.status().unwrap(), ProofStatus::Passed);
    assert_eq!(restored, Proof::Apr(proof));
}

#[test]
fn circularities_are_only_used_after_leaving_init() {
    let backend = ScriptedBackend::default()
        .step(at(0), Step::Block { depth: 1, next: at(1) })
        .step(at(1), Step::Block { depth: 1, next: at(2) })
        .subsumed(at(2));
    let mut explore = explore(backend);
    let proof = AprProof::from_claim(&claim(), None);
    let mut prover = AprProver::new(proof, &mut explore).unwrap();
    prover.advance_proof(&ProverOptions::default()).unwrap();
    drop(prover);

    let modules: Vec<_> = explore
        .backend()
        .requests
        .iter()
        .map(|r| r.module_name.clone().unwrap())
        .collect();
    assert_eq!(modules, vec!["IMP-DEPENDS-MODULE", "IMP-CIRCULARITIES-MODULE"]);
}

#[test]
fn passed_subproofs_and_own_circularity_become_rule_sets() {
    let mut lemma = AprProof::from_claim(&Claim::new("lemma", at(10), at(11)), None);
    lemma.meta.admitted = true;
    let unproven = AprProof::from_claim(&Claim::new("unproven", at(20), at(21)), None);

    let mut proof = AprProof::from_claim(&claim(), None).with_circularity(true);
    proof.meta.add_subproof(Proof::Apr(lemma)).unwrap();
    proof.meta.add_subproof(Proof::Apr(unproven)).unwrap();

    let mut explore = explore(ScriptedBackend::default());
    let prover = AprProver::new(proof, &mut explore).unwrap();
    assert_eq!(prover.dependencies_module_name(), "IMP-DEPENDS-MODULE");
    drop(prover);

    assert_eq!(
        explore.backend().modules,
        vec![
            ("IMP-DEPENDS-MODULE".to_string(), vec!["lemma".to_string()], 1),
            (
                "IMP-CIRCULARITIES-MODULE".to_string(),
                vec!["lemma".to_string(), "main".to_string()],
                1
            ),
        ]
    );
}

#[test]
fn terminal_check_runs_after_subsumption() {
    let backend = ScriptedBackend::default()
        .step(at(0), Step::Block { depth: 1, next: at(1) })
        .step(at(1), Step::Block { depth: 1, next: at(2) })
        .subsumed(at(2));
    let mut explore = explore(backend);
    let proof = AprProof::from_claim(&claim(), None);
    let terminal_config = at(1);
    let mut prover = AprProver::new(proof, &mut explore)
        .unwrap()
        .with_terminal_check(move |cterm| cterm.config() == &terminal_config);
    prover.advance_proof(&ProverOptions::default()).unwrap();

    let proof = prover.into_proof();
    let terminal: Vec<_> = proof.terminal_ids().cloned().collect();
    assert_eq!(terminal.len(), 1);
    assert_eq!(proof.classify(&terminal[0]), Some(LeafClass::Terminal));
    // A terminal leaf that never reached the target is a failure.
    assert_eq!(proof.failing().len(), 1);
    assert_eq!(proof.status().unwrap(), ProofStatus::Failed);
}

#[test]
fn abstraction_covers_node_by_its_generalization() {
    let general = config(Term::apply("step", vec![Term::var("N")]), 1);
    let backend = ScriptedBackend::default()
        .step(at(0), Step::Block { depth: 1, next: at(1) })
        .subsumed(general.clone());
    let mut explore = explore(backend);
    let proof = AprProof::from_claim(&claim(), None);
    let abstracted = general.clone();
    let mut prover = AprProver::new(proof, &mut explore)
        .unwrap()
        .with_abstraction(move |cterm| {
            if cterm.config() == &at(1) {
                reach_ir::CTerm::new(abstracted.clone(), cterm.constraints().to_vec())
            } else {
                cterm.clone()
            }
        });
    prover.advance_proof(&ProverOptions::default()).unwrap();

    let proof = prover.into_proof();
    assert_eq!(proof.status().unwrap(), ProofStatus::Passed);
    let concrete = proof
        .kcfg
        .nodes()
        .find(|node| node.cterm.config() == &at(1))
        .unwrap()
        .id
        .clone();
    let covers = proof.kcfg.covers(&concrete);
    assert_eq!(covers.len(), 1);
    let generalized = proof.kcfg.node(&covers[0].target).unwrap();
    assert_eq!(generalized.cterm.config(), &general);
}

#[test]
fn rejected_abstraction_leaves_the_graph_untouched() {
    let unrelated = Term::apply("other", vec![Term::int(7)]);
    let backend = ScriptedBackend::default().step(at(0), Step::Block { depth: 1, next: at(1) });
    let mut explore = explore(backend);
    let proof = AprProof::from_claim(&claim(), None);
    let replacement = unrelated.clone();
    let mut prover = AprProver::new(proof, &mut explore)
        .unwrap()
        .with_abstraction(move |cterm| {
            if cterm.config() == &at(1) {
                reach_ir::CTerm::from_config(replacement.clone())
            } else {
                cterm.clone()
            }
        });

    let err = prover.advance_proof(&ProverOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Kcfg(KcfgError::CoverWithoutWitness { .. })
    ));

    let proof = prover.into_proof();
    assert_eq!(proof.kcfg.len(), 3);
    assert!(proof.kcfg.nodes().all(|node| node.cterm.config() != &unrelated));
    assert_eq!(proof.pending().len(), 1);
    for leaf in proof.pending() {
        assert!(proof.shortest_path_to(&leaf.id).is_ok());
    }
}

#[test]
fn heuristic_branches_are_not_split_again() {
    let negated = Term::equals_true(Term::not_bool(Term::var("B")));
    let discriminants = vec![guard("B"), negated];
    let backend = ScriptedBackend::default()
        .step(at(0), Step::Block { depth: 1, next: at(1) })
        .subsumed(at(1));
    let mut explore = explore(backend);
    let proof = AprProof::from_claim(&claim(), None);
    let mut prover = AprProver::new(proof, &mut explore)
        .unwrap()
        .with_branch_extractor(move |cterm| {
            if cterm.config() == &at(0) {
                discriminants.clone()
            } else {
                vec![]
            }
        });
    prover.advance_proof(&ProverOptions::default()).unwrap();

    let proof = prover.into_proof();
    assert_eq!(proof.status().unwrap(), ProofStatus::Passed);
    let splits = proof.kcfg.splits(&proof.init);
    assert_eq!(splits.len(), 1);
    for child in splits[0].splits.keys() {
        assert!(proof.kcfg.splits(child).is_empty());
        assert_eq!(proof.kcfg.edges(child).len(), 1);
    }
    assert_eq!(proof.kcfg.all_successors().count(), 1 + 2 + 2);
}

#[test]
fn iteration_bound_stops_without_failing() {
    let backend = ScriptedBackend::default()
        .step(at(0), Step::Block { depth: 1, next: at(1) })
        .step(at(1), Step::Block { depth: 1, next: at(2) })
        .step(at(2), Step::Block { depth: 1, next: at(3) });
    let mut explore = explore(backend);
    let proof = AprProof::from_claim(&claim(), None);
    let mut prover = AprProver::new(proof, &mut explore).unwrap();
    let options = ProverOptions {
        max_iterations: Some(2),
        ..ProverOptions::default()
    };
    let outcome = prover.advance_proof(&options).unwrap();
    assert_eq!(outcome.stop, StopReason::IterationBound);
    assert_eq!(outcome.iterations, 2);
    assert_eq!(prover.proof.status().unwrap(), ProofStatus::Pending);
    assert_eq!(prover.proof.pending().len(), 1);
}

#[test]
fn backend_failure_aborts_the_step() {
    let mut explore = explore(ScriptedBackend::default());
    let proof = AprProof::from_claim(&claim(), None);
    let mut prover = AprProver::new(proof, &mut explore).unwrap();
    let err = prover.advance_proof(&ProverOptions::default()).unwrap_err();
    assert!(matches!(err, EngineError::Backend(_)));
    assert!(err.to_string().contains("no scripted step"));
}
