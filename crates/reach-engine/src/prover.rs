use reach_ir::{CTerm, Claim, Term};
use reach_kcfg::{KcfgError, NodeId};
use reach_proof::{Proof, ProofStatus, Reachability, RefutationProof, SatResult};
use tracing::{info, warn};

use crate::backend::{Backend, ConstraintSolver, ExecuteRequest};
use crate::explore::KcfgExplore;
use crate::options::{AdvanceOutcome, ProverOptions, StopReason};
use crate::refute::{self, construct_node_refutation, RefutationProver};
use crate::EngineError;

/// Says whether a state should stop being explored.
pub type TerminalCheck = Box<dyn Fn(&CTerm) -> bool>;
/// Proposes boolean discriminants to case-split a state on.
pub type BranchExtractor = Box<dyn Fn(&CTerm) -> Vec<Term>>;
/// Generalizes a state; returning it unchanged means no abstraction.
pub type NodeAbstraction = Box<dyn Fn(&CTerm) -> CTerm>;

/// Priority of the dependency and circularity rule sets.
const DEPENDENCY_PRIORITY: u32 = 1;

/// Grows the graph of a reachability proof one pending leaf at a time.
///
/// Each iteration takes the first pending leaf and applies the first of
/// these that fires: subsumption into the target, the terminal check,
/// abstraction, the branch heuristic, a backend step.
pub struct AprProver<'a, P, B> {
    pub proof: P,
    explore: &'a mut KcfgExplore<B>,
    is_terminal: Option<TerminalCheck>,
    extract_branches: Option<BranchExtractor>,
    abstract_node: Option<NodeAbstraction>,
    dependencies_module_name: String,
    circularities_module_name: String,
}

/// Observable size of a proof, compared across an iteration to detect
/// steps that changed nothing.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Fingerprint {
    nodes: usize,
    successors: usize,
    terminal: usize,
    stuck: usize,
    bounded: usize,
}

impl<'a, P: Reachability, B: Backend> AprProver<'a, P, B> {
    /// Set up a prover and register the proof's dependencies with the
    /// backend.
    ///
    /// Every passed reachability sub-proof becomes a claim in the
    /// dependencies rule set. The circularities rule set holds the same
    /// claims plus, for a circular proof, the proof's own claim; it is only
    /// used once execution has left init.
    pub fn new(proof: P, explore: &'a mut KcfgExplore<B>) -> Result<Self, EngineError> {
        let main_module = explore.definition().main_module().to_string();
        let dependencies_module_name = format!("{main_module}-DEPENDS-MODULE");
        let circularities_module_name = format!("{main_module}-CIRCULARITIES-MODULE");

        let dependencies = dependency_claims(proof.apr().meta.subproofs()?, &*explore)?;
        explore.add_dependencies_module(
            &main_module,
            &dependencies_module_name,
            &dependencies,
            DEPENDENCY_PRIORITY,
        )?;

        let mut circularities = dependencies;
        if proof.apr().circularity {
            circularities.push(proof.apr().as_claim(explore.definition())?);
        }
        explore.add_dependencies_module(
            &main_module,
            &circularities_module_name,
            &circularities,
            DEPENDENCY_PRIORITY,
        )?;

        Ok(Self {
            proof,
            explore,
            is_terminal: None,
            extract_branches: None,
            abstract_node: None,
            dependencies_module_name,
            circularities_module_name,
        })
    }

    pub fn with_terminal_check(mut self, check: impl Fn(&CTerm) -> bool + 'static) -> Self {
        self.is_terminal = Some(Box::new(check));
        self
    }

    pub fn with_branch_extractor(
        mut self,
        extract: impl Fn(&CTerm) -> Vec<Term> + 'static,
    ) -> Self {
        self.extract_branches = Some(Box::new(extract));
        self
    }

    pub fn with_abstraction(mut self, abstract_node: impl Fn(&CTerm) -> CTerm + 'static) -> Self {
        self.abstract_node = Some(Box::new(abstract_node));
        self
    }

    pub fn dependencies_module_name(&self) -> &str {
        &self.dependencies_module_name
    }

    pub fn circularities_module_name(&self) -> &str {
        &self.circularities_module_name
    }

    pub fn explore(&mut self) -> &mut KcfgExplore<B> {
        &mut *self.explore
    }

    pub fn into_proof(self) -> P {
        self.proof
    }

    /// Run iterations until no leaf is pending, the iteration budget is spent
    /// or an iteration changes nothing.
    ///
    /// The proof is checkpointed before every iteration and once more on
    /// return.
    pub fn advance_proof(&mut self, options: &ProverOptions) -> Result<AdvanceOutcome, EngineError> {
        let mut iterations = 0;
        let stop = loop {
            let Some(current) = self.first_pending() else {
                break StopReason::Exhausted;
            };
            self.proof.write_proof()?;

            if options.max_iterations.is_some_and(|max| iterations >= max) {
                warn!(proof = self.proof.apr().id(), iterations, "Reached iteration bound");
                break StopReason::IterationBound;
            }
            iterations += 1;

            let before = self.fingerprint();
            self.step(&current, options)?;
            if self.fingerprint() == before {
                warn!(
                    proof = self.proof.apr().id(),
                    node = %current.short(),
                    "Iteration made no progress"
                );
                break StopReason::NoProgress;
            }
        };
        self.proof.write_proof()?;
        info!(proof = self.proof.apr().id(), iterations, %stop, "Stopped advancing proof");
        Ok(AdvanceOutcome { iterations, stop })
    }

    pub(crate) fn first_pending(&self) -> Option<NodeId> {
        self.proof.pending().first().map(|node| node.id.clone())
    }

    /// Handle `current` with the first decision procedure that fires.
    pub(crate) fn step(&mut self, current: &NodeId, options: &ProverOptions) -> Result<(), EngineError> {
        if self.check_subsume(current)? {
            return Ok(());
        }
        if self.check_terminal(current)? {
            return Ok(());
        }
        if self.check_abstract(current)? {
            return Ok(());
        }
        if self.check_branches(current)? {
            return Ok(());
        }

        let module_name = if self.nonzero_depth(current) {
            &self.circularities_module_name
        } else {
            &self.dependencies_module_name
        };
        let request = ExecuteRequest {
            max_depth: options.execute_depth,
            cut_point_rules: options.cut_point_rules.clone(),
            terminal_rules: options.terminal_rules.clone(),
            module_name: Some(module_name.clone()),
        };
        let apr = self.proof.apr_mut();
        self.explore
            .extend(&mut apr.kcfg, current, &mut apr.logs, &request)?;
        Ok(())
    }

    /// Whether execution has made progress since init.
    fn nonzero_depth(&self, node: &NodeId) -> bool {
        let apr = self.proof.apr();
        !apr.kcfg.zero_depth_between(&apr.init, node)
    }

    fn check_subsume(&mut self, node: &NodeId) -> Result<bool, EngineError> {
        let apr = self.proof.apr();
        let target = apr.target.clone();
        info!(
            proof = apr.id(),
            node = %node.short(),
            target = %target.short(),
            "Checking subsumption into target state"
        );
        let source = apr.kcfg.node(node)?.cterm.clone();
        let target_cterm = apr.kcfg.node(&target)?.cterm.clone();
        let Some(csubst) = self.explore.cterm_implies(&source, &target_cterm)? else {
            return Ok(false);
        };
        self.proof
            .apr_mut()
            .kcfg
            .create_cover(node, &target, Some(csubst))?;
        info!(
            proof = self.proof.apr().id(),
            node = %node.short(),
            target = %target.short(),
            "Subsumed into target node"
        );
        Ok(true)
    }

    fn check_terminal(&mut self, node: &NodeId) -> Result<bool, EngineError> {
        let Some(is_terminal) = &self.is_terminal else {
            return Ok(false);
        };
        let apr = self.proof.apr();
        if !is_terminal(&apr.kcfg.node(node)?.cterm) {
            return Ok(false);
        }
        info!(proof = apr.id(), node = %node.short(), "Terminal node");
        self.proof.apr_mut().add_terminal(node.as_str())?;
        Ok(true)
    }

    /// Cover `node` by a generalization of it. The cover witness is computed
    /// by matching, so an unsound generalization is an error.
    fn check_abstract(&mut self, node: &NodeId) -> Result<bool, EngineError> {
        let Some(abstract_node) = &self.abstract_node else {
            return Ok(false);
        };
        let cterm = &self.proof.apr().kcfg.node(node)?.cterm;
        let general = abstract_node(cterm);
        if &general == cterm {
            return Ok(false);
        }
        // Match before inserting, so a rejected abstraction leaves no node.
        let witness = cterm.match_with_constraint(&general).ok_or_else(|| {
            KcfgError::CoverWithoutWitness {
                from: node.clone(),
                target: NodeId::of(&general),
            }
        })?;
        let kcfg = &mut self.proof.apr_mut().kcfg;
        let abstracted = kcfg.create_node(general);
        kcfg.create_cover(node, &abstracted, Some(witness))?;
        info!(
            proof = self.proof.apr().id(),
            node = %node.short(),
            abstraction = %abstracted.short(),
            "Abstracted node"
        );
        Ok(true)
    }

    /// Split on heuristic discriminants, unless `node` already is a branch of
    /// a Split.
    fn check_branches(&mut self, node: &NodeId) -> Result<bool, EngineError> {
        let Some(extract_branches) = &self.extract_branches else {
            return Ok(false);
        };
        let apr = self.proof.apr();
        if !apr.kcfg.splits_into(node).is_empty() {
            return Ok(false);
        }
        let branches = extract_branches(&apr.kcfg.node(node)?.cterm);
        if branches.is_empty() {
            return Ok(false);
        }
        let count = branches.len();
        self.proof
            .apr_mut()
            .kcfg
            .split_on_constraints(node, branches)?;
        info!(
            proof = self.proof.apr().id(),
            node = %node.short(),
            branches = count,
            "Found branches using heuristic"
        );
        Ok(true)
    }

    pub(crate) fn fingerprint(&self) -> Fingerprint {
        let apr = self.proof.apr();
        Fingerprint {
            nodes: apr.kcfg.len(),
            successors: apr.kcfg.all_successors().count(),
            terminal: apr.terminal_ids().count(),
            stuck: apr.kcfg.stuck().len(),
            bounded: self.proof.bounded().len(),
        }
    }

    /// Build the refutation query for `node` without attaching it.
    pub fn construct_node_refutation(&self, node: &NodeId) -> Result<RefutationProof, EngineError> {
        construct_node_refutation(self.proof.apr(), node)
            .map_err(|err| EngineError::Refute(refute::report(err)))
    }

    /// Attach a refutation query to `node`.
    ///
    /// The node counts as refuted right away; the proof stays pending until
    /// the query is solved.
    pub fn refute_node(&mut self, node: &NodeId) -> Result<RefutationProof, EngineError> {
        info!(proof = self.proof.apr().id(), node = %node.short(), "Attempting to refute node");
        let refutation = self.construct_node_refutation(node)?;
        refutation.write_proof()?;
        self.proof.apr_mut().add_refutation(node, refutation.clone())?;
        self.proof.write_proof()?;
        Ok(refutation)
    }

    /// Detach the refutation of `node`. Returns whether one was attached.
    pub fn unrefute_node(&mut self, node: &NodeId) -> Result<bool, EngineError> {
        let removed = self.proof.apr_mut().remove_refutation(node);
        if removed {
            info!(proof = self.proof.apr().id(), node = %node.short(), "Disabled refutation of node");
            self.proof.write_proof()?;
        }
        Ok(removed)
    }

    /// Solve the refutation attached to `node` and record the answer.
    pub fn solve_refutation<S: ConstraintSolver>(
        &mut self,
        node: &NodeId,
        solver: &mut S,
    ) -> Result<SatResult, EngineError> {
        let mut refutation = self.proof.apr().refutation(node)?.ok_or_else(|| {
            EngineError::Policy(format!("Node {node} has no refutation to solve"))
        })?;
        let result = RefutationProver::new(&mut *self.explore, solver).prove(&mut refutation)?;
        self.proof
            .apr_mut()
            .meta
            .add_subproof(Proof::Refutation(refutation))?;
        self.proof.write_proof()?;
        Ok(result)
    }
}

/// Claims of the passed reachability sub-proofs.
fn dependency_claims<B: Backend>(
    subproofs: Vec<Proof>,
    explore: &KcfgExplore<B>,
) -> Result<Vec<Claim>, EngineError> {
    let mut claims = Vec::new();
    for subproof in subproofs {
        let Some(dependency) = subproof.as_reachability() else {
            continue;
        };
        if dependency.status()? != ProofStatus::Passed {
            info!(proof = subproof.id(), "Skipping unproven dependency");
            continue;
        }
        claims.push(dependency.apr().as_claim(explore.definition())?);
    }
    Ok(claims)
}
