use indexmap::IndexSet;
use reach_ir::{CTerm, Term};
use reach_kcfg::NodeId;
use reach_proof::{AprBmcProof, Reachability};
use tracing::{info, warn};

use crate::backend::Backend;
use crate::explore::KcfgExplore;
use crate::options::{AdvanceOutcome, ProverOptions, StopReason};
use crate::prover::AprProver;
use crate::EngineError;

/// Says whether two states sit at the same loop head.
pub type SameLoop = Box<dyn Fn(&CTerm, &CTerm) -> bool>;

/// [`AprProver`] that abandons leaves once they have gone around the same
/// loop more than the proof's `bmc_depth` times.
pub struct AprBmcProver<'a, B> {
    pub prover: AprProver<'a, AprBmcProof, B>,
    same_loop: SameLoop,
    checked_nodes: IndexSet<NodeId>,
}

impl<'a, B: Backend> AprBmcProver<'a, B> {
    pub fn new(
        proof: AprBmcProof,
        explore: &'a mut KcfgExplore<B>,
        same_loop: impl Fn(&CTerm, &CTerm) -> bool + 'static,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            prover: AprProver::new(proof, explore)?,
            same_loop: Box::new(same_loop),
            checked_nodes: IndexSet::new(),
        })
    }

    pub fn with_terminal_check(mut self, check: impl Fn(&CTerm) -> bool + 'static) -> Self {
        self.prover = self.prover.with_terminal_check(check);
        self
    }

    pub fn with_branch_extractor(
        mut self,
        extract: impl Fn(&CTerm) -> Vec<Term> + 'static,
    ) -> Self {
        self.prover = self.prover.with_branch_extractor(extract);
        self
    }

    pub fn with_abstraction(mut self, abstract_node: impl Fn(&CTerm) -> CTerm + 'static) -> Self {
        self.prover = self.prover.with_abstraction(abstract_node);
        self
    }

    pub fn proof(&self) -> &AprBmcProof {
        &self.prover.proof
    }

    pub fn into_proof(self) -> AprBmcProof {
        self.prover.into_proof()
    }

    /// Like [`AprProver::advance_proof`], but every iteration first bounds
    /// the pending leaves not inspected yet.
    pub fn advance_proof(&mut self, options: &ProverOptions) -> Result<AdvanceOutcome, EngineError> {
        let mut iterations = 0;
        let stop = loop {
            if self.prover.first_pending().is_none() {
                break StopReason::Exhausted;
            }
            self.prover.proof.write_proof()?;

            if options.max_iterations.is_some_and(|max| iterations >= max) {
                warn!(proof = self.proof().id(), iterations, "Reached iteration bound");
                break StopReason::IterationBound;
            }
            iterations += 1;

            let before = self.prover.fingerprint();
            self.check_bounds()?;
            if let Some(current) = self.prover.first_pending() {
                self.prover.step(&current, options)?;
            }
            if self.prover.fingerprint() == before {
                warn!(proof = self.proof().id(), "Iteration made no progress");
                break StopReason::NoProgress;
            }
        };
        self.prover.proof.write_proof()?;
        info!(proof = self.proof().id(), iterations, %stop, "Stopped advancing proof");
        Ok(AdvanceOutcome { iterations, stop })
    }

    /// Mark bounded every unchecked pending leaf with more distinct prior
    /// loop heads than the depth bound allows.
    fn check_bounds(&mut self) -> Result<(), EngineError> {
        let pending: Vec<NodeId> = self
            .prover
            .proof
            .pending()
            .into_iter()
            .map(|node| node.id.clone())
            .collect();
        for leaf in pending {
            if !self.checked_nodes.insert(leaf.clone()) {
                continue;
            }
            info!(proof = self.proof().id(), node = %leaf.short(), "Checking bmc depth for node");
            let prior_loops = self.prior_loop_heads(&leaf)?;
            info!(
                proof = self.proof().id(),
                node = %leaf.short(),
                prior_loops = ?prior_loops.iter().map(NodeId::short).collect::<Vec<_>>(),
                "Prior loop heads for node"
            );
            if prior_loops.len() > self.proof().bmc_depth {
                self.prover.proof.add_bounded(leaf.as_str())?;
                info!(proof = self.proof().id(), node = %leaf.short(), "Bounded node");
            }
        }
        Ok(())
    }

    /// Sources on the shortest path to `leaf` at the same loop as `leaf`,
    /// skipping heads that reach `leaf` or an already accepted head without
    /// taking a step.
    fn prior_loop_heads(&self, leaf: &NodeId) -> Result<Vec<NodeId>, EngineError> {
        let apr = &self.prover.proof.apr;
        let leaf_cterm = &apr.kcfg.node(leaf)?.cterm;
        let mut heads: Vec<NodeId> = Vec::new();
        for succ in apr.shortest_path_to(leaf)? {
            let head = succ.source();
            if !(self.same_loop)(&apr.kcfg.node(head)?.cterm, leaf_cterm) {
                continue;
            }
            let coincident = apr.kcfg.zero_depth_between(head, leaf)
                || heads.iter().any(|prior| apr.kcfg.zero_depth_between(head, prior));
            if !coincident {
                heads.push(head.clone());
            }
        }
        Ok(heads)
    }
}
