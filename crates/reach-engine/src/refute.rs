use reach_ir::{CTerm, Sort, Term};
use reach_kcfg::{NodeId, Successor};
use reach_proof::{AprProof, RefutationProof, SatResult};
use thiserror::Error;
use tracing::{error, info};

use crate::backend::{Backend, ConstraintSolver};
use crate::explore::KcfgExplore;
use crate::EngineError;

/// Reasons a node cannot be turned into a refutation query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefuteError {
    #[error("Cannot refute node {0}: it is not reachable from init")]
    NoPath(NodeId),
    #[error("Cannot refute node {0}: more than one path leads to it from init")]
    MultiplePaths(NodeId),
    #[error("Cannot refute node {0} in linear KCFG")]
    LinearPath(NodeId),
    #[error("Cannot refute node {node} following a non-deterministic branch from {split}: not yet implemented")]
    NondeterministicBranch { node: NodeId, split: NodeId },
    #[error("Cannot refute node {node}: unexpected non-empty substitution in Split from {split}")]
    NonEmptySubstitution { node: NodeId, split: NodeId },
    #[error("Cannot refute node {node}: unexpected {count} constraints in Split from {split}")]
    NonSingletonConstraints {
        node: NodeId,
        split: NodeId,
        count: usize,
    },
}

/// Build the refutation query for `node`.
///
/// The unique path from init to `node` is scanned backwards for the nearest
/// branch. It must be a Split whose branch toward `node` carries an empty
/// substitution and exactly one constraint. The query asserts the split
/// source's constraints together with that constraint, all as boolean
/// equalities.
pub fn construct_node_refutation(
    proof: &AprProof,
    node: &NodeId,
) -> Result<RefutationProof, RefuteError> {
    let mut paths = proof.kcfg.paths_between_up_to(&proof.init, node, 2);
    let path = match paths.len() {
        0 => return Err(RefuteError::NoPath(node.clone())),
        1 => paths.remove(0),
        _ => return Err(RefuteError::MultiplePaths(node.clone())),
    };

    let closest_branch = path
        .iter()
        .rev()
        .find(|succ| succ.is_branch())
        .ok_or_else(|| RefuteError::LinearPath(node.clone()))?;

    let split = match closest_branch {
        Successor::Split(split) => split,
        Successor::NdBranch(branch) => {
            return Err(RefuteError::NondeterministicBranch {
                node: node.clone(),
                split: branch.source.clone(),
            })
        }
        Successor::Edge(_) | Successor::Cover(_) => {
            return Err(RefuteError::LinearPath(node.clone()))
        }
    };

    // Path steps are narrowed, so the only entry is the branch taken.
    let Some((_, csubst)) = split.splits.first() else {
        return Err(RefuteError::LinearPath(node.clone()));
    };
    if !csubst.subst.is_empty() {
        return Err(RefuteError::NonEmptySubstitution {
            node: node.clone(),
            split: split.source.clone(),
        });
    }
    let [constraint] = csubst.constraints.as_slice() else {
        return Err(RefuteError::NonSingletonConstraints {
            node: node.clone(),
            split: split.source.clone(),
            count: csubst.constraints.len(),
        });
    };

    let source = proof
        .kcfg
        .node(&split.source)
        .map_err(|_| RefuteError::NoPath(split.source.clone()))?;
    let pre_constraints = source
        .cterm
        .constraints()
        .iter()
        .map(|c| Term::equals_true(c.pred_to_bool()))
        .collect();
    let last_constraint = Term::equals_true(constraint.pred_to_bool());

    let refutation_id = proof.refutation_id(node);
    info!(
        refutation = %refutation_id,
        proof = proof.id(),
        "Adding refutation proof as subproof"
    );
    Ok(RefutationProof::new(
        refutation_id,
        Sort::bool(),
        pre_constraints,
        last_constraint,
        proof.meta.proof_dir.clone(),
    ))
}

/// Logs a construction failure before handing it back.
pub(crate) fn report(err: RefuteError) -> RefuteError {
    error!("{err}");
    err
}

/// Discharges refutation queries: simplify through the backend, then ask
/// the solver.
pub struct RefutationProver<'a, B, S> {
    explore: &'a mut KcfgExplore<B>,
    solver: &'a mut S,
}

impl<'a, B: Backend, S: ConstraintSolver> RefutationProver<'a, B, S> {
    pub fn new(explore: &'a mut KcfgExplore<B>, solver: &'a mut S) -> Self {
        Self { explore, solver }
    }

    /// Decide `proof`, record the answer and checkpoint it.
    ///
    /// Already decided proofs are left untouched.
    pub fn prove(&mut self, proof: &mut RefutationProof) -> Result<SatResult, EngineError> {
        if let Some(result) = proof.result {
            return Ok(result);
        }

        let query = CTerm::new(Term::top(), proof.query().flatten_and());
        let simplified = self.explore.cterm_simplify(&query)?;
        let conjuncts: Vec<Term> = simplified.constraints().to_vec();
        proof.simplified = Some(Term::ml_and(conjuncts.iter().cloned()));

        let result = self
            .solver
            .check_sat(&conjuncts)
            .map_err(EngineError::solver)?;
        info!(proof = proof.id(), %result, "Solved refutation");
        proof.result = Some(result);
        proof.write_proof()?;
        Ok(result)
    }
}
