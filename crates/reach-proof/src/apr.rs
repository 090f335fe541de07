use indexmap::{IndexMap, IndexSet};
use reach_ir::{Claim, Definition, LogEntry, Sort, Term};
use reach_kcfg::{Kcfg, Node, NodeId, Successor};

use crate::meta::ProofMeta;
use crate::record::ProofRecord;
use crate::refutation::RefutationProof;
use crate::store::ProofDir;
use crate::{Proof, ProofError, ProofStatus};

/// Role of a leaf, in classification priority order.
///
/// Each leaf gets the first class that applies, so the classes partition the
/// leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LeafClass {
    Init,
    Target,
    Refuted,
    Terminal,
    Bounded,
    Stuck,
    Pending,
}

/// All-path reachability proof: a proof graph with a designated initial and
/// target node.
///
/// Reachability logic ignores infinite traces, so a claim `phi => psi` holds
/// when every terminating run from `phi` passes through `psi`.
#[derive(Debug, Clone)]
pub struct AprProof {
    pub meta: ProofMeta,
    pub kcfg: Kcfg,
    pub init: NodeId,
    pub target: NodeId,
    pub(crate) terminal_nodes: IndexSet<NodeId>,
    /// Node to the id of the sub-proof refuting it.
    pub(crate) node_refutations: IndexMap<NodeId, String>,
    /// The proof may cite its own claim once past the first step.
    pub circularity: bool,
    /// Backend log entries, keyed by the node they were produced at.
    pub logs: IndexMap<NodeId, Vec<LogEntry>>,
}

impl AprProof {
    pub fn new(
        id: impl Into<String>,
        kcfg: Kcfg,
        init: NodeId,
        target: NodeId,
        proof_dir: Option<ProofDir>,
    ) -> Self {
        Self {
            meta: ProofMeta::new(id, proof_dir),
            kcfg,
            init,
            target,
            terminal_nodes: IndexSet::new(),
            node_refutations: IndexMap::new(),
            circularity: false,
            logs: IndexMap::new(),
        }
    }

    /// Fresh proof of `claim`, named after its label.
    pub fn from_claim(claim: &Claim, proof_dir: Option<ProofDir>) -> Self {
        let (kcfg, init, target) = Kcfg::from_claim(claim);
        Self::new(claim.label.clone(), kcfg, init, target, proof_dir)
    }

    pub fn with_circularity(mut self, circularity: bool) -> Self {
        self.circularity = circularity;
        self
    }

    pub fn id(&self) -> &str {
        &self.meta.id
    }

    pub fn is_init(&self, id: &NodeId) -> bool {
        *id == self.init
    }

    pub fn is_target(&self, id: &NodeId) -> bool {
        *id == self.target
    }

    pub fn is_refuted(&self, id: &NodeId) -> bool {
        self.node_refutations.contains_key(id)
    }

    pub fn is_terminal(&self, id: &NodeId) -> bool {
        self.terminal_nodes.contains(id)
    }

    /// Nodes marked terminal, in marking order.
    pub fn terminal(&self) -> Vec<&Node> {
        self.terminal_nodes
            .iter()
            .filter_map(|id| self.kcfg.node(id).ok())
            .collect()
    }

    pub fn terminal_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.terminal_nodes.iter()
    }

    pub fn add_terminal(&mut self, id_like: &str) -> Result<NodeId, ProofError> {
        let id = self.kcfg.resolve(id_like)?;
        self.terminal_nodes.insert(id.clone());
        Ok(id)
    }

    /// Unmark a terminal node. Returns whether it was marked.
    pub fn remove_terminal(&mut self, id_like: &str) -> Result<bool, ProofError> {
        let id = self.kcfg.resolve(id_like)?;
        Ok(self.terminal_nodes.shift_remove(&id))
    }

    /// Node refutations as `(node, sub-proof id)` pairs.
    pub fn node_refutations(&self) -> impl Iterator<Item = (&NodeId, &String)> {
        self.node_refutations.iter()
    }

    /// Id under which the refutation of `node` is stored.
    pub fn refutation_id(&self, node: &NodeId) -> String {
        format!("{}.node-infeasible-{}", self.meta.id, node)
    }

    /// Attach `refutation` as the sub-proof refuting `node`.
    pub fn add_refutation(&mut self, node: &NodeId, refutation: RefutationProof) -> Result<(), ProofError> {
        self.kcfg.node(node)?;
        let subproof_id = refutation.id().to_string();
        self.meta.add_subproof(Proof::Refutation(refutation))?;
        self.node_refutations.insert(node.clone(), subproof_id);
        Ok(())
    }

    /// Detach the refutation of `node` and drop it from the sub-proofs.
    pub fn remove_refutation(&mut self, node: &NodeId) -> bool {
        match self.node_refutations.shift_remove(node) {
            Some(subproof_id) => {
                self.meta.remove_subproof(&subproof_id);
                true
            }
            None => false,
        }
    }

    /// The refutation sub-proof of `node`, if one is attached.
    pub fn refutation(&self, node: &NodeId) -> Result<Option<RefutationProof>, ProofError> {
        let Some(subproof_id) = self.node_refutations.get(node) else {
            return Ok(None);
        };
        match self.meta.subproof(subproof_id)? {
            Proof::Refutation(refutation) => Ok(Some(refutation)),
            other => Err(ProofError::UnexpectedProofType {
                id: subproof_id.clone(),
                expected: "RefutationProof",
                found: other.kind(),
            }),
        }
    }

    /// Append backend log entries produced at `node`.
    pub fn add_logs(&mut self, node: &NodeId, entries: impl IntoIterator<Item = LogEntry>) {
        let mut entries = entries.into_iter().peekable();
        if entries.peek().is_some() {
            self.logs.entry(node.clone()).or_default().extend(entries);
        }
    }

    pub fn shortest_path_to(&self, id: &NodeId) -> Result<Vec<Successor>, ProofError> {
        self.kcfg
            .shortest_path_between(&self.init, id)
            .ok_or_else(|| ProofError::Unreachable(id.clone()))
    }

    /// Constraints accumulated along the shortest path from init to `id`.
    ///
    /// Walking the path backwards, a Split conjoins its branch guard and
    /// substitution equalities, and a Cover conjoins its constraints after
    /// applying its substitution to what was accumulated. Edges add nothing.
    pub fn path_constraints(&self, id: &NodeId) -> Result<Term, ProofError> {
        let path = self.shortest_path_to(id)?;
        let mut current = Term::top();
        for succ in path.iter().rev() {
            match succ {
                Successor::Split(split) => {
                    for csubst in split.splits.values() {
                        current = Term::ml_and([csubst.subst.ml_pred(), csubst.constraint(), current]);
                    }
                }
                Successor::Cover(cover) => {
                    current = Term::ml_and([
                        cover.csubst.constraint(),
                        cover.csubst.subst.apply(&current),
                    ]);
                }
                Successor::Edge(_) | Successor::NdBranch(_) => {}
            }
        }
        Ok(current)
    }

    /// The claim this proof establishes, with configurations sorted against
    /// the top-level configuration sort.
    pub fn as_claim(&self, definition: &Definition) -> Result<Claim, ProofError> {
        let top_cell = Sort::generated_top_cell();
        let from = &self.kcfg.node(&self.init)?.cterm;
        let to = &self.kcfg.node(&self.target)?.cterm;
        let lhs = definition.sort_vars(from.config(), Some(&top_cell))?;
        let rhs = definition.sort_vars(to.config(), Some(&top_cell))?;
        Ok(Claim::new(self.meta.id.clone(), lhs, rhs)
            .with_requires(from.constraints().iter().map(Term::pred_to_bool))
            .with_ensures(to.constraints().iter().map(Term::pred_to_bool)))
    }

    pub(crate) fn summary_counts<P: Reachability + ?Sized>(&self, proof: &P) -> Vec<String> {
        vec![
            format!("    status: {}", status_label(proof.status())),
            format!("    admitted: {}", self.meta.admitted),
            format!("    nodes: {}", self.kcfg.len()),
            format!("    pending: {}", proof.pending().len()),
            format!("    failing: {}", proof.failing().len()),
            format!("    stuck: {}", self.kcfg.stuck().len()),
            format!("    terminal: {}", self.terminal_nodes.len()),
            format!("    refuted: {}", self.node_refutations.len()),
        ]
    }

    pub(crate) fn subproof_summaries(&self) -> Result<Vec<String>, ProofError> {
        let mut lines = vec![format!("Subproofs: {}", self.meta.subproof_ids().len())];
        for subproof in self.meta.subproofs()? {
            lines.extend(subproof.summary()?);
        }
        Ok(lines)
    }
}

fn status_label(status: Result<ProofStatus, ProofError>) -> String {
    match status {
        Ok(status) => status.to_string(),
        Err(err) => format!("UNKNOWN ({err})"),
    }
}

/// Leaf classification and status derivation shared by the reachability
/// proof kinds.
///
/// Every query is recomputed from the current graph.
pub trait Reachability {
    fn apr(&self) -> &AprProof;

    fn apr_mut(&mut self) -> &mut AprProof;

    /// Whether `id` was abandoned at a loop-revisit bound.
    fn is_bounded(&self, _id: &NodeId) -> bool {
        false
    }

    fn to_record(&self) -> ProofRecord;

    /// Human-readable status report, including sub-proofs.
    fn summary(&self) -> Result<Vec<String>, ProofError>;

    fn bounded(&self) -> Vec<&Node> {
        let apr = self.apr();
        apr.kcfg
            .leaves()
            .into_iter()
            .filter(|node| self.is_bounded(&node.id))
            .collect()
    }

    /// A leaf that still needs work.
    fn is_pending(&self, id: &NodeId) -> bool {
        let apr = self.apr();
        apr.kcfg.is_leaf(id)
            && !(apr.is_terminal(id)
                || apr.kcfg.is_stuck(id)
                || self.is_bounded(id)
                || apr.is_target(id)
                || apr.is_refuted(id))
    }

    /// A leaf that is a negative outcome for the proof.
    fn is_failing(&self, id: &NodeId) -> bool {
        let apr = self.apr();
        apr.kcfg.is_leaf(id)
            && !(self.is_pending(id)
                || apr.is_target(id)
                || apr.is_refuted(id)
                || self.is_bounded(id))
    }

    /// Pending leaves in insertion order.
    fn pending(&self) -> Vec<&Node> {
        self.apr()
            .kcfg
            .leaves()
            .into_iter()
            .filter(|node| self.is_pending(&node.id))
            .collect()
    }

    fn failing(&self) -> Vec<&Node> {
        self.apr()
            .kcfg
            .leaves()
            .into_iter()
            .filter(|node| self.is_failing(&node.id))
            .collect()
    }

    /// Class of a leaf, or `None` for inner nodes.
    fn classify(&self, id: &NodeId) -> Option<LeafClass> {
        let apr = self.apr();
        if !apr.kcfg.is_leaf(id) {
            return None;
        }
        let class = if apr.is_init(id) {
            LeafClass::Init
        } else if apr.is_target(id) {
            LeafClass::Target
        } else if apr.is_refuted(id) {
            LeafClass::Refuted
        } else if apr.is_terminal(id) {
            LeafClass::Terminal
        } else if self.is_bounded(id) {
            LeafClass::Bounded
        } else if apr.kcfg.is_stuck(id) {
            LeafClass::Stuck
        } else {
            LeafClass::Pending
        };
        Some(class)
    }

    /// Derived status.
    ///
    /// Admitted proofs pass. Otherwise the proof fails if a leaf is failing
    /// or bounded or a sub-proof failed, is pending if a leaf or sub-proof is
    /// pending, and passes otherwise. Sub-proofs that cannot be read make the
    /// status unavailable.
    fn status(&self) -> Result<ProofStatus, ProofError> {
        let apr = self.apr();
        if apr.meta.admitted {
            return Ok(ProofStatus::Passed);
        }
        let subproofs = apr.meta.subproofs_status()?;
        if !self.failing().is_empty()
            || !self.bounded().is_empty()
            || subproofs == ProofStatus::Failed
        {
            Ok(ProofStatus::Failed)
        } else if !self.pending().is_empty() || subproofs == ProofStatus::Pending {
            Ok(ProofStatus::Pending)
        } else {
            Ok(ProofStatus::Passed)
        }
    }

    /// Checkpoint the proof to its directory, if it has one.
    fn write_proof(&self) -> Result<(), ProofError> {
        self.apr().meta.write(&self.to_record())
    }
}

impl Reachability for AprProof {
    fn apr(&self) -> &AprProof {
        self
    }

    fn apr_mut(&mut self) -> &mut AprProof {
        self
    }

    fn to_record(&self) -> ProofRecord {
        ProofRecord::Apr(self.to_apr_record())
    }

    fn summary(&self) -> Result<Vec<String>, ProofError> {
        let mut lines = vec![format!("APRProof: {}", self.meta.id)];
        lines.extend(self.summary_counts(self));
        lines.extend(self.subproof_summaries()?);
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reach_ir::{CSubst, CTerm, SortLattice, Symbol};

    fn k(term: Term) -> Term {
        Term::apply("<k>", vec![term])
    }

    fn top(term: Term) -> Term {
        Term::apply("<generatedTop>", vec![k(term)])
    }

    fn state(n: i64) -> CTerm {
        CTerm::from_config(top(Term::int(n)))
    }

    fn guard(name: &str) -> Term {
        Term::equals_true(Term::var(name))
    }

    /// init -e-> a -split-> {b [B], c [not B]}; target is separate.
    fn branching() -> (AprProof, Vec<NodeId>) {
        let claim = Claim::new("branching", top(Term::int(0)), top(Term::int(99)));
        let mut proof = AprProof::from_claim(&claim, None);
        let kcfg = &mut proof.kcfg;
        let a = kcfg.create_node(state(1));
        let b = kcfg.create_node(state(2));
        let c = kcfg.create_node(state(3));
        kcfg.create_edge(&proof.init, &a, 3, vec![]).unwrap();
        kcfg.create_split(
            &a,
            [
                (b.clone(), CSubst::from_constraints([guard("B")])),
                (c.clone(), CSubst::from_constraints([Term::not_bool(guard("B"))])),
            ],
        )
        .unwrap();
        (proof, vec![a, b, c])
    }

    #[test]
    fn fresh_proof_is_pending_on_its_init_node() {
        let claim = Claim::new("fresh", top(Term::int(0)), top(Term::int(1)));
        let proof = AprProof::from_claim(&claim, None);
        assert_eq!(proof.status().unwrap(), ProofStatus::Pending);
        let pending: Vec<&NodeId> = proof.pending().iter().map(|n| &n.id).collect();
        assert_eq!(pending, vec![&proof.init]);
        assert_eq!(proof.classify(&proof.init), Some(LeafClass::Init));
        assert_eq!(proof.classify(&proof.target), Some(LeafClass::Target));
    }

    #[test]
    fn terminal_and_stuck_leaves_are_failing() {
        let (mut proof, ids) = branching();
        proof.add_terminal(ids[1].as_str()).unwrap();
        proof.kcfg.add_stuck(&ids[2]).unwrap();
        assert!(proof.pending().is_empty());
        assert_eq!(proof.failing().len(), 2);
        assert_eq!(proof.classify(&ids[1]), Some(LeafClass::Terminal));
        assert_eq!(proof.classify(&ids[2]), Some(LeafClass::Stuck));
        assert_eq!(proof.classify(&ids[0]), None);
        assert_eq!(proof.status().unwrap(), ProofStatus::Failed);

        assert!(proof.remove_terminal(ids[1].as_str()).unwrap());
        assert!(!proof.remove_terminal(ids[1].as_str()).unwrap());
        assert_eq!(proof.pending().len(), 1);
    }

    #[test]
    fn covering_every_leaf_into_target_passes() {
        let (mut proof, ids) = branching();
        let target = proof.target.clone();
        for leaf in &ids[1..] {
            proof.kcfg.create_cover(leaf, &target, Some(CSubst::empty())).unwrap();
        }
        assert!(proof.pending().is_empty());
        assert!(proof.failing().is_empty());
        assert_eq!(proof.status().unwrap(), ProofStatus::Passed);
    }

    #[test]
    fn admitted_short_circuits_to_passed() {
        let (mut proof, ids) = branching();
        proof.kcfg.add_stuck(&ids[1]).unwrap();
        assert_eq!(proof.status().unwrap(), ProofStatus::Failed);
        proof.meta.admitted = true;
        assert_eq!(proof.status().unwrap(), ProofStatus::Passed);
    }

    #[test]
    fn refuted_leaf_is_neither_pending_nor_failing() {
        let (mut proof, ids) = branching();
        let refutation = RefutationProof::new(
            proof.refutation_id(&ids[2]),
            Sort::bool(),
            vec![],
            guard("B"),
            None,
        );
        proof.add_refutation(&ids[2], refutation).unwrap();
        assert!(!proof.is_pending(&ids[2]));
        assert!(!proof.is_failing(&ids[2]));
        assert_eq!(proof.classify(&ids[2]), Some(LeafClass::Refuted));
        // The unsolved refutation keeps the proof pending.
        assert_eq!(proof.meta.subproofs_status().unwrap(), ProofStatus::Pending);

        assert!(proof.remove_refutation(&ids[2]));
        assert!(proof.meta.subproof_ids().is_empty());
        assert!(proof.is_pending(&ids[2]));
    }

    #[test]
    fn path_constraints_collect_split_guards() {
        let (proof, ids) = branching();
        assert_eq!(proof.path_constraints(&ids[1]).unwrap(), guard("B"));
        assert_eq!(
            proof.path_constraints(&ids[2]).unwrap(),
            Term::not_bool(guard("B"))
        );
        assert!(proof.path_constraints(&ids[0]).unwrap().is_top());
        assert!(matches!(
            proof.path_constraints(&proof.target),
            Err(ProofError::Unreachable(_))
        ));
    }

    #[test]
    fn path_constraints_apply_cover_substitutions() {
        let claim = Claim::new("cover", top(Term::var("N")), top(Term::int(0)));
        let mut proof = AprProof::from_claim(&claim, None);
        let concrete = proof.kcfg.create_node(state(5));
        let general = proof
            .kcfg
            .create_node(CTerm::new(top(Term::var("M")), [guard("G")]));
        let leaf = proof.kcfg.create_node(CTerm::new(top(Term::var("M")), [guard("G"), guard("H")]));
        proof.kcfg.create_edge(&proof.init, &concrete, 1, vec![]).unwrap();
        proof
            .kcfg
            .create_cover(&concrete, &general, Some(CSubst::from_constraints([guard("C")])))
            .unwrap();
        proof
            .kcfg
            .create_split(&general, [(leaf.clone(), CSubst::from_constraints([guard("H")]))])
            .unwrap();
        let constraint = proof.path_constraints(&leaf).unwrap();
        assert_eq!(
            constraint,
            Term::ml_and([guard("C"), guard("H")])
        );
    }

    #[test]
    fn as_claim_sorts_variables_and_lowers_constraints() {
        let definition = Definition::new(
            "LOOP",
            SortLattice::new([(Sort::int(), Sort::k_item())]),
            [
                Symbol::new("<k>", vec![Sort::k_item()], Sort::new("KCell")),
                Symbol::new(
                    "<generatedTop>",
                    vec![Sort::new("KCell")],
                    Sort::generated_top_cell(),
                ),
            ],
        );
        let lt = Term::apply("_<Int_", vec![Term::var("N"), Term::int(10)]);
        let claim = Claim::new("sorted", top(Term::var("N")), top(Term::int(10)))
            .with_requires([Term::equals_true(lt.clone())]);
        let proof = AprProof::from_claim(&claim, None);
        let lemma = proof.as_claim(&definition).unwrap();
        assert_eq!(lemma.label, "sorted");
        assert_eq!(lemma.lhs, top(Term::sorted_var("N", Sort::k_item())));
        assert_eq!(lemma.requires, vec![lt]);
        assert!(lemma.ensures.is_empty());
    }

    #[test]
    fn summary_reports_counts() {
        let (proof, _) = branching();
        let summary = proof.summary().unwrap();
        assert_eq!(summary[0], "APRProof: branching");
        assert!(summary.contains(&"    status: PENDING".to_string()));
        assert!(summary.contains(&"    pending: 2".to_string()));
        assert_eq!(summary.last().map(String::as_str), Some("Subproofs: 0"));
    }
}
