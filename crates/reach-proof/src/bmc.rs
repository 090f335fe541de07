use indexmap::IndexSet;
use reach_ir::Claim;
use reach_kcfg::{Node, NodeId};

use crate::apr::{AprProof, Reachability};
use crate::record::ProofRecord;
use crate::store::ProofDir;
use crate::ProofError;

/// Bounded model-checking variant of [`AprProof`].
///
/// Leaves that revisit the same loop more than `bmc_depth` times are marked
/// bounded and no longer explored.
#[derive(Debug, Clone)]
pub struct AprBmcProof {
    pub apr: AprProof,
    pub bmc_depth: usize,
    pub(crate) bounded_nodes: IndexSet<NodeId>,
}

impl AprBmcProof {
    pub fn new(apr: AprProof, bmc_depth: usize) -> Self {
        Self {
            apr,
            bmc_depth,
            bounded_nodes: IndexSet::new(),
        }
    }

    pub fn from_claim(claim: &Claim, bmc_depth: usize, proof_dir: Option<ProofDir>) -> Self {
        Self::new(AprProof::from_claim(claim, proof_dir), bmc_depth)
    }

    pub fn id(&self) -> &str {
        self.apr.id()
    }

    pub fn bounded_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.bounded_nodes.iter()
    }

    pub fn add_bounded(&mut self, id_like: &str) -> Result<NodeId, ProofError> {
        let id = self.apr.kcfg.resolve(id_like)?;
        self.bounded_nodes.insert(id.clone());
        Ok(id)
    }

    /// Unmark a bounded node. Returns whether it was marked.
    pub fn remove_bounded(&mut self, id_like: &str) -> Result<bool, ProofError> {
        let id = self.apr.kcfg.resolve(id_like)?;
        Ok(self.bounded_nodes.shift_remove(&id))
    }
}

impl Reachability for AprBmcProof {
    fn apr(&self) -> &AprProof {
        &self.apr
    }

    fn apr_mut(&mut self) -> &mut AprProof {
        &mut self.apr
    }

    fn is_bounded(&self, id: &NodeId) -> bool {
        self.bounded_nodes.contains(id)
    }

    fn to_record(&self) -> ProofRecord {
        ProofRecord::AprBmc(self.to_bmc_record())
    }

    fn summary(&self) -> Result<Vec<String>, ProofError> {
        let mut lines = vec![format!(
            "APRBMCProof(depth={}): {}",
            self.bmc_depth,
            self.apr.id()
        )];
        lines.extend(self.apr.summary_counts(self));
        lines.push(format!("    bounded: {}", self.bounded().len()));
        lines.extend(self.apr.subproof_summaries()?);
        Ok(lines)
    }

    fn bounded(&self) -> Vec<&Node> {
        self.apr
            .kcfg
            .leaves()
            .into_iter()
            .filter(|node| self.bounded_nodes.contains(&node.id))
            .collect()
    }
}
