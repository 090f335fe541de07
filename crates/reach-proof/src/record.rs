use indexmap::{IndexMap, IndexSet};
use reach_ir::{LogEntry, Sort, Term};
use reach_kcfg::{Kcfg, KcfgRecord, NodeId};
use serde::{Deserialize, Serialize};

use crate::apr::AprProof;
use crate::bmc::AprBmcProof;
use crate::meta::ProofMeta;
use crate::refutation::{RefutationProof, SatResult};
use crate::store::ProofDir;
use crate::ProofError;

/// Persisted proof document, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProofRecord {
    #[serde(rename = "APRProof")]
    Apr(AprProofRecord),
    #[serde(rename = "APRBMCProof")]
    AprBmc(AprBmcProofRecord),
    #[serde(rename = "RefutationProof")]
    Refutation(RefutationProofRecord),
}

impl ProofRecord {
    pub fn id(&self) -> &str {
        match self {
            ProofRecord::Apr(r) => &r.id,
            ProofRecord::AprBmc(r) => &r.apr.id,
            ProofRecord::Refutation(r) => &r.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AprProofRecord {
    pub id: String,
    #[serde(default)]
    pub admitted: bool,
    #[serde(default)]
    pub subproof_ids: Vec<String>,
    pub cfg: KcfgRecord,
    pub init: String,
    pub target: String,
    #[serde(default)]
    pub terminal_nodes: Vec<String>,
    /// `[node id, sub-proof id]` pairs.
    #[serde(default)]
    pub node_refutations: Vec<(String, String)>,
    #[serde(default)]
    pub circularity: bool,
    #[serde(default)]
    pub logs: IndexMap<String, Vec<LogEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AprBmcProofRecord {
    #[serde(flatten)]
    pub apr: AprProofRecord,
    pub bmc_depth: usize,
    #[serde(default)]
    pub bounded_nodes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefutationProofRecord {
    pub id: String,
    #[serde(default)]
    pub admitted: bool,
    #[serde(default)]
    pub subproof_ids: Vec<String>,
    pub sort: Sort,
    pub pre_constraints: Vec<Term>,
    pub last_constraint: Term,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simplified: Option<Term>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<SatResult>,
}

fn resolve_all<'a>(
    kcfg: &Kcfg,
    ids: impl IntoIterator<Item = &'a String>,
) -> Result<IndexSet<NodeId>, ProofError> {
    ids.into_iter()
        .map(|id| kcfg.resolve(id).map_err(ProofError::from))
        .collect()
}

impl AprProof {
    pub fn to_apr_record(&self) -> AprProofRecord {
        AprProofRecord {
            id: self.meta.id.clone(),
            admitted: self.meta.admitted,
            subproof_ids: self.meta.subproof_ids().to_vec(),
            cfg: self.kcfg.to_record(),
            init: self.init.to_string(),
            target: self.target.to_string(),
            terminal_nodes: self.terminal_nodes.iter().map(NodeId::to_string).collect(),
            node_refutations: self
                .node_refutations
                .iter()
                .map(|(node, proof)| (node.to_string(), proof.clone()))
                .collect(),
            circularity: self.circularity,
            logs: self
                .logs
                .iter()
                .map(|(node, entries)| (node.to_string(), entries.clone()))
                .collect(),
        }
    }

    /// Restore a proof, resolving every node reference against its graph.
    ///
    /// Every refutation must name a declared sub-proof; otherwise the record
    /// is rejected.
    pub fn from_apr_record(
        record: AprProofRecord,
        proof_dir: Option<ProofDir>,
    ) -> Result<Self, ProofError> {
        let violators: Vec<String> = record
            .node_refutations
            .iter()
            .map(|(_, proof)| proof)
            .filter(|proof| !record.subproof_ids.contains(proof))
            .cloned()
            .collect();
        if !violators.is_empty() {
            return Err(ProofError::UndeclaredRefutation(violators));
        }

        let kcfg = Kcfg::from_record(record.cfg)?;
        let init = kcfg.resolve(&record.init)?;
        let target = kcfg.resolve(&record.target)?;
        let terminal_nodes = resolve_all(&kcfg, &record.terminal_nodes)?;
        let mut node_refutations = IndexMap::new();
        for (node, proof) in record.node_refutations {
            node_refutations.insert(kcfg.resolve(&node)?, proof);
        }
        let mut logs = IndexMap::new();
        for (node, entries) in record.logs {
            logs.insert(kcfg.resolve(&node)?, entries);
        }

        let mut meta = ProofMeta::new(record.id, proof_dir).with_subproof_ids(record.subproof_ids);
        meta.admitted = record.admitted;
        Ok(Self {
            meta,
            kcfg,
            init,
            target,
            terminal_nodes,
            node_refutations,
            circularity: record.circularity,
            logs,
        })
    }
}

impl AprBmcProof {
    pub fn to_bmc_record(&self) -> AprBmcProofRecord {
        AprBmcProofRecord {
            apr: self.apr.to_apr_record(),
            bmc_depth: self.bmc_depth,
            bounded_nodes: self.bounded_nodes.iter().map(NodeId::to_string).collect(),
        }
    }

    pub fn from_bmc_record(
        record: AprBmcProofRecord,
        proof_dir: Option<ProofDir>,
    ) -> Result<Self, ProofError> {
        let apr = AprProof::from_apr_record(record.apr, proof_dir)?;
        let bounded_nodes = resolve_all(&apr.kcfg, &record.bounded_nodes)?;
        Ok(Self {
            apr,
            bmc_depth: record.bmc_depth,
            bounded_nodes,
        })
    }
}

impl RefutationProof {
    pub fn to_refutation_record(&self) -> RefutationProofRecord {
        RefutationProofRecord {
            id: self.meta.id.clone(),
            admitted: self.meta.admitted,
            subproof_ids: self.meta.subproof_ids().to_vec(),
            sort: self.sort.clone(),
            pre_constraints: self.pre_constraints.clone(),
            last_constraint: self.last_constraint.clone(),
            simplified: self.simplified.clone(),
            result: self.result,
        }
    }

    pub fn from_refutation_record(record: RefutationProofRecord, proof_dir: Option<ProofDir>) -> Self {
        let mut meta = ProofMeta::new(record.id, proof_dir).with_subproof_ids(record.subproof_ids);
        meta.admitted = record.admitted;
        Self {
            meta,
            sort: record.sort,
            pre_constraints: record.pre_constraints,
            last_constraint: record.last_constraint,
            simplified: record.simplified,
            result: record.result,
        }
    }
}
