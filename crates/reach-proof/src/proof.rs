use crate::apr::{AprProof, Reachability};
use crate::bmc::AprBmcProof;
use crate::meta::ProofMeta;
use crate::record::ProofRecord;
use crate::refutation::RefutationProof;
use crate::store::ProofDir;
use crate::{ProofError, ProofStatus};

/// Any proof kind that can be stored in a proof directory.
#[derive(Debug, Clone)]
pub enum Proof {
    Apr(AprProof),
    AprBmc(AprBmcProof),
    Refutation(RefutationProof),
}

impl Proof {
    pub fn id(&self) -> &str {
        &self.meta().id
    }

    /// Name of the proof kind, as written in the record's `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Proof::Apr(_) => "APRProof",
            Proof::AprBmc(_) => "APRBMCProof",
            Proof::Refutation(_) => "RefutationProof",
        }
    }

    pub fn meta(&self) -> &ProofMeta {
        match self {
            Proof::Apr(p) => &p.meta,
            Proof::AprBmc(p) => &p.apr.meta,
            Proof::Refutation(p) => &p.meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut ProofMeta {
        match self {
            Proof::Apr(p) => &mut p.meta,
            Proof::AprBmc(p) => &mut p.apr.meta,
            Proof::Refutation(p) => &mut p.meta,
        }
    }

    /// The reachability view of graph-based proofs.
    pub fn as_reachability(&self) -> Option<&dyn Reachability> {
        match self {
            Proof::Apr(p) => Some(p),
            Proof::AprBmc(p) => Some(p),
            Proof::Refutation(_) => None,
        }
    }

    pub fn as_reachability_mut(&mut self) -> Option<&mut dyn Reachability> {
        match self {
            Proof::Apr(p) => Some(p),
            Proof::AprBmc(p) => Some(p),
            Proof::Refutation(_) => None,
        }
    }

    pub fn status(&self) -> Result<ProofStatus, ProofError> {
        match self {
            Proof::Apr(p) => p.status(),
            Proof::AprBmc(p) => p.status(),
            Proof::Refutation(p) => Ok(p.status()),
        }
    }

    pub fn summary(&self) -> Result<Vec<String>, ProofError> {
        match self {
            Proof::Apr(p) => p.summary(),
            Proof::AprBmc(p) => p.summary(),
            Proof::Refutation(p) => Ok(p.summary()),
        }
    }

    pub fn to_record(&self) -> ProofRecord {
        match self {
            Proof::Apr(p) => p.to_record(),
            Proof::AprBmc(p) => p.to_record(),
            Proof::Refutation(p) => p.to_record(),
        }
    }

    pub fn from_record(record: ProofRecord, proof_dir: Option<ProofDir>) -> Result<Self, ProofError> {
        Ok(match record {
            ProofRecord::Apr(r) => Proof::Apr(AprProof::from_apr_record(r, proof_dir)?),
            ProofRecord::AprBmc(r) => Proof::AprBmc(AprBmcProof::from_bmc_record(r, proof_dir)?),
            ProofRecord::Refutation(r) => {
                Proof::Refutation(RefutationProof::from_refutation_record(r, proof_dir))
            }
        })
    }

    pub fn write_proof(&self) -> Result<(), ProofError> {
        self.meta().write(&self.to_record())
    }

    pub fn into_apr(self) -> Result<AprProof, ProofError> {
        match self {
            Proof::Apr(p) => Ok(p),
            other => Err(unexpected(&other, "APRProof")),
        }
    }

    pub fn into_bmc(self) -> Result<AprBmcProof, ProofError> {
        match self {
            Proof::AprBmc(p) => Ok(p),
            other => Err(unexpected(&other, "APRBMCProof")),
        }
    }

    pub fn into_refutation(self) -> Result<RefutationProof, ProofError> {
        match self {
            Proof::Refutation(p) => Ok(p),
            other => Err(unexpected(&other, "RefutationProof")),
        }
    }
}

fn unexpected(proof: &Proof, expected: &'static str) -> ProofError {
    ProofError::UnexpectedProofType {
        id: proof.id().to_string(),
        expected,
        found: proof.kind(),
    }
}

/// Proofs are equal when their persisted records are.
impl PartialEq for Proof {
    fn eq(&self, other: &Self) -> bool {
        self.to_record() == other.to_record()
    }
}

impl From<AprProof> for Proof {
    fn from(proof: AprProof) -> Self {
        Proof::Apr(proof)
    }
}

impl From<AprBmcProof> for Proof {
    fn from(proof: AprBmcProof) -> Self {
        Proof::AprBmc(proof)
    }
}

impl From<RefutationProof> for Proof {
    fn from(proof: RefutationProof) -> Self {
        Proof::Refutation(proof)
    }
}
