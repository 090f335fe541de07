use indexmap::IndexMap;
use tracing::debug;

use crate::proof::Proof;
use crate::record::ProofRecord;
use crate::store::ProofDir;
use crate::{ProofError, ProofStatus};

/// Fields shared by every proof kind.
#[derive(Debug, Clone, Default)]
pub struct ProofMeta {
    pub id: String,
    /// Accepted without verification.
    pub admitted: bool,
    subproof_ids: Vec<String>,
    /// Directory the proof is checkpointed to, if any.
    pub proof_dir: Option<ProofDir>,
    cached: IndexMap<String, Proof>,
}

impl ProofMeta {
    pub fn new(id: impl Into<String>, proof_dir: Option<ProofDir>) -> Self {
        Self {
            id: id.into(),
            proof_dir,
            ..Self::default()
        }
    }

    pub(crate) fn with_subproof_ids(mut self, ids: Vec<String>) -> Self {
        self.subproof_ids = ids;
        self
    }

    pub fn subproof_ids(&self) -> &[String] {
        &self.subproof_ids
    }

    /// Register `proof` as a sub-proof, replacing any earlier copy.
    ///
    /// With a proof directory configured the sub-proof is written there
    /// too, so the stored record never lags behind the registered one.
    pub fn add_subproof(&mut self, proof: Proof) -> Result<(), ProofError> {
        if let Some(dir) = &self.proof_dir {
            dir.write(&proof.to_record())?;
        }
        let id = proof.id().to_string();
        if !self.subproof_ids.contains(&id) {
            self.subproof_ids.push(id.clone());
        }
        self.cached.insert(id, proof);
        Ok(())
    }

    /// Drop a sub-proof dependency. The sub-proof's own record is kept.
    pub fn remove_subproof(&mut self, id: &str) -> bool {
        self.cached.shift_remove(id);
        let before = self.subproof_ids.len();
        self.subproof_ids.retain(|s| s != id);
        before != self.subproof_ids.len()
    }

    /// Load a sub-proof, preferring the stored copy over the in-memory one.
    pub fn subproof(&self, id: &str) -> Result<Proof, ProofError> {
        if let Some(dir) = &self.proof_dir {
            if dir.exists(id) {
                return dir.read(id);
            }
        }
        match self.cached.get(id) {
            Some(proof) => Ok(proof.clone()),
            None => Err(ProofError::SubproofUnavailable(id.to_string())),
        }
    }

    pub fn subproofs(&self) -> Result<Vec<Proof>, ProofError> {
        self.subproof_ids.iter().map(|id| self.subproof(id)).collect()
    }

    /// Combined status of all sub-proofs: failed if any failed, else pending
    /// if any is pending.
    pub fn subproofs_status(&self) -> Result<ProofStatus, ProofError> {
        let mut status = ProofStatus::Passed;
        for proof in self.subproofs()? {
            match proof.status()? {
                ProofStatus::Failed => return Ok(ProofStatus::Failed),
                ProofStatus::Pending => status = ProofStatus::Pending,
                ProofStatus::Passed => {}
            }
        }
        Ok(status)
    }

    /// Checkpoint `record` if a proof directory is configured.
    pub(crate) fn write(&self, record: &ProofRecord) -> Result<(), ProofError> {
        match &self.proof_dir {
            Some(dir) => dir.write(record),
            None => {
                debug!(proof = %self.id, "no proof directory, skipping checkpoint");
                Ok(())
            }
        }
    }
}
