use reach_ir::hash::sha256_hex_str;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::proof::Proof;
use crate::record::ProofRecord;
use crate::ProofError;

/// File name of a proof record inside its directory.
pub const PROOF_FILE: &str = "proof.json";

/// Directory of persisted proofs.
///
/// Each proof lives at `<root>/<sha256(id)>/proof.json`. The directory is
/// single-writer: concurrent writers to the same id must be serialized by
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofDir {
    root: PathBuf,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ProofError + '_ {
    move |source| ProofError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl ProofDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn proof_path(&self, id: &str) -> PathBuf {
        self.root.join(sha256_hex_str(id)).join(PROOF_FILE)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.proof_path(id).is_file()
    }

    pub fn write(&self, record: &ProofRecord) -> Result<(), ProofError> {
        let path = self.proof_path(record.id());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json).map_err(io_error(&path))?;
        debug!(proof = record.id(), path = %path.display(), "Wrote proof");
        Ok(())
    }

    pub fn read_record(&self, id: &str) -> Result<ProofRecord, ProofError> {
        let path = self.proof_path(id);
        if !path.is_file() {
            return Err(ProofError::ProofNotFound {
                id: id.to_string(),
                path,
            });
        }
        let text = fs::read_to_string(&path).map_err(io_error(&path))?;
        info!(proof = id, path = %path.display(), "Reading proof");
        Ok(serde_json::from_str(&text)?)
    }

    /// Load a proof; it keeps this directory for its own checkpoints.
    pub fn read(&self, id: &str) -> Result<Proof, ProofError> {
        Proof::from_record(self.read_record(id)?, Some(self.clone()))
    }

    /// Ids of all stored proofs, sorted.
    pub fn list(&self) -> Result<Vec<String>, ProofError> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(io_error(&self.root))? {
            let entry = entry.map_err(io_error(&self.root))?;
            let path = entry.path().join(PROOF_FILE);
            if !path.is_file() {
                continue;
            }
            let text = fs::read_to_string(&path).map_err(io_error(&path))?;
            let record: ProofRecord = serde_json::from_str(&text)?;
            ids.push(record.id().to_string());
        }
        ids.sort();
        Ok(ids)
    }
}
