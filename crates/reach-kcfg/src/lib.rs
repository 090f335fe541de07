#![doc = include_str!("../README.md")]

//! Proof graph for all-path reachability.
//!
//! A [`Kcfg`] stores content-addressed [`Node`]s and the typed
//! [`Successor`]s between them. All references between nodes go through
//! [`NodeId`], so loops closed by Cover back-edges need no shared ownership.

pub mod kcfg;
pub mod node;
pub mod record;
pub mod successor;

pub use kcfg::Kcfg;
pub use node::{Node, NodeId};
pub use record::KcfgRecord;
pub use successor::{Cover, Edge, NdBranch, Split, Successor};

use thiserror::Error;

/// Errors raised by graph construction, queries and restore.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KcfgError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),
    #[error("Node id '{prefix}' is ambiguous, candidates: {}", .candidates.join(", "))]
    AmbiguousNodeId {
        prefix: String,
        candidates: Vec<String>,
    },
    #[error("Alias '{alias}' already refers to node {existing}")]
    AliasExists { alias: String, existing: NodeId },
    #[error("Split from {0} has no branches")]
    EmptySplit(NodeId),
    #[error("Nondeterministic branch from {0} has no targets")]
    EmptyNdBranch(NodeId),
    #[error("Cannot cover {from} by {target}: target does not subsume source")]
    CoverWithoutWitness { from: NodeId, target: NodeId },
    #[error("Stored node id {stored} does not match content hash {computed}")]
    NodeHashMismatch { stored: NodeId, computed: NodeId },
    #[error("Successor from {from} refers to unknown node {missing}")]
    DanglingSuccessor { from: NodeId, missing: NodeId },
}
