use reach_ir::hash::shorten_hash;
use reach_ir::CTerm;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Canonical node identifier: the content hash of the node's state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Identifier of the node holding `cterm`.
    pub fn of(cterm: &CTerm) -> Self {
        NodeId(cterm.hash())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fixed-width prefix used in log lines and summaries.
    pub fn short(&self) -> &str {
        shorten_hash(&self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A symbolic state in the graph. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub cterm: CTerm,
}

impl Node {
    pub fn new(cterm: CTerm) -> Self {
        Self {
            id: NodeId::of(&cterm),
            cterm,
        }
    }
}
