use indexmap::IndexMap;
use reach_ir::CSubst;
use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// Summarized multi-step rewrite from one state to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    /// Number of backend rewrite steps summarized by this edge.
    pub depth: usize,
    /// Rules applied along the way, as reported by the backend.
    #[serde(default)]
    pub rules: Vec<String>,
}

/// Subsumption of `source` by `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cover {
    pub source: NodeId,
    pub target: NodeId,
    /// Witness: instantiates `target` to `source` under extra constraints.
    pub csubst: CSubst,
}

/// Case split of `source` into mutually exclusive constrained branches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub source: NodeId,
    /// Branch targets in creation order, each with its guard.
    pub splits: IndexMap<NodeId, CSubst>,
}

/// Nondeterministic choice between several targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NdBranch {
    pub source: NodeId,
    pub targets: Vec<NodeId>,
    #[serde(default)]
    pub rules: Vec<String>,
}

/// Any outgoing transition of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Successor {
    Edge(Edge),
    Cover(Cover),
    Split(Split),
    #[serde(rename = "NDBranch")]
    NdBranch(NdBranch),
}

impl Successor {
    pub fn source(&self) -> &NodeId {
        match self {
            Successor::Edge(e) => &e.source,
            Successor::Cover(c) => &c.source,
            Successor::Split(s) => &s.source,
            Successor::NdBranch(b) => &b.source,
        }
    }

    pub fn targets(&self) -> Vec<&NodeId> {
        match self {
            Successor::Edge(e) => vec![&e.target],
            Successor::Cover(c) => vec![&c.target],
            Successor::Split(s) => s.splits.keys().collect(),
            Successor::NdBranch(b) => b.targets.iter().collect(),
        }
    }

    /// Whether following this successor costs no rewrite steps.
    pub fn is_zero_cost(&self) -> bool {
        match self {
            Successor::Edge(e) => e.depth == 0,
            Successor::Cover(_) | Successor::Split(_) => true,
            Successor::NdBranch(_) => false,
        }
    }

    /// Whether this successor branches on a condition or a choice.
    pub fn is_branch(&self) -> bool {
        matches!(self, Successor::Split(_) | Successor::NdBranch(_))
    }

    /// Restrict a multi-target successor to the single branch leading to
    /// `target`. Used to report paths, where each step has one target.
    pub fn narrowed_to(&self, target: &NodeId) -> Option<Successor> {
        match self {
            Successor::Split(s) => s.splits.get(target).map(|csubst| {
                Successor::Split(Split {
                    source: s.source.clone(),
                    splits: IndexMap::from([(target.clone(), csubst.clone())]),
                })
            }),
            Successor::NdBranch(b) => b.targets.contains(target).then(|| {
                Successor::NdBranch(NdBranch {
                    source: b.source.clone(),
                    targets: vec![target.clone()],
                    rules: b.rules.clone(),
                })
            }),
            _ => self.targets().contains(&target).then(|| self.clone()),
        }
    }
}
