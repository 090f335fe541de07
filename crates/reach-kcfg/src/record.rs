use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::kcfg::Kcfg;
use crate::node::{Node, NodeId};
use crate::successor::Successor;
use crate::KcfgError;

/// Persisted form of a [`Kcfg`].
///
/// Nodes and successors are listed in insertion order so that a restored
/// graph breaks search ties exactly like the original.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KcfgRecord {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub successors: Vec<Successor>,
    #[serde(default)]
    pub aliases: IndexMap<String, NodeId>,
    #[serde(default)]
    pub stuck: Vec<NodeId>,
}

impl Kcfg {
    pub fn to_record(&self) -> KcfgRecord {
        KcfgRecord {
            nodes: self.nodes.values().cloned().collect(),
            successors: self.all_successors().cloned().collect(),
            aliases: self.aliases.clone(),
            stuck: self.stuck.iter().cloned().collect(),
        }
    }

    /// Rebuild a graph, checking that every node id is the hash of its
    /// content and that every reference points at a stored node.
    pub fn from_record(record: KcfgRecord) -> Result<Self, KcfgError> {
        let mut kcfg = Kcfg::new();
        for node in record.nodes {
            let computed = NodeId::of(&node.cterm);
            if computed != node.id {
                return Err(KcfgError::NodeHashMismatch {
                    stored: node.id,
                    computed,
                });
            }
            kcfg.nodes.insert(node.id.clone(), node);
        }

        for successor in record.successors {
            let source = successor.source().clone();
            let missing = std::iter::once(&source)
                .chain(successor.targets())
                .find(|id| !kcfg.contains(id))
                .cloned();
            if let Some(missing) = missing {
                return Err(KcfgError::DanglingSuccessor {
                    from: source,
                    missing,
                });
            }
            kcfg.successors.entry(source).or_default().push(successor);
        }

        for (alias, id) in record.aliases {
            kcfg.add_alias(alias, &id)?;
        }
        for id in &record.stuck {
            kcfg.add_stuck(id)?;
        }
        Ok(kcfg)
    }
}

impl TryFrom<KcfgRecord> for Kcfg {
    type Error = KcfgError;

    fn try_from(record: KcfgRecord) -> Result<Self, Self::Error> {
        Kcfg::from_record(record)
    }
}
