use indexmap::{IndexMap, IndexSet};
use reach_ir::{CSubst, CTerm, Claim, Term};
use std::collections::{HashSet, VecDeque};

use crate::node::{Node, NodeId};
use crate::successor::{Cover, Edge, NdBranch, Split, Successor};
use crate::KcfgError;

/// Alias given to the initial node by [`Kcfg::from_claim`].
pub const INIT_ALIAS: &str = "init";
/// Alias given to the target node by [`Kcfg::from_claim`].
pub const TARGET_ALIAS: &str = "target";

/// State of a bounded simple-path enumeration.
struct PathSearch<'a> {
    target: &'a NodeId,
    reaching: HashSet<&'a NodeId>,
    limit: usize,
    on_path: Vec<&'a NodeId>,
    steps: Vec<Successor>,
    paths: Vec<Vec<Successor>>,
}

/// Append-only graph of symbolic states.
///
/// Nodes and successors keep their insertion order; every search that has to
/// break ties does so by that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Kcfg {
    pub(crate) nodes: IndexMap<NodeId, Node>,
    pub(crate) successors: IndexMap<NodeId, Vec<Successor>>,
    pub(crate) aliases: IndexMap<String, NodeId>,
    pub(crate) stuck: IndexSet<NodeId>,
}

impl Kcfg {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph seeded from a claim: the init node holds `lhs` under `requires`,
    /// the target node `rhs` under `ensures`. No successors are created.
    pub fn from_claim(claim: &Claim) -> (Self, NodeId, NodeId) {
        let mut kcfg = Self::new();
        let init = kcfg.create_node(CTerm::new(claim.lhs.clone(), claim.requires.clone()));
        let target = kcfg.create_node(CTerm::new(claim.rhs.clone(), claim.ensures.clone()));
        kcfg.aliases.insert(INIT_ALIAS.to_string(), init.clone());
        kcfg.aliases.insert(TARGET_ALIAS.to_string(), target.clone());
        (kcfg, init, target)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &NodeId) -> Result<&Node, KcfgError> {
        self.nodes
            .get(id)
            .ok_or_else(|| KcfgError::NodeNotFound(id.to_string()))
    }

    /// Add a node for `cterm`, or return the id of the existing node with the
    /// same content.
    pub fn create_node(&mut self, cterm: CTerm) -> NodeId {
        let node = Node::new(cterm);
        let id = node.id.clone();
        self.nodes.entry(id.clone()).or_insert(node);
        id
    }

    /// Map a full id, an alias or a unique id prefix to the canonical id.
    pub fn resolve(&self, id_like: &str) -> Result<NodeId, KcfgError> {
        if id_like.is_empty() {
            return Err(KcfgError::NodeNotFound(String::new()));
        }
        if let Some((id, _)) = self.nodes.get_key_value(id_like) {
            return Ok(id.clone());
        }
        if let Some(id) = self.aliases.get(id_like) {
            return Ok(id.clone());
        }
        let candidates: Vec<&NodeId> = self
            .nodes
            .keys()
            .filter(|id| id.as_str().starts_with(id_like))
            .collect();
        match candidates.as_slice() {
            [] => Err(KcfgError::NodeNotFound(id_like.to_string())),
            [id] => Ok((*id).clone()),
            many => Err(KcfgError::AmbiguousNodeId {
                prefix: id_like.to_string(),
                candidates: many.iter().map(|id| id.to_string()).collect(),
            }),
        }
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&String, &NodeId)> {
        self.aliases.iter()
    }

    pub fn add_alias(&mut self, alias: impl Into<String>, id: &NodeId) -> Result<(), KcfgError> {
        self.node(id)?;
        let alias = alias.into();
        if let Some(existing) = self.aliases.get(&alias) {
            if existing != id {
                return Err(KcfgError::AliasExists {
                    alias,
                    existing: existing.clone(),
                });
            }
        }
        self.aliases.insert(alias, id.clone());
        Ok(())
    }

    pub fn remove_alias(&mut self, alias: &str) -> Result<NodeId, KcfgError> {
        self.aliases
            .shift_remove(alias)
            .ok_or_else(|| KcfgError::NodeNotFound(alias.to_string()))
    }

    fn require(&self, id: &NodeId) -> Result<(), KcfgError> {
        self.node(id).map(|_| ())
    }

    fn push_successor(&mut self, successor: Successor) {
        self.successors
            .entry(successor.source().clone())
            .or_default()
            .push(successor);
    }

    pub fn create_edge(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        depth: usize,
        rules: Vec<String>,
    ) -> Result<(), KcfgError> {
        self.require(source)?;
        self.require(target)?;
        self.push_successor(Successor::Edge(Edge {
            source: source.clone(),
            target: target.clone(),
            depth,
            rules,
        }));
        Ok(())
    }

    /// Record that `source` is subsumed by `target`.
    ///
    /// Without an explicit witness, one is computed by matching the target
    /// state against the source state; if they do not match the cover is
    /// rejected.
    pub fn create_cover(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        csubst: Option<CSubst>,
    ) -> Result<(), KcfgError> {
        let source_cterm = &self.node(source)?.cterm;
        let target_cterm = &self.node(target)?.cterm;
        let csubst = match csubst {
            Some(csubst) => csubst,
            None => source_cterm
                .match_with_constraint(target_cterm)
                .ok_or_else(|| KcfgError::CoverWithoutWitness {
                    from: source.clone(),
                    target: target.clone(),
                })?,
        };
        self.push_successor(Successor::Cover(Cover {
            source: source.clone(),
            target: target.clone(),
            csubst,
        }));
        Ok(())
    }

    pub fn create_split(
        &mut self,
        source: &NodeId,
        splits: impl IntoIterator<Item = (NodeId, CSubst)>,
    ) -> Result<(), KcfgError> {
        self.require(source)?;
        let splits: IndexMap<NodeId, CSubst> = splits.into_iter().collect();
        if splits.is_empty() {
            return Err(KcfgError::EmptySplit(source.clone()));
        }
        for target in splits.keys() {
            self.require(target)?;
        }
        self.push_successor(Successor::Split(Split {
            source: source.clone(),
            splits,
        }));
        Ok(())
    }

    /// Split `source` on a list of discriminants: one child per constraint,
    /// each holding the source state with that constraint conjoined.
    pub fn split_on_constraints(
        &mut self,
        source: &NodeId,
        constraints: impl IntoIterator<Item = Term>,
    ) -> Result<Vec<NodeId>, KcfgError> {
        let cterm = self.node(source)?.cterm.clone();
        let mut splits = Vec::new();
        for constraint in constraints {
            let child = self.create_node(cterm.add_constraint(constraint.clone()));
            splits.push((child, CSubst::from_constraints([constraint])));
        }
        let children = splits.iter().map(|(id, _)| id.clone()).collect();
        self.create_split(source, splits)?;
        Ok(children)
    }

    pub fn create_ndbranch(
        &mut self,
        source: &NodeId,
        targets: Vec<NodeId>,
        rules: Vec<String>,
    ) -> Result<(), KcfgError> {
        self.require(source)?;
        if targets.is_empty() {
            return Err(KcfgError::EmptyNdBranch(source.clone()));
        }
        for target in &targets {
            self.require(target)?;
        }
        self.push_successor(Successor::NdBranch(NdBranch {
            source: source.clone(),
            targets,
            rules,
        }));
        Ok(())
    }

    /// Mark a node the backend could not step any further.
    pub fn add_stuck(&mut self, id: &NodeId) -> Result<(), KcfgError> {
        self.require(id)?;
        self.stuck.insert(id.clone());
        Ok(())
    }

    pub fn remove_stuck(&mut self, id: &NodeId) -> bool {
        self.stuck.shift_remove(id)
    }

    /// Stuck leaves in insertion order.
    pub fn stuck(&self) -> Vec<&Node> {
        self.nodes
            .values()
            .filter(|node| self.is_stuck(&node.id))
            .collect()
    }

    pub fn is_leaf(&self, id: &NodeId) -> bool {
        self.successors.get(id).map_or(true, Vec::is_empty)
    }

    /// A leaf the backend reported as unable to step.
    pub fn is_stuck(&self, id: &NodeId) -> bool {
        self.is_leaf(id) && self.stuck.contains(id)
    }

    /// Nodes without outgoing successors, in insertion order.
    pub fn leaves(&self) -> Vec<&Node> {
        self.nodes
            .values()
            .filter(|node| self.is_leaf(&node.id))
            .collect()
    }

    /// Outgoing successors of `id`, in creation order.
    pub fn successors(&self, id: &NodeId) -> &[Successor] {
        self.successors.get(id).map_or(&[], Vec::as_slice)
    }

    /// Successors having `id` among their targets.
    pub fn predecessors(&self, id: &NodeId) -> Vec<&Successor> {
        self.all_successors()
            .filter(|succ| succ.targets().contains(&id))
            .collect()
    }

    /// Every successor in the graph, grouped by source in insertion order.
    pub fn all_successors(&self) -> impl Iterator<Item = &Successor> {
        self.successors.values().flatten()
    }

    pub fn edges(&self, source: &NodeId) -> Vec<&Edge> {
        self.successors(source)
            .iter()
            .filter_map(|succ| match succ {
                Successor::Edge(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    pub fn covers(&self, source: &NodeId) -> Vec<&Cover> {
        self.successors(source)
            .iter()
            .filter_map(|succ| match succ {
                Successor::Cover(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    pub fn splits(&self, source: &NodeId) -> Vec<&Split> {
        self.successors(source)
            .iter()
            .filter_map(|succ| match succ {
                Successor::Split(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn ndbranches(&self, source: &NodeId) -> Vec<&NdBranch> {
        self.successors(source)
            .iter()
            .filter_map(|succ| match succ {
                Successor::NdBranch(b) => Some(b),
                _ => None,
            })
            .collect()
    }

    /// Splits that have `target` as one of their branches.
    pub fn splits_into(&self, target: &NodeId) -> Vec<&Split> {
        self.all_successors()
            .filter_map(|succ| match succ {
                Successor::Split(s) if s.splits.contains_key(target) => Some(s),
                _ => None,
            })
            .collect()
    }

    /// Breadth-first shortest path from `source` to `target`.
    ///
    /// Each step of the returned path is narrowed to the single branch taken.
    /// Returns an empty path when `source == target` and `None` when `target`
    /// is unreachable. Among paths of equal length the first one found in
    /// insertion order wins.
    pub fn shortest_path_between(&self, source: &NodeId, target: &NodeId) -> Option<Vec<Successor>> {
        self.shortest_path_by(source, target, |_| true)
    }

    fn shortest_path_by(
        &self,
        source: &NodeId,
        target: &NodeId,
        follow: impl Fn(&Successor) -> bool,
    ) -> Option<Vec<Successor>> {
        let mut visited: HashSet<&NodeId> = HashSet::from([source]);
        let mut queue: VecDeque<(&NodeId, Vec<Successor>)> = VecDeque::from([(source, Vec::new())]);
        while let Some((current, path)) = queue.pop_front() {
            if current == target {
                return Some(path);
            }
            for succ in self.successors(current).iter().filter(|s| follow(*s)) {
                for next in succ.targets() {
                    if !visited.insert(next) {
                        continue;
                    }
                    let Some(step) = succ.narrowed_to(next) else {
                        continue;
                    };
                    let mut extended = path.clone();
                    extended.push(step);
                    queue.push_back((next, extended));
                }
            }
        }
        None
    }

    /// All simple paths from `source` to `target`, in discovery order.
    pub fn paths_between(&self, source: &NodeId, target: &NodeId) -> Vec<Vec<Successor>> {
        self.paths_between_up_to(source, target, usize::MAX)
    }

    /// The first `limit` simple paths from `source` to `target`.
    ///
    /// The search only enters nodes that can still reach `target`, so every
    /// branch it explores ends in a path and the cost grows with `limit`
    /// rather than with the number of paths in the graph.
    pub fn paths_between_up_to(
        &self,
        source: &NodeId,
        target: &NodeId,
        limit: usize,
    ) -> Vec<Vec<Successor>> {
        let mut search = PathSearch {
            target,
            reaching: self.nodes_reaching(target),
            limit,
            on_path: vec![source],
            steps: Vec::new(),
            paths: Vec::new(),
        };
        if limit > 0 && search.reaching.contains(source) {
            self.collect_paths(source, &mut search);
        }
        search.paths
    }

    /// Nodes from which `target` is reachable, `target` included.
    fn nodes_reaching<'a>(&'a self, target: &'a NodeId) -> HashSet<&'a NodeId> {
        let mut reaching: HashSet<&NodeId> = HashSet::from([target]);
        let mut queue: VecDeque<&NodeId> = VecDeque::from([target]);
        while let Some(current) = queue.pop_front() {
            for succ in self.predecessors(current) {
                if reaching.insert(succ.source()) {
                    queue.push_back(succ.source());
                }
            }
        }
        reaching
    }

    fn collect_paths<'a>(&'a self, current: &'a NodeId, search: &mut PathSearch<'a>) {
        if current == search.target {
            search.paths.push(search.steps.clone());
            return;
        }
        for succ in self.successors(current) {
            for next in succ.targets() {
                if search.paths.len() >= search.limit {
                    return;
                }
                if !search.reaching.contains(next) || search.on_path.contains(&next) {
                    continue;
                }
                let Some(step) = succ.narrowed_to(next) else {
                    continue;
                };
                search.on_path.push(next);
                search.steps.push(step);
                self.collect_paths(next, search);
                search.steps.pop();
                search.on_path.pop();
            }
        }
    }

    /// Whether `target` is reachable from `source` using only transitions
    /// that take no rewrite steps (Split, Cover and zero-depth Edge).
    pub fn zero_depth_between(&self, source: &NodeId, target: &NodeId) -> bool {
        self.shortest_path_by(source, target, Successor::is_zero_cost)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(n: i64) -> CTerm {
        CTerm::from_config(Term::apply("<k>", vec![Term::int(n)]))
    }

    fn guard(name: &str) -> Term {
        Term::equals_true(Term::var(name))
    }

    /// 0 -e(2)-> 1 -split-> {2, 3}; 2 -e(1)-> 4; 3 -cover-> 1.
    fn diamond() -> (Kcfg, Vec<NodeId>) {
        let mut kcfg = Kcfg::new();
        let ids: Vec<NodeId> = (0..5).map(|n| kcfg.create_node(state(n))).collect();
        kcfg.create_edge(&ids[0], &ids[1], 2, vec!["r1".into()]).unwrap();
        kcfg.create_split(
            &ids[1],
            [
                (ids[2].clone(), CSubst::from_constraints([guard("B")])),
                (ids[3].clone(), CSubst::from_constraints([Term::not_bool(guard("B"))])),
            ],
        )
        .unwrap();
        kcfg.create_edge(&ids[2], &ids[4], 1, vec![]).unwrap();
        kcfg.create_cover(&ids[3], &ids[1], Some(CSubst::empty())).unwrap();
        (kcfg, ids)
    }

    #[test]
    fn identical_content_yields_the_same_node() {
        let mut kcfg = Kcfg::new();
        let a = kcfg.create_node(state(1));
        let b = kcfg.create_node(state(1));
        assert_eq!(a, b);
        assert_eq!(kcfg.len(), 1);
    }

    #[test]
    fn node_lookup_fails_for_unknown_id() {
        let kcfg = Kcfg::new();
        let missing = NodeId::of(&state(9));
        assert!(matches!(kcfg.node(&missing), Err(KcfgError::NodeNotFound(_))));
    }

    #[test]
    fn leaves_have_no_outgoing_successors() {
        let (kcfg, ids) = diamond();
        let leaves: Vec<&NodeId> = kcfg.leaves().iter().map(|n| &n.id).collect();
        assert_eq!(leaves, vec![&ids[4]]);
        for leaf in kcfg.leaves() {
            assert!(kcfg.successors(&leaf.id).is_empty());
        }
    }

    #[test]
    fn stuck_requires_marking_and_leafness() {
        let (mut kcfg, ids) = diamond();
        assert!(!kcfg.is_stuck(&ids[4]));
        kcfg.add_stuck(&ids[4]).unwrap();
        kcfg.add_stuck(&ids[0]).unwrap();
        assert!(kcfg.is_stuck(&ids[4]));
        assert!(!kcfg.is_stuck(&ids[0]));
        assert_eq!(kcfg.stuck().len(), 1);
    }

    #[test]
    fn shortest_path_narrows_splits_to_the_branch_taken() {
        let (kcfg, ids) = diamond();
        let path = kcfg.shortest_path_between(&ids[0], &ids[4]).unwrap();
        assert_eq!(path.len(), 3);
        match &path[1] {
            Successor::Split(split) => {
                assert_eq!(split.splits.keys().collect::<Vec<_>>(), vec![&ids[2]]);
            }
            other => panic!("expected split, got {other:?}"),
        }
        assert_eq!(kcfg.shortest_path_between(&ids[0], &ids[0]), Some(vec![]));
        assert_eq!(kcfg.shortest_path_between(&ids[4], &ids[0]), None);
    }

    #[test]
    fn paths_between_enumerates_simple_paths_through_cycles() {
        let (kcfg, ids) = diamond();
        // The cover 3 -> 1 closes a loop; only the simple path counts.
        let paths = kcfg.paths_between(&ids[0], &ids[4]);
        assert_eq!(paths.len(), 1);
        let paths = kcfg.paths_between(&ids[3], &ids[4]);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].len(), 3);
    }

    #[test]
    fn bounded_path_search_stops_early_on_wide_graphs() {
        // Thirty diamonds in a row: 2^30 simple paths from the first head
        // to the last, plus a dead end hanging off every head.
        let mut kcfg = Kcfg::new();
        let node = |kcfg: &mut Kcfg, tag: &str, n: i64| {
            kcfg.create_node(CTerm::from_config(Term::apply(tag, vec![Term::int(n)])))
        };
        let first = node(&mut kcfg, "head", 0);
        let mut head = first.clone();
        for i in 0..30 {
            let left = node(&mut kcfg, "left", i);
            let right = node(&mut kcfg, "right", i);
            let dead = node(&mut kcfg, "dead", i);
            let next = node(&mut kcfg, "head", i + 1);
            kcfg.create_ndbranch(&head, vec![dead, left.clone(), right.clone()], vec![])
                .unwrap();
            kcfg.create_edge(&left, &next, 1, vec![]).unwrap();
            kcfg.create_edge(&right, &next, 1, vec![]).unwrap();
            head = next;
        }

        let paths = kcfg.paths_between_up_to(&first, &head, 2);
        assert_eq!(paths.len(), 2);
        assert_ne!(paths[0], paths[1]);
        assert_eq!(paths[0].len(), 60);
        assert!(kcfg.paths_between_up_to(&first, &head, 0).is_empty());
        assert!(kcfg.paths_between_up_to(&head, &first, 2).is_empty());
    }

    #[test]
    fn bounded_path_search_agrees_with_full_enumeration() {
        let (kcfg, ids) = diamond();
        assert_eq!(
            kcfg.paths_between_up_to(&ids[0], &ids[4], 2),
            kcfg.paths_between(&ids[0], &ids[4])
        );
    }

    #[test]
    fn zero_depth_follows_only_free_transitions() {
        let (kcfg, ids) = diamond();
        assert!(kcfg.zero_depth_between(&ids[1], &ids[3]));
        assert!(kcfg.zero_depth_between(&ids[3], &ids[2]));
        assert!(!kcfg.zero_depth_between(&ids[0], &ids[1]));
        assert!(!kcfg.zero_depth_between(&ids[1], &ids[4]));
        assert!(kcfg.zero_depth_between(&ids[4], &ids[4]));
    }

    #[test]
    fn predecessors_and_split_targets() {
        let (kcfg, ids) = diamond();
        assert_eq!(kcfg.predecessors(&ids[1]).len(), 2);
        assert_eq!(kcfg.splits_into(&ids[3]).len(), 1);
        assert!(kcfg.splits_into(&ids[1]).is_empty());
        assert_eq!(kcfg.edges(&ids[0]).len(), 1);
        assert_eq!(kcfg.covers(&ids[3]).len(), 1);
        assert_eq!(kcfg.splits(&ids[1]).len(), 1);
    }

    #[test]
    fn resolve_accepts_aliases_and_unique_prefixes() {
        let (mut kcfg, ids) = diamond();
        kcfg.add_alias("loop-head", &ids[1]).unwrap();
        assert_eq!(kcfg.resolve("loop-head").unwrap(), ids[1]);
        assert_eq!(kcfg.resolve(ids[2].as_str()).unwrap(), ids[2]);
        assert_eq!(kcfg.resolve(&ids[3].as_str()[..16]).unwrap(), ids[3]);
        assert!(matches!(kcfg.resolve("zz"), Err(KcfgError::NodeNotFound(_))));
        assert!(matches!(
            kcfg.resolve(""),
            Err(KcfgError::AmbiguousNodeId { .. })
        ));
        assert!(matches!(
            kcfg.add_alias("loop-head", &ids[0]),
            Err(KcfgError::AliasExists { .. })
        ));
    }

    #[test]
    fn split_on_constraints_conjoins_each_discriminant() {
        let mut kcfg = Kcfg::new();
        let root = kcfg.create_node(state(0));
        let children = kcfg
            .split_on_constraints(&root, [guard("B"), Term::not_bool(guard("B"))])
            .unwrap();
        assert_eq!(children.len(), 2);
        let child = kcfg.node(&children[0]).unwrap();
        assert_eq!(child.cterm.constraints(), &[guard("B")]);
        assert!(kcfg.split_on_constraints(&children[0], []).is_err());
    }

    #[test]
    fn cover_without_witness_requires_a_match() {
        let mut kcfg = Kcfg::new();
        let concrete = kcfg.create_node(state(3));
        let general = kcfg.create_node(CTerm::from_config(Term::apply("<k>", vec![Term::var("N")])));
        let other = kcfg.create_node(CTerm::from_config(Term::apply("<pc>", vec![Term::var("N")])));

        kcfg.create_cover(&concrete, &general, None).unwrap();
        let cover = kcfg.covers(&concrete)[0];
        assert_eq!(cover.csubst.subst.get("N"), Some(&Term::int(3)));

        assert!(matches!(
            kcfg.create_cover(&concrete, &other, None),
            Err(KcfgError::CoverWithoutWitness { .. })
        ));
    }

    #[test]
    fn empty_id_is_not_a_prefix_of_every_node() {
        let mut kcfg = Kcfg::new();
        kcfg.create_node(state(1));
        assert!(matches!(kcfg.resolve(""), Err(KcfgError::NodeNotFound(_))));
    }

    #[test]
    fn node_ids_in_errors_are_reported_not_chained() {
        let (kcfg, ids) = diamond();
        let err = KcfgError::CoverWithoutWitness {
            from: ids[0].clone(),
            target: ids[4].clone(),
        };
        assert!(std::error::Error::source(&err).is_none());
        assert!(err.to_string().contains(ids[0].as_str()));
        let err = KcfgError::DanglingSuccessor {
            from: ids[2].clone(),
            missing: ids[3].clone(),
        };
        assert!(std::error::Error::source(&err).is_none());
        assert!(err.to_string().contains(ids[2].as_str()));
        assert_eq!(kcfg.len(), 5);
    }

    #[test]
    fn from_claim_seeds_init_and_target() {
        let claim = Claim::new("c", Term::apply("<k>", vec![Term::var("X")]), Term::var("Y"))
            .with_requires([guard("R")]);
        let (kcfg, init, target) = Kcfg::from_claim(&claim);
        assert_eq!(kcfg.len(), 2);
        assert_eq!(kcfg.resolve(INIT_ALIAS).unwrap(), init);
        assert_eq!(kcfg.resolve(TARGET_ALIAS).unwrap(), target);
        assert_eq!(kcfg.node(&init).unwrap().cterm.constraints(), &[guard("R")]);
        assert_eq!(kcfg.all_successors().count(), 0);
    }
}
