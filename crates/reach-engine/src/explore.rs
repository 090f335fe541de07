use indexmap::IndexMap;
use reach_ir::{CSubst, CTerm, Claim, Definition, LogEntry, Term};
use reach_kcfg::{Kcfg, NodeId};
use tracing::info;

use crate::backend::{Backend, ExecuteRequest};
use crate::EngineError;

/// What one call to [`KcfgExplore::extend`] added to the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extension {
    /// An edge summarizing `depth` steps.
    BasicBlock { target: NodeId, depth: usize },
    /// The node cannot step and was marked stuck.
    Stuck,
    /// Execution stopped at a cut point with one successor: a one-step edge.
    CutRule { target: NodeId },
    /// Successors discriminated by extra constraints.
    Split { targets: Vec<NodeId> },
    /// Successors without discriminating constraints.
    NdBranch { targets: Vec<NodeId> },
}

/// Bridges a [`Backend`] and a proof graph.
#[derive(Debug)]
pub struct KcfgExplore<B> {
    backend: B,
    definition: Definition,
}

impl<B: Backend> KcfgExplore<B> {
    pub fn new(backend: B, definition: Definition) -> Self {
        Self {
            backend,
            definition,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    pub fn cterm_implies(
        &mut self,
        antecedent: &CTerm,
        consequent: &CTerm,
    ) -> Result<Option<CSubst>, EngineError> {
        self.backend
            .implies(antecedent, consequent)
            .map_err(EngineError::backend)
    }

    pub fn cterm_simplify(&mut self, cterm: &CTerm) -> Result<CTerm, EngineError> {
        self.backend.simplify(cterm).map_err(EngineError::backend)
    }

    pub fn add_dependencies_module(
        &mut self,
        main_module: &str,
        module_name: &str,
        claims: &[Claim],
        priority: u32,
    ) -> Result<(), EngineError> {
        info!(
            module = module_name,
            claims = claims.len(),
            "Adding dependencies module"
        );
        self.backend
            .add_module(main_module, module_name, claims, priority)
            .map_err(EngineError::backend)
    }

    /// Run the backend from leaf `node` and record the result in `kcfg`.
    ///
    /// Log entries emitted by the backend are appended under the node they
    /// were produced for.
    pub fn extend(
        &mut self,
        kcfg: &mut Kcfg,
        node: &NodeId,
        logs: &mut IndexMap<NodeId, Vec<LogEntry>>,
        request: &ExecuteRequest,
    ) -> Result<Extension, EngineError> {
        if !kcfg.is_leaf(node) {
            return Err(EngineError::Policy(format!(
                "Cannot extend non-leaf node {node}"
            )));
        }
        if kcfg.is_stuck(node) {
            return Err(EngineError::Policy(format!(
                "Cannot extend stuck node {node}"
            )));
        }

        let cterm = kcfg.node(node)?.cterm.clone();
        info!(node = %node.short(), "Extending KCFG");
        let result = self
            .backend
            .execute(&cterm, request)
            .map_err(EngineError::backend)?;

        let mut log_into = |id: &NodeId, entries: Vec<LogEntry>| {
            if !entries.is_empty() {
                logs.entry(id.clone()).or_default().extend(entries);
            }
        };

        if result.depth > 0 {
            let target = kcfg.create_node(result.state);
            kcfg.create_edge(node, &target, result.depth, result.rules)?;
            log_into(&target, result.logs);
            info!(
                source = %node.short(),
                target = %target.short(),
                depth = result.depth,
                "Found basic block"
            );
            return Ok(Extension::BasicBlock {
                target,
                depth: result.depth,
            });
        }

        match result.next_states.len() {
            0 => {
                kcfg.add_stuck(node)?;
                log_into(node, result.logs);
                info!(node = %node.short(), "Found stuck node");
                Ok(Extension::Stuck)
            }
            1 => {
                let next = result.next_states.into_iter().next();
                let target = kcfg.create_node(next.unwrap_or(result.state));
                kcfg.create_edge(node, &target, 1, result.rules)?;
                log_into(&target, result.logs);
                info!(
                    source = %node.short(),
                    target = %target.short(),
                    "Inserted cut-rule basic block at depth 1"
                );
                Ok(Extension::CutRule { target })
            }
            branches => {
                let guards: Vec<Vec<Term>> = result
                    .next_states
                    .iter()
                    .map(|next| extra_constraints(&cterm, next))
                    .collect();
                let targets: Vec<NodeId> = result
                    .next_states
                    .into_iter()
                    .map(|next| kcfg.create_node(next))
                    .collect();
                log_into(node, result.logs);
                if guards.iter().all(|g| !g.is_empty()) {
                    kcfg.create_split(
                        node,
                        targets
                            .iter()
                            .cloned()
                            .zip(guards.into_iter().map(CSubst::from_constraints)),
                    )?;
                    info!(node = %node.short(), branches, "Found split");
                    Ok(Extension::Split { targets })
                } else {
                    kcfg.create_ndbranch(node, targets.clone(), result.rules)?;
                    info!(node = %node.short(), branches, "Found nondeterministic branch");
                    Ok(Extension::NdBranch { targets })
                }
            }
        }
    }
}

/// Constraints of `next` not already present in `base`.
fn extra_constraints(base: &CTerm, next: &CTerm) -> Vec<Term> {
    next.constraints()
        .iter()
        .filter(|c| !base.constraints().contains(c))
        .cloned()
        .collect()
}
