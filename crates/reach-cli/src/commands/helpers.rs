// Shared helpers for command handlers: output format parsing, proof loading
// and rendering of derived proof facts.

use miette::IntoDiagnostic;
use serde::Serialize;

use reach_kcfg::NodeId;
use reach_proof::{LeafClass, Proof, ProofDir, ProofError, ProofStatus, Reachability};

use crate::types::OutputFormat;

pub(crate) fn parse_output_format(raw: &str) -> miette::Result<OutputFormat> {
    match raw {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(miette::miette!(
            "Unknown output format: {other}. Use 'text' or 'json'."
        )),
    }
}

pub(crate) fn load_proof(dir: &ProofDir, id: &str) -> miette::Result<Proof> {
    dir.read(id).into_diagnostic()
}

/// The reachability view of `proof`, rejecting refutation proofs.
pub(crate) fn reachability(proof: &Proof) -> miette::Result<&dyn Reachability> {
    proof.as_reachability().ok_or_else(|| not_reachability(proof))
}

pub(crate) fn reachability_mut(proof: &mut Proof) -> miette::Result<&mut dyn Reachability> {
    let kind = proof.kind();
    let id = proof.id().to_string();
    proof
        .as_reachability_mut()
        .ok_or_else(|| miette::miette!("Proof {id} is a {kind}, which has no proof graph"))
}

fn not_reachability(proof: &Proof) -> miette::Report {
    miette::miette!(
        "Proof {} is a {}, which has no proof graph",
        proof.id(),
        proof.kind()
    )
}

/// Resolve a node id, prefix or alias against the proof graph.
pub(crate) fn resolve_node(proof: &dyn Reachability, id_like: &str) -> miette::Result<NodeId> {
    proof.apr().kcfg.resolve(id_like).into_diagnostic()
}

/// Status label that stays printable when sub-proofs cannot be read.
pub(crate) fn status_name(status: Result<ProofStatus, ProofError>) -> String {
    match status {
        Ok(status) => status.to_string(),
        Err(err) => format!("UNKNOWN ({err})"),
    }
}

pub(crate) fn leaf_class_name(class: LeafClass) -> &'static str {
    match class {
        LeafClass::Init => "init",
        LeafClass::Target => "target",
        LeafClass::Refuted => "refuted",
        LeafClass::Terminal => "terminal",
        LeafClass::Bounded => "bounded",
        LeafClass::Stuck => "stuck",
        LeafClass::Pending => "pending",
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> miette::Result<()> {
    println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
    Ok(())
}
