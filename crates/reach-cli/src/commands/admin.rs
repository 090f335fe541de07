// Command handlers for: Admit, Unadmit, RemoveTerminal, RemoveBounded, Refute,
// Unrefute
//
// Each handler loads the proof, edits it and writes it back to the same
// proof directory. Handlers that find nothing to undo leave the record as is.

use miette::IntoDiagnostic;
use serde_json::json;
use tracing::info;

use reach_proof::{Proof, ProofDir, Reachability};

use super::helpers::{load_proof, print_json, reachability_mut, resolve_node};
use crate::types::OutputFormat;

pub(crate) fn run_admit_command(dir: &ProofDir, id: &str, admitted: bool) -> miette::Result<()> {
    let mut proof = load_proof(dir, id)?;
    if proof.meta().admitted == admitted {
        println!("{id}: admitted is already {admitted}");
        return Ok(());
    }
    proof.meta_mut().admitted = admitted;
    proof.write_proof().into_diagnostic()?;
    info!(proof = id, admitted, "Updated admission");
    println!("{id}: admitted = {admitted}");
    Ok(())
}

pub(crate) fn run_remove_terminal_command(dir: &ProofDir, id: &str, node: &str) -> miette::Result<()> {
    let mut proof = load_proof(dir, id)?;
    let reach = reachability_mut(&mut proof)?;
    let node = resolve_node(reach, node)?;
    if reach.apr_mut().remove_terminal(node.as_str()).into_diagnostic()? {
        reach.write_proof().into_diagnostic()?;
        info!(proof = id, node = %node.short(), "Removed terminal mark");
        println!("Removed terminal mark from {}", node.short());
    } else {
        println!("Node {} is not marked terminal", node.short());
    }
    Ok(())
}

pub(crate) fn run_remove_bounded_command(dir: &ProofDir, id: &str, node: &str) -> miette::Result<()> {
    let proof = load_proof(dir, id)?;
    let kind = proof.kind();
    let Proof::AprBmc(mut bmc) = proof else {
        return Err(miette::miette!(
            "Proof {id} is a {kind}; only APRBMCProof records bounded nodes"
        ));
    };
    let node = resolve_node(&bmc, node)?;
    if bmc.remove_bounded(node.as_str()).into_diagnostic()? {
        bmc.write_proof().into_diagnostic()?;
        info!(proof = id, node = %node.short(), "Removed bounded mark");
        println!("Removed bounded mark from {}", node.short());
    } else {
        println!("Node {} is not marked bounded", node.short());
    }
    Ok(())
}

pub(crate) fn run_refute_command(
    dir: &ProofDir,
    id: &str,
    node: &str,
    format: OutputFormat,
) -> miette::Result<()> {
    let mut proof = load_proof(dir, id)?;
    let reach = reachability_mut(&mut proof)?;
    let node = resolve_node(reach, node)?;
    let refutation =
        reach_engine::construct_node_refutation(reach.apr(), &node).into_diagnostic()?;
    refutation.write_proof().into_diagnostic()?;
    reach
        .apr_mut()
        .add_refutation(&node, refutation.clone())
        .into_diagnostic()?;
    reach.write_proof().into_diagnostic()?;
    info!(proof = id, node = %node.short(), refutation = refutation.id(), "Refuted node");

    match format {
        OutputFormat::Json => print_json(&json!({
            "node": node,
            "refutation": refutation.id(),
            "pre_constraints": refutation
                .pre_constraints
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>(),
            "last_constraint": refutation.last_constraint.to_string(),
        }))?,
        OutputFormat::Text => {
            println!("{}", refutation.id());
            println!("    assuming: {}", refutation.last_constraint);
        }
    }
    Ok(())
}

pub(crate) fn run_unrefute_command(dir: &ProofDir, id: &str, node: &str) -> miette::Result<()> {
    let mut proof = load_proof(dir, id)?;
    let reach = reachability_mut(&mut proof)?;
    let node = resolve_node(reach, node)?;
    if reach.apr_mut().remove_refutation(&node) {
        reach.write_proof().into_diagnostic()?;
        info!(proof = id, node = %node.short(), "Disabled refutation of node");
        println!("Removed refutation of {}", node.short());
    } else {
        println!("Node {} has no refutation", node.short());
    }
    Ok(())
}
