// Command handlers for: List, Show, Status, Leaves
//
// Read-only views of a proof directory. Status is always derived from the
// stored graph and sub-proofs, never read from the record.

use miette::IntoDiagnostic;
use serde_json::json;

use reach_proof::ProofDir;

use super::helpers::{leaf_class_name, load_proof, print_json, reachability, status_name};
use crate::types::{LeafReport, OutputFormat, ProofListing};

pub(crate) fn run_list_command(dir: &ProofDir, format: OutputFormat) -> miette::Result<()> {
    let mut listings = Vec::new();
    for id in dir.list().into_diagnostic()? {
        let proof = load_proof(dir, &id)?;
        listings.push(ProofListing {
            kind: proof.kind().to_string(),
            status: status_name(proof.status()),
            id,
        });
    }
    match format {
        OutputFormat::Json => print_json(&listings)?,
        OutputFormat::Text => {
            if listings.is_empty() {
                println!("No proofs in {}", dir.root().display());
            }
            for listing in &listings {
                println!("{}\t{}\t{}", listing.id, listing.kind, listing.status);
            }
        }
    }
    Ok(())
}

pub(crate) fn run_show_command(dir: &ProofDir, id: &str, format: OutputFormat) -> miette::Result<()> {
    let proof = load_proof(dir, id)?;
    let summary = proof.summary().into_diagnostic()?;
    match format {
        OutputFormat::Json => print_json(&json!({
            "id": proof.id(),
            "type": proof.kind(),
            "status": status_name(proof.status()),
            "admitted": proof.meta().admitted,
            "subproofs": proof.meta().subproof_ids(),
            "summary": summary,
        }))?,
        OutputFormat::Text => {
            for line in summary {
                println!("{line}");
            }
        }
    }
    Ok(())
}

pub(crate) fn run_status_command(dir: &ProofDir, id: &str, format: OutputFormat) -> miette::Result<()> {
    let proof = load_proof(dir, id)?;
    let status = proof.status().into_diagnostic()?;
    match format {
        OutputFormat::Json => print_json(&json!({ "id": proof.id(), "status": status }))?,
        OutputFormat::Text => println!("{status}"),
    }
    Ok(())
}

pub(crate) fn run_leaves_command(dir: &ProofDir, id: &str, format: OutputFormat) -> miette::Result<()> {
    let proof = load_proof(dir, id)?;
    let proof = reachability(&proof)?;
    let apr = proof.apr();
    let refutations: std::collections::HashMap<_, _> = apr.node_refutations().collect();
    let leaves: Vec<LeafReport> = apr
        .kcfg
        .leaves()
        .into_iter()
        .filter_map(|node| {
            let class = proof.classify(&node.id)?;
            Some(LeafReport {
                id: node.id.to_string(),
                short: node.id.short().to_string(),
                class: leaf_class_name(class).to_string(),
                refutation: refutations.get(&node.id).map(|r| r.to_string()),
            })
        })
        .collect();
    match format {
        OutputFormat::Json => print_json(&leaves)?,
        OutputFormat::Text => {
            for leaf in &leaves {
                match &leaf.refutation {
                    Some(refutation) => println!("{}\t{}\t{refutation}", leaf.short, leaf.class),
                    None => println!("{}\t{}", leaf.short, leaf.class),
                }
            }
        }
    }
    Ok(())
}
