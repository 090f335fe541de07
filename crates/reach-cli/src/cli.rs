//! CLI argument definitions: top-level `Cli` struct and `Commands` enum.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub(crate) const CLI_LONG_ABOUT: &str =
    "Inspect and administer persisted all-path reachability proofs.\n\n\
    Typical session:\n  \
    1. reach --proof-dir proofs list\n  \
    2. reach --proof-dir proofs show my-claim\n  \
    3. reach --proof-dir proofs leaves my-claim\n\n\
    Nodes are named by full id, unique id prefix, or alias (init, target).";

#[derive(Parser)]
#[command(name = "reach")]
#[command(about = "Inspect and administer persisted reachability proofs")]
#[command(long_about = CLI_LONG_ABOUT)]
#[command(version)]
pub(crate) struct Cli {
    /// Directory holding persisted proofs
    #[arg(long, global = true, default_value = ".")]
    pub(crate) proof_dir: PathBuf,

    /// Output format: text | json
    #[arg(long, global = true, default_value = "text")]
    pub(crate) format: String,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List stored proofs with their status
    List,

    /// Print the summary of a proof and its sub-proofs
    Show {
        /// Proof id
        id: String,
    },

    /// Print the derived status of a proof
    Status {
        /// Proof id
        id: String,
    },

    /// Classify every leaf of a reachability proof
    Leaves {
        /// Proof id
        id: String,
    },

    /// Accept a proof without verification
    Admit {
        /// Proof id
        id: String,
    },

    /// Withdraw an earlier admission
    Unadmit {
        /// Proof id
        id: String,
    },

    /// Unmark a node as terminal
    RemoveTerminal {
        /// Proof id
        id: String,
        /// Node id, id prefix or alias
        node: String,
    },

    /// Unmark a node as bounded (bounded model checking proofs only)
    RemoveBounded {
        /// Proof id
        id: String,
        /// Node id, id prefix or alias
        node: String,
    },

    /// Attach an infeasibility sub-proof to a branch leaf
    Refute {
        /// Proof id
        id: String,
        /// Node id, id prefix or alias
        node: String,
    },

    /// Detach the infeasibility sub-proof of a node
    Unrefute {
        /// Proof id
        id: String,
        /// Node id, id prefix or alias
        node: String,
    },
}
