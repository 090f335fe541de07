//! Shared types used across CLI commands.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// One row of `reach list`.
#[derive(Debug, Serialize)]
pub(crate) struct ProofListing {
    pub(crate) id: String,
    #[serde(rename = "type")]
    pub(crate) kind: String,
    pub(crate) status: String,
}

/// One row of `reach leaves`.
#[derive(Debug, Serialize)]
pub(crate) struct LeafReport {
    pub(crate) id: String,
    #[serde(skip)]
    pub(crate) short: String,
    pub(crate) class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) refutation: Option<String>,
}
