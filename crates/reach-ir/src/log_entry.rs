use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::subst::Subst;

/// A record emitted by the rewrite backend while stepping a state.
///
/// Only the rule identity and substitution are interpreted; any other field
/// the backend sends is carried through serialization untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub origin: String,
    #[serde(default, rename = "rule-id", skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substitution: Option<Subst>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl LogEntry {
    pub fn rewrite(origin: impl Into<String>, rule_id: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            rule_id: Some(rule_id.into()),
            substitution: None,
            extra: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_backend_fields_survive_a_round_trip() {
        let json = serde_json::json!({
            "origin": "kore-rpc",
            "rule-id": "LOOP.step",
            "result": {"tag": "success"}
        });
        let entry: LogEntry = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(entry.rule_id.as_deref(), Some("LOOP.step"));
        assert!(entry.extra.contains_key("result"));
        assert_eq!(serde_json::to_value(&entry).unwrap(), json);
    }
}
