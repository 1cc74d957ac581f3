//! Sidekiq job envelope.

use crate::error::ConnectorError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decoded Sidekiq job as pushed onto a `queue:<name>` list.
///
/// Only `args` is required; unknown keys are kept in `extra`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SidekiqJob {
    #[serde(default)]
    pub jid: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub queue: Option<String>,
    pub args: Value,
    #[serde(default)]
    pub enqueued_at: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl SidekiqJob {
    /// Parses one raw queue entry.
    pub fn decode(raw: &str) -> Result<Self, ConnectorError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| ConnectorError::MessageDecoding(format!("invalid JSON: {e}")))?;

        if !value.is_object() {
            return Err(ConnectorError::MessageDecoding(
                "job envelope is not a JSON object".to_string(),
            ));
        }

        serde_json::from_value(value)
            .map_err(|e| ConnectorError::MessageDecoding(format!("invalid job envelope: {e}")))
    }

    /// Invocation body: the JSON serialisation of `args`.
    pub fn payload(&self) -> Result<Bytes, ConnectorError> {
        serde_json::to_vec(&self.args)
            .map(Bytes::from)
            .map_err(|e| ConnectorError::MessageDecoding(format!("unable to encode args: {e}")))
    }
}
