//! Gateway client layer.
//!
//! The gateway lists deployed functions with their annotations and invokes a
//! function by name. [`FunctionGateway`] is the seam the rest of the crate
//! talks to; [`HttpGateway`] is the HTTP implementation.

mod http_gateway;
pub use http_gateway::HttpGateway;

use crate::error::{ConnectorError, InvocationError};
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry of the gateway's function listing.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct FunctionRecord {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_annotations")]
    pub annotations: HashMap<String, String>,
}

impl FunctionRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: HashMap::new(),
        }
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }
}

// The gateway reports `"annotations": null` for functions deployed without any.
fn deserialize_annotations<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<HashMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw response of one function invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: Bytes,
}

impl GatewayResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Gateway capability used by the lookup builder and the invoker.
#[async_trait]
pub trait FunctionGateway: Send + Sync {
    /// Lists every deployed function together with its annotations.
    async fn list_functions(&self) -> Result<Vec<FunctionRecord>, ConnectorError>;

    /// Invokes `function` with `payload` as body.
    ///
    /// Any HTTP status is returned as `Ok`; only failures to obtain a response
    /// (transport error, timeout) are errors.
    async fn invoke_function(
        &self,
        function: &str,
        topic: &str,
        payload: Bytes,
    ) -> Result<GatewayResponse, InvocationError>;
}
