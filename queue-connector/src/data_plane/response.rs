//! Invocation outcomes and the subscriber capability that receives them.

use crate::error::InvocationError;
use crate::observability::{events, fields};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use tracing::{info, warn};

const COMPONENT: &str = "response_log";

/// Outcome of one function invocation for one message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvocationResult {
    pub function: String,
    pub topic: String,
    /// HTTP status, absent when no response was received.
    pub status: Option<u16>,
    pub body: Bytes,
    pub error: Option<InvocationError>,
    pub duration: Duration,
}

impl InvocationResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Receives every invocation outcome exactly once.
#[async_trait]
pub trait ResponseSubscriber: Send + Sync {
    async fn on_response(&self, result: &InvocationResult);
}

/// Writes one structured log line per invocation outcome.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogResponseSubscriber;

#[async_trait]
impl ResponseSubscriber for LogResponseSubscriber {
    async fn on_response(&self, result: &InvocationResult) {
        let status = fields::format_status(result.status);
        let duration_ms = result.duration.as_millis() as u64;

        match &result.error {
            None => info!(
                event = events::INVOKE_OK,
                component = COMPONENT,
                function = result.function.as_str(),
                topic = result.topic.as_str(),
                status = status.as_str(),
                elapsed_ms = duration_ms,
                body_len = result.body.len(),
                "function invoked"
            ),
            Some(err) => warn!(
                event = events::INVOKE_FAILED,
                component = COMPONENT,
                function = result.function.as_str(),
                topic = result.topic.as_str(),
                status = status.as_str(),
                elapsed_ms = duration_ms,
                body = %fields::format_body_preview(&result.body),
                err = %err,
                "function invocation failed"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InvocationResult, LogResponseSubscriber, ResponseSubscriber};
    use crate::error::InvocationError;
    use bytes::Bytes;
    use std::time::Duration;

    fn result(error: Option<InvocationError>) -> InvocationResult {
        InvocationResult {
            function: "billing".to_string(),
            topic: "orders_created".to_string(),
            status: error.is_none().then_some(200),
            body: Bytes::from_static(b"ok"),
            error,
            duration: Duration::from_millis(12),
        }
    }

    #[test]
    fn success_means_no_error() {
        assert!(result(None).is_success());
        assert!(!result(Some(InvocationError::Timeout)).is_success());
    }

    #[tokio::test]
    async fn log_subscriber_accepts_both_outcomes() {
        let subscriber = LogResponseSubscriber;
        subscriber.on_response(&result(None)).await;
        subscriber
            .on_response(&result(Some(InvocationError::Status(500))))
            .await;
    }
}
