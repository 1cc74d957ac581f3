//! Queue backend layer.
//!
//! [`QueueSource`] is the seam the worker pool consumes; [`RedisQueue`] reads
//! Sidekiq-style Redis lists with a reliable in-progress list per queue.

mod job;
mod redis_queue;

pub use job::SidekiqJob;
pub use redis_queue::RedisQueue;

use crate::error::ConnectorError;
use async_trait::async_trait;

/// One raw entry fetched from a queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueMessage {
    pub queue: String,
    pub raw: String,
}

impl QueueMessage {
    pub fn new(queue: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            queue: queue.into(),
            raw: raw.into(),
        }
    }
}

/// Source of queue messages for the worker pool.
#[async_trait]
pub trait QueueSource: Send + Sync {
    /// Waits up to the source's poll timeout for the next message of `queue`.
    ///
    /// `Ok(None)` means the wait expired without a message.
    async fn fetch(&self, queue: &str) -> Result<Option<QueueMessage>, ConnectorError>;

    /// Marks `message` as processed so it is not delivered again.
    async fn acknowledge(&self, message: &QueueMessage) -> Result<(), ConnectorError>;
}
