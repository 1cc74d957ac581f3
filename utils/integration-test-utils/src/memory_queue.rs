/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use async_trait::async_trait;
use queue_connector::{ConnectorError, QueueMessage, QueueSource};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;

const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Builds a Sidekiq job envelope around `args`.
pub fn sidekiq_job(queue: &str, jid: &str, args: Value) -> String {
    json!({
        "jid": jid,
        "class": "TestWorker",
        "queue": queue,
        "args": args,
        "enqueued_at": 1_700_000_000.0,
    })
    .to_string()
}

/// In-memory queue source with a short poll timeout.
pub struct MemoryQueue {
    pending: Mutex<HashMap<String, VecDeque<String>>>,
    acknowledged: Mutex<Vec<QueueMessage>>,
    pushed: Notify,
    poll_timeout: Duration,
}

impl Default for MemoryQueue {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_TIMEOUT)
    }
}

impl MemoryQueue {
    pub fn new(poll_timeout: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            acknowledged: Mutex::new(Vec::new()),
            pushed: Notify::new(),
            poll_timeout,
        }
    }

    pub async fn push(&self, queue: &str, raw: impl Into<String>) {
        self.pending
            .lock()
            .await
            .entry(queue.to_string())
            .or_default()
            .push_front(raw.into());
        self.pushed.notify_one();
    }

    pub async fn pending_len(&self, queue: &str) -> usize {
        self.pending
            .lock()
            .await
            .get(queue)
            .map_or(0, VecDeque::len)
    }

    pub async fn acknowledged(&self) -> Vec<QueueMessage> {
        self.acknowledged.lock().await.clone()
    }

    /// Waits until at least `count` messages have been acknowledged.
    pub async fn wait_for_acks(&self, count: usize, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, async {
            while self.acknowledged.lock().await.len() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .is_ok()
    }

    async fn pop(&self, queue: &str) -> Option<String> {
        self.pending
            .lock()
            .await
            .get_mut(queue)
            .and_then(VecDeque::pop_back)
    }
}

#[async_trait]
impl QueueSource for MemoryQueue {
    async fn fetch(&self, queue: &str) -> Result<Option<QueueMessage>, ConnectorError> {
        let deadline = Instant::now() + self.poll_timeout;
        loop {
            if let Some(raw) = self.pop(queue).await {
                return Ok(Some(QueueMessage::new(queue, raw)));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            tokio::select! {
                _ = self.pushed.notified() => {}
                _ = tokio::time::sleep_until(deadline) => {}
            }
        }
    }

    async fn acknowledge(&self, message: &QueueMessage) -> Result<(), ConnectorError> {
        self.acknowledged.lock().await.push(message.clone());
        Ok(())
    }
}
