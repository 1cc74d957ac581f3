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

//! Redis list queue in the Sidekiq layout.

use crate::config::ConnectorConfig;
use crate::error::ConnectorError;
use crate::observability::events;
use crate::queue::{QueueMessage, QueueSource};
use async_trait::async_trait;
use deadpool_redis::redis;
use deadpool_redis::{Config, Connection, Pool, PoolConfig, Runtime};
use std::time::Duration;
use tracing::info;

const COMPONENT: &str = "redis_queue";

/// Reliable Redis queue.
///
/// A fetch atomically moves the entry from the pending list into a
/// per-process in-progress list; acknowledging removes it from there. Entries
/// left in the in-progress list by a crashed process are moved back to the
/// pending list by [`RedisQueue::recover`].
#[derive(Clone)]
pub struct RedisQueue {
    pool: Pool,
    key_prefix: String,
    process_id: String,
    poll_timeout: Duration,
}

impl RedisQueue {
    /// Builds the connection pool and checks the server answers `PING`.
    ///
    /// A non-empty `namespace` is joined to the keys with `:`, so `shop` and
    /// `shop:` both give `shop:queue:<name>`.
    pub async fn connect(
        url: &str,
        pool_size: usize,
        namespace: &str,
        process_id: &str,
        poll_timeout: Duration,
    ) -> Result<Self, ConnectorError> {
        let mut cfg = Config::from_url(url);
        cfg.pool = Some(PoolConfig::new(pool_size));
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| ConnectorError::Queue(format!("unable to create redis pool: {e}")))?;

        let queue = Self {
            pool,
            key_prefix: key_prefix(namespace),
            process_id: process_id.to_string(),
            poll_timeout,
        };

        let mut conn = queue.connection().await?;
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| ConnectorError::Queue(format!("redis PING failed: {e}")))?;

        info!(
            event = events::QUEUE_BACKEND_READY,
            component = COMPONENT,
            pool_size,
            namespace,
            "connected to redis"
        );
        Ok(queue)
    }

    pub async fn from_config(config: &ConnectorConfig) -> Result<Self, ConnectorError> {
        Self::connect(
            &config.redis_url(),
            config.redis_pool_size,
            &config.queue_namespace,
            &config.queue_process_id,
            config.queue_poll_timeout,
        )
        .await
    }

    pub fn pending_key(&self, queue: &str) -> String {
        pending_key(&self.key_prefix, queue)
    }

    pub fn in_progress_key(&self, queue: &str) -> String {
        in_progress_key(&self.key_prefix, queue, &self.process_id)
    }

    /// Moves every entry left in the in-progress list of `queue` back to its
    /// pending list and returns how many were moved.
    pub async fn recover(&self, queue: &str) -> Result<usize, ConnectorError> {
        let pending = self.pending_key(queue);
        let in_progress = self.in_progress_key(queue);
        let mut conn = self.connection().await?;

        let mut recovered = 0usize;
        loop {
            let moved: Option<String> = redis::cmd("RPOPLPUSH")
                .arg(&in_progress)
                .arg(&pending)
                .query_async(&mut conn)
                .await
                .map_err(|e| ConnectorError::Queue(format!("RPOPLPUSH {in_progress}: {e}")))?;
            if moved.is_none() {
                break;
            }
            recovered += 1;
        }

        if recovered > 0 {
            info!(
                event = events::QUEUE_RECOVERED,
                component = COMPONENT,
                queue,
                recovered,
                "requeued unacknowledged messages"
            );
        }
        Ok(recovered)
    }

    async fn connection(&self) -> Result<Connection, ConnectorError> {
        self.pool
            .get()
            .await
            .map_err(|e| ConnectorError::Queue(format!("unable to get redis connection: {e}")))
    }
}

#[async_trait]
impl QueueSource for RedisQueue {
    async fn fetch(&self, queue: &str) -> Result<Option<QueueMessage>, ConnectorError> {
        let pending = self.pending_key(queue);
        let in_progress = self.in_progress_key(queue);
        let mut conn = self.connection().await?;

        // BRPOPLPUSH treats 0 as "block forever".
        let timeout_secs = self.poll_timeout.as_secs().max(1);
        let raw: Option<String> = redis::cmd("BRPOPLPUSH")
            .arg(&pending)
            .arg(&in_progress)
            .arg(timeout_secs)
            .query_async(&mut conn)
            .await
            .map_err(|e| ConnectorError::Queue(format!("BRPOPLPUSH {pending}: {e}")))?;

        Ok(raw.map(|raw| QueueMessage::new(queue, raw)))
    }

    async fn acknowledge(&self, message: &QueueMessage) -> Result<(), ConnectorError> {
        let in_progress = self.in_progress_key(&message.queue);
        let mut conn = self.connection().await?;

        let _: i64 = redis::cmd("LREM")
            .arg(&in_progress)
            .arg(-1)
            .arg(&message.raw)
            .query_async(&mut conn)
            .await
            .map_err(|e| ConnectorError::Queue(format!("LREM {in_progress}: {e}")))?;
        Ok(())
    }
}

fn key_prefix(namespace: &str) -> String {
    match namespace.trim_end_matches(':') {
        "" => String::new(),
        trimmed => format!("{trimmed}:"),
    }
}

fn pending_key(prefix: &str, queue: &str) -> String {
    format!("{prefix}queue:{queue}")
}

fn in_progress_key(prefix: &str, queue: &str, process_id: &str) -> String {
    format!("{prefix}queue:{queue}:{process_id}:inprogress")
}
