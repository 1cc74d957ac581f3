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

//! Per-queue worker tasks that feed queue messages into the invoker.

use crate::data_plane::invoker::Invoker;
use crate::observability::{
    events,
    fields::{self, WorkerContext},
};
use crate::queue::{QueueMessage, QueueSource, SidekiqJob};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

const COMPONENT: &str = "queue_worker";
const DEFAULT_FETCH_BACKOFF: Duration = Duration::from_secs(1);

/// Spawns `concurrency` workers per queue over one shared queue source.
pub(crate) struct QueueWorkerPool {
    invoker: Invoker,
    source: Arc<dyn QueueSource>,
    concurrency: usize,
    fetch_backoff: Duration,
}

impl QueueWorkerPool {
    pub(crate) fn new(invoker: Invoker, source: Arc<dyn QueueSource>, concurrency: usize) -> Self {
        Self {
            invoker,
            source,
            concurrency: concurrency.max(1),
            fetch_backoff: DEFAULT_FETCH_BACKOFF,
        }
    }

    #[cfg(test)]
    fn with_fetch_backoff(mut self, fetch_backoff: Duration) -> Self {
        self.fetch_backoff = fetch_backoff;
        self
    }

    /// Starts the workers for every queue; they stop once `cancel` fires.
    pub(crate) fn spawn(
        &self,
        queues: &[String],
        cancel: &CancellationToken,
    ) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::with_capacity(queues.len() * self.concurrency);

        for queue in queues {
            for _ in 0..self.concurrency {
                let worker = QueueWorker {
                    worker_id: Uuid::new_v4().to_string(),
                    queue: queue.clone(),
                    invoker: self.invoker.clone(),
                    source: self.source.clone(),
                    fetch_backoff: self.fetch_backoff,
                };
                handles.push(tokio::spawn(worker.run(cancel.clone())));
            }
        }

        handles
    }
}

struct QueueWorker {
    worker_id: String,
    queue: String,
    invoker: Invoker,
    source: Arc<dyn QueueSource>,
    fetch_backoff: Duration,
}

impl QueueWorker {
    async fn run(self, cancel: CancellationToken) {
        let worker_context = WorkerContext::with_current_thread(self.worker_id.clone());

        debug!(
            event = events::QUEUE_WORKER_START,
            component = COMPONENT,
            worker_id = worker_context.worker_id.as_str(),
            worker_thread = worker_context.worker_thread.as_str(),
            queue = self.queue.as_str(),
            "queue worker started"
        );

        loop {
            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                fetched = self.source.fetch(&self.queue) => fetched,
            };

            match fetched {
                Ok(Some(message)) => self.handle(&worker_context, message).await,
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        event = events::QUEUE_FETCH_FAILED,
                        component = COMPONENT,
                        worker_id = worker_context.worker_id.as_str(),
                        queue = self.queue.as_str(),
                        backoff_ms = self.fetch_backoff.as_millis() as u64,
                        err = %err,
                        "queue fetch failed; backing off"
                    );
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(self.fetch_backoff) => {}
                    }
                }
            }
        }

        info!(
            event = events::QUEUE_WORKER_STOP,
            component = COMPONENT,
            worker_id = worker_context.worker_id.as_str(),
            worker_thread = worker_context.worker_thread.as_str(),
            queue = self.queue.as_str(),
            reason = fields::REASON_CANCELLED,
            "queue worker stopped"
        );
    }

    async fn handle(&self, worker_context: &WorkerContext, message: QueueMessage) {
        match SidekiqJob::decode(&message.raw).and_then(|job| Ok((job.payload()?, job))) {
            Ok((payload, job)) => {
                debug!(
                    event = events::QUEUE_MESSAGE_RECEIVED,
                    component = COMPONENT,
                    worker_id = worker_context.worker_id.as_str(),
                    queue = self.queue.as_str(),
                    jid = %fields::format_optional(job.jid.as_deref()),
                    "processing job"
                );
                self.invoker.invoke(&self.queue, payload).await;
            }
            Err(err) => {
                warn!(
                    event = events::QUEUE_MESSAGE_DECODE_FAILED,
                    component = COMPONENT,
                    worker_id = worker_context.worker_id.as_str(),
                    queue = self.queue.as_str(),
                    err = %err,
                    "dropping undecodable message"
                );
            }
        }

        if let Err(err) = self.source.acknowledge(&message).await {
            warn!(
                event = events::QUEUE_ACK_FAILED,
                component = COMPONENT,
                worker_id = worker_context.worker_id.as_str(),
                queue = self.queue.as_str(),
                err = %err,
                "unable to acknowledge message"
            );
        }
    }
}
