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

//! Periodic topic map rebuild.

use crate::error::ConnectorError;
use crate::observability::events;
use crate::routing::{LookupBuilder, TopicMap};
use crate::sync_health::SyncHealth;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const COMPONENT: &str = "refresh_loop";

/// Sole writer of the topic map.
///
/// Each tick rebuilds the lookup from the gateway and syncs it. A failed
/// rebuild is logged and the previous generation stays in place.
#[derive(Clone)]
pub struct RefreshLoop {
    builder: LookupBuilder,
    topic_map: TopicMap,
    interval: Duration,
    health: Arc<Mutex<SyncHealth>>,
}

impl RefreshLoop {
    pub fn new(builder: LookupBuilder, topic_map: TopicMap, interval: Duration) -> Self {
        Self {
            builder,
            topic_map,
            interval,
            health: Arc::new(Mutex::new(SyncHealth::default())),
        }
    }

    pub async fn sync_health(&self) -> SyncHealth {
        self.health.lock().await.clone()
    }

    /// Runs one rebuild cycle and returns the version it published.
    pub async fn refresh_once(&self) -> Result<u64, ConnectorError> {
        let started = Instant::now();
        debug!(
            event = events::TOPIC_MAP_REBUILD_START,
            component = COMPONENT,
            snapshot_version = self.topic_map.version(),
            "rebuilding topic map"
        );

        match self.builder.build().await {
            Ok(lookup) => {
                let topic_count = lookup.len();
                let version = self.topic_map.sync(lookup);
                self.health
                    .lock()
                    .await
                    .record_success(SystemTime::now(), version);

                debug!(
                    event = events::TOPIC_MAP_REBUILD_OK,
                    component = COMPONENT,
                    snapshot_version = version,
                    topic_count,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "topic map rebuilt"
                );
                Ok(version)
            }
            Err(err) => {
                let mut health = self.health.lock().await;
                health.record_failure(SystemTime::now(), err.to_string());

                warn!(
                    event = events::TOPIC_MAP_REBUILD_FAILED,
                    component = COMPONENT,
                    snapshot_version = self.topic_map.version(),
                    consecutive_failures = health.consecutive_failures,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    err = %err,
                    "topic map rebuild failed; keeping previous mapping"
                );
                Err(err)
            }
        }
    }

    /// Rebuilds immediately and then once per interval until `cancel` fires.
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            event = events::REFRESH_LOOP_START,
            component = COMPONENT,
            interval_ms = self.interval.as_millis() as u64,
            "starting topic map refresh loop"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    // Failures are logged and recorded in sync health.
                    let _ = self.refresh_once().await;
                }
            }
        }

        info!(
            event = events::REFRESH_LOOP_STOP,
            component = COMPONENT,
            reason = crate::observability::fields::REASON_CANCELLED,
            "topic map refresh loop stopped"
        );
    }
}
