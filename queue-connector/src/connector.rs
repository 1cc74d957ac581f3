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

use crate::config::ConnectorConfig;
use crate::control_plane::refresh_loop::RefreshLoop;
use crate::data_plane::invoker::Invoker;
use crate::data_plane::queue_worker::QueueWorkerPool;
use crate::data_plane::response::ResponseSubscriber;
use crate::error::ConnectorError;
use crate::gateway::FunctionGateway;
use crate::observability::events;
use crate::queue::QueueSource;
use crate::routing::{LookupBuilder, TopicMap};
use crate::sync_health::SyncHealth;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const COMPONENT: &str = "connector";

/// Wires the refresh loop, the topic map, the invoker and the queue workers.
pub struct Connector {
    name: String,
    config: ConnectorConfig,
    topic_map: TopicMap,
    refresh_loop: RefreshLoop,
    invoker: Invoker,
}

impl Connector {
    pub fn new(name: &str, config: ConnectorConfig, gateway: Arc<dyn FunctionGateway>) -> Self {
        let topic_map = TopicMap::empty();
        let builder = LookupBuilder::new(gateway.clone(), config.topic_annotation.clone());
        let refresh_loop = RefreshLoop::new(builder, topic_map.clone(), config.rebuild_interval);
        let invoker = Invoker::new(gateway, topic_map.clone(), config.print_response);

        Self {
            name: name.to_string(),
            config,
            topic_map,
            refresh_loop,
            invoker,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Registers a subscriber for every invocation outcome.
    ///
    /// Subscribers must be registered before [`Connector::run`].
    pub fn subscribe_responses(&mut self, subscriber: Arc<dyn ResponseSubscriber>) {
        self.invoker.subscribe(subscriber);
    }

    pub fn topic_map(&self) -> TopicMap {
        self.topic_map.clone()
    }

    pub fn invoker(&self) -> &Invoker {
        &self.invoker
    }

    /// Runs one rebuild cycle outside the periodic loop.
    pub async fn refresh(&self) -> Result<u64, ConnectorError> {
        self.refresh_loop.refresh_once().await
    }

    pub async fn sync_health(&self) -> SyncHealth {
        self.refresh_loop.sync_health().await
    }

    /// Runs the refresh loop and the queue workers until `cancel` fires, then
    /// waits for all of them to finish.
    pub async fn run(self, source: Arc<dyn QueueSource>, cancel: CancellationToken) {
        info!(
            event = events::CONNECTOR_START,
            component = COMPONENT,
            name = self.name.as_str(),
            gateway_url = self.config.gateway_url.as_str(),
            queues = %self.config.queues.join(","),
            queue_concurrency = self.config.queue_concurrency,
            "starting connector"
        );

        let mut handles = vec![tokio::spawn(self.refresh_loop.clone().run(cancel.clone()))];

        let pool =
            QueueWorkerPool::new(self.invoker.clone(), source, self.config.queue_concurrency);
        handles.extend(pool.spawn(&self.config.queues, &cancel));

        for handle in handles {
            if let Err(err) = handle.await {
                warn!(
                    event = events::CONNECTOR_TASK_FAILED,
                    component = COMPONENT,
                    name = self.name.as_str(),
                    err = %err,
                    "connector task ended abnormally"
                );
            }
        }

        info!(
            event = events::CONNECTOR_STOP,
            component = COMPONENT,
            name = self.name.as_str(),
            "connector stopped"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::Connector;
    use crate::config::ConnectorConfig;
    use crate::error::{ConnectorError, InvocationError};
    use crate::gateway::{FunctionGateway, FunctionRecord, GatewayResponse};
    use crate::observability::events;
    use crate::queue::{QueueMessage, QueueSource};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    struct StaticGateway;

    #[async_trait]
    impl FunctionGateway for StaticGateway {
        async fn list_functions(&self) -> Result<Vec<FunctionRecord>, ConnectorError> {
            Ok(vec![
                FunctionRecord::new("billing").with_annotation("topic", "orders_created"),
                FunctionRecord::new("audit").with_annotation("subscribes", "orders_created"),
            ])
        }

        async fn invoke_function(
            &self,
            _function: &str,
            _topic: &str,
            _payload: Bytes,
        ) -> Result<GatewayResponse, InvocationError> {
            Ok(GatewayResponse {
                status: 202,
                body: Bytes::new(),
            })
        }
    }

    struct PanickingQueue;

    #[async_trait]
    impl QueueSource for PanickingQueue {
        async fn fetch(&self, _queue: &str) -> Result<Option<QueueMessage>, ConnectorError> {
            panic!("queue backend blew up");
        }

        async fn acknowledge(&self, _message: &QueueMessage) -> Result<(), ConnectorError> {
            Ok(())
        }
    }

    fn config() -> ConnectorConfig {
        ConnectorConfig {
            queues: vec!["orders_created".to_string()],
            ..ConnectorConfig::default()
        }
    }

    #[tokio::test]
    async fn refresh_populates_topic_map_and_health() {
        let connector = Connector::new("test", config(), Arc::new(StaticGateway));
        assert_eq!(connector.name(), "test");
        assert!(!connector.sync_health().await.has_synced());

        assert_eq!(connector.refresh().await, Ok(1));

        assert_eq!(
            connector.topic_map().lookup("orders_created"),
            BTreeSet::from(["billing".to_string()])
        );
        assert_eq!(connector.sync_health().await.topic_map_version, 1);
    }

    #[tokio::test]
    async fn topic_annotation_key_is_configurable() {
        let config = ConnectorConfig {
            topic_annotation: "subscribes".to_string(),
            ..config()
        };
        let connector = Connector::new("test", config, Arc::new(StaticGateway));

        connector.refresh().await.expect("refresh succeeds");

        assert_eq!(
            connector.topic_map().lookup("orders_created"),
            BTreeSet::from(["audit".to_string()])
        );
    }

    #[tokio::test]
    async fn run_survives_panicked_worker_tasks() {
        let config = ConnectorConfig {
            queue_concurrency: 2,
            ..config()
        };
        let connector = Connector::new("test", config, Arc::new(StaticGateway));
        let cancel = CancellationToken::new();
        let run = tokio::spawn(connector.run(Arc::new(PanickingQueue), cancel.clone()));

        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();

        tokio::time::timeout(Duration::from_secs(5), run)
            .await
            .expect("run should return after cancellation")
            .expect("run itself should not panic");
    }

    #[test]
    fn task_failure_is_logged_apart_from_shutdown() {
        assert_ne!(events::CONNECTOR_TASK_FAILED, events::CONNECTOR_STOP);
    }
}
