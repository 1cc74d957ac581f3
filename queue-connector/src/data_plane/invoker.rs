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

//! Fans one message out to every function subscribed to its topic.

use crate::data_plane::response::{InvocationResult, ResponseSubscriber};
use crate::error::InvocationError;
use crate::gateway::FunctionGateway;
use crate::observability::events;
use crate::routing::TopicMap;
use bytes::Bytes;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

const COMPONENT: &str = "invoker";

/// Invokes gateway functions for a topic and reports every outcome.
///
/// Cheap to clone; clones share the gateway client, the topic map handle and
/// the subscriber list as it was when the clone was taken.
#[derive(Clone)]
pub struct Invoker {
    gateway: Arc<dyn FunctionGateway>,
    topic_map: TopicMap,
    print_response: bool,
    subscribers: Vec<Arc<dyn ResponseSubscriber>>,
}

impl Invoker {
    pub fn new(
        gateway: Arc<dyn FunctionGateway>,
        topic_map: TopicMap,
        print_response: bool,
    ) -> Self {
        Self {
            gateway,
            topic_map,
            print_response,
            subscribers: Vec::new(),
        }
    }

    /// Registers a subscriber that receives every later invocation outcome.
    pub fn subscribe(&mut self, subscriber: Arc<dyn ResponseSubscriber>) {
        self.subscribers.push(subscriber);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Invokes every function subscribed to `topic` with `payload`.
    ///
    /// Invocations run concurrently. A failure of one function never stops
    /// the others; each outcome is reported to every subscriber as soon as it
    /// completes and all of them are returned. An unknown topic is a no-op.
    pub async fn invoke(&self, topic: &str, payload: Bytes) -> Vec<InvocationResult> {
        let (snapshot_version, functions) = self.topic_map.lookup_with_version(topic);

        if functions.is_empty() {
            debug!(
                event = events::INVOKE_NO_SUBSCRIBERS,
                component = COMPONENT,
                topic,
                snapshot_version,
                "no functions to invoke"
            );
            return Vec::new();
        }

        debug!(
            event = events::INVOKE_DISPATCH,
            component = COMPONENT,
            topic,
            snapshot_version,
            function_count = functions.len(),
            "dispatching invocations"
        );

        let attempts = functions
            .iter()
            .map(|function| self.invoke_one(function, topic, payload.clone()));
        join_all(attempts).await
    }

    async fn invoke_one(&self, function: &str, topic: &str, payload: Bytes) -> InvocationResult {
        let started = Instant::now();
        let outcome = self.gateway.invoke_function(function, topic, payload).await;
        let duration = started.elapsed();

        let result = match outcome {
            Ok(response) => {
                let status = response.status;
                let error = (!response.is_success()).then_some(InvocationError::Status(status));
                InvocationResult {
                    function: function.to_string(),
                    topic: topic.to_string(),
                    status: Some(status),
                    body: response.body,
                    error,
                    duration,
                }
            }
            Err(error) => InvocationResult {
                function: function.to_string(),
                topic: topic.to_string(),
                status: None,
                body: Bytes::new(),
                error: Some(error),
                duration,
            },
        };

        if self.print_response && result.status.is_some() {
            info!(
                event = events::INVOKE_RESPONSE_BODY,
                component = COMPONENT,
                function,
                topic,
                body = %String::from_utf8_lossy(&result.body),
                "function response"
            );
        }

        for subscriber in &self.subscribers {
            subscriber.on_response(&result).await;
        }

        result
    }
}
