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
use bytes::Bytes;
use queue_connector::{
    ConnectorError, FunctionGateway, FunctionRecord, GatewayResponse, InvocationError,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedInvocation {
    pub function: String,
    pub topic: String,
    pub payload: Bytes,
}

/// In-memory gateway with a settable listing and scripted invocation outcomes.
///
/// Functions without a scripted outcome answer `200` with an empty body.
#[derive(Default)]
pub struct FakeGateway {
    functions: Mutex<Vec<FunctionRecord>>,
    listing_error: Mutex<Option<ConnectorError>>,
    outcomes: Mutex<HashMap<String, Result<GatewayResponse, InvocationError>>>,
    invocations: Mutex<Vec<RecordedInvocation>>,
    list_calls: AtomicUsize,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a function annotated with `topic = topics` to the listing.
    pub async fn add_function(&self, name: &str, topics: &str) {
        self.functions
            .lock()
            .await
            .push(FunctionRecord::new(name).with_annotation("topic", topics));
    }

    pub async fn set_functions(&self, functions: Vec<FunctionRecord>) {
        *self.functions.lock().await = functions;
    }

    /// Makes every listing call fail with `error` until cleared with `None`.
    pub async fn fail_listing(&self, error: Option<ConnectorError>) {
        *self.listing_error.lock().await = error;
    }

    pub async fn respond_with(
        &self,
        function: &str,
        outcome: Result<GatewayResponse, InvocationError>,
    ) {
        self.outcomes
            .lock()
            .await
            .insert(function.to_string(), outcome);
    }

    pub async fn invocations(&self) -> Vec<RecordedInvocation> {
        self.invocations.lock().await.clone()
    }

    pub async fn invocations_of(&self, function: &str) -> Vec<RecordedInvocation> {
        self.invocations
            .lock()
            .await
            .iter()
            .filter(|invocation| invocation.function == function)
            .cloned()
            .collect()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FunctionGateway for FakeGateway {
    async fn list_functions(&self) -> Result<Vec<FunctionRecord>, ConnectorError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.listing_error.lock().await.clone() {
            debug!("FakeGateway: failing listing with {error}");
            return Err(error);
        }
        Ok(self.functions.lock().await.clone())
    }

    async fn invoke_function(
        &self,
        function: &str,
        topic: &str,
        payload: Bytes,
    ) -> Result<GatewayResponse, InvocationError> {
        debug!("FakeGateway: invoking {function} for {topic}");
        self.invocations.lock().await.push(RecordedInvocation {
            function: function.to_string(),
            topic: topic.to_string(),
            payload,
        });

        self.outcomes
            .lock()
            .await
            .get(function)
            .cloned()
            .unwrap_or(Ok(GatewayResponse {
                status: 200,
                body: Bytes::new(),
            }))
    }
}
