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
use queue_connector::{InvocationResult, ResponseSubscriber};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Response subscriber that keeps every outcome it is handed.
#[derive(Clone, Default)]
pub struct RecordingSubscriber {
    results: Arc<Mutex<Vec<InvocationResult>>>,
}

impl RecordingSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn results(&self) -> Vec<InvocationResult> {
        self.results.lock().await.clone()
    }

    /// Waits until at least `count` outcomes were recorded.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, async {
            while self.results.lock().await.len() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .is_ok()
    }
}

#[async_trait]
impl ResponseSubscriber for RecordingSubscriber {
    async fn on_response(&self, result: &InvocationResult) {
        self.results.lock().await.push(result.clone());
    }
}
