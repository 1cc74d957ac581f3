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

//! HTTP implementation of the gateway seam.

use crate::config::{ConnectorConfig, GatewayCredentials};
use crate::error::{ConnectorError, InvocationError};
use crate::gateway::{FunctionGateway, FunctionRecord, GatewayResponse};
use crate::observability::events;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::{debug, warn};

const COMPONENT: &str = "http_gateway";
const LIST_FUNCTIONS_PATH: &str = "/system/functions";
const INVOKE_PATH_PREFIX: &str = "/function/";
const TOPIC_HEADER: &str = "X-Topic";

/// Gateway client over a shared, connection-pooling HTTP client.
///
/// Every request, listing or invocation, is bounded by the upstream timeout.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    content_type: String,
    credentials: Option<GatewayCredentials>,
}

impl HttpGateway {
    pub fn new(
        base_url: &str,
        upstream_timeout: Duration,
        content_type: &str,
        credentials: Option<GatewayCredentials>,
    ) -> Result<Self, ConnectorError> {
        let client = Client::builder()
            .timeout(upstream_timeout)
            .build()
            .map_err(|e| ConnectorError::Config(format!("Unable to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            content_type: content_type.to_string(),
            credentials,
        })
    }

    pub fn from_config(config: &ConnectorConfig) -> Result<Self, ConnectorError> {
        Self::new(
            &config.gateway_url,
            config.upstream_timeout,
            &config.content_type,
            config.credentials.clone(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn with_credentials(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(credentials) => {
                request.basic_auth(&credentials.username, Some(&credentials.password))
            }
            None => request,
        }
    }
}

#[async_trait]
impl FunctionGateway for HttpGateway {
    async fn list_functions(&self) -> Result<Vec<FunctionRecord>, ConnectorError> {
        let url = format!("{}{LIST_FUNCTIONS_PATH}", self.base_url);

        let response = self
            .with_credentials(self.client.get(&url))
            .send()
            .await
            .map_err(|e| {
                warn!(
                    event = events::GATEWAY_LIST_FUNCTIONS_FAILED,
                    component = COMPONENT,
                    url = url.as_str(),
                    err = %e,
                    "unable to reach gateway"
                );
                ConnectorError::GatewayUnreachable(format!("GET {url}: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectorError::GatewayUnreachable(format!(
                "GET {url}: unexpected status {}",
                status.as_u16()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ConnectorError::GatewayUnreachable(format!("GET {url}: {e}")))?;
        let functions: Vec<FunctionRecord> = serde_json::from_slice(&body)
            .map_err(|e| ConnectorError::MalformedResponse(format!("GET {url}: {e}")))?;

        debug!(
            event = events::GATEWAY_LIST_FUNCTIONS,
            component = COMPONENT,
            function_count = functions.len(),
            "listed gateway functions"
        );
        Ok(functions)
    }

    async fn invoke_function(
        &self,
        function: &str,
        topic: &str,
        payload: Bytes,
    ) -> Result<GatewayResponse, InvocationError> {
        let url = format!("{}{INVOKE_PATH_PREFIX}{function}", self.base_url);

        let request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, self.content_type.as_str())
            .header(TOPIC_HEADER, topic)
            .body(payload);

        let response = self
            .with_credentials(request)
            .send()
            .await
            .map_err(|e| InvocationError::from_reqwest(&e))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| InvocationError::from_reqwest(&e))?;

        Ok(GatewayResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::HttpGateway;
    use std::time::Duration;

    #[test]
    fn base_url_drops_trailing_slash() {
        let gateway = HttpGateway::new(
            "http://gateway:8080/",
            Duration::from_secs(1),
            "text/plain",
            None,
        )
        .expect("client builds");

        assert_eq!(gateway.base_url(), "http://gateway:8080");
    }
}
