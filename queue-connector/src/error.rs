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

//! Error types shared across the connector.

use thiserror::Error;

/// Failures of connector operations other than a single function invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectorError {
    /// Startup configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The gateway could not be reached or answered with a non-success status.
    #[error("gateway unreachable: {0}")]
    GatewayUnreachable(String),

    /// The gateway answered but the body could not be parsed.
    #[error("malformed gateway response: {0}")]
    MalformedResponse(String),

    /// The queue backend failed (pool, connection or command error).
    #[error("queue backend error: {0}")]
    Queue(String),

    /// A queue message could not be decoded into a job envelope.
    #[error("malformed queue message: {0}")]
    MessageDecoding(String),
}

/// Failure of one function invocation.
///
/// Scoped to a single function/message pair and reported through response
/// subscribers; never escalated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    #[error("invocation timed out")]
    Timeout,

    #[error("invocation transport failure: {0}")]
    Transport(String),

    #[error("function returned non-success status {0}")]
    Status(u16),
}

impl InvocationError {
    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err.to_string())
        }
    }
}
