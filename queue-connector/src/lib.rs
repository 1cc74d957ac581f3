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

//! # queue-connector
//!
//! `queue-connector` consumes messages from named Redis queues and invokes the
//! functions behind an HTTP gateway that subscribe to each queue's topic.
//!
//! Subscriptions are declared on the functions themselves: a function whose
//! `topic` annotation lists `orders_created` receives every message pushed to
//! the `orders_created` queue. The connector rebuilds this mapping from the
//! gateway's function listing on a fixed interval.
//!
//! Typical usage is API-first and centered on [`Connector`]:
//!
//! ```no_run
//! use std::sync::Arc;
//! use queue_connector::{
//!     Connector, ConnectorConfig, HttpGateway, LogResponseSubscriber, RedisQueue,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let config = ConnectorConfig::from_env().unwrap();
//! let gateway = Arc::new(HttpGateway::from_config(&config).unwrap());
//! let queue = Arc::new(RedisQueue::from_config(&config).await.unwrap());
//!
//! let mut connector = Connector::new("sidekiq-connector", config, gateway);
//! connector.subscribe_responses(Arc::new(LogResponseSubscriber));
//!
//! let cancel = CancellationToken::new();
//! connector.run(queue, cancel).await;
//! # });
//! ```
//!
//! `refresh()` runs one rebuild on demand and `sync_health()` reports the
//! outcome of the most recent attempts. A failed rebuild never clears the map:
//! the previous generation keeps serving lookups until a rebuild succeeds.
//!
//! ## Internal architecture map
//!
//! - API facade: outward [`Connector`] surface
//! - Control plane: periodic topic map rebuild and sync health
//! - Routing: annotation parsing, lookup building and the versioned topic map
//! - Data plane: queue workers, concurrent invocation fan-out, response subscribers
//! - Gateway and queue: the HTTP and Redis seams behind [`FunctionGateway`] and [`QueueSource`]
//!
//! ## Observability model
//!
//! The workspace uses `tracing` for logs/events.
//! Library code emits events/spans and does not unconditionally initialize a global
//! subscriber. Binaries and tests are responsible for one-time
//! `tracing_subscriber` initialization at process boundaries.

mod config;
pub use config::{parse_duration, ConnectorConfig, GatewayCredentials};

mod connector;
pub use connector::Connector;

mod control_plane;
mod data_plane;
pub use data_plane::invoker::Invoker;
pub use data_plane::response::{InvocationResult, LogResponseSubscriber, ResponseSubscriber};

pub mod error;
pub use error::{ConnectorError, InvocationError};

mod gateway;
pub use gateway::{FunctionGateway, FunctionRecord, GatewayResponse, HttpGateway};

#[doc(hidden)]
pub mod observability;

mod queue;
pub use queue::{QueueMessage, QueueSource, RedisQueue, SidekiqJob};

pub mod routing;

mod sync_health;
pub use sync_health::SyncHealth;
