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

use clap::Parser;
use queue_connector::{
    Connector, ConnectorConfig, ConnectorError, HttpGateway, LogResponseSubscriber, RedisQueue,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const CONNECTOR_NAME: &str = "sidekiq-connector";

#[derive(Parser)]
#[command(version, about)]
struct ConnectorArgs {
    /// Optional JSON5 file with configuration keys; environment variables take precedence.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), ConnectorError> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    let args = ConnectorArgs::parse();
    let config = ConnectorConfig::load(args.config.as_deref())
        .inspect_err(|e| error!(err = %e, "invalid configuration"))?;

    info!(
        gateway_url = config.gateway_url.as_str(),
        queues = %config.queues.join(","),
        upstream_timeout_ms = config.upstream_timeout.as_millis() as u64,
        rebuild_interval_ms = config.rebuild_interval.as_millis() as u64,
        print_response = config.print_response,
        redis_host = config.redis_host.as_str(),
        basic_auth = config.credentials.is_some(),
        "Started {CONNECTOR_NAME}"
    );

    let gateway = Arc::new(
        HttpGateway::from_config(&config)
            .inspect_err(|e| error!(err = %e, "unable to build gateway client"))?,
    );

    let queue = RedisQueue::from_config(&config)
        .await
        .inspect_err(|e| error!(err = %e, "unable to connect to redis"))?;
    for name in &config.queues {
        queue
            .recover(name)
            .await
            .inspect_err(|e| error!(err = %e, queue = name.as_str(), "unable to recover queue"))?;
    }

    let mut connector = Connector::new(CONNECTOR_NAME, config, gateway);
    connector.subscribe_responses(Arc::new(LogResponseSubscriber));

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.cancel();
    });

    connector.run(Arc::new(queue), cancel).await;

    info!("Stopped {CONNECTOR_NAME}");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C");
        }
        () = terminate => {
            info!("Received SIGTERM");
        }
    }
}
