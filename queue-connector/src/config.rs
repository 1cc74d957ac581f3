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

//! Startup configuration.
//!
//! Values come from environment variables, optionally layered over a JSON5
//! file whose keys use the same names. The environment always wins.

use crate::error::ConnectorError;
use crate::observability::events;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

const COMPONENT: &str = "config";

pub const DEFAULT_GATEWAY_URL: &str = "http://gateway:8080";
pub const DEFAULT_REDIS_HOST: &str = "redis_host";
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_REBUILD_INTERVAL: Duration = Duration::from_secs(3);
pub const DEFAULT_QUEUE_POLL_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_REDIS_DATABASE: u32 = 0;
pub const DEFAULT_REDIS_POOL_SIZE: usize = 30;
pub const DEFAULT_QUEUE_CONCURRENCY: usize = 10;
pub const DEFAULT_QUEUE_PROCESS_ID: &str = "1";
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";
pub const DEFAULT_TOPIC_ANNOTATION: &str = "topic";
pub const DEFAULT_SECRET_MOUNT_PATH: &str = "/var/secrets/";

const BASIC_AUTH_USER_FILE: &str = "basic-auth-user";
const BASIC_AUTH_PASSWORD_FILE: &str = "basic-auth-password";

/// Credentials passed to the gateway as HTTP basic auth.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for GatewayCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Immutable snapshot of the connector configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectorConfig {
    pub gateway_url: String,
    pub upstream_timeout: Duration,
    pub rebuild_interval: Duration,
    pub queues: Vec<String>,
    pub print_response: bool,
    pub redis_host: String,
    pub redis_database: u32,
    pub redis_pool_size: usize,
    pub queue_concurrency: usize,
    pub queue_namespace: String,
    pub queue_process_id: String,
    pub queue_poll_timeout: Duration,
    pub content_type: String,
    pub topic_annotation: String,
    pub credentials: Option<GatewayCredentials>,
}

impl Default for ConnectorConfig {
    /// Defaults for every option; `queues` is left empty and must be filled in.
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
            rebuild_interval: DEFAULT_REBUILD_INTERVAL,
            queues: Vec::new(),
            print_response: false,
            redis_host: DEFAULT_REDIS_HOST.to_string(),
            redis_database: DEFAULT_REDIS_DATABASE,
            redis_pool_size: DEFAULT_REDIS_POOL_SIZE,
            queue_concurrency: DEFAULT_QUEUE_CONCURRENCY,
            queue_namespace: String::new(),
            queue_process_id: DEFAULT_QUEUE_PROCESS_ID.to_string(),
            queue_poll_timeout: DEFAULT_QUEUE_POLL_TIMEOUT,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            topic_annotation: DEFAULT_TOPIC_ANNOTATION.to_string(),
            credentials: None,
        }
    }
}

impl ConnectorConfig {
    /// Builds the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConnectorError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from the environment layered over an optional JSON5 file.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConnectorError> {
        Self::load_with(|key| std::env::var(key).ok(), config_file)
    }

    /// Builds the configuration from `lookup` layered over an optional JSON5 file.
    ///
    /// Keys answered by `lookup` win over the file; keys in neither keep their defaults.
    pub fn load_with<F>(lookup: F, config_file: Option<&Path>) -> Result<Self, ConnectorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_values = match config_file {
            Some(path) => read_config_file(path)?,
            None => HashMap::new(),
        };

        Self::from_lookup(|key| lookup(key).or_else(|| file_values.get(key).cloned()))
    }

    /// Builds the configuration from an arbitrary key/value source.
    ///
    /// Fails only when `queues` is missing or empty, or when basic auth is
    /// enabled and the credential files cannot be read.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConnectorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let queues = lookup("queues")
            .map(|value| split_list(&value))
            .unwrap_or_default();
        if queues.is_empty() {
            return Err(ConnectorError::Config(
                r#"Provide a list of queues i.e. queues="payment_published,slack_joined""#
                    .to_string(),
            ));
        }

        let secret_mount_path =
            lookup("secret_mount_path").unwrap_or_else(|| DEFAULT_SECRET_MOUNT_PATH.to_string());
        let credentials = if lookup("basic_auth").is_some_and(|value| parse_flag(&value)) {
            Some(read_credentials(Path::new(&secret_mount_path))?)
        } else {
            None
        };

        Ok(Self {
            gateway_url: lookup("gateway_url")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.gateway_url),
            upstream_timeout: duration_or(
                &lookup,
                "upstream_timeout",
                defaults.upstream_timeout,
            ),
            rebuild_interval: duration_or(
                &lookup,
                "rebuild_interval",
                defaults.rebuild_interval,
            ),
            queues,
            print_response: lookup("print_response").is_some_and(|value| parse_flag(&value)),
            redis_host: lookup("redis_host").unwrap_or(defaults.redis_host),
            redis_database: number_or(&lookup, "redis_database", defaults.redis_database),
            redis_pool_size: positive_or(&lookup, "redis_pool_size", defaults.redis_pool_size),
            queue_concurrency: positive_or(
                &lookup,
                "queue_concurrency",
                defaults.queue_concurrency,
            ),
            queue_namespace: lookup("queue_namespace").unwrap_or(defaults.queue_namespace),
            queue_process_id: lookup("queue_process_id").unwrap_or(defaults.queue_process_id),
            queue_poll_timeout: duration_or(
                &lookup,
                "queue_poll_timeout",
                defaults.queue_poll_timeout,
            ),
            content_type: lookup("content_type").unwrap_or(defaults.content_type),
            topic_annotation: lookup("topic_annotation").unwrap_or(defaults.topic_annotation),
            credentials,
        })
    }

    /// Connection URL for the queue backend.
    ///
    /// A bare `host:port` is turned into a `redis://` URL using the configured
    /// database; anything that already carries a scheme is used verbatim.
    pub fn redis_url(&self) -> String {
        if self.redis_host.contains("://") {
            self.redis_host.clone()
        } else {
            format!("redis://{}/{}", self.redis_host, self.redis_database)
        }
    }
}

fn read_config_file(path: &Path) -> Result<HashMap<String, String>, ConnectorError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ConnectorError::Config(format!(
            "Unable to read config file {}: {e}",
            path.display()
        ))
    })?;
    let values: HashMap<String, Value> = json5::from_str(&contents).map_err(|e| {
        ConnectorError::Config(format!(
            "Unable to parse config file {}: {e}",
            path.display()
        ))
    })?;

    Ok(values
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(text) => Some((key, text)),
            Value::Array(items) => Some((
                key,
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(","),
            )),
            other => Some((key, other.to_string())),
        })
        .collect())
}

fn read_credentials(secret_mount_path: &Path) -> Result<GatewayCredentials, ConnectorError> {
    let read_secret = |name: &str| -> Result<String, ConnectorError> {
        let path: PathBuf = secret_mount_path.join(name);
        std::fs::read_to_string(&path)
            .map(|value| value.trim().to_string())
            .map_err(|e| {
                ConnectorError::Config(format!(
                    "Unable to read gateway secret {}: {e}",
                    path.display()
                ))
            })
    };

    Ok(GatewayCredentials {
        username: read_secret(BASIC_AUTH_USER_FILE)?,
        password: read_secret(BASIC_AUTH_PASSWORD_FILE)?,
    })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(value: &str) -> bool {
    value == "1" || value == "true"
}

fn warn_ignored(key: &str, value: &str, reason: &str) {
    warn!(
        event = events::CONFIG_VALUE_IGNORED,
        component = COMPONENT,
        key,
        value,
        reason,
        "ignoring configuration value; keeping default"
    );
}

fn duration_or<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(key) else {
        return default;
    };
    match parse_duration(&value) {
        Ok(parsed) if !parsed.is_zero() => parsed,
        Ok(_) => {
            warn_ignored(key, &value, "duration must be positive");
            default
        }
        Err(reason) => {
            warn_ignored(key, &value, &reason);
            default
        }
    }
}

fn number_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let Some(value) = lookup(key) else {
        return default;
    };
    match value.trim().parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn_ignored(key, &value, "not a number");
            default
        }
    }
}

fn positive_or<F>(lookup: &F, key: &str, default: usize) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    match number_or(lookup, key, default) {
        0 => {
            warn_ignored(key, "0", "must be positive");
            default
        }
        parsed => parsed,
    }
}

/// Parses a Go-style duration string such as `30s`, `1m30s`, `1.5h` or `250ms`.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let text = input.trim();
    if text.is_empty() {
        return Err("empty duration".to_string());
    }
    if text == "0" {
        return Ok(Duration::ZERO);
    }

    let is_number_char = |ch: char| ch.is_ascii_digit() || ch == '.';
    let mut nanos = 0f64;
    let mut rest = text;

    while !rest.is_empty() {
        let number_end = rest.find(|ch: char| !is_number_char(ch)).unwrap_or(rest.len());
        if number_end == 0 {
            return Err(format!("invalid duration: {text}"));
        }
        let value: f64 = rest[..number_end]
            .parse()
            .map_err(|_| format!("invalid duration: {text}"))?;
        rest = &rest[number_end..];

        let unit_end = rest.find(is_number_char).unwrap_or(rest.len());
        let scale = match &rest[..unit_end] {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => return Err(format!("missing unit in duration: {text}")),
            unit => return Err(format!("unknown unit {unit} in duration: {text}")),
        };
        nanos += value * scale;
        rest = &rest[unit_end..];
    }

    Ok(Duration::from_nanos(nanos.round() as u64))
}
