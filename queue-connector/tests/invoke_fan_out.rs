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

mod support;

use bytes::Bytes;
use integration_test_utils::{FakeGateway, RecordingSubscriber};
use queue_connector::{GatewayResponse, InvocationError};
use std::sync::Arc;
use support::make_connector;

#[tokio::test(flavor = "multi_thread")]
async fn every_subscribed_function_gets_one_attempt() {
    integration_test_utils::init_logging();

    let gateway = Arc::new(FakeGateway::new());
    gateway.add_function("f1", "a").await;
    gateway.add_function("f2", "a, b").await;
    gateway
        .respond_with("f1", Err(InvocationError::Timeout))
        .await;
    gateway
        .respond_with(
            "f2",
            Ok(GatewayResponse {
                status: 503,
                body: Bytes::from_static(b"unavailable"),
            }),
        )
        .await;

    let mut connector = make_connector(gateway.clone(), &["a"]);
    let subscriber = RecordingSubscriber::new();
    connector.subscribe_responses(Arc::new(subscriber.clone()));
    connector.refresh().await.expect("refresh succeeds");

    let results = connector
        .invoker()
        .invoke("a", Bytes::from_static(b"{}"))
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(gateway.invocations().await.len(), 2);
    assert_eq!(subscriber.results().await.len(), 2);

    let f1 = results.iter().find(|r| r.function == "f1").expect("f1 result");
    assert_eq!(f1.error, Some(InvocationError::Timeout));
    assert_eq!(f1.status, None);

    let f2 = results.iter().find(|r| r.function == "f2").expect("f2 result");
    assert_eq!(f2.error, Some(InvocationError::Status(503)));
    assert_eq!(f2.status, Some(503));
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_topic_is_a_no_op() {
    integration_test_utils::init_logging();

    let gateway = Arc::new(FakeGateway::new());
    gateway.add_function("f1", "a").await;

    let mut connector = make_connector(gateway.clone(), &["a"]);
    let subscriber = RecordingSubscriber::new();
    connector.subscribe_responses(Arc::new(subscriber.clone()));
    connector.refresh().await.expect("refresh succeeds");

    let results = connector
        .invoker()
        .invoke("unknown_topic", Bytes::from_static(b"{}"))
        .await;

    assert!(results.is_empty());
    assert!(gateway.invocations().await.is_empty());
    assert!(subscriber.results().await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn invoke_before_first_rebuild_issues_no_calls() {
    integration_test_utils::init_logging();

    let gateway = Arc::new(FakeGateway::new());
    gateway.add_function("f1", "a").await;
    let connector = make_connector(gateway.clone(), &["a"]);

    assert!(connector
        .invoker()
        .invoke("a", Bytes::new())
        .await
        .is_empty());
    assert!(gateway.invocations().await.is_empty());
}
