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
use integration_test_utils::{sidekiq_job, FakeGateway, RecordingSubscriber};
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use support::{make_connector, make_queue, wait_until};
use tokio_util::sync::CancellationToken;

#[tokio::test(flavor = "multi_thread")]
async fn queued_job_reaches_subscribed_function() {
    integration_test_utils::init_logging();

    let gateway = Arc::new(FakeGateway::new());
    gateway.add_function("billing", "orders_created").await;

    let mut connector = make_connector(gateway.clone(), &["orders_created"]);
    let subscriber = RecordingSubscriber::new();
    connector.subscribe_responses(Arc::new(subscriber.clone()));
    let topic_map = connector.topic_map();

    let queue = make_queue();
    let cancel = CancellationToken::new();
    let run = tokio::spawn(connector.run(queue.clone(), cancel.clone()));

    assert!(
        wait_until(Duration::from_secs(5), || topic_map.version() > 0).await,
        "first rebuild should populate the topic map"
    );
    assert_eq!(
        topic_map.lookup("orders_created"),
        BTreeSet::from(["billing".to_string()])
    );

    queue
        .push(
            "orders_created",
            sidekiq_job("orders_created", "jid-1", json!(["order-1", {"total": 42}])),
        )
        .await;

    assert!(queue.wait_for_acks(1, Duration::from_secs(5)).await);
    assert!(subscriber.wait_for(1, Duration::from_secs(5)).await);

    let invocations = gateway.invocations().await;
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].function, "billing");
    assert_eq!(invocations[0].topic, "orders_created");
    assert_eq!(
        invocations[0].payload,
        Bytes::from(r#"["order-1",{"total":42}]"#)
    );

    let results = subscriber.results().await;
    assert_eq!(results[0].function, "billing");
    assert_eq!(results[0].status, Some(200));
    assert!(results[0].is_success());

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("connector should stop after cancellation")
        .expect("connector task should not panic");
}

#[tokio::test(flavor = "multi_thread")]
async fn messages_on_unsubscribed_queue_are_acknowledged_without_invocation() {
    integration_test_utils::init_logging();

    let gateway = Arc::new(FakeGateway::new());
    gateway.add_function("billing", "orders_created").await;

    let connector = make_connector(gateway.clone(), &["orders_created", "slack_joined"]);
    let topic_map = connector.topic_map();
    let queue = make_queue();
    let cancel = CancellationToken::new();
    let run = tokio::spawn(connector.run(queue.clone(), cancel.clone()));

    assert!(wait_until(Duration::from_secs(5), || topic_map.version() > 0).await);

    queue
        .push("slack_joined", sidekiq_job("slack_joined", "jid-2", json!(["alice"])))
        .await;
    queue.push("orders_created", "this is not a job").await;

    assert!(queue.wait_for_acks(2, Duration::from_secs(5)).await);
    assert!(gateway.invocations().await.is_empty());
    assert_eq!(queue.pending_len("slack_joined").await, 0);

    cancel.cancel();
    run.await.expect("connector task should not panic");
}

#[tokio::test(flavor = "multi_thread")]
async fn every_configured_queue_is_consumed() {
    integration_test_utils::init_logging();

    let gateway = Arc::new(FakeGateway::new());
    gateway.add_function("payments", "payment_published").await;
    gateway.add_function("greeter", "slack_joined").await;

    let connector = make_connector(gateway.clone(), &["payment_published", "slack_joined"]);
    let topic_map = connector.topic_map();
    let queue = make_queue();
    let cancel = CancellationToken::new();
    let run = tokio::spawn(connector.run(queue.clone(), cancel.clone()));

    assert!(wait_until(Duration::from_secs(5), || topic_map.topic_count() == 2).await);

    queue
        .push(
            "payment_published",
            sidekiq_job("payment_published", "jid-3", json!([10])),
        )
        .await;
    queue
        .push("slack_joined", sidekiq_job("slack_joined", "jid-4", json!(["bob"])))
        .await;

    assert!(queue.wait_for_acks(2, Duration::from_secs(5)).await);
    assert_eq!(gateway.invocations_of("payments").await.len(), 1);
    assert_eq!(gateway.invocations_of("greeter").await.len(), 1);

    cancel.cancel();
    run.await.expect("connector task should not panic");
}
