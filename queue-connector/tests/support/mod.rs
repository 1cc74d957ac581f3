use integration_test_utils::{FakeGateway, MemoryQueue};
use queue_connector::{Connector, ConnectorConfig};
use std::sync::Arc;
use std::time::Duration;

pub(crate) fn test_config(queues: &[&str]) -> ConnectorConfig {
    ConnectorConfig {
        queues: queues.iter().map(|queue| queue.to_string()).collect(),
        rebuild_interval: Duration::from_millis(20),
        queue_concurrency: 2,
        ..ConnectorConfig::default()
    }
}

pub(crate) fn make_connector(gateway: Arc<FakeGateway>, queues: &[&str]) -> Connector {
    Connector::new("integration-test", test_config(queues), gateway)
}

#[allow(dead_code)]
pub(crate) fn make_queue() -> Arc<MemoryQueue> {
    Arc::new(MemoryQueue::new(Duration::from_millis(20)))
}

#[allow(dead_code)]
pub(crate) async fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    tokio::time::timeout(timeout, async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .is_ok()
}
