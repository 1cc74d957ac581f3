//! Canonical structured event names used across `queue-connector`.

// Refresh loop and topic map events.
pub const TOPIC_MAP_REBUILD_START: &str = "topic_map_rebuild_start";
pub const TOPIC_MAP_REBUILD_OK: &str = "topic_map_rebuild_ok";
pub const TOPIC_MAP_REBUILD_FAILED: &str = "topic_map_rebuild_failed";
pub const TOPIC_MAP_SYNC: &str = "topic_map_sync";
pub const TOPIC_LOOKUP_EMPTY: &str = "topic_lookup_empty";
pub const REFRESH_LOOP_START: &str = "refresh_loop_start";
pub const REFRESH_LOOP_STOP: &str = "refresh_loop_stop";

// Gateway events.
pub const GATEWAY_LIST_FUNCTIONS: &str = "gateway_list_functions";
pub const GATEWAY_LIST_FUNCTIONS_FAILED: &str = "gateway_list_functions_failed";

// Invocation events.
pub const INVOKE_DISPATCH: &str = "invoke_dispatch";
pub const INVOKE_NO_SUBSCRIBERS: &str = "invoke_no_subscribers";
pub const INVOKE_OK: &str = "invoke_ok";
pub const INVOKE_FAILED: &str = "invoke_failed";
pub const INVOKE_RESPONSE_BODY: &str = "invoke_response_body";

// Queue worker events.
pub const QUEUE_WORKER_START: &str = "queue_worker_start";
pub const QUEUE_WORKER_STOP: &str = "queue_worker_stop";
pub const QUEUE_MESSAGE_RECEIVED: &str = "queue_message_received";
pub const QUEUE_MESSAGE_DECODE_FAILED: &str = "queue_message_decode_failed";
pub const QUEUE_FETCH_FAILED: &str = "queue_fetch_failed";
pub const QUEUE_ACK_FAILED: &str = "queue_ack_failed";
pub const QUEUE_RECOVERED: &str = "queue_recovered";
pub const QUEUE_BACKEND_READY: &str = "queue_backend_ready";

// Connector lifecycle events.
pub const CONNECTOR_START: &str = "connector_start";
pub const CONNECTOR_STOP: &str = "connector_stop";
pub const CONNECTOR_TASK_FAILED: &str = "connector_task_failed";
pub const CONFIG_VALUE_IGNORED: &str = "config_value_ignored";
