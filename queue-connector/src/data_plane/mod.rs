//! Data-plane layer.
//!
//! Owns the queue worker tasks and the invoker that fans each message out to
//! the functions subscribed to its topic. Every invocation outcome is reported
//! to the registered [`crate::ResponseSubscriber`]s.
//!
//! ```
//! use std::collections::BTreeSet;
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use bytes::Bytes;
//! use queue_connector::routing::TopicMap;
//! use queue_connector::{
//!     ConnectorError, FunctionGateway, FunctionRecord, GatewayResponse, InvocationError, Invoker,
//! };
//!
//! # struct AcceptingGateway;
//! #
//! # #[async_trait]
//! # impl FunctionGateway for AcceptingGateway {
//! #     async fn list_functions(&self) -> Result<Vec<FunctionRecord>, ConnectorError> {
//! #         Ok(Vec::new())
//! #     }
//! #
//! #     async fn invoke_function(
//! #         &self,
//! #         _function: &str,
//! #         _topic: &str,
//! #         _payload: Bytes,
//! #     ) -> Result<GatewayResponse, InvocationError> {
//! #         Ok(GatewayResponse { status: 200, body: Bytes::new() })
//! #     }
//! # }
//! #
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let topic_map = TopicMap::empty();
//! topic_map.sync(
//!     [("a".to_string(), BTreeSet::from(["f1".to_string(), "f2".to_string()]))]
//!         .into_iter()
//!         .collect(),
//! );
//! let invoker = Invoker::new(Arc::new(AcceptingGateway), topic_map, false);
//!
//! // One attempt per subscribed function; unknown topics are a no-op.
//! assert_eq!(invoker.invoke("a", Bytes::from_static(b"[]")).await.len(), 2);
//! assert!(invoker.invoke("unknown_topic", Bytes::new()).await.is_empty());
//! # });
//! ```

pub(crate) mod invoker;
pub(crate) mod queue_worker;
pub(crate) mod response;
