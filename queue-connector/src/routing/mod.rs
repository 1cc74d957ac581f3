//! Routing layer.
//!
//! Turns the gateway's function listing into a topic→functions lookup and
//! publishes it through a versioned, lock-free [`TopicMap`].
//!
//! ```
//! use queue_connector::routing::{build_topic_lookup, TopicMap};
//! use queue_connector::FunctionRecord;
//!
//! let functions = vec![
//!     FunctionRecord::new("billing").with_annotation("topic", "orders_created"),
//!     FunctionRecord::new("audit").with_annotation("topic", "orders_created, refunds"),
//! ];
//!
//! let topic_map = TopicMap::empty();
//! topic_map.sync(build_topic_lookup(&functions, "topic"));
//!
//! let subscribers: Vec<String> = topic_map.lookup("orders_created").into_iter().collect();
//! assert_eq!(subscribers, vec!["audit".to_string(), "billing".to_string()]);
//! assert!(topic_map.lookup("unknown_topic").is_empty());
//! ```

mod lookup_builder;
mod topic_map;

pub use lookup_builder::{build_topic_lookup, parse_topics, LookupBuilder, TopicLookup};
pub use topic_map::{TopicMap, TopicMapSnapshot};
