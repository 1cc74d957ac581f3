//! Builds the topic→functions lookup from the gateway function listing.

use crate::error::ConnectorError;
use crate::gateway::{FunctionGateway, FunctionRecord};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Topic name to the set of subscribed function names.
pub type TopicLookup = HashMap<String, BTreeSet<String>>;

/// Lists gateway functions and inverts their topic annotations.
#[derive(Clone)]
pub struct LookupBuilder {
    gateway: Arc<dyn FunctionGateway>,
    topic_annotation: String,
}

impl LookupBuilder {
    pub fn new(gateway: Arc<dyn FunctionGateway>, topic_annotation: impl Into<String>) -> Self {
        Self {
            gateway,
            topic_annotation: topic_annotation.into(),
        }
    }

    /// Fetches the current listing and derives a fresh lookup.
    ///
    /// The only side effect is the listing call; two runs against an
    /// unchanged gateway yield equal lookups.
    pub async fn build(&self) -> Result<TopicLookup, ConnectorError> {
        let functions = self.gateway.list_functions().await?;
        Ok(build_topic_lookup(&functions, &self.topic_annotation))
    }
}

/// Splits a comma-separated topic annotation, trimming entries and dropping empty ones.
pub fn parse_topics(annotation: &str) -> impl Iterator<Item = &str> {
    annotation
        .split(',')
        .map(str::trim)
        .filter(|topic| !topic.is_empty())
}

/// Inverts function→topics into topic→functions.
///
/// Functions without the annotation end up in no bucket.
pub fn build_topic_lookup(functions: &[FunctionRecord], topic_annotation: &str) -> TopicLookup {
    let mut lookup = TopicLookup::new();

    for function in functions {
        let Some(annotation) = function.annotation(topic_annotation) else {
            continue;
        };
        for topic in parse_topics(annotation) {
            lookup
                .entry(topic.to_string())
                .or_default()
                .insert(function.name.clone());
        }
    }

    lookup
}

#[cfg(test)]
mod tests {
    use super::{build_topic_lookup, parse_topics, LookupBuilder};
    use crate::error::{ConnectorError, InvocationError};
    use crate::gateway::{FunctionGateway, FunctionRecord, GatewayResponse};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    struct ListingGateway {
        listing: Result<Vec<FunctionRecord>, ConnectorError>,
    }

    #[async_trait]
    impl FunctionGateway for ListingGateway {
        async fn list_functions(&self) -> Result<Vec<FunctionRecord>, ConnectorError> {
            self.listing.clone()
        }

        async fn invoke_function(
            &self,
            _function: &str,
            _topic: &str,
            _payload: Bytes,
        ) -> Result<GatewayResponse, InvocationError> {
            Err(InvocationError::Transport(
                "invoke is not used by lookup builder tests".to_string(),
            ))
        }
    }

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn parse_topics_trims_and_drops_empty_entries() {
        let topics: Vec<&str> = parse_topics(" a, b,,b ,").collect();
        assert_eq!(topics, vec!["a", "b", "b"]);
    }

    #[test]
    fn duplicate_topics_collapse_to_one_subscription() {
        let functions = vec![FunctionRecord::new("f").with_annotation("topic", "a, b,,b")];

        let lookup = build_topic_lookup(&functions, "topic");

        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup["a"], names(&["f"]));
        assert_eq!(lookup["b"], names(&["f"]));
    }

    #[test]
    fn functions_without_annotation_are_omitted() {
        let functions = vec![
            FunctionRecord::new("billing").with_annotation("topic", "orders_created"),
            FunctionRecord::new("plain"),
            FunctionRecord::new("other-key").with_annotation("queue", "orders_created"),
        ];

        let lookup = build_topic_lookup(&functions, "topic");

        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup["orders_created"], names(&["billing"]));
    }

    #[test]
    fn topics_fan_out_to_many_functions() {
        let functions = vec![
            FunctionRecord::new("f2").with_annotation("topic", "a"),
            FunctionRecord::new("f1").with_annotation("topic", "a,c"),
        ];

        let lookup = build_topic_lookup(&functions, "topic");

        assert_eq!(lookup["a"], names(&["f1", "f2"]));
        assert_eq!(lookup["c"], names(&["f1"]));
        assert!(!lookup.contains_key("A"));
    }

    #[tokio::test]
    async fn build_is_repeatable_for_unchanged_listing() {
        let gateway = Arc::new(ListingGateway {
            listing: Ok(vec![
                FunctionRecord::new("billing").with_annotation("topic", "orders_created"),
                FunctionRecord::new("audit").with_annotation("topic", "orders_created,refunds"),
            ]),
        });
        let builder = LookupBuilder::new(gateway, "topic");

        let first = builder.build().await.expect("first build");
        let second = builder.build().await.expect("second build");

        assert_eq!(first, second);
        assert_eq!(first["orders_created"], names(&["audit", "billing"]));
    }

    #[tokio::test]
    async fn build_propagates_gateway_errors() {
        let gateway = Arc::new(ListingGateway {
            listing: Err(ConnectorError::MalformedResponse("not json".to_string())),
        });
        let builder = LookupBuilder::new(gateway, "topic");

        assert_eq!(
            builder.build().await,
            Err(ConnectorError::MalformedResponse("not json".to_string()))
        );
    }
}
