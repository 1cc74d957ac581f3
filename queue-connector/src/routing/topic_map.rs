//! Versioned topic→functions map shared by the refresh loop and the invoker.

use arc_swap::ArcSwap;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::observability::events;
use crate::routing::lookup_builder::TopicLookup;

const COMPONENT: &str = "topic_map";

/// One immutable generation of the topic map.
#[derive(Debug, Default)]
pub struct TopicMapSnapshot {
    version: u64,
    lookup: TopicLookup,
}

impl TopicMapSnapshot {
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Functions subscribed to `topic` in this generation.
    pub fn functions_for(&self, topic: &str) -> Option<&BTreeSet<String>> {
        self.lookup.get(topic)
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.lookup.keys().map(String::as_str)
    }

    pub fn topic_count(&self) -> usize {
        self.lookup.len()
    }
}

/// Cloneable handle over the current topic map generation.
///
/// Readers load the current snapshot without locking; `sync` publishes a new
/// generation with a single pointer swap, so a lookup sees one generation in
/// full and never a mix of two.
#[derive(Clone)]
pub struct TopicMap {
    snapshot: Arc<ArcSwap<TopicMapSnapshot>>,
    next_version: Arc<AtomicU64>,
}

impl Default for TopicMap {
    fn default() -> Self {
        Self::empty()
    }
}

impl TopicMap {
    /// Creates a map at version 0 with no topics.
    pub fn empty() -> Self {
        Self {
            snapshot: Arc::new(ArcSwap::from_pointee(TopicMapSnapshot::default())),
            next_version: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Replaces the whole mapping and returns the version of the new generation.
    pub fn sync(&self, lookup: TopicLookup) -> u64 {
        let version = self.next_version.fetch_add(1, Ordering::Relaxed);
        let topic_count = lookup.len();
        self.snapshot
            .store(Arc::new(TopicMapSnapshot { version, lookup }));

        info!(
            event = events::TOPIC_MAP_SYNC,
            component = COMPONENT,
            snapshot_version = version,
            topic_count,
            "syncing topic map"
        );
        version
    }

    /// Functions currently subscribed to `topic`; empty for unknown topics.
    pub fn lookup(&self, topic: &str) -> BTreeSet<String> {
        self.lookup_with_version(topic).1
    }

    /// Looks up `topic` and returns the version of the generation that served it.
    pub fn lookup_with_version(&self, topic: &str) -> (u64, BTreeSet<String>) {
        let snapshot = self.snapshot.load();
        match snapshot.functions_for(topic) {
            Some(functions) => (snapshot.version, functions.clone()),
            None => {
                debug!(
                    event = events::TOPIC_LOOKUP_EMPTY,
                    component = COMPONENT,
                    topic,
                    snapshot_version = snapshot.version,
                    "no functions subscribed to topic"
                );
                (snapshot.version, BTreeSet::new())
            }
        }
    }

    /// The current generation, for reads that must span several topics.
    pub fn snapshot(&self) -> Arc<TopicMapSnapshot> {
        self.snapshot.load_full()
    }

    pub fn version(&self) -> u64 {
        self.snapshot.load().version
    }

    pub fn topic_count(&self) -> usize {
        self.snapshot.load().topic_count()
    }
}
