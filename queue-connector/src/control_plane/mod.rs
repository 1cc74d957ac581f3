//! Control-plane layer.
//!
//! Owns the periodic rebuild of the topic map from the gateway listing. The
//! refresh loop is the only writer of the map; a failed rebuild leaves the
//! previous generation serving lookups and is recorded in [`crate::SyncHealth`].

pub(crate) mod refresh_loop;
