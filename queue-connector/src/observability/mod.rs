//! Structured logging vocabulary.
//!
//! Event names are kept in one place so log queries stay stable across
//! refactors of the modules that emit them.

pub mod events;
pub mod fields;
