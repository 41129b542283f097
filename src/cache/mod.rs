//! Response cache for upstream API calls
//!
//! This module provides an in-memory cache that stores raw response bodies
//! with per-entry TTL (time-to-live) values. It sits in front of the
//! rate-limited upstream recipe API so that repeated identical queries within
//! the TTL window never reach the network. Expiry is lazy: entries are
//! checked (and dropped) when read, so no background sweep is required for
//! correctness.

mod response;

pub use response::{response_cache_key, ResponseCache};
