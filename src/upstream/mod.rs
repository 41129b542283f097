//! External recipe API gateway
//!
//! Outbound HTTP client wrapping the third-party Spoonacular recipe API
//! (search, detail, nutrition, substitutes). Every operation consults the
//! response cache before touching the network and stores successful bodies
//! back with a fixed TTL, so repeated identical queries within the window
//! cost nothing upstream.

mod spoonacular;

pub use spoonacular::{SearchFilters, SpoonacularClient, UpstreamError};
