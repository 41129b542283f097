//! Cookstash Library
//!
//! A recipe box server: local recipe CRUD over a JSON file store, a
//! response-cached proxy in front of the Spoonacular API, and the meal-plan
//! and user-data logic the browser client builds on. Exposed as a library
//! for the binary and the integration tests.

pub mod cache;
pub mod cli;
pub mod planner;
pub mod server;
pub mod store;
pub mod upstream;
pub mod userdata;
