//! Shared types for hookfeed.
//!
//! `objects` holds the wire types exchanged with the server. The `client`
//! module (behind the `client` feature) is a typed HTTP client for the
//! read-side endpoints.

#[cfg(feature = "client")]
pub mod client;
pub mod objects;
