//! WebSocket layer: transport upgrade and the per-connection read loop.
//!
//! The endpoint at `/ws/logger` upgrades to a WebSocket and hands the
//! socket to one [`crate::protocol::ConnectionSession`] per connection.

pub mod connection;
pub mod handler;
