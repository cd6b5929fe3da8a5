//! Waypoint - minimal HTTP/1.1 request engine
//!
//! Parser, serializer, router and middleware pipeline, driven by a
//! per-connection state machine behind a cancellable listener.

pub mod config;
pub mod http;
pub mod server;
