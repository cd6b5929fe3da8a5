//! TCP front end: binds the port and runs connections until shutdown.

pub mod listener;

pub use listener::Listener;
