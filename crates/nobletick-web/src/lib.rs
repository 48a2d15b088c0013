//! HTTP API for the nobletick spot-price service.
//!
//! The library surface is just [`router`], so integration tests can drive
//! the API against a hand-built cache without binding a socket; the binary
//! in `main.rs` wires the router to the refresh scheduler and a listener.

mod routes;

pub use routes::router;
