//! The `transport` module is responsible for network communication with
//! clients over WebSockets, optionally wrapped in TLS.
//!
//! It defines the inbound half of the wire protocol, implements the accept
//! loop and per-connection handling, and translates parsed frames into relay
//! operations. Malformed or unrecognized frames are logged and dropped; the
//! connection is never closed because of one.

pub mod message;
pub mod tls;
pub mod websocket;


#[cfg(test)]
mod websocket_tests;
