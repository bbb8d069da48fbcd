//! The `client` module defines the representation of a client in the relay.
//!
//! It provides the `Client` struct, which encapsulates the state of a single
//! connected peer: its relay-assigned identifier, the channel for sending
//! frames to it, and the membership indexes used for cleanup on disconnect.

pub mod relay_client;
pub use relay_client::{Client, ClientId};
