//! The `relay` module holds all of the server's in-memory state: the client
//! registry, topic memberships for CRDT gossip, and room memberships for
//! WebRTC negotiation.
//!
//! All three registries live behind one mutex (`SharedRelay`) so that each
//! inbound frame is handled to completion before the next one mutates
//! anything, matching the single-threaded atomicity the protocol assumes.

pub mod engine;
pub mod message;
pub mod room;
pub mod topic;

pub use engine::{Relay, SharedRelay};
