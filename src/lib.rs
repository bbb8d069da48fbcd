//! # vizrelay
//!
//! `vizrelay` is a minimalist, in-memory signaling relay for collaborative
//! visualization clients. Browser peers connect over a secure WebSocket and
//! use it for two things: gossiping CRDT document updates through named
//! topics, and negotiating direct WebRTC sessions through named video rooms.
//!
//! The relay holds no persistent state. Every registry is rebuilt empty on
//! restart, and clients are expected to reconnect and resubscribe on their
//! own.
//!
//! ## Core Modules
//!
//! - `relay`: the central component that manages topics, rooms, the client
//!   registry, and message routing.
//! - `client`: represents a connected WebSocket client.
//! - `config`: handles loading and managing server configuration.
//! - `transport`: the WebSocket/TLS server and the wire protocol.
//! - `utils`: shared utilities such as logging setup and error types.

pub mod client;
pub mod config;
pub mod relay;
pub mod transport;
pub mod utils;
