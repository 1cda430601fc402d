//! Wire types for the tether control channel.
//!
//! This crate contains the serde-serializable types exchanged between the
//! agent and its controller over the WebSocket control channel. These types
//! represent the "protocol layer" - the shapes of data as they appear on the
//! wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: No behavior beyond serialization/deserialization
//! - **1:1 with the wire**: Field names match the controller contract
//! - **Stable**: Changes only when the wire protocol changes
//!
//! Session, scheduling, and dispatch behavior live in `tether-runtime`.

pub mod device;
pub mod message;
pub mod plan;

pub use device::*;
pub use message::*;
pub use plan::*;
