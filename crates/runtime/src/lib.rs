//! Tether Runtime - Session lifecycle, command dispatch, and scheduling
//!
//! This crate provides the device-side runtime for a tether agent:
//!
//! - **Session**: Persistent control channel with fixed-interval reconnect
//! - **Transport**: WebSocket framing behind object-safe traits
//! - **Dispatch**: Verb table mapping inbound commands to host calls
//! - **Scheduler**: Timed tap plans with cumulative delays
//! - **Host**: Traits the embedding process implements for device access
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  embedder   │  Implements DeviceInfo, HostServices, ActionExecutor
//! └──────┬──────┘
//!        │ constructs
//! ┌──────▼──────┐
//! │tether-runtime│ This crate
//! │  ┌────────┐ │
//! │  │Session │ │  State machine, snapshot, reconnect
//! │  └────────┘ │
//! │  ┌────────┐ │
//! │  │Dispatch│ │  Command -> Ack
//! │  └────────┘ │
//! │  ┌────────┐ │
//! │  │Schedule│ │  Cumulative-delay tap plans
//! │  └────────┘ │
//! │  ┌────────┐ │
//! │  │ Trans  │ │  WebSocket transport
//! │  └────────┘ │
//! └─────────────┘
//! ```
//!
//! # Decoupling via host traits
//!
//! The runtime never touches device facilities directly. [`DeviceInfo`],
//! [`HostServices`], and [`ActionExecutor`] are implemented by the embedding
//! process, which keeps the session and scheduler logic testable with plain
//! in-memory fakes and keeps this crate independent of any one platform.

pub mod dispatch;
pub mod error;
pub mod events;
pub mod host;
pub mod scheduler;
pub mod session;
pub mod transport;

// Re-export key types at crate root
pub use dispatch::CommandDispatcher;
pub use error::{Error, Result};
pub use events::{EventStream, EventWaiter};
pub use host::{ActionExecutor, DeviceInfo, HostServices};
pub use scheduler::{ActionScheduler, MIN_ACTION_SPACING, SchedulerEvent};
pub use session::{
    CLOSE_NORMAL, CLOSE_REASON_STOPPED, RECONNECT_BACKOFF, SessionEvent, SessionManager,
    SessionState,
};
pub use transport::{
    Connector, Transport, TransportEvent, TransportParts, TransportReceiver, WebSocketConnector,
};
