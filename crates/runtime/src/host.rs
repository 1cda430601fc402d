//! External collaborator interfaces.
//!
//! The runtime drives the host platform through these traits; the embedding
//! binary supplies implementations (see `tether-cli` for desktop reference
//! implementations). All of them are small wrappers around platform
//! capabilities and are intentionally synchronous.

use tether_protocol::DeviceSnapshot;

/// Best-effort device identity collection.
///
/// String getters return the empty string when collection fails;
/// `battery_level` returns `-1` (`BATTERY_UNKNOWN`). A failing getter must
/// never panic or block for long: the snapshot is assembled on the session's
/// connect path.
pub trait DeviceInfo: Send + Sync {
    /// Human-facing device identifier (model or host name).
    fn device_identifier(&self) -> String;

    /// Stable platform hardware identifier.
    fn hardware_id(&self) -> String;

    /// Local network address, dotted quad.
    fn local_address(&self) -> String;

    /// Battery percentage, `-1` when unavailable.
    fn battery_level(&self) -> i32;

    /// Assembles the snapshot sent to the controller after every open.
    fn snapshot(&self) -> DeviceSnapshot {
        DeviceSnapshot {
            device_id: self.device_identifier(),
            android_id: self.hardware_id(),
            ip: self.local_address(),
            battery: self.battery_level(),
        }
    }
}

/// Host-level side effects invoked by command handlers.
pub trait HostServices: Send + Sync {
    /// Launches an application by package or program identifier.
    ///
    /// Returns whether the launch attempt was started; the command layer
    /// turns `false` into a failed ack, not an error.
    fn launch_application(&self, package: &str) -> bool;

    /// Shows a short-lived, non-blocking message to the device user.
    fn show_transient_message(&self, text: &str);
}

/// The single capability to perform one pointer action against the host
/// display.
///
/// Only ever invoked from the scheduler's timer task, one call at a time, so
/// implementations need no internal locking. The return value reports
/// whether the gesture was dispatched to the platform, not whether it had
/// any effect; dispatch is fire-and-forget.
pub trait ActionExecutor: Send + Sync {
    /// Performs one tap at `(x, y)`.
    fn execute(&self, x: f32, y: f32) -> bool;
}
