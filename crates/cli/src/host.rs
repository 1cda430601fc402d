//! Host integrations backed by the local system.
//!
//! These implement the runtime's device traits for a plain Linux host:
//! identity from the hostname and machine id, the address from a routing
//! lookup, battery from sysfs. Every probe is best-effort; a device that
//! cannot answer still connects and reports placeholder values.

use std::fs;
use std::net::UdpSocket;
use std::path::Path;
use std::process::Command;

use tracing::{info, warn};

use tether_protocol::BATTERY_UNKNOWN;
use tether_runtime::{ActionExecutor, DeviceInfo, HostServices};

/// Identity and status probes for the machine the agent runs on.
pub struct SystemDeviceInfo {
    device_id: Option<String>,
}

impl SystemDeviceInfo {
    /// `device_id` overrides the hostname when set.
    pub fn new(device_id: Option<String>) -> Self {
        Self { device_id }
    }
}

impl DeviceInfo for SystemDeviceInfo {
    fn device_identifier(&self) -> String {
        if let Some(id) = &self.device_id {
            return id.clone();
        }
        hostname().unwrap_or_else(|| "unknown".to_string())
    }

    fn hardware_id(&self) -> String {
        machine_id(Path::new("/etc/machine-id")).unwrap_or_else(|| "unknown".to_string())
    }

    fn local_address(&self) -> String {
        local_address().unwrap_or_else(|| "0.0.0.0".to_string())
    }

    fn battery_level(&self) -> i32 {
        battery_percent(Path::new("/sys/class/power_supply")).unwrap_or(BATTERY_UNKNOWN)
    }
}

fn hostname() -> Option<String> {
    let mut buf = [0u8; 256];
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast::<libc::c_char>(), buf.len()) };
    if rc != 0 {
        return None;
    }
    let end = buf.iter().position(|&b| b == 0)?;
    let name = String::from_utf8(buf[..end].to_vec()).ok()?;
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

fn machine_id(path: &Path) -> Option<String> {
    let raw = fs::read_to_string(path).ok()?;
    let id = raw.trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

fn local_address() -> Option<String> {
    // Routing lookup only; connect() on UDP sends no packets.
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    Some(socket.local_addr().ok()?.ip().to_string())
}

/// First readable `capacity` value under `root`, as a percentage.
fn battery_percent(root: &Path) -> Option<i32> {
    for entry in fs::read_dir(root).ok()? {
        let Ok(entry) = entry else { continue };
        let capacity = entry.path().join("capacity");
        let Ok(raw) = fs::read_to_string(&capacity) else {
            continue;
        };
        if let Ok(level) = raw.trim().parse::<i32>() {
            return Some(level);
        }
    }
    None
}

/// Launches commands as the "application" surface of this host.
pub struct ProcessLauncher;

impl HostServices for ProcessLauncher {
    fn launch_application(&self, package: &str) -> bool {
        match Command::new(package).spawn() {
            Ok(child) => {
                info!(target: "tether.host", pid = child.id(), command = %package, "application launched");
                true
            }
            Err(e) => {
                warn!(target: "tether.host", command = %package, error = %e, "launch failed");
                false
            }
        }
    }

    fn show_transient_message(&self, text: &str) {
        // No display surface here; the log is the toast.
        info!(target: "tether.host", %text, "toast");
    }
}

/// Stands in for a pointer driver on hosts without one. Records each tap
/// in the log and reports it as dispatched.
pub struct LoggedTapExecutor;

impl ActionExecutor for LoggedTapExecutor {
    fn execute(&self, x: f32, y: f32) -> bool {
        info!(target: "tether.host", x, y, "tap dispatched");
        true
    }
}
