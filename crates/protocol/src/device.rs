//! Device identity snapshot sent once per successful connect.

use serde::{Deserialize, Serialize};

/// Battery level reported when the host cannot read a real percentage.
pub const BATTERY_UNKNOWN: i32 = -1;

/// Identity and state of the device, reported to the controller as the
/// first outbound frame after every successful open.
///
/// All fields are best-effort: string fields fall back to the empty string
/// and `battery` to [`BATTERY_UNKNOWN`] when collection fails. The snapshot
/// is sent bare (no `type` tag) and the `android_id` wire name is kept for
/// controller compatibility; it carries whatever stable hardware identifier
/// the host platform exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    /// Human-facing device identifier (model or host name)
    pub device_id: String,
    /// Stable platform hardware identifier
    pub android_id: String,
    /// Local network address, dotted quad
    pub ip: String,
    /// Battery percentage, `-1` when unknown
    pub battery: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snapshot_wire_shape() {
        let snapshot = DeviceSnapshot {
            device_id: "pixel-7".to_string(),
            android_id: "a1b2c3".to_string(),
            ip: "192.168.1.20".to_string(),
            battery: 87,
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            value,
            json!({"device_id": "pixel-7", "android_id": "a1b2c3", "ip": "192.168.1.20", "battery": 87})
        );
    }

    #[test]
    fn snapshot_tolerates_failed_collection() {
        let snapshot: DeviceSnapshot = serde_json::from_value(json!({
            "device_id": "", "android_id": "", "ip": "", "battery": BATTERY_UNKNOWN
        }))
        .unwrap();
        assert_eq!(snapshot.battery, BATTERY_UNKNOWN);
        assert!(snapshot.device_id.is_empty());
    }
}
