use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::models::Device;

/// In-memory device collection, keyed by caller-supplied IDs.
///
/// Reads register unknown IDs as a side effect (see
/// [`DeviceStore::get_or_insert_on_miss`]); writes do not.  Slots are never
/// deleted, so the ID set only grows.
#[derive(Clone)]
pub struct DeviceStore {
    devices: Arc<RwLock<Vec<Device>>>,
}

impl DeviceStore {
    /// Create a store seeded with the zero-valued device 0.
    pub fn new() -> Self {
        Self {
            devices: Arc::new(RwLock::new(vec![Device {
                id: 0,
                value: 0,
                text: String::new(),
            }])),
        }
    }

    /// Snapshot of every device slot, in insertion order.
    pub async fn list(&self) -> Vec<Device> {
        self.devices.read().await.clone()
    }

    /// Look up a device by ID, inserting a zero-valued slot when absent.
    ///
    /// Returns the (possibly just created) slot plus whether it existed
    /// before the call.  The insert-on-miss is part of the read contract:
    /// polling hardware registers itself by asking for its own ID, and the
    /// next read of the same ID finds the slot.
    pub async fn get_or_insert_on_miss(&self, id: i64) -> (bool, Device) {
        let mut devices = self.devices.write().await;

        if let Some(existing) = devices.iter().find(|device| device.id == id) {
            return (true, existing.clone());
        }

        let device = Device {
            id,
            value: 0,
            text: String::new(),
        };
        devices.push(device.clone());
        debug!(id, "Registered device slot on read miss");

        (false, device)
    }

    /// Overwrite a device's value and text in place, reporting whether the
    /// slot existed.
    ///
    /// Unlike the getters this does NOT insert on miss: a command for an
    /// unknown device is dropped.  The asymmetry is deliberate and kept at
    /// this one seam so it can be revisited without touching call sites.
    pub async fn set_command(&self, id: i64, value: i64, text: &str) -> bool {
        let mut devices = self.devices.write().await;

        if let Some(device) = devices.iter_mut().find(|device| device.id == id) {
            device.value = value;
            device.text = text.to_string();
            debug!(id, value, "Applied device command");
            return true;
        }

        false
    }
}

impl Default for DeviceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_with_device_zero() {
        let store = DeviceStore::new();
        let devices = store.list().await;
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].id, 0);
        assert_eq!(devices[0].value, 0);
    }

    #[tokio::test]
    async fn test_read_miss_registers_the_slot() {
        let store = DeviceStore::new();

        let (found, device) = store.get_or_insert_on_miss(99).await;
        assert!(!found);
        assert_eq!(device.id, 99);
        assert_eq!(device.value, 0);

        let devices = store.list().await;
        assert!(devices.iter().any(|d| d.id == 99 && d.value == 0));

        // Second read finds the slot the first one created.
        let (found, _) = store.get_or_insert_on_miss(99).await;
        assert!(found);
    }

    #[tokio::test]
    async fn test_set_command_overwrites_in_place() {
        let store = DeviceStore::new();

        assert!(store.set_command(0, 5, "hi").await);

        let (found, device) = store.get_or_insert_on_miss(0).await;
        assert!(found);
        assert_eq!(device.value, 5);
        assert_eq!(device.text, "hi");
    }

    #[tokio::test]
    async fn test_set_command_does_not_insert_on_miss() {
        let store = DeviceStore::new();

        assert!(!store.set_command(99, 5, "hi").await);
        assert!(store.list().await.iter().all(|d| d.id != 99));
    }
}
