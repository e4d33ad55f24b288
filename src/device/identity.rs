// Device identity — one keypair per installation.
//
// The identity row is created lazily the first time something needs it and
// lives until sign-out deletes it. After a sign-out the next call creates a
// brand new identity with a new UUID and key.

use sysinfo::System;
use uuid::Uuid;

use super::keys;
use crate::errors::{Result, VpnError};
use crate::store::{Device, Store};

/// Host metadata recorded on the device row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProfile {
    /// Human-readable name (OS name + hostname)
    pub name: String,
    /// OS version
    pub version: String,
    /// CPU architecture
    pub arch: String,
}

impl DeviceProfile {
    /// Describe the machine we are running on.
    pub fn detect() -> Self {
        let host = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "unknown-host".to_string());
        let os = System::name().unwrap_or_else(|| std::env::consts::OS.to_string());

        Self {
            name: format!("{} {}", os, host),
            version: System::os_version().unwrap_or_else(|| "UNKNOWN".to_string()),
            arch: std::env::consts::ARCH.to_string(),
        }
    }
}

/// Creates the device row when missing.
#[derive(Clone)]
pub struct DeviceIdentity {
    store: Store,
    profile: DeviceProfile,
}

impl DeviceIdentity {
    pub fn new(store: Store, profile: DeviceProfile) -> Self {
        Self { store, profile }
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Make sure exactly one device row exists and return it.
    ///
    /// A no-op when the row is already there, so it is safe to call before
    /// every registration attempt.
    pub async fn ensure_device_exists(&self) -> Result<Device> {
        if let Some(device) = self.store.get_device().await? {
            tracing::info!(
                "Device already initialized ipv4 {}",
                device.ipv4_address.as_deref().unwrap_or("<unassigned>")
            );
            return Ok(device);
        }

        tracing::info!("Initializing device");
        let candidate = self.generate();
        if self.store.insert_device_if_absent(&candidate).await? {
            tracing::info!(
                unique_id = %candidate.unique_id,
                name = %candidate.name,
                version = %candidate.version,
                arch = %candidate.arch,
                "New device created"
            );
        }

        // Another caller may have won the insert; the stored row is the truth.
        match self.store.get_device().await? {
            Some(device) => Ok(device),
            None => {
                tracing::error!("Device row missing right after insert");
                Err(VpnError::Invariant("device row missing right after insert"))
            }
        }
    }

    fn generate(&self) -> Device {
        Device {
            unique_id: Uuid::new_v4(),
            name: self.profile.name.clone(),
            version: self.profile.version.clone(),
            arch: self.profile.arch.clone(),
            private_key: keys::generate_private_key(),
            ipv4_address: None,
        }
    }
}
