// Device table access

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::api::DeviceInfo;
use crate::device::keys::{self, KeyError};

/// This installation's identity. At most one row exists.
#[derive(Clone, PartialEq, Eq)]
pub struct Device {
    /// Generated once, stable until sign-out deletes the row
    pub unique_id: Uuid,
    pub name: String,
    /// OS version string
    pub version: String,
    pub arch: String,
    /// X25519 private key, base64
    pub private_key: String,
    /// Address assigned by the server at registration
    pub ipv4_address: Option<String>,
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("unique_id", &self.unique_id)
            .field("name", &self.name)
            .field("version", &self.version)
            .field("arch", &self.arch)
            .field("private_key", &"<redacted>")
            .field("ipv4_address", &self.ipv4_address)
            .finish()
    }
}

impl Device {
    pub fn public_key(&self) -> Result<String, KeyError> {
        keys::public_key_for(&self.private_key)
    }

    /// What the server needs to know about this device when adding it.
    pub fn device_info(&self) -> Result<DeviceInfo, KeyError> {
        Ok(DeviceInfo {
            unique_id: self.unique_id,
            name: self.name.clone(),
            version: self.version.clone(),
            arch: self.arch.clone(),
            public_key: self.public_key()?,
        })
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let raw_id: String = row.get(0)?;
        let unique_id = Uuid::parse_str(&raw_id)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
        Ok(Self {
            unique_id,
            name: row.get(1)?,
            version: row.get(2)?,
            arch: row.get(3)?,
            private_key: row.get(4)?,
            ipv4_address: row.get(5)?,
        })
    }
}

pub fn get(conn: &Connection) -> rusqlite::Result<Option<Device>> {
    conn.query_row(
        "SELECT unique_id, name, version, arch, private_key, ipv4_address
         FROM device WHERE id = 1",
        [],
        Device::from_row,
    )
    .optional()
}

/// Insert the device unless one already exists. Returns whether a row was
/// written.
pub fn insert_if_absent(conn: &Connection, device: &Device) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO device (id, unique_id, name, version, arch, private_key, ipv4_address)
         VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            device.unique_id.to_string(),
            device.name,
            device.version,
            device.arch,
            device.private_key,
            device.ipv4_address,
        ],
    )?;
    Ok(changed == 1)
}

/// Overwrite the stored device. Fails with `QueryReturnedNoRows` if there is
/// no device, or if the stored device has a different unique id.
pub fn update(conn: &Connection, device: &Device) -> rusqlite::Result<()> {
    let changed = conn.execute(
        "UPDATE device
         SET name = ?2, version = ?3, arch = ?4, private_key = ?5, ipv4_address = ?6
         WHERE id = 1 AND unique_id = ?1",
        params![
            device.unique_id.to_string(),
            device.name,
            device.version,
            device.arch,
            device.private_key,
            device.ipv4_address,
        ],
    )?;
    if changed != 1 {
        return Err(rusqlite::Error::QueryReturnedNoRows);
    }
    Ok(())
}

/// Returns whether a row was deleted.
pub fn delete(conn: &Connection) -> rusqlite::Result<bool> {
    Ok(conn.execute("DELETE FROM device WHERE id = 1", [])? == 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_private_key() {
        let private_key = keys::generate_private_key();
        let d = Device {
            unique_id: Uuid::new_v4(),
            name: "Linux test-host".to_string(),
            version: "6.1".to_string(),
            arch: "x86_64".to_string(),
            private_key: private_key.clone(),
            ipv4_address: Some("10.8.0.7".to_string()),
        };
        let printed = format!("{:?}", d);
        assert!(printed.contains("10.8.0.7"));
        assert!(!printed.contains(&private_key));
    }
}
