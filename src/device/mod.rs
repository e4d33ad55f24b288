// Device module — identity and key material.
//
// Every installation is a device with:
//   - A UUID generated on first use
//   - An X25519 keypair (private half stored, public half derived)
//   - Host metadata (name, OS version, arch)
//
// The row is stored in the local database; see `store::device`.

pub mod identity;
pub mod keys;

pub use identity::{DeviceIdentity, DeviceProfile};
