// Device key material
//
// Each device holds one X25519 private key, the same key type WireGuard
// uses. The key is stored base64 encoded (standard alphabet, padded) so it
// can be handed to the tunnel backend unchanged. The public half is always
// derived from the private key, never stored.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use thiserror::Error;
use x25519_dalek::{PublicKey, StaticSecret};

/// Length in bytes of an X25519 key.
pub const KEY_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("key is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("key must be {KEY_LEN} bytes, got {0}")]
    Length(usize),
}

/// Generate a fresh private key, base64 encoded.
pub fn generate_private_key() -> String {
    let secret = StaticSecret::random_from_rng(OsRng);
    STANDARD.encode(secret.to_bytes())
}

/// Derive the base64 public key for a base64 private key.
pub fn public_key_for(private_key_b64: &str) -> Result<String, KeyError> {
    let secret = decode_secret(private_key_b64)?;
    let public = PublicKey::from(&secret);
    Ok(STANDARD.encode(public.as_bytes()))
}

fn decode_secret(private_key_b64: &str) -> Result<StaticSecret, KeyError> {
    let bytes = STANDARD.decode(private_key_b64.trim())?;
    let array: [u8; KEY_LEN] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| KeyError::Length(bytes.len()))?;
    Ok(StaticSecret::from(array))
}
