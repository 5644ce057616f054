//! License key generation.
//!
//! Keys are 32 bytes from the operating system CSPRNG, encoded as URL-safe
//! base64 without padding (43 characters, 256 bits of entropy).

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;

/// Raw key length in bytes
const KEY_BYTES: usize = 32;

/// Encoded key length in characters
pub const KEY_LEN: usize = 43;

/// Generate a new opaque license key.
///
/// Panics only if the OS random source is unavailable, which is fatal anyway.
pub fn generate_key() -> String {
    let mut bytes = [0u8; KEY_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
