//! Random secret generation.
//!
//! Passwords are 16 bytes from the operating system's CSPRNG, encoded with
//! the URL-safe base64 alphabet without padding so they can be dropped into
//! YAML unquoted.

use crate::error::{Result, VarsGenError};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes behind every generated secret.
pub const PASSWORD_ENTROPY_BYTES: usize = 16;

/// Generate a random password from the operating system's random source.
///
/// # Example
///
/// ```
/// use varsgen::crypto::password::generate_password;
///
/// let password = generate_password().unwrap();
/// assert!(!password.is_empty());
/// ```
pub fn generate_password() -> Result<String> {
    generate_password_with(&mut OsRng)
}

/// Generate a random password from the given random source.
///
/// Leading and trailing `-` / `_` are stripped from the encoded text. If
/// the source cannot deliver bytes the call fails instead of falling back
/// to weaker output.
pub fn generate_password_with<R: RngCore + ?Sized>(rng: &mut R) -> Result<String> {
    let mut bytes = [0u8; PASSWORD_ENTROPY_BYTES];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|e| VarsGenError::EntropyError(e.to_string()))?;

    let encoded = URL_SAFE_NO_PAD.encode(bytes);
    let trimmed = encoded.trim_matches(|c| c == '-' || c == '_');
    if trimmed.is_empty() {
        return Err(VarsGenError::EntropyError(
            "random bytes encoded to an empty password".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}
