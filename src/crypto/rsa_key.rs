//! RSA key operations.
//!
//! Keys are generated with the pure-Rust `rsa` crate and handed to rcgen as
//! PKCS#8 so both CA and leaf certificates are signed with RSA/SHA-256.

use crate::error::{Result, VarsGenError};
use rand::rngs::{OsRng, StdRng};
use rand::{CryptoRng, RngCore, SeedableRng};
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use std::fmt;

/// Modulus size used for every key the generator creates.
pub const KEY_BITS: usize = 2048;

/// An RSA private key (the public half is derived from it).
#[derive(Clone)]
pub struct RsaKeypair {
    secret: RsaPrivateKey,
}

impl fmt::Debug for RsaKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaKeypair")
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}

impl RsaKeypair {
    /// Wrap an existing private key.
    pub fn from_secret(secret: RsaPrivateKey) -> Self {
        Self { secret }
    }

    /// Size of the modulus in bits.
    pub fn bits(&self) -> usize {
        self.secret.size() * 8
    }

    /// Export the private key as PKCS#1 PEM (`RSA PRIVATE KEY`).
    pub fn private_key_pem(&self) -> Result<String> {
        let pem = self
            .secret
            .to_pkcs1_pem(LineEnding::LF)
            .map_err(|e| VarsGenError::CryptoError(format!("export private key: {}", e)))?;
        Ok(pem.to_string())
    }

    /// Export the private key as PKCS#8 PEM (`PRIVATE KEY`).
    pub fn pkcs8_pem(&self) -> Result<String> {
        let pem = self
            .secret
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| VarsGenError::CryptoError(format!("encode pkcs#8: {}", e)))?;
        Ok(pem.to_string())
    }

    /// Convert into an rcgen key pair usable for signing.
    pub fn to_signing_key(&self) -> Result<rcgen::KeyPair> {
        let pem = self.pkcs8_pem()?;
        rcgen::KeyPair::from_pem(&pem)
            .map_err(|e| VarsGenError::CryptoError(format!("convert keypair: {}", e)))
    }
}

/// Generate a new RSA key from the operating system's random source.
///
/// Anything below [`KEY_BITS`] is refused.
///
/// # Example
///
/// ```no_run
/// use varsgen::crypto::rsa_key::{generate_rsa_keypair, KEY_BITS};
///
/// let keypair = generate_rsa_keypair(KEY_BITS).unwrap();
/// assert_eq!(keypair.bits(), 2048);
/// ```
pub fn generate_rsa_keypair(bits: usize) -> Result<RsaKeypair> {
    generate_rsa_keypair_with(&mut OsRng, bits)
}

/// Generate a new RSA key from the given random source.
///
/// If the source fails at any point the key is discarded and the call
/// returns [`VarsGenError::EntropyError`].
pub fn generate_rsa_keypair_with<R: RngCore + CryptoRng + ?Sized>(
    rng: &mut R,
    bits: usize,
) -> Result<RsaKeypair> {
    if bits < KEY_BITS {
        return Err(VarsGenError::CryptoError(format!(
            "rsa keys must be at least {} bits, got {}",
            KEY_BITS, bits
        )));
    }

    let mut rng = FailureRecordingRng::new(rng);
    let secret = RsaPrivateKey::new(&mut rng, bits);
    if let Some(e) = rng.failure {
        return Err(VarsGenError::EntropyError(e.to_string()));
    }
    let secret = secret.map_err(|e| {
        VarsGenError::CryptoError(format!("generate {}-bit rsa key: {}", bits, e))
    })?;

    Ok(RsaKeypair::from_secret(secret))
}

/// Reads from `inner` through `try_fill_bytes` only. After the first
/// failure it remembers the error and serves bytes from a fixed-seed
/// generator so the computation in progress can finish; anything derived
/// from those bytes must be thrown away.
struct FailureRecordingRng<'a, R: ?Sized> {
    inner: &'a mut R,
    fallback: Option<StdRng>,
    failure: Option<rand::Error>,
}

impl<'a, R: RngCore + ?Sized> FailureRecordingRng<'a, R> {
    fn new(inner: &'a mut R) -> Self {
        Self {
            inner,
            fallback: None,
            failure: None,
        }
    }
}

impl<R: RngCore + ?Sized> RngCore for FailureRecordingRng<'_, R> {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if let Some(fallback) = self.fallback.as_mut() {
            fallback.fill_bytes(dest);
            return;
        }
        if let Err(e) = self.inner.try_fill_bytes(dest) {
            let mut fallback = StdRng::seed_from_u64(0);
            fallback.fill_bytes(dest);
            self.fallback = Some(fallback);
            self.failure = Some(e);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl<R: CryptoRng + ?Sized> CryptoRng for FailureRecordingRng<'_, R> {}
