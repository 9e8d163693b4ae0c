use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

/// An HMAC-SHA256 key that is zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    /// Creates a new `SigningKey` from raw key bytes.
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self(key.into())
    }

    /// Signs `message` and returns the lowercase hex-encoded MAC.
    pub fn sign_hex(&self, message: &[u8]) -> String {
        self.sign_parts_hex(&[message])
    }

    /// Signs the concatenation of `parts` without building it in memory first.
    pub fn sign_parts_hex(&self, parts: &[&[u8]]) -> String {
        // HMAC accepts keys of any length, so this never fails.
        let mut mac =
            HmacSha256::new_from_slice(&self.0).expect("HMAC-SHA256 accepts any key size");
        for part in parts {
            mac.update(part);
        }
        hex::encode(mac.finalize().into_bytes())
    }
}

/// Compares two byte strings without short-circuiting on the first mismatch.
///
/// Only the lengths may leak; both sides here are fixed-width hex digests
/// or public-length secrets.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
