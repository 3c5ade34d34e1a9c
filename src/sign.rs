//! HMAC-SHA256 tags for invoice webhook payloads.
//!
//! The invoice service authenticates each webhook delivery with a
//! `BTCPAY-SIG: sha256=<hex>` header, computed over the raw body bytes with
//! the shared secret. This module produces that tag on the sender side.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// A 32-byte HMAC-SHA256 authentication tag.
///
/// Displays as lowercase hex, the form that goes on the wire.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Digest([u8; 32]);

impl Digest {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The `sha256=<hex>` form carried in the `BTCPAY-SIG` header.
    pub fn sig_header(&self) -> String {
        format!("sha256={}", self.to_hex())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

/// Signs webhook bodies with a shared secret.
pub struct WebhookSigner {
    key: Vec<u8>,
}

impl WebhookSigner {
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    /// Computes the tag over the raw body bytes. Deterministic: the same
    /// (key, body) bytes always produce the same tag.
    pub fn sign(&self, body: &[u8]) -> Digest {
        sign(&self.key, body)
    }
}

/// One-shot signing without constructing a [`WebhookSigner`].
pub fn sign(key: &[u8], body: &[u8]) -> Digest {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take a key of any size");
    mac.update(body);
    Digest(mac.finalize().into_bytes().into())
}
