//! Commitment and Secret for the commit-reveal scheme.

use crate::address::Address;
use crate::game::Hand;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Secret value chosen by the owner at commit time
#[derive(Clone, Serialize, Deserialize)]
pub struct Secret([u8; 32]);

impl Secret {
    /// Create a new random secret
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({})", hex::encode(&self.0[..8]))
    }
}

/// Commitment = H(owner || hand || secret)
///
/// Binds the committing owner's identity, its hand, and a secret to a
/// single digest published before the opponent acts.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment([u8; 32]);

impl Commitment {
    /// Build the digest for an owner, hand, and secret
    pub fn bind(owner: &Address, hand: Hand, secret: &Secret) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(owner.as_bytes());
        hasher.update(hand.tag());
        hasher.update(secret.as_bytes());
        let result = hasher.finalize();
        Self(result.into())
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Exact-hand verify: recompute with the claimed hand and compare
    pub fn matches(&self, owner: &Address, hand: Hand, secret: &Secret) -> bool {
        *self == Self::bind(owner, hand, secret)
    }

    /// Blind verify: try every hand in the domain, return the one that
    /// reproduces this digest, or `None` if the secret fits no hand
    pub fn reveal(&self, owner: &Address, secret: &Secret) -> Option<Hand> {
        Hand::ALL
            .into_iter()
            .find(|hand| self.matches(owner, *hand, secret))
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
