//! Cryptographic primitives for the commit-reveal protocol.

mod commitment;

pub use commitment::{Commitment, Secret};
