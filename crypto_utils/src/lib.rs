//! Hashing, HMAC and base58 primitives shared by the key-derivation crates.

pub mod base58;
pub mod hash;
pub mod hmac;
