//! SLIP-0010 hierarchical deterministic key derivation for secp256k1, nist256p1, ed25519 and
//! curve25519, with BIP-32 extended key serialization.

pub mod ckd;
pub mod curve;
pub mod derivation;
pub mod error;
pub mod extended_key;
pub mod node;

/// Index offset for hardened children, 2^31.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

pub type ChainCode = [u8; 32];
pub type Fingerprint = [u8; 4];

pub use curve::Curve;
pub use derivation::{DerivationPath, IntoDerivationPath};
pub use error::{DecodeError, Slip10Error};
pub use extended_key::{ExtendedKeyFields, KeyKind, Network};
pub use node::Node;
