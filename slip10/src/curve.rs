//! Per-curve parameters and the primitive operations derivation needs from each curve.
//!
//! Two short-Weierstrass curves (secp256k1, nist256p1) allow non-hardened and public
//! derivation. The two 25519 curves only allow hardened derivation, take any 32 bytes as a
//! private key, and serialize public keys as `0x00 || 32 bytes`.

use std::fmt;
use std::str::FromStr;

use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::elliptic_curve::{Field, PrimeField};
use secp256k1::{SECP256K1, Scalar};

use crate::Slip10Error;

/// Length of a serialized public key for every supported curve.
pub const PUBLIC_KEY_LEN: usize = 33;

pub type PrivateKeyBytes = [u8; 32];
pub type PublicKeyBytes = [u8; PUBLIC_KEY_LEN];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Curve {
    #[default]
    Secp256k1,
    Nist256p1,
    Ed25519,
    Curve25519,
}

impl Curve {
    pub const ALL: [Curve; 4] = [
        Curve::Secp256k1,
        Curve::Nist256p1,
        Curve::Ed25519,
        Curve::Curve25519,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Curve::Secp256k1 => "secp256k1",
            Curve::Nist256p1 => "nist256p1",
            Curve::Ed25519 => "ed25519",
            Curve::Curve25519 => "curve25519",
        }
    }

    /// HMAC key used to turn a seed into the master node.
    pub fn seed_label(self) -> &'static [u8] {
        match self {
            Curve::Secp256k1 => b"Bitcoin seed",
            Curve::Nist256p1 => b"Nist256p1 seed",
            Curve::Ed25519 => b"ed25519 seed",
            Curve::Curve25519 => b"curve25519 seed",
        }
    }

    /// Whether every child on this curve must be derived with a hardened index.
    pub fn hardened_only(self) -> bool {
        matches!(self, Curve::Ed25519 | Curve::Curve25519)
    }

    pub fn is_valid_private_key(self, key: &PrivateKeyBytes) -> bool {
        match self {
            Curve::Secp256k1 => secp256k1::SecretKey::from_slice(key).is_ok(),
            Curve::Nist256p1 => p256::SecretKey::from_bytes(&(*key).into()).is_ok(),
            Curve::Ed25519 | Curve::Curve25519 => true,
        }
    }

    pub fn is_valid_public_key(self, key: &PublicKeyBytes) -> bool {
        match self {
            Curve::Secp256k1 => secp256k1::PublicKey::from_slice(key).is_ok(),
            Curve::Nist256p1 => p256::PublicKey::from_sec1_bytes(key).is_ok(),
            Curve::Ed25519 => {
                let mut point = [0u8; 32];
                point.copy_from_slice(&key[1..]);
                key[0] == 0 && ed25519_dalek::VerifyingKey::from_bytes(&point).is_ok()
            }
            Curve::Curve25519 => key[0] == 0,
        }
    }

    /// Serialized public key belonging to `key`.
    pub fn public_key(self, key: &PrivateKeyBytes) -> Result<PublicKeyBytes, Slip10Error> {
        let invalid = || Slip10Error::InvalidInput(format!("invalid {} private key", self.name()));
        match self {
            Curve::Secp256k1 => {
                let secret = secp256k1::SecretKey::from_slice(key).map_err(|_| invalid())?;
                Ok(secp256k1::PublicKey::from_secret_key(SECP256K1, &secret).serialize())
            }
            Curve::Nist256p1 => {
                let secret = p256::SecretKey::from_bytes(&(*key).into()).map_err(|_| invalid())?;
                Ok(encode_p256(&secret.public_key()))
            }
            Curve::Ed25519 => {
                let signing = ed25519_dalek::SigningKey::from_bytes(key);
                Ok(prefixed(signing.verifying_key().to_bytes()))
            }
            Curve::Curve25519 => Ok(prefixed(x25519_dalek::x25519(
                *key,
                x25519_dalek::X25519_BASEPOINT_BYTES,
            ))),
        }
    }

    /// Child private key from the HMAC left half `il` and the parent key.
    ///
    /// Returns `None` when this `il` does not produce a valid key and derivation must retry.
    pub(crate) fn child_private_key(
        self,
        il: &PrivateKeyBytes,
        parent: &PrivateKeyBytes,
    ) -> Option<PrivateKeyBytes> {
        match self {
            Curve::Secp256k1 => {
                let tweak = Scalar::from_be_bytes(*il).ok()?;
                let parent = secp256k1::SecretKey::from_slice(parent).ok()?;
                parent.add_tweak(&tweak).ok().map(|k| k.secret_bytes())
            }
            Curve::Nist256p1 => {
                let tweak = p256_scalar(il)?;
                let sum = tweak + p256_scalar(parent)?;
                if bool::from(sum.is_zero()) {
                    return None;
                }
                let mut out = [0u8; 32];
                out.copy_from_slice(&sum.to_repr());
                Some(out)
            }
            Curve::Ed25519 | Curve::Curve25519 => Some(*il),
        }
    }

    /// Child public key obtained by adding `il * G` to the parent point.
    ///
    /// Returns `None` when `il` is out of range or the sum is the point at infinity.
    pub(crate) fn child_public_key(
        self,
        il: &PrivateKeyBytes,
        parent: &PublicKeyBytes,
    ) -> Option<PublicKeyBytes> {
        match self {
            Curve::Secp256k1 => {
                let tweak = Scalar::from_be_bytes(*il).ok()?;
                let parent = secp256k1::PublicKey::from_slice(parent).ok()?;
                parent
                    .add_exp_tweak(SECP256K1, &tweak)
                    .ok()
                    .map(|k| k.serialize())
            }
            Curve::Nist256p1 => {
                let tweak = p256_scalar(il)?;
                let parent = p256::PublicKey::from_sec1_bytes(parent).ok()?;
                let point = p256::ProjectivePoint::GENERATOR * tweak + parent.to_projective();
                let child = p256::PublicKey::from_affine(point.to_affine()).ok()?;
                Some(encode_p256(&child))
            }
            Curve::Ed25519 | Curve::Curve25519 => None,
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Curve {
    type Err = Slip10Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "secp256k1" => Ok(Curve::Secp256k1),
            "secp256r1" | "nist256p1" => Ok(Curve::Nist256p1),
            "ed25519" => Ok(Curve::Ed25519),
            "curve25519" => Ok(Curve::Curve25519),
            other => Err(Slip10Error::UnsupportedCurve(other.to_string())),
        }
    }
}

/// Big-endian scalar, or `None` at or above the group order.
fn p256_scalar(bytes: &PrivateKeyBytes) -> Option<p256::Scalar> {
    Option::from(p256::Scalar::from_repr((*bytes).into()))
}

fn encode_p256(key: &p256::PublicKey) -> PublicKeyBytes {
    let mut out = [0u8; PUBLIC_KEY_LEN];
    out.copy_from_slice(key.to_encoded_point(true).as_bytes());
    out
}

fn prefixed(key: [u8; 32]) -> PublicKeyBytes {
    let mut out = [0u8; PUBLIC_KEY_LEN];
    out[1..].copy_from_slice(&key);
    out
}
