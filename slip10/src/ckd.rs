//! Master key generation and child key derivation (CKD) as defined by SLIP-0010.
//!
//! Both operations run HMAC-SHA512 and split the output into `IL` (key material) and `IR`
//! (chain code). When `IL` does not yield a valid key for the curve the HMAC is re-run over the
//! failed output: the whole 64 bytes for the master key, `0x01 || IR || index` for a child. The
//! loops stop after [`MAX_DERIVATION_ATTEMPTS`] with [`Slip10Error::DerivationExhausted`].

use crypto_utils::hmac::hmac_sha512;
use log::debug;

use crate::curve::{Curve, PrivateKeyBytes, PublicKeyBytes};
use crate::{ChainCode, HARDENED_OFFSET, Slip10Error};

/// Upper bound on HMAC rounds spent looking for a valid key.
pub const MAX_DERIVATION_ATTEMPTS: u32 = 256;

pub fn is_hardened(index: u32) -> bool {
    index >= HARDENED_OFFSET
}

fn split_halves(i: &[u8; 64]) -> (PrivateKeyBytes, ChainCode) {
    let mut il = [0u8; 32];
    let mut ir = [0u8; 32];
    il.copy_from_slice(&i[..32]);
    ir.copy_from_slice(&i[32..]);
    (il, ir)
}

/// Private key and chain code of the master node for `seed`.
pub fn master_key(curve: Curve, seed: &[u8]) -> Result<(PrivateKeyBytes, ChainCode), Slip10Error> {
    master_key_with(curve, seed, |il| curve.is_valid_private_key(il))
}

/// Runs the master HMAC until `accept` takes `IL`, re-hashing the full output on rejection.
fn master_key_with(
    curve: Curve,
    seed: &[u8],
    accept: impl Fn(&PrivateKeyBytes) -> bool,
) -> Result<(PrivateKeyBytes, ChainCode), Slip10Error> {
    let mut i = hmac_sha512(curve.seed_label(), seed);
    for attempt in 1..=MAX_DERIVATION_ATTEMPTS {
        let (il, ir) = split_halves(&i);
        if accept(&il) {
            return Ok((il, ir));
        }
        debug!("{curve} master key candidate {attempt} invalid, re-hashing");
        i = hmac_sha512(curve.seed_label(), &i);
    }
    Err(Slip10Error::DerivationExhausted(MAX_DERIVATION_ATTEMPTS))
}

/// HMAC input for the first derivation attempt of `index`.
fn ckd_data(key_data: &[u8], index: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(key_data.len() + 4);
    data.extend_from_slice(key_data);
    data.extend_from_slice(&index.to_be_bytes());
    data
}

/// HMAC input for a retry of `index` after `ir` failed.
fn retry_data(ir: &ChainCode, index: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(1 + 32 + 4);
    data.push(0x01);
    data.extend_from_slice(ir);
    data.extend_from_slice(&index.to_be_bytes());
    data
}

/// Runs the HMAC for `index` until `accept` returns a key, chaining retries through `IR`.
fn derive_with_retry<K>(
    curve: Curve,
    chain_code: &ChainCode,
    mut data: Vec<u8>,
    index: u32,
    accept: impl Fn(&PrivateKeyBytes) -> Option<K>,
) -> Result<(K, ChainCode), Slip10Error> {
    for attempt in 1..=MAX_DERIVATION_ATTEMPTS {
        let (il, ir) = split_halves(&hmac_sha512(chain_code, &data));
        if let Some(key) = accept(&il) {
            return Ok((key, ir));
        }
        debug!("{curve} child {index:#010x}: attempt {attempt} gave an invalid key, retrying");
        data = retry_data(&ir, index);
    }
    Err(Slip10Error::DerivationExhausted(MAX_DERIVATION_ATTEMPTS))
}

/// Private child derivation (CKDpriv).
///
/// Hardened indices hash `0x00 || parent_private`, non-hardened ones hash the parent public key.
/// Callers check beforehand that `index` is allowed on `curve`.
pub fn derive_private(
    curve: Curve,
    chain_code: &ChainCode,
    parent_private: &PrivateKeyBytes,
    parent_public: &PublicKeyBytes,
    index: u32,
) -> Result<(PrivateKeyBytes, ChainCode), Slip10Error> {
    let data = if is_hardened(index) {
        let mut key_data = [0u8; 33];
        key_data[1..].copy_from_slice(parent_private);
        ckd_data(&key_data, index)
    } else {
        ckd_data(parent_public, index)
    };
    derive_with_retry(curve, chain_code, data, index, |il| {
        curve.child_private_key(il, parent_private)
    })
}

/// Public child derivation (CKDpub), non-hardened indices only.
pub fn derive_public(
    curve: Curve,
    chain_code: &ChainCode,
    parent_public: &PublicKeyBytes,
    index: u32,
) -> Result<(PublicKeyBytes, ChainCode), Slip10Error> {
    if is_hardened(index) {
        return Err(Slip10Error::PrivateDerivation(
            "hardened derivation requires a private key",
        ));
    }
    if curve.hardened_only() {
        return Err(Slip10Error::InvalidPath(format!(
            "{curve} only supports hardened derivation"
        )));
    }
    let data = ckd_data(parent_public, index);
    derive_with_retry(curve, chain_code, data, index, |il| {
        curve.child_public_key(il, parent_public)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const SEED_1: [u8; 16] = hex!("000102030405060708090a0b0c0d0e0f");

    #[test]
    fn master_keys_for_seed_1() {
        let cases = [
            (
                Curve::Secp256k1,
                hex!("e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"),
                hex!("873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"),
            ),
            (
                Curve::Nist256p1,
                hex!("612091aaa12e22dd2abef664f8a01a82cae99ad7441b7ef8110424915c268bc2"),
                hex!("beeb672fe4621673f722f38529c07392fecaa61015c80c34f29ce8b41b3cb6ea"),
            ),
            (
                Curve::Ed25519,
                hex!("2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7"),
                hex!("90046a93de5380a72b5e45010748567d5ea02bbf6522f979e05c0d8d8ca9fffb"),
            ),
            (
                Curve::Curve25519,
                hex!("d70a59c2e68b836cc4bbe8bcae425169b9e2384f3905091e3d60b890e90cd92c"),
                hex!("77997ca3588a1a34f3589279ea2962247abfe5277d52770a44c706378c710768"),
            ),
        ];
        for (curve, private_key, chain_code) in cases {
            assert_eq!(master_key(curve, &SEED_1).unwrap(), (private_key, chain_code), "{curve}");
        }
    }

    /// The first HMAC output for this seed is not a valid nist256p1 scalar.
    #[test]
    fn master_key_retry() {
        let seed = hex!("a7305bc8df8d0951f0cb224c0e95d7707cbdf2c6ce7e8d481fec69c7ff5e9446");
        let first = hmac_sha512(Curve::Nist256p1.seed_label(), &seed);
        let (il, _) = split_halves(&first);
        assert!(!Curve::Nist256p1.is_valid_private_key(&il));

        let (private_key, chain_code) = master_key(Curve::Nist256p1, &seed).unwrap();
        assert_eq!(
            private_key,
            hex!("3b8c18469a4634517d6d0b65448f8e6c62091b45540a1743c5846be55d47d88f")
        );
        assert_eq!(
            chain_code,
            hex!("7762f9729fed06121fd13f326884c82f59aa95c57ac492ce8c9654e60efd130c")
        );
    }

    #[test]
    fn hardened_private_child() {
        let (private_key, chain_code) = master_key(Curve::Secp256k1, &SEED_1).unwrap();
        let public_key = Curve::Secp256k1.public_key(&private_key).unwrap();
        let (child, child_chain) = derive_private(
            Curve::Secp256k1,
            &chain_code,
            &private_key,
            &public_key,
            HARDENED_OFFSET,
        )
        .unwrap();
        assert_eq!(
            child,
            hex!("edb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea")
        );
        assert_eq!(
            child_chain,
            hex!("47fdacbd0f1097043b78c63c20c34ef4ed9a111d980047ad16282c7ae6236141")
        );
    }

    #[test]
    fn public_derivation_matches_private() {
        for curve in [Curve::Secp256k1, Curve::Nist256p1] {
            let (private_key, chain_code) = master_key(curve, &SEED_1).unwrap();
            let public_key = curve.public_key(&private_key).unwrap();
            for index in [0, 1, 42, HARDENED_OFFSET - 1] {
                let (child_private, chain_a) =
                    derive_private(curve, &chain_code, &private_key, &public_key, index).unwrap();
                let (child_public, chain_b) =
                    derive_public(curve, &chain_code, &public_key, index).unwrap();
                assert_eq!(chain_a, chain_b);
                assert_eq!(curve.public_key(&child_private).unwrap(), child_public);
            }
        }
    }

    #[test]
    fn public_derivation_restrictions() {
        let (private_key, chain_code) = master_key(Curve::Secp256k1, &SEED_1).unwrap();
        let public_key = Curve::Secp256k1.public_key(&private_key).unwrap();
        assert!(matches!(
            derive_public(Curve::Secp256k1, &chain_code, &public_key, HARDENED_OFFSET),
            Err(Slip10Error::PrivateDerivation(_))
        ));

        let (private_key, chain_code) = master_key(Curve::Ed25519, &SEED_1).unwrap();
        let public_key = Curve::Ed25519.public_key(&private_key).unwrap();
        assert!(matches!(
            derive_public(Curve::Ed25519, &chain_code, &public_key, 0),
            Err(Slip10Error::InvalidPath(_))
        ));
    }

    #[test]
    fn master_retry_is_capped() {
        assert_eq!(
            master_key_with(Curve::Nist256p1, &SEED_1, |_| false),
            Err(Slip10Error::DerivationExhausted(MAX_DERIVATION_ATTEMPTS))
        );
        // Accepting on the second candidate gives the key a single re-hash produces
        let first = hmac_sha512(Curve::Nist256p1.seed_label(), &SEED_1);
        let (il, ir) = split_halves(&hmac_sha512(Curve::Nist256p1.seed_label(), &first));
        let calls = std::cell::Cell::new(0);
        let accept_second = |_: &PrivateKeyBytes| {
            calls.set(calls.get() + 1);
            calls.get() == 2
        };
        assert_eq!(
            master_key_with(Curve::Nist256p1, &SEED_1, accept_second),
            Ok((il, ir))
        );
    }

    #[test]
    fn child_retry_is_capped() {
        let data = ckd_data(&[0u8; 33], 0);
        assert_eq!(
            derive_with_retry(Curve::Secp256k1, &[0u8; 32], data, 0, |_| None::<()>),
            Err(Slip10Error::DerivationExhausted(MAX_DERIVATION_ATTEMPTS))
        );
    }

    #[test]
    fn retry_data_layout() {
        let ir = [0xab; 32];
        let data = retry_data(&ir, HARDENED_OFFSET + 5);
        assert_eq!(data.len(), 37);
        assert_eq!(data[0], 0x01);
        assert_eq!(&data[1..33], &ir);
        assert_eq!(&data[33..], &[0x80, 0, 0, 5]);
    }
}
