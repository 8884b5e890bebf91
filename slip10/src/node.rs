//! A single position in a SLIP-0010 key tree and the string/byte facade built on it.

use std::fmt;

use crypto_utils::hash::hash160;
use log::{debug, trace};
use zeroize::Zeroize;

use crate::ckd::{self, is_hardened};
use crate::curve::{Curve, PrivateKeyBytes, PublicKeyBytes};
use crate::derivation::IntoDerivationPath;
use crate::error::DecodeError;
use crate::extended_key::{ExtendedKeyFields, KeyKind, Network, PAYLOAD_LEN};
use crate::{ChainCode, Fingerprint, Slip10Error};

/// Accepted seed lengths in bytes.
pub const MIN_SEED_LEN: usize = 16;
pub const MAX_SEED_LEN: usize = 64;

/// Key material and metadata for one node of the derivation tree.
///
/// A node built from an extended public key has no private key; it can only derive
/// non-hardened children and never produces an xprv.
#[derive(Clone, PartialEq, Eq)]
pub struct Node {
    curve: Curve,
    network: Network,
    depth: u8,
    parent_fingerprint: Fingerprint,
    child_index: u32,
    chain_code: ChainCode,
    private_key: Option<PrivateKeyBytes>,
    public_key: PublicKeyBytes,
}

impl Node {
    /// Master node for `seed` on `curve`.
    ///
    /// Seeds must be [`MIN_SEED_LEN`] to [`MAX_SEED_LEN`] bytes. SLIP-0010 itself accepts any
    /// length; this bound follows the BIP-32 seed size and is stricter than the derivation needs.
    pub fn from_seed(seed: &[u8], network: Network, curve: Curve) -> Result<Self, Slip10Error> {
        let len = seed.len();
        if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&len) {
            return Err(Slip10Error::InvalidInput(format!(
                "seed must be {MIN_SEED_LEN} to {MAX_SEED_LEN} bytes, got {len}"
            )));
        }
        let (private_key, chain_code) = ckd::master_key(curve, seed)?;
        let public_key = curve.public_key(&private_key)?;
        trace!("created {curve} master node for {network}");
        Ok(Node {
            curve,
            network,
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_index: 0,
            chain_code,
            private_key: Some(private_key),
            public_key,
        })
    }

    /// Same as [`Node::from_seed`] with the network and curve given by name,
    /// e.g. `"main"` and `"secp256k1"`.
    pub fn from_seed_named(seed: &[u8], network: &str, curve_name: &str) -> Result<Self, Slip10Error> {
        let network: Network = network.parse()?;
        let curve: Curve = curve_name.parse()?;
        Self::from_seed(seed, network, curve)
    }

    /// Decodes an xprv/tprv string as a secp256k1 node.
    pub fn from_xpriv(xpriv: &str) -> Result<Self, Slip10Error> {
        Self::from_xpriv_with_curve(xpriv, Curve::Secp256k1)
    }

    /// Decodes an xpub/tpub string as a secp256k1 node.
    pub fn from_xpub(xpub: &str) -> Result<Self, Slip10Error> {
        Self::from_xpub_with_curve(xpub, Curve::Secp256k1)
    }

    pub fn from_xpriv_with_curve(xpriv: &str, curve: Curve) -> Result<Self, Slip10Error> {
        let fields = ExtendedKeyFields::from_base58(xpriv)?;
        let Some(private_key) = fields.private() else {
            debug!("rejected extended key: public version where a private key was expected");
            return Err(DecodeError::KindMismatch.into());
        };
        if !curve.is_valid_private_key(&private_key) {
            debug!("rejected extended key: private key out of range for {curve}");
            return Err(DecodeError::InvalidKeyData.into());
        }
        let public_key = curve.public_key(&private_key)?;
        Ok(Node {
            curve,
            network: fields.network,
            depth: fields.depth,
            parent_fingerprint: fields.parent_fingerprint,
            child_index: fields.child_index,
            chain_code: fields.chain_code,
            private_key: Some(private_key),
            public_key,
        })
    }

    pub fn from_xpub_with_curve(xpub: &str, curve: Curve) -> Result<Self, Slip10Error> {
        let fields = ExtendedKeyFields::from_base58(xpub)?;
        if fields.kind != KeyKind::Public {
            debug!("rejected extended key: private version where a public key was expected");
            return Err(DecodeError::KindMismatch.into());
        }
        if !curve.is_valid_public_key(&fields.key_data) {
            debug!("rejected extended key: not a valid {curve} public key");
            return Err(DecodeError::InvalidKeyData.into());
        }
        Ok(Node {
            curve,
            network: fields.network,
            depth: fields.depth,
            parent_fingerprint: fields.parent_fingerprint,
            child_index: fields.child_index,
            chain_code: fields.chain_code,
            private_key: None,
            public_key: fields.key_data,
        })
    }

    pub fn curve(&self) -> Curve {
        self.curve
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn parent_fingerprint(&self) -> Fingerprint {
        self.parent_fingerprint
    }

    pub fn child_index(&self) -> u32 {
        self.child_index
    }

    pub fn chain_code(&self) -> &ChainCode {
        &self.chain_code
    }

    pub fn private_key(&self) -> Option<&PrivateKeyBytes> {
        self.private_key.as_ref()
    }

    pub fn public_key(&self) -> &PublicKeyBytes {
        &self.public_key
    }

    pub fn is_private(&self) -> bool {
        self.private_key.is_some()
    }

    /// This node's own fingerprint, i.e. the parent fingerprint of its children.
    pub fn fingerprint(&self) -> Fingerprint {
        let hash = hash160(&self.public_key);
        let mut fp = [0u8; 4];
        fp.copy_from_slice(&hash[..4]);
        fp
    }

    /// The same tree position without the private key.
    pub fn to_public(&self) -> Node {
        Node {
            curve: self.curve,
            network: self.network,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_index: self.child_index,
            chain_code: self.chain_code,
            private_key: None,
            public_key: self.public_key,
        }
    }

    /// One derivation step.
    ///
    /// Private nodes derive private children; public-only nodes derive public children and
    /// fail on hardened indices.
    pub fn derive_child(&self, index: u32) -> Result<Node, Slip10Error> {
        if self.curve.hardened_only() && !is_hardened(index) {
            return Err(Slip10Error::InvalidPath(format!(
                "{} only supports hardened derivation",
                self.curve
            )));
        }
        let depth = self
            .depth
            .checked_add(1)
            .ok_or_else(|| Slip10Error::InvalidPath("maximum depth of 255 exceeded".to_string()))?;

        let (private_key, public_key, chain_code) = match &self.private_key {
            Some(parent) => {
                let (child, chain_code) = ckd::derive_private(
                    self.curve,
                    &self.chain_code,
                    parent,
                    &self.public_key,
                    index,
                )?;
                (Some(child), self.curve.public_key(&child)?, chain_code)
            }
            None => {
                let (public_key, chain_code) =
                    ckd::derive_public(self.curve, &self.chain_code, &self.public_key, index)?;
                (None, public_key, chain_code)
            }
        };
        trace!("derived {} child {index:#010x} at depth {depth}", self.curve);

        Ok(Node {
            curve: self.curve,
            network: self.network,
            depth,
            parent_fingerprint: self.fingerprint(),
            child_index: index,
            chain_code,
            private_key,
            public_key,
        })
    }

    fn public_fields(&self) -> ExtendedKeyFields {
        ExtendedKeyFields {
            network: self.network,
            kind: KeyKind::Public,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_index: self.child_index,
            chain_code: self.chain_code,
            key_data: self.public_key,
        }
    }

    fn private_fields(&self) -> Result<ExtendedKeyFields, Slip10Error> {
        let mut key_data = [0u8; 33];
        key_data[1..].copy_from_slice(self.require_private()?);
        let fields = ExtendedKeyFields {
            network: self.network,
            kind: KeyKind::Private,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_index: self.child_index,
            chain_code: self.chain_code,
            key_data,
        };
        key_data.zeroize();
        Ok(fields)
    }

    fn require_private(&self) -> Result<&PrivateKeyBytes, Slip10Error> {
        self.private_key
            .as_ref()
            .ok_or(Slip10Error::PrivateDerivation("node has no private key"))
    }

    pub fn get_xpub(&self) -> String {
        self.public_fields().to_base58()
    }

    pub fn get_xpriv(&self) -> Result<String, Slip10Error> {
        Ok(self.private_fields()?.to_base58())
    }

    pub fn get_xpub_bytes(&self) -> [u8; PAYLOAD_LEN] {
        self.public_fields().to_bytes()
    }

    pub fn get_xpriv_bytes(&self) -> Result<[u8; PAYLOAD_LEN], Slip10Error> {
        Ok(self.private_fields()?.to_bytes())
    }

    /// Walks `path` from this node. `"m"` or an empty index list returns a copy of this node.
    pub fn get_child_from_path(&self, path: impl IntoDerivationPath) -> Result<Node, Slip10Error> {
        path.into_derivation_path()?.derive_from(self)
    }

    pub fn get_xpub_from_path(&self, path: impl IntoDerivationPath) -> Result<String, Slip10Error> {
        Ok(self.get_child_from_path(path)?.get_xpub())
    }

    pub fn get_xpriv_from_path(&self, path: impl IntoDerivationPath) -> Result<String, Slip10Error> {
        self.get_child_from_path(path)?.get_xpriv()
    }

    pub fn get_pubkey_from_path(
        &self,
        path: impl IntoDerivationPath,
    ) -> Result<PublicKeyBytes, Slip10Error> {
        Ok(self.get_child_from_path(path)?.public_key)
    }

    pub fn get_privkey_from_path(
        &self,
        path: impl IntoDerivationPath,
    ) -> Result<PrivateKeyBytes, Slip10Error> {
        let child = self.get_child_from_path(path)?;
        child.require_private().copied()
    }

    /// Chain code and private key at `path`.
    pub fn get_extended_privkey_from_path(
        &self,
        path: impl IntoDerivationPath,
    ) -> Result<(ChainCode, PrivateKeyBytes), Slip10Error> {
        let child = self.get_child_from_path(path)?;
        let private_key = *child.require_private()?;
        Ok((child.chain_code, private_key))
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        if let Some(key) = self.private_key.as_mut() {
            key.zeroize();
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("curve", &self.curve)
            .field("network", &self.network)
            .field("depth", &self.depth)
            .field("parent_fingerprint", &hex::encode(self.parent_fingerprint))
            .field("child_index", &self.child_index)
            .field("public_key", &hex::encode(self.public_key))
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}
