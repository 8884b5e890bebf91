use std::fmt;
use std::str::FromStr;

use crypto_utils::base58::{self, Base58Error, CHECKSUM_LEN};
use zeroize::Zeroize;

use crate::curve::{PUBLIC_KEY_LEN, PrivateKeyBytes, PublicKeyBytes};
use crate::error::DecodeError;
use crate::{ChainCode, Fingerprint, Slip10Error};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Network {
    #[default]
    Main,
    Test,
}

impl Network {
    pub fn name(self) -> &'static str {
        match self {
            Network::Main => "main",
            Network::Test => "test",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = Slip10Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(Network::Main),
            "test" => Ok(Network::Test),
            other => Err(Slip10Error::InvalidInput(format!(
                "'network' must be one of \"main\", \"test\", got \"{other}\""
            ))),
        }
    }
}

/// Whether an extended key carries a private scalar or a public point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Private,
    Public,
}

/// Serialized extended key length, without checksum.
pub const PAYLOAD_LEN: usize = 78;
/// Base58-decoded extended key length, checksum included.
pub const ENCODED_LEN: usize = PAYLOAD_LEN + CHECKSUM_LEN;

// Version bytes for serialization
const VERSION_MAIN_PRIVATE: [u8; 4] = [0x04, 0x88, 0xAD, 0xE4];
const VERSION_MAIN_PUBLIC: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E];
const VERSION_TEST_PRIVATE: [u8; 4] = [0x04, 0x35, 0x83, 0x94];
const VERSION_TEST_PUBLIC: [u8; 4] = [0x04, 0x35, 0x87, 0xCF];

pub fn version_bytes(network: Network, kind: KeyKind) -> [u8; 4] {
    match (network, kind) {
        (Network::Main, KeyKind::Private) => VERSION_MAIN_PRIVATE,
        (Network::Main, KeyKind::Public) => VERSION_MAIN_PUBLIC,
        (Network::Test, KeyKind::Private) => VERSION_TEST_PRIVATE,
        (Network::Test, KeyKind::Public) => VERSION_TEST_PUBLIC,
    }
}

pub fn lookup_version(version: [u8; 4]) -> Option<(Network, KeyKind)> {
    match version {
        VERSION_MAIN_PRIVATE => Some((Network::Main, KeyKind::Private)),
        VERSION_MAIN_PUBLIC => Some((Network::Main, KeyKind::Public)),
        VERSION_TEST_PRIVATE => Some((Network::Test, KeyKind::Private)),
        VERSION_TEST_PUBLIC => Some((Network::Test, KeyKind::Public)),
        _ => None,
    }
}

/// The positional fields of an extended key.
///
/// `key_data` is `0x00 || private key` for private keys and the serialized public key
/// otherwise. No curve is recorded: checking the key against a curve is up to the caller.
#[derive(Clone, PartialEq, Eq)]
pub struct ExtendedKeyFields {
    pub network: Network,
    pub kind: KeyKind,
    pub depth: u8,
    pub parent_fingerprint: Fingerprint,
    pub child_index: u32,
    pub chain_code: ChainCode,
    pub key_data: PublicKeyBytes,
}

impl ExtendedKeyFields {
    pub fn private(&self) -> Option<PrivateKeyBytes> {
        if self.kind != KeyKind::Private {
            return None;
        }
        let mut key = [0u8; 32];
        key.copy_from_slice(&self.key_data[1..]);
        Some(key)
    }

    /// version (4) | depth (1) | parent_fp (4) | child_index (4) | chain_code (32) | key_data (33)
    pub fn to_bytes(&self) -> [u8; PAYLOAD_LEN] {
        let mut payload = [0u8; PAYLOAD_LEN];
        payload[0..4].copy_from_slice(&version_bytes(self.network, self.kind));
        payload[4] = self.depth;
        payload[5..9].copy_from_slice(&self.parent_fingerprint);
        payload[9..13].copy_from_slice(&self.child_index.to_be_bytes());
        payload[13..45].copy_from_slice(&self.chain_code);
        payload[45..78].copy_from_slice(&self.key_data);
        payload
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() != PAYLOAD_LEN {
            return Err(DecodeError::InvalidLength(data.len()));
        }
        let mut version = [0u8; 4];
        version.copy_from_slice(&data[0..4]);
        let (network, kind) = lookup_version(version).ok_or(DecodeError::InvalidVersion(version))?;

        let depth = data[4];
        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&data[5..9]);
        let mut index = [0u8; 4];
        index.copy_from_slice(&data[9..13]);
        let child_index = u32::from_be_bytes(index);
        if depth == 0 && (parent_fingerprint != [0u8; 4] || child_index != 0) {
            return Err(DecodeError::InvalidRoot);
        }

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&data[13..45]);
        let mut key_data = [0u8; PUBLIC_KEY_LEN];
        key_data.copy_from_slice(&data[45..78]);
        // Private key data: first byte must be 0x00, followed by the 32-byte key
        if kind == KeyKind::Private && key_data[0] != 0 {
            return Err(DecodeError::InvalidKeyData);
        }

        Ok(ExtendedKeyFields {
            network,
            kind,
            depth,
            parent_fingerprint,
            child_index,
            chain_code,
            key_data,
        })
    }

    pub fn to_base58(&self) -> String {
        let mut payload = self.to_bytes();
        let encoded = base58::base58_check_encode(&payload);
        payload.zeroize();
        encoded
    }

    /// Wipes the key data of a private key. Public key data is left alone.
    fn clear_private(&mut self) {
        if self.kind == KeyKind::Private {
            self.key_data.zeroize();
        }
    }

    pub fn from_base58(s: &str) -> Result<Self, DecodeError> {
        let raw = base58::base58_decode(s).map_err(|_| DecodeError::InvalidBase58)?;
        if raw.len() != ENCODED_LEN {
            return Err(DecodeError::InvalidLength(raw.len()));
        }
        let payload = base58::verify_checksum(&raw).map_err(|e| match e {
            Base58Error::InvalidChecksum => DecodeError::InvalidChecksum,
            Base58Error::InvalidLength => DecodeError::InvalidLength(raw.len()),
            Base58Error::Decode(_) => DecodeError::InvalidBase58,
        })?;
        Self::from_bytes(payload)
    }
}

impl Drop for ExtendedKeyFields {
    fn drop(&mut self) {
        self.clear_private();
    }
}

impl fmt::Debug for ExtendedKeyFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedKeyFields")
            .field("network", &self.network)
            .field("kind", &self.kind)
            .field("depth", &self.depth)
            .field("parent_fingerprint", &hex::encode(self.parent_fingerprint))
            .field("child_index", &self.child_index)
            .finish_non_exhaustive()
    }
}
