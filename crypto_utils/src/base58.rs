use crate::hash::sha256d;

/// Length of the base58-check checksum suffix.
pub const CHECKSUM_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Base58Error {
    #[error("invalid base58 string: {0}")]
    Decode(#[from] bs58::decode::Error),
    #[error("data too short to carry a checksum")]
    InvalidLength,
    #[error("checksum mismatch")]
    InvalidChecksum,
}

pub fn base58_encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

pub fn base58_decode(s: &str) -> Result<Vec<u8>, Base58Error> {
    Ok(bs58::decode(s).into_vec()?)
}

/// First four bytes of the double SHA256 of `payload`.
pub fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = sha256d(payload);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

/// Splits `raw` into payload and checksum and verifies the latter.
pub fn verify_checksum(raw: &[u8]) -> Result<&[u8], Base58Error> {
    if raw.len() < CHECKSUM_LEN {
        return Err(Base58Error::InvalidLength);
    }
    let (payload, check) = raw.split_at(raw.len() - CHECKSUM_LEN);
    if checksum(payload) != check {
        return Err(Base58Error::InvalidChecksum);
    }
    Ok(payload)
}

pub fn base58_check_encode(payload: &[u8]) -> String {
    let mut extended = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    extended.extend_from_slice(payload);
    extended.extend_from_slice(&checksum(payload));
    base58_encode(&extended)
}

pub fn base58_check_decode(s: &str) -> Result<Vec<u8>, Base58Error> {
    let raw = base58_decode(s)?;
    verify_checksum(&raw).map(<[u8]>::to_vec)
}
