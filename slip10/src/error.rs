use thiserror::Error;

/// Reasons an extended key string or payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("not a valid base58 string")]
    InvalidBase58,
    #[error("invalid decoded length {0}")]
    InvalidLength(usize),
    #[error("checksum mismatch")]
    InvalidChecksum,
    #[error("unknown version bytes {0:02x?}")]
    InvalidVersion([u8; 4]),
    #[error("version bytes belong to the other key kind")]
    KindMismatch,
    #[error("depth 0 key with non-zero parent fingerprint or child index")]
    InvalidRoot,
    #[error("key data is not valid for the curve")]
    InvalidKeyData,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Slip10Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unsupported curve '{0}'")]
    UnsupportedCurve(String),
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("private derivation error: {0}")]
    PrivateDerivation(&'static str),
    #[error("no valid key after {0} derivation attempts")]
    DerivationExhausted(u32),
    #[error("invalid extended key: {0}")]
    InvalidExtendedKey(#[from] DecodeError),
}

impl Slip10Error {
    pub(crate) fn invalid_format(path: &str) -> Self {
        Slip10Error::InvalidPath(format!("invalid format '{path}'"))
    }
}
