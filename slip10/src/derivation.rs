use std::fmt;
use std::str::FromStr;

use crate::{HARDENED_OFFSET, Node, Slip10Error};

/// A derivation path such as `m/44'/0'/0/1`, stored as raw child indices.
///
/// Hardened indices already include [`HARDENED_OFFSET`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath(pub Vec<u32>);

impl DerivationPath {
    /// The empty path, `m`.
    pub fn master() -> Self {
        DerivationPath(Vec::new())
    }

    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    pub fn is_master(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends `index` and returns the extended path.
    pub fn child(mut self, index: u32) -> Self {
        self.0.push(index);
        self
    }

    /// Derives every step of this path from `root`, left to right.
    ///
    /// The first failing step aborts the walk; no intermediate node is returned.
    pub fn derive_from(&self, root: &Node) -> Result<Node, Slip10Error> {
        let mut node = root.clone();
        for &index in &self.0 {
            node = node.derive_child(index)?;
        }
        Ok(node)
    }
}

fn parse_segment(segment: &str, path: &str) -> Result<u32, Slip10Error> {
    let (digits, hardened) = match segment.strip_suffix(['\'', 'h', 'H']) {
        Some(digits) => (digits, true),
        None => (segment, false),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Slip10Error::invalid_format(path));
    }
    let index: u32 = digits
        .parse()
        .map_err(|_| Slip10Error::invalid_format(path))?;
    if index >= HARDENED_OFFSET {
        return Err(Slip10Error::invalid_format(path));
    }
    Ok(if hardened { index + HARDENED_OFFSET } else { index })
}

impl FromStr for DerivationPath {
    type Err = Slip10Error;

    /// Parses `m` followed by any number of `/<index>` segments, each optionally marked
    /// hardened with `'`, `h` or `H`.
    fn from_str(s: &str) -> Result<Self, Slip10Error> {
        let mut segments = s.split('/');
        if segments.next() != Some("m") {
            return Err(Slip10Error::invalid_format(s));
        }
        segments
            .map(|segment| parse_segment(segment, s))
            .collect::<Result<Vec<_>, _>>()
            .map(DerivationPath)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for &index in &self.0 {
            if index >= HARDENED_OFFSET {
                write!(f, "/{}'", index - HARDENED_OFFSET)?;
            } else {
                write!(f, "/{index}")?;
            }
        }
        Ok(())
    }
}

impl From<Vec<u32>> for DerivationPath {
    fn from(indices: Vec<u32>) -> Self {
        DerivationPath(indices)
    }
}

impl From<&[u32]> for DerivationPath {
    fn from(indices: &[u32]) -> Self {
        DerivationPath(indices.to_vec())
    }
}

/// Anything accepted where a derivation path is expected: a path string or a list of indices.
pub trait IntoDerivationPath {
    fn into_derivation_path(self) -> Result<DerivationPath, Slip10Error>;
}

impl IntoDerivationPath for DerivationPath {
    fn into_derivation_path(self) -> Result<DerivationPath, Slip10Error> {
        Ok(self)
    }
}

impl IntoDerivationPath for &DerivationPath {
    fn into_derivation_path(self) -> Result<DerivationPath, Slip10Error> {
        Ok(self.clone())
    }
}

impl IntoDerivationPath for &str {
    fn into_derivation_path(self) -> Result<DerivationPath, Slip10Error> {
        self.parse()
    }
}

impl IntoDerivationPath for String {
    fn into_derivation_path(self) -> Result<DerivationPath, Slip10Error> {
        self.parse()
    }
}

impl IntoDerivationPath for &String {
    fn into_derivation_path(self) -> Result<DerivationPath, Slip10Error> {
        self.parse()
    }
}

impl IntoDerivationPath for &[u32] {
    fn into_derivation_path(self) -> Result<DerivationPath, Slip10Error> {
        Ok(self.into())
    }
}

impl IntoDerivationPath for Vec<u32> {
    fn into_derivation_path(self) -> Result<DerivationPath, Slip10Error> {
        Ok(self.into())
    }
}

impl IntoDerivationPath for &Vec<u32> {
    fn into_derivation_path(self) -> Result<DerivationPath, Slip10Error> {
        Ok(self.as_slice().into())
    }
}

impl<const N: usize> IntoDerivationPath for [u32; N] {
    fn into_derivation_path(self) -> Result<DerivationPath, Slip10Error> {
        Ok(self.to_vec().into())
    }
}

impl<const N: usize> IntoDerivationPath for &[u32; N] {
    fn into_derivation_path(self) -> Result<DerivationPath, Slip10Error> {
        Ok(self.to_vec().into())
    }
}
