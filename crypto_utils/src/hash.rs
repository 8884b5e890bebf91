use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

pub fn sha256(input: &[u8]) -> [u8; 32] {
    Sha256::digest(input).into()
}

/// SHA256 applied twice, as used for base58-check checksums.
pub fn sha256d(input: &[u8]) -> [u8; 32] {
    sha256(&sha256(input))
}

pub fn ripemd160(input: &[u8]) -> [u8; 20] {
    Ripemd160::digest(input).into()
}

/// RIPEMD160(SHA256(input)), the identifier hash behind key fingerprints.
pub fn hash160(input: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn sha256_abc() {
        let expected = hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
        assert_eq!(sha256(b"abc"), expected);
    }

    #[test]
    fn sha256d_empty() {
        let expected = hex!("5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456");
        assert_eq!(sha256d(b""), expected);
    }

    #[test]
    fn sha256d_hello() {
        let expected = hex!("9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50");
        assert_eq!(sha256d(b"hello"), expected);
    }

    #[test]
    fn ripemd160_message_digest() {
        let expected = hex!("5d0689ef49d2fae572b881b123a85ffa21595f36");
        assert_eq!(ripemd160(b"message digest"), expected);
    }

    #[test]
    fn hash160_of_master_pubkey() {
        // BIP32 vector 1: m/0H records the master fingerprint 3442193e
        let master_pub = hex!("0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2");
        assert_eq!(hash160(&master_pub)[..4], hex!("3442193e"));
    }
}
