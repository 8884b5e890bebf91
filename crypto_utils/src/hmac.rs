use hmac::{Hmac, Mac};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// HMAC-SHA512 of `data` keyed with `key`.
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> [u8; 64] {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn hmac_sha512_empty_data() {
        let expected = hex!(
            "84fa5aa0279bbc473267d05a53ea03310a987cecc4c1535ff29b6d76b8f1444a728df3aadb89d4a9a6709e1998f373566e8f824a8ca93b1821f0b69bc2a2f65e"
        );
        assert_eq!(hmac_sha512(b"key", b""), expected);
    }

    /// RFC 4231, test case 2
    #[test]
    fn hmac_sha512_rfc4231() {
        let expected = hex!(
            "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea2505549758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
        );
        assert_eq!(hmac_sha512(b"Jefe", b"what do ya want for nothing?"), expected);
    }

    #[test]
    fn slip10_master_for_test_seed() {
        // SLIP10 test vector 1, secp256k1, chain m: IL = private key, IR = chain code
        let i = hmac_sha512(b"Bitcoin seed", &hex!("000102030405060708090a0b0c0d0e0f"));
        assert_eq!(
            i[..32],
            hex!("e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35")
        );
        assert_eq!(
            i[32..],
            hex!("873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508")
        );
    }
}
