//! HMAC-SHA256 primitive and the provider seam around it.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256Mac = Hmac<Sha256>;

/// Keyed-hash capability used by [`Signer`](crate::Signer) and
/// [`Verifier`](crate::Verifier).
///
/// Implementations must return the lowercase hex HMAC-SHA256 digest of
/// `message` under `key`. The default is [`HmacSha256`]; tests and other
/// targets may substitute their own.
pub trait MacProvider {
    /// Compute `hex(HMAC-SHA256(key, message))`.
    fn hmac_sha256_hex(&self, key: &[u8], message: &[u8]) -> String;
}

impl<M: MacProvider + ?Sized> MacProvider for &M {
    fn hmac_sha256_hex(&self, key: &[u8], message: &[u8]) -> String {
        (**self).hmac_sha256_hex(key, message)
    }
}

/// HMAC-SHA256 backed by the RustCrypto `hmac` and `sha2` crates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HmacSha256;

impl MacProvider for HmacSha256 {
    fn hmac_sha256_hex(&self, key: &[u8], message: &[u8]) -> String {
        hmac_sha256(key, message)
    }
}

/// Generate HMAC-SHA256 signature.
///
/// Any key length is accepted, including an empty key, which HMAC pads
/// with zeros like any other short key.
///
/// # Arguments
/// * `key` - Secret key bytes
/// * `message` - Message to sign
///
/// # Returns
/// Signature as lowercase hex string (64 characters)
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> String {
    let mut mac = HmacSha256Mac::new_from_slice(key)
        .expect("HMAC can take key of any size");
    mac.update(message);
    let result = mac.finalize();
    hex::encode(result.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_sha256_format() {
        let sig = hmac_sha256(b"secret", b"hello world");

        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_rfc4231_case_2() {
        let sig = hmac_sha256(b"Jefe", b"what do ya want for nothing?");
        assert_eq!(
            sig,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_github_documented_vector() {
        let sig = hmac_sha256(b"It's a Secret to Everybody", b"Hello, World!");
        assert_eq!(
            sig,
            "757107ea0eb2509fc211221cce984b8a37570b6d7586c22c46f4379c8b043e17"
        );
    }

    #[test]
    fn test_empty_key_and_message() {
        assert_eq!(
            hmac_sha256(b"", b""),
            "b613679a0814d9ec772f95d778c35fc5ff1697c493715653c6c712144292c5ad"
        );
    }

    #[test]
    fn test_provider_matches_free_function() {
        let provider = HmacSha256;
        assert_eq!(
            provider.hmac_sha256_hex(b"k", b"m"),
            hmac_sha256(b"k", b"m")
        );
        assert_eq!((&provider).hmac_sha256_hex(b"k", b"m"), hmac_sha256(b"k", b"m"));
    }
}
