use sha2::{Digest, Sha256};

/// `sha256:<hex>` fingerprint of a corpus file's bytes.
pub(crate) fn sha256_prefixed(bytes: &[u8]) -> String {
    format!("sha256:{}", hex::encode(Sha256::digest(bytes)))
}
