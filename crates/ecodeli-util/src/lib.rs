pub mod result_ext;

use sha2::{Digest as _, Sha256};

/// Hex encoded sha256 of the bytes, truncated to `len` characters
pub fn short_fingerprint(bytes: &[u8], len: usize) -> String {
    let mut sha256 = Sha256::new();
    sha256.update(bytes);
    let hash = sha256.finalize();

    let mut hex = hex::encode(hash);
    hex.truncate(len);
    hex
}
