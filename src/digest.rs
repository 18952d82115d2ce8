//! Image digests used to check that a rewrite changed its target

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::Digest;
use sha2::Sha256;

/// Compute SHA256 hash of a reader's contents: sha256=<base64url_no_padding>
pub fn hash_reader<R: Read>(mut reader: R) -> std::io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("sha256={}", URL_SAFE_NO_PAD.encode(hasher.finalize())))
}

/// Compute SHA256 hash of a file on disk
pub fn hash_file(path: &Path) -> std::io::Result<String> {
    hash_reader(BufReader::new(File::open(path)?))
}
