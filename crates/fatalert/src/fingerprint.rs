//! Error signatures
//!
//! A signature is a deterministic fingerprint of (message, file, line, kind)
//! used to correlate repeated occurrences of the same error for throttling.
//! It is a correlation key only, never a security boundary: two distinct
//! errors with identical fields are intentionally indistinguishable.

use sha2::{Digest, Sha256};

use crate::kind::ErrorKind;

/// Compute the stable signature for an error.
///
/// SHA-256 over the four fields joined by `|` (a separator not expected in
/// file paths or numeric fields; a `|` inside the message cannot collide with
/// another tuple because the remaining fields are fixed-format). Output is
/// 64 lower-hex characters.
pub fn signature(message: &str, file: &str, line: u32, kind: ErrorKind) -> String {
    let mut hasher = Sha256::new();
    hasher.update(message.as_bytes());
    hasher.update(b"|");
    hasher.update(file.as_bytes());
    hasher.update(b"|");
    hasher.update(line.to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(kind.code().to_string().as_bytes());
    hex::encode(hasher.finalize())
}
