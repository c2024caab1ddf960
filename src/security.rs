//! Password hashing utilities compatible with the server-side hash.
//!
//! The server validates credentials inside `sp_User_Login` using
//! `HASHBYTES('SHA2_256', @Password)` over an `NVARCHAR` value, i.e. SHA-256
//! of the UTF-16LE encoding. These helpers reproduce that digest byte for
//! byte so a future flow can pre-hash client-side. They are not wired into
//! the current login call, which sends the raw password for server-side
//! validation.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Length in bytes of a password digest.
pub const DIGEST_LEN: usize = 32;

/// Hash a password exactly like `HASHBYTES('SHA2_256', NVARCHAR)`.
///
/// The text is encoded as UTF-16LE before digesting; any other encoding
/// produces a digest the server will never match.
pub fn hash_password(password: &str) -> [u8; DIGEST_LEN] {
    let mut encoded = Vec::with_capacity(password.len() * 2);
    for unit in password.encode_utf16() {
        encoded.extend_from_slice(&unit.to_le_bytes());
    }
    Sha256::digest(&encoded).into()
}

/// Constant-time digest comparison.
///
/// Returns false if either side is absent. The comparison must not
/// short-circuit on the first differing byte.
pub fn compare_digests(a: Option<&[u8]>, b: Option<&[u8]>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => constant_time_eq(a, b),
        _ => false,
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
