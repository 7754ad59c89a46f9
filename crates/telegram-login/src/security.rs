//! Constant-time comparison for signature checks.
//!
//! Everything that compares secret-derived bytes goes through
//! [`constant_time_eq`]; plain `==` on MAC bytes short-circuits on the first
//! differing byte.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Constant-time byte comparison that does not leak input lengths or content.
///
/// Both inputs are hashed to fixed-length SHA-256 digests before comparison,
/// so a claimed signature of the wrong length costs the same as one of the
/// right length. The final comparison uses `subtle::ConstantTimeEq`, which
/// never short-circuits on mismatch.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let ha = Sha256::digest(a);
    let hb = Sha256::digest(b);
    ha.ct_eq(&hb).into()
}
