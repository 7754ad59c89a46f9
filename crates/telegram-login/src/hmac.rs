//! Data-check string construction and HMAC-SHA256 signature handling.
//!
//! Telegram signs the callback fields as follows: every field except `hash` is
//! rendered as `key=value`, the lines are sorted byte-wise and joined with
//! `\n`, and the result is authenticated with HMAC-SHA256 keyed by
//! `SHA256(bot_token)`. Any deviation from that canonical form rejects every
//! valid login, so the rules here must match the widget byte for byte.

use std::collections::HashMap;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::constants::FIELD_HASH;
use crate::error::AuthError;
use crate::security::constant_time_eq;

type HmacSha256 = Hmac<Sha256>;

/// Derive the HMAC key from a bot token: SHA-256 over the trimmed token bytes.
pub fn secret_key(bot_token: &str) -> [u8; 32] {
    Sha256::digest(bot_token.trim().as_bytes()).into()
}

/// Build the canonical data-check string for a set of callback fields.
///
/// The `hash` field is skipped; all other fields, including ones this crate
/// does not know about, are part of the signed payload.
pub fn data_check_string(fields: &HashMap<String, String>) -> String {
    let mut pairs: Vec<String> = fields
        .iter()
        .filter(|(key, _)| key.as_str() != FIELD_HASH)
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    pairs.sort_unstable();
    pairs.join("\n")
}

fn mac_bytes(key: &[u8; 32], data_check: &str) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data_check.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Compute the lower-case hex signature Telegram would attach to `fields`.
///
/// Does not validate the token; see [`sign_fields`] for the checked variant.
pub fn compute_hash(fields: &HashMap<String, String>, bot_token: &str) -> String {
    let key = secret_key(bot_token);
    hex::encode(mac_bytes(&key, &data_check_string(fields)))
}

/// Sign a field set the way the login widget does, returning the value to
/// put in the `hash` field. Any existing `hash` entry is ignored.
///
/// Useful for fixtures and for emulating the widget during local development.
pub fn sign_fields(fields: &HashMap<String, String>, bot_token: &str) -> Result<String, AuthError> {
    if bot_token.trim().is_empty() {
        return Err(AuthError::BotTokenRequired);
    }
    Ok(compute_hash(fields, bot_token))
}

/// Check `claimed_hash` (hex) against the signature computed over `fields`.
///
/// Undecodable hex and a mismatching signature both produce
/// [`AuthError::HashInvalid`].
pub fn verify_hash(
    fields: &HashMap<String, String>,
    bot_token: &str,
    claimed_hash: &str,
) -> Result<(), AuthError> {
    let claimed = hex::decode(claimed_hash.trim()).map_err(|_| AuthError::HashInvalid)?;

    let key = secret_key(bot_token);
    let computed = mac_bytes(&key, &data_check_string(fields));

    if !constant_time_eq(&computed, &claimed) {
        return Err(AuthError::HashInvalid);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "test-token";

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_data_check_string_sorted_and_excludes_hash() {
        let f = fields(&[
            ("username", "john_doe"),
            ("id", "42"),
            ("hash", "ffff"),
            ("auth_date", "1800000000"),
        ]);
        assert_eq!(
            data_check_string(&f),
            "auth_date=1800000000\nid=42\nusername=john_doe"
        );
    }

    #[test]
    fn test_data_check_string_sorts_full_pair() {
        // "a=2" < "a_b=1" because '=' (0x3d) sorts before '_' (0x5f)
        let f = fields(&[("a_b", "1"), ("a", "2")]);
        assert_eq!(data_check_string(&f), "a=2\na_b=1");
    }

    #[test]
    fn test_data_check_string_empty() {
        assert_eq!(data_check_string(&HashMap::new()), "");
        assert_eq!(data_check_string(&fields(&[("hash", "00")])), "");
    }

    #[test]
    fn test_secret_key_trims_token() {
        assert_eq!(secret_key("  test-token\n"), secret_key(TOKEN));
    }

    #[test]
    fn test_hash_known_vector() {
        // HMAC-SHA256(key = SHA256("test-token"), "auth_date=1800000000\nid=42")
        let f = fields(&[("id", "42"), ("auth_date", "1800000000")]);
        let key = secret_key(TOKEN);
        let mut mac = HmacSha256::new_from_slice(&key).unwrap();
        mac.update(b"auth_date=1800000000\nid=42");
        let expected = hex::encode(mac.finalize().into_bytes());
        assert_eq!(compute_hash(&f, TOKEN), expected);
        assert_eq!(expected.len(), 64);
    }

    #[test]
    fn test_verify_hash_accepts_own_signature() {
        let f = fields(&[("id", "42"), ("auth_date", "1800000000")]);
        let sig = compute_hash(&f, TOKEN);
        assert_eq!(verify_hash(&f, TOKEN, &sig), Ok(()));
        assert_eq!(verify_hash(&f, TOKEN, &sig.to_uppercase()), Ok(()));
        assert_eq!(verify_hash(&f, TOKEN, &format!(" {sig} ")), Ok(()));
    }

    #[test]
    fn test_verify_hash_wrong_secret() {
        let f = fields(&[("id", "42")]);
        let sig = compute_hash(&f, "secret-1");
        assert_eq!(verify_hash(&f, "secret-2", &sig), Err(AuthError::HashInvalid));
    }

    #[test]
    fn test_verify_hash_tampered_field() {
        let mut f = fields(&[("id", "42"), ("extra", "x")]);
        let sig = compute_hash(&f, TOKEN);
        f.insert("extra".into(), "y".into());
        assert_eq!(verify_hash(&f, TOKEN, &sig), Err(AuthError::HashInvalid));
    }

    #[test]
    fn test_verify_hash_malformed_hex() {
        let f = fields(&[("id", "42")]);
        assert_eq!(verify_hash(&f, TOKEN, "not-hex-zz"), Err(AuthError::HashInvalid));
        assert_eq!(verify_hash(&f, TOKEN, "abc"), Err(AuthError::HashInvalid));
        assert_eq!(verify_hash(&f, TOKEN, "deadbeef"), Err(AuthError::HashInvalid));
    }

    #[test]
    fn test_sign_fields_requires_token() {
        let f = fields(&[("id", "42")]);
        assert_eq!(sign_fields(&f, "   "), Err(AuthError::BotTokenRequired));
        assert_eq!(sign_fields(&f, TOKEN), Ok(compute_hash(&f, TOKEN)));
    }

    #[test]
    fn test_sign_fields_ignores_existing_hash() {
        let mut f = fields(&[("id", "42")]);
        let first = sign_fields(&f, TOKEN).unwrap();
        f.insert("hash".into(), first.clone());
        assert_eq!(sign_fields(&f, TOKEN).unwrap(), first);
    }
}
