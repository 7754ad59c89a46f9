use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};

use crate::auth_data::AuthData;
use crate::config::VerifyConfig;
use crate::constants::{
    FIELD_AUTH_DATE, FIELD_FIRST_NAME, FIELD_HASH, FIELD_ID, FIELD_LAST_NAME, FIELD_PHOTO_URL,
    FIELD_USERNAME,
};
use crate::error::AuthError;
use crate::hmac::verify_hash;

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// Verify Telegram callback data with the default policy
/// (5 minute TTL, 30 second skew, system clock).
pub fn verify(fields: &HashMap<String, String>, bot_token: &str) -> Result<AuthData, AuthError> {
    verify_with_config(fields, bot_token, &VerifyConfig::default())
}

/// Verify Telegram callback data against `config`.
///
/// Checks run in a fixed order and stop at the first failure:
///
/// 1. bot token non-empty
/// 2. `hash` present, then the signature over all other fields
/// 3. `id` present, a base-10 `i64`, and positive
/// 4. `auth_date` present and a base-10 `i64`
/// 5. `auth_date` not after `now + clock_skew` and not older than `auth_ttl`
///
/// A bad signature is reported before any problem with `id` or `auth_date`.
pub fn verify_with_config(
    fields: &HashMap<String, String>,
    bot_token: &str,
    config: &VerifyConfig,
) -> Result<AuthData, AuthError> {
    let result = check(fields, bot_token, config);
    if let Err(ref err) = result {
        tracing::debug!(reason = err.kind(), fields = fields.len(), "telegram login rejected");
    }
    result
}

fn check(
    fields: &HashMap<String, String>,
    bot_token: &str,
    config: &VerifyConfig,
) -> Result<AuthData, AuthError> {
    let bot_token = bot_token.trim();
    if bot_token.is_empty() {
        return Err(AuthError::BotTokenRequired);
    }

    let auth_ttl = config.effective_auth_ttl();
    let clock_skew = config.effective_clock_skew();

    let hash = required(fields, FIELD_HASH).ok_or(AuthError::HashRequired)?;
    verify_hash(fields, bot_token, hash)?;

    let id_raw = required(fields, FIELD_ID).ok_or(AuthError::IdRequired)?;
    let user_id = id_raw
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AuthError::IdInvalid(id_raw.to_string()))?;

    let auth_date_raw = required(fields, FIELD_AUTH_DATE).ok_or(AuthError::AuthDateRequired)?;
    let auth_date_unix = auth_date_raw
        .parse::<i64>()
        .map_err(|_| AuthError::AuthDateInvalid(auth_date_raw.to_string()))?;

    check_freshness(auth_date_unix, config.now(), auth_ttl, clock_skew)?;

    Ok(AuthData {
        user_id,
        username: optional(fields, FIELD_USERNAME),
        first_name: optional(fields, FIELD_FIRST_NAME),
        last_name: optional(fields, FIELD_LAST_NAME),
        photo_url: optional(fields, FIELD_PHOTO_URL),
        auth_date_unix,
    })
}

/// Trimmed value of a required field, `None` when absent or blank.
fn required<'a>(fields: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    fields
        .get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn optional(fields: &HashMap<String, String>, name: &str) -> String {
    fields.get(name).cloned().unwrap_or_default()
}

/// Window check in nanoseconds: `auth_date` carries whole seconds but `now`
/// keeps its sub-second part, and i128 keeps every i64 timestamp in range.
fn check_freshness(
    auth_date_unix: i64,
    now: DateTime<Utc>,
    auth_ttl: TimeDelta,
    clock_skew: TimeDelta,
) -> Result<(), AuthError> {
    let auth_date = i128::from(auth_date_unix) * NANOS_PER_SEC;
    let now = i128::from(now.timestamp()) * NANOS_PER_SEC
        + i128::from(now.timestamp_subsec_nanos());

    if auth_date > now + delta_nanos(clock_skew) {
        return Err(AuthError::AuthDateFuture);
    }
    if now - auth_date > delta_nanos(auth_ttl) {
        return Err(AuthError::AuthDateExpired);
    }
    Ok(())
}

fn delta_nanos(delta: TimeDelta) -> i128 {
    i128::from(delta.num_seconds()) * NANOS_PER_SEC + i128::from(delta.subsec_nanos())
}
