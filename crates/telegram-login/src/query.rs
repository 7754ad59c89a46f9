//! Adapters for callback data that arrives as a URL query.
//!
//! The widget redirects with its fields in the query string. Web frameworks
//! usually hand those over as a multi-valued map; these helpers flatten such a
//! map (or a raw query string) into the single-valued form `verify` expects.
//!
//! Flattening keeps only the FIRST value of a repeated key. This mirrors how
//! most query APIs resolve a single lookup, but it does mean a second `id=`
//! appended to a signed URL is silently ignored rather than rejected. The
//! signature still covers the first value, so this cannot be used to swap in
//! an unsigned value.

use std::collections::HashMap;

use crate::auth_data::AuthData;
use crate::config::VerifyConfig;
use crate::error::AuthError;
use crate::verify::verify_with_config;

/// Multi-valued query container: each key maps to its values in arrival order.
pub type UrlValues = HashMap<String, Vec<String>>;

/// Collapse a multi-valued container to one value per key (the first).
/// A key with no values maps to the empty string.
pub fn flatten_values(values: &UrlValues) -> HashMap<String, String> {
    values
        .iter()
        .map(|(key, vals)| (key.clone(), vals.first().cloned().unwrap_or_default()))
        .collect()
}

/// Parse an `application/x-www-form-urlencoded` query string, keeping every
/// value of repeated keys. A leading `?` is ignored.
pub fn parse_query(query: &str) -> UrlValues {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut values = UrlValues::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        values
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    values
}

/// Verify callback data held in a multi-valued container, default policy.
pub fn verify_url_values(values: &UrlValues, bot_token: &str) -> Result<AuthData, AuthError> {
    verify_url_values_with_config(values, bot_token, &VerifyConfig::default())
}

/// Verify callback data held in a multi-valued container.
pub fn verify_url_values_with_config(
    values: &UrlValues,
    bot_token: &str,
    config: &VerifyConfig,
) -> Result<AuthData, AuthError> {
    verify_with_config(&flatten_values(values), bot_token, config)
}

/// Verify callback data given as the raw redirect query string.
pub fn verify_query_string(
    query: &str,
    bot_token: &str,
    config: &VerifyConfig,
) -> Result<AuthData, AuthError> {
    verify_url_values_with_config(&parse_query(query), bot_token, config)
}
