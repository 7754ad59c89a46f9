//! Verification of Telegram Login Widget callback data.
//!
//! After a user authorizes with the widget, Telegram redirects back to the
//! relying site with the user's fields plus `auth_date` and `hash`. This crate
//! decides whether those fields really came from Telegram, were not altered,
//! and are recent, and returns them as an [`AuthData`].
//!
//! # Checks
//!
//! - **Signature**: HMAC-SHA256 over the sorted `key=value` lines of every
//!   field except `hash`, keyed by `SHA256(bot_token)`, compared in constant
//!   time ([`hmac`], [`security`])
//! - **Identity**: `id` is a positive 64-bit integer
//! - **Freshness**: `auth_date` lies in `[now - auth_ttl, now + clock_skew]`
//!   ([`VerifyConfig`])
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use telegram_login::{sign_fields, verify_with_config, FixedClock, VerifyConfig};
//!
//! let bot_token = "123456:ABC-DEF";
//! let mut fields: HashMap<String, String> = [
//!     ("id", "42"),
//!     ("first_name", "John"),
//!     ("auth_date", "1800000000"),
//! ]
//! .into_iter()
//! .map(|(k, v)| (k.to_string(), v.to_string()))
//! .collect();
//! let hash = sign_fields(&fields, bot_token).unwrap();
//! fields.insert("hash".to_string(), hash);
//!
//! let config = VerifyConfig::new().with_clock(FixedClock::from_unix(1_800_000_010).unwrap());
//! let user = verify_with_config(&fields, bot_token, &config).unwrap();
//! assert_eq!(user.user_id, 42);
//! assert_eq!(user.first_name, "John");
//! ```

pub mod auth_data;
pub mod config;
pub mod constants;
pub mod error;
pub mod hmac;
pub mod query;
pub mod security;
pub mod verify;

// Re-exports
pub use auth_data::AuthData;
pub use config::{Clock, FixedClock, SystemClock, VerifyConfig};
pub use constants::*;
pub use error::{AuthError, ConfigError};
pub use hmac::sign_fields;
pub use query::{
    flatten_values, parse_query, verify_query_string, verify_url_values,
    verify_url_values_with_config, UrlValues,
};
pub use verify::{verify, verify_with_config};
