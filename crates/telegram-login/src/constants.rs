/// Default maximum age of `auth_date`, in seconds (5 minutes).
pub const DEFAULT_AUTH_TTL_SECS: i64 = 5 * 60;

/// Default allowed future skew of `auth_date`, in seconds.
pub const DEFAULT_CLOCK_SKEW_SECS: i64 = 30;

/// Field carrying the hex-encoded HMAC-SHA256 signature. Excluded from the
/// data-check string.
pub const FIELD_HASH: &str = "hash";

/// Telegram user ID.
pub const FIELD_ID: &str = "id";

/// Unix timestamp (seconds) at which the widget issued the callback.
pub const FIELD_AUTH_DATE: &str = "auth_date";

pub const FIELD_USERNAME: &str = "username";
pub const FIELD_FIRST_NAME: &str = "first_name";
pub const FIELD_LAST_NAME: &str = "last_name";
pub const FIELD_PHOTO_URL: &str = "photo_url";

/// Environment variable overriding the maximum `auth_date` age.
pub const ENV_AUTH_TTL_SECS: &str = "TELEGRAM_AUTH_TTL_SECS";

/// Environment variable overriding the allowed future clock skew.
pub const ENV_CLOCK_SKEW_SECS: &str = "TELEGRAM_CLOCK_SKEW_SECS";

/// Environment variable the CLI reads the bot token from.
pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
