use thiserror::Error;

/// Reasons a Telegram login callback is refused.
///
/// Every variant is a stable, comparable kind. Callers that only care whether
/// the request was rejected can use [`AuthError::is_rejection`]; callers that
/// want to branch (e.g. "expired, try logging in again") match on the variant.
///
/// Messages never contain the bot token, the derived key or the computed hash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("bot token is required")]
    BotTokenRequired,

    #[error("telegram hash is required")]
    HashRequired,

    /// Malformed hex and a well-formed but wrong signature are indistinguishable.
    #[error("telegram hash is invalid")]
    HashInvalid,

    #[error("telegram id is required")]
    IdRequired,

    #[error("telegram id is invalid: {0:?}")]
    IdInvalid(String),

    #[error("telegram auth_date is required")]
    AuthDateRequired,

    #[error("telegram auth_date is invalid: {0:?}")]
    AuthDateInvalid(String),

    #[error("telegram auth_date is from future")]
    AuthDateFuture,

    #[error("telegram auth_date is expired")]
    AuthDateExpired,
}

impl AuthError {
    /// `true` when the callback data itself was refused, `false` for
    /// configuration problems on the relying side.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, AuthError::BotTokenRequired)
    }

    /// Stable machine-readable code, suitable for metrics labels or API bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::BotTokenRequired => "bot_token_required",
            AuthError::HashRequired => "hash_required",
            AuthError::HashInvalid => "hash_invalid",
            AuthError::IdRequired => "id_required",
            AuthError::IdInvalid(_) => "id_invalid",
            AuthError::AuthDateRequired => "auth_date_required",
            AuthError::AuthDateInvalid(_) => "auth_date_invalid",
            AuthError::AuthDateFuture => "auth_date_future",
            AuthError::AuthDateExpired => "auth_date_expired",
        }
    }
}

/// Errors loading [`crate::VerifyConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}
