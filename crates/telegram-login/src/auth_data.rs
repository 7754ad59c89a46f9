use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Verified Telegram user fields from callback data.
///
/// Only produced by a successful verification; optional display fields are
/// copied verbatim and are empty when the widget did not send them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthData {
    /// Telegram user ID, always > 0.
    #[serde(rename = "id")]
    pub user_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub photo_url: String,
    /// `auth_date` as sent by Telegram, in seconds since the Unix epoch.
    #[serde(rename = "auth_date")]
    pub auth_date_unix: i64,
}

impl AuthData {
    /// `auth_date` as a UTC instant.
    pub fn auth_date(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.auth_date_unix, 0)
    }

    /// First and last name joined by a space, skipping empty parts.
    pub fn display_name(&self) -> String {
        [self.first_name.as_str(), self.last_name.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}
