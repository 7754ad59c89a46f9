use std::env;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use crate::constants::{
    DEFAULT_AUTH_TTL_SECS, DEFAULT_CLOCK_SKEW_SECS, ENV_AUTH_TTL_SECS, ENV_CLOCK_SKEW_SECS,
};
use crate::error::ConfigError;

/// Source of the current instant used for the freshness check.
///
/// Any `Fn() -> DateTime<Utc> + Send + Sync` closure is a `Clock`, so tests can
/// pass `|| fixed_instant` directly.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc> + Send + Sync,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Freeze at a Unix timestamp (whole seconds). Returns `None` when the
    /// timestamp is outside chrono's representable range.
    pub fn from_unix(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Freshness policy for [`crate::verify_with_config`].
///
/// Durations that are zero or negative fall back to the defaults
/// ([`DEFAULT_AUTH_TTL_SECS`], [`DEFAULT_CLOCK_SKEW_SECS`]); they never mean
/// "no tolerance". A missing clock means [`SystemClock`].
#[derive(Clone, Default)]
pub struct VerifyConfig {
    /// Maximum allowed age of `auth_date`.
    pub auth_ttl: TimeDelta,
    /// Allowed distance of `auth_date` into the future.
    pub clock_skew: TimeDelta,
    /// Overrides the current time source.
    pub clock: Option<Arc<dyn Clock>>,
}

impl fmt::Debug for VerifyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyConfig")
            .field("auth_ttl", &self.auth_ttl)
            .field("clock_skew", &self.clock_skew)
            .field("clock", &self.clock.as_ref().map(|_| "custom"))
            .finish()
    }
}

impl VerifyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auth_ttl(mut self, auth_ttl: TimeDelta) -> Self {
        self.auth_ttl = auth_ttl;
        self
    }

    pub fn with_clock_skew(mut self, clock_skew: TimeDelta) -> Self {
        self.clock_skew = clock_skew;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Load the policy from `TELEGRAM_AUTH_TTL_SECS` and
    /// `TELEGRAM_CLOCK_SKEW_SECS`. Unset or empty variables keep the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(secs) = env_secs(ENV_AUTH_TTL_SECS)? {
            config.auth_ttl = TimeDelta::seconds(secs);
        }
        if let Some(secs) = env_secs(ENV_CLOCK_SKEW_SECS)? {
            config.clock_skew = TimeDelta::seconds(secs);
        }
        Ok(config)
    }

    /// TTL actually enforced, after applying the default for non-positive values.
    pub fn effective_auth_ttl(&self) -> TimeDelta {
        positive_or(self.auth_ttl, DEFAULT_AUTH_TTL_SECS)
    }

    /// Skew actually enforced, after applying the default for non-positive values.
    pub fn effective_clock_skew(&self) -> TimeDelta {
        positive_or(self.clock_skew, DEFAULT_CLOCK_SKEW_SECS)
    }

    /// Sample the configured clock once.
    pub fn now(&self) -> DateTime<Utc> {
        match &self.clock {
            Some(clock) => clock.now(),
            None => SystemClock.now(),
        }
    }
}

fn positive_or(value: TimeDelta, default_secs: i64) -> TimeDelta {
    if value > TimeDelta::zero() {
        value
    } else {
        TimeDelta::seconds(default_secs)
    }
}

fn env_secs(name: &'static str) -> Result<Option<i64>, ConfigError> {
    match env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|secs| secs.unsigned_abs() <= i64::MAX as u64 / 1000)
            .map(Some)
            .ok_or(ConfigError::InvalidValue { name, value: raw }),
        Err(_) => Ok(None),
    }
}
