//! Client configuration.

use std::time::Duration;

use super::engine::{RetryPolicy, TokenLifecycle};

pub const DEFAULT_BASE_PATH: &str = "https://pass.rzd.ru/";
pub const DEFAULT_LANGUAGE: &str = "ru";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; RzdClient/1.0)";

/// Error returned when an environment setting cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for {key}: {value:?} ({reason})")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: &'static str,
}

/// Configuration for [`RzdClient`](super::RzdClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RzdConfig {
    /// Root of the service (e.g. `https://pass.rzd.ru/`).
    pub base_path: String,
    /// Response language.
    pub language: String,
    pub user_agent: String,
    /// Timeout for a single HTTP round trip.
    pub request_timeout: Duration,
    /// Wait between attempts.
    pub retry_delay: Duration,
    /// Total attempts per call, including the first.
    pub max_retries: u32,
    /// How long a session token stays usable.
    pub rid_lifetime: Duration,
    pub token_lifecycle: TokenLifecycle,
    /// Upper bound on a whole call, retries included.
    pub call_deadline: Option<Duration>,
    /// Proxy URL for all traffic.
    pub proxy: Option<String>,
    /// Verbose logging.
    pub debug: bool,
}

impl Default for RzdConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(30),
            retry_delay: Duration::from_millis(2000),
            max_retries: 10,
            rid_lifetime: Duration::from_millis(300_000),
            token_lifecycle: TokenLifecycle::default(),
            call_deadline: None,
            proxy: None,
            debug: false,
        }
    }
}

impl RzdConfig {
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_rid_lifetime(mut self, lifetime: Duration) -> Self {
        self.rid_lifetime = lifetime;
        self
    }

    pub fn with_token_lifecycle(mut self, lifecycle: TokenLifecycle) -> Self {
        self.token_lifecycle = lifecycle;
        self
    }

    pub fn with_call_deadline(mut self, deadline: Duration) -> Self {
        self.call_deadline = Some(deadline);
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// The retry policy every call made with this configuration uses.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            delay: self.retry_delay,
            token_ttl: self.rid_lifetime,
            token_lifecycle: self.token_lifecycle,
            deadline: self.call_deadline,
        }
    }

    /// Read the configuration from `RZD_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    ///
    /// Unset or empty keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(base_path) = get("RZD_BASE_PATH") {
            config.base_path = base_path;
        }
        if let Some(language) = get("RZD_LANGUAGE") {
            config.language = language;
        }
        if let Some(user_agent) = get("RZD_USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(proxy) = get("RZD_PROXY") {
            config.proxy = Some(proxy);
        }
        if let Some(v) = get("RZD_TIMEOUT") {
            config.retry_delay = Duration::from_millis(parse_number("RZD_TIMEOUT", &v)?);
        }
        if let Some(v) = get("RZD_MAX_RETRIES") {
            config.max_retries = parse_number("RZD_MAX_RETRIES", &v)?;
        }
        if let Some(v) = get("RZD_RID_LIFETIME") {
            config.rid_lifetime = match parse_number("RZD_RID_LIFETIME", &v)? {
                0 => {
                    return Err(ConfigError {
                        key: "RZD_RID_LIFETIME",
                        value: v,
                        reason: "a zero lifetime expires every token on arrival",
                    });
                }
                millis => Duration::from_millis(millis),
            };
        }
        if let Some(v) = get("RZD_REQUEST_TIMEOUT") {
            config.request_timeout = Duration::from_secs(parse_number("RZD_REQUEST_TIMEOUT", &v)?);
        }
        if let Some(v) = get("RZD_CALL_DEADLINE") {
            config.call_deadline = Some(Duration::from_millis(parse_number("RZD_CALL_DEADLINE", &v)?));
        }
        if let Some(v) = get("RZD_RID_POLICY") {
            config.token_lifecycle = TokenLifecycle::parse(&v).ok_or(ConfigError {
                key: "RZD_RID_POLICY",
                value: v.clone(),
                reason: "expected expire-on-success or keep-until-ttl",
            })?;
        }
        if let Some(v) = get("RZD_DEBUG_MODE") {
            config.debug = parse_bool("RZD_DEBUG_MODE", &v)?;
        }

        Ok(config)
    }
}

fn parse_number<N: std::str::FromStr>(key: &'static str, value: &str) -> Result<N, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError {
        key,
        value: value.to_string(),
        reason: "expected a non-negative integer",
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError {
            key,
            value: value.to_string(),
            reason: "expected true or false",
        }),
    }
}
