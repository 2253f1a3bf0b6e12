//! Publisher configuration and environment loading.

use std::time::Duration;

use crate::error::ConfigError;

/// Environment variable holding a full broker URL.
pub const REDIS_URL_VAR: &str = "REDIS_URL";
/// Environment variable holding the broker host.
pub const REDIS_HOST_VAR: &str = "REDIS_HOST";
/// Environment variable holding the broker port.
pub const REDIS_PORT_VAR: &str = "REDIS_PORT";
/// Environment variable holding the broker password.
pub const REDIS_PASSWORD_VAR: &str = "REDIS_PASSWORD";
/// Environment variable gating event publishing.
pub const EVENTS_ENABLED_VAR: &str = "FIERYMUD_EVENTS_ENABLED";

/// Default broker host.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default broker port.
pub const DEFAULT_PORT: u16 = 6379;
/// Reference queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10_000;

const TRUTHY: [&str; 4] = ["1", "true", "yes", "on"];

/// Configuration for the event publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherConfig {
    /// Broker host.
    pub host: String,
    /// Broker port.
    pub port: u16,
    /// Broker password; `None` means no authentication.
    pub password: Option<String>,
    /// Bound on connecting, and on each command once connected.
    pub connect_timeout: Duration,
    /// Not applied anywhere: reconnection is attempted whenever the worker
    /// drains an entry while disconnected. Kept so existing deployments'
    /// settings still parse.
    pub reconnect_delay: Duration,
    /// Maximum number of messages waiting for the worker.
    pub queue_capacity: usize,
    /// How long the worker waits for a message before re-checking for
    /// shutdown.
    pub poll_interval: Duration,
    /// Whether publishing is enabled at all. Fixed at initialization.
    pub enabled: bool,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            password: None,
            connect_timeout: Duration::from_millis(1000),
            reconnect_delay: Duration::from_millis(5000),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            poll_interval: Duration::from_millis(100),
            enabled: true,
        }
    }
}

/// Broker location extracted from a `redis://` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerUrl {
    /// Host part.
    pub host: String,
    /// Port part, if the URL carried one.
    pub port: Option<u16>,
    /// Password from a `:password@` prefix, if present.
    pub password: Option<String>,
}

/// Parses `redis://[:password@]host[:port][/db]`.
///
/// The scheme prefix is optional. A `user:password@` prefix is accepted but
/// only the password-only form (`:password@`) sets a password.
///
/// # Errors
///
/// Returns `ConfigError::InvalidUrl` if the host is empty and
/// `ConfigError::InvalidPort` if the port is not a valid `u16`.
pub fn parse_redis_url(url: &str) -> Result<BrokerUrl, ConfigError> {
    let mut rest = url.strip_prefix("redis://").unwrap_or(url);

    let mut password = None;
    if let Some((auth, after)) = rest.split_once('@') {
        if let Some(pass) = auth.strip_prefix(':') {
            password = Some(pass.to_owned()).filter(|p| !p.is_empty());
        }
        rest = after;
    }

    // Drop a trailing database path such as "/0".
    let authority = rest.split_once('/').map_or(rest, |(authority, _)| authority);

    let (host, port) = match authority.split_once(':') {
        Some((host, port)) => (host, Some(parse_port(port)?)),
        None => (authority, None),
    };

    if host.is_empty() {
        return Err(ConfigError::InvalidUrl(url.to_owned()));
    }

    Ok(BrokerUrl {
        host: host.to_owned(),
        port,
        password,
    })
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidPort(value.to_owned()))
}

/// Returns whether `value` is one of the accepted truthy spellings.
/// Matching is case-sensitive.
#[must_use]
pub fn is_truthy(value: &str) -> bool {
    TRUTHY.contains(&value)
}

impl PublisherConfig {
    /// Builds a configuration from the process environment.
    ///
    /// `REDIS_URL` takes precedence over `REDIS_HOST`, `REDIS_PORT` and
    /// `REDIS_PASSWORD`. `FIERYMUD_EVENTS_ENABLED` disables publishing unless
    /// set to `1`, `true`, `yes` or `on`; when unset, publishing is enabled.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a port or URL cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration by resolving variable names through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a port or URL cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(REDIS_URL_VAR) {
            let broker = parse_redis_url(&url)?;
            config.host = broker.host;
            if let Some(port) = broker.port {
                config.port = port;
            }
            config.password = broker.password;
        } else {
            if let Some(host) = lookup(REDIS_HOST_VAR) {
                config.host = host;
            }
            if let Some(port) = lookup(REDIS_PORT_VAR) {
                config.port = parse_port(&port)?;
            }
            if let Some(password) = lookup(REDIS_PASSWORD_VAR) {
                config.password = Some(password).filter(|p| !p.is_empty());
            }
        }

        if let Some(enabled) = lookup(EVENTS_ENABLED_VAR) {
            config.enabled = is_truthy(&enabled);
        }

        Ok(config)
    }

    /// Returns the password to authenticate with, treating an empty string as
    /// no password.
    #[must_use]
    pub fn auth_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}
