//! Client configuration parsed from environment variables.

pub const DEFAULT_GRAPHQL_URL: &str = "http://localhost:7001/api/v5/graphql";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while building a [`ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A numeric setting could not be parsed.
    #[error("invalid value for {var}: {value:?} (expected whole seconds)")]
    InvalidNumber { var: &'static str, value: String },

    /// The endpoint is not an absolute http(s) URL.
    #[error("invalid GraphQL endpoint {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub auth_email: Option<String>,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `NIMBUS_GRAPHQL_URL`: default `http://localhost:7001/api/v5/graphql`
    /// - `NIMBUS_AUTH_EMAIL`: identity header value, unset by default
    /// - `NIMBUS_REQUEST_TIMEOUT_SECS`: default 30
    /// - `NIMBUS_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid URL or a non-numeric timeout.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`], reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid URL or a non-numeric timeout.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let endpoint = normalize_endpoint(lookup("NIMBUS_GRAPHQL_URL").as_deref().unwrap_or(DEFAULT_GRAPHQL_URL))?;
        let auth_email = lookup("NIMBUS_AUTH_EMAIL").filter(|v| !v.trim().is_empty());
        let timeouts = Timeouts {
            request_secs: parse_secs(&lookup, "NIMBUS_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_secs(&lookup, "NIMBUS_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self { endpoint, auth_email, timeouts })
    }

    /// Replace the endpoint, validating it the same way as the env value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if `url` is not absolute http(s).
    pub fn with_endpoint(mut self, url: &str) -> Result<Self, ConfigError> {
        self.endpoint = normalize_endpoint(url)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_auth_email(mut self, email: impl Into<String>) -> Self {
        self.auth_email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.timeouts.request_secs = secs;
        self
    }
}

fn parse_secs(lookup: &impl Fn(&str) -> Option<String>, var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidNumber { var, value: raw }),
    }
}

fn normalize_endpoint(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = reqwest::Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidUrl { url: raw.to_owned(), reason: e.to_string() })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            url: raw.to_owned(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
