//! Client configuration.
//!
//! The base URL defaults to `/api`, which only resolves through the dev
//! proxy rule: `/api/*` goes to `http://localhost:8081/*` with the prefix
//! stripped. Point `MOVIE_API_BASE_URL` at an absolute URL to bypass it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const BASE_URL_ENV: &str = "MOVIE_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "MOVIE_API_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_proxy")]
    pub proxy: Option<ProxyRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProxyRule {
    pub prefix: String,
    pub target: String,
    #[serde(default = "default_true")]
    pub strip_prefix: bool,
}

fn default_base_url() -> String {
    "/api".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_proxy() -> Option<ProxyRule> {
    Some(ProxyRule::dev())
}

fn default_true() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            proxy: default_proxy(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `MOVIE_API_BASE_URL` and `MOVIE_API_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let mut config = Self::default();
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.is_empty()) {
            config.base_url = base_url;
        }
        if let Some(timeout) = lookup(TIMEOUT_ENV) {
            config.timeout_ms = timeout
                .parse()
                .map_err(|e| ApiError::Config(format!("{TIMEOUT_ENV}={timeout}: {e}")))?;
        }
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Turn a request URL into something a transport can dial.
    ///
    /// Absolute URLs pass through. Relative URLs must match the proxy rule.
    pub fn resolve_url(&self, url: &str) -> Result<String, ApiError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Ok(url.to_string());
        }
        self.proxy
            .as_ref()
            .and_then(|rule| rule.rewrite(url))
            .ok_or_else(|| ApiError::Config(format!("no proxy rule matches relative url {url}")))
    }
}

impl ProxyRule {
    /// The development rule: `/api` to the backend on port 8081.
    pub fn dev() -> Self {
        Self {
            prefix: "/api".to_string(),
            target: "http://localhost:8081".to_string(),
            strip_prefix: true,
        }
    }

    pub fn rewrite(&self, url: &str) -> Option<String> {
        let rest = url.strip_prefix(self.prefix.as_str())?;
        // `/apiary` must not match `/api`.
        if !(rest.is_empty() || rest.starts_with('/') || rest.starts_with('?')) {
            return None;
        }
        let target = self.target.trim_end_matches('/');
        if self.strip_prefix {
            Some(format!("{target}{rest}"))
        } else {
            Some(format!("{target}{url}"))
        }
    }
}
