//! Immutable per-client settings.
//!
//! # Design
//! A `ClientConfig` is built once when a client is created and never
//! mutated afterwards. The authentication scheme is fixed here, so every
//! call made through one client carries the same kind of credential. The
//! config derives `Deserialize` so an embedding application can load it
//! from whatever format it already uses; the library itself never reads
//! credentials from the environment.

use std::fmt;

use serde::Deserialize;

pub const DEFAULT_FORMS_HOST: &str = "www.formstack.com";
pub const DEFAULT_DOCS_HOST: &str = "www.webmerge.me";
pub const DEFAULT_API_VERSION: &str = "v2";

/// Credential attached to every request of a client.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum Auth {
    /// `authorization: Bearer <token>`.
    Bearer { token: String },
    /// HTTP Basic with an API key and secret.
    Basic { key: String, secret: String },
}

// Credentials stay out of logs and panic messages.
impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::Bearer { .. } => f.debug_struct("Bearer").field("token", &"<redacted>").finish(),
            Auth::Basic { key, .. } => f
                .debug_struct("Basic")
                .field("key", key)
                .field("secret", &"<redacted>")
                .finish(),
        }
    }
}

/// How a non-2xx response is surfaced to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Return `ApiError::Request`.
    #[default]
    Raise,
    /// Return `Reply::Message` with the classification text.
    ReturnMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub auth: Auth,
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,
    #[serde(default)]
    pub error_policy: ErrorPolicy,
}

fn default_tls_verify() -> bool {
    true
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, auth: Auth) -> Self {
        Self {
            base_url: base_url.into(),
            auth,
            tls_verify: true,
            error_policy: ErrorPolicy::default(),
        }
    }

    /// Forms REST API: `https://{hostname}/api/v2/` with a bearer token.
    pub fn forms(hostname: &str, token: impl Into<String>) -> Self {
        Self::new(
            forms_base_url(hostname, DEFAULT_API_VERSION),
            Auth::Bearer { token: token.into() },
        )
    }

    /// Directory-sync (SCIM) API: `https://{hostname}/scim/` with a bearer token.
    pub fn scim(hostname: &str, token: impl Into<String>) -> Self {
        Self::new(
            format!("https://{hostname}/scim/"),
            Auth::Bearer { token: token.into() },
        )
    }

    /// Documents API: `https://{hostname}/` with Basic key/secret auth.
    pub fn docs(hostname: &str, key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::new(
            format!("https://{hostname}/"),
            Auth::Basic {
                key: key.into(),
                secret: secret.into(),
            },
        )
    }

    /// Rewrites the version segment of a forms base URL built by [`ClientConfig::forms`].
    ///
    /// Only a base ending in `/api/{version}/` is touched; any other base URL
    /// is returned unchanged.
    pub fn with_api_version(mut self, version: &str) -> Self {
        let base = self.base_url.trim_end_matches('/');
        if let Some((prefix, current)) = base.rsplit_once('/') {
            if prefix.ends_with("/api") && !current.is_empty() {
                self.base_url = format!("{prefix}/{version}/");
            }
        }
        self
    }

    pub fn with_tls_verify(mut self, tls_verify: bool) -> Self {
        self.tls_verify = tls_verify;
        self
    }

    pub fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }
}

fn forms_base_url(hostname: &str, version: &str) -> String {
    format!("https://{hostname}/api/{version}/")
}
