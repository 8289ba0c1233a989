// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Remote Configuration (AppConfig)
//!
//! Loads named configuration profiles from AWS AppConfig Data and keeps the
//! parsed result for the lifetime of the process.
//!
//! ## Flow
//!
//! 1. `StartConfigurationSession(app, env, profile)` → initial token (cached per profile)
//! 2. `GetLatestConfiguration(token)` → payload bytes
//! 3. Payload parsed as JSON, then YAML, then kept as a raw string
//! 4. Parsed value cached per profile; later lookups never hit the network
//!
//! ## Lifecycle
//!
//! The caches live inside [`ConfigCache`], created once at startup and shared
//! through an `Arc`. Entries are never evicted or refreshed: a new remote
//! configuration is only observed after a cold start.

pub mod aws;
pub mod cache;
pub mod parse;
pub mod path;

use async_trait::async_trait;

pub use aws::AppConfigDataSource;
pub use cache::ConfigCache;
pub use parse::{parse_payload, PayloadFormat};
pub use path::lookup_path;

/// Errors raised while loading a profile.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration profile name must not be empty")]
    EmptyProfileName,

    #[error("AppConfig identifier missing: {0}")]
    MissingIdentifier(&'static str),

    #[error("AppConfig session start failed: {0}")]
    Session(String),

    #[error("AppConfig fetch failed: {0}")]
    Fetch(String),

    #[error("AppConfig profile '{0}' returned empty payload")]
    EmptyPayload(String),
}

/// Remote configuration service.
///
/// Mirrors the two AppConfig Data calls. Implementations must not cache;
/// caching belongs to [`ConfigCache`].
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Start a configuration session and return its initial token.
    async fn start_session(&self, app: &str, env: &str, profile: &str)
        -> Result<String, ConfigError>;

    /// Fetch the latest configuration for a session token.
    ///
    /// `None` means the service answered without configuration content.
    async fn latest_configuration(&self, token: &str) -> Result<Option<Vec<u8>>, ConfigError>;
}

/// Application/environment identifiers used to open sessions.
///
/// Process-wide defaults live on the cache; per-call [`LoadOptions`] override
/// them field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigIdentifiers {
    pub app: Option<String>,
    pub env: Option<String>,
}

/// Per-call overrides for [`ConfigCache::load_profile`].
pub type LoadOptions = ConfigIdentifiers;

impl ConfigIdentifiers {
    pub fn new(app: impl Into<String>, env: impl Into<String>) -> Self {
        Self {
            app: Some(app.into()),
            env: Some(env.into()),
        }
    }

    /// Fill unset fields from `defaults`.
    pub fn or(&self, defaults: &ConfigIdentifiers) -> ConfigIdentifiers {
        ConfigIdentifiers {
            app: self.app.clone().or_else(|| defaults.app.clone()),
            env: self.env.clone().or_else(|| defaults.env.clone()),
        }
    }
}
