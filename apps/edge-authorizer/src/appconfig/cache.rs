// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Process-lifetime profile cache.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::parse::parse_payload;
use super::path::lookup_path;
use super::{ConfigError, ConfigIdentifiers, ConfigSource, LoadOptions};

/// Parsed profiles and session tokens, keyed by profile name.
///
/// Both maps only grow. Concurrent cold loads of the same profile may each
/// reach the remote service; the first value stored wins and later writers
/// adopt it.
pub struct ConfigCache {
    source: Arc<dyn ConfigSource>,
    defaults: ConfigIdentifiers,
    profiles: RwLock<HashMap<String, Arc<Value>>>,
    session_tokens: RwLock<HashMap<String, String>>,
}

impl ConfigCache {
    /// Create an empty cache over `source`.
    ///
    /// `defaults` supplies the application/environment identifiers when a
    /// call does not override them (normally `APP_NAME` / `ENVIRONMENT`).
    pub fn new(source: Arc<dyn ConfigSource>, defaults: ConfigIdentifiers) -> Self {
        Self {
            source,
            defaults,
            profiles: RwLock::new(HashMap::new()),
            session_tokens: RwLock::new(HashMap::new()),
        }
    }

    /// Load a profile, from cache when possible.
    pub async fn load_profile(
        &self,
        profile: &str,
        opts: &LoadOptions,
    ) -> Result<Arc<Value>, ConfigError> {
        if profile.is_empty() {
            return Err(ConfigError::EmptyProfileName);
        }

        if let Some(cached) = self.profiles.read().await.get(profile) {
            return Ok(Arc::clone(cached));
        }

        let token = self.session_token(profile, opts).await?;

        let payload = self
            .source
            .latest_configuration(&token)
            .await?
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| ConfigError::EmptyPayload(profile.to_string()))?;

        let raw = String::from_utf8_lossy(&payload);
        let (format, value) = parse_payload(&raw);
        info!(
            profile,
            format = format.as_str(),
            bytes = payload.len(),
            "Loaded AppConfig profile"
        );

        let mut profiles = self.profiles.write().await;
        let stored = profiles
            .entry(profile.to_string())
            .or_insert_with(|| Arc::new(value));
        Ok(Arc::clone(stored))
    }

    /// Look up `key` (dot path) in a profile.
    ///
    /// An empty or absent key returns the whole profile. Unresolvable paths
    /// return `fallback`.
    pub async fn get_config_value(
        &self,
        profile: &str,
        key: Option<&str>,
        fallback: Option<Value>,
        opts: &LoadOptions,
    ) -> Result<Option<Value>, ConfigError> {
        let config = self.load_profile(profile, opts).await?;

        match key.filter(|k| !k.is_empty()) {
            None => Ok(Some(config.as_ref().clone())),
            Some(path) => Ok(lookup_path(&config, path, fallback)),
        }
    }

    /// Check whether a profile is already cached.
    pub async fn is_cached(&self, profile: &str) -> bool {
        self.profiles.read().await.contains_key(profile)
    }

    /// Session token for `profile`, starting a session on first use.
    async fn session_token(&self, profile: &str, opts: &LoadOptions) -> Result<String, ConfigError> {
        if let Some(token) = self.session_tokens.read().await.get(profile) {
            return Ok(token.clone());
        }

        let ids = opts.or(&self.defaults);
        let app = ids
            .app
            .as_deref()
            .ok_or(ConfigError::MissingIdentifier("application"))?;
        let env = ids
            .env
            .as_deref()
            .ok_or(ConfigError::MissingIdentifier("environment"))?;

        debug!(profile, app, env, "Starting AppConfig session");
        let token = self.source.start_session(app, env, profile).await?;

        let mut tokens = self.session_tokens.write().await;
        Ok(tokens
            .entry(profile.to_string())
            .or_insert(token)
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory source counting calls.
    struct StaticSource {
        payload: Option<Vec<u8>>,
        sessions: AtomicUsize,
        fetches: AtomicUsize,
        seen: Mutex<Vec<(String, String, String)>>,
    }

    impl StaticSource {
        fn new(payload: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                payload: payload.map(|p| p.as_bytes().to_vec()),
                sessions: AtomicUsize::new(0),
                fetches: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ConfigSource for StaticSource {
        async fn start_session(
            &self,
            app: &str,
            env: &str,
            profile: &str,
        ) -> Result<String, ConfigError> {
            self.sessions.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push((app.to_string(), env.to_string(), profile.to_string()));
            Ok(format!("token-{profile}"))
        }

        async fn latest_configuration(&self, token: &str) -> Result<Option<Vec<u8>>, ConfigError> {
            assert!(token.starts_with("token-"));
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.payload.clone())
        }
    }

    fn cache_over(source: Arc<StaticSource>) -> ConfigCache {
        ConfigCache::new(source, ConfigIdentifiers::new("wallet", "preprod"))
    }

    #[tokio::test]
    async fn second_load_is_served_from_cache() {
        let source = StaticSource::new(Some(r#"{"a":1}"#));
        let cache = cache_over(source.clone());

        let first = cache.load_profile("p", &LoadOptions::default()).await.unwrap();
        let second = cache.load_profile("p", &LoadOptions::default()).await.unwrap();

        assert_eq!(*first, json!({"a": 1}));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.sessions.load(Ordering::SeqCst), 1);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert!(cache.is_cached("p").await);
    }

    #[tokio::test]
    async fn session_uses_default_identifiers_unless_overridden() {
        let source = StaticSource::new(Some("x: 1"));
        let cache = cache_over(source.clone());

        cache.load_profile("one", &LoadOptions::default()).await.unwrap();
        let opts = LoadOptions {
            app: None,
            env: Some("prod".to_string()),
        };
        cache.load_profile("two", &opts).await.unwrap();

        let seen = source.seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                ("wallet".to_string(), "preprod".to_string(), "one".to_string()),
                ("wallet".to_string(), "prod".to_string(), "two".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn empty_payload_is_an_error_and_keeps_session() {
        let source = StaticSource::new(None);
        let cache = cache_over(source.clone());

        let err = cache.load_profile("p", &LoadOptions::default()).await.unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPayload(ref p) if p == "p"));
        assert!(!cache.is_cached("p").await);

        // The session token is reused on retry.
        let _ = cache.load_profile("p", &LoadOptions::default()).await;
        assert_eq!(source.sessions.load(Ordering::SeqCst), 1);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn zero_length_payload_is_empty() {
        let source = StaticSource::new(Some(""));
        let cache = cache_over(source);
        let err = cache.load_profile("p", &LoadOptions::default()).await.unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPayload(_)));
    }

    #[tokio::test]
    async fn empty_profile_name_is_rejected() {
        let source = StaticSource::new(Some("{}"));
        let cache = cache_over(source.clone());
        let err = cache.load_profile("", &LoadOptions::default()).await.unwrap_err();
        assert!(matches!(err, ConfigError::EmptyProfileName));
        assert_eq!(source.sessions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_application_identifier_fails_before_network() {
        let source = StaticSource::new(Some("{}"));
        let cache = ConfigCache::new(
            source.clone(),
            ConfigIdentifiers {
                app: None,
                env: Some("preprod".to_string()),
            },
        );
        let err = cache.load_profile("p", &LoadOptions::default()).await.unwrap_err();
        assert!(matches!(err, ConfigError::MissingIdentifier("application")));
        assert_eq!(source.sessions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn get_config_value_walks_dot_path() {
        let cases = [
            (r#"{"a":{"b":5}}"#, json!(5)),
            (r#"{"a":{}}"#, json!("fallback")),
            ("{}", json!("fallback")),
        ];

        for (payload, expected) in cases {
            let cache = cache_over(StaticSource::new(Some(payload)));
            let value = cache
                .get_config_value("p", Some("a.b"), Some(json!("fallback")), &LoadOptions::default())
                .await
                .unwrap();
            assert_eq!(value, Some(expected), "payload {payload}");
        }
    }

    #[tokio::test]
    async fn get_config_value_without_key_returns_profile() {
        let cache = cache_over(StaticSource::new(Some("plain-secret")));
        let whole = cache
            .get_config_value("p", None, None, &LoadOptions::default())
            .await
            .unwrap();
        assert_eq!(whole, Some(json!("plain-secret")));

        let empty_key = cache
            .get_config_value("p", Some(""), None, &LoadOptions::default())
            .await
            .unwrap();
        assert_eq!(empty_key, Some(json!("plain-secret")));
    }
}
