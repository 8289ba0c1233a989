// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures: an in-memory AppConfig source, a mocked user pool JWKS
//! endpoint and RS256 token signing.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use relational_edge_authorizer::appconfig::{
    ConfigCache, ConfigError, ConfigIdentifiers, ConfigSource,
};
use relational_edge_authorizer::auth::{
    AuthServerParams, Authorizer, AuthorizerRequest, AuthorizerSettings,
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SIGNING_KEY: &[u8] = include_bytes!("../fixtures/signing.pem");
pub const ROGUE_KEY: &[u8] = include_bytes!("../fixtures/rogue.pem");
pub const JWKS: &str = include_str!("../fixtures/jwks.json");

pub const KID: &str = "signing-key-1";
pub const USER_POOL_ID: &str = "eu-west-3_TestPool";
pub const CLIENT_ID: &str = "client-abc";

pub const JWKS_PATH: &str = "/eu-west-3_TestPool/.well-known/jwks.json";

/// AppConfig stand-in serving one fixed payload.
pub struct InMemorySource {
    payload: String,
    pub sessions: AtomicUsize,
    pub fetches: AtomicUsize,
}

impl InMemorySource {
    pub fn new(payload: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            payload: payload.into(),
            sessions: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigSource for InMemorySource {
    async fn start_session(&self, _: &str, _: &str, profile: &str) -> Result<String, ConfigError> {
        self.sessions.fetch_add(1, Ordering::SeqCst);
        Ok(format!("session-{profile}"))
    }

    async fn latest_configuration(&self, _: &str) -> Result<Option<Vec<u8>>, ConfigError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(Some(self.payload.as_bytes().to_vec()))
    }
}

/// `cognito` profile pointing at the test pool.
pub fn cognito_profile() -> String {
    json!({
        "preprod": {
            "CLIENT_ID": CLIENT_ID,
            "REGION": "eu-west-3",
            "USER_POOL_ID": USER_POOL_ID
        }
    })
    .to_string()
}

/// Mock user pool serving the fixture JWKS.
pub async fn start_user_pool() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(JWKS))
        .mount(&server)
        .await;
    server
}

pub fn issuer(server: &MockServer) -> String {
    format!("{}/{}", server.uri(), USER_POOL_ID)
}

pub fn authorizer_for(server: &MockServer, source: Arc<InMemorySource>) -> Authorizer {
    let cache = ConfigCache::new(source, ConfigIdentifiers::new("wallet", "preprod"));
    let settings = AuthorizerSettings::new("preprod", AuthServerParams::default())
        .with_issuer_base_url(server.uri());
    Authorizer::new(Arc::new(cache), settings)
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Claims of a valid access token for the test pool.
pub fn access_claims(server: &MockServer) -> Value {
    json!({
        "sub": "u1",
        "iss": issuer(server),
        "client_id": CLIENT_ID,
        "scope": "read",
        "username": "alice",
        "iat": now(),
        "exp": now() + 3600
    })
}

pub fn sign_with(claims: &Value, pem: &[u8], kid: Option<&str>) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    let key = EncodingKey::from_rsa_pem(pem).expect("fixture key parses");
    encode(&header, claims, &key).expect("token signs")
}

pub fn sign(claims: &Value) -> String {
    sign_with(claims, SIGNING_KEY, Some(KID))
}

pub fn bearer(token: &str) -> AuthorizerRequest {
    AuthorizerRequest {
        headers: [("authorization".to_string(), format!("Bearer {token}"))].into(),
        cookies: None,
    }
}

pub fn cookie(token: &str) -> AuthorizerRequest {
    AuthorizerRequest {
        headers: Default::default(),
        cookies: Some(vec![
            "theme=dark".to_string(),
            format!("access_token={token}"),
        ]),
    }
}
