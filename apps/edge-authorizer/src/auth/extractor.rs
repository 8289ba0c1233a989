// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token extraction from the authorizer event.
//!
//! The token is taken from `Authorization: Bearer <jwt>` when present,
//! otherwise from the `access_token` cookie:
//!
//! ```text
//! Authorization: Bearer eyJ...          → "eyJ..."
//! cookies: ["theme=dark", "access_token=eyJ..."] → "eyJ..."
//! Cookie: theme=dark; access_token=eyJ...        → "eyJ..."
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Cookie carrying the access token when no bearer header is sent.
pub const COOKIE_NAME: &str = "access_token";

const BEARER_PREFIX: &str = "bearer ";

/// The subset of the HTTP API (payload v2.0) authorizer event we consume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorizerRequest {
    /// Request headers. API Gateway lowercases names, local callers may not.
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: HashMap<String, String>,

    /// Raw `name=value` cookie strings, in request order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies: Option<Vec<String>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl AuthorizerRequest {
    /// Header value by name. An exact lowercase key wins over other casings;
    /// empty values are skipped so an empty `authorization` falls through to
    /// `Authorization`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .filter(|value| !value.is_empty())
            .or_else(|| {
                self.headers
                    .iter()
                    .find(|(key, value)| key.eq_ignore_ascii_case(name) && !value.is_empty())
                    .map(|(_, value)| value)
            })
            .map(String::as_str)
    }

    /// Cookie header assembled from `cookies`, or the `Cookie` header.
    fn cookie_header(&self) -> String {
        match &self.cookies {
            Some(cookies) if !cookies.is_empty() => cookies.join("; "),
            _ => self.header("cookie").unwrap_or_default().to_string(),
        }
    }
}

/// Locate the access token in a request.
///
/// Returns `None` when neither a bearer header nor the `access_token` cookie
/// yields a non-empty token.
pub fn token_from_request(request: &AuthorizerRequest) -> Option<String> {
    if let Some(auth) = request.header("authorization") {
        let is_bearer = auth
            .get(..BEARER_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(BEARER_PREFIX));
        if is_bearer {
            let token = auth[BEARER_PREFIX.len()..].trim();
            return (!token.is_empty()).then(|| token.to_string());
        }
    }

    let cookie_header = request.cookie_header();
    cookie_header
        .split(';')
        .map(str::trim)
        .find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key == COOKIE_NAME).then_some(value)
        })
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
