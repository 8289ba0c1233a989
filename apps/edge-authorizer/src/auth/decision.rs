// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorizer decision (HTTP API simple response format).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::claims::AccessTokenClaims;
use super::error::{AuthError, DenialReason};

/// `{ "isAuthorized": bool, "context": { ... } }`
///
/// Denials carry `context.reason`; approvals carry `sub`, `scope` and
/// `username`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub is_authorized: bool,
    pub context: BTreeMap<String, String>,
}

impl Decision {
    pub fn deny(reason: DenialReason) -> Self {
        let mut context = BTreeMap::new();
        context.insert("reason".to_string(), reason.as_str().to_string());
        Self {
            is_authorized: false,
            context,
        }
    }

    pub fn allow(claims: &AccessTokenClaims) -> Self {
        let context = BTreeMap::from([
            ("sub".to_string(), claims.sub_or_empty().to_string()),
            ("scope".to_string(), claims.scope_or_empty().to_string()),
            ("username".to_string(), claims.username_or_empty().to_string()),
        ]);
        Self {
            is_authorized: true,
            context,
        }
    }

    /// Map a verification outcome to a decision.
    pub fn from_outcome(
        outcome: &Result<AccessTokenClaims, AuthError>,
        expected_client_id: Option<&str>,
    ) -> Self {
        match outcome {
            Err(err) => Self::deny(err.reason()),
            Ok(claims) => match claims.check_policy(expected_client_id) {
                Ok(()) => Self::allow(claims),
                Err(reason) => Self::deny(reason),
            },
        }
    }

    /// Denial reason, if any.
    pub fn reason(&self) -> Option<&str> {
        self.context.get("reason").map(String::as_str)
    }
}
