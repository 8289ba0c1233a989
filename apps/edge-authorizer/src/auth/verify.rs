// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signature and standard-claim verification.

use jsonwebtoken::{decode, decode_header, Validation};

use super::claims::AccessTokenClaims;
use super::error::AuthError;
use super::jwks::JwksManager;

/// Verify `token` against the key set and the expected issuer.
///
/// Checks signature, an exact `iss` match and, when present, `exp` and `nbf`
/// with no clock tolerance: a token is rejected the second it expires.
/// Audience is not validated here; Cognito access tokens carry `client_id`
/// instead, which [`AccessTokenClaims::check_policy`] handles.
pub async fn verify_access_token(
    token: &str,
    jwks: &JwksManager,
    issuer: &str,
) -> Result<AccessTokenClaims, AuthError> {
    let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;

    let (decoding_key, algorithm) = match &header.kid {
        Some(kid) => jwks.get_decoding_key(kid).await?,
        None => jwks.get_any_decoding_key().await?,
    };

    let mut validation = Validation::new(algorithm);
    validation.leeway = 0;
    validation.validate_nbf = true;
    validation.set_issuer(&[issuer]);
    validation.set_required_spec_claims(&["iss"]);
    validation.validate_aud = false;

    let token_data = decode::<AccessTokenClaims>(token, &decoding_key, &validation)?;
    Ok(token_data.claims)
}
