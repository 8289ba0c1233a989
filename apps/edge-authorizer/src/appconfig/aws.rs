// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! AppConfig Data client.

use async_trait::async_trait;
use aws_sdk_appconfigdata::error::DisplayErrorContext;
use aws_sdk_appconfigdata::Client;

use super::{ConfigError, ConfigSource};

/// [`ConfigSource`] backed by the AWS AppConfig Data API.
#[derive(Debug, Clone)]
pub struct AppConfigDataSource {
    client: Client,
}

impl AppConfigDataSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default AWS credential/region chain.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl ConfigSource for AppConfigDataSource {
    async fn start_session(
        &self,
        app: &str,
        env: &str,
        profile: &str,
    ) -> Result<String, ConfigError> {
        let output = self
            .client
            .start_configuration_session()
            .application_identifier(app)
            .environment_identifier(env)
            .configuration_profile_identifier(profile)
            .send()
            .await
            .map_err(|e| ConfigError::Session(DisplayErrorContext(&e).to_string()))?;

        output
            .initial_configuration_token()
            .map(str::to_string)
            .ok_or_else(|| ConfigError::Session("no initial configuration token".to_string()))
    }

    async fn latest_configuration(&self, token: &str) -> Result<Option<Vec<u8>>, ConfigError> {
        let output = self
            .client
            .get_latest_configuration()
            .configuration_token(token)
            .send()
            .await
            .map_err(|e| ConfigError::Fetch(DisplayErrorContext(&e).to_string()))?;

        Ok(output.configuration().map(|blob| blob.as_ref().to_vec()))
    }
}
