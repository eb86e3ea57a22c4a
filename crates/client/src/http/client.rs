// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! HTTP client for the AlphaHub session API.

use std::time::Duration;

use crate::{
    common::{consts::ALPHAHUB_USER_AGENT, credential::Credential},
    error::{FeedError, FeedResult},
    http::models::{SessionResponse, SessionTokens},
};

/// Client for the AlphaHub session endpoint.
#[derive(Clone, Debug)]
pub struct SessionClient {
    client: reqwest::Client,
    session_url: String,
}

impl SessionClient {
    /// Creates a session client against the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Configuration`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(session_url: String, timeout: Duration) -> FeedResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(ALPHAHUB_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::Configuration(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            session_url,
        })
    }

    /// Logs in and returns the issued token pair.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Transport`] if the request fails or the server
    /// responds with a non-success status, and [`FeedError::Protocol`] if the
    /// response body cannot be decoded.
    pub async fn login(&self, credential: &Credential) -> FeedResult<SessionTokens> {
        tracing::debug!(url = %self.session_url, "Requesting session token");
        let response = self
            .client
            .post(&self.session_url)
            .form(&[
                ("user[email]", credential.email()),
                ("user[password]", credential.password()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let parsed: SessionResponse = serde_json::from_str(&body)
            .map_err(|e| FeedError::Protocol(format!("session response decode: {e}")))?;
        Ok(parsed.data)
    }
}
