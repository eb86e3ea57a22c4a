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

//! Configuration for the AlphaHub feed client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    common::consts::{
        ALPHAHUB_HTTP_URL, ALPHAHUB_SESSION_PATH, ALPHAHUB_WS_URL, DEFAULT_ALGO_IDS, HTTP_TIMEOUT,
        LIVENESS_INTERVAL, PHOENIX_VSN, RECEIVE_WAIT, RECOVERY_DELAY, SUBSCRIBE_TIMEOUT,
        TOKEN_VALIDITY,
    },
    error::{FeedError, FeedResult},
};

/// Configuration for [`AlphaHubFeedClient`](crate::websocket::client::AlphaHubFeedClient).
///
/// The default values target the production AlphaHub endpoints with the documented
/// session and liveness timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Base URL for the HTTP API.
    pub http_url: String,
    /// Base URL for the websocket endpoint.
    pub ws_url: String,
    /// Algorithm channels to subscribe to.
    pub algo_ids: Vec<u32>,
    /// Maximum wait for a single frame before the receive loop re-checks liveness.
    pub receive_wait: Duration,
    /// Maximum quiet period before the connection is probed with a heartbeat.
    pub liveness_interval: Duration,
    /// Deadline for all subscriptions to be confirmed after a connect.
    pub subscribe_timeout: Duration,
    /// Lifetime of a session token before a full re-login is required.
    pub token_validity: Duration,
    /// Pause before restarting the session after a failure.
    pub recovery_delay: Duration,
    /// Timeout applied to each HTTP request.
    pub http_timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            http_url: ALPHAHUB_HTTP_URL.to_string(),
            ws_url: ALPHAHUB_WS_URL.to_string(),
            algo_ids: DEFAULT_ALGO_IDS.to_vec(),
            receive_wait: RECEIVE_WAIT,
            liveness_interval: LIVENESS_INTERVAL,
            subscribe_timeout: SUBSCRIBE_TIMEOUT,
            token_validity: TOKEN_VALIDITY,
            recovery_delay: RECOVERY_DELAY,
            http_timeout: HTTP_TIMEOUT,
        }
    }
}

impl FeedConfig {
    /// Creates a configuration for the production endpoints with the given
    /// algorithm channels.
    #[must_use]
    pub fn new(algo_ids: Vec<u32>) -> Self {
        Self {
            algo_ids,
            ..Default::default()
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Configuration`] if no algorithm IDs are configured,
    /// or if any ID is zero.
    pub fn validate(&self) -> FeedResult<()> {
        if self.algo_ids.is_empty() {
            return Err(FeedError::Configuration(
                "at least one algorithm ID is required".to_string(),
            ));
        }
        if self.algo_ids.contains(&0) {
            return Err(FeedError::Configuration(
                "algorithm IDs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Full URL for the session login endpoint.
    #[must_use]
    pub fn session_url(&self) -> String {
        format!("{}{}", self.http_url, ALPHAHUB_SESSION_PATH)
    }

    /// Full websocket URL carrying the protocol version and session token.
    #[must_use]
    pub fn connect_url(&self, token: &str) -> String {
        format!("{}?vsn={}&api_token={}", self.ws_url, PHOENIX_VSN, token)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
