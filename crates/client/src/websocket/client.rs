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

//! High level client for the AlphaHub signal feed.

use std::sync::Arc;

use alphahub_fsm::{Engine, EngineHandle};

use crate::{
    common::{credential::Credential, enums::FeedState},
    config::FeedConfig,
    error::FeedResult,
    websocket::{
        connection::FeedConnection,
        dispatch::{LogSignalHandler, SignalHandler},
    },
};

/// Client maintaining a long-lived AlphaHub feed session.
///
/// [`run`](Self::run) drives the session until [`EngineHandle::stop`] is
/// called or a fatal condition halts the engine. Transient failures are
/// recovered internally with the configured delay.
#[derive(Debug)]
pub struct AlphaHubFeedClient {
    engine: Engine<FeedConnection>,
}

impl AlphaHubFeedClient {
    /// Creates a client which logs each received signal.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Configuration`](crate::error::FeedError::Configuration)
    /// if the configuration is invalid.
    pub fn new(config: FeedConfig, credential: Credential) -> FeedResult<Self> {
        Self::with_handler(config, credential, Arc::new(LogSignalHandler))
    }

    /// Creates a client delivering signals to the given handler.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Configuration`](crate::error::FeedError::Configuration)
    /// if the configuration is invalid.
    pub fn with_handler(
        config: FeedConfig,
        credential: Credential,
        handler: Arc<dyn SignalHandler>,
    ) -> FeedResult<Self> {
        let connection = FeedConnection::new(config, credential, handler)?;
        Ok(Self {
            engine: Engine::new(connection),
        })
    }

    /// Handle for requesting a graceful stop from another task.
    #[must_use]
    pub fn stop_handle(&self) -> EngineHandle {
        self.engine.handle()
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> FeedState {
        self.engine.state()
    }

    /// Runs the session until stopped or halted by a fatal condition.
    ///
    /// The transport is closed and in-flight signal deliveries are drained
    /// before returning, for both outcomes.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::State`](crate::error::FeedError::State) when the
    /// engine halts on a fatal condition.
    pub async fn run(&mut self) -> FeedResult<()> {
        let result = self.engine.run().await;
        self.engine.machine_mut().shutdown().await;
        result.map_err(Into::into)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::error::FeedError;

    fn credential() -> Credential {
        Credential::new("user@example.com", "pw").unwrap()
    }

    #[rstest]
    fn new_client_starts_in_the_initial_state() {
        let client = AlphaHubFeedClient::new(FeedConfig::default(), credential()).unwrap();
        assert_eq!(client.state(), FeedState::Init);
        assert!(!client.stop_handle().is_stop_requested());
    }

    #[rstest]
    fn invalid_config_fails_construction() {
        let result = AlphaHubFeedClient::new(FeedConfig::new(vec![]), credential());
        assert!(matches!(result, Err(FeedError::Configuration(_))));
    }
}
