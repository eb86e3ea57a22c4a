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

//! Error types for the AlphaHub feed client.

use alphahub_fsm::EngineError;
use thiserror::Error;
use tokio_tungstenite::tungstenite;
use tokio_tungstenite::tungstenite::error::ProtocolError;

/// Result alias for feed-client operations.
pub type FeedResult<T> = Result<T, FeedError>;

/// Errors produced by the feed client.
#[derive(Clone, Debug, Error)]
pub enum FeedError {
    /// Invalid construction arguments; raised before any network access.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// HTTP or WebSocket I/O failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The peer closed the transport underneath a send or receive.
    #[error("transport closed")]
    TransportClosed,

    /// Malformed or semantically invalid message.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Unrecoverable engine condition.
    #[error("state error: {0}")]
    State(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

impl From<tungstenite::Error> for FeedError {
    fn from(error: tungstenite::Error) -> Self {
        match error {
            tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                Self::TransportClosed
            }
            tungstenite::Error::Protocol(ProtocolError::ResetWithoutClosingHandshake) => {
                Self::TransportClosed
            }
            other => Self::Transport(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(error: serde_json::Error) -> Self {
        Self::Protocol(format!("malformed frame: {error}"))
    }
}

impl From<EngineError> for FeedError {
    fn from(error: EngineError) -> Self {
        Self::State(error.to_string())
    }
}
