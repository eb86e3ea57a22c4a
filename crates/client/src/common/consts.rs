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

//! Core constants for the AlphaHub feed client.

use std::time::Duration;

/// User agent sent with HTTP requests.
pub const ALPHAHUB_USER_AGENT: &str = concat!("alphahub-client/", env!("CARGO_PKG_VERSION"));

// Production URLs
pub const ALPHAHUB_HTTP_URL: &str = "https://alphahub.us";
pub const ALPHAHUB_WS_URL: &str = "wss://alphahub.us/socket/websocket";

// API paths
pub const ALPHAHUB_SESSION_PATH: &str = "/api/v1/session";

// Channel protocol
pub const PHOENIX_VSN: &str = "2.0.0";
pub const SYSTEM_TOPIC: &str = "phoenix";
pub const ALGORITHMS_TOPIC_PREFIX: &str = "algorithms:";
pub const REPLY_STATUS_OK: &str = "ok";

/// Algorithm channels subscribed to when the caller names none.
pub const DEFAULT_ALGO_IDS: [u32; 3] = [14, 16, 17];

// Timing defaults
/// Validity window applied to a freshly issued bearer token, kept under the server's
/// 30-minute limit.
pub const TOKEN_VALIDITY: Duration = Duration::from_secs(29 * 60);
/// Maximum outbound silence before a heartbeat is due.
pub const LIVENESS_INTERVAL: Duration = Duration::from_secs(15);
/// Bounded wait applied to a single receive, letting the liveness check run during
/// feed silence.
pub const RECEIVE_WAIT: Duration = Duration::from_secs(5);
/// Deadline for completing the subscription phase after the transport opens.
pub const SUBSCRIBE_TIMEOUT: Duration = Duration::from_secs(15);
/// Delay before restarting after a recovered failure.
pub const RECOVERY_DELAY: Duration = Duration::from_secs(5);
/// Overall timeout for a login request.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);
