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

//! Client for the [AlphaHub](https://alphahub.us) market signal feed.
//!
//! AlphaHub pushes trade signals over Phoenix channels layered on a websocket
//! connection, guarded by a short-lived bearer token obtained from an HTTP
//! login endpoint. This crate maintains that session end to end: it logs in,
//! connects, joins the configured algorithm channels, and delivers incoming
//! signals to a [`SignalHandler`] while keeping the connection alive with
//! heartbeats. Disconnects and transient failures are recovered
//! automatically, reusing the session token while it remains valid.
//!
//! The session lifecycle is modeled as a state machine driven by the
//! [`alphahub_fsm`] engine; [`AlphaHubFeedClient`] is the high level entry
//! point wrapping both.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod common;
pub mod config;
pub mod error;
pub mod http;
pub mod websocket;

pub use crate::{
    common::{credential::Credential, enums::FeedState},
    config::FeedConfig,
    error::{FeedError, FeedResult},
    websocket::{
        client::AlphaHubFeedClient,
        dispatch::{LogSignalHandler, SignalHandler},
        messages::{SignalPayload, TradeEvent},
    },
};
