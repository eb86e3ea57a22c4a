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

//! Enumerations for the AlphaHub feed client.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Connection lifecycle state tags.
///
/// Exactly one is active at any time; transitions are owned by the state handlers.
#[derive(
    Clone, Copy, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord, AsRefStr, EnumIter,
    EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedState {
    /// No session; authenticate against the HTTP endpoint.
    Init,
    /// Holding a valid token; open the transport.
    Authenticated,
    /// Transport open; prepare subscription bookkeeping.
    Connected,
    /// Joining algorithm channels and awaiting acknowledgments.
    Subscribing,
    /// Receiving feed traffic.
    Receiving,
    /// Liveness deadline elapsed; a heartbeat is due.
    Stale,
    /// Transport lost; decide between token reuse and full re-authentication.
    Reconnecting,
    /// A handler failed; recover after a fixed delay.
    Error,
    /// Terminal; requests engine stop.
    Done,
}

/// Wire event names on the channel transport.
#[derive(
    Clone, Copy, Debug, Display, Hash, PartialEq, Eq, AsRefStr, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ChannelEvent {
    PhxJoin,
    PhxReply,
    PhxClose,
    NewSignals,
    Heartbeat,
}

/// Trade direction within a signal payload.
#[derive(
    Clone, Copy, Debug, Display, Hash, PartialEq, Eq, AsRefStr, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(FeedState::Init, "INIT")]
    #[case(FeedState::Subscribing, "SUBSCRIBING")]
    #[case(FeedState::Receiving, "RECEIVING")]
    #[case(FeedState::Done, "DONE")]
    fn feed_state_displays_uppercase(#[case] state: FeedState, #[case] expected: &str) {
        assert_eq!(state.to_string(), expected);
    }

    #[rstest]
    #[case("phx_join", ChannelEvent::PhxJoin)]
    #[case("phx_reply", ChannelEvent::PhxReply)]
    #[case("phx_close", ChannelEvent::PhxClose)]
    #[case("new_signals", ChannelEvent::NewSignals)]
    #[case("heartbeat", ChannelEvent::Heartbeat)]
    fn channel_event_parses_wire_names(#[case] raw: &str, #[case] expected: ChannelEvent) {
        assert_eq!(raw.parse::<ChannelEvent>().unwrap(), expected);
        assert_eq!(expected.to_string(), raw);
    }

    #[rstest]
    fn unknown_event_does_not_parse() {
        assert!("presence_diff".parse::<ChannelEvent>().is_err());
    }

    #[rstest]
    fn side_uses_lowercase_wire_form() {
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), "\"buy\"");
        assert_eq!(serde_json::from_str::<Side>("\"sell\"").unwrap(), Side::Sell);
    }
}
