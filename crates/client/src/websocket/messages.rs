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

//! Message types for the AlphaHub websocket protocol.
//!
//! Every frame on the wire is a JSON array of five elements:
//! `[join_ref, message_ref, topic, event, payload]`.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    common::{
        consts::{ALGORITHMS_TOPIC_PREFIX, REPLY_STATUS_OK, SYSTEM_TOPIC},
        enums::{ChannelEvent, Side},
    },
    error::FeedResult,
};

/// A single websocket frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireFrame", into = "WireFrame")]
pub struct Frame {
    /// Reference of the join that opened the channel, `null` when unused.
    pub join_ref: Value,
    /// Reference correlating replies to requests, `null` when unused.
    pub message_ref: Value,
    /// Channel topic the frame belongs to.
    pub topic: String,
    /// Event name.
    pub event: String,
    /// Event payload.
    pub payload: Value,
}

/// Wire form of a frame, a positional five element array.
#[derive(Serialize, Deserialize)]
struct WireFrame(Value, Value, String, String, Value);

impl From<WireFrame> for Frame {
    fn from(wire: WireFrame) -> Self {
        Self {
            join_ref: wire.0,
            message_ref: wire.1,
            topic: wire.2,
            event: wire.3,
            payload: wire.4,
        }
    }
}

impl From<Frame> for WireFrame {
    fn from(frame: Frame) -> Self {
        Self(
            frame.join_ref,
            frame.message_ref,
            frame.topic,
            frame.event,
            frame.payload,
        )
    }
}

impl Frame {
    /// Creates a join request for the given algorithm channel.
    #[must_use]
    pub fn join(algo_id: u32) -> Self {
        Self {
            join_ref: Value::Null,
            message_ref: Value::Null,
            topic: format!("{ALGORITHMS_TOPIC_PREFIX}{algo_id}"),
            event: ChannelEvent::PhxJoin.as_ref().to_string(),
            payload: json!({}),
        }
    }

    /// Creates a heartbeat probe for the system channel.
    #[must_use]
    pub fn heartbeat() -> Self {
        Self {
            join_ref: Value::Null,
            message_ref: Value::Null,
            topic: SYSTEM_TOPIC.to_string(),
            event: ChannelEvent::Heartbeat.as_ref().to_string(),
            payload: json!({}),
        }
    }

    /// Encodes the frame to its wire form.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Protocol`](crate::error::FeedError::Protocol) if
    /// serialization fails.
    pub fn encode(&self) -> FeedResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a frame from its wire form.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Protocol`](crate::error::FeedError::Protocol) if
    /// the text is not a valid five element frame.
    pub fn decode(text: &str) -> FeedResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Returns the event as a [`ChannelEvent`] when it is one the client handles.
    #[must_use]
    pub fn known_event(&self) -> Option<ChannelEvent> {
        self.event.parse().ok()
    }
}

/// Classification of a frame topic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    /// An algorithm signal channel.
    Algorithm(u32),
    /// The Phoenix system channel carrying heartbeats.
    System,
    /// A topic the client does not track.
    Unknown,
}

impl Channel {
    /// Classifies a topic string.
    #[must_use]
    pub fn parse(topic: &str) -> Self {
        if topic == SYSTEM_TOPIC {
            return Self::System;
        }
        match topic.strip_prefix(ALGORITHMS_TOPIC_PREFIX) {
            Some(suffix) => suffix.parse::<u32>().map_or(Self::Unknown, Self::Algorithm),
            None => Self::Unknown,
        }
    }
}

/// Payload of a `phx_reply` frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplyPayload {
    /// Reply status, `"ok"` on success.
    pub status: String,
    /// Response body, empty object when the reply carries nothing.
    #[serde(default)]
    pub response: Value,
}

impl ReplyPayload {
    /// Whether the reply reports success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == REPLY_STATUS_OK
    }
}

/// Payload of a `new_signals` frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalPayload {
    /// Positions to open.
    #[serde(default)]
    pub open: Vec<TradeEvent>,
    /// Positions to close.
    #[serde(default)]
    pub close: Vec<TradeEvent>,
}

/// A single trade instruction within a signal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    /// Instruction price.
    pub price: f64,
    /// Trade direction.
    pub side: Side,
    /// Instrument symbol.
    pub symbol: String,
    /// Server-side timestamp, passed through verbatim.
    pub timestamp: String,
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::error::FeedError;

    #[rstest]
    fn join_frame_encodes_to_wire_form() {
        let frame = Frame::join(14);
        assert_eq!(
            frame.encode().unwrap(),
            r#"[null,null,"algorithms:14","phx_join",{}]"#,
        );
    }

    #[rstest]
    fn heartbeat_frame_encodes_to_wire_form() {
        let frame = Frame::heartbeat();
        assert_eq!(
            frame.encode().unwrap(),
            r#"[null,null,"phoenix","heartbeat",{}]"#,
        );
    }

    #[rstest]
    fn signal_frame_decodes_with_payload() {
        let text = r#"[null,null,"algorithms:14","new_signals",{"open":[{"price":187.5,"side":"buy","symbol":"AAPL","timestamp":"2025-01-03T14:30:00Z"}],"close":[]}]"#;
        let frame = Frame::decode(text).unwrap();
        assert_eq!(frame.topic, "algorithms:14");
        assert_eq!(frame.known_event(), Some(ChannelEvent::NewSignals));

        let payload: SignalPayload = serde_json::from_value(frame.payload).unwrap();
        assert_eq!(payload.open.len(), 1);
        assert!(payload.close.is_empty());
        assert_eq!(payload.open[0].symbol, "AAPL");
        assert_eq!(payload.open[0].side, Side::Buy);
        assert_eq!(payload.open[0].price, 187.5);
    }

    #[rstest]
    fn signal_payload_defaults_missing_lists() {
        let payload: SignalPayload = serde_json::from_value(json!({})).unwrap();
        assert!(payload.open.is_empty());
        assert!(payload.close.is_empty());
    }

    #[rstest]
    fn malformed_frame_is_a_protocol_error() {
        let result = Frame::decode(r#"{"not":"a frame"}"#);
        assert!(matches!(result, Err(FeedError::Protocol(_))));
    }

    #[rstest]
    #[case("algorithms:14", Channel::Algorithm(14))]
    #[case("algorithms:7", Channel::Algorithm(7))]
    #[case("phoenix", Channel::System)]
    #[case("algorithms:xyz", Channel::Unknown)]
    #[case("algorithms:", Channel::Unknown)]
    #[case("prices:14", Channel::Unknown)]
    fn channel_classifies_topics(#[case] topic: &str, #[case] expected: Channel) {
        assert_eq!(Channel::parse(topic), expected);
    }

    #[rstest]
    #[case(r#"{"status":"ok","response":{}}"#, true)]
    #[case(r#"{"status":"error","response":{"reason":"unauthorized"}}"#, false)]
    #[case(r#"{"status":"ok"}"#, true)]
    fn reply_payload_reports_status(#[case] json: &str, #[case] ok: bool) {
        let reply: ReplyPayload = serde_json::from_str(json).unwrap();
        assert_eq!(reply.is_ok(), ok);
    }

    #[rstest]
    fn frame_round_trips_through_wire_form() {
        let text = r#"[null,"1","phoenix","phx_reply",{"status":"ok","response":{}}]"#;
        let frame = Frame::decode(text).unwrap();
        assert_eq!(frame.message_ref, json!("1"));

        let encoded = frame.encode().unwrap();
        assert_eq!(
            serde_json::from_str::<Value>(&encoded).unwrap(),
            serde_json::from_str::<Value>(text).unwrap(),
        );
    }
}
