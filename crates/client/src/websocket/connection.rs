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

//! Connection protocol for the AlphaHub signal feed.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use alphahub_fsm::{StateMachine, Transition};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    common::{
        credential::Credential,
        enums::{ChannelEvent, FeedState},
    },
    config::FeedConfig,
    error::{FeedError, FeedResult},
    http::client::SessionClient,
    websocket::{
        dispatch::{SignalDispatcher, SignalHandler},
        messages::{Channel, Frame, ReplyPayload, SignalPayload},
        subscriptions::SubscriptionSet,
        transport::FeedTransport,
    },
};

/// An authenticated session.
///
/// The token authenticates the websocket connection and is reused across
/// reconnects until `expiry`, after which a full login is required.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    /// Bearer token embedded in the websocket connect URL.
    pub token: String,
    /// Token accepted by the session renewal endpoint.
    pub renew_token: String,
    /// Time after which the token must not be reused.
    pub expiry: DateTime<Utc>,
}

impl Session {
    /// Whether the token may still be used at the given instant.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expiry
    }
}

/// Outcome of one bounded receive attempt.
enum RecvOutcome {
    /// A frame arrived and was routed.
    Routed,
    /// The wait elapsed with no traffic.
    Idle,
    /// The peer closed the connection.
    Closed,
}

/// State machine managing one AlphaHub feed session.
///
/// Authenticates over HTTP, connects the websocket, joins every configured
/// algorithm channel, then receives and dispatches signals while probing the
/// connection with heartbeats during quiet periods. A disconnect reuses the
/// session token when it is still valid, otherwise a full login is performed.
pub struct FeedConnection {
    config: FeedConfig,
    credential: Credential,
    http: SessionClient,
    session: Option<Session>,
    transport: Option<FeedTransport>,
    subscriptions: SubscriptionSet,
    dispatcher: SignalDispatcher,
    stale_at: Instant,
    subscribe_deadline: Instant,
}

impl FeedConnection {
    /// Creates a connection in the initial state.
    ///
    /// No network access is performed until the connection is driven by an
    /// engine.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Configuration`] if the configuration is invalid
    /// or the HTTP client cannot be constructed.
    pub fn new(
        config: FeedConfig,
        credential: Credential,
        handler: Arc<dyn SignalHandler>,
    ) -> FeedResult<Self> {
        config.validate()?;
        let http = SessionClient::new(config.session_url(), config.http_timeout)?;
        let subscriptions = SubscriptionSet::new(&config.algo_ids);
        Ok(Self {
            config,
            credential,
            http,
            session: None,
            transport: None,
            subscriptions,
            dispatcher: SignalDispatcher::new(handler),
            stale_at: Instant::now(),
            subscribe_deadline: Instant::now(),
        })
    }

    /// Current session, if authenticated.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Subscription state for the configured algorithm channels.
    #[must_use]
    pub fn subscriptions(&self) -> &SubscriptionSet {
        &self.subscriptions
    }

    /// Number of signal deliveries not yet reaped.
    #[must_use]
    pub fn dispatch_in_flight(&self) -> usize {
        self.dispatcher.in_flight()
    }

    /// Closes the transport and waits for in-flight signal deliveries.
    pub async fn shutdown(&mut self) {
        self.close_transport().await;
        self.dispatcher.drain().await;
    }

    async fn on_init(&mut self) -> FeedResult<Transition<FeedState>> {
        self.close_transport().await;
        let tokens = self.http.login(&self.credential).await?;
        let expiry = Utc::now() + self.config.token_validity;
        tracing::info!(%expiry, "Authenticated");
        self.session = Some(Session {
            token: tokens.token,
            renew_token: tokens.renew_token,
            expiry,
        });
        Ok(Transition::To(FeedState::Authenticated))
    }

    async fn on_authenticated(&mut self) -> FeedResult<Transition<FeedState>> {
        let Some(session) = &self.session else {
            return Ok(Transition::Fatal(
                "authenticated without a session token".to_string(),
            ));
        };
        let url = self.config.connect_url(&session.token);
        self.transport = Some(FeedTransport::connect(&url).await?);
        tracing::info!("Connected");
        Ok(Transition::To(FeedState::Connected))
    }

    fn on_connected(&mut self) -> Transition<FeedState> {
        self.subscriptions.reset();
        self.subscribe_deadline = Instant::now() + self.config.subscribe_timeout;
        Transition::To(FeedState::Subscribing)
    }

    async fn on_subscribing(&mut self) -> FeedResult<Transition<FeedState>> {
        for algo_id in self.subscriptions.ids() {
            if self.subscriptions.is_subscribed(algo_id) {
                continue;
            }
            self.send_frame(&Frame::join(algo_id)).await?;
            while !self.subscriptions.is_subscribed(algo_id) {
                if Instant::now() >= self.subscribe_deadline {
                    return Err(FeedError::Protocol(format!(
                        "subscription deadline elapsed awaiting algorithm {algo_id}"
                    )));
                }
                match self.poll_route().await? {
                    RecvOutcome::Closed => return Ok(Transition::To(FeedState::Reconnecting)),
                    RecvOutcome::Routed | RecvOutcome::Idle => {}
                }
            }
        }
        tracing::info!(
            channels = self.subscriptions.len(),
            "All subscriptions confirmed",
        );
        Ok(Transition::To(FeedState::Receiving))
    }

    async fn on_receiving(&mut self) -> FeedResult<Transition<FeedState>> {
        match self.poll_route().await? {
            RecvOutcome::Closed => return Ok(Transition::To(FeedState::Reconnecting)),
            RecvOutcome::Routed | RecvOutcome::Idle => {}
        }
        if Instant::now() >= self.stale_at {
            return Ok(Transition::To(FeedState::Stale));
        }
        Ok(Transition::Stay)
    }

    async fn on_stale(&mut self) -> FeedResult<Transition<FeedState>> {
        tracing::debug!("Liveness interval elapsed; sending heartbeat");
        self.send_frame(&Frame::heartbeat()).await?;
        Ok(Transition::To(FeedState::Receiving))
    }

    async fn on_reconnecting(&mut self) -> Transition<FeedState> {
        self.close_transport().await;
        match &self.session {
            Some(session) if session.is_valid_at(Utc::now()) => {
                tracing::info!("Reconnecting with existing token");
                Transition::To(FeedState::Authenticated)
            }
            _ => {
                tracing::info!("Token expired; performing full login");
                Transition::To(FeedState::Init)
            }
        }
    }

    async fn on_error(&mut self) -> Transition<FeedState> {
        self.close_transport().await;
        self.recover().await
    }

    /// Sends one frame and pushes the liveness deadline forward.
    async fn send_frame(&mut self, frame: &Frame) -> FeedResult<()> {
        let Some(transport) = &mut self.transport else {
            return Err(FeedError::State("no transport while sending".to_string()));
        };
        transport.send(frame).await?;
        self.stale_at = Instant::now() + self.config.liveness_interval;
        Ok(())
    }

    /// Waits up to the configured receive wait for one frame and routes it.
    async fn poll_route(&mut self) -> FeedResult<RecvOutcome> {
        let Some(transport) = &mut self.transport else {
            return Err(FeedError::State("no transport while receiving".to_string()));
        };
        match transport.recv(self.config.receive_wait).await {
            Ok(Some(frame)) => {
                self.route_frame(frame)?;
                Ok(RecvOutcome::Routed)
            }
            Ok(None) => Ok(RecvOutcome::Idle),
            Err(FeedError::TransportClosed) => Ok(RecvOutcome::Closed),
            Err(e) => Err(e),
        }
    }

    fn route_frame(&mut self, frame: Frame) -> FeedResult<()> {
        match Channel::parse(&frame.topic) {
            Channel::Algorithm(algo_id) => self.route_algorithm(algo_id, frame),
            Channel::System => self.route_system(frame),
            Channel::Unknown => {
                tracing::warn!(topic = %frame.topic, event = %frame.event, "Frame on unknown channel");
                Ok(())
            }
        }
    }

    fn route_algorithm(&mut self, algo_id: u32, frame: Frame) -> FeedResult<()> {
        match frame.known_event() {
            Some(ChannelEvent::PhxReply) => {
                let reply: ReplyPayload = serde_json::from_value(frame.payload)?;
                if !reply.is_ok() {
                    return Err(FeedError::Protocol(format!(
                        "join rejected for algorithm {algo_id}: status {:?}",
                        reply.status,
                    )));
                }
                if self.subscriptions.mark_subscribed(algo_id) {
                    tracing::info!(algo_id, "Subscription confirmed");
                } else {
                    tracing::debug!(algo_id, "Reply for untracked algorithm");
                }
                Ok(())
            }
            Some(ChannelEvent::NewSignals) => {
                let signal: SignalPayload = serde_json::from_value(frame.payload)?;
                self.dispatcher.dispatch(algo_id, signal);
                Ok(())
            }
            Some(ChannelEvent::PhxClose) => {
                tracing::debug!(algo_id, "Channel closed by server");
                Ok(())
            }
            _ => {
                tracing::warn!(algo_id, event = %frame.event, "Unhandled event on algorithm channel");
                Ok(())
            }
        }
    }

    fn route_system(&mut self, frame: Frame) -> FeedResult<()> {
        match frame.known_event() {
            Some(ChannelEvent::PhxReply) => {
                let reply: ReplyPayload = serde_json::from_value(frame.payload)?;
                if !reply.is_ok() {
                    return Err(FeedError::Protocol(format!(
                        "heartbeat rejected: status {:?}",
                        reply.status,
                    )));
                }
                tracing::debug!("Heartbeat acknowledged");
                Ok(())
            }
            _ => {
                tracing::warn!(event = %frame.event, "Unhandled event on system channel");
                Ok(())
            }
        }
    }

    async fn close_transport(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.close().await;
        }
    }
}

#[async_trait]
impl StateMachine for FeedConnection {
    type State = FeedState;
    type Error = FeedError;

    const INITIAL: Self::State = FeedState::Init;
    const FAILURE: Self::State = FeedState::Error;

    fn recovery_delay(&self) -> Duration {
        self.config.recovery_delay
    }

    async fn on_state(&mut self, state: FeedState) -> Result<Transition<FeedState>, FeedError> {
        match state {
            FeedState::Init => self.on_init().await,
            FeedState::Authenticated => self.on_authenticated().await,
            FeedState::Connected => Ok(self.on_connected()),
            FeedState::Subscribing => self.on_subscribing().await,
            FeedState::Receiving => self.on_receiving().await,
            FeedState::Stale => self.on_stale().await,
            FeedState::Reconnecting => Ok(self.on_reconnecting().await),
            FeedState::Error => Ok(self.on_error().await),
            FeedState::Done => Ok(Transition::Stop),
        }
    }
}

impl std::fmt::Debug for FeedConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(FeedConnection))
            .field("config", &self.config)
            .field("subscriptions", &self.subscriptions)
            .field("connected", &self.transport.is_some())
            .finish_non_exhaustive()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use tokio::sync::mpsc;

    use super::*;
    use crate::websocket::dispatch::LogSignalHandler;

    struct RecordingHandler {
        tx: mpsc::UnboundedSender<(u32, SignalPayload)>,
    }

    #[async_trait]
    impl SignalHandler for RecordingHandler {
        async fn on_signal(&self, algo_id: u32, signal: SignalPayload) {
            let _ = self.tx.send((algo_id, signal));
        }
    }

    fn test_connection(handler: Arc<dyn SignalHandler>) -> FeedConnection {
        let config = FeedConfig::new(vec![14, 16]);
        let credential = Credential::new("user@example.com", "pw").unwrap();
        FeedConnection::new(config, credential, handler).unwrap()
    }

    #[rstest]
    fn construction_validates_before_any_network_use() {
        let config = FeedConfig::new(vec![]);
        let credential = Credential::new("user@example.com", "pw").unwrap();
        let result = FeedConnection::new(config, credential, Arc::new(LogSignalHandler));
        assert!(matches!(result, Err(FeedError::Configuration(_))));
    }

    #[rstest]
    fn ok_reply_marks_the_channel_subscribed() {
        let mut conn = test_connection(Arc::new(LogSignalHandler));
        let frame =
            Frame::decode(r#"[null,null,"algorithms:14","phx_reply",{"status":"ok","response":{}}]"#)
                .unwrap();

        conn.route_frame(frame).unwrap();
        assert!(conn.subscriptions().is_subscribed(14));
        assert!(!conn.subscriptions().is_subscribed(16));
    }

    #[rstest]
    fn replies_are_marked_regardless_of_arrival_order() {
        let mut conn = test_connection(Arc::new(LogSignalHandler));
        let late =
            Frame::decode(r#"[null,null,"algorithms:16","phx_reply",{"status":"ok","response":{}}]"#)
                .unwrap();
        let early =
            Frame::decode(r#"[null,null,"algorithms:14","phx_reply",{"status":"ok","response":{}}]"#)
                .unwrap();

        conn.route_frame(late).unwrap();
        conn.route_frame(early).unwrap();
        assert!(conn.subscriptions().is_complete());
    }

    #[rstest]
    fn rejected_join_is_a_protocol_error() {
        let mut conn = test_connection(Arc::new(LogSignalHandler));
        let frame = Frame::decode(
            r#"["1","2","algorithms:14","phx_reply",{"status":"error","response":{"reason":"unauthorized"}}]"#,
        )
        .unwrap();

        let result = conn.route_frame(frame);
        assert!(matches!(result, Err(FeedError::Protocol(_))));
        assert!(!conn.subscriptions().is_subscribed(14));
    }

    #[rstest]
    #[tokio::test]
    async fn signals_are_dispatched_with_the_channel_id() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut conn = test_connection(Arc::new(RecordingHandler { tx }));
        let frame = Frame::decode(
            r#"[null,null,"algorithms:16","new_signals",{"open":[{"price":42.1,"side":"sell","symbol":"TSLA","timestamp":"2025-01-03T14:31:00Z"}],"close":[]}]"#,
        )
        .unwrap();

        conn.route_frame(frame).unwrap();
        conn.shutdown().await;

        let (algo_id, signal) = rx.recv().await.unwrap();
        assert_eq!(algo_id, 16);
        assert_eq!(signal.open.len(), 1);
        assert_eq!(signal.open[0].symbol, "TSLA");
    }

    #[rstest]
    fn heartbeat_ack_is_accepted() {
        let mut conn = test_connection(Arc::new(LogSignalHandler));
        let frame =
            Frame::decode(r#"[null,"1","phoenix","phx_reply",{"status":"ok","response":{}}]"#)
                .unwrap();

        conn.route_frame(frame).unwrap();
        assert!(!conn.subscriptions().is_subscribed(14));
    }

    #[rstest]
    fn rejected_heartbeat_is_a_protocol_error() {
        let mut conn = test_connection(Arc::new(LogSignalHandler));
        let frame =
            Frame::decode(r#"[null,"1","phoenix","phx_reply",{"status":"timeout","response":{}}]"#)
                .unwrap();

        assert!(matches!(
            conn.route_frame(frame),
            Err(FeedError::Protocol(_)),
        ));
    }

    #[rstest]
    #[case(r#"[null,null,"prices:1","new_signals",{}]"#)]
    #[case(r#"[null,null,"algorithms:xyz","phx_reply",{"status":"ok"}]"#)]
    #[case(r#"[null,null,"algorithms:14","presence_diff",{}]"#)]
    #[case(r#"[null,null,"phoenix","presence_diff",{}]"#)]
    fn unknown_channels_and_events_are_not_fatal(#[case] text: &str) {
        let mut conn = test_connection(Arc::new(LogSignalHandler));
        let frame = Frame::decode(text).unwrap();

        conn.route_frame(frame).unwrap();
        assert!(!conn.subscriptions().is_subscribed(14));
    }

    #[rstest]
    fn session_validity_follows_expiry() {
        let session = Session {
            token: "tok".to_string(),
            renew_token: "renew".to_string(),
            expiry: Utc::now() + Duration::from_secs(60),
        };
        assert!(session.is_valid_at(Utc::now()));
        assert!(!session.is_valid_at(session.expiry));
    }
}
