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

//! Websocket transport for the AlphaHub feed.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message,
};

use crate::{
    error::{FeedError, FeedResult},
    websocket::messages::Frame,
};

/// A connected websocket carrying Phoenix frames.
#[derive(Debug)]
pub struct FeedTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl FeedTransport {
    /// Opens a websocket connection to the given URL.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Transport`] if the handshake fails.
    pub async fn connect(url: &str) -> FeedResult<Self> {
        let (stream, response) = connect_async(url).await?;
        tracing::debug!(status = %response.status(), "Websocket connected");
        Ok(Self { stream })
    }

    /// Sends one frame.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Protocol`] if the frame cannot be encoded, and
    /// [`FeedError::Transport`] or [`FeedError::TransportClosed`] on socket
    /// failures.
    pub async fn send(&mut self, frame: &Frame) -> FeedResult<()> {
        let text = frame.encode()?;
        tracing::debug!(frame = %text, "Sending frame");
        self.stream.send(Message::Text(text.into())).await?;
        Ok(())
    }

    /// Waits up to `wait` for the next frame.
    ///
    /// Returns `Ok(None)` when the wait elapses with no traffic. Control
    /// messages are handled internally and do not count as frames.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::TransportClosed`] when the peer has closed the
    /// connection, [`FeedError::Protocol`] on undecodable frames, and
    /// [`FeedError::Transport`] on socket failures.
    pub async fn recv(&mut self, wait: Duration) -> FeedResult<Option<Frame>> {
        match tokio::time::timeout(wait, self.next_frame()).await {
            Ok(result) => result.map(Some),
            Err(_) => Ok(None),
        }
    }

    async fn next_frame(&mut self) -> FeedResult<Frame> {
        loop {
            match self.stream.next().await {
                None => return Err(FeedError::TransportClosed),
                Some(Err(e)) => return Err(e.into()),
                Some(Ok(Message::Text(text))) => {
                    tracing::debug!(frame = %text, "Received frame");
                    return Frame::decode(&text);
                }
                Some(Ok(Message::Ping(payload))) => {
                    self.stream.send(Message::Pong(payload)).await?;
                }
                Some(Ok(Message::Close(_))) => return Err(FeedError::TransportClosed),
                Some(Ok(other)) => {
                    tracing::debug!(message = ?other, "Ignoring non-text message");
                }
            }
        }
    }

    /// Closes the connection, ignoring failures on an already dead socket.
    pub async fn close(&mut self) {
        let _ = self.stream.close(None).await;
    }
}
