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

//! Signal delivery decoupled from the receive loop.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinSet;

use crate::websocket::messages::SignalPayload;

/// Consumer of incoming trade signals.
///
/// Implementations run on spawned tasks so a slow consumer never stalls the
/// receive loop.
#[async_trait]
pub trait SignalHandler: Send + Sync {
    /// Handles one signal batch from the given algorithm channel.
    async fn on_signal(&self, algo_id: u32, signal: SignalPayload);
}

/// Default handler which logs each signal batch.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSignalHandler;

#[async_trait]
impl SignalHandler for LogSignalHandler {
    async fn on_signal(&self, algo_id: u32, signal: SignalPayload) {
        tracing::info!(
            algo_id,
            open = signal.open.len(),
            close = signal.close.len(),
            "Received signals",
        );
    }
}

/// Fans signals out to the handler on spawned tasks.
pub struct SignalDispatcher {
    handler: Arc<dyn SignalHandler>,
    tasks: JoinSet<()>,
}

impl SignalDispatcher {
    /// Creates a dispatcher delivering to the given handler.
    #[must_use]
    pub fn new(handler: Arc<dyn SignalHandler>) -> Self {
        Self {
            handler,
            tasks: JoinSet::new(),
        }
    }

    /// Spawns delivery of one signal batch, returning immediately.
    pub fn dispatch(&mut self, algo_id: u32, signal: SignalPayload) {
        while let Some(result) = self.tasks.try_join_next() {
            if let Err(e) = result {
                tracing::warn!("Signal handler task failed: {e}");
            }
        }

        let handler = self.handler.clone();
        self.tasks.spawn(async move {
            handler.on_signal(algo_id, signal).await;
        });
    }

    /// Waits for all in-flight deliveries to complete.
    pub async fn drain(&mut self) {
        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result {
                tracing::warn!("Signal handler task failed: {e}");
            }
        }
    }

    /// Number of deliveries not yet reaped.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }
}

impl std::fmt::Debug for SignalDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(SignalDispatcher))
            .field("in_flight", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use rstest::rstest;
    use tokio::sync::{Semaphore, mpsc};

    use super::*;
    use crate::{common::enums::Side, websocket::messages::TradeEvent};

    struct RecordingHandler {
        tx: mpsc::UnboundedSender<(u32, SignalPayload)>,
    }

    #[async_trait]
    impl SignalHandler for RecordingHandler {
        async fn on_signal(&self, algo_id: u32, signal: SignalPayload) {
            let _ = self.tx.send((algo_id, signal));
        }
    }

    struct GatedHandler {
        entered: AtomicUsize,
        completed: AtomicUsize,
        gate: Semaphore,
    }

    #[async_trait]
    impl SignalHandler for GatedHandler {
        async fn on_signal(&self, _algo_id: u32, _signal: SignalPayload) {
            self.entered.fetch_add(1, Ordering::SeqCst);
            let _permit = self.gate.acquire().await.unwrap();
            self.completed.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct PanickyHandler;

    #[async_trait]
    impl SignalHandler for PanickyHandler {
        async fn on_signal(&self, _algo_id: u32, _signal: SignalPayload) {
            panic!("handler exploded");
        }
    }

    fn sample_signal() -> SignalPayload {
        SignalPayload {
            open: vec![TradeEvent {
                price: 187.5,
                side: Side::Buy,
                symbol: "AAPL".to_string(),
                timestamp: "2025-01-03T14:30:00Z".to_string(),
            }],
            close: vec![],
        }
    }

    #[rstest]
    #[tokio::test]
    async fn signals_are_delivered_to_the_handler() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dispatcher = SignalDispatcher::new(Arc::new(RecordingHandler { tx }));

        dispatcher.dispatch(14, sample_signal());
        dispatcher.drain().await;

        let (algo_id, signal) = rx.recv().await.unwrap();
        assert_eq!(algo_id, 14);
        assert_eq!(signal, sample_signal());
        assert!(rx.try_recv().is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn dispatch_does_not_block_on_a_slow_handler() {
        let handler = Arc::new(GatedHandler {
            entered: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            gate: Semaphore::new(0),
        });
        let mut dispatcher = SignalDispatcher::new(handler.clone());

        dispatcher.dispatch(14, sample_signal());
        dispatcher.dispatch(16, sample_signal());

        for _ in 0..200 {
            if handler.entered.load(Ordering::SeqCst) == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        assert_eq!(handler.entered.load(Ordering::SeqCst), 2);
        assert_eq!(handler.completed.load(Ordering::SeqCst), 0);
        assert_eq!(dispatcher.in_flight(), 2);

        handler.gate.add_permits(2);
        dispatcher.drain().await;
        assert_eq!(handler.completed.load(Ordering::SeqCst), 2);
        assert_eq!(dispatcher.in_flight(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn handler_panic_is_contained() {
        let mut dispatcher = SignalDispatcher::new(Arc::new(PanickyHandler));

        dispatcher.dispatch(14, sample_signal());
        dispatcher.drain().await;
        assert_eq!(dispatcher.in_flight(), 0);

        dispatcher.dispatch(16, sample_signal());
        dispatcher.drain().await;
        assert_eq!(dispatcher.in_flight(), 0);
    }
}
