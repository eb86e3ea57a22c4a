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

//! State-machine trait and transition types.

use std::{fmt::Display, time::Duration};

use async_trait::async_trait;

/// Delay applied by the default [`StateMachine::recover`] implementation before
/// restarting from the initial state.
pub const DEFAULT_RECOVERY_DELAY: Duration = Duration::from_secs(5);

/// Outcome of one state handler invocation.
///
/// Transitions are explicit data: a handler either stays in place, names its successor,
/// requests a graceful stop, or reports an unrecoverable condition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition<S> {
    /// Remain in the current state; the engine re-invokes the same handler.
    Stay,
    /// Move to the given state.
    To(S),
    /// End the run loop gracefully.
    Stop,
    /// Unrecoverable condition; the engine halts and surfaces the reason.
    Fatal(String),
}

/// A cooperative state machine driven by an [`Engine`](crate::engine::Engine).
///
/// Dispatch is an exhaustive match over [`Self::State`] inside
/// [`on_state`](Self::on_state), so an unhandled state tag cannot exist at runtime.
/// A returned error is captured by the engine and routed to [`Self::FAILURE`]; the
/// handler for that state owns recovery, typically by delegating to
/// [`recover`](Self::recover) after any cleanup of its own.
#[async_trait]
pub trait StateMachine: Send {
    /// State tag enumeration.
    type State: Copy + Eq + Display + Send;
    /// Failure type surfaced by state handlers.
    type Error: std::error::Error + Send;

    /// State the engine starts in.
    const INITIAL: Self::State;
    /// State entered when a handler returns an error.
    const FAILURE: Self::State;

    /// Executes the handler for `state` and returns the resulting transition.
    ///
    /// # Errors
    ///
    /// Any error is captured by the engine, logged with the failing state, and converted
    /// into a transition to [`Self::FAILURE`].
    async fn on_state(
        &mut self,
        state: Self::State,
    ) -> Result<Transition<Self::State>, Self::Error>;

    /// Delay applied by the default [`recover`](Self::recover) implementation.
    fn recovery_delay(&self) -> Duration {
        DEFAULT_RECOVERY_DELAY
    }

    /// Default failure recovery: wait out [`recovery_delay`](Self::recovery_delay), then
    /// restart from [`Self::INITIAL`].
    async fn recover(&mut self) -> Transition<Self::State> {
        tokio::time::sleep(self.recovery_delay()).await;
        Transition::To(Self::INITIAL)
    }
}
