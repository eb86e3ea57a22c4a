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

//! The engine: drives a [`StateMachine`] one handler invocation at a time.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::{
    error::{EngineError, EngineResult},
    machine::{StateMachine, Transition},
};

/// Outcome of a single engine step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// The machine continues; the engine state reflects the successor.
    Continue,
    /// The machine requested a graceful stop.
    Stopped,
    /// The machine reported an unrecoverable condition.
    Fatal(String),
}

/// Requests termination of a running [`Engine`] from another task.
///
/// Stopping is cooperative: the run loop ends once the currently executing handler
/// returns. Requests are idempotent; requesting a stop on an engine that has already
/// exited has no effect.
#[derive(Clone, Debug)]
pub struct EngineHandle {
    signal: Arc<AtomicBool>,
}

impl EngineHandle {
    /// Requests the run loop to end after the current handler returns.
    pub fn stop(&self) {
        self.signal.store(true, Ordering::Relaxed);
    }

    /// Whether a stop has been requested.
    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        self.signal.load(Ordering::Relaxed)
    }
}

/// Drives a [`StateMachine`] until stopped or fatal.
pub struct Engine<M: StateMachine> {
    machine: M,
    state: M::State,
    signal: Arc<AtomicBool>,
    last_error: Option<M::Error>,
}

impl<M: StateMachine> Engine<M> {
    /// Creates an engine positioned at the machine's initial state.
    #[must_use]
    pub fn new(machine: M) -> Self {
        Self {
            machine,
            state: M::INITIAL,
            signal: Arc::new(AtomicBool::new(false)),
            last_error: None,
        }
    }

    /// Current state tag.
    #[must_use]
    pub fn state(&self) -> M::State {
        self.state
    }

    /// Handle used to request a cooperative stop from another task.
    #[must_use]
    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            signal: Arc::clone(&self.signal),
        }
    }

    /// The machine being driven.
    #[must_use]
    pub fn machine(&self) -> &M {
        &self.machine
    }

    /// Mutable access to the machine being driven.
    pub fn machine_mut(&mut self) -> &mut M {
        &mut self.machine
    }

    /// Most recent handler failure captured by the engine, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&M::Error> {
        self.last_error.as_ref()
    }

    /// Runs exactly one handler invocation for the current state and applies the
    /// resulting transition.
    pub async fn step(&mut self) -> Step {
        let state = self.state;
        match self.machine.on_state(state).await {
            Ok(Transition::Stay) => Step::Continue,
            Ok(Transition::To(next)) => {
                self.transition(next);
                Step::Continue
            }
            Ok(Transition::Stop) => Step::Stopped,
            Ok(Transition::Fatal(reason)) => Step::Fatal(reason),
            Err(error) => {
                tracing::error!(state = %state, %error, "State handler failed");
                self.last_error = Some(error);
                self.transition(M::FAILURE);
                Step::Continue
            }
        }
    }

    /// Runs the machine until a stop is requested or a fatal condition occurs.
    ///
    /// Any stop request from a previous run is cleared on entry; a fresh run of a
    /// stopped engine starts from wherever the machine left off.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Fatal`] when a handler reports an unrecoverable condition.
    /// The engine never restarts on its own after a fatal halt.
    pub async fn run(&mut self) -> EngineResult<()> {
        self.signal.store(false, Ordering::Relaxed);
        tracing::debug!(state = %self.state, "Engine running");
        loop {
            match self.step().await {
                Step::Continue => {}
                Step::Stopped => {
                    tracing::debug!(state = %self.state, "Engine stopped");
                    return Ok(());
                }
                Step::Fatal(reason) => {
                    tracing::error!(state = %self.state, %reason, "Engine halted");
                    return Err(EngineError::Fatal {
                        state: self.state.to_string(),
                        reason,
                    });
                }
            }
            if self.signal.load(Ordering::Relaxed) {
                tracing::debug!(state = %self.state, "Stop requested");
                return Ok(());
            }
        }
    }

    fn transition(&mut self, next: M::State) {
        if next != self.state {
            tracing::debug!(from = %self.state, to = %next, "State transition");
        }
        self.state = next;
    }
}

impl<M: StateMachine> std::fmt::Debug for Engine<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("state", &format_args!("{}", self.state))
            .field("stop_requested", &self.signal.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
