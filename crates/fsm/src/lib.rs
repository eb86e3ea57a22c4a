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

//! A generic, cooperative finite-state-machine engine for long-lived client sessions.
//!
//! The engine drives a [`StateMachine`] one handler invocation at a time: exactly one
//! handler runs at any moment, handlers may suspend at I/O points, and each handler
//! names its successor through an explicit [`Transition`] value. A handler error is
//! captured, logged, and routed to the machine's designated failure state; a fatal
//! transition halts the loop and surfaces through [`EngineError`].
//!
//! Stopping is cooperative: an [`EngineHandle`] requests termination, which takes
//! effect once the currently executing handler returns. In-flight I/O is never
//! canceled.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod engine;
pub mod error;
pub mod machine;

pub use engine::{Engine, EngineHandle, Step};
pub use error::{EngineError, EngineResult};
pub use machine::{DEFAULT_RECOVERY_DELAY, StateMachine, Transition};
