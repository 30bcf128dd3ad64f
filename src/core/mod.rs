//! Core contracts of the automaton engine.
//!
//! This module contains everything a state implementation depends on:
//! - State-type identity via `StateId`
//! - The `Lifecycle` hooks and the `StateContract` binding interface
//! - Typed, sealed automaton binding via `TypedState` and `StateBinding`
//! - The `FsmError` error type

mod binding;
mod contract;
mod error;
mod id;

pub use binding::{AutomatonHandle, StateBinding, TypedState};
pub use contract::{IntoState, Lifecycle, StateContract};
pub use error::{FsmError, Phase};
pub use id::StateId;
