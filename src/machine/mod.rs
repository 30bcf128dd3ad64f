//! The automaton engine.
//!
//! An [`Automaton`] owns one instance of every state type it has been asked
//! for, tracks which one is current and runs the exit/entry protocol on each
//! transition:
//!
//! - `initiate` binds the owner, initializes pending states and enters the
//!   initial state
//! - `transit` exits the current state and enters the target, unless the
//!   target is already current
//! - `get_state` returns the per-type singleton, creating it on demand
//! - `quit` exits the current state and stops the automaton
//!
//! Every completed transition is broadcast to subscribers.

mod automaton;
mod builder;
mod macros;
mod notify;
mod registry;

pub use automaton::{Automaton, AutomatonSnapshot, RegisteredState};
pub use builder::{AutomatonBuilder, InitiatedHook};
pub use notify::{Listener, SubscriptionId};
pub use registry::StatePhase;
