//! Automata: a polymorphic finite automaton with lazily created states
//!
//! States are ordinary types sharing a contract trait. The automaton keeps
//! one instance per state type, creates it on first use, and wires it to the
//! owner object the states act upon. Transitions run the exit and entry hooks
//! in a fixed order and notify subscribers once the new state is current.
//!
//! # Core Concepts
//!
//! - **Lifecycle**: `initialize`, `on_state_entry` and `on_state_exit` hooks
//! - **Binding**: each state is bound to exactly one owner and one automaton
//! - **Registry**: per-type singletons created on demand
//! - **Notifications**: subscribers learn about every completed transition
//!
//! # Example
//!
//! ```rust
//! use automata::core::{FsmError, Lifecycle, StateBinding, StateContract, TypedState};
//! use automata::machine::Automaton;
//! use automata::register_states;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! #[derive(Default)]
//! struct Turnstile {
//!     coins: Cell<u32>,
//! }
//!
//! trait TurnstileState: StateContract<Turnstile> {
//!     fn push(&self) -> Result<(), FsmError>;
//! }
//!
//! type TurnstileAutomaton = Automaton<dyn TurnstileState, Turnstile>;
//!
//! #[derive(Default)]
//! struct Locked {
//!     binding: StateBinding<TurnstileAutomaton, Turnstile>,
//! }
//!
//! #[derive(Default)]
//! struct Unlocked {
//!     binding: StateBinding<TurnstileAutomaton, Turnstile>,
//! }
//!
//! impl Lifecycle for Locked {}
//!
//! impl Lifecycle for Unlocked {
//!     fn on_state_entry(&self) -> Result<(), FsmError> {
//!         let owner = self.binding.owner()?;
//!         owner.coins.set(owner.coins.get() + 1);
//!         Ok(())
//!     }
//! }
//!
//! impl TypedState<Turnstile> for Locked {
//!     type Automaton = TurnstileAutomaton;
//!     fn binding(&self) -> &StateBinding<TurnstileAutomaton, Turnstile> {
//!         &self.binding
//!     }
//! }
//!
//! impl TypedState<Turnstile> for Unlocked {
//!     type Automaton = TurnstileAutomaton;
//!     fn binding(&self) -> &StateBinding<TurnstileAutomaton, Turnstile> {
//!         &self.binding
//!     }
//! }
//!
//! impl TurnstileState for Locked {
//!     fn push(&self) -> Result<(), FsmError> {
//!         self.binding.automaton()?.transit::<Unlocked>()
//!     }
//! }
//!
//! impl TurnstileState for Unlocked {
//!     fn push(&self) -> Result<(), FsmError> {
//!         self.binding.automaton()?.transit::<Locked>()
//!     }
//! }
//!
//! register_states!(dyn TurnstileState => Locked, Unlocked);
//!
//! let turnstile = Rc::new(Turnstile::default());
//! let automaton = TurnstileAutomaton::new();
//! automaton.initiate::<Locked>(Rc::clone(&turnstile)).unwrap();
//!
//! automaton.dispatch(|state| state.push()).unwrap().unwrap();
//! automaton.dispatch(|state| state.push()).unwrap().unwrap();
//! automaton.dispatch(|state| state.push()).unwrap().unwrap();
//!
//! assert!(automaton.is_current_state::<Unlocked>());
//! assert_eq!(turnstile.coins.get(), 2);
//! ```

pub mod core;
pub mod journal;
pub mod machine;
pub mod monster;

// Re-export commonly used types
pub use crate::core::{FsmError, IntoState, Lifecycle, StateBinding, StateContract, StateId, TypedState};
pub use crate::journal::TransitionLog;
pub use crate::machine::{Automaton, AutomatonBuilder};
