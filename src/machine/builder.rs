//! Builder for configuring automata before they start.

use crate::core::{FsmError, IntoState, StateContract, StateId};
use crate::machine::automaton::Automaton;
use crate::machine::notify::Listener;
use std::rc::Rc;

/// Hook run by `initiate` once the owner is set and the initial state is
/// current, before that state is entered.
pub type InitiatedHook<S, O> = Box<dyn Fn(&Automaton<S, O>) -> Result<(), FsmError>>;

type Registration<S, O> = Box<dyn Fn(&Automaton<S, O>) -> Result<(), FsmError>>;

/// Builder for constructing automata with a fluent API.
///
/// States listed with [`register`](AutomatonBuilder::register) are created
/// and bound by [`build`](AutomatonBuilder::build), so a state attached to the
/// wrong automaton kind fails there rather than on first use.
pub struct AutomatonBuilder<S: ?Sized + 'static, O: 'static> {
    listeners: Vec<Listener>,
    registrations: Vec<Registration<S, O>>,
    on_initiated: Option<InitiatedHook<S, O>>,
}

impl<S, O> AutomatonBuilder<S, O>
where
    S: ?Sized + StateContract<O> + 'static,
    O: 'static,
{
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            registrations: Vec::new(),
            on_initiated: None,
        }
    }

    /// Register state `T` up front. Its `initialize` is deferred until the
    /// automaton is initiated.
    pub fn register<T: IntoState<S>>(mut self) -> Self {
        self.registrations
            .push(Box::new(|automaton: &Automaton<S, O>| {
                automaton.get_state::<T>().map(drop)
            }));
        self
    }

    /// Subscribe to state changes from the first notification on.
    pub fn subscribe(mut self, listener: impl Fn(StateId) + 'static) -> Self {
        self.listeners.push(Rc::new(listener));
        self
    }

    /// Set the on-initiated hook.
    pub fn on_initiated(
        mut self,
        hook: impl Fn(&Automaton<S, O>) -> Result<(), FsmError> + 'static,
    ) -> Self {
        self.on_initiated = Some(Box::new(hook));
        self
    }

    /// Build the automaton and register the listed states.
    pub fn build(self) -> Result<Rc<Automaton<S, O>>, FsmError> {
        let automaton = Automaton::from_parts(self.listeners, self.on_initiated);
        for register in &self.registrations {
            register(&automaton)?;
        }
        Ok(automaton)
    }
}

impl<S, O> Default for AutomatonBuilder<S, O>
where
    S: ?Sized + StateContract<O> + 'static,
    O: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
