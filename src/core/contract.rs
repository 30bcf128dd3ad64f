//! Capability traits every automaton state implements.
//!
//! A state is an ordinary object with its own fields. The automaton creates
//! one instance per state type, binds it to an owner and to the automaton,
//! initializes it once and then calls the entry/exit hooks every time the
//! instance becomes or stops being current.

use crate::core::binding::AutomatonHandle;
use crate::core::error::FsmError;
use std::any::Any;
use std::rc::Rc;

/// Lifecycle hooks driven by the automaton.
///
/// All hooks take `&self`. A state may call back into its automaton from
/// inside a hook (typically `transit` from a simulation step, which in turn
/// calls this very state's `on_state_exit`), so per-state data lives in
/// `Cell`/`RefCell` fields rather than behind `&mut self`.
///
/// Default implementations do nothing.
pub trait Lifecycle {
    /// One-time setup.
    ///
    /// Runs exactly once per instance, after both the owner and the automaton
    /// are bound and before the first `on_state_entry`. No ordering is
    /// guaranteed relative to other states' `initialize`.
    fn initialize(&self) -> Result<(), FsmError> {
        Ok(())
    }

    /// Called every time this instance becomes the current state.
    fn on_state_entry(&self) -> Result<(), FsmError> {
        Ok(())
    }

    /// Called every time this instance stops being the current state,
    /// including when the automaton quits while it is current.
    fn on_state_exit(&self) -> Result<(), FsmError> {
        Ok(())
    }
}

pub(crate) mod sealed {
    /// Implemented only alongside [`TypedState`](crate::core::TypedState).
    pub trait Sealed<O> {}
}

/// Contract between an automaton and the states it manages.
///
/// `O` is the owner type: the domain object the states act upon.
///
/// This trait cannot be implemented by hand. Implementing
/// [`TypedState`](crate::core::TypedState) provides it, with a binding check
/// that cannot be overridden:
///
/// ```compile_fail
/// use automata::core::{AutomatonHandle, FsmError, Lifecycle, StateContract};
/// use std::rc::Rc;
///
/// struct Rogue;
///
/// impl Lifecycle for Rogue {}
///
/// impl StateContract<()> for Rogue {
///     fn bind_owner(&self, _owner: Rc<()>) -> Result<(), FsmError> {
///         Ok(())
///     }
///
///     fn bind_automaton(&self, _handle: &AutomatonHandle) -> Result<(), FsmError> {
///         Ok(())
///     }
/// }
/// ```
pub trait StateContract<O>: Lifecycle + Any + sealed::Sealed<O> {
    /// Attach the owner. Fails if an owner is already bound.
    fn bind_owner(&self, owner: Rc<O>) -> Result<(), FsmError>;

    /// Attach the automaton behind `handle`.
    ///
    /// Fails with [`FsmError::TypeMismatch`] when the handle refers to an
    /// automaton of a different kind than the state works with.
    fn bind_automaton(&self, handle: &AutomatonHandle) -> Result<(), FsmError>;
}

/// Upcast of a concrete state into the state-contract type of an automaton.
///
/// `S` is usually a trait object such as `dyn MonsterState`. Implement this
/// with [`register_states!`](crate::register_states) rather than by hand.
pub trait IntoState<S: ?Sized>: Any + Default {
    fn into_state(self: Rc<Self>) -> Rc<S>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Counting {
        entries: Cell<u32>,
        exits: Cell<u32>,
    }

    impl Lifecycle for Counting {
        fn on_state_entry(&self) -> Result<(), FsmError> {
            self.entries.set(self.entries.get() + 1);
            Ok(())
        }

        fn on_state_exit(&self) -> Result<(), FsmError> {
            self.exits.set(self.exits.get() + 1);
            Ok(())
        }
    }

    #[derive(Default)]
    struct Silent;

    impl Lifecycle for Silent {}

    #[test]
    fn default_hooks_succeed() {
        let state = Silent;
        assert!(state.initialize().is_ok());
        assert!(state.on_state_entry().is_ok());
        assert!(state.on_state_exit().is_ok());
    }

    #[test]
    fn overridden_hooks_mutate_through_shared_reference() {
        let state = Counting::default();
        state.on_state_entry().unwrap();
        state.on_state_exit().unwrap();
        state.on_state_entry().unwrap();

        assert_eq!(state.entries.get(), 2);
        assert_eq!(state.exits.get(), 1);
    }

    #[test]
    fn hooks_are_callable_through_trait_objects() {
        let state: Rc<dyn Lifecycle> = Rc::new(Counting::default());
        assert!(state.on_state_entry().is_ok());
        assert!(state.initialize().is_ok());
    }
}
