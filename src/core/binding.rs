//! Typed binding between a state and the automaton kind it works with.
//!
//! An automaton hands every new state a type-erased [`AutomatonHandle`]. A
//! state built on [`TypedState`] narrows that handle to its declared
//! automaton type once, at registration, and rejects anything else with
//! [`FsmError::TypeMismatch`]. The check lives in a blanket implementation of
//! [`StateContract`], so no state type can replace it with its own.

use crate::core::contract::{sealed, Lifecycle, StateContract};
use crate::core::error::FsmError;
use std::any::{type_name, Any};
use std::cell::OnceCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Type-erased, non-owning reference to an automaton.
#[derive(Clone)]
pub struct AutomatonHandle {
    inner: Weak<dyn Any>,
    kind: &'static str,
}

impl AutomatonHandle {
    /// Handle to `automaton`. Does not keep it alive.
    pub fn new<A: Any>(automaton: &Rc<A>) -> Self {
        Self::from_weak(Rc::downgrade(automaton))
    }

    pub(crate) fn from_weak<A: Any>(automaton: Weak<A>) -> Self {
        let inner: Weak<dyn Any> = automaton;
        Self {
            inner,
            kind: type_name::<A>(),
        }
    }

    /// Type name of the automaton behind the handle.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Whether the handle refers to a live automaton of type `A`.
    pub fn is<A: Any>(&self) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|automaton| automaton.is::<A>())
    }

    fn narrow<A: Any>(&self, state: &'static str) -> Result<Weak<A>, FsmError> {
        let automaton = self.inner.upgrade().ok_or(FsmError::AutomatonDropped)?;
        let automaton = automaton
            .downcast::<A>()
            .map_err(|_| FsmError::TypeMismatch {
                state,
                expected: type_name::<A>(),
                found: self.kind,
            })?;
        Ok(Rc::downgrade(&automaton))
    }
}

impl fmt::Debug for AutomatonHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutomatonHandle")
            .field("kind", &self.kind)
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

/// Owner and automaton slots of a state, each written at most once.
///
/// States embed one of these and expose it through
/// [`TypedState::binding`]. The automaton reference is weak: states never
/// keep their automaton alive.
pub struct StateBinding<A, O> {
    automaton: OnceCell<Weak<A>>,
    owner: OnceCell<Rc<O>>,
}

impl<A, O> Default for StateBinding<A, O> {
    fn default() -> Self {
        Self {
            automaton: OnceCell::new(),
            owner: OnceCell::new(),
        }
    }
}

impl<A: Any, O> StateBinding<A, O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The automaton this state is bound to.
    pub fn automaton(&self) -> Result<Rc<A>, FsmError> {
        self.automaton
            .get()
            .ok_or(FsmError::Unbound {
                target: "automaton",
            })?
            .upgrade()
            .ok_or(FsmError::AutomatonDropped)
    }

    /// The owner this state acts upon.
    pub fn owner(&self) -> Result<&Rc<O>, FsmError> {
        self.owner.get().ok_or(FsmError::Unbound { target: "owner" })
    }

    pub fn has_automaton(&self) -> bool {
        self.automaton.get().is_some()
    }

    pub fn has_owner(&self) -> bool {
        self.owner.get().is_some()
    }

    fn bind_automaton(&self, state: &'static str, handle: &AutomatonHandle) -> Result<(), FsmError> {
        if self.has_automaton() {
            return Err(FsmError::AlreadyBound {
                state,
                target: "automaton",
            });
        }

        let automaton = handle.narrow::<A>(state).inspect_err(|err| {
            tracing::warn!(state, handle = handle.kind(), "Rejected automaton binding: {err}");
        })?;

        self.automaton
            .set(automaton)
            .map_err(|_| FsmError::AlreadyBound {
                state,
                target: "automaton",
            })
    }

    fn bind_owner(&self, state: &'static str, owner: Rc<O>) -> Result<(), FsmError> {
        self.owner.set(owner).map_err(|_| FsmError::AlreadyBound {
            state,
            target: "owner",
        })
    }
}

/// A state that works with exactly one automaton type.
///
/// Implementing this trait gives the state a [`StateContract`] whose binding
/// methods narrow the automaton handle to [`TypedState::Automaton`].
///
/// # Example
///
/// ```rust
/// use automata::core::{Lifecycle, StateBinding, TypedState};
/// use automata::machine::Automaton;
///
/// struct Lamp;
///
/// trait LampState: automata::core::StateContract<Lamp> {}
///
/// #[derive(Default)]
/// struct Off {
///     binding: StateBinding<Automaton<dyn LampState, Lamp>, Lamp>,
/// }
///
/// impl Lifecycle for Off {}
///
/// impl TypedState<Lamp> for Off {
///     type Automaton = Automaton<dyn LampState, Lamp>;
///
///     fn binding(&self) -> &StateBinding<Self::Automaton, Lamp> {
///         &self.binding
///     }
/// }
///
/// impl LampState for Off {}
/// ```
pub trait TypedState<O>: Lifecycle + Any {
    type Automaton: Any;

    fn binding(&self) -> &StateBinding<Self::Automaton, O>;
}

impl<O: 'static, T: TypedState<O>> sealed::Sealed<O> for T {}

impl<O: 'static, T: TypedState<O>> StateContract<O> for T {
    fn bind_owner(&self, owner: Rc<O>) -> Result<(), FsmError> {
        self.binding().bind_owner(type_name::<T>(), owner)
    }

    fn bind_automaton(&self, handle: &AutomatonHandle) -> Result<(), FsmError> {
        self.binding().bind_automaton(type_name::<T>(), handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PatrolAutomaton;
    struct TurretAutomaton;
    struct Guard;

    #[derive(Default)]
    struct Watch {
        binding: StateBinding<PatrolAutomaton, Guard>,
    }

    impl Lifecycle for Watch {}

    impl TypedState<Guard> for Watch {
        type Automaton = PatrolAutomaton;

        fn binding(&self) -> &StateBinding<PatrolAutomaton, Guard> {
            &self.binding
        }
    }

    #[test]
    fn binding_to_expected_kind_succeeds() {
        let automaton = Rc::new(PatrolAutomaton);
        let state = Watch::default();

        state
            .bind_automaton(&AutomatonHandle::new(&automaton))
            .unwrap();

        assert!(state.binding.has_automaton());
        assert!(Rc::ptr_eq(&state.binding.automaton().unwrap(), &automaton));
    }

    #[test]
    fn binding_to_other_kind_is_rejected() {
        let wrong = Rc::new(TurretAutomaton);
        let state = Watch::default();

        let result = state.bind_automaton(&AutomatonHandle::new(&wrong));

        match result {
            Err(FsmError::TypeMismatch {
                expected, found, ..
            }) => {
                assert!(expected.ends_with("PatrolAutomaton"));
                assert!(found.ends_with("TurretAutomaton"));
            }
            other => panic!("Expected TypeMismatch, got {other:?}"),
        }
        assert!(!state.binding.has_automaton());
    }

    #[test]
    fn rejected_binding_leaves_slot_free() {
        let wrong = Rc::new(TurretAutomaton);
        let right = Rc::new(PatrolAutomaton);
        let state = Watch::default();

        assert!(state.bind_automaton(&AutomatonHandle::new(&wrong)).is_err());
        assert!(state.bind_automaton(&AutomatonHandle::new(&right)).is_ok());
    }

    #[test]
    fn second_automaton_binding_fails() {
        let automaton = Rc::new(PatrolAutomaton);
        let handle = AutomatonHandle::new(&automaton);
        let state = Watch::default();

        state.bind_automaton(&handle).unwrap();

        assert!(matches!(
            state.bind_automaton(&handle),
            Err(FsmError::AlreadyBound { target: "automaton", .. })
        ));
    }

    #[test]
    fn owner_binds_once() {
        let state = Watch::default();
        assert!(matches!(
            state.binding.owner(),
            Err(FsmError::Unbound { target: "owner" })
        ));

        state.bind_owner(Rc::new(Guard)).unwrap();
        assert!(state.binding.has_owner());
        assert!(matches!(
            state.bind_owner(Rc::new(Guard)),
            Err(FsmError::AlreadyBound { target: "owner", .. })
        ));
    }

    #[test]
    fn dropped_automaton_is_reported() {
        let state = Watch::default();
        let handle = AutomatonHandle::new(&Rc::new(PatrolAutomaton));

        assert!(!handle.is::<PatrolAutomaton>());
        assert!(matches!(
            state.bind_automaton(&handle),
            Err(FsmError::AutomatonDropped)
        ));
    }

    #[test]
    fn handle_reports_its_kind() {
        let automaton = Rc::new(TurretAutomaton);
        let handle = AutomatonHandle::new(&automaton);

        assert!(handle.kind().ends_with("TurretAutomaton"));
        assert!(handle.is::<TurretAutomaton>());
        assert!(!handle.is::<PatrolAutomaton>());
    }
}
