//! The automaton: registry, current state and transition protocol.

use crate::core::{AutomatonHandle, FsmError, IntoState, Phase, StateContract, StateId};
use crate::machine::builder::{AutomatonBuilder, InitiatedHook};
use crate::machine::notify::{Listener, SubscriptionId, Subscribers};
use crate::machine::registry::{Entry, Registry, StatePhase};
use serde::Serialize;
use std::any::type_name;
use std::cell::{Cell, OnceCell, RefCell};
use std::rc::{Rc, Weak};
use uuid::Uuid;

/// Finite automaton over polymorphic states.
///
/// `S` is the state-contract type shared by every state of this automaton,
/// usually a trait object such as `dyn MonsterState`. `O` is the owner the
/// states act upon.
///
/// Each state type gets at most one instance per automaton, created on first
/// use and reused afterwards. Instances created before [`initiate`] wait for
/// the owner; instances created later are bound and initialized on the spot.
///
/// The automaton is always shared through `Rc` and every operation takes
/// `&self`. No internal borrow is held while state code or a subscriber runs,
/// so states can call back into the automaton from any hook. Operations on a
/// single automaton must not run concurrently; the type is `!Send`.
///
/// [`initiate`]: Automaton::initiate
pub struct Automaton<S: ?Sized + 'static, O: 'static> {
    id: Uuid,
    this: Weak<Self>,
    phase: Cell<Phase>,
    owner: OnceCell<Rc<O>>,
    registry: RefCell<Registry<S>>,
    current: RefCell<Option<Rc<Entry<S>>>>,
    subscribers: Subscribers,
    on_initiated: Option<InitiatedHook<S, O>>,
}

/// Point-in-time view of an automaton, for diagnostics.
#[derive(Clone, Debug, Serialize)]
pub struct AutomatonSnapshot {
    pub id: Uuid,
    pub phase: Phase,
    pub current: Option<StateId>,
    pub states: Vec<RegisteredState>,
    pub subscribers: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegisteredState {
    pub id: StateId,
    pub phase: StatePhase,
}

impl<S, O> Automaton<S, O>
where
    S: ?Sized + StateContract<O> + 'static,
    O: 'static,
{
    /// Create an automaton with no hook and no subscribers.
    pub fn new() -> Rc<Self> {
        Self::from_parts(Vec::new(), None)
    }

    /// Start configuring an automaton.
    pub fn builder() -> AutomatonBuilder<S, O> {
        AutomatonBuilder::new()
    }

    pub(crate) fn from_parts(
        listeners: Vec<Listener>,
        on_initiated: Option<InitiatedHook<S, O>>,
    ) -> Rc<Self> {
        let subscribers = Subscribers::default();
        for listener in listeners {
            subscribers.add(listener);
        }

        Rc::new_cyclic(|this| Self {
            id: Uuid::new_v4(),
            this: this.clone(),
            phase: Cell::new(Phase::Uninitiated),
            owner: OnceCell::new(),
            registry: RefCell::new(Registry::default()),
            current: RefCell::new(None),
            subscribers,
            on_initiated,
        })
    }

    /// Start the automaton in state `T` on behalf of `owner`.
    ///
    /// Binds and initializes every state registered so far, in registration
    /// order, makes `T` current, runs the on-initiated hook, enters `T` and
    /// notifies subscribers.
    ///
    /// Fails with [`FsmError::InvalidLifecycle`] if the automaton was already
    /// initiated, including after a failed earlier attempt.
    pub fn initiate<T: IntoState<S>>(&self, owner: Rc<O>) -> Result<(), FsmError> {
        let phase = self.phase.get();
        if phase != Phase::Uninitiated || self.owner.set(Rc::clone(&owner)).is_err() {
            return Err(FsmError::lifecycle("initiate", phase));
        }

        let initial_id = StateId::of::<T>();
        tracing::debug!(automaton = %self.id, initial = %initial_id, "Initiating automaton");

        // States requested before start, bound and initialized in one pass.
        let pending = self.registry.borrow().entries();
        for entry in pending {
            self.prepare(&entry, &owner)?;
        }

        let initial = self.get_or_create::<T>()?;
        *self.current.borrow_mut() = Some(Rc::clone(&initial));
        self.phase.set(Phase::Running);

        if let Some(hook) = &self.on_initiated {
            hook(self)?;
        }

        initial.state.on_state_entry()?;
        self.subscribers.broadcast(initial.id);
        Ok(())
    }

    /// Make `T` the current state.
    ///
    /// Does nothing when `T` is already current. Otherwise exits the current
    /// state, enters `T` and notifies subscribers. A failing hook aborts the
    /// protocol where it stands; nothing is rolled back.
    ///
    /// A state calling this from one of its own hooks should return right
    /// after: the automaton has moved on and the caller is no longer current.
    pub fn transit<T: IntoState<S>>(&self) -> Result<(), FsmError> {
        let current = self.running_entry("transit")?;
        let target = StateId::of::<T>();

        if current.id == target {
            tracing::trace!(automaton = %self.id, state = %target, "Ignoring transit to current state");
            return Ok(());
        }

        tracing::debug!(automaton = %self.id, from = %current.id, to = %target, "Transit");

        current.state.on_state_exit()?;

        let next = self.get_or_create::<T>()?;
        *self.current.borrow_mut() = Some(Rc::clone(&next));
        next.state.on_state_entry()?;
        self.subscribers.broadcast(target);
        Ok(())
    }

    /// The single instance of `T`, created on first request.
    ///
    /// Works in every phase. Fails only if `T` rejects this automaton or its
    /// `initialize` fails.
    pub fn get_state<T: IntoState<S>>(&self) -> Result<Rc<T>, FsmError> {
        let entry = self.get_or_create::<T>()?;
        entry.downcast::<T>().ok_or(FsmError::TypeMismatch {
            state: type_name::<T>(),
            expected: type_name::<T>(),
            found: entry.id.name(),
        })
    }

    /// Whether `T` is the current state.
    ///
    /// After [`quit`](Automaton::quit) this still reports the last state.
    pub fn is_current_state<T: IntoState<S>>(&self) -> bool {
        self.current_state_id() == Some(StateId::of::<T>())
    }

    /// Exit the current state and stop the automaton.
    ///
    /// The registry and current state are left in place. Calling this before
    /// `initiate` or a second time does nothing.
    pub fn quit(&self) -> Result<(), FsmError> {
        if self.phase.get() != Phase::Running {
            return Ok(());
        }

        self.phase.set(Phase::Terminated);
        let current = self.current.borrow().clone();
        let last = current.as_ref().map(|entry| entry.id.short_name());
        tracing::debug!(automaton = %self.id, state = ?last, "Quitting automaton");

        match current {
            Some(entry) => entry.state.on_state_exit(),
            None => Ok(()),
        }
    }

    /// Run `f` against the current state.
    ///
    /// Fails with [`FsmError::InvalidLifecycle`] unless the automaton is
    /// running.
    pub fn dispatch<R>(&self, f: impl FnOnce(&S) -> R) -> Result<R, FsmError> {
        self.dispatch_as("dispatch", f)
    }

    pub(crate) fn dispatch_as<R>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&S) -> R,
    ) -> Result<R, FsmError> {
        let current = self.running_entry(operation)?;
        Ok(f(&*current.state))
    }

    /// Subscribe to state changes.
    ///
    /// Listeners run synchronously after the new state's `on_state_entry`,
    /// and may re-enter the automaton.
    pub fn subscribe(&self, listener: impl Fn(StateId) + 'static) -> SubscriptionId {
        self.subscribers.add(Rc::new(listener))
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    pub fn owner(&self) -> Option<&Rc<O>> {
        self.owner.get()
    }

    /// Type-erased handle to this automaton, as given to its states.
    pub fn handle(&self) -> AutomatonHandle {
        AutomatonHandle::from_weak(self.this.clone())
    }

    pub fn current_state(&self) -> Option<Rc<S>> {
        self.current
            .borrow()
            .as_ref()
            .map(|entry| Rc::clone(&entry.state))
    }

    pub fn current_state_id(&self) -> Option<StateId> {
        self.current.borrow().as_ref().map(|entry| entry.id)
    }

    /// Ids of every registered state, in registration order.
    pub fn registered_states(&self) -> Vec<StateId> {
        self.registry.borrow().ids()
    }

    /// Setup progress of `T`, or `None` if it was never requested.
    pub fn state_phase<T: IntoState<S>>(&self) -> Option<StatePhase> {
        self.registry
            .borrow()
            .get(&StateId::of::<T>())
            .map(|entry| entry.phase())
    }

    pub fn snapshot(&self) -> AutomatonSnapshot {
        let registry = self.registry.borrow();
        let mut states = Vec::with_capacity(registry.len());
        for entry in registry.entries() {
            states.push(RegisteredState {
                id: entry.id,
                phase: entry.phase(),
            });
        }

        AutomatonSnapshot {
            id: self.id,
            phase: self.phase.get(),
            current: self.current_state_id(),
            states,
            subscribers: self.subscribers.len(),
        }
    }

    fn running_entry(&self, operation: &'static str) -> Result<Rc<Entry<S>>, FsmError> {
        let phase = self.phase.get();
        if phase != Phase::Running {
            return Err(FsmError::lifecycle(operation, phase));
        }

        self.current
            .borrow()
            .clone()
            .ok_or(FsmError::lifecycle(operation, phase))
    }

    fn get_or_create<T: IntoState<S>>(&self) -> Result<Rc<Entry<S>>, FsmError> {
        let id = StateId::of::<T>();
        let existing = self.registry.borrow().get(&id);
        if let Some(entry) = existing {
            // An earlier setup may have failed halfway.
            if let Some(owner) = self.owner.get() {
                self.prepare(&entry, owner)?;
            }
            return Ok(entry);
        }

        let concrete = Rc::new(T::default());
        let state = Rc::clone(&concrete).into_state();
        state.bind_automaton(&self.handle())?;

        let entry = self
            .registry
            .borrow_mut()
            .insert(Entry::new(id, state, concrete));

        tracing::trace!(automaton = %self.id, state = %id, "Registered state");

        if let Some(owner) = self.owner.get() {
            self.prepare(&entry, owner)?;
        }

        Ok(entry)
    }

    fn prepare(&self, entry: &Entry<S>, owner: &Rc<O>) -> Result<(), FsmError> {
        if entry.phase() == StatePhase::Unbound {
            entry.state.bind_owner(Rc::clone(owner))?;
            entry.set_phase(StatePhase::Bound);
        }

        if entry.phase() == StatePhase::Bound {
            entry.state.initialize()?;
            entry.set_phase(StatePhase::Initialized);
        }

        Ok(())
    }
}
