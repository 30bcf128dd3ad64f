//! Type-keyed store of state instances.

use crate::core::StateId;
use serde::Serialize;
use std::any::Any;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

/// How far a registered state has progressed through its one-time setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StatePhase {
    /// Attached to the automaton, waiting for an owner
    Unbound,
    /// Owner attached, `initialize` not run yet
    Bound,
    /// `initialize` completed
    Initialized,
}

/// A registered state instance.
///
/// The same allocation is kept twice: once as the automaton's state-contract
/// type for dispatch and once as `dyn Any` to hand the concrete type back to
/// callers.
pub(crate) struct Entry<S: ?Sized> {
    pub(crate) id: StateId,
    pub(crate) state: Rc<S>,
    concrete: Rc<dyn Any>,
    phase: Cell<StatePhase>,
}

impl<S: ?Sized> Entry<S> {
    pub(crate) fn new(id: StateId, state: Rc<S>, concrete: Rc<dyn Any>) -> Self {
        Self {
            id,
            state,
            concrete,
            phase: Cell::new(StatePhase::Unbound),
        }
    }

    pub(crate) fn phase(&self) -> StatePhase {
        self.phase.get()
    }

    pub(crate) fn set_phase(&self, phase: StatePhase) {
        self.phase.set(phase);
    }

    pub(crate) fn downcast<T: Any>(&self) -> Option<Rc<T>> {
        Rc::clone(&self.concrete).downcast::<T>().ok()
    }
}

/// Registered states, unique per type, remembering registration order.
pub(crate) struct Registry<S: ?Sized> {
    entries: Vec<Rc<Entry<S>>>,
    index: HashMap<StateId, usize>,
}

impl<S: ?Sized> Default for Registry<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<S: ?Sized> Registry<S> {
    pub(crate) fn get(&self, id: &StateId) -> Option<Rc<Entry<S>>> {
        self.index.get(id).map(|&idx| Rc::clone(&self.entries[idx]))
    }

    /// Insert a new entry. An entry already registered under the same id
    /// wins and is returned instead.
    pub(crate) fn insert(&mut self, entry: Entry<S>) -> Rc<Entry<S>> {
        if let Some(existing) = self.get(&entry.id) {
            return existing;
        }

        let entry = Rc::new(entry);
        self.index.insert(entry.id, self.entries.len());
        self.entries.push(Rc::clone(&entry));
        entry
    }

    /// Entries in registration order.
    pub(crate) fn entries(&self) -> Vec<Rc<Entry<S>>> {
        self.entries.iter().map(Rc::clone).collect()
    }

    pub(crate) fn ids(&self) -> Vec<StateId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Walk;

    #[derive(Default)]
    struct Run;

    fn entry<T: Any + Default>(id: StateId) -> Entry<dyn Any> {
        let concrete: Rc<dyn Any> = Rc::new(T::default());
        Entry::new(id, Rc::clone(&concrete), concrete)
    }

    #[test]
    fn new_entries_start_unbound() {
        let e = entry::<Walk>(StateId::of::<Walk>());
        assert_eq!(e.phase(), StatePhase::Unbound);

        e.set_phase(StatePhase::Initialized);
        assert_eq!(e.phase(), StatePhase::Initialized);
    }

    #[test]
    fn insert_keeps_first_instance_per_type() {
        let mut registry: Registry<dyn Any> = Registry::default();

        let first = registry.insert(entry::<Walk>(StateId::of::<Walk>()));
        let second = registry.insert(entry::<Walk>(StateId::of::<Walk>()));

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn entries_follow_registration_order() {
        let mut registry: Registry<dyn Any> = Registry::default();
        registry.insert(entry::<Run>(StateId::of::<Run>()));
        registry.insert(entry::<Walk>(StateId::of::<Walk>()));

        assert_eq!(
            registry.ids(),
            vec![StateId::of::<Run>(), StateId::of::<Walk>()]
        );
        assert_eq!(registry.entries().len(), 2);
    }

    #[test]
    fn downcast_returns_concrete_instance() {
        let mut registry: Registry<dyn Any> = Registry::default();
        registry.insert(entry::<Walk>(StateId::of::<Walk>()));

        let found = registry.get(&StateId::of::<Walk>()).unwrap();
        assert!(found.downcast::<Walk>().is_some());
        assert!(found.downcast::<Run>().is_none());
        assert!(registry.get(&StateId::of::<Run>()).is_none());
    }
}
