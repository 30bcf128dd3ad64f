//! Change notifications.
//!
//! Subscribers are called synchronously, in subscription order, with the id of
//! the state that just became current. Delivery works on a snapshot of the
//! subscriber list, so a callback may subscribe, unsubscribe or trigger another
//! transition. A nested transition notifies everyone before the outer
//! delivery resumes.

use crate::core::StateId;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Callback invoked after every completed transition.
pub type Listener = Rc<dyn Fn(StateId)>;

/// Token returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub(crate) struct Subscribers {
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_id: Cell<u64>,
}

impl Subscribers {
    pub(crate) fn add(&self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub(crate) fn broadcast(&self, state: StateId) {
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        tracing::trace!(state = %state, listeners = snapshot.len(), "Notifying subscribers");
        for listener in snapshot {
            listener(state);
        }
    }
}
