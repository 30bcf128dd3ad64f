//! Bounded in-memory journal of state changes.
//!
//! A [`TransitionLog`] listens to an automaton's change notifications and
//! keeps the most recent transitions with timestamps. It is a diagnostic aid:
//! records can be inspected or serialized, never replayed.

use crate::core::{StateContract, StateId};
use crate::machine::{Automaton, SubscriptionId};
use chrono::{DateTime, Utc};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

/// One completed transition.
#[derive(Clone, Debug, Serialize)]
pub struct TransitionRecord {
    /// Position in the stream of notifications, starting at 0
    pub sequence: u64,
    /// The state that was current before, `None` for the initial entry
    pub from: Option<StateId>,
    /// The state that became current
    pub to: StateId,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug)]
struct LogInner {
    records: VecDeque<TransitionRecord>,
    capacity: Option<usize>,
    next_sequence: u64,
    last: Option<StateId>,
}

/// Shared, clonable transition journal.
///
/// Clones share the same records.
///
/// # Example
///
/// ```rust
/// use automata::core::StateId;
/// use automata::journal::TransitionLog;
///
/// struct Idle;
/// struct Chase;
///
/// let log = TransitionLog::with_capacity(8);
/// log.record(StateId::of::<Idle>());
/// log.record(StateId::of::<Chase>());
///
/// assert_eq!(log.path(), vec![StateId::of::<Idle>(), StateId::of::<Chase>()]);
/// assert_eq!(log.records()[1].from, Some(StateId::of::<Idle>()));
/// ```
#[derive(Clone, Debug)]
pub struct TransitionLog {
    inner: Rc<RefCell<LogInner>>,
}

impl Default for TransitionLog {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl TransitionLog {
    /// Journal keeping at most `capacity` records; older ones are dropped.
    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_capacity(Some(capacity.max(1)))
    }

    pub fn unbounded() -> Self {
        Self::from_capacity(None)
    }

    fn from_capacity(capacity: Option<usize>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(LogInner {
                records: VecDeque::new(),
                capacity,
                next_sequence: 0,
                last: None,
            })),
        }
    }

    /// Subscribe this journal to `automaton`.
    pub fn attach<S, O>(&self, automaton: &Automaton<S, O>) -> SubscriptionId
    where
        S: ?Sized + StateContract<O> + 'static,
        O: 'static,
    {
        let log = self.clone();
        automaton.subscribe(move |state| log.record(state))
    }

    /// Append a notification about `to` becoming current.
    pub fn record(&self, to: StateId) {
        let mut inner = self.inner.borrow_mut();
        let record = TransitionRecord {
            sequence: inner.next_sequence,
            from: inner.last,
            to,
            timestamp: Utc::now(),
        };

        inner.next_sequence += 1;
        inner.last = Some(to);
        if let Some(capacity) = inner.capacity {
            while inner.records.len() >= capacity {
                inner.records.pop_front();
            }
        }
        inner.records.push_back(record);
    }

    /// Retained records, oldest first.
    pub fn records(&self) -> Vec<TransitionRecord> {
        self.inner.borrow().records.iter().cloned().collect()
    }

    /// States visited according to the retained records: the `from` of the
    /// oldest record, if any, then every `to`.
    pub fn path(&self) -> Vec<StateId> {
        let inner = self.inner.borrow();
        let mut path = Vec::with_capacity(inner.records.len() + 1);
        if let Some(from) = inner.records.front().and_then(|first| first.from) {
            path.push(from);
        }
        path.extend(inner.records.iter().map(|record| record.to));
        path
    }

    /// Time between the oldest and newest retained record.
    pub fn duration(&self) -> Option<Duration> {
        let inner = self.inner.borrow();
        let (first, last) = (inner.records.front()?, inner.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// The most recently entered state, even if its record was evicted.
    pub fn last(&self) -> Option<StateId> {
        self.inner.borrow().last
    }

    /// Number of notifications seen, including evicted ones.
    pub fn total(&self) -> u64 {
        self.inner.borrow().next_sequence
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().records.is_empty()
    }

    /// Drop retained records. Sequence numbers keep counting.
    pub fn clear(&self) {
        self.inner.borrow_mut().records.clear();
    }
}

impl Serialize for TransitionLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let inner = self.inner.borrow();
        let mut seq = serializer.serialize_seq(Some(inner.records.len()))?;
        for record in &inner.records {
            seq.serialize_element(record)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Idle;
    struct Patrol;
    struct Chase;

    #[test]
    fn new_log_is_empty() {
        let log = TransitionLog::default();
        assert!(log.is_empty());
        assert!(log.path().is_empty());
        assert!(log.duration().is_none());
        assert_eq!(log.last(), None);
    }

    #[test]
    fn first_record_has_no_origin() {
        let log = TransitionLog::unbounded();
        log.record(StateId::of::<Idle>());

        let records = log.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].from, None);
        assert_eq!(records[0].sequence, 0);
    }

    #[test]
    fn records_chain_from_previous_state() {
        let log = TransitionLog::unbounded();
        log.record(StateId::of::<Idle>());
        log.record(StateId::of::<Patrol>());
        log.record(StateId::of::<Chase>());

        let records = log.records();
        assert_eq!(records[1].from, Some(StateId::of::<Idle>()));
        assert_eq!(records[2].from, Some(StateId::of::<Patrol>()));
        assert_eq!(
            log.path(),
            vec![
                StateId::of::<Idle>(),
                StateId::of::<Patrol>(),
                StateId::of::<Chase>()
            ]
        );
    }

    #[test]
    fn capacity_evicts_oldest_records() {
        let log = TransitionLog::with_capacity(2);
        log.record(StateId::of::<Idle>());
        log.record(StateId::of::<Patrol>());
        log.record(StateId::of::<Chase>());

        assert_eq!(log.len(), 2);
        assert_eq!(log.total(), 3);
        assert_eq!(log.records()[0].sequence, 1);
        assert_eq!(
            log.path(),
            vec![
                StateId::of::<Idle>(),
                StateId::of::<Patrol>(),
                StateId::of::<Chase>()
            ]
        );
    }

    #[test]
    fn zero_capacity_keeps_latest_record() {
        let log = TransitionLog::with_capacity(0);
        log.record(StateId::of::<Idle>());
        log.record(StateId::of::<Chase>());

        assert_eq!(log.len(), 1);
        assert_eq!(log.records()[0].to, StateId::of::<Chase>());
    }

    #[test]
    fn clones_share_records() {
        let log = TransitionLog::unbounded();
        let other = log.clone();
        other.record(StateId::of::<Idle>());

        assert_eq!(log.len(), 1);
    }

    #[test]
    fn clear_keeps_sequence_and_last_state() {
        let log = TransitionLog::unbounded();
        log.record(StateId::of::<Idle>());
        log.clear();
        log.record(StateId::of::<Patrol>());

        let records = log.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sequence, 1);
        assert_eq!(records[0].from, Some(StateId::of::<Idle>()));
    }

    #[test]
    fn duration_spans_retained_records() {
        let log = TransitionLog::unbounded();
        log.record(StateId::of::<Idle>());
        std::thread::sleep(Duration::from_millis(5));
        log.record(StateId::of::<Chase>());

        assert!(log.duration().unwrap() >= Duration::from_millis(5));
    }

    #[test]
    fn log_serializes_as_record_list() {
        let log = TransitionLog::unbounded();
        log.record(StateId::of::<Idle>());
        log.record(StateId::of::<Chase>());

        let json = serde_json::to_value(&log).unwrap();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0]["from"].is_null());
        assert!(entries[1]["to"].as_str().unwrap().ends_with("::Chase"));
    }
}
