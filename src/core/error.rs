//! Error types for the automaton engine.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Lifecycle phase of an automaton.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Created, `initiate` has not run yet
    Uninitiated,
    /// `initiate` completed its setup; a current state exists
    Running,
    /// `quit` has run
    Terminated,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Uninitiated => "uninitiated",
            Self::Running => "running",
            Self::Terminated => "terminated",
        };
        f.write_str(label)
    }
}

/// Errors raised by automata, state bindings and state logic.
#[derive(Debug, Error)]
pub enum FsmError {
    /// A state was attached to an automaton of a kind it does not work with.
    #[error("State '{state}' expects automaton '{expected}' but was bound to '{found}'")]
    TypeMismatch {
        state: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Cannot {operation} while the automaton is {phase}")]
    InvalidLifecycle {
        operation: &'static str,
        phase: Phase,
    },

    #[error("State '{state}' is already bound to its {target}")]
    AlreadyBound {
        state: &'static str,
        target: &'static str,
    },

    #[error("No {target} has been bound to this state yet")]
    Unbound { target: &'static str },

    #[error("The automaton behind this handle has been dropped")]
    AutomatonDropped,

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Failure raised by a state's own logic, passed through untouched.
    #[error(transparent)]
    State(#[from] anyhow::Error),
}

impl FsmError {
    pub(crate) fn lifecycle(operation: &'static str, phase: Phase) -> Self {
        Self::InvalidLifecycle { operation, phase }
    }

    /// Whether this is a [`FsmError::TypeMismatch`].
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}
