//! Monster behavior built on the automaton.
//!
//! A monster is driven by a [`MonsterAutomaton`] whose states share the
//! [`MonsterState`] contract and act on a [`MonsterController`]. The
//! [`Monster`] driver owns both and advances them on a fixed time step.
//!
//! ```rust
//! use automata::monster::{FuryState, Monster, MonsterConfig, MonsterFlags};
//!
//! let monster = Monster::new(MonsterConfig {
//!     character_waiting_time: 1.0,
//!     fixed_step: 0.5,
//! })
//! .unwrap();
//! monster.spawn_in::<FuryState>().unwrap();
//!
//! monster.tick(0.5).unwrap();
//! monster.tick(0.5).unwrap();
//!
//! assert!(monster.controller().has_flag(MonsterFlags::DESPAWN_REQUESTED));
//! ```

mod agent;
mod config;
mod controller;
mod states;

pub use agent::Monster;
pub use config::{ConfigViolation, MonsterConfig};
pub use controller::{AnimationTrigger, MonsterController, MonsterEvent, MonsterFlags};
pub use states::{CombatState, DisappearState, FuryState, MoveState};

use crate::core::{FsmError, StateContract};
use crate::machine::Automaton;

/// Contract shared by every monster state.
pub trait MonsterState: StateContract<MonsterController> {
    /// Advance the behavior by `step` seconds. Runs once per fixed tick
    /// while the state is current, and may transit.
    fn simulate(&self, step: f32) -> Result<(), FsmError>;
}

pub type MonsterAutomaton = Automaton<dyn MonsterState, MonsterController>;

impl Automaton<dyn MonsterState, MonsterController> {
    /// Forward one fixed tick to the current state.
    pub fn simulate(&self, step: f32) -> Result<(), FsmError> {
        self.dispatch_as("simulate", |state| state.simulate(step))?
    }
}
