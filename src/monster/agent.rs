//! Fixed-step driver owning a monster's controller and automaton.

use crate::core::{FsmError, IntoState};
use crate::monster::config::MonsterConfig;
use crate::monster::controller::{MonsterController, MonsterFlags};
use crate::monster::states::MoveState;
use crate::monster::{MonsterAutomaton, MonsterState};
use std::rc::Rc;

/// A monster: its controller, its automaton and a fixed-step clock.
pub struct Monster {
    controller: Rc<MonsterController>,
    automaton: Rc<MonsterAutomaton>,
    accumulator: f32,
}

impl Monster {
    /// Fails with [`FsmError::Config`] when `config` does not validate.
    pub fn new(config: MonsterConfig) -> Result<Self, FsmError> {
        Self::with_automaton(config, MonsterAutomaton::new())
    }

    /// Use a preconfigured automaton, e.g. one built with subscribers.
    pub fn with_automaton(
        config: MonsterConfig,
        automaton: Rc<MonsterAutomaton>,
    ) -> Result<Self, FsmError> {
        let config = config.validated()?;
        Ok(Self {
            controller: Rc::new(MonsterController::new(config)),
            automaton,
            accumulator: 0.0,
        })
    }

    pub fn controller(&self) -> &Rc<MonsterController> {
        &self.controller
    }

    pub fn automaton(&self) -> &Rc<MonsterAutomaton> {
        &self.automaton
    }

    /// Start the automaton in [`MoveState`].
    pub fn spawn(&self) -> Result<(), FsmError> {
        self.spawn_in::<MoveState>()
    }

    pub fn spawn_in<T: IntoState<dyn MonsterState>>(&self) -> Result<(), FsmError> {
        tracing::debug!(automaton = %self.automaton.id(), "Spawning monster");
        self.automaton.initiate::<T>(Rc::clone(&self.controller))
    }

    /// Run a single simulation tick of `step` seconds.
    pub fn tick(&self, step: f32) -> Result<(), FsmError> {
        self.automaton.simulate(step)
    }

    /// Feed `elapsed` seconds of frame time and run as many fixed ticks as
    /// fit. The remainder carries over to the next call.
    ///
    /// Returns the number of ticks run.
    pub fn advance(&mut self, elapsed: f32) -> Result<usize, FsmError> {
        let step = self.controller.config().fixed_step;
        self.accumulator += elapsed;

        let mut ticks = 0;
        while self.accumulator >= step {
            self.accumulator -= step;
            self.tick(step)?;
            ticks += 1;
        }
        Ok(ticks)
    }

    pub fn is_despawn_requested(&self) -> bool {
        self.controller.has_flag(MonsterFlags::DESPAWN_REQUESTED)
    }

    /// Exit the current state and stop the automaton.
    pub fn despawn(&self) -> Result<(), FsmError> {
        tracing::debug!(
            automaton = %self.automaton.id(),
            despawn_requested = self.is_despawn_requested(),
            "Despawning monster"
        );
        self.automaton.quit()
    }
}
