//! Monster behavior states.
//!
//! Only [`FuryState`] carries real behavior. The other states exist as
//! transition targets with the minimum logic needed to drive a monster
//! through a full life cycle.

use crate::core::{FsmError, Lifecycle, StateBinding, TypedState};
use crate::monster::controller::{AnimationTrigger, MonsterController, MonsterFlags};
use crate::monster::{MonsterAutomaton, MonsterState};
use crate::register_states;
use std::cell::Cell;

macro_rules! monster_binding {
    ($($state:ty),+) => {
        $(
            impl TypedState<MonsterController> for $state {
                type Automaton = MonsterAutomaton;

                fn binding(&self) -> &StateBinding<MonsterAutomaton, MonsterController> {
                    &self.binding
                }
            }
        )+
    };
}

monster_binding!(FuryState, MoveState, CombatState, DisappearState);
register_states!(dyn MonsterState => FuryState, MoveState, CombatState, DisappearState);

/// The monster cannot reach the character.
///
/// It stops flipping and waits. As soon as it can attack or move again it
/// leaves the state; if the character stays out of reach for longer than
/// [`MonsterConfig::character_waiting_time`](crate::monster::MonsterConfig)
/// the monster gives up and disappears.
#[derive(Default)]
pub struct FuryState {
    binding: StateBinding<MonsterAutomaton, MonsterController>,
    waiting_time: Cell<f32>,
    elapsed: Cell<f32>,
}

impl FuryState {
    /// Seconds spent waiting since the last entry.
    pub fn elapsed(&self) -> f32 {
        self.elapsed.get()
    }
}

impl Lifecycle for FuryState {
    fn initialize(&self) -> Result<(), FsmError> {
        let owner = self.binding.owner()?;
        self.waiting_time.set(owner.config().character_waiting_time);
        Ok(())
    }

    fn on_state_entry(&self) -> Result<(), FsmError> {
        let owner = self.binding.owner()?;
        owner.trigger(AnimationTrigger::Fury);
        owner.set_flag(MonsterFlags::CAN_FLIP, false);
        self.elapsed.set(0.0);
        Ok(())
    }

    fn on_state_exit(&self) -> Result<(), FsmError> {
        self.binding.owner()?.set_flag(MonsterFlags::CAN_FLIP, true);
        Ok(())
    }
}

impl MonsterState for FuryState {
    fn simulate(&self, step: f32) -> Result<(), FsmError> {
        let owner = self.binding.owner()?;

        if owner.has_flag(MonsterFlags::CAN_START_ATTACK) {
            return self.binding.automaton()?.transit::<CombatState>();
        }

        if owner.has_flag(MonsterFlags::CAN_MOVE) {
            return self.binding.automaton()?.transit::<MoveState>();
        }

        let elapsed = self.elapsed.get() + step;
        self.elapsed.set(elapsed);

        if elapsed >= self.waiting_time.get() {
            tracing::debug!(elapsed, "Character unreachable, monster gives up");
            return self.binding.automaton()?.transit::<DisappearState>();
        }

        Ok(())
    }
}

/// The monster walks towards the character.
#[derive(Default)]
pub struct MoveState {
    binding: StateBinding<MonsterAutomaton, MonsterController>,
}

impl Lifecycle for MoveState {
    fn on_state_entry(&self) -> Result<(), FsmError> {
        self.binding.owner()?.trigger(AnimationTrigger::Move);
        Ok(())
    }
}

impl MonsterState for MoveState {
    fn simulate(&self, _step: f32) -> Result<(), FsmError> {
        let owner = self.binding.owner()?;

        if owner.has_flag(MonsterFlags::CAN_START_ATTACK) {
            return self.binding.automaton()?.transit::<CombatState>();
        }

        if !owner.has_flag(MonsterFlags::CAN_MOVE) {
            return self.binding.automaton()?.transit::<FuryState>();
        }

        Ok(())
    }
}

/// The monster attacks the character.
#[derive(Default)]
pub struct CombatState {
    binding: StateBinding<MonsterAutomaton, MonsterController>,
}

impl Lifecycle for CombatState {
    fn on_state_entry(&self) -> Result<(), FsmError> {
        self.binding.owner()?.trigger(AnimationTrigger::Attack);
        Ok(())
    }
}

impl MonsterState for CombatState {
    fn simulate(&self, _step: f32) -> Result<(), FsmError> {
        let owner = self.binding.owner()?;
        if owner.has_flag(MonsterFlags::CAN_START_ATTACK) {
            return Ok(());
        }

        let automaton = self.binding.automaton()?;
        if owner.has_flag(MonsterFlags::CAN_MOVE) {
            automaton.transit::<MoveState>()
        } else {
            automaton.transit::<FuryState>()
        }
    }
}

/// Terminal state: the monster vanishes and asks to be despawned.
#[derive(Default)]
pub struct DisappearState {
    binding: StateBinding<MonsterAutomaton, MonsterController>,
}

impl Lifecycle for DisappearState {
    fn on_state_entry(&self) -> Result<(), FsmError> {
        let owner = self.binding.owner()?;
        owner.trigger(AnimationTrigger::Disappear);
        owner.set_flag(MonsterFlags::DESPAWN_REQUESTED, true);
        Ok(())
    }
}

impl MonsterState for DisappearState {
    fn simulate(&self, _step: f32) -> Result<(), FsmError> {
        Ok(())
    }
}
