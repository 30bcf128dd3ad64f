//! The monster owner object shared by every monster state.

use crate::monster::config::MonsterConfig;
use bitflags::bitflags;
use std::cell::{Cell, RefCell};

bitflags! {
    /// Behavior flags of a monster.
    ///
    /// `CAN_START_ATTACK` and `CAN_MOVE` are written by the sensing systems
    /// every tick; states only read them.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MonsterFlags: u8 {
        const CAN_FLIP = 1;
        const CAN_START_ATTACK = 1 << 1;
        const CAN_MOVE = 1 << 2;
        const DESPAWN_REQUESTED = 1 << 3;
    }
}

/// Animation triggers fired by monster states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationTrigger {
    Move,
    Attack,
    Fury,
    Disappear,
}

/// Side effects observed on the controller, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MonsterEvent {
    Animation(AnimationTrigger),
    FlagChanged { flag: MonsterFlags, value: bool },
}

/// Controller of a single monster.
///
/// Stands in for the animation and AI components: animation triggers and
/// flag writes are recorded as [`MonsterEvent`]s.
#[derive(Debug)]
pub struct MonsterController {
    config: MonsterConfig,
    flags: Cell<MonsterFlags>,
    events: RefCell<Vec<MonsterEvent>>,
}

impl MonsterController {
    pub fn new(config: MonsterConfig) -> Self {
        Self {
            config,
            flags: Cell::new(MonsterFlags::CAN_FLIP),
            events: RefCell::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &MonsterConfig {
        &self.config
    }

    pub fn flags(&self) -> MonsterFlags {
        self.flags.get()
    }

    pub fn has_flag(&self, flag: MonsterFlags) -> bool {
        self.flags.get().contains(flag)
    }

    pub fn set_flag(&self, flag: MonsterFlags, value: bool) {
        let mut flags = self.flags.get();
        flags.set(flag, value);
        self.flags.set(flags);
        self.events
            .borrow_mut()
            .push(MonsterEvent::FlagChanged { flag, value });
    }

    pub fn trigger(&self, trigger: AnimationTrigger) {
        self.events
            .borrow_mut()
            .push(MonsterEvent::Animation(trigger));
    }

    pub fn events(&self) -> Vec<MonsterEvent> {
        self.events.borrow().clone()
    }

    /// Drain the recorded events.
    pub fn take_events(&self) -> Vec<MonsterEvent> {
        self.events.take()
    }

    /// How many times `flag` was written with `value`.
    pub fn flag_writes(&self, flag: MonsterFlags, value: bool) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| **event == MonsterEvent::FlagChanged { flag, value })
            .count()
    }
}
