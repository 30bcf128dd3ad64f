//! Monster tuning parameters.

use crate::core::FsmError;
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Tuning parameters shared by the states of one monster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterConfig {
    /// Seconds a furious monster waits for the character before giving up
    pub character_waiting_time: f32,
    /// Length of one simulation tick, in seconds
    pub fixed_step: f32,
}

impl Default for MonsterConfig {
    fn default() -> Self {
        Self {
            character_waiting_time: 5.0,
            fixed_step: 0.02,
        }
    }
}

/// A single problem found in a [`MonsterConfig`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("{field} must be a finite number greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    #[error("fixed_step ({step}) must not exceed character_waiting_time ({waiting})")]
    StepExceedsWaiting { step: f32, waiting: f32 },
}

impl MonsterConfig {
    /// Check every rule, accumulating all violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = vec![
            positive("character_waiting_time", self.character_waiting_time),
            positive("fixed_step", self.fixed_step),
            if self.fixed_step > self.character_waiting_time {
                Validation::fail(ConfigViolation::StepExceedsWaiting {
                    step: self.fixed_step,
                    waiting: self.character_waiting_time,
                })
            } else {
                Validation::success(())
            },
        ];

        Validation::all_vec(checks).map(|_| ())
    }

    /// Parse a JSON document and validate it. Missing fields take their
    /// default values.
    pub fn from_json(json: &str) -> Result<Self, FsmError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| FsmError::Config(err.to_string()))?;
        config.validated()
    }

    /// Return the config if it passes [`validate`](Self::validate), otherwise
    /// a [`FsmError::Config`] listing every violation.
    pub fn validated(self) -> Result<Self, FsmError> {
        match self.validate() {
            Validation::Success(_) => Ok(self),
            Validation::Failure(violations) => {
                let message = violations
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(FsmError::Config(message))
            }
        }
    }
}

fn positive(field: &'static str, value: f32) -> Validation<(), NonEmptyVec<ConfigViolation>> {
    if value.is_finite() && value > 0.0 {
        Validation::success(())
    } else {
        Validation::fail(ConfigViolation::NotPositive { field, value })
    }
}
