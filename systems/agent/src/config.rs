//! Tunables of the agent, loadable from TOML.

use harvest_core::DayNightCycle;
use harvest_system_expansion::{BuildGate, DEFAULT_SAFETY_MARGIN};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading or validating an [`AgentConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML or does not match the schema.
    #[error("failed to parse agent configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A cycle without steps cannot be scheduled.
    #[error("cycle_length must be positive")]
    EmptyCycle,
    /// Night would swallow the whole cycle.
    #[error("night_length ({night}) must be shorter than cycle_length ({cycle})")]
    NightTooLong {
        /// Configured night length.
        night: u32,
        /// Configured cycle length.
        cycle: u32,
    },
}

/// Day/night schedule and build safety margin used by the agent.
///
/// Missing keys fall back to the standard game rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    /// Steps in one day/night cycle.
    pub cycle_length: u32,
    /// Steps of night at the end of each cycle.
    pub night_length: u32,
    /// Daylight steps that must remain before founding a city tile.
    pub build_safety_margin: u32,
}

impl AgentConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the schedule is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycle_length == 0 {
            return Err(ConfigError::EmptyCycle);
        }
        if self.night_length >= self.cycle_length {
            return Err(ConfigError::NightTooLong {
                night: self.night_length,
                cycle: self.cycle_length,
            });
        }
        Ok(())
    }

    /// Day/night schedule described by the configuration.
    #[must_use]
    pub const fn cycle(&self) -> DayNightCycle {
        DayNightCycle::new(self.cycle_length, self.night_length)
    }

    /// City-building gate described by the configuration.
    #[must_use]
    pub const fn build_gate(&self) -> BuildGate {
        BuildGate::new(self.cycle(), self.build_safety_margin)
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        let cycle = DayNightCycle::STANDARD;
        Self {
            cycle_length: cycle.cycle_length(),
            night_length: cycle.night_length(),
            build_safety_margin: DEFAULT_SAFETY_MARGIN,
        }
    }
}
