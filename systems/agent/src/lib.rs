#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-tick orchestration of the harvest agent.
//!
//! [`Agent::tick`] runs the systems in a fixed order: it rebuilds the resource
//! index, opens an empty reservation table, releases build projects whose unit
//! disappeared or whose site got covered, drives every worker and finally lets
//! each city tile choose its production. Build projects are the only state
//! kept from one tick to the next.

use harvest_core::{Action, ReservationTable};
use harvest_system_city_policy::CityPolicy;
use harvest_system_expansion::{BuildGate, ProjectLedger};
use harvest_system_unit_policy::{TickInputs, UnitPolicy};
use harvest_world::{query, World};
use tracing::debug;

mod config;

pub use config::{AgentConfig, ConfigError};

/// Decision engine for one player across a whole game.
#[derive(Debug)]
pub struct Agent {
    config: AgentConfig,
    gate: BuildGate,
    ledger: ProjectLedger,
    units: UnitPolicy,
    cities: CityPolicy,
}

impl Agent {
    /// Creates an agent after validating `config`.
    pub fn new(config: AgentConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            gate: config.build_gate(),
            ledger: ProjectLedger::default(),
            units: UnitPolicy::new(),
            cities: CityPolicy::new(),
        })
    }

    /// Configuration the agent runs with.
    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Build projects carried into the next tick.
    #[must_use]
    pub fn projects(&self) -> &ProjectLedger {
        &self.ledger
    }

    /// Computes the actions of the acting player for the tick in `world`.
    pub fn tick(&mut self, world: &World) -> Vec<Action> {
        let player = query::player(world);
        let size = query::size(world);
        let step = query::step(world);

        let index = query::resource_index(world);
        let mut reservations = ReservationTable::new(size);
        self.ledger.fit(size);
        let released =
            self.ledger.release_missing(player.units()) + self.ledger.release_blocked(world);
        let build_permitted = self.gate.permits(player.cities(), step);

        let mut actions = Vec::new();
        self.units.handle(
            TickInputs {
                world,
                resources: index.cells(),
                build_permitted,
            },
            &mut self.ledger,
            &mut reservations,
            &mut actions,
        );
        let unit_actions = actions.len();
        self.cities.handle(player.cities(), player.units(), &mut actions);

        debug!(
            step,
            night = self.gate.cycle().is_night(step),
            deposits = index.len(),
            build_permitted,
            unit_actions,
            city_actions = actions.len() - unit_actions,
            projects = self.ledger.len(),
            released,
            reserved = reservations.reserved_count(),
            "tick planned"
        );

        actions
    }
}

impl Default for Agent {
    fn default() -> Self {
        let config = AgentConfig::default();
        Self {
            config,
            gate: config.build_gate(),
            ledger: ProjectLedger::default(),
            units: UnitPolicy::new(),
            cities: CityPolicy::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_core::{CellCoord, Direction, ResourceKind, UnitId};
    use harvest_world::{CityObservation, Observation, UnitObservation};

    fn world_from(observation: &Observation) -> World {
        World::from_observation(observation).expect("valid observation")
    }

    #[test]
    fn invalid_config_is_refused() {
        let config = AgentConfig {
            cycle_length: 5,
            night_length: 9,
            build_safety_margin: 1,
        };
        assert!(matches!(
            Agent::new(config),
            Err(ConfigError::NightTooLong { night: 9, cycle: 5 })
        ));
    }

    #[test]
    fn units_move_before_cities_act() {
        let observation = Observation::new(0, 10, 10, 0)
            .with_resource(5, 0, ResourceKind::Wood, 500)
            .with_unit(0, UnitObservation::worker(1, 0, 0))
            .with_city(0, CityObservation::new(1, 100, 10, &[(0, 9), (1, 9)]));
        let mut agent = Agent::default();

        let actions = agent.tick(&world_from(&observation));

        assert_eq!(
            actions,
            vec![
                Action::Move {
                    unit: UnitId::new(1),
                    direction: Direction::East,
                },
                Action::BuildWorker {
                    tile: CellCoord::new(0, 9)
                },
                Action::BuildWorker {
                    tile: CellCoord::new(1, 9)
                },
            ]
        );
    }

    #[test]
    fn projects_of_vanished_units_are_released_next_tick() {
        let base = Observation::new(0, 9, 9, 0)
            .with_resource(4, 0, ResourceKind::Wood, 500)
            .with_city(0, CityObservation::new(1, 100, 10, &[(4, 4)]));
        let with_unit = base
            .clone()
            .with_unit(0, UnitObservation::worker(1, 4, 1).with_wood(100));
        let mut agent = Agent::default();

        let _ = agent.tick(&world_from(&with_unit));
        assert_eq!(
            agent.projects().assignment(UnitId::new(1)),
            Some(CellCoord::new(4, 3))
        );

        let _ = agent.tick(&world_from(&base));
        assert!(agent.projects().is_empty());
        assert!(!agent.projects().is_reserved(CellCoord::new(4, 3)));
    }

    #[test]
    fn projects_on_sites_taken_by_the_opponent_are_replanned() {
        let opening = Observation::new(0, 9, 9, 0)
            .with_resource(4, 0, ResourceKind::Wood, 500)
            .with_city(0, CityObservation::new(1, 100, 10, &[(4, 4)]))
            .with_unit(0, UnitObservation::worker(1, 4, 1).with_wood(100));
        let mut agent = Agent::default();

        let _ = agent.tick(&world_from(&opening));
        assert_eq!(
            agent.projects().assignment(UnitId::new(1)),
            Some(CellCoord::new(4, 3))
        );

        let mut taken = opening.with_city(1, CityObservation::new(2, 100, 10, &[(4, 3)]));
        taken.step = 1;
        let _ = agent.tick(&world_from(&taken));

        assert!(!agent.projects().is_reserved(CellCoord::new(4, 3)));
        assert_eq!(
            agent.projects().assignment(UnitId::new(1)),
            Some(CellCoord::new(5, 4))
        );
    }
}
