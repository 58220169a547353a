#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid adapter that turns host observations into an immutable world snapshot.
//!
//! The host owns the simulation; every tick it hands the agent an
//! [`Observation`]. [`World::from_observation`] validates that document once and
//! lays it out as dense row-major grids so that systems can answer "is there a
//! resource here" and "who owns the city tile here" in constant time through the
//! [`query`] module.

use std::collections::BTreeSet;

use harvest_core::{
    CellCoord, CityId, CitySnapshot, CityTileSnapshot, CityView, GridSize, Research,
    ResourceCell, Team, UnitId, UnitSnapshot, UnitView,
};

mod error;
mod observation;
mod resources;

pub use error::ObservationError;
pub use observation::{
    CargoObservation, CityObservation, CityTileObservation, Observation, PlayerObservation,
    ResourceObservation, UnitObservation,
};
pub use resources::ResourceIndex;

/// Units and city tiles whose cooldown is below this value may act.
const ACTION_COOLDOWN_LIMIT: f32 = 1.0;

/// Everything known about a single player during one tick.
#[derive(Clone, Debug)]
pub struct PlayerState {
    team: Team,
    research: Research,
    units: UnitView,
    cities: CityView,
}

impl PlayerState {
    /// Team of the player.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Research unlocks of the player.
    #[must_use]
    pub const fn research(&self) -> Research {
        self.research
    }

    /// Units owned by the player, in ascending id order.
    #[must_use]
    pub fn units(&self) -> &UnitView {
        &self.units
    }

    /// Cities owned by the player, in ascending id order.
    #[must_use]
    pub fn cities(&self) -> &CityView {
        &self.cities
    }
}

/// Validated snapshot of the grid and both players for a single tick.
#[derive(Clone, Debug)]
pub struct World {
    size: GridSize,
    step: u32,
    player_index: usize,
    resources: Vec<Option<ResourceCell>>,
    city_tiles: Vec<Option<Team>>,
    players: Vec<PlayerState>,
}

impl World {
    /// Validates `observation` and lays it out for constant-time queries.
    pub fn from_observation(observation: &Observation) -> Result<Self, ObservationError> {
        let size = GridSize::new(observation.width, observation.height);
        let cell_count = size.cell_count();
        if cell_count == 0 {
            return Err(ObservationError::EmptyGrid {
                width: observation.width,
                height: observation.height,
            });
        }

        let mut resources = vec![None; cell_count];
        for resource in &observation.resources {
            let cell = CellCoord::new(resource.x, resource.y);
            let slot = size
                .index(cell)
                .and_then(|index| resources.get_mut(index))
                .ok_or(ObservationError::ResourceOutOfBounds {
                    x: resource.x,
                    y: resource.y,
                })?;
            if slot.is_some() {
                return Err(ObservationError::DuplicateResource {
                    x: resource.x,
                    y: resource.y,
                });
            }
            *slot = Some(ResourceCell {
                cell,
                kind: resource.kind,
                amount: resource.amount,
            });
        }

        let mut city_tiles = vec![None; cell_count];
        let mut seen_teams = BTreeSet::new();
        let mut players = Vec::with_capacity(observation.players.len());
        for entry in &observation.players {
            if !seen_teams.insert(entry.team) {
                return Err(ObservationError::DuplicateTeam(entry.team));
            }
            players.push(player_state(entry, size, &mut city_tiles)?);
        }
        players.sort_by_key(|player| player.team);

        let acting = Team::new(observation.player);
        let player_index = players
            .iter()
            .position(|player| player.team == acting)
            .ok_or(ObservationError::UnknownPlayer(observation.player))?;

        Ok(Self {
            size,
            step: observation.step,
            player_index,
            resources,
            city_tiles,
            players,
        })
    }
}

fn player_state(
    entry: &PlayerObservation,
    size: GridSize,
    city_tiles: &mut [Option<Team>],
) -> Result<PlayerState, ObservationError> {
    let team = Team::new(entry.team);
    let by_points = Research::from_points(entry.research_points);
    let research = Research::new(
        entry.researched_coal.unwrap_or(by_points.coal()),
        entry.researched_uranium.unwrap_or(by_points.uranium()),
    );

    let mut unit_ids = BTreeSet::new();
    let mut units = Vec::with_capacity(entry.units.len());
    for unit in &entry.units {
        let cell = CellCoord::new(unit.x, unit.y);
        if !size.contains(cell) {
            return Err(ObservationError::UnitOutOfBounds {
                id: unit.id,
                x: unit.x,
                y: unit.y,
            });
        }
        if !unit_ids.insert(unit.id) {
            return Err(ObservationError::DuplicateUnit(unit.id));
        }
        units.push(UnitSnapshot {
            id: UnitId::new(unit.id),
            kind: unit.kind,
            cell,
            cargo: unit.cargo.total(),
            capacity: unit.effective_capacity(),
            can_act: unit.cooldown < ACTION_COOLDOWN_LIMIT,
        });
    }

    let mut cities = Vec::with_capacity(entry.cities.len());
    for city in &entry.cities {
        let mut tiles = Vec::with_capacity(city.tiles.len());
        for tile in &city.tiles {
            let cell = CellCoord::new(tile.x, tile.y);
            let slot = size
                .index(cell)
                .and_then(|index| city_tiles.get_mut(index))
                .ok_or(ObservationError::CityTileOutOfBounds {
                    city: city.id,
                    x: tile.x,
                    y: tile.y,
                })?;
            if slot.is_some() {
                return Err(ObservationError::OverlappingCityTiles {
                    x: tile.x,
                    y: tile.y,
                });
            }
            *slot = Some(team);
            tiles.push(CityTileSnapshot {
                cell,
                can_act: tile.cooldown < ACTION_COOLDOWN_LIMIT,
            });
        }

        cities.push(CitySnapshot {
            id: CityId::new(city.id),
            team,
            fuel: city.fuel,
            light_upkeep: city.light_upkeep,
            tiles,
        });
    }

    Ok(PlayerState {
        team,
        research,
        units: UnitView::from_snapshots(units),
        cities: CityView::from_snapshots(cities),
    })
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use harvest_core::{CellCoord, GridSize, ResourceCell, Team};

    use super::{PlayerState, ResourceIndex, World};

    /// Dimensions of the grid.
    #[must_use]
    pub fn size(world: &World) -> GridSize {
        world.size
    }

    /// Index of the current simulation step.
    #[must_use]
    pub fn step(world: &World) -> u32 {
        world.step
    }

    /// The player the agent acts for.
    #[must_use]
    pub fn player(world: &World) -> &PlayerState {
        &world.players[world.player_index]
    }

    /// Resource deposit on `cell`, if any.
    #[must_use]
    pub fn resource_at(world: &World, cell: CellCoord) -> Option<ResourceCell> {
        world
            .size
            .index(cell)
            .and_then(|index| world.resources.get(index).copied().flatten())
    }

    /// Whether `cell` holds a resource.
    #[must_use]
    pub fn has_resource(world: &World, cell: CellCoord) -> bool {
        resource_at(world, cell).is_some()
    }

    /// Team owning the city tile on `cell`, if any.
    #[must_use]
    pub fn city_tile_owner(world: &World, cell: CellCoord) -> Option<Team> {
        world
            .size
            .index(cell)
            .and_then(|index| world.city_tiles.get(index).copied().flatten())
    }

    /// Scans the grid for resource deposits in row-major order.
    #[must_use]
    pub fn resource_index(world: &World) -> ResourceIndex {
        ResourceIndex::build(world)
    }
}
