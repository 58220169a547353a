//! Serde description of the per-tick snapshot supplied by the host.

use harvest_core::{ResourceKind, UnitKind};
use serde::{Deserialize, Serialize};

const WORKER_CAPACITY: u32 = 100;
const CART_CAPACITY: u32 = 2000;

/// Complete snapshot of the game handed to the agent once per tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Zero-based index of the current simulation step.
    pub step: u32,
    /// Number of grid columns.
    pub width: u32,
    /// Number of grid rows.
    pub height: u32,
    /// Team the agent is playing for.
    pub player: u8,
    /// Every cell currently holding a resource.
    #[serde(default)]
    pub resources: Vec<ResourceObservation>,
    /// State of every player, including the opponent.
    #[serde(default)]
    pub players: Vec<PlayerObservation>,
}

impl Observation {
    /// Creates an empty two-player observation for the acting `player`.
    #[must_use]
    pub fn new(step: u32, width: u32, height: u32, player: u8) -> Self {
        Self {
            step,
            width,
            height,
            player,
            resources: Vec::new(),
            players: vec![PlayerObservation::new(0), PlayerObservation::new(1)],
        }
    }

    /// Adds a resource deposit.
    #[must_use]
    pub fn with_resource(mut self, x: u32, y: u32, kind: ResourceKind, amount: u32) -> Self {
        self.resources.push(ResourceObservation { x, y, kind, amount });
        self
    }

    /// Adds a unit owned by `team`.
    #[must_use]
    pub fn with_unit(mut self, team: u8, unit: UnitObservation) -> Self {
        self.player_mut(team).units.push(unit);
        self
    }

    /// Adds a city owned by `team`.
    #[must_use]
    pub fn with_city(mut self, team: u8, city: CityObservation) -> Self {
        self.player_mut(team).cities.push(city);
        self
    }

    /// Sets the research points accumulated by `team`.
    #[must_use]
    pub fn with_research_points(mut self, team: u8, points: u32) -> Self {
        self.player_mut(team).research_points = points;
        self
    }

    /// Mutable access to the entry for `team`, creating it when missing.
    pub fn player_mut(&mut self, team: u8) -> &mut PlayerObservation {
        let position = match self.players.iter().position(|player| player.team == team) {
            Some(position) => position,
            None => {
                self.players.push(PlayerObservation::new(team));
                self.players.len() - 1
            }
        };
        &mut self.players[position]
    }
}

/// A resource deposit on a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceObservation {
    /// Column of the deposit.
    pub x: u32,
    /// Row of the deposit.
    pub y: u32,
    /// Resource type.
    pub kind: ResourceKind,
    /// Amount left in the deposit.
    pub amount: u32,
}

/// Per-player portion of the observation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerObservation {
    /// Team number.
    pub team: u8,
    /// Research points accumulated so far.
    #[serde(default)]
    pub research_points: u32,
    /// Explicit coal unlock reported by the host, overriding the point threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub researched_coal: Option<bool>,
    /// Explicit uranium unlock reported by the host, overriding the point threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub researched_uranium: Option<bool>,
    /// Units owned by the player.
    #[serde(default)]
    pub units: Vec<UnitObservation>,
    /// Cities owned by the player.
    #[serde(default)]
    pub cities: Vec<CityObservation>,
}

impl PlayerObservation {
    /// Creates an entry with no research, units or cities.
    #[must_use]
    pub fn new(team: u8) -> Self {
        Self {
            team,
            research_points: 0,
            researched_coal: None,
            researched_uranium: None,
            units: Vec::new(),
            cities: Vec::new(),
        }
    }
}

/// Cargo carried by a unit, split by resource type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CargoObservation {
    /// Wood carried.
    #[serde(default)]
    pub wood: u32,
    /// Coal carried.
    #[serde(default)]
    pub coal: u32,
    /// Uranium carried.
    #[serde(default)]
    pub uranium: u32,
}

impl CargoObservation {
    /// Sum of all carried resources.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.wood
            .saturating_add(self.coal)
            .saturating_add(self.uranium)
    }
}

/// A single unit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitObservation {
    /// Numeric unit identifier.
    pub id: u32,
    /// Kind of unit.
    #[serde(default = "default_unit_kind")]
    pub kind: UnitKind,
    /// Column occupied by the unit.
    pub x: u32,
    /// Row occupied by the unit.
    pub y: u32,
    /// Resources carried.
    #[serde(default)]
    pub cargo: CargoObservation,
    /// Cargo capacity; defaults to the standard capacity of the unit kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    /// Steps left before the unit may act again.
    #[serde(default)]
    pub cooldown: f32,
}

impl UnitObservation {
    /// Creates an idle worker with empty cargo.
    #[must_use]
    pub fn worker(id: u32, x: u32, y: u32) -> Self {
        Self {
            id,
            kind: UnitKind::Worker,
            x,
            y,
            cargo: CargoObservation::default(),
            capacity: None,
            cooldown: 0.0,
        }
    }

    /// Replaces the carried wood.
    #[must_use]
    pub fn with_wood(mut self, wood: u32) -> Self {
        self.cargo.wood = wood;
        self
    }

    /// Cargo capacity, falling back to the standard capacity of the kind.
    #[must_use]
    pub fn effective_capacity(&self) -> u32 {
        self.capacity.unwrap_or(match self.kind {
            UnitKind::Worker => WORKER_CAPACITY,
            UnitKind::Cart => CART_CAPACITY,
        })
    }
}

fn default_unit_kind() -> UnitKind {
    UnitKind::Worker
}

/// A city and its tiles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CityObservation {
    /// Numeric city identifier.
    pub id: u32,
    /// Fuel banked by the city.
    #[serde(default)]
    pub fuel: u32,
    /// Fuel consumed per night step.
    #[serde(default)]
    pub light_upkeep: u32,
    /// Tiles composing the city.
    pub tiles: Vec<CityTileObservation>,
}

impl CityObservation {
    /// Creates a city whose tiles sit at `cells` and may all act.
    #[must_use]
    pub fn new(id: u32, fuel: u32, light_upkeep: u32, cells: &[(u32, u32)]) -> Self {
        Self {
            id,
            fuel,
            light_upkeep,
            tiles: cells
                .iter()
                .map(|&(x, y)| CityTileObservation {
                    x,
                    y,
                    cooldown: 0.0,
                })
                .collect(),
        }
    }
}

/// A single city tile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CityTileObservation {
    /// Column covered by the tile.
    pub x: u32,
    /// Row covered by the tile.
    pub y: u32,
    /// Steps left before the tile may act again.
    #[serde(default)]
    pub cooldown: f32,
}
