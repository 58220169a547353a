#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Expansion planning: where the next city tile goes and whether it may be
//! built now.
//!
//! Sites are picked next to the player's smallest city and scored by how close
//! they lie to the deposit a worker standing there would harvest. Chosen sites
//! are tracked across ticks in a [`ProjectLedger`] so that no two workers head
//! for the same cell.

use harvest_core::{
    CellCoord, CitySnapshot, CityView, DayNightCycle, Direction, Research, ResourceCell,
};
use harvest_system_targeting::select_target_with;
use harvest_world::{query, World};
use tracing::trace;

mod ledger;

pub use ledger::{ProjectError, ProjectLedger};

/// Steps of daylight that must remain before a new city tile may be founded.
pub const DEFAULT_SAFETY_MARGIN: u32 = 5;

/// Picks the build site for the next city tile.
///
/// Only cells orthogonally adjacent to the city with the fewest tiles are
/// considered, and only when they hold no resource, no city tile and no active
/// project. Among those, the cell closest to its preferred deposit wins; the
/// first one enumerated wins ties. Reservations of the current tick are
/// ignored when scoring.
///
/// Returns `None` when the player has no city, the city is boxed in, or no
/// harvestable deposit exists to anchor the score.
#[must_use]
pub fn plan_build_site(
    cities: &CityView,
    research: Research,
    world: &World,
    resources: &[ResourceCell],
    ledger: &ProjectLedger,
) -> Option<CellCoord> {
    let city = smallest_city(cities)?;

    let mut best: Option<(u32, CellCoord)> = None;
    for site in free_neighbours(city, world, ledger) {
        let Some(anchor) = select_target_with(site, resources, research, |_| false) else {
            continue;
        };
        let distance = site.manhattan_distance(anchor.cell);
        match best {
            Some((closest, _)) if distance >= closest => {}
            _ => best = Some((distance, site)),
        }
    }

    best.map(|(_, site)| site)
}

fn smallest_city(cities: &CityView) -> Option<&CitySnapshot> {
    let mut smallest: Option<&CitySnapshot> = None;
    for city in cities.iter() {
        match smallest {
            Some(current) if city.tiles.len() >= current.tiles.len() => {}
            _ => smallest = Some(city),
        }
    }
    smallest
}

/// Free cells around `city`, deduplicated, in tile then compass order.
fn free_neighbours(city: &CitySnapshot, world: &World, ledger: &ProjectLedger) -> Vec<CellCoord> {
    let size = query::size(world);
    let mut free = Vec::new();

    for tile in &city.tiles {
        let mut free_here = 0_usize;
        for direction in Direction::COMPASS {
            let Some(cell) = tile.cell.translate(direction, size) else {
                continue;
            };
            if !is_open_ground(world, cell) || ledger.is_reserved(cell) {
                continue;
            }
            free_here += 1;
            if !free.contains(&cell) {
                free.push(cell);
            }
        }
        trace!(
            city = city.id.get(),
            tile = ?tile.cell,
            free = free_here,
            "free space around city tile"
        );
    }

    free
}

/// Whether `cell` holds neither a resource nor a city tile.
pub(crate) fn is_open_ground(world: &World, cell: CellCoord) -> bool {
    !query::has_resource(world, cell) && query::city_tile_owner(world, cell).is_none()
}

/// Decides whether founding a new city tile is safe this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildGate {
    cycle: DayNightCycle,
    safety_margin: u32,
}

impl BuildGate {
    /// Creates a gate for `cycle` requiring `safety_margin` daylight steps.
    #[must_use]
    pub const fn new(cycle: DayNightCycle, safety_margin: u32) -> Self {
        Self {
            cycle,
            safety_margin,
        }
    }

    /// Schedule the gate checks against.
    #[must_use]
    pub const fn cycle(&self) -> DayNightCycle {
        self.cycle
    }

    /// Daylight steps that must remain.
    #[must_use]
    pub const fn safety_margin(&self) -> u32 {
        self.safety_margin
    }

    /// Building is permitted when every city can light itself through the
    /// coming night and more than the safety margin of daylight remains.
    #[must_use]
    pub fn permits(&self, cities: &CityView, step: u32) -> bool {
        cities.iter().all(CitySnapshot::covers_upkeep)
            && self.cycle.steps_until_night(step) > i64::from(self.safety_margin)
    }
}

impl Default for BuildGate {
    fn default() -> Self {
        Self::new(DayNightCycle::STANDARD, DEFAULT_SAFETY_MARGIN)
    }
}
