#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Production choices for city tiles.
//!
//! A tile that may act trains a worker while the player fields fewer units
//! than it owns city tiles, and researches otherwise. The unit count comes
//! from the tick's snapshot, so workers ordered earlier in the same tick do
//! not count toward the cap.

use harvest_core::{Action, CityView, UnitView};

/// Stateless system deciding what every city tile produces.
#[derive(Debug, Default)]
pub struct CityPolicy;

impl CityPolicy {
    /// Creates the policy.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits one action per city tile that can act, in city then tile order.
    pub fn handle(&self, cities: &CityView, units: &UnitView, out: &mut Vec<Action>) {
        let train = may_train_worker(cities, units);

        for tile in cities.tiles().filter(|tile| tile.can_act) {
            out.push(if train {
                Action::BuildWorker { tile: tile.cell }
            } else {
                Action::Research { tile: tile.cell }
            });
        }
    }
}

/// Whether the player fields fewer units than it owns city tiles.
#[must_use]
pub fn may_train_worker(cities: &CityView, units: &UnitView) -> bool {
    units.len() < cities.tile_count()
}
