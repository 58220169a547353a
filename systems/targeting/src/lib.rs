#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks the resource deposit a unit should harvest next.
//!
//! Selection is greedy and per unit. Deposits are visited in the order of the
//! resource index and a running best is kept; a deposit replaces the running
//! best when it is closer **or** of a strictly higher tier. Tier can therefore
//! win over distance, and the outcome depends on scan order. Deposits claimed
//! earlier in the tick are skipped, which keeps later units from piling onto
//! the same cell.

use harvest_core::{CellCoord, CityView, ReservationTable, Research, ResourceCell};

/// Chooses the deposit to harvest from `origin`, skipping reserved cells.
///
/// Returns `None` when every harvestable deposit is reserved or none exists.
#[must_use]
pub fn select_target(
    origin: CellCoord,
    resources: &[ResourceCell],
    research: Research,
    reservations: &ReservationTable,
) -> Option<ResourceCell> {
    select_target_with(origin, resources, research, |cell| {
        reservations.is_reserved(cell)
    })
}

/// Same selection rule as [`select_target`] with a caller-supplied claim test.
///
/// Passing `|_| false` finds the deposit a unit standing on `origin` would
/// pick if nothing were reserved.
#[must_use]
pub fn select_target_with<F>(
    origin: CellCoord,
    resources: &[ResourceCell],
    research: Research,
    is_claimed: F,
) -> Option<ResourceCell>
where
    F: Fn(CellCoord) -> bool,
{
    let mut best: Option<Candidate> = None;

    for resource in resources {
        if !research.can_harvest(resource.kind) {
            continue;
        }
        if is_claimed(resource.cell) {
            continue;
        }

        let candidate = Candidate {
            distance: origin.manhattan_distance(resource.cell),
            tier: resource.kind.tier_rank(),
            resource: *resource,
        };

        match best {
            Some(current) if !candidate.replaces(&current) => {}
            _ => best = Some(candidate),
        }
    }

    best.map(|candidate| candidate.resource)
}

/// Owned city tile closest to `origin`; the first one scanned wins ties.
#[must_use]
pub fn nearest_city_tile(origin: CellCoord, cities: &CityView) -> Option<CellCoord> {
    let mut best: Option<(u32, CellCoord)> = None;

    for tile in cities.tiles() {
        let distance = origin.manhattan_distance(tile.cell);
        match best {
            Some((closest, _)) if distance >= closest => {}
            _ => best = Some((distance, tile.cell)),
        }
    }

    best.map(|(_, cell)| cell)
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    distance: u32,
    tier: u8,
    resource: ResourceCell,
}

impl Candidate {
    fn replaces(&self, current: &Self) -> bool {
        self.distance < current.distance || self.tier > current.tier
    }
}
