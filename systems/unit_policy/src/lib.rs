#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-unit state machine that turns targets into actions.
//!
//! Every worker that can act runs through four branches in priority order:
//!
//! 1. **Harvesting**: cargo has room, so head for the preferred deposit.
//! 2. **Expanding**: cargo is full, building is allowed and the unit owns a
//!    project; found the city on arrival, otherwise keep walking.
//! 3. **Claiming**: as above but without a project; plan one and start
//!    walking, or fall through to returning when no site is free.
//! 4. **Returning**: carry the cargo to the nearest owned city tile.
//!
//! Each unit emits at most one action. Units are handled in ascending id order
//! and share one [`ReservationTable`], so earlier units claim cells first. A
//! unit founding a city claims the cell it stands on.

use harvest_core::{Action, CellCoord, ReservationTable, ResourceCell, Team, UnitSnapshot};
use harvest_system_expansion::{plan_build_site, ProjectLedger};
use harvest_system_pathfinding::Pathfinder;
use harvest_system_targeting::{nearest_city_tile, select_target};
use harvest_world::{query, PlayerState, World};
use tracing::{trace, warn};

/// Read-only inputs shared by every unit during one tick.
#[derive(Clone, Copy, Debug)]
pub struct TickInputs<'a> {
    /// Snapshot of the grid and both players.
    pub world: &'a World,
    /// Deposits of the tick in scan order.
    pub resources: &'a [ResourceCell],
    /// Whether founding city tiles is allowed this tick.
    pub build_permitted: bool,
}

/// Branch of the state machine a unit took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Branch {
    /// Walking toward a deposit.
    Harvesting,
    /// Walking toward, or building on, an assigned site.
    Expanding,
    /// Picking a new site.
    Claiming,
    /// Walking back to a city tile.
    Returning,
}

/// Drives the player's workers for one tick.
#[derive(Debug, Default)]
pub struct UnitPolicy {
    pathfinder: Pathfinder,
}

impl UnitPolicy {
    /// Creates the policy with its own pathfinding scratch space.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides an action for every worker of the acting player.
    pub fn handle(
        &mut self,
        inputs: TickInputs<'_>,
        ledger: &mut ProjectLedger,
        reservations: &mut ReservationTable,
        out: &mut Vec<Action>,
    ) {
        let player = query::player(inputs.world);
        for unit in player.units().iter() {
            if !unit.is_worker() || !unit.can_act {
                continue;
            }
            if let Some(action) = self.decide(unit, player, inputs, ledger, reservations) {
                out.push(action);
            }
        }
    }

    fn decide(
        &mut self,
        unit: &UnitSnapshot,
        player: &PlayerState,
        inputs: TickInputs<'_>,
        ledger: &mut ProjectLedger,
        reservations: &mut ReservationTable,
    ) -> Option<Action> {
        let team = Some(player.team());

        if unit.cargo_space_left() > 0 {
            let target = select_target(
                unit.cell,
                inputs.resources,
                player.research(),
                reservations,
            )?;
            return Some(self.walk(
                unit,
                Branch::Harvesting,
                target.cell,
                team,
                inputs,
                reservations,
            ));
        }

        if inputs.build_permitted {
            if let Some(site) = ledger.assignment(unit.id) {
                if unit.cell == site {
                    let _ = ledger.complete(unit.id);
                    reservations.reserve(unit.cell);
                    trace!(unit = %unit.id, site = ?site, "founding city tile");
                    return Some(Action::BuildCity { unit: unit.id });
                }
                return Some(self.walk(unit, Branch::Expanding, site, None, inputs, reservations));
            }

            let planned = plan_build_site(
                player.cities(),
                player.research(),
                inputs.world,
                inputs.resources,
                ledger,
            );
            if let Some(site) = planned {
                match ledger.assign(unit.id, site) {
                    Ok(()) => {
                        return Some(self.walk(
                            unit,
                            Branch::Claiming,
                            site,
                            None,
                            inputs,
                            reservations,
                        ));
                    }
                    Err(error) => warn!(unit = %unit.id, %error, "could not claim build site"),
                }
            }
        }

        let home = nearest_city_tile(unit.cell, player.cities())?;
        Some(self.walk(unit, Branch::Returning, home, team, inputs, reservations))
    }

    fn walk(
        &mut self,
        unit: &UnitSnapshot,
        branch: Branch,
        goal: CellCoord,
        moving_team: Option<Team>,
        inputs: TickInputs<'_>,
        reservations: &mut ReservationTable,
    ) -> Action {
        let direction = self.pathfinder.next_step(
            unit.cell,
            goal,
            moving_team,
            inputs.world,
            reservations,
        );
        trace!(
            unit = %unit.id,
            branch = ?branch,
            goal = ?goal,
            direction = ?direction,
            "unit move planned"
        );
        Action::Move {
            unit: unit.id,
            direction,
        }
    }
}
