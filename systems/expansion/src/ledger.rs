//! Multi-tick bookkeeping of city-building projects.

use std::collections::BTreeMap;

use harvest_core::{CellCoord, GridSize, UnitId, UnitView};
use harvest_world::World;
use thiserror::Error;
use tracing::debug;

use crate::is_open_ground;

/// Reasons a project cannot be registered.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ProjectError {
    /// The unit already works on another site.
    #[error("unit {unit} is already assigned to {site:?}")]
    AlreadyAssigned {
        /// Unit that was asked to take a second project.
        unit: UnitId,
        /// Site of the project it already holds.
        site: CellCoord,
    },
    /// Another unit already works on the site.
    #[error("build site {0:?} is already claimed")]
    SiteTaken(CellCoord),
    /// The site does not lie on the grid.
    #[error("build site {0:?} is outside the grid")]
    OutOfBounds(CellCoord),
}

/// Active build projects: which unit heads for which site.
///
/// The per-unit assignments and the per-cell occupancy grid are only ever
/// mutated together, so a cell is marked exactly when one assignment targets
/// it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectLedger {
    size: GridSize,
    assignments: BTreeMap<UnitId, CellCoord>,
    grid: Vec<bool>,
}

impl ProjectLedger {
    /// Creates an empty ledger covering `size`.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            assignments: BTreeMap::new(),
            grid: vec![false; size.cell_count()],
        }
    }

    /// Dimensions covered by the ledger.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Re-targets the ledger to `size`, dropping every project if it changed.
    pub fn fit(&mut self, size: GridSize) {
        if self.size == size {
            return;
        }
        if !self.assignments.is_empty() {
            debug!(
                dropped = self.assignments.len(),
                "grid size changed, abandoning build projects"
            );
        }
        *self = Self::new(size);
    }

    /// Registers `site` as the project of `unit`.
    pub fn assign(&mut self, unit: UnitId, site: CellCoord) -> Result<(), ProjectError> {
        if let Some(existing) = self.assignments.get(&unit) {
            return Err(ProjectError::AlreadyAssigned {
                unit,
                site: *existing,
            });
        }
        let slot = self
            .size
            .index(site)
            .and_then(|index| self.grid.get_mut(index))
            .ok_or(ProjectError::OutOfBounds(site))?;
        if *slot {
            return Err(ProjectError::SiteTaken(site));
        }

        *slot = true;
        let _ = self.assignments.insert(unit, site);
        debug!(unit = %unit, site = ?site, "build project assigned");
        Ok(())
    }

    /// Site assigned to `unit`, if any.
    #[must_use]
    pub fn assignment(&self, unit: UnitId) -> Option<CellCoord> {
        self.assignments.get(&unit).copied()
    }

    /// Closes the project of `unit` and frees its site.
    pub fn complete(&mut self, unit: UnitId) -> Option<CellCoord> {
        let site = self.remove(unit)?;
        debug!(unit = %unit, site = ?site, "build project completed");
        Some(site)
    }

    /// Drops projects whose unit is no longer present in `units`.
    ///
    /// Returns the number of projects released.
    pub fn release_missing(&mut self, units: &UnitView) -> usize {
        let orphaned: Vec<UnitId> = self
            .assignments
            .keys()
            .copied()
            .filter(|unit| units.get(*unit).is_none())
            .collect();

        for unit in &orphaned {
            if let Some(site) = self.remove(*unit) {
                debug!(unit = %unit, site = ?site, "build project released, unit is gone");
            }
        }

        orphaned.len()
    }

    /// Drops projects whose site has since been covered by a city tile or a
    /// resource, for instance because the opponent built there first.
    ///
    /// Returns the number of projects released.
    pub fn release_blocked(&mut self, world: &World) -> usize {
        let blocked: Vec<UnitId> = self
            .assignments
            .iter()
            .filter(|(_, site)| !is_open_ground(world, **site))
            .map(|(unit, _)| *unit)
            .collect();

        for unit in &blocked {
            if let Some(site) = self.remove(*unit) {
                debug!(unit = %unit, site = ?site, "build project released, site is taken");
            }
        }

        blocked.len()
    }

    /// Whether some project targets `cell`.
    #[must_use]
    pub fn is_reserved(&self, cell: CellCoord) -> bool {
        self.size
            .index(cell)
            .and_then(|index| self.grid.get(index).copied())
            .unwrap_or(false)
    }

    /// Projects in ascending unit order.
    pub fn iter(&self) -> impl Iterator<Item = (UnitId, CellCoord)> + '_ {
        self.assignments.iter().map(|(unit, site)| (*unit, *site))
    }

    /// Number of active projects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether no project is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    fn remove(&mut self, unit: UnitId) -> Option<CellCoord> {
        let site = self.assignments.remove(&unit)?;
        if let Some(slot) = self
            .size
            .index(site)
            .and_then(|index| self.grid.get_mut(index))
        {
            *slot = false;
        }
        Some(site)
    }
}

impl Default for ProjectLedger {
    fn default() -> Self {
        Self::new(GridSize::new(0, 0))
    }
}
