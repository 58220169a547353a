//! Per-tick index of resource-bearing cells.

use harvest_core::ResourceCell;

use crate::World;

/// Resource deposits of the current tick in row-major order.
///
/// Deposits deplete between ticks, so the index is rebuilt from every new
/// world snapshot rather than patched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceIndex {
    cells: Vec<ResourceCell>,
}

impl ResourceIndex {
    /// Scans every cell of `world`, rows outermost, collecting deposits.
    #[must_use]
    pub fn build(world: &World) -> Self {
        Self {
            cells: world.resources.iter().flatten().copied().collect(),
        }
    }

    /// Deposits in scan order.
    #[must_use]
    pub fn cells(&self) -> &[ResourceCell] {
        &self.cells
    }

    /// Number of deposits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no deposit exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
