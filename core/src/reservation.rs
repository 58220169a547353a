//! Tick-scoped movement claims.

use crate::{CellCoord, GridSize};

/// Dense grid of cells already claimed as a movement destination this tick.
///
/// A table is created empty at the start of a tick and discarded at its end.
/// Claims are only ever added, so a reserved cell stays reserved until the
/// table is dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReservationTable {
    size: GridSize,
    cells: Vec<bool>,
}

impl ReservationTable {
    /// Creates an empty table covering `size`.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![false; size.cell_count()],
        }
    }

    /// Dimensions covered by the table.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Claims `cell`. Cells outside the grid are ignored.
    pub fn reserve(&mut self, cell: CellCoord) {
        if let Some(slot) = self
            .size
            .index(cell)
            .and_then(|index| self.cells.get_mut(index))
        {
            *slot = true;
        }
    }

    /// Whether `cell` has been claimed this tick.
    #[must_use]
    pub fn is_reserved(&self, cell: CellCoord) -> bool {
        self.size
            .index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Number of claimed cells.
    #[must_use]
    pub fn reserved_count(&self) -> usize {
        self.cells.iter().filter(|reserved| **reserved).count()
    }
}
