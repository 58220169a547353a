//! Rejections raised while validating an observation.

use thiserror::Error;

/// Reasons an [`Observation`](crate::Observation) cannot be turned into a world.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ObservationError {
    /// The grid has no cells.
    #[error("grid dimensions {width}x{height} contain no cells")]
    EmptyGrid {
        /// Reported column count.
        width: u32,
        /// Reported row count.
        height: u32,
    },
    /// A resource lies outside the grid.
    #[error("resource at ({x}, {y}) lies outside the grid")]
    ResourceOutOfBounds {
        /// Column of the resource.
        x: u32,
        /// Row of the resource.
        y: u32,
    },
    /// Two resources share a cell.
    #[error("cell ({x}, {y}) holds more than one resource")]
    DuplicateResource {
        /// Column of the cell.
        x: u32,
        /// Row of the cell.
        y: u32,
    },
    /// A unit lies outside the grid.
    #[error("unit u_{id} at ({x}, {y}) lies outside the grid")]
    UnitOutOfBounds {
        /// Identifier of the unit.
        id: u32,
        /// Column of the unit.
        x: u32,
        /// Row of the unit.
        y: u32,
    },
    /// Two units of the same player share an identifier.
    #[error("unit id u_{0} is used more than once")]
    DuplicateUnit(u32),
    /// A city tile lies outside the grid.
    #[error("tile of city c_{city} at ({x}, {y}) lies outside the grid")]
    CityTileOutOfBounds {
        /// Identifier of the city.
        city: u32,
        /// Column of the tile.
        x: u32,
        /// Row of the tile.
        y: u32,
    },
    /// Two city tiles share a cell.
    #[error("cell ({x}, {y}) holds more than one city tile")]
    OverlappingCityTiles {
        /// Column of the cell.
        x: u32,
        /// Row of the cell.
        y: u32,
    },
    /// Two player entries report the same team.
    #[error("team {0} is described more than once")]
    DuplicateTeam(u8),
    /// The acting team has no player entry.
    #[error("acting team {0} is missing from the player list")]
    UnknownPlayer(u8),
}
