#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the harvest agent.
//!
//! This crate defines the vocabulary that connects the grid adapter, the pure
//! decision systems, and the command-line adapter. The world crate turns a host
//! observation into immutable views built from the snapshot types declared
//! here, systems read those views and respond exclusively with [`Action`]
//! values, and the per-tick [`ReservationTable`] carries movement claims from
//! one unit's decision to the next.

use std::fmt;

use serde::{Deserialize, Serialize};

mod cycle;
mod reservation;

pub use cycle::DayNightCycle;
pub use reservation::ReservationTable;

/// Research points a player needs before coal becomes harvestable.
pub const COAL_RESEARCH_POINTS: u32 = 50;

/// Research points a player needs before uranium becomes harvestable.
pub const URANIUM_RESEARCH_POINTS: u32 = 200;

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Columns grow toward the east and rows grow toward the south.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Moves the cell one step in `direction`, staying inside `size`.
    ///
    /// [`Direction::Center`] returns the cell unchanged. `None` is returned when
    /// the step would leave the grid.
    #[must_use]
    pub fn translate(self, direction: Direction, size: GridSize) -> Option<CellCoord> {
        let moved = match direction {
            Direction::Center => self,
            Direction::North => CellCoord::new(self.column, self.row.checked_sub(1)?),
            Direction::East => CellCoord::new(self.column.checked_add(1)?, self.row),
            Direction::South => CellCoord::new(self.column, self.row.checked_add(1)?),
            Direction::West => CellCoord::new(self.column.checked_sub(1)?, self.row),
        };

        size.contains(moved).then_some(moved)
    }

    /// Direction that leads from this cell onto `to`.
    ///
    /// Returns [`Direction::Center`] for the same cell and `None` when the
    /// cells are not orthogonally adjacent.
    #[must_use]
    pub fn direction_to(self, to: CellCoord) -> Option<Direction> {
        let column_diff = self.column().abs_diff(to.column());
        let row_diff = self.row().abs_diff(to.row());

        match column_diff + row_diff {
            0 => Some(Direction::Center),
            1 if column_diff == 1 => {
                if to.column() > self.column() {
                    Some(Direction::East)
                } else {
                    Some(Direction::West)
                }
            }
            1 => {
                if to.row() > self.row() {
                    Some(Direction::South)
                } else {
                    Some(Direction::North)
                }
            }
            _ => None,
        }
    }
}

/// Dimensions of the playing grid measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    width: u32,
    height: u32,
}

impl GridSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.width) * u64::from(self.height);
        usize::try_from(count).unwrap_or(0)
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Row-major offset of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }


    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let width = self.width;
        (0..self.height)
            .flat_map(move |row| (0..width).map(move |column| CellCoord::new(column, row)))
    }
}

/// Movement directions available to units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
    /// Remaining on the current cell.
    Center,
}

impl Direction {
    /// Fixed expansion order used wherever neighbours are enumerated.
    pub const COMPASS: [Direction; 4] = [
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
    ];

    /// Single-letter code understood by the host.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::North => 'n',
            Self::East => 'e',
            Self::South => 's',
            Self::West => 'w',
            Self::Center => 'c',
        }
    }
}

/// Harvestable resource types ordered by tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Low tier, always harvestable.
    Wood,
    /// Mid tier, gated behind coal research.
    Coal,
    /// High tier, gated behind uranium research.
    Uranium,
}

impl ResourceKind {
    /// Strict tier rank: wood < coal < uranium.
    #[must_use]
    pub const fn tier_rank(self) -> u8 {
        match self {
            Self::Wood => 0,
            Self::Coal => 1,
            Self::Uranium => 2,
        }
    }
}

/// Research unlock state of a single player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Research {
    coal: bool,
    uranium: bool,
}

impl Research {
    /// Creates research flags from explicit unlock values.
    #[must_use]
    pub const fn new(coal: bool, uranium: bool) -> Self {
        Self { coal, uranium }
    }

    /// Derives the unlock flags from accumulated research points.
    #[must_use]
    pub const fn from_points(points: u32) -> Self {
        Self {
            coal: points >= COAL_RESEARCH_POINTS,
            uranium: points >= URANIUM_RESEARCH_POINTS,
        }
    }

    /// Whether coal has been researched.
    #[must_use]
    pub const fn coal(&self) -> bool {
        self.coal
    }

    /// Whether uranium has been researched.
    #[must_use]
    pub const fn uranium(&self) -> bool {
        self.uranium
    }

    /// Reports whether resources of `kind` may be harvested.
    #[must_use]
    pub const fn can_harvest(&self, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::Wood => true,
            ResourceKind::Coal => self.coal,
            ResourceKind::Uranium => self.uranium,
        }
    }
}

/// A grid cell that currently holds a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceCell {
    /// Cell holding the resource.
    pub cell: CellCoord,
    /// Type of resource on the cell.
    pub kind: ResourceKind,
    /// Amount left to harvest.
    pub amount: u32,
}

/// Player team as numbered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Team(u8);

impl Team {
    /// Creates a team identifier.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric team value.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Unique identifier assigned to a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u_{}", self.0)
    }
}

/// Unique identifier assigned to a city.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CityId(u32);

impl CityId {
    /// Creates a new city identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Kinds of mobile units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// Harvests resources and founds cities.
    Worker,
    /// Hauls cargo; not driven by the decision engine.
    Cart,
}

/// Immutable representation of a single unit's state for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitSnapshot {
    /// Unique identifier assigned to the unit.
    pub id: UnitId,
    /// Kind of unit.
    pub kind: UnitKind,
    /// Grid cell currently occupied by the unit.
    pub cell: CellCoord,
    /// Total resources carried.
    pub cargo: u32,
    /// Maximum resources the unit may carry.
    pub capacity: u32,
    /// Indicates whether the unit may act this tick.
    pub can_act: bool,
}

impl UnitSnapshot {
    /// Remaining cargo space.
    #[must_use]
    pub const fn cargo_space_left(&self) -> u32 {
        self.capacity.saturating_sub(self.cargo)
    }

    /// Whether the unit is a worker.
    #[must_use]
    pub const fn is_worker(&self) -> bool {
        matches!(self.kind, UnitKind::Worker)
    }
}

/// Read-only snapshot describing all units of one player.
#[derive(Clone, Debug, Default)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured unit snapshots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Number of units captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the view holds no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Looks up a unit by identifier.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&UnitSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }
}

/// A single tile of a city.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CityTileSnapshot {
    /// Cell covered by the tile.
    pub cell: CellCoord,
    /// Indicates whether the tile may act this tick.
    pub can_act: bool,
}

/// Immutable representation of a city for one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CitySnapshot {
    /// Identifier assigned to the city by the host.
    pub id: CityId,
    /// Team owning the city.
    pub team: Team,
    /// Fuel banked by the city.
    pub fuel: u32,
    /// Fuel the city burns each night step.
    pub light_upkeep: u32,
    /// Tiles composing the city.
    pub tiles: Vec<CityTileSnapshot>,
}

impl CitySnapshot {
    /// Whether the banked fuel covers the light upkeep.
    #[must_use]
    pub const fn covers_upkeep(&self) -> bool {
        self.fuel >= self.light_upkeep
    }
}

/// Read-only snapshot describing all cities of one player.
#[derive(Clone, Debug, Default)]
pub struct CityView {
    snapshots: Vec<CitySnapshot>,
}

impl CityView {
    /// Creates a new city view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CitySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured cities in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &CitySnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over every tile of every city.
    pub fn tiles(&self) -> impl Iterator<Item = &CityTileSnapshot> {
        self.snapshots.iter().flat_map(|city| city.tiles.iter())
    }

    /// Total number of tiles owned across all cities.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.snapshots.iter().map(|city| city.tiles.len()).sum()
    }

    /// Whether the view holds no cities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Actions returned to the host at the end of a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Moves a unit one cell.
    Move {
        /// Unit being moved.
        unit: UnitId,
        /// Direction of travel.
        direction: Direction,
    },
    /// Founds a city tile on the unit's current cell.
    BuildCity {
        /// Unit spending its cargo on the city.
        unit: UnitId,
    },
    /// Trains a worker on the city tile at `tile`.
    BuildWorker {
        /// City tile performing the action.
        tile: CellCoord,
    },
    /// Spends the city tile's turn on research.
    Research {
        /// City tile performing the action.
        tile: CellCoord,
    },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move { unit, direction } => write!(f, "m {unit} {}", direction.code()),
            Self::BuildCity { unit } => write!(f, "bcity {unit}"),
            Self::BuildWorker { tile } => write!(f, "bw {} {}", tile.column(), tile.row()),
            Self::Research { tile } => write!(f, "r {} {}", tile.column(), tile.row()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, CellCoord, Direction, GridSize, Research, ResourceKind, UnitId};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn translate_stays_inside_grid() {
        let size = GridSize::new(3, 3);
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.translate(Direction::North, size), None);
        assert_eq!(corner.translate(Direction::West, size), None);
        assert_eq!(
            corner.translate(Direction::East, size),
            Some(CellCoord::new(1, 0))
        );
        assert_eq!(
            corner.translate(Direction::South, size),
            Some(CellCoord::new(0, 1))
        );
        assert_eq!(corner.translate(Direction::Center, size), Some(corner));
        assert_eq!(CellCoord::new(2, 2).translate(Direction::East, size), None);
    }

    #[test]
    fn direction_to_neighbours() {
        let origin = CellCoord::new(3, 3);
        assert_eq!(
            origin.direction_to(CellCoord::new(3, 2)),
            Some(Direction::North)
        );
        assert_eq!(
            origin.direction_to(CellCoord::new(4, 3)),
            Some(Direction::East)
        );
        assert_eq!(
            origin.direction_to(CellCoord::new(3, 4)),
            Some(Direction::South)
        );
        assert_eq!(
            origin.direction_to(CellCoord::new(2, 3)),
            Some(Direction::West)
        );
        assert_eq!(origin.direction_to(origin), Some(Direction::Center));
        assert_eq!(origin.direction_to(CellCoord::new(4, 4)), None);
    }

    #[test]
    fn grid_index_follows_row_major_order() {
        let size = GridSize::new(4, 3);
        for (offset, cell) in size.cells().enumerate() {
            assert_eq!(size.index(cell), Some(offset));
        }
        assert_eq!(size.index(CellCoord::new(4, 0)), None);
    }

    #[test]
    fn research_thresholds_gate_tiers() {
        let fresh = Research::from_points(0);
        assert!(fresh.can_harvest(ResourceKind::Wood));
        assert!(!fresh.can_harvest(ResourceKind::Coal));
        assert!(!fresh.can_harvest(ResourceKind::Uranium));

        let coal = Research::from_points(50);
        assert!(coal.can_harvest(ResourceKind::Coal));
        assert!(!coal.can_harvest(ResourceKind::Uranium));

        let all = Research::from_points(200);
        assert!(all.can_harvest(ResourceKind::Uranium));
    }

    #[test]
    fn actions_render_host_commands() {
        let unit = UnitId::new(7);
        let tile = CellCoord::new(2, 5);
        assert_eq!(
            Action::Move {
                unit,
                direction: Direction::West
            }
            .to_string(),
            "m u_7 w"
        );
        assert_eq!(Action::BuildCity { unit }.to_string(), "bcity u_7");
        assert_eq!(Action::BuildWorker { tile }.to_string(), "bw 2 5");
        assert_eq!(Action::Research { tile }.to_string(), "r 2 5");
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn move_action_round_trips_through_bincode() {
        assert_round_trip(&Action::Move {
            unit: UnitId::new(3),
            direction: Direction::South,
        });
    }

    #[test]
    fn actions_serialise_externally_tagged() {
        let json = serde_json::to_string(&Action::BuildCity {
            unit: UnitId::new(4),
        })
        .expect("serialize");
        assert_eq!(json, r#"{"build_city":{"unit":4}}"#);
    }
}
