#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Collision-aware single-step planner built on a grid A* search.
//!
//! Each call searches from a unit's cell toward its goal, converts the first
//! hop of the discovered route into a [`Direction`], and claims the cell the
//! unit will occupy after the move in the tick's [`ReservationTable`]. Cells
//! claimed by units planned earlier in the tick are obstacles for later
//! searches, which is what keeps two units from being routed into one cell.
//!
//! The search deliberately departs from textbook A* in two places:
//!
//! * `g` is the Manhattan distance from the start to the node, not the length
//!   of the path walked to reach it.
//! * The first hop is recovered by following the parent recorded when each
//!   node entered the open set. A node whose open entry is later replaced by a
//!   cheaper one keeps following whichever parent the winning entry carried, so
//!   the recovered hop need not lie on the route the `f` values describe.
//!
//! Open-set ties are broken by lower `g`, then by the order in which a cell
//! first entered the open set. Neighbours are expanded in
//! [`Direction::COMPASS`] order, so results are fully deterministic.

use std::{cmp::Ordering, collections::BinaryHeap};

use harvest_core::{CellCoord, Direction, GridSize, ReservationTable, Team};
use harvest_world::{query, World};
use tracing::trace;

/// A* planner that reuses its scratch buffers between searches.
#[derive(Debug, Default)]
pub struct Pathfinder {
    prepared: Option<GridSize>,
    passable: Vec<bool>,
    open: Vec<Option<SearchNode>>,
    closed: Vec<Option<SearchNode>>,
    frontier: BinaryHeap<OpenEntry>,
    next_sequence: u64,
}

impl Pathfinder {
    /// Creates a planner with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plans one step from `start` toward `goal` and claims its destination.
    ///
    /// A city tile is traversable only when it belongs to `moving_team`;
    /// passing `None` treats every city tile as an obstacle regardless of its
    /// owner, which is how units travel to a future build site. No cell
    /// reserved this tick is traversable, city tile or not.
    ///
    /// When the goal cannot be reached, or the route cannot be traced back to
    /// the start, the unit stays in place and `start` itself is reserved.
    pub fn next_step(
        &mut self,
        start: CellCoord,
        goal: CellCoord,
        moving_team: Option<Team>,
        world: &World,
        reservations: &mut ReservationTable,
    ) -> Direction {
        let size = query::size(world);

        let direction = if self.search(start, goal, moving_team, world, reservations) {
            self.first_step(start, goal, size)
                .and_then(|step| start.direction_to(step))
                .unwrap_or(Direction::Center)
        } else {
            trace!(
                start = ?start,
                goal = ?goal,
                "goal unreachable, holding position"
            );
            Direction::Center
        };

        let destination = start.translate(direction, size).unwrap_or(start);
        reservations.reserve(destination);
        direction
    }

    fn prepare(&mut self, size: GridSize) {
        let cell_count = size.cell_count();
        if self.prepared != Some(size) {
            self.passable = vec![false; cell_count];
            self.open = vec![None; cell_count];
            self.closed = vec![None; cell_count];
            self.prepared = Some(size);
        } else {
            self.open.fill(None);
            self.closed.fill(None);
        }
        self.frontier.clear();
        self.next_sequence = 0;
    }

    fn search(
        &mut self,
        start: CellCoord,
        goal: CellCoord,
        moving_team: Option<Team>,
        world: &World,
        reservations: &ReservationTable,
    ) -> bool {
        let size = query::size(world);
        let (Some(start_index), Some(_)) = (size.index(start), size.index(goal)) else {
            return false;
        };

        self.prepare(size);
        for (slot, cell) in self.passable.iter_mut().zip(size.cells()) {
            let own_ground = match query::city_tile_owner(world, cell) {
                Some(owner) => moving_team == Some(owner),
                None => true,
            };
            *slot = own_ground && !reservations.is_reserved(cell);
        }

        let h = start.manhattan_distance(goal);
        let sequence = self.allocate_sequence();
        self.push_open(
            start_index,
            SearchNode {
                cell: start,
                g: 0,
                h,
                parent: None,
                sequence,
            },
        );

        while let Some(entry) = self.frontier.pop() {
            let Some(node) = self.open[entry.index] else {
                continue;
            };
            if node.f() != entry.f || node.g != entry.g {
                continue;
            }

            self.open[entry.index] = None;
            self.closed[entry.index] = Some(node);

            if node.cell == goal {
                return true;
            }

            for direction in Direction::COMPASS {
                let Some(neighbor) = node.cell.translate(direction, size) else {
                    continue;
                };
                let Some(index) = size.index(neighbor) else {
                    continue;
                };
                if self.closed[index].is_some() || !self.passable[index] {
                    continue;
                }

                let candidate = SearchNode {
                    cell: neighbor,
                    g: start.manhattan_distance(neighbor),
                    h: neighbor.manhattan_distance(goal),
                    parent: Some(node.cell),
                    sequence: 0,
                };

                let queued = self.open[index];
                let sequence = match queued {
                    Some(existing) if existing.f() <= candidate.f() => continue,
                    Some(existing) => existing.sequence,
                    None => self.allocate_sequence(),
                };

                self.push_open(
                    index,
                    SearchNode {
                        sequence,
                        ..candidate
                    },
                );
            }
        }

        false
    }

    fn allocate_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    fn push_open(&mut self, index: usize, node: SearchNode) {
        self.open[index] = Some(node);
        self.frontier.push(OpenEntry {
            f: node.f(),
            g: node.g,
            sequence: node.sequence,
            index,
        });
    }

    /// Walks parent links back from `goal` to the start's direct child.
    fn first_step(&self, start: CellCoord, goal: CellCoord, size: GridSize) -> Option<CellCoord> {
        let closed = |cell: CellCoord| size.index(cell).and_then(|index| self.closed[index]);

        let mut current = goal;
        let mut parent = closed(goal)?.parent?;
        let mut remaining = size.cell_count();

        while parent != start {
            remaining = remaining.checked_sub(1)?;
            current = parent;
            parent = closed(parent)?.parent?;
        }

        Some(current)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SearchNode {
    cell: CellCoord,
    g: u32,
    h: u32,
    parent: Option<CellCoord>,
    sequence: u64,
}

impl SearchNode {
    fn f(&self) -> u32 {
        self.g + self.h
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OpenEntry {
    f: u32,
    g: u32,
    sequence: u64,
    index: usize,
}

impl OpenEntry {
    fn key(&self) -> (u32, u32, u64, usize) {
        (self.f, self.g, self.sequence, self.index)
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap yields the smallest key first.
        other.key().cmp(&self.key())
    }
}
