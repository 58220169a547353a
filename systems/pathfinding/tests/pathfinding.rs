use harvest_core::{CellCoord, Direction, ReservationTable, ResourceKind, Team};
use harvest_system_pathfinding::Pathfinder;
use harvest_world::{query, CityObservation, Observation, World};

const OWN: Team = Team::new(0);

fn world_from(observation: Observation) -> World {
    World::from_observation(&observation).expect("valid observation")
}

fn fresh_table(world: &World) -> ReservationTable {
    ReservationTable::new(query::size(world))
}

#[test]
fn open_grid_steps_reduce_distance_by_one() {
    let world = world_from(Observation::new(0, 7, 6, 0));
    let size = query::size(&world);
    let mut pathfinder = Pathfinder::new();

    for start in size.cells() {
        for goal in size.cells() {
            if start == goal {
                continue;
            }
            let mut reservations = fresh_table(&world);
            let direction =
                pathfinder.next_step(start, goal, Some(OWN), &world, &mut reservations);
            let next = start
                .translate(direction, size)
                .expect("step stays on the grid");

            assert_eq!(
                next.manhattan_distance(goal) + 1,
                start.manhattan_distance(goal),
                "step from {start:?} toward {goal:?} went {direction:?}"
            );
            assert!(reservations.is_reserved(next));
            assert_eq!(reservations.reserved_count(), 1);
        }
    }
}

#[test]
fn single_unit_heads_east_and_claims_next_cell() {
    let world = world_from(
        Observation::new(0, 10, 10, 0).with_resource(5, 0, ResourceKind::Wood, 500),
    );
    let mut reservations = fresh_table(&world);
    let mut pathfinder = Pathfinder::new();

    let direction = pathfinder.next_step(
        CellCoord::new(0, 0),
        CellCoord::new(5, 0),
        Some(OWN),
        &world,
        &mut reservations,
    );

    assert_eq!(direction, Direction::East);
    assert!(reservations.is_reserved(CellCoord::new(1, 0)));
    assert_eq!(reservations.reserved_count(), 1);
}

#[test]
fn second_unit_detours_around_first_claim() {
    let world = world_from(
        Observation::new(0, 10, 10, 0).with_resource(3, 0, ResourceKind::Wood, 500),
    );
    let mut reservations = fresh_table(&world);
    let mut pathfinder = Pathfinder::new();
    let goal = CellCoord::new(3, 0);

    let first = pathfinder.next_step(
        CellCoord::new(0, 0),
        goal,
        Some(OWN),
        &world,
        &mut reservations,
    );
    assert_eq!(first, Direction::East);

    let second_start = CellCoord::new(0, 1);
    let second = pathfinder.next_step(second_start, goal, Some(OWN), &world, &mut reservations);
    let second_destination = second_start
        .translate(second, query::size(&world))
        .expect("step stays on the grid");

    assert_ne!(second_destination, CellCoord::new(1, 0));
    assert_eq!(second, Direction::East);
    assert!(reservations.is_reserved(CellCoord::new(1, 1)));
    assert_eq!(reservations.reserved_count(), 2);
}

#[test]
fn enemy_city_tiles_block_and_own_tiles_do_not() {
    // Column 1 is walled off by an enemy city except for row 2, which holds
    // one of our own tiles.
    let world = world_from(
        Observation::new(0, 3, 3, 0)
            .with_city(1, CityObservation::new(1, 0, 0, &[(1, 0), (1, 1)]))
            .with_city(0, CityObservation::new(2, 0, 0, &[(1, 2)])),
    );
    let mut reservations = fresh_table(&world);
    let mut pathfinder = Pathfinder::new();

    let direction = pathfinder.next_step(
        CellCoord::new(0, 0),
        CellCoord::new(2, 0),
        Some(OWN),
        &world,
        &mut reservations,
    );

    assert_eq!(direction, Direction::South);
}

#[test]
fn build_site_travel_treats_every_city_tile_as_an_obstacle() {
    let world = world_from(
        Observation::new(0, 3, 1, 0).with_city(0, CityObservation::new(1, 0, 0, &[(1, 0)])),
    );
    let mut pathfinder = Pathfinder::new();

    let mut own_team = fresh_table(&world);
    let through_own_city = pathfinder.next_step(
        CellCoord::new(0, 0),
        CellCoord::new(2, 0),
        Some(OWN),
        &world,
        &mut own_team,
    );
    assert_eq!(through_own_city, Direction::East);

    let mut no_team = fresh_table(&world);
    let blocked = pathfinder.next_step(
        CellCoord::new(0, 0),
        CellCoord::new(2, 0),
        None,
        &world,
        &mut no_team,
    );
    assert_eq!(blocked, Direction::Center);
    assert!(no_team.is_reserved(CellCoord::new(0, 0)));
}

#[test]
fn unreachable_goal_holds_position_and_claims_start() {
    let world = world_from(Observation::new(0, 3, 1, 0));
    let mut reservations = fresh_table(&world);
    reservations.reserve(CellCoord::new(1, 0));
    let mut pathfinder = Pathfinder::new();

    let direction = pathfinder.next_step(
        CellCoord::new(0, 0),
        CellCoord::new(2, 0),
        Some(OWN),
        &world,
        &mut reservations,
    );

    assert_eq!(direction, Direction::Center);
    assert!(reservations.is_reserved(CellCoord::new(0, 0)));
    assert!(reservations.is_reserved(CellCoord::new(1, 0)));
}

#[test]
fn reserved_goal_is_unreachable() {
    let world = world_from(Observation::new(0, 4, 1, 0));
    let mut reservations = fresh_table(&world);
    reservations.reserve(CellCoord::new(3, 0));
    let mut pathfinder = Pathfinder::new();

    let direction = pathfinder.next_step(
        CellCoord::new(0, 0),
        CellCoord::new(3, 0),
        Some(OWN),
        &world,
        &mut reservations,
    );

    assert_eq!(direction, Direction::Center);
}

#[test]
fn standing_on_goal_stays_in_place() {
    let world = world_from(Observation::new(0, 3, 3, 0));
    let mut reservations = fresh_table(&world);
    let mut pathfinder = Pathfinder::new();
    let cell = CellCoord::new(1, 1);

    let direction = pathfinder.next_step(cell, cell, Some(OWN), &world, &mut reservations);

    assert_eq!(direction, Direction::Center);
    assert!(reservations.is_reserved(cell));
}

#[test]
fn units_never_share_a_destination() {
    let world = world_from(
        Observation::new(0, 8, 8, 0).with_resource(4, 4, ResourceKind::Wood, 500),
    );
    let size = query::size(&world);
    let mut reservations = fresh_table(&world);
    let mut pathfinder = Pathfinder::new();
    let starts = [
        CellCoord::new(3, 3),
        CellCoord::new(4, 3),
        CellCoord::new(5, 3),
        CellCoord::new(3, 4),
        CellCoord::new(5, 5),
        CellCoord::new(0, 0),
    ];

    let mut destinations = Vec::new();
    for start in starts {
        let direction = pathfinder.next_step(
            start,
            CellCoord::new(4, 4),
            Some(OWN),
            &world,
            &mut reservations,
        );
        let destination = start.translate(direction, size).expect("on grid");
        assert!(
            !destinations.contains(&destination),
            "{destination:?} claimed twice"
        );
        destinations.push(destination);
    }

    assert_eq!(reservations.reserved_count(), starts.len());
}

#[test]
fn reserved_own_city_tile_blocks() {
    let world = world_from(
        Observation::new(0, 3, 1, 0).with_city(0, CityObservation::new(1, 0, 0, &[(1, 0)])),
    );
    let mut reservations = fresh_table(&world);
    reservations.reserve(CellCoord::new(1, 0));
    let mut pathfinder = Pathfinder::new();

    let direction = pathfinder.next_step(
        CellCoord::new(0, 0),
        CellCoord::new(2, 0),
        Some(OWN),
        &world,
        &mut reservations,
    );

    assert_eq!(direction, Direction::Center);
    assert!(reservations.is_reserved(CellCoord::new(0, 0)));
}
