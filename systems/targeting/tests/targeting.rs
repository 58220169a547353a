use harvest_core::{CellCoord, ReservationTable, ResourceKind};
use harvest_system_targeting::{nearest_city_tile, select_target};
use harvest_world::{query, CityObservation, Observation, World};

fn world_from(observation: Observation) -> World {
    World::from_observation(&observation).expect("valid observation")
}

#[test]
fn unit_targets_the_only_wood_deposit() {
    let world = world_from(
        Observation::new(0, 10, 10, 0).with_resource(5, 0, ResourceKind::Wood, 500),
    );
    let index = query::resource_index(&world);
    let reservations = ReservationTable::new(query::size(&world));

    let target = select_target(
        CellCoord::new(0, 0),
        index.cells(),
        query::player(&world).research(),
        &reservations,
    )
    .expect("wood is always harvestable");

    assert_eq!(target.cell, CellCoord::new(5, 0));
    assert_eq!(target.kind, ResourceKind::Wood);
}

#[test]
fn researched_coal_beats_nearby_wood() {
    let world = world_from(
        Observation::new(0, 8, 8, 0)
            .with_resource(1, 0, ResourceKind::Wood, 500)
            .with_resource(7, 7, ResourceKind::Coal, 500)
            .with_research_points(0, 50),
    );
    let index = query::resource_index(&world);
    let reservations = ReservationTable::new(query::size(&world));

    let target = select_target(
        CellCoord::new(0, 0),
        index.cells(),
        query::player(&world).research(),
        &reservations,
    );

    assert_eq!(target.map(|resource| resource.cell), Some(CellCoord::new(7, 7)));
}

#[test]
fn unresearched_deposits_leave_nothing_to_harvest() {
    let world = world_from(
        Observation::new(0, 8, 8, 0)
            .with_resource(1, 0, ResourceKind::Coal, 500)
            .with_resource(2, 0, ResourceKind::Uranium, 500),
    );
    let index = query::resource_index(&world);
    let reservations = ReservationTable::new(query::size(&world));

    assert_eq!(
        select_target(
            CellCoord::new(0, 0),
            index.cells(),
            query::player(&world).research(),
            &reservations,
        ),
        None
    );
}

#[test]
fn returning_units_find_their_own_cities_only() {
    let world = world_from(
        Observation::new(0, 8, 8, 0)
            .with_city(0, CityObservation::new(1, 0, 0, &[(6, 6)]))
            .with_city(1, CityObservation::new(2, 0, 0, &[(1, 1)])),
    );

    assert_eq!(
        nearest_city_tile(CellCoord::new(0, 0), query::player(&world).cities()),
        Some(CellCoord::new(6, 6))
    );
}
