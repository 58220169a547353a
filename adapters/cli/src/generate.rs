//! Seeded random observations for experimenting with the agent.

use anyhow::{ensure, Result};
use harvest_core::ResourceKind;
use harvest_world::{CityObservation, Observation, UnitObservation};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const WOOD_CHANCE: f64 = 0.12;
const COAL_CHANCE: f64 = 0.03;
const URANIUM_CHANCE: f64 = 0.01;
const STARTING_FUEL: u32 = 100;
const LIGHT_UPKEEP: u32 = 23;

/// Builds the opening observation of a two-player game on a `width` by
/// `height` grid.
///
/// Each team starts with one single-tile city and one worker standing on it.
/// The same seed always yields the same observation.
pub(crate) fn observation(seed: u64, width: u32, height: u32) -> Result<Observation> {
    let cells = u64::from(width) * u64::from(height);
    ensure!(cells >= 2, "a {width}x{height} grid cannot host two cities");

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let first = rng.gen_range(0..cells);
    let mut second = rng.gen_range(0..cells - 1);
    if second >= first {
        second += 1;
    }
    let homes = [cell_of(first, width), cell_of(second, width)];

    let mut observation = Observation::new(0, width, height, 0);
    for y in 0..height {
        for x in 0..width {
            if homes.contains(&(x, y)) {
                continue;
            }
            let roll: f64 = rng.gen();
            let kind = if roll < URANIUM_CHANCE {
                ResourceKind::Uranium
            } else if roll < URANIUM_CHANCE + COAL_CHANCE {
                ResourceKind::Coal
            } else if roll < URANIUM_CHANCE + COAL_CHANCE + WOOD_CHANCE {
                ResourceKind::Wood
            } else {
                continue;
            };
            let amount = match kind {
                ResourceKind::Wood => rng.gen_range(300..=500),
                ResourceKind::Coal | ResourceKind::Uranium => rng.gen_range(100..=350),
            };
            observation = observation.with_resource(x, y, kind, amount);
        }
    }

    for (team, (x, y)) in (0_u8..).zip(homes) {
        let id = u32::from(team) + 1;
        observation = observation
            .with_city(team, CityObservation::new(id, STARTING_FUEL, LIGHT_UPKEEP, &[(x, y)]))
            .with_unit(team, UnitObservation::worker(id, x, y));
    }

    Ok(observation)
}

fn cell_of(index: u64, width: u32) -> (u32, u32) {
    let width = u64::from(width);
    let x = u32::try_from(index % width).unwrap_or(u32::MAX);
    let y = u32::try_from(index / width).unwrap_or(u32::MAX);
    (x, y)
}
