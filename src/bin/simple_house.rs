//! One-room house under a synthetic summer day, hourly CSV on stdout.
//!
//! Pass two CSV paths (`date,temperature` and `date,radiation` with hourly
//! rows) to run against recorded weather instead.

use envgraph::{House, Room, Simulator, Wall, WallSurface, Weather};
use tracing_subscriber::EnvFilter;

fn build_house() -> House {
    let mut house = House::default();
    house.walls.push(Wall {
        name: "south".to_string(),
        lambda: 0.2,
        depth: 0.15,
        area: 12.0,
        azimuth_deg: 0.0,
        ..Wall::default()
    });
    house.walls.push(Wall {
        name: "north".to_string(),
        lambda: 0.2,
        depth: 0.15,
        area: 12.0,
        azimuth_deg: 180.0,
        ..Wall::default()
    });
    house.walls.push(Wall {
        name: "roof".to_string(),
        lambda: 0.15,
        depth: 0.2,
        area: 20.0,
        tilt_deg: 0.0,
        ..Wall::default()
    });
    house.walls.push(Wall {
        name: "window".to_string(),
        lambda: 0.78,
        depth: 0.006,
        area: 3.0,
        azimuth_deg: 0.0,
        solar_through_rate: 0.8,
        is_open: true,
        ventilation_volume: Some(0.01),
        ..Wall::default()
    });

    let mut living = Room::new("living", 50.0, 293.15);
    for wall in ["south", "north", "roof", "window"] {
        living.surfaces.push(WallSurface::new(wall, 1));
    }
    house.rooms.push(living);
    for wall in ["south", "north", "roof", "window"] {
        house.outer_surfaces.push(WallSurface::new(wall, 0));
    }
    house
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let weather = match (args.next(), args.next()) {
        (Some(temperature), Some(radiation)) => Weather::from_csv(temperature, radiation)?,
        _ => Weather::synthetic_day(26.0, 5.0, 800.0),
    };

    let simulator = Simulator {
        tick_seconds: 600,
        begin_day: 171,
        total_days: 3,
        ..Simulator::default()
    };
    let ticks_per_hour = 3600 / simulator.tick_seconds as usize;
    let mut simulation = simulator.assemble(build_house(), &weather)?;

    println!("hour,outside_c,solar_wm2,living_c");
    simulation.run(|tick, probes| {
        if tick % ticks_per_hour == 0 {
            println!(
                "{},{:.2},{:.1},{:.2}",
                tick / ticks_per_hour,
                probes.outside_celsius.get(tick)?,
                probes.global_solar.get(tick)?,
                probes.rooms[0].1.get(tick)?,
            );
        }
        Ok(())
    })?;
    Ok(())
}
