//! End-to-end runs of assembled houses.

use envgraph::{House, Room, SimError, Simulator, Wall, WallSurface, Weather};

fn one_room_house(window: bool) -> House {
    let mut house = House::default();
    house.walls.push(Wall {
        name: "south".to_string(),
        lambda: 0.2,
        depth: 0.15,
        area: 12.0,
        ..Wall::default()
    });
    house.walls.push(Wall {
        name: "glass".to_string(),
        lambda: 0.78,
        depth: 0.006,
        area: 3.0,
        solar_through_rate: 0.8,
        is_open: window,
        ..Wall::default()
    });

    let mut living = Room::new("living", 50.0, 293.15);
    living.surfaces.push(WallSurface::new("south", 1));
    living.surfaces.push(WallSurface::new("glass", 1));
    house.rooms.push(living);
    house.outer_surfaces.push(WallSurface::new("south", 0));
    house.outer_surfaces.push(WallSurface::new("glass", 0));
    house
}

fn summer_run() -> Simulator {
    Simulator {
        tick_seconds: 600,
        begin_day: 171,
        total_days: 1,
        ..Simulator::default()
    }
}

#[test]
fn a_cool_room_warms_towards_a_summer_day() {
    let weather = Weather::synthetic_day(26.0, 5.0, 800.0);
    let mut simulation = summer_run()
        .assemble(one_room_house(false), &weather)
        .unwrap();

    let mut first = None;
    let mut last = 0.0;
    simulation
        .run(|tick, probes| {
            let outside = probes.outside_celsius.get(tick)?;
            assert!((20.0..32.0).contains(&outside));
            let room = probes.rooms[0].1.get(tick)?;
            first.get_or_insert(room);
            last = room;
            Ok(())
        })
        .unwrap();

    // Starts at 20 C, tracks the warmer outside air by the end of the day.
    assert!(first.unwrap() < 21.0);
    assert!(last > 21.0);
    assert!(last < 45.0);
}

#[test]
fn a_south_window_adds_solar_gain() {
    let weather = Weather::synthetic_day(26.0, 5.0, 800.0);

    let run = |window: bool| {
        let mut simulation = summer_run()
            .assemble(one_room_house(window), &weather)
            .unwrap();
        let mut last = 0.0;
        simulation
            .run(|tick, probes| {
                last = probes.rooms[0].1.get(tick)?;
                Ok(())
            })
            .unwrap();
        last
    };

    assert!(run(true) > run(false));
}

#[test]
fn an_unsteady_wall_configuration_also_runs() {
    // A single massive wall; thin layers need a finer tick than this run's.
    let mut house = House::default();
    house.walls.push(Wall {
        name: "south".to_string(),
        lambda: 0.2,
        cpv: 854.0,
        depth: 0.15,
        area: 12.0,
        ..Wall::default()
    });
    let mut living = Room::new("living", 50.0, 293.15);
    living.surfaces.push(WallSurface::new("south", 1));
    house.rooms.push(living);
    house.outer_surfaces.push(WallSurface::new("south", 0));

    let weather = Weather::synthetic_day(26.0, 5.0, 800.0);
    let simulator = Simulator {
        use_steady_walls: false,
        ..summer_run()
    };
    let mut simulation = simulator.assemble(house, &weather).unwrap();
    simulation
        .run(|tick, probes| {
            let room = probes.rooms[0].1.get(tick)?;
            assert!((10.0..50.0).contains(&room));
            Ok(())
        })
        .unwrap();
}

#[test]
fn an_unknown_wall_reference_fails_the_assembly() {
    let mut house = one_room_house(false);
    house.rooms[0].surfaces.push(WallSurface::new("attic", 1));
    let weather = Weather::synthetic_day(26.0, 5.0, 800.0);
    let err = summer_run().assemble(house, &weather).unwrap_err();
    assert!(matches!(err, SimError::UnknownWall(name) if name == "attic"));
}

#[test]
fn the_dot_export_names_the_house_parts() {
    let weather = Weather::synthetic_day(26.0, 5.0, 800.0);
    let simulation = summer_run()
        .assemble(one_room_house(true), &weather)
        .unwrap();
    let dot = simulation.to_dot();
    assert!(dot.contains("room.living"));
    assert!(dot.contains("wall.south"));
    assert!(dot.contains("window.glass"));
}
