//! Assembled thermal scenarios.

use envgraph_core::{BuildContext, Module};
use envgraph_components::functions::CPV_AIR;
use envgraph_components::modules::{
    ConvectiveHeatTransfer, HeatCapacity, NaturalConvectiveHeatTransfer, SteadyWall,
    VentilationHeatTransfer,
};
use is_close::is_close;

/// A thin wall in 15 K air converges to the air temperature, regardless of
/// the tick granularity.
fn run_equilibrium(tick_seconds: f64, ticks: usize) -> f64 {
    let ctx = BuildContext::new();
    let mut wall = HeatCapacity::new(&ctx, "wall", 1000.0, 0.1, tick_seconds);
    let mut wind = NaturalConvectiveHeatTransfer::new(&ctx, "wind", 1.5, 2.0);
    wind.temp_fluid = Some(ctx.constant("air", 15.0));
    wind.temp_surface = Some(wall.temperature());
    wall.heat_in.push(wind.heat_to_surface());

    wall.build(&ctx).unwrap();
    wind.build(&ctx).unwrap();
    ctx.validate().unwrap();

    let temperature = wall.temperature();
    for t in 0..ticks {
        wall.advance(t).unwrap();
    }
    temperature.get(ticks - 1).unwrap()
}

#[test]
fn natural_convection_reaches_equilibrium_hourly() {
    let settled = run_equilibrium(3600.0, 100);
    assert!(is_close!(settled, 15.0, abs_tol = 0.1));
}

#[test]
fn finer_ticks_reach_the_same_equilibrium() {
    let settled = run_equilibrium(60.0, 6000);
    assert!(is_close!(settled, 15.0, abs_tol = 0.1));
}

/// Two seeded masses exchanging through one convective film. Each gate
/// reads the other's previous-tick temperature, so the mutual feedback is
/// legal, and the opposite-signed flow pair conserves the total energy:
/// they must meet at the capacity-weighted mean.
fn run_two_mass(tick_seconds: f64, ticks: usize) -> (f64, f64) {
    let ctx = BuildContext::new();
    let mut wall = HeatCapacity::new(&ctx, "wall", 1000.0, 0.1, tick_seconds);
    wall.set_temperature(40.0);
    let mut air = HeatCapacity::new(&ctx, "air", 1000.0, 0.05, tick_seconds);
    air.set_temperature(20.0);

    let mut film = ConvectiveHeatTransfer::new(&ctx, "film", 2.0);
    film.alpha = Some(ctx.constant("alpha", 2.0));
    film.temp_surface = Some(wall.temperature());
    film.temp_fluid = Some(air.temperature());
    wall.heat_in.push(film.heat_to_surface());
    air.heat_in.push(film.heat_to_fluid());

    wall.build(&ctx).unwrap();
    air.build(&ctx).unwrap();
    film.build(&ctx).unwrap();
    ctx.validate().unwrap();

    for t in 0..ticks {
        wall.advance(t).unwrap();
        air.advance(t).unwrap();
    }
    (
        wall.temperature().get(ticks - 1).unwrap(),
        air.temperature().get(ticks - 1).unwrap(),
    )
}

#[test]
fn two_seeded_masses_settle_at_a_common_temperature() {
    let (wall, air) = run_two_mass(3600.0, 50);
    assert!((wall - air).abs() < 0.1);
    // 100 kJ/K at 40 plus 50 kJ/K at 20 settles at 100/3.
    assert!(is_close!(air, 100.0 / 3.0, abs_tol = 0.05));
    assert!(is_close!(wall, 100.0 / 3.0, abs_tol = 0.05));
}

#[test]
fn the_common_temperature_is_tick_length_independent() {
    let (wall, air) = run_two_mass(60.0, 1500);
    assert!((wall - air).abs() < 0.1);
    assert!(is_close!(air, 100.0 / 3.0, abs_tol = 0.05));
}

/// A warm room losing heat only through an air exchange with the outside.
#[test]
fn a_ventilated_room_drifts_to_the_outside_air() {
    let ctx = BuildContext::new();
    let mut room = HeatCapacity::new(&ctx, "room", CPV_AIR, 40.0, 3600.0);
    room.set_temperature(303.15);

    let mut vent = VentilationHeatTransfer::new(&ctx, "vent", 2.0);
    vent.temp_in[0] = Some(ctx.constant("outside", 288.15));
    vent.temp_in[1] = Some(room.temperature());
    room.heat_in.push(vent.heat_out(1));

    room.build(&ctx).unwrap();
    vent.build(&ctx).unwrap();
    ctx.validate().unwrap();

    for t in 0..60 {
        room.advance(t).unwrap();
    }
    let settled = room.temperature().get(59).unwrap();
    assert!(is_close!(settled, 288.15, abs_tol = 0.1));
}

/// Room air coupled to a steady wall in both directions: the wall's heat
/// output feeds the room mass whose temperature feeds the wall back. The
/// room gate keeps the loop legal, and the room drifts towards the outside
/// temperature.
#[test]
fn a_room_behind_a_steady_wall_drifts_towards_the_outside() {
    let ctx = BuildContext::new();
    let tick = 3600.0;

    let mut room = HeatCapacity::new(&ctx, "room.air", CPV_AIR, 40.0, tick);
    room.set_temperature(293.15);

    let mut wall = SteadyWall::new(&ctx, "wall", 10.0, 2.0, 23.0, 9.0);
    wall.temp_in[0] = Some(ctx.constant("outside", 303.15));
    wall.temp_in[1] = Some(room.temperature());
    room.heat_in.push(wall.heat_out(1));

    room.build(&ctx).unwrap();
    wall.build(&ctx).unwrap();
    ctx.validate().unwrap();

    let temperature = room.temperature();
    let start = temperature.get(0).unwrap();
    assert_eq!(start, 293.15);
    for t in 0..400 {
        room.advance(t).unwrap();
        wall.advance(t).unwrap();
    }
    let settled = temperature.get(399).unwrap();
    assert!(settled > start);
    assert!(is_close!(settled, 303.15, abs_tol = 0.5));
}
