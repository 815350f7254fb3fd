//! Minimal engine demo: a warm mass cooling towards still air through
//! natural convection. Prints a CSV of the mass temperature per tick.

use envgraph_components::modules::{HeatCapacity, NaturalConvectiveHeatTransfer};
use envgraph_core::{BuildContext, Container, Module};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let ctx = BuildContext::new();
    let air = ctx.constant("air", 288.15);

    let mut mass = HeatCapacity::new(&ctx, "mass", 1000.0, 0.1, 60.0);
    mass.set_temperature(303.15);

    let mut film = NaturalConvectiveHeatTransfer::new(&ctx, "film", 1.5, 2.0);
    film.temp_surface = Some(mass.temperature());
    film.temp_fluid = Some(air);
    mass.heat_in.push(film.heat_to_surface());

    let temperature = mass.temperature();
    let mut root = Container::new("demo");
    root.push(mass);
    root.push(film);
    root.build(&ctx)?;
    ctx.validate()?;

    println!("minute,mass_kelvin");
    for tick in 0..240 {
        root.advance(tick)?;
        println!("{tick},{:.4}", temperature.get(tick)?);
    }
    Ok(())
}
