//! Graph assembly and the tick loop.

use envgraph_core::{BuildContext, Container, EngineResult, Module, PortRef, Tick};
use envgraph_components::functions::{kelvin_to_celsius, SurfaceOrientation};
use envgraph_components::modules::{
    distribute_over_surface, Calendar, HeatCapacity, SolarAirTemperature, SolarPositionModule,
    SolarTransmission, SteadyWall, TiltedSolarRadiation, UnsteadyWall, VentilationHeatTransfer,
};
use tracing::{debug, info};

use crate::errors::SimError;
use crate::house::{House, Wall};
use crate::weather::Weather;

/// Number of slices used when walls are solved in the unsteady mode.
const WALL_SLICES: usize = 5;

/// Simulation setup: where, when, and how finely to step.
#[derive(Debug, Clone)]
pub struct Simulator {
    pub tick_seconds: u32,
    /// Days past January 1st at which the run starts.
    pub begin_day: u32,
    pub total_days: u32,
    /// Site latitude [deg].
    pub latitude: f64,
    /// Site longitude [deg].
    pub longitude: f64,
    /// Solve walls in the steady state (the default) or as sliced
    /// unsteady masses.
    pub use_steady_walls: bool,
    /// Drive exterior faces with the sol-air temperature instead of the
    /// outside air temperature plus an absorbed-radiation flow.
    pub use_sat: bool,
}

impl Default for Simulator {
    fn default() -> Self {
        Self {
            tick_seconds: 60,
            begin_day: 0,
            total_days: 1,
            latitude: 34.643139,
            longitude: 134.997222,
            use_steady_walls: true,
            use_sat: false,
        }
    }
}

/// Readable ports handed to the per-tick observer. All temperatures are
/// in degrees Celsius.
pub struct Probes {
    pub outside_celsius: PortRef<f64>,
    /// Global horizontal solar radiation [W/m2].
    pub global_solar: PortRef<f64>,
    /// Room air temperature per room name.
    pub rooms: Vec<(String, PortRef<f64>)>,
    /// Exterior surface temperature per wall name.
    pub outer_surfaces: Vec<(String, PortRef<f64>)>,
}

/// A fully wired and validated simulation, ready to step.
pub struct Simulation {
    ctx: BuildContext,
    root: Container,
    probes: Probes,
    total_ticks: usize,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("total_ticks", &self.total_ticks)
            .finish_non_exhaustive()
    }
}

/// A wall solved either way, presenting the same surface.
enum WallUnit {
    Steady(SteadyWall),
    Unsteady(UnsteadyWall),
}

impl WallUnit {
    fn set_temp(&mut self, side: usize, port: PortRef<f64>) {
        match self {
            WallUnit::Steady(w) => w.temp_in[side] = Some(port),
            WallUnit::Unsteady(w) => w.temp_in[side] = Some(port),
        }
    }

    fn push_heat(&mut self, side: usize, port: PortRef<f64>) {
        match self {
            WallUnit::Steady(w) => w.heat_in[side].push(port),
            WallUnit::Unsteady(w) => w.heat_in[side].push(port),
        }
    }

    fn surface_temperature(&self, side: usize) -> PortRef<f64> {
        match self {
            WallUnit::Steady(w) => w.surface_temperature(side),
            WallUnit::Unsteady(w) => w.surface_temperature(side),
        }
    }

    fn heat_out(&self, side: usize) -> PortRef<f64> {
        match self {
            WallUnit::Steady(w) => w.heat_out(side),
            WallUnit::Unsteady(w) => w.heat_out(side),
        }
    }

    /// Seed the wall mass; steady walls carry no state to seed.
    fn seed_temperature(&mut self, kelvin: f64) {
        if let WallUnit::Unsteady(w) = self {
            w.set_temperature(kelvin);
        }
    }
}

impl Module for WallUnit {
    fn label(&self) -> &str {
        match self {
            WallUnit::Steady(w) => w.label(),
            WallUnit::Unsteady(w) => w.label(),
        }
    }

    fn build(&mut self, ctx: &BuildContext) -> EngineResult<()> {
        match self {
            WallUnit::Steady(w) => w.build(ctx),
            WallUnit::Unsteady(w) => w.build(ctx),
        }
    }

    fn advance(&mut self, tick: Tick) -> EngineResult<()> {
        match self {
            WallUnit::Steady(w) => w.advance(tick),
            WallUnit::Unsteady(w) => w.advance(tick),
        }
    }
}

impl Simulator {
    fn wall_unit(&self, ctx: &BuildContext, wall: &Wall) -> WallUnit {
        let label = format!("wall.{}", wall.name);
        if self.use_steady_walls {
            WallUnit::Steady(SteadyWall::new(
                ctx,
                &label,
                wall.area,
                wall.overall_coefficient(),
                wall.alpha[0],
                wall.alpha[1],
            ))
        } else {
            WallUnit::Unsteady(UnsteadyWall::new(
                ctx,
                &label,
                wall.cpv,
                wall.lambda,
                wall.area,
                wall.depth,
                WALL_SLICES,
                wall.alpha,
                self.tick_seconds as f64,
            ))
        }
    }

    /// Assemble, build and validate the whole house graph.
    pub fn assemble(&self, mut house: House, weather: &Weather) -> Result<Simulation, SimError> {
        house.resolve_references()?;
        let ctx = BuildContext::new();

        let (outside, solar) = weather.expand(self.tick_seconds, self.begin_day, self.total_days)?;
        let initial_outside = outside.first().copied().unwrap_or(293.15);
        let outside = ctx.series("weather.outside_kelvin", outside);
        let solar = ctx.series("weather.global_solar", solar);

        let calendar =
            Calendar::new(&ctx, "calendar", self.begin_day, self.total_days, self.tick_seconds);
        let total_ticks = calendar.total_ticks();
        let mut sun = SolarPositionModule::new(&ctx, "sun", self.latitude, self.longitude);
        sun.set_calendar(&calendar);

        let mut walls: Vec<WallUnit> = house
            .walls
            .iter()
            .map(|w| self.wall_unit(&ctx, w))
            .collect();
        for wall in &mut walls {
            wall.seed_temperature(initial_outside);
        }
        let mut rooms: Vec<HeatCapacity> = Vec::with_capacity(house.rooms.len());
        let mut solar_modules: Vec<Box<dyn Module>> = Vec::new();
        let mut probes = Probes {
            outside_celsius: celsius_probe(&ctx, "probe.outside", &outside),
            global_solar: solar.clone(),
            rooms: Vec::new(),
            outer_surfaces: Vec::new(),
        };

        for room in &house.rooms {
            let mut mass = HeatCapacity::new(
                &ctx,
                &format!("room.{}", room.name),
                room.cpv,
                room.volume,
                self.tick_seconds as f64,
            );
            mass.set_temperature(room.initial_temperature);

            // Solar gain transmitted through the room's openings.
            let mut transmitted = Vec::new();
            for surface in &room.surfaces {
                let wall = &house.walls[surface.wall_index()?];
                if !wall.is_open {
                    continue;
                }
                let orientation = SurfaceOrientation {
                    tilt_deg: wall.tilt_deg,
                    azimuth_deg: wall.azimuth_deg,
                };
                let mut tilted = TiltedSolarRadiation::new(
                    &ctx,
                    &format!("tilted.{}", wall.name),
                    orientation,
                    wall.ground_reflectance,
                );
                tilted.global_horizontal = Some(solar.clone());
                tilted.elevation = Some(sun.elevation());
                tilted.azimuth = Some(sun.azimuth());
                tilted.day_of_year = Some(calendar.day_of_year());
                let mut window = SolarTransmission::new(
                    &ctx,
                    &format!("window.{}", wall.name),
                    wall.area,
                    wall.solar_through_rate,
                );
                window.set_radiation(&tilted);
                transmitted.push(window.heat());
                solar_modules.push(Box::new(tilted));
                solar_modules.push(Box::new(window));
            }
            let gain = ctx.sum(&format!("room.{}.solar_gain", room.name), &transmitted);

            // Distribute the gain over the absorbing (non-open) surfaces,
            // weighted by area.
            let mut absorbing_area = 0.0;
            for surface in &room.surfaces {
                let wall_cfg = &house.walls[surface.wall_index()?];
                if !wall_cfg.is_open {
                    absorbing_area += wall_cfg.area;
                }
            }
            for surface in &room.surfaces {
                let index = surface.wall_index()?;
                let wall_cfg = &house.walls[index];
                if !wall_cfg.is_open && absorbing_area > 0.0 {
                    let absorbed = distribute_over_surface(
                        &ctx,
                        &format!("room.{}.absorbed.{}", room.name, wall_cfg.name),
                        &gain,
                        wall_cfg.area / absorbing_area,
                    );
                    walls[index].push_heat(surface.side, absorbed);
                }

                // Room air and wall face exchange both ways. Wall masses
                // start settled against the room air.
                walls[index].seed_temperature(room.initial_temperature);
                walls[index].set_temp(surface.side, mass.temperature());
                mass.heat_in.push(walls[index].heat_out(surface.side));

                // Openings may also exchange air with the outside.
                if let Some(volume) = wall_cfg.ventilation_volume {
                    let mut vent = VentilationHeatTransfer::new(
                        &ctx,
                        &format!("vent.{}", wall_cfg.name),
                        volume,
                    );
                    vent.temp_in[0] = Some(outside.clone());
                    vent.temp_in[1] = Some(mass.temperature());
                    mass.heat_in.push(vent.heat_out(1));
                    solar_modules.push(Box::new(vent));
                }
            }

            probes.rooms.push((
                room.name.clone(),
                celsius_probe(&ctx, &format!("probe.room.{}", room.name), &mass.temperature()),
            ));
            rooms.push(mass);
        }

        // Exterior faces: sol-air temperature or air temperature plus the
        // equivalent absorbed flow.
        for surface in &house.outer_surfaces {
            let index = surface.wall_index()?;
            let wall_cfg = &house.walls[index];
            let orientation = SurfaceOrientation {
                tilt_deg: wall_cfg.tilt_deg,
                azimuth_deg: wall_cfg.azimuth_deg,
            };
            let mut sat = SolarAirTemperature::new(
                &ctx,
                &format!("sat.{}", wall_cfg.name),
                orientation,
                wall_cfg.ground_reflectance,
            );
            sat.set_sky(
                solar.clone(),
                sun.elevation(),
                sun.azimuth(),
                calendar.day_of_year(),
            );
            sat.temp_out = Some(outside.clone());

            if self.use_sat {
                walls[index].set_temp(surface.side, sat.temperature());
            } else {
                // (SAT - To) * alpha * S is exactly the absorbed flow the
                // sol-air temperature stands for.
                let alpha_area = wall_cfg.alpha[surface.side] * wall_cfg.area;
                let (sat_port, out_port) = (sat.temperature(), outside.clone());
                let nodes = [sat_port.node(), out_port.node()];
                let absorbed = ctx.derived(
                    &format!("sat.{}.absorbed", wall_cfg.name),
                    &nodes,
                    move |t| Ok((sat_port.get(t)? - out_port.get(t)?) * alpha_area),
                );
                walls[index].push_heat(surface.side, absorbed);
                walls[index].set_temp(surface.side, outside.clone());
            }
            solar_modules.push(Box::new(sat));

            probes.outer_surfaces.push((
                wall_cfg.name.clone(),
                celsius_probe(
                    &ctx,
                    &format!("probe.surface.{}", wall_cfg.name),
                    &walls[index].surface_temperature(surface.side),
                ),
            ));
        }

        let mut root = Container::new("house");
        root.push(calendar);
        root.push(sun);
        for module in solar_modules {
            root.push_boxed(module);
        }
        for wall in walls {
            root.push(wall);
        }
        for room in rooms {
            root.push(room);
        }

        root.build(&ctx)?;
        ctx.validate()?;
        info!(ticks = total_ticks, "house graph built and validated");

        Ok(Simulation {
            ctx,
            root,
            probes,
            total_ticks,
        })
    }
}

impl Simulation {
    pub fn probes(&self) -> &Probes {
        &self.probes
    }

    pub fn total_ticks(&self) -> usize {
        self.total_ticks
    }

    /// The wired dependency graph in graphviz dot format.
    pub fn to_dot(&self) -> String {
        self.ctx.to_dot()
    }

    /// Drive the tick loop, handing the probes to `observer` after every
    /// committed tick.
    pub fn run(
        &mut self,
        mut observer: impl FnMut(Tick, &Probes) -> EngineResult<()>,
    ) -> Result<(), SimError> {
        for tick in 0..self.total_ticks {
            self.root.advance(tick)?;
            observer(tick, &self.probes)?;
            if tick % 1000 == 0 {
                debug!(tick, "advanced");
            }
        }
        Ok(())
    }
}

fn celsius_probe(ctx: &BuildContext, label: &str, kelvin: &PortRef<f64>) -> PortRef<f64> {
    let port = kelvin.clone();
    ctx.derived(label, &[kelvin.node()], move |t| {
        Ok(kelvin_to_celsius(port.get(t)?))
    })
}
