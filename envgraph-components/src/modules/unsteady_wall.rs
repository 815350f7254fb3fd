//! Unsteady walls: sliced thermal-mass chains with surface convection.

use envgraph_core::{BuildContext, EngineError, EngineResult, ForwardPort, Module, PortRef, Tick};

use crate::modules::{ConductiveHeatTransfer, ConvectiveHeatTransfer, HeatCapacity, take_input};

/// A slab sliced into `slices` lumped masses linked by conduction.
///
/// External flows attach to the end slices through `heat_in`; the end
/// slice temperatures are published as `temperature(0)` / `temperature(1)`.
pub struct SerialHeatConduction {
    label: String,
    pub heat_in: [Vec<PortRef<f64>>; 2],
    temp_out: [ForwardPort<f64>; 2],
    masses: Vec<HeatCapacity>,
    links: Vec<ConductiveHeatTransfer>,
}

impl SerialHeatConduction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ctx: &BuildContext,
        label: &str,
        cpv: f64,
        lambda: f64,
        area: f64,
        depth: f64,
        slices: usize,
        tick_seconds: f64,
    ) -> Self {
        let dx = depth / slices.max(1) as f64;

        let masses: Vec<HeatCapacity> = (0..slices)
            .map(|i| {
                HeatCapacity::new(
                    ctx,
                    &format!("{label}.slice{}", i + 1),
                    cpv,
                    dx * area,
                    tick_seconds,
                )
            })
            .collect();
        let links: Vec<ConductiveHeatTransfer> = (0..slices.saturating_sub(1))
            .map(|i| {
                ConductiveHeatTransfer::new(
                    ctx,
                    &format!("{label}.link{}_{}", i + 1, i + 2),
                    lambda,
                    area,
                    dx,
                )
            })
            .collect();

        Self {
            label: label.to_string(),
            heat_in: [Vec::new(), Vec::new()],
            temp_out: [
                ctx.forward(&format!("{label}.end_temp1")),
                ctx.forward(&format!("{label}.end_temp2")),
            ],
            masses,
            links,
        }
    }

    /// Seed every slice at the same starting temperature.
    pub fn set_temperature(&mut self, kelvin: f64) {
        for mass in &mut self.masses {
            mass.set_temperature(kelvin);
        }
    }

    /// End slice temperature [K]; side 0 is the first slice.
    pub fn temperature(&self, side: usize) -> PortRef<f64> {
        self.temp_out[side].port()
    }
}

impl Module for SerialHeatConduction {
    fn label(&self) -> &str {
        &self.label
    }

    fn build(&mut self, ctx: &BuildContext) -> EngineResult<()> {
        if self.masses.is_empty() {
            return Err(EngineError::InvalidConfiguration(format!(
                "{}: needs at least one slice",
                self.label
            )));
        }
        let last = self.masses.len() - 1;
        for (i, link) in self.links.iter_mut().enumerate() {
            link.temp_in[0] = Some(self.masses[i].temperature());
            link.temp_in[1] = Some(self.masses[i + 1].temperature());
            self.masses[i].heat_in.push(link.heat_out(0));
            self.masses[i + 1].heat_in.push(link.heat_out(1));
        }
        self.masses[0].heat_in.extend(self.heat_in[0].drain(..));
        self.masses[last].heat_in.extend(self.heat_in[1].drain(..));

        for mass in &mut self.masses {
            mass.build(ctx)?;
        }
        for link in &mut self.links {
            link.build(ctx)?;
        }
        self.temp_out[0].bind(&self.masses[0].temperature())?;
        self.temp_out[1].bind(&self.masses[last].temperature())
    }

    fn advance(&mut self, tick: Tick) -> EngineResult<()> {
        for mass in &mut self.masses {
            mass.advance(tick)?;
        }
        Ok(())
    }
}

/// An unsteady wall: a sliced conduction chain with fixed-coefficient
/// convection films on both faces.
pub struct UnsteadyWall {
    label: String,
    chain: SerialHeatConduction,
    films: [ConvectiveHeatTransfer; 2],
    pub temp_in: [Option<PortRef<f64>>; 2],
    pub heat_in: [Vec<PortRef<f64>>; 2],
}

impl UnsteadyWall {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ctx: &BuildContext,
        label: &str,
        cpv: f64,
        lambda: f64,
        area: f64,
        depth: f64,
        slices: usize,
        alpha: [f64; 2],
        tick_seconds: f64,
    ) -> Self {
        let films = [
            ConvectiveHeatTransfer::new(ctx, &format!("{label}.film1"), area),
            ConvectiveHeatTransfer::new(ctx, &format!("{label}.film2"), area),
        ];
        let mut wall = Self {
            label: label.to_string(),
            chain: SerialHeatConduction::new(
                ctx,
                &format!("{label}.body"),
                cpv,
                lambda,
                area,
                depth,
                slices,
                tick_seconds,
            ),
            films,
            temp_in: [None, None],
            heat_in: [Vec::new(), Vec::new()],
        };
        wall.films[0].alpha = Some(ctx.constant(&format!("{label}.alpha1"), alpha[0]));
        wall.films[1].alpha = Some(ctx.constant(&format!("{label}.alpha2"), alpha[1]));
        wall
    }

    pub fn set_temperature(&mut self, kelvin: f64) {
        self.chain.set_temperature(kelvin);
    }

    /// Surface temperature of the given side [K].
    pub fn surface_temperature(&self, side: usize) -> PortRef<f64> {
        self.chain.temperature(side)
    }

    /// Convective flow delivered to the fluid on the given side [W].
    pub fn heat_out(&self, side: usize) -> PortRef<f64> {
        self.films[side].heat_to_fluid()
    }
}

impl Module for UnsteadyWall {
    fn label(&self) -> &str {
        &self.label
    }

    fn build(&mut self, ctx: &BuildContext) -> EngineResult<()> {
        let [slot1, slot2] = &mut self.temp_in;
        let fluid_out = take_input(slot1, &self.label, "temp_in1")?;
        let fluid_in = take_input(slot2, &self.label, "temp_in2")?;

        for side in 0..2 {
            self.films[side].temp_surface = Some(self.chain.temperature(side));
            self.chain.heat_in[side].push(self.films[side].heat_to_surface());
            self.chain.heat_in[side].append(&mut self.heat_in[side]);
        }
        self.films[0].temp_fluid = Some(fluid_out);
        self.films[1].temp_fluid = Some(fluid_in);

        self.chain.build(ctx)?;
        for film in &mut self.films {
            film.build(ctx)?;
        }
        Ok(())
    }

    fn advance(&mut self, tick: Tick) -> EngineResult<()> {
        self.chain.advance(tick)
    }
}
