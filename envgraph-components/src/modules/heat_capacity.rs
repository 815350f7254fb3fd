//! Lumped thermal mass.

use envgraph_core::{BuildContext, EngineResult, ForwardPort, Gate, Module, PortRef, Tick};

use crate::functions::{heat_to_temperature, temperature_to_heat};
use crate::modules::built_gate;

/// A thermal mass integrating its heat flows into a stored energy and
/// exposing the resulting temperature.
///
/// Heat inputs are in watts; each tick folds `sum(heat_in) * tick_seconds`
/// joules into the store. The temperature output reads the store as of the
/// end of the previous tick, so everything downstream sees settled state.
pub struct HeatCapacity {
    label: String,
    cpv: f64,
    volume: f64,
    tick_seconds: f64,
    initial_temperature: Option<f64>,
    pub heat_in: Vec<PortRef<f64>>,
    temperature: ForwardPort<f64>,
    gate: Option<Gate>,
}

impl HeatCapacity {
    /// `cpv` is the volumetric specific heat [kJ/(m3 K)], `volume` [m3].
    pub fn new(ctx: &BuildContext, label: &str, cpv: f64, volume: f64, tick_seconds: f64) -> Self {
        Self {
            label: label.to_string(),
            cpv,
            volume,
            tick_seconds,
            initial_temperature: None,
            heat_in: Vec::new(),
            temperature: ctx.forward(&format!("{label}.temperature")),
            gate: None,
        }
    }

    /// Seed the stored energy so the mass starts at `kelvin`. Must be set
    /// before the build.
    pub fn set_temperature(&mut self, kelvin: f64) {
        self.initial_temperature = Some(kelvin);
    }

    /// Temperature of the mass [K], readable before the build completes.
    pub fn temperature(&self) -> PortRef<f64> {
        self.temperature.port()
    }
}

impl Module for HeatCapacity {
    fn label(&self) -> &str {
        &self.label
    }

    fn build(&mut self, ctx: &BuildContext) -> EngineResult<()> {
        let total = ctx.sum(&format!("{}.heat_flow", self.label), &self.heat_in);
        let per_tick = ctx.scale(
            &format!("{}.heat_per_tick", self.label),
            self.tick_seconds,
            &total,
        );
        let gate = ctx.accumulate_gate(&format!("{}.stored_heat", self.label), &per_tick);
        if let Some(t0) = self.initial_temperature {
            gate.seed(temperature_to_heat(self.cpv, self.volume, t0));
        }

        let (cpv, volume) = (self.cpv, self.volume);
        let stored = gate.port();
        let stored2 = stored.clone();
        let temperature = ctx.derived(
            &format!("{}.kelvin", self.label),
            &[stored.node()],
            move |t| Ok(heat_to_temperature(cpv, volume, stored2.get(t)?)),
        );
        self.temperature.bind(&temperature)?;
        self.gate = Some(gate);
        Ok(())
    }

    fn advance(&mut self, tick: Tick) -> EngineResult<()> {
        built_gate(&self.gate, &self.label)?.advance(tick)
    }
}
