//! Steady-state one-dimensional wall.

use envgraph_core::{
    BuildContext, EngineError, EngineResult, ForwardPort, Gate, Module, PortRef, Tick,
};

use crate::functions::overall_transmission;
use crate::modules::{built_gate, take_input};

/// A wall solved in the steady state through its overall transmission
/// coefficient `k`.
///
/// Side 0 is outside, side 1 inside. Incident heat flows [W] on each face
/// are folded into a sol-air temperature per side; the transmitted flow is
/// `k * area * (SATo - SATi)`. The surface temperature outputs pass through
/// latch gates, so a room whose air temperature depends on these surfaces
/// may feed its own temperature back in without forming a combinational
/// cycle.
pub struct SteadyWall {
    label: String,
    area: f64,
    k: f64,
    alpha: [f64; 2],
    pub temp_in: [Option<PortRef<f64>>; 2],
    pub heat_in: [Vec<PortRef<f64>>; 2],
    temp_out: [ForwardPort<f64>; 2],
    heat_out: [ForwardPort<f64>; 2],
    gates: [Option<Gate>; 2],
}

impl SteadyWall {
    /// `alpha_out`/`alpha_in` are the film coefficients [W/(m2 K)] already
    /// folded into `k`.
    pub fn new(
        ctx: &BuildContext,
        label: &str,
        area: f64,
        k: f64,
        alpha_out: f64,
        alpha_in: f64,
    ) -> Self {
        Self {
            label: label.to_string(),
            area,
            k,
            alpha: [alpha_out, alpha_in],
            temp_in: [None, None],
            heat_in: [Vec::new(), Vec::new()],
            temp_out: [
                ctx.forward(&format!("{label}.surface_temp1")),
                ctx.forward(&format!("{label}.surface_temp2")),
            ],
            heat_out: [
                ctx.forward(&format!("{label}.heat_out1")),
                ctx.forward(&format!("{label}.heat_out2")),
            ],
            gates: [None, None],
        }
    }

    /// Surface temperature of the given side [K], delayed by one tick.
    pub fn surface_temperature(&self, side: usize) -> PortRef<f64> {
        self.temp_out[side].port()
    }

    /// Convective flow delivered to the fluid on the given side [W].
    pub fn heat_out(&self, side: usize) -> PortRef<f64> {
        self.heat_out[side].port()
    }

    fn check_configuration(&self) -> EngineResult<()> {
        if self.area <= 0.0 || self.k <= 0.0 || self.alpha[0] <= 0.0 || self.alpha[1] <= 0.0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "{}: area, k and film coefficients must be positive",
                self.label
            )));
        }
        // The overall resistance must at least contain both film layers.
        if 1.0 / self.k <= 1.0 / self.alpha[0] + 1.0 / self.alpha[1] {
            return Err(EngineError::InvalidConfiguration(format!(
                "{}: k = {} is too large for film coefficients {} and {}",
                self.label, self.k, self.alpha[0], self.alpha[1]
            )));
        }
        Ok(())
    }
}

impl Module for SteadyWall {
    fn label(&self) -> &str {
        &self.label
    }

    fn build(&mut self, ctx: &BuildContext) -> EngineResult<()> {
        self.check_configuration()?;
        let [slot1, slot2] = &mut self.temp_in;
        let t_out = take_input(slot1, &self.label, "temp_in1")?;
        let t_in = take_input(slot2, &self.label, "temp_in2")?;

        let q_out = ctx.sum(&format!("{}.incident1", self.label), &self.heat_in[0]);
        let q_in = ctx.sum(&format!("{}.incident2", self.label), &self.heat_in[1]);

        // Incident flows fold into a sol-air temperature per side.
        let (area, k) = (self.area, self.k);
        let [a_o, a_i] = self.alpha;
        let (t_out2, q_out2) = (t_out.clone(), q_out.clone());
        let sat_o = ctx.derived(
            &format!("{}.sat1", self.label),
            &[t_out.node(), q_out.node()],
            move |t| Ok(t_out2.get(t)? + q_out2.get(t)? / (a_o * area)),
        );
        let (t_in2, q_in2) = (t_in.clone(), q_in.clone());
        let sat_i = ctx.derived(
            &format!("{}.sat2", self.label),
            &[t_in.node(), q_in.node()],
            move |t| Ok(t_in2.get(t)? + q_in2.get(t)? / (a_i * area)),
        );

        let (so, si) = (sat_o.clone(), sat_i.clone());
        let ts_o = ctx.derived(
            &format!("{}.face_temp1", self.label),
            &[sat_o.node(), sat_i.node()],
            move |t| {
                let (o, i) = (so.get(t)?, si.get(t)?);
                Ok(o - (o - i) * k / a_o)
            },
        );
        let (so, si) = (sat_o.clone(), sat_i.clone());
        let ts_i = ctx.derived(
            &format!("{}.face_temp2", self.label),
            &[sat_o.node(), sat_i.node()],
            move |t| {
                let (o, i) = (so.get(t)?, si.get(t)?);
                Ok(i + (o - i) * k / a_i)
            },
        );

        // Transmitted flow, positive towards the inside.
        let (so, si) = (sat_o.clone(), sat_i.clone());
        let transmitted = ctx.derived(
            &format!("{}.transmitted", self.label),
            &[sat_o.node(), sat_i.node()],
            move |t| Ok(overall_transmission(k, area, so.get(t)?, si.get(t)?)),
        );

        let gate_o = ctx.latch_gate(&format!("{}.surface_state1", self.label), &ts_o);
        let gate_i = ctx.latch_gate(&format!("{}.surface_state2", self.label), &ts_i);
        self.temp_out[0].bind(&gate_o.port())?;
        self.temp_out[1].bind(&gate_i.port())?;
        self.gates = [Some(gate_o), Some(gate_i)];

        let lost = ctx.invert(&format!("{}.lost", self.label), &transmitted);
        self.heat_out[0].bind(&ctx.add(&format!("{}.outflow1", self.label), &lost, &q_out))?;
        self.heat_out[1].bind(&ctx.add(&format!("{}.outflow2", self.label), &transmitted, &q_in))
    }

    fn advance(&mut self, tick: Tick) -> EngineResult<()> {
        built_gate(&self.gates[0], &self.label)?.advance(tick)?;
        built_gate(&self.gates[1], &self.label)?.advance(tick)
    }
}
