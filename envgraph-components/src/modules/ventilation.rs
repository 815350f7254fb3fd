//! Heat carried by air exchange between two zones.

use envgraph_core::{BuildContext, EngineResult, ForwardPort, Module, PortRef};

use crate::functions::{ventilation_heat_transfer, CPV_AIR};
use crate::modules::take_input;

/// Ventilation exchange of `volume` m3/s of air between two zones.
pub struct VentilationHeatTransfer {
    label: String,
    cpv_air: f64,
    volume: f64,
    pub temp_in: [Option<PortRef<f64>>; 2],
    heat_out: [ForwardPort<f64>; 2],
}

impl VentilationHeatTransfer {
    pub fn new(ctx: &BuildContext, label: &str, volume: f64) -> Self {
        Self {
            label: label.to_string(),
            cpv_air: CPV_AIR,
            volume,
            temp_in: [None, None],
            heat_out: [
                ctx.forward(&format!("{label}.heat_out1")),
                ctx.forward(&format!("{label}.heat_out2")),
            ],
        }
    }

    /// Flow into the given zone [W].
    pub fn heat_out(&self, side: usize) -> PortRef<f64> {
        self.heat_out[side].port()
    }
}

impl Module for VentilationHeatTransfer {
    fn label(&self) -> &str {
        &self.label
    }

    fn build(&mut self, ctx: &BuildContext) -> EngineResult<()> {
        let [slot1, slot2] = &mut self.temp_in;
        let t1 = take_input(slot1, &self.label, "temp_in1")?;
        let t2 = take_input(slot2, &self.label, "temp_in2")?;

        let (cpv, volume) = (self.cpv_air, self.volume);
        let (t1c, t2c) = (t1.clone(), t2.clone());
        // Positive from zone 1 to zone 2.
        let carried = ctx.derived(
            &format!("{}.carried", self.label),
            &[t1.node(), t2.node()],
            move |t| Ok(ventilation_heat_transfer(cpv, volume, t1c.get(t)?, t2c.get(t)?)),
        );
        self.heat_out[1].bind(&carried)?;
        self.heat_out[0].bind(&ctx.invert(&format!("{}.reverse", self.label), &carried))
    }
}
