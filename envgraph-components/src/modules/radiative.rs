//! Long-wave radiative exchange between two gray surfaces.

use envgraph_core::{BuildContext, EngineResult, ForwardPort, Module, PortRef};

use crate::functions::stefan_boltzmann;
use crate::modules::take_input;

/// Pairwise gray-body exchange through a view factor `f12`.
pub struct RadiativeHeatTransfer {
    label: String,
    f12: f64,
    emissivity: [f64; 2],
    pub temp_in: [Option<PortRef<f64>>; 2],
    heat_out: [ForwardPort<f64>; 2],
}

impl RadiativeHeatTransfer {
    pub fn new(ctx: &BuildContext, label: &str, f12: f64, e1: f64, e2: f64) -> Self {
        Self {
            label: label.to_string(),
            f12,
            emissivity: [e1, e2],
            temp_in: [None, None],
            heat_out: [
                ctx.forward(&format!("{label}.heat_out1")),
                ctx.forward(&format!("{label}.heat_out2")),
            ],
        }
    }

    /// Flow into the given side [W].
    pub fn heat_out(&self, side: usize) -> PortRef<f64> {
        self.heat_out[side].port()
    }
}

impl Module for RadiativeHeatTransfer {
    fn label(&self) -> &str {
        &self.label
    }

    fn build(&mut self, ctx: &BuildContext) -> EngineResult<()> {
        let [slot1, slot2] = &mut self.temp_in;
        let t1 = take_input(slot1, &self.label, "temp_in1")?;
        let t2 = take_input(slot2, &self.label, "temp_in2")?;

        let (f12, e1, e2) = (self.f12, self.emissivity[0], self.emissivity[1]);
        let (t1c, t2c) = (t1.clone(), t2.clone());
        // Positive from surface 1 to surface 2.
        let exchange = ctx.derived(
            &format!("{}.exchange", self.label),
            &[t1.node(), t2.node()],
            move |t| Ok(stefan_boltzmann(f12, e1, e2, t1c.get(t)?, t2c.get(t)?)),
        );
        self.heat_out[1].bind(&exchange)?;
        self.heat_out[0].bind(&ctx.invert(&format!("{}.reverse", self.label), &exchange))
    }
}
