//! Conduction between two faces of a solid layer.

use envgraph_core::{BuildContext, EngineResult, ForwardPort, Module, PortRef};

use crate::functions::fourier;
use crate::modules::take_input;

/// Fourier conduction across a layer of thickness `dx`.
///
/// `heat_out(0)` is the flow into side 1 and `heat_out(1)` the flow into
/// side 2; they are equal and opposite.
pub struct ConductiveHeatTransfer {
    label: String,
    lambda: f64,
    area: f64,
    dx: f64,
    pub temp_in: [Option<PortRef<f64>>; 2],
    heat_out: [ForwardPort<f64>; 2],
}

impl ConductiveHeatTransfer {
    pub fn new(ctx: &BuildContext, label: &str, lambda: f64, area: f64, dx: f64) -> Self {
        Self {
            label: label.to_string(),
            lambda,
            area,
            dx,
            temp_in: [None, None],
            heat_out: [
                ctx.forward(&format!("{label}.heat_out1")),
                ctx.forward(&format!("{label}.heat_out2")),
            ],
        }
    }

    pub fn heat_out(&self, side: usize) -> PortRef<f64> {
        self.heat_out[side].port()
    }
}

impl Module for ConductiveHeatTransfer {
    fn label(&self) -> &str {
        &self.label
    }

    fn build(&mut self, ctx: &BuildContext) -> EngineResult<()> {
        let [slot1, slot2] = &mut self.temp_in;
        let t1 = take_input(slot1, &self.label, "temp_in1")?;
        let t2 = take_input(slot2, &self.label, "temp_in2")?;

        let (lambda, area, dx) = (self.lambda, self.area, self.dx);
        let (t1c, t2c) = (t1.clone(), t2.clone());
        let flow = ctx.derived(
            &format!("{}.flow", self.label),
            &[t1.node(), t2.node()],
            move |t| Ok(fourier(lambda, area, t1c.get(t)?, t2c.get(t)?, dx)),
        );
        self.heat_out[0].bind(&flow)?;
        self.heat_out[1].bind(&ctx.invert(&format!("{}.reverse", self.label), &flow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envgraph_core::BuildContext;

    #[test]
    fn heat_flows_from_the_hot_face_to_the_cold_face() {
        let ctx = BuildContext::new();
        let mut cond = ConductiveHeatTransfer::new(&ctx, "cond", 0.2, 2.0, 0.1);
        cond.temp_in[0] = Some(ctx.constant("hot", 10.0));
        cond.temp_in[1] = Some(ctx.constant("cold", 0.0));
        cond.build(&ctx).unwrap();

        // 0.2 W/mK * 2 m2 * 10 K / 0.1 m = 40 W out of face 1.
        assert_eq!(cond.heat_out(0).get(0).unwrap(), -40.0);
        assert_eq!(cond.heat_out(1).get(0).unwrap(), 40.0);
    }
}
