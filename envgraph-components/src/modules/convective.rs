//! Surface-to-air convection.

use envgraph_core::{BuildContext, EngineResult, ForwardPort, Module, PortRef};

use crate::functions::{natural_convective_rate, newton_cooling};
use crate::modules::take_input;

/// Convective exchange between a surface and a fluid for a supplied film
/// coefficient, which may itself vary per tick.
///
/// The exchanged flow is `alpha * area * (Ts - Tf)`; `heat_to_fluid`
/// carries it, `heat_to_surface` carries the opposite sign, so wiring both
/// into their respective masses conserves energy.
pub struct ConvectiveHeatTransfer {
    label: String,
    area: f64,
    pub alpha: Option<PortRef<f64>>,
    pub temp_surface: Option<PortRef<f64>>,
    pub temp_fluid: Option<PortRef<f64>>,
    heat_to_fluid: ForwardPort<f64>,
    heat_to_surface: ForwardPort<f64>,
}

impl ConvectiveHeatTransfer {
    pub fn new(ctx: &BuildContext, label: &str, area: f64) -> Self {
        Self {
            label: label.to_string(),
            area,
            alpha: None,
            temp_surface: None,
            temp_fluid: None,
            heat_to_fluid: ctx.forward(&format!("{label}.heat_to_fluid")),
            heat_to_surface: ctx.forward(&format!("{label}.heat_to_surface")),
        }
    }

    pub fn heat_to_fluid(&self) -> PortRef<f64> {
        self.heat_to_fluid.port()
    }

    pub fn heat_to_surface(&self) -> PortRef<f64> {
        self.heat_to_surface.port()
    }
}

impl Module for ConvectiveHeatTransfer {
    fn label(&self) -> &str {
        &self.label
    }

    fn build(&mut self, ctx: &BuildContext) -> EngineResult<()> {
        let alpha = take_input(&mut self.alpha, &self.label, "alpha")?;
        let ts = take_input(&mut self.temp_surface, &self.label, "temp_surface")?;
        let tf = take_input(&mut self.temp_fluid, &self.label, "temp_fluid")?;

        let area = self.area;
        let (alpha2, ts2, tf2) = (alpha.clone(), ts.clone(), tf.clone());
        let flow = ctx.derived(
            &format!("{}.flow", self.label),
            &[alpha.node(), ts.node(), tf.node()],
            move |t| Ok(newton_cooling(alpha2.get(t)?, area, ts2.get(t)?, tf2.get(t)?)),
        );
        self.heat_to_fluid.bind(&flow)?;
        self.heat_to_surface
            .bind(&ctx.invert(&format!("{}.reverse", self.label), &flow))
    }
}

/// Convection with the film coefficient derived from the temperature
/// difference itself, `c * |Ts - Tf|^0.25`.
pub struct NaturalConvectiveHeatTransfer {
    inner: ConvectiveHeatTransfer,
    c_value: f64,
    pub temp_surface: Option<PortRef<f64>>,
    pub temp_fluid: Option<PortRef<f64>>,
}

impl NaturalConvectiveHeatTransfer {
    /// `c_value` grades the convection strength; see the constants on
    /// [`crate::functions`].
    pub fn new(ctx: &BuildContext, label: &str, c_value: f64, area: f64) -> Self {
        Self {
            inner: ConvectiveHeatTransfer::new(ctx, label, area),
            c_value,
            temp_surface: None,
            temp_fluid: None,
        }
    }

    pub fn heat_to_fluid(&self) -> PortRef<f64> {
        self.inner.heat_to_fluid()
    }

    pub fn heat_to_surface(&self) -> PortRef<f64> {
        self.inner.heat_to_surface()
    }
}

impl Module for NaturalConvectiveHeatTransfer {
    fn label(&self) -> &str {
        self.inner.label()
    }

    fn build(&mut self, ctx: &BuildContext) -> EngineResult<()> {
        let label = self.inner.label().to_string();
        let ts = take_input(&mut self.temp_surface, &label, "temp_surface")?;
        let tf = take_input(&mut self.temp_fluid, &label, "temp_fluid")?;

        let c_value = self.c_value;
        let (ts2, tf2) = (ts.clone(), tf.clone());
        let alpha = ctx.derived(
            &format!("{label}.alpha"),
            &[ts.node(), tf.node()],
            move |t| Ok(natural_convective_rate(c_value, ts2.get(t)?, tf2.get(t)?)),
        );

        self.inner.alpha = Some(alpha);
        self.inner.temp_surface = Some(ts);
        self.inner.temp_fluid = Some(tf);
        self.inner.build(ctx)
    }
}
