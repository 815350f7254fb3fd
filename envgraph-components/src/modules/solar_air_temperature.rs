//! Sol-air temperature of an opaque exterior surface.

use envgraph_core::{BuildContext, EngineResult, ForwardPort, Module, PortRef};

use crate::functions::{brunt_effective_radiation, solar_air_temperature, SurfaceOrientation};
use crate::modules::{take_input, TiltedSolarRadiation};

/// Default short-wave absorptance of an opaque exterior finish.
const ABSORPTANCE: f64 = 0.7;

/// Default long-wave emissivity.
const EMISSIVITY: f64 = 0.9;

/// Default outside film coefficient [W/(m2 K)].
const ALPHA_OUT: f64 = 23.0;

/// Water vapor partial pressure assumed for the nocturnal radiation [mmHg].
const VAPOR_PRESSURE: f64 = 4.28;

/// High-cloud correction constant and cover assumed for clear-ish skies.
const CLOUD_HEIGHT_FACTOR: f64 = 0.8;
const CLOUD_COVER: f64 = 1.0;

/// Combines outside air temperature, incident solar radiation and Brunt
/// nocturnal radiation into the sol-air temperature of a tilted surface.
pub struct SolarAirTemperature {
    label: String,
    orientation: SurfaceOrientation,
    tilted: TiltedSolarRadiation,
    pub temp_out: Option<PortRef<f64>>,
    incident: ForwardPort<f64>,
    effective_radiation: ForwardPort<f64>,
    temperature: ForwardPort<f64>,
}

impl SolarAirTemperature {
    pub fn new(
        ctx: &BuildContext,
        label: &str,
        orientation: SurfaceOrientation,
        ground_reflectance: f64,
    ) -> Self {
        Self {
            label: label.to_string(),
            orientation,
            tilted: TiltedSolarRadiation::new(
                ctx,
                &format!("{label}.tilted"),
                orientation,
                ground_reflectance,
            ),
            temp_out: None,
            incident: ctx.forward(&format!("{label}.incident")),
            effective_radiation: ctx.forward(&format!("{label}.effective_radiation")),
            temperature: ctx.forward(&format!("{label}.temperature")),
        }
    }

    /// Wire the sky inputs shared with the tilted-radiation stage.
    pub fn set_sky(
        &mut self,
        global_horizontal: PortRef<f64>,
        elevation: PortRef<f64>,
        azimuth: PortRef<f64>,
        day_of_year: PortRef<u32>,
    ) {
        self.tilted.global_horizontal = Some(global_horizontal);
        self.tilted.elevation = Some(elevation);
        self.tilted.azimuth = Some(azimuth);
        self.tilted.day_of_year = Some(day_of_year);
    }

    /// Total incident solar radiation on the surface [W/m2].
    pub fn incident(&self) -> PortRef<f64> {
        self.incident.port()
    }

    /// Brunt effective (nocturnal) radiation leaving the surface [W/m2].
    pub fn effective_radiation(&self) -> PortRef<f64> {
        self.effective_radiation.port()
    }

    /// The sol-air temperature [K].
    pub fn temperature(&self) -> PortRef<f64> {
        self.temperature.port()
    }
}

impl Module for SolarAirTemperature {
    fn label(&self) -> &str {
        &self.label
    }

    fn build(&mut self, ctx: &BuildContext) -> EngineResult<()> {
        let t_out = take_input(&mut self.temp_out, &self.label, "temp_out")?;
        self.tilted.build(ctx)?;

        let incident = ctx.add(
            &format!("{}.incident_total", self.label),
            &self.tilted.direct(),
            &self.tilted.diffuse(),
        );
        self.incident.bind(&incident)?;

        let tilt_deg = self.orientation.tilt_deg;
        let t_out2 = t_out.clone();
        let effective = ctx.derived(
            &format!("{}.brunt", self.label),
            &[t_out.node()],
            move |t| {
                Ok(brunt_effective_radiation(
                    t_out2.get(t)?,
                    VAPOR_PRESSURE,
                    CLOUD_HEIGHT_FACTOR,
                    CLOUD_COVER,
                    tilt_deg,
                ))
            },
        );
        self.effective_radiation.bind(&effective)?;

        let (t2, i2, e2) = (t_out.clone(), incident.clone(), effective.clone());
        self.temperature.bind(&ctx.derived(
            &format!("{}.sat", self.label),
            &[t_out.node(), incident.node(), effective.node()],
            move |t| {
                Ok(solar_air_temperature(
                    t2.get(t)?,
                    i2.get(t)?,
                    e2.get(t)?,
                    ABSORPTANCE,
                    EMISSIVITY,
                    ALPHA_OUT,
                ))
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::{Calendar, SolarPositionModule};

    #[test]
    fn sunny_noon_exceeds_air_temperature_and_clear_night_drops_below() {
        let ctx = BuildContext::new();
        let mut cal = Calendar::new(&ctx, "cal", 171, 1, 3600);
        cal.build(&ctx).unwrap();
        let mut sun = SolarPositionModule::new(&ctx, "sun", 34.643139, 134.997222);
        sun.set_calendar(&cal);
        sun.build(&ctx).unwrap();

        let mut sat = SolarAirTemperature::new(
            &ctx,
            "south_wall",
            SurfaceOrientation::vertical(0.0),
            0.25,
        );
        // A crude day: no sun at midnight, strong sun at noon.
        let radiation = ctx.from_fn("sol", |t| {
            Ok(if (9..=15).contains(&(t % 24)) { 700.0 } else { 0.0 })
        });
        sat.set_sky(radiation, sun.elevation(), sun.azimuth(), cal.day_of_year());
        sat.temp_out = Some(ctx.constant("outside", 300.0));
        sat.build(&ctx).unwrap();
        ctx.validate().unwrap();

        assert!(sat.temperature().get(12).unwrap() > 300.0);
        // At night only the long-wave loss remains.
        assert_eq!(sat.incident().get(0).unwrap(), 0.0);
        assert!(sat.temperature().get(0).unwrap() < 300.0);
    }
}
