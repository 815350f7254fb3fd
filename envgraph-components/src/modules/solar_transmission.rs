//! Radiation on tilted surfaces and transmission through glazing.

use envgraph_core::{BuildContext, EngineResult, ForwardPort, Module, PortRef};

use crate::functions::{
    diffuse_fraction, extraterrestrial_normal, incident_angle_cosine, tilted_diffuse_radiation,
    window_diffuse_transmittance, window_direct_transmittance, SolarPosition, SurfaceOrientation,
};
use crate::modules::take_input;

/// Sun below this elevation sine contributes no direct beam; guards the
/// direct-normal division near sunrise and sunset.
const MIN_SIN_ELEVATION: f64 = 0.01;

/// Direct and diffuse radiation arriving on a tilted surface [W/m2].
///
/// Splits global horizontal radiation into direct and diffuse through the
/// clear-sky index, then projects both onto the surface.
pub struct TiltedSolarRadiation {
    label: String,
    orientation: SurfaceOrientation,
    ground_reflectance: f64,
    pub global_horizontal: Option<PortRef<f64>>,
    pub elevation: Option<PortRef<f64>>,
    pub azimuth: Option<PortRef<f64>>,
    pub day_of_year: Option<PortRef<u32>>,
    incidence_cosine: ForwardPort<f64>,
    direct: ForwardPort<f64>,
    diffuse: ForwardPort<f64>,
}

impl TiltedSolarRadiation {
    pub fn new(
        ctx: &BuildContext,
        label: &str,
        orientation: SurfaceOrientation,
        ground_reflectance: f64,
    ) -> Self {
        Self {
            label: label.to_string(),
            orientation,
            ground_reflectance,
            global_horizontal: None,
            elevation: None,
            azimuth: None,
            day_of_year: None,
            incidence_cosine: ctx.forward(&format!("{label}.incidence_cosine")),
            direct: ctx.forward(&format!("{label}.direct")),
            diffuse: ctx.forward(&format!("{label}.diffuse")),
        }
    }

    /// Cosine of the direct beam's incidence angle, zero when the sun is
    /// behind the surface.
    pub fn incidence_cosine(&self) -> PortRef<f64> {
        self.incidence_cosine.port()
    }

    /// Direct radiation on the surface [W/m2].
    pub fn direct(&self) -> PortRef<f64> {
        self.direct.port()
    }

    /// Sky and ground-reflected diffuse radiation on the surface [W/m2].
    pub fn diffuse(&self) -> PortRef<f64> {
        self.diffuse.port()
    }
}

impl Module for TiltedSolarRadiation {
    fn label(&self) -> &str {
        &self.label
    }

    fn build(&mut self, ctx: &BuildContext) -> EngineResult<()> {
        let global = take_input(&mut self.global_horizontal, &self.label, "global_horizontal")?;
        let elevation = take_input(&mut self.elevation, &self.label, "elevation")?;
        let azimuth = take_input(&mut self.azimuth, &self.label, "azimuth")?;
        let day = take_input(&mut self.day_of_year, &self.label, "day_of_year")?;

        // Diffuse horizontal component via the clear-sky index.
        let (g, e, d) = (global.clone(), elevation.clone(), day.clone());
        let diffuse_h = ctx.derived(
            &format!("{}.diffuse_horizontal", self.label),
            &[global.node(), elevation.node(), day.node()],
            move |t| {
                let h = g.get(t)?;
                let i0 = extraterrestrial_normal(d.get(t)?, e.get(t)?);
                if i0 <= 0.0 {
                    return Ok(h);
                }
                Ok(diffuse_fraction(h / i0) * h)
            },
        );

        // Direct beam, normal to the sun.
        let (g, e, dh) = (global.clone(), elevation.clone(), diffuse_h.clone());
        let direct_normal = ctx.derived(
            &format!("{}.direct_normal", self.label),
            &[global.node(), elevation.node(), diffuse_h.node()],
            move |t| {
                let sin_h = (e.get(t)?.to_radians()).sin();
                if sin_h <= MIN_SIN_ELEVATION {
                    return Ok(0.0);
                }
                Ok(((g.get(t)? - dh.get(t)?) / sin_h).max(0.0))
            },
        );

        let orientation = self.orientation;
        let (e, a) = (elevation.clone(), azimuth.clone());
        let cosine = ctx.derived(
            &format!("{}.cosine", self.label),
            &[elevation.node(), azimuth.node()],
            move |t| {
                let sun = SolarPosition {
                    elevation_deg: e.get(t)?,
                    azimuth_deg: a.get(t)?,
                };
                Ok(incident_angle_cosine(orientation, sun))
            },
        );
        self.incidence_cosine.bind(&cosine)?;
        self.direct.bind(&ctx.multiply(
            &format!("{}.direct_tilted", self.label),
            &cosine,
            &direct_normal,
        ))?;

        let sky_factor = self.orientation.shape_factor_to_sky();
        let rho = self.ground_reflectance;
        let (e, dn, dh) = (elevation.clone(), direct_normal.clone(), diffuse_h.clone());
        self.diffuse.bind(&ctx.derived(
            &format!("{}.diffuse_tilted", self.label),
            &[elevation.node(), direct_normal.node(), diffuse_h.node()],
            move |t| {
                Ok(tilted_diffuse_radiation(
                    sky_factor,
                    rho,
                    e.get(t)?,
                    dn.get(t)?,
                    dh.get(t)?,
                ))
            },
        ))
    }
}

/// Solar heat transmitted through a window [W].
pub struct SolarTransmission {
    label: String,
    area: f64,
    tau_normal: f64,
    pub direct_tilted: Option<PortRef<f64>>,
    pub diffuse_tilted: Option<PortRef<f64>>,
    pub incidence_cosine: Option<PortRef<f64>>,
    heat: ForwardPort<f64>,
}

impl SolarTransmission {
    /// `tau_normal` is the glazing transmittance at normal incidence.
    pub fn new(ctx: &BuildContext, label: &str, area: f64, tau_normal: f64) -> Self {
        Self {
            label: label.to_string(),
            area,
            tau_normal,
            direct_tilted: None,
            diffuse_tilted: None,
            incidence_cosine: None,
            heat: ctx.forward(&format!("{label}.heat")),
        }
    }

    /// Wire the three radiation inputs from a tilted-radiation module.
    pub fn set_radiation(&mut self, radiation: &TiltedSolarRadiation) {
        self.direct_tilted = Some(radiation.direct());
        self.diffuse_tilted = Some(radiation.diffuse());
        self.incidence_cosine = Some(radiation.incidence_cosine());
    }

    /// Transmitted solar gain [W].
    pub fn heat(&self) -> PortRef<f64> {
        self.heat.port()
    }
}

impl Module for SolarTransmission {
    fn label(&self) -> &str {
        &self.label
    }

    fn build(&mut self, ctx: &BuildContext) -> EngineResult<()> {
        let direct = take_input(&mut self.direct_tilted, &self.label, "direct_tilted")?;
        let diffuse = take_input(&mut self.diffuse_tilted, &self.label, "diffuse_tilted")?;
        let cosine = take_input(&mut self.incidence_cosine, &self.label, "incidence_cosine")?;

        let (area, tau_n) = (self.area, self.tau_normal);
        let (dr, df, cs) = (direct.clone(), diffuse.clone(), cosine.clone());
        self.heat.bind(&ctx.derived(
            &format!("{}.transmitted", self.label),
            &[direct.node(), diffuse.node(), cosine.node()],
            move |t| {
                let (id, idf) = (dr.get(t)?, df.get(t)?);
                if id + idf <= 0.0 {
                    return Ok(0.0);
                }
                let tau_d = window_direct_transmittance(tau_n, cs.get(t)?);
                let tau_s = window_diffuse_transmittance(tau_n);
                Ok(area * (tau_d * id + tau_s * idf))
            },
        ))
    }
}

/// Distribute a room's transmitted solar gain over one absorbing surface:
/// `share` of the total, spread over `area`, as a flux [W/m2] times the
/// surface area gives the absorbed flow [W].
pub fn distribute_over_surface(
    ctx: &BuildContext,
    label: &str,
    transmitted: &PortRef<f64>,
    share: f64,
) -> PortRef<f64> {
    ctx.scale(label, share, transmitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::{Calendar, SolarPositionModule};
    use envgraph_core::BuildContext;

    fn sun_and_calendar(ctx: &BuildContext) -> (Calendar, SolarPositionModule) {
        let mut cal = Calendar::new(ctx, "cal", 171, 1, 3600);
        cal.build(ctx).unwrap();
        let mut sun = SolarPositionModule::new(ctx, "sun", 34.643139, 134.997222);
        sun.set_calendar(&cal);
        sun.build(ctx).unwrap();
        (cal, sun)
    }

    #[test]
    fn a_roof_splits_global_radiation_without_gaining_energy() {
        let ctx = BuildContext::new();
        let (cal, sun) = sun_and_calendar(&ctx);

        let mut tilt = TiltedSolarRadiation::new(
            &ctx,
            "roof",
            SurfaceOrientation::horizontal(),
            0.0,
        );
        tilt.global_horizontal = Some(ctx.constant("sol", 900.0));
        tilt.elevation = Some(sun.elevation());
        tilt.azimuth = Some(sun.azimuth());
        tilt.day_of_year = Some(cal.day_of_year());
        tilt.build(&ctx).unwrap();
        ctx.validate().unwrap();

        // At noon the direct and diffuse parts of a horizontal surface
        // reassemble the global horizontal value.
        let total = tilt.direct().get(12).unwrap() + tilt.diffuse().get(12).unwrap();
        assert!((total - 900.0).abs() < 30.0);
        assert!(tilt.direct().get(12).unwrap() > tilt.diffuse().get(12).unwrap());
    }

    #[test]
    fn night_radiation_transmits_nothing() {
        let ctx = BuildContext::new();
        let (cal, sun) = sun_and_calendar(&ctx);

        let mut tilt = TiltedSolarRadiation::new(
            &ctx,
            "window_plane",
            SurfaceOrientation::vertical(0.0),
            0.25,
        );
        tilt.global_horizontal = Some(ctx.constant("sol", 0.0));
        tilt.elevation = Some(sun.elevation());
        tilt.azimuth = Some(sun.azimuth());
        tilt.day_of_year = Some(cal.day_of_year());
        tilt.build(&ctx).unwrap();

        let mut window = SolarTransmission::new(&ctx, "window", 2.0, 0.8);
        window.set_radiation(&tilt);
        window.build(&ctx).unwrap();

        assert_eq!(window.heat().get(0).unwrap(), 0.0);
        assert_eq!(window.heat().get(12).unwrap(), 0.0);
    }

    #[test]
    fn a_south_window_gains_through_the_day() {
        let ctx = BuildContext::new();
        let (cal, sun) = sun_and_calendar(&ctx);

        let mut tilt = TiltedSolarRadiation::new(
            &ctx,
            "window_plane",
            SurfaceOrientation::vertical(0.0),
            0.25,
        );
        tilt.global_horizontal = Some(ctx.constant("sol", 500.0));
        tilt.elevation = Some(sun.elevation());
        tilt.azimuth = Some(sun.azimuth());
        tilt.day_of_year = Some(cal.day_of_year());
        tilt.build(&ctx).unwrap();

        let mut window = SolarTransmission::new(&ctx, "window", 2.0, 0.8);
        window.set_radiation(&tilt);
        window.build(&ctx).unwrap();

        let noon = window.heat().get(12).unwrap();
        assert!(noon > 0.0);
        // Half of it lands on a surface with share 0.5.
        let absorbed = distribute_over_surface(&ctx, "floor_share", &window.heat(), 0.5);
        assert_eq!(absorbed.get(12).unwrap(), noon / 2.0);
    }
}
