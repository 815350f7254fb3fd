//! Sun position from the calendar and site coordinates.

use envgraph_core::{BuildContext, EngineResult, ForwardPort, Module, PortRef};

use crate::functions::{solar_position, SolarPosition};

/// Computes solar elevation and azimuth [deg] per tick from calendar
/// ports and the site latitude/longitude.
pub struct SolarPositionModule {
    label: String,
    lat_deg: f64,
    lon_deg: f64,
    pub day_of_year: Option<PortRef<u32>>,
    pub hour: Option<PortRef<u32>>,
    pub minute: Option<PortRef<u32>>,
    pub second: Option<PortRef<u32>>,
    elevation: ForwardPort<f64>,
    azimuth: ForwardPort<f64>,
}

impl SolarPositionModule {
    pub fn new(ctx: &BuildContext, label: &str, lat_deg: f64, lon_deg: f64) -> Self {
        Self {
            label: label.to_string(),
            lat_deg,
            lon_deg,
            day_of_year: None,
            hour: None,
            minute: None,
            second: None,
            elevation: ctx.forward(&format!("{label}.elevation")),
            azimuth: ctx.forward(&format!("{label}.azimuth")),
        }
    }

    /// Wire all four time inputs from a calendar in one go.
    pub fn set_calendar(&mut self, calendar: &super::Calendar) {
        self.day_of_year = Some(calendar.day_of_year());
        self.hour = Some(calendar.hour());
        self.minute = Some(calendar.minute());
        self.second = Some(calendar.second());
    }

    /// Solar elevation above the horizon [deg], zero at night.
    pub fn elevation(&self) -> PortRef<f64> {
        self.elevation.port()
    }

    /// Solar azimuth from due south, west positive [deg].
    pub fn azimuth(&self) -> PortRef<f64> {
        self.azimuth.port()
    }
}

impl Module for SolarPositionModule {
    fn label(&self) -> &str {
        &self.label
    }

    fn build(&mut self, ctx: &BuildContext) -> EngineResult<()> {
        let day = super::take_input(&mut self.day_of_year, &self.label, "day_of_year")?;
        let hour = super::take_input(&mut self.hour, &self.label, "hour")?;
        let minute = super::take_input(&mut self.minute, &self.label, "minute")?;
        let second = super::take_input(&mut self.second, &self.label, "second")?;

        let (lat, lon) = (self.lat_deg, self.lon_deg);
        let inputs = [day.node(), hour.node(), minute.node(), second.node()];
        let position: PortRef<SolarPosition> =
            ctx.derived(&format!("{}.position", self.label), &inputs, move |t| {
                Ok(solar_position(
                    lat,
                    lon,
                    day.get(t)?,
                    hour.get(t)?,
                    minute.get(t)?,
                    second.get(t)?,
                ))
            });

        let pos = position.clone();
        self.elevation.bind(&ctx.derived(
            &format!("{}.elevation_deg", self.label),
            &[position.node()],
            move |t| Ok(pos.get(t)?.elevation_deg),
        ))?;
        let pos = position.clone();
        self.azimuth.bind(&ctx.derived(
            &format!("{}.azimuth_deg", self.label),
            &[position.node()],
            move |t| Ok(pos.get(t)?.azimuth_deg),
        ))
    }
}
