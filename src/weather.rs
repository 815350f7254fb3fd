//! Hourly weather ingestion.
//!
//! CSV files carry one row per hour: a date column (kept only for human
//! inspection) and a value column. Temperatures arrive in degrees Celsius
//! and are stored in kelvin; global solar radiation arrives in MJ/(m2 h)
//! and is stored in W/m2.

use std::path::Path;

use envgraph_components::functions::{celsius_to_kelvin, interpolate_hourly};
use serde::Deserialize;

use crate::errors::SimError;

/// MJ per square meter per hour to watts per square meter.
const MJ_PER_H_TO_W: f64 = 1000.0 / 3.6;

#[derive(Debug, Deserialize)]
struct TemperatureRow {
    #[allow(dead_code)]
    date: String,
    /// Outside air temperature [degC].
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct RadiationRow {
    #[allow(dead_code)]
    date: String,
    /// Global horizontal radiation [MJ/(m2 h)].
    radiation: f64,
}

/// Hourly outside temperature [K] and global solar radiation [W/m2].
#[derive(Debug, Clone)]
pub struct Weather {
    pub outside_kelvin: Vec<f64>,
    pub global_solar: Vec<f64>,
}

impl Weather {
    /// Load both series from CSV files with `date,temperature` and
    /// `date,radiation` headers.
    pub fn from_csv(
        temperature_path: impl AsRef<Path>,
        radiation_path: impl AsRef<Path>,
    ) -> Result<Self, SimError> {
        let mut outside_kelvin = Vec::new();
        let mut reader = csv::Reader::from_path(temperature_path)?;
        for row in reader.deserialize() {
            let row: TemperatureRow = row?;
            outside_kelvin.push(celsius_to_kelvin(row.temperature));
        }

        let mut global_solar = Vec::new();
        let mut reader = csv::Reader::from_path(radiation_path)?;
        for row in reader.deserialize() {
            let row: RadiationRow = row?;
            global_solar.push(row.radiation * MJ_PER_H_TO_W);
        }

        Ok(Self {
            outside_kelvin,
            global_solar,
        })
    }

    /// A clear synthetic day, repeated: sinusoidal temperature around
    /// `mean_celsius` and a solar arch peaking at `peak_solar` W/m2.
    pub fn synthetic_day(mean_celsius: f64, swing: f64, peak_solar: f64) -> Self {
        let mut outside_kelvin = Vec::with_capacity(24);
        let mut global_solar = Vec::with_capacity(24);
        for hour in 0..24 {
            let phase = (hour as f64 - 14.0) / 24.0 * std::f64::consts::TAU;
            outside_kelvin.push(celsius_to_kelvin(mean_celsius + swing * phase.cos()));
            let sun = ((hour as f64 - 12.0) / 7.0 * std::f64::consts::FRAC_PI_2).cos();
            global_solar.push(if (5..=19).contains(&hour) {
                (peak_solar * sun).max(0.0)
            } else {
                0.0
            });
        }
        Self {
            outside_kelvin,
            global_solar,
        }
    }

    /// Expand both hourly series to tick resolution, checking that they
    /// cover the requested run.
    pub fn expand(
        &self,
        tick_seconds: u32,
        begin_day: u32,
        total_days: u32,
    ) -> Result<(Vec<f64>, Vec<f64>), SimError> {
        let need = ((begin_day + total_days) * 24) as usize;
        let scale = (3600 / tick_seconds) as usize;

        let expand_one = |hourly: &[f64]| -> Result<Vec<f64>, SimError> {
            // A single-day series is treated as a repeating day.
            let repeated;
            let source = if hourly.len() == 24 {
                repeated = hourly.repeat((begin_day + total_days) as usize);
                &repeated
            } else if hourly.len() < need {
                return Err(SimError::WeatherTooShort {
                    got: hourly.len(),
                    need,
                });
            } else {
                hourly
            };
            let expanded = interpolate_hourly(source, scale);
            // Drop the lead-in so tick 0 is the first second of begin_day.
            Ok(expanded[begin_day as usize * 24 * scale..].to_vec())
        };

        Ok((
            expand_one(&self.outside_kelvin)?,
            expand_one(&self.global_solar)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_and_converts_csv_series() {
        let dir = std::env::temp_dir();
        let temp_path = dir.join("envgraph_weather_temp.csv");
        let rad_path = dir.join("envgraph_weather_rad.csv");
        std::fs::File::create(&temp_path)
            .and_then(|mut f| writeln!(f, "date,temperature\n2024-01-01T00,0.0\n2024-01-01T01,10.0"))
            .unwrap();
        std::fs::File::create(&rad_path)
            .and_then(|mut f| writeln!(f, "date,radiation\n2024-01-01T00,0.0\n2024-01-01T01,3.6"))
            .unwrap();

        let weather = Weather::from_csv(&temp_path, &rad_path).unwrap();
        assert_eq!(weather.outside_kelvin, vec![273.15, 283.15]);
        assert_eq!(weather.global_solar, vec![0.0, 1000.0]);
    }

    #[test]
    fn a_garbled_row_is_an_error_not_a_panic() {
        let dir = std::env::temp_dir();
        let temp_path = dir.join("envgraph_weather_bad.csv");
        std::fs::File::create(&temp_path)
            .and_then(|mut f| writeln!(f, "date,temperature\n2024-01-01T00,not-a-number"))
            .unwrap();
        let err = Weather::from_csv(&temp_path, &temp_path).unwrap_err();
        assert!(matches!(err, SimError::Weather(_)));
    }

    #[test]
    fn expansion_scales_and_offsets_to_the_run() {
        let weather = Weather::synthetic_day(10.0, 5.0, 800.0);
        let (outside, solar) = weather.expand(900, 1, 2).unwrap();
        // Two days of 900 s ticks, starting at day 1.
        assert_eq!(outside.len(), 2 * 24 * 4);
        assert_eq!(solar.len(), outside.len());
        assert!(solar.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn a_short_series_is_rejected() {
        let weather = Weather {
            outside_kelvin: vec![273.15; 30],
            global_solar: vec![0.0; 30],
        };
        let err = weather.expand(3600, 0, 2).unwrap_err();
        assert!(matches!(err, SimError::WeatherTooShort { got: 30, need: 48 }));
    }
}
