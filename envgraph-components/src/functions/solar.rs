//! Solar geometry and radiation: sun position, direct/diffuse separation,
//! tilted-surface radiation, window transmission, nocturnal radiation and
//! the sol-air temperature.

use std::f64::consts::PI;

const TO_RAD: f64 = PI / 180.0;
const TO_DEG: f64 = 180.0 / PI;

/// Ephemeris epoch offset used by the declination series (years past 1968).
const EPOCH_YEARS: i64 = 2014 - 1968;

/// Reference meridian of the local standard time zone (Akashi, JST) [deg].
const STANDARD_MERIDIAN_DEG: f64 = 135.0;

/// Solar elevation and azimuth, both in degrees. Azimuth is measured from
/// due south, west positive; elevation is clamped at the horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
}

/// Tilt and azimuth of a receiving surface, in degrees. A vertical wall has
/// tilt 90, a horizontal roof tilt 0; azimuth follows the solar convention
/// (south 0, west positive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceOrientation {
    pub tilt_deg: f64,
    pub azimuth_deg: f64,
}

impl SurfaceOrientation {
    pub fn vertical(azimuth_deg: f64) -> Self {
        Self {
            tilt_deg: 90.0,
            azimuth_deg,
        }
    }

    pub fn horizontal() -> Self {
        Self {
            tilt_deg: 0.0,
            azimuth_deg: 0.0,
        }
    }

    /// Fraction of the sky dome seen by the surface.
    pub fn shape_factor_to_sky(&self) -> f64 {
        (1.0 + (self.tilt_deg * TO_RAD).cos()) / 2.0
    }
}

/// Sun position for a site at `lat_deg`/`lon_deg` on `day_of_year` (1-366)
/// at local standard time `hour`:`minute`:`second`.
///
/// Declination and the equation of time come from a truncated orbital
/// series; good to a fraction of a degree, which is ample for irradiance
/// work on building surfaces.
pub fn solar_position(
    lat_deg: f64,
    lon_deg: f64,
    day_of_year: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> SolarPosition {
    let lat = lat_deg * TO_RAD;
    let lon = lon_deg * TO_RAD;

    // Declination from the mean anomaly series.
    let n = EPOCH_YEARS;
    let d0 = 3.71 + 0.2596 * n as f64 - ((n + 3) / 4) as f64;
    let m = 360.0 / 365.2596 * (day_of_year as f64 - d0);
    let eps = 12.3901 + 0.0172 * (n as f64 + m / 360.0);
    let v = m + 1.914 * (m * TO_RAD).sin() + 0.02 * (2.0 * m * TO_RAD).sin();
    let v_eps = (v + eps) * TO_RAD;
    let sin_decl = (-23.4393 * TO_RAD).sin() * v_eps.cos();
    let cos_decl = (1.0 - sin_decl * sin_decl).sqrt();

    // Equation of time [deg].
    let et = (m - v)
        - (0.043 * (2.0 * v_eps).sin())
            .atan2(1.0 - 0.043 * (2.0 * v_eps).cos())
            * TO_DEG;

    // Hour angle [rad], zero at local solar noon.
    let tm = hour as f64 + minute as f64 / 60.0 + second as f64 / 3600.0;
    let hour_angle = (15.0 * (tm - 12.0) + et) * TO_RAD + (lon - STANDARD_MERIDIAN_DEG * TO_RAD);

    let sin_h = lat.sin() * sin_decl + lat.cos() * cos_decl * hour_angle.cos();
    let elevation = sin_h.asin().max(0.0);

    let azimuth = if elevation > 0.0 {
        let cos_a = ((sin_h * lat.sin() - sin_decl) / (elevation.cos() * lat.cos())).clamp(-1.0, 1.0);
        hour_angle.signum() * cos_a.acos()
    } else {
        0.0
    };

    SolarPosition {
        elevation_deg: elevation * TO_DEG,
        azimuth_deg: azimuth * TO_DEG,
    }
}

/// Extraterrestrial irradiance on a horizontal plane [W/m2].
///
/// The solar constant scaled by the earth-sun distance factor and the sine
/// of the elevation, clamped at zero below the horizon.
pub fn extraterrestrial_normal(day_of_year: u32, elevation_deg: f64) -> f64 {
    let omega = 2.0 * PI / 365.0;
    let j = day_of_year as f64 + 0.5;
    let orbit = 1.00011
        + 0.034221 * (omega * j).cos()
        + 0.001280 * (omega * j).sin()
        + 0.000719 * (2.0 * omega * j).cos()
        + 0.000077 * (2.0 * omega * j).sin();
    (1367.0 * orbit * (elevation_deg * TO_RAD).sin()).max(0.0)
}

/// Diffuse fraction of global horizontal radiation as a piecewise
/// polynomial in the clear-sky index (global over extraterrestrial).
pub fn diffuse_fraction(clear_sky_index: f64) -> f64 {
    let csi = clear_sky_index;
    if csi < 0.22 {
        1.0 - 0.99 * csi
    } else if csi <= 0.80 {
        0.9511 - 0.1604 * csi + 4.388 * csi.powi(2) - 16.638 * csi.powi(3) + 12.366 * csi.powi(4)
    } else {
        0.165
    }
}

/// Cosine of the incidence angle of direct radiation on a tilted surface,
/// clamped at zero when the sun is behind the surface or below the horizon.
pub fn incident_angle_cosine(surface: SurfaceOrientation, sun: SolarPosition) -> f64 {
    let tilt = surface.tilt_deg * TO_RAD;
    let w_w = tilt.sin() * (surface.azimuth_deg * TO_RAD).sin();
    let w_s = tilt.sin() * (surface.azimuth_deg * TO_RAD).cos();

    let h = sun.elevation_deg * TO_RAD;
    let a = sun.azimuth_deg * TO_RAD;

    let sin_h = h.sin();
    let (s_w, s_s) = if sin_h > 0.0 {
        (h.cos() * a.sin(), h.cos() * a.cos())
    } else {
        (0.0, 0.0)
    };

    (sin_h * tilt.cos() + s_w * w_w + s_s * w_s).max(0.0)
}

/// Diffuse radiation arriving on a tilted surface [W/m2]: the sky portion
/// seen through the surface's sky shape factor plus ground reflection of
/// the total horizontal radiation.
pub fn tilted_diffuse_radiation(
    shape_factor_to_sky: f64,
    ground_reflectance: f64,
    elevation_deg: f64,
    direct_normal: f64,
    diffuse_horizontal: f64,
) -> f64 {
    let sky = shape_factor_to_sky * diffuse_horizontal;
    let sin_h = (elevation_deg * TO_RAD).sin();
    let ground = ground_reflectance
        * (1.0 - shape_factor_to_sky)
        * (direct_normal * sin_h + diffuse_horizontal);
    sky + ground
}

/// Transmittance of glazing for direct radiation at a given incidence
/// cosine, normalized so that normal incidence returns `tau_normal`.
pub fn window_direct_transmittance(tau_normal: f64, cos_incidence: f64) -> f64 {
    let c = cos_incidence;
    tau_normal * (2.392 * c - 3.8636 * c.powi(3) + 3.7568 * c.powi(5) - 1.3965 * c.powi(7)) / 0.88
}

/// Transmittance of glazing for diffuse radiation.
pub fn window_diffuse_transmittance(tau_normal: f64) -> f64 {
    const CD: f64 = 0.92;
    CD * tau_normal
}

/// Brunt's nocturnal (effective) radiation [W/m2].
///
/// `t_air` is the near-ground air temperature [K], `vapor_pressure` the
/// water vapor partial pressure [mmHg], `cloud_height_factor` the cloud
/// correction constant (high cloud 0.8, middle 0.3, low 0.15),
/// `cloud_cover` in tenths (clear 0 to overcast 10). The tilt factor maps
/// the horizontal value onto the receiving surface.
pub fn brunt_effective_radiation(
    t_air: f64,
    vapor_pressure: f64,
    cloud_height_factor: f64,
    cloud_cover: f64,
    tilt_deg: f64,
) -> f64 {
    let clear_sky = 5.67 * (t_air / 100.0).powi(4) * (0.474 - 0.076 * vapor_pressure.sqrt());
    let clouded = clear_sky * (1.0 - (1.0 - cloud_height_factor) * cloud_cover / 10.0);
    let tilt_factor = (1.0 + (tilt_deg * TO_RAD).cos()) / 2.0;
    tilt_factor * clouded
}

/// Sol-air temperature [K]: the fictitious outdoor temperature whose
/// convective gain equals the combined convective, solar and long-wave
/// loads on the surface.
///
/// `absorptance` is the short-wave absorptance, `emissivity` the long-wave
/// emissivity, `alpha_out` the outside film coefficient [W/(m2 K)].
pub fn solar_air_temperature(
    t_out: f64,
    incident_solar: f64,
    effective_radiation: f64,
    absorptance: f64,
    emissivity: f64,
    alpha_out: f64,
) -> f64 {
    t_out + (absorptance * incident_solar - emissivity * effective_radiation) / alpha_out
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    const OSAKA_LAT: f64 = 34.643139;
    const OSAKA_LON: f64 = 134.997222;

    #[test]
    fn summer_noon_sun_is_high_and_near_south() {
        // Day 172 is close to the solstice.
        let pos = solar_position(OSAKA_LAT, OSAKA_LON, 172, 12, 0, 0);
        assert!(pos.elevation_deg > 70.0 && pos.elevation_deg <= 90.0);
        assert!(pos.azimuth_deg.abs() < 15.0);
    }

    #[test]
    fn night_sun_is_clamped_to_the_horizon() {
        let pos = solar_position(OSAKA_LAT, OSAKA_LON, 172, 0, 0, 0);
        assert_eq!(pos.elevation_deg, 0.0);
        assert_eq!(pos.azimuth_deg, 0.0);
    }

    #[test]
    fn morning_sun_is_east_of_south_and_climbing() {
        let nine = solar_position(OSAKA_LAT, OSAKA_LON, 172, 9, 0, 0);
        let eleven = solar_position(OSAKA_LAT, OSAKA_LON, 172, 11, 0, 0);
        assert!(nine.azimuth_deg < 0.0);
        assert!(nine.elevation_deg > 0.0);
        assert!(eleven.elevation_deg > nine.elevation_deg);
    }

    #[test]
    fn winter_noon_is_lower_than_summer_noon() {
        let summer = solar_position(OSAKA_LAT, OSAKA_LON, 172, 12, 0, 0);
        let winter = solar_position(OSAKA_LAT, OSAKA_LON, 355, 12, 0, 0);
        assert!(winter.elevation_deg > 20.0);
        assert!(winter.elevation_deg < summer.elevation_deg - 40.0);
    }

    #[test]
    fn diffuse_fraction_is_continuous_enough_and_bounded() {
        // Overcast skies are all diffuse, clear skies mostly direct.
        assert!(is_close!(diffuse_fraction(0.0), 1.0));
        assert!(diffuse_fraction(0.1) > 0.85);
        assert_eq!(diffuse_fraction(0.9), 0.165);
        for i in 0..=100 {
            let f = diffuse_fraction(i as f64 / 100.0);
            assert!((0.16..=1.0).contains(&f));
        }
    }

    #[test]
    fn extraterrestrial_is_zero_at_night_and_about_the_solar_constant_overhead() {
        assert_eq!(extraterrestrial_normal(172, 0.0), 0.0);
        let overhead = extraterrestrial_normal(172, 90.0);
        assert!((1280.0..1400.0).contains(&overhead));
        // Perihelion in January beats aphelion in July.
        assert!(extraterrestrial_normal(3, 90.0) > extraterrestrial_normal(185, 90.0));
    }

    #[test]
    fn incidence_on_a_horizontal_surface_is_the_elevation_sine() {
        let sun = SolarPosition {
            elevation_deg: 30.0,
            azimuth_deg: 45.0,
        };
        let cos = incident_angle_cosine(SurfaceOrientation::horizontal(), sun);
        assert!(is_close!(cos, (30.0 * TO_RAD).sin(), rel_tol = 1e-12));
    }

    #[test]
    fn sun_behind_a_wall_contributes_nothing() {
        let sun = SolarPosition {
            elevation_deg: 30.0,
            azimuth_deg: 0.0,
        };
        // North-facing vertical wall, sun due south.
        let cos = incident_angle_cosine(SurfaceOrientation::vertical(180.0), sun);
        assert_eq!(cos, 0.0);
    }

    #[test]
    fn south_wall_sees_a_low_south_sun_almost_head_on() {
        let sun = SolarPosition {
            elevation_deg: 5.0,
            azimuth_deg: 0.0,
        };
        let cos = incident_angle_cosine(SurfaceOrientation::vertical(0.0), sun);
        assert!(cos > 0.99);
    }

    #[test]
    fn tilted_diffuse_reduces_to_sky_radiation_on_a_roof() {
        // Horizontal surface: full sky view, no ground term.
        let q = tilted_diffuse_radiation(1.0, 0.25, 30.0, 500.0, 100.0);
        assert_eq!(q, 100.0);
        // Vertical wall: half sky, plus reflection of the global horizontal.
        let q = tilted_diffuse_radiation(0.5, 0.25, 30.0, 500.0, 100.0);
        let expected = 0.5 * 100.0 + 0.25 * 0.5 * (500.0 * (30.0 * TO_RAD).sin() + 100.0);
        assert!(is_close!(q, expected, rel_tol = 1e-12));
    }

    #[test]
    fn window_transmittance_normalizes_at_normal_incidence() {
        assert!(is_close!(
            window_direct_transmittance(0.8, 1.0),
            0.8,
            rel_tol = 2e-2
        ));
        assert_eq!(window_direct_transmittance(0.8, 0.0), 0.0);
        assert!(is_close!(window_diffuse_transmittance(0.8), 0.736));
    }

    #[test]
    fn brunt_tilt_factor_halves_on_a_vertical_surface() {
        let horizontal = brunt_effective_radiation(288.0, 4.28, 0.8, 1.0, 0.0);
        let vertical = brunt_effective_radiation(288.0, 4.28, 0.8, 1.0, 90.0);
        assert!(horizontal > 0.0);
        assert!(is_close!(vertical, horizontal / 2.0, rel_tol = 1e-12));
    }

    #[test]
    fn sol_air_temperature_rises_with_sun_and_drops_at_night() {
        let day = solar_air_temperature(300.0, 800.0, 0.0, 0.7, 0.9, 23.0);
        assert!(is_close!(day, 300.0 + 0.7 * 800.0 / 23.0, rel_tol = 1e-12));
        let night = solar_air_temperature(290.0, 0.0, 100.0, 0.7, 0.9, 23.0);
        assert!(night < 290.0);
    }
}
