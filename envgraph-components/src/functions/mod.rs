//! Pure scalar physics. Everything here is a plain function of `f64`
//! arguments; the graph wiring lives in [`crate::modules`].

mod heat;
mod series;
mod solar;

pub use heat::{
    celsius_to_kelvin, fourier, heat_to_temperature, kelvin_to_celsius, natural_convective_rate,
    newton_cooling, overall_transmission, stefan_boltzmann, temperature_to_heat,
    ventilation_heat_transfer, C_HEATING_CEIL_OR_COOLING_FLOOR, C_HEATING_FLOOR_OR_COOLING_CEIL,
    C_VERTICAL_SURFACE, CPV_AIR, CPV_GYPSUM_BOARD,
};
pub use series::interpolate_hourly;
pub use solar::{
    brunt_effective_radiation, diffuse_fraction, extraterrestrial_normal, incident_angle_cosine,
    solar_air_temperature, solar_position, tilted_diffuse_radiation, window_diffuse_transmittance,
    window_direct_transmittance, SolarPosition, SurfaceOrientation,
};
