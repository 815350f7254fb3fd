//! Heat transfer relations: conduction, convection, radiation, ventilation
//! and the heat/temperature conversions of a lumped thermal mass.

/// Volumetric specific heat of gypsum board (JIS A 6901) [kJ/(m3 K)].
pub const CPV_GYPSUM_BOARD: f64 = 854.0;

/// Volumetric specific heat of room air [kJ/(m3 K)].
pub const CPV_AIR: f64 = 1.024 * 1.007;

/// Natural convection c value for a vertical surface.
pub const C_VERTICAL_SURFACE: f64 = 1.98;

/// c value for a heated ceiling or a cooled floor (strong convection).
pub const C_HEATING_CEIL_OR_COOLING_FLOOR: f64 = 2.67;

/// c value for a heated floor or a cooled ceiling (weak convection).
pub const C_HEATING_FLOOR_OR_COOLING_CEIL: f64 = 0.755;

/// Fourier conduction through a slab [W].
///
/// `lambda` [W/(m K)], `area` [m2], face temperatures [K], `dx` [m].
/// Positive when heat flows towards face 1 (`t2 > t1`).
pub fn fourier(lambda: f64, area: f64, t1: f64, t2: f64, dx: f64) -> f64 {
    debug_assert!(dx > 0.0);
    -lambda * area * (t1 - t2) / dx
}

/// Newton's law of cooling [W], positive from surface to fluid.
pub fn newton_cooling(alpha_c: f64, area: f64, t_surface: f64, t_fluid: f64) -> f64 {
    alpha_c * area * (t_surface - t_fluid)
}

/// Natural convective heat transfer rate `c * |dT|^0.25` [W/(m2 K)].
pub fn natural_convective_rate(c_value: f64, t_surface: f64, t_fluid: f64) -> f64 {
    let alpha_c = c_value * (t_surface - t_fluid).abs().powf(0.25);
    debug_assert!(!alpha_c.is_nan());
    alpha_c
}

/// Gray-body radiative exchange [W], positive from body 1 to body 2.
///
/// `f12` is the view factor from face 1 to face 2, `e1`/`e2` the
/// emissivities; temperatures in kelvin.
pub fn stefan_boltzmann(f12: f64, e1: f64, e2: f64, t1: f64, t2: f64) -> f64 {
    let q = f12 * e1 * e2 * 5.67 * ((t1 / 100.0).powi(4) - (t2 / 100.0).powi(4));
    debug_assert!(!q.is_nan());
    q
}

/// Steady transmission through a wall of overall coefficient `k` [W].
pub fn overall_transmission(k: f64, area: f64, t1: f64, t2: f64) -> f64 {
    debug_assert!(k > 0.0);
    k * area * (t1 - t2)
}

/// Temperature of a lumped mass holding `heat` joules.
///
/// `cpv` is the volumetric specific heat [kJ/(m3 K)], `volume` [m3].
pub fn heat_to_temperature(cpv: f64, volume: f64, heat: f64) -> f64 {
    heat / (cpv * 1000.0 * volume)
}

/// Heat content of a lumped mass at `temperature` kelvin [J].
pub fn temperature_to_heat(cpv: f64, volume: f64, temperature: f64) -> f64 {
    temperature * cpv * 1000.0 * volume
}

/// Heat carried by an air exchange of `volume` m3/s between two zones [W],
/// positive from zone 1 to zone 2.
pub fn ventilation_heat_transfer(cpv_air: f64, volume: f64, t1: f64, t2: f64) -> f64 {
    cpv_air * volume * (t1 - t2)
}

pub fn kelvin_to_celsius(t: f64) -> f64 {
    t - 273.15
}

pub fn celsius_to_kelvin(t: f64) -> f64 {
    t + 273.15
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn newton_cooling_forty_watts() {
        // alpha 2.0, 2 m2, 10 K difference.
        assert_eq!(newton_cooling(2.0, 2.0, 10.0, 0.0), 40.0);
        assert_eq!(newton_cooling(2.0, 2.0, 0.0, 10.0), -40.0);
    }

    #[test]
    fn natural_convection_matches_the_quarter_power_law() {
        let alpha = natural_convective_rate(1.5, 10.0, 0.0);
        assert!(is_close!(alpha, 2.667419, rel_tol = 1e-6));
        // The full flow through 2 m2 at a 10 K difference.
        let q = newton_cooling(alpha, 2.0, 10.0, 0.0);
        assert!(is_close!(q, 53.348382, abs_tol = 1e-6));
    }

    #[test]
    fn natural_convection_rate_is_symmetric_in_the_difference() {
        assert_eq!(
            natural_convective_rate(1.98, 300.0, 290.0),
            natural_convective_rate(1.98, 290.0, 300.0)
        );
    }

    #[test]
    fn fourier_flows_towards_the_colder_face() {
        // 10 K across 0.1 m of lambda 0.2, 2 m2: 40 W out of face 1.
        assert_eq!(fourier(0.2, 2.0, 10.0, 0.0, 0.1), -40.0);
        assert_eq!(fourier(0.2, 2.0, 0.0, 10.0, 0.1), 40.0);
    }

    #[test]
    fn radiative_exchange_is_antisymmetric() {
        let q = stefan_boltzmann(1.0, 0.9, 0.9, 300.0, 290.0);
        assert!(q > 0.0);
        assert_eq!(stefan_boltzmann(1.0, 0.9, 0.9, 290.0, 300.0), -q);
    }

    #[test]
    fn heat_temperature_round_trip() {
        let heat = temperature_to_heat(1000.0, 0.1, 20.0);
        assert_eq!(heat, 20.0 * 1000.0 * 1000.0 * 0.1);
        assert_eq!(heat_to_temperature(1000.0, 0.1, heat), 20.0);
    }

    #[test]
    fn celsius_kelvin() {
        assert_eq!(celsius_to_kelvin(0.0), 273.15);
        assert_eq!(kelvin_to_celsius(celsius_to_kelvin(21.5)), 21.5);
    }
}
