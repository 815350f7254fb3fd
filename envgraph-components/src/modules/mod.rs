//! Wired thermal modules.
//!
//! Each module follows the same lifecycle: construct with its physical
//! configuration against a [`BuildContext`], fill the input slots, then
//! `build` wires the internal ports and binds the forward outputs. Heat
//! exchange modules publish a pair of flows, one per side, that sum to
//! zero.

mod calendar;
mod conductive;
mod convective;
mod heat_capacity;
mod radiative;
mod solar_air_temperature;
mod solar_position;
mod solar_transmission;
mod steady_wall;
mod unsteady_wall;
mod ventilation;

pub use calendar::Calendar;
pub use conductive::ConductiveHeatTransfer;
pub use convective::{ConvectiveHeatTransfer, NaturalConvectiveHeatTransfer};
pub use heat_capacity::HeatCapacity;
pub use radiative::RadiativeHeatTransfer;
pub use solar_air_temperature::SolarAirTemperature;
pub use solar_position::SolarPositionModule;
pub use solar_transmission::{distribute_over_surface, SolarTransmission, TiltedSolarRadiation};
pub use steady_wall::SteadyWall;
pub use unsteady_wall::{SerialHeatConduction, UnsteadyWall};
pub use ventilation::VentilationHeatTransfer;

use envgraph_core::{EngineError, EngineResult, Gate, PortRef};

/// Move a required input out of its slot, or fail the build with the
/// module and slot name.
pub(crate) fn take_input<T>(
    slot: &mut Option<PortRef<T>>,
    module: &str,
    input: &str,
) -> EngineResult<PortRef<T>> {
    slot.take().ok_or_else(|| EngineError::MissingInput {
        module: module.to_string(),
        input: input.to_string(),
    })
}

/// Borrow a gate created during the build, or fail if the module was
/// advanced before being built.
pub(crate) fn built_gate<'a>(gate: &'a Option<Gate>, module: &str) -> EngineResult<&'a Gate> {
    gate.as_ref().ok_or_else(|| {
        EngineError::InvalidConfiguration(format!("{module} advanced before build"))
    })
}
