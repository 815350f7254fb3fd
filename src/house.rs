//! Domain model of the simulated building.

use envgraph_components::functions::CPV_AIR;

use crate::errors::SimError;

/// A wall separating two thermal zones (or a zone and the outside).
///
/// Side 0 faces the outside (or the first room), side 1 the inside. An
/// `is_open` wall is a glazed opening: it transmits solar radiation into
/// the room instead of absorbing it.
#[derive(Debug, Clone)]
pub struct Wall {
    pub name: String,
    /// Thermal conductivity [W/(m K)].
    pub lambda: f64,
    /// Volumetric specific heat [kJ/(m3 K)], used by unsteady walls.
    pub cpv: f64,
    /// Thickness [m].
    pub depth: f64,
    /// Surface area [m2].
    pub area: f64,
    /// Film coefficients, outside then inside [W/(m2 K)].
    pub alpha: [f64; 2],
    /// Tilt from horizontal [deg]; a vertical wall is 90.
    pub tilt_deg: f64,
    /// Azimuth from due south, west positive [deg].
    pub azimuth_deg: f64,
    /// Ground solar reflectance seen by the wall [-].
    pub ground_reflectance: f64,
    /// Glazing transmittance at normal incidence, for open walls [-].
    pub solar_through_rate: f64,
    pub is_open: bool,
    /// Air exchange through the opening [m3/s], if ventilated.
    pub ventilation_volume: Option<f64>,
}

impl Wall {
    /// Overall transmission coefficient including both films [W/(m2 K)].
    pub fn overall_coefficient(&self) -> f64 {
        1.0 / (1.0 / self.alpha[0] + 1.0 / self.alpha[1] + self.depth / self.lambda)
    }
}

impl Default for Wall {
    fn default() -> Self {
        Self {
            name: String::new(),
            lambda: 0.2,
            cpv: 854.0,
            depth: 0.1,
            area: 1.0,
            alpha: [23.0, 9.0],
            tilt_deg: 90.0,
            azimuth_deg: 0.0,
            ground_reflectance: 0.25,
            solar_through_rate: 0.0,
            is_open: false,
            ventilation_volume: None,
        }
    }
}

/// One face of a wall, referenced by the wall's name.
#[derive(Debug, Clone)]
pub struct WallSurface {
    pub wall_name: String,
    /// 0 for the outside face, 1 for the inside face.
    pub side: usize,
    /// Index into [`House::walls`], filled by [`House::resolve_references`].
    pub(crate) wall_index: Option<usize>,
}

impl WallSurface {
    pub fn new(wall_name: &str, side: usize) -> Self {
        debug_assert!(side < 2);
        Self {
            wall_name: wall_name.to_string(),
            side,
            wall_index: None,
        }
    }

    /// Index of the referenced wall, once resolved.
    pub(crate) fn wall_index(&self) -> Result<usize, SimError> {
        self.wall_index
            .ok_or_else(|| SimError::UnknownWall(self.wall_name.clone()))
    }
}

/// An air zone bounded by wall surfaces.
#[derive(Debug, Clone)]
pub struct Room {
    pub name: String,
    /// Volumetric specific heat of the zone air [kJ/(m3 K)].
    pub cpv: f64,
    /// Zone volume [m3].
    pub volume: f64,
    /// Starting air temperature [K].
    pub initial_temperature: f64,
    /// Inside faces bounding the zone.
    pub surfaces: Vec<WallSurface>,
}

impl Room {
    pub fn new(name: &str, volume: f64, initial_temperature: f64) -> Self {
        Self {
            name: name.to_string(),
            cpv: CPV_AIR,
            volume,
            initial_temperature,
            surfaces: Vec::new(),
        }
    }
}

/// The building: walls, the rooms they bound, and the faces exposed to
/// the outside air.
#[derive(Debug, Clone, Default)]
pub struct House {
    pub rooms: Vec<Room>,
    pub walls: Vec<Wall>,
    pub outer_surfaces: Vec<WallSurface>,
}

impl House {
    /// Link every surface to its wall by name. Must be called before the
    /// simulator assembles the graph; unknown names are errors.
    pub fn resolve_references(&mut self) -> Result<(), SimError> {
        let resolve = |walls: &[Wall], surface: &mut WallSurface| {
            match walls.iter().position(|w| w.name == surface.wall_name) {
                Some(index) => {
                    surface.wall_index = Some(index);
                    Ok(())
                }
                None => Err(SimError::UnknownWall(surface.wall_name.clone())),
            }
        };

        for room in &mut self.rooms {
            for surface in &mut room.surfaces {
                resolve(&self.walls, surface)?;
            }
        }
        for surface in &mut self.outer_surfaces {
            resolve(&self.walls, surface)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_wall_house() -> House {
        let mut house = House::default();
        house.walls.push(Wall {
            name: "south".to_string(),
            ..Wall::default()
        });
        let mut room = Room::new("living", 40.0, 293.15);
        room.surfaces.push(WallSurface::new("south", 1));
        house.rooms.push(room);
        house.outer_surfaces.push(WallSurface::new("south", 0));
        house
    }

    #[test]
    fn references_resolve_by_name() {
        let mut house = one_wall_house();
        house.resolve_references().unwrap();
        assert_eq!(house.rooms[0].surfaces[0].wall_index().unwrap(), 0);
        assert_eq!(house.outer_surfaces[0].wall_index().unwrap(), 0);
    }

    #[test]
    fn an_unknown_wall_name_is_an_error() {
        let mut house = one_wall_house();
        house.rooms[0].surfaces.push(WallSurface::new("missing", 1));
        let err = house.resolve_references().unwrap_err();
        assert!(matches!(err, SimError::UnknownWall(name) if name == "missing"));
    }

    #[test]
    fn overall_coefficient_stacks_the_resistances() {
        let wall = Wall {
            lambda: 0.2,
            depth: 0.1,
            alpha: [23.0, 9.0],
            ..Wall::default()
        };
        let k = wall.overall_coefficient();
        assert!((1.0 / k - (1.0 / 23.0 + 1.0 / 9.0 + 0.5)).abs() < 1e-12);
        // Always strictly inside the film-only bound.
        assert!(1.0 / k > 1.0 / 23.0 + 1.0 / 9.0);
    }
}
