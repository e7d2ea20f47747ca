//! Lattice definitions for gridded geophysical data.
//!
//! A lattice pairs one latitude axis with one longitude axis. Latitudes may
//! include the poles or stop short of them; two grids with the same spacing
//! can differ only in that respect, so the derived name carries a point-count
//! suffix when a pole is present.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::axis::CoordinateAxis;
use crate::error::Result;
use crate::field::Field;

/// A rectangular latitude/longitude grid.
///
/// Immutable after construction. The name, when not supplied explicitly, is
/// derived from the latitude spacing in tenths of a degree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    lat: CoordinateAxis,
    lon: CoordinateAxis,
    name: Option<String>,
}

impl Lattice {
    /// Create a lattice from explicit latitude and longitude axes.
    pub fn new(lat: CoordinateAxis, lon: CoordinateAxis) -> Self {
        Self {
            lat,
            lon,
            name: None,
        }
    }

    /// Create a lattice with an explicit name.
    ///
    /// Naming by hand sidesteps the redundancy in derived names: latitudes
    /// `[-90, 0, 90]` and `[-45, 45]` both describe 90-degree cells.
    pub fn with_name(lat: CoordinateAxis, lon: CoordinateAxis, name: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            name: Some(name.into()),
        }
    }

    /// Derive a lattice from an existing field's lat/lon coordinates.
    pub fn from_field(field: &Field) -> Result<Self> {
        let lat = CoordinateAxis::new(field.lat().values().to_vec())?;
        let lon = CoordinateAxis::new(field.lon().values().to_vec())?;
        Ok(Self::new(lat, lon))
    }

    /// The latitude axis.
    pub fn lat(&self) -> &CoordinateAxis {
        &self.lat
    }

    /// The longitude axis.
    pub fn lon(&self) -> &CoordinateAxis {
        &self.lon
    }

    /// Number of latitude points.
    pub fn lat_len(&self) -> usize {
        self.lat.len()
    }

    /// Number of longitude points.
    pub fn lon_len(&self) -> usize {
        self.lon.len()
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.lat.len() * self.lon.len()
    }

    /// A lattice always has at least 2x2 points.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Canonical name for this lattice.
    ///
    /// An explicitly supplied name is returned verbatim. Otherwise the name
    /// is `GRID_###`, where `###` is the latitude spacing in tenths of a
    /// degree; grids whose latitudes reach a pole get a `_{count}` suffix so
    /// a 7-point pole-inclusive 30-degree grid does not collide with a
    /// 6-point pole-exclusive one.
    pub fn describe(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }

        let height = self.lat.spacing().abs();
        let includes_pole = self
            .lat
            .values()
            .iter()
            .any(|&v| v == 90.0 || v == -90.0);

        if includes_pole {
            format!("GRID_{:03}_{}", (10.0 * height) as i64, self.lat.len())
        } else {
            format!("GRID_{:03}", (10.0 * height) as i64)
        }
    }

    /// Cell size in degrees as (latitude width, longitude width).
    ///
    /// Longitudes may wrap around the globe. If the gap between the last and
    /// first longitude (modulo 360) is within 10% of the regular spacing, the
    /// axis is treated as periodic and the width is `360 / len` instead of
    /// the endpoint-difference formula.
    pub fn cell_size(&self) -> (f64, f64) {
        let width_lat = self.lat.spacing().abs();

        let lons = self.lon.values();
        let wrap_space = lons[0] + 360.0 - lons[lons.len() - 1];
        let common_space = lons[1] - lons[0];
        let width_lon = if wrap_space < 1.1 * common_space {
            360.0 / lons.len() as f64
        } else {
            self.lon.spacing().abs()
        };

        (width_lat, width_lon)
    }

    /// Enumerate `(i, j)` index pairs row-major over (lat, lon).
    ///
    /// The iterator is a pure function of the lattice size: finite and
    /// restartable, with no hidden cursor.
    pub fn grid_points(&self) -> impl Iterator<Item = (usize, usize)> {
        let lon_len = self.lon.len();
        (0..self.lat.len()).flat_map(move |i| (0..lon_len).map(move |j| (i, j)))
    }
}

impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width_lat, width_lon) = self.cell_size();
        write!(f, "{}x{}", width_lat, width_lon)
    }
}

/// Canned lattice definitions.
///
/// The convention is `GRID_###` where `###` is the cell width in tenths of a
/// degree; the `latlon_*` grids are the pole-inclusive test lattices.
pub mod lattices {
    use super::*;

    /// Evenly spaced values from `start` to `stop` inclusive.
    pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
        if num == 1 {
            return vec![start];
        }
        let step = (stop - start) / (num - 1) as f64;
        (0..num).map(|i| start + i as f64 * step).collect()
    }

    fn canned(lat: Vec<f64>, lon: Vec<f64>, name: Option<&str>) -> Lattice {
        let lat = CoordinateAxis::new(lat).expect("canned latitude axis is monotonic");
        let lon = CoordinateAxis::new(lon).expect("canned longitude axis is monotonic");
        match name {
            Some(name) => Lattice::with_name(lat, lon, name),
            None => Lattice::new(lat, lon),
        }
    }

    /// 2.5-degree global grid, poles excluded (72 x 144).
    pub fn grid_025() -> Lattice {
        canned(
            linspace(-88.75, 88.75, 72),
            linspace(-178.75, 178.75, 144),
            Some("GRID_025"),
        )
    }

    /// 10-degree global grid, poles excluded (18 x 36).
    pub fn grid_100() -> Lattice {
        canned(
            linspace(-85.0, 85.0, 18),
            linspace(-175.0, 175.0, 36),
            Some("GRID_100"),
        )
    }

    /// 30-degree global grid, poles excluded (6 x 12).
    pub fn grid_300() -> Lattice {
        canned(
            linspace(-75.0, 75.0, 6),
            linspace(-165.0, 165.0, 12),
            Some("GRID_300"),
        )
    }

    /// Very low-resolution pole-inclusive grid, 30-degree gridlines (7 x 12).
    pub fn latlon_30() -> Lattice {
        canned(linspace(-90.0, 90.0, 7), linspace(0.0, 330.0, 12), None)
    }

    /// Low-resolution pole-inclusive grid, 5-degree gridlines (37 x 72).
    pub fn latlon_5() -> Lattice {
        canned(linspace(-90.0, 90.0, 37), linspace(0.0, 355.0, 72), None)
    }

    /// 1-degree pole-inclusive grid (181 x 360).
    pub fn latlon_1() -> Lattice {
        canned(linspace(-90.0, 90.0, 181), linspace(0.0, 359.0, 360), None)
    }
}
