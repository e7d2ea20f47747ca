//! Scalar fields on latitude/longitude grids.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::axis::CoordinateAxis;
use crate::error::{RegridError, Result};

/// Attribute bag carried alongside field values (units, grid name, ...).
pub type AttrMap = serde_json::Map<String, Value>;

/// A named dimension of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dim {
    Time,
    Plev,
    Lat,
    Lon,
}

impl Dim {
    /// The conventional short name of the dimension.
    pub fn name(&self) -> &'static str {
        match self {
            Dim::Time => "time",
            Dim::Plev => "plev",
            Dim::Lat => "lat",
            Dim::Lon => "lon",
        }
    }
}

/// The coordinate axes backing a field.
///
/// Latitude and longitude are always present; time and pressure level are
/// optional and carried as plain numeric values.
#[derive(Debug, Clone)]
pub struct FieldAxes {
    pub lat: CoordinateAxis,
    pub lon: CoordinateAxis,
    pub time: Option<Vec<f64>>,
    pub plev: Option<Vec<f64>>,
}

impl FieldAxes {
    /// Axes for a bare 2D (lat, lon) field.
    pub fn latlon(lat: CoordinateAxis, lon: CoordinateAxis) -> Self {
        Self {
            lat,
            lon,
            time: None,
            plev: None,
        }
    }

    fn len_of(&self, dim: Dim) -> Option<usize> {
        match dim {
            Dim::Lat => Some(self.lat.len()),
            Dim::Lon => Some(self.lon.len()),
            Dim::Time => self.time.as_ref().map(|t| t.len()),
            Dim::Plev => self.plev.as_ref().map(|p| p.len()),
        }
    }
}

/// An N-dimensional scalar field (N in 2..=4) tagged with a name, an
/// attribute bag, and its coordinate axes.
///
/// Values are stored flat in row-major order over the declared dimension
/// order. A field owns copies of its coordinate and value arrays outright, so
/// downstream code can consume or discard them freely.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    dims: Vec<Dim>,
    data: Vec<f64>,
    axes: FieldAxes,
    attrs: AttrMap,
}

impl Field {
    /// Create a field, validating the declared shape against the axes.
    ///
    /// All structural checks happen here, once, so the interpolation code can
    /// rely on a well-formed field instead of re-checking dimension names
    /// throughout.
    pub fn new(
        name: impl Into<String>,
        dims: Vec<Dim>,
        data: Vec<f64>,
        axes: FieldAxes,
    ) -> Result<Self> {
        if dims.len() < 2 || dims.len() > 4 {
            return Err(RegridError::invalid_axis(format!(
                "a field has 2 to 4 dimensions, got {}",
                dims.len()
            )));
        }
        for (i, dim) in dims.iter().enumerate() {
            if dims[i + 1..].contains(dim) {
                return Err(RegridError::invalid_axis(format!(
                    "duplicate dimension '{}'",
                    dim.name()
                )));
            }
        }
        if !dims.contains(&Dim::Lat) || !dims.contains(&Dim::Lon) {
            return Err(RegridError::missing_axis(
                "a field requires both lat and lon dimensions",
            ));
        }

        let mut expected = 1usize;
        for dim in &dims {
            let len = axes.len_of(*dim).ok_or_else(|| {
                RegridError::missing_axis(format!(
                    "dimension '{}' declared but no axis supplied",
                    dim.name()
                ))
            })?;
            if len == 0 {
                return Err(RegridError::invalid_axis(format!(
                    "axis '{}' is empty",
                    dim.name()
                )));
            }
            expected *= len;
        }

        if axes.time.is_some() && !dims.contains(&Dim::Time) {
            return Err(RegridError::invalid_axis(
                "time axis supplied without a time dimension",
            ));
        }
        if axes.plev.is_some() && !dims.contains(&Dim::Plev) {
            return Err(RegridError::invalid_axis(
                "plev axis supplied without a plev dimension",
            ));
        }

        if data.len() != expected {
            return Err(RegridError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            name: name.into(),
            dims,
            data,
            axes,
            attrs: AttrMap::new(),
        })
    }

    /// Convenience constructor for a 2D (lat, lon) field.
    pub fn latlon(
        name: impl Into<String>,
        data: Vec<f64>,
        lat: CoordinateAxis,
        lon: CoordinateAxis,
    ) -> Result<Self> {
        Self::new(
            name,
            vec![Dim::Lat, Dim::Lon],
            data,
            FieldAxes::latlon(lat, lon),
        )
    }

    /// Replace the attribute bag wholesale.
    pub fn with_attrs(mut self, attrs: AttrMap) -> Self {
        self.attrs = attrs;
        self
    }

    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared dimension order.
    pub fn dims(&self) -> &[Dim] {
        &self.dims
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// The flat value array, row-major over the declared dimension order.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// The latitude axis.
    pub fn lat(&self) -> &CoordinateAxis {
        &self.axes.lat
    }

    /// The longitude axis.
    pub fn lon(&self) -> &CoordinateAxis {
        &self.axes.lon
    }

    /// The time axis values, when the field has a time dimension.
    pub fn time(&self) -> Option<&[f64]> {
        self.axes.time.as_deref()
    }

    /// The pressure-level axis values, when present.
    pub fn plev(&self) -> Option<&[f64]> {
        self.axes.plev.as_deref()
    }

    /// The attribute bag.
    pub fn attrs(&self) -> &AttrMap {
        &self.attrs
    }

    /// Look up a single attribute.
    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    /// Set a single attribute.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attrs.insert(key.into(), value.into());
    }

    /// Whether the field declares the given dimension.
    pub fn has_dim(&self, dim: Dim) -> bool {
        self.dims.contains(&dim)
    }

    /// Position of a dimension in the declared order.
    pub fn dim_index(&self, dim: Dim) -> Option<usize> {
        self.dims.iter().position(|d| *d == dim)
    }

    /// Length of one dimension, if declared.
    pub fn dim_len(&self, dim: Dim) -> Option<usize> {
        if self.has_dim(dim) {
            self.axes.len_of(dim)
        } else {
            None
        }
    }

    /// The shape in declared dimension order.
    pub fn shape(&self) -> Vec<usize> {
        self.dims
            .iter()
            .map(|d| self.axes.len_of(*d).unwrap_or(0))
            .collect()
    }

    /// Flat offset of a multi-index in declared dimension order.
    fn flat_index(&self, idx: &[usize]) -> usize {
        debug_assert_eq!(idx.len(), self.dims.len());
        let shape = self.shape();
        let mut offset = 0usize;
        for (k, &i) in idx.iter().enumerate() {
            offset = offset * shape[k] + i;
        }
        offset
    }

    /// Value at a multi-index in declared dimension order.
    ///
    /// Panics if an index is out of bounds for its axis.
    pub fn value(&self, idx: &[usize]) -> f64 {
        self.data[self.flat_index(idx)]
    }

    /// Value at logical (time, plev, lat, lon) indices, mapped to the
    /// declared dimension order. Indices for dimensions the field does not
    /// declare are ignored.
    pub fn at(&self, time: usize, plev: usize, lat: usize, lon: usize) -> f64 {
        let mut idx = [0usize; 4];
        for (k, dim) in self.dims.iter().enumerate() {
            idx[k] = match dim {
                Dim::Time => time,
                Dim::Plev => plev,
                Dim::Lat => lat,
                Dim::Lon => lon,
            };
        }
        self.value(&idx[..self.dims.len()])
    }

    /// Extract one (lat, lon) slice as a flat lat-major array.
    ///
    /// The result parallels the row order of the cartesian product of the
    /// field's lat and lon axes, which is what the interpolator indexes by.
    pub fn latlon_slice(&self, time: usize, plev: usize) -> Vec<f64> {
        let lat_len = self.axes.lat.len();
        let lon_len = self.axes.lon.len();
        let mut out = Vec::with_capacity(lat_len * lon_len);
        for i in 0..lat_len {
            for j in 0..lon_len {
                out.push(self.at(time, plev, i, j));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(values: &[f64]) -> CoordinateAxis {
        CoordinateAxis::new(values.to_vec()).unwrap()
    }

    fn simple_2d() -> Field {
        Field::latlon(
            "tas",
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0],
            axis(&[-30.0, 0.0, 30.0]),
            axis(&[-30.0, 0.0, 30.0]),
        )
        .unwrap()
    }

    #[test]
    fn test_shape_validation() {
        let err = Field::latlon(
            "tas",
            vec![1.0, 2.0],
            axis(&[-30.0, 0.0, 30.0]),
            axis(&[-30.0, 0.0, 30.0]),
        );
        assert!(matches!(
            err,
            Err(RegridError::ShapeMismatch {
                expected: 9,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_time_dim_requires_time_axis() {
        let err = Field::new(
            "tas",
            vec![Dim::Lat, Dim::Lon, Dim::Time],
            vec![0.0; 18],
            FieldAxes::latlon(axis(&[-30.0, 0.0, 30.0]), axis(&[-30.0, 0.0, 30.0])),
        );
        assert!(matches!(err, Err(RegridError::MissingAxis(_))));
    }

    #[test]
    fn test_lat_lon_required() {
        let err = Field::new(
            "tas",
            vec![Dim::Lat, Dim::Time],
            vec![0.0; 6],
            FieldAxes {
                lat: axis(&[-30.0, 0.0, 30.0]),
                lon: axis(&[0.0, 120.0]),
                time: Some(vec![0.0, 1.0]),
                plev: None,
            },
        );
        assert!(matches!(err, Err(RegridError::MissingAxis(_))));
    }

    #[test]
    fn test_value_row_major() {
        let field = simple_2d();
        assert_eq!(field.value(&[0, 0]), 1.0);
        assert_eq!(field.value(&[0, 2]), 3.0);
        assert_eq!(field.value(&[1, 1]), 5.0);
        assert_eq!(field.value(&[2, 2]), 9.0);
    }

    #[test]
    fn test_at_maps_declared_order() {
        // Same values but stored lon-major.
        let field = Field::new(
            "tas",
            vec![Dim::Lon, Dim::Lat],
            vec![1.0, 4.0, 7.0, 2.0, 5.0, 8.0, 3.0, 6.0, 9.0],
            FieldAxes::latlon(axis(&[-30.0, 0.0, 30.0]), axis(&[-30.0, 0.0, 30.0])),
        )
        .unwrap();

        // Logical (lat=1, lon=2) is 6 regardless of storage order.
        assert_eq!(field.at(0, 0, 1, 2), 6.0);
        assert_eq!(simple_2d().at(0, 0, 1, 2), 6.0);
    }

    #[test]
    fn test_latlon_slice_of_4d() {
        // 2 times x 1 plev x 2 lat x 2 lon
        let data: Vec<f64> = (0..8).map(|v| v as f64).collect();
        let field = Field::new(
            "ta",
            vec![Dim::Time, Dim::Plev, Dim::Lat, Dim::Lon],
            data,
            FieldAxes {
                lat: axis(&[-45.0, 45.0]),
                lon: axis(&[0.0, 180.0]),
                time: Some(vec![0.0, 1.0]),
                plev: Some(vec![850.0]),
            },
        )
        .unwrap();

        assert_eq!(field.latlon_slice(0, 0), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(field.latlon_slice(1, 0), vec![4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_attrs() {
        let mut field = simple_2d();
        field.set_attr("units", "K");
        assert_eq!(field.attr("units").and_then(Value::as_str), Some("K"));
        assert_eq!(field.attr("grid"), None);
    }
}
