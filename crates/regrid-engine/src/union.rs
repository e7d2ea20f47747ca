//! Dimension-wise union of field coordinates.

use regrid_common::Field;

/// Sorted, deduplicated coordinate values per dimension.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnionCoords {
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
}

/// Form the per-dimension union of lat/lon values over all fields.
///
/// Fields with zero spatial overlap are still included, so the union lattice
/// may be sparse or uneven. That is deliberate: a regular resampled union
/// grid would be prettier but harder to reason about.
pub fn union_coordinates(fields: &[Field]) -> UnionCoords {
    let mut lat = Vec::new();
    let mut lon = Vec::new();

    for field in fields {
        lat.extend_from_slice(field.lat().values());
        lon.extend_from_slice(field.lon().values());
    }

    lat.sort_by(f64::total_cmp);
    lat.dedup();
    lon.sort_by(f64::total_cmp);
    lon.dedup();

    UnionCoords { lat, lon }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regrid_common::CoordinateAxis;

    fn field(lat: &[f64], lon: &[f64]) -> Field {
        Field::latlon(
            "t",
            vec![0.0; lat.len() * lon.len()],
            CoordinateAxis::new(lat.to_vec()).unwrap(),
            CoordinateAxis::new(lon.to_vec()).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_single_field_union_is_own_coords() {
        let f = field(&[-30.0, 0.0, 30.0], &[10.0, 20.0]);
        let union = union_coordinates(&[f]);
        assert_eq!(union.lat, vec![-30.0, 0.0, 30.0]);
        assert_eq!(union.lon, vec![10.0, 20.0]);
    }

    #[test]
    fn test_overlapping_fields_dedup() {
        let a = field(&[-30.0, 0.0, 30.0], &[0.0, 90.0]);
        let b = field(&[0.0, 30.0, 60.0], &[90.0, 180.0]);
        let union = union_coordinates(&[a, b]);
        assert_eq!(union.lat, vec![-30.0, 0.0, 30.0, 60.0]);
        assert_eq!(union.lon, vec![0.0, 90.0, 180.0]);
    }

    #[test]
    fn test_disjoint_fields_both_included() {
        let a = field(&[-60.0, -30.0], &[-120.0, -60.0]);
        let b = field(&[30.0, 60.0], &[60.0, 120.0]);
        let union = union_coordinates(&[a, b]);
        assert_eq!(union.lat, vec![-60.0, -30.0, 30.0, 60.0]);
        assert_eq!(union.lon, vec![-120.0, -60.0, 60.0, 120.0]);
    }

    #[test]
    fn test_descending_axis_values_sorted() {
        let a = field(&[60.0, 30.0, 0.0], &[0.0, 60.0]);
        let union = union_coordinates(&[a]);
        assert_eq!(union.lat, vec![0.0, 30.0, 60.0]);
    }
}
