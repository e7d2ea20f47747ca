//! Field normalization utilities.
//!
//! Archive data arrives with every imaginable axis convention: descending
//! latitudes, 0..360 longitudes, longitude-major storage. These helpers
//! bring a field into the standard form the interpolator expects, and apply
//! the temporal smoothing kernel that shares the same data-model invariants.

use regrid_common::{CoordinateAxis, Dim, Field, FieldAxes, RegridError, Result};

/// Standardize latitude ordering and longitude range.
///
/// The result has dimensions ordered (lat, lon) or (lat, lon, time), an
/// ascending latitude axis, and longitudes in (-180, 180] with the data
/// rotated so the axis stays ascending end to end. Applying it twice is a
/// no-op.
pub fn standardize_latlon(field: &Field) -> Result<Field> {
    if field.has_dim(Dim::Plev) || field.ndim() > 3 {
        return Err(RegridError::invalid_axis(
            "standardize_latlon expects a 2D (lat, lon) or 3D (lat, lon, time) field",
        ));
    }

    let order = if field.has_dim(Dim::Time) {
        vec![Dim::Lat, Dim::Lon, Dim::Time]
    } else {
        vec![Dim::Lat, Dim::Lon]
    };
    let mut out = reorder(field, order)?;

    if !out.lat().is_ascending() {
        out = flip_dim(&out, Dim::Lat)?;
    }
    if !out.lon().is_ascending() {
        out = flip_dim(&out, Dim::Lon)?;
    }

    if out.lon().values().iter().any(|&v| v > 180.0) {
        out = wrap_longitudes(&out)?;
    }

    Ok(out)
}

/// Transpose longitude-major 2D storage to latitude-major.
///
/// A structural-consistency guard before interpolation: some datasets store
/// (lon, lat) arrays, which would silently scramble the cartesian-product
/// ordering downstream.
pub fn transpose_if_needed(field: &Field) -> Result<Field> {
    if field.ndim() == 2 && field.dims()[0] == Dim::Lon {
        reorder(field, vec![Dim::Lat, Dim::Lon])
    } else {
        Ok(field.clone())
    }
}

/// Convolve with a normalized Gaussian along the time axis.
///
/// The window has full width `2 * sigma + 1` and unit sum, so the mean of
/// the data is preserved away from the array ends; within `sigma` steps of
/// either end the zero-padded window attenuates the result. All other axes
/// pass through untouched. Fails with `MissingAxis` when the field has no
/// time dimension.
pub fn gaussian_smooth(field: &Field, sigma: usize) -> Result<Field> {
    let time_pos = field
        .dim_index(Dim::Time)
        .ok_or_else(|| RegridError::missing_axis("time coordinate not found"))?;
    if sigma == 0 {
        return Err(RegridError::invalid_axis("smoothing sigma must be at least 1"));
    }

    let window = 2 * sigma + 1;
    let spread = sigma as f64;
    let mut kernel: Vec<f64> = (0..window)
        .map(|k| {
            let x = k as f64 - sigma as f64;
            (-x * x / (2.0 * spread * spread)).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }

    let shape = field.shape();
    let steps = shape[time_pos];
    let outer: usize = shape[..time_pos].iter().product();
    let inner: usize = shape[time_pos + 1..].iter().product();

    let src = field.data();
    let mut data = vec![0.0; src.len()];
    for o in 0..outer {
        for t in 0..steps {
            for i in 0..inner {
                let mut acc = 0.0;
                for (k, &w) in kernel.iter().enumerate() {
                    let Some(ts) = (t + k).checked_sub(sigma) else {
                        continue;
                    };
                    if ts >= steps {
                        continue;
                    }
                    acc += w * src[(o * steps + ts) * inner + i];
                }
                data[(o * steps + t) * inner + i] = acc;
            }
        }
    }

    let name = format!("{} (Gaussian filtered: sigma = {})", field.name(), sigma);
    Ok(
        Field::new(name, field.dims().to_vec(), data, clone_axes(field))?
            .with_attrs(field.attrs().clone()),
    )
}

fn clone_axes(field: &Field) -> FieldAxes {
    FieldAxes {
        lat: field.lat().clone(),
        lon: field.lon().clone(),
        time: field.time().map(<[f64]>::to_vec),
        plev: field.plev().map(<[f64]>::to_vec),
    }
}

/// Copy a field into a new declared dimension order.
fn reorder(field: &Field, order: Vec<Dim>) -> Result<Field> {
    if field.dims() == order.as_slice() {
        return Ok(field.clone());
    }

    let mut lens = Vec::with_capacity(order.len());
    for &dim in &order {
        lens.push(
            field
                .dim_len(dim)
                .ok_or_else(|| RegridError::missing_axis(dim.name()))?,
        );
    }

    let total: usize = lens.iter().product();
    let mut data = Vec::with_capacity(total);
    let mut idx = vec![0usize; order.len()];
    for _ in 0..total {
        let (mut t, mut p, mut la, mut lo) = (0, 0, 0, 0);
        for (k, &dim) in order.iter().enumerate() {
            match dim {
                Dim::Time => t = idx[k],
                Dim::Plev => p = idx[k],
                Dim::Lat => la = idx[k],
                Dim::Lon => lo = idx[k],
            }
        }
        data.push(field.at(t, p, la, lo));

        // Odometer increment, last axis fastest.
        for k in (0..idx.len()).rev() {
            idx[k] += 1;
            if idx[k] < lens[k] {
                break;
            }
            idx[k] = 0;
        }
    }

    Ok(Field::new(field.name(), order, data, clone_axes(field))?
        .with_attrs(field.attrs().clone()))
}

/// Reverse one dimension's axis values and mirror the data along it.
fn flip_dim(field: &Field, dim: Dim) -> Result<Field> {
    let pos = field
        .dim_index(dim)
        .ok_or_else(|| RegridError::missing_axis(dim.name()))?;

    let shape = field.shape();
    let n = shape[pos];
    let outer: usize = shape[..pos].iter().product();
    let inner: usize = shape[pos + 1..].iter().product();

    let src = field.data();
    let mut data = vec![0.0; src.len()];
    for o in 0..outer {
        for k in 0..n {
            let src_off = (o * n + (n - 1 - k)) * inner;
            let dst_off = (o * n + k) * inner;
            data[dst_off..dst_off + inner].copy_from_slice(&src[src_off..src_off + inner]);
        }
    }

    let axes = FieldAxes {
        lat: if dim == Dim::Lat {
            field.lat().reversed()
        } else {
            field.lat().clone()
        },
        lon: if dim == Dim::Lon {
            field.lon().reversed()
        } else {
            field.lon().clone()
        },
        time: field.time().map(<[f64]>::to_vec),
        plev: field.plev().map(<[f64]>::to_vec),
    };

    Ok(Field::new(field.name(), field.dims().to_vec(), data, axes)?
        .with_attrs(field.attrs().clone()))
}

/// Remap longitudes into (-180, 180] and rotate the axis back to ascending.
fn wrap_longitudes(field: &Field) -> Result<Field> {
    let remapped: Vec<f64> = field
        .lon()
        .values()
        .iter()
        .map(|&v| (v + 180.0).rem_euclid(360.0) - 180.0)
        .collect();

    // After remapping an ascending axis, the values form two ascending runs;
    // rotating the minimum to the front restores a single ascending run.
    let pivot = remapped
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap_or(0);

    let mut lons = remapped;
    lons.rotate_left(pivot);

    let pos = field
        .dim_index(Dim::Lon)
        .ok_or_else(|| RegridError::missing_axis("lon"))?;
    let shape = field.shape();
    let n = shape[pos];
    let outer: usize = shape[..pos].iter().product();
    let inner: usize = shape[pos + 1..].iter().product();

    let src = field.data();
    let mut data = vec![0.0; src.len()];
    for o in 0..outer {
        for k in 0..n {
            let src_off = (o * n + (k + pivot) % n) * inner;
            let dst_off = (o * n + k) * inner;
            data[dst_off..dst_off + inner].copy_from_slice(&src[src_off..src_off + inner]);
        }
    }

    let axes = FieldAxes {
        lat: field.lat().clone(),
        lon: CoordinateAxis::new(lons)?,
        time: field.time().map(<[f64]>::to_vec),
        plev: field.plev().map(<[f64]>::to_vec),
    };

    Ok(Field::new(field.name(), field.dims().to_vec(), data, axes)?
        .with_attrs(field.attrs().clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(values: &[f64]) -> CoordinateAxis {
        CoordinateAxis::new(values.to_vec()).unwrap()
    }

    /// 2 lat x 4 lon x 2 time with value = 100*i + 10*j + t, stored
    /// (time, lat, lon) with descending latitudes and 0..360 longitudes.
    fn messy_field() -> Field {
        let lats = [60.0, -60.0];
        let lons = [0.0, 90.0, 180.0, 270.0];
        let mut data = Vec::new();
        for t in 0..2usize {
            for i in 0..2usize {
                for j in 0..4usize {
                    data.push((100 * i + 10 * j + t) as f64);
                }
            }
        }
        Field::new(
            "pr",
            vec![Dim::Time, Dim::Lat, Dim::Lon],
            data,
            FieldAxes {
                lat: axis(&lats),
                lon: axis(&lons),
                time: Some(vec![0.0, 1.0]),
                plev: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_standardize_reorders_and_fixes_axes() {
        let out = standardize_latlon(&messy_field()).unwrap();

        assert_eq!(out.dims(), &[Dim::Lat, Dim::Lon, Dim::Time]);
        assert!(out.lat().is_ascending());
        assert!(out.lon().is_ascending());
        assert_eq!(out.lat().values(), &[-60.0, 60.0]);
        assert_eq!(out.lon().values(), &[-180.0, -90.0, 0.0, 90.0]);
    }

    #[test]
    fn test_standardize_preserves_values() {
        let field = messy_field();
        let out = standardize_latlon(&field).unwrap();

        // Original (lat=60, lon=90, t=1) held 100*0 + 10*1 + 1 = 11.
        // In the standardized field that's lat index 1, lon 90 -> index 3.
        assert_eq!(out.at(1, 0, 1, 3), 11.0);
        // Original (lat=-60, lon=270 -> -90, t=0) held 100*1 + 10*3 = 130.
        assert_eq!(out.at(0, 0, 0, 1), 130.0);
        // Original (lat=60, lon=180 -> -180, t=0) held 20.
        assert_eq!(out.at(0, 0, 1, 0), 20.0);
    }

    #[test]
    fn test_standardize_is_idempotent() {
        let once = standardize_latlon(&messy_field()).unwrap();
        let twice = standardize_latlon(&once).unwrap();

        assert_eq!(once.dims(), twice.dims());
        assert_eq!(once.lat().values(), twice.lat().values());
        assert_eq!(once.lon().values(), twice.lon().values());
        assert_eq!(once.data(), twice.data());
    }

    #[test]
    fn test_standardize_2d_field() {
        let field = Field::new(
            "t2m",
            vec![Dim::Lon, Dim::Lat],
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            FieldAxes::latlon(axis(&[-30.0, 30.0]), axis(&[0.0, 120.0, 240.0])),
        )
        .unwrap();

        let out = standardize_latlon(&field).unwrap();
        assert_eq!(out.dims(), &[Dim::Lat, Dim::Lon]);
        assert_eq!(out.lon().values(), &[-120.0, 0.0, 120.0]);
        // Logical values survive the reorder and the roll.
        assert_eq!(out.at(0, 0, 1, 1), field.at(0, 0, 1, 0));
    }

    #[test]
    fn test_standardize_rejects_4d() {
        let field = Field::new(
            "ta",
            vec![Dim::Time, Dim::Plev, Dim::Lat, Dim::Lon],
            vec![0.0; 16],
            FieldAxes {
                lat: axis(&[-30.0, 30.0]),
                lon: axis(&[0.0, 120.0]),
                time: Some(vec![0.0, 1.0]),
                plev: Some(vec![850.0, 500.0]),
            },
        )
        .unwrap();
        assert!(standardize_latlon(&field).is_err());
    }

    #[test]
    fn test_transpose_if_needed() {
        let lon_major = Field::new(
            "t2m",
            vec![Dim::Lon, Dim::Lat],
            vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0],
            FieldAxes::latlon(axis(&[-30.0, 30.0]), axis(&[-60.0, 0.0, 60.0])),
        )
        .unwrap();

        let out = transpose_if_needed(&lon_major).unwrap();
        assert_eq!(out.dims(), &[Dim::Lat, Dim::Lon]);
        assert_eq!(out.data(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        // Already lat-major: untouched.
        let same = transpose_if_needed(&out).unwrap();
        assert_eq!(same.data(), out.data());
    }

    #[test]
    fn test_gaussian_smooth_preserves_constant_interior() {
        let steps = 11;
        let field = Field::new(
            "pr",
            vec![Dim::Lat, Dim::Lon, Dim::Time],
            vec![3.0; 2 * 2 * steps],
            FieldAxes {
                lat: axis(&[-30.0, 30.0]),
                lon: axis(&[0.0, 120.0]),
                time: Some((0..steps).map(|t| t as f64).collect()),
                plev: None,
            },
        )
        .unwrap();

        let sigma = 2;
        let out = gaussian_smooth(&field, sigma).unwrap();

        for t in sigma..steps - sigma {
            let v = out.at(t, 0, 0, 0);
            assert!((v - 3.0).abs() < 1e-9, "interior step {} drifted: {}", t, v);
        }
        // The zero-padded ends are attenuated, not inflated.
        assert!(out.at(0, 0, 0, 0) < 3.0);
        assert!(out.at(steps - 1, 0, 0, 0) < 3.0);
    }

    #[test]
    fn test_gaussian_smooth_names_output() {
        let field = messy_field();
        let out = gaussian_smooth(&field, 1).unwrap();
        assert_eq!(out.name(), "pr (Gaussian filtered: sigma = 1)");
        assert_eq!(out.shape(), field.shape());
    }

    #[test]
    fn test_gaussian_smooth_requires_time() {
        let field = Field::latlon(
            "t2m",
            vec![0.0; 4],
            axis(&[-30.0, 30.0]),
            axis(&[0.0, 120.0]),
        )
        .unwrap();
        let err = gaussian_smooth(&field, 2);
        assert!(matches!(err, Err(RegridError::MissingAxis(_))));
    }

    #[test]
    fn test_gaussian_kernel_is_normalized() {
        // A unit impulse spreads into weights that sum back to 1.
        let steps = 9;
        let mut impulse = vec![0.0; steps];
        impulse[4] = 1.0;
        let field = Field::new(
            "w",
            vec![Dim::Lat, Dim::Lon, Dim::Time],
            impulse.repeat(4),
            FieldAxes {
                lat: axis(&[-30.0, 30.0]),
                lon: axis(&[0.0, 120.0]),
                time: Some((0..steps).map(|t| t as f64).collect()),
                plev: None,
            },
        )
        .unwrap();

        let out = gaussian_smooth(&field, 2).unwrap();
        let total: f64 = (0..steps).map(|t| out.at(t, 0, 0, 0)).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
