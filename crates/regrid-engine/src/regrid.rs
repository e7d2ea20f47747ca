//! Regrid orchestrators.
//!
//! Two entry points share the interpolation core. `regrid_multi` walks a
//! batch of 4D (time, plev, lat, lon) fields onto one common target lattice;
//! `regrid_single` is the convenience path for one 2D or 3D field. Both are
//! O(target_points x triangle_count) per slice: point location is repeated
//! per query with no spatial index reuse beyond the mesh itself. For the
//! regridding workloads this serves, minutes are acceptable; amortizing the
//! per-point search is a known future optimization.

use rayon::prelude::*;

use regrid_common::{
    lattices, CoordinateAxis, Dim, Field, FieldAxes, Lattice, ProgressSink, RegridError, Result,
};

use crate::cartesian::cartesian_product;
use crate::config::RegridConfig;
use crate::triangulation::Triangulation;
use crate::union::union_coordinates;

/// Destination specification for `regrid_single`.
pub enum RegridTarget<'a> {
    /// An explicit target lattice.
    Lattice(Lattice),
    /// Match the lattice of an existing field.
    Like(&'a Field),
    /// The built-in moderate-resolution lattice (GRID_025).
    Default,
}

/// Regrid a batch of 4D fields onto a common target lattice.
///
/// The target is resolved from the configured policy: either a canned
/// lattice or the dimension-wise union of all source coordinates. One
/// triangulation is built per source field (the mesh depends only on the
/// lat/lon geometry); each requested (time, plev) slice then re-binds values
/// to the mesh vertices and interpolates every target point, in parallel
/// across points.
///
/// Progress is reported once per completed slice through `progress`.
pub fn regrid_multi(
    fields: &[Field],
    config: &RegridConfig,
    progress: &mut dyn ProgressSink,
) -> Result<Vec<Field>> {
    config.validate()?;
    if fields.is_empty() {
        return Ok(Vec::new());
    }

    let target = resolve_policy_lattice(fields, config)?;
    let query_points =
        cartesian_product(&[target.lat().values(), target.lon().values()])?.points_2d()?;

    // Resolve level subsets up front so the progress total is known before
    // any interpolation starts.
    let mut selections = Vec::with_capacity(fields.len());
    let mut total_slices = 0usize;
    for field in fields {
        let selection = resolve_levels(field, config)?;
        total_slices += selection.time.len() * selection.plev.len();
        selections.push(selection);
    }
    progress.start(total_slices);

    let mut out = Vec::with_capacity(fields.len());
    for (field, selection) in fields.iter().zip(&selections) {
        out.push(regrid_field_4d(field, selection, &target, &query_points, progress)?);
    }
    Ok(out)
}

/// Regrid one 2D (lat, lon) or 3D (with time) field.
///
/// Every target grid point inside the source convex hull gathers the three
/// enclosing-triangle vertex values (per time step when a time axis is
/// present) and blends them barycentrically; points outside the hull stay
/// NaN. The output carries `grid` and `missing_value` attributes naming its
/// new lattice and missing-value convention.
pub fn regrid_single(
    field: &Field,
    target: RegridTarget<'_>,
    progress: &mut dyn ProgressSink,
) -> Result<Field> {
    let time_len = match (field.ndim(), field.dim_len(Dim::Time)) {
        (2, None) => None,
        (3, Some(len)) => Some(len),
        (3, None) => {
            return Err(RegridError::missing_axis(
                "a 3-dimensional field must carry a time axis to be regridded",
            ))
        }
        (ndim, _) => {
            return Err(RegridError::invalid_axis(format!(
                "regrid_single expects a 2D or 3D field, got {} dimensions",
                ndim
            )))
        }
    };

    let to = match target {
        RegridTarget::Lattice(lattice) => lattice,
        RegridTarget::Like(other) => Lattice::from_field(other)?,
        RegridTarget::Default => lattices::grid_025(),
    };
    let from = Lattice::from_field(field)?;
    tracing::debug!(
        field = %field.name(),
        from = %from,
        to = %to,
        "regridding from {} to {}",
        from,
        to
    );

    let source = cartesian_product(&[field.lat().values(), field.lon().values()])?;
    let mesh = Triangulation::build(&source)?;

    let (out_lat, out_lon) = (to.lat_len(), to.lon_len());
    progress.start(out_lat * out_lon);

    let src_lon_len = field.lon().len();
    let mut data = vec![f64::NAN; time_len.unwrap_or(1) * out_lat * out_lon];

    for (i, j) in to.grid_points() {
        let query = [to.lat().values()[i], to.lon().values()[j]];

        // The mesh is located once per target point; the vertex values are
        // then gathered per time step.
        if let Some((tri, weights)) = mesh.locate(query) {
            match time_len {
                Some(steps) => {
                    for t in 0..steps {
                        let value = blend_vertices(field, &tri, &weights, t, src_lon_len);
                        data[(t * out_lat + i) * out_lon + j] = value;
                    }
                }
                None => {
                    data[i * out_lon + j] = blend_vertices(field, &tri, &weights, 0, src_lon_len);
                }
            }
        }

        progress.update(&format!(
            "calculated values for ({:.3}, {:.3})",
            query[0], query[1]
        ));
    }

    let (dims, axes) = match time_len {
        Some(_) => (
            vec![Dim::Time, Dim::Lat, Dim::Lon],
            FieldAxes {
                lat: to.lat().clone(),
                lon: to.lon().clone(),
                time: field.time().map(<[f64]>::to_vec),
                plev: None,
            },
        ),
        None => (
            vec![Dim::Lat, Dim::Lon],
            FieldAxes::latlon(to.lat().clone(), to.lon().clone()),
        ),
    };

    let mut out = Field::new(field.name(), dims, data, axes)?.with_attrs(field.attrs().clone());
    out.set_attr("missing_value", "nan");
    out.set_attr("grid", to.describe());
    Ok(out)
}

/// Weighted blend of one triangle's vertex values at one time step.
fn blend_vertices(
    field: &Field,
    tri: &[usize; 3],
    weights: &[f64; 3],
    time: usize,
    src_lon_len: usize,
) -> f64 {
    tri.iter()
        .zip(weights.iter())
        .map(|(&vertex, &weight)| {
            // Source points are the lat x lon cartesian product, so the flat
            // vertex index decomposes lat-major.
            let (si, sj) = (vertex / src_lon_len, vertex % src_lon_len);
            weight * field.at(time, 0, si, sj)
        })
        .sum()
}

fn resolve_policy_lattice(fields: &[Field], config: &RegridConfig) -> Result<Lattice> {
    match config.target.lattice() {
        Some(lattice) => Ok(lattice),
        None => {
            let union = union_coordinates(fields);
            Ok(Lattice::new(
                CoordinateAxis::new(union.lat)?,
                CoordinateAxis::new(union.lon)?,
            ))
        }
    }
}

struct LevelSelection {
    time: Vec<usize>,
    plev: Vec<usize>,
}

fn resolve_levels(field: &Field, config: &RegridConfig) -> Result<LevelSelection> {
    let time_len = field.dim_len(Dim::Time).ok_or_else(|| {
        RegridError::missing_axis(format!("field '{}' has no time dimension", field.name()))
    })?;
    let plev_len = field.dim_len(Dim::Plev).ok_or_else(|| {
        RegridError::missing_axis(format!("field '{}' has no plev dimension", field.name()))
    })?;

    let time = subset_or_all(config.time_levels.as_deref(), time_len, "time")?;
    let plev = subset_or_all(config.plev_levels.as_deref(), plev_len, "plev")?;
    Ok(LevelSelection { time, plev })
}

fn subset_or_all(requested: Option<&[usize]>, len: usize, dim: &str) -> Result<Vec<usize>> {
    match requested {
        Some(levels) => {
            if let Some(&bad) = levels.iter().find(|&&idx| idx >= len) {
                return Err(RegridError::invalid_axis(format!(
                    "{} level {} out of range (axis has {} points)",
                    dim, bad, len
                )));
            }
            Ok(levels.to_vec())
        }
        None => Ok((0..len).collect()),
    }
}

fn regrid_field_4d(
    field: &Field,
    selection: &LevelSelection,
    target: &Lattice,
    query_points: &[[f64; 2]],
    progress: &mut dyn ProgressSink,
) -> Result<Field> {
    let source = cartesian_product(&[field.lat().values(), field.lon().values()])?;
    let mesh = Triangulation::build(&source)?;
    tracing::debug!(
        field = %field.name(),
        triangles = mesh.triangle_count(),
        target = %target.describe(),
        "built source triangulation"
    );

    let src_time = field
        .time()
        .ok_or_else(|| RegridError::missing_axis("time"))?;
    let src_plev = field
        .plev()
        .ok_or_else(|| RegridError::missing_axis("plev"))?;

    let points_per_slice = target.lat_len() * target.lon_len();
    let mut data =
        vec![f64::NAN; selection.time.len() * selection.plev.len() * points_per_slice];

    for (ti, &t) in selection.time.iter().enumerate() {
        for (pi, &p) in selection.plev.iter().enumerate() {
            // Values are re-bound to the mesh vertices per slice; the
            // geometry itself never changes within a field.
            let slice = field.latlon_slice(t, p);

            let offset = (ti * selection.plev.len() + pi) * points_per_slice;
            data[offset..offset + points_per_slice]
                .par_iter_mut()
                .zip(query_points.par_iter())
                .for_each(|(out, &query)| {
                    *out = mesh.interpolate(query, &slice);
                });

            progress.update(&format!(
                "{}: interpolated time {} plev {}",
                field.name(),
                src_time[t],
                src_plev[p]
            ));
        }
    }

    let axes = FieldAxes {
        lat: target.lat().clone(),
        lon: target.lon().clone(),
        time: Some(selection.time.iter().map(|&t| src_time[t]).collect()),
        plev: Some(selection.plev.iter().map(|&p| src_plev[p]).collect()),
    };

    let mut out = Field::new(
        field.name(),
        vec![Dim::Time, Dim::Plev, Dim::Lat, Dim::Lon],
        data,
        axes,
    )?
    .with_attrs(field.attrs().clone());
    out.set_attr("grid", target.describe());
    out.set_attr("missing_value", "nan");
    Ok(out)
}
