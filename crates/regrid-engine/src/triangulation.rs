//! Delaunay triangulation and barycentric interpolation.
//!
//! The interpolant is piecewise linear: each query point is located in its
//! enclosing triangle and blended from the three vertex values. Second
//! derivatives jump at triangle edges; that is an accepted limitation of the
//! scheme, not a bug. Queries outside the convex hull yield NaN because
//! extrapolation is not supported.

use std::collections::HashMap;

use regrid_common::{RegridError, Result};

use crate::cartesian::PointMatrix;

/// Weights below this (slightly negative) bound count as outside; the slack
/// keeps points on shared triangle edges from falling between cells.
const CONTAINMENT_EPS: f64 = -1e-10;

/// A Delaunay mesh over one source field's (lat, lon) points.
///
/// Built once per source field per regrid call and owned by that call; the
/// mesh is read-only after construction and may be shared across worker
/// threads. Values are bound at query time, so the same mesh serves every
/// (time, plev) slice of its field.
#[derive(Debug, Clone)]
pub struct Triangulation {
    points: Vec<[f64; 2]>,
    triangles: Vec<[usize; 3]>,
}

impl Triangulation {
    /// Triangulate a 2-column point matrix.
    ///
    /// Fails with `DegenerateGeometry` when fewer than 3 points are supplied
    /// or all points are collinear, since no triangle can be formed.
    pub fn build(points: &PointMatrix) -> Result<Self> {
        let points = points.points_2d()?;
        Self::from_points(points)
    }

    /// Triangulate a list of 2D points.
    pub fn from_points(points: Vec<[f64; 2]>) -> Result<Self> {
        if points.len() < 3 {
            return Err(RegridError::degenerate_geometry(format!(
                "triangulation needs at least 3 points, got {}",
                points.len()
            )));
        }

        let triangles = bowyer_watson(&points);
        if triangles.is_empty() {
            return Err(RegridError::degenerate_geometry(
                "all source points are collinear",
            ));
        }

        Ok(Self { points, triangles })
    }

    /// The source points, in input order.
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    /// The triangles as vertex index triples.
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Find the triangle enclosing `query`, with its barycentric weights.
    ///
    /// Returns `None` when the query point lies outside the convex hull of
    /// the source points. Point location scans the triangle list; cost is
    /// O(triangle count) per query.
    pub fn locate(&self, query: [f64; 2]) -> Option<([usize; 3], [f64; 3])> {
        for tri in &self.triangles {
            let a = self.points[tri[0]];
            let b = self.points[tri[1]];
            let c = self.points[tri[2]];

            if let Some(weights) = barycentric(query, a, b, c) {
                if weights.iter().all(|&w| w >= CONTAINMENT_EPS) {
                    return Some((*tri, weights));
                }
            }
        }
        None
    }

    /// Piecewise-linear interpolation of `values` at `query`.
    ///
    /// `values` must parallel the source point order. Returns NaN outside the
    /// convex hull; a NaN vertex value propagates into the result, matching
    /// the missing-value convention.
    pub fn interpolate(&self, query: [f64; 2], values: &[f64]) -> f64 {
        debug_assert_eq!(values.len(), self.points.len());

        match self.locate(query) {
            Some((tri, w)) => {
                w[0] * values[tri[0]] + w[1] * values[tri[1]] + w[2] * values[tri[2]]
            }
            None => f64::NAN,
        }
    }
}

/// Barycentric weights of `p` in triangle (a, b, c); `None` for a degenerate
/// (zero-area) triangle.
fn barycentric(p: [f64; 2], a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> Option<[f64; 3]> {
    let ab = [b[0] - a[0], b[1] - a[1]];
    let ac = [c[0] - a[0], c[1] - a[1]];
    let ap = [p[0] - a[0], p[1] - a[1]];

    let d00 = ab[0] * ab[0] + ab[1] * ab[1];
    let d01 = ab[0] * ac[0] + ab[1] * ac[1];
    let d11 = ac[0] * ac[0] + ac[1] * ac[1];
    let d20 = ap[0] * ab[0] + ap[1] * ab[1];
    let d21 = ap[0] * ac[0] + ap[1] * ac[1];

    let denom = d00 * d11 - d01 * d01;
    if denom.abs() < 1e-24 {
        return None;
    }

    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    Some([1.0 - v - w, v, w])
}

struct Circumcircle {
    cx: f64,
    cy: f64,
    radius_sq: f64,
}

/// Circumcircle of (a, b, c); `None` when the points are collinear.
fn circumcircle(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> Option<Circumcircle> {
    let d = 2.0 * (a[0] * (b[1] - c[1]) + b[0] * (c[1] - a[1]) + c[0] * (a[1] - b[1]));
    if d.abs() < 1e-12 {
        return None;
    }

    let a_sq = a[0] * a[0] + a[1] * a[1];
    let b_sq = b[0] * b[0] + b[1] * b[1];
    let c_sq = c[0] * c[0] + c[1] * c[1];

    let cx = (a_sq * (b[1] - c[1]) + b_sq * (c[1] - a[1]) + c_sq * (a[1] - b[1])) / d;
    let cy = (a_sq * (c[0] - b[0]) + b_sq * (a[0] - c[0]) + c_sq * (b[0] - a[0])) / d;

    let dx = a[0] - cx;
    let dy = a[1] - cy;

    Some(Circumcircle {
        cx,
        cy,
        radius_sq: dx * dx + dy * dy,
    })
}

/// Incremental Bowyer-Watson triangulation.
///
/// The three synthetic super-triangle vertices are appended after the real
/// points, so surviving triangles keep their original vertex indices.
fn bowyer_watson(points: &[[f64; 2]]) -> Vec<[usize; 3]> {
    let n = points.len();

    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;
    for p in points {
        min_x = min_x.min(p[0]);
        min_y = min_y.min(p[1]);
        max_x = max_x.max(p[0]);
        max_y = max_y.max(p[1]);
    }

    let delta = (max_x - min_x).max(max_y - min_y).max(1.0);
    let mid_x = (min_x + max_x) / 2.0;

    let mut vertices = points.to_vec();
    vertices.push([mid_x - 20.0 * delta, min_y - delta]);
    vertices.push([mid_x, max_y + 20.0 * delta]);
    vertices.push([mid_x + 20.0 * delta, min_y - delta]);

    let mut triangles: Vec<[usize; 3]> = vec![[n, n + 1, n + 2]];

    for pi in 0..n {
        let p = vertices[pi];

        // Triangles whose circumcircle contains the new point form the
        // cavity to re-triangulate.
        let mut cavity: Vec<usize> = Vec::new();
        for (ti, tri) in triangles.iter().enumerate() {
            if let Some(cc) = circumcircle(vertices[tri[0]], vertices[tri[1]], vertices[tri[2]])
            {
                let dx = p[0] - cc.cx;
                let dy = p[1] - cc.cy;
                if dx * dx + dy * dy <= cc.radius_sq {
                    cavity.push(ti);
                }
            }
        }

        // Edges on the cavity boundary appear exactly once; interior edges
        // are shared by two cavity triangles.
        let mut edge_count: HashMap<(usize, usize), usize> = HashMap::new();
        for &ti in &cavity {
            let tri = triangles[ti];
            for (u, v) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = (u.min(v), u.max(v));
                *edge_count.entry(key).or_insert(0) += 1;
            }
        }

        // Drop cavity triangles, back to front so indices stay valid.
        for &ti in cavity.iter().rev() {
            triangles.swap_remove(ti);
        }

        for (&(u, v), &count) in &edge_count {
            if count == 1 {
                triangles.push([u, v, pi]);
            }
        }
    }

    // Discard anything still attached to the super-triangle.
    triangles.retain(|tri| tri.iter().all(|&v| v < n));
    triangles
}
