//! Triangulation-Based Regridding Engine
//!
//! This crate resamples scalar fields from one latitude/longitude lattice
//! onto another using Delaunay triangulation and piecewise-linear
//! (barycentric) interpolation. It enables:
//!
//! - **Common-grid analysis**: bring fields from different archives onto one
//!   lattice before comparing or differencing them
//! - **Honest missing data**: points outside the source coverage are NaN,
//!   never extrapolated
//! - **Slice independence**: one mesh per source field serves every
//!   (time, plev) slice
//!
//! # Architecture
//!
//! ```text
//! Source fields
//!      │
//!      ▼
//! resolve target lattice (union policy / canned lattice / explicit)
//!      │
//!      ├─► cartesian_product(target axes) ──► query points
//!      │
//!      ├─► cartesian_product(source axes) ──► Triangulation::build
//!      │                                          │
//!      └─► per (time, plev) slice:                │
//!               bind slice values ────────────────┤
//!               interpolate each query point ◄────┘
//!                    │
//!                    ▼
//!            assemble output Field (grid + missing_value attrs)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use regrid_common::NoopProgress;
//! use regrid_engine::{regrid_single, RegridTarget};
//!
//! // Resample onto the built-in 2.5-degree lattice.
//! let resampled = regrid_single(&field, RegridTarget::Default, &mut NoopProgress)?;
//! assert_eq!(resampled.attr("grid").and_then(|v| v.as_str()), Some("GRID_025"));
//! ```

pub mod cartesian;
pub mod config;
pub mod normalize;
pub mod regrid;
pub mod triangulation;
pub mod union;

// Re-export commonly used types at crate root
pub use cartesian::{cartesian_product, PointMatrix};
pub use config::{RegridConfig, TargetPolicy};
pub use normalize::{gaussian_smooth, standardize_latlon, transpose_if_needed};
pub use regrid::{regrid_multi, regrid_single, RegridTarget};
pub use triangulation::Triangulation;
pub use union::{union_coordinates, UnionCoords};
