//! Common types shared across the regridding workspace.

pub mod axis;
pub mod error;
pub mod field;
pub mod lattice;
pub mod progress;

pub use axis::CoordinateAxis;
pub use error::{RegridError, Result};
pub use field::{AttrMap, Dim, Field, FieldAxes};
pub use lattice::{lattices, Lattice};
pub use progress::{LogProgress, NoopProgress, ProgressSink};
