//! Configuration for regrid operations.
//!
//! The original search-parameter bags were free-form dictionaries; here the
//! recognized fields are enumerated so unknown policies fail loudly and
//! early.

use std::fmt;

use serde::{Deserialize, Serialize};

use regrid_common::{lattices, Lattice, RegridError, Result};

/// Policy for resolving the destination lattice of a multi-field regrid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetPolicy {
    /// Dimension-wise union of all source coordinates.
    #[default]
    Union,
    /// Pole-inclusive 30-degree lattice (7 x 12); development and testing.
    Latlon30,
    /// Pole-inclusive 5-degree lattice (37 x 72); enough simplices to be
    /// interesting, small enough to be quick.
    Latlon5,
    /// Pole-inclusive 1-degree lattice (181 x 360).
    Latlon1,
}

impl TargetPolicy {
    /// Parse a policy name. Unknown names fail with `UnsupportedLattice`.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "union" => Ok(Self::Union),
            "latlon_30" => Ok(Self::Latlon30),
            "latlon_5" => Ok(Self::Latlon5),
            "latlon_1" => Ok(Self::Latlon1),
            other => Err(RegridError::unsupported_lattice(other)),
        }
    }

    /// The canned lattice for this policy; `None` for the union policy,
    /// which depends on the input fields.
    pub fn lattice(&self) -> Option<Lattice> {
        match self {
            Self::Union => None,
            Self::Latlon30 => Some(lattices::latlon_30()),
            Self::Latlon5 => Some(lattices::latlon_5()),
            Self::Latlon1 => Some(lattices::latlon_1()),
        }
    }
}

impl fmt::Display for TargetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Union => "union",
            Self::Latlon30 => "latlon_30",
            Self::Latlon5 => "latlon_5",
            Self::Latlon1 => "latlon_1",
        };
        write!(f, "{}", name)
    }
}

/// Configuration for `regrid_multi`.
///
/// Regrid time scales linearly with the number of (time, plev) slices, so
/// the level subsets let a caller bound the work explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegridConfig {
    /// How to resolve the destination lattice.
    pub target: TargetPolicy,

    /// Time indices to regrid; all of them when `None`.
    pub time_levels: Option<Vec<usize>>,

    /// Pressure-level indices to regrid; all of them when `None`.
    pub plev_levels: Option<Vec<usize>>,
}

impl RegridConfig {
    /// Configuration for a named target policy with all slices selected.
    pub fn with_target(target: TargetPolicy) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("REGRID_TARGET_LATTICE") {
            if let Ok(policy) = TargetPolicy::from_name(&val) {
                config.target = policy;
            }
        }

        if let Ok(val) = std::env::var("REGRID_TIME_LEVELS") {
            config.time_levels = parse_index_list(&val);
        }

        if let Ok(val) = std::env::var("REGRID_PLEV_LEVELS") {
            config.plev_levels = parse_index_list(&val);
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if matches!(self.time_levels.as_deref(), Some([])) {
            return Err(RegridError::invalid_axis(
                "time_levels must not be an empty list",
            ));
        }
        if matches!(self.plev_levels.as_deref(), Some([])) {
            return Err(RegridError::invalid_axis(
                "plev_levels must not be an empty list",
            ));
        }
        Ok(())
    }
}

fn parse_index_list(val: &str) -> Option<Vec<usize>> {
    let indices: std::result::Result<Vec<usize>, _> =
        val.split(',').map(|s| s.trim().parse()).collect();
    indices.ok().filter(|v: &Vec<usize>| !v.is_empty())
}
