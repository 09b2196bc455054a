//! Dataset sources
//!
//! Each source turns an external publication into `CountryRecord`s and
//! supplies the defaults its unmatched polygons fall back to.

pub mod html;
pub mod opencorporates;
pub mod openownership;

use crate::{MapConfig, MergeDefaults};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The datasets the pipeline knows how to map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    /// OpenCorporates openness ratings of company registers
    Openness,
    /// Open Ownership survey of beneficial ownership registers
    Ownership,
}

impl Dataset {
    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Openness => "openness",
            Dataset::Ownership => "ownership",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Dataset::Openness => "Openness of Company Registries, by Country",
            Dataset::Ownership => "Beneficial ownership registers worldwide",
        }
    }

    /// Values for polygons the dataset does not cover
    pub fn defaults(&self, config: &MapConfig) -> MergeDefaults {
        match self {
            Dataset::Openness => opencorporates::defaults(),
            Dataset::Ownership => openownership::defaults(&config.colors),
        }
    }

    pub fn default_output(&self) -> &'static str {
        match self {
            Dataset::Openness => "corporate_openness_map.geojson",
            Dataset::Ownership => "beneficial_ownership_map.geojson",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
