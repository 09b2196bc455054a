//! Map configuration
//!
//! Geometry schema keys, tolerance buckets, access colours and extra
//! overrides. Defaults match the Natural Earth 1:10m admin-0 map-units layer.

use crate::{MapError, Result};
use country_codes::{IsoResolver, OverrideEntry, OverrideTable, Registry};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Property names in the geometry source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometrySchema {
    pub iso_key: String,
    pub name_key: String,
    /// `None` when the source has no sovereign column
    pub sovereign_key: Option<String>,
}

impl GeometrySchema {
    /// Natural Earth admin-0 layers
    pub fn natural_earth() -> Self {
        Self {
            iso_key: "ADM0_A3".to_string(),
            name_key: "NAME".to_string(),
            sovereign_key: Some("SOVEREIGNT".to_string()),
        }
    }

    /// OpenDataSoft world-administrative-boundaries
    pub fn world_administrative_boundaries() -> Self {
        Self {
            iso_key: "iso3".to_string(),
            name_key: "name".to_string(),
            sovereign_key: None,
        }
    }

    /// Sovereign column, treating an empty name as absent (TOML has no null)
    pub fn sovereign(&self) -> Option<&str> {
        self.sovereign_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl Default for GeometrySchema {
    fn default() -> Self {
        Self::natural_earth()
    }
}

/// Tolerance for areas strictly below `below_km2`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceBucket {
    pub below_km2: f64,
    pub tolerance: f64,
}

/// Area-bucketed simplification tolerance
///
/// Buckets are checked in ascending order and the first one whose bound
/// exceeds the area wins; anything larger gets `coarsest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceTable {
    pub buckets: Vec<ToleranceBucket>,
    pub coarsest: f64,
}

impl Default for ToleranceTable {
    fn default() -> Self {
        Self {
            buckets: vec![
                // Small islands and microstates
                ToleranceBucket { below_km2: 1_000.0, tolerance: 0.001 },
                ToleranceBucket { below_km2: 10_000.0, tolerance: 0.005 },
                ToleranceBucket { below_km2: 100_000.0, tolerance: 0.05 },
            ],
            coarsest: 0.1,
        }
    }
}

impl ToleranceTable {
    /// Tolerance for a polygon of the given area
    pub fn assign(&self, area_km2: f64) -> f64 {
        self.buckets
            .iter()
            .find(|b| area_km2 < b.below_km2)
            .map(|b| b.tolerance)
            .unwrap_or(self.coarsest)
    }

    /// Bounds must ascend and tolerances must not shrink as area grows
    pub fn validate(&self) -> Result<()> {
        let mut prev_bound = f64::NEG_INFINITY;
        let mut prev_tolerance = 0.0;
        for bucket in &self.buckets {
            if bucket.below_km2.is_nan() || bucket.below_km2 <= prev_bound {
                return Err(MapError::InvalidConfig(format!(
                    "tolerance bucket bound {} is not ascending",
                    bucket.below_km2
                )));
            }
            check_tolerance(bucket.tolerance, prev_tolerance)?;
            prev_bound = bucket.below_km2;
            prev_tolerance = bucket.tolerance;
        }
        check_tolerance(self.coarsest, prev_tolerance)
    }
}

fn check_tolerance(tolerance: f64, previous: f64) -> Result<()> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(MapError::InvalidConfig(format!(
            "tolerance {tolerance} must be finite and non-negative"
        )));
    }
    if tolerance < previous {
        return Err(MapError::InvalidConfig(format!(
            "tolerance {tolerance} is finer than the smaller bucket's {previous}"
        )));
    }
    Ok(())
}

/// Fill colours by register accessibility
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessColors {
    pub public: String,
    pub closed: String,
    /// Polygons with no register at all
    pub no_register: String,
}

impl Default for AccessColors {
    fn default() -> Self {
        Self {
            public: "#28a745".to_string(),
            closed: "#ff7f0e".to_string(),
            no_register: "#dc3545".to_string(),
        }
    }
}

impl AccessColors {
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("public", &self.public),
            ("closed", &self.closed),
            ("no_register", &self.no_register),
        ] {
            if value.trim().is_empty() {
                return Err(MapError::InvalidConfig(format!("colors.{key} must be set")));
            }
        }
        Ok(())
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub schema: GeometrySchema,
    pub tolerance: ToleranceTable,
    pub colors: AccessColors,
    /// Added to (or replacing) the built-in override table
    pub overrides: Vec<OverrideEntry>,
}

impl MapConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: MapConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MapError::SourceNotFound(path.to_path_buf()));
        }
        info!("Loading config from {:?}", path);
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema.iso_key.trim().is_empty() || self.schema.name_key.trim().is_empty() {
            return Err(MapError::InvalidConfig(
                "schema iso_key and name_key must be set".to_string(),
            ));
        }
        self.tolerance.validate()?;
        self.colors.validate()
    }

    /// Resolver over the standard registry with built-in and configured overrides
    pub fn resolver(&self) -> Result<IsoResolver<'static>> {
        let overrides = OverrideTable::builtin().with_extra(self.overrides.iter().cloned())?;
        Ok(IsoResolver::new(Registry::standard(), overrides))
    }
}
