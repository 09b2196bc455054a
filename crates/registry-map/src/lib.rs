//! Registry Map
//!
//! Joins country-level company-registry datasets onto world polygons and
//! produces an enriched polygon table for choropleth rendering.
//!
//! # Pipeline
//!
//! ```text
//! records ──► IsoResolver ──┐
//!                           ├──► merge ──► verify ──► export (GeoJSON)
//! GeoJSON ──► geometry ─────┘
//! ```
//!
//! | Stage    | Module      | Output |
//! |----------|-------------|--------|
//! | Resolve  | `country_codes` | `CountryRecord::iso_code` |
//! | Geometry | [`geometry`] | `Polygon` with area and tolerance |
//! | Merge    | [`merge`]   | one `MergedRow` per polygon |
//! | Verify   | [`verify`]  | `MissingReport` (advisory) |
//!
//! Every polygon survives the merge; records that fail to land on a polygon
//! are reported, never fatal.

use country_codes::{Alpha3, CodeError, IsoResolver};
use geo::MultiPolygon;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

pub mod config;
pub mod export;
pub mod geometry;
pub mod merge;
pub mod sources;
pub mod verify;

pub use config::{AccessColors, GeometrySchema, MapConfig, ToleranceBucket, ToleranceTable};
pub use merge::{merge, LinkFormat, MergeDefaults};
pub use verify::{verify, MissingReport, OrphanRecord};

/// Attribute bag carried by records and merged rows
pub type Attributes = Map<String, Value>;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Source not found at {0:?}")]
    SourceNotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("Expected a GeoJSON FeatureCollection in {0:?}")]
    NotAFeatureCollection(PathBuf),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Country code error: {0}")]
    Code(#[from] CodeError),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to retrieve {url}: status {status}")]
    HttpStatus { url: String, status: u16 },
}

pub type Result<T> = std::result::Result<T, MapError>;

/// One row of source data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    /// Country name as written in the source
    pub name: String,
    /// Resolved alpha-3 code; `None` when resolution failed
    pub iso_code: Option<Alpha3>,
    /// Raw register URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Source-specific values (score, access classification, ...)
    #[serde(default)]
    pub attributes: Attributes,
}

impl CountryRecord {
    pub fn new(name: impl Into<String>, iso_code: Option<Alpha3>) -> Self {
        Self {
            name: name.into(),
            iso_code,
            link: None,
            attributes: Attributes::new(),
        }
    }

    /// Create a record, resolving its code from the name
    pub fn resolved(name: impl Into<String>, resolver: &IsoResolver<'_>) -> Self {
        let name = name.into();
        let iso_code = resolver.resolve(&name);
        Self::new(name, iso_code)
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// One country or map unit from the geometry source
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Normalized ISO key; may be empty or non-ISO ("-99") for upstream gaps
    pub iso_code: String,
    pub display_name: String,
    pub sovereign_name: Option<String>,
    /// Simplified geometry in the source projection (lon/lat)
    pub geometry: MultiPolygon<f64>,
    /// Area measured in the Equal Earth projection
    pub area_km2: f64,
    pub tolerance: f64,
}

/// A polygon with its (possibly defaulted) data
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow<'a> {
    pub polygon: &'a Polygon,
    /// Record name when matched, polygon display name otherwise
    pub country: String,
    pub matched: bool,
    pub attributes: Attributes,
    /// Formatted link or the no-link marker
    pub popup_html: String,
}

/// Merge output plus its audit
#[derive(Debug, Clone)]
pub struct Reconciliation<'a> {
    pub rows: Vec<MergedRow<'a>>,
    pub report: MissingReport,
}

impl Reconciliation<'_> {
    pub fn matched_count(&self) -> usize {
        self.rows.iter().filter(|r| r.matched).count()
    }
}

/// Merge records onto polygons and audit the result
pub fn reconcile<'a>(
    polygons: &'a [Polygon],
    records: &[CountryRecord],
    defaults: &MergeDefaults,
) -> Reconciliation<'a> {
    let rows = merge(polygons, records, defaults);
    let report = verify(records, polygons);

    if report.is_empty() {
        info!("All {} records merged onto polygons", records.len());
    } else {
        warn!("{}", report);
    }

    Reconciliation { rows, report }
}
