//! Country polygon loading
//!
//! Reads a GeoJSON FeatureCollection, normalizes the ISO key, measures each
//! polygon in the Equal Earth projection (EPSG:8857) and simplifies it in
//! its original lon/lat coordinates with an area-bucketed tolerance.

use crate::config::{GeometrySchema, MapConfig};
use crate::{MapError, Polygon, Result};
use geo::{Area, Coord, CoordsIter, Geometry, MapCoords, MultiPolygon, SimplifyVwPreserve};
use geojson::{FeatureCollection, GeoJson, JsonObject, JsonValue};
use std::path::Path;
use tracing::{debug, info, warn};

/// WGS84 semi-major axis (m)
const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening
const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// Equal Earth polynomial coefficients
const A1: f64 = 1.340_264;
const A2: f64 = -0.081_106;
const A3: f64 = 0.000_893;
const A4: f64 = 0.003_796;

/// Ellipsoidal Equal Earth projection on WGS84 (EPSG:8857)
#[derive(Debug, Clone, Copy)]
pub struct EqualEarth {
    e: f64,
    qp: f64,
    /// Authalic sphere radius (m)
    rq: f64,
}

impl EqualEarth {
    pub fn wgs84() -> Self {
        let e2 = WGS84_F * (2.0 - WGS84_F);
        let e = e2.sqrt();
        let qp = authalic_q(1.0, e);
        let rq = WGS84_A * (qp / 2.0).sqrt();
        Self { e, qp, rq }
    }

    pub fn authalic_radius(&self) -> f64 {
        self.rq
    }

    /// Project lon/lat degrees to metres
    pub fn forward(&self, coord: Coord<f64>) -> Coord<f64> {
        let lambda = coord.x.to_radians();
        let phi = coord.y.clamp(-90.0, 90.0).to_radians();

        // Authalic latitude
        let sin_beta = (authalic_q(phi.sin(), self.e) / self.qp).clamp(-1.0, 1.0);

        let m = 3f64.sqrt() / 2.0;
        let theta = (m * sin_beta).asin();
        let t2 = theta * theta;
        let t6 = t2 * t2 * t2;

        let x = self.rq * 2.0 * 3f64.sqrt() * lambda * theta.cos()
            / (3.0 * (9.0 * A4 * t6 * t2 + 7.0 * A3 * t6 + 3.0 * A2 * t2 + A1));
        let y = self.rq * theta * (A1 + A2 * t2 + t6 * (A3 + A4 * t2));

        Coord { x, y }
    }
}

fn authalic_q(sin_phi: f64, e: f64) -> f64 {
    let e2 = e * e;
    let es = e * sin_phi;
    (1.0 - e2) * (sin_phi / (1.0 - es * es) - (1.0 / (2.0 * e)) * ((1.0 - es) / (1.0 + es)).ln())
}

/// Strip whitespace and uppercase an ISO key
pub fn normalize_iso_key(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Area in km² measured in the Equal Earth projection
pub fn area_km2(geometry: &MultiPolygon<f64>) -> f64 {
    let projection = EqualEarth::wgs84();
    let projected = geometry.map_coords(|c| projection.forward(c));
    projected.unsigned_area() / 1.0e6
}

/// Topology-preserving simplification
///
/// `tolerance` is a distance in degrees; Visvalingam-Whyatt works on
/// triangle areas so the threshold is its square. A non-positive tolerance
/// returns the geometry unchanged.
pub fn simplify(geometry: &MultiPolygon<f64>, tolerance: f64) -> MultiPolygon<f64> {
    if tolerance <= 0.0 || tolerance.is_nan() {
        return geometry.clone();
    }
    geometry.simplify_vw_preserve(&(tolerance * tolerance))
}

/// Load polygons from a GeoJSON file
pub fn load_polygons(path: impl AsRef<Path>, config: &MapConfig) -> Result<Vec<Polygon>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MapError::SourceNotFound(path.to_path_buf()));
    }
    info!("Loading polygons from {:?}", path);

    let raw = std::fs::read_to_string(path)?;
    let collection = match raw.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(MapError::NotAFeatureCollection(path.to_path_buf())),
    };

    Ok(polygons_from_collection(collection, config))
}

/// Build polygons from parsed features, in feature order
///
/// Features without areal geometry are skipped; missing ISO keys pass
/// through as empty strings and never match a record.
pub fn polygons_from_collection(collection: FeatureCollection, config: &MapConfig) -> Vec<Polygon> {
    let schema = &config.schema;
    let mut polygons = Vec::with_capacity(collection.features.len());
    let mut skipped = 0;
    let mut vertices_in = 0;
    let mut vertices_out = 0;

    for (i, feature) in collection.features.into_iter().enumerate() {
        let properties = feature.properties.as_ref();
        let iso_code = property_str(properties, &schema.iso_key)
            .map(|raw| normalize_iso_key(&raw))
            .unwrap_or_default();

        let Some(geometry) = feature.geometry else {
            warn!("Feature {} ({:?}) has no geometry, skipping", i, iso_code);
            skipped += 1;
            continue;
        };
        let multi = match Geometry::<f64>::try_from(geometry) {
            Ok(Geometry::Polygon(p)) => MultiPolygon::new(vec![p]),
            Ok(Geometry::MultiPolygon(mp)) => mp,
            Ok(_) => {
                warn!("Feature {} ({:?}) is not areal, skipping", i, iso_code);
                skipped += 1;
                continue;
            }
            Err(e) => {
                warn!("Feature {} ({:?}) has invalid geometry: {}", i, iso_code, e);
                skipped += 1;
                continue;
            }
        };

        vertices_in += multi.coords_count();
        let polygon = build_polygon(iso_code, properties, schema, multi, config);
        vertices_out += polygon.geometry.coords_count();
        polygons.push(polygon);
    }

    info!(
        "Loaded {} polygons ({} skipped), simplified {} -> {} vertices",
        polygons.len(),
        skipped,
        vertices_in,
        vertices_out
    );

    polygons
}

fn build_polygon(
    iso_code: String,
    properties: Option<&JsonObject>,
    schema: &GeometrySchema,
    geometry: MultiPolygon<f64>,
    config: &MapConfig,
) -> Polygon {
    let display_name = property_str(properties, &schema.name_key).unwrap_or_else(|| iso_code.clone());
    let sovereign_name = schema
        .sovereign()
        .and_then(|key| property_str(properties, key));

    let area_km2 = area_km2(&geometry);
    let tolerance = config.tolerance.assign(area_km2);
    let simplified = simplify(&geometry, tolerance);

    debug!(
        "{} {:?}: {:.1} km², tolerance {}",
        iso_code, display_name, area_km2, tolerance
    );

    Polygon {
        iso_code,
        display_name,
        sovereign_name,
        geometry: simplified,
        area_km2,
        tolerance,
    }
}

fn property_str(properties: Option<&JsonObject>, key: &str) -> Option<String> {
    match properties?.get(key)? {
        JsonValue::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
