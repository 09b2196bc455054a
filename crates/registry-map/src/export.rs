//! GeoJSON export of merged rows

use crate::config::GeometrySchema;
use crate::sources::Dataset;
use crate::{MergedRow, Reconciliation, Result};
use chrono::{DateTime, Utc};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue};
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Summary attached to the collection as a `metadata` foreign member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub dataset: Dataset,
    pub title: String,
    pub polygon_count: usize,
    pub record_count: usize,
    pub matched_count: usize,
    pub missing_countries: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl ExportMetadata {
    pub fn new(dataset: Dataset, record_count: usize, reconciliation: &Reconciliation<'_>) -> Self {
        Self {
            dataset,
            title: dataset.title().to_string(),
            polygon_count: reconciliation.rows.len(),
            record_count,
            matched_count: reconciliation.matched_count(),
            missing_countries: reconciliation.report.missing_countries(),
            generated_at: Utc::now(),
        }
    }
}

/// One feature per row, in row order
///
/// `sovereign_state` is emitted (possibly null) only when the schema names a
/// sovereign column.
pub fn to_feature_collection(
    rows: &[MergedRow<'_>],
    metadata: &ExportMetadata,
    schema: &GeometrySchema,
) -> Result<FeatureCollection> {
    let with_sovereign = schema.sovereign().is_some();
    let features = rows
        .iter()
        .map(|row| to_feature(row, with_sovereign))
        .collect();

    let mut foreign_members = JsonObject::new();
    foreign_members.insert("metadata".to_string(), serde_json::to_value(metadata)?);

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(foreign_members),
    })
}

/// Record attributes go in first so the fixed keys below always win
fn to_feature(row: &MergedRow<'_>, with_sovereign: bool) -> Feature {
    let polygon = row.polygon;
    let mut properties = row.attributes.clone();
    properties.insert("country".to_string(), JsonValue::from(row.country.as_str()));
    properties.insert("iso_code".to_string(), JsonValue::from(polygon.iso_code.as_str()));
    if with_sovereign {
        properties.insert(
            "sovereign_state".to_string(),
            polygon
                .sovereign_name
                .as_deref()
                .map(JsonValue::from)
                .unwrap_or(JsonValue::Null),
        );
    }
    properties.insert("area_km2".to_string(), JsonValue::from(polygon.area_km2));
    properties.insert("tolerance".to_string(), JsonValue::from(polygon.tolerance));
    properties.insert("popup_html".to_string(), JsonValue::from(row.popup_html.as_str()));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(&polygon.geometry))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

pub fn write_feature_collection(path: impl AsRef<Path>, collection: &FeatureCollection) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, collection)?;
    writer.flush()?;
    info!(
        "Wrote {} features to {:?}",
        collection.features.len(),
        path
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::square_polygon;
    use crate::{reconcile, CountryRecord, MergeDefaults};
    use country_codes::Alpha3;
    use geojson::GeoJson;
    use tempfile::tempdir;

    fn fixture() -> (Vec<crate::Polygon>, Vec<CountryRecord>) {
        let mut france = square_polygon("FRA", "France");
        france.sovereign_name = Some("France".to_string());
        let polygons = vec![france, square_polygon("NOR", "Norway")];
        let records = vec![
            CountryRecord::new("France", Alpha3::parse("FRA").ok())
                .with_link("http://registries.opencorporates.com/jurisdiction/fr")
                .with_attribute("openness_score", 60),
            CountryRecord::new("Atlantis", None),
        ];
        (polygons, records)
    }

    #[test]
    fn test_feature_properties() {
        let (polygons, records) = fixture();
        let defaults = MergeDefaults::default().with_attribute("openness_score", 0);
        let result = reconcile(&polygons, &records, &defaults);
        let metadata = ExportMetadata::new(Dataset::Openness, records.len(), &result);
        let fc = to_feature_collection(&result.rows, &metadata, &GeometrySchema::natural_earth()).unwrap();

        assert_eq!(fc.features.len(), 2);
        let france = fc.features[0].properties.as_ref().unwrap();
        assert_eq!(france["country"], "France");
        assert_eq!(france["iso_code"], "FRA");
        assert_eq!(france["sovereign_state"], "France");
        assert_eq!(france["openness_score"], 60);
        assert_eq!(france["tolerance"], 0.05);

        let norway = fc.features[1].properties.as_ref().unwrap();
        assert_eq!(norway["country"], "Norway");
        assert!(norway["sovereign_state"].is_null());
        assert_eq!(norway["openness_score"], 0);
        assert_eq!(norway["popup_html"], "No link");

        let meta = &fc.foreign_members.as_ref().unwrap()["metadata"];
        assert_eq!(meta["dataset"], "openness");
        assert_eq!(meta["matched_count"], 1);
        assert_eq!(meta["missing_countries"][0], "Atlantis");
    }

    #[test]
    fn test_attributes_cannot_shadow_fixed_properties() {
        let polygons = vec![square_polygon("FRA", "France")];
        let records = vec![CountryRecord::new("France", Alpha3::parse("FRA").ok())
            .with_attribute("country", "Spoofed")
            .with_attribute("iso_code", "XXX")
            .with_attribute("popup_html", "<script></script>")
            .with_attribute("openness_score", 60)];
        let result = reconcile(&polygons, &records, &MergeDefaults::default());
        let metadata = ExportMetadata::new(Dataset::Openness, records.len(), &result);
        let fc = to_feature_collection(&result.rows, &metadata, &GeometrySchema::default()).unwrap();

        let props = fc.features[0].properties.as_ref().unwrap();
        assert_eq!(props["country"], "France");
        assert_eq!(props["iso_code"], "FRA");
        assert_eq!(props["popup_html"], "No link");
        assert_eq!(props["openness_score"], 60);
    }

    #[test]
    fn test_write_to_unwritable_path_is_error() {
        let (polygons, records) = fixture();
        let result = reconcile(&polygons, &records, &MergeDefaults::default());
        let metadata = ExportMetadata::new(Dataset::Openness, records.len(), &result);
        let fc = to_feature_collection(&result.rows, &metadata, &GeometrySchema::default()).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("map.geojson");
        assert!(matches!(write_feature_collection(&path, &fc), Err(crate::MapError::Io(_))));
    }

    #[test]
    fn test_no_sovereign_column() {
        let (polygons, records) = fixture();
        let result = reconcile(&polygons, &records, &MergeDefaults::default());
        let metadata = ExportMetadata::new(Dataset::Ownership, records.len(), &result);
        let schema = GeometrySchema::world_administrative_boundaries();
        let fc = to_feature_collection(&result.rows, &metadata, &schema).unwrap();
        assert!(!fc.features[0].properties.as_ref().unwrap().contains_key("sovereign_state"));
    }

    #[test]
    fn test_write_and_read_back() {
        let (polygons, records) = fixture();
        let result = reconcile(&polygons, &records, &MergeDefaults::default());
        let metadata = ExportMetadata::new(Dataset::Openness, records.len(), &result);
        let fc = to_feature_collection(&result.rows, &metadata, &GeometrySchema::default()).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("map.geojson");
        write_feature_collection(&path, &fc).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        match raw.parse::<GeoJson>().unwrap() {
            GeoJson::FeatureCollection(read) => {
                assert_eq!(read.features.len(), 2);
                assert!(read.features[0].geometry.is_some());
            }
            other => panic!("expected a FeatureCollection, got {:?}", other),
        }
    }
}
