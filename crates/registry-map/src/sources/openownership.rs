//! Open Ownership beneficial ownership register survey
//!
//! Read from a CSV export of the survey spreadsheet with the columns
//! `Country, ISO2, Register launched, Who can access, Link`.

use crate::{AccessColors, CountryRecord, LinkFormat, MapError, MergeDefaults, Result};
use country_codes::IsoResolver;
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

pub const NO_REGISTER: &str = "No register";

pub const COLOR_KEY: &str = "color";
pub const LAUNCHED_KEY: &str = "register_launched";
pub const ACCESS_KEY: &str = "who_can_access";

#[derive(Debug, Deserialize)]
struct SurveyRow {
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "ISO2", default)]
    iso2: Option<String>,
    #[serde(rename = "Register launched", default)]
    launched: Option<String>,
    #[serde(rename = "Who can access", default)]
    access: Option<String>,
    #[serde(rename = "Link", default)]
    link: Option<String>,
}

/// Register accessibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Closed,
}

impl Access {
    /// Anything mentioning "public" is public; everything else, blank included, is closed
    pub fn classify(who_can_access: Option<&str>) -> Self {
        match who_can_access {
            Some(text) if text.to_lowercase().contains("public") => Access::Public,
            _ => Access::Closed,
        }
    }

    pub fn color<'c>(&self, colors: &'c AccessColors) -> &'c str {
        match self {
            Access::Public => &colors.public,
            Access::Closed => &colors.closed,
        }
    }
}

pub fn load_registers(
    path: impl AsRef<Path>,
    resolver: &IsoResolver<'_>,
    colors: &AccessColors,
) -> Result<Vec<CountryRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MapError::SourceNotFound(path.to_path_buf()));
    }
    info!("Loading register survey from {:?}", path);
    let file = std::fs::File::open(path)?;
    read_registers(file, resolver, colors)
}

/// Parse survey rows into records
///
/// The code comes from `ISO2` when it names a known country and from the
/// country name otherwise.
pub fn read_registers<R: Read>(
    reader: R,
    resolver: &IsoResolver<'_>,
    colors: &AccessColors,
) -> Result<Vec<CountryRecord>> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut records = Vec::new();

    for row in csv.deserialize::<SurveyRow>() {
        let row = row?;
        let name = row.country.trim().to_string();
        if name.is_empty() {
            continue;
        }

        let iso_code = non_empty(row.iso2.as_deref())
            .and_then(|iso2| {
                let code = resolver.resolve_alpha2(iso2);
                if code.is_none() {
                    debug!("Unknown ISO2 {:?} for {:?}, resolving by name", iso2, name);
                }
                code
            })
            .or_else(|| resolver.resolve(&name));

        let access = non_empty(row.access.as_deref());
        let launched = non_empty(row.launched.as_deref())
            .map(|y| Value::from(format_year(y)))
            .unwrap_or(Value::Null);

        let mut record = CountryRecord::new(name, iso_code)
            .with_attribute(COLOR_KEY, Access::classify(access).color(colors))
            .with_attribute(LAUNCHED_KEY, launched)
            .with_attribute(ACCESS_KEY, access.map(Value::from).unwrap_or(Value::Null));
        if let Some(link) = non_empty(row.link.as_deref()) {
            record = record.with_link(link);
        }
        records.push(record);
    }

    info!("Read {} register survey rows", records.len());
    Ok(records)
}

/// Spreadsheet exports write years as floats; numbers are truncated to
/// integers (`2017.0` → `2017`, `2020.5` → `2020`), text passes through
pub fn format_year(raw: &str) -> String {
    match raw.parse::<f64>() {
        Ok(year) if year.is_finite() => format!("{}", year.trunc() as i64),
        _ => raw.to_string(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn defaults(colors: &AccessColors) -> MergeDefaults {
    MergeDefaults::default()
        .with_attribute(COLOR_KEY, colors.no_register.as_str())
        .with_attribute(LAUNCHED_KEY, NO_REGISTER)
        .with_attribute(ACCESS_KEY, NO_REGISTER)
        .with_link(LinkFormat::new(r#"<a href="{url}" target="_blank">Open Register</a>"#))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::square_polygon;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SURVEY: &str = "\
Country,ISO2,Register launched,Who can access,Link
United Kingdom,GB,2016.0,Public access,https://find-and-update.company-information.service.gov.uk/
Germany,DE,2017,Authorities and obliged entities,
Kosovo,XK,,,
Atlantis,,2020.5,public,https://atlantis.example/
";

    fn survey() -> Vec<CountryRecord> {
        read_registers(SURVEY.as_bytes(), &IsoResolver::standard(), &AccessColors::default()).unwrap()
    }

    #[test]
    fn test_read_registers() {
        let records = survey();
        assert_eq!(records.len(), 4);

        let uk = &records[0];
        assert_eq!(uk.iso_code.map(|c| c.to_string()), Some("GBR".to_string()));
        assert_eq!(uk.attributes[COLOR_KEY], "#28a745");
        assert_eq!(uk.attributes[LAUNCHED_KEY], "2016");
        assert_eq!(uk.attributes[ACCESS_KEY], "Public access");
        assert!(uk.link.is_some());

        let germany = &records[1];
        assert_eq!(germany.iso_code.map(|c| c.to_string()), Some("DEU".to_string()));
        assert_eq!(germany.attributes[COLOR_KEY], "#ff7f0e");
        assert!(germany.link.is_none());
    }

    #[test]
    fn test_unknown_iso2_falls_back_to_name() {
        let records = survey();
        let kosovo = &records[2];
        assert_eq!(kosovo.iso_code.map(|c| c.to_string()), Some("XKX".to_string()));
        assert_eq!(kosovo.attributes[COLOR_KEY], "#ff7f0e");
        assert!(kosovo.attributes[LAUNCHED_KEY].is_null());
        assert!(kosovo.attributes[ACCESS_KEY].is_null());

        let atlantis = &records[3];
        assert!(atlantis.iso_code.is_none());
        assert_eq!(atlantis.attributes[LAUNCHED_KEY], "2020");
        assert_eq!(atlantis.attributes[COLOR_KEY], "#28a745");
    }

    #[test]
    fn test_null_values_take_defaults_after_merge() {
        let polygons = vec![square_polygon("XKX", "Kosovo"), square_polygon("NOR", "Norway")];
        let rows = crate::merge(&polygons, &survey(), &defaults(&AccessColors::default()));

        let kosovo = &rows[0];
        assert!(kosovo.matched);
        assert_eq!(kosovo.attributes[COLOR_KEY], "#ff7f0e");
        assert_eq!(kosovo.attributes[LAUNCHED_KEY], NO_REGISTER);
        assert_eq!(kosovo.popup_html, "No link");

        let norway = &rows[1];
        assert!(!norway.matched);
        assert_eq!(norway.attributes[COLOR_KEY], "#dc3545");
        assert_eq!(norway.attributes[ACCESS_KEY], NO_REGISTER);
    }

    #[test]
    fn test_configured_colors_flow_through() {
        let colors = AccessColors {
            closed: "#999999".to_string(),
            no_register: "#eeeeee".to_string(),
            ..AccessColors::default()
        };
        let records = read_registers(SURVEY.as_bytes(), &IsoResolver::standard(), &colors).unwrap();
        assert_eq!(records[0].attributes[COLOR_KEY], "#28a745");
        assert_eq!(records[1].attributes[COLOR_KEY], "#999999");

        let polygons = vec![square_polygon("NOR", "Norway")];
        let rows = crate::merge(&polygons, &records, &defaults(&colors));
        assert_eq!(rows[0].attributes[COLOR_KEY], "#eeeeee");
    }

    #[test]
    fn test_classify_access() {
        assert_eq!(Access::classify(Some("PUBLIC")), Access::Public);
        assert_eq!(Access::classify(Some("Partially public")), Access::Public);
        assert_eq!(Access::classify(Some("Competent authorities")), Access::Closed);
        assert_eq!(Access::classify(None), Access::Closed);
    }

    #[test]
    fn test_format_year() {
        assert_eq!(format_year("2017.0"), "2017");
        assert_eq!(format_year("2017"), "2017");
        assert_eq!(format_year("2020.5"), "2020");
        assert_eq!(format_year("Planned"), "Planned");
    }

    #[test]
    fn test_load_registers_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SURVEY.as_bytes()).unwrap();
        let records = load_registers(file.path(), &IsoResolver::standard(), &AccessColors::default()).unwrap();
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn test_missing_survey_file() {
        let result = load_registers(
            "/nonexistent/survey.csv",
            &IsoResolver::standard(),
            &AccessColors::default(),
        );
        assert!(matches!(result, Err(MapError::SourceNotFound(_))));
    }

    #[test]
    fn test_missing_country_column_is_error() {
        let result = read_registers(
            "Name,ISO2\nFrance,FR\n".as_bytes(),
            &IsoResolver::standard(),
            &AccessColors::default(),
        );
        assert!(matches!(result, Err(MapError::Csv(_))));
    }
}
