//! Left join of records onto polygons

use crate::{Attributes, CountryRecord, MergedRow, Polygon};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

/// Wraps a record link for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkFormat {
    /// `{url}` and `{name}` are substituted
    pub template: String,
    /// Used when there is no link
    pub no_link: String,
}

impl Default for LinkFormat {
    fn default() -> Self {
        Self {
            template: r#"<a href="{url}" target="_blank">{name}</a>"#.to_string(),
            no_link: "No link".to_string(),
        }
    }
}

impl LinkFormat {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            ..Self::default()
        }
    }

    pub fn render(&self, url: Option<&str>, name: &str) -> String {
        match url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => self.template.replace("{url}", url).replace("{name}", name),
            None => self.no_link.clone(),
        }
    }
}

/// Values used where a polygon has no record (or a record lacks a value)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeDefaults {
    pub attributes: Attributes,
    pub link: LinkFormat,
}

impl MergeDefaults {
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_link(mut self, link: LinkFormat) -> Self {
        self.link = link;
        self
    }
}

/// Left outer join on ISO code
///
/// Every polygon appears exactly once, in input order. When several records
/// share a code the last one in input order wins.
pub fn merge<'a>(
    polygons: &'a [Polygon],
    records: &[CountryRecord],
    defaults: &MergeDefaults,
) -> Vec<MergedRow<'a>> {
    let mut by_code: HashMap<&str, &CountryRecord> = HashMap::with_capacity(records.len());
    for record in records {
        let Some(code) = record.iso_code.as_ref() else {
            continue;
        };
        if let Some(previous) = by_code.insert(code.as_str(), record) {
            debug!(
                "{} claimed by both {:?} and {:?}, keeping the latter",
                code, previous.name, record.name
            );
        }
    }

    let rows: Vec<MergedRow<'a>> = polygons
        .iter()
        .map(|polygon| {
            let record = (!polygon.iso_code.is_empty())
                .then(|| by_code.get(polygon.iso_code.as_str()).copied())
                .flatten();
            merge_row(polygon, record, defaults)
        })
        .collect();

    info!(
        "Merged {} records onto {} polygons ({} matched)",
        records.len(),
        rows.len(),
        rows.iter().filter(|r| r.matched).count()
    );

    rows
}

fn merge_row<'a>(
    polygon: &'a Polygon,
    record: Option<&CountryRecord>,
    defaults: &MergeDefaults,
) -> MergedRow<'a> {
    let mut attributes = defaults.attributes.clone();
    let country = match record {
        Some(record) => {
            for (key, value) in &record.attributes {
                // Nulls fall back to the default
                if !value.is_null() {
                    attributes.insert(key.clone(), value.clone());
                }
            }
            record.name.clone()
        }
        None => polygon.display_name.clone(),
    };

    let link = record.and_then(|r| r.link.as_deref());
    let popup_html = defaults.link.render(link, &country);

    MergedRow {
        polygon,
        country,
        matched: record.is_some(),
        attributes,
        popup_html,
    }
}
