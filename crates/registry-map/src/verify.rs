//! Post-merge audit
//!
//! Surfaces records that silently failed to land on a polygon: names the
//! resolver could not code, and codes the geometry source does not carry.

use crate::{CountryRecord, Polygon};
use country_codes::Alpha3;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// A record whose code has no polygon
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrphanRecord {
    pub name: String,
    pub iso_code: Alpha3,
}

/// Records that could not be merged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingReport {
    /// Names with no resolved code
    pub unresolved: Vec<String>,
    /// Records coded to something outside the polygon set
    pub orphaned: Vec<OrphanRecord>,
}

impl MissingReport {
    pub fn is_empty(&self) -> bool {
        self.unresolved.is_empty() && self.orphaned.is_empty()
    }

    /// All missing names, deduplicated and sorted
    pub fn missing_countries(&self) -> Vec<String> {
        self.unresolved
            .iter()
            .cloned()
            .chain(self.orphaned.iter().map(|o| o.name.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl fmt::Display for MissingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "All countries were merged into the shapefile");
        }
        write!(f, "The following countries could not be merged into the shapefile:")?;
        for name in self.missing_countries() {
            write!(f, "\n{}", name)?;
        }
        Ok(())
    }
}

/// Audit records against the polygon set
pub fn verify(records: &[CountryRecord], polygons: &[Polygon]) -> MissingReport {
    let polygon_codes: HashSet<&str> = polygons
        .iter()
        .map(|p| p.iso_code.as_str())
        .filter(|c| !c.is_empty())
        .collect();

    let mut unresolved = BTreeSet::new();
    let mut orphaned = BTreeSet::new();

    for record in records {
        match record.iso_code {
            None => {
                unresolved.insert(record.name.clone());
            }
            Some(code) if !polygon_codes.contains(code.as_str()) => {
                orphaned.insert(OrphanRecord {
                    name: record.name.clone(),
                    iso_code: code,
                });
            }
            Some(_) => {}
        }
    }

    MissingReport {
        unresolved: unresolved.into_iter().collect(),
        orphaned: orphaned.into_iter().collect(),
    }
}
