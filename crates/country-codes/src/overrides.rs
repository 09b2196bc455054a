//! Manual override table
//!
//! Names that the ISO registry cannot resolve: World Bank style phrasings
//! ("Congo, Dem. Rep."), colloquial names ("Russia"), superseded names
//! ("Swaziland") and codes outside ISO 3166-1 ("Kosovo").
//!
//! Some entries deliberately map a territory onto its sovereign state's code.
//! Natural Earth map units draw the French overseas departments as part of
//! France, so data reported for them is attributed to `FRA`. These entries are
//! tagged [`OverridePolicy::Sovereign`] so the reassignment stays explicit.

use crate::{Alpha3, CodeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Why an override exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverridePolicy {
    /// Alternate spelling of an ISO country
    Alias,
    /// Territory attributed to its sovereign state
    Sovereign { sovereign: String },
    /// Code outside ISO 3166-1 (user-assigned or historical)
    NonStandard,
}

/// One override mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub name: String,
    pub code: Alpha3,
    pub policy: OverridePolicy,
    #[serde(default)]
    pub note: String,
}

impl OverrideEntry {
    pub fn new(name: impl Into<String>, code: Alpha3, policy: OverridePolicy) -> Self {
        Self {
            name: name.into(),
            code,
            policy,
            note: String::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn is_reassignment(&self) -> bool {
        matches!(self.policy, OverridePolicy::Sovereign { .. })
    }
}

/// Built-in overrides: (name, code, policy, note)
const BUILTIN: &[(&str, &str, Policy, &str)] = &[
    ("Russia", "RUS", Policy::Alias, ""),
    ("Bolivia", "BOL", Policy::Alias, ""),
    ("Vietnam", "VNM", Policy::Alias, ""),
    ("Tanzania", "TZA", Policy::Alias, ""),
    ("Moldova", "MDA", Policy::Alias, ""),
    ("Syria", "SYR", Policy::Alias, ""),
    ("Laos", "LAO", Policy::Alias, ""),
    ("Venezuela", "VEN", Policy::Alias, ""),
    ("Iran", "IRN", Policy::Alias, ""),
    ("Egypt", "EGY", Policy::Alias, ""),
    ("Bahamas, The", "BHS", Policy::Alias, "World Bank phrasing"),
    ("Congo, Dem. Rep.", "COD", Policy::Alias, "World Bank phrasing"),
    ("Congo, Rep.", "COG", Policy::Alias, "World Bank phrasing"),
    ("Egypt, Arab Rep.", "EGY", Policy::Alias, "World Bank phrasing"),
    (
        "French Guiana",
        "FRA",
        Policy::Sovereign("France"),
        "Overseas department drawn as part of France",
    ),
    ("Gambia, The", "GMB", Policy::Alias, "World Bank phrasing"),
    (
        "Guadeloupe",
        "FRA",
        Policy::Sovereign("France"),
        "Overseas department drawn as part of France",
    ),
    ("Hong Kong Sar", "HKG", Policy::Alias, "Title-cased SAR suffix"),
    ("Iran, Islamic Rep.", "IRN", Policy::Alias, "World Bank phrasing"),
    ("Korea, Rep.", "KOR", Policy::Alias, "World Bank phrasing"),
    (
        "Kosovo",
        "XKX",
        Policy::NonStandard,
        "User-assigned code; absent from most shapefiles",
    ),
    ("Lao Pdr", "LAO", Policy::Alias, "World Bank phrasing"),
    ("Macedonia, Fyr", "MKD", Policy::Alias, "Pre-2019 name"),
    (
        "Martinique",
        "FRA",
        Policy::Sovereign("France"),
        "Overseas department drawn as part of France",
    ),
    (
        "Mayotte",
        "FRA",
        Policy::Sovereign("France"),
        "Overseas department drawn as part of France",
    ),
    ("Micronesia, Fed. Sts.", "FSM", Policy::Alias, "World Bank phrasing"),
    (
        "Réunion",
        "FRA",
        Policy::Sovereign("France"),
        "Overseas department drawn as part of France",
    ),
    ("South Sudan", "SSD", Policy::Alias, ""),
    ("St. Kitts and Nevis", "KNA", Policy::Alias, "Abbreviated saint"),
    ("St. Lucia", "LCA", Policy::Alias, "Abbreviated saint"),
    (
        "St. Vincent and the Grenadines",
        "VCT",
        Policy::Alias,
        "Abbreviated saint",
    ),
    ("Swaziland", "SWZ", Policy::Alias, "Renamed Eswatini in 2018"),
    ("São Tomé and Príncipe", "STP", Policy::Alias, "Accented spelling"),
    ("Turkey", "TUR", Policy::Alias, "Renamed Türkiye in ISO 3166-1"),
    ("Venezuela, Rb", "VEN", Policy::Alias, "World Bank phrasing"),
    ("West Bank and Gaza", "PSE", Policy::Alias, "World Bank phrasing"),
    ("Yemen, Rep.", "YEM", Policy::Alias, "World Bank phrasing"),
];

/// Const-friendly mirror of [`OverridePolicy`]
#[derive(Debug, Clone, Copy)]
enum Policy {
    Alias,
    Sovereign(&'static str),
    NonStandard,
}

impl From<Policy> for OverridePolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Alias => OverridePolicy::Alias,
            Policy::Sovereign(sovereign) => OverridePolicy::Sovereign {
                sovereign: sovereign.to_string(),
            },
            Policy::NonStandard => OverridePolicy::NonStandard,
        }
    }
}

/// Immutable name -> override mapping, keyed case-insensitively
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    entries: HashMap<String, OverrideEntry>,
}

impl OverrideTable {
    /// Build from entries; duplicate keys are rejected
    pub fn new(entries: impl IntoIterator<Item = OverrideEntry>) -> Result<Self> {
        let mut table = HashMap::new();
        for entry in entries {
            let key = normalize_key(&entry.name);
            if table.contains_key(&key) {
                return Err(CodeError::DuplicateOverride(entry.name));
            }
            table.insert(key, entry);
        }
        Ok(Self { entries: table })
    }

    /// The built-in table
    pub fn builtin() -> Self {
        let entries = BUILTIN.iter().filter_map(|&(name, code, policy, note)| {
            Alpha3::parse(code)
                .ok()
                .map(|code| OverrideEntry::new(name, code, policy.into()).with_note(note))
        });
        // Keys in BUILTIN are unique (checked by tests)
        Self::new(entries).unwrap_or_default()
    }

    /// Add entries on top of this table; an extra entry replaces a built-in
    /// with the same key, but extras may not collide with each other
    pub fn with_extra(mut self, extra: impl IntoIterator<Item = OverrideEntry>) -> Result<Self> {
        let extra = Self::new(extra)?;
        self.entries.extend(extra.entries);
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&OverrideEntry> {
        self.entries.get(&normalize_key(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that attribute a territory to its sovereign state
    pub fn reassignments(&self) -> impl Iterator<Item = &OverrideEntry> {
        self.entries.values().filter(|e| e.is_reassignment())
    }
}

fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}
