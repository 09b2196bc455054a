//! Country name -> alpha-3 resolution

use crate::overrides::{OverridePolicy, OverrideTable};
use crate::registry::Registry;
use crate::Alpha3;
use tracing::debug;

/// Where a resolution came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionSource {
    Registry,
    Override(OverridePolicy),
}

/// A successful resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub code: Alpha3,
    pub source: ResolutionSource,
}

/// Registry lookup with override fallback
#[derive(Debug, Clone)]
pub struct IsoResolver<'r> {
    registry: &'r Registry,
    overrides: OverrideTable,
}

impl IsoResolver<'static> {
    /// Standard registry with the built-in overrides
    pub fn standard() -> Self {
        Self::new(Registry::standard(), OverrideTable::builtin())
    }
}

impl<'r> IsoResolver<'r> {
    pub fn new(registry: &'r Registry, overrides: OverrideTable) -> Self {
        Self {
            registry,
            overrides,
        }
    }

    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    /// Resolve a free-text country name to its alpha-3 code
    pub fn resolve(&self, name: &str) -> Option<Alpha3> {
        self.resolve_detailed(name).map(|r| r.code)
    }

    /// Resolve, reporting which stage matched
    pub fn resolve_detailed(&self, name: &str) -> Option<Resolution> {
        if let Some(code) = self
            .registry
            .lookup(name)
            .and_then(|entry| Alpha3::parse(entry.alpha_3).ok())
        {
            return Some(Resolution {
                code,
                source: ResolutionSource::Registry,
            });
        }

        match self.overrides.get(name) {
            Some(entry) => {
                debug!("Manual mapping applied for {:?}: {}", name, entry.code);
                Some(Resolution {
                    code: entry.code,
                    source: ResolutionSource::Override(entry.policy.clone()),
                })
            }
            None => {
                debug!("No ISO code found for {:?}", name);
                None
            }
        }
    }

    /// Convert an alpha-2 code; unknown codes are absent
    pub fn resolve_alpha2(&self, code: &str) -> Option<Alpha3> {
        let code = code.trim();
        if code.len() != 2 {
            return None;
        }
        self.registry
            .by_alpha2(code)
            .and_then(|entry| Alpha3::parse(entry.alpha_3).ok())
    }
}
