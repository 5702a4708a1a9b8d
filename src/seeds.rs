//! Seed management for world generation
//!
//! Provides separate seeds for each generation system, derived from a
//! master seed, so individual aspects of a world can be varied or kept
//! constant independently.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Seeds for all world generation systems.
///
/// Each noise field and placement pass gets its own seed, derived from a
/// master seed by default, so the fields stay decorrelated and any single
/// pass can be regenerated in isolation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Elevation noise field
    pub elevation: u64,
    /// Moisture noise field
    pub moisture: u64,
    /// Temperature noise field
    pub temperature: u64,
    /// Energy-flow noise field
    pub energy: u64,
    /// Resource deposit placement rolls
    pub resources: u64,
    /// Special feature placement rolls
    pub features: u64,
    /// River source selection
    pub rivers: u64,
}

impl WorldSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            elevation: derive_seed(master, "elevation"),
            moisture: derive_seed(master, "moisture"),
            temperature: derive_seed(master, "temperature"),
            energy: derive_seed(master, "energy"),
            resources: derive_seed(master, "resources"),
            features: derive_seed(master, "features"),
            rivers: derive_seed(master, "rivers"),
        }
    }
}

/// Derive a sub-seed from a master seed and a system name.
/// Hashing keeps different systems on different but deterministic seeds.
fn derive_seed(master: u64, system: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    system.hash(&mut hasher);
    hasher.finish()
}

/// Parse a user-facing seed: numeric strings are used directly, anything
/// else is hashed to an integer deterministically.
pub fn parse_seed(text: &str) -> u64 {
    text.parse::<u64>().unwrap_or_else(|_| {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        hasher.finish()
    })
}

impl std::fmt::Display for WorldSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WorldSeeds {{ master: {}, elevation: {}, moisture: {}, temperature: {}, \
             energy: {}, resources: {}, features: {}, rivers: {} }}",
            self.master,
            self.elevation,
            self.moisture,
            self.temperature,
            self.energy,
            self.resources,
            self.features,
            self.rivers,
        )
    }
}
