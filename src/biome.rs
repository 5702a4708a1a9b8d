//! Biome classification and per-biome data tables
//!
//! Biomes are classified from the three generated scalars (elevation,
//! moisture, temperature) by an ordered rule list: first matching rule
//! wins, and the final fallback makes the classification total. All
//! thresholds are named constants, and per-biome spawn rules live in
//! lookup tables rather than per-biome code paths.

use serde::{Deserialize, Serialize};

// =============================================================================
// CLASSIFICATION THRESHOLDS
// =============================================================================

/// Below this elevation the tile is open water.
pub const OCEAN_MAX_ELEVATION: f32 = 0.25;
/// Below this elevation (and above ocean) the tile is shallow coastal water.
pub const COASTAL_MAX_ELEVATION: f32 = 0.32;
/// At or above this elevation the tile is a snow-capped peak.
pub const PEAK_MIN_ELEVATION: f32 = 0.88;
/// At or above this elevation the tile is mountain terrain.
pub const MOUNTAIN_MIN_ELEVATION: f32 = 0.75;

/// Below this temperature the climate band is cold.
pub const COLD_MAX_TEMPERATURE: f32 = 0.25;
/// At or above this temperature the climate band is hot.
pub const HOT_MIN_TEMPERATURE: f32 = 0.70;

/// Below this moisture a hot tile is desert.
pub const DRY_MAX_MOISTURE: f32 = 0.30;
/// At or above this moisture a hot tile is rainforest (savanna between).
pub const WET_MIN_MOISTURE: f32 = 0.65;
/// At or above this moisture a cold tile supports boreal forest, and a
/// temperate tile supports forest.
pub const FOREST_MIN_MOISTURE: f32 = 0.45;
/// At or above this moisture a temperate tile is wetland.
pub const WETLAND_MIN_MOISTURE: f32 = 0.78;

/// Hard cap on point features placed per tile (rivers not included).
pub const MAX_FEATURES_PER_TILE: usize = 2;

// =============================================================================
// BIOMES
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Biome {
    Ocean,
    CoastalWater,
    Plains,
    Forest,
    Wetland,
    Rainforest,
    Savanna,
    Desert,
    Tundra,
    BorealForest,
    Mountain,
    SnowyPeaks,
}

impl Biome {
    /// Classify a (elevation, moisture, temperature) triple, each in [0, 1].
    ///
    /// Rules are evaluated in order; the first match wins. Elevation rules
    /// come first (water, then peaks), then the climate bands split on
    /// moisture. The fallback arm guarantees totality: every reachable
    /// triple maps to exactly one biome.
    pub fn classify(elevation: f32, moisture: f32, temperature: f32) -> Biome {
        if elevation < OCEAN_MAX_ELEVATION {
            return Biome::Ocean;
        }
        if elevation < COASTAL_MAX_ELEVATION {
            return Biome::CoastalWater;
        }
        if elevation >= PEAK_MIN_ELEVATION {
            return Biome::SnowyPeaks;
        }
        if elevation >= MOUNTAIN_MIN_ELEVATION {
            return Biome::Mountain;
        }

        if temperature < COLD_MAX_TEMPERATURE {
            if moisture >= FOREST_MIN_MOISTURE {
                return Biome::BorealForest;
            }
            return Biome::Tundra;
        }

        if temperature >= HOT_MIN_TEMPERATURE {
            if moisture < DRY_MAX_MOISTURE {
                return Biome::Desert;
            }
            if moisture < WET_MIN_MOISTURE {
                return Biome::Savanna;
            }
            return Biome::Rainforest;
        }

        // Temperate band
        if moisture >= WETLAND_MIN_MOISTURE {
            return Biome::Wetland;
        }
        if moisture >= FOREST_MIN_MOISTURE {
            return Biome::Forest;
        }
        Biome::Plains
    }

    pub fn all() -> &'static [Biome] {
        &[
            Biome::Ocean,
            Biome::CoastalWater,
            Biome::Plains,
            Biome::Forest,
            Biome::Wetland,
            Biome::Rainforest,
            Biome::Savanna,
            Biome::Desert,
            Biome::Tundra,
            Biome::BorealForest,
            Biome::Mountain,
            Biome::SnowyPeaks,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Biome::Ocean => "Ocean",
            Biome::CoastalWater => "Coastal Water",
            Biome::Plains => "Plains",
            Biome::Forest => "Forest",
            Biome::Wetland => "Wetland",
            Biome::Rainforest => "Rainforest",
            Biome::Savanna => "Savanna",
            Biome::Desert => "Desert",
            Biome::Tundra => "Tundra",
            Biome::BorealForest => "Boreal Forest",
            Biome::Mountain => "Mountain",
            Biome::SnowyPeaks => "Snowy Peaks",
        }
    }

    pub fn is_water(&self) -> bool {
        matches!(self, Biome::Ocean | Biome::CoastalWater)
    }

    /// Per-step traversal cost multiplier, or `None` when the biome is not
    /// walkable. Costs never drop below 1.0 so the hex-distance heuristic
    /// stays admissible.
    pub fn move_cost(&self) -> Option<f32> {
        match self {
            Biome::Ocean | Biome::CoastalWater | Biome::SnowyPeaks => None,
            Biome::Plains | Biome::Savanna => Some(1.0),
            Biome::Tundra => Some(1.2),
            Biome::Forest | Biome::BorealForest | Biome::Desert => Some(1.5),
            Biome::Wetland | Biome::Rainforest => Some(2.0),
            Biome::Mountain => Some(3.0),
        }
    }

    /// Color for minimap rendering.
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Biome::Ocean => (30, 60, 120),
            Biome::CoastalWater => (60, 100, 160),
            Biome::Plains => (140, 170, 80),
            Biome::Forest => (40, 100, 40),
            Biome::Wetland => (80, 120, 70),
            Biome::Rainforest => (20, 90, 40),
            Biome::Savanna => (170, 160, 80),
            Biome::Desert => (210, 180, 120),
            Biome::Tundra => (180, 190, 170),
            Biome::BorealForest => (50, 80, 50),
            Biome::Mountain => (140, 140, 130),
            Biome::SnowyPeaks => (245, 248, 250),
        }
    }

    /// Single-character glyph for terminal previews.
    pub fn glyph(&self) -> char {
        match self {
            Biome::Ocean => '~',
            Biome::CoastalWater => ',',
            Biome::Plains => '"',
            Biome::Forest => 'T',
            Biome::Wetland => 'w',
            Biome::Rainforest => 'r',
            Biome::Savanna => ';',
            Biome::Desert => 'd',
            Biome::Tundra => ':',
            Biome::BorealForest => 'B',
            Biome::Mountain => '^',
            Biome::SnowyPeaks => 'A',
        }
    }
}

// =============================================================================
// RESOURCES
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    Wood,
    Stone,
    IronOre,
    CopperOre,
    Crystal,
    Berries,
    Fish,
    Clay,
}

impl ResourceKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceKind::Wood => "Wood",
            ResourceKind::Stone => "Stone",
            ResourceKind::IronOre => "Iron Ore",
            ResourceKind::CopperOre => "Copper Ore",
            ResourceKind::Crystal => "Crystal",
            ResourceKind::Berries => "Berries",
            ResourceKind::Fish => "Fish",
            ResourceKind::Clay => "Clay",
        }
    }
}

/// One entry in a biome's resource spawn table.
#[derive(Clone, Copy, Debug)]
pub struct ResourceRule {
    pub kind: ResourceKind,
    /// Spawn probability per tile, rolled once per rule.
    pub probability: f32,
    pub min_amount: u32,
    pub max_amount: u32,
}

macro_rules! resource_table {
    ($(($kind:ident, $probability:expr, $min:expr, $max:expr)),+ $(,)?) => {
        &[$(ResourceRule {
            kind: ResourceKind::$kind,
            probability: $probability,
            min_amount: $min,
            max_amount: $max,
        }),+]
    };
}

/// Resource spawn table per biome. Rules are rolled in listed order, one
/// probability roll each, so generation from a fixed seed is reproducible.
pub fn resource_rules(biome: Biome) -> &'static [ResourceRule] {
    match biome {
        Biome::Ocean => resource_table![(Fish, 0.35, 20, 80)],
        Biome::CoastalWater => resource_table![(Fish, 0.55, 30, 100), (Clay, 0.15, 10, 40)],
        Biome::Plains => resource_table![
            (Berries, 0.25, 10, 40),
            (Clay, 0.20, 15, 50),
            (Stone, 0.10, 20, 60),
        ],
        Biome::Forest => resource_table![
            (Wood, 0.80, 40, 120),
            (Berries, 0.35, 10, 35),
            (Stone, 0.10, 15, 50),
        ],
        Biome::Wetland => resource_table![(Clay, 0.50, 20, 70), (Berries, 0.20, 5, 25)],
        Biome::Rainforest => resource_table![(Wood, 0.85, 60, 150), (Berries, 0.45, 15, 45)],
        Biome::Savanna => resource_table![(Berries, 0.20, 5, 25), (Stone, 0.15, 20, 60)],
        Biome::Desert => resource_table![(Stone, 0.30, 25, 80), (Clay, 0.15, 10, 35)],
        Biome::Tundra => resource_table![(Stone, 0.25, 20, 60)],
        Biome::BorealForest => resource_table![
            (Wood, 0.70, 35, 100),
            (Berries, 0.15, 5, 20),
            (Stone, 0.15, 15, 50),
        ],
        Biome::Mountain => resource_table![
            (Stone, 0.70, 50, 150),
            (IronOre, 0.30, 20, 70),
            (CopperOre, 0.25, 15, 60),
            (Crystal, 0.08, 5, 20),
        ],
        Biome::SnowyPeaks => resource_table![(Stone, 0.40, 30, 90), (Crystal, 0.12, 5, 25)],
    }
}

// =============================================================================
// FEATURES
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeatureKind {
    Landmark,
    Hazard,
    Ruin,
    Spring,
    Cave,
    River,
}

impl FeatureKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            FeatureKind::Landmark => "Landmark",
            FeatureKind::Hazard => "Hazard",
            FeatureKind::Ruin => "Ruin",
            FeatureKind::Spring => "Spring",
            FeatureKind::Cave => "Cave",
            FeatureKind::River => "River",
        }
    }
}

/// One entry in a biome's feature spawn table.
#[derive(Clone, Copy, Debug)]
pub struct FeatureRule {
    pub kind: FeatureKind,
    pub sub_type: &'static str,
    pub probability: f32,
}

macro_rules! feature_table {
    ($(($kind:ident, $sub_type:expr, $probability:expr)),+ $(,)?) => {
        &[$(FeatureRule {
            kind: FeatureKind::$kind,
            sub_type: $sub_type,
            probability: $probability,
        }),+]
    };
}

/// Feature spawn table per biome. Same fixed-order rolling contract as
/// [`resource_rules`]. Rivers are placed by the linear-feature pass, not
/// from these tables.
pub fn feature_rules(biome: Biome) -> &'static [FeatureRule] {
    match biome {
        Biome::Ocean => &[],
        Biome::CoastalWater => feature_table![(Landmark, "sea_stack", 0.02)],
        Biome::Plains => feature_table![
            (Ruin, "standing_stones", 0.03),
            (Landmark, "lone_hill", 0.02),
        ],
        Biome::Forest => feature_table![
            (Landmark, "ancient_tree", 0.04),
            (Ruin, "overgrown_shrine", 0.02),
        ],
        Biome::Wetland => feature_table![(Hazard, "sinkhole", 0.05), (Spring, "bog_spring", 0.03)],
        Biome::Rainforest => feature_table![
            (Ruin, "vine_temple", 0.03),
            (Hazard, "thorn_thicket", 0.04),
        ],
        Biome::Savanna => feature_table![(Landmark, "termite_spires", 0.03)],
        Biome::Desert => feature_table![
            (Ruin, "buried_temple", 0.03),
            (Hazard, "quicksand", 0.04),
            (Spring, "oasis_spring", 0.02),
        ],
        Biome::Tundra => feature_table![(Landmark, "frost_monolith", 0.02)],
        Biome::BorealForest => feature_table![(Cave, "bear_den", 0.03)],
        Biome::Mountain => feature_table![
            (Cave, "crystal_cavern", 0.05),
            (Landmark, "peak_shrine", 0.02),
            (Hazard, "rockslide", 0.04),
        ],
        Biome::SnowyPeaks => feature_table![(Hazard, "crevasse", 0.05)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_is_total() {
        // Sample the full scalar cube; every triple must classify without
        // panicking, and repeated classification must agree (exactly one
        // rule matches per triple by construction of the ordered list).
        let steps = 21;
        for e in 0..steps {
            for m in 0..steps {
                for t in 0..steps {
                    let elevation = e as f32 / (steps - 1) as f32;
                    let moisture = m as f32 / (steps - 1) as f32;
                    let temperature = t as f32 / (steps - 1) as f32;
                    let a = Biome::classify(elevation, moisture, temperature);
                    let b = Biome::classify(elevation, moisture, temperature);
                    assert_eq!(a, b);
                }
            }
        }
    }

    #[test]
    fn test_elevation_rules_win_first() {
        // Water and peaks ignore climate entirely.
        assert_eq!(Biome::classify(0.1, 0.9, 0.9), Biome::Ocean);
        assert_eq!(Biome::classify(0.28, 0.0, 0.0), Biome::CoastalWater);
        assert_eq!(Biome::classify(0.95, 0.9, 0.9), Biome::SnowyPeaks);
        assert_eq!(Biome::classify(0.80, 0.5, 0.5), Biome::Mountain);
    }

    #[test]
    fn test_climate_quadrants() {
        let mid = 0.5;
        assert_eq!(Biome::classify(mid, 0.1, 0.1), Biome::Tundra);
        assert_eq!(Biome::classify(mid, 0.6, 0.1), Biome::BorealForest);
        assert_eq!(Biome::classify(mid, 0.1, 0.9), Biome::Desert);
        assert_eq!(Biome::classify(mid, 0.5, 0.9), Biome::Savanna);
        assert_eq!(Biome::classify(mid, 0.8, 0.9), Biome::Rainforest);
        assert_eq!(Biome::classify(mid, 0.8, 0.5), Biome::Wetland);
        assert_eq!(Biome::classify(mid, 0.5, 0.5), Biome::Forest);
        assert_eq!(Biome::classify(mid, 0.1, 0.5), Biome::Plains);
    }

    #[test]
    fn test_water_is_not_walkable() {
        for biome in Biome::all() {
            if biome.is_water() {
                assert!(biome.move_cost().is_none());
            }
        }
        assert!(Biome::Plains.move_cost().is_some());
    }

    #[test]
    fn test_spawn_tables_are_sane() {
        for &biome in Biome::all() {
            for rule in resource_rules(biome) {
                assert!(rule.probability >= 0.0 && rule.probability <= 1.0);
                assert!(rule.min_amount <= rule.max_amount);
                assert!(rule.max_amount > 0);
            }
            for rule in feature_rules(biome) {
                assert!(rule.probability >= 0.0 && rule.probability <= 1.0);
                assert!(!rule.sub_type.is_empty());
            }
        }
    }
}
