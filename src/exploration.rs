//! Discovery bookkeeping
//!
//! Records what an explorer has found: locations, resource deposits, and
//! special features. Registration is idempotent per (kind, coordinate,
//! sub-type), and every statistic is derived from the record list, never
//! counted separately, so the two can never drift apart.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::biome::{FeatureKind, ResourceKind};
use crate::coords::AxialCoord;
use crate::fog::{FogOfWar, RevealEvent, Visibility};
use crate::map::WorldMap;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscoveryKind {
    Resource(ResourceKind),
    Feature(FeatureKind),
    Location,
}

impl DiscoveryKind {
    /// Statistics bucket this discovery counts toward.
    pub fn category(&self) -> &'static str {
        match self {
            DiscoveryKind::Resource(_) => "resource",
            DiscoveryKind::Feature(_) => "feature",
            DiscoveryKind::Location => "location",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryRecord {
    pub kind: DiscoveryKind,
    #[serde(flatten)]
    pub coord: AxialCoord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    /// Game tick at which the discovery was made, supplied by the caller.
    pub tick: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExplorationTracker {
    records: Vec<DiscoveryRecord>,
    seen: HashSet<(DiscoveryKind, AxialCoord, Option<String>)>,
}

impl ExplorationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a discovery. Returns false (and records nothing) when the
    /// same (kind, coordinate, sub-type) was already registered.
    pub fn register_discovery(
        &mut self,
        kind: DiscoveryKind,
        coord: AxialCoord,
        sub_type: Option<String>,
        tick: u64,
    ) -> bool {
        let key = (kind.clone(), coord, sub_type.clone());
        if !self.seen.insert(key) {
            return false;
        }
        self.records.push(DiscoveryRecord {
            kind,
            coord,
            sub_type,
            tick,
        });
        true
    }

    pub fn records(&self) -> &[DiscoveryRecord] {
        &self.records
    }

    /// Discovery counts per category, folded from the records.
    pub fn discovery_statistics(&self) -> HashMap<&'static str, usize> {
        let mut stats = HashMap::new();
        for record in &self.records {
            *stats.entry(record.kind.category()).or_insert(0) += 1;
        }
        stats
    }

    /// Fraction of map tiles at least partially revealed, in [0, 1].
    /// Fog cells outside the map do not count.
    pub fn exploration_percentage(&self, fog: &FogOfWar, map: &WorldMap) -> f32 {
        if map.is_empty() {
            return 0.0;
        }
        let explored = map
            .tiles()
            .filter(|t| fog.visibility(t.coord) >= Visibility::Partial)
            .count();
        explored as f32 / map.len() as f32
    }

    /// Fold a batch of reveal events into the map and the discovery log.
    /// Partial visibility marks the tile explored and logs the location;
    /// full visibility additionally uncovers its deposits and features.
    pub fn absorb_reveals(
        &mut self,
        map: &mut WorldMap,
        events: &[RevealEvent],
        tick: u64,
    ) {
        for event in events {
            let tile = match map.get_tile_mut(event.coord) {
                Some(t) => t,
                None => continue,
            };

            if event.to >= Visibility::Partial && !tile.explored {
                tile.explored = true;
                self.register_discovery(DiscoveryKind::Location, event.coord, None, tick);
            }

            if event.to == Visibility::Full {
                let mut found: Vec<(DiscoveryKind, Option<String>)> = Vec::new();
                for deposit in &mut tile.resources {
                    deposit.discovered = true;
                    found.push((DiscoveryKind::Resource(deposit.kind), None));
                }
                for feature in &mut tile.features {
                    feature.discovered = true;
                    found.push((
                        DiscoveryKind::Feature(feature.kind),
                        Some(feature.sub_type.clone()),
                    ));
                }
                for (kind, sub_type) in found {
                    self.register_discovery(kind, event.coord, sub_type, tick);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::Biome;
    use crate::map::{Feature, ResourceDeposit, Tile};

    fn small_world() -> WorldMap {
        let mut map = WorldMap::new(6, 6, 0);
        for coord in AxialCoord::ORIGIN.within_radius(3) {
            let mut tile = Tile::new(coord, Biome::Plains, 0.5, 0.4, 0.5, 0.5);
            if coord == AxialCoord::new(1, 0) {
                tile.resources.push(ResourceDeposit {
                    kind: ResourceKind::Stone,
                    amount: 40,
                    quality: 0.6,
                    discovered: false,
                });
                tile.features.push(Feature {
                    kind: FeatureKind::Ruin,
                    sub_type: "standing_stones".to_string(),
                    discovered: false,
                });
            }
            map.insert_tile(tile);
        }
        map
    }

    #[test]
    fn test_registration_is_idempotent() {
        let mut tracker = ExplorationTracker::new();
        let coord = AxialCoord::new(2, -1);

        assert!(tracker.register_discovery(DiscoveryKind::Location, coord, None, 5));
        assert!(!tracker.register_discovery(DiscoveryKind::Location, coord, None, 9));
        assert_eq!(tracker.records().len(), 1);
        assert_eq!(tracker.records()[0].tick, 5);
    }

    #[test]
    fn test_distinct_sub_types_are_distinct_discoveries() {
        let mut tracker = ExplorationTracker::new();
        let coord = AxialCoord::ORIGIN;
        let kind = DiscoveryKind::Feature(FeatureKind::Ruin);

        assert!(tracker.register_discovery(kind.clone(), coord, Some("a".into()), 1));
        assert!(tracker.register_discovery(kind, coord, Some("b".into()), 1));
        assert_eq!(tracker.records().len(), 2);
    }

    #[test]
    fn test_statistics_derive_from_records() {
        let mut tracker = ExplorationTracker::new();
        tracker.register_discovery(DiscoveryKind::Location, AxialCoord::new(0, 0), None, 1);
        tracker.register_discovery(DiscoveryKind::Location, AxialCoord::new(1, 0), None, 2);
        tracker.register_discovery(
            DiscoveryKind::Resource(ResourceKind::Wood),
            AxialCoord::new(1, 0),
            None,
            2,
        );

        let stats = tracker.discovery_statistics();
        assert_eq!(stats.get("location"), Some(&2));
        assert_eq!(stats.get("resource"), Some(&1));
        assert_eq!(stats.get("feature"), None);
        assert_eq!(stats.values().sum::<usize>(), tracker.records().len());
    }

    #[test]
    fn test_absorb_reveals_marks_and_logs() {
        let mut map = small_world();
        let mut fog = FogOfWar::new();
        let mut tracker = ExplorationTracker::new();

        let events = fog.reveal_area(AxialCoord::ORIGIN, 2);
        tracker.absorb_reveals(&mut map, &events, 10);

        let tile = map.get_tile(AxialCoord::new(1, 0)).unwrap();
        assert!(tile.explored);
        assert!(tile.resources[0].discovered);
        assert!(tile.features[0].discovered);

        let stats = tracker.discovery_statistics();
        assert_eq!(stats.get("resource"), Some(&1));
        assert_eq!(stats.get("feature"), Some(&1));
        assert!(stats.get("location").copied().unwrap_or(0) > 0);

        // Absorbing the same (now empty) reveal again changes nothing.
        let before = tracker.records().len();
        let repeat = fog.reveal_area(AxialCoord::ORIGIN, 2);
        tracker.absorb_reveals(&mut map, &repeat, 11);
        assert_eq!(tracker.records().len(), before);
    }

    #[test]
    fn test_exploration_percentage() {
        let map = small_world();
        let mut fog = FogOfWar::new();
        let tracker = ExplorationTracker::new();

        assert_eq!(tracker.exploration_percentage(&fog, &map), 0.0);

        fog.reveal_area(AxialCoord::ORIGIN, 1);
        // 7 of 37 tiles revealed at least partially.
        let pct = tracker.exploration_percentage(&fog, &map);
        assert!((pct - 7.0 / 37.0).abs() < 1e-5);

        fog.reveal_area(AxialCoord::ORIGIN, 20);
        assert!((tracker.exploration_percentage(&fog, &map) - 1.0).abs() < 1e-6);
    }
}
