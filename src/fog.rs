//! Per-observer fog of war
//!
//! Tracks a visibility state per coordinate and only ever upgrades it:
//! Unexplored to Partial to Full, never back. A reveal covers a hex disc,
//! with a one-ring partial rim at the outer edge. Only non-default states
//! are stored, so memory scales with explored area, not world size.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::coords::AxialCoord;

/// Width of the partially-visible rim at the edge of a reveal.
pub const PARTIAL_RIM_WIDTH: i32 = 1;

/// Visibility states, ordered so upgrades compare with `>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Unexplored,
    Partial,
    Full,
}

/// A visibility upgrade produced by a reveal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealEvent {
    pub coord: AxialCoord,
    pub from: Visibility,
    pub to: Visibility,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FogOfWar {
    states: HashMap<AxialCoord, Visibility>,
}

impl FogOfWar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current visibility of a coordinate. Anything never revealed is
    /// Unexplored.
    pub fn visibility(&self, coord: AxialCoord) -> Visibility {
        self.states
            .get(&coord)
            .copied()
            .unwrap_or(Visibility::Unexplored)
    }

    /// Reveal a disc: Full out to `radius - PARTIAL_RIM_WIDTH`, Partial in
    /// the rim beyond. Returns one event per coordinate whose state
    /// actually changed; re-revealing already-Full ground yields nothing.
    pub fn reveal_area(&mut self, center: AxialCoord, radius: i32) -> Vec<RevealEvent> {
        if radius < 0 {
            return Vec::new();
        }
        let full_radius = (radius - PARTIAL_RIM_WIDTH).max(0);

        let mut events = Vec::new();
        for coord in center.within_radius(radius) {
            let target = if center.distance(&coord) <= full_radius {
                Visibility::Full
            } else {
                Visibility::Partial
            };
            let current = self.visibility(coord);
            if target > current {
                self.states.insert(coord, target);
                events.push(RevealEvent {
                    coord,
                    from: current,
                    to: target,
                });
            }
        }
        events
    }

    /// Number of coordinates that are at least partially explored.
    pub fn explored_count(&self) -> usize {
        self.states.len()
    }

    /// Snapshot into the serializable record form, sorted by (r, q).
    pub fn to_record(&self) -> FogRecord {
        let mut cells: Vec<FogCell> = self
            .states
            .iter()
            .map(|(coord, &state)| FogCell {
                q: coord.q,
                r: coord.r,
                state,
            })
            .collect();
        cells.sort_by_key(|c| (c.r, c.q));
        FogRecord { cells }
    }

    pub fn from_record(record: FogRecord) -> Self {
        let states = record
            .cells
            .into_iter()
            .filter(|c| c.state != Visibility::Unexplored)
            .map(|c| (AxialCoord::new(c.q, c.r), c.state))
            .collect();
        Self { states }
    }
}

/// Compact persisted form: only non-Unexplored cells.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FogRecord {
    pub cells: Vec<FogCell>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FogCell {
    pub q: i32,
    pub r: i32,
    pub state: Visibility,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_reveal_disc_shape() {
        let mut fog = FogOfWar::new();
        let center = AxialCoord::ORIGIN;
        fog.reveal_area(center, 3);

        for coord in center.within_radius(5) {
            let d = center.distance(&coord);
            let expected = if d <= 2 {
                Visibility::Full
            } else if d == 3 {
                Visibility::Partial
            } else {
                Visibility::Unexplored
            };
            assert_eq!(fog.visibility(coord), expected, "at distance {}", d);
        }
        assert_eq!(
            fog.visibility(AxialCoord::new(10, 0)),
            Visibility::Unexplored
        );
    }

    #[test]
    fn test_events_report_changes_only() {
        let mut fog = FogOfWar::new();
        let first = fog.reveal_area(AxialCoord::ORIGIN, 2);
        // 3r(r+1) + 1 coordinates at radius 2.
        assert_eq!(first.len(), 19);

        // Same reveal again: the disc is already at its target states.
        let second = fog.reveal_area(AxialCoord::ORIGIN, 2);
        assert!(second.is_empty());

        // A bigger reveal upgrades the old rim and uncovers new ground.
        let third = fog.reveal_area(AxialCoord::ORIGIN, 3);
        assert!(!third.is_empty());
        for event in &third {
            assert!(event.to > event.from);
        }
    }

    #[test]
    fn test_visibility_never_downgrades() {
        let mut fog = FogOfWar::new();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut best: HashMap<AxialCoord, Visibility> = HashMap::new();

        for _ in 0..60 {
            let center = AxialCoord::new(rng.gen_range(-8..=8), rng.gen_range(-8..=8));
            let radius = rng.gen_range(0..=4);
            fog.reveal_area(center, radius);

            for coord in center.within_radius(radius) {
                let seen = fog.visibility(coord);
                let prior = best.get(&coord).copied().unwrap_or(Visibility::Unexplored);
                assert!(seen >= prior);
                best.insert(coord, seen);
            }
        }
    }

    #[test]
    fn test_zero_radius_reveals_center_only() {
        // full_radius clamps to 0, so the center itself goes Full.
        let mut fog = FogOfWar::new();
        let events = fog.reveal_area(AxialCoord::ORIGIN, 0);
        assert_eq!(events.len(), 1);
        assert_eq!(fog.visibility(AxialCoord::ORIGIN), Visibility::Full);
    }

    #[test]
    fn test_record_round_trip() {
        let mut fog = FogOfWar::new();
        fog.reveal_area(AxialCoord::new(2, -1), 3);
        fog.reveal_area(AxialCoord::new(-4, 4), 1);

        let record = fog.to_record();
        let json = serde_json::to_string(&record).unwrap();
        let parsed: FogRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(FogOfWar::from_record(parsed), fog);
    }
}
