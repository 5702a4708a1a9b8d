//! World map container and tile data
//!
//! The map owns every generated tile, keyed by axial coordinate, and is
//! the single source of truth for terrain attributes, resource deposits,
//! and special features. Persistence is a flat JSON record with tiles in
//! deterministic (r, q) order.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::biome::{Biome, FeatureKind, ResourceKind};
use crate::coords::AxialCoord;
use crate::error::WorldError;

// =============================================================================
// TILE DATA
// =============================================================================

/// A harvestable resource deposit on a tile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceDeposit {
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    /// Remaining harvestable units.
    pub amount: u32,
    /// Yield multiplier in [0, 1].
    pub quality: f32,
    #[serde(default)]
    pub discovered: bool,
}

impl ResourceDeposit {
    /// Remove up to `requested` units, returning how many were actually
    /// taken. Never underflows; a depleted deposit yields 0.
    pub fn harvest(&mut self, requested: u32) -> u32 {
        let taken = requested.min(self.amount);
        self.amount -= taken;
        taken
    }

    pub fn is_depleted(&self) -> bool {
        self.amount == 0
    }
}

/// A special point or linear feature on a tile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    pub sub_type: String,
    #[serde(default)]
    pub discovered: bool,
}

/// One biome's share of a blended tile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiomeInfluence {
    pub biome: Biome,
    pub weight: f32,
}

/// A single hex tile with all its generated attributes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    #[serde(flatten)]
    pub coord: AxialCoord,
    pub biome: Biome,
    pub elevation: f32,
    pub moisture: f32,
    pub temperature: f32,
    pub energy: f32,
    /// Dominant biome influences, strongest first.
    #[serde(default)]
    pub blend: Vec<BiomeInfluence>,
    #[serde(default)]
    pub resources: Vec<ResourceDeposit>,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub explored: bool,
}

impl Tile {
    pub fn new(
        coord: AxialCoord,
        biome: Biome,
        elevation: f32,
        moisture: f32,
        temperature: f32,
        energy: f32,
    ) -> Self {
        Self {
            coord,
            biome,
            elevation,
            moisture,
            temperature,
            energy,
            blend: Vec::new(),
            resources: Vec::new(),
            features: Vec::new(),
            explored: false,
        }
    }

    pub fn is_walkable(&self) -> bool {
        self.biome.move_cost().is_some()
    }

    /// Traversal cost of stepping onto this tile, if walkable.
    pub fn move_cost(&self) -> Option<f32> {
        self.biome.move_cost()
    }

    pub fn has_feature(&self, kind: FeatureKind) -> bool {
        self.features.iter().any(|f| f.kind == kind)
    }

    /// Harvest from the first deposit of the given kind on this tile.
    /// Returns `None` when no such deposit exists.
    pub fn harvest(&mut self, kind: ResourceKind, requested: u32) -> Option<u32> {
        self.resources
            .iter_mut()
            .find(|d| d.kind == kind)
            .map(|d| d.harvest(requested))
    }
}

// =============================================================================
// WORLD MAP
// =============================================================================

/// The generated world: configured extent plus every tile in it.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldMap {
    width: u32,
    height: u32,
    seed: u64,
    tiles: HashMap<AxialCoord, Tile>,
}

impl WorldMap {
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        Self {
            width,
            height,
            seed,
            tiles: HashMap::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn insert_tile(&mut self, tile: Tile) {
        self.tiles.insert(tile.coord, tile);
    }

    pub fn get_tile(&self, coord: AxialCoord) -> Option<&Tile> {
        self.tiles.get(&coord)
    }

    pub fn get_tile_mut(&mut self, coord: AxialCoord) -> Option<&mut Tile> {
        self.tiles.get_mut(&coord)
    }

    pub fn contains(&self, coord: AxialCoord) -> bool {
        self.tiles.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.values_mut()
    }

    /// Tiles adjacent to `coord` that exist in the map. Off-map neighbors
    /// are simply absent; edge tiles have fewer than 6.
    pub fn neighbors(&self, coord: AxialCoord) -> Vec<&Tile> {
        coord
            .neighbors()
            .iter()
            .filter_map(|c| self.tiles.get(c))
            .collect()
    }

    /// Harvest a resource at a coordinate. `None` when the tile does not
    /// exist or carries no deposit of that kind.
    pub fn harvest(&mut self, coord: AxialCoord, kind: ResourceKind, requested: u32) -> Option<u32> {
        self.tiles.get_mut(&coord)?.harvest(kind, requested)
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    /// Snapshot into the serializable record form. Tiles sort by (r, q)
    /// so identical maps serialize byte-identically.
    pub fn to_record(&self) -> WorldMapRecord {
        let mut tiles: Vec<Tile> = self.tiles.values().cloned().collect();
        tiles.sort_by_key(|t| (t.coord.r, t.coord.q));
        WorldMapRecord {
            width: self.width,
            height: self.height,
            seed: self.seed,
            tiles,
        }
    }

    /// Rebuild a map from a record, rejecting structural corruption.
    pub fn from_record(record: WorldMapRecord) -> Result<Self, WorldError> {
        let mut map = WorldMap::new(record.width, record.height, record.seed);
        for tile in record.tiles {
            if map.tiles.contains_key(&tile.coord) {
                return Err(WorldError::CorruptState(format!(
                    "duplicate tile at ({}, {})",
                    tile.coord.q, tile.coord.r
                )));
            }
            map.insert_tile(tile);
        }
        Ok(map)
    }

    pub fn to_json(&self) -> Result<String, WorldError> {
        serde_json::to_string(&self.to_record())
            .map_err(|e| WorldError::CorruptState(format!("serialize failed: {e}")))
    }

    /// Parse a JSON snapshot. Any malformed field, including an unknown
    /// biome name, fails the whole load.
    pub fn from_json(json: &str) -> Result<Self, WorldError> {
        let record: WorldMapRecord = serde_json::from_str(json)
            .map_err(|e| WorldError::CorruptState(format!("parse failed: {e}")))?;
        Self::from_record(record)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), WorldError> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, WorldError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Flat serializable form of a [`WorldMap`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldMapRecord {
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    pub tiles: Vec<Tile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tile(q: i32, r: i32, biome: Biome) -> Tile {
        Tile::new(AxialCoord::new(q, r), biome, 0.5, 0.5, 0.5, 0.5)
    }

    #[test]
    fn test_harvest_clamps_to_remaining() {
        let mut deposit = ResourceDeposit {
            kind: ResourceKind::Wood,
            amount: 10,
            quality: 0.8,
            discovered: false,
        };
        assert_eq!(deposit.harvest(4), 4);
        assert_eq!(deposit.amount, 6);
        assert_eq!(deposit.harvest(100), 6);
        assert!(deposit.is_depleted());
        assert_eq!(deposit.harvest(1), 0);
    }

    #[test]
    fn test_map_harvest_through_tile() {
        let mut map = WorldMap::new(4, 4, 1);
        let mut tile = sample_tile(1, 2, Biome::Forest);
        tile.resources.push(ResourceDeposit {
            kind: ResourceKind::Wood,
            amount: 50,
            quality: 1.0,
            discovered: true,
        });
        map.insert_tile(tile);

        let coord = AxialCoord::new(1, 2);
        assert_eq!(map.harvest(coord, ResourceKind::Wood, 20), Some(20));
        assert_eq!(map.harvest(coord, ResourceKind::Stone, 20), None);
        assert_eq!(map.harvest(AxialCoord::new(9, 9), ResourceKind::Wood, 1), None);
    }

    #[test]
    fn test_missing_tile_is_none() {
        let map = WorldMap::new(4, 4, 1);
        assert!(map.get_tile(AxialCoord::new(0, 0)).is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let mut map = WorldMap::new(8, 8, 42);
        let mut tile = sample_tile(0, 0, Biome::Plains);
        tile.blend.push(BiomeInfluence {
            biome: Biome::Plains,
            weight: 0.75,
        });
        tile.features.push(Feature {
            kind: FeatureKind::Ruin,
            sub_type: "standing_stones".to_string(),
            discovered: false,
        });
        map.insert_tile(tile);
        map.insert_tile(sample_tile(3, -1, Biome::Mountain));

        let json = map.to_json().unwrap();
        let restored = WorldMap::from_json(&json).unwrap();
        assert_eq!(map, restored);
    }

    #[test]
    fn test_tile_record_is_flat() {
        let tile = sample_tile(5, -3, Biome::Desert);
        let json = serde_json::to_string(&tile).unwrap();
        assert!(json.contains("\"q\":5"));
        assert!(json.contains("\"r\":-3"));
        assert!(json.contains("\"biome\":\"Desert\""));
    }

    #[test]
    fn test_unknown_biome_fails_load() {
        let mut map = WorldMap::new(2, 2, 7);
        map.insert_tile(sample_tile(0, 0, Biome::Tundra));
        let json = map.to_json().unwrap();
        let corrupted = json.replace("Tundra", "LavaFields");
        assert!(matches!(
            WorldMap::from_json(&corrupted),
            Err(WorldError::CorruptState(_))
        ));
    }

    #[test]
    fn test_duplicate_tile_fails_load() {
        let tile = sample_tile(0, 0, Biome::Plains);
        let record = WorldMapRecord {
            width: 2,
            height: 2,
            seed: 1,
            tiles: vec![tile.clone(), tile],
        };
        assert!(matches!(
            WorldMap::from_record(record),
            Err(WorldError::CorruptState(_))
        ));
    }
}
