//! Deterministic world generation pipeline
//!
//! Phase 1: sample four decorrelated noise fields per coordinate and
//! classify a biome (pure, parallelized). Phase 2: blend biome influences
//! from neighbors. Phase 3: roll resource deposits. Phase 4: roll point
//! features. Phase 5: trace rivers downhill from high-elevation sources.
//! Every phase consumes its own seeded RNG in a documented fixed order,
//! so one master seed always yields the same world.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::collections::HashMap;

use crate::biome::{
    feature_rules, resource_rules, Biome, FeatureKind, MAX_FEATURES_PER_TILE,
};
use crate::coords::AxialCoord;
use crate::error::WorldError;
use crate::map::{BiomeInfluence, Feature, ResourceDeposit, Tile, WorldMap};
use crate::noise_field::NoiseField;
use crate::seeds::WorldSeeds;

// =============================================================================
// TUNING CONSTANTS
// =============================================================================

pub const ELEVATION_FREQUENCY: f32 = 0.06;
pub const MOISTURE_FREQUENCY: f32 = 0.045;
pub const TEMPERATURE_FREQUENCY: f32 = 0.035;
pub const ENERGY_FREQUENCY: f32 = 0.08;

// Domain offsets keep fields with related seeds from aligning.
const MOISTURE_OFFSET: (f32, f32) = (137.0, 71.0);
const TEMPERATURE_OFFSET: (f32, f32) = (-59.0, 211.0);
const ENERGY_OFFSET: (f32, f32) = (311.0, -97.0);

/// Weight of a tile's own biome in the blend.
pub const BLEND_SELF_WEIGHT: f32 = 3.0;
/// Weight contributed by each neighbor of a given biome.
pub const BLEND_NEIGHBOR_WEIGHT: f32 = 0.5;
/// Influences kept per tile, strongest first.
pub const MAX_BLEND_BIOMES: usize = 3;

/// Minimum elevation for a river source tile.
pub const RIVER_SOURCE_MIN_ELEVATION: f32 = 0.70;
/// One river source candidate per this many tiles.
const TILES_PER_RIVER: usize = 120;
const MAX_RIVERS: usize = 8;
/// Abort a trace that never reaches water (loops are impossible on a
/// strictly-descending walk, but flat pits are not).
const MAX_RIVER_LENGTH: usize = 512;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Shape of the generated extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorldBound {
    /// Hexagonal disc of radius `min(width, height) / 2` centered at the
    /// origin. The default; guarantees a tile at (0, 0).
    Circular,
    /// Offset-rectangular region: `height` rows of `width` columns.
    Rectangular,
}

#[derive(Clone, Copy, Debug)]
pub struct GenerationConfig {
    pub width: u32,
    pub height: u32,
    pub bound: WorldBound,
}

impl GenerationConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bound: WorldBound::Circular,
        }
    }

    pub fn validate(&self) -> Result<(), WorldError> {
        if self.width == 0 || self.height == 0 {
            return Err(WorldError::InvalidConfig(format!(
                "dimensions must be nonzero, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Every coordinate in the configured extent, in a fixed order.
    pub fn extent(&self) -> Vec<AxialCoord> {
        match self.bound {
            WorldBound::Circular => {
                let radius = (self.width.min(self.height) / 2) as i32;
                AxialCoord::ORIGIN.within_radius(radius)
            }
            WorldBound::Rectangular => {
                let mut out = Vec::with_capacity((self.width * self.height) as usize);
                for r in 0..self.height as i32 {
                    let q_offset = r >> 1;
                    for q in -q_offset..(self.width as i32 - q_offset) {
                        out.push(AxialCoord::new(q, r));
                    }
                }
                out
            }
        }
    }
}

// =============================================================================
// PIPELINE
// =============================================================================

/// Generate a complete world from a config and seed set.
pub fn generate(config: &GenerationConfig, seeds: &WorldSeeds) -> Result<WorldMap, WorldError> {
    config.validate()?;

    let extent = config.extent();
    if extent.is_empty() {
        return Err(WorldError::EmptyWorld {
            width: config.width,
            height: config.height,
        });
    }

    log::info!(
        "generating world: {}x{} ({:?}), {} tiles, master seed {}",
        config.width,
        config.height,
        config.bound,
        extent.len(),
        seeds.master
    );

    let mut map = WorldMap::new(config.width, config.height, seeds.master);

    let elevation_field = NoiseField::new(seeds.elevation).frequency(ELEVATION_FREQUENCY);
    let moisture_field = NoiseField::new(seeds.moisture)
        .frequency(MOISTURE_FREQUENCY)
        .offset(MOISTURE_OFFSET.0, MOISTURE_OFFSET.1);
    let temperature_field = NoiseField::new(seeds.temperature)
        .frequency(TEMPERATURE_FREQUENCY)
        .offset(TEMPERATURE_OFFSET.0, TEMPERATURE_OFFSET.1);
    let energy_field = NoiseField::new(seeds.energy)
        .frequency(ENERGY_FREQUENCY)
        .offset(ENERGY_OFFSET.0, ENERGY_OFFSET.1);

    // Phase 1: per-tile sampling and classification. Pure function of the
    // coordinate, safe to parallelize.
    let tiles: Vec<Tile> = extent
        .par_iter()
        .map(|&coord| {
            let (x, y) = coord.to_world();
            let elevation = elevation_field.sample(x, y);
            let moisture = moisture_field.sample(x, y);
            let temperature = temperature_field.sample(x, y);
            let energy = energy_field.sample(x, y);
            let biome = Biome::classify(elevation, moisture, temperature);
            Tile::new(coord, biome, elevation, moisture, temperature, energy)
        })
        .collect();

    for tile in tiles {
        map.insert_tile(tile);
    }

    blend_biomes(&mut map, &extent);
    place_resources(&mut map, &extent, seeds.resources);
    place_features(&mut map, &extent, seeds.features);
    let river_tiles = trace_rivers(&mut map, &extent, seeds.rivers);

    log::info!(
        "generation complete: {} tiles, {} river tiles",
        map.len(),
        river_tiles
    );

    Ok(map)
}

/// Phase 2: record each tile's dominant biome influences from itself and
/// its in-map neighbors. Contributions are sums of fixed constants, so the
/// result is independent of accumulation order; ties break on biome
/// discriminant to stay deterministic.
fn blend_biomes(map: &mut WorldMap, extent: &[AxialCoord]) {
    let mut blends: Vec<(AxialCoord, Vec<BiomeInfluence>)> = Vec::with_capacity(extent.len());

    for &coord in extent {
        let tile = match map.get_tile(coord) {
            Some(t) => t,
            None => continue,
        };

        let mut weights: HashMap<Biome, f32> = HashMap::new();
        *weights.entry(tile.biome).or_insert(0.0) += BLEND_SELF_WEIGHT;
        for neighbor in map.neighbors(coord) {
            *weights.entry(neighbor.biome).or_insert(0.0) += BLEND_NEIGHBOR_WEIGHT;
        }

        let mut influences: Vec<BiomeInfluence> = weights
            .into_iter()
            .map(|(biome, weight)| BiomeInfluence { biome, weight })
            .collect();
        influences.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| (a.biome as u8).cmp(&(b.biome as u8)))
        });
        influences.truncate(MAX_BLEND_BIOMES);

        let total: f32 = influences.iter().map(|i| i.weight).sum();
        if total > 0.0 {
            for influence in &mut influences {
                influence.weight /= total;
            }
        }

        blends.push((coord, influences));
    }

    for (coord, blend) in blends {
        if let Some(tile) = map.get_tile_mut(coord) {
            tile.blend = blend;
        }
    }
}

/// Phase 3: roll resource deposits. RNG consumption order is extent order
/// crossed with table order, one probability roll per rule plus amount and
/// quality draws on success.
fn place_resources(map: &mut WorldMap, extent: &[AxialCoord], seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut placed = 0usize;

    for &coord in extent {
        let tile = match map.get_tile_mut(coord) {
            Some(t) => t,
            None => continue,
        };
        for rule in resource_rules(tile.biome) {
            if rng.gen::<f32>() < rule.probability {
                let amount = rng.gen_range(rule.min_amount..=rule.max_amount);
                let quality = rng.gen_range(0.0..1.0);
                tile.resources.push(ResourceDeposit {
                    kind: rule.kind,
                    amount,
                    quality,
                    discovered: false,
                });
                placed += 1;
            }
        }
    }

    log::debug!("placed {} resource deposits", placed);
}

/// Phase 4: roll point features, capped per tile. Same RNG ordering
/// contract as resource placement.
fn place_features(map: &mut WorldMap, extent: &[AxialCoord], seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut placed = 0usize;

    for &coord in extent {
        let tile = match map.get_tile_mut(coord) {
            Some(t) => t,
            None => continue,
        };
        for rule in feature_rules(tile.biome) {
            // Roll unconditionally so the stream position does not depend
            // on earlier successes.
            let hit = rng.gen::<f32>() < rule.probability;
            if hit && tile.features.len() < MAX_FEATURES_PER_TILE {
                tile.features.push(Feature {
                    kind: rule.kind,
                    sub_type: rule.sub_type.to_string(),
                    discovered: false,
                });
                placed += 1;
            }
        }
    }

    log::debug!("placed {} features", placed);
}

/// Phase 5: pick high-elevation source tiles and walk each steadily
/// downhill, marking river features, until water, a pit, or the map edge.
/// Returns the number of tiles marked.
fn trace_rivers(map: &mut WorldMap, extent: &[AxialCoord], seed: u64) -> usize {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut candidates: Vec<AxialCoord> = extent
        .iter()
        .copied()
        .filter(|c| {
            map.get_tile(*c)
                .map(|t| t.elevation >= RIVER_SOURCE_MIN_ELEVATION && !t.biome.is_water())
                .unwrap_or(false)
        })
        .collect();

    if candidates.is_empty() {
        return 0;
    }

    let river_count = (extent.len() / TILES_PER_RIVER).clamp(1, MAX_RIVERS);
    candidates.shuffle(&mut rng);
    candidates.truncate(river_count);

    let mut marked = 0usize;
    for source in candidates {
        let mut current = source;
        for _ in 0..MAX_RIVER_LENGTH {
            let tile = match map.get_tile_mut(current) {
                Some(t) => t,
                None => break,
            };
            if tile.biome.is_water() {
                break;
            }
            if !tile.has_feature(FeatureKind::River) {
                tile.features.push(Feature {
                    kind: FeatureKind::River,
                    sub_type: "river".to_string(),
                    discovered: false,
                });
                marked += 1;
            }
            let here = tile.elevation;

            // Steepest in-map descent; ties resolved by neighbor order.
            let mut next: Option<(AxialCoord, f32)> = None;
            for neighbor in current.neighbors() {
                if let Some(n) = map.get_tile(neighbor) {
                    if n.elevation < here
                        && next.map(|(_, e)| n.elevation < e).unwrap_or(true)
                    {
                        next = Some((neighbor, n.elevation));
                    }
                }
            }
            match next {
                Some((coord, _)) => current = coord,
                None => break,
            }
        }
    }

    log::debug!("traced rivers across {} tiles", marked);
    marked
}
