//! Hex-world generation and exploration engine
//!
//! Deterministically generates a hexagonal terrain map from a seed and
//! answers queries over it: axial coordinate math, A* pathfinding,
//! per-observer fog-of-war reveal tracking, discovery bookkeeping, and
//! minimap projection. No rendering or networking lives here; this crate
//! only produces and answers queries about world data.

pub mod biome;
pub mod coords;
pub mod error;
pub mod exploration;
pub mod fog;
pub mod generator;
pub mod map;
pub mod minimap;
pub mod noise_field;
pub mod pathfinder;
pub mod seeds;
