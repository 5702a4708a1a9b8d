//! Minimap projection
//!
//! Flattens the hex map into a rectangular pixel grid using offset
//! coordinates (row = r, col = q + r/2), one hex per zoom-by-zoom pixel
//! block. Fog is applied at projection time: unexplored cells render as a
//! uniform dark color, partially-seen cells are dimmed, fully-seen cells
//! show their mode color. Modes swap what the color means, not the shape.

use crate::biome::Biome;
use crate::coords::AxialCoord;
use crate::fog::{FogOfWar, Visibility};
use crate::map::WorldMap;

/// Brightness multiplier for partially-visible cells.
pub const PARTIAL_DIM_FACTOR: f32 = 0.45;
/// Color of unexplored cells.
pub const UNEXPLORED_COLOR: (u8, u8, u8) = (8, 8, 12);
/// Dimmed terrain under the resources mode when a cell has no deposit.
const RESOURCE_BACKDROP_FACTOR: f32 = 0.35;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MinimapMode {
    /// Biome colors.
    Terrain,
    /// Highlight undepleted deposits over dimmed terrain.
    Resources,
    /// Elevation as grayscale.
    Elevation,
    /// Visibility itself as color, fog shading skipped.
    Ownership,
}

/// A rendered minimap: row-major RGB pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Minimap {
    width: usize,
    height: usize,
    pixels: Vec<(u8, u8, u8)>,
}

impl Minimap {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    pub fn pixels(&self) -> &[(u8, u8, u8)] {
        &self.pixels
    }
}

/// Project the map through the fog into a pixel grid. `zoom` is the pixel
/// block edge per hex, clamped to at least 1.
pub fn project(map: &WorldMap, fog: &FogOfWar, mode: MinimapMode, zoom: usize) -> Minimap {
    let zoom = zoom.max(1);

    let mut col_lo = i32::MAX;
    let mut col_hi = i32::MIN;
    let mut row_lo = i32::MAX;
    let mut row_hi = i32::MIN;
    for tile in map.tiles() {
        let (col, row) = to_offset(tile.coord);
        col_lo = col_lo.min(col);
        col_hi = col_hi.max(col);
        row_lo = row_lo.min(row);
        row_hi = row_hi.max(row);
    }

    if col_lo > col_hi {
        return Minimap {
            width: 0,
            height: 0,
            pixels: Vec::new(),
        };
    }

    let cols = (col_hi - col_lo + 1) as usize;
    let rows = (row_hi - row_lo + 1) as usize;
    let width = cols * zoom;
    let height = rows * zoom;
    let mut pixels = vec![UNEXPLORED_COLOR; width * height];

    for tile in map.tiles() {
        let (col, row) = to_offset(tile.coord);
        let visibility = fog.visibility(tile.coord);
        let color = shade(cell_color(map, tile.coord, mode), visibility, mode);

        let x0 = (col - col_lo) as usize * zoom;
        let y0 = (row - row_lo) as usize * zoom;
        for dy in 0..zoom {
            for dx in 0..zoom {
                pixels[(y0 + dy) * width + (x0 + dx)] = color;
            }
        }
    }

    Minimap {
        width,
        height,
        pixels,
    }
}

/// Offset-grid cell for a hex. Arithmetic shift keeps negative rows
/// consistent with the rectangular extent layout.
fn to_offset(coord: AxialCoord) -> (i32, i32) {
    (coord.q + (coord.r >> 1), coord.r)
}

fn cell_color(map: &WorldMap, coord: AxialCoord, mode: MinimapMode) -> (u8, u8, u8) {
    let tile = match map.get_tile(coord) {
        Some(t) => t,
        None => return UNEXPLORED_COLOR,
    };
    match mode {
        MinimapMode::Terrain => tile.biome.color(),
        MinimapMode::Elevation => {
            let level = (tile.elevation.clamp(0.0, 1.0) * 255.0) as u8;
            (level, level, level)
        }
        MinimapMode::Resources => {
            if tile.resources.iter().any(|d| !d.is_depleted()) {
                resource_highlight(tile.biome)
            } else {
                dim(tile.biome.color(), RESOURCE_BACKDROP_FACTOR)
            }
        }
        MinimapMode::Ownership => (0, 0, 0),
    }
}

fn resource_highlight(biome: Biome) -> (u8, u8, u8) {
    if biome.is_water() {
        (80, 200, 255)
    } else {
        (255, 210, 60)
    }
}

fn shade(color: (u8, u8, u8), visibility: Visibility, mode: MinimapMode) -> (u8, u8, u8) {
    if mode == MinimapMode::Ownership {
        return match visibility {
            Visibility::Unexplored => UNEXPLORED_COLOR,
            Visibility::Partial => (90, 90, 40),
            Visibility::Full => (60, 160, 60),
        };
    }
    match visibility {
        Visibility::Unexplored => UNEXPLORED_COLOR,
        Visibility::Partial => dim(color, PARTIAL_DIM_FACTOR),
        Visibility::Full => color,
    }
}

fn dim(color: (u8, u8, u8), factor: f32) -> (u8, u8, u8) {
    (
        (color.0 as f32 * factor) as u8,
        (color.1 as f32 * factor) as u8,
        (color.2 as f32 * factor) as u8,
    )
}
