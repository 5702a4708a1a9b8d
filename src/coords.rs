//! Axial hex coordinate math
//!
//! Pure conversions between axial hex coordinates and continuous world
//! positions (pointy-top layout), plus neighbor, distance, ring, and
//! area queries. Stateless; everything here is a plain function of its
//! inputs.

use serde::{Deserialize, Serialize};

/// Hex tile size (center-to-corner distance) used for world-space conversion.
pub const HEX_SIZE: f32 = 1.0;

const SQRT_3: f32 = 1.732_050_8;

/// The 6 axial direction offsets, counterclockwise starting east.
pub const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// A tile address on the hex grid. Convertible to the redundant cube form
/// (q, r, s) with q + r + s = 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AxialCoord {
    pub q: i32,
    pub r: i32,
}

impl AxialCoord {
    pub const ORIGIN: AxialCoord = AxialCoord { q: 0, r: 0 };

    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Third cube coordinate.
    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Center of this hex in continuous world coordinates.
    pub fn to_world(&self) -> (f32, f32) {
        let x = HEX_SIZE * (SQRT_3 * self.q as f32 + SQRT_3 / 2.0 * self.r as f32);
        let y = HEX_SIZE * (1.5 * self.r as f32);
        (x, y)
    }

    /// Nearest hex to a continuous world position, via cube rounding.
    /// Inverse of [`to_world`](Self::to_world) for all integer coordinates.
    pub fn from_world(x: f32, y: f32) -> Self {
        let qf = (SQRT_3 / 3.0 * x - y / 3.0) / HEX_SIZE;
        let rf = (2.0 / 3.0 * y) / HEX_SIZE;
        cube_round(qf, rf)
    }

    /// The 6 adjacent coordinates, in [`DIRECTIONS`] order.
    pub fn neighbors(&self) -> [AxialCoord; 6] {
        let mut out = [*self; 6];
        for (i, (dq, dr)) in DIRECTIONS.iter().enumerate() {
            out[i] = AxialCoord::new(self.q + dq, self.r + dr);
        }
        out
    }

    /// Hex grid distance (number of steps) between two coordinates.
    pub fn distance(&self, other: &AxialCoord) -> i32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        (dq.abs() + dr.abs() + (dq + dr).abs()) / 2
    }

    /// All coordinates at exactly `radius` steps from this one.
    /// Radius 0 yields just the center, negative radii nothing.
    pub fn ring(&self, radius: i32) -> Vec<AxialCoord> {
        if radius < 0 {
            return Vec::new();
        }
        if radius == 0 {
            return vec![*self];
        }
        let mut out = Vec::with_capacity(radius as usize * 6);
        // Start radius steps out in direction 4, then walk each edge.
        let mut cur = AxialCoord::new(
            self.q + DIRECTIONS[4].0 * radius,
            self.r + DIRECTIONS[4].1 * radius,
        );
        for (dq, dr) in DIRECTIONS {
            for _ in 0..radius {
                out.push(cur);
                cur = AxialCoord::new(cur.q + dq, cur.r + dr);
            }
        }
        out
    }

    /// All coordinates within `radius` steps of this one, inclusive.
    /// Enumeration order is fixed (q-major), which generation relies on
    /// for reproducible RNG consumption.
    pub fn within_radius(&self, radius: i32) -> Vec<AxialCoord> {
        if radius < 0 {
            return Vec::new();
        }
        let mut out = Vec::new();
        for dq in -radius..=radius {
            let lo = (-radius).max(-dq - radius);
            let hi = radius.min(-dq + radius);
            for dr in lo..=hi {
                out.push(AxialCoord::new(self.q + dq, self.r + dr));
            }
        }
        out
    }
}

/// Snap fractional cube coordinates to the nearest valid hex: round each
/// component, then recompute the one with the largest rounding error from
/// the other two so q + r + s = 0 holds exactly.
fn cube_round(qf: f32, rf: f32) -> AxialCoord {
    let sf = -qf - rf;
    let mut q = qf.round();
    let mut r = rf.round();
    let s = sf.round();

    let dq = (q - qf).abs();
    let dr = (r - rf).abs();
    let ds = (s - sf).abs();

    if dq > dr && dq > ds {
        q = -r - s;
    } else if dr > ds {
        r = -q - s;
    }

    AxialCoord::new(q as i32, r as i32)
}
