//! Collision detection and response against the tile grid
//!
//! Tiles are unit squares centered on integer grid coordinates. Actors are
//! axis-aligned boxes centered on a continuous position. Movement is resolved
//! one axis at a time, X before Y, so corners never clip.

use std::collections::HashSet;

use glam::{IVec2, Vec2};

use crate::consts::{SNAP_EPSILON, TILE_HALF};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// The unit square occupied by a grid cell
    pub fn tile(cell: IVec2) -> Self {
        Self::from_center(cell.as_vec2(), Vec2::splat(TILE_HALF * 2.0))
    }

    /// Open-interval overlap: boxes that merely touch do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }
}

/// Sparse set of impassable grid cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolidTileIndex {
    cells: HashSet<IVec2>,
}

impl SolidTileIndex {
    pub fn insert(&mut self, cell: IVec2) {
        self.cells.insert(cell);
    }

    #[inline]
    pub fn contains(&self, cell: IVec2) -> bool {
        self.cells.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IVec2> {
        self.cells.iter()
    }

    /// Solid cells whose square strictly overlaps `aabb`
    pub fn overlapping(&self, aabb: Aabb) -> impl Iterator<Item = IVec2> + '_ {
        let x0 = (aabb.min.x - TILE_HALF).floor() as i32;
        let x1 = (aabb.max.x + TILE_HALF).ceil() as i32;
        let y0 = (aabb.min.y - TILE_HALF).floor() as i32;
        let y1 = (aabb.max.y + TILE_HALF).ceil() as i32;

        (x0..=x1)
            .flat_map(move |x| (y0..=y1).map(move |y| IVec2::new(x, y)))
            .filter(move |cell| self.contains(*cell) && aabb.overlaps(&Aabb::tile(*cell)))
    }

    /// Would an actor of `size` centered at `(x, y)` overlap any solid cell?
    pub fn is_solid(&self, x: f32, y: f32, size: Vec2) -> bool {
        self.overlapping(Aabb::from_center(Vec2::new(x, y), size))
            .next()
            .is_some()
    }
}

/// Result of resolving horizontal motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalMove {
    pub x: f32,
    pub vx: f32,
    pub blocked: bool,
}

/// What the vertical move ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalContact {
    /// Nothing: the actor is airborne
    None,
    /// Landed on a tile top
    Floor,
    /// Bumped a tile bottom; `head_cell` is the cell just above the snap point
    Ceiling { head_cell: IVec2 },
}

/// Result of resolving vertical motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalMove {
    pub y: f32,
    pub vy: f32,
    pub contact: VerticalContact,
}

/// Step 1 of the axis-separated protocol: move along X and snap against the
/// first blocking tile in the direction of travel.
pub fn resolve_x(solid: &SolidTileIndex, pos: Vec2, vx: f32, dt: f32, size: Vec2) -> HorizontalMove {
    let candidate = pos.x + vx * dt;
    let aabb = Aabb::from_center(Vec2::new(candidate, pos.y), size);
    let half_w = size.x / 2.0;

    let hits = solid.overlapping(aabb).map(|cell| cell.x);
    let blocking = if vx > 0.0 { hits.min() } else { hits.max() };

    let Some(tile_x) = blocking else {
        return HorizontalMove {
            x: candidate,
            vx,
            blocked: false,
        };
    };

    let x = if vx > 0.0 {
        tile_x as f32 - TILE_HALF - half_w - SNAP_EPSILON
    } else if vx < 0.0 {
        tile_x as f32 + TILE_HALF + half_w + SNAP_EPSILON
    } else {
        candidate
    };

    HorizontalMove {
        x,
        vx: 0.0,
        blocked: true,
    }
}

/// Step 2 of the axis-separated protocol: move along Y from the already
/// resolved X. Falling snaps onto the floor; rising snaps under the ceiling.
pub fn resolve_y(solid: &SolidTileIndex, x: f32, y: f32, vy: f32, dt: f32, size: Vec2) -> VerticalMove {
    let candidate = y + vy * dt;
    let aabb = Aabb::from_center(Vec2::new(x, candidate), size);
    let half_h = size.y / 2.0;

    let hits = solid.overlapping(aabb).map(|cell| cell.y);

    if vy > 0.0 {
        match hits.min() {
            Some(tile_y) => {
                let y = tile_y as f32 - TILE_HALF - half_h - SNAP_EPSILON;
                let head_cell = IVec2::new(x.round() as i32, (y + 1.0).round() as i32);
                VerticalMove {
                    y,
                    vy: 0.0,
                    contact: VerticalContact::Ceiling { head_cell },
                }
            }
            None => VerticalMove {
                y: candidate,
                vy,
                contact: VerticalContact::None,
            },
        }
    } else {
        match hits.max() {
            Some(tile_y) => VerticalMove {
                y: tile_y as f32 + TILE_HALF + half_h + SNAP_EPSILON,
                vy: 0.0,
                contact: VerticalContact::Floor,
            },
            // A step shorter than the snap gap still rests on the floor
            None if solid.is_solid(x, candidate - 2.0 * SNAP_EPSILON, size) => VerticalMove {
                y: candidate,
                vy: 0.0,
                contact: VerticalContact::Floor,
            },
            None => VerticalMove {
                y: candidate,
                vy,
                contact: VerticalContact::None,
            },
        }
    }
}
