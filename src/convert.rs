//! Turns an authored document into static world-space colliders.
//!
//! Runs once per level load, after the background texture has finished
//! loading (display dimensions are only final then). Every failure degrades
//! to "fewer colliders", never to an aborted load.

use macroquad::prelude::*;

use crate::codec::json::decode_document_str;
use crate::document::{collision_file_name, CollisionData};
use crate::shape::Shape;
use crate::store::CollisionStore;
use crate::transform::BackgroundGeometry;

/// Tuning knobs for collider generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionConfig {
    /// Inward shrink per side for rectangle shapes, as a fraction of the
    /// dimension. 0.2 leaves 60% of the authored width/height.
    pub rect_padding: f32,
    /// Inward shrink per side for polygon tiles. Higher than rects so the
    /// stair-stepped tile edges feel smoother to walk along.
    pub tile_padding: f32,
    /// Edge length of polygon approximation tiles, in world units. Smaller
    /// hugs the outline tighter but produces more colliders.
    pub tile_size: f32,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        ConversionConfig {
            rect_padding: 0.20,
            tile_padding: 0.35,
            tile_size: 20.0,
        }
    }
}

/// A static collision primitive in world space.
#[derive(Debug, Clone, PartialEq)]
pub enum Collider {
    Rect { shape_id: String, rect: Rect },
    Circle { shape_id: String, center: Vec2, radius: f32 },
}

impl Collider {
    pub fn shape_id(&self) -> &str {
        match self {
            Collider::Rect { shape_id, .. } | Collider::Circle { shape_id, .. } => shape_id,
        }
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        match self {
            Collider::Rect { rect, .. } => rect.contains(p),
            Collider::Circle { center, radius, .. } => center.distance(p) <= *radius,
        }
    }

    pub fn overlaps_rect(&self, other: Rect) -> bool {
        match self {
            Collider::Rect { rect, .. } => rect.overlaps(&other),
            Collider::Circle { center, radius, .. } => {
                circle_overlaps_rect(*center, *radius, other)
            }
        }
    }

    pub fn overlaps_circle(&self, c: Vec2, r: f32) -> bool {
        match self {
            Collider::Rect { rect, .. } => circle_overlaps_rect(c, r, *rect),
            Collider::Circle { center, radius, .. } => center.distance(c) <= radius + r,
        }
    }
}

fn circle_overlaps_rect(center: Vec2, radius: f32, rect: Rect) -> bool {
    let nearest = vec2(
        center.x.clamp(rect.x, rect.x + rect.w),
        center.y.clamp(rect.y, rect.y + rect.h),
    );
    center.distance(nearest) <= radius
}

/// The group of static bodies the movement system queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColliderSet {
    colliders: Vec<Collider>,
}

impl ColliderSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collider> {
        self.colliders.iter()
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        self.colliders.iter().any(|c| c.contains_point(p))
    }

    /// Would an axis-aligned body at `rect` overlap anything?
    pub fn overlaps_rect(&self, rect: Rect) -> bool {
        self.colliders.iter().any(|c| c.overlaps_rect(rect))
    }

    /// Would a circular body at `center`/`radius` overlap anything?
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        self.colliders.iter().any(|c| c.overlaps_circle(center, radius))
    }
}

/// Even-odd ray cast: a +x ray from `p`, counting edge crossings.
pub fn point_in_polygon(p: Vec2, vertices: &[Vec2]) -> bool {
    let mut inside = false;
    let n = vertices.len();
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y > p.y) != (vj.y > p.y)
            && p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Shrink `rect` by `padding` per side, keeping its center.
fn pad_rect(rect: Rect, padding: f32) -> Rect {
    Rect::new(
        rect.x + rect.w * padding,
        rect.y + rect.h * padding,
        rect.w * (1.0 - 2.0 * padding),
        rect.h * (1.0 - 2.0 * padding),
    )
}

fn tile_polygon(
    shape_id: &str,
    world_points: &[Vec2],
    cfg: &ConversionConfig,
    out: &mut Vec<Collider>,
) {
    let (mut min, mut max) = (world_points[0], world_points[0]);
    for p in &world_points[1..] {
        min = min.min(*p);
        max = max.max(*p);
    }

    let tile = cfg.tile_size;
    let cols = ((max.x - min.x) / tile).ceil().max(1.0) as u32;
    let rows = ((max.y - min.y) / tile).ceil().max(1.0) as u32;

    for row in 0..rows {
        for col in 0..cols {
            let x = min.x + col as f32 * tile;
            let y = min.y + row as f32 * tile;
            let center = vec2(x + tile / 2.0, y + tile / 2.0);
            if point_in_polygon(center, world_points) {
                out.push(Collider::Rect {
                    shape_id: shape_id.to_owned(),
                    rect: pad_rect(Rect::new(x, y, tile, tile), cfg.tile_padding),
                });
            }
        }
    }
}

/// Resolve every shape in `doc` against the live background geometry.
///
/// The document is read-only here; invalid shapes (a hand-edited degenerate
/// polygon) are skipped with a warning rather than failing the level.
pub fn build_colliders(
    doc: &CollisionData,
    bg: &BackgroundGeometry,
    cfg: &ConversionConfig,
) -> ColliderSet {
    let mut colliders = Vec::new();

    for shape in doc.shapes() {
        match shape {
            Shape::Rect {
                id,
                x,
                y,
                width,
                height,
                ..
            } => {
                let top_left = bg.percent_to_world(crate::shape::PercentPoint::new(*x, *y));
                let rect = Rect::new(
                    top_left.x,
                    top_left.y,
                    bg.percent_len_x(*width),
                    bg.percent_len_y(*height),
                );
                colliders.push(Collider::Rect {
                    shape_id: id.clone(),
                    rect: pad_rect(rect, cfg.rect_padding),
                });
            }
            Shape::Circle { id, x, y, radius, .. } => {
                colliders.push(Collider::Circle {
                    shape_id: id.clone(),
                    center: bg.percent_to_world(crate::shape::PercentPoint::new(*x, *y)),
                    radius: bg.percent_radius_to_world(*radius),
                });
            }
            Shape::Polygon { id, points, .. } => {
                if points.len() < 3 {
                    warn!("Skipping degenerate polygon '{}' ({} points)", id, points.len());
                    continue;
                }
                let world: Vec<Vec2> =
                    points.iter().map(|p| bg.percent_to_world(*p)).collect();
                tile_polygon(id, &world, cfg, &mut colliders);
            }
        }
    }

    ColliderSet { colliders }
}

/// Like [`build_colliders`], but tolerates a background that never loaded:
/// the level proceeds with zero collision.
pub fn build_colliders_opt(
    doc: &CollisionData,
    bg: Option<&BackgroundGeometry>,
    cfg: &ConversionConfig,
) -> ColliderSet {
    match bg {
        Some(bg) => build_colliders(doc, bg, cfg),
        None => {
            warn!(
                "No background geometry for map '{}'; building zero colliders",
                doc.map_name
            );
            ColliderSet::empty()
        }
    }
}

/// Level-load entry point: read the keyed store, decode, build.
///
/// A missing entry or a malformed document both mean "no collision data for
/// this level" and return the empty set.
pub fn load_level_colliders(
    store: &dyn CollisionStore,
    map_name: &str,
    bg: &BackgroundGeometry,
    cfg: &ConversionConfig,
) -> ColliderSet {
    let key = collision_file_name(map_name);
    let bytes = match store.load(&key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            info!("No collision data stored for map '{}'", map_name);
            return ColliderSet::empty();
        }
        Err(e) => {
            warn!("Failed to read collision data for '{}': {}", map_name, e);
            return ColliderSet::empty();
        }
    };
    let txt = match std::str::from_utf8(&bytes) {
        Ok(txt) => txt,
        Err(e) => {
            warn!("Collision data for '{}' is not UTF-8: {}", map_name, e);
            return ColliderSet::empty();
        }
    };
    match decode_document_str(txt) {
        Ok(doc) => build_colliders(&doc, bg, cfg),
        Err(e) => {
            warn!("Malformed collision data for '{}': {}", map_name, e);
            ColliderSet::empty()
        }
    }
}
