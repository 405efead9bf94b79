//! The one place percent coordinates become world coordinates.
//!
//! The editor computes percentages from the image's top-left corner; the
//! runtime places the background by its center. Both agree as long as world
//! positions are derived from the left/top edge, so that is the only formula
//! this module offers. Call sites must not repeat the arithmetic.

use macroquad::prelude::*;

use crate::shape::PercentPoint;

/// Where and how large the background image is in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundGeometry {
    /// Center of the displayed image (the runtime's anchor).
    pub center: Vec2,
    pub display_w: f32,
    pub display_h: f32,
}

impl BackgroundGeometry {
    pub fn new(center: Vec2, display_w: f32, display_h: f32) -> Self {
        BackgroundGeometry {
            center,
            display_w,
            display_h,
        }
    }

    /// Build from a top-left anchor, as the authoring surface uses.
    pub fn from_top_left(top_left: Vec2, display_w: f32, display_h: f32) -> Self {
        BackgroundGeometry {
            center: vec2(top_left.x + display_w / 2.0, top_left.y + display_h / 2.0),
            display_w,
            display_h,
        }
    }

    /// World x of the image's left edge.
    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.display_w / 2.0
    }

    /// World y of the image's top edge.
    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y - self.display_h / 2.0
    }

    /// Percent point -> world point, derived from the left/top edge.
    #[inline]
    pub fn percent_to_world(&self, p: PercentPoint) -> Vec2 {
        vec2(
            self.left() + (p.x / 100.0) * self.display_w,
            self.top() + (p.y / 100.0) * self.display_h,
        )
    }

    /// Exact inverse of [`percent_to_world`](Self::percent_to_world).
    #[inline]
    pub fn world_to_percent(&self, w: Vec2) -> PercentPoint {
        PercentPoint::new(
            (w.x - self.left()) / self.display_w * 100.0,
            (w.y - self.top()) / self.display_h * 100.0,
        )
    }

    /// A horizontal percent span as a world length.
    #[inline]
    pub fn percent_len_x(&self, percent: f32) -> f32 {
        (percent / 100.0) * self.display_w
    }

    /// A vertical percent span as a world length.
    #[inline]
    pub fn percent_len_y(&self, percent: f32) -> f32 {
        (percent / 100.0) * self.display_h
    }

    /// Percent radius -> world radius, scaled by the smaller dimension so a
    /// circle stays a circle on non-square renders.
    #[inline]
    pub fn percent_radius_to_world(&self, percent: f32) -> f32 {
        (percent / 100.0) * self.display_w.min(self.display_h)
    }
}
