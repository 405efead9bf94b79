//! The visual half of the editor: fits the reference image into the window,
//! maps pointer pixels to percent coordinates, and draws the document.

use macroquad::prelude::*;

use super::Editor;
use crate::shape::{PercentPoint, Shape};

/// Fraction of the viewport the authoring surface may occupy.
pub const DEFAULT_SURFACE_FRACTION: f32 = 0.8;

/// Where the reference image sits on screen this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceLayout {
    pub rect: Rect,
}

/// Fit `image_w x image_h` into `fraction` of the viewport, preserving
/// aspect ratio, centered.
pub fn fit_surface(
    image_w: f32,
    image_h: f32,
    viewport_w: f32,
    viewport_h: f32,
    fraction: f32,
) -> SurfaceLayout {
    // A texture that failed to decode reports zero dimensions; give it no
    // surface instead of a NaN rect.
    if image_w <= 0.0 || image_h <= 0.0 {
        return SurfaceLayout {
            rect: Rect::new(0.0, 0.0, 0.0, 0.0),
        };
    }
    let avail_w = viewport_w * fraction;
    let avail_h = viewport_h * fraction;
    let scale = (avail_w / image_w).min(avail_h / image_h);
    let w = image_w * scale;
    let h = image_h * scale;
    SurfaceLayout {
        rect: Rect::new((viewport_w - w) / 2.0, (viewport_h - h) / 2.0, w, h),
    }
}

impl SurfaceLayout {
    /// Screen pixel -> percent, `None` outside the image.
    pub fn pixel_to_percent(&self, px: Vec2) -> Option<PercentPoint> {
        if !self.rect.contains(px) {
            return None;
        }
        Some(PercentPoint::new(
            (px.x - self.rect.x) / self.rect.w * 100.0,
            (px.y - self.rect.y) / self.rect.h * 100.0,
        ))
    }

    pub fn percent_to_pixel(&self, p: PercentPoint) -> Vec2 {
        vec2(
            self.rect.x + p.x / 100.0 * self.rect.w,
            self.rect.y + p.y / 100.0 * self.rect.h,
        )
    }

    fn percent_w(&self, percent: f32) -> f32 {
        percent / 100.0 * self.rect.w
    }

    fn percent_h(&self, percent: f32) -> f32 {
        percent / 100.0 * self.rect.h
    }

    fn percent_r(&self, percent: f32) -> f32 {
        percent / 100.0 * self.rect.w.min(self.rect.h)
    }
}

/// Parse `#rrggbb`; anything else gets the fallback.
pub fn color_from_hex(s: Option<&str>, fallback: Color) -> Color {
    let Some(s) = s.and_then(|s| s.strip_prefix('#')) else {
        return fallback;
    };
    if s.len() != 6 {
        return fallback;
    }
    match u32::from_str_radix(s, 16) {
        Ok(rgb) => Color::from_rgba(
            (rgb >> 16) as u8,
            (rgb >> 8) as u8,
            rgb as u8,
            255,
        ),
        Err(_) => fallback,
    }
}

/// Draw the whole authoring frame: image, grid, shapes, in-progress buffer,
/// shape panel and status line.
pub fn draw_authoring_surface(editor: &Editor, background: &Texture2D, layout: &SurfaceLayout) {
    let r = layout.rect;
    draw_texture_ex(
        background,
        r.x,
        r.y,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(r.w, r.h)),
            ..Default::default()
        },
    );
    draw_rectangle_lines(r.x, r.y, r.w, r.h, 2.0, GRAY);

    if editor.show_grid() {
        draw_grid_lines(layout);
    }

    for shape in editor.document().shapes() {
        let selected = editor.selected_id() == Some(shape.id());
        draw_shape(shape, layout, selected);
    }

    draw_in_progress(editor, layout);

    if editor.show_panel() {
        draw_shape_panel(editor, layout);
    }

    if let Some(status) = editor.status() {
        draw_text(status, r.x, r.y + r.h + 24.0, 20.0, YELLOW);
    }
}

fn draw_grid_lines(layout: &SurfaceLayout) {
    let r = layout.rect;
    let grid = Color::new(1.0, 1.0, 1.0, 0.15);
    for step in 1..10 {
        let fx = r.x + r.w * step as f32 / 10.0;
        let fy = r.y + r.h * step as f32 / 10.0;
        draw_line(fx, r.y, fx, r.y + r.h, 1.0, grid);
        draw_line(r.x, fy, r.x + r.w, fy, 1.0, grid);
    }
}

fn draw_shape(shape: &Shape, layout: &SurfaceLayout, selected: bool) {
    let color = color_from_hex(shape.color(), RED);
    let thickness = if selected { 4.0 } else { 2.0 };
    match shape {
        Shape::Rect {
            x, y, width, height, ..
        } => {
            let tl = layout.percent_to_pixel(PercentPoint::new(*x, *y));
            draw_rectangle_lines(
                tl.x,
                tl.y,
                layout.percent_w(*width),
                layout.percent_h(*height),
                thickness,
                color,
            );
        }
        Shape::Polygon { points, .. } => {
            for (i, p) in points.iter().enumerate() {
                let a = layout.percent_to_pixel(*p);
                let b = layout.percent_to_pixel(points[(i + 1) % points.len()]);
                draw_line(a.x, a.y, b.x, b.y, thickness, color);
            }
        }
        Shape::Circle { x, y, radius, .. } => {
            let c = layout.percent_to_pixel(PercentPoint::new(*x, *y));
            draw_circle_lines(c.x, c.y, layout.percent_r(*radius), thickness, color);
        }
    }
}

fn draw_in_progress(editor: &Editor, layout: &SurfaceLayout) {
    if let Some(anchor) = editor.drawing_anchor() {
        let a = layout.percent_to_pixel(anchor);
        let m: Vec2 = mouse_position().into();
        draw_line(a.x, a.y, m.x, m.y, 1.0, SKYBLUE);
        draw_circle(a.x, a.y, 3.0, SKYBLUE);
    }
    let pts = editor.drawing_points();
    for (i, p) in pts.iter().enumerate() {
        let px = layout.percent_to_pixel(*p);
        draw_circle(px.x, px.y, 3.0, SKYBLUE);
        if i + 1 < pts.len() {
            let next = layout.percent_to_pixel(pts[i + 1]);
            draw_line(px.x, px.y, next.x, next.y, 1.0, SKYBLUE);
        }
    }
}

fn draw_shape_panel(editor: &Editor, layout: &SurfaceLayout) {
    let x = layout.rect.x + layout.rect.w + 12.0;
    let mut y = layout.rect.y;
    draw_text("Shapes", x, y, 20.0, WHITE);
    y += 22.0;
    for shape in editor.document().shapes() {
        let marker = if editor.selected_id() == Some(shape.id()) {
            "> "
        } else {
            "  "
        };
        let line = format!("{}{} [{}]", marker, shape.name(), shape.kind().label());
        draw_text(&line, x, y, 16.0, LIGHTGRAY);
        y += 18.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_preserves_aspect_and_bounds() {
        // 2:1 image into a 800x600 window at 80%: width-limited.
        let layout = fit_surface(2000.0, 1000.0, 800.0, 600.0, 0.8);
        assert_eq!(layout.rect.w, 640.0);
        assert_eq!(layout.rect.h, 320.0);
        assert_eq!(layout.rect.x, 80.0);
        assert_eq!(layout.rect.y, 140.0);
    }

    #[test]
    fn tall_image_is_height_limited() {
        let layout = fit_surface(500.0, 2000.0, 800.0, 600.0, 0.8);
        assert_eq!(layout.rect.h, 480.0);
        assert_eq!(layout.rect.w, 120.0);
    }

    #[test]
    fn zero_sized_image_yields_an_empty_layout() {
        let layout = fit_surface(0.0, 0.0, 800.0, 600.0, 0.8);
        assert_eq!(layout.rect, Rect::new(0.0, 0.0, 0.0, 0.0));
        assert!(layout.rect.w.is_finite() && layout.rect.h.is_finite());
        assert!(layout.pixel_to_percent(vec2(400.0, 300.0)).is_none());

        let layout = fit_surface(1000.0, 0.0, 800.0, 600.0, 0.8);
        assert_eq!(layout.rect.w, 0.0);
        assert_eq!(layout.rect.h, 0.0);
    }

    #[test]
    fn pixel_percent_round_trip() {
        let layout = fit_surface(1000.0, 500.0, 800.0, 600.0, 0.8);
        let p = layout.pixel_to_percent(vec2(400.0, 300.0)).unwrap();
        let back = layout.percent_to_pixel(p);
        assert!((back.x - 400.0).abs() < 1e-3);
        assert!((back.y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn clicks_outside_the_image_are_ignored() {
        let layout = fit_surface(1000.0, 500.0, 800.0, 600.0, 0.8);
        assert!(layout.pixel_to_percent(vec2(1.0, 1.0)).is_none());
        assert!(layout.pixel_to_percent(vec2(799.0, 599.0)).is_none());
    }

    #[test]
    fn hex_colors_parse_with_fallback() {
        let c = color_from_hex(Some("#ff0000"), BLUE);
        assert_eq!((c.r, c.g, c.b, c.a), (1.0, 0.0, 0.0, 1.0));
        assert_eq!(color_from_hex(Some("nope"), BLUE), BLUE);
        assert_eq!(color_from_hex(None, BLUE), BLUE);
    }
}
