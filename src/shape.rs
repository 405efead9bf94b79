/// A point expressed as percentages of the reference image's width/height.
///
/// 0–100 spans the image; values outside that range are kept as-is (the
/// editor never produces them, but a hand-edited document might).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentPoint {
    pub x: f32,
    pub y: f32,
}

impl PercentPoint {
    pub fn new(x: f32, y: f32) -> Self {
        PercentPoint { x, y }
    }
}

/// Shape kind, for dispatch tables and UI labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rect,
    Polygon,
    Circle,
}

impl ShapeKind {
    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Rect => "rectangle",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Circle => "circle",
        }
    }
}

/// One authored collision shape, geometry in percent units.
///
/// The model carries no behavior beyond validity checks; drawing, hit-testing
/// and collider conversion all live with their consumers, which match on the
/// variant exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        id: String,
        name: String,
        /// Top-left corner.
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Option<String>,
    },
    Polygon {
        id: String,
        name: String,
        points: Vec<PercentPoint>,
        color: Option<String>,
    },
    Circle {
        id: String,
        name: String,
        /// Center.
        x: f32,
        y: f32,
        radius: f32,
        color: Option<String>,
    },
}

impl Shape {
    pub fn id(&self) -> &str {
        match self {
            Shape::Rect { id, .. } | Shape::Polygon { id, .. } | Shape::Circle { id, .. } => id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Shape::Rect { name, .. }
            | Shape::Polygon { name, .. }
            | Shape::Circle { name, .. } => name,
        }
    }

    pub fn color(&self) -> Option<&str> {
        match self {
            Shape::Rect { color, .. }
            | Shape::Polygon { color, .. }
            | Shape::Circle { color, .. } => color.as_deref(),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rect { .. } => ShapeKind::Rect,
            Shape::Polygon { .. } => ShapeKind::Polygon,
            Shape::Circle { .. } => ShapeKind::Circle,
        }
    }

    /// A polygon with fewer than 3 points is not a shape; rects and circles
    /// are always valid.
    pub fn is_valid(&self) -> bool {
        match self {
            Shape::Rect { .. } | Shape::Circle { .. } => true,
            Shape::Polygon { points, .. } => points.len() >= 3,
        }
    }
}
