use chrono::Utc;

use crate::error::CollisionError;
use crate::shape::Shape;

/// Current document format version.
pub const DOC_VERSION: &str = "1.0.0";

/// The authored collision document for one map.
///
/// This is the sole source of truth: the editor mutates it, the conversion
/// engine only reads it. Shape order is the authoring order; nothing depends
/// on it except select-mode hit-test priority.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionData {
    pub map_name: String,
    pub version: String,
    /// RFC 3339.
    pub created_at: String,
    /// RFC 3339, refreshed on every mutation.
    pub updated_at: String,
    shapes: Vec<Shape>,
}

/// File/store key convention: `<mapname-lowercase>-collisions.json`.
pub fn collision_file_name(map_name: &str) -> String {
    format!("{}-collisions.json", map_name.to_lowercase())
}

impl CollisionData {
    /// An empty document for `map_name`, timestamped now.
    pub fn new(map_name: impl Into<String>) -> Self {
        let now = Utc::now().to_rfc3339();
        CollisionData {
            map_name: map_name.into(),
            version: DOC_VERSION.to_owned(),
            created_at: now.clone(),
            updated_at: now,
            shapes: Vec::new(),
        }
    }

    /// Rebuild a document from decoded parts, re-checking the invariants the
    /// wire format cannot express (unique ids, polygon point count).
    pub fn from_parts(
        map_name: String,
        version: String,
        created_at: String,
        updated_at: String,
        shapes: Vec<Shape>,
    ) -> Result<Self, CollisionError> {
        for (i, s) in shapes.iter().enumerate() {
            if let Shape::Polygon { points, .. } = s {
                if points.len() < 3 {
                    return Err(CollisionError::PolygonTooSmall {
                        points: points.len(),
                    });
                }
            }
            if shapes[..i].iter().any(|other| other.id() == s.id()) {
                return Err(CollisionError::DuplicateShapeId(s.id().to_owned()));
            }
        }
        Ok(CollisionData {
            map_name,
            version,
            created_at,
            updated_at,
            shapes,
        })
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shape_by_id(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    /// Append a shape. Rejects invalid polygons and duplicate ids.
    pub fn add_shape(&mut self, shape: Shape) -> Result<(), CollisionError> {
        if let Shape::Polygon { points, .. } = &shape {
            if points.len() < 3 {
                return Err(CollisionError::PolygonTooSmall {
                    points: points.len(),
                });
            }
        }
        if self.shape_by_id(shape.id()).is_some() {
            return Err(CollisionError::DuplicateShapeId(shape.id().to_owned()));
        }
        self.shapes.push(shape);
        self.touch();
        Ok(())
    }

    /// Remove by id; returns whether anything was removed.
    pub fn remove_shape(&mut self, id: &str) -> bool {
        let before = self.shapes.len();
        self.shapes.retain(|s| s.id() != id);
        let removed = self.shapes.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Drop every shape.
    pub fn clear(&mut self) {
        if !self.shapes.is_empty() {
            self.shapes.clear();
            self.touch();
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now().to_rfc3339();
    }
}
