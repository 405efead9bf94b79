//! Interactive authoring of a collision document.
//!
//! The editor core is pure state: it takes clicks already converted to
//! percent coordinates and mutates the document. Everything pixel- or
//! texture-related lives in [`surface`], so the click protocols test headless.

pub mod surface;

use crate::codec::json::{decode_document_bytes, encode_document_vec};
use crate::document::{collision_file_name, CollisionData};
use crate::error::CollisionError;
use crate::shape::{PercentPoint, Shape, ShapeKind};
use crate::store::CollisionStore;

/// Editor interaction mode. Transitions happen only through
/// [`Editor::set_mode`] and draw-completion; finishing any draw returns to
/// `Select`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Select,
    DrawRect,
    DrawPolygon,
    DrawCircle,
}

const SHAPE_COLORS: [&str; 6] = [
    "#e74c3c", "#3498db", "#2ecc71", "#f1c40f", "#9b59b6", "#e67e22",
];

/// Authoring state for one collision document.
pub struct Editor {
    doc: CollisionData,
    mode: EditorMode,
    /// First click of a two-click shape (rect corner, circle center).
    anchor: Option<PercentPoint>,
    /// Accumulated polygon vertices.
    points: Vec<PercentPoint>,
    selected: Option<String>,
    status: Option<String>,
    /// Clear-all is destructive and wants a second click.
    clear_pending: bool,
    show_grid: bool,
    show_panel: bool,
    next_shape_num: u32,
}

impl Editor {
    pub fn new(map_name: impl Into<String>) -> Self {
        Self::with_document(CollisionData::new(map_name))
    }

    pub fn with_document(doc: CollisionData) -> Self {
        Editor {
            doc,
            mode: EditorMode::Select,
            anchor: None,
            points: Vec::new(),
            selected: None,
            status: None,
            clear_pending: false,
            show_grid: true,
            show_panel: true,
            next_shape_num: 0,
        }
    }

    /// Load the keyed entry for `map_name`, or start empty when absent.
    /// A malformed stored document also starts empty, with the reason in the
    /// status line; it is not rewritten until the user saves.
    pub fn open(store: &dyn CollisionStore, map_name: &str) -> Self {
        let key = collision_file_name(map_name);
        match store.load(&key) {
            Ok(Some(bytes)) => match decode_document_bytes(&bytes) {
                Ok(doc) => Self::with_document(doc),
                Err(e) => {
                    let mut ed = Self::new(map_name);
                    ed.status = Some(format!("Stored document unreadable, starting empty: {e}"));
                    ed
                }
            },
            Ok(None) => Self::new(map_name),
            Err(e) => {
                let mut ed = Self::new(map_name);
                ed.status = Some(format!("Store read failed, starting empty: {e}"));
                ed
            }
        }
    }

    pub fn document(&self) -> &CollisionData {
        &self.doc
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn show_panel(&self) -> bool {
        self.show_panel
    }

    /// True while a draw has pending input (anchor set or points buffered).
    pub fn is_drawing(&self) -> bool {
        self.anchor.is_some() || !self.points.is_empty()
    }

    pub fn drawing_anchor(&self) -> Option<PercentPoint> {
        self.anchor
    }

    pub fn drawing_points(&self) -> &[PercentPoint] {
        &self.points
    }

    /// Switch modes. Entering any mode resets the drawing buffer and the
    /// clear-all confirmation.
    pub fn set_mode(&mut self, mode: EditorMode) {
        self.mode = mode;
        self.anchor = None;
        self.points.clear();
        self.clear_pending = false;
        self.status = None;
    }

    /// One pointer click on the surface, in percent coordinates.
    pub fn click(&mut self, p: PercentPoint) {
        self.clear_pending = false;
        match self.mode {
            EditorMode::Select => self.select_at(p),
            EditorMode::DrawRect => match self.anchor.take() {
                None => self.anchor = Some(p),
                Some(a) => {
                    let x = a.x.min(p.x);
                    let y = a.y.min(p.y);
                    let (id, name) = self.alloc_identity(ShapeKind::Rect);
                    let shape = Shape::Rect {
                        id,
                        name,
                        x,
                        y,
                        width: (a.x - p.x).abs(),
                        height: (a.y - p.y).abs(),
                        color: Some(self.alloc_color()),
                    };
                    self.finish_shape(shape);
                }
            },
            EditorMode::DrawPolygon => {
                self.points.push(p);
                self.status = Some(format!(
                    "Polygon: {} point(s); finish with >= 3",
                    self.points.len()
                ));
            }
            EditorMode::DrawCircle => match self.anchor.take() {
                None => self.anchor = Some(p),
                Some(center) => {
                    let dx = p.x - center.x;
                    let dy = p.y - center.y;
                    let (id, name) = self.alloc_identity(ShapeKind::Circle);
                    let shape = Shape::Circle {
                        id,
                        name,
                        x: center.x,
                        y: center.y,
                        radius: (dx * dx + dy * dy).sqrt(),
                        color: Some(self.alloc_color()),
                    };
                    self.finish_shape(shape);
                }
            },
        }
    }

    /// Close the in-progress polygon. With fewer than 3 points nothing is
    /// created and the buffer stays so the user can keep clicking.
    pub fn finish_polygon(&mut self) {
        if self.mode != EditorMode::DrawPolygon {
            return;
        }
        if self.points.len() < 3 {
            self.status = Some(format!(
                "A polygon needs at least 3 points (have {})",
                self.points.len()
            ));
            return;
        }
        let (id, name) = self.alloc_identity(ShapeKind::Polygon);
        let shape = Shape::Polygon {
            id,
            name,
            points: std::mem::take(&mut self.points),
            color: Some(self.alloc_color()),
        };
        self.finish_shape(shape);
    }

    fn finish_shape(&mut self, shape: Shape) {
        let name = shape.name().to_owned();
        // Ids come from alloc_id, so add_shape cannot fail here; surface the
        // error in the status line all the same.
        let result = self.doc.add_shape(shape);
        self.set_mode(EditorMode::Select);
        self.status = Some(match result {
            Ok(()) => format!("Added {name}"),
            Err(e) => e.to_string(),
        });
    }

    /// Hit-test existing shapes at `p`, first match in document order wins.
    ///
    /// Only rectangles are testable for now; polygon and circle shapes are
    /// never matched and can only be managed through the shape panel.
    fn select_at(&mut self, p: PercentPoint) {
        self.selected = self
            .doc
            .shapes()
            .iter()
            .find(|s| match s {
                Shape::Rect {
                    x, y, width, height, ..
                } => p.x >= *x && p.x <= x + width && p.y >= *y && p.y <= y + height,
                Shape::Polygon { .. } => false,
                Shape::Circle { .. } => false,
            })
            .map(|s| s.id().to_owned());
    }

    /// Delete the selected shape; no-op when nothing is selected.
    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected.take() {
            self.doc.remove_shape(&id);
            self.status = Some(format!("Deleted {id}"));
        }
    }

    /// Destructive: first call arms the confirmation, second call clears.
    pub fn clear_all(&mut self) {
        if self.clear_pending {
            self.doc.clear();
            self.selected = None;
            self.clear_pending = false;
            self.status = Some("Cleared all shapes".to_owned());
        } else {
            self.clear_pending = true;
            self.status = Some("Clear all shapes? Trigger again to confirm".to_owned());
        }
    }

    pub fn toggle_grid(&mut self) {
        self.show_grid = !self.show_grid;
    }

    pub fn toggle_panel(&mut self) {
        self.show_panel = !self.show_panel;
    }

    /// Save under the map's store key. On failure the document stays dirty in
    /// memory and the error lands in the status line.
    pub fn save(&mut self, store: &mut dyn CollisionStore) -> Result<(), CollisionError> {
        let key = collision_file_name(&self.doc.map_name);
        let result = encode_document_vec(&self.doc)
            .and_then(|bytes| store.save(&key, &bytes));
        match &result {
            Ok(()) => self.status = Some(format!("Saved {key}")),
            Err(e) => self.status = Some(format!("Save failed: {e}")),
        }
        result
    }

    /// Serialize the document for a save-as-file download.
    pub fn export_bytes(&self) -> Result<Vec<u8>, CollisionError> {
        encode_document_vec(&self.doc)
    }

    /// Replace the document wholesale from an imported file. A parse failure
    /// leaves the current document untouched.
    pub fn import_bytes(&mut self, bytes: &[u8]) -> Result<(), CollisionError> {
        match decode_document_bytes(bytes) {
            Ok(doc) => {
                self.doc = doc;
                self.selected = None;
                self.set_mode(EditorMode::Select);
                self.status = Some(format!(
                    "Loaded {} shape(s) for '{}'",
                    self.doc.len(),
                    self.doc.map_name
                ));
                Ok(())
            }
            Err(e) => {
                self.status = Some(format!("Import failed: {e}"));
                Err(e)
            }
        }
    }

    fn alloc_id(&mut self) -> String {
        loop {
            self.next_shape_num += 1;
            let id = format!("shape-{}", self.next_shape_num);
            if self.doc.shape_by_id(&id).is_none() {
                return id;
            }
        }
    }

    /// Id and display name come from the same monotonic counter, so neither
    /// can collide with an earlier shape after deletes.
    fn alloc_identity(&mut self, kind: ShapeKind) -> (String, String) {
        let id = self.alloc_id();
        let name = format!("{} {}", kind.label(), self.next_shape_num);
        (id, name)
    }

    fn alloc_color(&self) -> String {
        SHAPE_COLORS[self.doc.len() % SHAPE_COLORS.len()].to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn pp(x: f32, y: f32) -> PercentPoint {
        PercentPoint::new(x, y)
    }

    #[test]
    fn rect_protocol_spans_the_two_clicks() {
        let mut ed = Editor::new("m");
        ed.set_mode(EditorMode::DrawRect);
        ed.click(pp(40.0, 50.0));
        assert!(ed.is_drawing());
        // Second click up-left of the anchor: still a min/min top-left.
        ed.click(pp(10.0, 20.0));

        assert_eq!(ed.mode(), EditorMode::Select);
        assert!(!ed.is_drawing());
        assert_eq!(ed.document().len(), 1);
        match &ed.document().shapes()[0] {
            Shape::Rect {
                x, y, width, height, ..
            } => {
                assert_eq!((*x, *y), (10.0, 20.0));
                assert_eq!((*width, *height), (30.0, 30.0));
            }
            other => panic!("expected rect, got {:?}", other.kind()),
        }
    }

    #[test]
    fn circle_protocol_uses_euclidean_radius() {
        let mut ed = Editor::new("m");
        ed.set_mode(EditorMode::DrawCircle);
        ed.click(pp(50.0, 50.0));
        ed.click(pp(53.0, 54.0));
        match &ed.document().shapes()[0] {
            Shape::Circle { x, y, radius, .. } => {
                assert_eq!((*x, *y), (50.0, 50.0));
                assert!((radius - 5.0).abs() < 1e-5);
            }
            other => panic!("expected circle, got {:?}", other.kind()),
        }
        assert_eq!(ed.mode(), EditorMode::Select);
    }

    #[test]
    fn polygon_under_three_points_is_refused() {
        let mut ed = Editor::new("m");
        ed.set_mode(EditorMode::DrawPolygon);
        ed.click(pp(0.0, 0.0));
        ed.click(pp(10.0, 0.0));
        ed.finish_polygon();

        assert_eq!(ed.document().len(), 0);
        assert_eq!(ed.mode(), EditorMode::DrawPolygon);
        assert_eq!(ed.drawing_points().len(), 2);
        assert!(ed.status().unwrap().contains("at least 3"));

        ed.click(pp(5.0, 10.0));
        ed.finish_polygon();
        assert_eq!(ed.document().len(), 1);
        assert_eq!(ed.mode(), EditorMode::Select);
    }

    #[test]
    fn finish_outside_polygon_mode_is_a_noop() {
        let mut ed = Editor::new("m");
        ed.finish_polygon();
        assert_eq!(ed.document().len(), 0);
    }

    #[test]
    fn entering_a_draw_mode_resets_the_buffer() {
        let mut ed = Editor::new("m");
        ed.set_mode(EditorMode::DrawPolygon);
        ed.click(pp(0.0, 0.0));
        ed.set_mode(EditorMode::DrawRect);
        assert!(!ed.is_drawing());
        assert!(ed.drawing_points().is_empty());
    }

    #[test]
    fn select_hits_rects_in_document_order_and_miss_clears() {
        let mut ed = Editor::new("m");
        ed.set_mode(EditorMode::DrawRect);
        ed.click(pp(0.0, 0.0));
        ed.click(pp(50.0, 50.0));
        ed.set_mode(EditorMode::DrawRect);
        ed.click(pp(25.0, 25.0));
        ed.click(pp(75.0, 75.0));

        // Overlap region: the first document shape wins.
        ed.click(pp(30.0, 30.0));
        assert_eq!(ed.selected_id(), Some("shape-1"));

        ed.click(pp(70.0, 70.0));
        assert_eq!(ed.selected_id(), Some("shape-2"));

        ed.click(pp(90.0, 90.0));
        assert_eq!(ed.selected_id(), None);
    }

    #[test]
    fn select_ignores_polygons_and_circles() {
        let mut ed = Editor::new("m");
        ed.set_mode(EditorMode::DrawCircle);
        ed.click(pp(50.0, 50.0));
        ed.click(pp(60.0, 50.0));
        // Click dead center of the circle: not selectable.
        ed.click(pp(50.0, 50.0));
        assert_eq!(ed.selected_id(), None);
    }

    #[test]
    fn delete_selected_is_noop_without_selection() {
        let mut ed = Editor::new("m");
        ed.delete_selected();
        assert_eq!(ed.document().len(), 0);

        ed.set_mode(EditorMode::DrawRect);
        ed.click(pp(0.0, 0.0));
        ed.click(pp(10.0, 10.0));
        ed.click(pp(5.0, 5.0));
        assert!(ed.selected_id().is_some());
        ed.delete_selected();
        assert_eq!(ed.document().len(), 0);
        assert_eq!(ed.selected_id(), None);
    }

    #[test]
    fn clear_all_requires_confirmation() {
        let mut ed = Editor::new("m");
        ed.set_mode(EditorMode::DrawRect);
        ed.click(pp(0.0, 0.0));
        ed.click(pp(10.0, 10.0));

        ed.clear_all();
        assert_eq!(ed.document().len(), 1); // armed, not yet cleared
        ed.clear_all();
        assert_eq!(ed.document().len(), 0);
    }

    #[test]
    fn a_click_disarms_clear_confirmation() {
        let mut ed = Editor::new("m");
        ed.set_mode(EditorMode::DrawRect);
        ed.click(pp(0.0, 0.0));
        ed.click(pp(10.0, 10.0));

        ed.clear_all();
        ed.click(pp(5.0, 5.0)); // user did something else instead
        ed.clear_all();
        assert_eq!(ed.document().len(), 1); // re-armed, still not cleared
    }

    #[test]
    fn save_and_open_round_trip_through_a_store() {
        let mut store = MemoryStore::new();
        let mut ed = Editor::new("Forest");
        ed.set_mode(EditorMode::DrawRect);
        ed.click(pp(10.0, 10.0));
        ed.click(pp(30.0, 30.0));
        ed.save(&mut store).unwrap();

        let reopened = Editor::open(&store, "Forest");
        assert_eq!(reopened.document(), ed.document());
    }

    #[test]
    fn open_without_stored_data_starts_empty() {
        let store = MemoryStore::new();
        let ed = Editor::open(&store, "Forest");
        assert!(ed.document().is_empty());
        assert_eq!(ed.document().map_name, "Forest");
    }

    #[test]
    fn open_with_garbage_starts_empty_and_reports() {
        let mut store = MemoryStore::new();
        store.save("forest-collisions.json", b"not json").unwrap();
        let ed = Editor::open(&store, "Forest");
        assert!(ed.document().is_empty());
        assert!(ed.status().unwrap().contains("starting empty"));
    }

    #[test]
    fn failed_import_preserves_the_document() {
        let mut ed = Editor::new("m");
        ed.set_mode(EditorMode::DrawRect);
        ed.click(pp(0.0, 0.0));
        ed.click(pp(10.0, 10.0));

        let err = ed.import_bytes(b"{ broken").unwrap_err();
        assert!(matches!(err, CollisionError::Json { .. }));
        assert_eq!(ed.document().len(), 1);
        assert!(ed.status().unwrap().contains("Import failed"));
    }

    #[test]
    fn import_replaces_wholesale() {
        let mut ed = Editor::new("m");
        ed.set_mode(EditorMode::DrawRect);
        ed.click(pp(0.0, 0.0));
        ed.click(pp(10.0, 10.0));

        let other = Editor::new("Cave");
        let bytes = other.export_bytes().unwrap();
        ed.import_bytes(&bytes).unwrap();
        assert_eq!(ed.document().map_name, "Cave");
        assert!(ed.document().is_empty());
        assert_eq!(ed.selected_id(), None);
    }

    #[test]
    fn generated_ids_stay_unique_after_deletes() {
        let mut ed = Editor::new("m");
        for _ in 0..3 {
            ed.set_mode(EditorMode::DrawRect);
            ed.click(pp(0.0, 0.0));
            ed.click(pp(10.0, 10.0));
        }
        ed.click(pp(5.0, 5.0));
        ed.delete_selected();
        ed.set_mode(EditorMode::DrawRect);
        ed.click(pp(0.0, 0.0));
        ed.click(pp(10.0, 10.0));

        let ids: Vec<&str> = ed.document().shapes().iter().map(Shape::id).collect();
        let mut dedup = ids.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(ids.len(), dedup.len());
    }

    #[test]
    fn generated_names_stay_unique_after_deletes() {
        let mut ed = Editor::new("m");
        for _ in 0..3 {
            ed.set_mode(EditorMode::DrawRect);
            ed.click(pp(0.0, 0.0));
            ed.click(pp(10.0, 10.0));
        }
        // Remove the first shape, then draw another.
        ed.click(pp(5.0, 5.0));
        ed.delete_selected();
        ed.set_mode(EditorMode::DrawRect);
        ed.click(pp(0.0, 0.0));
        ed.click(pp(10.0, 10.0));

        let names: Vec<&str> = ed.document().shapes().iter().map(Shape::name).collect();
        let mut dedup = names.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(names.len(), dedup.len());
        assert_eq!(names, ["rectangle 2", "rectangle 3", "rectangle 4"]);
    }
}
