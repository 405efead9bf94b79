#![warn(missing_docs)]

//! Percent-relative collision authoring & runtime collider baking for Macroquad.
//!
//! Shapes are authored as percentages of a reference background image, stored
//! as JSON, and resolved at level load against whatever size that image is
//! actually rendered at:
//!
//! 1. [`Editor`] drives the interactive authoring surface and owns a
//!    [`CollisionData`] document.
//! 2. A [`CollisionStore`] persists the document under a per-map key.
//! 3. [`build_colliders`] maps the document onto the live
//!    [`BackgroundGeometry`] and emits a [`ColliderSet`] of static
//!    rectangle/circle bodies for the movement system to query.

mod convert;
mod document;
mod editor;
mod error;
mod shape;
mod store;
mod transform;

mod codec {
    pub mod json;
}

pub use codec::json::{
    decode_document_bytes, decode_document_file, decode_document_str, encode_document_file,
    encode_document_string, encode_document_vec,
};
pub use convert::{
    build_colliders, build_colliders_opt, load_level_colliders, point_in_polygon, Collider,
    ColliderSet, ConversionConfig,
};
pub use document::{collision_file_name, CollisionData, DOC_VERSION};
pub use editor::surface::{
    color_from_hex, draw_authoring_surface, fit_surface, SurfaceLayout, DEFAULT_SURFACE_FRACTION,
};
pub use editor::{Editor, EditorMode};
pub use error::CollisionError;
pub use shape::{PercentPoint, Shape, ShapeKind};
pub use store::{CollisionStore, DirStore, MemoryStore};
pub use transform::BackgroundGeometry;
