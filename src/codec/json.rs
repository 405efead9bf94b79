// Wire format for collision documents. The serde structs here are private;
// everything converts through CollisionData so the invariants get re-checked
// on every decode.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::document::CollisionData;
use crate::error::CollisionError;
use crate::shape::{PercentPoint, Shape};

#[derive(Serialize, Deserialize)]
struct JsonDocument {
    #[serde(rename = "mapName")]
    map_name: String,
    version: String,
    #[serde(rename = "createdAt")]
    created_at: String,
    #[serde(rename = "updatedAt")]
    updated_at: String,
    #[serde(default)]
    shapes: Vec<JsonShape>,
}

#[derive(Serialize, Deserialize)]
struct JsonShape {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "percentX", default, skip_serializing_if = "Option::is_none")]
    percent_x: Option<f32>,
    #[serde(rename = "percentY", default, skip_serializing_if = "Option::is_none")]
    percent_y: Option<f32>,
    #[serde(
        rename = "percentWidth",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    percent_width: Option<f32>,
    #[serde(
        rename = "percentHeight",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    percent_height: Option<f32>,
    #[serde(
        rename = "percentRadius",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    percent_radius: Option<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    points: Vec<JsonPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct JsonPoint {
    #[serde(rename = "percentX")]
    percent_x: f32,
    #[serde(rename = "percentY")]
    percent_y: f32,
}

fn require(id: &str, field: &str, value: Option<f32>) -> Result<f32, CollisionError> {
    value.ok_or_else(|| {
        CollisionError::InvalidDocument(format!("shape '{id}' is missing field '{field}'"))
    })
}

fn shape_from_json(js: JsonShape) -> Result<Shape, CollisionError> {
    match js.kind.as_str() {
        "rectangle" => Ok(Shape::Rect {
            x: require(&js.id, "percentX", js.percent_x)?,
            y: require(&js.id, "percentY", js.percent_y)?,
            width: require(&js.id, "percentWidth", js.percent_width)?,
            height: require(&js.id, "percentHeight", js.percent_height)?,
            id: js.id,
            name: js.name,
            color: js.color,
        }),
        "polygon" => Ok(Shape::Polygon {
            points: js
                .points
                .into_iter()
                .map(|p| PercentPoint::new(p.percent_x, p.percent_y))
                .collect(),
            id: js.id,
            name: js.name,
            color: js.color,
        }),
        "circle" => Ok(Shape::Circle {
            x: require(&js.id, "percentX", js.percent_x)?,
            y: require(&js.id, "percentY", js.percent_y)?,
            radius: require(&js.id, "percentRadius", js.percent_radius)?,
            id: js.id,
            name: js.name,
            color: js.color,
        }),
        other => Err(CollisionError::InvalidDocument(format!(
            "shape '{}' has unknown type '{}'",
            js.id, other
        ))),
    }
}

fn shape_to_json(shape: &Shape) -> JsonShape {
    match shape {
        Shape::Rect {
            id,
            name,
            x,
            y,
            width,
            height,
            color,
        } => JsonShape {
            id: id.clone(),
            kind: "rectangle".to_owned(),
            name: name.clone(),
            percent_x: Some(*x),
            percent_y: Some(*y),
            percent_width: Some(*width),
            percent_height: Some(*height),
            percent_radius: None,
            points: Vec::new(),
            color: color.clone(),
        },
        Shape::Polygon {
            id,
            name,
            points,
            color,
        } => JsonShape {
            id: id.clone(),
            kind: "polygon".to_owned(),
            name: name.clone(),
            percent_x: None,
            percent_y: None,
            percent_width: None,
            percent_height: None,
            percent_radius: None,
            points: points
                .iter()
                .map(|p| JsonPoint {
                    percent_x: p.x,
                    percent_y: p.y,
                })
                .collect(),
            color: color.clone(),
        },
        Shape::Circle {
            id,
            name,
            x,
            y,
            radius,
            color,
        } => JsonShape {
            id: id.clone(),
            kind: "circle".to_owned(),
            name: name.clone(),
            percent_x: Some(*x),
            percent_y: Some(*y),
            percent_width: None,
            percent_height: None,
            percent_radius: Some(*radius),
            points: Vec::new(),
            color: color.clone(),
        },
    }
}

/// Decode a document from a JSON string.
pub fn decode_document_str(txt: &str) -> Result<CollisionData, CollisionError> {
    let j: JsonDocument = serde_json::from_str(txt)?;
    let shapes = j
        .shapes
        .into_iter()
        .map(shape_from_json)
        .collect::<Result<Vec<_>, _>>()?;
    CollisionData::from_parts(j.map_name, j.version, j.created_at, j.updated_at, shapes)
}

/// Decode a document from raw bytes (file import).
pub fn decode_document_bytes(bytes: &[u8]) -> Result<CollisionData, CollisionError> {
    let txt = std::str::from_utf8(bytes)
        .map_err(|e| CollisionError::InvalidDocument(format!("not UTF-8: {e}")))?;
    decode_document_str(txt)
}

/// Decode a document from a `.json` file on disk.
pub fn decode_document_file(path: impl AsRef<Path>) -> Result<CollisionData, CollisionError> {
    let p = path.as_ref();
    if p.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(CollisionError::InvalidDocument(format!(
            "collision file must be JSON: {}",
            p.display()
        )));
    }
    let txt = std::fs::read_to_string(p).map_err(|source| CollisionError::Io {
        path: p.to_path_buf(),
        source,
    })?;
    decode_document_str(&txt).map_err(|e| match e {
        CollisionError::Json { path: None, source } => CollisionError::Json {
            path: Some(p.to_path_buf()),
            source,
        },
        other => other,
    })
}

/// Encode a document as pretty-printed JSON.
pub fn encode_document_string(doc: &CollisionData) -> Result<String, CollisionError> {
    let j = JsonDocument {
        map_name: doc.map_name.clone(),
        version: doc.version.clone(),
        created_at: doc.created_at.clone(),
        updated_at: doc.updated_at.clone(),
        shapes: doc.shapes().iter().map(shape_to_json).collect(),
    };
    Ok(serde_json::to_string_pretty(&j)?)
}

/// Encode a document to bytes, for file export.
pub fn encode_document_vec(doc: &CollisionData) -> Result<Vec<u8>, CollisionError> {
    encode_document_string(doc).map(String::into_bytes)
}

/// Write a document to disk.
pub fn encode_document_file(
    doc: &CollisionData,
    path: impl AsRef<Path>,
) -> Result<(), CollisionError> {
    let p = path.as_ref();
    let txt = encode_document_string(doc)?;
    std::fs::write(p, txt).map_err(|source| CollisionError::Io {
        path: p.to_path_buf(),
        source,
    })
}
