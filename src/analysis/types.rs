use serde::{Deserialize, Serialize};

/// Root of the vision-analysis schema. Produced by an external vision
/// service, mutated in place across edit rounds, rendered by the prompt
/// synthesizer. All leaves default so sparse model output deserializes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDocument {
    #[serde(default)]
    pub image_info: ImageInfo,
    #[serde(default)]
    pub style: StyleInfo,
    #[serde(default)]
    pub style_tags: Vec<String>,
    #[serde(default)]
    pub objects: Vec<DetectedObject>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    #[serde(default)]
    pub width_px: Option<u32>,
    #[serde(default)]
    pub height_px: Option<u32>,
    #[serde(default)]
    pub inferred_scene: String,
    #[serde(default)]
    pub notes: String,
}

/// Free-text style descriptor slots. No controlled vocabulary; empty
/// string means absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleInfo {
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub rendering: String,
    #[serde(default)]
    pub line_style: String,
    #[serde(default)]
    pub color_palette: String,
    #[serde(default)]
    pub lighting: String,
    #[serde(default)]
    pub tone_mood: String,
    #[serde(default)]
    pub shading: String,
    #[serde(default)]
    pub texture: String,
    #[serde(default)]
    pub composition: String,
    #[serde(default)]
    pub references: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub bbox_norm: Option<BBoxNorm>,
    #[serde(default)]
    pub dominant_color_hex: Option<String>,
    #[serde(default)]
    pub attributes: Option<ObjectAttributes>,
}

impl DetectedObject {
    /// Lowercased, trimmed label for matching and prose.
    pub fn clean_label(&self) -> String {
        self.label.trim().to_lowercase()
    }
}

/// Normalized bounding box, top-left origin, fractions of the image
/// dimensions. Each field is individually optional: a box missing any of
/// the four is treated as position-less downstream. Values are never
/// clamped or validated here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BBoxNorm {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub w: Option<f64>,
    #[serde(default)]
    pub h: Option<f64>,
}

impl BBoxNorm {
    pub fn is_complete(&self) -> bool {
        self.x.is_some() && self.y.is_some() && self.w.is_some() && self.h.is_some()
    }

    pub fn x0(&self) -> f64 {
        self.x.unwrap_or(0.0)
    }

    pub fn y0(&self) -> f64 {
        self.y.unwrap_or(0.0)
    }

    pub fn width(&self) -> f64 {
        self.w.unwrap_or(0.0)
    }

    pub fn height(&self) -> f64 {
        self.h.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectAttributes {
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub shape: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub other: Option<String>,
}

/// One batch of structured edits, produced by an external
/// instruction-to-edit translation service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditSet {
    #[serde(default)]
    pub edits: Vec<EditOp>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditOp {
    #[serde(default)]
    pub object_match: ObjectMatch,
    #[serde(default)]
    pub set: ObjectPatch,
    #[serde(default)]
    pub why: Option<String>,
}

/// Target selector for an edit. Id takes precedence over label; label
/// matching is case-insensitive. Both absent means the op never matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectMatch {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

/// Partial `DetectedObject`: only present fields are applied. Nested
/// bbox/attributes patches merge field-wise rather than replacing the
/// whole map. Values pass through unvalidated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectPatch {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub bbox_norm: Option<BBoxPatch>,
    #[serde(default)]
    pub dominant_color_hex: Option<String>,
    #[serde(default)]
    pub attributes: Option<AttributesPatch>,
}

impl ObjectPatch {
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.label.is_none()
            && self.confidence.is_none()
            && self.bbox_norm.is_none()
            && self.dominant_color_hex.is_none()
            && self.attributes.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BBoxPatch {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub w: Option<f64>,
    #[serde(default)]
    pub h: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributesPatch {
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub shape: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub other: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_document_deserializes_with_defaults() {
        let doc: AnalysisDocument =
            serde_json::from_str(r##"{"objects":[{"label":"Dog"}]}"##).unwrap();
        assert_eq!(doc.objects.len(), 1);
        assert_eq!(doc.objects[0].clean_label(), "dog");
        assert!(doc.objects[0].bbox_norm.is_none());
        assert!(doc.image_info.inferred_scene.is_empty());
    }

    #[test]
    fn partial_bbox_is_incomplete() {
        let bbox: BBoxNorm = serde_json::from_str(r##"{"x":0.2,"y":0.3,"w":0.1}"##).unwrap();
        assert!(!bbox.is_complete());
        assert_eq!(bbox.height(), 0.0);
    }

    #[test]
    fn empty_patch_reports_empty() {
        let patch: ObjectPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
        let patch: ObjectPatch =
            serde_json::from_str(r##"{"dominant_color_hex":"#ffffff"}"##).unwrap();
        assert!(!patch.is_empty());
    }
}
