pub mod edits;
pub mod types;

pub use edits::apply_edits;
pub use types::{
    AnalysisDocument, AttributesPatch, BBoxNorm, BBoxPatch, DetectedObject, EditOp, EditSet,
    ImageInfo, ObjectAttributes, ObjectMatch, ObjectPatch, StyleInfo,
};
