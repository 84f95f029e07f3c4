//! Deterministic analysis-to-prompt synthesis for picture-book image
//! generation.
//!
//! The library turns a schema-constrained image-analysis document
//! (objects, normalized bounding boxes, dominant colors, style slots)
//! into a single English paragraph for an image-generation model, and
//! applies externally produced structured edits back onto the document
//! so the next round re-renders from the mutated state.
//!
//! Everything here is synchronous and pure over in-memory data: the
//! vision analysis, instruction-to-edit translation, prompt polishing
//! and image generation are external collaborators that exchange JSON
//! with these types.

pub mod analysis;
pub mod config;
pub mod prompt;
pub mod utils;

pub use analysis::{apply_edits, AnalysisDocument, DetectedObject, EditOp, EditSet};
pub use prompt::{
    build_object_phrase, synthesize_prompt, synthesize_prompt_with, PromptOptions,
};
