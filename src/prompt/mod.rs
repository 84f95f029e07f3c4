pub mod color;
pub mod geometry;
pub mod phrase;
pub mod synthesize;

pub use color::{backfill_dominant_colors, estimate_dominant_hex, nearest_color_name, ColorEstimateError};
pub use phrase::build_object_phrase;
pub use synthesize::{synthesize_prompt, synthesize_prompt_with, PromptOptions, DEFAULT_TRAILER};
