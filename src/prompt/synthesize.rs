use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::analysis::types::{AnalysisDocument, StyleInfo};
use crate::prompt::geometry::{
    bbox_center, region_label, relative_position, DEFAULT_NEAR_THRESHOLD,
    DEFAULT_OVERLAP_THRESHOLD, DEFAULT_REGION_TOLERANCE,
};
use crate::prompt::phrase::{build_object_phrase, is_human_label};

pub const DEFAULT_TRAILER: &str =
    "Child-friendly picture-book illustration, flat 2D digital illustration, high quality.";

/// Relative-position sentences are only computed among the first few
/// objects; documents list salient objects first.
pub const DEFAULT_RELATIVE_PAIR_CAP: usize = 3;

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Style phrases that would double up with the fixed "The illustration
/// is rendered in ..." wording.
const REDUNDANT_STYLE_BITS: &[&str] = &["illustration", "an illustration", "a illustration"];

/// Knobs of the synthesis engine. The defaults reproduce the reference
/// behavior; the trailer is the product-specific closing sentence and is
/// meant to be swapped out by other callers.
#[derive(Debug, Clone)]
pub struct PromptOptions {
    pub trailer: String,
    pub region_tolerance: f64,
    pub near_threshold: f64,
    pub overlap_threshold: f64,
    pub relative_pair_cap: usize,
}

impl Default for PromptOptions {
    fn default() -> Self {
        PromptOptions {
            trailer: DEFAULT_TRAILER.to_string(),
            region_tolerance: DEFAULT_REGION_TOLERANCE,
            near_threshold: DEFAULT_NEAR_THRESHOLD,
            overlap_threshold: DEFAULT_OVERLAP_THRESHOLD,
            relative_pair_cap: DEFAULT_RELATIVE_PAIR_CAP,
        }
    }
}

/// Renders the document into one flattened English paragraph with the
/// default options.
pub fn synthesize_prompt(document: &AnalysisDocument) -> String {
    synthesize_prompt_with(document, &PromptOptions::default())
}

/// Renders the document into one flattened English paragraph.
///
/// Sentence groups come out in a fixed order: scene, object inclusion,
/// positions (absolute then relative, de-duplicated together), style,
/// composition, notes, trailer. Every function this calls is total, so
/// a degenerate document still yields a valid prompt.
pub fn synthesize_prompt_with(document: &AnalysisDocument, options: &PromptOptions) -> String {
    let mut lines: Vec<String> = Vec::new();

    let scene = document.image_info.inferred_scene.trim();
    if !scene.is_empty() {
        lines.push(format!("{}.", scene.trim_end_matches('.')));
    }

    if let Some(sentence) = inclusion_sentence(document) {
        lines.push(sentence);
    }

    let position_sentences = position_sentences(document, options);
    if !position_sentences.is_empty() {
        lines.push(position_sentences.join(" "));
    }

    if let Some(sentence) = style_sentence(&document.style) {
        lines.push(sentence);
    }
    let composition = document.style.composition.trim();
    if !composition.is_empty() {
        lines.push(format!("The composition is {composition}."));
    }
    let notes = document.image_info.notes.trim();
    if !notes.is_empty() {
        lines.push(format!("{}.", notes.trim_end_matches('.')));
    }
    if !options.trailer.is_empty() {
        lines.push(options.trailer.clone());
    }

    let flattened = lines
        .iter()
        .map(|line| WHITESPACE_RE.replace_all(line, " ").trim().to_string())
        .collect::<Vec<_>>()
        .join(" ");
    debug!("synthesized prompt of {} characters", flattened.len());
    flattened.trim().to_string()
}

/// "The scene includes ..." with one/two/Oxford-list grammar. Emitted
/// once, after the whole object list has been walked.
fn inclusion_sentence(document: &AnalysisDocument) -> Option<String> {
    let phrases: Vec<String> = document
        .objects
        .iter()
        .filter_map(build_object_phrase)
        .collect();
    match phrases.as_slice() {
        [] => None,
        [only] => Some(format!("The scene includes {only}.")),
        [first, second] => Some(format!("The scene includes {first} and {second}.")),
        [head @ .., last] => Some(format!(
            "The scene includes {}, and {last}.",
            head.join(", ")
        )),
    }
}

/// Absolute region sentences for every positioned object, then relative
/// sentences among the first `relative_pair_cap` objects, de-duplicated
/// by exact text while preserving first occurrence.
fn position_sentences(document: &AnalysisDocument, options: &PromptOptions) -> Vec<String> {
    let mut sentences: Vec<String> = Vec::new();

    for object in &document.objects {
        let label = object.clean_label();
        let Some(bbox) = object.bbox_norm.as_ref() else {
            continue;
        };
        if label.is_empty() || !bbox.is_complete() {
            continue;
        }
        let (cx, cy) = bbox_center(bbox);
        let region = region_label(cx, cy, options.region_tolerance);
        let verb = if is_human_label(&label) { "stands" } else { "is" };
        sentences.push(format!("The {label} {verb} in {region}."));
    }

    let capped = &document.objects[..document.objects.len().min(options.relative_pair_cap)];
    for (i, a) in capped.iter().enumerate() {
        for b in &capped[i + 1..] {
            let a_label = a.clean_label();
            let b_label = b.clean_label();
            if a_label.is_empty() || b_label.is_empty() {
                continue;
            }
            let (Some(a_bbox), Some(b_bbox)) = (a.bbox_norm.as_ref(), b.bbox_norm.as_ref())
            else {
                continue;
            };
            if !a_bbox.is_complete() || !b_bbox.is_complete() {
                continue;
            }
            if let Some(sentence) = relative_position(
                &a_label,
                a_bbox,
                &b_label,
                b_bbox,
                options.near_threshold,
                options.overlap_threshold,
            ) {
                sentences.push(sentence);
            }
        }
    }

    let mut unique: Vec<String> = Vec::new();
    for sentence in sentences {
        if !unique.contains(&sentence) {
            unique.push(sentence);
        }
    }
    unique
}

fn style_sentence(style: &StyleInfo) -> Option<String> {
    let slots = [
        &style.genre,
        &style.rendering,
        &style.line_style,
        &style.color_palette,
        &style.lighting,
        &style.tone_mood,
        &style.shading,
        &style.texture,
    ];
    let bits: Vec<&str> = slots
        .iter()
        .map(|slot| slot.trim())
        .filter(|value| !value.is_empty())
        .filter(|value| !REDUNDANT_STYLE_BITS.contains(&value.to_lowercase().as_str()))
        .collect();
    if bits.is_empty() {
        return None;
    }
    Some(format!(
        "The illustration is rendered in {} style.",
        bits.join(", ")
    ))
}
