use std::path::Path;

use image::imageops::FilterType;
use tracing::debug;

use crate::analysis::types::AnalysisDocument;

/// Named palette used to turn a dominant hex into prose. Order matters:
/// ties in the nearest-neighbor search resolve to the earlier entry.
const BASIC_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("white", (255, 255, 255)),
    ("black", (0, 0, 0)),
    ("red", (255, 0, 0)),
    ("green", (0, 170, 0)),
    ("blue", (0, 102, 255)),
    ("yellow", (255, 212, 0)),
    ("gray", (136, 136, 136)),
    ("brown", (139, 69, 19)),
    ("pink", (255, 192, 203)),
    ("purple", (128, 0, 128)),
    ("orange", (255, 165, 0)),
    ("beige", (245, 222, 179)),
    ("silver", (192, 192, 192)),
    ("gold", (212, 175, 55)),
    ("cyan", (0, 255, 255)),
    ("magenta", (255, 0, 255)),
];

const MID_GRAY: (u8, u8, u8) = (128, 128, 128);

#[derive(Debug, thiserror::Error)]
pub enum ColorEstimateError {
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Decodes a `#RRGGBB` string. Anything that is not six hex digits after
/// stripping the `#` falls back to mid-gray rather than failing.
fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
    let digits = hex.trim_start_matches('#');
    // Byte length alone is not enough: six bytes of multibyte text would
    // make the slices below split a character.
    if digits.len() != 6 || !digits.is_ascii() {
        return MID_GRAY;
    }
    let parse = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16);
    match (parse(0..2), parse(2..4), parse(4..6)) {
        (Ok(r), Ok(g), Ok(b)) => (r, g, b),
        _ => MID_GRAY,
    }
}

/// Nearest palette name for a hex color by squared RGB distance. Total:
/// malformed hex resolves as mid-gray, so some name always comes back.
pub fn nearest_color_name(hex: &str) -> Option<&'static str> {
    let (r, g, b) = hex_to_rgb(hex);
    let mut best: Option<&'static str> = None;
    let mut best_distance = i64::MAX;
    for (name, (pr, pg, pb)) in BASIC_COLORS {
        let dr = r as i64 - *pr as i64;
        let dg = g as i64 - *pg as i64;
        let db = b as i64 - *pb as i64;
        let distance = dr * dr + dg * dg + db * db;
        if distance < best_distance {
            best = Some(name);
            best_distance = distance;
        }
    }
    best
}

/// Mean color of a downscaled copy of the image, as `#rrggbb`. Used as a
/// fallback when the vision service omits an object's dominant color.
pub fn estimate_dominant_hex(path: &Path) -> Result<String, ColorEstimateError> {
    let decoded = image::ImageReader::open(path)?.decode()?;
    let small = decoded.resize_exact(64, 64, FilterType::Nearest).to_rgb8();
    let mut sums = [0u64; 3];
    for pixel in small.pixels() {
        sums[0] += pixel.0[0] as u64;
        sums[1] += pixel.0[1] as u64;
        sums[2] += pixel.0[2] as u64;
    }
    let count = (small.width() as u64) * (small.height() as u64);
    let mean = |sum: u64| (sum / count) as u8;
    Ok(format!(
        "#{:02x}{:02x}{:02x}",
        mean(sums[0]),
        mean(sums[1]),
        mean(sums[2])
    ))
}

fn is_well_formed_hex(value: &str) -> bool {
    value.starts_with('#') && value.len() == 7
}

/// Fills `fallback_hex` onto every object whose dominant color is absent
/// or not a 7-character `#`-prefixed value.
pub fn backfill_dominant_colors(document: &mut AnalysisDocument, fallback_hex: &str) {
    for object in &mut document.objects {
        let usable = object
            .dominant_color_hex
            .as_deref()
            .is_some_and(is_well_formed_hex);
        if !usable {
            debug!(
                "backfilling dominant color {} onto object '{}'",
                fallback_hex, object.id
            );
            object.dominant_color_hex = Some(fallback_hex.to_string());
        }
    }
}
