use crate::analysis::types::BBoxNorm;

pub const DEFAULT_REGION_TOLERANCE: f64 = 0.1;
pub const DEFAULT_NEAR_THRESHOLD: f64 = 0.12;
pub const DEFAULT_OVERLAP_THRESHOLD: f64 = 0.25;

const DIRECTIONAL_OFFSET: f64 = 0.08;

/// Center of a normalized bounding box. Absent fields count as 0.0; no
/// clamping of out-of-range values.
pub fn bbox_center(bbox: &BBoxNorm) -> (f64, f64) {
    let cx = bbox.x0() + bbox.width() / 2.0;
    let cy = bbox.y0() + bbox.height() / 2.0;
    (cx, cy)
}

/// Names one of nine screen zones for a center point. The tolerance band
/// around 0.5 decides when an axis counts as centered. The true center
/// cell reads "the center", never "the center middle".
pub fn region_label(cx: f64, cy: f64, tolerance: f64) -> String {
    let horizontal = if cx < 0.5 - tolerance {
        "left"
    } else if cx > 0.5 + tolerance {
        "right"
    } else {
        "center"
    };
    let vertical = if cy < 0.5 - tolerance {
        "upper"
    } else if cy > 0.5 + tolerance {
        "lower"
    } else {
        "middle"
    };
    if horizontal == "center" && vertical == "middle" {
        return "the center".to_string();
    }
    if vertical == "upper" || vertical == "lower" {
        return format!("the {vertical} {horizontal}");
    }
    format!("the {horizontal}")
}

/// Sentence describing how `a` sits relative to `b`, or None when no
/// relation is confident enough to assert.
///
/// Tie-break order is deliberate: a horizontal center offset beyond 0.08
/// wins outright; otherwise a vertical offset only counts when the boxes
/// overlap enough along x (intersection over union of the x extents);
/// "near" is the last resort within `near_threshold` center distance.
pub fn relative_position(
    a_label: &str,
    a_bbox: &BBoxNorm,
    b_label: &str,
    b_bbox: &BBoxNorm,
    near_threshold: f64,
    overlap_threshold: f64,
) -> Option<String> {
    let (ax, ay) = bbox_center(a_bbox);
    let (bx, by) = bbox_center(b_bbox);
    let dx = ax - bx;
    let dy = ay - by;
    let distance = (dx * dx + dy * dy).sqrt();

    let a_x0 = a_bbox.x0();
    let a_x1 = a_bbox.x0() + a_bbox.width();
    let b_x0 = b_bbox.x0();
    let b_x1 = b_bbox.x0() + b_bbox.width();
    let overlap = (a_x1.min(b_x1) - a_x0.max(b_x0)).max(0.0);
    let union = a_x1.max(b_x1) - a_x0.min(b_x0);
    let overlap_ratio = if union > 0.0 { overlap / union } else { 0.0 };

    if dx < -DIRECTIONAL_OFFSET {
        return Some(format!("The {a_label} is to the left of the {b_label}."));
    }
    if dx > DIRECTIONAL_OFFSET {
        return Some(format!("The {a_label} is to the right of the {b_label}."));
    }
    if overlap_ratio >= overlap_threshold {
        if dy > DIRECTIONAL_OFFSET {
            return Some(format!("The {a_label} is below the {b_label}."));
        }
        if dy < -DIRECTIONAL_OFFSET {
            return Some(format!("The {a_label} is above the {b_label}."));
        }
    }
    if distance <= near_threshold {
        return Some(format!("The {a_label} is near the {b_label}."));
    }
    None
}
