use crate::analysis::types::DetectedObject;
use crate::prompt::color::nearest_color_name;

/// Labels that read as people. These get "wearing ... clothes" phrasing
/// and the "stands" verb in positional sentences.
pub const HUMAN_LABELS: &[&str] = &["girl", "boy", "woman", "man", "person", "child", "character"];

pub fn is_human_label(label: &str) -> bool {
    HUMAN_LABELS.contains(&label)
}

/// Builds a natural-language noun phrase for one detected object, or
/// None when the label is empty.
///
/// People never get a color on the noun itself (it goes on the clothes)
/// and fabric is never mentioned; trees default to brown and drop their
/// material; everything else gets "a {color} {label}" plus collected
/// extras.
pub fn build_object_phrase(object: &DetectedObject) -> Option<String> {
    let label = object.clean_label();
    if label.is_empty() {
        return None;
    }

    let attributes = object.attributes.clone().unwrap_or_default();
    let other = attributes.other.unwrap_or_default().to_lowercase();
    let material = attributes.material.unwrap_or_default().to_lowercase();
    let pattern = attributes.pattern.unwrap_or_default().to_lowercase();
    let color_adjective = object
        .dominant_color_hex
        .as_deref()
        .and_then(nearest_color_name);

    if is_human_label(&label) {
        let mut phrase = format!("a {label}");
        if let Some(color) = color_adjective {
            phrase.push_str(&format!(" wearing {color} clothes"));
        }
        let hair = if other.contains("curly") {
            Some("curly hair")
        } else if other.contains("straight") {
            Some("straight hair")
        } else {
            None
        };
        if let Some(hair) = hair {
            phrase.push_str(&format!(" with {hair}"));
        }
        return Some(phrase);
    }

    if label == "tree" {
        let leafy = other.contains("leafy") || pattern.contains("leafy");
        let base_color = color_adjective.unwrap_or("brown");
        let prefix = if leafy { "leafy " } else { "" };
        return Some(format!("a {prefix}{base_color} tree"));
    }

    let mut phrase = match color_adjective {
        Some(color) => format!("a {color} {label}"),
        None => format!("a {label}"),
    };
    let mut extras: Vec<String> = Vec::new();
    if material == "fur" || other.contains("fur") {
        extras.push("fur".to_string());
    }
    if other.contains("friendly") {
        extras.push("friendly expression".to_string());
    } else if !other.is_empty() && other != "solid" {
        extras.push(other);
    }
    if !extras.is_empty() {
        phrase.push_str(" with ");
        phrase.push_str(&extras.join(" and "));
    }
    Some(phrase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::ObjectAttributes;

    fn object(label: &str, hex: Option<&str>, other: Option<&str>) -> DetectedObject {
        DetectedObject {
            id: "obj_1".to_string(),
            label: label.to_string(),
            dominant_color_hex: hex.map(str::to_string),
            attributes: Some(ObjectAttributes {
                other: other.map(str::to_string),
                ..ObjectAttributes::default()
            }),
            ..DetectedObject::default()
        }
    }

    #[test]
    fn empty_label_yields_no_phrase() {
        assert_eq!(build_object_phrase(&object("  ", None, None)), None);
    }

    #[test]
    fn human_color_goes_on_the_clothes() {
        let phrase = build_object_phrase(&object("Girl", Some("#ff0000"), None)).unwrap();
        assert_eq!(phrase, "a girl wearing red clothes");
    }

    #[test]
    fn human_hair_prefers_curly_over_straight() {
        let phrase =
            build_object_phrase(&object("boy", None, Some("curly and straight hair"))).unwrap();
        assert_eq!(phrase, "a boy with curly hair");
    }

    #[test]
    fn tree_defaults_to_brown_without_a_color() {
        assert_eq!(
            build_object_phrase(&object("tree", None, None)).unwrap(),
            "a brown tree"
        );
    }

    #[test]
    fn leafy_tree_keeps_its_resolved_color() {
        let mut tree = object("tree", Some("#00aa00"), Some("leafy"));
        assert_eq!(
            build_object_phrase(&tree).unwrap(),
            "a leafy green tree"
        );
        // The leafy hint also counts when it sits in the pattern slot.
        tree.attributes = Some(ObjectAttributes {
            pattern: Some("leafy canopy".to_string()),
            ..ObjectAttributes::default()
        });
        assert_eq!(build_object_phrase(&tree).unwrap(), "a leafy green tree");
    }

    #[test]
    fn generic_object_gets_color_and_friendly_expression() {
        let phrase =
            build_object_phrase(&object("dog", Some("#8B4513"), Some("friendly"))).unwrap();
        assert_eq!(phrase, "a brown dog with friendly expression");
    }

    #[test]
    fn fur_material_and_other_text_join_with_and() {
        let mut dog = object("dog", None, Some("playful"));
        dog.attributes.as_mut().unwrap().material = Some("fur".to_string());
        assert_eq!(
            build_object_phrase(&dog).unwrap(),
            "a dog with fur and playful"
        );
    }

    #[test]
    fn solid_other_text_is_suppressed() {
        assert_eq!(
            build_object_phrase(&object("ball", Some("#ff0000"), Some("solid"))).unwrap(),
            "a red ball"
        );
    }

    #[test]
    fn missing_attributes_are_tolerated() {
        let bare = DetectedObject {
            label: "cloud".to_string(),
            ..DetectedObject::default()
        };
        assert_eq!(build_object_phrase(&bare).unwrap(), "a cloud");
    }
}
