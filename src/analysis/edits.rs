use tracing::debug;

use crate::analysis::types::{
    AnalysisDocument, AttributesPatch, BBoxNorm, BBoxPatch, DetectedObject, EditOp, EditSet,
    ObjectAttributes, ObjectPatch,
};

/// Applies a batch of structured edits to the document in place.
///
/// Edits are processed in the order given. Each edit resolves its target
/// by exact `id` first, then by case-insensitive `label`; first match
/// wins, so when several objects share a label only the first is ever
/// reachable by label. An edit with an empty patch or no resolvable
/// target is skipped silently. Objects are never added or removed.
pub fn apply_edits(document: &mut AnalysisDocument, edit_set: &EditSet) {
    for (index, edit) in edit_set.edits.iter().enumerate() {
        if edit.set.is_empty() {
            debug!("edit {index} has an empty patch, skipping");
            continue;
        }
        let Some(target) = resolve_target(&mut document.objects, edit) else {
            debug!(
                "edit {index} matched no object (id={:?}, label={:?})",
                edit.object_match.id, edit.object_match.label
            );
            continue;
        };
        debug!("edit {index} applied to object '{}'", target.id);
        merge_patch(target, &edit.set);
    }
}

fn resolve_target<'a>(
    objects: &'a mut [DetectedObject],
    edit: &EditOp,
) -> Option<&'a mut DetectedObject> {
    if let Some(id) = edit.object_match.id.as_deref() {
        if !id.is_empty() {
            if let Some(position) = objects.iter().position(|object| object.id == id) {
                return Some(&mut objects[position]);
            }
        }
    }
    if let Some(label) = edit.object_match.label.as_deref() {
        if !label.is_empty() {
            let wanted = label.to_lowercase();
            if let Some(position) = objects
                .iter()
                .position(|object| object.label.to_lowercase() == wanted)
            {
                return Some(&mut objects[position]);
            }
        }
    }
    None
}

fn merge_patch(target: &mut DetectedObject, patch: &ObjectPatch) {
    if let Some(id) = &patch.id {
        target.id = id.clone();
    }
    if let Some(label) = &patch.label {
        target.label = label.clone();
    }
    if let Some(confidence) = patch.confidence {
        target.confidence = confidence;
    }
    if let Some(bbox_patch) = &patch.bbox_norm {
        merge_bbox(target.bbox_norm.get_or_insert_with(BBoxNorm::default), bbox_patch);
    }
    if let Some(hex) = &patch.dominant_color_hex {
        // Passed through unvalidated; malformed values are the upstream
        // edit producer's problem.
        target.dominant_color_hex = Some(hex.clone());
    }
    if let Some(attributes_patch) = &patch.attributes {
        merge_attributes(
            target.attributes.get_or_insert_with(ObjectAttributes::default),
            attributes_patch,
        );
    }
}

fn merge_bbox(bbox: &mut BBoxNorm, patch: &BBoxPatch) {
    if patch.x.is_some() {
        bbox.x = patch.x;
    }
    if patch.y.is_some() {
        bbox.y = patch.y;
    }
    if patch.w.is_some() {
        bbox.w = patch.w;
    }
    if patch.h.is_some() {
        bbox.h = patch.h;
    }
}

fn merge_attributes(attributes: &mut ObjectAttributes, patch: &AttributesPatch) {
    if patch.material.is_some() {
        attributes.material = patch.material.clone();
    }
    if patch.pattern.is_some() {
        attributes.pattern = patch.pattern.clone();
    }
    if patch.shape.is_some() {
        attributes.shape = patch.shape.clone();
    }
    if patch.size.is_some() {
        attributes.size = patch.size.clone();
    }
    if patch.other.is_some() {
        attributes.other = patch.other.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document_with_dog() -> AnalysisDocument {
        serde_json::from_str(
            r##"{
                "objects": [
                    {
                        "id": "obj_1",
                        "label": "Dog",
                        "dominant_color_hex": "#8b4513",
                        "attributes": {"material": "fur", "pattern": "striped"}
                    },
                    {"id": "obj_2", "label": "dog"}
                ]
            }"##,
        )
        .unwrap()
    }

    fn edit_set(json: &str) -> EditSet {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn unmatched_id_leaves_document_unchanged() {
        let mut doc = document_with_dog();
        let before = doc.clone();
        apply_edits(
            &mut doc,
            &edit_set(
                r##"{"edits":[{"object_match":{"id":"obj_9"},"set":{"label":"cat"}}]}"##,
            ),
        );
        assert_eq!(doc, before);
    }

    #[test]
    fn empty_patch_is_a_no_op_even_with_valid_match() {
        let mut doc = document_with_dog();
        let before = doc.clone();
        apply_edits(
            &mut doc,
            &edit_set(r##"{"edits":[{"object_match":{"id":"obj_1"},"set":{}}]}"##),
        );
        assert_eq!(doc, before);
    }

    #[test]
    fn deep_merge_preserves_untouched_attribute_fields() {
        let mut doc = document_with_dog();
        apply_edits(
            &mut doc,
            &edit_set(
                r##"{"edits":[{"object_match":{"id":"obj_1"},"set":{"attributes":{"material":"wood"}}}]}"##,
            ),
        );
        let attributes = doc.objects[0].attributes.as_ref().unwrap();
        assert_eq!(attributes.material.as_deref(), Some("wood"));
        assert_eq!(attributes.pattern.as_deref(), Some("striped"));
    }

    #[test]
    fn label_match_is_case_insensitive_and_first_match_wins() {
        let mut doc = document_with_dog();
        apply_edits(
            &mut doc,
            &edit_set(
                r##"{"edits":[{"object_match":{"label":"DOG"},"set":{"dominant_color_hex":"#ffffff"}}]}"##,
            ),
        );
        assert_eq!(
            doc.objects[0].dominant_color_hex.as_deref(),
            Some("#ffffff")
        );
        assert_eq!(
            doc.objects[1].dominant_color_hex,
            None,
            "only the first dog should be edited"
        );
    }

    #[test]
    fn id_takes_precedence_over_label() {
        let mut doc = document_with_dog();
        apply_edits(
            &mut doc,
            &edit_set(
                r##"{"edits":[{"object_match":{"id":"obj_2","label":"dog"},"set":{"label":"puppy"}}]}"##,
            ),
        );
        assert_eq!(doc.objects[0].label, "Dog");
        assert_eq!(doc.objects[1].label, "puppy");
    }

    #[test]
    fn attributes_patch_initializes_missing_attributes() {
        let mut doc = document_with_dog();
        apply_edits(
            &mut doc,
            &edit_set(
                r##"{"edits":[{"object_match":{"id":"obj_2"},"set":{"attributes":{"other":"friendly"}}}]}"##,
            ),
        );
        let attributes = doc.objects[1].attributes.as_ref().unwrap();
        assert_eq!(attributes.other.as_deref(), Some("friendly"));
        assert!(attributes.material.is_none());
    }

    #[test]
    fn partial_bbox_patch_merges_into_existing_box() {
        let mut doc: AnalysisDocument = serde_json::from_str(
            r##"{"objects":[{"id":"obj_1","label":"ball","bbox_norm":{"x":0.1,"y":0.2,"w":0.3,"h":0.4}}]}"##,
        )
        .unwrap();
        apply_edits(
            &mut doc,
            &edit_set(
                r##"{"edits":[{"object_match":{"id":"obj_1"},"set":{"bbox_norm":{"x":0.5}}}]}"##,
            ),
        );
        let bbox = doc.objects[0].bbox_norm.unwrap();
        assert_eq!(bbox.x, Some(0.5));
        assert_eq!(bbox.y, Some(0.2));
    }

    #[test]
    fn edits_apply_in_order_and_later_patches_win() {
        let mut doc = document_with_dog();
        apply_edits(
            &mut doc,
            &edit_set(
                r##"{"edits":[
                    {"object_match":{"id":"obj_1"},"set":{"dominant_color_hex":"#0066ff"}},
                    {"object_match":{"id":"obj_1"},"set":{"dominant_color_hex":"#ff0000"}}
                ]}"##,
            ),
        );
        assert_eq!(
            doc.objects[0].dominant_color_hex.as_deref(),
            Some("#ff0000")
        );
    }
}
