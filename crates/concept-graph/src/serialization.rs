use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::model::{ConceptMapState, NodeId};

// ------------------------------------------------------------------
// Encoding
// ------------------------------------------------------------------

pub fn encode(state: &ConceptMapState) -> serde_json::Result<String> {
    serde_json::to_string(state)
}

// ------------------------------------------------------------------
// Decoding
// ------------------------------------------------------------------

/// Decode a stored blob, falling back to the empty state when the blob
/// is not JSON, lacks `nodes`/`links` arrays, or has malformed entries.
pub fn decode(raw: &str) -> ConceptMapState {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "stored concept map is not valid JSON");
            return ConceptMapState::default();
        }
    };

    let has_arrays = ["nodes", "links"]
        .iter()
        .all(|field| value.get(field).is_some_and(Value::is_array));
    if !has_arrays {
        warn!("stored concept map has no nodes/links arrays");
        return ConceptMapState::default();
    }

    match serde_json::from_value::<ConceptMapState>(value) {
        Ok(mut state) => {
            repair(&mut state);
            state
        }
        Err(e) => {
            warn!(error = %e, "stored concept map has malformed entries");
            ConceptMapState::default()
        }
    }
}

/// Restore the graph invariants on a loaded state: links must join two
/// distinct present nodes, selection and focus must point at something.
pub fn repair(state: &mut ConceptMapState) {
    let ids: HashSet<&NodeId> = state.nodes.iter().map(|n| &n.id).collect();
    let before = state.links.len();
    state.links.retain(|l| {
        l.source_node_id != l.target_node_id
            && ids.contains(&l.source_node_id)
            && ids.contains(&l.target_node_id)
    });
    let dropped = before - state.links.len();
    if dropped > 0 {
        debug!(dropped, "removed invalid links from stored concept map");
    }

    if let Some(id) = &state.selected_node_id
        && !state.contains_node(id)
    {
        state.selected_node_id = None;
    }
    if let Some(id) = &state.focused_link_id
        && state.link(id).is_none()
    {
        state.focused_link_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ConceptLink, ConceptNode, LinkId, LinkType, NodeType, Position,
    };

    fn node(id: &str) -> ConceptNode {
        ConceptNode {
            id: NodeId::from(id),
            title: id.to_uppercase(),
            linked_text_start: 0,
            linked_text_end: 0,
            node_type: NodeType::Default,
            position: Position::default(),
        }
    }

    fn link(id: &str, s: &str, t: &str) -> ConceptLink {
        ConceptLink {
            id: LinkId::from(id),
            source_node_id: NodeId::from(s),
            target_node_id: NodeId::from(t),
            link_type: LinkType::Supports,
            label: Some("holds up".into()),
        }
    }

    #[test]
    fn test_encode_decode_preserves_state() {
        let state = ConceptMapState {
            nodes: vec![node("a"), node("b")],
            links: vec![link("l", "a", "b")],
            selected_node_id: Some(NodeId::from("b")),
            focused_link_id: Some(LinkId::from("l")),
            is_modal_open: true,
        };
        let raw = encode(&state).unwrap();
        assert!(raw.contains("\"selectedNodeId\":\"b\""));
        assert_eq!(decode(&raw), state);
    }

    #[test]
    fn test_garbage_and_partial_blobs_decode_empty() {
        assert_eq!(decode("not json"), ConceptMapState::default());
        assert_eq!(decode("{\"nodes\": []}"), ConceptMapState::default());
        assert_eq!(
            decode("{\"nodes\": {}, \"links\": []}"),
            ConceptMapState::default()
        );
        assert_eq!(
            decode("{\"nodes\": [{\"id\": 3}], \"links\": []}"),
            ConceptMapState::default()
        );
    }

    #[test]
    fn test_optional_fields_default() {
        let raw = r#"{
            "nodes": [{"id": "a", "title": "A"}],
            "links": []
        }"#;
        let state = decode(raw);
        assert_eq!(state.nodes.len(), 1);
        assert_eq!(state.nodes[0].node_type, NodeType::Default);
        assert_eq!(state.selected_node_id, None);
        assert!(!state.is_modal_open);
    }

    #[test]
    fn test_decode_repairs_dangling_references() {
        let state = ConceptMapState {
            nodes: vec![node("a"), node("b")],
            links: vec![
                link("ok", "a", "b"),
                link("self", "a", "a"),
                link("gone", "a", "zzz"),
            ],
            selected_node_id: Some(NodeId::from("zzz")),
            focused_link_id: Some(LinkId::from("gone")),
            is_modal_open: false,
        };
        let loaded = decode(&encode(&state).unwrap());
        assert_eq!(loaded.links.len(), 1);
        assert_eq!(loaded.links[0].id, LinkId::from("ok"));
        assert!(loaded.selected_node_id.is_none());
        assert!(loaded.focused_link_id.is_none());
    }
}
