use concept_graph::{AiGraph, LinkId, LinkType, NodeId, Position};
use tracing::{debug, info};

use crate::ai_client::NOTIFICATION_TITLE;
use crate::effects::Effect;
use crate::selection::add_selection_to_map;
use crate::settings::ZOOM_RANGE;
use crate::store::{
    DetailTab, DocumentRef, LinkDraft, Notification, RenameDraft, Store,
};
use crate::text_surface::{CharRange, TextSurface};

/// Actions that can be dispatched to modify the app state
#[derive(Debug, Clone)]
pub enum Action {
    // Editor
    /// Editor text changed
    EditDocument { text: String },
    /// Editor selection changed
    SetTextSelection { range: Option<CharRange> },
    /// Turn the current text selection into a node
    AddSelectionToMap,
    /// Open another document and its map
    SwitchDocument { document: DocumentRef },

    // Nodes
    SelectNode { id: Option<NodeId> },
    /// Select a node and reveal its text span
    NavigateToNode { id: NodeId },
    MoveNode { id: NodeId, position: Position },
    DeleteNode { id: NodeId },
    StartRename { id: NodeId },
    SetRenameText { text: String },
    CommitRename,
    CancelRename,

    // Links
    OpenLinkDialog { source: NodeId },
    UpdateLinkDraft { draft: LinkDraft },
    CreateLink,
    CancelLinkDialog,
    DeleteLink { id: LinkId },

    // AI import
    /// Ask the AI service for a map of the whole document
    RequestAiImport,
    /// A reply for the latest request arrived; `key` names the map it
    /// was requested for
    ApplyAiImport {
        key: String,
        text: String,
        graph: AiGraph,
    },

    // View
    SetDetailOpen { open: bool },
    ToggleDetail,
    SetDetailTab { tab: DetailTab },
    SetZoom { zoom: f32 },
    ClearAll,
    ShowNotification { notification: Notification },
    ClearNotification,
}

/// Apply a single action to the store
pub fn update(store: &mut Store, action: Action) -> Vec<Effect> {
    match action {
        // Editor
        Action::EditDocument { text } => {
            store.document.replace_text(text);
            vec![]
        }
        Action::SetTextSelection { range } => {
            store.document.update_selection(range);
            vec![]
        }
        Action::AddSelectionToMap => {
            if add_selection_to_map(&mut store.document, &mut store.concepts)
                .is_some()
            {
                store.document.update_selection(None);
            }
            vec![]
        }
        Action::SwitchDocument { document } => {
            store.concepts.switch_key(document.storage_key());
            store.document_ref = document;
            store.rename = None;
            store.link_draft = None;
            store.map_view.end_drag();
            vec![Effect::RestoreHighlights]
        }

        // Nodes
        Action::SelectNode { id } => {
            store.concepts.set_selected_node(id);
            vec![]
        }
        Action::NavigateToNode { id } => {
            let Some(node) = store.concepts.state().node(&id) else {
                return vec![];
            };
            let anchored = node.has_anchor()
                || store.document.highlight_for(&id).is_some();
            store.concepts.set_selected_node(Some(id.clone()));
            if !anchored {
                debug!(id = %id, "node has no text anchor");
                return vec![];
            }
            store.concepts.set_modal_open(false);
            vec![Effect::RevealInEditor { id }]
        }
        Action::MoveNode { id, position } => {
            store.concepts.update_node_position(&id, position);
            vec![]
        }
        Action::DeleteNode { id } => {
            store.document.remove_highlight_for(&id);
            store.concepts.delete_node(&id);
            if store.rename.as_ref().is_some_and(|r| r.node_id == id) {
                store.rename = None;
            }
            if store.link_draft.as_ref().is_some_and(|d| d.source == id) {
                store.link_draft = None;
            }
            vec![]
        }
        Action::StartRename { id } => {
            store.rename = store.concepts.state().node(&id).map(|node| {
                RenameDraft {
                    node_id: id.clone(),
                    text: node.title.clone(),
                }
            });
            vec![]
        }
        Action::SetRenameText { text } => {
            if let Some(draft) = &mut store.rename {
                draft.text = text;
            }
            vec![]
        }
        Action::CommitRename => {
            if let Some(draft) = store.rename.take() {
                store.concepts.rename_node(&draft.node_id, &draft.text);
            }
            vec![]
        }
        Action::CancelRename => {
            store.rename = None;
            vec![]
        }

        // Links
        Action::OpenLinkDialog { source } => {
            let state = store.concepts.state();
            if state.nodes.len() < 2 || !state.contains_node(&source) {
                return vec![];
            }
            let target = state
                .nodes
                .iter()
                .find(|n| n.id != source)
                .map(|n| n.id.clone());
            store.link_draft = Some(LinkDraft {
                source,
                target,
                link_type: LinkType::default(),
                label: String::new(),
            });
            vec![]
        }
        Action::UpdateLinkDraft { draft } => {
            store.link_draft = Some(draft);
            vec![]
        }
        Action::CreateLink => {
            if let Some(draft) = store.link_draft.take()
                && let Some(target) = &draft.target
            {
                store.concepts.add_link(
                    &draft.source,
                    target,
                    draft.link_type,
                    Some(draft.label.as_str()),
                );
            }
            vec![]
        }
        Action::CancelLinkDialog => {
            store.link_draft = None;
            vec![]
        }
        Action::DeleteLink { id } => {
            store.concepts.delete_link(&id);
            vec![]
        }

        // AI import
        Action::RequestAiImport => {
            if store.ai.is_busy() {
                debug!("AI request already running, starting a newer one");
            }
            vec![Effect::RequestAiImport {
                text: store.document.full_text().to_owned(),
                key: store.concepts.key().to_owned(),
            }]
        }
        Action::ApplyAiImport { key, text, graph } => {
            if key != store.concepts.key() {
                info!(
                    requested_for = %key,
                    current = %store.concepts.key(),
                    "discarding AI map for a document that is no longer open"
                );
                return vec![];
            }
            store
                .concepts
                .import_from_ai(&text, &graph.nodes, &graph.links);
            store.rename = None;
            store.link_draft = None;
            store.document.clear_highlights();
            info!(nodes = graph.nodes.len(), "applied AI concept map");
            vec![Effect::RestoreHighlights]
        }

        // View
        Action::SetDetailOpen { open } => {
            store.concepts.set_modal_open(open);
            vec![]
        }
        Action::ToggleDetail => {
            let open = store.is_detail_open();
            store.concepts.set_modal_open(!open);
            vec![]
        }
        Action::SetDetailTab { tab } => {
            store.detail_tab = tab;
            vec![]
        }
        Action::SetZoom { zoom } => {
            store.map_view.zoom = ZOOM_RANGE.clamp(zoom);
            vec![]
        }
        Action::ClearAll => {
            store.concepts.clear_all();
            store.document.clear_highlights();
            store.rename = None;
            store.link_draft = None;
            vec![]
        }
        Action::ShowNotification { notification } => {
            store.notification = Some(notification);
            vec![]
        }
        Action::ClearNotification => {
            store.notification = None;
            vec![]
        }
    }
}

/// Notification for a failed import.
pub fn import_failed(message: impl Into<String>) -> Action {
    Action::ShowNotification {
        notification: Notification::new(NOTIFICATION_TITLE, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai_client::{AiClient, ClientConfig};
    use crate::text_surface::DocumentBuffer;
    use concept_graph::{AiLink, AiNode, MemoryStorage, NodeType, WritingMode};
    use std::time::Duration;

    const TEXT: &str = "Ahab hunts the whale across the sea.";

    fn store_with(storage: MemoryStorage) -> Store {
        Store::new(
            Box::new(storage),
            DocumentRef {
                id: Some("novel:ch1".into()),
                mode: WritingMode::Novel,
            },
            DocumentBuffer::new(TEXT),
            AiClient::new(ClientConfig {
                endpoint: "http://127.0.0.1:9/unused".into(),
                timeout: Duration::from_millis(10),
            }),
        )
    }

    fn store() -> Store {
        store_with(MemoryStorage::new())
    }

    fn add(store: &mut Store, from: usize, to: usize) -> NodeId {
        update(store, Action::SetTextSelection { range: Some((from, to)) });
        update(store, Action::AddSelectionToMap);
        store.concepts.state().nodes.last().unwrap().id.clone()
    }

    #[test]
    fn test_add_selection_highlights_and_opens_detail() {
        let mut store = store();
        let id = add(&mut store, 0, 4);
        assert_eq!(store.document.highlight_for(&id), Some((0, 4)));
        assert!(store.is_detail_open());
        assert_eq!(store.concepts.state().selected_node_id, Some(id));
    }

    #[test]
    fn test_navigate_reveals_anchor_and_closes_detail() {
        let mut store = store();
        let id = add(&mut store, 15, 20);

        let effects = update(&mut store, Action::NavigateToNode { id: id.clone() });

        assert!(matches!(&effects[..], [Effect::RevealInEditor { id: e }] if *e == id));
        assert!(!store.is_detail_open());
    }

    #[test]
    fn test_navigate_without_anchor_only_selects() {
        let mut store = store();
        let key = store.concepts.key().to_owned();
        update(
            &mut store,
            Action::ApplyAiImport {
                key,
                text: TEXT.into(),
                graph: AiGraph {
                    nodes: vec![AiNode::new("Starbuck", NodeType::Character)],
                    links: vec![],
                },
            },
        );
        let id = store.concepts.state().nodes[0].id.clone();

        let effects = update(&mut store, Action::NavigateToNode { id: id.clone() });

        assert!(effects.is_empty());
        assert_eq!(store.concepts.state().selected_node_id, Some(id));
        assert!(store.is_detail_open());
    }

    #[test]
    fn test_delete_node_removes_highlight_first() {
        let mut store = store();
        let a = add(&mut store, 0, 4);
        let b = add(&mut store, 15, 20);
        update(&mut store, Action::OpenLinkDialog { source: a.clone() });
        update(&mut store, Action::CreateLink);
        assert_eq!(store.concepts.state().links.len(), 1);

        update(&mut store, Action::DeleteNode { id: a.clone() });

        assert_eq!(store.document.highlight_for(&a), None);
        assert_eq!(store.document.highlight_for(&b), Some((15, 20)));
        assert!(store.concepts.state().links.is_empty());
    }

    #[test]
    fn test_delete_nested_node_keeps_outer_highlight() {
        let mut store = store();
        let inner = add(&mut store, 0, 4);
        let outer = add(&mut store, 0, 10);

        update(&mut store, Action::DeleteNode { id: inner.clone() });

        assert_eq!(store.document.highlight_for(&inner), None);
        assert_eq!(store.document.highlight_for(&outer), Some((0, 10)));
        assert_eq!(store.concepts.state().nodes.len(), 1);
    }

    #[test]
    fn test_link_dialog_defaults() {
        let mut store = store();
        let a = add(&mut store, 0, 4);
        update(&mut store, Action::OpenLinkDialog { source: a.clone() });
        assert!(store.link_draft.is_none());

        let b = add(&mut store, 15, 20);
        update(&mut store, Action::OpenLinkDialog { source: b.clone() });
        let draft = store.link_draft.clone().unwrap();
        assert_eq!(draft.target, Some(a.clone()));
        assert_eq!(draft.link_type, LinkType::RelatesTo);

        update(
            &mut store,
            Action::UpdateLinkDraft {
                draft: LinkDraft {
                    link_type: LinkType::Conflicts,
                    label: "   ".into(),
                    ..draft
                },
            },
        );
        update(&mut store, Action::CreateLink);
        let link = &store.concepts.state().links[0];
        assert_eq!(link.source_node_id, b);
        assert_eq!(link.target_node_id, a);
        assert_eq!(link.link_type, LinkType::Conflicts);
        assert_eq!(link.label, None);
        assert!(store.link_draft.is_none());
    }

    #[test]
    fn test_rename_flow() {
        let mut store = store();
        let a = add(&mut store, 0, 4);
        update(&mut store, Action::StartRename { id: a.clone() });
        assert_eq!(store.rename.as_ref().unwrap().text, "Ahab");

        update(&mut store, Action::SetRenameText { text: "  ".into() });
        update(&mut store, Action::CommitRename);
        assert_eq!(store.concepts.state().nodes[0].title, "Ahab");

        update(&mut store, Action::StartRename { id: a.clone() });
        update(&mut store, Action::SetRenameText { text: "Captain".into() });
        update(&mut store, Action::CancelRename);
        assert_eq!(store.concepts.state().nodes[0].title, "Ahab");

        update(&mut store, Action::StartRename { id: a });
        update(&mut store, Action::SetRenameText { text: " Captain ".into() });
        update(&mut store, Action::CommitRename);
        assert_eq!(store.concepts.state().nodes[0].title, "Captain");
        assert!(store.rename.is_none());
    }

    #[test]
    fn test_ai_import_replaces_map_and_highlights() {
        let mut store = store();
        let old = add(&mut store, 0, 4);

        let key = store.concepts.key().to_owned();
        let effects = update(
            &mut store,
            Action::ApplyAiImport {
                key,
                text: TEXT.into(),
                graph: AiGraph {
                    nodes: vec![
                        AiNode::new("whale", NodeType::Idea),
                        AiNode::new("sea", NodeType::Place),
                    ],
                    links: vec![AiLink::new(0, 1, LinkType::Supports)],
                },
            },
        );

        assert!(matches!(&effects[..], [Effect::RestoreHighlights]));
        assert_eq!(store.document.highlight_for(&old), None);
        let state = store.concepts.state();
        assert_eq!(state.nodes.len(), 2);
        assert_eq!(state.links.len(), 1);
        assert!(state.is_modal_open);
    }

    #[test]
    fn test_toggle_and_zoom() {
        let mut store = store();
        update(&mut store, Action::ToggleDetail);
        assert!(store.is_detail_open());
        update(&mut store, Action::ToggleDetail);
        assert!(!store.is_detail_open());

        update(&mut store, Action::SetZoom { zoom: 9.0 });
        assert_eq!(store.map_view.zoom, 3.0);
        update(&mut store, Action::SetZoom { zoom: 0.1 });
        assert_eq!(store.map_view.zoom, 0.4);
    }

    #[test]
    fn test_switch_document_loads_its_map() {
        let storage = MemoryStorage::new();
        let mut store = store_with(storage.clone());
        add(&mut store, 0, 4);

        update(
            &mut store,
            Action::SwitchDocument {
                document: DocumentRef {
                    id: None,
                    mode: WritingMode::Journal,
                },
            },
        );
        assert!(store.concepts.state().nodes.is_empty());
        assert_eq!(store.concepts.key(), "concept-map:journal-default");
        assert!(storage.get("concept-map:novel:ch1").is_some());
    }

    #[test]
    fn test_ai_reply_for_previous_document_is_dropped() {
        let storage = MemoryStorage::new();
        let mut store = store_with(storage.clone());
        add(&mut store, 0, 4);
        let effects = update(&mut store, Action::RequestAiImport);
        let requested_for = match &effects[..] {
            [Effect::RequestAiImport { key, .. }] => key.clone(),
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(requested_for, "concept-map:novel:ch1");

        update(
            &mut store,
            Action::SwitchDocument {
                document: DocumentRef {
                    id: None,
                    mode: WritingMode::Journal,
                },
            },
        );
        let journal = add(&mut store, 15, 20);

        let effects = update(
            &mut store,
            Action::ApplyAiImport {
                key: requested_for,
                text: TEXT.into(),
                graph: AiGraph {
                    nodes: vec![AiNode::new("sea", NodeType::Place)],
                    links: vec![],
                },
            },
        );

        assert!(effects.is_empty());
        let nodes = &store.concepts.state().nodes;
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, journal);
        assert_eq!(store.document.highlight_for(&journal), Some((15, 20)));
        let novel = storage.get("concept-map:novel:ch1").unwrap();
        assert!(novel.contains("Ahab"));
        assert!(!novel.contains("\"sea\""));
    }

    #[test]
    fn test_clear_all() {
        let mut store = store();
        let a = add(&mut store, 0, 4);
        update(&mut store, Action::ClearAll);
        assert!(store.concepts.state().nodes.is_empty());
        assert!(!store.is_detail_open());
        assert_eq!(store.document.highlight_for(&a), None);
    }
}
