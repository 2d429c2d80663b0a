use tracing::{debug, info, warn};

use crate::classify::infer_node_type;
use crate::import::{self, AiLink, AiNode};
use crate::layout::cascade_position;
use crate::model::{
    ConceptLink, ConceptMapState, ConceptNode, LinkId, LinkType, NodeId,
    Position, TextSelection,
};
use crate::serialization;
use crate::storage::{StorageAdapter, StorageError};

/// Owner of one document's concept map.
///
/// Every mutating call that changes something bumps [`revision`] and
/// writes the whole state through the storage adapter. Storage failures
/// are logged and otherwise ignored.
///
/// [`revision`]: ConceptStore::revision
pub struct ConceptStore<S> {
    storage: S,
    key: String,
    state: ConceptMapState,
    revision: u64,
}

impl<S: StorageAdapter> ConceptStore<S> {
    /// Load the map stored under `key`, or start empty.
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let state = load_state(&storage, &key);
        Self {
            storage,
            key,
            state,
            revision: 0,
        }
    }

    /// Point the store at another document, loading its map.
    pub fn switch_key(&mut self, key: impl Into<String>) {
        let key = key.into();
        if key == self.key {
            return;
        }
        self.state = load_state(&self.storage, &key);
        self.key = key;
        self.revision = self.revision.wrapping_add(1);
        info!(
            key = %self.key,
            nodes = self.state.nodes.len(),
            "switched concept map"
        );
    }

    pub fn state(&self) -> &ConceptMapState {
        &self.state
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Increments on every change; use as a cache key.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // ---------------------------------------------------------------
    // Nodes
    // ---------------------------------------------------------------

    /// Create a node for a text selection. The node is selected and the
    /// detail view opened.
    pub fn add_node(
        &mut self,
        selection: &TextSelection,
        explicit_id: Option<NodeId>,
    ) -> NodeId {
        let id = explicit_id.unwrap_or_else(NodeId::generate);
        let node = ConceptNode {
            id: id.clone(),
            title: ConceptNode::title_from(&selection.text),
            linked_text_start: selection.from,
            linked_text_end: selection.to,
            node_type: infer_node_type(&selection.text),
            position: cascade_position(self.state.nodes.len()),
        };
        debug!(id = %id, title = %node.title, kind = %node.node_type, "add node");
        self.state.nodes.push(node);
        self.state.selected_node_id = Some(id.clone());
        self.state.is_modal_open = true;
        self.commit();
        id
    }

    /// Replace the whole map with an AI-generated one.
    pub fn import_from_ai(
        &mut self,
        full_text: &str,
        nodes: &[AiNode],
        links: &[AiLink],
    ) {
        self.state = import::build_state(full_text, nodes, links);
        info!(
            nodes = self.state.nodes.len(),
            links = self.state.links.len(),
            "imported AI concept map"
        );
        self.commit();
    }

    /// Remove a node and every link touching it. Returns the removed
    /// node so the caller can clear its highlight.
    pub fn delete_node(&mut self, id: &NodeId) -> Option<ConceptNode> {
        let index = self.state.nodes.iter().position(|n| &n.id == id)?;
        let node = self.state.nodes.remove(index);
        self.state.links.retain(|l| !l.touches(id));
        if self.state.selected_node_id.as_ref() == Some(id) {
            self.state.selected_node_id = None;
        }
        if let Some(focused) = &self.state.focused_link_id
            && self.state.link(focused).is_none()
        {
            self.state.focused_link_id = None;
        }
        debug!(id = %id, "delete node");
        self.commit();
        Some(node)
    }

    /// Blank titles are ignored; others are stored trimmed.
    pub fn rename_node(&mut self, id: &NodeId, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        let Some(node) = self.state.node_mut(id) else {
            return false;
        };
        node.title = title.to_owned();
        debug!(id = %id, title, "rename node");
        self.commit();
        true
    }

    pub fn update_node_position(&mut self, id: &NodeId, position: Position) {
        if let Some(node) = self.state.node_mut(id) {
            node.position = position;
            self.commit();
        }
    }

    // ---------------------------------------------------------------
    // Links
    // ---------------------------------------------------------------

    /// Link two distinct existing nodes and focus the new link.
    pub fn add_link(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        link_type: LinkType,
        label: Option<&str>,
    ) -> Option<LinkId> {
        if source == target {
            debug!(id = %source, "rejected self link");
            return None;
        }
        if !self.state.contains_node(source)
            || !self.state.contains_node(target)
        {
            debug!(%source, %target, "rejected link to missing node");
            return None;
        }
        let id = LinkId::generate();
        let label = label
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_owned);
        self.state.links.push(ConceptLink {
            id: id.clone(),
            source_node_id: source.clone(),
            target_node_id: target.clone(),
            link_type,
            label,
        });
        self.state.focused_link_id = Some(id.clone());
        debug!(id = %id, %source, %target, kind = %link_type, "add link");
        self.commit();
        Some(id)
    }

    pub fn delete_link(&mut self, id: &LinkId) -> bool {
        let before = self.state.links.len();
        self.state.links.retain(|l| &l.id != id);
        if self.state.links.len() == before {
            return false;
        }
        if self.state.focused_link_id.as_ref() == Some(id) {
            self.state.focused_link_id = None;
        }
        debug!(id = %id, "delete link");
        self.commit();
        true
    }

    // ---------------------------------------------------------------
    // Selection and view state
    // ---------------------------------------------------------------

    /// Unknown ids clear the selection.
    pub fn set_selected_node(&mut self, id: Option<NodeId>) {
        let id = id.filter(|id| self.state.contains_node(id));
        if self.state.selected_node_id != id {
            self.state.selected_node_id = id;
            self.commit();
        }
    }

    pub fn set_focused_link(&mut self, id: Option<LinkId>) {
        let id = id.filter(|id| self.state.link(id).is_some());
        if self.state.focused_link_id != id {
            self.state.focused_link_id = id;
            self.commit();
        }
    }

    pub fn set_modal_open(&mut self, open: bool) {
        if self.state.is_modal_open != open {
            self.state.is_modal_open = open;
            self.commit();
        }
    }

    pub fn clear_all(&mut self) {
        self.state = ConceptMapState::default();
        debug!(key = %self.key, "cleared concept map");
        self.commit();
    }

    // ---------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------

    fn commit(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        if let Err(e) = self.persist() {
            warn!(key = %self.key, error = %e, "failed to save concept map");
        }
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let raw = serialization::encode(&self.state)?;
        self.storage.save(&self.key, &raw)
    }
}

fn load_state<S: StorageAdapter>(storage: &S, key: &str) -> ConceptMapState {
    match storage.load(key) {
        Ok(Some(raw)) => serialization::decode(&raw),
        Ok(None) => ConceptMapState::default(),
        Err(e) => {
            warn!(key, error = %e, "failed to load concept map");
            ConceptMapState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeType;
    use crate::storage::MemoryStorage;

    const KEY: &str = "concept-map:test";

    fn store() -> ConceptStore<MemoryStorage> {
        ConceptStore::open(MemoryStorage::new(), KEY)
    }

    fn sel(text: &str, from: usize, to: usize) -> TextSelection {
        TextSelection::new(text, from, to)
    }

    struct FailingStorage;

    impl StorageAdapter for FailingStorage {
        fn load(&self, _: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io {
                path: "nowhere".into(),
                source: std::io::Error::other("denied"),
            })
        }

        fn save(&mut self, _: &str, _: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                path: "nowhere".into(),
                source: std::io::Error::other("denied"),
            })
        }
    }

    #[test]
    fn test_add_node_from_selection() {
        let mut store = store();
        let id = store.add_node(&sel("Ishmael", 0, 7), None);

        let state = store.state();
        assert_eq!(state.nodes.len(), 1);
        let node = &state.nodes[0];
        assert_eq!(node.id, id);
        assert_eq!(node.title, "Ishmael");
        assert_eq!(node.node_type, NodeType::Character);
        assert_eq!(node.anchor(), (0, 7));
        assert_eq!(node.position, Position::new(120.0, 100.0));
        assert_eq!(state.selected_node_id, Some(id));
        assert!(state.is_modal_open);
    }

    #[test]
    fn test_add_node_uses_explicit_id_and_cascades() {
        let mut store = store();
        store.add_node(&sel("one", 0, 3), None);
        let id = store.add_node(&sel("two", 4, 7), Some("mark-1".into()));
        assert_eq!(id, NodeId::from("mark-1"));
        assert_eq!(
            store.state().nodes[1].position,
            Position::new(160.0, 124.0)
        );
    }

    #[test]
    fn test_delete_node_cascades_links_and_selection() {
        let mut store = store();
        let a = store.add_node(&sel("Ahab", 0, 4), None);
        let b = store.add_node(&sel("Whale", 5, 10), None);
        let c = store.add_node(&sel("Sea", 11, 14), None);
        let ab = store.add_link(&a, &b, LinkType::Causes, None).unwrap();
        store.add_link(&c, &a, LinkType::Supports, None).unwrap();
        let kept = store.add_link(&b, &c, LinkType::Extends, None).unwrap();
        store.set_selected_node(Some(a.clone()));
        store.set_focused_link(Some(ab));

        let removed = store.delete_node(&a).unwrap();

        assert_eq!(removed.title, "Ahab");
        let state = store.state();
        assert_eq!(state.nodes.len(), 2);
        assert_eq!(state.links.len(), 1);
        assert_eq!(state.links[0].id, kept);
        assert!(state.selected_node_id.is_none());
        assert!(state.focused_link_id.is_none());
        assert!(store.delete_node(&a).is_none());
    }

    #[test]
    fn test_delete_node_keeps_other_selection() {
        let mut store = store();
        let a = store.add_node(&sel("Ahab", 0, 4), None);
        let b = store.add_node(&sel("Whale", 5, 10), None);
        store.set_selected_node(Some(b.clone()));
        store.delete_node(&a);
        assert_eq!(store.state().selected_node_id, Some(b));
    }

    #[test]
    fn test_rename_ignores_blank_titles() {
        let mut store = store();
        let a = store.add_node(&sel("Ahab", 0, 4), None);

        assert!(!store.rename_node(&a, "   "));
        assert_eq!(store.state().nodes[0].title, "Ahab");

        assert!(store.rename_node(&a, "  Captain Ahab "));
        assert_eq!(store.state().nodes[0].title, "Captain Ahab");

        assert!(!store.rename_node(&NodeId::from("nope"), "x"));
    }

    #[test]
    fn test_links_reject_self_and_missing_endpoints() {
        let mut store = store();
        let a = store.add_node(&sel("Ahab", 0, 4), None);
        let revision = store.revision();

        assert!(store.add_link(&a, &a, LinkType::Causes, None).is_none());
        assert!(
            store
                .add_link(&a, &NodeId::from("ghost"), LinkType::Causes, None)
                .is_none()
        );
        assert!(store.state().links.is_empty());
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_add_and_delete_link_focus() {
        let mut store = store();
        let a = store.add_node(&sel("Ahab", 0, 4), None);
        let b = store.add_node(&sel("Whale", 5, 10), None);

        let id = store
            .add_link(&a, &b, LinkType::Conflicts, Some("  hunts  "))
            .unwrap();
        assert_eq!(store.state().focused_link_id, Some(id.clone()));
        assert_eq!(store.state().links[0].label.as_deref(), Some("hunts"));

        let blank = store
            .add_link(&b, &a, LinkType::RelatesTo, Some("   "))
            .unwrap();
        assert_eq!(store.state().links[1].label, None);
        assert_eq!(store.state().focused_link_id, Some(blank));

        assert!(store.delete_link(&id));
        assert_eq!(store.state().links.len(), 1);
        assert!(store.state().focused_link_id.is_some());
        assert!(!store.delete_link(&id));
    }

    #[test]
    fn test_every_mutation_persists() {
        let storage = MemoryStorage::new();
        let mut store = ConceptStore::open(storage.clone(), KEY);
        let a = store.add_node(&sel("Ahab", 0, 4), None);
        store.update_node_position(&a, Position::new(5.0, 6.0));

        let reopened = ConceptStore::open(storage.clone(), KEY);
        assert_eq!(reopened.state(), store.state());
        assert_eq!(
            reopened.state().nodes[0].position,
            Position::new(5.0, 6.0)
        );

        store.clear_all();
        let reopened = ConceptStore::open(storage, KEY);
        assert_eq!(reopened.state(), &ConceptMapState::default());
    }

    #[test]
    fn test_import_replaces_state() {
        let mut store = store();
        store.add_node(&sel("old", 0, 3), None);
        store.import_from_ai(
            "The town sleeps.",
            &[
                AiNode::new("town", NodeType::Place),
                AiNode::new("sleep", NodeType::Idea),
            ],
            &[AiLink::new(0, 1, LinkType::Supports)],
        );
        let state = store.state();
        assert_eq!(state.nodes.len(), 2);
        assert_eq!(state.nodes[0].anchor(), (4, 8));
        assert_eq!(state.links.len(), 1);
        assert!(state.is_modal_open);
        assert!(state.selected_node_id.is_none());
    }

    #[test]
    fn test_import_with_no_nodes_empties_map() {
        let mut store = store();
        store.add_node(&sel("old", 0, 3), None);
        store.import_from_ai("text", &[], &[]);
        assert!(store.state().nodes.is_empty());
        assert!(store.state().is_modal_open);
    }

    #[test]
    fn test_selection_setters() {
        let mut store = store();
        let a = store.add_node(&sel("Ahab", 0, 4), None);
        store.set_selected_node(None);
        assert!(store.state().selected_node_id.is_none());
        store.set_selected_node(Some(NodeId::from("ghost")));
        assert!(store.state().selected_node_id.is_none());
        store.set_selected_node(Some(a.clone()));
        assert_eq!(store.state().selected_node_id, Some(a));

        store.set_modal_open(false);
        assert!(!store.state().is_modal_open);
    }

    #[test]
    fn test_switch_key_loads_other_document() {
        let storage = MemoryStorage::new();
        let mut store = ConceptStore::open(storage.clone(), "doc-a");
        store.add_node(&sel("Ahab", 0, 4), None);

        store.switch_key("doc-b");
        assert!(store.state().nodes.is_empty());
        store.switch_key("doc-a");
        assert_eq!(store.state().nodes.len(), 1);
    }

    #[test]
    fn test_storage_failures_are_swallowed() {
        let mut store = ConceptStore::open(FailingStorage, KEY);
        assert!(store.state().nodes.is_empty());
        let id = store.add_node(&sel("Ahab", 0, 4), None);
        assert_eq!(store.state().nodes[0].id, id);
        assert_eq!(store.revision(), 1);
    }
}
