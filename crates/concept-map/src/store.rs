use concept_graph::{
    ConceptStore, LinkType, NodeId, StorageAdapter, WritingMode, storage_key,
};

use crate::ai_client::AiClient;
use crate::map_view::MapView;
use crate::text_surface::DocumentBuffer;

pub type Concepts = ConceptStore<Box<dyn StorageAdapter>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTab {
    Outline,
    Map,
}

/// A toast-style message shown until dismissed.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Inline title editor in the outline.
#[derive(Debug, Clone, PartialEq)]
pub struct RenameDraft {
    pub node_id: NodeId,
    pub text: String,
}

/// Contents of the link dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkDraft {
    pub source: NodeId,
    pub target: Option<NodeId>,
    pub link_type: LinkType,
    pub label: String,
}

/// The document the editor is showing.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRef {
    pub id: Option<String>,
    pub mode: WritingMode,
}

impl DocumentRef {
    pub fn storage_key(&self) -> String {
        storage_key(self.id.as_deref(), self.mode)
    }
}

/// Everything the app reads and mutates each frame.
pub struct Store {
    pub concepts: Concepts,
    pub document: DocumentBuffer,
    pub document_ref: DocumentRef,
    pub ai: AiClient,

    // UI state
    pub detail_tab: DetailTab,
    pub map_view: MapView,
    pub rename: Option<RenameDraft>,
    pub link_draft: Option<LinkDraft>,
    pub notification: Option<Notification>,
}

impl Store {
    pub fn new(
        storage: Box<dyn StorageAdapter>,
        document_ref: DocumentRef,
        document: DocumentBuffer,
        ai: AiClient,
    ) -> Self {
        let concepts = ConceptStore::open(storage, document_ref.storage_key());
        Self {
            concepts,
            document,
            document_ref,
            ai,
            detail_tab: DetailTab::Outline,
            map_view: MapView::default(),
            rename: None,
            link_draft: None,
            notification: None,
        }
    }

    pub fn is_detail_open(&self) -> bool {
        self.concepts.state().is_modal_open
    }
}
