use concept_graph::NodeId;
use tracing::{debug, warn};

use crate::actions::{self, Action};
use crate::store::Store;
use crate::text_surface::TextSurface;

/// Deferred effects that must run outside the main reducer (editor
/// surface updates, network)
#[derive(Debug, Clone)]
pub enum Effect {
    /// Select the node's text span and scroll it into view
    RevealInEditor { id: NodeId },
    /// Re-mark every anchored node in the editor
    RestoreHighlights,
    /// Start an AI request for the given document text, on behalf of the
    /// map stored under `key`
    RequestAiImport { text: String, key: String },
}

/// Execute a single effect. Follow-up actions are returned for the next
/// dispatch round.
pub fn run(store: &mut Store, effect: Effect) -> Vec<Action> {
    match effect {
        Effect::RevealInEditor { id } => {
            let range = store.document.highlight_for(&id).or_else(|| {
                store
                    .concepts
                    .state()
                    .node(&id)
                    .filter(|n| n.has_anchor())
                    .map(|n| n.anchor())
            });
            match range {
                Some(range) => {
                    store.document.set_selection(range);
                    store.document.scroll_into_view();
                }
                None => debug!(id = %id, "nothing to reveal"),
            }
            vec![]
        }
        Effect::RestoreHighlights => {
            restore_highlights(store);
            vec![]
        }
        Effect::RequestAiImport { text, key } => match store.ai.request(text, key) {
            Ok(_) => vec![],
            Err(e) => {
                warn!(error = %e, "AI import not started");
                vec![actions::import_failed(e.to_string())]
            }
        },
    }
}

/// Mark the stored anchor of every node that has one and fits the
/// current text.
pub fn restore_highlights(store: &mut Store) {
    store.document.clear_highlights();
    let len = store.document.char_len();
    for node in &store.concepts.state().nodes {
        let (from, to) = node.anchor();
        if node.has_anchor() && to <= len {
            store.document.apply_highlight((from, to), &node.id);
        }
    }
}
