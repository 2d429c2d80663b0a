use concept_graph::{ConceptStore, NodeId, StorageAdapter};
use eframe::egui::{self, Pos2, Rect};
use tracing::debug;

use crate::settings::{
    AI_BUBBLE_HEIGHT, FALLBACK_SELECTION_WIDTH, POPUP_MARGIN, POPUP_WIDTH,
};
use crate::text_surface::TextSurface;

/// Top-left of the "Add to Map" pill for a selection occupying
/// `selection` on screen, kept inside a viewport `viewport_width` wide.
/// The pill sits below the AI bubble that also anchors to selections.
pub fn popup_position(selection: Rect, viewport_width: f32) -> Pos2 {
    let width = if selection.width() > 0.0 {
        selection.width()
    } else {
        FALLBACK_SELECTION_WIDTH
    };
    let centered = selection.left() + width / 2.0 - POPUP_WIDTH / 2.0;
    let right_limit = viewport_width - POPUP_WIDTH - POPUP_MARGIN;
    let left = centered.min(right_limit).max(POPUP_MARGIN);
    let top = selection.bottom()
        + POPUP_MARGIN
        + AI_BUBBLE_HEIGHT
        + POPUP_MARGIN;
    Pos2::new(left, top)
}

/// Turn the surface's current selection into a node: the highlight mark
/// goes on first, then the node is created under the same id.
pub fn add_selection_to_map<S: StorageAdapter>(
    surface: &mut dyn TextSurface,
    store: &mut ConceptStore<S>,
) -> Option<NodeId> {
    let selection = surface.selection().filter(|s| !s.is_empty())?;
    let id = NodeId::generate();
    surface.apply_highlight((selection.from, selection.to), &id);
    let id = store.add_node(&selection, Some(id));
    debug!(id = %id, from = selection.from, to = selection.to, "selection added to map");
    Some(id)
}

/// Floating pill; returns true when clicked.
pub fn show_popup(ctx: &egui::Context, position: Pos2) -> bool {
    egui::Area::new(egui::Id::new("add_to_map_popup"))
        .order(egui::Order::Foreground)
        .fixed_pos(position)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style())
                .show(ui, |ui| {
                    ui.add_sized(
                        [POPUP_WIDTH - 16.0, 24.0],
                        egui::Button::new("＋ Add to Map"),
                    )
                    .clicked()
                })
                .inner
        })
        .inner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_surface::DocumentBuffer;
    use concept_graph::{MemoryStorage, NodeType};
    use eframe::egui::Vec2;

    #[test]
    fn test_popup_centers_below_selection() {
        let sel = Rect::from_min_size(Pos2::new(300.0, 100.0), Vec2::new(60.0, 18.0));
        let pos = popup_position(sel, 1000.0);
        assert_eq!(pos, Pos2::new(250.0, 118.0 + 68.0));
    }

    #[test]
    fn test_popup_clamps_to_viewport() {
        let left = Rect::from_min_size(Pos2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        assert_eq!(popup_position(left, 800.0).x, 12.0);

        let right = Rect::from_min_size(Pos2::new(790.0, 0.0), Vec2::new(10.0, 10.0));
        assert_eq!(popup_position(right, 800.0).x, 800.0 - 160.0 - 12.0);
    }

    #[test]
    fn test_zero_width_selection_uses_fallback_width() {
        let caret = Rect::from_min_size(Pos2::new(400.0, 0.0), Vec2::new(0.0, 10.0));
        assert_eq!(popup_position(caret, 1000.0).x, 400.0 + 50.0 - 80.0);
    }

    #[test]
    fn test_add_selection_marks_then_creates_node() {
        let mut doc = DocumentBuffer::new("The river bends north.");
        doc.update_selection(Some((4, 9)));
        let mut store = ConceptStore::open(MemoryStorage::new(), "k");

        let id = add_selection_to_map(&mut doc, &mut store).unwrap();

        assert_eq!(doc.highlight_for(&id), Some((4, 9)));
        let node = &store.state().nodes[0];
        assert_eq!(node.id, id);
        assert_eq!(node.title, "river");
        assert_eq!(node.node_type, NodeType::Character);
        assert_eq!(node.anchor(), (4, 9));
    }

    #[test]
    fn test_collapsed_selection_adds_nothing() {
        let mut doc = DocumentBuffer::new("   text");
        let mut store = ConceptStore::open(MemoryStorage::new(), "k");
        assert!(add_selection_to_map(&mut doc, &mut store).is_none());

        doc.update_selection(Some((2, 2)));
        assert!(add_selection_to_map(&mut doc, &mut store).is_none());
        assert!(store.state().nodes.is_empty());
    }

    #[test]
    fn test_blank_selection_gets_fallback_title() {
        let mut doc = DocumentBuffer::new("   text");
        doc.update_selection(Some((0, 3)));
        let mut store = ConceptStore::open(MemoryStorage::new(), "k");
        add_selection_to_map(&mut doc, &mut store).unwrap();
        assert_eq!(store.state().nodes[0].title, "Concept");
        assert_eq!(store.state().nodes[0].node_type, NodeType::Default);
    }
}
