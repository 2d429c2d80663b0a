use concept_graph::{ConceptMapState, LinkType};
use eframe::egui;

use crate::actions::Action;
use crate::node_shapes::type_badge;
use crate::store::LinkDraft;

/// Nodes the draft may point at, in insertion order.
pub fn target_choices<'a>(
    state: &'a ConceptMapState,
    draft: &'a LinkDraft,
) -> impl Iterator<Item = &'a concept_graph::ConceptNode> + 'a {
    state.nodes.iter().filter(move |n| n.id != draft.source)
}

/// Link creation window. Returns the actions triggered this frame.
pub fn show(
    ctx: &egui::Context,
    state: &ConceptMapState,
    draft: &LinkDraft,
) -> Vec<Action> {
    let Some(source) = state.node(&draft.source) else {
        return vec![Action::CancelLinkDialog];
    };

    let mut edited = draft.clone();
    let mut actions = Vec::new();
    let mut open = true;

    egui::Window::new("Create Link")
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            egui::Grid::new("link_dialog_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label("From");
                    ui.horizontal(|ui| {
                        ui.strong(&source.title);
                        type_badge(ui, source.node_type);
                    });
                    ui.end_row();

                    ui.label("To");
                    let selected = edited
                        .target
                        .as_ref()
                        .and_then(|id| state.node(id))
                        .map(|n| n.title.as_str())
                        .unwrap_or("Choose a concept");
                    egui::ComboBox::from_id_salt("link_target")
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            for node in target_choices(state, draft) {
                                ui.selectable_value(
                                    &mut edited.target,
                                    Some(node.id.clone()),
                                    &node.title,
                                );
                            }
                        });
                    ui.end_row();
                });

            ui.add_space(6.0);
            ui.label("Relationship");
            for link_type in LinkType::ALL {
                ui.horizontal(|ui| {
                    ui.radio_value(
                        &mut edited.link_type,
                        link_type,
                        link_type.display_name(),
                    );
                    ui.weak(link_type.description());
                });
            }

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label("Custom label");
                ui.add(
                    egui::TextEdit::singleline(&mut edited.label)
                        .hint_text("optional"),
                );
            });

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    actions.push(Action::CancelLinkDialog);
                }
                let can_create = edited.target.is_some();
                if ui
                    .add_enabled(can_create, egui::Button::new("Create Link"))
                    .clicked()
                {
                    actions.push(Action::CreateLink);
                }
            });
        });

    if &edited != draft {
        // Draft edits land before a create in the same frame.
        actions.insert(0, Action::UpdateLinkDraft { draft: edited });
    }
    if !open {
        actions.push(Action::CancelLinkDialog);
    }
    actions
}
