use std::collections::HashMap;

use concept_graph::{ConceptMapState, ConceptNode, NodeId};
use eframe::egui::{self, Key, Sense};

use crate::actions::Action;
use crate::cache::LinkChip;
use crate::node_shapes::type_badge;
use crate::store::RenameDraft;

pub const EMPTY_MESSAGE: &str = "Select text in the editor and use \"Add to Map\" to create your first concept.";

const TIPS: [&str; 5] = [
    "Select text in the editor and click \"Add to Map\" to turn it into a concept.",
    "Ctrl+M (Cmd+M on macOS) opens or closes the concept map; Escape closes it.",
    "Double-click a concept to jump to its passage in the text.",
    "Drag concepts on the Map tab to arrange them.",
    "Click a link chip to remove that link.",
];

/// "3 concepts · 2 links"
pub fn counts_header(nodes: usize, links: usize) -> String {
    let plural = |n: usize, word: &str| {
        if n == 1 { format!("{n} {word}") } else { format!("{n} {word}s") }
    };
    format!("{} · {}", plural(nodes, "concept"), plural(links, "link"))
}

/// Card list plus a tips column.
pub fn show(
    ui: &mut egui::Ui,
    state: &ConceptMapState,
    rename: Option<&RenameDraft>,
    chips: &HashMap<NodeId, Vec<LinkChip>>,
) -> Vec<Action> {
    let mut actions = Vec::new();

    egui::SidePanel::right("outline_tips")
        .resizable(false)
        .default_width(200.0)
        .show_inside(ui, |ui| {
            ui.strong("Tips");
            ui.add_space(4.0);
            for tip in TIPS {
                ui.label(format!("• {tip}"));
            }
        });

    egui::CentralPanel::default().show_inside(ui, |ui| {
        if state.nodes.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.weak(EMPTY_MESSAGE);
            });
            return;
        }
        let can_link = state.nodes.len() >= 2;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for node in &state.nodes {
                let selected =
                    state.selected_node_id.as_ref() == Some(&node.id);
                let node_chips =
                    chips.get(&node.id).map(Vec::as_slice).unwrap_or(&[]);
                let rename = rename.filter(|r| r.node_id == node.id);
                node_card(
                    ui,
                    node,
                    selected,
                    rename,
                    node_chips,
                    can_link,
                    &mut actions,
                );
                ui.add_space(6.0);
            }
        });
    });

    actions
}

fn node_card(
    ui: &mut egui::Ui,
    node: &ConceptNode,
    selected: bool,
    rename: Option<&RenameDraft>,
    chips: &[LinkChip],
    can_link: bool,
    actions: &mut Vec<Action>,
) {
    let mut frame = egui::Frame::group(ui.style());
    if selected {
        frame = frame.stroke(ui.visuals().selection.stroke);
    }
    frame.show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            match rename {
                Some(draft) => rename_field(ui, draft, actions),
                None => {
                    let title = ui.add(
                        egui::Label::new(egui::RichText::new(&node.title).strong())
                            .sense(Sense::click()),
                    );
                    if title.double_clicked() {
                        actions.push(Action::NavigateToNode {
                            id: node.id.clone(),
                        });
                    } else if title.clicked() {
                        actions.push(Action::SelectNode {
                            id: Some(node.id.clone()),
                        });
                    }
                    title.on_hover_text("Click to select, double-click to jump to text");
                }
            }
            type_badge(ui, node.node_type);
        });

        if !chips.is_empty() {
            ui.horizontal_wrapped(|ui| {
                for chip in chips {
                    let arrow = if chip.outgoing { "→" } else { "←" };
                    let text = format!("{arrow} {} {}", chip.caption, chip.other_title);
                    if ui
                        .small_button(text)
                        .on_hover_text("Remove this link")
                        .clicked()
                    {
                        actions.push(Action::DeleteLink {
                            id: chip.link_id.clone(),
                        });
                    }
                }
            });
        }

        ui.horizontal(|ui| {
            if ui
                .add_enabled(can_link, egui::Button::new("Link"))
                .on_disabled_hover_text("Add another concept first")
                .clicked()
            {
                actions.push(Action::OpenLinkDialog {
                    source: node.id.clone(),
                });
            }
            if ui.button("Rename").clicked() {
                actions.push(Action::StartRename {
                    id: node.id.clone(),
                });
            }
            if ui.button("Delete").clicked() {
                actions.push(Action::DeleteNode {
                    id: node.id.clone(),
                });
            }
        });
    });
}

/// Inline title editor: Enter or focus loss commits, Escape cancels.
fn rename_field(
    ui: &mut egui::Ui,
    draft: &RenameDraft,
    actions: &mut Vec<Action>,
) {
    let id = egui::Id::new(("rename", draft.node_id.as_str()));
    let mut text = draft.text.clone();
    let response = ui.add(egui::TextEdit::singleline(&mut text).id(id));

    let first_frame = ui.data_mut(|d| {
        let seen = d.get_temp::<bool>(id).unwrap_or(false);
        d.insert_temp(id, true);
        !seen
    });
    if first_frame {
        response.request_focus();
    }

    if response.changed() {
        actions.push(Action::SetRenameText { text });
    }
    if response.lost_focus() {
        ui.data_mut(|d| d.remove::<bool>(id));
        if ui.input(|i| i.key_pressed(Key::Escape)) {
            actions.push(Action::CancelRename);
        } else {
            actions.push(Action::CommitRename);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_header() {
        assert_eq!(counts_header(0, 0), "0 concepts · 0 links");
        assert_eq!(counts_header(1, 1), "1 concept · 1 link");
        assert_eq!(counts_header(3, 2), "3 concepts · 2 links");
    }
}
