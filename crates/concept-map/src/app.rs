use std::fs;
use std::time::Duration;

use concept_graph::{FileStorage, WritingMode};
use eframe::egui::{self, Align, Color32, Pos2, Rect, text::CCursor};
use tracing::{info, warn};

use crate::actions::Action;
use crate::ai_client::AiClient;
use crate::config::Config;
use crate::effects::restore_highlights;
use crate::link_dialog;
use crate::map_view;
use crate::outline_view::{self, counts_header};
use crate::selection::{popup_position, show_popup};
use crate::settings::HIGHLIGHT;
use crate::shortcuts::{self, Shortcut};
use crate::state::State;
use crate::store::{DetailTab, DocumentRef, Notification, Store};
use crate::text_surface::{CharRange, DocumentBuffer, TextSurface};

const EDITOR_ID: &str = "document_editor";

pub struct ConceptMapApp {
    state: State,
    /// Document id typed into the Document menu.
    document_input: String,
}

impl ConceptMapApp {
    pub fn new(config: Config) -> Self {
        let storage_dir = config.storage_dir();
        info!(dir = %storage_dir.display(), "using concept map storage");

        let (text, load_error) = match &config.text_file {
            Some(path) => match fs::read_to_string(path) {
                Ok(text) => (text, None),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not read text file");
                    (String::new(), Some(format!("Could not read {}: {e}", path.display())))
                }
            },
            None => (String::new(), None),
        };

        let document_ref = DocumentRef {
            id: config.document.clone(),
            mode: config.mode,
        };
        let mut store = Store::new(
            Box::new(FileStorage::new(storage_dir)),
            document_ref,
            DocumentBuffer::new(text),
            AiClient::new(config.client()),
        );
        restore_highlights(&mut store);
        store.notification =
            load_error.map(|message| Notification::new("Document", message));

        Self {
            state: State::new(store),
            document_input: config.document.unwrap_or_default(),
        }
    }

    // ---------------------------------------------------------------
    // Panels
    // ---------------------------------------------------------------

    fn menu_bar(&mut self, ctx: &egui::Context) {
        let store = &self.state.store;
        let node_count = store.concepts.state().nodes.len();
        let busy = store.ai.is_busy();
        let mode = store.document_ref.mode;
        let mut actions = Vec::new();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("Document", |ui| {
                    ui.label("Writing mode");
                    for m in WritingMode::ALL {
                        if ui.radio(mode == m, m.as_str()).clicked() {
                            ui.close();
                            actions.push(Action::SwitchDocument {
                                document: DocumentRef { id: None, mode: m },
                            });
                        }
                    }
                    ui.separator();
                    ui.label("Document id");
                    ui.text_edit_singleline(&mut self.document_input);
                    if ui.button("Open").clicked() {
                        ui.close();
                        let id = self.document_input.trim();
                        actions.push(Action::SwitchDocument {
                            document: DocumentRef {
                                id: (!id.is_empty()).then(|| id.to_owned()),
                                mode,
                            },
                        });
                    }
                });
                ui.menu_button("Map", |ui| {
                    if ui.button("Clear map").clicked() {
                        ui.close();
                        actions.push(Action::ClearAll);
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                    let label = if node_count > 0 {
                        format!("Concept Map ({node_count})")
                    } else {
                        "Concept Map".to_owned()
                    };
                    if ui.button(label).on_hover_text("Ctrl/Cmd+M").clicked() {
                        actions.push(Action::ToggleDetail);
                    }
                    if busy {
                        ui.spinner();
                    }
                    if ui
                        .add_enabled(!busy, egui::Button::new("✨ AI Concept Map"))
                        .on_hover_text("Generate a map from the whole document")
                        .clicked()
                    {
                        actions.push(Action::RequestAiImport);
                    }
                });
            });
        });

        self.state.dispatch_all(actions);
    }

    fn editor_panel(&mut self, ctx: &egui::Context) {
        let mut actions = Vec::new();
        let store = &mut self.state.store;
        let key = store.concepts.key().to_owned();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Document");
                ui.weak(key);
            });
            ui.separator();

            let id = egui::Id::new(EDITOR_ID);
            let pending = store.document.take_pending_selection();
            let scroll = store.document.take_scroll_request();
            if let Some((from, to)) = pending
                && let Some(mut state) = egui::text_edit::TextEditState::load(ui.ctx(), id)
            {
                state.cursor.set_char_range(Some(egui::text::CCursorRange::two(
                    CCursor::new(from),
                    CCursor::new(to),
                )));
                state.store(ui.ctx(), id);
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                let mut text = store.document.full_text().to_owned();
                let output = egui::TextEdit::multiline(&mut text)
                    .id(id)
                    .hint_text("Write or paste your text here…")
                    .desired_width(f32::INFINITY)
                    .desired_rows(24)
                    .show(ui);

                if output.response.changed() {
                    actions.push(Action::EditDocument { text });
                }

                let galley_rect = |range: CharRange| {
                    span_rects(&output.galley, output.galley_pos, range)
                };

                let painter = ui.painter().with_clip_rect(output.text_clip_rect);
                for h in store.document.highlights() {
                    for rect in galley_rect((h.from, h.to)) {
                        painter.rect_filled(rect, 2.0, HIGHLIGHT);
                    }
                }

                if let Some(range) = pending {
                    output.response.request_focus();
                    if scroll && let Some(first) = galley_rect(range).first() {
                        ui.scroll_to_rect(*first, Some(Align::Center));
                    }
                }

                let selection = output.state.cursor.char_range().map(|r| {
                    (r.primary.index, r.secondary.index)
                });
                if pending.is_none() && output.response.has_focus() {
                    actions.push(Action::SetTextSelection { range: selection });
                }

                if let Some(sel) = store.document.selection() {
                    let rects = galley_rect((sel.from, sel.to));
                    if let Some(bounds) = rects.into_iter().reduce(|a, b| a.union(b)) {
                        let width = ui.ctx().available_rect().right();
                        if show_popup(ui.ctx(), popup_position(bounds, width)) {
                            actions.push(Action::AddSelectionToMap);
                        }
                    }
                }
            });
        });

        self.state.dispatch_all(actions);
    }

    fn detail_window(&mut self, ctx: &egui::Context) {
        if !self.state.store.is_detail_open() {
            return;
        }
        let mut actions = Vec::new();
        let mut open = true;
        let bounds = *self.state.cache.bounds.get(&self.state.store);
        let chips = self.state.cache.link_chips.get(&self.state.store);
        let store = &mut self.state.store;
        let concepts = store.concepts.state();
        let rename = store.rename.as_ref();
        let map_view = &mut store.map_view;
        let mut tab = store.detail_tab;

        egui::Window::new("Concept Map")
            .open(&mut open)
            .default_size([760.0, 520.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut tab, DetailTab::Outline, "Outline");
                    ui.selectable_value(&mut tab, DetailTab::Map, "Map");
                    ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                        ui.weak(counts_header(concepts.nodes.len(), concepts.links.len()));
                    });
                });
                ui.separator();
                match tab {
                    DetailTab::Outline => {
                        actions.extend(outline_view::show(ui, concepts, rename, chips));
                    }
                    DetailTab::Map => {
                        actions.extend(map_view::show(ui, map_view, concepts, bounds));
                    }
                }
            });

        if tab != self.state.store.detail_tab {
            actions.push(Action::SetDetailTab { tab });
        }
        if !open {
            actions.push(Action::SetDetailOpen { open: false });
        }
        self.state.dispatch_all(actions);
    }

    fn dialogs(&mut self, ctx: &egui::Context) {
        let store = &self.state.store;
        let mut actions = Vec::new();

        if let Some(draft) = &store.link_draft {
            actions.extend(link_dialog::show(ctx, store.concepts.state(), draft));
        }

        if let Some(notification) = &store.notification {
            egui::Window::new(&notification.title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
                .show(ctx, |ui| {
                    ui.colored_label(Color32::from_rgb(0xa0, 0x3a, 0x2a), &notification.message);
                    if ui.button("OK").clicked() {
                        actions.push(Action::ClearNotification);
                    }
                });
        }

        self.state.dispatch_all(actions);
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let store = &self.state.store;
        let mut actions = Vec::new();
        for shortcut in shortcuts::collect(ctx) {
            let action = match shortcut {
                Shortcut::ToggleDetail => Action::ToggleDetail,
                // Escape belongs to the inline editors while they are open.
                Shortcut::CloseDetail if store.rename.is_some() => continue,
                Shortcut::CloseDetail if store.link_draft.is_some() => {
                    Action::CancelLinkDialog
                }
                Shortcut::CloseDetail if store.is_detail_open() => {
                    Action::SetDetailOpen { open: false }
                }
                Shortcut::CloseDetail => continue,
            };
            actions.push(action);
        }
        self.state.dispatch_all(actions);
    }
}

/// Screen rectangles covering `range` in a laid out galley, one per row.
fn span_rects(
    galley: &egui::Galley,
    origin: Pos2,
    (from, to): CharRange,
) -> Vec<Rect> {
    if from >= to {
        return Vec::new();
    }
    let start = galley.pos_from_cursor(CCursor::new(from)).translate(origin.to_vec2());
    let end = galley.pos_from_cursor(CCursor::new(to)).translate(origin.to_vec2());
    let left = origin.x + galley.rect.left();
    let right = origin.x + galley.rect.right();

    if (start.top() - end.top()).abs() < 1.0 {
        return vec![Rect::from_min_max(start.left_top(), end.left_bottom())];
    }

    let mut rects = vec![Rect::from_min_max(
        start.left_top(),
        Pos2::new(right, start.bottom()),
    )];
    if end.top() > start.bottom() + 1.0 {
        rects.push(Rect::from_min_max(
            Pos2::new(left, start.bottom()),
            Pos2::new(right, end.top()),
        ));
    }
    rects.push(Rect::from_min_max(
        Pos2::new(left, end.top()),
        end.left_bottom(),
    ));
    rects
}

impl eframe::App for ConceptMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_ai();
        self.handle_shortcuts(ctx);

        self.menu_bar(ctx);
        self.editor_panel(ctx);
        self.detail_window(ctx);
        self.dialogs(ctx);

        self.state.flush();

        if self.state.store.ai.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
