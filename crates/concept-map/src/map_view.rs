use concept_graph::{ConceptMapState, ConceptNode, NodeId, Position};
use eframe::egui::{self, CursorIcon, Pos2, Rect, Sense, Stroke, Vec2};

use crate::actions::Action;
use crate::node_shapes::{draw_link, draw_node};
use crate::settings::{
    CANVAS_BACKGROUND, DEFAULT_ZOOM, DOUBLE_CLICK_MS, GRID_CELL, GRID_LINE,
    HIT_RADIUS, INK, ZOOM_RANGE,
};

// -------------------------------------------------------------------
// Geometry
// -------------------------------------------------------------------

/// Bounding box of all node positions in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Position,
    pub max: Position,
}

impl Bounds {
    pub fn of(nodes: &[ConceptNode]) -> Option<Self> {
        let first = nodes.first()?.position;
        let init = Bounds {
            min: first,
            max: first,
        };
        Some(nodes.iter().fold(init, |b, n| Bounds {
            min: Position::new(b.min.x.min(n.position.x), b.min.y.min(n.position.y)),
            max: Position::new(b.max.x.max(n.position.x), b.max.y.max(n.position.y)),
        }))
    }

    /// Center of the box; a single point still has a 1x1 extent.
    pub fn center(&self) -> Position {
        let width = (self.max.x - self.min.x).max(1.0);
        let height = (self.max.y - self.min.y).max(1.0);
        Position::new(self.min.x + width / 2.0, self.min.y + height / 2.0)
    }
}

/// Logical to screen transform: `screen = origin + logical * zoom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub origin: Pos2,
    pub zoom: f32,
}

impl Viewport {
    /// Center `bounds` on `canvas`; with no nodes the logical origin
    /// sits at the canvas center.
    pub fn centered(bounds: Option<Bounds>, canvas: Rect, zoom: f32) -> Self {
        let origin = match bounds {
            Some(b) => {
                let c = b.center();
                canvas.center() - Vec2::new(c.x, c.y) * zoom
            }
            None => canvas.center(),
        };
        Self { origin, zoom }
    }

    pub fn to_screen(&self, p: Position) -> Pos2 {
        self.origin + Vec2::new(p.x, p.y) * self.zoom
    }

    pub fn to_logical(&self, p: Pos2) -> Position {
        let v = (p - self.origin) / self.zoom;
        Position::new(v.x, v.y)
    }

    /// First node, in insertion order, within the hit radius of `p`.
    pub fn hit_test<'a>(
        &self,
        nodes: &'a [ConceptNode],
        p: Pos2,
    ) -> Option<&'a ConceptNode> {
        let radius = HIT_RADIUS * self.zoom;
        nodes
            .iter()
            .find(|n| self.to_screen(n.position).distance(p) <= radius)
    }
}

// -------------------------------------------------------------------
// Gestures
// -------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Press {
    Single,
    Double,
}

/// Detects a second press on the same node within the double-click
/// window. Times are seconds.
#[derive(Debug, Default)]
pub struct ClickTracker {
    last: Option<(NodeId, f64)>,
}

impl ClickTracker {
    pub fn press(&mut self, node: &NodeId, now: f64) -> Press {
        let window = DOUBLE_CLICK_MS as f64 / 1000.0;
        let is_double = matches!(
            &self.last,
            Some((prev, at)) if prev == node && now - at < window
        );
        if is_double {
            self.last = None;
            Press::Double
        } else {
            self.last = Some((node.clone(), now));
            Press::Single
        }
    }
}

/// View-local state of the canvas.
#[derive(Debug)]
pub struct MapView {
    pub zoom: f32,
    pub dragging: Option<NodeId>,
    /// Viewport origin held for the length of a drag.
    pub pinned_origin: Option<Pos2>,
    pub clicks: ClickTracker,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            dragging: None,
            pinned_origin: None,
            clicks: ClickTracker::default(),
        }
    }
}

impl MapView {
    /// Outcome of a primary press on the canvas at `pointer`.
    pub fn press(
        &mut self,
        viewport: &Viewport,
        nodes: &[ConceptNode],
        pointer: Pos2,
        now: f64,
    ) -> Option<Action> {
        let node = viewport.hit_test(nodes, pointer)?;
        match self.clicks.press(&node.id, now) {
            Press::Double => {
                self.end_drag();
                Some(Action::NavigateToNode {
                    id: node.id.clone(),
                })
            }
            Press::Single => {
                self.dragging = Some(node.id.clone());
                self.pinned_origin = Some(viewport.origin);
                Some(Action::SelectNode {
                    id: Some(node.id.clone()),
                })
            }
        }
    }

    /// Position update for the node being dragged, if any.
    pub fn drag_to(&self, viewport: &Viewport, pointer: Pos2) -> Option<Action> {
        let id = self.dragging.clone()?;
        Some(Action::MoveNode {
            id,
            position: viewport.to_logical(pointer),
        })
    }

    pub fn end_drag(&mut self) {
        self.dragging = None;
        self.pinned_origin = None;
    }

    /// Viewport for this frame. Re-centering is suspended mid-drag so the
    /// node under the pointer does not chase a moving origin.
    pub fn viewport(&self, bounds: Option<Bounds>, canvas: Rect) -> Viewport {
        match self.pinned_origin {
            Some(origin) if self.dragging.is_some() => Viewport {
                origin,
                zoom: self.zoom,
            },
            _ => Viewport::centered(bounds, canvas, self.zoom),
        }
    }
}

// -------------------------------------------------------------------
// Rendering
// -------------------------------------------------------------------

/// Zoom buttons; the middle one shows the level and resets it.
pub fn zoom_controls(ui: &mut egui::Ui, zoom: f32) -> Option<Action> {
    let mut action = None;
    ui.horizontal(|ui| {
        if ui
            .add_enabled(zoom > ZOOM_RANGE.min, egui::Button::new("−"))
            .on_hover_text("Zoom out")
            .clicked()
        {
            action = Some(Action::SetZoom {
                zoom: ZOOM_RANGE.step_down(zoom),
            });
        }
        let percent = format!("{:.0}%", zoom * 100.0);
        if ui.button(percent).on_hover_text("Reset zoom").clicked() {
            action = Some(Action::SetZoom { zoom: DEFAULT_ZOOM });
        }
        if ui
            .add_enabled(zoom < ZOOM_RANGE.max, egui::Button::new("+"))
            .on_hover_text("Zoom in")
            .clicked()
        {
            action = Some(Action::SetZoom {
                zoom: ZOOM_RANGE.step_up(zoom),
            });
        }
    });
    action
}

/// Draw the canvas and translate pointer input into actions.
pub fn show(
    ui: &mut egui::Ui,
    view: &mut MapView,
    state: &ConceptMapState,
    bounds: Option<Bounds>,
) -> Vec<Action> {
    let mut actions = Vec::new();
    actions.extend(zoom_controls(ui, view.zoom));

    let (response, painter) =
        ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
    let rect = response.rect;
    let viewport = view.viewport(bounds, rect);

    painter.rect_filled(rect, 0.0, CANVAS_BACKGROUND);
    draw_grid(&painter, rect, view.zoom);

    if state.nodes.is_empty() {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "No concepts yet",
            egui::FontId::proportional(14.0),
            INK,
        );
    }

    for link in &state.links {
        let (Some(source), Some(target)) = (
            state.node(&link.source_node_id),
            state.node(&link.target_node_id),
        ) else {
            continue;
        };
        draw_link(
            &painter,
            viewport.to_screen(source.position),
            viewport.to_screen(target.position),
            link.caption(),
            view.zoom,
        );
    }

    for node in &state.nodes {
        let selected = state.selected_node_id.as_ref() == Some(&node.id);
        draw_node(
            &painter,
            viewport.to_screen(node.position),
            node.node_type,
            &node.title,
            selected,
            view.zoom,
        );
    }

    let (pressed, down, now, latest) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_down(),
            i.time,
            i.pointer.latest_pos(),
        )
    });

    if pressed && let Some(pointer) = response.hover_pos() {
        actions.extend(view.press(&viewport, &state.nodes, pointer, now));
    }

    let inside = latest.filter(|p| rect.contains(*p));
    match inside {
        Some(pointer) if down && view.dragging.is_some() => {
            actions.extend(view.drag_to(&viewport, pointer));
        }
        _ => view.end_drag(),
    }

    if view.dragging.is_some() {
        ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
    } else if let Some(pointer) = response.hover_pos()
        && viewport.hit_test(&state.nodes, pointer).is_some()
    {
        ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
    }

    actions
}

fn draw_grid(painter: &egui::Painter, rect: Rect, zoom: f32) {
    let step = GRID_CELL * zoom;
    let stroke = Stroke::new(1.0, GRID_LINE);
    let mut x = rect.left();
    while x <= rect.right() {
        painter.vline(x, rect.y_range(), stroke);
        x += step;
    }
    let mut y = rect.top();
    while y <= rect.bottom() {
        painter.hline(rect.x_range(), y, stroke);
        y += step;
    }
}
