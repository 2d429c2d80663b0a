use concept_graph::NodeType;
use eframe::egui::{
    self, Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, Vec2,
};
use once_cell::sync::Lazy;

use crate::settings::{
    INK, LABEL_BACKGROUND, LABEL_FONT, LABEL_GAP, LABEL_KEEP_CHARS,
    LABEL_MAX_CHARS, LINK_COLOR, LINK_FONT, LINK_WIDTH, NODE_FILL,
    NODE_RADIUS, RING_WIDTH, RING_WIDTH_SELECTED,
};

const MUTED_TEXT: Color32 = Color32::from_rgb(0x6b, 0x5d, 0x4b);

/// Per-type fills: a pastel tone mixed halfway with the node base
/// colour.
static TYPE_FILLS: Lazy<[Color32; 5]> = Lazy::new(|| {
    NodeType::ALL.map(|t| match t {
        NodeType::Default => NODE_FILL,
        other => {
            let slot = NodeType::ALL
                .iter()
                .position(|x| *x == other)
                .unwrap_or_default();
            let c = colorous::PASTEL1[slot % colorous::PASTEL1.len()];
            mix(Color32::from_rgb(c.r, c.g, c.b), NODE_FILL)
        }
    })
});

fn mix(a: Color32, b: Color32) -> Color32 {
    let avg = |x: u8, y: u8| ((x as u16 + y as u16) / 2) as u8;
    Color32::from_rgb(avg(a.r(), b.r()), avg(a.g(), b.g()), avg(a.b(), b.b()))
}

pub fn type_fill(node_type: NodeType) -> Color32 {
    let slot = NodeType::ALL
        .iter()
        .position(|t| *t == node_type)
        .unwrap_or_default();
    TYPE_FILLS[slot]
}

pub fn node_fill(node_type: NodeType, selected: bool) -> Color32 {
    if selected { INK } else { type_fill(node_type) }
}

/// Canvas caption: long titles keep their first characters and an
/// ellipsis.
pub fn truncate_label(title: &str) -> String {
    if title.chars().count() > LABEL_MAX_CHARS {
        let kept: String = title.chars().take(LABEL_KEEP_CHARS).collect();
        format!("{kept}…")
    } else {
        title.to_owned()
    }
}

/// Straight link with its caption just off the midpoint.
pub fn draw_link(
    painter: &Painter,
    from: Pos2,
    to: Pos2,
    caption: &str,
    zoom: f32,
) {
    painter.line_segment([from, to], Stroke::new(LINK_WIDTH * zoom, LINK_COLOR));
    let mid = from + (to - from) * 0.5;
    painter.text(
        mid + Vec2::new(4.0, -4.0),
        Align2::LEFT_BOTTOM,
        caption,
        FontId::proportional(LINK_FONT * zoom),
        LINK_COLOR,
    );
}

/// Filled circle with a ring and the truncated title underneath.
pub fn draw_node(
    painter: &Painter,
    center: Pos2,
    node_type: NodeType,
    title: &str,
    selected: bool,
    zoom: f32,
) {
    let radius = NODE_RADIUS * zoom;
    let ring = if selected { RING_WIDTH_SELECTED } else { RING_WIDTH };
    painter.circle(
        center,
        radius,
        node_fill(node_type, selected),
        Stroke::new(ring * zoom, INK),
    );

    let text_color = if selected { INK } else { MUTED_TEXT };
    let galley = painter.layout_no_wrap(
        truncate_label(title),
        FontId::proportional(LABEL_FONT * zoom),
        text_color,
    );
    let top = center.y + radius + LABEL_GAP * zoom;
    let text_pos = Pos2::new(center.x - galley.size().x / 2.0, top);
    let padding = Vec2::new(4.0, 2.0) * zoom;
    let background =
        Rect::from_min_size(text_pos, galley.size()).expand2(padding);
    painter.rect_filled(background, 3.0 * zoom, LABEL_BACKGROUND);
    if selected {
        painter.rect_stroke(
            background,
            3.0 * zoom,
            Stroke::new(zoom, INK),
            egui::StrokeKind::Outside,
        );
    }
    painter.galley(text_pos, galley, text_color);
}

/// Small coloured pill naming the node type.
pub fn type_badge(ui: &mut egui::Ui, node_type: NodeType) -> egui::Response {
    let text = egui::RichText::new(node_type.as_str())
        .small()
        .color(INK)
        .background_color(type_fill(node_type));
    ui.label(text)
}
