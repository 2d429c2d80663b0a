use eframe::egui::Color32;

/// Range metadata so zoom bounds live in one place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl SliderRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    pub fn step_up(&self, value: f32) -> f32 {
        self.clamp(value + self.step)
    }

    pub fn step_down(&self, value: f32) -> f32 {
        self.clamp(value - self.step)
    }
}

pub const ZOOM_RANGE: SliderRange = SliderRange::new(0.4, 3.0, 0.2);
pub const DEFAULT_ZOOM: f32 = 1.0;

// Canvas geometry, in logical units scaled by zoom
pub const NODE_RADIUS: f32 = 18.0;
pub const HIT_RADIUS: f32 = 22.0;
pub const GRID_CELL: f32 = 40.0;
pub const LABEL_GAP: f32 = 6.0;
pub const LABEL_FONT: f32 = 12.0;
pub const LINK_FONT: f32 = 10.0;
pub const LINK_WIDTH: f32 = 1.0;
pub const RING_WIDTH: f32 = 1.5;
pub const RING_WIDTH_SELECTED: f32 = 2.5;

// Labels
pub const LABEL_MAX_CHARS: usize = 24;
pub const LABEL_KEEP_CHARS: usize = 22;

/// Maximum gap between two presses on one node for a double click.
pub const DOUBLE_CLICK_MS: u64 = 300;

// Selection pill
pub const POPUP_WIDTH: f32 = 160.0;
pub const POPUP_MARGIN: f32 = 12.0;
pub const AI_BUBBLE_HEIGHT: f32 = 44.0;
pub const FALLBACK_SELECTION_WIDTH: f32 = 100.0;

// Palette
pub const CANVAS_BACKGROUND: Color32 = Color32::from_rgb(0xf5, 0xf0, 0xe8);
pub const GRID_LINE: Color32 = Color32::from_rgb(0xe2, 0xd6, 0xc4);
pub const LINK_COLOR: Color32 = Color32::from_rgb(0xb1, 0x9b, 0x7a);
pub const INK: Color32 = Color32::from_rgb(0x4a, 0x3f, 0x32);
pub const NODE_FILL: Color32 = Color32::from_rgb(0xe0, 0xd4, 0xc2);
pub const LABEL_BACKGROUND: Color32 =
    Color32::from_rgba_premultiplied(0xf5, 0xf0, 0xe8, 0xe6);
pub const HIGHLIGHT: Color32 =
    Color32::from_rgba_premultiplied(0x8a, 0x6d, 0x2c, 0x40);
