use concept_graph::{NodeId, TextSelection};

/// Half-open character range into a document.
pub type CharRange = (usize, usize);

/// What the concept map needs from the host editor.
pub trait TextSurface {
    /// Mark `range` as belonging to `node_id`.
    fn apply_highlight(&mut self, range: CharRange, node_id: &NodeId);
    /// Clear `range` out of every mark; marks outside it keep their
    /// remaining pieces.
    fn remove_highlight(&mut self, range: CharRange);
    /// Drop the mark belonging to `node_id`, leaving other marks alone.
    fn remove_highlight_for(&mut self, node_id: &NodeId);
    fn set_selection(&mut self, range: CharRange);
    fn scroll_into_view(&mut self);
    fn text_between(&self, range: CharRange) -> String;
    fn full_text(&self) -> &str;
    /// Current non-collapsed selection, if any.
    fn selection(&self) -> Option<TextSelection>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub node_id: NodeId,
    pub from: usize,
    pub to: usize,
}

/// Plain-text document with highlight marks, backing the editor pane.
///
/// Marks follow edits made through [`DocumentBuffer::replace_text`]:
/// text inserted before a mark shifts it, text removed inside a mark
/// shrinks it.
#[derive(Debug, Default)]
pub struct DocumentBuffer {
    text: String,
    highlights: Vec<Highlight>,
    selection: Option<CharRange>,
    /// Selection the editor widget should adopt on its next frame.
    pending_selection: Option<CharRange>,
    scroll_requested: bool,
}

impl DocumentBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    pub fn highlight_for(&self, node_id: &NodeId) -> Option<CharRange> {
        self.highlights
            .iter()
            .find(|h| &h.node_id == node_id)
            .map(|h| (h.from, h.to))
    }

    pub fn clear_highlights(&mut self) {
        self.highlights.clear();
    }

    /// Selection reported by the editor widget.
    pub fn update_selection(&mut self, range: Option<CharRange>) {
        self.selection = range
            .map(|(a, b)| (a.min(b), a.max(b)))
            .filter(|(a, b)| a < b);
    }

    pub fn take_pending_selection(&mut self) -> Option<CharRange> {
        self.pending_selection.take()
    }

    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    /// Swap in new document text, shifting marks across the changed
    /// region.
    pub fn replace_text(&mut self, new_text: String) {
        if new_text == self.text {
            return;
        }
        let old: Vec<char> = self.text.chars().collect();
        let new: Vec<char> = new_text.chars().collect();
        let prefix = old.iter().zip(&new).take_while(|(a, b)| a == b).count();
        let max_suffix = old.len().min(new.len()) - prefix;
        let suffix = old
            .iter()
            .rev()
            .zip(new.iter().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();
        let old_end = old.len() - suffix;
        let new_end = new.len() - suffix;

        for h in &mut self.highlights {
            shift_mark(h, prefix, old_end, new_end);
        }
        self.highlights.retain(|h| h.from < h.to);
        self.text = new_text;
        self.selection = None;
    }
}

/// Edit replaced `[prefix, old_end)` with `[prefix, new_end)`.
fn shift_mark(h: &mut Highlight, prefix: usize, old_end: usize, new_end: usize) {
    let shift = |x: usize| x + new_end - old_end;
    if h.to <= prefix {
        return;
    }
    if h.from >= old_end {
        h.from = shift(h.from);
        h.to = shift(h.to);
        return;
    }
    h.from = h.from.min(prefix);
    h.to = if h.to >= old_end {
        shift(h.to)
    } else {
        h.to.min(new_end)
    };
    h.to = h.to.max(h.from);
}

impl TextSurface for DocumentBuffer {
    fn apply_highlight(&mut self, range: CharRange, node_id: &NodeId) {
        let len = self.char_len();
        let (from, to) = (range.0.min(len), range.1.min(len));
        if from >= to {
            return;
        }
        self.highlights.retain(|h| &h.node_id != node_id);
        self.highlights.push(Highlight {
            node_id: node_id.clone(),
            from,
            to,
        });
    }

    fn remove_highlight(&mut self, (from, to): CharRange) {
        if from >= to {
            return;
        }
        let mut kept = Vec::with_capacity(self.highlights.len());
        for h in self.highlights.drain(..) {
            if h.to <= from || h.from >= to {
                kept.push(h);
                continue;
            }
            for (a, b) in [(h.from, from), (to, h.to)] {
                if a < b {
                    kept.push(Highlight {
                        node_id: h.node_id.clone(),
                        from: a,
                        to: b,
                    });
                }
            }
        }
        self.highlights = kept;
    }

    fn remove_highlight_for(&mut self, node_id: &NodeId) {
        self.highlights.retain(|h| &h.node_id != node_id);
    }

    fn set_selection(&mut self, range: CharRange) {
        let len = self.char_len();
        let range = (range.0.min(len), range.1.min(len));
        self.selection = Some(range).filter(|(a, b)| a < b);
        self.pending_selection = Some(range);
    }

    fn scroll_into_view(&mut self) {
        self.scroll_requested = true;
    }

    fn text_between(&self, (from, to): CharRange) -> String {
        self.text
            .chars()
            .skip(from)
            .take(to.saturating_sub(from))
            .collect()
    }

    fn full_text(&self) -> &str {
        &self.text
    }

    fn selection(&self) -> Option<TextSelection> {
        let (from, to) = self.selection?;
        Some(TextSelection::new(self.text_between((from, to)), from, to))
    }
}
