use eframe::egui::{self, Key, Modifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Ctrl+M, or Cmd+M on macOS.
    ToggleDetail,
    /// Escape.
    CloseDetail,
}

pub fn shortcut_for(key: Key, modifiers: Modifiers) -> Option<Shortcut> {
    match key {
        Key::M if modifiers.command || modifiers.ctrl || modifiers.mac_cmd => {
            Some(Shortcut::ToggleDetail)
        }
        Key::Escape => Some(Shortcut::CloseDetail),
        _ => None,
    }
}

/// Shortcuts pressed this frame, in order.
pub fn collect(ctx: &egui::Context) -> Vec<Shortcut> {
    ctx.input(|i| {
        i.events
            .iter()
            .filter_map(|event| match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    repeat: false,
                    modifiers,
                    ..
                } => shortcut_for(*key, *modifiers),
                _ => None,
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_needs_command_modifier() {
        assert_eq!(
            shortcut_for(Key::M, Modifiers::COMMAND),
            Some(Shortcut::ToggleDetail)
        );
        assert_eq!(
            shortcut_for(Key::M, Modifiers::CTRL),
            Some(Shortcut::ToggleDetail)
        );
        assert_eq!(shortcut_for(Key::M, Modifiers::NONE), None);
        assert_eq!(shortcut_for(Key::M, Modifiers::SHIFT), None);
    }

    #[test]
    fn test_escape_closes() {
        assert_eq!(
            shortcut_for(Key::Escape, Modifiers::NONE),
            Some(Shortcut::CloseDetail)
        );
        assert_eq!(shortcut_for(Key::A, Modifiers::COMMAND), None);
    }
}
