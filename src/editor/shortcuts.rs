//! Keyboard shortcuts

use super::EditorAction;
use macroquad::prelude::*;

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKey {
    R,
    S,
    N,
    O,
    Plus,
    Minus,
    Delete,
    Escape,
}

impl ShortcutKey {
    const BINDINGS: [(KeyCode, ShortcutKey); 11] = [
        (KeyCode::R, ShortcutKey::R),
        (KeyCode::S, ShortcutKey::S),
        (KeyCode::N, ShortcutKey::N),
        (KeyCode::O, ShortcutKey::O),
        (KeyCode::Equal, ShortcutKey::Plus),
        (KeyCode::KpAdd, ShortcutKey::Plus),
        (KeyCode::Minus, ShortcutKey::Minus),
        (KeyCode::KpSubtract, ShortcutKey::Minus),
        (KeyCode::Delete, ShortcutKey::Delete),
        (KeyCode::Backspace, ShortcutKey::Delete),
        (KeyCode::Escape, ShortcutKey::Escape),
    ];
}

/// Map a key press to an action. Plain keys edit the selection,
/// Ctrl combinations are file commands.
pub fn shortcut_action(key: ShortcutKey, ctrl: bool, shift: bool) -> Option<EditorAction> {
    if ctrl {
        return match key {
            ShortcutKey::S => Some(EditorAction::Save),
            ShortcutKey::N => Some(EditorAction::NewDesign),
            ShortcutKey::O => Some(EditorAction::OpenBrowser),
            _ => None,
        };
    }
    match key {
        ShortcutKey::R => Some(EditorAction::RotateSelected { clockwise: !shift }),
        ShortcutKey::Plus => Some(EditorAction::ScaleSelected { grow: true }),
        ShortcutKey::Minus => Some(EditorAction::ScaleSelected { grow: false }),
        ShortcutKey::Delete => Some(EditorAction::RemoveSelected),
        ShortcutKey::Escape => Some(EditorAction::ClearSelection),
        _ => None,
    }
}

/// Read this frame's key presses
pub fn poll_shortcuts() -> Vec<EditorAction> {
    let ctrl = is_key_down(KeyCode::LeftControl)
        || is_key_down(KeyCode::RightControl)
        || is_key_down(KeyCode::LeftSuper)
        || is_key_down(KeyCode::RightSuper);
    let shift = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);

    ShortcutKey::BINDINGS
        .iter()
        .filter(|(code, _)| is_key_pressed(*code))
        .filter_map(|(_, key)| shortcut_action(*key, ctrl, shift))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_direction_follows_shift() {
        assert!(matches!(
            shortcut_action(ShortcutKey::R, false, false),
            Some(EditorAction::RotateSelected { clockwise: true })
        ));
        assert!(matches!(
            shortcut_action(ShortcutKey::R, false, true),
            Some(EditorAction::RotateSelected { clockwise: false })
        ));
    }

    #[test]
    fn test_ctrl_keys_are_file_commands() {
        assert!(matches!(shortcut_action(ShortcutKey::S, true, false), Some(EditorAction::Save)));
        assert!(matches!(shortcut_action(ShortcutKey::O, true, false), Some(EditorAction::OpenBrowser)));
        assert!(shortcut_action(ShortcutKey::R, true, false).is_none());
        assert!(shortcut_action(ShortcutKey::S, false, false).is_none());
    }

    #[test]
    fn test_delete_and_escape() {
        assert!(matches!(shortcut_action(ShortcutKey::Delete, false, false), Some(EditorAction::RemoveSelected)));
        assert!(matches!(shortcut_action(ShortcutKey::Escape, false, false), Some(EditorAction::ClearSelection)));
    }
}
