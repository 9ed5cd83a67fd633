use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    ScrollHalfPageDown,
    ScrollHalfPageUp,
    ScrollPageDown,
    ScrollPageUp,
    JumpToTop,
    JumpToBottom,
    PendingG, // First 'g' press, waiting for second 'g'
    PrevPage,
    NextPage,
    /// Digit keys 1-9 jump straight to a tab
    SelectPage(usize),
    Pull,
    GrowContent,
    ShrinkContent,
    ToggleBio,
    None,
}

/// Handle a key event and return the corresponding action
///
/// `pending_key` is the first key of an unfinished sequence such as `gg`.
pub fn handle_key_event(key: KeyEvent, pending_key: Option<char>, keymap: &Keymap) -> Action {
    let binding = KeyBinding::from_event(&key);

    if keymap.is_g_prefix(&binding) {
        return if pending_key == Some('g') {
            keymap
                .get_pending_g_action()
                .cloned()
                .unwrap_or(Action::None)
        } else {
            Action::PendingG
        };
    }

    if let Some(action) = keymap.get(&binding) {
        return action.clone();
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
            Action::SelectPage(c as usize - '1' as usize)
        }
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_configured_bindings() {
        let keymap = Keymap::default();
        assert_eq!(
            handle_key_event(key(KeyCode::Char('j'), KeyModifiers::NONE), None, &keymap),
            Action::ScrollDown
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('d'), KeyModifiers::CONTROL), None, &keymap),
            Action::ScrollHalfPageDown
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('K'), KeyModifiers::SHIFT), None, &keymap),
            Action::Pull
        );
    }

    #[test]
    fn test_gg_sequence() {
        let keymap = Keymap::default();
        let g = key(KeyCode::Char('g'), KeyModifiers::NONE);
        assert_eq!(handle_key_event(g, None, &keymap), Action::PendingG);
        assert_eq!(handle_key_event(g, Some('g'), &keymap), Action::JumpToTop);
    }

    #[test]
    fn test_shifted_symbol_matches_plain_binding() {
        let keymap = Keymap::default();
        // Most terminals report '+' with SHIFT held
        assert_eq!(
            handle_key_event(key(KeyCode::Char('+'), KeyModifiers::SHIFT), None, &keymap),
            Action::GrowContent
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('-'), KeyModifiers::NONE), None, &keymap),
            Action::ShrinkContent
        );
    }

    #[test]
    fn test_digit_selects_page() {
        let keymap = Keymap::default();
        assert_eq!(
            handle_key_event(key(KeyCode::Char('3'), KeyModifiers::NONE), None, &keymap),
            Action::SelectPage(2)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('z'), KeyModifiers::NONE), None, &keymap),
            Action::None
        );
    }
}
