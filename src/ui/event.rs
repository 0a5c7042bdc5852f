use anyhow::Result;
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent,
};
use std::time::Duration;

use crate::toast::Category;

/// TUI event
#[derive(Debug, Clone)]
pub enum Event {
    /// Key input
    Key(KeyEvent),
    /// Mouse input
    Mouse(MouseEvent),
    /// Tick (periodic update)
    Tick,
    /// Resize
    Resize(u16, u16),
}

/// Event handler
pub struct EventHandler {
    /// Tick interval
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Get next event
    pub fn next(&self) -> Result<Event> {
        // Wait for event with timeout using crossterm poll
        if event::poll(self.tick_rate)? {
            match event::read()? {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                CrosstermEvent::Mouse(mouse) => Ok(Event::Mouse(mouse)),
                CrosstermEvent::Resize(w, h) => Ok(Event::Resize(w, h)),
                _ => Ok(Event::Tick),
            }
        } else {
            // Timeout -> Tick event
            Ok(Event::Tick)
        }
    }
}

/// Key event helper
pub fn is_quit_key(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

pub fn is_close_key(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('x') | KeyCode::Backspace)
}

/// s/e/w/i open a toast of the matching category
pub fn category_for_key(key: &KeyEvent) -> Option<Category> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Char('s') => Some(Category::Success),
        KeyCode::Char('e') => Some(Category::Error),
        KeyCode::Char('w') => Some(Category::Warning),
        KeyCode::Char('i') => Some(Category::Info),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_keys() {
        assert!(is_quit_key(&key(KeyCode::Char('q'))));
        assert!(is_quit_key(&key(KeyCode::Esc)));
        assert!(is_quit_key(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!is_quit_key(&key(KeyCode::Char('c'))));
    }

    #[test]
    fn test_category_keys() {
        assert_eq!(category_for_key(&key(KeyCode::Char('s'))), Some(Category::Success));
        assert_eq!(category_for_key(&key(KeyCode::Char('e'))), Some(Category::Error));
        assert_eq!(category_for_key(&key(KeyCode::Char('w'))), Some(Category::Warning));
        assert_eq!(category_for_key(&key(KeyCode::Char('i'))), Some(Category::Info));
        assert_eq!(category_for_key(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_close_keys() {
        assert!(is_close_key(&key(KeyCode::Char('x'))));
        assert!(!is_close_key(&key(KeyCode::Enter)));
    }
}
