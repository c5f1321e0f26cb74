// crates/sprig-core/src/input.rs
use glam::Vec2;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
}

/// The source of a discrete input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCode {
    Mouse(MouseButton),
    Key(KeyCode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Press,
    Release,
}

/// Everything the calc pass may ask about user input for a single frame.
///
/// The cursor is in pixels with the origin at the bottom-left of the window. Events are
/// only valid for the frame the snapshot was taken in; the last action recorded for a
/// code wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    cursor: Vec2,
    events: HashMap<EventCode, Action>,
}

impl InputSnapshot {
    pub fn new(cursor: Vec2) -> Self {
        Self {
            cursor,
            ..Default::default()
        }
    }

    pub fn at(x: f32, y: f32) -> Self {
        Self::new(Vec2::new(x, y))
    }

    pub fn with_event(mut self, code: EventCode, action: Action) -> Self {
        self.record(code, action);
        self
    }

    /// Shorthand for a left-button press at the cursor.
    pub fn click(x: f32, y: f32) -> Self {
        Self::at(x, y).with_event(EventCode::Mouse(MouseButton::Left), Action::Press)
    }

    /// Shorthand for a left-button release at the cursor.
    pub fn release(x: f32, y: f32) -> Self {
        Self::at(x, y).with_event(EventCode::Mouse(MouseButton::Left), Action::Release)
    }

    pub fn record(&mut self, code: EventCode, action: Action) {
        self.events.insert(code, action);
    }

    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Whether `code` saw `action` during this frame.
    pub fn poll_event(&self, code: EventCode, action: Action) -> bool {
        self.events.get(&code) == Some(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_event_matches_last_action() {
        let left = EventCode::Mouse(MouseButton::Left);
        let mut input = InputSnapshot::click(10.0, 20.0);

        assert!(input.poll_event(left, Action::Press));
        assert!(!input.poll_event(left, Action::Release));
        assert!(!input.poll_event(EventCode::Key(KeyCode::Escape), Action::Press));

        input.record(left, Action::Release);
        assert!(input.poll_event(left, Action::Release));
        assert!(!input.poll_event(left, Action::Press));
    }
}
