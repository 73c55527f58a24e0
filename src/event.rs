//! Input event normalization.
//!
//! The raw events delivered by the global hook are collapsed into a small
//! normalized form here, at the boundary; nothing downstream inspects `rdev`
//! types. A normalized event carries a kind (key or mouse), a direction
//! (down or up) and a lowercase symbolic code such as `space`, `controlleft`
//! or `mouse_left` that stays stable for the lifetime of the process.

use rdev::{Button, EventType, Key};

use crate::error::Error;

/// Whether an event came from the keyboard or a mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Key,
    Mouse,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Key => write!(f, "KEY"),
            EventKind::Mouse => write!(f, "MOUSE"),
        }
    }
}

/// Press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down,
    Up,
}

/// A classified input event with a stable symbolic code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEvent {
    pub kind: EventKind,
    pub code: String,
    pub direction: Direction,
}

impl NormalizedEvent {
    pub fn new(kind: EventKind, code: impl Into<String>, direction: Direction) -> Self {
        Self {
            kind,
            code: code.into(),
            direction,
        }
    }
}

/// Normalizes a raw hook event.
///
/// Returns `Ok(None)` for event types that are not a press or release
/// (pointer motion, wheel). Unknown keys and buttons fail with
/// [`Error::UnrecognizedEvent`]; the caller logs and discards them so the
/// watch loop keeps running.
pub fn normalize(event_type: &EventType) -> Result<Option<NormalizedEvent>, Error> {
    let normalized = match event_type {
        EventType::KeyPress(key) => {
            NormalizedEvent::new(EventKind::Key, key_code(*key)?, Direction::Down)
        }
        EventType::KeyRelease(key) => {
            NormalizedEvent::new(EventKind::Key, key_code(*key)?, Direction::Up)
        }
        EventType::ButtonPress(button) => {
            NormalizedEvent::new(EventKind::Mouse, button_code(*button)?, Direction::Down)
        }
        EventType::ButtonRelease(button) => {
            NormalizedEvent::new(EventKind::Mouse, button_code(*button)?, Direction::Up)
        }
        EventType::MouseMove { .. } | EventType::Wheel { .. } => return Ok(None),
    };
    Ok(Some(normalized))
}

fn key_code(key: Key) -> Result<String, Error> {
    match key {
        Key::Unknown(raw) => Err(Error::UnrecognizedEvent(format!("unknown key {raw:#x}"))),
        key => Ok(format!("{key:?}").to_lowercase()),
    }
}

fn button_code(button: Button) -> Result<String, Error> {
    match button {
        Button::Left => Ok("mouse_left".to_string()),
        Button::Right => Ok("mouse_right".to_string()),
        Button::Middle => Ok("mouse_middle".to_string()),
        Button::Unknown(raw) => Err(Error::UnrecognizedEvent(format!(
            "unknown mouse button {raw}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_press_normalizes_to_lowercase_code() {
        let event = normalize(&EventType::KeyPress(Key::Space)).unwrap().unwrap();
        assert_eq!(event.kind, EventKind::Key);
        assert_eq!(event.code, "space");
        assert_eq!(event.direction, Direction::Down);
    }

    #[test]
    fn key_release_resolves_up_direction() {
        let event = normalize(&EventType::KeyRelease(Key::ControlLeft))
            .unwrap()
            .unwrap();
        assert_eq!(event.code, "controlleft");
        assert_eq!(event.direction, Direction::Up);
    }

    #[test]
    fn mouse_buttons_get_joined_codes() {
        let event = normalize(&EventType::ButtonPress(Button::Left))
            .unwrap()
            .unwrap();
        assert_eq!(event.kind, EventKind::Mouse);
        assert_eq!(event.code, "mouse_left");

        let event = normalize(&EventType::ButtonRelease(Button::Middle))
            .unwrap()
            .unwrap();
        assert_eq!(event.code, "mouse_middle");
        assert_eq!(event.direction, Direction::Up);
    }

    #[test]
    fn motion_and_wheel_are_skipped() {
        assert!(
            normalize(&EventType::MouseMove { x: 1.0, y: 2.0 })
                .unwrap()
                .is_none()
        );
        assert!(
            normalize(&EventType::Wheel {
                delta_x: 0,
                delta_y: 1
            })
            .unwrap()
            .is_none()
        );
    }

    #[test]
    fn unknown_inputs_are_rejected() {
        assert!(normalize(&EventType::KeyPress(Key::Unknown(0xfe))).is_err());
        assert!(normalize(&EventType::ButtonPress(Button::Unknown(9))).is_err());
    }

    #[test]
    fn codes_are_deterministic() {
        let first = normalize(&EventType::KeyPress(Key::KeyA)).unwrap().unwrap();
        let second = normalize(&EventType::KeyRelease(Key::KeyA)).unwrap().unwrap();
        assert_eq!(first.code, second.code);
        assert_eq!(first.code, "keya");
    }
}
