//! Pointer events delivered by the input surface.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Pointer event in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PointerEvent {
    Down {
        position: Point,
        #[serde(default)]
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
        #[serde(default)]
        button: MouseButton,
    },
}

impl PointerEvent {
    /// Primary-button press at `(x, y)`.
    pub fn down(x: f64, y: f64) -> Self {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        PointerEvent::Move {
            position: Point::new(x, y),
        }
    }

    /// Primary-button release at `(x, y)`.
    pub fn up(x: f64, y: f64) -> Self {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position, .. } => *position,
        }
    }

    /// Whether the event drives drawing. Moves always do; presses and
    /// releases only for the primary button.
    pub fn is_primary(&self) -> bool {
        match self {
            PointerEvent::Down { button, .. } | PointerEvent::Up { button, .. } => {
                *button == MouseButton::Left
            }
            PointerEvent::Move { .. } => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(PointerEvent::down(1.0, 2.0).position(), Point::new(1.0, 2.0));
        assert!(PointerEvent::up(0.0, 0.0).is_primary());
        assert!(PointerEvent::moved(3.0, 4.0).is_primary());
    }

    #[test]
    fn test_secondary_button_is_not_primary() {
        let event = PointerEvent::Down {
            position: Point::ZERO,
            button: MouseButton::Right,
        };
        assert!(!event.is_primary());
    }

    #[test]
    fn test_deserialize_with_default_button() {
        let event: PointerEvent =
            serde_json::from_str(r#"{ "type": "Down", "position": { "x": 5.0, "y": 6.0 } }"#)
                .unwrap();
        assert_eq!(event, PointerEvent::down(5.0, 6.0));
    }
}
