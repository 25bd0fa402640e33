//! Scancode to action bindings

use serde::{Deserialize, Serialize};

use super::{Action, InputSource};

/// Platform keyboard scancode (USB HID usage id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scancode(pub u32);

/// Scancode bound to each action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Escape
    pub quit: Scancode,
    /// Keypad 0
    pub thrust: Scancode,
    /// Space
    pub shoot: Scancode,
    /// Left arrow
    pub rotate_left: Scancode,
    /// Right arrow
    pub rotate_right: Scancode,
    /// Keypad minus
    pub zoom_in: Scancode,
    /// Keypad plus
    pub zoom_out: Scancode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: Scancode(41),
            thrust: Scancode(98),
            shoot: Scancode(44),
            rotate_left: Scancode(80),
            rotate_right: Scancode(79),
            zoom_in: Scancode(86),
            zoom_out: Scancode(87),
        }
    }
}

impl KeyBindings {
    /// Every binding paired with its action
    #[must_use]
    pub const fn pairs(&self) -> [(Action, Scancode); 7] {
        [
            (Action::QUIT, self.quit),
            (Action::THRUST, self.thrust),
            (Action::SHOOT, self.shoot),
            (Action::ROTATE_LEFT, self.rotate_left),
            (Action::ROTATE_RIGHT, self.rotate_right),
            (Action::ZOOM_IN, self.zoom_in),
            (Action::ZOOM_OUT, self.zoom_out),
        ]
    }

    /// Actions whose bound scancode is held in `source`
    #[must_use]
    pub fn actions_held(&self, source: &dyn InputSource) -> Action {
        self.pairs()
            .into_iter()
            .filter(|&(_, scancode)| source.is_down(scancode))
            .fold(Action::empty(), |held, (action, _)| held | action)
    }

    /// Scancodes bound to any action in `actions`
    pub fn scancodes_for(&self, actions: Action) -> impl Iterator<Item = Scancode> {
        self.pairs()
            .into_iter()
            .filter(move |&(action, _)| actions.contains(action))
            .map(|(_, scancode)| scancode)
    }
}
