//! Input state and edge detection
//!
//! A platform layer reports which scancodes are held; [`KeyBindings`] maps
//! them to logical [`Action`]s once per frame and [`InputState`] keeps the
//! current and previous frame so callers can tell a held key from a fresh
//! press.

mod bindings;
mod scripted;

pub use bindings::{KeyBindings, Scancode};
pub use scripted::ScriptedInput;

use bitflags::bitflags;

bitflags! {
    /// Logical game actions
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Action: u8 {
        /// Leave the game
        const QUIT = 1 << 0;
        /// Move along the ship heading
        const THRUST = 1 << 1;
        /// Fire a projectile
        const SHOOT = 1 << 2;
        /// Turn counter-clockwise
        const ROTATE_LEFT = 1 << 3;
        /// Turn clockwise
        const ROTATE_RIGHT = 1 << 4;
        /// Narrow the view
        const ZOOM_IN = 1 << 5;
        /// Widen the view
        const ZOOM_OUT = 1 << 6;
    }
}

/// Source of raw key state, implemented by the platform layer
pub trait InputSource {
    /// Pull pending platform events; called once per frame before sampling
    fn pump(&mut self);

    /// Whether `scancode` is held right now
    fn is_down(&self, scancode: Scancode) -> bool;

    /// Whether the platform asked the game to close (window close button)
    fn close_requested(&self) -> bool {
        false
    }
}

/// Double-buffered action snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    current: Action,
    previous: Action,
}

impl InputState {
    /// Empty state: nothing held now or last frame
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shift the current snapshot to previous and store `now`
    pub fn update(&mut self, now: Action) {
        self.previous = self.current;
        self.current = now;
    }

    /// Pump `source`, map it through `bindings` and store the result
    pub fn sample(&mut self, source: &mut dyn InputSource, bindings: &KeyBindings) {
        source.pump();
        let mut now = bindings.actions_held(&*source);
        if source.close_requested() {
            now |= Action::QUIT;
        }
        self.update(now);
    }

    /// Held this frame
    #[must_use]
    pub const fn pressed(&self, action: Action) -> bool {
        self.current.contains(action)
    }

    /// Held last frame
    #[must_use]
    pub const fn was_pressed(&self, action: Action) -> bool {
        self.previous.contains(action)
    }

    /// Held this frame but not last frame
    #[must_use]
    pub const fn just_pressed(&self, action: Action) -> bool {
        self.pressed(action) && !self.was_pressed(action)
    }

    /// Current snapshot
    #[must_use]
    pub const fn current(&self) -> Action {
        self.current
    }
}
