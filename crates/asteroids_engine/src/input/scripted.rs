//! Input source that replays a fixed list of frames

use std::collections::VecDeque;

use super::{Action, InputSource, KeyBindings, Scancode};

/// Replays one set of held scancodes per frame, then requests close
///
/// Used by the headless binary and by tests in place of a window.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<Vec<Scancode>>,
    held: Vec<Scancode>,
    finished: bool,
}

impl ScriptedInput {
    /// Replay `frames` in order
    #[must_use]
    pub fn new(frames: Vec<Vec<Scancode>>) -> Self {
        Self {
            frames: frames.into(),
            held: Vec::new(),
            finished: false,
        }
    }

    /// Replay logical actions, translated through `bindings`
    #[must_use]
    pub fn from_actions(bindings: &KeyBindings, frames: &[Action]) -> Self {
        Self::new(
            frames
                .iter()
                .map(|&actions| bindings.scancodes_for(actions).collect())
                .collect(),
        )
    }

    /// `count` frames with nothing held
    #[must_use]
    pub fn idle(count: usize) -> Self {
        Self::new(vec![Vec::new(); count])
    }

    /// Frames not yet replayed
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn pump(&mut self) {
        match self.frames.pop_front() {
            Some(frame) => self.held = frame,
            None => {
                self.held.clear();
                self.finished = true;
            }
        }
    }

    fn is_down(&self, scancode: Scancode) -> bool {
        self.held.contains(&scancode)
    }

    fn close_requested(&self) -> bool {
        self.finished
    }
}
