// crates/sprig-runtime/src/backends.rs
use glam::Vec2;
use sprig_core::InputSnapshot;
use std::collections::VecDeque;

/// Window and input backend boundary polled once per frame.
pub trait InputSource {
    /// Input for the frame about to run.
    fn poll(&mut self) -> InputSnapshot;

    /// Current drawable size of the window in pixels.
    fn framebuffer_size(&self) -> Vec2;

    fn should_close(&self) -> bool;
}

/// Replays a fixed list of snapshots and then asks to close.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    frames: VecDeque<InputSnapshot>,
    size: Vec2,
    last_cursor: Vec2,
}

impl ScriptedInput {
    pub fn new(size: Vec2, frames: impl IntoIterator<Item = InputSnapshot>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            size,
            last_cursor: Vec2::ZERO,
        }
    }

    /// `count` idle frames with the cursor parked at `cursor`.
    pub fn idle(size: Vec2, cursor: Vec2, count: usize) -> Self {
        Self::new(size, std::iter::repeat(InputSnapshot::new(cursor)).take(count))
    }

    pub fn push(&mut self, frame: InputSnapshot) {
        self.frames.push_back(frame);
    }

    pub fn resize(&mut self, size: Vec2) {
        self.size = size;
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputSnapshot {
        match self.frames.pop_front() {
            Some(frame) => {
                self.last_cursor = frame.cursor();
                frame
            }
            None => InputSnapshot::new(self.last_cursor),
        }
    }

    fn framebuffer_size(&self) -> Vec2 {
        self.size
    }

    fn should_close(&self) -> bool {
        self.frames.is_empty()
    }
}
