// crates/sprig-render/src/lib.rs

use glam::{Vec2, Vec4};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace};

pub mod primitives;
pub mod text;

pub use primitives::*;
pub use text::*;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Render operation failed: {0}")]
    RenderFailed(String),
}

pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// Backend-neutral drawing commands emitted by node components during the draw pass.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    DrawRect {
        position: Vec2,
        size: Vec2,
        z: f32,
        color: Vec4,
    },
    DrawText {
        position: Vec2,
        text: String,
        font_size: f32,
        z: f32,
        color: Vec4,
    },
}

impl RenderCommand {
    pub fn z(&self) -> f32 {
        match self {
            RenderCommand::DrawRect { z, .. } | RenderCommand::DrawText { z, .. } => *z,
        }
    }
}

/// Frame-local command list shared by every component of one application.
///
/// Cloning yields another handle to the same list.
#[derive(Debug, Clone, Default)]
pub struct CommandBuffer {
    commands: Rc<RefCell<Vec<RenderCommand>>>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: RenderCommand) {
        trace!("Queued {:?}", command);
        self.commands.borrow_mut().push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.borrow().is_empty()
    }

    /// Copy of the commands queued so far.
    pub fn snapshot(&self) -> Vec<RenderCommand> {
        self.commands.borrow().clone()
    }

    /// Drain the queued commands, ordered back to front.
    pub fn take(&self) -> Vec<RenderCommand> {
        let mut commands = std::mem::take(&mut *self.commands.borrow_mut());
        commands.sort_by(|a, b| a.z().total_cmp(&b.z()));
        commands
    }

    pub fn clear(&self) {
        self.commands.borrow_mut().clear();
    }
}

/// Presents one frame's commands.
pub trait CommandRenderer {
    fn execute_commands(&mut self, commands: &[RenderCommand]) -> RenderResult<()>;

    fn resize(&mut self, _new_size: Vec2) -> RenderResult<()> {
        Ok(())
    }
}

/// Renderer that only reports what it would have drawn.
#[derive(Debug, Default)]
pub struct LogRenderer {
    frames: u64,
    last_command_count: usize,
    viewport_size: Vec2,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_command_count(&self) -> usize {
        self.last_command_count
    }

    pub fn viewport_size(&self) -> Vec2 {
        self.viewport_size
    }
}

impl CommandRenderer for LogRenderer {
    fn execute_commands(&mut self, commands: &[RenderCommand]) -> RenderResult<()> {
        self.frames += 1;
        self.last_command_count = commands.len();
        debug!("Frame {}: {} commands", self.frames, commands.len());

        for command in commands {
            match command {
                RenderCommand::DrawRect { position, size, z, color } => {
                    debug!("  rect at {:?} size {:?} z {:.2} color {:?}", position, size, z, color);
                }
                RenderCommand::DrawText { position, text, font_size, z, .. } => {
                    debug!("  text {:?} at {:?} size {} z {:.2}", text, position, font_size, z);
                }
            }
        }
        Ok(())
    }

    fn resize(&mut self, new_size: Vec2) -> RenderResult<()> {
        if new_size.x <= 0.0 || new_size.y <= 0.0 {
            return Err(RenderError::RenderFailed(format!("invalid viewport {:?}", new_size)));
        }
        self.viewport_size = new_size;
        Ok(())
    }
}
