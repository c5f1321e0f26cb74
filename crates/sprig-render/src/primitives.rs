// crates/sprig-render/src/primitives.rs
use glam::{Vec2, Vec4};
use sprig_core::Drawable;

use crate::{CommandBuffer, RenderCommand};

/// A solid rectangle filling the node's geometry.
#[derive(Debug, Clone)]
pub struct RectFrame {
    buffer: CommandBuffer,
    pub color: Vec4,
}

impl RectFrame {
    pub fn new(buffer: CommandBuffer, color: Vec4) -> Self {
        Self { buffer, color }
    }

    pub fn rgba(buffer: CommandBuffer, r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::new(buffer, Vec4::new(r, g, b, a))
    }
}

impl Drawable for RectFrame {
    fn draw(&mut self, x: f32, y: f32, w: f32, h: f32, z: f32) -> anyhow::Result<()> {
        self.buffer.push(RenderCommand::DrawRect {
            position: Vec2::new(x, y),
            size: Vec2::new(w, h),
            z,
            color: self.color,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_frame_records_geometry() {
        let buffer = CommandBuffer::new();
        let mut frame = RectFrame::rgba(buffer.clone(), 0.1, 0.2, 0.3, 1.0);

        frame.draw(1.0, 2.0, 30.0, 40.0, -0.5).unwrap();

        assert_eq!(
            buffer.snapshot(),
            vec![RenderCommand::DrawRect {
                position: Vec2::new(1.0, 2.0),
                size: Vec2::new(30.0, 40.0),
                z: -0.5,
                color: Vec4::new(0.1, 0.2, 0.3, 1.0),
            }]
        );
    }
}
