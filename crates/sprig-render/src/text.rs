// crates/sprig-render/src/text.rs
use glam::{Vec2, Vec4};
use sprig_core::{Drawable, Label};

use crate::{CommandBuffer, RenderCommand};

/// A single line of text measured with fixed glyph metrics.
#[derive(Debug, Clone)]
pub struct TextLabel {
    buffer: CommandBuffer,
    text: String,
    pub font_size: f32,
    pub color: Vec4,
    /// Inset from the left and top edges of the node
    pub padding: f32,
    average_char_width: f32,
}

impl TextLabel {
    pub const DEFAULT_FONT_SIZE: f32 = 24.0;

    pub fn new(buffer: CommandBuffer, text: impl Into<String>) -> Self {
        Self {
            buffer,
            text: text.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            color: Vec4::ONE,
            padding: 0.0,
            average_char_width: 0.6, // Approximate ratio of char width to font size
        }
    }

    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Drawable for TextLabel {
    fn draw(&mut self, x: f32, y: f32, _w: f32, h: f32, z: f32) -> anyhow::Result<()> {
        // Text sits on top of the node's own frame
        self.buffer.push(RenderCommand::DrawText {
            position: Vec2::new(x + self.padding, y + h - self.padding - self.calculate_h()),
            text: self.text.clone(),
            font_size: self.font_size,
            z: z + 0.1,
            color: self.color,
        });
        Ok(())
    }
}

impl Label for TextLabel {
    fn calculate_w(&self) -> f32 {
        self.text.chars().count() as f32 * self.font_size * self.average_char_width
    }

    fn calculate_h(&self) -> f32 {
        self.font_size
    }
}
