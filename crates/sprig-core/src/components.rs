// crates/sprig-core/src/components.rs
use crate::InputSnapshot;

/// The visual payload of a node.
///
/// The layout engine calls `draw` with the node's freshly resolved geometry before any
/// descendant is drawn, `calc_frame` only while the node's branch holds input focus, and
/// `step_frame` every frame. Coordinates are pixels from the bottom-left of the window;
/// `z` ranges from -1 (back) to +1 (front).
pub trait Drawable {
    fn draw(&mut self, x: f32, y: f32, w: f32, h: f32, z: f32) -> anyhow::Result<()>;

    fn calc_frame(&mut self, _delta: f64, _input: &InputSnapshot) -> anyhow::Result<()> {
        Ok(())
    }

    fn step_frame(&mut self, _delta: f64) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Text attached to a node. Wrap-sized nodes ask their label for its extent.
pub trait Label: Drawable {
    fn calculate_w(&self) -> f32;
    fn calculate_h(&self) -> f32;
}
