// crates/sprig-runtime/src/app.rs
use glam::Vec2;
use sprig_core::{InputSnapshot, NodeId, NodeTree};
use sprig_layout::LayoutContext;
use sprig_render::{CommandBuffer, CommandRenderer, RenderCommand};
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::{AppConfig, FocusTarget, InputSource, Scheduler};

/// What one frame did.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub focus: FocusTarget,
    pub dismissed: Vec<NodeId>,
    /// Nodes visited by the draw pass
    pub drawn: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub frames: u64,
    /// Fraction of the frame budget spent working, averaged over the last second
    pub load: f32,
    pub fps: u64,
}

/// Cloneable flag that stops [`App::run`] after the current frame.
#[derive(Debug, Clone, Default)]
pub struct CloseHandle(Rc<Cell<bool>>);

impl CloseHandle {
    pub fn close(&self) {
        self.0.set(true);
    }

    pub fn is_closed(&self) -> bool {
        self.0.get()
    }
}

/// One window's worth of UI: the tree, its scale and the frame clock.
pub struct App {
    tree: NodeTree,
    scheduler: Scheduler,
    config: AppConfig,
    buffer: CommandBuffer,
    window_size: Vec2,
    closed: CloseHandle,
    stats: FrameStats,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let ctx = LayoutContext::from_dpi(config.dpi, config.spacing_points);
        info!(
            "Creating app: {:?} window, point size {:.3}, spacing {:.2}px",
            config.size, ctx.point_size, ctx.spacing
        );

        Self {
            tree: NodeTree::new(),
            scheduler: Scheduler::new(ctx),
            window_size: config.window_size(),
            config,
            buffer: CommandBuffer::new(),
            closed: CloseHandle::default(),
            stats: FrameStats::default(),
        }
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut NodeTree {
        &mut self.tree
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn context(&self) -> LayoutContext {
        self.scheduler.context()
    }

    pub fn spacing(&self) -> f32 {
        self.scheduler.context().spacing
    }

    pub fn point_size(&self) -> f32 {
        self.scheduler.context().point_size
    }

    pub fn window_size(&self) -> Vec2 {
        self.window_size
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Handle for components that queue draw commands.
    pub fn command_buffer(&self) -> CommandBuffer {
        self.buffer.clone()
    }

    /// Commands drawn since the last call, back to front.
    pub fn take_commands(&self) -> Vec<RenderCommand> {
        self.buffer.take()
    }

    pub fn close_handle(&self) -> CloseHandle {
        self.closed.clone()
    }

    pub fn close(&self) {
        self.closed.close();
    }

    /// Tear down every nook and the room, and stop the loop.
    pub fn destroy(&mut self) {
        let root = self.tree.root();
        self.tree.destroy(root);
        self.close();
    }

    /// Draw, then calc, then step.
    pub fn frame(&mut self, delta: f64, window_size: Vec2, input: &InputSnapshot) -> anyhow::Result<FrameReport> {
        self.window_size = window_size;

        let drawn = self.scheduler.draw(&mut self.tree, window_size)?;
        let outcome = self.scheduler.calc(&mut self.tree, delta, input)?;
        self.scheduler.step(&mut self.tree, delta)?;

        self.stats.frames += 1;
        Ok(FrameReport {
            focus: outcome.focus,
            dismissed: outcome.dismissed,
            drawn,
        })
    }

    /// Run frames until the source or a [`CloseHandle`] asks to stop.
    pub fn run<S, R>(&mut self, source: &mut S, renderer: &mut R) -> anyhow::Result<FrameStats>
    where
        S: InputSource,
        R: CommandRenderer,
    {
        let frame_length = self.config.frame_length();
        let mut last_step = Instant::now();
        let mut last_report = Instant::now();
        let mut frames_since_report = 0u64;
        let mut work = Duration::ZERO;

        info!("Running at up to {} fps", self.config.max_fps);

        while !self.closed.is_closed() && !source.should_close() {
            let frame_start = Instant::now();
            if frame_start.duration_since(last_report) >= Duration::from_secs(1) {
                self.stats.fps = frames_since_report;
                self.stats.load = work.as_secs_f32() / (frame_length.as_secs_f32() * frames_since_report.max(1) as f32);
                debug!("{} fps @ {:.0}%", self.stats.fps, self.stats.load * 100.0);
                last_report = frame_start;
                frames_since_report = 0;
                work = Duration::ZERO;
            }

            let delta = frame_start.duration_since(last_step).as_secs_f64();
            last_step = frame_start;

            let input = source.poll();
            let size = source.framebuffer_size();
            if size != self.window_size {
                renderer.resize(size)?;
            }

            self.frame(delta, size, &input)?;
            renderer.execute_commands(&self.buffer.take())?;

            frames_since_report += 1;
            let elapsed = frame_start.elapsed();
            work += elapsed;
            if let Some(remainder) = frame_length.checked_sub(elapsed) {
                std::thread::sleep(remainder);
            }
        }

        info!("Stopped after {} frames", self.stats.frames);
        Ok(self.stats)
    }
}
