use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use glam::{Vec2, Vec4};
use tracing::{debug, info};

use sprig_core::{Action, Button, EventCode, InputSnapshot, JustifyX, JustifyY, KeyCode, Node, NodeId};
use sprig_render::{CommandBuffer, CommandRenderer, LogRenderer, RectFrame, TextLabel};
use sprig_runtime::{App, AppConfig, FocusTarget, ScriptedInput};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON config file (created with defaults if missing)
    #[arg(short, long, default_value = "sprig.cfg")]
    config: PathBuf,

    /// Number of frames to run
    #[arg(short, long, default_value = "12")]
    frames: usize,

    /// Override the configured window width
    #[arg(long)]
    width: Option<f32>,

    /// Override the configured window height
    #[arg(long)]
    height: Option<f32>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

/// Ids the scripted session needs to aim at.
struct Demo {
    button: NodeId,
    open_modal: Rc<Cell<bool>>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let mut config = AppConfig::load_or_default(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;
    if !args.config.exists() {
        config
            .save(&args.config)
            .with_context(|| format!("Failed to write default config {}", args.config.display()))?;
    }
    if let Some(width) = args.width {
        config.size[0] = width;
    }
    if let Some(height) = args.height {
        config.size[1] = height;
    }

    let window = config.window_size();
    let mut app = App::new(config);
    let demo = build_demo(&mut app)?;
    let mut renderer = LogRenderer::new();
    renderer.resize(window)?;

    // Scripted interaction: open the modal and click away from it, then open it again
    // and close it with Escape
    let escape = EventCode::Key(KeyCode::Escape);
    let mut modal: Option<NodeId> = None;
    let scripted = args.frames.min(10);
    for frame in 0..scripted {
        let target = app
            .tree()
            .get(demo.button)
            .map(|node| {
                let g = node.geometry();
                Vec2::new(g.x + g.w / 2.0, g.y + g.h / 2.0)
            })
            .unwrap_or(Vec2::ZERO);

        let input = match frame {
            2 => InputSnapshot::click(target.x, target.y),
            3 => InputSnapshot::release(target.x, target.y),
            5 => InputSnapshot::click(1.0, 1.0),
            6 => InputSnapshot::click(target.x, target.y),
            7 => InputSnapshot::release(target.x, target.y),
            9 => InputSnapshot::new(target).with_event(escape, Action::Press),
            _ => InputSnapshot::new(target),
        };

        let report = app.frame(1.0 / 60.0, window, &input)?;
        let commands = app.take_commands();
        renderer.execute_commands(&commands)?;

        match report.focus {
            FocusTarget::Nook(id) => info!("Frame {}: nook {} focused", frame, id),
            FocusTarget::Room(id) => debug!("Frame {}: room {} focused", frame, id),
            FocusTarget::Nothing => debug!("Frame {}: nothing focused", frame),
        }
        for id in report.dismissed {
            info!("Frame {}: modal {} dismissed", frame, id);
            if modal == Some(id) {
                modal = None;
            }
        }

        if input.poll_event(escape, Action::Press) {
            if let Some(id) = modal.take() {
                app.tree_mut().destroy(id);
                info!("Frame {}: modal {} closed with Escape", frame, id);
            }
        }

        if demo.open_modal.replace(false) && modal.is_none() {
            let id = open_modal(&mut app)?;
            info!("Frame {}: opened modal {}", frame, id);
            modal = Some(id);
        }
    }

    let remaining = args.frames.saturating_sub(scripted);
    if remaining > 0 {
        let mut source = ScriptedInput::idle(window, Vec2::ZERO, remaining);
        let stats = app.run(&mut source, &mut renderer)?;
        info!("Ran {} frames in total", stats.frames);
    }

    info!(
        "Presented {} frames, last one had {} commands",
        renderer.frames(),
        renderer.last_command_count()
    );
    app.destroy();
    Ok(())
}

fn build_demo(app: &mut App) -> Result<Demo> {
    let buffer = app.command_buffer();
    let spacing = app.spacing();
    let root = app.root();
    let tree = app.tree_mut();

    let room = tree.attach(root, Node::room().with_frame(rect(&buffer, 0.1, 0.1, 0.1)))?;
    let col = tree.attach(room, Node::col())?;

    let header = tree.attach(col, Node::row().justify(JustifyX::Right, JustifyY::Top))?;
    tree.node_mut(header)?.resize("1/n+", "40p");
    tree.attach(
        header,
        Node::canvas("wrap", "1/n")
            .with_frame(rect(&buffer, 0.2, 0.2, 0.25))
            .with_label(TextLabel::new(buffer.clone(), "sprig").with_font_size(18.0).with_padding(spacing)),
    )?;

    let open_modal = Rc::new(Cell::new(false));
    let flag = open_modal.clone();
    let button = tree.attach(
        header,
        Node::button("80p", "1/n", Button::new().on_mouse_down(|| debug!("Button pressed")))
            .with_frame(rect(&buffer, 0.3, 0.5, 0.3))
            .with_label(TextLabel::new(buffer.clone(), "Open").with_font_size(14.0).with_padding(spacing))
            .with_action(move || flag.set(true)),
    )?;

    let body = tree.attach(col, Node::row())?;
    tree.attach(body, Node::canvas("1/4", "1/n").with_frame(rect(&buffer, 0.2, 0.3, 0.6)))?;
    tree.attach(body, Node::canvas("2/n", "1/n").with_frame(rect(&buffer, 0.6, 0.3, 0.2)))?;
    let side = tree.attach(body, Node::col())?;
    tree.node_mut(side)?.resize("1/n", "1/n+");
    tree.attach(side, Node::canvas("1/n", "equal").with_frame(rect(&buffer, 0.4, 0.4, 0.4)))?;
    tree.attach(side, Node::canvas("1/n", "1/n").with_frame(rect(&buffer, 0.5, 0.5, 0.5)))?;

    info!("Built demo tree with {} nodes", tree.len());
    Ok(Demo { button, open_modal })
}

fn open_modal(app: &mut App) -> Result<NodeId> {
    let buffer = app.command_buffer();
    let spacing = app.spacing();
    let root = app.root();
    let tree = app.tree_mut();

    let modal = tree.attach(root, Node::modal("200p", "wrap").with_frame(rect(&buffer, 0.9, 0.9, 0.9)))?;
    tree.attach(
        modal,
        Node::canvas("180p", "30p")
            .with_label(TextLabel::new(buffer.clone(), "Click outside to close").with_font_size(12.0).with_padding(spacing)),
    )?;
    Ok(modal)
}

fn rect(buffer: &CommandBuffer, r: f32, g: f32, b: f32) -> RectFrame {
    RectFrame::new(buffer.clone(), Vec4::new(r, g, b, 1.0))
}
