// crates/sprig-core/src/node.rs
use glam::Vec2;
use std::fmt;

use crate::{Action, Axis, Drawable, EventCode, InputSnapshot, Label, MouseButton, SizeSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JustifyX {
    Left,
    Right,
    #[default]
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JustifyY {
    Top,
    Bottom,
    #[default]
    Center,
}

/// On-screen rectangle of a node for the last frame, in pixels from the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Geometry {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_size(size: Vec2) -> Self {
        Self::new(0.0, 0.0, size.x, size.y)
    }

    pub fn origin(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    pub fn extent(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.w,
            Axis::Vertical => self.h,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// Strict containment: points on the edge are outside.
    pub fn contains(&self, point: Vec2) -> bool {
        self.x < point.x && point.x < self.x + self.w && self.y < point.y && point.y < self.y + self.h
    }
}

pub type Callback = Box<dyn FnMut()>;

/// Click tracking and the extra hooks a button carries on top of its action.
#[derive(Default)]
pub struct Button {
    armed: bool,
    on_hover: Option<Callback>,
    on_mouse_down: Option<Callback>,
}

impl Button {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_hover(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_hover = Some(Box::new(callback));
        self
    }

    pub fn on_mouse_down(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_mouse_down = Some(Box::new(callback));
        self
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Advance the click state machine for one calc pass. Returns true when a
    /// press-then-release over the button completed and the action should fire.
    pub fn update(&mut self, under_cursor: bool, input: &InputSnapshot) -> bool {
        let left = EventCode::Mouse(MouseButton::Left);

        if !under_cursor {
            if input.poll_event(left, Action::Press) {
                self.armed = false;
            }
            return false;
        }

        if let Some(on_hover) = self.on_hover.as_mut() {
            on_hover();
        }

        if input.poll_event(left, Action::Press) {
            self.armed = true;
            if let Some(on_mouse_down) = self.on_mouse_down.as_mut() {
                on_mouse_down();
            }
        }

        if self.armed && input.poll_event(left, Action::Release) {
            self.armed = false;
            return true;
        }

        false
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("armed", &self.armed)
            .field("on_hover", &self.on_hover.is_some())
            .field("on_mouse_down", &self.on_mouse_down.is_some())
            .finish()
    }
}

/// What a node does beyond sizing itself. Layout and input behaviour are selected
/// from this by pattern match.
#[derive(Debug)]
pub enum NodeKind {
    /// The dispatch root; owns the room and every other nook
    Root,
    Div,
    Canvas,
    /// Lays children out left to right
    Row,
    /// Lays children out top to bottom
    Col,
    Button(Button),
    /// Opaque input region drawn at its own depth
    Nook { z: f32 },
    /// A nook that destroys itself on a press outside its bounds
    Modal { z: f32 },
    /// The default branch for input when no nook is focused
    Room { z: f32 },
}

impl NodeKind {
    pub const NOOK_Z: f32 = -0.1;
    pub const ROOM_Z: f32 = -1.0;

    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Div => "div",
            NodeKind::Canvas => "canvas",
            NodeKind::Row => "row",
            NodeKind::Col => "col",
            NodeKind::Button(_) => "button",
            NodeKind::Nook { .. } => "nook",
            NodeKind::Modal { .. } => "modal",
            NodeKind::Room { .. } => "room",
        }
    }

    /// Nooks, modals and rooms claim input for their whole subtree.
    pub fn is_capture(&self) -> bool {
        matches!(self, NodeKind::Nook { .. } | NodeKind::Modal { .. } | NodeKind::Room { .. })
    }

    pub fn is_room(&self) -> bool {
        matches!(self, NodeKind::Room { .. })
    }

    /// Depth override: capture nodes ignore the depth their parent passes down.
    pub fn z(&self) -> Option<f32> {
        match self {
            NodeKind::Nook { z } | NodeKind::Modal { z } | NodeKind::Room { z } => Some(*z),
            _ => None,
        }
    }
}

/// One element of the UI tree.
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) parent: Option<NodeId>,
    /// Index in the parent's child list; `None` once destroyed
    pub(crate) slot: Option<usize>,
    pub(crate) children: Vec<Option<NodeId>>,

    width: SizeSpec,
    height: SizeSpec,
    pub justify_x: JustifyX,
    pub justify_y: JustifyY,
    hidden: bool,
    geometry: Geometry,

    frame: Option<Box<dyn Drawable>>,
    label: Option<Box<dyn Label>>,
    action: Option<Callback>,

    pub kind: NodeKind,
}

impl Node {
    pub fn new(kind: NodeKind, width: &str, height: &str) -> Self {
        Self::with_specs(
            kind,
            SizeSpec::parse(width, Axis::Horizontal),
            SizeSpec::parse(height, Axis::Vertical),
        )
    }

    pub fn with_specs(kind: NodeKind, width: SizeSpec, height: SizeSpec) -> Self {
        Self {
            id: NodeId(u32::MAX),
            parent: None,
            slot: None,
            children: Vec::new(),
            width,
            height,
            justify_x: JustifyX::default(),
            justify_y: JustifyY::default(),
            hidden: false,
            geometry: Geometry::default(),
            frame: None,
            label: None,
            action: None,
            kind,
        }
    }

    pub fn div(width: &str, height: &str) -> Self {
        Self::new(NodeKind::Div, width, height)
    }

    pub fn canvas(width: &str, height: &str) -> Self {
        Self::new(NodeKind::Canvas, width, height)
    }

    /// A row filling its parent, right/bottom justified.
    pub fn row() -> Self {
        Self::new(NodeKind::Row, "1/n+", "1/n+").justify(JustifyX::Right, JustifyY::Bottom)
    }

    /// A column filling its parent, right/bottom justified.
    pub fn col() -> Self {
        Self::new(NodeKind::Col, "1/n+", "1/n+").justify(JustifyX::Right, JustifyY::Bottom)
    }

    pub fn button(width: &str, height: &str, button: Button) -> Self {
        Self::new(NodeKind::Button(button), width, height)
    }

    pub fn nook(width: &str, height: &str) -> Self {
        Self::new(NodeKind::Nook { z: NodeKind::NOOK_Z }, width, height)
    }

    pub fn modal(width: &str, height: &str) -> Self {
        Self::new(NodeKind::Modal { z: NodeKind::NOOK_Z }, width, height)
    }

    pub fn room() -> Self {
        Self::new(NodeKind::Room { z: NodeKind::ROOM_Z }, "1/n+", "1/n+")
    }

    pub fn justify(mut self, x: JustifyX, y: JustifyY) -> Self {
        self.justify_x = x;
        self.justify_y = y;
        self
    }

    pub fn with_frame(mut self, frame: impl Drawable + 'static) -> Self {
        self.frame = Some(Box::new(frame));
        self
    }

    pub fn with_label(mut self, label: impl Label + 'static) -> Self {
        self.label = Some(Box::new(label));
        self
    }

    pub fn with_action(mut self, action: impl FnMut() + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn slot(&self) -> Option<usize> {
        self.slot
    }

    /// The raw child slots, including freed (`None`) ones.
    pub fn child_slots(&self) -> &[Option<NodeId>] {
        &self.children
    }

    /// Live children in slot order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().flatten().copied()
    }

    pub fn spec(&self, axis: Axis) -> SizeSpec {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    pub fn width(&self) -> SizeSpec {
        self.width
    }

    pub fn height(&self) -> SizeSpec {
        self.height
    }

    /// Re-parse both sizing strings. Not meant to be called while a frame is running.
    pub fn resize(&mut self, width: &str, height: &str) {
        self.width = SizeSpec::parse(width, Axis::Horizontal);
        self.height = SizeSpec::parse(height, Axis::Vertical);
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    pub fn show(&mut self) {
        self.hidden = false;
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
    }

    pub fn is_under(&self, cursor: Vec2) -> bool {
        self.geometry.contains(cursor)
    }

    pub fn label(&self) -> Option<&dyn Label> {
        self.label.as_deref()
    }

    pub fn set_frame(&mut self, frame: Option<Box<dyn Drawable>>) {
        self.frame = frame;
    }

    pub fn set_label(&mut self, label: Option<Box<dyn Label>>) {
        self.label = label;
    }

    pub fn set_action(&mut self, action: Option<Callback>) {
        self.action = action;
    }

    /// Run the node's action, if it has one.
    pub fn activate(&mut self) {
        if let Some(action) = self.action.as_mut() {
            action();
        }
    }

    pub fn draw_components(&mut self, z: f32) -> anyhow::Result<()> {
        let Geometry { x, y, w, h } = self.geometry;
        if let Some(frame) = self.frame.as_mut() {
            frame.draw(x, y, w, h, z)?;
        }
        if let Some(label) = self.label.as_mut() {
            label.draw(x, y, w, h, z)?;
        }
        Ok(())
    }

    pub fn calc_components(&mut self, delta: f64, input: &InputSnapshot) -> anyhow::Result<()> {
        if let Some(frame) = self.frame.as_mut() {
            frame.calc_frame(delta, input)?;
        }
        if let Some(label) = self.label.as_mut() {
            label.calc_frame(delta, input)?;
        }
        Ok(())
    }

    pub fn step_components(&mut self, delta: f64) -> anyhow::Result<()> {
        if let Some(frame) = self.frame.as_mut() {
            frame.step_frame(delta)?;
        }
        if let Some(label) = self.label.as_mut() {
            label.step_frame(delta)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &self.kind.name())
            .field("parent", &self.parent)
            .field("slot", &self.slot)
            .field("children", &self.children)
            .field("width", &self.width.to_grammar(Axis::Horizontal))
            .field("height", &self.height.to_grammar(Axis::Vertical))
            .field("hidden", &self.hidden)
            .field("geometry", &self.geometry)
            .finish()
    }
}
