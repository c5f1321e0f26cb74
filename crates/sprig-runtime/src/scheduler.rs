// crates/sprig-runtime/src/scheduler.rs
use glam::Vec2;
use sprig_core::{Action, EventCode, Geometry, InputSnapshot, MouseButton, NodeId, NodeKind, NodeTree};
use sprig_layout::{place_children, LayoutContext};
use tracing::{debug, trace};

/// The branch that received the calc pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// A nook or modal under the cursor
    Nook(NodeId),
    /// Nothing claimed the cursor, the room got the pass
    Room(NodeId),
    /// No nook was focused and there is no room
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalcOutcome {
    pub focus: FocusTarget,
    /// Modals destroyed by a press outside their bounds this frame
    pub dismissed: Vec<NodeId>,
}

/// Runs the three per-frame passes over a tree.
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    ctx: LayoutContext,
}

impl Scheduler {
    pub fn new(ctx: LayoutContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> LayoutContext {
        self.ctx
    }

    /// Resolve and store geometry for every visible node, drawing each one before its
    /// children. Returns the number of nodes visited.
    pub fn draw(&self, tree: &mut NodeTree, window: Vec2) -> anyhow::Result<usize> {
        let root = tree.root();
        tree.node_mut(root)?.set_geometry(Geometry::from_size(window));
        self.draw_node(tree, root, 0.0)
    }

    fn draw_node(&self, tree: &mut NodeTree, id: NodeId, z: f32) -> anyhow::Result<usize> {
        tree.node_mut(id)?.draw_components(z)?;

        let mut visited = 1;
        for placement in place_children(tree, id, self.ctx, z) {
            trace!("Drawing {} at {:?} z {}", placement.id, placement.geometry, placement.z);
            tree.node_mut(placement.id)?.set_geometry(placement.geometry);
            visited += self.draw_node(tree, placement.id, placement.z)?;
        }
        Ok(visited)
    }

    /// Dispatch input to exactly one branch.
    ///
    /// Every visible nook is asked in slot order whether it has focus; modals use the
    /// question to dismiss themselves. The first focused nook gets the pass, otherwise
    /// the room does.
    pub fn calc(&self, tree: &mut NodeTree, delta: f64, input: &InputSnapshot) -> anyhow::Result<CalcOutcome> {
        let cursor = input.cursor();
        let outside_press = input.poll_event(EventCode::Mouse(MouseButton::Left), Action::Press);
        let mut focused = None;
        let mut dismissed = Vec::new();

        for id in tree.nooks() {
            let Some(node) = tree.get(id) else { continue };
            if node.is_hidden() {
                continue;
            }

            let under = node.is_under(cursor);
            if !under && outside_press && matches!(node.kind, NodeKind::Modal { .. }) {
                debug!("Dismissing modal {} on outside press", id);
                tree.destroy(id);
                dismissed.push(id);
                continue;
            }
            if under && focused.is_none() {
                focused = Some(id);
            }
        }

        let focus = match (focused, tree.room()) {
            (Some(nook), _) => FocusTarget::Nook(nook),
            (None, Some(room)) => FocusTarget::Room(room),
            (None, None) => FocusTarget::Nothing,
        };

        match focus {
            FocusTarget::Nook(id) | FocusTarget::Room(id) => self.calc_node(tree, id, delta, input)?,
            FocusTarget::Nothing => {}
        }

        Ok(CalcOutcome { focus, dismissed })
    }

    fn calc_node(&self, tree: &mut NodeTree, id: NodeId, delta: f64, input: &InputSnapshot) -> anyhow::Result<()> {
        let node = tree.node_mut(id)?;
        if node.is_hidden() {
            return Ok(());
        }

        let under = node.is_under(input.cursor());
        let clicked = match &mut node.kind {
            NodeKind::Button(button) => button.update(under, input),
            _ => false,
        };
        if clicked {
            debug!("Button {} clicked", id);
            node.activate();
        }

        node.calc_components(delta, input)?;

        for child in tree.children(id) {
            self.calc_node(tree, child, delta, input)?;
        }
        Ok(())
    }

    /// Advance every node, hidden or not.
    pub fn step(&self, tree: &mut NodeTree, delta: f64) -> anyhow::Result<()> {
        let root = tree.root();
        self.step_node(tree, root, delta)
    }

    fn step_node(&self, tree: &mut NodeTree, id: NodeId, delta: f64) -> anyhow::Result<()> {
        tree.node_mut(id)?.step_components(delta)?;
        for child in tree.children(id) {
            self.step_node(tree, child, delta)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_core::{Button, Drawable, JustifyX, JustifyY, Node};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Drawable that logs every contract call against a name.
    #[derive(Clone)]
    struct Probe {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Probe {
        fn new(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Self {
            Self {
                name,
                log: log.clone(),
            }
        }
    }

    impl Drawable for Probe {
        fn draw(&mut self, x: f32, y: f32, w: f32, h: f32, _z: f32) -> anyhow::Result<()> {
            self.log.borrow_mut().push(format!("draw {} {} {} {} {}", self.name, x, y, w, h));
            Ok(())
        }

        fn calc_frame(&mut self, _delta: f64, _input: &InputSnapshot) -> anyhow::Result<()> {
            self.log.borrow_mut().push(format!("calc {}", self.name));
            Ok(())
        }

        fn step_frame(&mut self, _delta: f64) -> anyhow::Result<()> {
            self.log.borrow_mut().push(format!("step {}", self.name));
            Ok(())
        }
    }

    fn scheduler() -> Scheduler {
        Scheduler::new(LayoutContext::default())
    }

    fn entries(log: &Rc<RefCell<Vec<String>>>, prefix: &str) -> Vec<String> {
        log.borrow().iter().filter(|e| e.starts_with(prefix)).cloned().collect()
    }

    #[test]
    fn test_draw_visits_parents_before_children() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tree = NodeTree::new();
        let room = tree.attach(tree.root(), Node::room().with_frame(Probe::new("room", &log))).unwrap();
        let row = tree.attach(room, Node::row().with_frame(Probe::new("row", &log))).unwrap();
        tree.attach(row, Node::canvas("1/n", "1/n").with_frame(Probe::new("left", &log))).unwrap();
        tree.attach(row, Node::canvas("1/n", "1/n").with_frame(Probe::new("right", &log))).unwrap();

        let visited = scheduler().draw(&mut tree, Vec2::new(200.0, 100.0)).unwrap();

        assert_eq!(visited, 5);
        assert_eq!(
            entries(&log, "draw"),
            vec![
                "draw room 0 0 200 100",
                "draw row 0 0 200 100",
                "draw left 0 0 100 100",
                "draw right 100 0 100 100",
            ]
        );
    }

    #[test]
    fn test_hidden_subtrees_are_not_drawn_or_calced_but_are_stepped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tree = NodeTree::new();
        let room = tree.attach(tree.root(), Node::room()).unwrap();
        let hidden = tree.attach(room, Node::div("1/n", "1/n").with_frame(Probe::new("hidden", &log))).unwrap();
        tree.attach(hidden, Node::canvas("1/n", "1/n").with_frame(Probe::new("inner", &log))).unwrap();
        tree.hide(hidden).unwrap();
        let scheduler = scheduler();

        scheduler.draw(&mut tree, Vec2::new(100.0, 100.0)).unwrap();
        scheduler.calc(&mut tree, 0.016, &InputSnapshot::at(50.0, 50.0)).unwrap();
        scheduler.step(&mut tree, 0.016).unwrap();

        assert!(entries(&log, "draw").is_empty());
        assert!(entries(&log, "calc").is_empty());
        assert_eq!(entries(&log, "step"), vec!["step hidden", "step inner"]);
    }

    #[test]
    fn test_first_nook_under_cursor_gets_exclusive_focus() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tree = NodeTree::new();
        let root = tree.root();
        tree.attach(root, Node::room().with_frame(Probe::new("room", &log))).unwrap();
        let first = tree
            .attach(root, Node::nook("100p", "100p").justify(JustifyX::Left, JustifyY::Bottom).with_frame(Probe::new("first", &log)))
            .unwrap();
        tree.attach(root, Node::nook("50p", "50p").justify(JustifyX::Left, JustifyY::Bottom).with_frame(Probe::new("second", &log)))
            .unwrap();
        let scheduler = scheduler();
        scheduler.draw(&mut tree, Vec2::new(400.0, 400.0)).unwrap();

        let outcome = scheduler.calc(&mut tree, 0.016, &InputSnapshot::at(25.0, 25.0)).unwrap();
        assert_eq!(outcome.focus, FocusTarget::Nook(first));
        assert_eq!(entries(&log, "calc"), vec!["calc first"]);

        log.borrow_mut().clear();
        let outcome = scheduler.calc(&mut tree, 0.016, &InputSnapshot::at(300.0, 300.0)).unwrap();
        assert_eq!(outcome.focus, FocusTarget::Room(tree.room().unwrap()));
        assert_eq!(entries(&log, "calc"), vec!["calc room"]);
    }

    #[test]
    fn test_outside_press_dismisses_modal_and_falls_through() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tree = NodeTree::new();
        let root = tree.root();
        let room = tree.attach(root, Node::room().with_frame(Probe::new("room", &log))).unwrap();
        let modal = tree.attach(root, Node::modal("100p", "100p").with_frame(Probe::new("modal", &log))).unwrap();
        let scheduler = scheduler();
        scheduler.draw(&mut tree, Vec2::new(400.0, 400.0)).unwrap();

        // Inside: ordinary capture
        let outcome = scheduler.calc(&mut tree, 0.016, &InputSnapshot::click(200.0, 200.0)).unwrap();
        assert_eq!(outcome.focus, FocusTarget::Nook(modal));
        assert!(outcome.dismissed.is_empty());

        // Outside without a press: kept, room focused
        let outcome = scheduler.calc(&mut tree, 0.016, &InputSnapshot::at(10.0, 10.0)).unwrap();
        assert_eq!(outcome.focus, FocusTarget::Room(room));
        assert!(tree.contains(modal));

        log.borrow_mut().clear();
        let outcome = scheduler.calc(&mut tree, 0.016, &InputSnapshot::click(10.0, 10.0)).unwrap();
        assert_eq!(outcome.focus, FocusTarget::Room(room));
        assert_eq!(outcome.dismissed, vec![modal]);
        assert!(!tree.contains(modal));
        assert_eq!(entries(&log, "calc"), vec!["calc room"]);
    }

    #[test]
    fn test_button_fires_action_on_release() {
        let clicks = Rc::new(RefCell::new(0));
        let mut tree = NodeTree::new();
        let room = tree.attach(tree.root(), Node::room()).unwrap();
        let counter = clicks.clone();
        tree.attach(
            room,
            Node::button("40p", "20p", Button::new())
                .justify(JustifyX::Left, JustifyY::Bottom)
                .with_action(move || *counter.borrow_mut() += 1),
        )
        .unwrap();
        let scheduler = scheduler();
        scheduler.draw(&mut tree, Vec2::new(100.0, 100.0)).unwrap();

        scheduler.calc(&mut tree, 0.016, &InputSnapshot::click(10.0, 10.0)).unwrap();
        assert_eq!(*clicks.borrow(), 0);
        scheduler.calc(&mut tree, 0.016, &InputSnapshot::release(10.0, 10.0)).unwrap();
        assert_eq!(*clicks.borrow(), 1);

        // Release away from the button after pressing on it
        scheduler.calc(&mut tree, 0.016, &InputSnapshot::click(10.0, 10.0)).unwrap();
        scheduler.calc(&mut tree, 0.016, &InputSnapshot::release(80.0, 80.0)).unwrap();
        assert_eq!(*clicks.borrow(), 1);
    }

    #[test]
    fn test_calc_without_room_does_nothing() {
        let mut tree = NodeTree::new();
        let scheduler = scheduler();
        scheduler.draw(&mut tree, Vec2::new(100.0, 100.0)).unwrap();

        let outcome = scheduler.calc(&mut tree, 0.016, &InputSnapshot::click(1.0, 1.0)).unwrap();

        assert_eq!(outcome.focus, FocusTarget::Nothing);
        scheduler.step(&mut tree, 0.016).unwrap();
    }
}
