// crates/sprig-layout/src/resolver.rs
use glam::Vec2;
use sprig_core::{Axis, Node, NodeId, NodeTree, SizeMode};
use tracing::warn;

use crate::LayoutContext;

/// Values shared by every sibling in one flow container, computed once per draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiblingSpan {
    /// Pixels taken by rigid and proportional siblings, one spacing unit each included
    pub fixed_points_total: f32,
    /// Total claims divided by the share left over after fixed fractions
    pub variable_fraction_pool: f32,
}

impl SiblingSpan {
    /// The span of a node with no neighbours.
    pub const ALONE: SiblingSpan = SiblingSpan {
        fixed_points_total: 0.0,
        variable_fraction_pool: 1.0,
    };
}

impl Default for SiblingSpan {
    fn default() -> Self {
        Self::ALONE
    }
}

/// Turns size specs into pixel extents against the parents' stored geometry.
///
/// Parents must have been placed in the current frame before their children are
/// resolved; the draw pass guarantees this by storing geometry on the way down.
pub struct Resolver<'a> {
    tree: &'a NodeTree,
    ctx: LayoutContext,
}

impl<'a> Resolver<'a> {
    pub fn new(tree: &'a NodeTree, ctx: LayoutContext) -> Self {
        Self { tree, ctx }
    }

    pub fn context(&self) -> LayoutContext {
        self.ctx
    }

    /// Width and height of `id` assuming it has no neighbours.
    pub fn resolve_independent(&self, id: NodeId) -> Vec2 {
        Vec2::new(
            self.resolve_alone(id, Axis::Horizontal),
            self.resolve_alone(id, Axis::Vertical),
        )
    }

    pub fn resolve_alone(&self, id: NodeId, axis: Axis) -> f32 {
        self.resolve_among_siblings(id, axis, SiblingSpan::ALONE)
    }

    /// Collect the fixed total and claims pool over the visible nodes in `siblings`.
    pub fn span(&self, siblings: &[NodeId], axis: Axis) -> SiblingSpan {
        let spacing = self.ctx.spacing;
        let mut fixed_points_total = 0.0;
        let mut claims = 0.0;
        let mut space = 1.0;

        for &id in siblings {
            let Some(node) = self.tree.get(id) else { continue };
            if node.is_hidden() {
                continue;
            }

            match node.spec(axis).mode {
                SizeMode::FixedPoints(points) => {
                    fixed_points_total += points * self.ctx.point_size + spacing;
                }
                SizeMode::EqualToOtherAxis(_) => {
                    fixed_points_total += self.resolve_alone(id, axis) + spacing;
                }
                SizeMode::FixedFraction { numerator, denominator } => {
                    space -= numerator as f32 / denominator as f32;
                }
                SizeMode::VariableFraction { claims: own } => claims += own as f32,
                SizeMode::Wrap | SizeMode::Unconstrained => {}
            }
        }

        SiblingSpan {
            fixed_points_total,
            variable_fraction_pool: claims / space,
        }
    }

    /// Extent of `id` along `axis` when it shares that axis with the siblings
    /// summarised by `span`.
    pub fn resolve_among_siblings(&self, id: NodeId, axis: Axis, span: SiblingSpan) -> f32 {
        let Some(node) = self.tree.get(id) else {
            return 0.0;
        };
        let spec = node.spec(axis);

        match spec.mode {
            SizeMode::FixedPoints(points) => points * self.ctx.point_size,
            SizeMode::EqualToOtherAxis(factor) => {
                if node.spec(axis.other()).is_proportional() {
                    warn!(
                        "Width and height of {} {} are proportional to each other, resolving {:?} to 0",
                        node.kind.name(),
                        id,
                        axis
                    );
                    return 0.0;
                }
                factor * self.resolve_alone(id, axis.other())
            }
            SizeMode::FixedFraction { numerator, denominator } => self.share(
                node,
                axis,
                numerator as f32,
                denominator as f32,
                span.fixed_points_total,
            ),
            SizeMode::VariableFraction { claims } => {
                let pool = span.variable_fraction_pool;
                if !pool.is_finite() || pool <= 0.0 {
                    warn!("Claims pool {} for {} is unusable, resolving {:?} to 0", pool, id, axis);
                    return 0.0;
                }
                self.share(node, axis, claims as f32, pool, span.fixed_points_total)
            }
            SizeMode::Wrap => self.wrap(node, axis),
            SizeMode::Unconstrained => 0.0,
        }
    }

    fn share(&self, node: &Node, axis: Axis, size: f32, pool: f32, fixed: f32) -> f32 {
        let spacing = self.ctx.spacing;
        let available = self.parent_extent(node, axis);

        let mut extent = size * (available - fixed - (pool + 1.0) * spacing) / pool;
        // A share spanning several units also covers the gaps between them
        extent += spacing * (size - 1.0);
        if !node.spec(axis).spaced {
            extent += 2.0 * spacing;
        }
        extent
    }

    fn wrap(&self, node: &Node, axis: Axis) -> f32 {
        let spacing = self.ctx.spacing;

        let mut extent = match (node.label(), axis) {
            (Some(label), Axis::Horizontal) => label.calculate_w() + 2.0 * spacing,
            (Some(label), Axis::Vertical) => label.calculate_h() + 2.0 * spacing,
            (None, _) => 0.0,
        };

        for child in node.children() {
            let Some(child) = self.tree.get(child) else { continue };
            if child.is_hidden() {
                continue;
            }
            if let Some(points) = child.spec(axis).fixed_points() {
                extent = extent.max(points * self.ctx.point_size + 2.0 * spacing);
            }
        }
        extent
    }

    fn parent_extent(&self, node: &Node, axis: Axis) -> f32 {
        node.parent()
            .and_then(|parent| self.tree.get(parent))
            .unwrap_or(node)
            .geometry()
            .extent(axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_core::{Drawable, Geometry, Label};

    const NO_SPACING: LayoutContext = LayoutContext {
        spacing: 0.0,
        point_size: 1.0,
    };

    struct FixedLabel(f32, f32);

    impl Drawable for FixedLabel {
        fn draw(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _z: f32) -> anyhow::Result<()> {
            Ok(())
        }
    }

    impl Label for FixedLabel {
        fn calculate_w(&self) -> f32 {
            self.0
        }

        fn calculate_h(&self) -> f32 {
            self.1
        }
    }

    fn room_of_size(tree: &mut NodeTree, w: f32, h: f32) -> NodeId {
        let room = tree.attach(tree.root(), Node::room()).unwrap();
        tree.node_mut(room).unwrap().set_geometry(Geometry::new(0.0, 0.0, w, h));
        room
    }

    fn widths(tree: &NodeTree, ctx: LayoutContext, ids: &[NodeId]) -> Vec<f32> {
        let resolver = Resolver::new(tree, ctx);
        let span = resolver.span(ids, Axis::Horizontal);
        ids.iter()
            .map(|&id| resolver.resolve_among_siblings(id, Axis::Horizontal, span))
            .collect()
    }

    fn assert_close(actual: &[f32], expected: &[f32]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-3, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_five_sibling_split() {
        let mut tree = NodeTree::new();
        let parent = room_of_size(&mut tree, 525.0, 100.0);
        let ids: Vec<_> = [
            Node::div("1/4", "1/n"),
            Node::div("100p", "1/n"),
            Node::div("0.25h", "100p"),
            Node::div("5/n", "1/n"),
            Node::div("1/n", "1/n"),
        ]
        .into_iter()
        .map(|node| tree.attach(parent, node).unwrap())
        .collect();

        assert_close(&widths(&tree, NO_SPACING, &ids), &[100.0, 100.0, 25.0, 250.0, 50.0]);
    }

    #[test]
    fn test_four_sibling_split() {
        let mut tree = NodeTree::new();
        let parent = room_of_size(&mut tree, 400.0, 100.0);
        let ids: Vec<_> = ["100p", "1/3", "2/n", "3/n"]
            .into_iter()
            .map(|w| tree.attach(parent, Node::div(w, "1/n")).unwrap())
            .collect();

        assert_close(&widths(&tree, NO_SPACING, &ids), &[100.0, 100.0, 80.0, 120.0]);
    }

    #[test]
    fn test_points_scale_with_point_size() {
        let mut tree = NodeTree::new();
        let parent = room_of_size(&mut tree, 10.0, 10.0);
        let id = tree.attach(parent, Node::div("40p", "12p+")).unwrap();
        let ctx = LayoutContext {
            spacing: 3.0,
            point_size: 1.5,
        };

        let size = Resolver::new(&tree, ctx).resolve_independent(id);

        assert_eq!(size, Vec2::new(60.0, 18.0));
    }

    #[test]
    fn test_lone_fill_leaves_spacing_each_side() {
        let mut tree = NodeTree::new();
        let parent = room_of_size(&mut tree, 200.0, 100.0);
        let spaced = tree.attach(parent, Node::div("1/n", "1/n+")).unwrap();
        let ctx = LayoutContext {
            spacing: 5.0,
            point_size: 1.0,
        };

        let size = Resolver::new(&tree, ctx).resolve_independent(spaced);

        assert_eq!(size, Vec2::new(190.0, 100.0));
    }

    #[test]
    fn test_wrap_takes_largest_rigid_child() {
        let mut tree = NodeTree::new();
        let parent = room_of_size(&mut tree, 500.0, 500.0);
        let wrap = tree.attach(parent, Node::div("wrap", "wrap")).unwrap();
        tree.attach(wrap, Node::canvas("30p", "1/n")).unwrap();
        tree.attach(wrap, Node::canvas("50p", "10p")).unwrap();
        let hidden = tree.attach(wrap, Node::canvas("90p", "90p")).unwrap();
        tree.hide(hidden).unwrap();
        let ctx = LayoutContext {
            spacing: 2.0,
            point_size: 1.0,
        };

        let size = Resolver::new(&tree, ctx).resolve_independent(wrap);

        assert_eq!(size, Vec2::new(54.0, 14.0));
    }

    #[test]
    fn test_wrap_uses_label_and_empty_wrap_is_zero() {
        let mut tree = NodeTree::new();
        let parent = room_of_size(&mut tree, 500.0, 500.0);
        let labelled = tree
            .attach(parent, Node::canvas("wrap", "wrap").with_label(FixedLabel(40.0, 12.0)))
            .unwrap();
        tree.attach(labelled, Node::canvas("20p", "30p")).unwrap();
        let empty = tree.attach(parent, Node::div("wrap", "wrap")).unwrap();
        let ctx = LayoutContext {
            spacing: 1.0,
            point_size: 1.0,
        };
        let resolver = Resolver::new(&tree, ctx);

        assert_eq!(resolver.resolve_independent(labelled), Vec2::new(42.0, 32.0));
        assert_eq!(resolver.resolve_independent(empty), Vec2::ZERO);
    }

    #[test]
    fn test_equal_follows_other_axis() {
        let mut tree = NodeTree::new();
        let parent = room_of_size(&mut tree, 300.0, 200.0);
        let square = tree.attach(parent, Node::div("equal", "1/2")).unwrap();
        let tall = tree.attach(parent, Node::div("80p", "1.5w")).unwrap();
        let resolver = Resolver::new(&tree, NO_SPACING);

        assert_eq!(resolver.resolve_independent(square), Vec2::new(100.0, 100.0));
        assert_eq!(resolver.resolve_independent(tall), Vec2::new(80.0, 120.0));
    }

    #[test]
    fn test_mutually_proportional_axes_resolve_to_zero() {
        let mut tree = NodeTree::new();
        let parent = room_of_size(&mut tree, 300.0, 200.0);
        let cyclic = tree.attach(parent, Node::div("equal", "equal")).unwrap();

        let size = Resolver::new(&tree, NO_SPACING).resolve_independent(cyclic);

        assert_eq!(size, Vec2::ZERO);
    }

    #[test]
    fn test_unconstrained_and_overcommitted_pool_resolve_to_zero() {
        let mut tree = NodeTree::new();
        let parent = room_of_size(&mut tree, 300.0, 200.0);
        let garbage = tree.attach(parent, Node::div("lots", "1/n")).unwrap();
        let half = tree.attach(parent, Node::div("1/2", "1/n")).unwrap();
        let other_half = tree.attach(parent, Node::div("2/4", "1/n")).unwrap();
        let starved = tree.attach(parent, Node::div("1/n", "1/n")).unwrap();

        let sizes = widths(&tree, NO_SPACING, &[garbage, half, other_half, starved]);

        assert_close(&sizes, &[0.0, 150.0, 150.0, 0.0]);
    }

    #[test]
    fn test_span_ignores_hidden_siblings() {
        let mut tree = NodeTree::new();
        let parent = room_of_size(&mut tree, 300.0, 200.0);
        let shown = tree.attach(parent, Node::div("1/n", "1/n")).unwrap();
        let hidden = tree.attach(parent, Node::div("100p", "1/n").hidden()).unwrap();
        let other = tree.attach(parent, Node::div("2/n", "1/n").hidden()).unwrap();

        let span = Resolver::new(&tree, NO_SPACING).span(&[shown, hidden, other], Axis::Horizontal);

        assert_eq!(
            span,
            SiblingSpan {
                fixed_points_total: 0.0,
                variable_fraction_pool: 1.0,
            }
        );
    }
}
