// crates/sprig-layout/src/lib.rs

use sprig_core::{Geometry, NodeId, NodeKind, NodeTree};
use tracing::debug;

pub mod flow;
pub mod positioner;
pub mod resolver;

pub use flow::*;
pub use resolver::*;

/// Per-application scale factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutContext {
    /// Pixels between neighbouring nodes
    pub spacing: f32,
    /// Pixels per point
    pub point_size: f32,
}

impl LayoutContext {
    /// Point size for a screen of `dpi` dots per inch.
    pub fn from_dpi(dpi: f32, spacing_points: f32) -> Self {
        let point_size = dpi / 72.272;
        Self {
            spacing: spacing_points * point_size,
            point_size,
        }
    }
}

impl Default for LayoutContext {
    fn default() -> Self {
        Self {
            spacing: 0.0,
            point_size: 1.0,
        }
    }
}

/// Where one child goes this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub id: NodeId,
    pub geometry: Geometry,
    pub z: f32,
}

/// How a node arranges its visible children inside its own stored geometry.
pub trait LayoutBehavior {
    fn place_children(&self, tree: &NodeTree, parent: NodeId, ctx: LayoutContext, z: f32) -> Vec<Placement>;
}

/// Each child sized on its own and placed by its justification.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeLayout;

impl LayoutBehavior for FreeLayout {
    fn place_children(&self, tree: &NodeTree, parent: NodeId, ctx: LayoutContext, z: f32) -> Vec<Placement> {
        let Some(parent_node) = tree.get(parent) else {
            return Vec::new();
        };
        let origin = parent_node.geometry();
        let resolver = Resolver::new(tree, ctx);

        parent_node
            .children()
            .filter_map(|id| tree.get(id))
            .filter(|child| !child.is_hidden())
            .map(|child| {
                let size = resolver.resolve_independent(child.id());
                Placement {
                    id: child.id(),
                    geometry: positioner::place(child, origin, size.x, size.y, ctx.spacing),
                    z: child.kind.z().unwrap_or(z),
                }
            })
            .collect()
    }
}

/// The room covers the whole window; other nooks are placed freely against it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RootLayout;

impl LayoutBehavior for RootLayout {
    fn place_children(&self, tree: &NodeTree, parent: NodeId, ctx: LayoutContext, z: f32) -> Vec<Placement> {
        let Some(window) = tree.get(parent).map(|root| root.geometry()) else {
            return Vec::new();
        };

        FreeLayout
            .place_children(tree, parent, ctx, z)
            .into_iter()
            .map(|mut placement| {
                if Some(placement.id) == tree.room() {
                    placement.geometry = Geometry::new(0.0, 0.0, window.w, window.h);
                }
                placement
            })
            .collect()
    }
}

/// Pick the layout for a node by its kind.
pub fn behavior_for(kind: &NodeKind) -> &'static dyn LayoutBehavior {
    match kind {
        NodeKind::Root => &RootLayout,
        NodeKind::Row => &FlowLayout::ROW,
        NodeKind::Col => &FlowLayout::COL,
        NodeKind::Div
        | NodeKind::Canvas
        | NodeKind::Button(_)
        | NodeKind::Nook { .. }
        | NodeKind::Modal { .. }
        | NodeKind::Room { .. } => &FreeLayout,
    }
}

/// Place the children of `parent` with the behaviour its kind selects.
pub fn place_children(tree: &NodeTree, parent: NodeId, ctx: LayoutContext, z: f32) -> Vec<Placement> {
    let Some(node) = tree.get(parent) else {
        return Vec::new();
    };
    let placements = behavior_for(&node.kind).place_children(tree, parent, ctx, z);
    debug!("Placed {} children of {} {}", placements.len(), node.kind.name(), parent);
    placements
}
