// crates/sprig-layout/src/flow.rs
use sprig_core::{Axis, Geometry, NodeId, NodeTree};
use tracing::trace;

use crate::{positioner, LayoutBehavior, LayoutContext, Placement, Resolver};

/// Sequential layout along one axis. Horizontal flows run left to right, vertical
/// flows top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowLayout {
    pub axis: Axis,
}

impl FlowLayout {
    pub const ROW: FlowLayout = FlowLayout {
        axis: Axis::Horizontal,
    };
    pub const COL: FlowLayout = FlowLayout {
        axis: Axis::Vertical,
    };
}

impl LayoutBehavior for FlowLayout {
    fn place_children(&self, tree: &NodeTree, parent: NodeId, ctx: LayoutContext, z: f32) -> Vec<Placement> {
        let Some(parent_node) = tree.get(parent) else {
            return Vec::new();
        };
        let origin = parent_node.geometry();
        let spacing = ctx.spacing;

        let children: Vec<NodeId> = parent_node.children().collect();
        let resolver = Resolver::new(tree, ctx);
        let span = resolver.span(&children, self.axis);

        let mut offset = 0.0;
        let mut placements = Vec::with_capacity(children.len());

        for id in children {
            let Some(child) = tree.get(id) else { continue };
            if child.is_hidden() {
                continue;
            }

            let along = resolver.resolve_among_siblings(id, self.axis, span);
            let across = resolver.resolve_alone(id, self.axis.other());
            let spaced = child.spec(self.axis).spaced;
            let lead = if spaced { spacing } else { 0.0 };

            let geometry = match self.axis {
                Axis::Horizontal => {
                    let y = positioner::justify_y(child.justify_y, origin, across, child.height().spaced, spacing);
                    Geometry::new(origin.x + offset + lead, y, along, across)
                }
                Axis::Vertical => {
                    let x = positioner::justify_x(child.justify_x, origin, across, child.width().spaced, spacing);
                    Geometry::new(x, origin.y + origin.h - offset - along - lead, across, along)
                }
            };
            trace!("Flow {:?} placed {} at {:?}", self.axis, id, geometry);

            offset += if spaced { along + spacing } else { along - spacing };
            placements.push(Placement {
                id,
                geometry,
                z: child.kind.z().unwrap_or(z),
            });
        }

        placements
    }
}
