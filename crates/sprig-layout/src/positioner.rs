// crates/sprig-layout/src/positioner.rs
use sprig_core::{Geometry, JustifyX, JustifyY, Node};

/// Left edge of a child of width `w` inside `parent`.
pub fn justify_x(justify: JustifyX, parent: Geometry, w: f32, spaced: bool, spacing: f32) -> f32 {
    let margin = if spaced { spacing } else { 0.0 };
    match justify {
        JustifyX::Left => parent.x + margin,
        JustifyX::Right => parent.x + parent.w - w - margin,
        JustifyX::Center => parent.x + 0.5 * parent.w - 0.5 * w,
    }
}

/// Bottom edge of a child of height `h` inside `parent`. Y grows upward.
pub fn justify_y(justify: JustifyY, parent: Geometry, h: f32, spaced: bool, spacing: f32) -> f32 {
    let margin = if spaced { spacing } else { 0.0 };
    match justify {
        JustifyY::Bottom => parent.y + margin,
        JustifyY::Top => parent.y + parent.h - h - margin,
        JustifyY::Center => parent.y + 0.5 * parent.h - 0.5 * h,
    }
}

/// Full placement of a node of size `(w, h)` inside `parent` by its own justification.
pub fn place(node: &Node, parent: Geometry, w: f32, h: f32, spacing: f32) -> Geometry {
    Geometry::new(
        justify_x(node.justify_x, parent, w, node.width().spaced, spacing),
        justify_y(node.justify_y, parent, h, node.height().spaced, spacing),
        w,
        h,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARENT: Geometry = Geometry::new(10.0, 20.0, 200.0, 100.0);

    #[test]
    fn test_horizontal_justification() {
        assert_eq!(justify_x(JustifyX::Left, PARENT, 50.0, true, 5.0), 15.0);
        assert_eq!(justify_x(JustifyX::Left, PARENT, 50.0, false, 5.0), 10.0);
        assert_eq!(justify_x(JustifyX::Right, PARENT, 50.0, true, 5.0), 155.0);
        assert_eq!(justify_x(JustifyX::Right, PARENT, 50.0, false, 5.0), 160.0);
        assert_eq!(justify_x(JustifyX::Center, PARENT, 50.0, true, 5.0), 85.0);
    }

    #[test]
    fn test_vertical_justification() {
        assert_eq!(justify_y(JustifyY::Bottom, PARENT, 40.0, true, 5.0), 25.0);
        assert_eq!(justify_y(JustifyY::Top, PARENT, 40.0, true, 5.0), 75.0);
        assert_eq!(justify_y(JustifyY::Top, PARENT, 40.0, false, 5.0), 80.0);
        assert_eq!(justify_y(JustifyY::Center, PARENT, 40.0, false, 5.0), 50.0);
    }

    #[test]
    fn test_place_uses_each_axis_spacing_flag() {
        let node = Node::div("50p", "40p+").justify(JustifyX::Left, JustifyY::Top);

        let geometry = place(&node, PARENT, 50.0, 40.0, 5.0);

        assert_eq!(geometry, Geometry::new(15.0, 80.0, 50.0, 40.0));
    }
}
