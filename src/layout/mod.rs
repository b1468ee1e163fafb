mod tidy;
pub(crate) mod types;
pub use tidy::{TidyOptions, TidyPoint, tidy_tree};
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::TreeNode;
use crate::text_metrics;
use crate::theme::Theme;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

const CANVAS_PAD: f32 = 4.0;

/// Lays `tree` out as a radial tidy tree: breadth position becomes the angle
/// over a full turn, depth becomes the radius.
pub fn compute_layout(tree: &TreeNode, theme: &Theme, config: &LayoutConfig) -> RadialLayout {
    let max_radius = config.max_radius();
    let points = tidy_tree(
        tree,
        &TidyOptions {
            breadth: TAU,
            depth: max_radius,
            sibling_separation: config.sibling_separation,
            subtree_separation: config.subtree_separation,
        },
    );

    let mut class_index: Vec<Option<usize>> = Vec::with_capacity(points.len());
    for (idx, point) in points.iter().enumerate() {
        let class = match point.depth {
            0 => None,
            1 => Some(idx),
            _ => point.parent.and_then(|parent| class_index[parent]),
        };
        class_index.push(class);
    }

    let nodes: Vec<NodeLayout> = points
        .iter()
        .enumerate()
        .map(|(idx, point)| {
            let class_name = class_index[idx].map(|class| points[class].node.name.as_str());
            let (x, y) = point_radial(point.x, point.y);
            NodeLayout {
                index: idx,
                name: point.node.name.clone(),
                depth: point.depth,
                angle: point.x,
                radius: point.y,
                x,
                y,
                parent: point.parent,
                class_index: class_index[idx],
                is_leaf: point.children.is_empty(),
                color: theme.class_color(class_name).to_string(),
                label: place_label(point, theme, config),
            }
        })
        .collect();

    let links = nodes
        .iter()
        .filter_map(|node| {
            let parent = &nodes[node.parent?];
            Some(radial_link(parent, node))
        })
        .collect();

    let max_depth = nodes.iter().map(|node| node.depth).max().unwrap_or(0);
    let extent = nodes
        .iter()
        .map(|node| match (node.depth, node.is_leaf) {
            (0, _) => node.label.width / 2.0,
            // Leaf labels always extend outward, inner labels point back in.
            (_, true) => node.radius + config.label_offset + node.label.width,
            _ => node.radius + config.node_radius,
        })
        .fold(0.0f32, f32::max);
    let required = 2.0 * (extent + CANVAS_PAD);

    RadialLayout {
        nodes,
        links,
        max_depth,
        max_radius,
        width: config.width.max(required),
        height: config.height.max(required),
    }
}

/// Converts polar `(angle, radius)` with angle zero at twelve o'clock into
/// cartesian coordinates.
pub fn point_radial(angle: f32, radius: f32) -> (f32, f32) {
    let a = angle - FRAC_PI_2;
    (radius * a.cos(), radius * a.sin())
}

/// The first `max_chars` characters of `name`.
pub fn truncate_label(name: &str, max_chars: usize) -> String {
    name.chars().take(max_chars).collect()
}

fn place_label(point: &TidyPoint<'_>, theme: &Theme, config: &LayoutConfig) -> LabelLayout {
    let text = truncate_label(&point.node.name, config.label_max_chars);
    let font_size = config.font_size(point.depth);
    let width = text_metrics::label_width(
        &text,
        font_size,
        &theme.font_family,
        config.fast_text_metrics,
    );
    let (anchor, x, rotate) = if point.depth == 0 {
        (TextAnchor::Middle, 0.0, Some(-90.0))
    } else {
        let is_leaf = point.children.is_empty();
        // Leaves read outward, inner nodes inward; the far half is flipped.
        let outward = (point.x < PI) == is_leaf;
        let (anchor, x) = if outward {
            (TextAnchor::Start, config.label_offset)
        } else {
            (TextAnchor::End, -config.label_offset)
        };
        (anchor, x, (point.x >= PI).then_some(180.0))
    };
    LabelLayout {
        text,
        anchor,
        x,
        rotate,
        font_size,
        hover_font_size: config.hover_font_size(point.depth),
        width,
    }
}

fn radial_link(source: &NodeLayout, target: &NodeLayout) -> LinkLayout {
    let mid = (source.radius + target.radius) / 2.0;
    LinkLayout {
        source: source.index,
        target: target.index,
        start: point_radial(source.angle, source.radius),
        control1: point_radial(source.angle, mid),
        control2: point_radial(target.angle, mid),
        end: point_radial(target.angle, target.radius),
        color: target.color.clone(),
    }
}
