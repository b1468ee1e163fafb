use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// Label geometry in the node's rotated frame.
#[derive(Debug, Clone, Serialize)]
pub struct LabelLayout {
    pub text: String,
    pub anchor: TextAnchor,
    /// Offset along the node's radial axis.
    pub x: f32,
    /// Extra rotation applied to the label, in degrees.
    pub rotate: Option<f32>,
    pub font_size: f32,
    pub hover_font_size: f32,
    pub width: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeLayout {
    pub index: usize,
    pub name: String,
    pub depth: usize,
    /// Angular position in radians, `[0, 2π)`, clockwise from twelve o'clock.
    pub angle: f32,
    pub radius: f32,
    /// Cartesian position relative to the centre.
    pub x: f32,
    pub y: f32,
    pub parent: Option<usize>,
    /// Index of the depth-1 ancestor (the node itself at depth 1).
    pub class_index: Option<usize>,
    pub is_leaf: bool,
    pub color: String,
    pub label: LabelLayout,
}

impl NodeLayout {
    pub fn rotation_degrees(&self) -> f32 {
        self.angle.to_degrees() - 90.0
    }
}

/// Radial cubic link between a node and its parent.
#[derive(Debug, Clone, Serialize)]
pub struct LinkLayout {
    pub source: usize,
    pub target: usize,
    pub start: (f32, f32),
    pub control1: (f32, f32),
    pub control2: (f32, f32),
    pub end: (f32, f32),
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RadialLayout {
    pub nodes: Vec<NodeLayout>,
    pub links: Vec<LinkLayout>,
    pub max_depth: usize,
    pub max_radius: f32,
    pub width: f32,
    pub height: f32,
}

impl RadialLayout {
    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn root(&self) -> Option<&NodeLayout> {
        self.nodes.first()
    }

    pub fn class_name(&self, node: &NodeLayout) -> Option<&str> {
        node.class_index
            .and_then(|idx| self.nodes.get(idx))
            .map(|class| class.name.as_str())
    }

    /// Ancestors of `index`, nearest first, root last.
    pub fn ancestors(&self, index: usize) -> Vec<&NodeLayout> {
        let mut chain = Vec::new();
        let mut current = self.nodes.get(index).and_then(|node| node.parent);
        while let Some(idx) = current {
            let Some(node) = self.nodes.get(idx) else {
                break;
            };
            chain.push(node);
            current = node.parent;
        }
        chain
    }
}
