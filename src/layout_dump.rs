use crate::layout::RadialLayout;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub show_subtitles: bool,
    pub width: f32,
    pub height: f32,
    pub max_radius: f32,
    pub max_depth: usize,
    pub nodes: Vec<NodeDump>,
    pub links: Vec<LinkDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub name: String,
    pub class: Option<String>,
    pub depth: usize,
    pub angle_degrees: f32,
    pub radius: f32,
    pub x: f32,
    pub y: f32,
    pub label: String,
    pub anchor: String,
    pub flipped: bool,
    pub color: String,
}

#[derive(Debug, Serialize)]
pub struct LinkDump {
    pub from: String,
    pub to: String,
    pub color: String,
    pub points: Vec<[f32; 2]>,
}

impl LayoutDump {
    pub fn from_layout(layout: &RadialLayout, show_subtitles: bool) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                name: node.name.clone(),
                class: layout.class_name(node).map(str::to_string),
                depth: node.depth,
                angle_degrees: node.angle.to_degrees(),
                radius: node.radius,
                x: node.x,
                y: node.y,
                label: node.label.text.clone(),
                anchor: node.label.anchor.as_str().to_string(),
                flipped: node.label.rotate == Some(180.0),
                color: node.color.clone(),
            })
            .collect();

        let links = layout
            .links
            .iter()
            .map(|link| LinkDump {
                from: layout.nodes[link.source].name.clone(),
                to: layout.nodes[link.target].name.clone(),
                color: link.color.clone(),
                points: [link.start, link.control1, link.control2, link.end]
                    .iter()
                    .map(|(x, y)| [*x, *y])
                    .collect(),
            })
            .collect();

        LayoutDump {
            show_subtitles,
            width: layout.width,
            height: layout.height,
            max_radius: layout.max_radius,
            max_depth: layout.max_depth,
            nodes,
            links,
        }
    }
}

pub fn layout_dump_json(layout: &RadialLayout, show_subtitles: bool) -> anyhow::Result<String> {
    let dump = LayoutDump::from_layout(layout, show_subtitles);
    Ok(serde_json::to_string_pretty(&dump)?)
}

pub fn write_layout_dump(path: &Path, layout: &RadialLayout, show_subtitles: bool) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, show_subtitles);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
