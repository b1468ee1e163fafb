use crate::config::{LayoutConfig, RenderConfig};
use crate::layout::{LinkLayout, NodeLayout, RadialLayout};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct SvgOptions {
    /// Start labels and circles transparent so the page can fade them in.
    pub animated: bool,
    pub id: Option<String>,
}

pub fn render_svg(layout: &RadialLayout, theme: &Theme, config: &LayoutConfig) -> String {
    render_svg_with_options(layout, theme, config, &SvgOptions::default())
}

pub fn render_svg_with_options(
    layout: &RadialLayout,
    theme: &Theme,
    config: &LayoutConfig,
    options: &SvgOptions,
) -> String {
    let mut svg = String::new();
    let width = layout.width;
    let height = layout.height;
    let (cx, cy) = layout.center();
    let id_attr = options
        .id
        .as_deref()
        .map(|id| format!(" id=\"{}\"", escape_xml(id)))
        .unwrap_or_default();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\"{id_attr} width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" font-family=\"{}\">",
        escape_xml(&theme.font_family)
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));
    svg.push_str(&format!("<g transform=\"translate({cx:.2},{cy:.2})\">"));

    svg.push_str("<g class=\"links\">");
    for link in &layout.links {
        svg.push_str(&link_svg(link, config));
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"nodes\">");
    for node in &layout.nodes {
        svg.push_str(&node_svg(node, layout, theme, config, options.animated));
    }
    svg.push_str("</g>");

    svg.push_str("</g></svg>");
    svg
}

fn link_svg(link: &LinkLayout, config: &LayoutConfig) -> String {
    format!(
        "<path class=\"link\" d=\"M {:.2} {:.2} C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}\" fill=\"none\" stroke=\"{}\" stroke-opacity=\"{}\" stroke-width=\"{}\"/>",
        link.start.0,
        link.start.1,
        link.control1.0,
        link.control1.1,
        link.control2.0,
        link.control2.1,
        link.end.0,
        link.end.1,
        link.color,
        config.link_opacity,
        config.link_stroke_width
    )
}

fn node_svg(
    node: &NodeLayout,
    layout: &RadialLayout,
    theme: &Theme,
    config: &LayoutConfig,
    animated: bool,
) -> String {
    let mut out = String::new();
    let (circle_opacity, text_opacity) = if animated {
        (0.0, 0.0)
    } else {
        (config.node_opacity, 1.0)
    };

    out.push_str(&format!(
        "<g class=\"node\" transform=\"rotate({:.4}) translate({:.2},0)\">",
        node.rotation_degrees(),
        node.radius
    ));
    out.push_str(&format!(
        "<circle class=\"node-dot\" r=\"{}\" fill=\"{}\" style=\"opacity:{circle_opacity}\"/>",
        config.node_radius, node.color
    ));

    let label = &node.label;
    let transform = label
        .rotate
        .map(|deg| format!(" transform=\"rotate({deg})\""))
        .unwrap_or_default();
    let text = escape_xml(&label.text);
    let common = format!(
        "dy=\"0.31em\" x=\"{}\" text-anchor=\"{}\"{transform} style=\"font-size:{}px;opacity:{text_opacity}\"",
        label.x,
        label.anchor.as_str(),
        label.font_size
    );

    // White halo behind the coloured label.
    out.push_str(&format!(
        "<text class=\"node-text node-halo\" {common} fill=\"none\" stroke=\"{}\" stroke-width=\"3\" stroke-linejoin=\"round\" pointer-events=\"none\">{text}</text>",
        theme.label_halo_color
    ));
    out.push_str(&format!(
        "<text class=\"node-text node-label\" {common} fill=\"{}\" cursor=\"pointer\" data-index=\"{}\" data-name=\"{}\" data-class=\"{}\" data-size=\"{}\" data-hover-size=\"{}\">{text}</text>",
        node.color,
        node.index,
        escape_xml(&node.name),
        escape_xml(layout.class_name(node).unwrap_or("")),
        label.font_size,
        label.hover_font_size
    ));

    out.push_str("</g>");
    out
}

pub fn write_output_text(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &RenderConfig,
    theme: &Theme,
) -> Result<()> {
    let mut opt = usvg::Options {
        font_family: first_font_family(&theme.font_family),
        ..Default::default()
    };
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid render size {}x{}", render_cfg.width, render_cfg.height))?;
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(
    _svg: &str,
    _output: &Path,
    _render_cfg: &RenderConfig,
    _theme: &Theme,
) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

#[cfg(feature = "png")]
fn first_font_family(stack: &str) -> String {
    stack
        .split(',')
        .map(|part| part.trim().trim_matches('"').trim_matches('\''))
        .find(|part| !part.is_empty())
        .unwrap_or("sans-serif")
        .to_string()
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::build_tree;
    use crate::config::AggregateConfig;
    use crate::ir::Record;
    use crate::layout::compute_layout;

    fn layout() -> RadialLayout {
        let records = vec![
            Record::new("攻略", "A & B", Some("S1")),
            Record::new("新闻", "Patch", None),
        ];
        let tree = build_tree(&records, false, &AggregateConfig::default(), "🐒");
        let config = LayoutConfig {
            fast_text_metrics: true,
            ..Default::default()
        };
        compute_layout(&tree, &Theme::classic(), &config)
    }

    #[test]
    fn render_svg_basic() {
        let layout = layout();
        let svg = render_svg(&layout, &Theme::classic(), &LayoutConfig::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("A &amp; B"));
        assert!(svg.contains("data-class=\"攻略\""));
        assert!(svg.contains("stroke=\"#1f77b4\""));
        assert!(svg.contains("translate(500.00,500.00)"));
        assert_eq!(svg.matches("class=\"link\"").count(), layout.links.len());
        assert_eq!(svg.matches("node-dot").count(), layout.nodes.len());
        assert_eq!(svg.matches("node-halo").count(), layout.nodes.len());
    }

    #[test]
    fn static_render_uses_final_opacity() {
        let layout = layout();
        let svg = render_svg(&layout, &Theme::classic(), &LayoutConfig::default());
        assert!(svg.contains("opacity:0.3"));
        assert!(!svg.contains("opacity:0\""));
        let animated = render_svg_with_options(
            &layout,
            &Theme::classic(),
            &LayoutConfig::default(),
            &SvgOptions {
                animated: true,
                id: Some("tree".to_string()),
            },
        );
        assert!(animated.contains("id=\"tree\""));
        assert!(!animated.contains("opacity:0.3"));
    }

    #[test]
    fn render_is_idempotent() {
        let layout = layout();
        let a = render_svg(&layout, &Theme::classic(), &LayoutConfig::default());
        let b = render_svg(&layout, &Theme::classic(), &LayoutConfig::default());
        assert_eq!(a, b);
    }

    #[test]
    fn escape_xml_handles_quotes() {
        assert_eq!(escape_xml("<a href='x'>\"&\""), "&lt;a href=&apos;x&apos;&gt;&quot;&amp;&quot;");
    }
}
