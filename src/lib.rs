pub mod aggregate;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod interaction;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod page;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod theme;
pub mod viewer;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{AggregateConfig, Config, LayoutConfig, PageConfig};
pub use ir::{Record, TreeNode};
pub use layout::{RadialLayout, compute_layout};
pub use page::render_page;
pub use parser::{LoadError, parse_records};
pub use render::render_svg;
pub use theme::Theme;
pub use viewer::{Viewer, ViewerState};

/// Parses a dataset and renders the interactive page.
pub fn render_page_from_json(input: &str, config: &Config) -> anyhow::Result<String> {
    let parsed = parse_records(input)?;
    let state = ViewerState::from_records(&parsed.records, config);
    render_page(&state, config)
}

/// Parses a dataset and renders one of its trees as a static SVG.
pub fn render_svg_from_json(input: &str, config: &Config, with_subtitles: bool) -> anyhow::Result<String> {
    let parsed = parse_records(input)?;
    let state = ViewerState::from_records(&parsed.records, config);
    let layout = compute_layout(state.tree(with_subtitles), &config.theme, &config.layout);
    Ok(render_svg(&layout, &config.theme, &config.layout))
}
