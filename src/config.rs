use crate::ir::DEFAULT_ROOT_LABEL;
use crate::theme::Theme;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

static COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(#[0-9a-fA-F]{3,8}|[a-zA-Z]+|(rgb|rgba|hsl|hsla)\([0-9.,%\s]+\))$").unwrap()
});

static FONT_FAMILY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^[\w\s,"'.\-]+$"#).unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateConfig {
    pub max_titles_per_class: usize,
    pub max_subtitles: usize,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            max_titles_per_class: 70,
            max_subtitles: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub width: f32,
    pub height: f32,
    /// Gap between the outermost ring and the canvas edge.
    pub margin: f32,
    pub label_max_chars: usize,
    pub label_offset: f32,
    pub root_font_size: f32,
    pub class_font_size: f32,
    pub leaf_font_size: f32,
    pub hover_leaf_font_size: f32,
    pub node_radius: f32,
    pub node_opacity: f32,
    pub link_stroke_width: f32,
    pub link_opacity: f32,
    pub sibling_separation: f32,
    pub subtree_separation: f32,
    pub fast_text_metrics: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
            margin: 120.0,
            label_max_chars: 15,
            label_offset: 6.0,
            root_font_size: 25.0,
            class_font_size: 12.0,
            leaf_font_size: 5.0,
            hover_leaf_font_size: 7.0,
            node_radius: 5.0,
            node_opacity: 0.3,
            link_stroke_width: 1.5,
            link_opacity: 0.4,
            sibling_separation: 1.0,
            subtree_separation: 2.0,
            fast_text_metrics: false,
        }
    }
}

impl LayoutConfig {
    pub fn max_radius(&self) -> f32 {
        (self.width.min(self.height) / 2.0 - self.margin).max(0.0)
    }

    pub fn font_size(&self, depth: usize) -> f32 {
        match depth {
            0 => self.root_font_size,
            1 => self.class_font_size,
            _ => self.leaf_font_size,
        }
    }

    pub fn hover_font_size(&self, depth: usize) -> f32 {
        match depth {
            0 | 1 => self.font_size(depth),
            _ => self.hover_leaf_font_size,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub title: String,
    pub root_label: String,
    pub frame_name: String,
    pub target_origin: String,
    pub toggle_id: String,
    pub show_label: String,
    pub hide_label: String,
    pub animation_ms: u32,
    pub tooltip_offset: f32,
    pub show_subtitles: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Radial Tidy Tree".to_string(),
            root_label: DEFAULT_ROOT_LABEL.to_string(),
            frame_name: "firstIframe".to_string(),
            target_origin: "http://127.0.0.1:5000".to_string(),
            toggle_id: "toggle-subtitles".to_string(),
            show_label: "Show Subtitles".to_string(),
            hide_label: "Hide Subtitles".to_string(),
            animation_ms: 800,
            tooltip_offset: 15.0,
            show_subtitles: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub aggregate: AggregateConfig,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub page: PageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::classic(),
            aggregate: AggregateConfig::default(),
            layout: LayoutConfig::default(),
            render: RenderConfig::default(),
            page: PageConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    background: Option<String>,
    class_colors: Option<BTreeMap<String, String>>,
    default_class_color: Option<String>,
    label_halo_color: Option<String>,
    tooltip_background: Option<String>,
    tooltip_border: Option<String>,
    tooltip_text_color: Option<String>,
    tooltip_font_size: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregateConfigFile {
    max_titles_per_class: Option<usize>,
    max_subtitles: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    margin: Option<f32>,
    label_max_chars: Option<usize>,
    label_offset: Option<f32>,
    root_font_size: Option<f32>,
    class_font_size: Option<f32>,
    leaf_font_size: Option<f32>,
    hover_leaf_font_size: Option<f32>,
    node_radius: Option<f32>,
    node_opacity: Option<f32>,
    link_stroke_width: Option<f32>,
    link_opacity: Option<f32>,
    fast_text_metrics: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageConfigFile {
    title: Option<String>,
    root_label: Option<String>,
    frame_name: Option<String>,
    target_origin: Option<String>,
    toggle_id: Option<String>,
    show_label: Option<String>,
    hide_label: Option<String>,
    animation_ms: Option<u32>,
    tooltip_offset: Option<f32>,
    show_subtitles: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    aggregate: Option<AggregateConfigFile>,
    layout: Option<LayoutConfigFile>,
    page: Option<PageConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "classic" | "default" | "base" => config.theme = Theme::classic(),
            other => log::warn!("unknown theme \"{other}\", keeping the default palette"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family.and_then(checked_font_family) {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.background.and_then(|v| checked_color("background", v)) {
            config.theme.background = v;
        }
        if let Some(colors) = vars.class_colors {
            for (class, color) in colors {
                if let Some(color) = checked_color(&class, color) {
                    config.theme.class_colors.insert(class, color);
                }
            }
        }
        if let Some(v) = vars
            .default_class_color
            .and_then(|v| checked_color("defaultClassColor", v))
        {
            config.theme.default_class_color = v;
        }
        if let Some(v) = vars
            .label_halo_color
            .and_then(|v| checked_color("labelHaloColor", v))
        {
            config.theme.label_halo_color = v;
        }
        if let Some(v) = vars
            .tooltip_background
            .and_then(|v| checked_color("tooltipBackground", v))
        {
            config.theme.tooltip_background = v;
        }
        if let Some(v) = vars
            .tooltip_border
            .and_then(|v| checked_color("tooltipBorder", v))
        {
            config.theme.tooltip_border = v;
        }
        if let Some(v) = vars
            .tooltip_text_color
            .and_then(|v| checked_color("tooltipTextColor", v))
        {
            config.theme.tooltip_text_color = v;
        }
        if let Some(v) = vars.tooltip_font_size {
            config.theme.tooltip_font_size = v;
        }
    }

    if let Some(aggregate) = parsed.aggregate {
        if let Some(v) = aggregate.max_titles_per_class {
            config.aggregate.max_titles_per_class = v;
        }
        if let Some(v) = aggregate.max_subtitles {
            config.aggregate.max_subtitles = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.width {
            config.layout.width = v;
        }
        if let Some(v) = layout.height {
            config.layout.height = v;
        }
        if let Some(v) = layout.margin {
            config.layout.margin = v;
        }
        if let Some(v) = layout.label_max_chars {
            config.layout.label_max_chars = v;
        }
        if let Some(v) = layout.label_offset {
            config.layout.label_offset = v;
        }
        if let Some(v) = layout.root_font_size {
            config.layout.root_font_size = v;
        }
        if let Some(v) = layout.class_font_size {
            config.layout.class_font_size = v;
        }
        if let Some(v) = layout.leaf_font_size {
            config.layout.leaf_font_size = v;
        }
        if let Some(v) = layout.hover_leaf_font_size {
            config.layout.hover_leaf_font_size = v;
        }
        if let Some(v) = layout.node_radius {
            config.layout.node_radius = v;
        }
        if let Some(v) = layout.node_opacity {
            config.layout.node_opacity = v.clamp(0.0, 1.0);
        }
        if let Some(v) = layout.link_stroke_width {
            config.layout.link_stroke_width = v;
        }
        if let Some(v) = layout.link_opacity {
            config.layout.link_opacity = v.clamp(0.0, 1.0);
        }
        if let Some(v) = layout.fast_text_metrics {
            config.layout.fast_text_metrics = v;
        }
    }

    if let Some(page) = parsed.page {
        if let Some(v) = page.title {
            config.page.title = v;
        }
        if let Some(v) = page.root_label {
            config.page.root_label = v;
        }
        if let Some(v) = page.frame_name {
            config.page.frame_name = v;
        }
        if let Some(v) = page.target_origin {
            config.page.target_origin = v;
        }
        if let Some(v) = page.toggle_id {
            config.page.toggle_id = v;
        }
        if let Some(v) = page.show_label {
            config.page.show_label = v;
        }
        if let Some(v) = page.hide_label {
            config.page.hide_label = v;
        }
        if let Some(v) = page.animation_ms {
            config.page.animation_ms = v;
        }
        if let Some(v) = page.tooltip_offset {
            config.page.tooltip_offset = v;
        }
        if let Some(v) = page.show_subtitles {
            config.page.show_subtitles = v;
        }
    }

    config.render.width = config.layout.width;
    config.render.height = config.layout.height;

    Ok(config)
}

fn checked_color(key: &str, value: String) -> Option<String> {
    let trimmed = value.trim();
    if COLOR_RE.is_match(trimmed) {
        Some(trimmed.to_string())
    } else {
        log::warn!("ignoring invalid colour {value:?} for {key}");
        None
    }
}

fn checked_font_family(value: String) -> Option<String> {
    let trimmed = value.trim();
    if FONT_FAMILY_RE.is_match(trimmed) {
        Some(trimmed.to_string())
    } else {
        log::warn!("ignoring invalid font family {value:?}");
        None
    }
}
