use radial_tree_renderer::{Config, Theme, render_page_from_json, render_svg_from_json};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RadialRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    show_subtitles: Option<bool>,
    fast_text: Option<bool>,
    target_origin: Option<String>,
}

fn build_config(options: RadialRenderOptions) -> Config {
    let mut config = Config::default();
    if options.theme.as_deref() == Some("modern") {
        config.theme = Theme::modern();
    }
    if let Some(font_family) = options.font_family {
        config.theme.font_family = font_family;
    }
    if let Some(show_subtitles) = options.show_subtitles {
        config.page.show_subtitles = show_subtitles;
    }
    // No system fonts to measure against inside the browser sandbox.
    config.layout.fast_text_metrics = options.fast_text.unwrap_or(true);
    if let Some(origin) = options.target_origin {
        config.page.target_origin = origin;
    }
    config
}

fn parse_options(options_json: Option<String>) -> Result<RadialRenderOptions, JsValue> {
    match options_json {
        Some(raw) => serde_json::from_str::<RadialRenderOptions>(&raw)
            .map_err(|error| JsValue::from_str(&error.to_string())),
        None => Ok(RadialRenderOptions::default()),
    }
}

#[wasm_bindgen]
pub fn render_radial_page(dataset: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let config = build_config(parse_options(options_json)?);
    render_page_from_json(dataset, &config).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[wasm_bindgen]
pub fn render_radial_svg(
    dataset: &str,
    with_subtitles: bool,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let config = build_config(parse_options(options_json)?);
    render_svg_from_json(dataset, &config, with_subtitles)
        .map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use radial_tree_renderer::{render_page_from_json, render_svg_from_json};

    use crate::{RadialRenderOptions, build_config};

    const DATASET: &str = r#"[
        {"class": "攻略", "title": "Boss guide", "subtitle": "Phase 1"},
        {"class": "攻略", "title": "Boss guide", "subtitle": "Phase 2"},
        {"class": "下载", "title": "Client"}
    ]"#;

    #[test]
    fn renders_page_with_default_options() {
        let html = render_page_from_json(DATASET, &build_config(RadialRenderOptions::default()))
            .expect("dataset should render");
        assert!(html.contains("<template id=\"tree-with-subtitles\">"));
        assert!(html.contains("Boss guide"));
    }

    #[test]
    fn options_select_theme_and_mode() {
        let options: RadialRenderOptions =
            serde_json::from_str(r#"{"theme":"modern","showSubtitles":true,"fontFamily":"Noto Sans"}"#)
                .unwrap();
        let config = build_config(options);
        assert!(config.page.show_subtitles);
        assert_eq!(config.theme.font_family, "Noto Sans");
        assert!(config.layout.fast_text_metrics);

        let svg = render_svg_from_json(DATASET, &config, true).unwrap();
        assert!(svg.contains("Phase 2"));
    }
}
