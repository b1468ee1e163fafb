//! Self-contained interactive HTML page holding both precomputed trees.

use crate::config::Config;
use crate::interaction::{EntranceAnimation, TOOLTIP_CLASS_LABEL, TOOLTIP_TITLE_LABEL};
use crate::layout::compute_layout;
use crate::render::{SvgOptions, escape_xml, render_svg_with_options};
use crate::viewer::ViewerState;
use serde::Serialize;

const WITH_SUBTITLES_ID: &str = "tree-with-subtitles";
const WITHOUT_SUBTITLES_ID: &str = "tree-without-subtitles";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScriptConfig<'a> {
    show_subtitles: bool,
    toggle_id: &'a str,
    show_label: &'a str,
    hide_label: &'a str,
    frame_name: &'a str,
    target_origin: &'a str,
    tooltip_offset: f32,
    class_label: &'a str,
    title_label: &'a str,
    with_subtitles_id: &'a str,
    without_subtitles_id: &'a str,
    animation: EntranceAnimation,
}

const PAGE_SCRIPT: &str = r#"(() => {
  const cfg = __CONFIG__;
  let showSubtitles = cfg.showSubtitles;
  const surface = document.getElementById("surface");
  const toggle = document.getElementById(cfg.toggleId);
  const tooltip = document.getElementById("tooltip");
  const escapeHtml = (s) => s.replace(/[&<>"']/g, (c) => ({"&": "&amp;", "<": "&lt;", ">": "&gt;", "\"": "&quot;", "'": "&#39;"}[c]));
  const labelOf = (event) => event.target.closest ? event.target.closest(".node-label") : null;

  function draw() {
    const source = document.getElementById(showSubtitles ? cfg.withSubtitlesId : cfg.withoutSubtitlesId);
    surface.replaceChildren(source.content.cloneNode(true));
    toggle.textContent = showSubtitles ? cfg.hideLabel : cfg.showLabel;
    requestAnimationFrame(() => requestAnimationFrame(() => {
      surface.querySelectorAll(".node-text").forEach((el) => { el.style.opacity = cfg.animation.labelOpacity; });
      surface.querySelectorAll(".node-dot").forEach((el) => { el.style.opacity = cfg.animation.nodeOpacity; });
    }));
  }

  surface.addEventListener("mouseover", (event) => {
    const label = labelOf(event);
    if (!label) return;
    tooltip.innerHTML = `<strong>${cfg.classLabel}</strong> ${escapeHtml(label.dataset.class)}<br><strong>${cfg.titleLabel}</strong> ${escapeHtml(label.dataset.name)}`;
    tooltip.style.visibility = "visible";
    tooltip.style.top = (event.pageY + cfg.tooltipOffset) + "px";
    tooltip.style.left = (event.pageX + cfg.tooltipOffset) + "px";
    label.style.fontSize = label.dataset.hoverSize + "px";
    label.style.textDecoration = "underline";
  });

  surface.addEventListener("mouseout", (event) => {
    const label = labelOf(event);
    if (!label) return;
    label.style.fontSize = label.dataset.size + "px";
    label.style.textDecoration = "none";
    tooltip.style.visibility = "hidden";
  });

  surface.addEventListener("click", (event) => {
    const label = labelOf(event);
    if (!label) return;
    console.log(label.dataset.name);
    const frame = window.parent.frames[cfg.frameName];
    if (frame) {
      frame.postMessage(label.dataset.name, cfg.targetOrigin);
    } else {
      console.warn(`frame "${cfg.frameName}" not found`);
    }
  });

  toggle.addEventListener("click", () => {
    showSubtitles = !showSubtitles;
    draw();
  });

  draw();
})();"#;

/// Renders the page. Both trees are laid out and serialised up front; the
/// toggle swaps which one is drawn without rebuilding anything.
pub fn render_page(state: &ViewerState, config: &Config) -> anyhow::Result<String> {
    let theme = &config.theme;
    let animation = EntranceAnimation::new(&config.page, &config.layout);

    let tree_svg = |with_subtitles: bool, id: &str| {
        let layout = compute_layout(state.tree(with_subtitles), theme, &config.layout);
        render_svg_with_options(
            &layout,
            theme,
            &config.layout,
            &SvgOptions {
                animated: true,
                id: Some(format!("{id}-svg")),
            },
        )
    };
    let without_svg = tree_svg(false, WITHOUT_SUBTITLES_ID);
    let with_svg = tree_svg(true, WITH_SUBTITLES_ID);

    let script_config = ScriptConfig {
        show_subtitles: state.show_subtitles(),
        toggle_id: &config.page.toggle_id,
        show_label: &config.page.show_label,
        hide_label: &config.page.hide_label,
        frame_name: &config.page.frame_name,
        target_origin: &config.page.target_origin,
        tooltip_offset: config.page.tooltip_offset,
        class_label: TOOLTIP_CLASS_LABEL,
        title_label: TOOLTIP_TITLE_LABEL,
        with_subtitles_id: WITH_SUBTITLES_ID,
        without_subtitles_id: WITHOUT_SUBTITLES_ID,
        animation,
    };
    // Keep `</script>` inside string values from closing the element.
    let config_json = serde_json::to_string(&script_config)?.replace("</", "<\\/");
    let script = PAGE_SCRIPT.replace("__CONFIG__", &config_json);

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_xml(&config.page.title)));
    html.push_str("<style>\n");
    html.push_str(&format!(
        "body {{ margin: 0; background: {}; font-family: {}; }}\n",
        css_value(&theme.background),
        css_value(&theme.font_family)
    ));
    html.push_str("#controls { padding: 8px; }\n");
    html.push_str(&format!(
        ".node-text, .node-dot {{ transition: opacity {}ms; }}\n",
        animation.duration_ms
    ));
    html.push_str(&format!(
        "#tooltip {{ position: absolute; visibility: hidden; pointer-events: none; background: {}; border: 1px solid {}; border-radius: 5px; padding: 8px; font-size: {}px; color: {}; }}\n",
        css_value(&theme.tooltip_background),
        css_value(&theme.tooltip_border),
        theme.tooltip_font_size,
        css_value(&theme.tooltip_text_color)
    ));
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str(&format!(
        "<div id=\"controls\"><button id=\"{}\">{}</button></div>\n",
        escape_xml(&config.page.toggle_id),
        escape_xml(state.toggle_label(&config.page))
    ));
    html.push_str("<div id=\"surface\"></div>\n<div id=\"tooltip\"></div>\n");
    html.push_str(&format!(
        "<template id=\"{WITHOUT_SUBTITLES_ID}\">{without_svg}</template>\n"
    ));
    html.push_str(&format!(
        "<template id=\"{WITH_SUBTITLES_ID}\">{with_svg}</template>\n"
    ));
    html.push_str(&format!("<script>\n{script}\n</script>\n"));
    html.push_str("</body>\n</html>\n");
    Ok(html)
}

/// Theme text placed inside `<style>`; drops characters that could end the
/// declaration, the rule or the element.
fn css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '{' | '}' | ';'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Record;

    fn config() -> Config {
        let mut config = Config::default();
        config.layout.fast_text_metrics = true;
        config
    }

    fn state(config: &Config) -> ViewerState {
        let records = vec![
            Record::new("攻略", "Guide", Some("Only in subtitle mode")),
            Record::new("新闻", "</script><b>", None),
        ];
        ViewerState::from_records(&records, config)
    }

    #[test]
    fn page_embeds_both_trees_and_toggle() {
        let config = config();
        let html = render_page(&state(&config), &config).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<template id=\"tree-without-subtitles\"><svg"));
        assert!(html.contains("<template id=\"tree-with-subtitles\"><svg"));
        assert!(html.contains("<button id=\"toggle-subtitles\">Show Subtitles</button>"));
        // Halo, label and data-name, only in the subtitle tree.
        assert_eq!(html.matches("Only in subtitl").count(), 3);
        assert!(html.contains("transition: opacity 800ms"));
    }

    #[test]
    fn script_carries_frame_target() {
        let config = config();
        let html = render_page(&state(&config), &config).unwrap();
        assert!(html.contains("\"frameName\":\"firstIframe\""));
        assert!(html.contains("\"targetOrigin\":\"http://127.0.0.1:5000\""));
        assert!(html.contains("\"nodeOpacity\":0.3"));
        assert!(!html.contains("__CONFIG__"));
    }

    #[test]
    fn user_text_cannot_close_the_script() {
        let config = config();
        let html = render_page(&state(&config), &config).unwrap();
        assert_eq!(html.matches("</script>").count(), 1);
        assert!(html.contains("&lt;/script&gt;"));
    }

    #[test]
    fn theme_text_cannot_close_the_style_block() {
        let mut config = config();
        config.theme.font_family = "x}</style><script>alert(1)</script>".to_string();
        let html = render_page(&state(&config), &config).unwrap();
        assert_eq!(html.matches("</style>").count(), 1);
        assert_eq!(html.matches("<script>").count(), 1);
        assert_eq!(css_value("\"Noto Sans\", serif"), "\"Noto Sans\", serif");
    }

    #[test]
    fn initial_label_reflects_subtitle_mode() {
        let mut config = config();
        config.page.show_subtitles = true;
        let html = render_page(&state(&config), &config).unwrap();
        assert!(html.contains(">Hide Subtitles</button>"));
        assert!(html.contains("\"showSubtitles\":true"));
    }
}
