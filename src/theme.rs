use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub background: String,
    /// Class name → link/label/circle colour.
    pub class_colors: BTreeMap<String, String>,
    pub default_class_color: String,
    pub label_halo_color: String,
    pub tooltip_background: String,
    pub tooltip_border: String,
    pub tooltip_text_color: String,
    pub tooltip_font_size: f32,
}

impl Theme {
    /// Category palette used by the taxonomy viewer.
    pub fn classic() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            background: "#FFFFFF".to_string(),
            class_colors: classic_class_colors(),
            default_class_color: "#000".to_string(),
            label_halo_color: "white".to_string(),
            tooltip_background: "#f9f9f9".to_string(),
            tooltip_border: "#ccc".to_string(),
            tooltip_text_color: "#333".to_string(),
            tooltip_font_size: 12.0,
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            background: "#FFFFFF".to_string(),
            class_colors: classic_class_colors(),
            default_class_color: "#1C2430".to_string(),
            label_halo_color: "#FFFFFF".to_string(),
            tooltip_background: "#FFFFFF".to_string(),
            tooltip_border: "#C7D2E5".to_string(),
            tooltip_text_color: "#1C2430".to_string(),
            tooltip_font_size: 12.0,
        }
    }

    pub fn class_color(&self, class_name: Option<&str>) -> &str {
        class_name
            .and_then(|name| self.class_colors.get(name))
            .map(String::as_str)
            .unwrap_or(self.default_class_color.as_str())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

fn classic_class_colors() -> BTreeMap<String, String> {
    [("攻略", "#1f77b4"), ("下载", "#ff7f0e"), ("新闻", "#2ca02c")]
        .into_iter()
        .map(|(name, color)| (name.to_string(), color.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_classes_map_to_palette() {
        let theme = Theme::classic();
        assert_eq!(theme.class_color(Some("攻略")), "#1f77b4");
        assert_eq!(theme.class_color(Some("下载")), "#ff7f0e");
        assert_eq!(theme.class_color(Some("新闻")), "#2ca02c");
    }

    #[test]
    fn unknown_or_missing_class_uses_default() {
        let theme = Theme::classic();
        assert_eq!(theme.class_color(Some("其他")), "#000");
        assert_eq!(theme.class_color(None), "#000");
    }
}
