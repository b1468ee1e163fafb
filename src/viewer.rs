use crate::aggregate::build_tree;
use crate::config::{Config, PageConfig};
use crate::interaction::{InteractionHandler, PointerEvent, dispatch};
use crate::ir::{Record, TreeNode};
use crate::layout::{RadialLayout, compute_layout};
use crate::render::render_svg;

/// Both precomputed trees plus the display flag. The trees never change
/// after construction; only [`ViewerState::toggle`] flips the flag.
#[derive(Debug, Clone)]
pub struct ViewerState {
    with_subtitles: TreeNode,
    without_subtitles: TreeNode,
    show_subtitles: bool,
}

impl ViewerState {
    pub fn new(with_subtitles: TreeNode, without_subtitles: TreeNode, show_subtitles: bool) -> Self {
        Self {
            with_subtitles,
            without_subtitles,
            show_subtitles,
        }
    }

    pub fn from_records(records: &[Record], config: &Config) -> Self {
        let root = config.page.root_label.as_str();
        Self::new(
            build_tree(records, true, &config.aggregate, root),
            build_tree(records, false, &config.aggregate, root),
            config.page.show_subtitles,
        )
    }

    pub fn show_subtitles(&self) -> bool {
        self.show_subtitles
    }

    pub fn tree(&self, with_subtitles: bool) -> &TreeNode {
        if with_subtitles {
            &self.with_subtitles
        } else {
            &self.without_subtitles
        }
    }

    pub fn current(&self) -> &TreeNode {
        self.tree(self.show_subtitles)
    }

    /// Flips the display mode and returns the tree now selected.
    pub fn toggle(&mut self) -> &TreeNode {
        self.show_subtitles = !self.show_subtitles;
        self.current()
    }

    pub fn toggle_label<'a>(&self, page: &'a PageConfig) -> &'a str {
        if self.show_subtitles {
            &page.hide_label
        } else {
            &page.show_label
        }
    }
}

/// In-process viewer: the state container plus the layout currently drawn.
pub struct Viewer {
    state: ViewerState,
    config: Config,
    layout: RadialLayout,
}

impl Viewer {
    pub fn new(state: ViewerState, config: Config) -> Self {
        let layout = compute_layout(state.current(), &config.theme, &config.layout);
        Self {
            state,
            config,
            layout,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn layout(&self) -> &RadialLayout {
        &self.layout
    }

    /// Switches trees and replaces the drawn layout.
    pub fn toggle(&mut self) -> &RadialLayout {
        let tree = self.state.toggle();
        self.layout = compute_layout(tree, &self.config.theme, &self.config.layout);
        log::debug!(
            "toggled subtitles {} ({} nodes)",
            if self.state.show_subtitles() { "on" } else { "off" },
            self.layout.nodes.len()
        );
        &self.layout
    }

    pub fn toggle_label(&self) -> &str {
        self.state.toggle_label(&self.config.page)
    }

    pub fn svg(&self) -> String {
        render_svg(&self.layout, &self.config.theme, &self.config.layout)
    }

    pub fn handle(&self, event: PointerEvent, handler: &mut dyn InteractionHandler) {
        dispatch(&self.layout, &self.config.page, event, handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::{FrameMessage, LabelStyle, NodeContext, Tooltip};

    fn records() -> Vec<Record> {
        vec![
            Record::new("攻略", "Guide", Some("Part 1")),
            Record::new("攻略", "Guide", Some("Part 2")),
            Record::new("下载", "Client", None),
        ]
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.layout.fast_text_metrics = true;
        config
    }

    #[test]
    fn starts_without_subtitles() {
        let state = ViewerState::from_records(&records(), &config());
        assert!(!state.show_subtitles());
        assert_eq!(state.current().height(), 2);
        assert_eq!(state.toggle_label(&PageConfig::default()), "Show Subtitles");
    }

    #[test]
    fn toggle_twice_round_trips() {
        let mut state = ViewerState::from_records(&records(), &config());
        let original = state.current().clone();
        let toggled = state.toggle().clone();
        assert_eq!(toggled.height(), 3);
        assert_eq!(state.toggle_label(&PageConfig::default()), "Hide Subtitles");
        assert_eq!(state.toggle(), &original);
    }

    #[test]
    fn viewer_redraws_from_precomputed_trees() {
        let mut viewer = Viewer::new(ViewerState::from_records(&records(), &config()), config());
        let first_svg = viewer.svg();
        let before = viewer.layout().nodes.len();
        assert_eq!(viewer.toggle().nodes.len(), before + 2);
        assert_eq!(viewer.toggle_label(), "Hide Subtitles");
        viewer.toggle();
        assert_eq!(viewer.svg(), first_svg);
    }

    #[test]
    fn viewer_routes_clicks_to_handler() {
        struct Clicks(Vec<String>);
        impl InteractionHandler for Clicks {
            fn show_tooltip(&mut self, _: &NodeContext<'_>, _: &Tooltip, _: LabelStyle) {}
            fn hide_tooltip(&mut self, _: &NodeContext<'_>, _: LabelStyle) {}
            fn post_message(&mut self, _: &NodeContext<'_>, message: &FrameMessage) {
                self.0.push(message.payload.clone());
            }
        }

        let viewer = Viewer::new(ViewerState::from_records(&records(), &config()), config());
        let index = viewer
            .layout()
            .nodes
            .iter()
            .position(|n| n.name == "Client")
            .unwrap();
        let mut clicks = Clicks(Vec::new());
        viewer.handle(PointerEvent::Click { index }, &mut clicks);
        assert_eq!(clicks.0, vec!["Client"]);
    }
}
