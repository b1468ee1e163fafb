use serde::{Deserialize, Serialize};

pub const DEFAULT_ROOT_LABEL: &str = "🐒";

/// Key used for records whose class or title is missing, mirroring how the
/// dataset groups such entries.
pub const MISSING_KEY: &str = "undefined";

/// One flat row of the input taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub class: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

impl Record {
    pub fn new(class: &str, title: &str, subtitle: Option<&str>) -> Self {
        Self {
            class: class.to_string(),
            title: title.to_string(),
            subtitle: subtitle.map(str::to_string),
        }
    }

    /// The subtitle, if present and non-empty.
    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    pub fn leaf(name: &str) -> Self {
        Self {
            name: name.to_string(),
            children: None,
        }
    }

    pub fn with_children(name: &str, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.to_string(),
            children: Some(children),
        }
    }

    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    pub fn find_child(&self, name: &str) -> Option<&TreeNode> {
        self.children().iter().find(|child| child.name == name)
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        self.children()
            .iter()
            .map(|child| child.height() + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(TreeNode::node_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_subtitle_reads_as_absent() {
        let record = Record::new("A", "T", Some(""));
        assert_eq!(record.subtitle(), None);
        let record = Record::new("A", "T", Some("S"));
        assert_eq!(record.subtitle(), Some("S"));
    }

    #[test]
    fn tree_height_and_count() {
        let tree = TreeNode::with_children(
            "root",
            vec![
                TreeNode::with_children("a", vec![TreeNode::leaf("a1")]),
                TreeNode::leaf("b"),
            ],
        );
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.node_count(), 4);
        assert!(tree.find_child("b").is_some_and(TreeNode::is_leaf));
    }

    #[test]
    fn leaf_serializes_without_children_field() {
        let json = serde_json::to_string(&TreeNode::leaf("x")).unwrap();
        assert_eq!(json, r#"{"name":"x"}"#);
    }
}
