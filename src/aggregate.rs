use crate::config::AggregateConfig;
use crate::ir::{Record, TreeNode};
use std::collections::HashMap;

/// Counters describing what the caps discarded during one aggregation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub records: usize,
    pub classes: usize,
    pub titles: usize,
    pub subtitles: usize,
    /// Records skipped because their class already held the maximum number of titles.
    pub capped_records: usize,
    /// Distinct subtitles refused because their title was full.
    pub capped_subtitles: usize,
}

struct ClassEntry {
    name: String,
    titles: Vec<TreeNode>,
}

pub fn aggregate(records: &[Record], include_subtitles: bool, config: &AggregateConfig) -> Vec<TreeNode> {
    aggregate_with_stats(records, include_subtitles, config).0
}

/// Groups records into class → title (→ subtitle) nodes in first-seen order.
///
/// The title cap is checked before the title lookup: once a class is full,
/// every later record for it is dropped, including subtitles that would have
/// gone to titles admitted earlier.
pub fn aggregate_with_stats(
    records: &[Record],
    include_subtitles: bool,
    config: &AggregateConfig,
) -> (Vec<TreeNode>, AggregateStats) {
    let mut stats = AggregateStats {
        records: records.len(),
        ..Default::default()
    };
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut classes: Vec<ClassEntry> = Vec::new();

    for record in records {
        let slot = *index.entry(record.class.as_str()).or_insert_with(|| {
            classes.push(ClassEntry {
                name: record.class.clone(),
                titles: Vec::new(),
            });
            classes.len() - 1
        });
        let entry = &mut classes[slot];

        if entry.titles.len() >= config.max_titles_per_class {
            stats.capped_records += 1;
            continue;
        }

        let subtitle = if include_subtitles { record.subtitle() } else { None };

        match entry.titles.iter_mut().find(|t| t.name == record.title) {
            Some(title) => {
                let Some(subtitle) = subtitle else {
                    continue;
                };
                let existing = title.children();
                if existing.iter().any(|c| c.name == subtitle) {
                    continue;
                }
                if existing.len() >= config.max_subtitles {
                    stats.capped_subtitles += 1;
                    continue;
                }
                // A title first seen without a subtitle has no child list yet.
                title
                    .children
                    .get_or_insert_with(Vec::new)
                    .push(TreeNode::leaf(subtitle));
            }
            None => {
                let node = match subtitle {
                    Some(subtitle) => {
                        TreeNode::with_children(&record.title, vec![TreeNode::leaf(subtitle)])
                    }
                    None => TreeNode::leaf(&record.title),
                };
                entry.titles.push(node);
            }
        }
    }

    stats.classes = classes.len();
    let nodes: Vec<TreeNode> = classes
        .into_iter()
        .map(|entry| {
            stats.titles += entry.titles.len();
            stats.subtitles += entry.titles.iter().map(|t| t.children().len()).sum::<usize>();
            TreeNode::with_children(&entry.name, entry.titles)
        })
        .collect();

    (nodes, stats)
}

/// Aggregates and wraps the class nodes under the synthetic root.
pub fn build_tree(
    records: &[Record],
    include_subtitles: bool,
    config: &AggregateConfig,
    root_label: &str,
) -> TreeNode {
    let (children, stats) = aggregate_with_stats(records, include_subtitles, config);
    log::debug!(
        "aggregated {} records (subtitles: {include_subtitles}): {} classes, {} titles, {} subtitles, {} capped records, {} capped subtitles",
        stats.records,
        stats.classes,
        stats.titles,
        stats.subtitles,
        stats.capped_records,
        stats.capped_subtitles,
    );
    TreeNode::with_children(root_label, children)
}
