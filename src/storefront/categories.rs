//! Category tree shaping: content records to tree nodes, commerce tree
//! bounding, and the choice between the two.

use tracing::debug;

use crate::storefront::config::CategorySource;
use crate::storefront::schema::{
    CategoryTreeNode, ContentCategoryRecord, RawCategoryNode, MAX_CATEGORY_DEPTH,
};

/// Convert flat content records into root-level tree nodes.
///
/// No hierarchy is inferred: every record becomes one node with no children,
/// in input order, duplicates kept.
pub fn convert_category_tree(records: Vec<ContentCategoryRecord>) -> Vec<CategoryTreeNode> {
    records
        .into_iter()
        .map(|rec| CategoryTreeNode::leaf(rec.id, rec.name.unwrap_or_default()))
        .collect()
}

/// Normalize a commerce category tree, dropping null entries and anything
/// below `MAX_CATEGORY_DEPTH`.
pub fn bound_category_tree(raw: Option<Vec<Option<RawCategoryNode>>>) -> Vec<CategoryTreeNode> {
    bound_level(raw, 1)
}

fn bound_level(raw: Option<Vec<Option<RawCategoryNode>>>, level: usize) -> Vec<CategoryTreeNode> {
    raw.unwrap_or_default()
        .into_iter()
        .flatten()
        .map(|node| {
            let children = if level < MAX_CATEGORY_DEPTH {
                bound_level(node.children, level + 1)
            } else {
                if node.children.as_ref().is_some_and(|c| !c.is_empty()) {
                    debug!(level, entity_id = ?node.entity_id, "category tree truncated");
                }
                Vec::new()
            };
            CategoryTreeNode {
                id: node.entity_id.map(|id| id.to_string()).unwrap_or_default(),
                name: node.name.unwrap_or_default(),
                path: node.path,
                description: node.description,
                product_count: node.product_count,
                children,
            }
        })
        .collect()
}

/// Pick the tree handed to callers.
///
/// `content` is `None` when the content backend was not queried.
pub fn resolve_categories(
    source: CategorySource,
    commerce: Vec<CategoryTreeNode>,
    content: Option<Vec<CategoryTreeNode>>,
) -> Vec<CategoryTreeNode> {
    match source {
        CategorySource::Content => content.unwrap_or_default(),
        CategorySource::ContentOrCommerce => match content {
            Some(tree) if !tree.is_empty() => tree,
            _ => commerce,
        },
        CategorySource::Commerce => commerce,
    }
}
