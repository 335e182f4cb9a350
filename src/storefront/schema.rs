//! Wire shapes for both backends and the aggregated result.
//!
//! The `Raw*` types mirror the commerce response with every field optional:
//! a caller-supplied query may select any subset of the default one.

use serde::{Deserialize, Deserializer, Serialize};

/// Depth of the category tree requested from commerce (root, children, grandchildren).
pub const MAX_CATEGORY_DEPTH: usize = 3;

/// One node of the navigation tree handed to callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTreeNode {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_count: Option<i64>,
    #[serde(default)]
    pub children: Vec<CategoryTreeNode>,
}

impl CategoryTreeNode {
    pub fn leaf(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Number of levels below and including this node.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(|c| c.depth()).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandImage {
    #[serde(default)]
    pub url_original: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
}

/// A brand as selected by the default query. Missing scalars fall back to
/// their defaults so that partial custom selections still decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandNode {
    pub entity_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_image: Option<BrandImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_keywords: Option<String>,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub start_cursor: Option<String>,
    #[serde(default)]
    pub end_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge<T> {
    #[serde(default)]
    pub cursor: Option<String>,
    pub node: Option<T>,
}

/// Cursor-paginated `{ pageInfo, edges }` container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    #[serde(default)]
    pub page_info: Option<PageInfo>,
    pub edges: Option<Vec<Option<Edge<T>>>>,
}

/// Category as returned by commerce. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCategoryNode {
    #[serde(default)]
    pub entity_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub product_count: Option<i64>,
    #[serde(default)]
    pub children: Option<Vec<Option<RawCategoryNode>>>,
}

/// Record of the content backend's category object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCategoryRecord {
    /// Integer ids are kept as their decimal text.
    #[serde(rename = "_id", deserialize_with = "string_or_integer")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

fn string_or_integer<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Signed(n) => n.to_string(),
        RawId::Unsigned(n) => n.to_string(),
    })
}

/// Navigation data handed to callers. Both lists are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteInfoResult<B = BrandNode> {
    pub categories: Vec<CategoryTreeNode>,
    pub brands: Vec<B>,
}

impl<B> Default for SiteInfoResult<B> {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            brands: Vec::new(),
        }
    }
}
