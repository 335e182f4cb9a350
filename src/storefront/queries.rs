/// Fields selected for every level of the commerce category tree.
pub const CATEGORY_TREE_ITEM_FRAGMENT: &str = r#"
  fragment categoryTreeItem on CategoryTreeItem {
    entityId
    name
    path
    description
    productCount
  }
"#;

/// Three levels of categories plus the first page of brands.
pub const SITE_INFO_QUERY_BODY: &str = r#"
  query getSiteInfo {
    site {
      categoryTree {
        ...categoryTreeItem
        children {
          ...categoryTreeItem
          children {
            ...categoryTreeItem
          }
        }
      }
      brands {
        pageInfo {
          startCursor
          endCursor
        }
        edges {
          cursor
          node {
            entityId
            name
            defaultImage {
              urlOriginal
              altText
            }
            pageTitle
            metaDesc
            metaKeywords
            searchKeywords
            path
          }
        }
      }
    }
  }
"#;

/// Default commerce query, fragment included.
pub fn site_info_query() -> String {
    format!("{SITE_INFO_QUERY_BODY}{CATEGORY_TREE_ITEM_FRAGMENT}")
}

/// Flat `{ _id name }` selection over the content backend's category object.
pub fn content_categories_query(object: &str) -> String {
    format!("query {{\n  {object} {{\n    _id\n    name\n  }}\n}}\n")
}
