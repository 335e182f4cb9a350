use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::storefront::error::Result;
use crate::storefront::schema::{Connection, Edge, PageInfo, RawCategoryNode};
use crate::storefront::transport::{GraphqlRequest, GraphqlTransport};

/// `site` of a commerce response. Anything the query did not select, or
/// that came back in an unexpected shape, is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSiteInfo<B> {
    pub category_tree: Option<Vec<Option<RawCategoryNode>>>,
    pub brands: Option<Connection<B>>,
}

impl<B> Default for RawSiteInfo<B> {
    fn default() -> Self {
        Self {
            category_tree: None,
            brands: None,
        }
    }
}

/// Fetches the category tree and brand connection from the commerce backend.
#[derive(Clone)]
pub struct CommerceFetcher {
    transport: Arc<dyn GraphqlTransport>,
}

impl CommerceFetcher {
    pub fn new(transport: Arc<dyn GraphqlTransport>) -> Self {
        Self { transport }
    }

    /// Run `query` (with optional `variables`) and pick `site` apart defensively.
    pub async fn fetch<B>(&self, query: &str, variables: Option<Value>) -> Result<RawSiteInfo<B>>
    where
        B: DeserializeOwned,
    {
        let request = GraphqlRequest::new(query).with_variables(variables);
        let data = self.transport.execute(&request).await?;
        let raw = decode_site(data);
        debug!(
            backend = %self.transport.backend(),
            has_category_tree = raw.category_tree.is_some(),
            has_brands = raw.brands.is_some(),
            "site info decoded"
        );
        Ok(raw)
    }
}

/// Decode `data.site` field by field; a bad field never poisons its siblings.
pub fn decode_site<B: DeserializeOwned>(mut data: Value) -> RawSiteInfo<B> {
    let Some(site) = data.get_mut("site").filter(|s| s.is_object()) else {
        return RawSiteInfo::default();
    };

    let category_tree = site
        .get_mut("categoryTree")
        .map(Value::take)
        .and_then(|v| decode_field("site.categoryTree", v));

    let brands = site.get_mut("brands").map(Value::take).and_then(|mut brands| {
        if !brands.is_object() {
            return decode_field::<Connection<B>>("site.brands", brands);
        }
        let page_info = brands
            .get_mut("pageInfo")
            .map(Value::take)
            .and_then(|v| decode_field::<PageInfo>("site.brands.pageInfo", v));
        let edges = match brands.get_mut("edges").map(Value::take) {
            Some(Value::Array(items)) => Some(
                items
                    .into_iter()
                    .map(|item| decode_field::<Edge<B>>("site.brands.edges[]", item))
                    .collect(),
            ),
            Some(other) => decode_field("site.brands.edges", other),
            None => None,
        };
        Some(Connection { page_info, edges })
    });

    RawSiteInfo {
        category_tree,
        brands,
    }
}

fn decode_field<T: DeserializeOwned>(path: &str, v: Value) -> Option<T> {
    if v.is_null() {
        return None;
    }
    match serde_json::from_value::<T>(v) {
        Ok(t) => Some(t),
        Err(e) => {
            warn!(field = path, error = %e, "commerce field has unexpected shape; treating as absent");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storefront::schema::BrandNode;
    use serde_json::json;

    #[test]
    fn decodes_full_default_selection() {
        let data = json!({
            "site": {
                "categoryTree": [
                    { "entityId": 1, "name": "Shop", "path": "/shop/", "children": [
                        { "entityId": 2, "name": "Kitchen", "children": [] }
                    ] }
                ],
                "brands": {
                    "pageInfo": { "startCursor": "YQ", "endCursor": "Yg" },
                    "edges": [
                        { "cursor": "YQ", "node": { "entityId": 10, "name": "Acme", "path": "/acme/" } },
                        { "cursor": "Yg", "node": null }
                    ]
                }
            }
        });
        let raw: RawSiteInfo<BrandNode> = decode_site(data);
        let tree = raw.category_tree.unwrap();
        assert_eq!(tree.len(), 1);
        let brands = raw.brands.unwrap();
        assert_eq!(brands.page_info.unwrap().start_cursor.as_deref(), Some("YQ"));
        assert_eq!(brands.edges.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn absent_site_yields_empty_raw() {
        let raw: RawSiteInfo<BrandNode> = decode_site(Value::Null);
        assert_eq!(raw, RawSiteInfo::default());
        let raw: RawSiteInfo<BrandNode> = decode_site(json!({ "site": null }));
        assert_eq!(raw, RawSiteInfo::default());
    }

    #[test]
    fn malformed_tree_does_not_hide_brands() {
        let data = json!({
            "site": {
                "categoryTree": "not-a-list",
                "brands": { "edges": [ { "node": { "entityId": 5, "name": "B" } } ] }
            }
        });
        let raw: RawSiteInfo<BrandNode> = decode_site(data);
        assert!(raw.category_tree.is_none());
        assert_eq!(raw.brands.unwrap().into_nodes()[0].entity_id, 5);
    }

    #[test]
    fn malformed_edge_becomes_null_entry() {
        let data = json!({
            "site": { "brands": { "edges": [
                { "node": { "entityId": "seven" } },
                { "node": { "entityId": 8, "name": "Ok" } }
            ] } }
        });
        let raw: RawSiteInfo<BrandNode> = decode_site(data);
        let edges = raw.brands.unwrap().edges.unwrap();
        assert!(edges[0].is_none());
        assert_eq!(edges[1].as_ref().unwrap().node.as_ref().unwrap().entity_id, 8);
    }

    #[test]
    fn brands_without_edges_selection() {
        let data = json!({ "site": { "brands": { "pageInfo": { "endCursor": "x" } } } });
        let raw: RawSiteInfo<BrandNode> = decode_site(data);
        let brands = raw.brands.unwrap();
        assert!(brands.edges.is_none());
        assert!(brands.into_nodes().is_empty());
    }
}
