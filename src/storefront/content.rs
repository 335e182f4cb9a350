use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::storefront::error::Result;
use crate::storefront::queries::content_categories_query;
use crate::storefront::schema::ContentCategoryRecord;
use crate::storefront::transport::{GraphqlRequest, GraphqlTransport};

/// Fetches flat category records from the content backend.
#[derive(Clone)]
pub struct ContentFetcher {
    transport: Arc<dyn GraphqlTransport>,
    object: String,
}

impl ContentFetcher {
    pub fn new(transport: Arc<dyn GraphqlTransport>, object: impl Into<String>) -> Self {
        Self {
            transport,
            object: object.into(),
        }
    }

    pub fn query(&self) -> String {
        content_categories_query(&self.object)
    }

    /// All category records in backend order. Transport failures propagate;
    /// an empty or malformed payload is an empty list.
    pub async fn fetch(&self) -> Result<Vec<ContentCategoryRecord>> {
        let request = GraphqlRequest::new(self.query());
        let data = self.transport.execute(&request).await?;
        let records = decode_records(&self.object, data);
        debug!(
            backend = %self.transport.backend(),
            object = %self.object,
            count = records.len(),
            "content categories decoded"
        );
        Ok(records)
    }
}

/// Records under `data.<object>`. Entries that fail to decode are skipped.
pub fn decode_records(object: &str, mut data: Value) -> Vec<ContentCategoryRecord> {
    let items = match data.get_mut(object).map(Value::take) {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => return Vec::new(),
        Some(other) => {
            warn!(object, kind = json_kind(&other), "content category payload is not a list");
            return Vec::new();
        }
    };
    items
        .into_iter()
        .filter(|item| !item.is_null())
        .filter_map(|item| match serde_json::from_value::<ContentCategoryRecord>(item) {
            Ok(rec) => Some(rec),
            Err(e) => {
                warn!(object, error = %e, "skipping undecodable content category record");
                None
            }
        })
        .collect()
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
