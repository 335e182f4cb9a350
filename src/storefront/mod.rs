//! Storefront navigation data: category tree + brands, aggregated from a
//! commerce GraphQL backend and a content GraphQL backend.

pub mod categories;
pub mod commerce;
pub mod config;
pub mod content;
pub mod edges;
pub mod error;
pub mod queries;
pub mod schema;
pub mod site_info;
pub mod transport;

pub use config::{get_config, BackendConfig, CategorySource, SiteInfoConfig};
pub use edges::filter_edges;
pub use error::{Backend, SiteInfoError};
pub use schema::{BrandNode, CategoryTreeNode, SiteInfoResult};
pub use site_info::{get_site_info, get_site_info_as, SiteInfoClient, SiteInfoOptions};
pub use transport::{GraphqlRequest, GraphqlTransport, HttpGraphqlTransport};
