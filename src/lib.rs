pub mod cli;
pub mod storefront;
pub mod tracing;

pub mod util {
    pub mod env;
}

pub use storefront::{
    filter_edges, get_site_info, get_site_info_as, BrandNode, CategorySource, CategoryTreeNode,
    SiteInfoClient, SiteInfoConfig, SiteInfoError, SiteInfoOptions, SiteInfoResult,
};
