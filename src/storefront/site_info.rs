use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, info_span, Instrument};

use crate::storefront::categories::{bound_category_tree, convert_category_tree, resolve_categories};
use crate::storefront::commerce::CommerceFetcher;
use crate::storefront::config::{get_config, CategorySource, SiteInfoConfig};
use crate::storefront::content::ContentFetcher;
use crate::storefront::error::{Backend, Result, SiteInfoError};
use crate::storefront::queries::site_info_query;
use crate::storefront::schema::{BrandNode, Connection, SiteInfoResult};
use crate::storefront::transport::{GraphqlTransport, HttpGraphqlTransport};

/// Options for [`get_site_info`]. Everything is optional.
#[derive(Debug, Clone, Default)]
pub struct SiteInfoOptions {
    /// Replaces the default commerce query entirely.
    pub query: Option<String>,
    pub variables: Option<Value>,
    /// Resolved from the environment when `None`.
    pub config: Option<SiteInfoConfig>,
    pub preview: bool,
}

/// Aggregates navigation data from the commerce and content backends.
#[derive(Clone)]
pub struct SiteInfoClient {
    commerce: CommerceFetcher,
    content: Option<ContentFetcher>,
    category_source: CategorySource,
}

impl SiteInfoClient {
    /// HTTP transports for both backends. The content backend is skipped
    /// entirely under `CategorySource::Commerce`.
    pub fn from_config(cfg: &SiteInfoConfig) -> Result<Self> {
        cfg.validate()?;
        let commerce: Arc<dyn GraphqlTransport> =
            Arc::new(HttpGraphqlTransport::new(Backend::Commerce, &cfg.commerce)?);
        let content = match (&cfg.content, cfg.category_source.needs_content()) {
            (Some(content_cfg), true) => Some(Arc::new(HttpGraphqlTransport::new(
                Backend::Content,
                content_cfg,
            )?) as Arc<dyn GraphqlTransport>),
            _ => None,
        };
        Self::with_transports(commerce, content, &cfg.category_object, cfg.category_source)
    }

    /// Build over caller-supplied transports.
    pub fn with_transports(
        commerce: Arc<dyn GraphqlTransport>,
        content: Option<Arc<dyn GraphqlTransport>>,
        category_object: &str,
        category_source: CategorySource,
    ) -> Result<Self> {
        if category_source.needs_content() && content.is_none() {
            return Err(SiteInfoError::Config(format!(
                "category source '{category_source}' requires a content transport"
            )));
        }
        let swapped = commerce.backend() != Backend::Commerce
            || content.as_ref().is_some_and(|t| t.backend() != Backend::Content);
        if swapped {
            return Err(SiteInfoError::Config(
                "commerce and content transports are swapped".into(),
            ));
        }
        Ok(Self {
            commerce: CommerceFetcher::new(commerce),
            content: content.map(|t| ContentFetcher::new(t, category_object)),
            category_source,
        })
    }

    pub fn category_source(&self) -> CategorySource {
        self.category_source
    }

    /// Category tree and brands using the default brand shape.
    pub async fn get_site_info(
        &self,
        query: Option<&str>,
        variables: Option<Value>,
        preview: bool,
    ) -> Result<SiteInfoResult> {
        self.get_site_info_as::<BrandNode>(query, variables, preview)
            .await
    }

    /// Category tree and brands, decoding brand nodes as `B`.
    ///
    /// Both backends are queried concurrently; the first transport failure
    /// aborts the call. Missing data degrades to empty lists.
    pub async fn get_site_info_as<B>(
        &self,
        query: Option<&str>,
        variables: Option<Value>,
        preview: bool,
    ) -> Result<SiteInfoResult<B>>
    where
        B: DeserializeOwned + Send,
    {
        let span = info_span!(
            "site_info",
            preview,
            category_source = %self.category_source,
            custom_query = query.is_some()
        );
        async move {
            let default_query;
            let query = match query {
                Some(q) => q,
                None => {
                    default_query = site_info_query();
                    default_query.as_str()
                }
            };

            let commerce = self.commerce.fetch::<B>(query, variables);
            let content = async {
                match &self.content {
                    Some(fetcher) if self.category_source.needs_content() => {
                        fetcher.fetch().await.map(Some)
                    }
                    _ => Ok(None),
                }
            };
            let (raw, records) = tokio::try_join!(commerce, content)?;

            let commerce_tree = bound_category_tree(raw.category_tree);
            let content_tree = records.map(convert_category_tree);
            let categories = resolve_categories(self.category_source, commerce_tree, content_tree);
            let brands = raw.brands.map(Connection::into_nodes).unwrap_or_default();

            info!(
                categories = categories.len(),
                brands = brands.len(),
                "site info assembled"
            );
            Ok(SiteInfoResult { categories, brands })
        }
        .instrument(span)
        .await
    }
}

/// Resolve config, build HTTP transports and run one aggregation.
pub async fn get_site_info(options: SiteInfoOptions) -> Result<SiteInfoResult> {
    get_site_info_as::<BrandNode>(options).await
}

/// [`get_site_info`] with a caller-chosen brand node shape, for custom queries.
pub async fn get_site_info_as<B>(options: SiteInfoOptions) -> Result<SiteInfoResult<B>>
where
    B: DeserializeOwned + Send,
{
    let SiteInfoOptions {
        query,
        variables,
        config,
        preview,
    } = options;
    let cfg = get_config(config)?;
    let client = SiteInfoClient::from_config(&cfg)?;
    client
        .get_site_info_as::<B>(query.as_deref(), variables, preview)
        .await
}
