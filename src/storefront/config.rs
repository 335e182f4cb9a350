use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::storefront::error::{Backend, Result, SiteInfoError};
use crate::util::env as env_util;

pub const DEFAULT_CATEGORY_OBJECT: &str = "cc_category__c";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Where the category tree handed to callers comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategorySource {
    /// Converted content records, even when empty. The commerce tree is discarded.
    #[default]
    Content,
    /// Converted content records, or the commerce tree when the content set is empty.
    ContentOrCommerce,
    /// Commerce tree only; the content backend is not queried.
    Commerce,
}

impl CategorySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategorySource::Content => "content",
            CategorySource::ContentOrCommerce => "content-or-commerce",
            CategorySource::Commerce => "commerce",
        }
    }

    pub fn needs_content(&self) -> bool {
        !matches!(self, CategorySource::Commerce)
    }
}

impl fmt::Display for CategorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategorySource {
    type Err = SiteInfoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "content" | "secondary" => Ok(CategorySource::Content),
            "content-or-commerce" | "fallback" => Ok(CategorySource::ContentOrCommerce),
            "commerce" | "primary" => Ok(CategorySource::Commerce),
            other => Err(SiteInfoError::Config(format!(
                "unknown category source '{other}' (expected content, content-or-commerce or commerce)"
            ))),
        }
    }
}

/// Endpoint + credentials for one GraphQL backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub endpoint: String,
    pub bearer: Option<String>,
    pub extra_headers: Vec<(String, String)>,
    pub timeout: Duration,
}

impl BackendConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            bearer: None,
            extra_headers: Vec::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_bearer(mut self, bearer: Option<String>) -> Self {
        self.bearer = bearer.filter(|s| !s.trim().is_empty());
        self
    }

    /// Reject endpoints reqwest could not send to.
    pub fn validate(&self, backend: Backend) -> Result<()> {
        let url = url::Url::parse(&self.endpoint).map_err(|e| {
            SiteInfoError::Config(format!(
                "{backend} endpoint '{}' is not a valid url: {e}",
                self.endpoint
            ))
        })?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(SiteInfoError::Config(format!(
                "{backend} endpoint must be http(s), got scheme '{other}'"
            ))),
        }
    }

    fn from_env(prefix: &str, timeout: Duration) -> Option<Self> {
        let endpoint = env_util::env_opt(&format!("{prefix}_GRAPHQL_URL"))?;
        let mut cfg =
            Self::new(endpoint).with_bearer(env_util::env_opt(&format!("{prefix}_API_TOKEN")));
        cfg.extra_headers = env_util::env_headers(&format!("{prefix}_EXTRA_HEADERS"));
        cfg.timeout = timeout;
        Some(cfg)
    }
}

/// Everything the aggregation needs to reach both backends.
#[derive(Debug, Clone)]
pub struct SiteInfoConfig {
    pub commerce: BackendConfig,
    /// Absent only when `category_source` is `Commerce`.
    pub content: Option<BackendConfig>,
    pub category_object: String,
    pub category_source: CategorySource,
}

impl SiteInfoConfig {
    pub fn new(commerce: BackendConfig, content: Option<BackendConfig>) -> Self {
        Self {
            commerce,
            content,
            category_object: DEFAULT_CATEGORY_OBJECT.to_string(),
            category_source: CategorySource::default(),
        }
    }

    pub fn with_category_source(mut self, source: CategorySource) -> Self {
        self.category_source = source;
        self
    }

    /// Build from `COMMERCE_*`, `CONTENT_*` and `SITE_INFO_*` variables (see `.env`).
    pub fn from_env() -> Result<Self> {
        let cfg = Self::load_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read the environment without validating, so callers can override
    /// fields (e.g. `category_source`) before `validate`.
    pub fn load_env() -> Result<Self> {
        let timeout = Duration::from_secs(env_util::env_parse(
            "SITE_INFO_TIMEOUT_SECS",
            DEFAULT_TIMEOUT_SECS,
        ));
        let commerce = BackendConfig::from_env("COMMERCE", timeout).ok_or_else(|| {
            SiteInfoError::Config("missing env var COMMERCE_GRAPHQL_URL".into())
        })?;
        let category_source = match env_util::env_opt("SITE_INFO_CATEGORY_SOURCE") {
            Some(raw) => raw.parse()?,
            None => CategorySource::default(),
        };
        Ok(Self {
            commerce,
            content: BackendConfig::from_env("CONTENT", timeout),
            category_object: env_util::env_opt("CONTENT_CATEGORY_OBJECT")
                .unwrap_or_else(|| DEFAULT_CATEGORY_OBJECT.to_string()),
            category_source,
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.commerce.validate(Backend::Commerce)?;
        match (&self.content, self.category_source.needs_content()) {
            (Some(content), _) => content.validate(Backend::Content)?,
            (None, true) => {
                return Err(SiteInfoError::Config(format!(
                    "category source '{}' requires CONTENT_GRAPHQL_URL",
                    self.category_source
                )))
            }
            (None, false) => {}
        }
        if !is_graphql_name(&self.category_object) {
            return Err(SiteInfoError::Config(format!(
                "content category object '{}' is not a valid graphql field name",
                self.category_object
            )));
        }
        Ok(())
    }
}

/// Resolve the caller's config, falling back to the environment.
pub fn get_config(config: Option<SiteInfoConfig>) -> Result<SiteInfoConfig> {
    match config {
        Some(cfg) => {
            cfg.validate()?;
            Ok(cfg)
        }
        None => SiteInfoConfig::from_env(),
    }
}

fn is_graphql_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
