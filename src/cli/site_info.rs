use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::storefront::config::DEFAULT_CATEGORY_OBJECT;
use crate::storefront::queries::{content_categories_query, site_info_query};
use crate::storefront::{CategorySource, SiteInfoClient, SiteInfoConfig, SiteInfoError};
use crate::util::env as env_util;

#[derive(Debug, Clone, Default)]
pub struct SiteInfoCommandConfig {
    /// File holding a GraphQL query that replaces the default commerce query.
    pub query_file: Option<PathBuf>,
    /// JSON object passed as the commerce query's variables.
    pub variables: Option<String>,
    /// Overrides SITE_INFO_CATEGORY_SOURCE.
    pub category_source: Option<CategorySource>,
    pub preview: bool,
    pub pretty: bool,
}

pub async fn run(cfg: SiteInfoCommandConfig) -> Result<()> {
    env_util::init_env();

    let site_cfg = resolve_site_config(&cfg).context("resolve site info config")?;

    let query = match &cfg.query_file {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("read query file {}", path.display()))?,
        ),
        None => None,
    };
    let variables = cfg
        .variables
        .as_deref()
        .map(parse_variables)
        .transpose()?;

    info!(
        commerce = %site_cfg.commerce.endpoint,
        content = site_cfg.content.as_ref().map(|c| c.endpoint.as_str()).unwrap_or("-"),
        category_source = %site_cfg.category_source,
        custom_query = query.is_some(),
        "fetching site info"
    );

    let client = SiteInfoClient::from_config(&site_cfg).context("build site info client")?;
    // A custom query may select any brand shape, so keep brands untyped there.
    let out = if query.is_some() {
        let result = client
            .get_site_info_as::<Value>(query.as_deref(), variables, cfg.preview)
            .await
            .context("fetch site info")?;
        render(&result, cfg.pretty)?
    } else {
        let result = client
            .get_site_info(None, variables, cfg.preview)
            .await
            .context("fetch site info")?;
        render(&result, cfg.pretty)?
    };
    println!("{out}");
    Ok(())
}

/// Environment config with the command-line overrides applied, then validated.
fn resolve_site_config(cfg: &SiteInfoCommandConfig) -> Result<SiteInfoConfig, SiteInfoError> {
    let mut site_cfg = SiteInfoConfig::load_env()?;
    if let Some(source) = cfg.category_source {
        site_cfg.category_source = source;
    }
    site_cfg.validate()?;
    Ok(site_cfg)
}

/// Print the default commerce query, or the content query when `content` is set.
pub fn run_print_query(content: bool) -> Result<()> {
    env_util::init_env();
    let query = if content {
        let object = env_util::env_opt("CONTENT_CATEGORY_OBJECT")
            .unwrap_or_else(|| DEFAULT_CATEGORY_OBJECT.to_string());
        content_categories_query(&object)
    } else {
        site_info_query()
    };
    println!("{}", query.trim());
    Ok(())
}

fn parse_variables(raw: &str) -> Result<Value> {
    let v: Value = serde_json::from_str(raw).context("--variables is not valid JSON")?;
    if !v.is_object() {
        anyhow::bail!("--variables must be a JSON object");
    }
    Ok(v)
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(out)
}
