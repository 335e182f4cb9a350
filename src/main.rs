use anyhow::Result;
use clap::{Parser, Subcommand};
use storefront_nav::cli::site_info::{self, SiteInfoCommandConfig};
use storefront_nav::util::env;
use storefront_nav::CategorySource;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "storefront-nav", version, about = "Storefront navigation data (categories + brands)")]
struct Cli {
    /// Compact log lines without timestamps or file locations
    #[arg(long, global = true, default_value_t = false)]
    compact_logs: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Commands {
    /// Fetch the category tree and brands from both backends and print them as JSON
    SiteInfo {
        /// File with a GraphQL query replacing the default commerce query
        #[arg(long)]
        query_file: Option<PathBuf>,
        /// JSON object of variables for the commerce query
        #[arg(long)]
        variables: Option<String>,
        /// content | content-or-commerce | commerce (defaults to SITE_INFO_CATEGORY_SOURCE)
        #[arg(long, value_parser = parse_category_source)]
        category_source: Option<CategorySource>,
        /// Mark the request as a preview
        #[arg(long, default_value_t = false)]
        preview: bool,
        /// Pretty-print the JSON output
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Print the default commerce query (or the content query with --content)
    PrintQuery {
        #[arg(long, default_value_t = false)]
        content: bool,
    },
}

fn parse_category_source(raw: &str) -> Result<CategorySource, String> {
    raw.parse::<CategorySource>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    env::init_env();
    let cli = Cli::parse();
    let compact = cli.compact_logs || env::env_flag("LOG_COMPACT", false);
    storefront_nav::tracing::init_tracing("storefront_nav=info,warn", compact)?;

    match cli.command {
        Commands::SiteInfo {
            query_file,
            variables,
            category_source,
            preview,
            pretty,
        } => {
            site_info::run(SiteInfoCommandConfig {
                query_file,
                variables,
                category_source,
                preview,
                pretty,
            })
            .await
        }
        Commands::PrintQuery { content } => site_info::run_print_query(content),
    }
}
