//! Command-line interface for songscope.
//!
//! Provides commands for querying songs, inspecting how a scope resolves,
//! and showing the resolved configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::adapters::{Catalog, CommandIndexer, MediaIndexer, NoopIndexer, SqliteCatalog};
use crate::config::{self, ResolvedConfig};
use crate::core::{resolve, QueryExecutor};
use crate::domain::{RawSongQuery, ScopeSelector, SongQuery, SongSortField, SortOrder};

/// songscope - Query songs from a platform media catalog
#[derive(Parser, Debug)]
#[command(name = "songscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Query songs and print them as JSON
    Songs {
        /// Field to sort by (catalog default order if not specified)
        #[arg(short, long, value_enum)]
        sort: Option<SortArg>,

        /// Sort direction
        #[arg(short, long, value_enum, default_value = "asc")]
        order: OrderArg,

        /// Compare text fields case-insensitively
        #[arg(short = 'i', long)]
        ignore_case: bool,

        /// Only songs stored under this folder
        #[arg(short, long)]
        path: Option<String>,

        /// Scope selector (0 = all volumes, 1 = internal, 2 = legacy external)
        #[arg(long, default_value = "0")]
        scope: u32,

        /// Raw bridge request as JSON (overrides the other options)
        #[arg(long)]
        raw: Option<String>,
    },

    /// Show the endpoints and roots a scope resolves to
    Scope {
        /// Scope selector
        #[arg(long, default_value = "0")]
        scope: u32,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Sort field for CLI (maps to SongSortField)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Title,
    Artist,
    Album,
    Duration,
    DateAdded,
    Size,
    DisplayName,
}

impl From<SortArg> for SongSortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Title => SongSortField::Title,
            SortArg::Artist => SongSortField::Artist,
            SortArg::Album => SongSortField::Album,
            SortArg::Duration => SongSortField::Duration,
            SortArg::DateAdded => SongSortField::DateAdded,
            SortArg::Size => SongSortField::Size,
            SortArg::DisplayName => SongSortField::DisplayName,
        }
    }
}

/// Sort direction for CLI (maps to SortOrder)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortOrder::Ascending,
            OrderArg::Desc => SortOrder::Descending,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Songs {
                sort,
                order,
                ignore_case,
                path,
                scope,
                raw,
            } => {
                let query = match raw {
                    Some(json) => {
                        let raw: RawSongQuery =
                            serde_json::from_str(&json).context("Failed to parse raw request")?;
                        SongQuery::try_from(raw)?
                    }
                    None => SongQuery {
                        sort_field: sort.map(Into::into),
                        sort_order: order.into(),
                        ignore_case,
                        path_filter: path,
                        scope: ScopeSelector::from_raw(scope),
                    },
                };
                query_songs(query).await
            }
            Commands::Scope { scope } => show_scope(scope),
            Commands::Config => show_config(),
        }
    }
}

/// Build the catalog named by the configuration
fn open_catalog(config: &ResolvedConfig) -> Result<SqliteCatalog> {
    if let Some(parent) = config.catalog_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let catalog = SqliteCatalog::open(&config.catalog_path)
        .with_context(|| format!("Failed to open catalog: {}", config.catalog_path.display()))?;
    Ok(catalog.with_fixed_volumes(config.fixed_volumes.clone()))
}

/// Build the indexer named by the configuration
fn build_indexer(config: &ResolvedConfig) -> Arc<dyn MediaIndexer> {
    match CommandIndexer::from_command(&config.indexer.command) {
        Some(indexer) => Arc::new(
            indexer.with_timeout(Duration::from_secs(config.indexer.timeout_seconds)),
        ),
        None => Arc::new(NoopIndexer),
    }
}

/// Run a song query and print the records
async fn query_songs(query: SongQuery) -> Result<()> {
    let config = config::config()?;

    let catalog: Arc<dyn Catalog> = Arc::new(open_catalog(config)?);
    let executor = QueryExecutor::builder()
        .catalog(catalog)
        .indexer(build_indexer(config))
        .mime_type(config.indexer.mime_type.clone())
        .build()?;

    let songs = executor.query_songs(&query, &config.platform).await?;

    println!("{}", serde_json::to_string_pretty(&songs)?);
    eprintln!("\n[{} song(s)]", songs.len());

    // Scans still running would be killed when the runtime shuts down
    executor.drain().await;

    Ok(())
}

/// Print the endpoints and roots for a scope
fn show_scope(scope: u32) -> Result<()> {
    let config = config::config()?;
    let resolution = resolve(ScopeSelector::from_raw(scope), &config.platform);

    println!("Endpoints:");
    for endpoint in &resolution.endpoints {
        println!("  {}", endpoint);
    }

    println!("Roots:");
    if resolution.root_paths.is_empty() {
        println!("  (none)");
    }
    for root in &resolution.root_paths {
        println!("  {}", root);
    }

    Ok(())
}

/// Print the resolved configuration
fn show_config() -> Result<()> {
    let config = config::config()?;

    match &config.config_file {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (none, using defaults)"),
    }
    println!("Home: {}", config.home.display());
    println!("Catalog: {}", config.catalog_path.display());
    println!(
        "Platform: {}",
        if config.platform.per_volume_addressing {
            "per-volume"
        } else {
            "legacy"
        }
    );
    println!("Primary external root: {}", config.platform.primary_external_root);
    for volume in &config.platform.volumes {
        println!(
            "  volume {} -> {}",
            volume.name,
            volume.root_path().as_deref().unwrap_or("(no root)")
        );
    }
    if config.indexer.command.is_empty() {
        println!("Indexer: (disabled)");
    } else {
        println!(
            "Indexer: {} ({}, {}s timeout)",
            config.indexer.command.join(" "),
            config.indexer.mime_type,
            config.indexer.timeout_seconds
        );
    }

    Ok(())
}
