//! Contrast CLI: command-line front end for the entity comparison dashboard
//!
//! Loads the four tables (from the HTTP endpoint or a directory of JSON
//! exports, through the local cache) and prints catalog, similarity and chart
//! geometry as tables, JSON or CSV.

use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use contrast::{
    CacheStore, CachedSource, Comparison, Dashboard, DashboardConfig, RemoteSource, StaticSource,
    TableSource,
};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "contrast", version, about = "Compare two entities side by side")]
struct Cli {
    /// Data endpoint URL (answers `?sheet=<Table>`)
    #[arg(long, global = true, env = "CONTRAST_SOURCE_URL")]
    url: Option<String>,

    /// YAML configuration file
    #[arg(long, global = true, env = "CONTRAST_CONFIG")]
    config: Option<String>,

    /// Read tables from `<dir>/<Table>.json` instead of the endpoint
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Cache directory (overrides the configuration file)
    #[arg(long, global = true)]
    cache_dir: Option<String>,

    /// Bypass the local cache
    #[arg(long, global = true)]
    no_cache: bool,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// List selectable entities by type
    Entities,
    /// Show one entity's descriptive fields
    Show {
        name: String,
    },
    /// Show how each table loaded
    Status,
    /// Similarity score between two entities
    Similarity {
        first: String,
        second: String,
    },
    /// Radar chart geometry for two entities
    Radar {
        first: String,
        second: String,
    },
    /// Continuum chart placements for two entities
    Continuum {
        first: String,
        second: String,
    },
    /// Similarity, radar and continuum in one go
    Compare {
        first: String,
        second: String,
    },
    /// Manage the local cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Remove every cached table
    Clear,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<DashboardConfig> {
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_yaml_file(path)
            .with_context(|| format!("loading configuration from {}", path))?,
        None => DashboardConfig::default(),
    };
    if let Some(url) = &cli.url {
        config.source.base_url = Some(url.clone());
    }
    if let Some(dir) = &cli.cache_dir {
        config.cache.dir = dir.clone();
    }
    if cli.no_cache {
        config.cache.enabled = false;
    }
    Ok(config)
}

fn build_source(cli: &Cli, config: &DashboardConfig) -> anyhow::Result<Box<dyn TableSource>> {
    let inner: Box<dyn TableSource> = match &cli.data_dir {
        Some(dir) => Box::new(StaticSource::from_dir(dir)),
        None => Box::new(
            RemoteSource::from_config(&config.source)
                .context("no data source: pass --url, --data-dir or set source.base_url")?,
        ),
    };

    if !config.cache.enabled {
        return Ok(inner);
    }
    let store = CacheStore::from_config(&config.cache)?;
    Ok(Box::new(CachedSource::new(inner, store)))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;

    if let Commands::Cache { action: CacheAction::Clear } = &cli.command {
        let store = CacheStore::from_config(&config.cache)?;
        let removed = store.clear()?;
        println!("Removed {} cached table(s) from {}", removed, store.dir().display());
        return Ok(());
    }

    let source = build_source(&cli, &config)?;
    let dashboard = Dashboard::load(&source, config).await?;

    match &cli.command {
        Commands::Entities => print_entities(&dashboard, &cli.format)?,
        Commands::Show { name } => print_entity(&dashboard, name, &cli.format)?,
        Commands::Status => print_status(&dashboard, &cli.format)?,
        Commands::Similarity { first, second } => {
            print_similarity(&dashboard.compare(first, second), &cli.format)?
        }
        Commands::Radar { first, second } => print_radar(&dashboard.compare(first, second), &cli.format)?,
        Commands::Continuum { first, second } => {
            print_continuum(&dashboard.compare(first, second), &cli.format)?
        }
        Commands::Compare { first, second } => {
            let comparison = dashboard.compare(first, second);
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&comparison)?),
                _ => {
                    print_similarity(&comparison, &cli.format)?;
                    println!();
                    print_radar(&comparison, &cli.format)?;
                    println!();
                    print_continuum(&comparison, &cli.format)?;
                }
            }
        }
        Commands::Cache { .. } => {}
    }

    Ok(())
}

/// Print rows as a comfy table or CSV
fn print_rows(header: &[&str], rows: Vec<Vec<String>>, format: &OutputFormat) {
    match format {
        OutputFormat::Csv => {
            println!("{}", csv_line(header));
            for row in &rows {
                println!("{}", csv_line(row));
            }
        }
        _ => {
            if rows.is_empty() {
                println!("(no results)");
                return;
            }
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(header);
            let count = rows.len();
            for row in rows {
                table.add_row(row);
            }
            println!("{}", table);
            println!("{} row(s)", count);
        }
    }
}

fn print_entities(dashboard: &Dashboard, format: &OutputFormat) -> anyhow::Result<()> {
    let catalog = dashboard.catalog();
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(catalog.groups())?);
        return Ok(());
    }

    let rows = catalog
        .groups()
        .iter()
        .flat_map(|group| {
            group.entities.iter().map(move |name| {
                vec![
                    group.entity_type.clone(),
                    name.clone(),
                    catalog.identity(name).map(|id| id.to_string()).unwrap_or_default(),
                ]
            })
        })
        .collect();
    print_rows(&["Type", "Entity", "ID"], rows, format);

    if let Some(e) = catalog.identity_error() {
        eprintln!("Warning: {}", e);
    }
    Ok(())
}

fn print_entity(dashboard: &Dashboard, name: &str, format: &OutputFormat) -> anyhow::Result<()> {
    let record = dashboard
        .entity(name)
        .with_context(|| format!("no selectable entity named '{}'", name))?;

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(record)?);
        return Ok(());
    }

    let mut rows = vec![
        vec!["Name".to_string(), record.name.clone()],
        vec![
            "ID".to_string(),
            record.id.map(|id| id.to_string()).unwrap_or_default(),
        ],
        vec![
            "Type".to_string(),
            record.entity_type.clone().unwrap_or_default(),
        ],
    ];
    rows.extend(record.details.iter().map(|(k, v)| vec![k.clone(), v.clone()]));
    print_rows(&["Field", "Value"], rows, format);
    Ok(())
}

fn print_status(dashboard: &Dashboard, format: &OutputFormat) -> anyhow::Result<()> {
    let snapshot = dashboard.snapshot();
    if let OutputFormat::Json = format {
        let status: Vec<serde_json::Value> = snapshot
            .tables()
            .map(|t| serde_json::json!({ "table": t.kind, "result": t.status }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let rows = snapshot
        .tables()
        .map(|t| match &t.status {
            contrast::TableStatus::Loaded { rows } => {
                vec![t.kind.to_string(), "loaded".to_string(), rows.to_string()]
            }
            contrast::TableStatus::Failed { error } => {
                vec![t.kind.to_string(), "failed".to_string(), error.clone()]
            }
        })
        .collect();
    print_rows(&["Table", "Status", "Rows / Error"], rows, format);
    Ok(())
}

fn print_similarity(comparison: &Comparison, format: &OutputFormat) -> anyhow::Result<()> {
    let similarity = &comparison.similarity;
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(similarity)?);
        return Ok(());
    }

    let join = similarity
        .join
        .map(|j| format!("{:?}", j).to_lowercase())
        .unwrap_or_default();
    let note = similarity
        .unavailable
        .as_ref()
        .map(|reason| reason.to_string())
        .unwrap_or_else(|| format!("{} pair(s)", similarity.pairs));
    print_rows(
        &["Entity 1", "Entity 2", "Similarity", "Join", "Note"],
        vec![vec![
            comparison.first.clone(),
            comparison.second.clone(),
            similarity.to_string(),
            join,
            note,
        ]],
        format,
    );
    Ok(())
}

fn print_radar(comparison: &Comparison, format: &OutputFormat) -> anyhow::Result<()> {
    let radar = match &comparison.radar {
        Some(radar) => radar,
        None => {
            println!("Radar: no data");
            return Ok(());
        }
    };
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(radar)?);
        return Ok(());
    }

    let mut header = vec!["Axis".to_string(), "Angle".to_string()];
    header.extend(radar.series.iter().map(|s| s.entity.clone()));
    let header: Vec<&str> = header.iter().map(String::as_str).collect();

    let rows = radar
        .axes
        .iter()
        .enumerate()
        .map(|(i, axis)| {
            let mut row = vec![axis.name.clone(), format!("{:.3}", axis.angle)];
            row.extend(radar.series.iter().map(|s| {
                s.values.get(i).map(|v| format!("{:.2}", v)).unwrap_or_default()
            }));
            row
        })
        .collect();
    print_rows(&header, rows, format);
    Ok(())
}

fn print_continuum(comparison: &Comparison, format: &OutputFormat) -> anyhow::Result<()> {
    let continuum = match &comparison.continuum {
        Some(continuum) => continuum,
        None => {
            println!("Continuum: no data");
            return Ok(());
        }
    };
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(continuum)?);
        return Ok(());
    }

    let mut header = vec!["Left".to_string(), "Right".to_string()];
    header.extend(continuum.series.iter().map(|s| s.entity.clone()));
    let header: Vec<&str> = header.iter().map(String::as_str).collect();

    let rows = continuum
        .scales_top_to_bottom()
        .into_iter()
        .map(|scale| {
            let mut row = vec![scale.left_label.clone(), scale.right_label.clone()];
            row.extend(continuum.series.iter().map(|s| {
                s.points
                    .iter()
                    .find(|p| p.y == scale.key)
                    .map(|p| format!("{:.2}", p.x))
                    .unwrap_or_default()
            }));
            row
        })
        .collect();
    print_rows(&header, rows, format);
    Ok(())
}

fn csv_line<S: AsRef<str>>(cells: &[S]) -> String {
    let cells: Vec<String> = cells.iter().map(|c| format_csv_value(c.as_ref())).collect();
    cells.join(",")
}

fn format_csv_value(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
