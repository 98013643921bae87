//! Relnet CLI: explore a company's relationship network from the terminal.
//!
//! Usage:
//!   relnet explore <company-id> [--name N] [--risk R] [--depth D] [--json]
//!   relnet neighbours <type> <key> [--json]

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use futures_util::future::join_all;
use relnet::{
    normalize_all, EntityType, ExpandOutcome, Explorer, ExplorerConfig, GraphSnapshot, HttpClient,
    NeighbourClient, SeedCompany,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "relnet",
    version,
    about = "Incremental company relationship graph explorer"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Neighbour query endpoint (overrides RELNET_NETWORK_URL)
    #[arg(long, global = true)]
    network_url: Option<String>,
    /// Enrichment endpoint (overrides RELNET_ENRICH_URL)
    #[arg(long, global = true)]
    enrich_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed a company and expand its network
    Explore {
        /// Company identifier
        company_id: String,
        /// Display name of the company
        #[arg(long)]
        name: Option<String>,
        /// Risk level of the company (H, M or L)
        #[arg(long)]
        risk: Option<String>,
        /// Number of expansion rounds; rounds after the first expand every expandable node
        #[arg(long, default_value_t = 1)]
        depth: usize,
        /// Print the graph as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch and normalize the neighbours of one entity
    Neighbours {
        /// Entity type (company, manager or address)
        entity_type: EntityType,
        /// Entity key
        key: String,
        /// Print the normalized entities as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("RELNET_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn cmd_explore(
    client: Arc<dyn NeighbourClient>,
    seed: SeedCompany,
    depth: usize,
    json: bool,
) -> anyhow::Result<()> {
    let explorer = Explorer::new(client);
    explorer.seed(seed);

    if depth > 0 {
        if let ExpandOutcome::Failed(e) = explorer.start().await {
            anyhow::bail!("Failed to expand seed company: {}", e);
        }
    }
    for round in 1..depth {
        let frontier = explorer.frontier();
        if frontier.is_empty() {
            break;
        }
        info!(round, nodes = frontier.len(), "expanding frontier");
        join_all(frontier.iter().filter_map(|id| id.parts()).map(
            |(entity_type, key)| explorer.expand(entity_type, key, false),
        ))
        .await;
    }

    for notice in explorer.take_notices() {
        eprintln!("{}", notice);
    }

    let snapshot = explorer.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_snapshot(&snapshot);
    }
    Ok(())
}

fn print_snapshot(snapshot: &GraphSnapshot) {
    println!(
        "{:<8}  {:<40}  {:<32}  {:<14}",
        "TYPE", "KEY", "LABEL", "EXPANDABILITY"
    );
    println!("{}", "-".repeat(100));
    for node in &snapshot.nodes {
        println!(
            "{:<8}  {:<40}  {:<32}  {:<14?}",
            node.entity.entity_type, node.entity.key, node.entity.label, node.expandability
        );
    }
    println!();
    println!("{} nodes, {} edges", snapshot.nodes.len(), snapshot.edges.len());
}

async fn cmd_neighbours(
    client: Arc<dyn NeighbourClient>,
    entity_type: EntityType,
    key: &str,
    json: bool,
) -> anyhow::Result<()> {
    let raw = client
        .neighbours(entity_type, key)
        .await
        .with_context(|| format!("Failed to fetch neighbours of {} {}", entity_type, key))?;
    let entities = normalize_all(&raw);

    if json {
        println!("{}", serde_json::to_string_pretty(&entities)?);
        return Ok(());
    }
    if entities.is_empty() {
        println!("No neighbours.");
        return Ok(());
    }
    for entity in &entities {
        println!("{:<8}  {:<40}  {}", entity.entity_type, entity.key, entity.label);
    }
    let dropped = raw.len() - entities.len();
    if dropped > 0 {
        println!("({} unrecognized records dropped)", dropped);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = ExplorerConfig::from_env()?
        .with_overrides(cli.network_url.as_deref(), cli.enrich_url.as_deref())?;
    info!(network = %config.network_url, enrich = %config.enrich_url, "backend endpoints");
    let client: Arc<dyn NeighbourClient> = Arc::new(HttpClient::from_config(&config));

    match cli.command {
        Commands::Explore {
            company_id,
            name,
            risk,
            depth,
            json,
        } => cmd_explore(client, SeedCompany::new(company_id, name, risk), depth, json).await,
        Commands::Neighbours {
            entity_type,
            key,
            json,
        } => cmd_neighbours(client, entity_type, &key, json).await,
    }
}
