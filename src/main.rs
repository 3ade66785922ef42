use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use strategy_meta::api::{build_router, state::AppState};
use strategy_meta::calculate::{compute_ai_strategy_metrics, compute_character_baseline};
use strategy_meta::config::AppConfig;
use strategy_meta::report::{build_detail, build_report};
use strategy_meta::storage::{load_corpus, StorageConfig};

#[derive(Parser)]
#[command(name = "strategy-meta")]
#[command(about = "AI strategy aggregation and playstyle insight for fighting-game match data")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report metrics and archetypes for every AI strategy
    Analyze {
        /// Analyse from one character's point of view
        #[arg(long)]
        character: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a character's own averages across every strategy it faced
    Baseline {
        /// Character name
        character: String,

        /// Print the baseline as JSON
        #[arg(long)]
        json: bool,
    },

    /// Break down one strategy's action, build and capsule impact
    Inspect {
        /// AI strategy name
        ai: String,

        /// Compare against this character's baseline
        #[arg(long)]
        character: Option<String>,

        /// Print the detail as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::info!("Starting strategy-meta v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(config.data_dir.clone());

    match cli.command {
        Commands::Analyze { character, json } => {
            let corpus = load_corpus(&storage)?;
            let report = build_report(&corpus, character.as_deref());

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.render_text(&config.display));
            }
        }
        Commands::Baseline { character, json } => {
            let corpus = load_corpus(&storage)?;
            let metrics = compute_ai_strategy_metrics(&corpus);
            let Some(baseline) = compute_character_baseline(&metrics, &character) else {
                anyhow::bail!("No completed matches for character '{}'", character);
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&baseline)?);
            } else {
                let m = &baseline.metrics;
                println!("=== {} Baseline ===", baseline.character);
                println!("Strategies faced: {}", baseline.strategies_faced);
                println!("Matches:          {}", m.total_matches);
                println!("Win rate:         {:.1}%", m.win_rate);
                println!("Survival rate:    {:.1}%", m.survival_rate);
                println!("Damage dealt:     {:.0}", m.avg_damage_dealt);
                println!("Damage taken:     {:.0}", m.avg_damage_taken);
                println!("DPS:              {:.1}", m.avg_dps);
                println!("Combat score:     {:.1}", m.combat_performance_score);
                println!("Confidence:       {}", m.data_quality.confidence);
                println!("\nPer match:");
                for (action, value) in m.actions.iter() {
                    println!("  {:<20} {:>10.1}", action.label(), value);
                }
            }
        }
        Commands::Inspect {
            ai,
            character,
            json,
        } => {
            let corpus = load_corpus(&storage)?;
            let Some(detail) = build_detail(&corpus, &ai, character.as_deref()) else {
                anyhow::bail!("No completed matches for strategy '{}'", ai);
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                print!("{}", detail.render_text(&config.display));
            }
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let app = build_router(AppState::new(storage, config));
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
