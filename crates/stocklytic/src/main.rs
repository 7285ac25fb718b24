use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use stocklytic_common::{logger, AppConfig};
use stocklytic_search::{DisplayRecord, Query, SearchSession, Sector, Settlement, ANY_SECTOR};
use stocklytic_server::AppState;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        // Fallback to default dotenv behavior
        dotenv::dotenv().ok();
    }
}

#[derive(Parser)]
#[command(name = "stocklytic")]
#[command(about = "Stocklytic - semantic stock finder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to (overrides SERVER_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides SERVER_PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run one search and print the result cards
    Search(SearchArgs),

    /// List the sector selector options
    Sectors,
}

#[derive(Args)]
struct SearchArgs {
    /// What kind of stock are you looking for?
    text: String,

    /// Sector name, or "Any Sector"
    #[arg(long, default_value = ANY_SECTOR)]
    sector: String,

    /// Minimum market cap in billions USD
    #[arg(long, default_value_t = 0.0)]
    cap_min: f64,

    /// Maximum market cap in billions USD
    #[arg(long, default_value_t = stocklytic_search::query::MARKET_CAP_MAX_BILLIONS)]
    cap_max: f64,

    /// Minimum volume in millions
    #[arg(long, default_value_t = 0)]
    vol_min: u64,

    /// Maximum volume in millions
    #[arg(long, default_value_t = stocklytic_search::query::VOLUME_MAX_MILLIONS)]
    vol_max: u64,

    /// Number of results (1-25)
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u8).range(1..=25))]
    count: u8,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
}

/// Query to run, or `None` when the text is blank
///
/// Runs before any configuration is loaded or service contacted.
fn search_query(args: &SearchArgs) -> stocklytic_common::Result<Option<Query>> {
    let query = Query::new(args.text.clone())
        .with_sector(Sector::parse_choice(&args.sector)?)
        .with_market_cap(args.cap_min, args.cap_max)
        .with_volume(args.vol_min, args.vol_max)
        .with_count(args.count as usize);

    if !query.has_text() {
        return Ok(None);
    }
    query.validate()?;

    Ok(Some(query))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_dotenv_from_project_root();

    match cli.command {
        Some(Commands::Sectors) => {
            for option in Sector::options() {
                println!("{}", option);
            }
        }
        Some(Commands::Search(args)) => {
            // Blank text: nothing to search, nothing to print
            let Some(query) = search_query(&args)? else {
                return Ok(());
            };

            let config = AppConfig::from_env()?;
            logger::setup_console_logging(&config.log_level)?;

            let state = AppState::connect(config).await?;
            let mut session = SearchSession::new(&state.searcher);

            let Some(settlement) = session.submit(&query).await? else {
                return Ok(());
            };

            if args.json {
                println!("{}", serde_json::to_string_pretty(settlement)?);
            } else {
                print_settlement(settlement);
            }
        }
        Some(Commands::Serve { host, port }) => {
            let mut config = AppConfig::from_env()?;
            if let Some(host) = host {
                config.server_host = host;
            }
            if let Some(port) = port {
                config.server_port = port;
            }
            config.validate()?;

            serve(config).await?;
        }
        None => {
            // Default: start server with configuration from the environment
            let config = AppConfig::from_env()?;
            serve(config).await?;
        }
    }

    Ok(())
}

async fn serve(config: AppConfig) -> Result<()> {
    match &config.log_dir {
        Some(dir) => logger::setup_logging(dir, &config.log_level)?,
        None => logger::setup_console_logging(&config.log_level)?,
    }

    tracing::info!("Stocklytic starting...");
    tracing::info!("  Bind: {}", config.server_bind_address());
    tracing::info!(
        "  Index: {} (namespace: {})",
        config.pinecone_index_name,
        config.namespace
    );
    tracing::info!("  Embedding model: {}", config.embedding_model);

    let bind_addr = config.server_bind_address();
    let state = AppState::connect(config).await?;

    println!("Server listening on http://{}", bind_addr);
    stocklytic_server::start_server(state).await?;

    Ok(())
}

fn print_settlement(settlement: &Settlement) {
    if let Some(message) = settlement.message() {
        println!("{}", message.yellow());
        return;
    }

    for record in settlement.records() {
        print_card(record);
    }
}

fn print_card(record: &DisplayRecord) {
    let growth = |value: &str, positive: bool| {
        if positive {
            value.green().bold()
        } else {
            value.red().bold()
        }
    };

    println!(
        "{} ({})  {}",
        record.name.bold(),
        record.ticker.cyan(),
        record.sector.dimmed()
    );
    println!("  {}", record.description);
    println!(
        "  Earnings Growth: {}   Revenue Growth: {}",
        growth(record.earnings_growth.as_str(), record.earnings_positive),
        growth(record.revenue_growth.as_str(), record.revenue_positive)
    );
    println!("  {}", record.link.blue().underline());
    println!();
}
