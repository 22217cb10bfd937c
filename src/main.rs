//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Port used when neither `--port` nor `PORT` is given
const DEFAULT_PORT: u16 = 5173;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "A server-rendered portfolio and blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Topics of the new post
        #[arg(short, long, num_args = 1.., required = true)]
        topics: Vec<String>,
    },

    /// Pre-render the site into static files
    Build,

    /// Start the rendering server
    #[command(alias = "s")]
    Server {
        /// Port to listen on (defaults to $PORT, then 5173)
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Clean the output folder
    Clean,

    /// List site information
    List {
        /// Type of content to list (posts, topics, routes)
        #[arg(default_value = "posts")]
        r#type: String,
    },

    /// Fuzzy search post names
    Search {
        /// Query to search for
        query: Option<String>,

        /// Read queries from stdin
        #[arg(short, long)]
        interactive: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::New { title, topics } => {
            let folio = folio::Folio::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            folio::commands::new::run(&folio, &title, &topics)?;
        }

        Commands::Build => {
            let folio = folio::Folio::new(&base_dir)?;
            tracing::info!("Generating static files...");
            folio.build()?;
            println!("Generated successfully!");
        }

        Commands::Server { port, ip, open } => {
            let folio = folio::Folio::new(&base_dir)?;
            let port = port.unwrap_or(DEFAULT_PORT);
            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio::server::start(&folio, &ip, port, open).await?;
        }

        Commands::Clean => {
            let folio = folio::Folio::new(&base_dir)?;
            tracing::info!("Cleaning output folder...");
            folio.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let folio = folio::Folio::new(&base_dir)?;
            folio::commands::list::run(&folio, &r#type)?;
        }

        Commands::Search { query, interactive } => {
            let folio = folio::Folio::new(&base_dir)?;
            if interactive {
                folio::commands::search::interactive(&folio).await?;
            } else {
                let query = query.unwrap_or_default();
                folio::commands::search::run(&folio, &query)?;
            }
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
