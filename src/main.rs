//! ngdiagram CLI entry point

use clap::{Parser, Subcommand};
use ngdiagram_core::{NodeCategory, Theme};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "ngdiagram")]
#[command(about = "Dependency diagrams for Angular-style projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Project root holding ngdiagram.toml and the cache (defaults to current directory)
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// Override the configured theme (light, dark, high-contrast)
    #[arg(long, global = true)]
    theme: Option<Theme>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the diagram and print or write its payload
    Build {
        /// Entities JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Write the payload here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the diagram without the given categories
    Filter {
        #[arg(short, long)]
        input: PathBuf,

        /// Category to leave out; may repeat
        #[arg(short, long)]
        exclude: Vec<NodeCategory>,

        /// Drop edges whose endpoint was left out
        #[arg(long)]
        drop_dangling: bool,
    },
    /// Print the metadata view of one node
    Metadata {
        #[arg(short, long)]
        input: PathBuf,

        node_id: String,
    },
    /// Start the diagram server
    Serve {
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Port to listen on
        #[arg(short, long, default_value = "7891")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Open browser automatically
        #[arg(long)]
        open: bool,
    },
    /// Clear the cache
    Clear,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "ngdiagram={log_level},ngdiagram_core={log_level},ngdiagram_server={log_level}"
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Project root: {}", cli.root.display());

    let project = commands::Project::load(cli.root, cli.theme)?;

    match cli.command {
        Commands::Build { input, output } => commands::build(&project, &input, output.as_deref()),
        Commands::Filter {
            input,
            exclude,
            drop_dangling,
        } => commands::filter(&project, &input, exclude, drop_dangling),
        Commands::Metadata { input, node_id } => commands::metadata(&project, &input, &node_id),
        Commands::Serve {
            input,
            port,
            host,
            open,
        } => commands::serve(project, input, host, port, open).await,
        Commands::Clear => commands::clear(&project),
        Commands::Version => {
            println!("ngdiagram v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
