//! CLI entry point for filelink

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use filelink::commands::render::RenderOptions;

#[derive(Parser)]
#[command(name = "filelink")]
#[command(version)]
#[command(about = "Render links to the files and directories of a book", long_about = None)]
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
    /// Render the link for a file or directory of the book
    #[command(alias = "r")]
    Render {
        /// Book path; directories end with /
        path: String,

        /// Inline markdown shown instead of the filename
        #[arg(short, long)]
        body_markdown: Option<String>,

        /// Element id
        #[arg(long)]
        id: Option<String>,

        /// Link to the local file and open it on click
        #[arg(long)]
        allow_open_file: bool,

        /// Render as for a static export
        #[arg(long)]
        export: bool,

        /// Omit the last-modified parameter
        #[arg(long)]
        no_last_modified: bool,
    },

    /// Validate references without rendering
    Check {
        /// Book paths to check
        #[arg(required = true)]
        paths: Vec<String>,

        /// Print the reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write an index page linking every file of the book
    Index {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start a preview server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to
        #[arg(short, long)]
        ip: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "filelink=debug,info"
    } else {
        "filelink=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let site = filelink::Site::new(&base_dir)?;

    match cli.command {
        Commands::Render {
            path,
            body_markdown,
            id,
            allow_open_file,
            export,
            no_last_modified,
        } => {
            let options = RenderOptions {
                body_markdown,
                id,
                allow_open_file,
                export,
                no_last_modified,
            };
            let html = filelink::commands::render::run(&site, &path, &options)?;
            println!("{}", html);
        }

        Commands::Check { paths, json } => {
            filelink::commands::check::run(&site, &paths, json)?;
        }

        Commands::Index { output } => {
            filelink::commands::index::run(&site, output.as_deref())?;
        }

        Commands::Serve { port, ip } => {
            let port = port.unwrap_or(site.config.server.port);
            let ip = ip.unwrap_or_else(|| site.config.server.ip.clone());
            tracing::info!("Serving {:?}", site.source_dir);
            filelink::server::start(&site, &ip, port).await?;
        }
    }

    Ok(())
}
