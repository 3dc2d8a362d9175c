//! ramlkit CLI entrypoint
//! Parses command-line arguments and runs the normalizers over a document.

// Internal imports (std, crate)
use std::path::PathBuf;

// External imports (alphabetized)
use anyhow::Context as _;
use clap::Parser;
use ramlkit_core::{assemble, Config, Context, ErrorSink};
use tracing_subscriber::EnvFilter;

mod document;
mod lint;

#[derive(Parser)]
#[command(name = "ramlkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Normalize every declaration in a document and report diagnostics
    Validate {
        /// Path to the RAML document
        path: PathBuf,
        /// Config file (YAML, JSON or TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Stop at the first validation error
        #[arg(long)]
        strict: bool,
    },
    /// Print the normalized security schemes as JSON
    Schemes {
        /// Path to the RAML document
        path: PathBuf,
        /// Config file (YAML, JSON or TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

async fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .await
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = Context::default();
    match &cli.command {
        Commands::Validate {
            path,
            config,
            strict,
        } => {
            let mut config = load_config(config.as_ref()).await?;
            if *strict {
                config.validate = true;
            }
            let document = document::load(path, &config).await?;

            let mut errors = ErrorSink::new();
            let summary = lint::run(&document, &config, &mut errors, &ctx)
                .with_context(|| format!("{} failed validation", path.display()))?;
            tracing::info!(
                "checked {} resource(s), {} method(s), {} security scheme(s)",
                summary.resources,
                summary.methods,
                summary.security_schemes
            );

            for err in &errors {
                println!("{}", err);
            }
            if !errors.is_empty() {
                anyhow::bail!("{}: {} validation error(s)", path.display(), errors.len());
            }
            println!("{}: ok", path.display());
        }
        Commands::Schemes { path, config } => {
            let config = load_config(config.as_ref()).await?;
            let document = document::load(path, &config).await?;

            let mut errors = ErrorSink::new();
            let schemes = assemble(&document, &config, &mut errors, &ctx)?.unwrap_or_default();
            for err in &errors {
                tracing::warn!("{}", err);
            }
            println!("{}", serde_json::to_string_pretty(&schemes)?);
        }
    }
    Ok(())
}
