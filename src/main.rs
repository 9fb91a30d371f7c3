use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::fmt::writer::MakeWriterExt;

#[derive(Parser)]
#[command(name = "shelf", about = "Shelf — product CSV feed to JSON, script, and HTML catalog")]
struct Cli {
    /// Config file to layer over the defaults (default: ./shelf.toml if present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at debug level and mirror logs to $TMPDIR/shelf-debug.log.
    #[arg(long)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let config = match shelf::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "invalid configuration");
            return Ok(ExitCode::FAILURE);
        }
    };

    match shelf::run(&config).await {
        Ok(report) => {
            if let Some(error) = &report.fallback {
                tracing::warn!(%error, "wrote fallback catalog");
            }
            tracing::info!(
                products = report.products,
                files = report.written.len(),
                "catalog generated"
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "run aborted");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn init_tracing(debug: bool) -> anyhow::Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    if debug {
        let path = std::env::temp_dir().join("shelf-debug.log");
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr.and(std::sync::Mutex::new(file)))
            .with_ansi(false)
            .with_env_filter(filter)
            .init();
        tracing::info!(path = %path.display(), "shelf debug log started");
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    }
    Ok(())
}
