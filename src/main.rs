//! `spa-shell` command line.
//!
//! - `serve` (default): serve the shell with the client-routing catch-all
//! - `build [--watch]`: compile the script bundle and stylesheet
//! - `routes PATH...`: show how the client route table resolves paths

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use spa_shell::assets::{watch::watch, AssetManifest, Pipeline};
use spa_shell::config::{load_config, ConfigWatcher, ShellConfig};
use spa_shell::observability::{logging, metrics};
use spa_shell::routing::RouteTable;
use spa_shell::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "spa-shell")]
#[command(about = "Serve a single-page app shell and build its assets", long_about = None)]
struct Cli {
    /// TOML config file. Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the shell page
    Serve,
    /// Build the script bundle and stylesheet into the public dir
    Build {
        /// Rebuild when sources change
        #[arg(short, long)]
        watch: bool,
    },
    /// Print the client view each path resolves to
    Routes {
        paths: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ShellConfig::default().with_defaults_applied(),
    };

    logging::init(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "spa-shell starting");

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config, cli.config).await,
        Commands::Build { watch: false } => {
            let report = Pipeline::new(config.assets).run()?;
            println!("script      {}", report.script.display());
            println!("stylesheet  {}", report.stylesheet.display());
            if let Some(manifest) = report.manifest {
                println!("manifest    {}", manifest.display());
            }
            Ok(())
        }
        Commands::Build { watch: true } => {
            let shutdown = Shutdown::new();
            shutdown.trigger_on_signal();
            watch(Pipeline::new(config.assets), shutdown.subscribe()).await?;
            Ok(())
        }
        Commands::Routes { paths } => {
            let table = RouteTable::from_config(&config.routes);
            let paths = if paths.is_empty() {
                table.routes().iter().map(|r| r.path.clone()).collect()
            } else {
                paths
            };
            for path in paths {
                let resolution = table.resolve(&path);
                println!("{path:<30} {:<12} {}", resolution.name, resolution.view);
            }
            Ok(())
        }
    }
}

async fn serve(
    config: ShellConfig,
    config_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // A rebuild rewrites the manifest; the shell must pick up the new versions.
    let manifest_path = config.shell.use_manifest.then(|| {
        AssetManifest::path_in(&PathBuf::from(&config.assets.root).join(&config.assets.public_dir))
    });

    // Keep the watcher alive for the whole serve loop.
    let (_watcher, reloads) = if config_path.is_some() || manifest_path.is_some() {
        let (watcher, reloads) =
            ConfigWatcher::new(config_path.as_deref(), manifest_path.as_deref());
        (Some(watcher.run()?), reloads)
    } else {
        (None, mpsc::unbounded_channel().1)
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    HttpServer::new(config)
        .run(listener, reloads, shutdown.subscribe())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
