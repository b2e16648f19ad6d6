use crate::discovery::{discover_routes, RouteEntry};
use crate::runtime_config::RuntimeConfig;
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Command-line interface for fsrouter
#[derive(Parser)]
#[command(name = "fsrouter")]
#[command(about = "Inspect directory-discovered routes", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover routes and print the resulting table
    ///
    /// Exits non-zero on a fatal configuration error such as two files
    /// resolving to the same path and method.
    Routes {
        /// Root of the route tree (overrides config and FSR_ROUTES_DIR)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Prefix for every route path (overrides config and FSR_ROUTE_PREFIX)
        #[arg(short, long)]
        prefix: Option<String>,

        /// YAML or JSON config file; environment variables are used when absent
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the table as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

/// Execute the CLI command provided by the user
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded or discovery fails.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    run(&cli, &mut stdout.lock())
}

/// Execute `cli`, writing the report to `out`.
///
/// # Errors
///
/// See [`run_cli`].
pub fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Routes {
            dir,
            prefix,
            config,
            json,
        } => {
            let mut settings = match config {
                Some(path) => RuntimeConfig::from_file(path)?,
                None => RuntimeConfig::from_env(),
            };
            if let Some(dir) = dir {
                settings.routes_dir = dir.clone();
            }
            if let Some(prefix) = prefix {
                settings.route_prefix = Some(prefix.clone());
            }

            let entries = discover_routes(&settings.routes_dir, settings.prefix())
                .with_context(|| format!("failed to build routes from '{}'", settings.routes_dir.display()))?;
            info!(dir = %settings.routes_dir.display(), routes = entries.len(), "routes discovered");

            if *json {
                write_json(&entries, out)?;
            } else {
                write_table(&entries, out)?;
            }
            Ok(())
        }
    }
}

fn write_json(entries: &[RouteEntry], out: &mut impl Write) -> anyhow::Result<()> {
    let rows: Vec<_> = entries
        .iter()
        .map(|e| {
            json!({
                "method": e.method.as_str(),
                "path": e.path,
                "handler": e.handler_location,
            })
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &rows)?;
    writeln!(out)?;
    Ok(())
}

fn write_table(entries: &[RouteEntry], out: &mut impl Write) -> anyhow::Result<()> {
    let path_width = entries.iter().map(|e| e.path.len()).max().unwrap_or(0);
    for e in entries {
        writeln!(
            out,
            "{:<7} {:<width$}  {}",
            e.method.as_str(),
            e.path,
            e.handler_location,
            width = path_width
        )?;
    }
    writeln!(out, "{} route(s)", entries.len())?;
    Ok(())
}
