//! Command-line entry point: one pipeline run, then a report, stats or the API.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rxnorm_boss_core::{DataPaths, HtmlReport, Snapshot};

/// Default report file name inside the data directory.
pub const REPORT_FILE_NAME: &str = "rxnorm_boss_view.html";

#[derive(Debug, Parser)]
#[command(name = "rxnorm-boss")]
#[command(about = "Group RxNorm Basis of Strength attributes by Parent and SCDC", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub data: DataArgs,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Where the RxNorm release files live.
#[derive(Debug, Clone, Args)]
pub struct DataArgs {
    /// Directory holding RXNSAT.RRF and RXNCONSO.RRF
    #[arg(long, global = true, env = "RXNORM_BOSS_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Override the RXNSAT.RRF path
    #[arg(long, global = true)]
    pub rxnsat: Option<PathBuf>,

    /// Override the RXNCONSO.RRF path
    #[arg(long, global = true)]
    pub rxnconso: Option<PathBuf>,
}

impl DataArgs {
    pub fn paths(&self) -> DataPaths {
        let defaults = DataPaths::in_dir(&self.data_dir);
        DataPaths {
            rxnconso: self.rxnconso.clone().unwrap_or(defaults.rxnconso),
            rxnsat: self.rxnsat.clone().unwrap_or(defaults.rxnsat),
        }
    }

    /// The report path: explicit, else next to the data.
    pub fn report_path(&self, out: Option<PathBuf>) -> PathBuf {
        out.unwrap_or_else(|| self.data_dir.join(REPORT_FILE_NAME))
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write the self-contained HTML report
    Report {
        /// Output file (default: <data-dir>/rxnorm_boss_view.html)
        #[arg(long, env = "RXNORM_BOSS_REPORT")]
        out: Option<PathBuf>,
    },

    /// Serve the read-only JSON API
    Serve {
        /// Address to listen on
        #[arg(long, env = "RXNORM_BOSS_BIND", default_value = "127.0.0.1:8000")]
        bind: SocketAddr,
    },

    /// Print the statistics as JSON
    Stats,
}

impl Cli {
    /// Initialise logging to stderr; `RUST_LOG` applies unless a flag overrides it.
    pub fn init_logging(&self) {
        let mut builder =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
        if self.quiet {
            builder.filter_level(log::LevelFilter::Warn);
        } else if self.verbose {
            builder.filter_level(log::LevelFilter::Debug);
        }
        builder.target(env_logger::Target::Stderr).init();
    }
}

/// Run the pipeline and then the selected command.
pub async fn run(cli: Cli) -> Result<()> {
    let paths = cli.data.paths();
    log::info!(
        "Loading {} and {}",
        paths.rxnconso.display(),
        paths.rxnsat.display()
    );
    let snapshot = Snapshot::load(&paths).context("Failed to build BoSS groups")?;

    match cli.command {
        Command::Report { out } => {
            let out = cli.data.report_path(out);
            HtmlReport::new(&snapshot)
                .write_to(&out)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!(
                "Wrote {} with {} Parent×SCDC rows.",
                out.display(),
                snapshot.len()
            );
        }
        Command::Stats => {
            let json = serde_json::to_string_pretty(&snapshot.stats)?;
            println!("{json}");
        }
        Command::Serve { bind } => serve(snapshot, bind).await?,
    }
    Ok(())
}

async fn serve(snapshot: Snapshot, bind: SocketAddr) -> Result<()> {
    let groups = snapshot.len();
    let app = crate::api::router(Arc::new(snapshot));

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    let base_url = format!("http://{}", listener.local_addr()?);

    log::info!("Serving {groups} groups at {base_url}/groups");
    log::info!("Statistics at {base_url}/stats, health at {base_url}/health");
    axum::serve(listener, app).await?;
    Ok(())
}
