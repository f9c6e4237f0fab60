//! droidkit command line entry point

use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use droidkit::commands::{BuildApkCommand, CollectSourcesCommand, FetchGradleCommand};
use droidkit::project::ProjectContext;
use droidkit_core::{APP_NAME, VERSION};

/// Fetch Gradle, scaffold an Android project and assemble it
#[derive(Debug, Parser)]
#[command(name = "droidkit", version, about)]
struct Cli {
    /// Download and extract the Gradle distribution
    #[arg(long = "g")]
    fetch_gradle: bool,

    /// Report every .vue file under the working directory
    #[arg(long = "vue")]
    vue: bool,

    /// With --vue: scaffold the Android project and assemble a debug APK
    #[arg(long = "build-apk", requires = "vue")]
    build_apk: bool,

    /// Print the --vue report as JSON
    #[arg(long)]
    json: bool,

    /// Working directory (default: current directory)
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Configuration file (default: ./droidkit.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More output (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Translate the verbosity counter and quiet flag to a level string
fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Initialize logging; `RUST_LOG` overrides the flags
fn init_logging(cli: &Cli) -> Result<()> {
    let level = log_level(cli.verbose, cli.quiet);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "droidkit={level},droidkit_core={level},droidkit_android_toolchain={level},droidkit_build_engine={level}"
        ))
    });

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    debug!("{} v{} starting...", APP_NAME, VERSION);

    if !cli.fetch_gradle && !cli.vue {
        debug!("No command given");
        return Ok(());
    }

    let context = ProjectContext::load(cli.dir.as_deref(), cli.config.as_deref()).await?;

    if cli.fetch_gradle {
        FetchGradleCommand { show_progress: !cli.quiet }
            .execute(&context)
            .await?;
    }

    if cli.vue {
        let report = CollectSourcesCommand::vue(cli.json).execute(&context)?;
        info!("Found {} .vue file(s)", report.files.len());

        if cli.build_apk {
            BuildApkCommand.execute(&context).await?;
        }
    }

    Ok(())
}
