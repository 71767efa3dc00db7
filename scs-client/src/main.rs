use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use scs_core::{Layout, ManagedService};
use scs_runner::{reset_log_dir, run_setup, services, SetupContext, SetupExecutor, SetupSteps};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scs-setup")]
#[command(about = "Download, install, start and stop a local Hadoop + Hive metastore", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Project directory holding conf/, bin/ and build/ (default: ./setup)
    #[arg(long, global = true)]
    project_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the steps enabled in conf/setup.cfg (default)
    Run,

    /// Stop services, then download fresh binary archives
    Download,

    /// Stop services, then extract the downloaded archives
    Install,

    /// Start one service, or all of them
    Start {
        #[arg(short, long, value_enum)]
        service: Option<ServiceArg>,
    },

    /// Stop one service, or all of them
    Stop {
        #[arg(short, long, value_enum)]
        service: Option<ServiceArg>,
    },

    /// Print the environment exports for a service without running anything
    Env {
        #[arg(value_enum)]
        service: ServiceArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ServiceArg {
    Hadoop,
    Metastore,
}

impl From<ServiceArg> for ManagedService {
    fn from(arg: ServiceArg) -> Self {
        match arg {
            ServiceArg::Hadoop => ManagedService::Hadoop,
            ServiceArg::Metastore => ManagedService::Metastore,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let project_dir = match cli.project_dir {
        Some(dir) => dir,
        None => std::env::current_dir()
            .context("Failed to determine current directory")?
            .join("setup"),
    };
    let layout = Layout::new(&project_dir);

    let command = cli.command.unwrap_or(Commands::Run);
    let executor = match command {
        Commands::Env { service } => {
            print!("{}", services::environment(service.into(), &layout).to_exports());
            return Ok(());
        }
        _ => load_executor(&layout)?,
    };

    match command {
        Commands::Run => {
            let flags = executor.context().config.flags();
            let project_dir = executor.context().layout.project_dir();
            info!(?flags, project_dir = %project_dir.display(), "Running setup");
            run_setup(&executor, flags).await?;
        }
        Commands::Download => executor.download_binaries().await?,
        Commands::Install => executor.setup_binaries().await?,
        Commands::Start { service } => match service {
            Some(service) => executor.start(service.into()).await?,
            None => executor.start_all().await?,
        },
        Commands::Stop { service } => match service {
            Some(service) => executor.stop(service.into()).await?,
            None => executor.stop_all().await?,
        },
        Commands::Env { .. } => {}
    }

    Ok(())
}

/// Clear the previous run's logs and load `conf/setup.cfg`.
fn load_executor(layout: &Layout) -> anyhow::Result<SetupExecutor> {
    reset_log_dir(layout)
        .with_context(|| format!("Failed to prepare log dir {}", layout.log_dir().display()))?;
    let context = SetupContext::load(layout.clone()).with_context(|| {
        format!(
            "Failed to load config from {}",
            layout.config_file().display()
        )
    })?;
    Ok(SetupExecutor::new(context))
}
