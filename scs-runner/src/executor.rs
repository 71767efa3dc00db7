use crate::binaries;
use crate::context::SetupContext;
use crate::process::CommandRunner;
use crate::services;
use async_trait::async_trait;
use scs_core::{Distribution, ManagedService, Result, SetupFlags, StopOutcome};
use tracing::{debug, info, warn};

/// The four top-level operations `setup.cfg` can switch on.
#[async_trait]
pub trait SetupSteps {
    async fn download_binaries(&self) -> Result<()>;
    async fn setup_binaries(&self) -> Result<()>;
    async fn start_all(&self) -> Result<()>;
    async fn stop_all(&self) -> Result<()>;
}

/// Run the enabled steps in fixed order: download, setup, start, stop.
///
/// Each step finishes before the next begins; the first error aborts the run.
pub async fn run_setup<S: SetupSteps + ?Sized>(steps: &S, flags: SetupFlags) -> Result<()> {
    if !flags.any() {
        info!("No steps enabled in setup.cfg");
    }
    if flags.download_binaries {
        steps.download_binaries().await?;
    }
    if flags.setup_binaries {
        steps.setup_binaries().await?;
    }
    if flags.start_all {
        steps.start_all().await?;
    }
    if flags.stop_all {
        steps.stop_all().await?;
    }
    Ok(())
}

/// Drives acquisition, installation and service lifecycle for one project dir
pub struct SetupExecutor {
    context: SetupContext,
    runner: CommandRunner,
}

impl SetupExecutor {
    pub fn new(context: SetupContext) -> Self {
        let runner = CommandRunner::for_layout(&context.layout);
        Self { context, runner }
    }

    pub fn context(&self) -> &SetupContext {
        &self.context
    }

    /// Start a service, stopping any previous instance first.
    ///
    /// "Started" means the service's start scripts exited 0; there is no readiness check.
    pub async fn start(&self, service: ManagedService) -> Result<()> {
        let layout = &self.context.layout;
        info!(service = %service, "Starting service");

        self.stop_best_effort(service).await;

        let copied = services::overlay_config(service, layout).await?;
        debug!(service = %service, files = copied, "Overlaid configuration");

        let env = services::environment(service, layout);
        for request in services::start_requests(service, layout, &env) {
            self.runner.exec(&request).await?;
        }

        let env_file = services::write_env_file(service, layout, &env).await?;
        info!(
            service = %service,
            env_file = %env_file.display(),
            "Service started"
        );
        Ok(())
    }

    /// Stop a service through its stop script; a failing script is an error.
    ///
    /// The script always runs, so a missing service home surfaces as a spawn error.
    pub async fn stop(&self, service: ManagedService) -> Result<()> {
        let layout = &self.context.layout;
        info!(service = %service, "Stopping service");
        let env = services::environment(service, layout);
        self.runner
            .exec(&services::stop_request(service, layout, &env))
            .await
    }

    /// Stop a service, turning any failure into [`StopOutcome::Failed`].
    ///
    /// A service whose binaries are not installed cannot be running, so nothing
    /// is executed and `NotRunning` is returned.
    pub async fn stop_best_effort(&self, service: ManagedService) -> StopOutcome {
        let home = self.context.layout.service_home(service);
        if !home.is_dir() {
            debug!(service = %service, home = %home.display(), "Not installed, nothing to stop");
            return StopOutcome::NotRunning;
        }

        match self.stop(service).await {
            Ok(()) => StopOutcome::Stopped,
            Err(e) => {
                warn!(service = %service, reason = %e, "Ignoring failed stop");
                StopOutcome::Failed(e.to_string())
            }
        }
    }

    /// Attempt to stop every service; each is tried regardless of the others.
    pub async fn stop_all_best_effort(&self) -> Vec<(ManagedService, StopOutcome)> {
        let mut outcomes = Vec::with_capacity(ManagedService::ALL.len());
        for service in ManagedService::ALL {
            outcomes.push((service, self.stop_best_effort(service).await));
        }
        outcomes
    }

    async fn download(&self) -> Result<()> {
        let outcomes = self.stop_all_best_effort().await;
        debug!(?outcomes, "Stopped services before download");

        let dir = self.context.layout.binaries_dir();
        binaries::recreate_dir(&dir).await?;

        for dist in Distribution::ALL {
            let request =
                binaries::download_request(dist, &self.context.layout, &self.context.config)?;
            info!(distribution = dist.name(), "Downloading binaries");
            self.runner.exec(&request).await?;
        }
        Ok(())
    }

    async fn install(&self) -> Result<()> {
        let outcomes = self.stop_all_best_effort().await;
        debug!(?outcomes, "Stopped services before install");

        for dist in Distribution::ALL {
            let target = self.context.layout.install_dir(dist);
            binaries::recreate_dir(&target).await?;
            info!(
                distribution = dist.name(),
                target = %target.display(),
                "Extracting binaries"
            );
            let request =
                binaries::extract_request(dist, &self.context.layout, &self.context.config);
            self.runner.exec(&request).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl SetupSteps for SetupExecutor {
    async fn download_binaries(&self) -> Result<()> {
        self.download().await
    }

    async fn setup_binaries(&self) -> Result<()> {
        self.install().await
    }

    async fn start_all(&self) -> Result<()> {
        for service in ManagedService::ALL {
            self.start(service).await?;
        }
        Ok(())
    }

    async fn stop_all(&self) -> Result<()> {
        for service in ManagedService::ALL {
            self.stop(service).await?;
        }
        Ok(())
    }
}
