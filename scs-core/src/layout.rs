use std::path::{Path, PathBuf};

use crate::models::{Distribution, ManagedService};

/// Filesystem layout of a setup project directory.
///
/// Every path the tool reads or writes is derived from the project dir, so a test can
/// point the whole tool at a temporary directory. The project dir is made absolute
/// against the current directory: these paths are handed to child processes running
/// elsewhere and written into `env_vars.sh`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    project_dir: PathBuf,
}

impl Layout {
    pub fn new<P: AsRef<Path>>(project_dir: P) -> Self {
        let project_dir = project_dir.as_ref();
        Self {
            project_dir: std::path::absolute(project_dir)
                .unwrap_or_else(|_| project_dir.to_path_buf()),
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.project_dir.join("conf").join("setup.cfg")
    }

    pub fn build_dir(&self) -> PathBuf {
        self.project_dir.join("build")
    }

    /// Directory the tool owns and destructively manages.
    pub fn binaries_dir(&self) -> PathBuf {
        self.build_dir().join("binaries")
    }

    pub fn archive(&self, dist: Distribution) -> PathBuf {
        self.binaries_dir().join(dist.archive_name())
    }

    /// Extraction target of a distribution.
    pub fn install_dir(&self, dist: Distribution) -> PathBuf {
        self.binaries_dir().join(dist.name())
    }

    pub fn log_dir(&self) -> PathBuf {
        self.build_dir().join("logs")
    }

    pub fn stdout_log(&self) -> PathBuf {
        self.log_dir().join("scs.setup.out")
    }

    pub fn stderr_log(&self) -> PathBuf {
        self.log_dir().join("scs.setup.err")
    }

    pub fn operator_script(&self, name: &str) -> PathBuf {
        self.project_dir.join("bin").join(name)
    }

    pub fn service_home(&self, service: ManagedService) -> PathBuf {
        self.install_dir(service.distribution())
    }

    /// Configuration directory inside the installed binaries.
    pub fn service_conf_dir(&self, service: ManagedService) -> PathBuf {
        let home = self.service_home(service);
        match service {
            ManagedService::Hadoop => home.join("etc").join("hadoop"),
            ManagedService::Metastore => home.join("conf"),
        }
    }

    /// Operator-provided config fragments overlaid onto the service's conf dir.
    pub fn service_conf_source(&self, service: ManagedService) -> PathBuf {
        self.project_dir.join("conf").join(service.name())
    }

    pub fn env_file(&self, service: ManagedService) -> PathBuf {
        self.service_home(service).join("env_vars.sh")
    }
}
