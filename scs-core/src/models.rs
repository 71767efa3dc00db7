use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// A downloaded binary distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Distribution {
    Hadoop,
    Hive,
}

impl Distribution {
    /// Acquisition and installation order
    pub const ALL: [Distribution; 2] = [Distribution::Hadoop, Distribution::Hive];

    pub fn name(&self) -> &'static str {
        match self {
            Distribution::Hadoop => "hadoop",
            Distribution::Hive => "hive",
        }
    }

    pub fn archive_name(&self) -> &'static str {
        match self {
            Distribution::Hadoop => "hadoop.tar.gz",
            Distribution::Hive => "hive.tar.gz",
        }
    }

    /// Configuration key holding the download URL
    pub fn url_key(&self) -> &'static str {
        match self {
            Distribution::Hadoop => "hadoop.tgz.url",
            Distribution::Hive => "hive.tgz.url",
        }
    }
}

/// A long-running daemon whose lifecycle is driven through its bundled scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagedService {
    Hadoop,
    Metastore,
}

impl ManagedService {
    /// Start order. Stop-all uses the same order.
    pub const ALL: [ManagedService; 2] = [ManagedService::Hadoop, ManagedService::Metastore];

    pub fn name(&self) -> &'static str {
        match self {
            ManagedService::Hadoop => "hadoop",
            ManagedService::Metastore => "metastore",
        }
    }

    pub fn distribution(&self) -> Distribution {
        match self {
            ManagedService::Hadoop => Distribution::Hadoop,
            ManagedService::Metastore => Distribution::Hive,
        }
    }
}

impl fmt::Display for ManagedService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Variables a service's own scripts need to locate its home and config directories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render as a shell-sourceable script, one `export KEY=VALUE` line per variable.
    pub fn to_exports(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("export {}={}\n", k, v))
            .collect()
    }
}

/// A command to run as a child process.
///
/// Arguments are kept as a list and handed to the child verbatim; nothing is split
/// on whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub env: Environment,
    pub sys_props: BTreeMap<String, String>,
}

impl ExecRequest {
    pub fn new<P: AsRef<Path>>(program: impl Into<String>, working_dir: P) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: working_dir.as_ref().to_path_buf(),
            env: Environment::new(),
            sys_props: BTreeMap::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    pub fn with_sys_prop(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.sys_props.insert(key.into(), value.into());
        self
    }

    /// Full argument vector: the explicit arguments followed by one `-Dkey=value`
    /// per system property.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = self.args.clone();
        argv.extend(self.sys_props.iter().map(|(k, v)| format!("-D{}={}", k, v)));
        argv
    }
}

impl fmt::Display for ExecRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in self.argv() {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Result of a stop whose failure the caller has chosen to tolerate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    /// Nothing installed, so nothing can be running
    NotRunning,
    Failed(String),
}

impl StopOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StopOutcome::Failed(_))
    }
}

/// The four independent switches read from `setup.cfg`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetupFlags {
    pub download_binaries: bool,
    pub setup_binaries: bool,
    pub start_all: bool,
    pub stop_all: bool,
}

impl SetupFlags {
    pub fn any(&self) -> bool {
        self.download_binaries || self.setup_binaries || self.start_all || self.stop_all
    }
}
