use scs_core::{Layout, ManagedService};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

// Writing a script while another test forks can leave the script busy (ETXTBSY)
// when it is executed, so tests that write or spawn executables run one at a time.
static SPAWN_LOCK: Mutex<()> = Mutex::new(());

pub(crate) fn spawn_guard() -> MutexGuard<'static, ()> {
    SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

pub(crate) fn write_script(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).unwrap();
}

/// A temporary project dir with fake distributions and tools.
pub(crate) struct FakeProject {
    pub dir: TempDir,
    pub layout: Layout,
}

impl FakeProject {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path());
        Self { dir, layout }
    }

    /// Project under the current directory, addressed by a relative path.
    pub fn relative() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("scs-project-")
            .tempdir_in(".")
            .unwrap();
        let layout = Layout::new(relative_path(dir.path()));
        Self { dir, layout }
    }

    /// Installed hadoop whose start scripts refuse to start twice without a stop.
    pub fn install_hadoop(&self) {
        let home = self.layout.service_home(ManagedService::Hadoop);
        write_script(
            &home.join("bin/hdfs"),
            "echo \"hdfs $*\" >> \"$HADOOP_HOME/calls\"",
        );
        write_script(
            &home.join("sbin/start-dfs.sh"),
            "if [ -f \"$HDFS_HOME/dfs.pid\" ]; then echo 'dfs already running' >&2; exit 1; fi\n\
             touch \"$HDFS_HOME/dfs.pid\"",
        );
        write_script(
            &home.join("sbin/start-yarn.sh"),
            "if [ -f \"$YARN_HOME/yarn.pid\" ]; then echo 'yarn already running' >&2; exit 1; fi\n\
             touch \"$YARN_HOME/yarn.pid\"",
        );
        write_script(
            &home.join("sbin/stop-all.sh"),
            "rm -f \"$HADOOP_HOME/dfs.pid\" \"$HADOOP_HOME/yarn.pid\"",
        );
        let overlay = self.layout.service_conf_source(ManagedService::Hadoop);
        fs::create_dir_all(&overlay).unwrap();
        fs::write(overlay.join("core-site.xml"), "<configuration/>").unwrap();
    }

    pub fn install_metastore(&self) {
        fs::create_dir_all(self.layout.service_home(ManagedService::Metastore)).unwrap();
        write_script(
            &self.layout.operator_script("start-metastore.sh"),
            "if [ -f \"$HIVE_HOME/metastore.pid\" ]; then exit 1; fi\n\
             test -d \"$HADOOP_CONF_DIR\" || exit 4\n\
             touch \"$HIVE_HOME/metastore.pid\"",
        );
        write_script(
            &self.layout.operator_script("stop-metastore.sh"),
            "rm -f \"$HIVE_HOME/metastore.pid\"",
        );
        let overlay = self.layout.service_conf_source(ManagedService::Metastore);
        fs::create_dir_all(&overlay).unwrap();
        fs::write(overlay.join("hive-site.xml"), "<configuration/>").unwrap();
    }

    /// Write an executable stand-in for an external tool and return its path.
    pub fn tool(&self, name: &str, body: &str) -> String {
        let path = self.dir.path().join("tools").join(name);
        write_script(&path, body);
        path.display().to_string()
    }
}

/// Last component of `path`, usable as a path relative to its parent.
pub(crate) fn relative_path(path: &Path) -> PathBuf {
    PathBuf::from(path.file_name().unwrap())
}

/// Collects formatted tracing output for assertions.
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
