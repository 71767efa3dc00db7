//! Per-service definitions: environment, control-script commands and the
//! files written around them.

use scs_core::{Environment, ExecRequest, Layout, ManagedService, Result, SetupError};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Environment the service's own control scripts expect.
///
/// The metastore scripts also need to find the Hadoop installation, so its mapping
/// is the Hadoop one plus the Hive variables.
pub fn environment(service: ManagedService, layout: &Layout) -> Environment {
    let hadoop_home = layout.service_home(ManagedService::Hadoop);
    let hadoop_conf = layout.service_conf_dir(ManagedService::Hadoop);
    let env = hadoop_env(&hadoop_home, &hadoop_conf);

    match service {
        ManagedService::Hadoop => env,
        ManagedService::Metastore => env
            .with_var("HIVE_HOME", path_str(&layout.service_home(service)))
            .with_var("HIVE_HOME_CONF", path_str(&layout.service_conf_dir(service))),
    }
}

fn hadoop_env(home: &Path, conf: &Path) -> Environment {
    let home = path_str(home);
    let conf = path_str(conf);
    Environment::new()
        .with_var("HADOOP_HOME", home.clone())
        .with_var("HADOOP_CONF_DIR", conf.clone())
        .with_var("HDFS_HOME", home.clone())
        .with_var("HDFS_CONF_DIR", conf.clone())
        .with_var("YARN_HOME", home)
        .with_var("YARN_CONF_DIR", conf)
}

/// Commands that bring the service up, in order. All run from the service home.
pub fn start_requests(
    service: ManagedService,
    layout: &Layout,
    env: &Environment,
) -> Vec<ExecRequest> {
    let home = layout.service_home(service);
    let request = |program: String| ExecRequest::new(program, &home).with_env(env.clone());

    match service {
        ManagedService::Hadoop => vec![
            request("bin/hdfs".to_string()).args(["namenode", "-format", "-force"]),
            request("sbin/start-dfs.sh".to_string()),
            request("sbin/start-yarn.sh".to_string()),
        ],
        ManagedService::Metastore => vec![request(path_str(
            &layout.operator_script("start-metastore.sh"),
        ))],
    }
}

pub fn stop_request(service: ManagedService, layout: &Layout, env: &Environment) -> ExecRequest {
    let home = layout.service_home(service);
    let program = match service {
        ManagedService::Hadoop => "sbin/stop-all.sh".to_string(),
        ManagedService::Metastore => path_str(&layout.operator_script("stop-metastore.sh")),
    };
    ExecRequest::new(program, home).with_env(env.clone())
}

/// Copy every regular file of the operator's config overlay into the service's
/// conf dir, replacing files with the same name. Returns the number of files copied.
pub async fn overlay_config(service: ManagedService, layout: &Layout) -> Result<usize> {
    let src = layout.service_conf_source(service);
    let dst = layout.service_conf_dir(service);

    fs::create_dir_all(&dst)
        .await
        .map_err(|e| SetupError::fs(&dst, e))?;

    let mut entries = fs::read_dir(&src)
        .await
        .map_err(|e| SetupError::fs(&src, e))?;
    let mut copied = 0;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| SetupError::fs(&src, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| SetupError::fs(entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }
        let target = dst.join(entry.file_name());
        fs::copy(entry.path(), &target)
            .await
            .map_err(|e| SetupError::fs(&target, e))?;
        debug!(service = %service, file = %target.display(), "Copied config file");
        copied += 1;
    }

    Ok(copied)
}

/// Write the environment as `env_vars.sh` in the service home for operators to source.
pub async fn write_env_file(
    service: ManagedService,
    layout: &Layout,
    env: &Environment,
) -> Result<PathBuf> {
    let path = layout.env_file(service);
    fs::write(&path, env.to_exports())
        .await
        .map_err(|e| SetupError::fs(&path, e))?;
    Ok(path)
}

fn path_str(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hadoop_environment() {
        let layout = Layout::new("/p");
        let env = environment(ManagedService::Hadoop, &layout);
        assert_eq!(env.len(), 6);
        assert_eq!(env.get("HADOOP_HOME"), Some("/p/build/binaries/hadoop"));
        assert_eq!(
            env.get("YARN_CONF_DIR"),
            Some("/p/build/binaries/hadoop/etc/hadoop")
        );
        assert_eq!(env.get("HIVE_HOME"), None);
    }

    #[test]
    fn test_metastore_environment_includes_hadoop() {
        let layout = Layout::new("/p");
        let env = environment(ManagedService::Metastore, &layout);
        assert_eq!(env.len(), 8);
        assert_eq!(env.get("HDFS_HOME"), Some("/p/build/binaries/hadoop"));
        assert_eq!(env.get("HIVE_HOME"), Some("/p/build/binaries/hive"));
        assert_eq!(env.get("HIVE_HOME_CONF"), Some("/p/build/binaries/hive/conf"));
    }

    #[test]
    fn test_hadoop_start_sequence() {
        let layout = Layout::new("/p");
        let env = environment(ManagedService::Hadoop, &layout);
        let commands: Vec<String> = start_requests(ManagedService::Hadoop, &layout, &env)
            .iter()
            .map(|r| r.to_string())
            .collect();
        assert_eq!(
            commands,
            vec![
                "bin/hdfs namenode -format -force",
                "sbin/start-dfs.sh",
                "sbin/start-yarn.sh",
            ]
        );
    }

    #[test]
    fn test_metastore_scripts_come_from_project_bin() {
        let layout = Layout::new("/p");
        let env = environment(ManagedService::Metastore, &layout);
        let start = start_requests(ManagedService::Metastore, &layout, &env);
        assert_eq!(start.len(), 1);
        assert_eq!(start[0].program, "/p/bin/start-metastore.sh");
        assert_eq!(start[0].working_dir, PathBuf::from("/p/build/binaries/hive"));
        assert_eq!(start[0].env, env);

        let stop = stop_request(ManagedService::Metastore, &layout, &env);
        assert_eq!(stop.program, "/p/bin/stop-metastore.sh");
    }

    #[tokio::test]
    async fn test_overlay_config_overwrites_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path());
        let src = layout.service_conf_source(ManagedService::Hadoop);
        let dst = layout.service_conf_dir(ManagedService::Hadoop);
        std::fs::create_dir_all(&src).unwrap();
        std::fs::create_dir_all(&dst).unwrap();
        std::fs::create_dir_all(src.join("nested")).unwrap();
        std::fs::write(src.join("core-site.xml"), "new").unwrap();
        std::fs::write(src.join("hdfs-site.xml"), "hdfs").unwrap();
        std::fs::write(dst.join("core-site.xml"), "old").unwrap();
        std::fs::write(dst.join("yarn-site.xml"), "untouched").unwrap();

        let copied = overlay_config(ManagedService::Hadoop, &layout).await.unwrap();

        assert_eq!(copied, 2);
        assert_eq!(std::fs::read_to_string(dst.join("core-site.xml")).unwrap(), "new");
        assert_eq!(std::fs::read_to_string(dst.join("hdfs-site.xml")).unwrap(), "hdfs");
        assert_eq!(
            std::fs::read_to_string(dst.join("yarn-site.xml")).unwrap(),
            "untouched"
        );
        assert!(!dst.join("nested").exists());
    }

    #[tokio::test]
    async fn test_overlay_config_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path());
        let result = overlay_config(ManagedService::Metastore, &layout).await;
        assert!(matches!(result, Err(SetupError::FileSystem { .. })));
    }

    #[tokio::test]
    async fn test_env_file_has_one_export_per_variable() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path());
        std::fs::create_dir_all(layout.service_home(ManagedService::Metastore)).unwrap();
        let env = environment(ManagedService::Metastore, &layout);

        let path = write_env_file(ManagedService::Metastore, &layout, &env)
            .await
            .unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), env.len());
        let unique: HashSet<&str> = lines.iter().copied().collect();
        assert_eq!(unique.len(), lines.len());
        for (key, value) in env.iter() {
            assert!(lines.contains(&format!("export {}={}", key, value).as_str()));
        }
    }
}
