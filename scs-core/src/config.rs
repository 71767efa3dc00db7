use std::collections::HashMap;

use crate::error::{Result, SetupError};
use crate::models::SetupFlags;

pub const DOWNLOAD_BINARIES: &str = "download.binaries";
pub const SETUP_BINARIES: &str = "setup.binaries";
pub const START_ALL: &str = "start.all";
pub const STOP_ALL: &str = "stop.all";
pub const TOOL_CURL: &str = "tool.curl";
pub const TOOL_TAR: &str = "tool.tar";

/// Flat `key=value` settings loaded from `conf/setup.cfg`.
///
/// Values are untyped strings; read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupConfig {
    entries: HashMap<String, String>,
}

impl SetupConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later inserts of the same key win.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| SetupError::MissingKey(key.to_string()))
    }

    /// `true` (any ASCII case) enables a flag; absent or anything else disables it.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn flags(&self) -> SetupFlags {
        SetupFlags {
            download_binaries: self.flag(DOWNLOAD_BINARIES),
            setup_binaries: self.flag(SETUP_BINARIES),
            start_all: self.flag(START_ALL),
            stop_all: self.flag(STOP_ALL),
        }
    }

    pub fn curl_program(&self) -> &str {
        self.get(TOOL_CURL).unwrap_or("curl")
    }

    pub fn tar_program(&self) -> &str {
        self.get(TOOL_TAR).unwrap_or("tar")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SetupConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = SetupConfig::new();
        for (k, v) in iter {
            config.insert(k, v);
        }
        config
    }
}
