use crate::grammar::{Rule, SetupCfgParser};
use pest::Parser;
use scs_core::{Result, SetupConfig, SetupError};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read and parse a `setup.cfg` file. A missing or unreadable file is an error.
pub fn load_setup_cfg<P: AsRef<Path>>(path: P) -> Result<SetupConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| SetupError::fs(path, e))?;
    let config = parse_setup_cfg(&content)?;
    debug!(path = %path.display(), entries = config.len(), "Loaded setup config");
    Ok(config)
}

/// Parse `key=value` lines into a [`SetupConfig`].
///
/// Keys and values are trimmed, blank lines skipped, and the last occurrence of a
/// duplicate key wins.
pub fn parse_setup_cfg(input: &str) -> Result<SetupConfig> {
    let mut pairs = SetupCfgParser::parse(Rule::config, input)
        .map_err(|e| SetupError::ParseError(format!("setup.cfg: {}", e)))?;

    let config_pair = pairs
        .next()
        .ok_or_else(|| SetupError::ParseError("setup.cfg: empty parse".to_string()))?;

    let mut config = SetupConfig::new();
    for pair in config_pair.into_inner() {
        if pair.as_rule() != Rule::entry {
            continue;
        }
        let (key, value) = parse_entry(pair);
        config.insert(key, value);
    }

    Ok(config)
}

fn parse_entry(pair: pest::iterators::Pair<Rule>) -> (String, String) {
    let mut key = String::new();
    let mut value = String::new();

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::key => key = inner_pair.as_str().trim().to_string(),
            Rule::value => value = inner_pair.as_str().trim().to_string(),
            _ => {}
        }
    }

    (key, value)
}
