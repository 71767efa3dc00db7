use scs_core::{Layout, Result, SetupConfig};
use scs_parser::load_setup_cfg;

/// Everything an operation needs, built once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct SetupContext {
    pub layout: Layout,
    pub config: SetupConfig,
}

impl SetupContext {
    pub fn new(layout: Layout, config: SetupConfig) -> Self {
        Self { layout, config }
    }

    /// Load `conf/setup.cfg` from the project directory.
    pub fn load(layout: Layout) -> Result<Self> {
        let config = load_setup_cfg(layout.config_file())?;
        Ok(Self::new(layout, config))
    }
}
