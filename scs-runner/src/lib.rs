pub mod binaries;
pub mod context;
pub mod executor;
pub mod process;
pub mod services;

#[cfg(all(test, unix))]
mod test_support;

pub use context::SetupContext;
pub use executor::{run_setup, SetupExecutor, SetupSteps};
pub use process::{reset_log_dir, CommandRunner};
