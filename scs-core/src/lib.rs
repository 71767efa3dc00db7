pub mod config;
pub mod error;
pub mod layout;
pub mod models;

pub use config::SetupConfig;
pub use error::{Result, SetupError};
pub use layout::Layout;
pub use models::*;
