mod grammar;
pub mod parser;

pub use parser::{load_setup_cfg, parse_setup_cfg};
