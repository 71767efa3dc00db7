use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "setup.pest"]
pub struct SetupCfgParser;
