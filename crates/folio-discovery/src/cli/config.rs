// crates/folio-discovery/src/cli/config.rs
// Config command: print effective settings and validation

use anyhow::Result;
use folio::config::FolioConfig;

pub fn run_config(config: &FolioConfig) -> Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    println!();
    println!("{}", config.validate().report());
    Ok(())
}
