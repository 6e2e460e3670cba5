use std::path::Path;

use chronodeck_core::Config;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file path in use
    Path,
}

pub fn run(
    action: ConfigAction,
    path: &Path,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => print!("{}", config.to_toml()),
        ConfigAction::Path => println!("{}", path.display()),
    }
    Ok(())
}
