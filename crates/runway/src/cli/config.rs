//! The `runway config` command.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use runway_core::Config;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,

    /// Print the config file location
    Path,

    /// Write a config file with every default spelled out
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a config file and summarize what it selects
    Check {
        /// File to check instead of the default location
        file: Option<PathBuf>,
    },
}

pub fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => println!("{}", Config::load()?.to_toml()?),

        ConfigCommand::Path => println!("{}", Config::default_path().display()),

        ConfigCommand::Init { force } => {
            let path = Config::default_path();
            write_default(&path, force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }

        ConfigCommand::Check { file } => {
            let path = file.unwrap_or_else(Config::default_path);
            let config = Config::load_from(&path)?;
            println!("{} is valid", path.display());
            println!("  image root:  {}", config.image_root().display());
            println!("  model:       {}", config.embedding_model_dir().display());
            println!(
                "  catalog:     {} designers, {} seasons, {} years, {} shows",
                config.catalog.designers.len(),
                config.catalog.seasons.len(),
                config.catalog.years.len(),
                config.catalog.shows.len()
            );
            println!("  vocabulary:  {} labels", config.vocabulary().len());
        }
    }

    Ok(())
}

fn write_default(path: &std::path::Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default().to_toml()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        write_default(&path, false).unwrap();
        assert!(write_default(&path, false).is_err());
        write_default(&path, true).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.vocabulary().len(), 141);
    }
}
