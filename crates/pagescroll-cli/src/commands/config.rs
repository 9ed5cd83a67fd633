use anyhow::{Context, Result};

use pagescroll_core::AppConfig;

/// Print the effective configuration as TOML
pub fn show(config: &AppConfig) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    println!("# {}", AppConfig::config_path().display());
    print!("{}", content);
    Ok(())
}

/// Write the default configuration file
pub fn init(force: bool) -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() && !force {
        println!("Config already exists at {}", path.display());
        println!("Use --force to overwrite it.");
        return Ok(());
    }

    AppConfig::default().save().context("Failed to write config")?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

pub fn path() -> Result<()> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}
