//! # Config Command
//!
//! Shows the effective configuration or writes a default `config.toml`.

use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use flowbot_core::output::{print_header, print_info, print_success, print_warning};
use flowbot_core::{ConfigDirs, FlowbotConfig, get_config_dirs};

#[derive(Args)]
#[command(group(ArgGroup::new("action").required(true).args(["show", "init"])))]
pub struct ConfigArgs {
  /// Show the effective configuration (file plus environment overrides)
  #[arg(long)]
  pub show: bool,

  /// Write a default config.toml if none exists
  #[arg(long)]
  pub init: bool,
}

pub(crate) fn handle_config_command(args: ConfigArgs) -> Result<()> {
  let config_dirs = get_config_dirs()?;
  if args.init {
    init_config(&config_dirs)
  } else {
    show_config(&config_dirs)
  }
}

fn init_config(config_dirs: &ConfigDirs) -> Result<()> {
  let path = config_dirs.config_path();
  if config_dirs.write_default_config()? {
    print_success(&format!("Created {}", path.display()));
  } else {
    print_warning(&format!("{} already exists, leaving it unchanged", path.display()));
  }
  Ok(())
}

#[allow(clippy::print_stdout)]
fn show_config(config_dirs: &ConfigDirs) -> Result<()> {
  let path = config_dirs.config_path();
  let config = config_dirs.load_config()?;

  print_header("Configuration");
  if path.exists() {
    print_info(&format!("Loaded from {}", path.display()));
  } else {
    print_info(&format!("No config file at {}, showing defaults", path.display()));
  }
  println!("\n{}", render_config(&config)?);
  Ok(())
}

fn render_config(config: &FlowbotConfig) -> Result<String> {
  toml::to_string_pretty(config).context("Failed to serialize config to TOML")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_init_then_show_round_trip() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let dirs = ConfigDirs::at(temp.path());

    init_config(&dirs)?;
    assert!(dirs.config_path().exists());
    assert!(!dirs.write_default_config()?);

    let rendered = render_config(&FlowbotConfig::load(&dirs.config_path())?)?;
    assert!(rendered.contains("poll_interval_secs = 30"));
    assert!(rendered.contains("base_branch = \"develop\""));
    Ok(())
  }
}
