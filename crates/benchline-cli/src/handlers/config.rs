//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigFormat, ConfigInitArgs, ConfigShowArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use std::path::{Path, PathBuf};

/// Handle the config command
pub async fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Init(init_args) => handle_config_init(init_args, output),
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, output),
        ConfigAction::Path => handle_config_path(output),
    }
}

/// Handle config init subcommand
fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    let path = if args.user {
        Config::user_config_path()
            .ok_or_else(|| Error::config("Unable to determine user config directory"))?
    } else {
        Config::project_config_path()
    };

    if write_default_config(&path, args.force)? {
        output.success(&format!("✓ Created config at {}", path.display()))?;
        output.info("Edit it to set a default context, fixture file or result cap.")?;
    } else {
        output.warning(&format!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        ))?;
    }

    Ok(())
}

/// Write the default configuration unless a file exists and `force` is off
fn write_default_config(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    Config::default().save(path)?;
    Ok(true)
}

/// Handle config show subcommand
fn handle_config_show(args: ConfigShowArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let content = render_config(config, args.format)?;
    output.write(&content)?;
    if !content.ends_with('\n') {
        output.writeln("")?;
    }
    Ok(())
}

fn render_config(config: &Config, format: ConfigFormat) -> Result<String> {
    let extension = match format {
        ConfigFormat::Toml => "toml",
        ConfigFormat::Json => "json",
        ConfigFormat::Yaml => "yaml",
    };
    config.to_string_for(&PathBuf::from(format!("config.{}", extension)))
}

/// Handle config path subcommand
fn handle_config_path(output: &mut OutputWriter) -> Result<()> {
    let paths = Config::default_config_paths();
    let active = paths.iter().find(|p| p.exists()).cloned();

    for path in &paths {
        let marker = if Some(path) == active.as_ref() { "*" } else { " " };
        output.writeln(&format!("{} {}", marker, path.display()))?;
    }
    if active.is_none() {
        output.info("No configuration file found; using defaults")?;
    }
    Ok(())
}
