//! Subcommand implementations

use crate::config::{Config, keys_path};
use crate::onboarding::RandomProbe;
use crate::provider::OpenAICompatibleProvider;
use crate::tui::{self, App};
use anyhow::{Context, Result, bail};
use std::path::Path;
use std::sync::Arc;

/// Load configuration from `path` or the default locations, then validate it
pub(super) fn load_config(path: Option<&str>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => Config::load().context("Failed to load configuration")?,
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Run the onboarding wizard in the terminal
pub(super) async fn cmd_onboard(config: &Config) -> Result<()> {
    let provider = OpenAICompatibleProvider::from_config(&config.chat)
        .context("Failed to create chat provider")?;
    let app = App::new(config, Arc::new(provider), Arc::new(RandomProbe));

    let completed = tui::run(app).await?;
    if completed {
        println!("Onboarding complete! Your chatbot is ready.");
    }
    Ok(())
}

/// Write the default configuration to the system config path
pub(super) fn cmd_init(config: &Config, force: bool) -> Result<()> {
    let path = Config::system_config_path();
    write_config(config, &path, force)?;
    println!("Configuration written to {}", path.display());
    println!(
        "Put your chat API key in {} under [chat] api_key, or set CHATBOAT_API_KEY.",
        keys_path().display()
    );
    Ok(())
}

fn write_config(config: &Config, path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    config
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Print the effective configuration
pub(super) fn cmd_config(config: &Config) -> Result<()> {
    print!("{}", render_config(config)?);
    Ok(())
}

fn render_config(config: &Config) -> Result<String> {
    let mut out = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    let key_status = if config.chat.has_api_key() {
        "configured"
    } else {
        "not set"
    };
    out.push_str(&format!("\n# chat.api_key: {}\n", key_status));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecretString;
    use tempfile::TempDir;

    #[test]
    fn test_write_config_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config::default();

        write_config(&config, &path, false).unwrap();
        assert!(path.exists());
        assert!(write_config(&config, &path, false).is_err());
        write_config(&config, &path, true).unwrap();
    }

    #[test]
    fn test_render_config_redacts_key() {
        let mut config = Config::default();
        config.chat.api_key = Some(SecretString::new("hf_not_a_real_token".to_string()));
        let out = render_config(&config).unwrap();
        assert!(!out.contains("hf_not_a_real_token"));
        assert!(out.contains("# chat.api_key: configured"));
        assert!(out.contains("[registration]"));
    }

    #[test]
    fn test_load_config_missing_path() {
        assert!(load_config(Some("/nonexistent/chatboat.toml")).is_err());
    }
}
