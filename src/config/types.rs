//! Configuration types, defaults, loading, and validation.

use super::secrets::SecretString;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

type Result<T> = std::result::Result<T, ConfigError>;

/// Environment variables checked for the chat bearer token, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["CHATBOAT_API_KEY", "HF_TOKEN"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Account creation step
    #[serde(default)]
    pub registration: RegistrationConfig,

    /// Organization setup step
    #[serde(default)]
    pub organization: OrganizationConfig,

    /// Integration step
    #[serde(default)]
    pub integration: IntegrationConfig,

    /// Chat completion endpoint used by the test chat
    #[serde(default)]
    pub chat: ChatConfig,

    /// Terminal UI options
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files (default: ~/.chatboat/logs)
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationConfig {
    /// Code the verification phase accepts. A demo placeholder; override it
    /// per deployment.
    #[serde(default = "default_verification_code")]
    pub verification_code: String,

    /// Delay before the alternate (Google) login completes
    #[serde(default = "default_alternate_login_delay_ms")]
    pub alternate_login_delay_ms: u64,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            verification_code: default_verification_code(),
            alternate_login_delay_ms: default_alternate_login_delay_ms(),
        }
    }
}

impl RegistrationConfig {
    pub fn alternate_login_delay(&self) -> Duration {
        Duration::from_millis(self.alternate_login_delay_ms)
    }
}

fn default_verification_code() -> String {
    "123456".to_string()
}

fn default_alternate_login_delay_ms() -> u64 {
    1500
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationConfig {
    /// Debounce delay between a URL edit and the description auto-fetch
    #[serde(default = "default_description_fetch_delay_ms")]
    pub description_fetch_delay_ms: u64,
}

impl Default for OrganizationConfig {
    fn default() -> Self {
        Self {
            description_fetch_delay_ms: default_description_fetch_delay_ms(),
        }
    }
}

impl OrganizationConfig {
    pub fn description_fetch_delay(&self) -> Duration {
        Duration::from_millis(self.description_fetch_delay_ms)
    }
}

fn default_description_fetch_delay_ms() -> u64 {
    1500
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationConfig {
    /// How long the simulated integration check takes
    #[serde(default = "default_check_delay_ms")]
    pub check_delay_ms: u64,

    /// Script URL shown in the embed snippet
    #[serde(default = "default_script_url")]
    pub script_url: String,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            check_delay_ms: default_check_delay_ms(),
            script_url: default_script_url(),
        }
    }
}

impl IntegrationConfig {
    pub fn check_delay(&self) -> Duration {
        Duration::from_millis(self.check_delay_ms)
    }
}

fn default_check_delay_ms() -> u64 {
    2000
}

fn default_script_url() -> String {
    "https://example.com/chatbot.js".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// OpenAI-compatible chat completions URL
    #[serde(default = "default_chat_base_url")]
    pub base_url: String,

    #[serde(default = "default_chat_model")]
    pub model: String,

    /// Token budget per reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Bearer token. Only ever populated from keys.toml or the environment;
    /// never written back out.
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: default_chat_base_url(),
            model: default_chat_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

impl ChatConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }
}

fn default_chat_base_url() -> String {
    "https://router.huggingface.co/v1/chat/completions".to_string()
}

fn default_chat_model() -> String {
    "mistralai/Mistral-Nemo-Instruct-2407".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long a toast stays on screen
    #[serde(default = "default_toast_ttl_secs")]
    pub toast_ttl_secs: u64,

    #[serde(default = "default_max_visible_toasts")]
    pub max_visible_toasts: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_ttl_secs: default_toast_ttl_secs(),
            max_visible_toasts: default_max_visible_toasts(),
        }
    }
}

fn default_toast_ttl_secs() -> u64 {
    4
}

fn default_max_visible_toasts() -> usize {
    3
}

/// Secrets file layout (`keys.toml`)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct KeysFile {
    #[serde(default)]
    chat: KeysChat,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct KeysChat {
    api_key: Option<SecretString>,
}

/// Expand leading `~` or `~/` in a path to the actual home directory.
fn expand_tilde(p: &Path) -> PathBuf {
    if let Ok(rest) = p.strip_prefix("~") {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(rest)
    } else {
        p.to_path_buf()
    }
}

/// Base directory: `~/.chatboat/`
pub fn chatboat_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".chatboat")
}

/// Path to keys.toml, kept apart from config.toml so the config can be shared
pub fn keys_path() -> PathBuf {
    chatboat_home().join("keys.toml")
}

fn load_keys_from_file(path: &Path) -> Result<KeysFile> {
    if !path.exists() {
        return Ok(KeysFile::default());
    }
    tracing::debug!("Loading keys from: {:?}", path);
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. Default values
    /// 2. System config: ~/.chatboat/config.toml
    /// 3. Local config: ./chatboat.toml (replaces the system config when present)
    /// 4. Secrets: ~/.chatboat/keys.toml
    /// 5. Environment variables
    pub fn load() -> Result<Self> {
        tracing::debug!("Loading configuration...");
        let mut config = Self::default();

        let system_path = Self::system_config_path();
        if system_path.exists() {
            tracing::debug!("Loading system config from: {:?}", system_path);
            config = Self::merge_from_file(&system_path)?;
        }

        let local_path = Self::local_config_path();
        if local_path.exists() {
            tracing::debug!("Loading local config from: {:?}", local_path);
            config = Self::merge_from_file(&local_path)?;
        }

        config = Self::finish(config, &keys_path());
        tracing::debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from a specific file path, then apply keys and env
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading configuration from custom path: {:?}", path);
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let config = Self::merge_from_file(path)?;
        Ok(Self::finish(config, &keys_path()))
    }

    fn finish(mut config: Self, keys: &Path) -> Self {
        match load_keys_from_file(keys) {
            Ok(keys) => config.merge_keys(keys),
            Err(e) => tracing::warn!("Ignoring unreadable keys file {:?}: {}", keys, e),
        }
        config = Self::apply_overrides(config, |name| std::env::var(name).ok());
        if let Some(dir) = config.logging.dir.take() {
            config.logging.dir = Some(expand_tilde(&dir));
        }
        config
    }

    pub fn system_config_path() -> PathBuf {
        chatboat_home().join("config.toml")
    }

    fn local_config_path() -> PathBuf {
        PathBuf::from("./chatboat.toml")
    }

    /// Parse one config file on its own. Sections the file omits come from
    /// `#[serde(default)]`, not from a file loaded earlier, so a local
    /// `./chatboat.toml` takes the place of the system config entirely.
    fn merge_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut file_config: Self = toml::from_str(&contents)?;
        if file_config.chat.api_key.take().is_some() {
            tracing::warn!(
                "Ignoring chat.api_key in {:?}; put the key in keys.toml or CHATBOAT_API_KEY",
                path
            );
        }
        Ok(file_config)
    }

    fn merge_keys(&mut self, keys: KeysFile) {
        if let Some(key) = keys.chat.api_key
            && !key.is_empty()
        {
            self.chat.api_key = Some(key);
        }
    }

    /// Apply environment overrides through `lookup` (the real environment
    /// in production, a map in tests).
    fn apply_overrides(mut config: Self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(level) = lookup("CHATBOAT_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(code) = lookup("CHATBOAT_VERIFICATION_CODE") {
            config.registration.verification_code = code;
        }
        if let Some(model) = lookup("CHATBOAT_CHAT_MODEL") {
            config.chat.model = model;
        }
        if let Some(url) = lookup("CHATBOAT_CHAT_URL") {
            config.chat.base_url = url;
        }
        if let Some(key) = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty())
        {
            config.chat.api_key = Some(SecretString::new(key));
        }
        config
    }

    pub fn validate(&self) -> Result<()> {
        tracing::debug!("Validating configuration...");

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::invalid(
                "logging.level",
                format!("must be one of {:?}", valid_levels),
            ));
        }
        if self.registration.verification_code.trim().is_empty() {
            return Err(ConfigError::invalid(
                "registration.verification_code",
                "must not be empty",
            ));
        }
        if self.chat.max_tokens == 0 {
            return Err(ConfigError::invalid(
                "chat.max_tokens",
                "must be greater than zero",
            ));
        }
        if self.chat.base_url.is_empty() {
            return Err(ConfigError::invalid("chat.base_url", "must not be empty"));
        }
        Ok(())
    }

    /// Save configuration to a file. The API key is never written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml_string)?;
        tracing::info!("Configuration saved to: {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.registration.verification_code, "123456");
        assert_eq!(config.chat.max_tokens, 500);
        assert_eq!(config.chat.model, "mistralai/Mistral-Nemo-Instruct-2407");
        assert_eq!(
            config.organization.description_fetch_delay(),
            Duration::from_millis(1500)
        );
        assert_eq!(config.integration.check_delay(), Duration::from_secs(2));
        assert!(!config.chat.has_api_key());
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_code() {
        let mut config = Config::default();
        config.registration.verification_code = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_tokens() {
        let mut config = Config::default();
        config.chat.max_tokens = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_toml_partial_sections() {
        let toml_str = r#"
            [registration]
            verification_code = "424242"

            [chat]
            model = "meta-llama/Llama-3.1-8B-Instruct"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.registration.verification_code, "424242");
        assert_eq!(config.registration.alternate_login_delay_ms, 1500);
        assert_eq!(config.chat.model, "meta-llama/Llama-3.1-8B-Instruct");
        assert_eq!(config.chat.max_tokens, 500);
        assert_eq!(config.ui.toast_ttl_secs, 4);
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.integration.check_delay_ms = 10;
        config.chat.api_key = Some(SecretString::from("hf_secret"));

        config.save(temp_file.path()).unwrap();

        let contents = fs::read_to_string(temp_file.path()).unwrap();
        assert!(!contents.contains("hf_secret"));
        assert!(!contents.contains("api_key"));
        let loaded: Config = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.integration.check_delay_ms, 10);
    }

    #[test]
    fn test_api_key_in_config_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[chat]\napi_key = \"hf_leaked\"\n").unwrap();
        let config = Config::merge_from_file(&path).unwrap();
        assert!(config.chat.api_key.is_none());
    }

    #[test]
    fn test_config_file_omitted_sections_use_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chatboat.toml");
        fs::write(&path, "[registration]\nverification_code = \"424242\"\n").unwrap();
        let config = Config::merge_from_file(&path).unwrap();
        assert_eq!(config.registration.verification_code, "424242");
        assert_eq!(config.chat.model, ChatConfig::default().model);
        assert_eq!(config.ui.toast_ttl_secs, UiConfig::default().toast_ttl_secs);
    }

    #[test]
    fn test_keys_file_supplies_api_key() {
        let dir = TempDir::new().unwrap();
        let keys = dir.path().join("keys.toml");
        fs::write(&keys, "[chat]\napi_key = \"hf_from_keys\"\n").unwrap();

        let mut config = Config::default();
        config.merge_keys(load_keys_from_file(&keys).unwrap());
        assert_eq!(
            config.chat.api_key.as_ref().map(|k| k.expose_secret()),
            Some("hf_from_keys")
        );
    }

    #[test]
    fn test_missing_keys_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let keys = load_keys_from_file(&dir.path().join("nope.toml")).unwrap();
        assert!(keys.chat.api_key.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CHATBOAT_LOG_LEVEL", "debug"),
            ("CHATBOAT_VERIFICATION_CODE", "999000"),
            ("HF_TOKEN", "hf_env"),
        ]);
        let config = Config::apply_overrides(Config::default(), |name| {
            env.get(name).map(|v| v.to_string())
        });
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.registration.verification_code, "999000");
        assert_eq!(
            config.chat.api_key.as_ref().map(|k| k.expose_secret()),
            Some("hf_env")
        );
    }

    #[test]
    fn test_env_api_key_prefers_chatboat_var() {
        let env: HashMap<&str, &str> =
            HashMap::from([("CHATBOAT_API_KEY", "primary"), ("HF_TOKEN", "fallback")]);
        let config = Config::apply_overrides(Config::default(), |name| {
            env.get(name).map(|v| v.to_string())
        });
        assert_eq!(
            config.chat.api_key.as_ref().map(|k| k.expose_secret()),
            Some("primary")
        );
    }

    #[test]
    fn test_load_from_missing_path() {
        let err = Config::load_from_path("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
