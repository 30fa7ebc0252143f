// Configuration: built-in defaults, then an optional TOML file, then
// environment variables. The binary loads a `.env` file before calling
// `Config::load` so values from it show up as ordinary env vars.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_TUNNEL_API_URL: &str = "http://127.0.0.1:4040/api/tunnels";
pub const DEFAULT_LOG_LEVEL: &str = "warn";
pub const DEFAULT_CHAT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

const APP_DIR: &str = "credit-risk-cli";

/// Fully resolved application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Fixed backend URL. When present the tunnel lookup is skipped.
    pub backend_url: Option<String>,
    /// Local tunnel-inspection endpoint queried at startup.
    pub tunnel_api_url: String,
    pub log_level: String,
    pub chat: ChatConfig,
}

#[derive(Clone, PartialEq)]
pub struct ChatConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl std::fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend_url: None,
            tunnel_api_url: DEFAULT_TUNNEL_API_URL.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            chat: ChatConfig::default(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        ChatConfig {
            api_key: None,
            base_url: DEFAULT_CHAT_BASE_URL.to_string(),
            model: DEFAULT_CHAT_MODEL.to_string(),
        }
    }
}

/// On-disk shape. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    backend_url: Option<String>,
    tunnel_api_url: Option<String>,
    log_level: Option<String>,
    chat: FileChatConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileChatConfig {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
}

impl Config {
    /// Load configuration from the default file location and the process
    /// environment.
    pub fn load() -> Result<Self> {
        let env = |key: &str| std::env::var(key).ok();
        let path = config_path(env);
        Self::from_sources(path.as_deref(), env)
    }

    /// Build a config from an optional file and an environment lookup. A
    /// missing file is not an error; an unreadable or malformed one is.
    pub fn from_sources<F>(file: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = file.filter(|p| p.exists()) {
            debug!(path = %path.display(), "reading config file");
            let text = std::fs::read_to_string(path)?;
            let parsed: FileConfig = toml::from_str(&text)?;
            config.apply_file(parsed);
        }

        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = env("CREDIT_RISK_BACKEND_URL") {
            config.backend_url = Some(v);
        }
        if let Some(v) = env("CREDIT_RISK_TUNNEL_API") {
            config.tunnel_api_url = v;
        }
        if let Some(v) = env("CREDIT_RISK_LOG") {
            config.log_level = v;
        }
        if let Some(v) = env("OPENAI_API_KEY") {
            config.chat.api_key = Some(v);
        }
        if let Some(v) = env("OPENAI_BASE_URL") {
            config.chat.base_url = v;
        }
        if let Some(v) = env("OPENAI_MODEL") {
            config.chat.model = v;
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if file.backend_url.is_some() {
            self.backend_url = file.backend_url;
        }
        if let Some(v) = file.tunnel_api_url {
            self.tunnel_api_url = v;
        }
        if let Some(v) = file.log_level {
            self.log_level = v;
        }
        if file.chat.api_key.is_some() {
            self.chat.api_key = file.chat.api_key;
        }
        if let Some(v) = file.chat.base_url {
            self.chat.base_url = v;
        }
        if let Some(v) = file.chat.model {
            self.chat.model = v;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.tunnel_api_url.trim().is_empty() {
            return Err(Error::config("tunnel_api_url must not be empty"));
        }
        if self.chat.model.trim().is_empty() {
            return Err(Error::config("chat.model must not be empty"));
        }
        Ok(())
    }
}

/// `CREDIT_RISK_CONFIG` if set, else `<config dir>/credit-risk-cli/config.toml`.
pub fn config_path<F>(env: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(p) = env("CREDIT_RISK_CONFIG").filter(|v| !v.trim().is_empty()) {
        return Some(PathBuf::from(p));
    }
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = Config::from_sources(None, env_from(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tunnel_api_url, "http://127.0.0.1:4040/api/tunnels");
        assert!(config.backend_url.is_none());
    }

    #[test]
    fn test_missing_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let config = Config::from_sources(Some(&path), env_from(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
backend_url = "https://from-file.example"
log_level = "info"

[chat]
model = "file-model"
"#,
        )
        .unwrap();

        let config = Config::from_sources(
            Some(&path),
            env_from(&[
                ("CREDIT_RISK_BACKEND_URL", "https://from-env.example"),
                ("OPENAI_API_KEY", "sk-test"),
            ]),
        )
        .unwrap();

        assert_eq!(config.backend_url.as_deref(), Some("https://from-env.example"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.chat.model, "file-model");
        assert_eq!(config.chat.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let config =
            Config::from_sources(None, env_from(&[("CREDIT_RISK_TUNNEL_API", "  ")])).unwrap();
        assert_eq!(config.tunnel_api_url, DEFAULT_TUNNEL_API_URL);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "backend_url = [1, 2").unwrap();
        let err = Config::from_sources(Some(&path), env_from(&[])).unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn test_config_path_env_override() {
        let path = config_path(env_from(&[("CREDIT_RISK_CONFIG", "/tmp/risk.toml")]));
        assert_eq!(path, Some(PathBuf::from("/tmp/risk.toml")));
    }

    #[test]
    fn test_blank_config_path_env_falls_back_to_default() {
        let path = config_path(env_from(&[("CREDIT_RISK_CONFIG", "   ")]));
        assert_eq!(path, config_path(env_from(&[])));
        if let Some(p) = path {
            assert!(p.ends_with("credit-risk-cli/config.toml"));
        }
    }

    #[test]
    fn test_api_key_is_redacted_in_debug() {
        let mut config = Config::default();
        config.chat.api_key = Some("sk-secret".into());
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-secret"));
    }
}
