use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_GREETING: &str = "أهلا بك. اكتب المساعدة لمعرفة الأوامر سبيل المثال.";

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub bot: BotConfig,
    #[serde(default)]
    pub connector: ConnectorConfig,
    #[serde(default)]
    pub welcome: WelcomeConfig,
    #[serde(default)]
    pub modules: HashMap<String, ModuleConfig>,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Base URL prepended verbatim to asset and file links.
    #[serde(default = "default_host_url")]
    pub host_url: String,
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
    #[serde(default = "default_file_assets_dir")]
    pub file_assets_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            host_url: default_host_url(),
            assets_dir: default_assets_dir(),
            file_assets_dir: default_file_assets_dir(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:3978".to_string()
}

fn default_host_url() -> String {
    "http://localhost:3978".to_string()
}

fn default_assets_dir() -> String {
    "assets".to_string()
}

fn default_file_assets_dir() -> String {
    "src/assets".to_string()
}

#[derive(Debug, Deserialize)]
pub struct BotConfig {
    pub name: String,
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_db_path() -> String {
    "cardbot.db".to_string()
}

/// Credentials for the outbound channel connector. Both empty means the
/// emulator is in use and requests go out unauthenticated.
#[derive(Debug, Deserialize, Clone)]
pub struct ConnectorConfig {
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub app_password: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_token_scope")]
    pub scope: String,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            app_password: String::new(),
            token_url: default_token_url(),
            scope: default_token_scope(),
        }
    }
}

impl ConnectorConfig {
    pub fn has_credentials(&self) -> bool {
        !self.app_id.is_empty() && !self.app_password.is_empty()
    }
}

fn default_token_url() -> String {
    "https://login.microsoftonline.com/botframework.com/oauth2/v2.0/token".to_string()
}

fn default_token_scope() -> String {
    "https://api.botframework.com/.default".to_string()
}

#[derive(Debug, Deserialize)]
pub struct WelcomeConfig {
    #[serde(default = "default_greeting")]
    pub message: String,
}

impl Default for WelcomeConfig {
    fn default() -> Self {
        Self {
            message: default_greeting(),
        }
    }
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

#[derive(Debug, Deserialize)]
pub struct ModuleConfig {
    pub enabled: bool,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, std::env::var("HOST").ok())
    }

    /// Parse config text, letting a non-empty `host_override` (the `HOST`
    /// environment variable) replace `server.host_url`.
    pub fn parse(
        content: &str,
        host_override: Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let mut config: Config = toml::from_str(content)?;
        if let Some(host) = host_override.filter(|h| !h.is_empty()) {
            log::info!("Using HOST from environment: {}", host);
            config.server.host_url = host;
        }
        Ok(config)
    }

    pub fn is_module_enabled(&self, name: &str) -> bool {
        self.modules
            .get(name)
            .map(|m| m.enabled)
            .unwrap_or(false)
    }
}
