use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

/// Origin every endpoint is appended to unless overridden.
pub const DEFAULT_BASE_URL: &str = "https://voting-system-backend-t0ma.onrender.com";
/// Storage slot holding the authentication token.
pub const DEFAULT_TOKEN_KEY: &str = "authToken";
pub const DEFAULT_STORE_PATH: &str = "data/local_storage.json";

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: default_base_url() }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
    #[serde(default = "default_token_key")]
    pub token_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: default_store_path(), token_key: default_token_key() }
    }
}

fn default_base_url() -> String { DEFAULT_BASE_URL.to_string() }
fn default_store_path() -> String { DEFAULT_STORE_PATH.to_string() }
fn default_token_key() -> String { DEFAULT_TOKEN_KEY.to_string() }

/// Load from `CONFIG_PATH` (default `config.toml`). A missing file yields defaults.
pub fn load_default() -> Result<ClientConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if std::fs::metadata(&path).is_err() {
        return Ok(ClientConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<ClientConfig> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    parse(&content).with_context(|| format!("parsing {path}"))
}

pub fn parse(content: &str) -> Result<ClientConfig> {
    let cfg: ClientConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl ClientConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.apply_env();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// `API_BASE_URL` and `TOKEN_STORE_PATH` take precedence over the file.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("API_BASE_URL") {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }
        if let Ok(path) = std::env::var("TOKEN_STORE_PATH") {
            if !path.trim().is_empty() {
                self.storage.path = path;
            }
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.api.normalize()?;
        self.storage.validate()?;
        Ok(())
    }
}

impl ApiConfig {
    fn normalize(&mut self) -> Result<()> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(anyhow!("api.base_url is empty"));
        }
        let lower = trimmed.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("api.base_url must start with http:// or https://"));
        }
        self.base_url = trimmed.to_string();
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(anyhow!("storage.path is empty"));
        }
        if self.token_key.is_empty() {
            return Err(anyhow!("storage.token_key is empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() -> Result<()> {
        let cfg = parse("")?;
        assert_eq!(cfg, ClientConfig::default());
        assert_eq!(cfg.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.storage.token_key, "authToken");
        Ok(())
    }

    #[test]
    fn partial_sections_keep_other_defaults() -> Result<()> {
        let cfg = parse("[api]\nbase_url = \"http://localhost:8000\"\n")?;
        assert_eq!(cfg.api.base_url, "http://localhost:8000");
        assert_eq!(cfg.storage, StorageConfig::default());
        Ok(())
    }

    #[test]
    fn normalize_trims_trailing_slash() -> Result<()> {
        let mut cfg = ClientConfig::default();
        cfg.api.base_url = " http://localhost:8000/ ".into();
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.api.base_url, "http://localhost:8000");
        Ok(())
    }

    #[test]
    fn rejects_non_http_scheme() {
        let mut cfg = ClientConfig::default();
        cfg.api.base_url = "ftp://example.com".into();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn rejects_empty_token_key() {
        let mut cfg = ClientConfig::default();
        cfg.storage.token_key = String::new();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn load_from_file_reads_toml() -> Result<()> {
        let path = std::env::temp_dir().join(format!("client_config_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[storage]\npath = \"/tmp/tokens.json\"\ntoken_key = \"jwt\"\n")?;
        let cfg = load_from_file(&path.to_string_lossy())?;
        assert_eq!(cfg.storage.path, "/tmp/tokens.json");
        assert_eq!(cfg.storage.token_key, "jwt");
        let _ = std::fs::remove_file(&path);
        Ok(())
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(parse("[api\nbase_url = 1").is_err());
    }
}
