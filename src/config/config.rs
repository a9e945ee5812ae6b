use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Duckdb,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Layers built-in defaults, the optional config file and `OLLACHAT__*`
    /// environment variables, in that order.
    pub fn load(path: &str) -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();

        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("storage.backend", "duckdb")?
            .set_default("storage.path", "ollachat.duckdb")?
            .set_default("llm.base_url", "http://localhost:11434")?
            .set_default("llm.model", "tinyllama")?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("OLLACHAT").separator("__"))
            .build()?;

        let mut app_config: AppConfig = settings.try_deserialize()?;

        // Expand environment variables if present like ${OLLAMA_HOST}
        app_config.storage.path = expand_env(&app_config.storage.path);
        app_config.llm.base_url = expand_env(&app_config.llm.base_url);
        app_config.llm.system_prompt = app_config
            .llm
            .system_prompt
            .filter(|prompt| !prompt.trim().is_empty());

        Ok(app_config)
    }
}

fn expand_env(val: &str) -> String {
    if val.starts_with("${") && val.ends_with('}') {
        let var_name = &val[2..val.len() - 1];
        std::env::var(var_name).unwrap_or_default()
    } else {
        val.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_a_config_file() {
        let config = AppConfig::load("does-not-exist.yaml").unwrap();
        assert_eq!(config.llm.model, "tinyllama");
        assert_eq!(config.llm.base_url, "http://localhost:11434");
        assert_eq!(config.storage.backend, StorageBackend::Duckdb);
        assert!(config.llm.system_prompt.is_none());
    }

    #[test]
    fn expand_env_reads_braced_variables() {
        std::env::set_var("OLLACHAT_TEST_HOST", "http://gpu-box:11434");
        assert_eq!(expand_env("${OLLACHAT_TEST_HOST}"), "http://gpu-box:11434");
        assert_eq!(expand_env("plain"), "plain");
    }
}
