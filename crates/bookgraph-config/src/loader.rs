//! Configuration loading with precedence: defaults < file < environment

use crate::{Config, ConfigError, ConfigResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "bookgraph.toml";

/// Example configuration written by `bookgraph config init`
pub const EXAMPLE_CONFIG: &str = r#"# bookgraph configuration
# Every key is optional; the values below are the defaults.

[chat]
# "openai" covers any OpenAI-compatible API (DeepSeek, OpenAI, vLLM...)
provider = "openai"
endpoint = "https://api.deepseek.com"
model = "deepseek-chat"
# The key is read from this environment variable (or set api_key = "...")
api_key_env = "DEEPSEEK_API_KEY"
max_tokens = 3000
temperature = 0.0
timeout_secs = 120

[embedding]
# "ollama", "openai" or "mock"
provider = "ollama"
endpoint = "http://localhost:11434"
model = "bge-m3"
dimensions = 1024
batch_size = 16
timeout_secs = 60

[extraction]
max_triplets_per_record = 10
max_tokens = 1024
temperature = 0.0
concurrency = 4

[retrieval]
top_k = 5
max_hops = 1
max_context_chars = 48000
expand_related_records = false
max_related_records = 5

[retry]
max_attempts = 3
base_delay_ms = 500
max_delay_ms = 10000
multiplier = 2.0

[storage]
data_file = "data/clean_data_100.csv"
persist_dir = "./storage_graph_csv"

[prompts]
# extraction_template_file = "prompts/extract.txt"
# response_template_file = "prompts/recommend.txt"
"#;

/// Loads [`Config`] from disk and the environment
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration.
    ///
    /// With an explicit `path` the file must exist. Otherwise `./bookgraph.toml`
    /// and then `<config_dir>/bookgraph/config.toml` are tried, falling back to
    /// defaults. Environment overrides are applied and the result is validated.
    pub fn load(path: Option<&Path>) -> ConfigResult<Config> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::discover() {
                Some(found) => Self::load_from_file(&found)?,
                None => {
                    debug!("No config file found, using defaults");
                    Config::default()
                }
            },
        };

        Self::apply_overrides(&mut config, |key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file without applying overrides
    pub fn load_from_file(path: &Path) -> ConfigResult<Config> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config file {}", path.display());
        Self::parse(&contents, path)
    }

    /// Parse TOML text; `origin` is only used in error messages
    pub fn parse(contents: &str, origin: &Path) -> ConfigResult<Config> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Default location of the user-level config file
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bookgraph").join("config.toml"))
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
        Self::default_config_path().filter(|p| p.exists())
    }

    /// Apply `BOOKGRAPH_*` overrides using `lookup` to read variables
    pub fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(model) = lookup("BOOKGRAPH_CHAT_MODEL") {
            config.chat.model = model;
        }
        if let Some(endpoint) = lookup("BOOKGRAPH_CHAT_ENDPOINT") {
            config.chat.endpoint = Some(endpoint);
        }
        if let Some(endpoint) = lookup("BOOKGRAPH_EMBEDDING_ENDPOINT") {
            config.embedding.endpoint = Some(endpoint);
        }
        if let Some(model) = lookup("BOOKGRAPH_EMBEDDING_MODEL") {
            config.embedding.model = model;
        }
        if let Some(dir) = lookup("BOOKGRAPH_PERSIST_DIR") {
            config.storage.persist_dir = PathBuf::from(dir);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_example_config_parses_to_defaults() {
        let config = ConfigLoader::parse(EXAMPLE_CONFIG, Path::new("example.toml")).unwrap();
        let defaults = Config::default();
        assert_eq!(config.chat, defaults.chat);
        assert_eq!(config.embedding.model, defaults.embedding.model);
        assert_eq!(config.extraction, defaults.extraction);
        assert_eq!(config.retrieval, defaults.retrieval);
        assert_eq!(config.retry, defaults.retry);
        assert_eq!(config.storage, defaults.storage);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let vars: HashMap<&str, &str> = [
            ("BOOKGRAPH_CHAT_MODEL", "deepseek-reasoner"),
            ("BOOKGRAPH_PERSIST_DIR", "/tmp/index"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        ConfigLoader::apply_overrides(&mut config, |k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.chat.model, "deepseek-reasoner");
        assert_eq!(config.storage.persist_dir, PathBuf::from("/tmp/index"));
        assert_eq!(config.embedding.model, "bge-m3");
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = ConfigLoader::parse("[chat\nmodel=", Path::new("broken.toml")).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let err = ConfigLoader::load(Some(Path::new("/no/such/bookgraph.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
