use anyhow::{anyhow, Result};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub chain: ChainConfig,
    pub completion: CompletionConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChainConfig {
    /// JSON-RPC endpoints, tried in order by the fallback transport
    pub rpc_urls: Vec<String>,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CompletionConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub supports_credentials: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8081,
                log_level: "info".to_string(),
            },
            chain: ChainConfig {
                rpc_urls: Vec::new(),
                request_timeout_secs: 5,
            },
            completion: CompletionConfig {
                api_key: String::new(),
                base_url: "https://api.openai.com/v1".to_string(),
                model: "gpt-3.5-turbo-instruct".to_string(),
                request_timeout_secs: 15,
            },
            cors: CorsConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
                allowed_methods: vec!["GET".to_string(), "POST".to_string()],
                allowed_headers: vec![
                    "Authorization".to_string(),
                    "Accept".to_string(),
                    "Content-Type".to_string(),
                ],
                supports_credentials: true,
            },
        }
    }
}

impl ChainConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.rpc_urls.is_empty() {
            return Err(anyhow!("Chain RPC URL not configured"));
        }

        if self.request_timeout_secs == 0 {
            return Err(anyhow!("Chain request timeout must be non-zero"));
        }

        Ok(())
    }
}

impl Config {
    pub fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        // Try to load from config directory
        info!("Loading config from file");
        match Self::load_from_file("config/config.toml") {
            Ok(config) => {
                info!("Config loaded from file");
                Ok(config)
            }
            Err(e) => {
                error!("Failed to load config from file: {}", e);
                // Fall back to environment variables or defaults
                info!("Falling back to environment variables or defaults");
                Ok(Self::from_env())
            }
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn from_env() -> Self {
        let mut config = Config::default();

        // Override with environment variables if present
        if let Ok(host) = std::env::var("SERVER_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = std::env::var("SERVER_PORT") {
            if let Ok(port_num) = port.parse::<u16>() {
                config.server.port = port_num;
            }
        }

        if let Ok(log_level) = std::env::var("RUST_LOG") {
            config.server.log_level = log_level;
        }

        if let Ok(rpc_url) = std::env::var("INFURA_URL") {
            config.chain.rpc_urls = vec![rpc_url];
        }

        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            config.completion.api_key = api_key;
        }

        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            config.completion.base_url = base_url;
        }

        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            config.cors.allowed_origins =
                origins.split(',').map(|s| s.trim().to_string()).collect();
        }

        config
    }

    pub fn validate(&self) -> Result<()> {
        self.chain.validate()
    }
}
