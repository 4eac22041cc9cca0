use std::time::Duration;
use std::{env, fs, path::Path};

use anyhow::{anyhow, Context};
use config::Config;
use serde::{Deserialize, Serialize};

use apiq_auth::prelude::AdminConfig;
use apiq_llm::prelude::{VisionClassifier, VisionConfig};
use apiq_metering::prelude::DEFAULT_WINDOW_MONTHS;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub classifier: ClassifierBootstrap,
    #[serde(default)]
    pub admin: AdminBootstrap,
    #[serde(default)]
    pub metering: MeteringConfig,
}

impl GatewayConfig {
    /// Defaults, then an optional TOML file named by `APIQ_CONFIG_FILE`,
    /// then `APIQ`-prefixed environment overrides (`__` separators).
    pub fn load() -> anyhow::Result<Self> {
        let config_file =
            env::var("APIQ_CONFIG_FILE").unwrap_or_else(|_| "config/apiq.local.toml".to_string());

        let mut builder = Config::builder()
            .set_default("server.address", ServerConfig::default_address())?
            .set_default("server.port", ServerConfig::default_port())?;

        if Path::new(&config_file).exists() {
            builder = builder.add_source(config::File::from(Path::new(&config_file)));
        }

        builder = builder.add_source(config::Environment::with_prefix("APIQ").separator("__"));

        let config: GatewayConfig = builder
            .build()
            .context("failed to build configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        Ok(config)
    }
}

fn resolve_secret_source(
    literal: &Option<String>,
    env_key: &Option<String>,
    file_path: &Option<String>,
    field: &str,
) -> anyhow::Result<String> {
    if let Some(env_var) = env_key.as_ref() {
        if let Ok(value) = env::var(env_var) {
            if !value.is_empty() {
                return Ok(value);
            }
        }
    }
    if let Some(path) = file_path.as_ref() {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read secret file {path} for {field}"))?;
        return Ok(contents.trim().to_string());
    }
    if let Some(value) = literal.as_ref() {
        if value.is_empty() {
            return Err(anyhow!("{field} literal secret cannot be empty"));
        }
        return Ok(value.clone());
    }
    Err(anyhow!(
        "{field} secret must be provided via literal/env/file"
    ))
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_address")]
    pub address: String,
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
}

impl ServerConfig {
    fn default_address() -> String {
        "127.0.0.1".to_string()
    }

    fn default_port() -> u16 {
        8080
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: Self::default_address(),
            port: Self::default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifierBootstrap {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "ClassifierBootstrap::default_api_key_env")]
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub api_key_file: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "ClassifierBootstrap::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ClassifierBootstrap {
    fn default_api_key_env() -> Option<String> {
        Some("OPENAI_API_KEY".to_string())
    }

    fn default_timeout_secs() -> u64 {
        30
    }

    pub fn build(&self) -> anyhow::Result<VisionClassifier> {
        let api_key = resolve_secret_source(
            &self.api_key,
            &self.api_key_env,
            &self.api_key_file,
            "classifier api key",
        )?;

        let mut config =
            VisionConfig::new(api_key).map_err(|err| anyhow!("classifier config: {err}"))?;
        if let Some(base_url) = self.base_url.as_ref() {
            config = config
                .with_base_url(base_url)
                .map_err(|err| anyhow!("classifier base url: {err}"))?;
        }
        if let Some(model) = self.model.as_ref() {
            config = config.with_model(model.clone());
        }
        config = config.with_timeout(Duration::from_secs(self.timeout_secs.max(1)));

        VisionClassifier::new(config).map_err(|err| anyhow!("classifier client: {err}"))
    }
}

impl Default for ClassifierBootstrap {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: Self::default_api_key_env(),
            api_key_file: None,
            base_url: None,
            model: None,
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdminBootstrap {
    #[serde(default = "AdminBootstrap::default_username")]
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "AdminBootstrap::default_password_env")]
    pub password_env: Option<String>,
    #[serde(default)]
    pub password_file: Option<String>,
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "AdminBootstrap::default_jwt_secret_env")]
    pub jwt_secret_env: Option<String>,
    #[serde(default)]
    pub jwt_secret_file: Option<String>,
}

impl AdminBootstrap {
    fn default_username() -> String {
        "admin".to_string()
    }

    fn default_password_env() -> Option<String> {
        Some("APIQ_ADMIN_PASSWORD".to_string())
    }

    fn default_jwt_secret_env() -> Option<String> {
        Some("APIQ_ADMIN_JWT_SECRET".to_string())
    }

    pub fn resolve(&self) -> anyhow::Result<AdminConfig> {
        let password = resolve_secret_source(
            &self.password,
            &self.password_env,
            &self.password_file,
            "admin password",
        )?;
        let jwt_secret = resolve_secret_source(
            &self.jwt_secret,
            &self.jwt_secret_env,
            &self.jwt_secret_file,
            "admin jwt secret",
        )?;
        Ok(AdminConfig {
            username: self.username.clone(),
            password,
            jwt_secret,
        })
    }
}

impl Default for AdminBootstrap {
    fn default() -> Self {
        Self {
            username: Self::default_username(),
            password: None,
            password_env: Self::default_password_env(),
            password_file: None,
            jwt_secret: None,
            jwt_secret_env: Self::default_jwt_secret_env(),
            jwt_secret_file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MeteringConfig {
    #[serde(default = "MeteringConfig::default_cost_per_request")]
    pub cost_per_request: f64,
    #[serde(default = "MeteringConfig::default_window_months")]
    pub window_months: u32,
}

impl MeteringConfig {
    fn default_cost_per_request() -> f64 {
        0.10
    }

    fn default_window_months() -> u32 {
        DEFAULT_WINDOW_MONTHS
    }
}

impl Default for MeteringConfig {
    fn default() -> Self {
        Self {
            cost_per_request: Self::default_cost_per_request(),
            window_months: Self::default_window_months(),
        }
    }
}
