//! Environment selection and request defaults.
//!
//! Hosts embed one of a few gateway environments. `ClientConfig` resolves
//! the base URL for the chosen environment and stamps its defaults onto new
//! `RequestSpec`s.

use std::str::FromStr;

use serde::Deserialize;

use crate::error::ApiError;
use crate::http::{ResponseType, DEFAULT_TIMEOUT_MS};
use crate::request::RequestSpec;

pub const ENV_ENVIRONMENT: &str = "LINKAPI_ENV";
pub const ENV_BASE_URL: &str = "LINKAPI_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "LINKAPI_TIMEOUT_MS";

/// Gateway environment an application is deployed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Playground,
    #[default]
    Testing,
    Production,
}

impl Environment {
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Playground => "http://10.201.76.107:8899/",
            Environment::Testing => "http://zhanyou.projects.bingosoft.net:8081/",
            Environment::Production => "https://gw.yuexiu.com/news/",
        }
    }
}

impl FromStr for Environment {
    type Err = ApiError;

    /// Accepts the numeric codes `1`, `2`, `3` or the environment names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "playground" => Ok(Environment::Playground),
            "2" | "testing" | "test" => Ok(Environment::Testing),
            "3" | "production" | "prod" => Ok(Environment::Production),
            other => Err(ApiError::Config(format!("unknown environment `{other}`"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub response_type: ResponseType,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl ClientConfig {
    pub fn for_environment(env: Environment) -> Self {
        Self {
            base_url: env.base_url().to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            response_type: ResponseType::Json,
        }
    }

    /// Build a config from `LINKAPI_ENV`, `LINKAPI_BASE_URL` and
    /// `LINKAPI_TIMEOUT_MS`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = match lookup(ENV_ENVIRONMENT) {
            Some(value) => value.parse()?,
            None => Environment::default(),
        };
        let mut config = Self::for_environment(env);
        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            config.timeout_ms = raw.trim().parse().map_err(|_| {
                ApiError::Config(format!("{ENV_TIMEOUT_MS} is not a number: `{raw}`"))
            })?;
        }
        Ok(config)
    }

    /// Absolute URL for `path` under the base URL.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// A request spec for `path` carrying this config's defaults.
    pub fn request(&self, path: &str) -> RequestSpec {
        RequestSpec::new(self.url(path))
            .timeout_ms(self.timeout_ms)
            .response_type(self.response_type)
    }
}
