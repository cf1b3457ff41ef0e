//! Load configuration via `config` crate with env-override support.

use std::{fmt, ops::Deref, sync::Arc};

use serde::Deserialize;

use crate::base::prompts;

use super::types::{Res, Void};

/// Default OpenAI-compatible endpoint for the Gemini API.
fn default_completion_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
}

/// Default completion model to use.
fn default_completion_model() -> String {
    "gemini-2.5-flash".to_string()
}

/// Default discount code to guard.
fn default_discount_code() -> String {
    prompts::DEFAULT_DISCOUNT_CODE.to_string()
}

/// Configuration for the guard-bot application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The shared, immutable configuration values.
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Configuration values, as loaded from the environment or a config file.
#[derive(Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// Slack bot token (`SLACK_BOT_TOKEN`).
    #[serde(default)]
    pub slack_bot_token: String,
    /// Slack app token used for the socket mode connection (`SLACK_APP_TOKEN`).
    #[serde(default)]
    pub slack_app_token: String,
    /// API key for the completion endpoint (`GOOGLE_API_KEY`).
    #[serde(default)]
    pub google_api_key: String,
    /// The discount code the bot guards (`DISCOUNT_CODE`).
    #[serde(default = "default_discount_code")]
    pub discount_code: String,
    /// Base URL of the OpenAI-compatible completion API (`COMPLETION_API_BASE`).
    #[serde(default = "default_completion_api_base")]
    pub completion_api_base: String,
    /// Completion model to use (`COMPLETION_MODEL`).
    #[serde(default = "default_completion_model")]
    pub completion_model: String,
}

// Credentials and the discount code never reach the logs.
impl fmt::Debug for ConfigInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigInner")
            .field("slack_bot_token", &"<redacted>")
            .field("slack_app_token", &"<redacted>")
            .field("google_api_key", &"<redacted>")
            .field("discount_code", &"<redacted>")
            .field("completion_api_base", &self.completion_api_base)
            .field("completion_model", &self.completion_model)
            .finish()
    }
}

impl Config {
    /// Loads the configuration from the environment, layered over an optional TOML file.
    ///
    /// Environment variables keep their plain names (e.g., `SLACK_BOT_TOKEN`).
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        Self::load_with_env(explicit_path, config::Environment::default())
    }

    /// Loads the configuration with the given environment source.
    fn load_with_env(explicit_path: Option<&std::path::Path>, env: config::Environment) -> Res<Self> {
        let mut cfg = config::Config::builder();

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        cfg = cfg.add_source(env);

        Self::from_builder(cfg)
    }

    /// Builds and validates the configuration from prepared sources.
    pub fn from_builder(cfg: config::ConfigBuilder<config::builder::DefaultState>) -> Res<Self> {
        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Ensures every required credential is present.
    fn validate(&self) -> Void {
        let required = [
            ("SLACK_BOT_TOKEN", &self.slack_bot_token),
            ("SLACK_APP_TOKEN", &self.slack_app_token),
            ("GOOGLE_API_KEY", &self.google_api_key),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(anyhow::anyhow!("{name} environment variable is required."));
            }
        }

        if self.completion_api_base.trim().is_empty() {
            return Err(anyhow::anyhow!("Completion API base URL must not be empty."));
        }

        if self.completion_model.trim().is_empty() {
            return Err(anyhow::anyhow!("Completion model must not be empty."));
        }

        Ok(())
    }
}

// Tests.
