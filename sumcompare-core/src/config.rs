//! Configuration system for sumcompare.
//!
//! Uses `figment` for layered configuration:
//! defaults -> user config -> workspace config -> explicit file -> environment.
//! Configuration is loaded from `~/.config/sumcompare/config.toml` and/or
//! `.sumcompare/config.toml` in the workspace directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "SUMCOMPARE_";

/// Top-level configuration for the summary comparator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparatorConfig {
    pub llm: LlmConfig,
    pub email: EmailConfig,
    pub report: ReportConfig,
}

impl ComparatorConfig {
    /// Collect warnings from every section.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings: Vec<String> = self
            .llm
            .validate()
            .into_iter()
            .map(|w| format!("[llm] {}", w))
            .collect();
        if self.report.send_email {
            for w in self.email.validate() {
                warnings.push(format!("[email] {}", w));
            }
        }
        warnings
    }

    /// Copy of this configuration with secrets replaced, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.llm.api_key.is_some() {
            copy.llm.api_key = Some("***".to_string());
        }
        if !copy.email.password.is_empty() {
            copy.email.password = "***".to_string();
        }
        copy
    }
}

/// LLM provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name: "openai" or "local" (any OpenAI-compatible endpoint).
    pub provider: String,
    /// Model identifier (e.g., "gpt-4o").
    pub model: String,
    /// Environment variable name containing the API key.
    pub api_key_env: String,
    /// Inline API key. Takes precedence over `api_key_env`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Optional base URL override for the API endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens to generate. Unset lets the provider decide.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,
    /// Retries on transient provider errors. Zero disables retrying.
    pub max_retries: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: None,
            temperature: 0.7,
            max_tokens: None,
            max_retries: 0,
            timeout_secs: 120,
        }
    }
}

impl LlmConfig {
    /// Validate this LLM config and return any warnings.
    ///
    /// Returns an empty Vec if the config is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.temperature < 0.0 || self.temperature > 2.0 {
            warnings.push(format!(
                "temperature ({}) is outside the typical range 0.0-2.0",
                self.temperature
            ));
        }
        if self.max_tokens == Some(0) {
            warnings.push("max_tokens is 0; the provider will return nothing".to_string());
        }
        if self.max_retries > 8 {
            warnings.push(format!(
                "max_retries ({}) is unusually high; backoff is capped at 32s per attempt",
                self.max_retries
            ));
        }
        if self.timeout_secs == 0 {
            warnings.push("timeout_secs is 0; requests will fail immediately".to_string());
        }
        warnings
    }
}

/// SMTP delivery configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// SMTP login. Falls back to `from_address` when empty.
    pub username: String,
    pub password: String,
    pub from_address: String,
    pub to_address: String,
    pub cc_addresses: Vec<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: 587,
            username: String::new(),
            password: String::new(),
            from_address: String::new(),
            to_address: String::new(),
            cc_addresses: Vec::new(),
        }
    }
}

impl EmailConfig {
    /// Fill empty fields from the plain environment variables used by
    /// older deployments (`EMAIL_ADDRESS`, `EMAIL_PASSWORD`, `SMTP_SERVER`,
    /// `SMTP_PORT`, `TO_EMAIL`, `CC_EMAILS`). The port counts as empty while
    /// it still holds the default.
    pub fn with_legacy_env(self) -> Result<Self, ConfigError> {
        self.with_legacy_vars(|name| std::env::var(name).ok())
    }

    fn with_legacy_vars(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if self.from_address.is_empty()
            && let Some(addr) = lookup("EMAIL_ADDRESS")
        {
            self.from_address = addr;
        }
        if self.password.is_empty()
            && let Some(pass) = lookup("EMAIL_PASSWORD")
        {
            self.password = pass;
        }
        if self.smtp_host.is_empty()
            && let Some(host) = lookup("SMTP_SERVER")
        {
            self.smtp_host = host;
        }
        if self.smtp_port == EmailConfig::default().smtp_port
            && let Some(port) = lookup("SMTP_PORT")
        {
            self.smtp_port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                message: format!("SMTP_PORT '{}' is not a valid port", port),
            })?;
        }
        if self.to_address.is_empty()
            && let Some(to) = lookup("TO_EMAIL")
        {
            self.to_address = to;
        }
        if self.cc_addresses.is_empty()
            && let Some(cc) = lookup("CC_EMAILS")
        {
            self.cc_addresses = split_address_list(&cc);
        }
        Ok(self)
    }

    /// The SMTP login, defaulting to the sender address.
    pub fn login(&self) -> &str {
        if self.username.is_empty() {
            &self.from_address
        } else {
            &self.username
        }
    }

    /// Return the name of the first required field that is empty.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.smtp_host.is_empty() {
            Some("smtp_host")
        } else if self.from_address.is_empty() {
            Some("from_address")
        } else if self.to_address.is_empty() {
            Some("to_address")
        } else {
            None
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Some(field) = self.missing_field() {
            warnings.push(format!("{} is empty; reports cannot be emailed", field));
        }
        if self.password.is_empty() {
            warnings.push("password is empty; SMTP login will likely fail".to_string());
        }
        warnings
    }
}

/// Split a comma-separated address list, dropping blanks.
pub fn split_address_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Report rendering and delivery options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Email the rendered report after a comparison run.
    pub send_email: bool,
    /// HTML-escape LLM-produced fragments. Off by default: fragments are
    /// treated as trusted markup and inserted verbatim.
    pub escape_fragments: bool,
    /// Cell content for a neighbor that produced nothing for a category.
    pub absent_marker: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            send_email: true,
            escape_fragments: false,
            absent_marker: String::new(),
        }
    }
}

/// Load configuration with layered merging.
///
/// Order (later wins): defaults, user config, workspace config,
/// `explicit` file, `SUMCOMPARE_` environment variables.
pub fn load_config(
    workspace: Option<&Path>,
    explicit: Option<&Path>,
) -> Result<ComparatorConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(ComparatorConfig::default()));

    if let Some(user_config) = user_config_path()
        && user_config.exists()
    {
        figment = figment.merge(Toml::file(&user_config));
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        figment = figment.merge(Toml::file(path));
    }

    // SUMCOMPARE_LLM__MODEL, SUMCOMPARE_REPORT__SEND_EMAIL, ...
    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    figment.extract().map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
    })
}

/// `~/.config/sumcompare/config.toml` (platform equivalent).
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "sumcompare", "sumcompare")
        .map(|d| d.config_dir().join("config.toml"))
}

/// `<workspace>/.sumcompare/config.toml`.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".sumcompare").join("config.toml")
}
