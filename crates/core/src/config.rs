use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::{MatchPolicy, DEFAULT_MATCH_THRESHOLD};

/// Production backend the bot talks to when no other base URL is configured.
pub const DEFAULT_BACKEND_BASE_URL: &str = "https://backend-white-water-1093.fly.dev/api/chatbot";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub matching: MatchingConfig,
    pub invoice: InvoiceConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub base_url: String,
    pub api_token: SecretString,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct MatchingConfig {
    pub acceptance_threshold: u8,
    pub strong_match_threshold: u8,
}

impl MatchingConfig {
    pub fn policy(&self) -> MatchPolicy {
        MatchPolicy::new(self.acceptance_threshold, self.strong_match_threshold)
    }
}

#[derive(Clone, Debug)]
pub struct InvoiceConfig {
    pub title: String,
    pub recent_limit: u32,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub health_check_port: u16,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub backend_base_url: Option<String>,
    pub backend_api_token: Option<String>,
    pub backend_timeout_secs: Option<u64>,
    pub acceptance_threshold: Option<u8>,
    pub strong_match_threshold: Option<u8>,
    pub invoice_title: Option<String>,
    pub invoice_recent_limit: Option<u32>,
    pub server_bind_address: Option<String>,
    pub server_health_check_port: Option<u16>,
    pub logging_level: Option<String>,
    pub logging_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                base_url: DEFAULT_BACKEND_BASE_URL.to_string(),
                api_token: String::new().into(),
                timeout_secs: 30,
            },
            matching: MatchingConfig {
                acceptance_threshold: DEFAULT_MATCH_THRESHOLD,
                strong_match_threshold: DEFAULT_MATCH_THRESHOLD,
            },
            invoice: InvoiceConfig {
                title: "created using Whatsapp".to_string(),
                recent_limit: 5,
            },
            server: ServerConfig {
                bind_address: "0.0.0.0:8080".to_string(),
                health_check_port: 8081,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("invoicey.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(backend) = patch.backend {
            if let Some(base_url) = backend.base_url {
                self.backend.base_url = base_url;
            }
            if let Some(api_token_value) = backend.api_token {
                self.backend.api_token = secret_value(api_token_value);
            }
            if let Some(timeout_secs) = backend.timeout_secs {
                self.backend.timeout_secs = timeout_secs;
            }
        }

        if let Some(matching) = patch.matching {
            if let Some(acceptance_threshold) = matching.acceptance_threshold {
                self.matching.acceptance_threshold = acceptance_threshold;
            }
            if let Some(strong_match_threshold) = matching.strong_match_threshold {
                self.matching.strong_match_threshold = strong_match_threshold;
            }
        }

        if let Some(invoice) = patch.invoice {
            if let Some(title) = invoice.title {
                self.invoice.title = title;
            }
            if let Some(recent_limit) = invoice.recent_limit {
                self.invoice.recent_limit = recent_limit;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(health_check_port) = server.health_check_port {
                self.server.health_check_port = health_check_port;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("INVOICEY_BACKEND_BASE_URL") {
            self.backend.base_url = value;
        }
        if let Some(value) = read_env("INVOICEY_BACKEND_API_TOKEN") {
            self.backend.api_token = secret_value(value);
        }
        if let Some(value) = read_env("INVOICEY_BACKEND_TIMEOUT_SECS") {
            self.backend.timeout_secs = parse_u64("INVOICEY_BACKEND_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("INVOICEY_MATCHING_ACCEPTANCE_THRESHOLD") {
            self.matching.acceptance_threshold =
                parse_u8("INVOICEY_MATCHING_ACCEPTANCE_THRESHOLD", &value)?;
        }
        if let Some(value) = read_env("INVOICEY_MATCHING_STRONG_MATCH_THRESHOLD") {
            self.matching.strong_match_threshold =
                parse_u8("INVOICEY_MATCHING_STRONG_MATCH_THRESHOLD", &value)?;
        }

        if let Some(value) = read_env("INVOICEY_INVOICE_TITLE") {
            self.invoice.title = value;
        }
        if let Some(value) = read_env("INVOICEY_INVOICE_RECENT_LIMIT") {
            self.invoice.recent_limit = parse_u32("INVOICEY_INVOICE_RECENT_LIMIT", &value)?;
        }

        if let Some(value) = read_env("INVOICEY_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("INVOICEY_SERVER_HEALTH_CHECK_PORT") {
            self.server.health_check_port =
                parse_u16("INVOICEY_SERVER_HEALTH_CHECK_PORT", &value)?;
        }

        let log_level =
            read_env("INVOICEY_LOGGING_LEVEL").or_else(|| read_env("INVOICEY_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("INVOICEY_LOGGING_FORMAT").or_else(|| read_env("INVOICEY_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(backend_base_url) = overrides.backend_base_url {
            self.backend.base_url = backend_base_url;
        }
        if let Some(backend_api_token) = overrides.backend_api_token {
            self.backend.api_token = secret_value(backend_api_token);
        }
        if let Some(backend_timeout_secs) = overrides.backend_timeout_secs {
            self.backend.timeout_secs = backend_timeout_secs;
        }
        if let Some(acceptance_threshold) = overrides.acceptance_threshold {
            self.matching.acceptance_threshold = acceptance_threshold;
        }
        if let Some(strong_match_threshold) = overrides.strong_match_threshold {
            self.matching.strong_match_threshold = strong_match_threshold;
        }
        if let Some(invoice_title) = overrides.invoice_title {
            self.invoice.title = invoice_title;
        }
        if let Some(invoice_recent_limit) = overrides.invoice_recent_limit {
            self.invoice.recent_limit = invoice_recent_limit;
        }
        if let Some(server_bind_address) = overrides.server_bind_address {
            self.server.bind_address = server_bind_address;
        }
        if let Some(server_health_check_port) = overrides.server_health_check_port {
            self.server.health_check_port = server_health_check_port;
        }
        if let Some(logging_level) = overrides.logging_level {
            self.logging.level = logging_level;
        }
        if let Some(logging_format) = overrides.logging_format {
            self.logging.format = logging_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_backend(&self.backend)?;
        validate_matching(&self.matching)?;
        validate_invoice(&self.invoice)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("invoicey.toml"), PathBuf::from("config/invoicey.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_backend(backend: &BackendConfig) -> Result<(), ConfigError> {
    let base_url = backend.base_url.trim();
    if base_url.is_empty() {
        return Err(ConfigError::Validation("backend.base_url must not be empty".to_string()));
    }
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "backend.base_url must start with http:// or https://".to_string(),
        ));
    }

    if backend.api_token.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "backend.api_token is required. Set it in invoicey.toml or via INVOICEY_BACKEND_API_TOKEN"
                .to_string(),
        ));
    }

    if backend.timeout_secs == 0 || backend.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "backend.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_matching(matching: &MatchingConfig) -> Result<(), ConfigError> {
    if matching.acceptance_threshold > 100 {
        return Err(ConfigError::Validation(
            "matching.acceptance_threshold must be in range 0..=100".to_string(),
        ));
    }
    if matching.strong_match_threshold > 100 {
        return Err(ConfigError::Validation(
            "matching.strong_match_threshold must be in range 0..=100".to_string(),
        ));
    }
    if matching.strong_match_threshold < matching.acceptance_threshold {
        return Err(ConfigError::Validation(
            "matching.strong_match_threshold must not be below matching.acceptance_threshold"
                .to_string(),
        ));
    }

    Ok(())
}

fn validate_invoice(invoice: &InvoiceConfig) -> Result<(), ConfigError> {
    if invoice.title.trim().is_empty() {
        return Err(ConfigError::Validation("invoice.title must not be empty".to_string()));
    }

    if invoice.recent_limit == 0 || invoice.recent_limit > 50 {
        return Err(ConfigError::Validation(
            "invoice.recent_limit must be in range 1..=50".to_string(),
        ));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    let bind_address = match server.bind_address.parse::<SocketAddr>() {
        Ok(addr) => addr,
        Err(_) => {
            return Err(ConfigError::Validation(
                "server.bind_address must be a socket address like `0.0.0.0:8080`".to_string(),
            ))
        }
    };

    if server.health_check_port == 0 {
        return Err(ConfigError::Validation(
            "server.health_check_port must be greater than zero".to_string(),
        ));
    }

    if server.health_check_port == bind_address.port() {
        return Err(ConfigError::Validation(
            "server.health_check_port must differ from the webhook port".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u8(key: &str, value: &str) -> Result<u8, ConfigError> {
    value.parse::<u8>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    backend: Option<BackendPatch>,
    matching: Option<MatchingPatch>,
    invoice: Option<InvoicePatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct BackendPatch {
    base_url: Option<String>,
    api_token: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct MatchingPatch {
    acceptance_threshold: Option<u8>,
    strong_match_threshold: Option<u8>,
}

#[derive(Debug, Default, Deserialize)]
struct InvoicePatch {
    title: Option<String>,
    recent_limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    health_check_port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
