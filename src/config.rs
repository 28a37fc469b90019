use std::env;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;

use crate::calculator::CalculatorConfig;
use crate::model::PackSizeSet;
use crate::types::{MAX_QUANTITY, PackSize};

/// Complete application configuration, loaded from environment variables or default values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub calculator: CalculatorSettings,
}

impl AppConfig {
    /// Creates a configuration from the currently available environment variables.
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            security: SecurityConfig::from_env(),
            calculator: CalculatorSettings::from_env(),
        }
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    bind_ip: IpAddr,
    display_host: String,
    port: u16,
    static_dir: Option<PathBuf>,
}

impl ApiConfig {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 8080;

    fn from_env() -> Self {
        let host_value = env_string("SORT_MY_PACKAGES_API_HOST")
            .unwrap_or_else(|| Self::DEFAULT_HOST.to_string());
        let (bind_ip, effective_host) = match host_value.parse::<IpAddr>() {
            Ok(ip) => (ip, host_value),
            Err(err) => {
                tracing::warn!(
                    "Could not parse SORT_MY_PACKAGES_API_HOST ('{}'): {}. Using {}.",
                    host_value,
                    err,
                    Self::DEFAULT_HOST
                );
                (
                    IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                    Self::DEFAULT_HOST.to_string(),
                )
            }
        };

        let port = match env_string("SORT_MY_PACKAGES_API_PORT") {
            Some(raw) => parse_port(&raw).unwrap_or(Self::DEFAULT_PORT),
            None => Self::DEFAULT_PORT,
        };

        let static_dir = env_string("SORT_MY_PACKAGES_STATIC_DIR").and_then(|raw| {
            let path = PathBuf::from(&raw);
            if path.is_dir() {
                Some(path)
            } else {
                tracing::warn!(
                    "SORT_MY_PACKAGES_STATIC_DIR ('{}') is not a directory. Serving the embedded web UI.",
                    raw
                );
                None
            }
        });

        Self {
            bind_ip,
            display_host: effective_host,
            port,
            static_dir,
        }
    }

    /// Socket address to bind the server to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }

    /// Visible hostname for logging and hints.
    pub fn display_host(&self) -> &str {
        &self.display_host
    }

    /// Configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Directory to serve the web UI from instead of the embedded assets.
    pub fn static_dir(&self) -> Option<&PathBuf> {
        self.static_dir.as_ref()
    }

    /// Indicates whether binding to all interfaces.
    pub fn binds_to_all_interfaces(&self) -> bool {
        match self.bind_ip {
            IpAddr::V4(addr) => addr == Ipv4Addr::UNSPECIFIED,
            IpAddr::V6(addr) => addr == Ipv6Addr::UNSPECIFIED,
        }
    }
}

/// Who may change the pack sizes.
#[derive(Clone, Debug)]
pub struct SecurityConfig {
    allowed_origin: String,
    auth_token: String,
}

impl SecurityConfig {
    pub const DEFAULT_ALLOWED_ORIGIN: &'static str = "http://localhost:8080";
    pub const DEFAULT_AUTH_TOKEN: &'static str = "my_secret_token";

    pub fn new(allowed_origin: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            allowed_origin: allowed_origin.into(),
            auth_token: auth_token.into(),
        }
    }

    fn from_env() -> Self {
        let allowed_origin = env_string("SORT_MY_PACKAGES_ALLOWED_ORIGIN")
            .unwrap_or_else(|| Self::DEFAULT_ALLOWED_ORIGIN.to_string());
        let auth_token = env_string("SORT_MY_PACKAGES_AUTH_TOKEN").unwrap_or_else(|| {
            tracing::warn!(
                "SORT_MY_PACKAGES_AUTH_TOKEN is not set. Using the built-in default token; set a secret before exposing the service."
            );
            Self::DEFAULT_AUTH_TOKEN.to_string()
        });

        Self::new(allowed_origin, auth_token)
    }

    /// Origin allowed to update pack sizes.
    pub fn allowed_origin(&self) -> &str {
        &self.allowed_origin
    }

    /// Bearer token required to update pack sizes.
    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ALLOWED_ORIGIN, Self::DEFAULT_AUTH_TOKEN)
    }
}

/// Configuration for pack calculation.
#[derive(Clone, Debug)]
pub struct CalculatorSettings {
    calculator: CalculatorConfig,
}

impl CalculatorSettings {
    const DEFAULT_PACK_SIZES_VAR: &'static str = "SORT_MY_PACKAGES_DEFAULT_PACK_SIZES";
    const MAX_EXACT_QUANTITY_VAR: &'static str = "SORT_MY_PACKAGES_MAX_EXACT_QUANTITY";
    const MAX_EXACT_QUANTITY_HINT: &'static str = "must be between 1 and 2147483647";

    /// The exact path never has to cover more than the accepted quantity range.
    fn is_valid_max_exact_quantity(value: u64) -> bool {
        (1..=MAX_QUANTITY).contains(&value)
    }

    fn from_env() -> Self {
        let default_pack_sizes = match env_string(Self::DEFAULT_PACK_SIZES_VAR) {
            Some(raw) => match parse_pack_sizes(&raw) {
                Ok(sizes) => sizes,
                Err(err) => {
                    tracing::warn!(
                        "{} contains invalid value '{}': {}. Using default pack sizes.",
                        Self::DEFAULT_PACK_SIZES_VAR,
                        raw,
                        err
                    );
                    PackSizeSet::default()
                }
            },
            None => PackSizeSet::default(),
        };

        let max_exact_quantity = load_u64_with_warning(
            Self::MAX_EXACT_QUANTITY_VAR,
            CalculatorConfig::DEFAULT_MAX_EXACT_QUANTITY,
            Self::is_valid_max_exact_quantity,
            Self::MAX_EXACT_QUANTITY_HINT,
            "Warning: A higher exact-solver limit increases memory and latency for large orders",
        );

        let calculator = CalculatorConfig::builder()
            .default_pack_sizes(default_pack_sizes)
            .max_exact_quantity(max_exact_quantity)
            .build();

        Self { calculator }
    }

    /// Returns the configured CalculatorConfig.
    pub fn calculator_config(&self) -> &CalculatorConfig {
        &self.calculator
    }
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            tracing::warn!("Access to {} failed: {}. Using default value.", name, err);
            None
        }
    }
}

fn parse_port(raw: &str) -> Option<u16> {
    match raw.parse::<u16>() {
        Ok(0) => {
            tracing::warn!("SORT_MY_PACKAGES_API_PORT must not be 0. Using default port.");
            None
        }
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(
                "Could not parse SORT_MY_PACKAGES_API_PORT ('{}'): {}. Using default port.",
                raw,
                err
            );
            None
        }
    }
}

/// Parses a comma-separated list such as `250, 500,1000`.
fn parse_pack_sizes(raw: &str) -> Result<PackSizeSet, String> {
    let sizes = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<PackSize>()
                .map_err(|err| format!("'{}' is not a pack size: {}", part, err))
        })
        .collect::<Result<Vec<_>, _>>()?;

    PackSizeSet::from_sizes(sizes).map_err(|err| err.to_string())
}

fn load_u64_with_warning(
    var_name: &str,
    default: u64,
    validator: impl Fn(u64) -> bool,
    invalid_hint: &str,
    warning: &str,
) -> u64 {
    parse_u64_with_warning(
        var_name,
        env_string(var_name).as_deref(),
        default,
        validator,
        invalid_hint,
        warning,
    )
}

fn parse_u64_with_warning(
    var_name: &str,
    raw: Option<&str>,
    default: u64,
    validator: impl Fn(u64) -> bool,
    invalid_hint: &str,
    warning: &str,
) -> u64 {
    match raw {
        Some(raw) => match raw.parse::<u64>() {
            Ok(value) => {
                if !validator(value) {
                    tracing::warn!(
                        "{} contains invalid value '{}': {}. Using {}.",
                        var_name,
                        raw,
                        invalid_hint,
                        default
                    );
                    default
                } else {
                    if value > default {
                        tracing::warn!("{} ({} = {}).", warning, var_name, value);
                    }
                    value
                }
            }
            Err(err) => {
                tracing::warn!(
                    "Could not parse {} ('{}') as number: {}. Using {}.",
                    var_name,
                    raw,
                    err,
                    default
                );
                default
            }
        },
        None => default,
    }
}
