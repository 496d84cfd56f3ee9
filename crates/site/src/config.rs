//! Site configuration loaded from environment variables.
//!
//! Read once at startup and treated as immutable for the lifetime of the
//! process.
//!
//! # Environment Variables
//!
//! All variables are optional; the contact form reports itself as not
//! configured until `MAILTRAP_TOKEN` is set.
//!
//! - `SITE_HOST` - Bind address (default: 127.0.0.1)
//! - `SITE_PORT` - Listen port (default: 3000)
//! - `SITE_URL` - Public URL of the site (default: <https://melius-ajnahal.com>)
//! - `SITE_STATIC_DIR` - Directory served under `/static` (default: the crate's `static/`)
//! - `MAILTRAP_TOKEN` - Mailtrap Sending API token
//! - `MAILTRAP_SENDER_EMAIL` - From address (default: hello@melius-ajnahal.com)
//! - `MAILTRAP_RECIPIENT_EMAIL` - Lead notification recipient (default: melius.ajnahal@gmail.com)
//! - `MAILTRAP_BCC_EMAIL` - Extra bcc recipient for lead notifications
//! - `MAILTRAP_API_URL` - Sending API base URL (default: <https://send.api.mailtrap.io>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.1)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use melius_core::Email;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Default public URL of the site.
pub const DEFAULT_SITE_URL: &str = "https://melius-ajnahal.com";
/// Default directory for CSS, JS and images.
pub const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");
/// Default sender address for outgoing mail.
pub const DEFAULT_SENDER_EMAIL: &str = "hello@melius-ajnahal.com";
/// Default recipient for lead notifications.
pub const DEFAULT_RECIPIENT_EMAIL: &str = "melius.ajnahal@gmail.com";
/// Default Mailtrap Sending API base URL.
pub const DEFAULT_MAILTRAP_API_URL: &str = "https://send.api.mailtrap.io";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Site application configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public URL of the site, without a trailing slash
    pub site_url: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Mailtrap email delivery configuration
    pub mailtrap: MailtrapConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Mailtrap Sending API configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct MailtrapConfig {
    /// Sending API token; `None` disables the contact form
    pub api_token: Option<SecretString>,
    /// Sending API base URL
    pub api_url: String,
    /// Address every message is sent from
    pub sender_email: Email,
    /// Operator mailbox that receives lead notifications
    pub recipient_email: Email,
    /// Optional extra bcc recipient for lead notifications
    pub bcc_email: Option<Email>,
}

impl std::fmt::Debug for MailtrapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailtrapConfig")
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("api_url", &self.api_url)
            .field("sender_email", &self.sender_email)
            .field("recipient_email", &self.recipient_email)
            .field("bcc_email", &self.bcc_email)
            .finish()
    }
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is malformed or if the Mailtrap
    /// token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("SITE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SITE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SITE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SITE_PORT".to_string(), e.to_string()))?;
        let site_url = parse_site_url(&get_env_or_default("SITE_URL", DEFAULT_SITE_URL))?;

        let static_dir = PathBuf::from(get_env_or_default("SITE_STATIC_DIR", DEFAULT_STATIC_DIR));
        let mailtrap = MailtrapConfig::from_env()?;

        Ok(Self {
            host,
            port,
            site_url,
            static_dir,
            mailtrap,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_sample_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: get_sample_rate("SENTRY_TRACES_SAMPLE_RATE", 0.1)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl MailtrapConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_token = get_optional_env("MAILTRAP_TOKEN")
            .map(|token| {
                validate_secret_strength(&token, "MAILTRAP_TOKEN")?;
                Ok(SecretString::from(token))
            })
            .transpose()?;

        let bcc_email = get_optional_env("MAILTRAP_BCC_EMAIL")
            .map(|value| parse_email("MAILTRAP_BCC_EMAIL", &value))
            .transpose()?;

        Ok(Self {
            api_token,
            api_url: get_env_or_default("MAILTRAP_API_URL", DEFAULT_MAILTRAP_API_URL),
            sender_email: parse_email(
                "MAILTRAP_SENDER_EMAIL",
                &get_env_or_default("MAILTRAP_SENDER_EMAIL", DEFAULT_SENDER_EMAIL),
            )?,
            recipient_email: parse_email(
                "MAILTRAP_RECIPIENT_EMAIL",
                &get_env_or_default("MAILTRAP_RECIPIENT_EMAIL", DEFAULT_RECIPIENT_EMAIL),
            )?,
            bcc_email,
        })
    }

    /// Whether an API token is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.api_token.is_some()
    }

    /// A log-safe description of the API token.
    ///
    /// Shows the length and, for tokens of 16 characters or more, the first
    /// 8 and last 4 characters. Never the full value.
    #[must_use]
    pub fn token_fingerprint(&self) -> String {
        self.api_token
            .as_ref()
            .map_or_else(|| "none".to_string(), |token| fingerprint(token.expose_secret()))
    }
}

fn fingerprint(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let len = chars.len();
    if len < 16 {
        return format!("len={len}");
    }
    let prefix: String = chars.iter().take(8).collect();
    let suffix: String = chars.iter().skip(len - 4).collect();
    format!("len={len} preview={prefix}...{suffix}")
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_email(key: &str, value: &str) -> Result<Email, ConfigError> {
    Email::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn get_sample_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(value) = get_optional_env(key) else {
        return Ok(default);
    };
    let rate = value
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

/// Validate the site URL and strip any trailing slash.
fn parse_site_url(value: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar("SITE_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "SITE_URL".to_string(),
            "must be an http or https URL".to_string(),
        ));
    }
    Ok(value.trim_end_matches('/').to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Copy the token from the Mailtrap dashboard."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_mailtrap_config(token: Option<&str>) -> MailtrapConfig {
        MailtrapConfig {
            api_token: token.map(SecretString::from),
            api_url: DEFAULT_MAILTRAP_API_URL.to_string(),
            sender_email: Email::parse(DEFAULT_SENDER_EMAIL).unwrap(),
            recipient_email: Email::parse(DEFAULT_RECIPIENT_EMAIL).unwrap(),
            bcc_email: None,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-mailtrap-token", "MAILTRAP_TOKEN");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength(&"a".repeat(32), "MAILTRAP_TOKEN");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_hex_token() {
        let result = validate_secret_strength("3f9a1c7e5b2d8f4a6c0e9b1d7f3a5c2e", "MAILTRAP_TOKEN");
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_site_url_strips_trailing_slash() {
        assert_eq!(
            parse_site_url("https://melius-ajnahal.com/").unwrap(),
            "https://melius-ajnahal.com"
        );
        assert!(parse_site_url("not a url").is_err());
        assert!(parse_site_url("ftp://melius-ajnahal.com").is_err());
    }

    #[test]
    fn test_token_fingerprint_never_reveals_token() {
        let token = "3f9a1c7e5b2d8f4a6c0e9b1d7f3a5c2e";
        let config = test_mailtrap_config(Some(token));

        let fingerprint = config.token_fingerprint();
        assert_eq!(fingerprint, "len=32 preview=3f9a1c7e...5c2e");
        assert!(!fingerprint.contains(token));
    }

    #[test]
    fn test_token_fingerprint_short_or_missing() {
        assert_eq!(test_mailtrap_config(Some("abc123")).token_fingerprint(), "len=6");
        assert_eq!(test_mailtrap_config(None).token_fingerprint(), "none");
    }

    #[test]
    fn test_mailtrap_config_debug_redacts_token() {
        let config = test_mailtrap_config(Some("3f9a1c7e5b2d8f4a6c0e9b1d7f3a5c2e"));
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains(DEFAULT_SENDER_EMAIL));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("3f9a1c7e"));
    }

    #[test]
    fn test_socket_addr() {
        let config = SiteConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            site_url: DEFAULT_SITE_URL.to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            mailtrap: test_mailtrap_config(None),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
        assert!(!config.mailtrap.is_configured());
    }
}
