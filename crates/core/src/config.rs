use crate::error::{Error, Result};
use crate::types::ResponseMode;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONTACT_PATH: &str = "/.netlify/functions/contact";
pub const DEFAULT_DISCORD_API_BASE: &str = "https://discord.com/api/v10";
pub const DEFAULT_FORWARD_TIMEOUT_SECS: u64 = 10;

/// Environment variable naming the destination Discord channel
pub const ENV_CHANNEL_ID: &str = "DISCORD_CHANNEL_ID";
/// Environment variable holding the Discord bot token
pub const ENV_BOT_TOKEN: &str = "DISCORD_BOT_TOKEN";

/// Raw TOML configuration structure
/// This matches the site.toml file structure exactly; every section is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    site: RawSite,
    #[serde(default)]
    contact: RawContact,
    #[serde(default)]
    discord: RawDiscord,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSite {
    company: Option<String>,
    base_path: Option<String>,
    blog_path: Option<String>,
    trailing_slash: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawContact {
    path: Option<String>,
    response: Option<RawResponseMode>,
    success_url: Option<String>,
    forward_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawResponseMode {
    Acknowledge,
    Redirect,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDiscord {
    api_base: Option<String>,
}

/// Complete site configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub site: SiteConfig,
    pub contact: ContactConfig,
    pub discord: DiscordConfig,
}

/// Site-wide settings used for navigation links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub company: String,
    pub base_path: String,
    pub blog_path: String,
    pub trailing_slash: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            company: "Innotek KFT".to_string(),
            base_path: "/".to_string(),
            blog_path: "blog".to_string(),
            trailing_slash: false,
        }
    }
}

/// Contact endpoint settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactConfig {
    /// Route the endpoint is mounted on
    pub path: String,
    pub mode: ResponseMode,
    /// Upper bound for a single notification forward
    pub forward_timeout: Duration,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_CONTACT_PATH.to_string(),
            mode: ResponseMode::Acknowledge,
            forward_timeout: Duration::from_secs(DEFAULT_FORWARD_TIMEOUT_SECS),
        }
    }
}

/// Discord delivery settings. Channel and token come from the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct DiscordConfig {
    pub api_base: String,
    pub channel_id: Option<String>,
    pub bot_token: Option<String>,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_DISCORD_API_BASE.to_string(),
            channel_id: None,
            bot_token: None,
        }
    }
}

// Hand-written so the token never ends up in logs
impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("api_base", &self.api_base)
            .field("channel_id", &self.channel_id)
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Config {
    /// Fill channel id and token from a variable lookup.
    ///
    /// Empty values count as unset.
    pub fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        self.discord.channel_id = non_empty(ENV_CHANNEL_ID);
        self.discord.bot_token = non_empty(ENV_BOT_TOKEN);
        self
    }

    /// Same as [`Config::apply_env`] using the process environment
    pub fn with_process_env(self) -> Self {
        self.apply_env(|key| std::env::var(key).ok())
    }
}

/// Parse site.toml from a file path
pub fn parse_site_toml<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    parse_site_toml_str(&content)
}

/// Load site.toml if it exists, otherwise fall back to defaults
pub fn load_site_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    if path.exists() {
        parse_site_toml(path)
    } else {
        tracing::info!(path = %path.display(), "no site config found, using defaults");
        Ok(Config::default())
    }
}

/// Parse site.toml from a string (useful for testing)
pub fn parse_site_toml_str(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)?;
    let defaults = Config::default();

    let site = SiteConfig {
        company: raw.site.company.unwrap_or(defaults.site.company),
        base_path: raw.site.base_path.unwrap_or(defaults.site.base_path),
        blog_path: raw.site.blog_path.unwrap_or(defaults.site.blog_path),
        trailing_slash: raw.site.trailing_slash.unwrap_or(defaults.site.trailing_slash),
    };
    validate_base_path(&site.base_path)?;

    let path = raw.contact.path.unwrap_or(defaults.contact.path);
    validate_route(&path, "contact.path")?;

    let mode = match raw.contact.response.unwrap_or(RawResponseMode::Acknowledge) {
        RawResponseMode::Acknowledge => ResponseMode::Acknowledge,
        RawResponseMode::Redirect => {
            let location = raw
                .contact
                .success_url
                .filter(|url| !url.trim().is_empty())
                .ok_or_else(|| {
                    Error::ConfigParse(
                        "contact.success_url is required when contact.response = \"redirect\""
                            .to_string(),
                    )
                })?;
            if location.chars().any(char::is_control) {
                return Err(Error::ConfigParse(
                    "contact.success_url must not contain control characters".to_string(),
                ));
            }
            ResponseMode::Redirect { location }
        }
    };

    let timeout_secs = raw
        .contact
        .forward_timeout_secs
        .unwrap_or(DEFAULT_FORWARD_TIMEOUT_SECS);
    if !(1..=60).contains(&timeout_secs) {
        return Err(Error::ConfigParse(format!(
            "contact.forward_timeout_secs must be between 1 and 60, got {}",
            timeout_secs
        )));
    }

    let api_base = raw
        .discord
        .api_base
        .map(|base| base.trim_end_matches('/').to_string())
        .unwrap_or(defaults.discord.api_base);
    validate_api_base(&api_base)?;

    Ok(Config {
        site,
        contact: ContactConfig {
            path,
            mode,
            forward_timeout: Duration::from_secs(timeout_secs),
        },
        discord: DiscordConfig {
            api_base,
            ..DiscordConfig::default()
        },
    })
}

/// Routes must be absolute and free of query strings or fragments
fn validate_route(route: &str, field_name: &str) -> Result<()> {
    if !route.starts_with('/') {
        return Err(Error::ConfigParse(format!(
            "'{}' must start with '/': '{}'",
            field_name, route
        )));
    }

    if route.contains(['?', '#']) || route.contains(char::is_whitespace) {
        return Err(Error::ConfigParse(format!(
            "'{}' must be a plain path: '{}'",
            field_name, route
        )));
    }

    Ok(())
}

fn validate_base_path(base_path: &str) -> Result<()> {
    validate_route(base_path, "site.base_path")
}

fn validate_api_base(api_base: &str) -> Result<()> {
    let parsed = url::Url::parse(api_base)
        .map_err(|e| Error::ConfigParse(format!("Invalid discord.api_base '{}': {}", api_base, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::ConfigParse(format!(
            "discord.api_base must use http or https: '{}'",
            api_base
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_site_toml_str("").unwrap();
        assert_eq!(config.site, SiteConfig::default());
        assert_eq!(config.contact.path, DEFAULT_CONTACT_PATH);
        assert_eq!(config.contact.mode, ResponseMode::Acknowledge);
        assert_eq!(config.contact.forward_timeout, Duration::from_secs(10));
        assert_eq!(config.discord.api_base, DEFAULT_DISCORD_API_BASE);
        assert!(config.discord.channel_id.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r##"
[site]
company = "Example Ltd"
base_path = "/site"
blog_path = "news"
trailing_slash = true

[contact]
path = "/api/contact"
response = "redirect"
success_url = "https://example.com/thanks"
forward_timeout_secs = 5

[discord]
api_base = "http://localhost:9999/api/"
        "##;

        let config = parse_site_toml_str(toml).unwrap();
        assert_eq!(config.site.company, "Example Ltd");
        assert_eq!(config.site.base_path, "/site");
        assert_eq!(config.site.blog_path, "news");
        assert!(config.site.trailing_slash);
        assert_eq!(config.contact.path, "/api/contact");
        assert_eq!(
            config.contact.mode,
            ResponseMode::Redirect {
                location: "https://example.com/thanks".to_string()
            }
        );
        assert_eq!(config.contact.forward_timeout, Duration::from_secs(5));
        assert_eq!(config.discord.api_base, "http://localhost:9999/api");
    }

    #[test]
    fn test_redirect_requires_success_url() {
        let result = parse_site_toml_str("[contact]\nresponse = \"redirect\"\n");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("success_url"));

        let result =
            parse_site_toml_str("[contact]\nresponse = \"redirect\"\nsuccess_url = \"  \"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_unknown_response_mode() {
        assert!(parse_site_toml_str("[contact]\nresponse = \"teapot\"\n").is_err());
    }

    #[test]
    fn test_rejects_relative_contact_path() {
        let result = parse_site_toml_str("[contact]\npath = \"contact\"\n");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("contact.path"));

        assert!(parse_site_toml_str("[contact]\npath = \"/contact?x=1\"\n").is_err());
    }

    #[test]
    fn test_rejects_out_of_range_timeout() {
        assert!(parse_site_toml_str("[contact]\nforward_timeout_secs = 0\n").is_err());
        assert!(parse_site_toml_str("[contact]\nforward_timeout_secs = 61\n").is_err());
        assert!(parse_site_toml_str("[contact]\nforward_timeout_secs = 60\n").is_ok());
    }

    #[test]
    fn test_rejects_bad_api_base() {
        assert!(parse_site_toml_str("[discord]\napi_base = \"not a url\"\n").is_err());
        assert!(parse_site_toml_str("[discord]\napi_base = \"ftp://example.com\"\n").is_err());
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(parse_site_toml_str("[contact]\nretries = 3\n").is_err());
    }

    #[test]
    fn test_apply_env_reads_secrets() {
        let env: HashMap<&str, &str> = [
            (ENV_CHANNEL_ID, "123456789"),
            (ENV_BOT_TOKEN, "secret-token"),
        ]
        .into_iter()
        .collect();

        let config = Config::default().apply_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.discord.channel_id.as_deref(), Some("123456789"));
        assert_eq!(config.discord.bot_token.as_deref(), Some("secret-token"));
    }

    #[test]
    fn test_apply_env_treats_empty_as_unset() {
        let config = Config::default().apply_env(|key| match key {
            ENV_CHANNEL_ID => Some("   ".to_string()),
            _ => None,
        });
        assert!(config.discord.channel_id.is_none());
        assert!(config.discord.bot_token.is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config::default().apply_env(|key| match key {
            ENV_BOT_TOKEN => Some("super-secret".to_string()),
            _ => None,
        });
        let debug = format!("{:?}", config.discord);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = load_site_config(dir.path().join("site.toml")).unwrap();
        assert_eq!(config.contact.path, DEFAULT_CONTACT_PATH);
    }

    #[test]
    fn test_load_reads_existing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("site.toml");
        fs::write(&path, "[site]\ncompany = \"From File\"\n").unwrap();

        let config = load_site_config(&path).unwrap();
        assert_eq!(config.site.company, "From File");
    }
}
