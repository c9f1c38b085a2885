//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory
//! (or the path given with `-f`). A missing default file is not an error:
//! built-in defaults apply. Env overrides are applied last:
//!
//! | Variable             | Overrides             |
//! |----------------------|-----------------------|
//! | `PORT`               | `[server].port`       |
//! | `KERALA_HOST`        | `[server].host`       |
//! | `KERALA_LOG_LEVEL`   | `[server].log_level`  |
//! | `KERALA_CONTACT_LOG` | `[contacts].log_path` |
//! | `KERALA_ADMIN_TOKEN` | `[admin].token`       |
//!
//! A variable set to a blank value is treated as unset.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::AppError;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// HTTP listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` string handed to the TCP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Fully-resolved service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub log_level: String,
    /// Append-only JSON-lines file for contact submissions (already expanded, no `~`).
    pub contact_log: PathBuf,
    /// Bearer token required on `/api/admin/*`. `None` locks the admin routes.
    /// Never logged.
    pub admin_token: Option<String>,
}

/// Env-var overrides, collected once so tests can pass them explicitly.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub port: Option<String>,
    pub host: Option<String>,
    pub log_level: Option<String>,
    pub contact_log: Option<String>,
    pub admin_token: Option<String>,
}

impl Overrides {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT").ok(),
            host: env::var("KERALA_HOST").ok(),
            log_level: env::var("KERALA_LOG_LEVEL").ok(),
            contact_log: env::var("KERALA_CONTACT_LOG").ok(),
            admin_token: env::var("KERALA_ADMIN_TOKEN").ok(),
        }
    }
}

/// Raw TOML shape — `serde` target before resolution.
#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    server: RawServer,
    #[serde(default)]
    contacts: RawContacts,
    #[serde(default)]
    admin: RawAdmin,
}

#[derive(Deserialize)]
struct RawServer {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_log_level")]
    log_level: String,
}

impl Default for RawServer {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Deserialize)]
struct RawContacts {
    #[serde(default = "default_contact_log")]
    log_path: String,
}

impl Default for RawContacts {
    fn default() -> Self {
        Self { log_path: default_contact_log() }
    }
}

#[derive(Deserialize, Default)]
struct RawAdmin {
    #[serde(default)]
    token: Option<String>,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }
fn default_log_level() -> String { "info".to_string() }
fn default_contact_log() -> String { "contacts.log".to_string() }

/// Load config from `path` (or the default location), then apply env overrides.
pub fn load(path: Option<&str>) -> Result<Config, AppError> {
    let overrides = Overrides::from_env();
    match path {
        Some(p) => load_from(Path::new(p), &overrides),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                load_from(default_path, &overrides)
            } else {
                resolve(RawConfig::default(), &overrides)
            }
        }
    }
}

/// Internal loader — accepts an explicit path and overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(path: &Path, overrides: &Overrides) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    resolve(parsed, overrides)
}

fn resolve(parsed: RawConfig, overrides: &Overrides) -> Result<Config, AppError> {
    let port = match given(&overrides.port) {
        Some(p) => p
            .trim()
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("invalid PORT '{p}': {e}")))?,
        None => parsed.server.port,
    };

    let contact_log = expand_home(given(&overrides.contact_log).unwrap_or(&parsed.contacts.log_path));
    if contact_log.as_os_str().is_empty() {
        return Err(AppError::Config("[contacts].log_path must not be empty".into()));
    }

    let admin_token = given(&overrides.admin_token)
        .map(str::to_string)
        .or(parsed.admin.token)
        .filter(|t| !t.trim().is_empty());

    Ok(Config {
        server: ServerConfig {
            host: given(&overrides.host).map_or(parsed.server.host, str::to_string),
            port,
        },
        log_level: given(&overrides.log_level).map_or(parsed.server.log_level, str::to_string),
        contact_log,
        admin_token,
    })
}

/// An override set to a blank string counts as unset.
fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL_TOML: &str = r#"
[server]
host = "127.0.0.1"
port = 8081
log_level = "debug"

[contacts]
log_path = "/var/tmp/kerala/contacts.log"

[admin]
token = "s3cret"
"#;

    fn write_toml(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parse_full_config() {
        let f = write_toml(FULL_TOML);
        let cfg = load_from(f.path(), &Overrides::default()).unwrap();
        assert_eq!(cfg.server.bind_addr(), "127.0.0.1:8081");
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.contact_log, PathBuf::from("/var/tmp/kerala/contacts.log"));
        assert_eq!(cfg.admin_token.as_deref(), Some("s3cret"));
    }

    #[test]
    fn empty_file_uses_defaults() {
        let f = write_toml("");
        let cfg = load_from(f.path(), &Overrides::default()).unwrap();
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.contact_log, PathBuf::from("contacts.log"));
        assert!(cfg.admin_token.is_none());
    }

    #[test]
    fn port_override_wins() {
        let f = write_toml(FULL_TOML);
        let overrides = Overrides { port: Some("9090".into()), ..Default::default() };
        let cfg = load_from(f.path(), &overrides).unwrap();
        assert_eq!(cfg.server.port, 9090);
    }

    #[test]
    fn bad_port_override_errors() {
        let f = write_toml(FULL_TOML);
        let overrides = Overrides { port: Some("http".into()), ..Default::default() };
        let msg = load_from(f.path(), &overrides).unwrap_err().to_string();
        assert!(msg.contains("invalid PORT"));
    }

    #[test]
    fn blank_overrides_fall_back_to_file() {
        let f = write_toml(FULL_TOML);
        let overrides = Overrides {
            port: Some(String::new()),
            host: Some(" ".into()),
            log_level: Some(String::new()),
            contact_log: Some(String::new()),
            admin_token: Some("  ".into()),
        };
        let cfg = load_from(f.path(), &overrides).unwrap();
        assert_eq!(cfg.server.bind_addr(), "127.0.0.1:8081");
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.contact_log, PathBuf::from("/var/tmp/kerala/contacts.log"));
        assert_eq!(cfg.admin_token.as_deref(), Some("s3cret"));
    }

    #[test]
    fn blank_admin_token_is_none() {
        let f = write_toml("[admin]\ntoken = \"  \"\n");
        let cfg = load_from(f.path(), &Overrides::default()).unwrap();
        assert!(cfg.admin_token.is_none());
    }

    #[test]
    fn contact_log_override() {
        let f = write_toml(FULL_TOML);
        let overrides = Overrides {
            contact_log: Some("/tmp/other.log".into()),
            log_level: Some("warn".into()),
            ..Default::default()
        };
        let cfg = load_from(f.path(), &overrides).unwrap();
        assert_eq!(cfg.contact_log, PathBuf::from("/tmp/other.log"));
        assert_eq!(cfg.log_level, "warn");
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = dirs::home_dir().expect("home dir must exist in test env");
        let expanded = expand_home("~/.kerala/contacts.log");
        assert!(expanded.starts_with(&home));
        assert!(expanded.ends_with("contacts.log"));
    }

    #[test]
    fn absolute_path_unchanged() {
        assert_eq!(expand_home("/absolute/path"), PathBuf::from("/absolute/path"));
    }

    #[test]
    fn missing_file_errors() {
        let result = load_from(Path::new("/nonexistent/config.toml"), &Overrides::default());
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("config error"));
    }
}
