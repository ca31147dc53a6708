//! Configuration loading and management.

use std::path::{Path, PathBuf};

use dl_core::{Calendar, InvalidOffset};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Deserializer, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,
    /// Calendar for day buckets: `local`, `UTC` or an offset like `+02:00`.
    ///
    /// Defaults to the system time zone.
    #[serde(
        default,
        deserialize_with = "deserialize_offset",
        skip_serializing_if = "Option::is_none"
    )]
    pub utc_offset: Option<String>,
}

/// An offset as it arrives from a provider.
///
/// The env provider parses `-05` or `+0530` as integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawOffset {
    Text(String),
    Number(i64),
}

fn deserialize_offset<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawOffset>::deserialize(deserializer)?.map(|raw| match raw {
        RawOffset::Text(text) => text,
        RawOffset::Number(value) => {
            let sign = if value < 0 { '-' } else { '+' };
            let digits = value.unsigned_abs();
            if digits < 100 {
                format!("{sign}{digits:02}")
            } else {
                format!("{sign}{digits:04}")
            }
        }
    }))
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("doglog.db"),
            utc_offset: None,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (DOGLOG_*)
        figment = figment.merge(Env::prefixed("DOGLOG_"));

        figment.extract()
    }

    /// Calendar used to bucket events into days.
    pub fn calendar(&self) -> Result<Calendar, InvalidOffset> {
        self.utc_offset
            .as_deref()
            .map_or(Ok(Calendar::Local), str::parse)
    }
}

/// Returns the platform-specific config directory for doglog.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("doglog"))
}

/// Returns the platform-specific data directory for doglog.
///
/// On Linux: `~/.local/share/doglog`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("doglog"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn test_dirs_data_path_ends_with_doglog() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "doglog");
    }

    #[test]
    fn test_default_config_uses_data_dir_for_db() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.database_path, data_dir.join("doglog.db"));
        assert_eq!(config.calendar().unwrap(), Calendar::Local);
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"database_path = "/tmp/dogs.db""#).unwrap();
        writeln!(file, r#"utc_offset = "+02:00""#).unwrap();
        file.flush().unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/dogs.db"));
        assert_eq!(config.calendar().unwrap(), "+02:00".parse().unwrap());
    }

    #[test]
    fn test_numeric_offset_from_env() {
        figment::Jail::expect_with(|jail| {
            let config_home = jail.directory().display().to_string();
            jail.set_env("XDG_CONFIG_HOME", config_home);
            jail.set_env("DOGLOG_UTC_OFFSET", "-05");
            let config = Config::load_from(None)?;
            assert_eq!(config.utc_offset.as_deref(), Some("-05"));
            assert_eq!(config.calendar().unwrap(), "-05:00".parse().unwrap());

            jail.set_env("DOGLOG_UTC_OFFSET", "+0530");
            let config = Config::load_from(None)?;
            assert_eq!(config.calendar().unwrap(), "+05:30".parse().unwrap());

            jail.set_env("DOGLOG_UTC_OFFSET", "+02:00");
            let config = Config::load_from(None)?;
            assert_eq!(config.utc_offset.as_deref(), Some("+02:00"));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_offset_is_reported() {
        let config = Config {
            database_path: PathBuf::from("doglog.db"),
            utc_offset: Some("noon".to_string()),
        };
        assert!(config.calendar().is_err());
    }
}
