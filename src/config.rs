//! Configuration of the builtins: defaults, overridden by a JSON
//! file, overridden by environment variables.

use std::{env::VarError, path::Path};

use chrono_tz::Tz;
use serde::Deserialize;

use crate::{date_format::DEFAULT_DATE_FORMAT,
            permissions::LevelThresholds,
            def_boxed_thiserror};

pub const ENV_TIME_ZONE: &str = "DISPLAY_TIME_ZONE";
pub const ENV_DATE_FORMAT: &str = "DISPLAY_DATE_FORMAT";
pub const ENV_USER_KEY: &str = "DISPLAY_USER_KEY";
pub const ENV_LOG_DEGRADED: &str = "DISPLAY_LOG_DEGRADED";

def_boxed_thiserror!(ConfigError, pub enum ConfigErrorKind {
    #[error("reading config file {0:?}: {1}")]
    Io(String, std::io::Error),
    #[error("parsing config file {0:?}: {1}")]
    Json(String, serde_json::Error),
    #[error("unknown time zone {0:?}: {1}")]
    TimeZone(String, String),
    #[error("{0:?} env var is not unicode")]
    NotUnicode(&'static str),
    #[error("{0:?} env var: expected true/false/1/0, got {1:?}")]
    NotBool(&'static str, String),
});

/// A `(module, action) -> path` entry of the puzzle table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PuzzleEntry {
    pub module: String,
    pub action: String,
    pub path: String,
}

/// The file representation; everything optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub time_zone: String,
    pub date_format: String,
    pub user_key: String,
    pub levels: LevelThresholds,
    pub log_degraded: bool,
    pub puzzles: Vec<PuzzleEntry>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        ConfigFile {
            time_zone: "UTC".into(),
            date_format: DEFAULT_DATE_FORMAT.into(),
            user_key: "_user".into(),
            levels: LevelThresholds::default(),
            log_degraded: true,
            puzzles: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Zone in which `date` shows timestamps.
    pub time_zone: Tz,
    /// Pattern for `date` when the template gives none.
    pub date_format: String,
    /// Key in the request data holding the current user.
    pub user_key: String,
    pub levels: LevelThresholds,
    /// Whether degraded builtin results are reported via `warn!`.
    pub log_degraded: bool,
    pub puzzles: Vec<PuzzleEntry>,
}

impl Default for Config {
    fn default() -> Self {
        let f = ConfigFile::default();
        Config {
            time_zone: Tz::UTC,
            date_format: f.date_format,
            user_key: f.user_key,
            levels: f.levels,
            log_degraded: f.log_degraded,
            puzzles: f.puzzles,
        }
    }
}

pub fn parse_time_zone(s: &str) -> Result<Tz, ConfigError> {
    s.parse::<Tz>().map_err(
        |e| ConfigErrorKind::TimeZone(s.into(), e.to_string()).into())
}

fn parse_bool(name: &'static str, s: &str) -> Result<bool, ConfigError> {
    match s {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigErrorKind::NotBool(name, s.into()))?
    }
}

/// Get an env var; unset is `None`, not decodable is an error.
pub fn getenv(name: &'static str) -> Result<Option<String>, ConfigError> {
    match std::env::var(name) {
        Ok(s) => Ok(Some(s)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigErrorKind::NotUnicode(name))?,
    }
}

impl TryFrom<ConfigFile> for Config {
    type Error = ConfigError;

    fn try_from(f: ConfigFile) -> Result<Self, ConfigError> {
        Ok(Config {
            time_zone: parse_time_zone(&f.time_zone)?,
            date_format: f.date_format,
            user_key: f.user_key,
            levels: f.levels,
            log_degraded: f.log_degraded,
            puzzles: f.puzzles,
        })
    }
}

impl Config {
    pub fn from_json_str(origin: &str, s: &str) -> Result<Self, ConfigError> {
        let f: ConfigFile = serde_json::from_str(s).map_err(
            |e| ConfigErrorKind::Json(origin.into(), e))?;
        Config::try_from(f)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let origin = path.to_string_lossy();
        let s = std::fs::read_to_string(path).map_err(
            |e| ConfigErrorKind::Io(origin.to_string(), e))?;
        Self::from_json_str(&origin, &s)
    }

    /// Apply overrides through `lookup` (the environment, normally).
    pub fn override_with(
        mut self,
        lookup: impl Fn(&'static str) -> Result<Option<String>, ConfigError>
    ) -> Result<Self, ConfigError> {
        if let Some(tz) = lookup(ENV_TIME_ZONE)? {
            self.time_zone = parse_time_zone(&tz)?;
        }
        if let Some(fmt) = lookup(ENV_DATE_FORMAT)? {
            self.date_format = fmt;
        }
        if let Some(key) = lookup(ENV_USER_KEY)? {
            self.user_key = key;
        }
        if let Some(b) = lookup(ENV_LOG_DEGRADED)? {
            self.log_degraded = parse_bool(ENV_LOG_DEGRADED, &b)?;
        }
        Ok(self)
    }

    pub fn override_from_env(self) -> Result<Self, ConfigError> {
        self.override_with(getenv)
    }

    /// Make the process-wide warning switch follow this config. For
    /// processes with a single config only (the CLI); requests are
    /// gated on their own `log_degraded` anyway.
    pub fn apply_logging(&self) {
        crate::warn::set_warnings_enabled(self.log_degraded);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_defaults() {
        let c = Config::default();
        assert_eq!(c.time_zone, Tz::UTC);
        assert_eq!(c.date_format, "YYYY.MM.DD HH:MM:SS");
        assert_eq!(c.user_key, "_user");
        assert!(c.log_degraded);
        assert_eq!(Config::from_json_str("t", "{}").expect("valid"), c);
    }

    #[test]
    fn t_from_json() {
        let c = Config::from_json_str("t", r#"{
            "time_zone": "Europe/Zurich",
            "levels": {"guest": 2, "registered": 10, "moderator": 20, "admin": 30},
            "puzzles": [{"module": "users", "action": "register", "path": "puzzles/math"}]
        }"#).expect("valid");
        assert_eq!(c.time_zone, chrono_tz::Europe::Zurich);
        assert_eq!(c.levels.registered, 10);
        assert_eq!(c.puzzles[0].path, "puzzles/math");
        assert_eq!(c.date_format, DEFAULT_DATE_FORMAT);
    }

    #[test]
    fn t_from_json_errors() {
        let e = Config::from_json_str("t", r#"{"time_zone": "Mars/Olympus"}"#).unwrap_err();
        assert!(matches!(e.kind(), ConfigErrorKind::TimeZone(..)));
        let e = Config::from_json_str("t", r#"{"colour": 1}"#).unwrap_err();
        assert!(matches!(e.kind(), ConfigErrorKind::Json(..)));
        let e = Config::from_json_file(Path::new("/nonexistent/display.json")).unwrap_err();
        assert!(matches!(e.kind(), ConfigErrorKind::Io(..)));
    }

    #[test]
    fn t_override() {
        let env = |name: &'static str| -> Result<Option<String>, ConfigError> {
            Ok(match name {
                ENV_TIME_ZONE => Some("Europe/Zurich".into()),
                ENV_DATE_FORMAT => Some("%Y".into()),
                ENV_LOG_DEGRADED => Some("off".into()),
                _ => None
            })
        };
        let c = Config::default().override_with(env).expect("valid");
        assert_eq!(c.time_zone, chrono_tz::Europe::Zurich);
        assert_eq!(c.date_format, "%Y");
        assert_eq!(c.user_key, "_user");
        assert!(!c.log_degraded);

        let bad = |name: &'static str| -> Result<Option<String>, ConfigError> {
            Ok((name == ENV_LOG_DEGRADED).then(|| "maybe".to_string()))
        };
        let e = Config::default().override_with(bad).unwrap_err();
        assert!(matches!(e.kind(), ConfigErrorKind::NotBool(..)));
    }
}
