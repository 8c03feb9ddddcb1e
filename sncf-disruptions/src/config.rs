//! Configuration loading.
//!
//! Settings come from, in increasing precedence: built-in defaults, an
//! optional YAML file, then command-line flags and the `TOKEN_NAVITIA`
//! environment variable. Everything is validated once, at startup.
//!
//! ```yaml
//! name: SNCF Paris-Chartres
//! token: 3b036afe-0110-4202-b9ed-99718476c2e0
//! station1:
//!   id: stop_area:SNCF:87391003
//!   name: Paris Montparnasse
//! station2:
//!   id: stop_area:SNCF:87394007
//!   name: Chartres
//! count: 10
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::{Direction, InvalidStation, StationRef};
use crate::navitia::{DEFAULT_BASE_URL, NavitiaConfig};
use crate::sensor::{DEFAULT_NAME, MIN_SECS_BETWEEN_UPDATES, SensorConfig, SensorMode};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("no Navitia token: set TOKEN_NAVITIA, pass --token, or add `token` to the config file")]
    MissingToken,

    #[error("missing {which} {part}")]
    MissingStation {
        which: &'static str,
        part: &'static str,
    },

    #[error("{which}: {source}")]
    InvalidStation {
        which: &'static str,
        source: InvalidStation,
    },

    #[error("invalid {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

/// A station as written in the config file. Either part may be
/// supplied on the command line instead.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StationConfig {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// The config file, before flags are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub name: Option<String>,
    pub entry_id: Option<String>,
    pub token: Option<String>,
    #[serde(default)]
    pub station1: StationConfig,
    #[serde(default)]
    pub station2: StationConfig,
    /// Journeys requested per search. Navitia's own default applies when unset.
    pub count: Option<u32>,
    pub base_url: Option<String>,
    #[serde(default = "FileConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "FileConfig::default_min_update_interval_secs")]
    pub min_update_interval_secs: u64,
    #[serde(default = "FileConfig::default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default)]
    pub mode: SensorMode,
}

impl FileConfig {
    fn default_timeout_secs() -> u64 {
        30
    }
    fn default_min_update_interval_secs() -> u64 {
        MIN_SECS_BETWEEN_UPDATES as u64
    }
    fn default_poll_interval_secs() -> u64 {
        60
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Defaults for every field, as if loaded from an empty file.
    pub fn empty() -> Self {
        Self {
            timeout_secs: Self::default_timeout_secs(),
            min_update_interval_secs: Self::default_min_update_interval_secs(),
            poll_interval_secs: Self::default_poll_interval_secs(),
            ..Default::default()
        }
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub token: Option<String>,
    pub station1_id: Option<String>,
    pub station1_name: Option<String>,
    pub station2_id: Option<String>,
    pub station2_name: Option<String>,
    pub count: Option<u32>,
    pub base_url: Option<String>,
    pub mode: Option<SensorMode>,
}

/// Validated settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub name: String,
    pub entry_id: String,
    /// Only needed against the live API.
    pub token: Option<String>,
    /// Station 1 → station 2.
    pub direction: Direction,
    pub count: Option<u32>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub min_update_interval: chrono::Duration,
    pub poll_interval_secs: u64,
    pub mode: SensorMode,
}

impl Settings {
    /// Load the config file at `path`, if any, and apply overrides.
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::empty(),
        };
        Self::resolve(file, overrides)
    }

    /// Merge a parsed file with overrides and validate the result.
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self, ConfigError> {
        let token = overrides
            .token
            .or(file.token)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let station1 = station(
            "station1",
            overrides.station1_id.or(file.station1.id),
            overrides.station1_name.or(file.station1.name),
        )?;
        let station2 = station(
            "station2",
            overrides.station2_id.or(file.station2.id),
            overrides.station2_name.or(file.station2.name),
        )?;

        if station1.id() == station2.id() {
            return Err(ConfigError::InvalidValue {
                field: "station2",
                reason: "must differ from station1",
            });
        }

        let count = overrides.count.or(file.count);
        if count == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "count",
                reason: "must be at least 1",
            });
        }

        if file.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_secs",
                reason: "must be at least 1",
            });
        }

        let min_update_interval = i64::try_from(file.min_update_interval_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .ok_or(ConfigError::InvalidValue {
                field: "min_update_interval_secs",
                reason: "out of range",
            })?;

        let base_url = overrides
            .base_url
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            name: file.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
            entry_id: file.entry_id.unwrap_or_else(|| "default".to_string()),
            token,
            direction: Direction::new(station1, station2),
            count,
            base_url,
            timeout_secs: file.timeout_secs,
            min_update_interval,
            poll_interval_secs: file.poll_interval_secs,
            mode: overrides.mode.unwrap_or(file.mode),
        })
    }

    pub fn navitia_config(&self) -> Result<NavitiaConfig, ConfigError> {
        let token = self.token.as_deref().ok_or(ConfigError::MissingToken)?;
        Ok(NavitiaConfig::new(token)
            .with_base_url(&self.base_url)
            .with_timeout(self.timeout_secs))
    }

    pub fn sensor_config(&self) -> SensorConfig {
        SensorConfig::new(&self.entry_id, self.direction.clone())
            .with_name(&self.name)
            .with_count(self.count)
            .with_mode(self.mode)
            .with_min_update_interval(self.min_update_interval)
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.poll_interval_secs)
    }
}

fn station(
    which: &'static str,
    id: Option<String>,
    name: Option<String>,
) -> Result<StationRef, ConfigError> {
    let id = id.ok_or(ConfigError::MissingStation { which, part: "id" })?;
    let name = name.ok_or(ConfigError::MissingStation {
        which,
        part: "name",
    })?;
    StationRef::new(id, name).map_err(|source| ConfigError::InvalidStation { which, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
name: SNCF Paris-Chartres
entry_id: home
token: secret-token
station1:
  id: stop_area:SNCF:87391003
  name: Paris Montparnasse
station2:
  id: stop_area:SNCF:87394007
  name: Chartres
count: 10
mode: disruptions
poll_interval_secs: 30
"#;

    fn flags() -> Overrides {
        Overrides {
            token: Some("flag-token".into()),
            station1_id: Some("stop_area:SNCF:1".into()),
            station1_name: Some("Un".into()),
            station2_id: Some("stop_area:SNCF:2".into()),
            station2_name: Some("Deux".into()),
            ..Default::default()
        }
    }

    #[test]
    fn full_file() {
        let file = FileConfig::from_yaml(FULL).unwrap();
        let settings = Settings::resolve(file, Overrides::default()).unwrap();

        assert_eq!(settings.name, "SNCF Paris-Chartres");
        assert_eq!(settings.entry_id, "home");
        assert_eq!(settings.token.as_deref(), Some("secret-token"));
        assert_eq!(settings.direction.from.name(), "Paris Montparnasse");
        assert_eq!(settings.direction.to.id(), "stop_area:SNCF:87394007");
        assert_eq!(settings.count, Some(10));
        assert_eq!(settings.mode, SensorMode::Disruptions);
        assert_eq!(settings.poll_interval_secs, 30);
        assert_eq!(settings.timeout_secs, 30);
        assert_eq!(settings.min_update_interval, chrono::Duration::minutes(5));
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn flags_only() {
        let settings = Settings::resolve(FileConfig::empty(), flags()).unwrap();
        assert_eq!(settings.name, DEFAULT_NAME);
        assert_eq!(settings.entry_id, "default");
        assert_eq!(settings.token.as_deref(), Some("flag-token"));
        assert_eq!(settings.count, None);
        assert_eq!(settings.mode, SensorMode::Status);
        assert_eq!(settings.poll_interval(), std::time::Duration::from_secs(60));
    }

    #[test]
    fn flags_override_file() {
        let file = FileConfig::from_yaml(FULL).unwrap();
        let overrides = Overrides {
            token: Some("flag-token".into()),
            station2_name: Some("Chartres (Eure-et-Loir)".into()),
            count: Some(3),
            mode: Some(SensorMode::Status),
            ..Default::default()
        };
        let settings = Settings::resolve(file, overrides).unwrap();

        assert_eq!(settings.token.as_deref(), Some("flag-token"));
        assert_eq!(settings.direction.to.name(), "Chartres (Eure-et-Loir)");
        // Id still comes from the file
        assert_eq!(settings.direction.to.id(), "stop_area:SNCF:87394007");
        assert_eq!(settings.count, Some(3));
        assert_eq!(settings.mode, SensorMode::Status);
    }

    #[test]
    fn missing_token() {
        let mut overrides = flags();
        overrides.token = None;
        let settings = Settings::resolve(FileConfig::empty(), overrides).unwrap();
        assert_eq!(settings.token, None);
        assert!(matches!(
            settings.navitia_config(),
            Err(ConfigError::MissingToken)
        ));

        let mut overrides = flags();
        overrides.token = Some("   ".into());
        let settings = Settings::resolve(FileConfig::empty(), overrides).unwrap();
        assert!(settings.navitia_config().is_err());
    }

    #[test]
    fn missing_station_parts() {
        let mut overrides = flags();
        overrides.station2_id = None;
        let err = Settings::resolve(FileConfig::empty(), overrides).unwrap_err();
        assert_eq!(err.to_string(), "missing station2 id");

        let mut overrides = flags();
        overrides.station1_name = None;
        let err = Settings::resolve(FileConfig::empty(), overrides).unwrap_err();
        assert_eq!(err.to_string(), "missing station1 name");
    }

    #[test]
    fn blank_station_is_invalid() {
        let mut overrides = flags();
        overrides.station1_id = Some(" ".into());
        let err = Settings::resolve(FileConfig::empty(), overrides).unwrap_err();
        assert_eq!(err.to_string(), "station1: invalid station: id cannot be empty");
    }

    #[test]
    fn same_station_twice() {
        let mut overrides = flags();
        overrides.station2_id = overrides.station1_id.clone();
        let err = Settings::resolve(FileConfig::empty(), overrides).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "station2", .. }));
    }

    #[test]
    fn zero_count_rejected() {
        let mut overrides = flags();
        overrides.count = Some(0);
        assert!(Settings::resolve(FileConfig::empty(), overrides).is_err());
    }

    #[test]
    fn huge_update_interval_rejected() {
        for secs in ["100000000000000000", "18446744073709551615"] {
            let file =
                FileConfig::from_yaml(&format!("min_update_interval_secs: {secs}\n")).unwrap();
            let err = Settings::resolve(file, flags()).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidValue {
                    field: "min_update_interval_secs",
                    ..
                }
            ));
        }

        let file = FileConfig::from_yaml("min_update_interval_secs: 86400\n").unwrap();
        let settings = Settings::resolve(file, flags()).unwrap();
        assert_eq!(
            settings.sensor_config().min_update_interval,
            chrono::Duration::days(1)
        );
    }

    #[test]
    fn unknown_key_rejected() {
        assert!(FileConfig::from_yaml("tokn: abc\n").is_err());
        assert!(FileConfig::from_yaml("mode: sometimes\n").is_err());
    }

    #[test]
    fn empty_yaml_uses_defaults() {
        let file = FileConfig::from_yaml("{}").unwrap();
        assert_eq!(file.timeout_secs, 30);
        assert_eq!(file.min_update_interval_secs, 300);
        assert_eq!(file.poll_interval_secs, 60);
        assert_eq!(file.mode, SensorMode::Status);
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, FULL).unwrap();

        let settings = Settings::load(Some(&path), Overrides::default()).unwrap();
        assert_eq!(settings.entry_id, "home");
    }

    #[test]
    fn unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        let err = Settings::load(Some(&path), flags()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("missing.yaml"));
    }

    #[test]
    fn derived_configs() {
        let settings = Settings::resolve(FileConfig::from_yaml(FULL).unwrap(), Overrides::default())
            .unwrap();

        let navitia = settings.navitia_config().unwrap();
        assert_eq!(navitia.token, "secret-token");
        assert_eq!(navitia.base_url, DEFAULT_BASE_URL);

        let sensor = settings.sensor_config();
        assert_eq!(sensor.entry_id, "home");
        assert_eq!(sensor.count, Some(10));
        assert_eq!(sensor.mode, SensorMode::Disruptions);
        assert_eq!(sensor.min_update_interval, chrono::Duration::minutes(5));
    }
}
