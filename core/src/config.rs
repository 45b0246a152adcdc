use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::graph::GraphDefaults;
use crate::service::projector::{is_valid_date_format, DEFAULT_DATE_LABEL_FORMAT};

const CONFIG_DIR_NAME: &str = ".weekplot";
const CONFIG_FILE_NAME: &str = "config.json";
const LOG_FILE_NAME: &str = "weekplot.log";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub defaults: GraphDefaults,
    /// chrono format string for the date shown in week picker labels.
    pub date_label_format: String,
    /// Where the TUI writes its log. Defaults to `weekplot.log` in the config dir.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: GraphDefaults::default(),
            date_label_format: DEFAULT_DATE_LABEL_FORMAT.to_string(),
            log_file: None,
        }
    }
}

/// Resolves the config directory: `base_dir` if given, else `~/.weekplot`.
pub fn config_dir(base_dir: Option<PathBuf>) -> Result<PathBuf> {
    match base_dir {
        Some(dir) => Ok(dir),
        None => {
            let home_dir = dirs::home_dir()
                .ok_or_else(|| anyhow!("Could not determine home directory"))?;
            Ok(home_dir.join(CONFIG_DIR_NAME))
        }
    }
}

impl Config {
    /// Reads `config.json` from `dir`. A missing file gives the defaults.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("no config file at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("could not open config file {:?}", path))
            }
        };
        let config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("could not parse config file {:?}", path))?;
        log::debug!("loaded config from {:?}", path);
        Ok(config)
    }

    /// Resets settings that cannot be used to their defaults and describes
    /// each reset.
    pub fn repair(&mut self) -> Vec<String> {
        let mut notices = Vec::new();
        if !is_valid_date_format(&self.date_label_format) {
            notices.push(format!(
                "date_label_format '{}' cannot render a date, using '{}'",
                self.date_label_format, DEFAULT_DATE_LABEL_FORMAT
            ));
            self.date_label_format = DEFAULT_DATE_LABEL_FORMAT.to_string();
        }
        notices
    }

    pub fn config_file(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE_NAME)
    }

    pub fn log_file_path(&self, dir: &Path) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| dir.join(LOG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("weekplot-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = temp_dir("missing");
        let config = Config::from_dir(&dir).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.defaults.start_date, "2023-12-01");
        assert_eq!(config.date_label_format, "%-m/%-d/%Y");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = temp_dir("partial");
        fs::write(
            dir.join("config.json"),
            r#"{ "defaults": { "title": "Output" }, "date_label_format": "%d.%m.%Y" }"#,
        )
        .unwrap();

        let config = Config::from_dir(&dir).unwrap();
        assert_eq!(config.defaults.title, "Output");
        assert_eq!(config.defaults.start_date, "2023-12-01");
        assert_eq!(config.defaults.y_axis_max, 100.0);
        assert_eq!(config.date_label_format, "%d.%m.%Y");
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = temp_dir("invalid");
        fs::write(dir.join("config.json"), "{ not json").unwrap();

        let err = Config::from_dir(&dir).unwrap_err();
        assert!(format!("{:#}", err).contains("could not parse config file"));
    }

    #[test]
    fn test_unusable_date_format_is_reset() {
        let dir = temp_dir("bad-format");
        fs::write(dir.join("config.json"), r#"{ "date_label_format": "%Q" }"#).unwrap();

        let mut config = Config::from_dir(&dir).unwrap();
        assert_eq!(config.date_label_format, "%Q");

        let notices = config.repair();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].contains("'%Q'"));
        assert_eq!(config, Config::default());
        assert!(config.repair().is_empty());
    }

    #[test]
    fn test_log_file_path() {
        let dir = PathBuf::from("/tmp/weekplot-conf");
        let mut config = Config::default();
        assert_eq!(config.log_file_path(&dir), dir.join("weekplot.log"));

        config.log_file = Some(PathBuf::from("/var/log/weekplot.log"));
        assert_eq!(config.log_file_path(&dir), PathBuf::from("/var/log/weekplot.log"));
    }

    #[test]
    fn test_config_dir_override() {
        let dir = PathBuf::from("/tmp/elsewhere");
        assert_eq!(config_dir(Some(dir.clone())).unwrap(), dir);
    }
}
