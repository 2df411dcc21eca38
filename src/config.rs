use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use planr::calendar::DEFAULT_ANCHOR_HOUR;

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(env!("CARGO_PKG_NAME"))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub storage: StorageConfig,
    pub schedule: ScheduleConfig,
    pub calendar: CalendarConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StorageConfig {
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: data_dir().join("assignments.db"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScheduleConfig {
    pub weekday_hours: u32,
    pub weekend_hours: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            weekday_hours: 4,
            weekend_hours: 6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CalendarConfig {
    pub output_dir: PathBuf,
    pub anchor_hour: u32,
    pub user_name: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            output_dir: data_dir(),
            anchor_hour: DEFAULT_ANCHOR_HOUR,
            user_name: "student".to_string(),
        }
    }
}

impl CalendarConfig {
    /// Path of the generated calendar file: `<output-dir>/<user-name>_schedule.ics`.
    pub fn ics_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_schedule.ics", self.user_name))
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.calendar.anchor_hour >= 24 {
            return Err(eyre!(
                "calendar.anchor-hour must be below 24 (got {})",
                self.calendar.anchor_hour
            ));
        }
        if self.calendar.user_name.trim().is_empty() {
            return Err(eyre!("calendar.user-name must not be empty"));
        }
        Ok(())
    }
}
