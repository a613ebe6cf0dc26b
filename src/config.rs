use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{PonchieError, Result};
use crate::prompt::GeneratorConfig;
use crate::surface::{BrushConfig, InputFilter, ResizePolicy};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Round length in training mode
    pub training_secs: u32,
    /// Round length in free mode
    pub free_secs: u32,
    /// Pause on the "generating" screen before a round starts
    pub reveal_delay_ms: u64,
    /// Length of one countdown step
    pub tick_ms: u64,
    pub history_limit: usize,
    pub generator: GeneratorConfig,
    pub brush: BrushConfig,
    pub resize_policy: ResizePolicy,
    pub input_filter: InputFilter,
    /// Raster pixels per display pixel
    pub raster_scale: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            training_secs: 30,
            free_secs: 180,
            reveal_delay_ms: 2500,
            tick_ms: 1000,
            history_limit: 20,
            generator: GeneratorConfig::default(),
            brush: BrushConfig::default(),
            resize_policy: ResizePolicy::Anchor,
            input_filter: InputFilter::Any,
            raster_scale: 2,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.training_secs == 0 || self.free_secs == 0 {
            return Err(PonchieError::Config("round length must be at least one second".into()));
        }
        if self.tick_ms == 0 {
            return Err(PonchieError::Config("tick_ms must be positive".into()));
        }
        if self.history_limit == 0 {
            return Err(PonchieError::Config("history_limit must be positive".into()));
        }
        if self.generator.retry_limit == 0 {
            return Err(PonchieError::Config("generator.retry_limit must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.generator.situational_weight) {
            return Err(PonchieError::Config(format!(
                "generator.situational_weight {} is outside 0..=1",
                self.generator.situational_weight
            )));
        }
        if self.brush.pen_width <= 0.0 || self.brush.eraser_width <= 0.0 {
            return Err(PonchieError::Config("brush widths must be positive".into()));
        }
        if !(1..=8).contains(&self.raster_scale) {
            return Err(PonchieError::Config("raster_scale must be within 1..=8".into()));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "ponchie") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("ponchie_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// Missing, unreadable or invalid files fall back to defaults
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => match cfg.validate() {
                Ok(()) => cfg,
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), "ignoring config: {e}");
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "unreadable config: {e}");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Rgb;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            training_secs: 45,
            free_secs: 300,
            reveal_delay_ms: 0,
            tick_ms: 500,
            history_limit: 30,
            generator: GeneratorConfig {
                situational_weight: 0.4,
                retry_limit: 10,
            },
            brush: BrushConfig {
                pen_width: 2.0,
                pen_color: Rgb::new(0x22, 0x33, 0x44),
                eraser_width: 30.0,
                background: Rgb::new(0xfa, 0xfa, 0xf9),
            },
            resize_policy: ResizePolicy::Scale,
            input_filter: InputFilter::PenOnly,
            raster_scale: 1,
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let partial = r##"{
            "training_secs": 60,
            "brush": { "pen_width": 3.0, "pen_color": "#000000" }
        }"##;
        fs::write(&path, partial).unwrap();

        let loaded = FileConfigStore::with_path(&path).load();

        assert_eq!(loaded.training_secs, 60);
        assert_eq!(loaded.free_secs, Config::default().free_secs);
        assert_eq!(loaded.brush.pen_color, Rgb::new(0, 0, 0));
    }

    #[test]
    fn invalid_file_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        fs::write(&path, "not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());

        fs::write(&path, r#"{ "tick_ms": 0 }"#).unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut cfg = Config::default();
        cfg.generator.situational_weight = 1.5;
        assert!(cfg.validate().is_err());

        let cfg = Config {
            raster_scale: 0,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());

        assert!(Config::default().validate().is_ok());
    }
}
