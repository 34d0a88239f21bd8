use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{PixeltapError, PixeltapResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Minimum correlation coefficient for a template match to count.
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f32,
    /// Pause before a click fires, in seconds.
    #[serde(default = "default_click_delay_secs")]
    pub click_delay_secs: f64,
    #[serde(default)]
    pub drag: DragConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragConfig {
    /// Total duration of one drag gesture, in seconds.
    #[serde(default = "default_drag_duration_secs")]
    pub duration_secs: f64,
    /// Number of trajectory steps per drag.
    #[serde(default = "default_drag_steps")]
    pub steps: u32,
}

fn default_match_threshold() -> f32 {
    0.8
}

fn default_click_delay_secs() -> f64 {
    0.5
}

fn default_drag_duration_secs() -> f64 {
    1.0
}

fn default_drag_steps() -> u32 {
    50
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            match_threshold: default_match_threshold(),
            click_delay_secs: default_click_delay_secs(),
            drag: DragConfig::default(),
        }
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_drag_duration_secs(),
            steps: default_drag_steps(),
        }
    }
}

fn resolve_config_path() -> PixeltapResult<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join("config.toml");
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "config found next to executable");
                return Ok(candidate);
            }
        }
    }

    let cwd = std::env::current_dir()?;
    let candidate = cwd.join("config.toml");
    if candidate.exists() {
        tracing::debug!(path = %candidate.display(), "config found in working directory");
        return Ok(candidate);
    }

    Err(PixeltapError::Config(
        "config.toml not found next to executable or in working directory".into(),
    ))
}

pub fn load_config() -> PixeltapResult<SimulatorConfig> {
    let path = resolve_config_path()?;
    let content = std::fs::read_to_string(&path)?;
    let config: SimulatorConfig = toml::from_str(&content)?;
    tracing::info!(
        path = %path.display(),
        threshold = config.match_threshold,
        "config loaded"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_partial_toml() {
        let config: SimulatorConfig = toml::from_str("match_threshold = 0.9").unwrap();
        assert_eq!(config.match_threshold, 0.9);
        assert_eq!(config.click_delay_secs, 0.5);
        assert_eq!(config.drag.duration_secs, 1.0);
        assert_eq!(config.drag.steps, 50);
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let config: SimulatorConfig = toml::from_str("").unwrap();
        let defaults = SimulatorConfig::default();
        assert_eq!(config.match_threshold, defaults.match_threshold);
        assert_eq!(config.drag.steps, defaults.drag.steps);
    }
}
