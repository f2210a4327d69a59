use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub windowing: WindowingConfig,
    pub output: OutputConfig,
}

/// Input dataset configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// Directory holding the entity dumps (course.json, concept.json).
    /// Either file may be absent; missing metadata falls back to
    /// placeholder display names at render time.
    pub entities_dir: PathBuf,
    /// Directory holding the relation dumps (course-concept.json,
    /// prerequisite-dependency.json, user-course.json). All three are
    /// required.
    pub relations_dir: PathBuf,
    /// Course descriptions are truncated to this many characters
    /// (display characters, not bytes) to bound prompt size.
    #[serde(default = "default_desc_max_chars")]
    pub desc_max_chars: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Windowing configuration for example generation
#[derive(Debug, Clone, Deserialize)]
pub struct WindowingConfig {
    /// Number of courses preceding the target that form the context window.
    #[serde(default = "default_context_len")]
    pub context_len: usize,
    /// Learners with fewer enrollments than this produce no examples.
    #[serde(default = "default_min_history_len")]
    pub min_history_len: usize,
    /// Only the last N positions of a learner's sequence become targets,
    /// capping output volume per learner.
    #[serde(default = "default_max_targets_per_learner")]
    pub max_targets_per_learner: usize,
}

impl Default for WindowingConfig {
    fn default() -> Self {
        WindowingConfig {
            context_len: default_context_len(),
            min_history_len: default_min_history_len(),
            max_targets_per_learner: default_max_targets_per_learner(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path the generated dataset (JSON array of ShareGPT records) is
    /// written to.
    pub path: PathBuf,
    /// Seed for the final dataset shuffle. Unset means seed from entropy;
    /// set it for reproducible output order.
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
}

fn default_desc_max_chars() -> usize {
    150
}

fn default_context_len() -> usize {
    5
}

fn default_min_history_len() -> usize {
    3
}

fn default_max_targets_per_learner() -> usize {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// Looks for the config file in this order:
    /// 1. Path specified in MOOCGEN_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("MOOCGEN_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .context("Failed to parse config.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if !self.dataset.entities_dir.is_dir() {
            anyhow::bail!(
                "entities_dir is not a directory: {}. Set dataset.entities_dir in config.toml to the MOOCCube entities folder.",
                self.dataset.entities_dir.display()
            );
        }

        if !self.dataset.relations_dir.is_dir() {
            anyhow::bail!(
                "relations_dir is not a directory: {}. Set dataset.relations_dir in config.toml to the MOOCCube relations folder.",
                self.dataset.relations_dir.display()
            );
        }

        if self.dataset.desc_max_chars == 0 {
            anyhow::bail!("dataset.desc_max_chars must be greater than 0");
        }

        if self.windowing.context_len == 0 {
            anyhow::bail!("windowing.context_len must be greater than 0");
        }

        if self.windowing.max_targets_per_learner == 0 {
            anyhow::bail!("windowing.max_targets_per_learner must be greater than 0");
        }

        // A target needs at least one preceding course, so histories of
        // length 1 can never produce a window.
        if self.windowing.min_history_len < 2 {
            anyhow::bail!("windowing.min_history_len must be at least 2");
        }

        Ok(())
    }

    /// Get the entities directory path
    pub fn entities_dir(&self) -> &Path {
        &self.dataset.entities_dir
    }

    /// Get the relations directory path
    pub fn relations_dir(&self) -> &Path {
        &self.dataset.relations_dir
    }

    /// Get the output dataset path
    pub fn output_path(&self) -> &Path {
        &self.output.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn create_test_config(temp_dir: &TempDir) -> String {
        let entities = temp_dir.path().join("entities");
        let relations = temp_dir.path().join("relations");
        fs::create_dir_all(&entities).unwrap();
        fs::create_dir_all(&relations).unwrap();
        let esc = |p: &Path| p.to_str().unwrap().replace('\\', "\\\\");
        format!(
            r#"
[dataset]
entities_dir = "{}"
relations_dir = "{}"
log_level = "debug"

[windowing]
context_len = 5
min_history_len = 3
max_targets_per_learner = 2

[output]
path = "./mooc_agent_full_sft.json"
shuffle_seed = 42
"#,
            esc(&entities),
            esc(&relations),
        )
    }

    fn with_config_env(config_path: &Path, f: impl FnOnce()) {
        let original = std::env::var("MOOCGEN_CONFIG").ok();
        std::env::set_var("MOOCGEN_CONFIG", config_path.to_str().unwrap());
        f();
        std::env::remove_var("MOOCGEN_CONFIG");
        if let Some(val) = original {
            std::env::set_var("MOOCGEN_CONFIG", val);
        }
    }

    #[test]
    fn test_config_load_success() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_content = create_test_config(&temp_dir);
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, config_content).unwrap();
        with_config_env(&config_path, || {
            let config = Config::load();
            assert!(config.is_ok(), "Config::load() failed: {:?}", config.err());
            let config = config.unwrap();
            assert_eq!(config.dataset.log_level, "debug");
            assert_eq!(config.windowing.context_len, 5);
            assert_eq!(config.output.shuffle_seed, Some(42));
            // Defaults not present in the file
            assert_eq!(config.dataset.desc_max_chars, 150);
        });
    }

    #[test]
    fn test_config_defaults_for_missing_windowing() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let entities = temp_dir.path().join("entities");
        let relations = temp_dir.path().join("relations");
        fs::create_dir_all(&entities).unwrap();
        fs::create_dir_all(&relations).unwrap();
        let esc = |p: &Path| p.to_str().unwrap().replace('\\', "\\\\");
        let content = format!(
            "[dataset]\nentities_dir = \"{}\"\nrelations_dir = \"{}\"\n\n[output]\npath = \"./out.json\"\n",
            esc(&entities),
            esc(&relations),
        );
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, content).unwrap();
        with_config_env(&config_path, || {
            let config = Config::load().unwrap();
            assert_eq!(config.windowing.context_len, 5);
            assert_eq!(config.windowing.min_history_len, 3);
            assert_eq!(config.windowing.max_targets_per_learner, 2);
            assert_eq!(config.output.shuffle_seed, None);
        });
    }

    #[test]
    fn test_config_rejects_missing_dirs() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let content = "[dataset]\nentities_dir = \"/nonexistent/entities\"\nrelations_dir = \"/nonexistent/relations\"\n\n[output]\npath = \"./out.json\"\n";
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, content).unwrap();
        with_config_env(&config_path, || {
            let config = Config::load();
            assert!(config.is_err());
            assert!(config.unwrap_err().to_string().contains("entities_dir"));
        });
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let original = std::env::var("MOOCGEN_CONFIG").ok();
        std::env::set_var("MOOCGEN_CONFIG", "nonexistent.toml");
        let config = Config::load();
        assert!(config.is_err());
        std::env::remove_var("MOOCGEN_CONFIG");
        if let Some(v) = original {
            std::env::set_var("MOOCGEN_CONFIG", v);
        }
    }
}
