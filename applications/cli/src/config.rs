/// CLI configuration
use crate::error::{CliError, Result};
use gecs_storage::{FolderPaths, MUSIC_FOLDER_NAME};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

/// Configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "gecs.toml";

/// Environment variable prefix (`GECS_BASE_DIR`, `GECS_WATCH_DEBOUNCE_MS`, ...)
pub const ENV_PREFIX: &str = "GECS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GecsConfig {
    /// Application folder; defaults to `<Documents>/GecsPlayer`
    #[serde(default)]
    pub base_dir: Option<PathBuf>,

    /// Music folder name inside the application folder
    #[serde(default = "default_music_subdir")]
    pub music_subdir: String,

    /// Download helper executable; discovered next to the binary when unset
    #[serde(default)]
    pub helper_path: Option<PathBuf>,

    /// Quiet period before a burst of file changes triggers a rescan
    #[serde(default = "default_watch_debounce_ms")]
    pub watch_debounce_ms: u64,

    /// Tracing filter used when `RUST_LOG` is not set
    #[serde(default)]
    pub log_filter: Option<String>,
}

impl Default for GecsConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            music_subdir: default_music_subdir(),
            helper_path: None,
            watch_debounce_ms: default_watch_debounce_ms(),
            log_filter: None,
        }
    }
}

impl GecsConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist. Without one, `gecs.toml` in the working
    /// directory is used if present. Environment variables override the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Nested keys use `__`; GECS_BASE_DIR maps to base_dir
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let subdir = Path::new(&self.music_subdir);
        if self.music_subdir.trim().is_empty()
            || !subdir
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(CliError::Config(format!(
                "music_subdir must be a relative folder name, got {:?}",
                self.music_subdir
            )));
        }

        if self.watch_debounce_ms == 0 {
            return Err(CliError::Config(
                "watch_debounce_ms must be greater than zero".to_string(),
            ));
        }

        if let Some(helper) = &self.helper_path {
            if !helper.is_file() {
                return Err(CliError::Config(format!(
                    "download helper not found at {}",
                    helper.display()
                )));
            }
        }

        Ok(())
    }

    /// Resolve the folder layout without creating it
    ///
    /// `base_override` (the `--base-dir` flag) wins over `base_dir`.
    pub fn folder_paths(&self, base_override: Option<&Path>) -> Result<FolderPaths> {
        let base = base_override
            .map(Path::to_path_buf)
            .or_else(|| self.base_dir.clone())
            .or_else(FolderPaths::default_base)
            .ok_or_else(|| {
                CliError::Config(
                    "no home directory found; set GECS_BASE_DIR or pass --base-dir".to_string(),
                )
            })?;

        Ok(FolderPaths::with_music_subdir(base, &self.music_subdir))
    }

    pub fn watch_debounce(&self) -> Duration {
        Duration::from_millis(self.watch_debounce_ms)
    }
}

fn default_music_subdir() -> String {
    MUSIC_FOLDER_NAME.to_string()
}

fn default_watch_debounce_ms() -> u64 {
    gecs_importer::watcher::DEFAULT_DEBOUNCE_MS
}
