use std::{env, path::PathBuf};

use directories::ProjectDirs;
use lazy_static::lazy_static;
lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

/// Where the user config is read from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Read config files from this directory
    Dir(PathBuf),
    /// Only use the built-in defaults
    None,
}

pub struct PathConfig {
    pub data: PathBuf,
    pub config: ConfigSource,
}

/// Path priority:
/// 1. Path specified via --data or --config (--no-config disables user config entirely)
/// 2. Environment variable set via ATTENDTERM_DATA or ATTENDTERM_CONFIG
/// 3. XDG paths
/// 4. ./.data and ./.config
impl PathConfig {
    pub fn get_data_dir() -> PathBuf {
        if let Some(s) = DATA_FOLDER.clone() {
            s
        } else if let Some(proj_dirs) = Self::project_directory() {
            proj_dirs.data_local_dir().to_path_buf()
        } else {
            PathBuf::from(".").join(".data")
        }
    }

    pub fn get_config_dir() -> PathBuf {
        if let Some(s) = CONFIG_FOLDER.clone() {
            s
        } else if let Some(proj_dirs) = Self::project_directory() {
            proj_dirs.config_local_dir().to_path_buf()
        } else {
            PathBuf::from(".").join(".config")
        }
    }
    fn project_directory() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "example", env!("CARGO_PKG_NAME"))
    }
    pub fn new(data_str: Option<String>, config_str: Option<String>, no_config: bool) -> Self {
        let data = match data_str {
            Some(p) => PathBuf::from(p),
            None => Self::get_data_dir(),
        };
        let config = if no_config {
            ConfigSource::None
        } else {
            match config_str {
                Some(p) => ConfigSource::Dir(PathBuf::from(p)),
                None => ConfigSource::Dir(Self::get_config_dir()),
            }
        };
        Self { data, config }
    }
}
