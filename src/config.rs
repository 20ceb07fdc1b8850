use crate::error::{GenRstError, Result};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_SENTINEL: &str = "!!sphinx";

const NAME_PATTERN: &str = r"^[A-Za-z0-9_\-][A-Za-z0-9_.\-]*$";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub names: Vec<String>,
    pub discover: bool,
    pub paths: PathConfig,
    pub markers: MarkerConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathConfig {
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    #[serde(deserialize_with = "deserialize_extension")]
    pub source_extension: String,
    #[serde(deserialize_with = "deserialize_extension")]
    pub dest_extension: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub sentinel: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub create_missing_dirs: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            names: vec![
                "weekday".to_string(),
                "gap".to_string(),
                "tcorr".to_string(),
            ],
            discover: false,
            paths: PathConfig::default(),
            markers: MarkerConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("../src/"),
            dest_dir: PathBuf::from("_store"),
            source_extension: ".cc".to_string(),
            dest_extension: ".rst".to_string(),
        }
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL.to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(GenRstError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| GenRstError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| GenRstError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["genrst.toml", ".genrst.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref names) = cli_args.names {
            self.names = names.clone();
        }

        if let Some(ref source_dir) = cli_args.source_dir {
            self.paths.source_dir = source_dir.clone();
        }

        if let Some(ref dest_dir) = cli_args.dest_dir {
            self.paths.dest_dir = dest_dir.clone();
        }

        if let Some(ref ext) = cli_args.source_extension {
            self.paths.source_extension = normalize_extension(ext);
        }

        if let Some(ref ext) = cli_args.dest_extension {
            self.paths.dest_extension = normalize_extension(ext);
        }

        if let Some(ref sentinel) = cli_args.sentinel {
            self.markers.sentinel = sentinel.clone();
        }

        if let Some(discover) = cli_args.discover {
            self.discover = discover;
        }

        if let Some(create) = cli_args.create_missing_dirs {
            self.output.create_missing_dirs = create;
        }

        if let Some(ref report_path) = cli_args.report_path {
            self.output.report_path = Some(report_path.clone());
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| GenRstError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| GenRstError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let sentinel = &self.markers.sentinel;
        if sentinel.is_empty() {
            return Err(GenRstError::Config {
                message: "Sentinel marker must not be empty".to_string(),
            });
        }
        if sentinel.contains('\n') || sentinel.contains('\r') {
            return Err(GenRstError::Config {
                message: "Sentinel marker must fit on a single line".to_string(),
            });
        }

        for ext in [&self.paths.source_extension, &self.paths.dest_extension] {
            if ext.contains('/') || ext.contains('\\') {
                return Err(GenRstError::Config {
                    message: format!("Extension cannot contain a path separator: {}", ext),
                });
            }
        }

        // Same directory and extension would truncate the input before reading it.
        if lexically_equal(&self.paths.source_dir, &self.paths.dest_dir)
            && normalize_extension(&self.paths.source_extension)
                == normalize_extension(&self.paths.dest_extension)
        {
            return Err(GenRstError::Config {
                message: "Source and destination templates resolve to the same files".to_string(),
            });
        }

        let pattern = name_pattern()?;
        for name in &self.names {
            if !pattern.is_match(name) {
                return Err(GenRstError::InvalidName { name: name.clone() });
            }
        }

        if self.names.is_empty() && !self.discover {
            return Err(GenRstError::NoNames);
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

pub(crate) fn name_pattern() -> Result<Regex> {
    Regex::new(NAME_PATTERN).map_err(|e| GenRstError::Config {
        message: format!("Invalid name pattern: {}", e),
    })
}

/// Accepts `rst` as well as `.rst`.
fn normalize_extension(ext: &str) -> String {
    if ext.is_empty() || ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

fn deserialize_extension<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|ext| normalize_extension(&ext))
}

/// Compares two paths while ignoring `.` components, so `src` and `./src`
/// count as the same directory.
fn lexically_equal(a: &Path, b: &Path) -> bool {
    fn meaningful(p: &Path) -> Vec<Component<'_>> {
        p.components().filter(|c| *c != Component::CurDir).collect()
    }
    meaningful(a) == meaningful(b)
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub names: Option<Vec<String>>,
    pub source_dir: Option<PathBuf>,
    pub dest_dir: Option<PathBuf>,
    pub source_extension: Option<String>,
    pub dest_extension: Option<String>,
    pub sentinel: Option<String>,
    pub discover: Option<bool>,
    pub create_missing_dirs: Option<bool>,
    pub report_path: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_names(mut self, names: Option<Vec<String>>) -> Self {
        self.names = names;
        self
    }

    pub fn with_source_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.source_dir = dir;
        self
    }

    pub fn with_dest_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.dest_dir = dir;
        self
    }

    pub fn with_source_extension(mut self, ext: Option<String>) -> Self {
        self.source_extension = ext;
        self
    }

    pub fn with_dest_extension(mut self, ext: Option<String>) -> Self {
        self.dest_extension = ext;
        self
    }

    pub fn with_sentinel(mut self, sentinel: Option<String>) -> Self {
        self.sentinel = sentinel;
        self
    }

    pub fn with_discover(mut self, discover: Option<bool>) -> Self {
        self.discover = discover;
        self
    }

    pub fn with_create_missing_dirs(mut self, create: Option<bool>) -> Self {
        self.create_missing_dirs = create;
        self
    }

    pub fn with_report_path(mut self, path: Option<PathBuf>) -> Self {
        self.report_path = path;
        self
    }
}
