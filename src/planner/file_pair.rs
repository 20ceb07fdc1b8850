use crate::config::{name_pattern, Config, PathConfig};
use crate::error::{GenRstError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilePair {
    pub name: String,
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl FilePair {
    pub fn from_name(name: &str, paths: &PathConfig) -> Self {
        Self {
            name: name.to_string(),
            source: paths
                .source_dir
                .join(format!("{}{}", name, paths.source_extension)),
            destination: paths
                .dest_dir
                .join(format!("{}{}", name, paths.dest_extension)),
        }
    }
}

/// Builds the ordered pair list for `config`.
///
/// The config is validated first. An empty name list with `discover` set
/// falls back to the files found in the source directory.
pub fn plan_pairs(config: &Config) -> Result<Vec<FilePair>> {
    config.validate()?;

    let names = if config.names.is_empty() && config.discover {
        discover_names(&config.paths.source_dir, &config.paths.source_extension)?
    } else {
        config.names.clone()
    };

    if names.is_empty() {
        return Err(GenRstError::NoNames);
    }

    let pattern = name_pattern()?;
    let mut pairs = Vec::with_capacity(names.len());
    for name in &names {
        if !pattern.is_match(name) {
            return Err(GenRstError::InvalidName { name: name.clone() });
        }
        pairs.push(FilePair::from_name(name, &config.paths));
    }

    tracing::debug!(count = pairs.len(), "planned file pairs");
    Ok(pairs)
}

/// Lists the stems of files directly inside `source_dir` that end in
/// `extension`, sorted by name.
pub fn discover_names(source_dir: &Path, extension: &str) -> Result<Vec<String>> {
    if !source_dir.is_dir() {
        return Err(GenRstError::Config {
            message: format!("Source directory does not exist: {}", source_dir.display()),
        });
    }

    let mut names = Vec::new();
    let walker = WalkDir::new(source_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| GenRstError::Read {
            path: source_dir.to_path_buf(),
            source: e.into(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str() else {
            tracing::debug!(path = %entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };

        if let Some(stem) = file_name.strip_suffix(extension) {
            if !stem.is_empty() {
                names.push(stem.to_string());
            }
        }
    }

    tracing::debug!(dir = %source_dir.display(), found = names.len(), "discovered source names");
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_templates() {
        let config = Config::default();
        let pairs = plan_pairs(&config).unwrap();

        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].name, "weekday");
        assert_eq!(pairs[0].source, PathBuf::from("../src/weekday.cc"));
        assert_eq!(pairs[0].destination, PathBuf::from("_store/weekday.rst"));
        assert_eq!(pairs[2].destination, PathBuf::from("_store/tcorr.rst"));
    }

    #[test]
    fn test_name_order_preserved() {
        let mut config = Config::default();
        config.names = vec!["tcorr".into(), "gap".into(), "weekday".into()];
        let names: Vec<_> = plan_pairs(&config)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["tcorr", "gap", "weekday"]);
    }

    #[test]
    fn test_traversal_name_rejected() {
        let mut config = Config::default();
        config.names = vec!["../secret".into()];
        assert!(matches!(
            plan_pairs(&config),
            Err(GenRstError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_toml_extension_without_dot() {
        let config: Config = toml::from_str("[paths]\nsource_extension = \"cc\"\n").unwrap();
        let pairs = plan_pairs(&config).unwrap();
        assert_eq!(pairs[0].source, PathBuf::from("../src/weekday.cc"));
    }

    #[test]
    fn test_invalid_config_not_planned() {
        let mut config = Config::default();
        config.markers.sentinel.clear();
        assert!(matches!(plan_pairs(&config), Err(GenRstError::Config { .. })));
    }

    #[test]
    fn test_discovery() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("tcorr.cc"), "").unwrap();
        fs::write(dir.path().join("interp.cc"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("nested.cc")).unwrap();

        let names = discover_names(dir.path(), ".cc").unwrap();
        assert_eq!(names, vec!["interp", "tcorr"]);

        let mut config = Config::default();
        config.names.clear();
        config.discover = true;
        config.paths.source_dir = dir.path().to_path_buf();
        let pairs = plan_pairs(&config).unwrap();
        assert_eq!(pairs[0].source, dir.path().join("interp.cc"));
    }

    #[test]
    fn test_discovery_missing_directory() {
        let dir = TempDir::new().unwrap();
        assert!(discover_names(&dir.path().join("absent"), ".cc").is_err());
    }

    #[test]
    fn test_empty_discovery_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.names.clear();
        config.discover = true;
        config.paths.source_dir = dir.path().to_path_buf();
        assert!(matches!(plan_pairs(&config), Err(GenRstError::NoNames)));
    }
}
