//! Loading and merging configuration from several files and directories.

use std::path::Path;

use snafu::prelude::*;
use tracing::debug;

use super::{Config, ConfigPath};
use crate::error::{ConfigError, ReadDirSnafu, ReadFileSnafu, UnsupportedConfigFileSnafu};

/// Check if a path has a YAML extension.
pub fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == "yaml" || ext == "yml")
}

/// Load every path and merge the readers they declare.
///
/// Errors from all paths are collected before failing. The result is not
/// validated.
pub fn load_from_paths(paths: &[ConfigPath]) -> Result<Config, ConfigError> {
    let mut config = Config::default();
    let mut errors = Vec::new();

    for path in paths {
        let (display, loaded) = match path {
            ConfigPath::File(file) => (file.as_path(), load_file(file)),
            ConfigPath::Dir(dir) => (dir.as_path(), load_dir(dir)),
        };

        match loaded.and_then(|partial| config.merge(partial)) {
            Ok(()) => {}
            Err(e) => errors.push(format!("{}: {e}", display.display())),
        }
    }

    if !errors.is_empty() {
        return Err(ConfigError::MultipleErrors { errors });
    }
    Ok(config)
}

fn load_file(path: &Path) -> Result<Config, ConfigError> {
    ensure!(is_yaml_file(path), UnsupportedConfigFileSnafu { path });

    let contents = std::fs::read_to_string(path).context(ReadFileSnafu { path })?;
    let config = Config::parse_unvalidated(&contents)?;

    debug!(
        "Loaded {} reader(s) from {}",
        config.reader_count(),
        path.display()
    );
    Ok(config)
}

/// Load all YAML files in `dir`, in file name order. Other files are ignored.
fn load_dir(dir: &Path) -> Result<Config, ConfigError> {
    let mut files: Vec<_> = std::fs::read_dir(dir)
        .context(ReadDirSnafu { path: dir })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_yaml_file(path))
        .collect();
    files.sort();

    let mut config = Config::default();
    for path in files {
        config.merge(load_file(&path)?)?;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const EVENTS: &str = r#"
readers:
  events:
    format: json
    location: /in/events
    schemaLocation: /schema/events
"#;

    const ORDERS: &str = r#"
readers:
  orders:
    format: csv
    location: /in/orders
    schemaLocation: /schema/orders
"#;

    #[test]
    fn test_is_yaml_file() {
        assert!(is_yaml_file(Path::new("readers.yaml")));
        assert!(is_yaml_file(Path::new("readers.yml")));
        assert!(!is_yaml_file(Path::new("readers.toml")));
        assert!(!is_yaml_file(Path::new("schema.json")));
    }

    #[test]
    fn test_load_files_and_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("events.yaml");
        fs::write(&file, EVENTS).unwrap();

        let conf_d = dir.path().join("conf.d");
        fs::create_dir(&conf_d).unwrap();
        fs::write(conf_d.join("orders.yml"), ORDERS).unwrap();
        fs::write(conf_d.join("README.md"), "ignored").unwrap();

        let config =
            load_from_paths(&[ConfigPath::file(&file), ConfigPath::dir(&conf_d)]).unwrap();

        let names: Vec<&str> = config.readers().map(|(key, _)| key.id()).collect();
        assert_eq!(names, vec!["events", "orders"]);
    }

    #[test]
    fn test_duplicate_reader_across_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.yaml");
        let b = dir.path().join("b.yaml");
        fs::write(&a, EVENTS).unwrap();
        fs::write(&b, EVENTS).unwrap();

        let err = load_from_paths(&[ConfigPath::file(&a), ConfigPath::file(&b)]).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("Duplicate reader names: events"), "{message}");
    }

    #[test]
    fn test_errors_collected() {
        let dir = tempfile::tempdir().unwrap();
        let toml = dir.path().join("readers.toml");
        let missing = dir.path().join("missing.yaml");
        fs::write(&toml, "").unwrap();

        let err =
            load_from_paths(&[ConfigPath::file(&toml), ConfigPath::file(&missing)]).unwrap_err();

        match err {
            ConfigError::MultipleErrors { errors } => assert_eq!(errors.len(), 2),
            other => panic!("Expected MultipleErrors, got {other:?}"),
        }
    }
}
