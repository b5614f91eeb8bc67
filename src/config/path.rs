//! Command-line arguments and configuration sources.

use std::path::PathBuf;

use clap::Parser;

/// A configuration source: a single file or a directory of YAML files.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigPath {
    File(PathBuf),
    Dir(PathBuf),
}

impl ConfigPath {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self::Dir(path.into())
    }
}

/// Resolve auto loader configurations and print the read requests they produce.
#[derive(Parser, Debug)]
#[command(version)]
pub struct CliArgs {
    /// Path to configuration file (can be specified multiple times)
    #[arg(short, long)]
    pub config: Vec<PathBuf>,

    /// Path to configuration directory (can be specified multiple times)
    #[arg(short = 'C', long = "config-dir")]
    pub config_dirs: Vec<PathBuf>,

    /// Only plan the named reader
    #[arg(short, long)]
    pub reader: Option<String>,
}

impl CliArgs {
    /// Files first, then directories, each group in the order given.
    pub fn config_paths(&self) -> Vec<ConfigPath> {
        self.config
            .iter()
            .map(ConfigPath::file)
            .chain(self.config_dirs.iter().map(ConfigPath::dir))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paths_order() {
        let args = CliArgs::parse_from([
            "autoloader",
            "-C",
            "/etc/autoloader/conf.d",
            "-c",
            "a.yaml",
            "--config",
            "b.yaml",
        ]);

        assert_eq!(
            args.config_paths(),
            vec![
                ConfigPath::file("a.yaml"),
                ConfigPath::file("b.yaml"),
                ConfigPath::dir("/etc/autoloader/conf.d"),
            ]
        );
        assert!(args.reader.is_none());
    }
}
