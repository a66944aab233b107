//! Command-line argument parsing
//!
//! Supports:
//! - Opening files as tabs
//! - New empty document mode
//! - Detection inspection mode (report encoding verdicts without opening)

use clap::Parser;
use std::path::PathBuf;

/// A distraction-free writing app
#[derive(Parser, Debug)]
#[command(name = "sumi", version, about = "A distraction-free writing app")]
pub struct CliArgs {
    /// Files to open
    #[arg(value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Start with an empty document
    #[arg(short = 'n', long)]
    pub new: bool,

    /// Report the detected encoding and line endings for each path and exit
    #[arg(long)]
    pub inspect: bool,
}

/// What the process should do at startup
#[derive(Debug, Clone)]
pub enum StartupMode {
    /// Start with an empty document
    Empty,
    /// Open files as tabs
    OpenFiles(Vec<PathBuf>),
    /// Print detection reports and exit
    Inspect(Vec<PathBuf>),
}

impl CliArgs {
    pub fn startup_mode(self) -> Result<StartupMode, String> {
        if self.inspect {
            if self.paths.is_empty() {
                return Err("--inspect requires at least one path".to_string());
            }
            return Ok(StartupMode::Inspect(self.paths));
        }
        if self.new || self.paths.is_empty() {
            return Ok(StartupMode::Empty);
        }
        if let Some(dir) = self.paths.iter().find(|p| p.is_dir()) {
            return Err(format!("{} is a directory", dir.display()));
        }
        Ok(StartupMode::OpenFiles(self.paths))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(paths: &[&str], new: bool, inspect: bool) -> CliArgs {
        CliArgs {
            paths: paths.iter().map(PathBuf::from).collect(),
            new,
            inspect,
        }
    }

    #[test]
    fn test_no_args_gives_empty_mode() {
        let mode = args(&[], false, false).startup_mode().unwrap();
        assert!(matches!(mode, StartupMode::Empty));
    }

    #[test]
    fn test_new_flag_gives_empty_mode() {
        let mode = args(&["file.md"], true, false).startup_mode().unwrap();
        assert!(matches!(mode, StartupMode::Empty));
    }

    #[test]
    fn test_paths_open_as_files() {
        let mode = args(&["a.md", "b.md"], false, false).startup_mode().unwrap();
        let StartupMode::OpenFiles(files) = mode else {
            panic!("expected OpenFiles");
        };
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_inspect_mode() {
        let mode = args(&["a.md"], false, true).startup_mode().unwrap();
        assert!(matches!(mode, StartupMode::Inspect(_)));
    }

    #[test]
    fn test_inspect_without_paths_is_an_error() {
        assert!(args(&[], false, true).startup_mode().is_err());
    }
}
