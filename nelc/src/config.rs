use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;

/// Soft errors allowed before compilation is abandoned.
pub const ERROR_LIMIT: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Abort once this many errors have been reported.
    pub error_limit: usize,
    /// Trace bank layout while compiling.
    pub verbose: bool,
    /// Collect diagnostics without printing them.
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            error_limit: ERROR_LIMIT,
            verbose: false,
            quiet: false,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| Error::FileOpen(path.to_string(), e))?;
        serde_yaml::from_reader(BufReader::new(file)).map_err(|e| Error::Yaml(path.to_string(), e))
    }

    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Self::default()
        }
    }
}
