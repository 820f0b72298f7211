use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

use crate::error::{EmitterError, EmitterResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitterConfig {
    /// Segment delimiter used by wildcard matching.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Resolve `emit` and `listeners` through wildcard matching.
    #[serde(default)]
    pub wildcard: bool,

    /// Per-event listener count above which a warning is logged. `0` disables it.
    #[serde(default)]
    pub max_listeners: usize,
}

fn default_delimiter() -> String {
    ".".to_string()
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            wildcard: false,
            max_listeners: 0,
        }
    }
}

impl EmitterConfig {
    pub fn wildcard() -> Self {
        Self {
            wildcard: true,
            ..Self::default()
        }
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_max_listeners(mut self, max_listeners: usize) -> Self {
        self.max_listeners = max_listeners;
        self
    }

    pub fn validate(&self) -> EmitterResult<()> {
        if self.delimiter.is_empty() {
            return Err(EmitterError::invalid_argument(
                "delimiter must not be an empty string",
            ));
        }
        Ok(())
    }

    // JSONファイルから設定を読み込む
    pub fn from_file<P: AsRef<Path>>(path: P) -> EmitterResult<Self> {
        let file = File::open(path)
            .map_err(|e| EmitterError::config(format!("Failed to open config file: {}", e)))?;
        let reader = BufReader::new(file);
        let config: Self = serde_json::from_reader(reader)
            .map_err(|e| EmitterError::config(format!("Failed to parse config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(s: &str) -> EmitterResult<Self> {
        let config: Self = serde_json::from_str(s)
            .map_err(|e| EmitterError::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}
