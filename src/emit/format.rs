//! External BUILD file formatter.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::ExportError;
use crate::util::process::{find_executable, ProcessBuilder};

/// Program that reads BUILD text on stdin and writes it formatted to stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatterConfig {
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        FormatterConfig {
            program: "buildifier".to_string(),
            args: vec!["-type=build".to_string()],
        }
    }
}

/// A formatter resolved against `PATH`.
#[derive(Debug, Clone)]
pub struct Formatter {
    program: PathBuf,
    args: Vec<String>,
}

impl Formatter {
    pub fn new(config: &FormatterConfig) -> Self {
        let program = find_executable(&config.program).unwrap_or_else(|| {
            tracing::debug!("`{}` not found in PATH", config.program);
            PathBuf::from(&config.program)
        });
        Formatter {
            program,
            args: config.args.clone(),
        }
    }

    /// Format the build file of `package`.
    pub fn format(&self, package: &str, text: &str) -> Result<String, ExportError> {
        let failed = |message: String| ExportError::FormatterFailed {
            program: self.program.display().to_string(),
            package: package.to_string(),
            message,
        };

        let output = ProcessBuilder::new(&self.program)
            .args(&self.args)
            .stdin(text)
            .exec_and_check()
            .map_err(|e| failed(format!("{:#}", e)))?;

        String::from_utf8(output.stdout).map_err(|e| failed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_passthrough_formatter() {
        let formatter = Formatter::new(&FormatterConfig {
            program: "cat".to_string(),
            args: Vec::new(),
        });
        assert_eq!(formatter.format("a", "x = 1\n").unwrap(), "x = 1\n");
    }

    #[test]
    fn test_missing_formatter_fails() {
        let formatter = Formatter::new(&FormatterConfig {
            program: "gnport-no-such-formatter".to_string(),
            args: Vec::new(),
        });
        let err = formatter.format("api/audio", "").unwrap_err();
        match err {
            ExportError::FormatterFailed { package, message, .. } => {
                assert_eq!(package, "api/audio");
                assert!(message.contains("failed to spawn"));
            }
            other => panic!("expected formatter failure, got {:?}", other),
        }
    }
}
