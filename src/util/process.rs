//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use anyhow::{bail, Context, Result};

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    stdin: Option<Vec<u8>>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            stdin: None,
        }
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set stdin data.
    pub fn stdin(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(data.into());
        self
    }

    /// Execute the command and wait for completion.
    ///
    /// Stdin is fed from a separate thread so a child that writes output
    /// before it has read all of its input cannot deadlock.
    pub fn exec(&self) -> Result<Output> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(if self.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))?;

        let input = child.stdin.take();
        std::thread::scope(|scope| {
            let writer = match (input, &self.stdin) {
                (Some(mut pipe), Some(data)) => Some(scope.spawn(move || pipe.write_all(data))),
                _ => None,
            };

            let output = child
                .wait_with_output()
                .with_context(|| format!("failed to wait for `{}`", self.program.display()))?;

            if let Some(writer) = writer {
                match writer.join() {
                    Ok(Ok(())) => {}
                    // The child may exit without reading everything; its
                    // status decides success.
                    Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {}
                    Ok(Err(e)) => {
                        return Err(e).with_context(|| {
                            format!("failed to write stdin of `{}`", self.program.display())
                        })
                    }
                    Err(_) => bail!("stdin writer for `{}` panicked", self.program.display()),
                }
            }
            Ok(output)
        })
    }

    /// Execute and require success.
    pub fn exec_and_check(&self) -> Result<Output> {
        let output = self.exec()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "`{}` failed with exit code {:?}\n{}",
                self.display_command(),
                output.status.code(),
                stderr.trim_end()
            );
        }
        Ok(output)
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_stdin_is_piped() {
        let output = ProcessBuilder::new("cat")
            .stdin("cc_library(name = \"a\")\n")
            .exec_and_check()
            .unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout), "cc_library(name = \"a\")\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_is_reported() {
        let err = ProcessBuilder::new("false").exec_and_check().unwrap_err();
        assert!(err.to_string().contains("`false` failed"));
    }

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("buildifier").args(["-type=build", "-lint=off"]);
        assert_eq!(pb.display_command(), "buildifier -type=build -lint=off");
    }

    #[test]
    fn test_missing_executable() {
        assert!(find_executable("gnport-no-such-program").is_none());
    }
}
