//! External program invocation through argument templates.

use reelsmith_error::{ProviderError, ProviderErrorKind, ProviderResult};
use serde::{Deserialize, Serialize};
use std::process::Stdio;

const STDERR_EXCERPT: usize = 400;

/// A program and its argument template.
///
/// Each `{name}` placeholder in an argument is replaced by the matching
/// variable. Arguments are passed directly to the program, never through a
/// shell, so substituted values need no quoting.
///
/// # Examples
///
/// ```
/// use reelsmith_models::CommandSpec;
///
/// let spec = CommandSpec::new("ffprobe", ["-i", "{audio}"]);
/// assert_eq!(spec.arguments(&[("audio", "voice.wav")]), vec!["-i", "voice.wav"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct CommandSpec {
    /// Executable name or path
    program: String,
    /// Argument template
    #[serde(default)]
    args: Vec<String>,
}

impl CommandSpec {
    /// Create a command template.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Arguments with placeholders substituted.
    pub fn arguments(&self, vars: &[(&str, &str)]) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                vars.iter().fold(arg.clone(), |acc, (name, value)| {
                    acc.replace(&format!("{{{}}}", name), value)
                })
            })
            .collect()
    }

    /// Run the command and return its stdout.
    ///
    /// # Errors
    ///
    /// Returns a `Command` provider error if the program cannot be started
    /// or exits unsuccessfully.
    #[tracing::instrument(skip(self, vars), fields(program = %self.program))]
    pub async fn run(&self, vars: &[(&str, &str)]) -> ProviderResult<Vec<u8>> {
        let args = self.arguments(vars);
        tracing::debug!(args = args.len(), "Running command");

        let output = tokio::process::Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| self.error(format!("failed to start: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let excerpt: String = stderr
                .trim()
                .chars()
                .rev()
                .take(STDERR_EXCERPT)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            tracing::error!(status = %output.status, "Command failed");
            return Err(self.error(format!("{}: {}", output.status, excerpt)));
        }

        Ok(output.stdout)
    }

    fn error(&self, message: String) -> ProviderError {
        ProviderError::new(ProviderErrorKind::Command {
            program: self.program.clone(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_substituted_everywhere() {
        let spec = CommandSpec::new("tts", ["--out={output}", "{text}", "{missing}"]);
        assert_eq!(
            spec.arguments(&[("output", "a.wav"), ("text", "Hello {output}")]),
            vec!["--out=a.wav", "Hello {output}", "{missing}"]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_captures_stdout() {
        let spec = CommandSpec::new("sh", ["-c", "printf '%s' \"$0\"", "{word}"]);
        let stdout = spec.run(&[("word", "owl")]).await.unwrap();
        assert_eq!(stdout, b"owl");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failure_reports_stderr() {
        let spec = CommandSpec::new("sh", ["-c", "echo broken >&2; exit 3"]);
        let err = spec.run(&[]).await.unwrap_err();
        match err.kind {
            ProviderErrorKind::Command { program, message } => {
                assert_eq!(program, "sh");
                assert!(message.contains("broken"));
            }
            other => panic!("unexpected error {}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_program() {
        let spec = CommandSpec::new("reelsmith-no-such-program", Vec::<String>::new());
        assert!(spec.run(&[]).await.is_err());
    }
}
