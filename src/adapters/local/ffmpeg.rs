use crate::error::{Error, Result};
use crate::ports::process::{ProcessOutput, ProcessRunner};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Runs the transcoder binary as a tokio child process.
///
/// The child is killed when its future is dropped, which is what happens
/// when the timeout elapses.
#[derive(Clone, Debug)]
pub struct FfmpegRunner {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl FfmpegRunner {
    pub fn new(program: impl Into<PathBuf>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ProcessRunner for FfmpegRunner {
    async fn run(&self, args: &[OsString], cwd: &Path) -> Result<ProcessOutput> {
        let child = Command::new(&self.program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::Spawn {
                program: self.program(),
                source,
            })?;

        let waited = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, child.wait_with_output())
                .await
                .map_err(|_| Error::TimedOut {
                    program: self.program(),
                    timeout,
                })?,
            None => child.wait_with_output().await,
        };
        let output = waited.map_err(|source| Error::Wait {
            program: self.program(),
            source,
        })?;

        let mut combined_output = String::from_utf8_lossy(&output.stdout).into_owned();
        combined_output.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(ProcessOutput {
            success: output.status.success(),
            code: output.status.code(),
            combined_output,
        })
    }

    fn program(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<OsString> {
        vec!["-c".into(), script.into()]
    }

    #[tokio::test]
    async fn captures_stdout_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FfmpegRunner::new("sh", None);

        let output = runner
            .run(&sh("echo out; echo err 1>&2"), dir.path())
            .await
            .unwrap();

        assert!(output.success);
        assert_eq!(output.code, Some(0));
        assert_eq!(output.combined_output, "out\nerr\n");
    }

    #[tokio::test]
    async fn non_zero_exit_is_an_output_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FfmpegRunner::new("sh", Some(Duration::from_secs(10)));

        let output = runner.run(&sh("exit 3"), dir.path()).await.unwrap();

        assert!(!output.success);
        assert_eq!(output.code, Some(3));
    }

    #[tokio::test]
    async fn runs_inside_the_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FfmpegRunner::new("sh", None);

        runner.run(&sh("touch marker"), dir.path()).await.unwrap();

        assert!(dir.path().join("marker").exists());
    }

    #[tokio::test]
    async fn missing_program_fails_to_spawn() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FfmpegRunner::new("nonexistent_transcoder_xyz_12345", None);

        let err = runner.run(&[], dir.path()).await.unwrap_err();

        assert!(matches!(err, Error::Spawn { .. }), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn timeout_kills_the_child() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FfmpegRunner::new("sh", Some(Duration::from_millis(100)));

        let started = std::time::Instant::now();
        let err = runner.run(&sh("sleep 10"), dir.path()).await.unwrap_err();

        assert!(matches!(err, Error::TimedOut { .. }), "unexpected error: {err}");
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
