use crate::error::Result;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;

/// What a finished child process left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// True on a zero exit status.
    pub success: bool,
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    /// stdout followed by stderr, lossily decoded.
    pub combined_output: String,
}

/// Capability to run the external transcoder to completion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run the program with `args` inside `cwd` and wait for it to exit.
    ///
    /// Errors are reserved for processes that could not be started or that
    /// exceeded the runner's timeout; a non-zero exit is a normal output.
    async fn run(&self, args: &[OsString], cwd: &Path) -> Result<ProcessOutput>;

    /// Program name, for logs.
    fn program(&self) -> String;
}
