use crate::domain::format::{ConversionResult, ConversionStatus, PackagingReport, StreamFormat};
use crate::domain::identity::VideoLayout;
use crate::error::Error;
use crate::ports::process::ProcessRunner;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Drives the external transcoder once per target format.
#[derive(Clone)]
pub struct PackagerService {
    runner: Arc<dyn ProcessRunner>,
    parallel: bool,
}

impl PackagerService {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            runner,
            parallel: false,
        }
    }

    /// Run the HLS and DASH conversions concurrently instead of one after
    /// the other. They write disjoint subtrees so no locking is involved.
    pub fn with_parallel_formats(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub async fn package_hls(&self, input: &Path, output_dir: &Path) -> ConversionResult {
        self.package(StreamFormat::Hls, input, output_dir).await
    }

    pub async fn package_dash(&self, input: &Path, output_dir: &Path) -> ConversionResult {
        self.package(StreamFormat::Dash, input, output_dir).await
    }

    /// Package both formats into the layout's subtrees.
    ///
    /// Nothing is rolled back when one format fails: whatever the other
    /// conversion wrote stays on disk.
    pub async fn package_all(&self, input: &Path, layout: &VideoLayout) -> PackagingReport {
        let (hls, dash) = if self.parallel {
            tokio::join!(
                self.package_hls(input, &layout.hls_dir),
                self.package_dash(input, &layout.dash_dir)
            )
        } else {
            let hls = self.package_hls(input, &layout.hls_dir).await;
            let dash = self.package_dash(input, &layout.dash_dir).await;
            (hls, dash)
        };
        PackagingReport { hls, dash }
    }

    /// Convert `input` into `format` inside `output_dir`.
    ///
    /// Succeeds only when the transcoder exits zero and the format's entry
    /// file exists afterwards.
    pub async fn package(
        &self,
        format: StreamFormat,
        input: &Path,
        output_dir: &Path,
    ) -> ConversionResult {
        if let Err(err) = tokio::fs::create_dir_all(output_dir).await {
            warn!(%format, dir = %output_dir.display(), error = %err, "Cannot create output directory");
            return ConversionResult {
                format,
                status: ConversionStatus::Failed,
                diagnostics: err.to_string(),
            };
        }

        let entry = output_dir.join(format.entry_file());
        let args = format.transcoder_args(input, &entry);

        let result = match self.runner.run(&args, output_dir).await {
            Ok(output) if output.success => {
                if is_file(&entry).await {
                    ConversionResult {
                        format,
                        status: ConversionStatus::Done,
                        diagnostics: output.combined_output,
                    }
                } else {
                    let mut diagnostics = output.combined_output;
                    diagnostics.push_str(&format!(
                        "\n{} exited successfully but did not write {}",
                        self.runner.program(),
                        entry.display()
                    ));
                    ConversionResult {
                        format,
                        status: ConversionStatus::Failed,
                        diagnostics,
                    }
                }
            }
            Ok(output) => ConversionResult {
                format,
                status: ConversionStatus::Failed,
                diagnostics: format!(
                    "exit code {}\n{}",
                    output
                        .code
                        .map_or_else(|| "none".to_string(), |c| c.to_string()),
                    output.combined_output
                ),
            },
            Err(err @ Error::TimedOut { .. }) => ConversionResult {
                format,
                status: ConversionStatus::TimedOut,
                diagnostics: err.to_string(),
            },
            Err(err) => ConversionResult {
                format,
                status: ConversionStatus::Failed,
                diagnostics: err.to_string(),
            },
        };

        if result.ok() {
            info!(%format, input = %input.display(), "Conversion completed");
            debug!(%format, output = %result.diagnostics, "Transcoder output");
        } else {
            warn!(
                %format,
                status = ?result.status,
                input = %input.display(),
                output = %result.diagnostics,
                "Conversion failed"
            );
        }
        result
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}
