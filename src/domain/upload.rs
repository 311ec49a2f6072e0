//! Upload validation and filename sanitization.

use crate::domain::identity::VideoId;
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Source container extensions accepted by default.
pub const ALLOWED_EXTENSIONS: [&str; 7] = ["mp4", "avi", "mov", "mkv", "wmv", "flv", "webm"];

/// Longest filename (in bytes) kept on disk.
pub const MAX_FILENAME_LEN: usize = 255;

const FALLBACK_STEM: &str = "upload";

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("valid regex"));

static DOT_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{2,}").expect("valid regex"));

/// Which uploads are accepted.
#[derive(Clone, Debug)]
pub struct UploadPolicy {
    allowed_extensions: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(ALLOWED_EXTENSIONS)
    }
}

impl UploadPolicy {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    /// True when the text after the final `.` is an allowed extension,
    /// compared case-insensitively.
    pub fn is_allowed(&self, filename: &str) -> bool {
        match extension(filename) {
            Some(ext) => {
                let ext = ext.to_ascii_lowercase();
                self.allowed_extensions.iter().any(|allowed| *allowed == ext)
            }
            None => false,
        }
    }
}

fn extension(filename: &str) -> Option<&str> {
    let (_, ext) = filename.rsplit_once('.')?;
    (!ext.is_empty()).then_some(ext)
}

/// Reduce `filename` to a single safe path component.
///
/// The result only contains `[A-Za-z0-9._-]`, never contains `..`, never
/// starts with a dot and is at most [`MAX_FILENAME_LEN`] bytes, so joining it
/// onto a directory always yields a direct child of that directory.
pub fn sanitize(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    let name = UNSAFE_CHARS.replace_all(base.trim(), "_");
    let name = DOT_RUNS.replace_all(&name, ".");

    let mut name = name.trim_start_matches('.').to_string();
    if name.is_empty() {
        name = FALLBACK_STEM.to_string();
    }

    if name.len() > MAX_FILENAME_LEN {
        name = truncate_keeping_extension(&name);
    }
    name
}

// Input is ASCII at this point so byte slicing is safe.
fn truncate_keeping_extension(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if ext.len() + 1 < MAX_FILENAME_LEN => {
            let keep = MAX_FILENAME_LEN - ext.len() - 1;
            let stem = if stem.is_empty() { FALLBACK_STEM } else { &stem[..keep.min(stem.len())] };
            format!("{stem}.{ext}")
        }
        _ => name[..MAX_FILENAME_LEN].to_string(),
    }
}

/// What was stored for one accepted upload.
#[derive(Clone, Debug)]
pub struct UploadRecord {
    pub id: VideoId,
    pub original_filename: String,
    pub sanitized_filename: String,
    pub path: PathBuf,
}
