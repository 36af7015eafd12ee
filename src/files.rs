//! Output directory and report-file management.
//!
//! A directory that cannot be created is fatal; a report file that cannot be
//! opened is logged and reported to the caller as `None` so the driver can
//! skip its work instead of writing to a dead stream. Files close on drop at
//! the end of each driver call.
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::Path;

/// Open `output_dir/set_name/file_name` for writing, creating the subset
/// directory if needed. An existing directory is success.
pub fn ensure_and_open(output_dir: &Path, set_name: &str, file_name: &str) -> Result<Option<File>> {
    let set_dir = output_dir.join(set_name);
    fs::create_dir_all(&set_dir).with_context(|| format!("create {}", set_dir.display()))?;
    open(&set_dir.join(file_name))
}

/// Open `output_dir/file_name` for writing; used by the subset-independent
/// summary report.
pub fn ensure_and_open_root(output_dir: &Path, file_name: &str) -> Result<Option<File>> {
    fs::create_dir_all(output_dir).with_context(|| format!("create {}", output_dir.display()))?;
    open(&output_dir.join(file_name))
}

fn open(path: &Path) -> Result<Option<File>> {
    match File::create(path) {
        Ok(file) => Ok(Some(file)),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "unable to open report file");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ensure_and_open;
    use std::io::Write;

    #[test]
    fn creates_subset_directory_and_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let file = ensure_and_open(dir.path(), "core", "sizes.txt").expect("open report");
        let mut file = file.expect("file stream");
        writeln!(file, "entry").expect("write entry");
        assert!(dir.path().join("core/sizes.txt").is_file());
    }

    #[test]
    fn existing_directory_is_success() {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(dir.path().join("core")).expect("pre-create subset dir");
        let first = ensure_and_open(dir.path(), "core", "a.txt").expect("open first");
        assert!(first.is_some());
        let second = ensure_and_open(dir.path(), "core", "b.txt").expect("open second");
        assert!(second.is_some());
    }

    #[test]
    fn unopenable_file_is_reported_as_none() {
        let dir = tempfile::tempdir().expect("create temp dir");
        // A directory squatting on the file name makes the open fail.
        std::fs::create_dir_all(dir.path().join("core/annotated.txt"))
            .expect("pre-create blocking dir");
        let file = ensure_and_open(dir.path(), "core", "annotated.txt").expect("open report");
        assert!(file.is_none());
    }
}
