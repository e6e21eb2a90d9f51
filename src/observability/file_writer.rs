//! Rotating log file writer with size-based rotation and backup retention.
//!
//! Keeps the log file from growing without bound: once it passes
//! [`MAX_FILE_SIZE_BYTES`] it is renamed with a timestamp suffix and a fresh
//! file is started, keeping at most [`MAX_BACKUP_FILES`] old files.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// Maximum file size before rotation (10 MB).
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
pub const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file writer.
///
/// Cloning shares the same file handle. Implements [`MakeWriter`] so it can be
/// handed straight to a `tracing_subscriber` fmt layer.
///
/// # Rotation Strategy
///
/// 1. Check file size before each write
/// 2. If size > 10MB, rotate:
///    - Rename current file to `<name>.log.<timestamp>`
///    - Create new empty file
///    - Remove oldest backups beyond 3
#[derive(Clone)]
pub struct FileWriter {
    /// Path to the primary log file.
    file_path: PathBuf,
    /// Lazily-initialized file handle (opens on first write).
    writer: Arc<Mutex<Option<fs::File>>>,
}

impl FileWriter {
    /// Creates a new file writer for the given path.
    ///
    /// The file is not opened until the first write operation.
    #[must_use]
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            writer: Arc::new(Mutex::new(None)),
        }
    }

    /// Appends `buf` to the file, rotating first if it has grown too large.
    ///
    /// # Errors
    ///
    /// May fail due to file system permissions, disk space exhaustion, or a
    /// poisoned mutex.
    pub fn write_bytes(&self, buf: &[u8]) -> io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| io::Error::other(format!("Mutex poisoned: {e}")))?;

        self.check_and_rotate(&mut writer)?;

        if writer.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)?;
            *writer = Some(file);
        }

        let file = writer
            .as_mut()
            .ok_or_else(|| io::Error::other("No file available"))?;

        file.write_all(buf)?;
        file.flush()?;
        drop(writer);

        Ok(())
    }

    /// Closes the file handle if the file exceeds the size limit and rotates.
    fn check_and_rotate(&self, writer: &mut Option<fs::File>) -> io::Result<()> {
        if let Ok(metadata) = fs::metadata(&self.file_path) {
            if metadata.len() > MAX_FILE_SIZE_BYTES {
                *writer = None;
                self.rotate_files()?;
            }
        }
        Ok(())
    }

    /// Renames the current file to a timestamped backup and prunes old ones.
    fn rotate_files(&self) -> io::Result<()> {
        let timestamp = chrono::Utc::now().timestamp();
        let backup_path = self.file_path.with_extension(format!("log.{timestamp}"));

        if self.file_path.exists() {
            fs::rename(&self.file_path, &backup_path)?;
        }

        self.cleanup_old_backups()
    }

    /// Removes backups beyond the retention limit, newest kept first.
    ///
    /// Individual deletion errors are ignored so cleanup continues.
    fn cleanup_old_backups(&self) -> io::Result<()> {
        let parent_dir = self
            .file_path
            .parent()
            .ok_or_else(|| io::Error::other("No parent directory"))?;

        let file_stem = self
            .file_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| io::Error::other("Invalid file name"))?;

        let mut backups: Vec<PathBuf> = fs::read_dir(parent_dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(file_stem) && name.contains(".log."))
            })
            .collect();

        backups.sort_by(|a, b| {
            let a_time = fs::metadata(a).and_then(|m| m.modified()).ok();
            let b_time = fs::metadata(b).and_then(|m| m.modified()).ok();
            b_time.cmp(&a_time)
        });

        for old_backup in backups.iter().skip(MAX_BACKUP_FILES) {
            let _ = fs::remove_file(old_backup);
        }

        Ok(())
    }
}

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_to_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("popcalc.log");
        let mut writer = FileWriter::new(path.clone());

        writer.write_all(b"first\n").expect("write");
        writer.clone().write_all(b"second\n").expect("write");

        assert_eq!(fs::read_to_string(&path).expect("read"), "first\nsecond\n");
    }

    #[test]
    fn test_rotates_oversized_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("popcalc.log");
        let big = fs::File::create(&path).expect("create");
        big.set_len(MAX_FILE_SIZE_BYTES + 1).expect("grow");

        let writer = FileWriter::new(path.clone());
        writer.write_bytes(b"fresh\n").expect("write");

        assert_eq!(fs::read_to_string(&path).expect("read"), "fresh\n");
        let backups = fs::read_dir(dir.path())
            .expect("list")
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().contains(".log."))
            .count();
        assert_eq!(backups, 1);
    }
}
