// In: src/pipeline/output.rs

//! Output file handles with optional atomic replacement.
//!
//! In staged mode the data goes to a temporary file in the same directory as
//! the destination, and `finish()` renames it into place. Dropping an
//! unfinished staged file deletes the temporary file, so a failed run never
//! leaves a half-written output behind. Direct mode truncates the destination
//! up front and writes straight into it.
//!
//! Both modes leave the destination with the same permissions: an existing
//! file keeps its mode, a new one gets the process default (`0o666 & !umask`).

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{DimsplitError, Result};

pub enum OutputFile {
    Staged {
        writer: BufWriter<NamedTempFile>,
        final_path: PathBuf,
    },
    Direct {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl OutputFile {
    /// Opens an output for `path`, staged when `atomic` is set.
    pub fn create(path: impl AsRef<Path>, atomic: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !atomic {
            let file = File::create(&path).map_err(|e| DimsplitError::file_io(&path, e))?;
            return Ok(OutputFile::Direct {
                writer: BufWriter::new(file),
                path,
            });
        }

        let parent_dir = match path.parent() {
            Some(dir) if dir.as_os_str().is_empty() => Path::new("."),
            Some(dir) => dir,
            None => {
                return Err(DimsplitError::InvalidConfig(format!(
                    "Cannot determine parent directory for: {}",
                    path.display()
                )))
            }
        };
        let temp_file =
            staged_temp_file(parent_dir).map_err(|e| DimsplitError::file_io(parent_dir, e))?;

        Ok(OutputFile::Staged {
            writer: BufWriter::new(temp_file),
            final_path: path,
        })
    }

    /// The destination path, regardless of mode.
    pub fn path(&self) -> &Path {
        match self {
            OutputFile::Staged { final_path, .. } => final_path,
            OutputFile::Direct { path, .. } => path,
        }
    }

    /// Flushes all buffers and, in staged mode, atomically moves the data to
    /// the destination. Returns the destination path.
    pub fn finish(self) -> Result<PathBuf> {
        match self {
            OutputFile::Staged { writer, final_path } => {
                let temp_file = writer
                    .into_inner()
                    .map_err(|e| DimsplitError::file_io(&final_path, e.into_error()))?;
                if let Ok(existing) = fs::metadata(&final_path) {
                    temp_file
                        .as_file()
                        .set_permissions(existing.permissions())
                        .map_err(|e| DimsplitError::file_io(&final_path, e))?;
                }
                temp_file
                    .persist(&final_path)
                    .map_err(|e| DimsplitError::file_io(&final_path, e.error))?;
                Ok(final_path)
            }
            OutputFile::Direct { writer, path } => {
                writer
                    .into_inner()
                    .map_err(|e| DimsplitError::file_io(&path, e.into_error()))?;
                Ok(path)
            }
        }
    }
}

/// Creates the staging file. `NamedTempFile` defaults to `0o600`; asking for
/// `0o666` lets the umask decide, same as `File::create`.
fn staged_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputFile::Staged { writer, .. } => writer.write(buf),
            OutputFile::Direct { writer, .. } => writer.write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            OutputFile::Staged { writer, .. } => writer.write_all(buf),
            OutputFile::Direct { writer, .. } => writer.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputFile::Staged { writer, .. } => writer.flush(),
            OutputFile::Direct { writer, .. } => writer.flush(),
        }
    }
}
