//! Bounded, read-only file input.
//!
//! [`MappedFile`] memory-maps an input file after checking it against a size
//! cap, so large binaries are not copied onto the heap and oversized inputs
//! are rejected before any decoding starts.

pub mod error;

use crate::io::error::{IoError, Result};
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default cap on input size (512 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 512 * 1024 * 1024;

/// A read-only view of a whole file.
pub struct MappedFile {
    path: PathBuf,
    // None when the file size is zero; memmap cannot map empty files.
    mmap: Option<Mmap>,
}

impl MappedFile {
    /// Open and map `path`, failing when it is larger than `max_file_size`.
    pub fn open<P: AsRef<Path>>(path: P, max_file_size: u64) -> Result<Self> {
        let path = path.as_ref();
        let open_err = |source: std::io::Error| IoError::Open {
            path: path.display().to_string(),
            source,
        };
        let file = File::open(path).map_err(open_err)?;
        let file_size = file.metadata().map_err(open_err)?.len();

        debug!(
            path = %path.display(),
            size = file_size,
            max_file_size,
            "Opening input file"
        );

        if file_size > max_file_size {
            warn!(
                path = %path.display(),
                size = file_size,
                limit = max_file_size,
                "File is too large"
            );
            return Err(IoError::FileTooLarge {
                limit: max_file_size,
                found: file_size,
            });
        }

        let mmap = if file_size == 0 {
            None
        } else {
            // Safety: read-only map of a regular file; callers only borrow it
            // for the duration of one load.
            Some(unsafe { Mmap::map(&file) }.map_err(open_err)?)
        };

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
        })
    }

    /// File contents
    pub fn bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_none()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
