//! Destinations for resolved labels.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::PinLabelError;
use crate::labels::mapper::LabelRecord;

/// Receives labels in row order as they are resolved.
pub trait LabelSink {
    fn emit(&mut self, label: &LabelRecord) -> Result<(), PinLabelError>;

    /// Called once after every row resolved successfully.
    fn finish(&mut self) -> Result<(), PinLabelError> {
        Ok(())
    }
}

impl LabelSink for Vec<LabelRecord> {
    fn emit(&mut self, label: &LabelRecord) -> Result<(), PinLabelError> {
        self.push(label.clone());
        Ok(())
    }
}

/// Appends each label to the output file as soon as it is resolved.
///
/// The file is opened and closed for every label, so labels written before a
/// failing row stay in the file.
pub struct AppendFileSink {
    path: PathBuf,
}

impl AppendFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LabelSink for AppendFileSink {
    fn emit(&mut self, label: &LabelRecord) -> Result<(), PinLabelError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        write!(file, "{}", label)?;
        Ok(())
    }
}

/// Buffers labels and writes them all at once in [`LabelSink::finish`].
///
/// The existing output content plus the new labels go to a temporary file in
/// the same directory, which then replaces the output. A run that fails
/// before `finish` leaves the output untouched.
pub struct AtomicFileSink {
    path: PathBuf,
    pending: Vec<LabelRecord>,
}

impl AtomicFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pending: Vec::new(),
        }
    }
}

impl LabelSink for AtomicFileSink {
    fn emit(&mut self, label: &LabelRecord) -> Result<(), PinLabelError> {
        self.pending.push(label.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), PinLabelError> {
        let existing = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        if let Ok(metadata) = fs::metadata(&self.path) {
            tmp.as_file().set_permissions(metadata.permissions())?;
        }

        tmp.write_all(&existing)?;
        for label in &self.pending {
            write!(tmp, "{}", label)?;
        }
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!(
            "Wrote {} labels to {}",
            self.pending.len(),
            self.path.display()
        );
        self.pending.clear();
        Ok(())
    }
}
