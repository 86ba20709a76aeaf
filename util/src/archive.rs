//! Struct archiving functionality
//!
//! To add archiving functionality to a struct implement the `Archived` trait.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::path::Path;
use std::fs::{File, OpenOptions};
use csv::WriterBuilder;
pub use csv::Writer;
use serde::Serialize;
use thiserror::Error;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
///
/// A default constructed archiver has no backing file and silently discards
/// records, which lets modules run without a session (in tests for example).
#[derive(Default)]
pub struct Archiver {
    writer: Option<Writer<File>>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Could not create the archive file: {0}")]
    FileError(std::io::Error),

    #[error("Could not write the archive record: {0}")]
    CsvError(csv::Error),
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A trait which enables a struct to be archived as a csv.
///
/// To implement this trait, the struct shall have an `Archiver` member
/// for each archive it writes, set up in the struct's `init` function.
pub trait Archived {
    /// Write the archives for this struct
    fn write(&mut self) -> Result<(), ArchiveError>;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session, path: P
    ) -> Result<Self, ArchiveError> {
        let session_path = session.arch_root.join(path);

        // Create the parent directory if it does not exist
        if let Some(parent) = session_path.parent() {
            std::fs::create_dir_all(parent).map_err(ArchiveError::FileError)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(session_path)
            .map_err(ArchiveError::FileError)?;

        let w = WriterBuilder::new()
            .has_headers(true)
            .from_writer(file);

        Ok(Self {
            writer: Some(w)
        })
    }

    /// Serialise a record into the archive.
    pub fn serialise<T: Serialize>(&mut self, record: T) -> Result<(), ArchiveError> {
        if let Some(ref mut w) = self.writer {
            w.serialize(record).map_err(ArchiveError::CsvError)?;
            w.flush().map_err(ArchiveError::FileError)?;
        }

        Ok(())
    }

    /// True if this archiver is backed by a file.
    pub fn is_active(&self) -> bool {
        self.writer.is_some()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize)]
    struct Record {
        time_s: f64,
        value: f64,
    }

    #[test]
    fn test_inactive_archiver_discards() {
        let mut arch = Archiver::default();
        assert!(!arch.is_active());
        assert!(arch.serialise(Record { time_s: 0.0, value: 1.0 }).is_ok());
    }
}
