//! RxNorm Rich Release Format (RRF) input layer.
//!
//! RRF files are pipe-delimited with no header row and no quoting; each line
//! ends with a trailing `|`.

mod labels;
mod rows;

pub use labels::*;
pub use rows::*;

#[cfg(test)]
pub(crate) use rows::fixtures;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use thiserror::Error;

/// RRF input errors. All of them are fatal for a pipeline run.
#[derive(Error, Debug)]
pub enum RrfError {
    #[error("Cannot open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: csv::Error,
    },
}

pub type RrfResult<T> = Result<T, RrfError>;

/// Locations of the two release files a run consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub rxnconso: PathBuf,
    pub rxnsat: PathBuf,
}

impl DataPaths {
    /// Standard file names inside a release directory.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            rxnconso: dir.join("RXNCONSO.RRF"),
            rxnsat: dir.join("RXNSAT.RRF"),
        }
    }
}

/// Streaming reader over the records of one RRF file.
pub struct RrfReader<R: Read> {
    inner: csv::Reader<R>,
    source: String,
}

impl RrfReader<File> {
    /// Open an RRF file on disk.
    pub fn open<P: AsRef<Path>>(path: P) -> RrfResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| RrfError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_reader(file, path.display().to_string()))
    }
}

impl<R: Read> RrfReader<R> {
    /// Wrap any byte source; `source` names it in error messages.
    pub fn from_reader(reader: R, source: impl Into<String>) -> Self {
        let inner = ReaderBuilder::new()
            .delimiter(b'|')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);
        Self {
            inner,
            source: source.into(),
        }
    }

    /// Feed every record to `f`, returning the number of records read.
    pub fn for_each_record<F>(&mut self, mut f: F) -> RrfResult<u64>
    where
        F: FnMut(&StringRecord),
    {
        let mut record = StringRecord::new();
        let mut count = 0;
        loop {
            let more = self
                .inner
                .read_record(&mut record)
                .map_err(|source| RrfError::Read {
                    path: self.source.clone(),
                    source,
                })?;
            if !more {
                break;
            }
            count += 1;
            f(&record);
        }
        Ok(count)
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}
