use std::fmt::Debug;
use std::io::Cursor;
use std::path::PathBuf;

use super::domain::FareSheet;
use super::{FareSheetError, FareSheetLoader};

/// Anything that can produce a fresh copy of the fare sheet on demand.
pub trait SheetSource: Debug + Send + Sync {
    fn load(&self) -> Result<FareSheet, FareSheetError>;
    fn describe(&self) -> String;
}

/// CSV export on disk, re-read on every load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SheetSource for CsvFileSource {
    fn load(&self) -> Result<FareSheet, FareSheetError> {
        FareSheetLoader::from_path(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// CSV body supplied directly, e.g. in a request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineCsvSource {
    body: String,
}

impl InlineCsvSource {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

impl SheetSource for InlineCsvSource {
    fn load(&self) -> Result<FareSheet, FareSheetError> {
        FareSheetLoader::from_reader(Cursor::new(self.body.as_bytes()))
    }

    fn describe(&self) -> String {
        format!("inline csv ({} bytes)", self.body.len())
    }
}
