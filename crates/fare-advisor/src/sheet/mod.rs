//! Tabular fare sheets: parsing, operator/service lookup, and scheduled reloads.

mod domain;
mod parser;
pub mod refresh;
pub mod router;
pub mod source;

pub use domain::{FareSheet, FareSheetRow, OperatorServices, SheetLookupError};
pub use refresh::{
    spawn_refresh_task, RefreshOutcome, RefreshSchedule, SharedSheet, SheetRefresher,
    SheetSnapshot, SheetState,
};
pub use router::sheet_router;
pub use source::{CsvFileSource, InlineCsvSource, SheetSource};

use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum FareSheetError {
    Io(std::io::Error),
    Csv(csv::Error),
    Empty,
}

impl std::fmt::Display for FareSheetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FareSheetError::Io(err) => write!(f, "failed to read fare sheet: {}", err),
            FareSheetError::Csv(err) => write!(f, "invalid fare sheet data: {}", err),
            FareSheetError::Empty => write!(f, "no data found in sheet"),
        }
    }
}

impl std::error::Error for FareSheetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FareSheetError::Io(err) => Some(err),
            FareSheetError::Csv(err) => Some(err),
            FareSheetError::Empty => None,
        }
    }
}

impl From<std::io::Error> for FareSheetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for FareSheetError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct FareSheetLoader;

impl FareSheetLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<FareSheet, FareSheetError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<FareSheet, FareSheetError> {
        let rows = parser::parse_rows(reader)?;
        if rows.is_empty() {
            return Err(FareSheetError::Empty);
        }

        Ok(FareSheet::new(rows))
    }
}
