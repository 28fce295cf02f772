// The sheet that receives one row per submission.

use std::fs::{File, OpenOptions};
use std::path::Path;

use crate::survey::*;

/// A tabular store that only grows by appending rows.
pub trait RowStore {
    /// The first row of the store, or an empty list if the store is empty.
    fn read_header(&mut self) -> SResult<Vec<String>>;

    fn write_header(&mut self, names: &[String]) -> SResult<()>;

    /// Appends one record. The record is either fully written or the call fails.
    fn append_row(&mut self, row: &[CellValue]) -> SResult<()>;
}

/// A sheet backed by a CSV file.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CsvSheet {
    path: String,
}

impl CsvSheet {
    pub fn new(path: &str) -> CsvSheet {
        CsvSheet {
            path: path.to_string(),
        }
    }

    // Creates the file and its directory on first use.
    fn write_record(&self, record: &[String]) -> Result<(), csv::Error> {
        if let Some(parent) = Path::new(&self.path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file: File = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        wtr.write_record(record)?;
        wtr.flush()?;
        Ok(())
    }
}

impl RowStore for CsvSheet {
    fn read_header(&mut self) -> SResult<Vec<String>> {
        if !Path::new(&self.path).exists() {
            return Ok(Vec::new());
        }
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .context(CsvOpenSnafu {
                path: self.path.clone(),
            })?;
        match rdr.records().next() {
            Some(rec) => {
                let rec = rec.context(CsvLineParseSnafu { lineno: 1_usize })?;
                Ok(rec.iter().map(|s| s.to_string()).collect())
            }
            None => Ok(Vec::new()),
        }
    }

    fn write_header(&mut self, names: &[String]) -> SResult<()> {
        if !self.read_header()?.is_empty() {
            whatever!("{}: the sheet already has a header", self.path)
        }
        info!("Writing header to {}", self.path);
        self.write_record(names).context(SheetCsvSnafu {
            path: self.path.clone(),
        })
    }

    fn append_row(&mut self, row: &[CellValue]) -> SResult<()> {
        let record: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        debug!("append_row: {}: {:?}", self.path, record);
        self.write_record(&record).context(AppendRowSnafu {
            path: self.path.clone(),
            row: record.join(","),
        })
    }
}
