//! Raw tabular input
//!
//! [`RawTable`] holds the header and rows of a CSV file as strings, exactly
//! as read. It is the common input of normalization and of the data-quality
//! report.

use std::{io, path::Path};

use csv::StringRecord;

use crate::{
    listing::Listing,
    normalize::{self, NormalizeError},
};

#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: StringRecord,
    pub rows: Vec<StringRecord>,
}

impl RawTable {
    /// Reads a header row followed by data rows.
    ///
    /// Rows with a different number of fields than the header are accepted
    /// here; missing fields surface later as coercion failures.
    pub fn from_reader<R>(reader: R) -> Result<Self, csv::Error>
    where
        R: io::Read,
    {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = reader.headers()?.clone();
        let rows = reader.records().collect::<Result<Vec<_>, _>>()?;
        log::debug!("read {} raw rows with {} columns", rows.len(), headers.len());
        Ok(Self { headers, rows })
    }

    pub fn from_path<P>(path: P) -> Result<Self, csv::Error>
    where
        P: AsRef<Path>,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(io::BufReader::new(file))
    }

    /// Trimmed header names.
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.headers.iter().map(str::trim)
    }

    /// File line of the `index`-th data row (the header is line 1).
    #[must_use]
    pub fn line_of(&self, index: usize) -> u64 {
        self.rows[index]
            .position()
            .map_or(index as u64 + 2, csv::Position::line)
    }

    /// Iterates `(line, row)` pairs.
    pub fn records(&self) -> impl Iterator<Item = (u64, &StringRecord)> + '_ {
        (0..self.rows.len()).map(|idx| (self.line_of(idx), &self.rows[idx]))
    }

    /// Normalizes every row into a [`Listing`].
    pub fn normalize(&self) -> Result<Vec<Listing>, NormalizeError> {
        normalize::normalize_records(&self.headers, self.records())
    }
}
