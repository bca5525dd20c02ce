//! Data-quality checks on raw rows
//!
//! Inspects a [`RawTable`] before normalization and reports empty fields,
//! duplicated rows and constant columns. Nothing here alters the table;
//! [`write_deduplicated`] exports a copy with later replicas dropped.

use std::{
    collections::{BTreeMap, HashMap, btree_map::Entry},
    io,
};

use serde::Serialize;

use crate::raw::RawTable;

/// A field whose trimmed value is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyField {
    pub line: u64,
    pub column: String,
}

/// A row content that occurs more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// Line of the first occurrence.
    pub first_line: u64,
    /// Lines of the later occurrences.
    pub replica_lines: Vec<u64>,
}

impl DuplicateGroup {
    #[must_use]
    pub fn replica_count(&self) -> usize {
        self.replica_lines.len()
    }
}

/// A column holding a single distinct value across all rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstantColumn {
    pub column: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub row_count: usize,
    pub column_count: usize,
    pub empty_fields: Vec<EmptyField>,
    /// Duplicate groups, ordered by first occurrence.
    pub duplicates: Vec<DuplicateGroup>,
    pub constant_columns: Vec<ConstantColumn>,
}

impl QualityReport {
    #[must_use]
    pub fn from_table(table: &RawTable) -> Self {
        let columns = table.column_names().map(str::to_owned).collect::<Vec<_>>();

        let empty_fields = table
            .records()
            .flat_map(|(line, row)| {
                columns.iter().enumerate().filter_map(move |(idx, column)| {
                    let value = row.get(idx).unwrap_or("");
                    value.trim().is_empty().then(|| EmptyField {
                        line,
                        column: column.clone(),
                    })
                })
            })
            .collect();

        Self {
            row_count: table.rows.len(),
            column_count: columns.len(),
            empty_fields,
            duplicates: find_duplicates(table),
            constant_columns: find_constant_columns(table, &columns),
        }
    }

    /// Number of distinct row contents that occur more than once.
    #[must_use]
    pub fn duplicated_row_count(&self) -> usize {
        self.duplicates.len()
    }

    /// Total number of redundant rows: the sum over all duplicated contents
    /// of (occurrences - 1).
    #[must_use]
    pub fn replica_count(&self) -> usize {
        self.duplicates.iter().map(DuplicateGroup::replica_count).sum()
    }
}

fn row_key(row: &csv::StringRecord) -> Vec<&str> {
    row.iter().map(str::trim).collect()
}

fn find_duplicates(table: &RawTable) -> Vec<DuplicateGroup> {
    let mut groups = BTreeMap::<u64, DuplicateGroup>::new();
    let mut first_seen = HashMap::<Vec<&str>, u64>::new();
    for (line, row) in table.records() {
        match first_seen.get(&row_key(row)) {
            Some(&first_line) => match groups.entry(first_line) {
                Entry::Occupied(mut entry) => entry.get_mut().replica_lines.push(line),
                Entry::Vacant(entry) => {
                    entry.insert(DuplicateGroup {
                        first_line,
                        replica_lines: vec![line],
                    });
                }
            },
            None => {
                first_seen.insert(row_key(row), line);
            }
        }
    }
    groups.into_values().collect()
}

fn find_constant_columns(table: &RawTable, columns: &[String]) -> Vec<ConstantColumn> {
    if table.rows.is_empty() {
        return vec![];
    }
    columns
        .iter()
        .enumerate()
        .filter_map(|(idx, column)| {
            let mut values = table.rows.iter().map(|row| row.get(idx).unwrap_or("").trim());
            let first = values.next()?;
            values.all(|v| v == first).then(|| ConstantColumn {
                column: column.clone(),
                value: first.to_owned(),
            })
        })
        .collect()
}

/// Writes the table with later duplicate rows removed.
///
/// The header and the first occurrence of every row are kept, in their
/// original order. Returns the number of rows written.
pub fn write_deduplicated<W>(table: &RawTable, writer: W) -> Result<usize, csv::Error>
where
    W: io::Write,
{
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&table.headers)?;
    let mut seen = std::collections::HashSet::new();
    let mut written = 0;
    for row in &table.rows {
        if seen.insert(row_key(row)) {
            writer.write_record(row)?;
            written += 1;
        }
    }
    writer.flush()?;
    Ok(written)
}
