//! CSV corpus loading

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::error::{BookgraphError, BookgraphResult};
use crate::types::Record;

/// Reads book records from a CSV with a header row
///
/// Column order is free and extra columns are ignored. Every row yields
/// exactly one [`Record`], in file order.
#[derive(Debug, Clone)]
pub struct RecordIngestor {
    id_column: String,
    title_column: String,
    body_column: String,
}

impl Default for RecordIngestor {
    fn default() -> Self {
        Self {
            id_column: "book_id".to_string(),
            title_column: "book_name".to_string(),
            body_column: "book_summary".to_string(),
        }
    }
}

struct Columns {
    id: usize,
    title: usize,
    body: usize,
}

impl RecordIngestor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read all records from a CSV file
    pub fn ingest_path(&self, path: &Path) -> BookgraphResult<Vec<Record>> {
        info!("Reading CSV file: {}", path.display());
        let file = File::open(path)?;
        let records = self.ingest_reader(file)?;
        info!("{} records loaded from {}", records.len(), path.display());
        Ok(records)
    }

    /// Read all records from any CSV source
    pub fn ingest_reader<R: Read>(&self, reader: R) -> BookgraphResult<Vec<Record>> {
        let mut csv = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns = self.locate_columns(csv.headers()?)?;
        let mut seen = HashSet::new();
        let mut records = Vec::new();

        for (index, row) in csv.records().enumerate() {
            let row_number = index + 1;
            let row = row?;

            let id = field(&row, columns.id, &self.id_column, row_number)?.trim();
            if id.is_empty() {
                return Err(BookgraphError::MalformedInput {
                    row: row_number,
                    message: format!("empty `{}`", self.id_column),
                });
            }
            let title = field(&row, columns.title, &self.title_column, row_number)?;
            let body = field(&row, columns.body, &self.body_column, row_number)?;

            if !seen.insert(id.to_string()) {
                return Err(BookgraphError::DuplicateId(id.to_string()));
            }

            debug!("Row {}: record {} ({})", row_number, id, title);
            records.push(Record::new(id, title, body));
        }

        Ok(records)
    }

    fn locate_columns(&self, headers: &StringRecord) -> BookgraphResult<Columns> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
                .ok_or_else(|| BookgraphError::MalformedInput {
                    row: 0,
                    message: format!("missing required column `{}`", name),
                })
        };

        Ok(Columns {
            id: find(&self.id_column)?,
            title: find(&self.title_column)?,
            body: find(&self.body_column)?,
        })
    }
}

fn field<'r>(
    row: &'r StringRecord,
    index: usize,
    name: &str,
    row_number: usize,
) -> BookgraphResult<&'r str> {
    row.get(index).ok_or_else(|| BookgraphError::MalformedInput {
        row: row_number,
        message: format!("row has {} field(s), missing `{}`", row.len(), name),
    })
}
