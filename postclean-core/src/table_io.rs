//! CSV reading and writing for [`Table`].
//!
//! The first record is the header. Every later record must have one field
//! per header; the reader is strict so that a malformed file fails loudly
//! instead of silently shifting columns.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use postclean_types::Table;
use tracing::debug;

use crate::error::Result;

/// Reads a table from CSV.
pub fn read_csv<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut table = Table::with_headers(rdr.headers()?.iter())?;
    for record in rdr.records() {
        let record = record?;
        table.push_row(record.iter().map(str::to_string).collect())?;
    }
    Ok(table)
}

/// Reads a table from a CSV file.
pub fn read_csv_path(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let table = read_csv(io::BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), rows = table.num_rows(), columns = table.num_columns(), "read table");
    Ok(table)
}

/// Writes a table as CSV, header first.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(table.column_names())?;
    for row in table.rows() {
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes a table to a CSV file, replacing it.
pub fn write_csv_path(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_csv(table, io::BufWriter::new(File::create(path)?))?;
    debug!(path = %path.display(), rows = table.num_rows(), "wrote table");
    Ok(())
}
