//! CSV export and import of [`CatalogRecord`]s.
//!
//! The header is the record's field names; absent optional values are empty
//! cells.

use std::fs::{File, OpenOptions};
use std::path::Path;

use despensa_core::CatalogRecord;

/// Writes `records` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or a record cannot be
/// serialized.
pub(crate) fn write_records(path: &Path, records: &[CatalogRecord]) -> anyhow::Result<()> {
    let file = File::create(path)
        .map_err(|e| anyhow::anyhow!("failed to create {}: {e}", path.display()))?;
    write_to(csv::Writer::from_writer(file), path, records)
}

/// Appends `records` to `path`, writing the header only when the file is
/// new or empty.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a record cannot be
/// serialized.
pub(crate) fn append_records(path: &Path, records: &[CatalogRecord]) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow::anyhow!("failed to open {}: {e}", path.display()))?;
    let is_empty = file
        .metadata()
        .map_err(|e| anyhow::anyhow!("failed to stat {}: {e}", path.display()))?
        .len()
        == 0;

    let writer = csv::WriterBuilder::new()
        .has_headers(is_empty)
        .from_writer(file);
    write_to(writer, path, records)
}

fn write_to(
    mut writer: csv::Writer<File>,
    path: &Path,
    records: &[CatalogRecord],
) -> anyhow::Result<()> {
    for record in records {
        writer.serialize(record).map_err(|e| {
            anyhow::anyhow!(
                "failed to write record {} to {}: {e}",
                record.external_id,
                path.display()
            )
        })?;
    }
    writer
        .flush()
        .map_err(|e| anyhow::anyhow!("failed to flush {}: {e}", path.display()))?;
    Ok(())
}

/// Reads every record from a CSV file written by [`write_records`] or
/// [`append_records`].
///
/// # Errors
///
/// Returns an error naming the line of the first row that does not parse.
pub(crate) fn read_records(path: &Path) -> anyhow::Result<Vec<CatalogRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| anyhow::anyhow!("failed to open {}: {e}", path.display()))?;

    reader
        .deserialize::<CatalogRecord>()
        .map(|row| row.map_err(|e| anyhow::anyhow!("invalid row in {}: {e}", path.display())))
        .collect()
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
