// Export function - CSV serialization of a displayed table
use crate::domain::error::ReportResult;
use crate::domain::report::LabeledTable;

pub const TOP5_FILE_NAME: &str = "top5_restaurants.csv";
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Header row plus one record per displayed row, no index column,
/// quoting only fields that need it.
pub fn table_to_csv(table: &LabeledTable) -> ReportResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    // Every field came from a String, so the buffer is valid UTF-8.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
