//! CSV record source.

use std::path::Path;

use clickpush_core::record::EventRecord;

use crate::error::{CliError, CliResult};

/// Read every record of `path` into memory, in file order.
///
/// The reader is headerless and length-flexible: rows that are too short
/// surface later as malformed-row errors carrying their row index, not as
/// reader errors here.
pub fn read_records(path: &Path) -> CliResult<Vec<EventRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| CliError::source(format!("cannot open {}: {e}", path.display())))?;

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result
            .map_err(|e| CliError::source(format!("cannot parse {}: {e}", path.display())))?;
        records.push(record.iter().collect());
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_records_in_order() {
        let file = write_csv("a,b,c\nd,e,f\n");
        let records = read_records(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].field(0), Some("a"));
        assert_eq!(records[1].field(2), Some("f"));
    }

    #[test]
    fn test_quoted_fields() {
        let file = write_csv("\"2016-05-10 17:14:30-1\",\"_a,b\",dc,ed,me\n");
        let records = read_records(file.path()).unwrap();

        assert_eq!(records[0].field(1), Some("_a,b"));
        assert_eq!(records[0].len(), 5);
    }

    #[test]
    fn test_short_rows_are_kept_for_later_validation() {
        let file = write_csv("a,b,c,d,e\nshort,row\n");
        let records = read_records(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].len(), 2);
    }

    #[test]
    fn test_missing_file_is_a_source_error() {
        let err = read_records(Path::new("/nonexistent/events.csv")).unwrap_err();
        assert!(err.to_string().contains("cannot open"));
    }
}
