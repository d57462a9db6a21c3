/*!
# Reference Table I/O & Validation

Readers and writers for reference tables stored as CSV or JSON files, plus
the header checks applied to both.
*/

use crate::{
    errors::{TableError, TableResult},
    schemas::{ReferenceRow, ReferenceTable},
};
use csv::{ReaderBuilder, Writer};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

// ================================================================================================
// Format Dispatch
// ================================================================================================

/// Read a reference table, picking the format from the file extension.
///
/// `heading` is only used for CSV files; JSON tables carry their own.
pub fn read_reference_table<P: AsRef<Path>>(
    path: P,
    heading: Option<String>,
) -> TableResult<ReferenceTable> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("csv") => read_reference_table_csv(path, heading),
        Some("json") => read_reference_table_json(path),
        _ => Err(TableError::InvalidFormat(format!(
            "{}: expected a .csv or .json reference table",
            path.display()
        ))),
    }
}

// ================================================================================================
// CSV Reading with Validation
// ================================================================================================

/// Read and validate a reference table CSV file
pub fn read_reference_table_csv<P: AsRef<Path>>(
    path: P,
    heading: Option<String>,
) -> TableResult<ReferenceTable> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let table = parse_reference_table_csv(file, heading, &path.display().to_string())?;
    debug!(
        "Read {} rows from reference table {}",
        table.row_count(),
        path.display()
    );
    Ok(table)
}

/// Parse CSV data into a reference table.
///
/// Rows shorter than the header line are accepted; their missing cells are
/// simply absent columns. Rows longer than the header line are rejected.
pub fn parse_reference_table_csv<R: Read>(
    reader: R,
    heading: Option<String>,
    source_name: &str,
) -> TableResult<ReferenceTable> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

    // Validate headers
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    validate_headers(&headers, source_name)?;

    let mut rows = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        if record.len() > headers.len() {
            return Err(TableError::InvalidFormat(format!(
                "{}: row {} has {} cells but only {} headers",
                source_name,
                index + 1,
                record.len(),
                headers.len()
            )));
        }

        let row: ReferenceRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.as_str(), cell))
            .collect();
        rows.push(row);
    }

    Ok(ReferenceTable::new(heading, headers, rows))
}

// ================================================================================================
// JSON Reading
// ================================================================================================

/// Read and validate a reference table JSON file
pub fn read_reference_table_json<P: AsRef<Path>>(path: P) -> TableResult<ReferenceTable> {
    let path = path.as_ref();
    let mut contents = String::new();
    File::open(path)?.read_to_string(&mut contents)?;
    parse_reference_table_json(&contents, &path.display().to_string())
}

/// Parse a JSON reference table (`{heading, headers, rows}`).
pub fn parse_reference_table_json(json: &str, source_name: &str) -> TableResult<ReferenceTable> {
    let table: ReferenceTable = serde_json::from_str(json)?;
    validate_headers(&table.headers, source_name)?;

    for (index, row) in table.rows.iter().enumerate() {
        for column in row.columns() {
            if !table.has_header(column) {
                debug!(
                    "{}: row {} has column '{}' not listed in headers",
                    source_name,
                    index + 1,
                    column
                );
            }
        }
    }

    Ok(table)
}

// ================================================================================================
// CSV Writing
// ================================================================================================

/// Write a reference table as CSV (the heading is not part of the file)
pub fn write_reference_table_csv<P: AsRef<Path>>(
    path: P,
    table: &ReferenceTable,
) -> TableResult<()> {
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        let record: Vec<&str> = table
            .headers
            .iter()
            .map(|header| row.get(header).unwrap_or(""))
            .collect();
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

// ================================================================================================
// Header Validation
// ================================================================================================

/// Headers must be present, non-blank, and unique. Names are not normalized.
pub fn validate_headers(headers: &[String], source_name: &str) -> TableResult<()> {
    if headers.is_empty() {
        return Err(TableError::MissingHeader(format!(
            "{}: no header row",
            source_name
        )));
    }

    let mut seen = HashSet::new();
    for (i, header) in headers.iter().enumerate() {
        if header.trim().is_empty() {
            return Err(TableError::SchemaValidation(format!(
                "{}: header {} is blank",
                source_name,
                i + 1
            )));
        }
        if !seen.insert(header.as_str()) {
            return Err(TableError::SchemaValidation(format!(
                "{}: header '{}' appears more than once",
                source_name, header
            )));
        }
    }

    Ok(())
}

// ================================================================================================
// Tests
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    #[test]
    fn test_parse_csv_keeps_raw_header_names() {
        let data = "Mount,Phase,Bronze*\nReins of the Ashplague Fel Bat,1,\"10,000\"\n";
        let table = parse_reference_table_csv(data.as_bytes(), Some("Mounts".into()), "mounts")
            .unwrap();

        assert_eq!(table.heading.as_deref(), Some("Mounts"));
        assert_eq!(table.headers, vec!["Mount", "Phase", "Bronze*"]);
        assert_eq!(table.rows[0].get("Bronze*"), Some("10,000"));
    }

    #[test]
    fn test_parse_csv_short_rows_drop_missing_cells() {
        let data = "Toy,Bronze,Source\nSpinning Top,500\n";
        let table = parse_reference_table_csv(data.as_bytes(), None, "toys").unwrap();

        let row = &table.rows[0];
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("Source"), None);
    }

    #[test]
    fn test_parse_csv_rejects_long_rows() {
        let data = "Toy,Bronze\nSpinning Top,500,extra\n";
        let result = parse_reference_table_csv(data.as_bytes(), None, "toys");

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("only 2 headers"));
    }

    #[test]
    fn test_duplicate_headers_rejected() {
        let data = "Toy,Bronze,Toy\nA,1,B\n";
        let result = parse_reference_table_csv(data.as_bytes(), None, "toys");

        assert!(matches!(result, Err(TableError::SchemaValidation(_))));
    }

    #[test]
    fn test_write_and_read_csv() {
        let rows = vec![
            [("Pet", "Fel Kitten"), ("Bronze", "2,500")]
                .into_iter()
                .collect::<ReferenceRow>(),
            [("Pet", "Ashen Whelp")].into_iter().collect(),
        ];
        let table = ReferenceTable::new(None, vec!["Pet".into(), "Bronze".into()], rows);

        let temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        write_reference_table_csv(temp_file.path(), &table).unwrap();
        let read_back = read_reference_table(temp_file.path(), None).unwrap();

        assert_eq!(read_back.headers, table.headers);
        assert_eq!(read_back.rows[0], table.rows[0]);
        // Missing cells come back as empty strings
        assert_eq!(read_back.rows[1].get("Bronze"), Some(""));
    }

    #[test]
    fn test_read_json_table() {
        let mut temp_file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            temp_file,
            r#"{{"heading": "Pets", "headers": ["Pet", "Bronze"], "rows": [{{"Bronze": "500", "Pet": "Fel Kitten"}}]}}"#
        )
        .unwrap();

        let table = read_reference_table(temp_file.path(), Some("ignored".into())).unwrap();

        assert_eq!(table.heading.as_deref(), Some("Pets"));
        let columns: Vec<&str> = table.rows[0].columns().collect();
        assert_eq!(columns, vec!["Bronze", "Pet"]);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let temp_file = NamedTempFile::new().unwrap();
        let result = read_reference_table(temp_file.path(), None);

        assert!(matches!(result, Err(TableError::InvalidFormat(_))));
    }

    #[test]
    fn test_json_without_headers_rejected() {
        let result = parse_reference_table_json(r#"{"heading": null, "headers": []}"#, "empty");
        assert!(matches!(result, Err(TableError::MissingHeader(_))));
    }
}
