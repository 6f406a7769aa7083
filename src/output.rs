//! Exporting list pages and summaries.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use csv::WriterBuilder;
use std::fs::{self, OpenOptions};

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends `rows` to a CSV file, writing the header only when the file is
/// missing or still empty.
///
/// Nested values (lists, maps) are stored as JSON text in their cell.
pub fn append_rows<T: Serialize>(path: &str, rows: &[T]) -> Result<usize> {
    let has_content = fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);
    debug!(path, has_content, rows = rows.len(), "Appending CSV rows");

    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut writer = WriterBuilder::new().from_writer(file);

    let mut written = 0;
    for row in rows {
        let record = flatten(row)?;
        if written == 0 && !has_content {
            writer.write_record(record.iter().map(|(k, _)| k.as_str()))?;
        }
        writer.write_record(record.iter().map(|(_, v)| v.as_str()))?;
        written += 1;
    }
    writer.flush()?;

    Ok(written)
}

fn flatten<T: Serialize>(row: &T) -> Result<Vec<(String, String)>> {
    let value = serde_json::to_value(row)?;
    let serde_json::Value::Object(map) = value else {
        return Ok(vec![("value".to_string(), value.to_string())]);
    };
    Ok(map
        .into_iter()
        .map(|(k, v)| {
            let cell = match v {
                serde_json::Value::Null => String::new(),
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (k, cell)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::Path;

    #[derive(Debug, Serialize)]
    struct Row {
        id: i64,
        plate: Option<String>,
        days: Vec<String>,
    }

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: 1,
                plate: Some("AB-12".to_string()),
                days: vec!["MONDAY".to_string()],
            },
            Row {
                id: 2,
                plate: None,
                days: vec![],
            },
        ]
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&rows());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&rows()).unwrap();
    }

    #[test]
    fn test_append_rows_writes_header_once() {
        let path = temp_path("fleet_dashboard_test_header.csv");
        let _ = fs::remove_file(&path);

        append_rows(&path, &rows()).unwrap();
        append_rows(&path, &rows()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines.iter().filter(|l| l.starts_with("id,")).count(), 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_rows_formats_cells() {
        let path = temp_path("fleet_dashboard_test_cells.csv");
        let _ = fs::remove_file(&path);

        append_rows(&path, &rows()).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "id,plate,days");
        assert_eq!(lines[1], "1,AB-12,\"[\"\"MONDAY\"\"]\"");
        assert_eq!(lines[2], "2,,[]");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_nothing_creates_empty_file() {
        let path = temp_path("fleet_dashboard_test_empty.csv");
        let _ = fs::remove_file(&path);

        assert_eq!(append_rows::<Row>(&path, &[]).unwrap(), 0);
        assert!(Path::new(&path).exists());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_header_written_after_empty_export() {
        let path = temp_path("fleet_dashboard_test_empty_then_rows.csv");
        let _ = fs::remove_file(&path);

        append_rows::<Row>(&path, &[]).unwrap();
        append_rows(&path, &rows()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "id,plate,days");

        fs::remove_file(&path).unwrap();
    }
}
