//! Tabular data shown behind the column control.

use std::collections::HashSet;
use std::path::Path;

use super::columns::ColumnDescriptor;
use crate::error::DatasetError;

/// A loaded table: ordered columns plus string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub columns: Vec<ColumnDescriptor>,
    /// Every row has exactly `columns.len()` cells.
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Load a CSV file with a header row.  Short rows are padded with empty
    /// cells and long rows are truncated to the header width.
    pub fn load_csv(path: &Path) -> Result<Self, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| DatasetError::CsvRead {
                path: path.to_path_buf(),
                source: e,
            })?;

        let headers = reader
            .headers()
            .map_err(|e| DatasetError::CsvRead {
                path: path.to_path_buf(),
                source: e,
            })?
            .clone();
        if headers.is_empty() || headers.iter().all(str::is_empty) {
            return Err(DatasetError::EmptyHeader {
                path: path.to_path_buf(),
            });
        }

        let mut seen = HashSet::new();
        for name in headers.iter() {
            if !seen.insert(name) {
                return Err(DatasetError::DuplicateColumn {
                    path: path.to_path_buf(),
                    name: name.to_string(),
                });
            }
        }
        let columns: Vec<ColumnDescriptor> = headers.iter().map(ColumnDescriptor::from_header).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| DatasetError::CsvRead {
                path: path.to_path_buf(),
                source: e,
            })?;
            let mut cells: Vec<String> = record.iter().take(columns.len()).map(str::to_string).collect();
            cells.resize(columns.len(), String::new());
            rows.push(cells);
        }

        tracing::info!(
            path = %path.display(),
            columns = columns.len(),
            rows = rows.len(),
            "dataset loaded"
        );
        Ok(Self { columns, rows })
    }

    /// Built-in sample used when no file is given.
    pub fn demo() -> Self {
        const HEADERS: &[&str] = &["name", "role", "city", "followers", "last_seen", "status"];
        const ROWS: &[[&str; 6]] = &[
            ["Ada Quill", "Maintainer", "Lisbon", "1204", "2026-10-12", "active"],
            ["Bo Tanaka", "Contributor", "Osaka", "388", "2026-10-09", "active"],
            ["Cleo Marsh", "Reviewer", "Leeds", "752", "2026-09-30", "away"],
            ["Dev Anand", "Contributor", "Pune", "95", "2026-10-15", "active"],
            ["Eli Novak", "Maintainer", "Brno", "2210", "2026-08-21", "inactive"],
            ["Fen Harlow", "Designer", "Cork", "41", "2026-10-01", "active"],
            ["Gus Ferreira", "Reviewer", "Porto", "617", "2026-10-17", "away"],
            ["Hana Ilves", "Contributor", "Tartu", "129", "2026-10-03", "active"],
        ];

        Self {
            columns: HEADERS.iter().map(|h| ColumnDescriptor::from_header(h)).collect(),
            rows: ROWS
                .iter()
                .map(|r| r.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn loads_headers_and_rows() {
        let f = write_csv("name,stage_name\nalice, Al \nbob,B\n");
        let ds = Dataset::load_csv(f.path()).unwrap();
        assert_eq!(
            ds.columns,
            vec![
                ColumnDescriptor::new("name", "Name"),
                ColumnDescriptor::new("stage_name", "Stage Name"),
            ]
        );
        assert_eq!(ds.rows.len(), 2);
        assert_eq!(ds.rows[0], vec!["alice", "Al"]);
        assert_eq!(ds.rows[1], vec!["bob", "B"]);
    }

    #[test]
    fn ragged_rows_are_normalised() {
        let f = write_csv("a,b,c\n1\n1,2,3,4\n");
        let ds = Dataset::load_csv(f.path()).unwrap();
        assert_eq!(ds.rows[0], vec!["1", "", ""]);
        assert_eq!(ds.rows[1], vec!["1", "2", "3"]);
    }

    #[test]
    fn duplicate_headers_are_rejected() {
        let f = write_csv("a,b,a\n1,2,3\n");
        let err = Dataset::load_csv(f.path()).unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateColumn { ref name, .. } if name == "a"));
    }

    #[test]
    fn empty_file_is_rejected() {
        let f = write_csv("");
        assert!(matches!(
            Dataset::load_csv(f.path()),
            Err(DatasetError::EmptyHeader { .. })
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Dataset::load_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }

    #[test]
    fn demo_rows_match_header_width() {
        let ds = Dataset::demo();
        assert!(!ds.rows.is_empty());
        assert!(ds.rows.iter().all(|r| r.len() == ds.columns.len()));
        assert_eq!(ds.columns[4].label, "Last Seen");
    }
}
