//! CSV export of report tables.

use std::path::{Path, PathBuf};

use crime_dashboard_report_models::ReportTable;

use crate::PresenterError;

/// `Content-Type` of an export.
pub const CSV_MIME: &str = "text/csv";

/// Serializes a report table as UTF-8 CSV.
///
/// The header row is the report's category and count headers; each data row
/// is one table entry in table order. Values are written unmodified, quoted
/// only where CSV requires it, so the same table always yields the same
/// bytes.
///
/// # Errors
///
/// Returns [`PresenterError::Csv`] if serialization fails.
pub fn export(table: &ReportTable) -> Result<Vec<u8>, PresenterError> {
    let definition = table.definition();
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record([definition.category_header, definition.count_header])?;
    for row in &table.rows {
        writer.write_record([row.category.as_str(), row.count.to_string().as_str()])?;
    }

    writer
        .into_inner()
        .map_err(|e| PresenterError::Io(e.into_error()))
}

/// Writes a table's export into `dir` under the report's export file name.
///
/// Returns the path written.
///
/// # Errors
///
/// Returns [`PresenterError`] if serialization or the write fails.
pub fn write_export(table: &ReportTable, dir: &Path) -> Result<PathBuf, PresenterError> {
    let path = dir.join(table.definition().export_file);
    std::fs::write(&path, export(table)?)?;
    log::info!("Wrote {} rows to {}", table.rows.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use crime_dashboard_report_models::{CategoryCount, ReportId};

    use super::*;

    fn cities() -> ReportTable {
        ReportTable {
            report: ReportId::CityCrimes,
            rows: vec![CategoryCount::new("Delhi", 5), CategoryCount::new("Pune", 3)],
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let bytes = export(&cities()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "City,Total_Crimes\nDelhi,5\nPune,3\n"
        );
    }

    #[test]
    fn export_is_deterministic() {
        let table = cities();
        assert_eq!(export(&table).unwrap(), export(&table).unwrap());
    }

    #[test]
    fn quotes_values_with_commas() {
        let table = ReportTable {
            report: ReportId::CrimeTypes,
            rows: vec![CategoryCount::new("ASSAULT, AGGRAVATED", 2)],
        };
        let text = String::from_utf8(export(&table).unwrap()).unwrap();
        assert_eq!(text, "Crime Description,Total\n\"ASSAULT, AGGRAVATED\",2\n");
    }

    #[test]
    fn empty_table_has_header_only() {
        let table = ReportTable {
            report: ReportId::WeaponUsage,
            rows: Vec::new(),
        };
        assert_eq!(export(&table).unwrap(), b"Weapon,Total\n");
    }

    #[test]
    fn writes_export_file() {
        let dir = std::env::temp_dir().join("crime_dashboard_export_test");
        std::fs::create_dir_all(&dir).unwrap();

        let path = write_export(&cities(), &dir).unwrap();
        assert_eq!(path.file_name().unwrap(), "city_crimes.csv");
        assert_eq!(std::fs::read(&path).unwrap(), export(&cities()).unwrap());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
