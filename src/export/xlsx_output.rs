//! XLSX table writer

use crate::export::ExportResult;
use crate::record::{AdRecord, FieldValue};
use rust_xlsxwriter::Workbook;
use std::path::Path;

/// Writes one worksheet with the given column set as header row
///
/// Numeric values are written as numbers so the spreadsheet can sort and
/// aggregate them; `Null` and missing cells stay blank.
pub fn write_xlsx(path: &Path, columns: &[String], records: &[AdRecord]) -> ExportResult<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in columns.iter().enumerate() {
        worksheet.write_string(0, col as u16, name)?;
    }

    for (row, record) in records.iter().enumerate() {
        let row = (row + 1) as u32;
        for (col, name) in columns.iter().enumerate() {
            let col = col as u16;
            match record.get(name) {
                Some(FieldValue::Text(text)) => {
                    worksheet.write_string(row, col, text)?;
                }
                Some(FieldValue::Float(value)) => {
                    worksheet.write_number(row, col, *value)?;
                }
                Some(FieldValue::Int(value)) => {
                    worksheet.write_number(row, col, *value as f64)?;
                }
                Some(FieldValue::Null) | None => {}
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}
