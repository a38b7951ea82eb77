//! CSV table writer

use crate::export::ExportResult;
use crate::record::AdRecord;
use std::path::Path;

/// Writes one CSV row per record, with the given column set as header
///
/// A record missing a column produces an empty cell; `Null` values render
/// empty as well.
pub fn write_csv(path: &Path, columns: &[String], records: &[AdRecord]) -> ExportResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(columns)?;

    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|column| {
                record
                    .get(column)
                    .map(|value| value.to_cell())
                    .unwrap_or_default()
            })
            .collect();
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;
    use url::Url;

    #[test]
    fn test_quoting_of_embedded_commas() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.csv");

        let mut rec = AdRecord::new(&Url::parse("https://example.com/a").unwrap());
        rec.set(
            "local_cidade_estado_cep",
            FieldValue::Text("Curitiba - PR, 80000-000".to_string()),
        );

        let columns = vec![
            "url_anuncio".to_string(),
            "local_cidade_estado_cep".to_string(),
        ];
        write_csv(&path, &columns, &[rec]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"Curitiba - PR, 80000-000\""));
    }
}
