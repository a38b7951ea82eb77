//! Column-union computation for the exported tables

use crate::record::AdRecord;

/// Computes the column set of a record batch
///
/// The columns are the union of every field name observed across the
/// batch, in first-seen order: walking records in crawl order, each new
/// field name is appended once. Fixed fields therefore lead (every record
/// carries them, the first record introduces them) and dynamically
/// discovered detail fields follow in discovery order.
pub fn column_union(records: &[AdRecord]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();

    for record in records {
        for name in record.field_names() {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
            }
        }
    }

    columns
}
