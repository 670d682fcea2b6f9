use crate::models::{SignupRecord, FIELD_COUNT};

/// Raw response grid (first row = header) to typed records, one per row.
/// Rows shorter than the header — the form omits a trailing answer left
/// empty — are right-padded; field contents are never validated.
pub fn normalize_rows(rows: Vec<Vec<String>>) -> Vec<SignupRecord> {
    let mut rows = rows.into_iter();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let width = header.len();
    rows.map(|row| SignupRecord::from_fields(fit_row(row, width)))
        .collect()
}

// Pad to the header width, then lay into the fixed arity; extra cells drop.
fn fit_row(mut row: Vec<String>, width: usize) -> [String; FIELD_COUNT] {
    if row.len() < width {
        row.resize(width, String::new());
    }
    let mut fields: [String; FIELD_COUNT] = Default::default();
    for (slot, value) in fields.iter_mut().zip(row) {
        *slot = value;
    }
    fields
}
