pub mod json;
pub mod table;

use achdir_core::model::ParticipantRow;

/// Display value of `column` for a row, falling back to the mapped fields
/// for rows that carry no raw cells (document extraction).
pub fn cell<'a>(row: &'a ParticipantRow, column: &str) -> &'a str {
    if let Some(v) = row.fields.get(column) {
        return v;
    }
    match column {
        "Institution" => &row.institution,
        "Category" => row.category.as_deref().unwrap_or(""),
        "Institution Type" => row.institution_type.as_deref().unwrap_or(""),
        _ => "",
    }
}
