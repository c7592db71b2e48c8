use crate::api::Record;
use serde_json::Value;

/// Display form of a record field, empty when absent
pub(crate) fn field_text(record: &Record, field: &str) -> String {
    match record.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Right-pads each named column to the widest value in that column.
///
/// Width counts characters, not bytes. Padded columns become strings; a
/// column missing from every row is left alone.
pub fn pad_columns(rows: &[Record], columns: &[&str]) -> Vec<Record> {
    let mut padded = rows.to_vec();

    for column in columns {
        if !rows.iter().any(|row| row.contains_key(*column)) {
            continue;
        }

        let width = rows
            .iter()
            .map(|row| field_text(row, column).chars().count())
            .max()
            .unwrap_or(0);

        for row in &mut padded {
            let text = field_text(row, column);
            let fill = width - text.chars().count();
            row.insert(
                column.to_string(),
                Value::String(format!("{}{}", text, " ".repeat(fill))),
            );
        }
    }

    padded
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_pads_to_widest_value() {
        let rows = vec![record(json!({"name": "a"})), record(json!({"name": "bbb"}))];

        let padded = pad_columns(&rows, &["name"]);

        assert_eq!(padded[0]["name"], json!("a  "));
        assert_eq!(padded[1]["name"], json!("bbb"));
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let rows = vec![
            record(json!({"domain": "é.example"})),
            record(json!({"domain": "ab.example"})),
        ];

        let padded = pad_columns(&rows, &["domain"]);

        assert_eq!(padded[0]["domain"], json!("é.example "));
        assert_eq!(padded[1]["domain"], json!("ab.example"));
    }

    #[test]
    fn test_numbers_are_padded_as_text() {
        let rows = vec![
            record(json!({"id": 7, "domain": "x"})),
            record(json!({"id": 1234, "domain": "y"})),
        ];

        let padded = pad_columns(&rows, &["id"]);

        assert_eq!(padded[0]["id"], json!("7   "));
        assert_eq!(padded[1]["domain"], json!("y"));
    }

    #[test]
    fn test_missing_column_is_skipped() {
        let rows = vec![record(json!({"name": "a"}))];
        let padded = pad_columns(&rows, &["monthly_fee"]);
        assert!(!padded[0].contains_key("monthly_fee"));
    }
}
