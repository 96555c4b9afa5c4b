//! Table data model for rows fetched from the backend

use serde_json::Value;

/// Rows of a table, flattened into displayable strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Fetch lifecycle of a table viewer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Loading,
    Loaded(TableData),
    Failed(String),
}

impl TableData {
    /// Build table data from a list of JSON row objects
    ///
    /// The backend returns rows as objects keyed by column name:
    /// ```text
    /// [{"teacher_id": 1, "full_name": "Nguyen Van A", "email": null}, ...]
    /// ```
    /// Columns appear in the order their keys are first seen. A row missing
    /// a column gets an empty cell.
    pub fn from_rows(rows: &[serde_json::Map<String, Value>]) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for row in rows {
            for key in row.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.clone());
                }
            }
        }

        let rows = rows
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .map(|h| row.get(h).map(cell_text).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Render a single JSON value as cell text
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn objects(value: Value) -> Vec<serde_json::Map<String, Value>> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    #[test]
    fn test_from_rows_keeps_server_column_order() {
        let rows = objects(json!([
            {"teacher_id": 1, "full_name": "Tran Thi B", "email": "b@school.vn"},
            {"teacher_id": 2, "full_name": "Le Van C", "email": null}
        ]));

        let data = TableData::from_rows(&rows);

        assert_eq!(data.headers, vec!["teacher_id", "full_name", "email"]);
        assert_eq!(data.rows.len(), 2);
        assert_eq!(data.rows[0], vec!["1", "Tran Thi B", "b@school.vn"]);
        assert_eq!(data.rows[1], vec!["2", "Le Van C", ""]);
    }

    #[test]
    fn test_from_rows_fills_missing_columns() {
        let rows = objects(json!([
            {"camera_id": 1, "camera_name": "Gate"},
            {"camera_id": 2, "location": "Hall A"}
        ]));

        let data = TableData::from_rows(&rows);

        assert_eq!(data.headers, vec!["camera_id", "camera_name", "location"]);
        assert_eq!(data.rows[0], vec!["1", "Gate", ""]);
        assert_eq!(data.rows[1], vec!["2", "", "Hall A"]);
    }

    #[test]
    fn test_from_rows_empty() {
        let data = TableData::from_rows(&[]);
        assert!(data.headers.is_empty());
        assert!(data.is_empty());
        assert_eq!(data.row_count(), 0);
    }

    #[test]
    fn test_cell_text_nested_values_are_compact_json() {
        assert_eq!(cell_text(&json!([0.1, 0.2])), "[0.1,0.2]");
        assert_eq!(cell_text(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(cell_text(&json!(true)), "true");
        assert_eq!(cell_text(&json!(null)), "");
        assert_eq!(cell_text(&json!("present")), "present");
    }
}
