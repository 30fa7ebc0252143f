// Log records come back as a JSON list of objects. They are laid out as a
// plain text table: one column per key, in first-seen order.

use serde_json::Value;
use std::fmt;

const SCALAR_COLUMN: &str = "value";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Render a JSON value as a table cell or message. Strings are shown
/// without quotes and null as an empty cell.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl LogTable {
    pub fn from_records(records: &[Value]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            match record {
                Value::Object(map) => {
                    for key in map.keys() {
                        if !columns.iter().any(|c| c == key) {
                            columns.push(key.clone());
                        }
                    }
                }
                _ => {
                    if !columns.iter().any(|c| c == SCALAR_COLUMN) {
                        columns.push(SCALAR_COLUMN.to_string());
                    }
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|col| match record {
                        Value::Object(map) => map.get(col).map(display_value).unwrap_or_default(),
                        scalar if col == SCALAR_COLUMN => display_value(scalar),
                        _ => String::new(),
                    })
                    .collect()
            })
            .collect();

        LogTable { columns, rows }
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(col.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
        .collect();
    writeln!(f, "{}", line.join(" | ").trim_end())
}

impl fmt::Display for LogTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.columns.is_empty() {
            return writeln!(f, "(no records)");
        }
        let widths = self.widths();
        write_row(f, &self.columns, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "{}", rule.join("-+-"))?;
        for row in &self.rows {
            write_row(f, row, &widths)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_columns_are_union_in_first_seen_order() {
        let records = vec![
            json!({"id": 1, "Income": 5000, "Risk_Flag": 0}),
            json!({"id": 2, "Risk_Flag": 1, "timestamp": "2024-01-02"}),
        ];
        let table = LogTable::from_records(&records);
        assert_eq!(table.columns, vec!["id", "Income", "Risk_Flag", "timestamp"]);
        assert_eq!(table.rows[0], vec!["1", "5000", "0", ""]);
        assert_eq!(table.rows[1], vec!["2", "", "1", "2024-01-02"]);
    }

    #[test]
    fn test_render_aligns_columns() {
        let records = vec![json!({"user": "alice", "flag": 0}), json!({"user": "bo", "flag": 1})];
        let rendered = LogTable::from_records(&records).to_string();
        assert_eq!(
            rendered,
            "user  | flag\n------+-----\nalice | 0\nbo    | 1\n"
        );
    }

    #[test]
    fn test_empty_list_renders_placeholder() {
        let table = LogTable::from_records(&[]);
        assert!(table.rows.is_empty());
        assert_eq!(table.to_string(), "(no records)\n");
    }

    #[test]
    fn test_scalar_records_use_value_column() {
        let table = LogTable::from_records(&[json!("first"), json!(2)]);
        assert_eq!(table.columns, vec!["value"]);
        assert_eq!(table.rows, vec![vec!["first"], vec!["2"]]);
    }
}
