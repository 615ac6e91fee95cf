use crate::engine::types::FlatRow;
use serde_json::Value;

pub struct FlatRowFactory {
    row: FlatRow,
}

impl FlatRowFactory {
    pub fn new() -> Self {
        Self {
            row: FlatRow::new(),
        }
    }

    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.row.insert(column.to_string(), value.into());
        self
    }

    pub fn without(mut self, column: &str) -> Self {
        self.row.shift_remove(column);
        self
    }

    pub fn create(self) -> FlatRow {
        self.row
    }

    /// Builds rows from a JSON array of objects, keeping key order.
    pub fn from_json(value: Value) -> Vec<FlatRow> {
        value
            .as_array()
            .expect("expected a JSON array of rows")
            .iter()
            .map(|row| {
                row.as_object()
                    .expect("expected each row to be a JSON object")
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .collect()
    }
}
