use crate::engine::aggregate::errors::AggregateError;
use crate::engine::aggregate::spec::{FieldSpecMap, GroupShape, Identity, NestedGroup, Passthrough};
use crate::engine::types::{AggregatedRecord, FlatRow};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::trace;

/// A grouping key bound to a field spec, reusable across calls.
#[derive(Debug, Clone)]
pub struct Reducer {
    group_key: String,
    spec: FieldSpecMap,
}

impl Reducer {
    pub fn new(group_key: &str, spec: FieldSpecMap) -> Result<Self, AggregateError> {
        validate_group_key(group_key, &spec)?;
        Ok(Self {
            group_key: group_key.to_string(),
            spec,
        })
    }

    pub fn group_key(&self) -> &str {
        &self.group_key
    }

    pub fn spec(&self) -> &FieldSpecMap {
        &self.spec
    }

    pub fn reduce(&self, rows: &[FlatRow]) -> Result<Vec<AggregatedRecord>, AggregateError> {
        aggregate(rows, &self.group_key, &self.spec)
    }
}

/// Folds flat join rows into one record per distinct `group_key` value.
///
/// Records come out in first-appearance order of their key. Top-level
/// fields are taken from the first row of each key and never overwritten.
/// Nested arrays keep first-seen order and hold no duplicates under the
/// group's [`Identity`]. Any row lacking the key or a referenced column
/// fails the whole call.
pub fn aggregate(
    rows: &[FlatRow],
    group_key: &str,
    spec: &FieldSpecMap,
) -> Result<Vec<AggregatedRecord>, AggregateError> {
    validate_group_key(group_key, spec)?;

    let referenced = spec.referenced_columns();
    let mut records: IndexMap<String, PendingRecord> = IndexMap::new();

    for (idx, row) in rows.iter().enumerate() {
        let key_value = row
            .get(group_key)
            .ok_or_else(|| AggregateError::malformed(idx, group_key))?;
        if let Some(missing) = referenced.iter().find(|col| !row.contains_key(**col)) {
            return Err(AggregateError::malformed(idx, missing));
        }

        let pending = records
            .entry(key_value.to_string())
            .or_insert_with(|| PendingRecord::open(group_key, key_value, row, spec));

        for (slot, group) in spec.groups().iter().enumerate() {
            pending.absorb(slot, group, row);
        }
    }

    trace!(
        target: "marquee::aggregate",
        rows = rows.len(),
        records = records.len(),
        group_key,
        "Aggregated rows"
    );

    Ok(records.into_values().map(|p| p.record).collect())
}

fn validate_group_key(group_key: &str, spec: &FieldSpecMap) -> Result<(), AggregateError> {
    if group_key.trim().is_empty() {
        return Err(AggregateError::invalid("grouping key cannot be empty"));
    }
    if spec.has_group(group_key) {
        return Err(AggregateError::invalid(format!(
            "grouping key '{}' collides with a nested group",
            group_key
        )));
    }
    Ok(())
}

struct PendingRecord {
    record: AggregatedRecord,
    // Identity keys already placed, one set per group slot.
    seen: Vec<HashSet<String>>,
}

impl PendingRecord {
    fn open(group_key: &str, key_value: &Value, row: &FlatRow, spec: &FieldSpecMap) -> Self {
        let mut record = Map::new();
        record.insert(group_key.to_string(), key_value.clone());

        match spec.passthrough() {
            Passthrough::Unmapped => {
                for (column, value) in row {
                    if !spec.consumes(column) && !record.contains_key(column) {
                        record.insert(column.clone(), value.clone());
                    }
                }
            }
            Passthrough::None => {
                for field in spec.direct_fields() {
                    if let Some(value) = row.get(field) {
                        record.insert(field.to_string(), value.clone());
                    }
                }
            }
        }

        for group in spec.groups() {
            let empty = match group.shape {
                GroupShape::Array => Value::Array(Vec::new()),
                GroupShape::Object => Value::Null,
            };
            record.insert(group.name.clone(), empty);
        }

        Self {
            record,
            seen: vec![HashSet::new(); spec.groups().len()],
        }
    }

    fn absorb(&mut self, slot: usize, group: &NestedGroup, row: &FlatRow) {
        let sub: Map<String, Value> = group
            .fields
            .iter()
            .map(|(field, source)| {
                (
                    field.clone(),
                    row.get(source).cloned().unwrap_or(Value::Null),
                )
            })
            .collect();
        let sub = Value::Object(sub);

        let identity = match &group.identity {
            Identity::Structural => sub.to_string(),
            Identity::Field(field) => match sub.get(field) {
                Some(Value::Null) | None => return,
                Some(value) => value.to_string(),
            },
        };

        let seen = &mut self.seen[slot];
        match group.shape {
            GroupShape::Array => {
                if !seen.insert(identity) {
                    return;
                }
                if let Some(Value::Array(items)) = self.record.get_mut(&group.name) {
                    items.push(sub);
                }
            }
            GroupShape::Object => {
                if !seen.is_empty() {
                    return;
                }
                seen.insert(identity);
                self.record.insert(group.name.clone(), sub);
            }
        }
    }
}
