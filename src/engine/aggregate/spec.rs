use crate::engine::aggregate::errors::AggregateError;
use indexmap::IndexSet;
use std::collections::HashSet;

/// Where an output field's value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSpec {
    /// Copied from the row column of the same name onto the top-level record.
    Direct,
    /// Read from `source_column` into the sub-object of nested group `group`.
    Nested {
        group: String,
        source_column: String,
    },
}

/// Whether a nested group collects many sub-objects or keeps one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupShape {
    Array,
    Object,
}

/// How two sub-objects of the same group are judged equal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Identity {
    /// All fields must match.
    #[default]
    Structural,
    /// Only the named output field must match. A null value marks an
    /// absent child (outer join miss) and the sub-object is dropped.
    Field(String),
}

/// Which unreferenced row columns reach the top-level record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Passthrough {
    /// Every column not consumed by a nested group is copied.
    #[default]
    Unmapped,
    /// Only the grouping key and `Direct` fields are copied.
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedGroup {
    pub name: String,
    pub shape: GroupShape,
    pub identity: Identity,
    /// (output field, source column) in declaration order.
    pub fields: Vec<(String, String)>,
}

/// Validated, immutable description of how flat rows fold into records.
///
/// Top-level (`Direct`) field names are unique among themselves; nested
/// field names are unique within their group, so the same name may appear
/// on the parent and inside a sub-object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpecMap {
    fields: Vec<(String, FieldSpec)>,
    groups: Vec<NestedGroup>,
    passthrough: Passthrough,
    consumed: HashSet<String>,
}

impl FieldSpecMap {
    pub fn builder() -> FieldSpecMapBuilder {
        FieldSpecMapBuilder::default()
    }

    /// Every declared field in declaration order.
    pub fn fields(&self) -> &[(String, FieldSpec)] {
        &self.fields
    }

    pub fn direct_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, spec)| matches!(spec, FieldSpec::Direct))
            .map(|(name, _)| name.as_str())
    }

    pub fn groups(&self) -> &[NestedGroup] {
        &self.groups
    }

    pub fn passthrough(&self) -> Passthrough {
        self.passthrough
    }

    /// True when `column` is read only by nested groups and must stay off
    /// the top level.
    pub fn consumes(&self, column: &str) -> bool {
        self.consumed.contains(column)
    }

    /// Every row column the spec reads, deduplicated, in declaration order.
    pub fn referenced_columns(&self) -> IndexSet<&str> {
        self.fields
            .iter()
            .map(|(name, spec)| match spec {
                FieldSpec::Direct => name.as_str(),
                FieldSpec::Nested { source_column, .. } => source_column.as_str(),
            })
            .collect()
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.groups.iter().any(|g| g.name == name)
    }
}

#[derive(Debug, Default)]
pub struct FieldSpecMapBuilder {
    fields: Vec<(String, FieldSpec)>,
    groups: Vec<(String, GroupShape, Identity)>,
    passthrough: Passthrough,
}

impl FieldSpecMapBuilder {
    pub fn direct(mut self, field: &str) -> Self {
        self.fields.push((field.to_string(), FieldSpec::Direct));
        self
    }

    /// Declares a nested group. Its fields are added with [`Self::nested`]
    /// or [`Self::nest_columns`].
    pub fn group(mut self, name: &str, shape: GroupShape, identity: Identity) -> Self {
        self.groups.push((name.to_string(), shape, identity));
        self
    }

    pub fn nested(mut self, field: &str, group: &str, source_column: &str) -> Self {
        self.fields.push((
            field.to_string(),
            FieldSpec::Nested {
                group: group.to_string(),
                source_column: source_column.to_string(),
            },
        ));
        self
    }

    /// Shorthand for nesting columns under their own names.
    pub fn nest_columns(mut self, group: &str, columns: &[&str]) -> Self {
        for column in columns {
            self = self.nested(column, group, column);
        }
        self
    }

    pub fn passthrough(mut self, passthrough: Passthrough) -> Self {
        self.passthrough = passthrough;
        self
    }

    pub fn build(self) -> Result<FieldSpecMap, AggregateError> {
        let direct: HashSet<String> = {
            let mut declared: HashSet<(Option<&str>, &str)> = HashSet::new();
            for (name, spec) in &self.fields {
                if name.trim().is_empty() {
                    return Err(AggregateError::invalid("field names cannot be empty"));
                }
                let scope = match spec {
                    FieldSpec::Direct => None,
                    FieldSpec::Nested {
                        group,
                        source_column,
                    } => {
                        if source_column.trim().is_empty() {
                            return Err(AggregateError::invalid(format!(
                                "field '{}' has an empty source column",
                                name
                            )));
                        }
                        Some(group.as_str())
                    }
                };
                if !declared.insert((scope, name.as_str())) {
                    return Err(AggregateError::invalid(format!(
                        "field '{}' declared more than once",
                        name
                    )));
                }
            }
            declared
                .into_iter()
                .filter(|(scope, _)| scope.is_none())
                .map(|(_, name)| name.to_string())
                .collect()
        };

        let mut groups: Vec<NestedGroup> = Vec::with_capacity(self.groups.len());
        for (name, shape, identity) in self.groups {
            if name.trim().is_empty() {
                return Err(AggregateError::invalid("group names cannot be empty"));
            }
            if groups.iter().any(|g| g.name == name) {
                return Err(AggregateError::invalid(format!(
                    "group '{}' declared more than once",
                    name
                )));
            }
            if direct.contains(name.as_str()) {
                return Err(AggregateError::invalid(format!(
                    "group '{}' collides with a field of the same name",
                    name
                )));
            }
            groups.push(NestedGroup {
                name,
                shape,
                identity,
                fields: Vec::new(),
            });
        }

        for (name, spec) in &self.fields {
            let FieldSpec::Nested {
                group,
                source_column,
            } = spec
            else {
                continue;
            };
            let Some(target) = groups.iter_mut().find(|g| &g.name == group) else {
                return Err(AggregateError::invalid(format!(
                    "field '{}' refers to undeclared group '{}'",
                    name, group
                )));
            };
            target.fields.push((name.clone(), source_column.clone()));
        }

        for group in &groups {
            if group.fields.is_empty() {
                return Err(AggregateError::invalid(format!(
                    "group '{}' has no fields",
                    group.name
                )));
            }
            if let Identity::Field(id) = &group.identity {
                if !group.fields.iter().any(|(field, _)| field == id) {
                    return Err(AggregateError::invalid(format!(
                        "identity field '{}' is not a member of group '{}'",
                        id, group.name
                    )));
                }
            }
        }

        let consumed = groups
            .iter()
            .flat_map(|g| g.fields.iter().map(|(_, source)| source.as_str()))
            .filter(|source| !direct.contains(*source))
            .map(str::to_string)
            .collect();

        Ok(FieldSpecMap {
            fields: self.fields,
            groups,
            passthrough: self.passthrough,
            consumed,
        })
    }
}
