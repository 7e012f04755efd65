//! Field schemas describing how each entity is filtered, searched and sorted.

use crate::enums::EntityKind;
use std::borrow::Cow;

/// How a field participates in filtering and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free text: case-insensitive substring filter, collated sort.
    Text,
    /// Closed or catalogued set of values: exact-match filter, collated sort.
    Enum,
    /// Integer: inclusive range filter, numeric sort.
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Static description of one entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    pub kind: EntityKind,
    /// Filterable and sortable fields, in display order. Names are wire names.
    pub fields: &'static [FieldSpec],
    /// Fields consulted by the free-text search box.
    pub search_fields: &'static [&'static str],
    pub default_sort: &'static str,
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    pub fn kind_of(&self, name: &str) -> Option<FieldKind> {
        self.field(name).map(|spec| spec.kind)
    }
}

/// A borrowed view of one field of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Integer(i64),
    /// Field absent on this record (or unknown to the entity).
    Null,
}

impl<'a> FieldValue<'a> {
    /// String form used for substring matching and collation. Null is empty.
    pub fn as_text(&self) -> Cow<'a, str> {
        match self {
            FieldValue::Text(value) => Cow::Borrowed(value),
            FieldValue::Integer(value) => Cow::Owned(value.to_string()),
            FieldValue::Null => Cow::Borrowed(""),
        }
    }

    /// Integer form used for ranges and numeric sorting.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            FieldValue::Text(value) => value.trim().parse().ok(),
            FieldValue::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl<'a> From<Option<&'a str>> for FieldValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map(FieldValue::Text).unwrap_or(FieldValue::Null)
    }
}
