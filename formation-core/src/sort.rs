//! Sort comparator for tabular entity views.
//!
//! Integer fields compare numerically; everything else compares by a
//! case-insensitive collation that folds common Latin diacritics at the
//! primary level. Absent values sort as `0` or `""`.

use crate::entities::Entity;
use crate::schema::{FieldKind, FieldValue};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Apply this direction to an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Current sort column and direction of a screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: String,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }

    pub fn ascending(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Asc)
    }

    /// Default sort of an entity screen: its schema's sort key, ascending.
    pub fn for_entity<E: Entity>() -> Self {
        Self::ascending(E::schema().default_sort)
    }

    /// Column-header click: re-selecting the current key flips the
    /// direction, any other key starts ascending.
    pub fn toggle(&mut self, key: &str) {
        if self.key == key {
            self.direction = self.direction.reversed();
        } else {
            self.key = key.to_string();
            self.direction = SortDirection::Asc;
        }
    }
}

/// Locale-style string ordering on already-lowercased or raw strings.
///
/// Primary level ignores case and Latin diacritics; the lowercased strings
/// break primary ties so the order is total and deterministic.
pub fn collate(a: &str, b: &str) -> Ordering {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    primary_key(&a_lower)
        .cmp(&primary_key(&b_lower))
        .then_with(|| a_lower.cmp(&b_lower))
}

fn primary_key(value: &str) -> String {
    let mut key = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => key.push('a'),
            'ç' => key.push('c'),
            'è' | 'é' | 'ê' | 'ë' => key.push('e'),
            'ì' | 'í' | 'î' | 'ï' => key.push('i'),
            'ñ' => key.push('n'),
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => key.push('o'),
            'ù' | 'ú' | 'û' | 'ü' => key.push('u'),
            'ý' | 'ÿ' => key.push('y'),
            'æ' => key.push_str("ae"),
            'œ' => key.push_str("oe"),
            'ß' => key.push_str("ss"),
            other => key.push(other),
        }
    }
    key
}

/// Ascending comparison of two values of a field of the given kind.
pub fn compare_values(kind: FieldKind, a: &FieldValue<'_>, b: &FieldValue<'_>) -> Ordering {
    match kind {
        FieldKind::Integer => a
            .as_integer()
            .unwrap_or(0)
            .cmp(&b.as_integer().unwrap_or(0)),
        FieldKind::Text | FieldKind::Enum => collate(&a.as_text(), &b.as_text()),
    }
}

/// Compare two records on `key` in `direction`.
pub fn compare<E: Entity>(a: &E, b: &E, key: &str, direction: SortDirection) -> Ordering {
    let kind = E::schema().kind_of(key).unwrap_or(FieldKind::Text);
    direction.apply(compare_values(kind, &a.field(key), &b.field(key)))
}

/// Stable in-place sort; equal keys keep their prior relative order.
pub fn sort_rows<E: Entity>(rows: &mut [&E], config: &SortConfig) {
    rows.sort_by(|a, b| compare(*a, *b, &config.key, config.direction));
}
