//! Filter predicate engine
//!
//! Named per-field filters are ANDed with each other and with the free-text
//! search. Matching rules depend on the field's [`FieldKind`]:
//! text fields match case-insensitive substrings, enum fields match exactly,
//! integer fields match an exact value or an inclusive range.

use crate::entities::Entity;
use crate::schema::{FieldKind, FieldValue};
use crate::sort::{compare_values, SortDirection};
use std::collections::BTreeMap;

/// Value of one named filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    /// Inclusive bounds; a missing bound is unbounded.
    Range { min: Option<i64>, max: Option<i64> },
}

impl FilterValue {
    pub fn text(value: impl Into<String>) -> Self {
        FilterValue::Text(value.into())
    }

    pub fn range(min: Option<i64>, max: Option<i64>) -> Self {
        FilterValue::Range { min, max }
    }

    pub fn slot(&self) -> FilterSlot {
        match self {
            FilterValue::Text(_) => FilterSlot::Exact,
            FilterValue::Range { .. } => FilterSlot::Range,
        }
    }

    /// An empty filter always matches and is never stored.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Text(value) => value.is_empty(),
            FilterValue::Range { min, max } => min.is_none() && max.is_none(),
        }
    }

    /// Chip label for the active-filters display.
    pub fn describe(&self) -> String {
        match self {
            FilterValue::Text(value) => value.clone(),
            FilterValue::Range {
                min: Some(min),
                max: Some(max),
            } => format!("{}..={}", min, max),
            FilterValue::Range { min: Some(min), max: None } => format!(">= {}", min),
            FilterValue::Range { min: None, max: Some(max) } => format!("<= {}", max),
            FilterValue::Range { min: None, max: None } => String::new(),
        }
    }
}

/// Which of a field's two filters a value occupies. A field may carry an
/// exact value and a range at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterSlot {
    Exact,
    Range,
}

/// The set of named filters currently applied to a screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    values: BTreeMap<(String, FilterSlot), FilterValue>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a filter in the slot matching its variant; an empty value clears
    /// that slot.
    pub fn set(&mut self, name: impl Into<String>, value: FilterValue) {
        let key = (name.into(), value.slot());
        if value.is_empty() {
            self.values.remove(&key);
        } else {
            self.values.insert(key, value);
        }
    }

    /// Clear both slots of a field. Returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.values.len();
        self.values.retain(|(field, _), _| field != name);
        self.values.len() != before
    }

    pub fn remove_slot(&mut self, name: &str, slot: FilterSlot) -> Option<FilterValue> {
        self.values.remove(&(name.to_string(), slot))
    }

    pub fn get(&self, name: &str, slot: FilterSlot) -> Option<&FilterValue> {
        self.values.get(&(name.to_string(), slot))
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.values
            .iter()
            .map(|((name, _), value)| (name.as_str(), value))
    }
}

/// Whether one field value satisfies one filter.
pub fn field_matches(kind: FieldKind, value: &FieldValue<'_>, filter: &FilterValue) -> bool {
    match (kind, filter) {
        (_, filter) if filter.is_empty() => true,
        (FieldKind::Text, FilterValue::Text(needle)) => value
            .as_text()
            .to_lowercase()
            .contains(&needle.to_lowercase()),
        (FieldKind::Enum, FilterValue::Text(expected)) => {
            !value.is_null() && value.as_text() == expected.as_str()
        }
        (FieldKind::Integer, FilterValue::Text(expected)) => {
            match (value.as_integer(), expected.trim().parse::<i64>()) {
                (Some(actual), Ok(expected)) => actual == expected,
                _ => false,
            }
        }
        (FieldKind::Integer, FilterValue::Range { min, max }) => match value.as_integer() {
            Some(actual) => {
                min.map_or(true, |min| actual >= min) && max.map_or(true, |max| actual <= max)
            }
            None => false,
        },
        (FieldKind::Text | FieldKind::Enum, FilterValue::Range { .. }) => false,
    }
}

/// Free-text search over the entity's search fields. An empty query matches.
pub fn matches_search<E: Entity>(entity: &E, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    E::schema()
        .search_fields
        .iter()
        .any(|name| entity.field(name).as_text().to_lowercase().contains(&query))
}

/// Whether a record passes every named filter and the search query.
pub fn matches<E: Entity>(entity: &E, filters: &FilterSet, search: &str) -> bool {
    let schema = E::schema();
    filters.iter().all(|(name, filter)| {
        let kind = schema.kind_of(name).unwrap_or(FieldKind::Text);
        field_matches(kind, &entity.field(name), filter)
    }) && matches_search(entity, search)
}

/// Records passing [`matches`], in their original order.
pub fn filter_rows<'a, E: Entity>(rows: &'a [E], filters: &FilterSet, search: &str) -> Vec<&'a E> {
    rows.iter()
        .filter(|row| matches(*row, filters, search))
        .collect()
}

/// Distinct non-empty values of a field, for building filter pickers.
pub fn distinct_values<E: Entity>(rows: &[E], field: &str, direction: SortDirection) -> Vec<String> {
    let kind = E::schema().kind_of(field).unwrap_or(FieldKind::Text);
    let mut values: Vec<FieldValue<'_>> = Vec::new();
    for row in rows {
        let value = row.field(field);
        if value.is_null() || value.as_text().is_empty() {
            continue;
        }
        if !values.iter().any(|seen| seen.as_text() == value.as_text()) {
            values.push(value);
        }
    }
    values.sort_by(|a, b| direction.apply(compare_values(kind, a, b)));
    values.iter().map(|value| value.as_text().into_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Trainer, Training, User};
    use crate::enums::{Role, TrainerStyle};
    use crate::identity::EntityId;

    fn user(id: i64, login: &str, role: Role) -> User {
        User {
            id: EntityId::Int(id),
            login: login.to_string(),
            role,
        }
    }

    fn training(id: i64, title: &str, year: i64, duration: i64, field: &str, budget: i64) -> Training {
        Training {
            id: EntityId::Int(id),
            title: title.to_string(),
            year: Some(year),
            duration: Some(duration),
            field: field.to_string(),
            budget: Some(budget),
        }
    }

    #[test]
    fn empty_filters_and_search_match_everything() {
        let row = user(1, "bob", Role::User);
        assert!(matches(&row, &FilterSet::new(), ""));
    }

    #[test]
    fn enum_filter_is_exact() {
        let users = vec![user(1, "bob", Role::User), user(2, "ann", Role::Admin)];
        let mut filters = FilterSet::new();
        filters.set("role", FilterValue::text("admin"));
        let visible = filter_rows(&users, &filters, "");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].login, "ann");

        filters.set("role", FilterValue::text("adm"));
        assert!(filter_rows(&users, &filters, "").is_empty());
    }

    #[test]
    fn text_filter_is_case_insensitive_substring() {
        let row = user(1, "Bobby", Role::User);
        let mut filters = FilterSet::new();
        filters.set("login", FilterValue::text("OBB"));
        assert!(matches(&row, &filters, ""));
        filters.set("login", FilterValue::text("bobx"));
        assert!(!matches(&row, &filters, ""));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let row = training(1, "Rust", 2024, 5, "IT", 1_000);
        let mut filters = FilterSet::new();
        filters.set("budget", FilterValue::range(Some(1_000), Some(1_000)));
        assert!(matches(&row, &filters, ""));
        filters.set("budget", FilterValue::range(Some(1_001), None));
        assert!(!matches(&row, &filters, ""));
        filters.set("budget", FilterValue::range(None, Some(999)));
        assert!(!matches(&row, &filters, ""));
        filters.set("budget", FilterValue::range(None, None));
        assert!(filters.is_empty());
    }

    #[test]
    fn exact_and_range_on_one_field_are_anded() {
        let short = training(1, "Rust", 2024, 3, "IT", 1_000);
        let long = training(2, "Go", 2024, 10, "IT", 1_000);
        let mut filters = FilterSet::new();
        filters.set("duration", FilterValue::range(Some(2), Some(12)));
        filters.set("duration", FilterValue::text("3"));
        assert_eq!(filters.len(), 2);
        assert!(matches(&short, &filters, ""));
        assert!(!matches(&long, &filters, ""));

        filters.set("duration", FilterValue::range(Some(5), None));
        assert!(!matches(&short, &filters, ""));
        assert_eq!(
            filters.get("duration", FilterSlot::Range),
            Some(&FilterValue::range(Some(5), None))
        );

        filters.set("duration", FilterValue::text(""));
        assert!(filters.get("duration", FilterSlot::Exact).is_none());
        assert!(matches(&long, &filters, ""));

        assert!(filters.remove("duration"));
        assert!(filters.is_empty());
        assert!(!filters.remove("duration"));
    }

    #[test]
    fn year_text_filter_matches_exact_number() {
        let row = training(1, "Rust", 2024, 5, "IT", 1_000);
        let mut filters = FilterSet::new();
        filters.set("year", FilterValue::text("2024"));
        assert!(matches(&row, &filters, ""));
        filters.set("year", FilterValue::text("202"));
        assert!(!matches(&row, &filters, ""));
    }

    #[test]
    fn range_on_text_field_never_matches() {
        let row = training(1, "Rust", 2024, 5, "IT", 1_000);
        assert!(!field_matches(
            FieldKind::Text,
            &row.field("title"),
            &FilterValue::range(Some(0), None)
        ));
    }

    #[test]
    fn search_is_anded_with_filters() {
        let trainer = Trainer {
            id: EntityId::Int(1),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.org".to_string(),
            tel: "0600".to_string(),
            style: Some(TrainerStyle::Externe),
        };
        let mut filters = FilterSet::new();
        filters.set("style", FilterValue::text("externe"));
        assert!(matches(&trainer, &filters, "LOVE"));
        assert!(matches(&trainer, &filters, "extern"));
        assert!(!matches(&trainer, &filters, "grace"));
        filters.set("style", FilterValue::text("interne"));
        assert!(!matches(&trainer, &filters, "love"));
    }

    #[test]
    fn search_only_consults_search_fields() {
        let row = training(1, "Rust", 2024, 5, "IT", 1_000);
        assert!(matches_search(&row, "it"));
        assert!(!matches_search(&row, "2024"));
    }

    #[test]
    fn distinct_values_are_sorted_and_deduplicated() {
        let rows = vec![
            training(1, "A", 2023, 1, "Management", 1),
            training(2, "B", 2025, 1, "it", 1),
            training(3, "C", 2023, 1, "IT", 1),
            training(4, "D", 2024, 1, "", 1),
        ];
        assert_eq!(
            distinct_values(&rows, "year", SortDirection::Desc),
            vec!["2025", "2024", "2023"]
        );
        assert_eq!(
            distinct_values(&rows, "field", SortDirection::Asc),
            vec!["it", "IT", "Management"]
        );
    }
}
