/*
 * Responsibility
 * - Lookup: the filter a find/clear runs with (AND of predicates)
 * - Page: 1-based pagination window
 * - hooks extend a Lookup before it reaches the storer, they never remove predicates
 */
use serde_json::Value;

use crate::resource::item::Item;

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Equal { field: String, value: Value },
    /// Matches no item at all.
    MatchNone,
}

impl Predicate {
    pub fn equal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equal {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Self::Equal { field, value } => item.field(field) == Some(value),
            Self::MatchNone => false,
        }
    }
}

/// A conjunction of predicates. An empty lookup matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lookup {
    predicates: Vec<Predicate>,
}

impl Lookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup scoped to the children of a parent item (`field == parent_id`).
    pub fn for_parent(field: impl Into<String>, parent_id: impl Into<String>) -> Self {
        let parent_id: String = parent_id.into();
        let mut lookup = Self::new();
        lookup.add_predicate(Predicate::equal(field, parent_id));
        lookup
    }

    pub fn add_predicate(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    pub fn add_query(&mut self, query: impl IntoIterator<Item = Predicate>) {
        self.predicates.extend(query);
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.predicates.iter().all(|p| p.matches(item))
    }

    pub fn matches_nothing(&self) -> bool {
        self.predicates
            .iter()
            .any(|p| matches!(p, Predicate::MatchNone))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: usize,
    pub per_page: usize,
}

impl Page {
    pub fn new(number: usize, per_page: usize) -> Self {
        Self {
            number: number.max(1),
            per_page,
        }
    }

    pub fn offset(&self) -> usize {
        (self.number - 1).saturating_mul(self.per_page)
    }
}
