//! Insertion-ordered filter storage with a key index.

use std::collections::HashMap;

use crate::error::{FilterError, Result};
use crate::filter::Filter;

/// Filters in insertion order, unique by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterEntries {
    entries: Vec<(String, Filter)>,
    index: HashMap<String, usize>,
}

impl FilterEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append under a new key. An existing key is a [`FilterError::DuplicateKey`].
    pub fn insert(&mut self, key: impl Into<String>, filter: Filter) -> Result<()> {
        let key = key.into();
        if self.index.contains_key(&key) {
            return Err(FilterError::DuplicateKey(key));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, filter));
        Ok(())
    }

    /// Remove any entry under `key`, then append. Returns the old filter.
    pub fn replace(&mut self, key: impl Into<String>, filter: Filter) -> Option<Filter> {
        let key = key.into();
        let old = self.remove(&key);
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, filter));
        old
    }

    pub fn remove(&mut self, key: &str) -> Option<Filter> {
        let position = self.index.remove(key)?;
        let (_, filter) = self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(filter)
    }

    pub fn get(&self, key: &str) -> Option<&Filter> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Filter)> {
        self.entries.iter().map(|(k, f)| (k.as_str(), f))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Positions in ascending sort priority; ties keep insertion order.
    pub fn priority_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        order.sort_by_key(|&i| self.entries[i].1.sort_priority());
        order
    }

    /// A copy with entries re-sorted by priority.
    pub fn sorted_by_priority(&self) -> Self {
        let mut sorted = Self::new();
        for i in self.priority_order() {
            let (key, filter) = &self.entries[i];
            sorted.index.insert(key.clone(), sorted.entries.len());
            sorted.entries.push((key.clone(), filter.clone()));
        }
        sorted
    }

    pub(crate) fn entry_mut(&mut self, position: usize) -> Option<(&str, &mut Filter)> {
        self.entries.get_mut(position).map(|(k, f)| (k.as_str(), f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{DateFilter, SchemaFilter, TextSearchFilter};
    use chrono::NaiveDate;
    use civicfeed_core::{fixtures, DateField};

    fn date_filter() -> Filter {
        let day = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        DateFilter::new(DateField::ItemDate, day, day, None).unwrap().into()
    }

    fn search_filter() -> Filter {
        TextSearchFilter::new(fixtures::field("description"), &["window".to_string()])
            .unwrap()
            .into()
    }

    #[test]
    fn test_duplicate_insert_is_rejected() {
        let mut entries = FilterEntries::new();
        entries.insert("date", date_filter()).unwrap();
        let err = entries.insert("date", date_filter()).unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_remove_keeps_index_consistent() {
        let mut entries = FilterEntries::new();
        entries.insert("schema", SchemaFilter::new(fixtures::schema()).into()).unwrap();
        entries.insert("date", date_filter()).unwrap();
        entries.insert("description", search_filter()).unwrap();

        assert!(entries.remove("schema").is_some());
        assert!(entries.remove("schema").is_none());
        assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["date", "description"]);
        assert!(matches!(entries.get("description"), Some(Filter::TextSearch(_))));
        assert!(matches!(entries.get("date"), Some(Filter::Date(_))));
    }

    #[test]
    fn test_replace_moves_entry_to_the_end() {
        let mut entries = FilterEntries::new();
        entries.insert("date", date_filter()).unwrap();
        entries.insert("description", search_filter()).unwrap();
        assert!(entries.replace("date", date_filter()).is_some());
        assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["description", "date"]);
    }

    #[test]
    fn test_priority_sort_is_stable() {
        let mut entries = FilterEntries::new();
        entries.insert("description", search_filter()).unwrap();
        entries.insert("date", date_filter()).unwrap();
        entries.insert("schema", SchemaFilter::new(fixtures::schema()).into()).unwrap();
        let sorted = entries.sorted_by_priority();
        assert_eq!(
            sorted.keys().collect::<Vec<_>>(),
            vec!["schema", "date", "description"]
        );
        assert_eq!(sorted.get("date"), entries.get("date"));
    }
}
