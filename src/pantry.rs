use std::collections::BTreeSet;

use crate::catalog::Catalog;

/// The ingredients a user has marked as owned. Local until saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PantrySelection {
    ids: BTreeSet<String>,
}

impl PantrySelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the id was already selected.
    pub fn add(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    /// Flip selection of `id`, returning whether it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn select_all(&mut self, catalog: &Catalog) {
        self.ids = catalog.ids().map(String::from).collect();
    }

    pub fn clear_all(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Sorted ids, as sent to the server.
    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for PantrySelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}
