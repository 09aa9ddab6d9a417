//! Blog editor helpers: partner autocomplete and location suggestions.

use crate::models::{Author, BlogPost, Location, Photo};
use std::collections::HashMap;

/// Authors whose name contains `query` (case-insensitive) and who are not
/// already tagged on the post.
pub fn filter_partners<'a>(authors: &'a [Author], selected: &[String], query: &str) -> Vec<&'a Author> {
    let needle = query.trim().to_lowercase();
    authors
        .iter()
        .filter(|a| !selected.contains(&a.id))
        .filter(|a| a.name.to_lowercase().contains(&needle))
        .collect()
}

/// Partner ids tagged on a post, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartnerSelection {
    partners: Vec<String>,
}

impl PartnerSelection {
    pub fn new(partners: Vec<String>) -> Self {
        let mut selection = Self::default();
        for id in partners {
            selection.add(id);
        }
        selection
    }

    /// Returns false if the partner was already tagged.
    pub fn add(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.partners.contains(&id) {
            return false;
        }
        self.partners.push(id);
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.partners.len();
        self.partners.retain(|p| p != id);
        before != self.partners.len()
    }

    pub fn ids(&self) -> &[String] {
        &self.partners
    }

    pub fn into_ids(self) -> Vec<String> {
        self.partners
    }

    pub fn suggestions<'a>(&self, authors: &'a [Author], query: &str) -> Vec<&'a Author> {
        filter_partners(authors, &self.partners, query)
    }
}

/// Distinct named locations already used by posts and photos.
/// Keeps first-seen order; a later record with the same name supplies the coordinates.
pub fn location_suggestions(posts: &[BlogPost], photos: &[Photo]) -> Vec<Location> {
    let mut order: Vec<Location> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    let locations = posts
        .iter()
        .filter_map(|p| p.location.as_ref())
        .chain(photos.iter().map(|p| &p.location))
        .filter(|l| !l.name.trim().is_empty());

    for location in locations {
        match index.get(&location.name) {
            Some(&i) => order[i] = location.clone(),
            None => {
                index.insert(location.name.clone(), order.len());
                order.push(location.clone());
            }
        }
    }
    order
}
