//! Tags and tag resolution
//!
//! A tag is a named reference to an external numeric value. The formula
//! engine sees tags through [`TagResolver`], which answers two questions:
//! which tags match a partially typed name (autocomplete), and what number a
//! tag name currently stands for (evaluation).
//!
//! [`TagCatalog`] is an in-memory resolver. [`LookupSequencer`] lets a caller
//! that fetches suggestions asynchronously discard responses for queries the
//! user has already typed past.

use crate::error::{Error, Result};

/// Default number of suggestions returned for an empty query
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// A tag as offered by autocomplete
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagSuggestion {
    pub name: String,
    pub category: String,
    pub value: f64,
    pub id: String,
}

impl TagSuggestion {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        value: f64,
        id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            value,
            id: id.into(),
        }
    }

    /// Case-insensitive substring match on name or category
    ///
    /// `query_lower` must already be lowercased.
    fn matches(&self, query_lower: &str) -> bool {
        self.name.to_lowercase().contains(query_lower)
            || self.category.to_lowercase().contains(query_lower)
    }
}

/// Source of tag suggestions and values
pub trait TagResolver {
    /// Suggestions for a partially typed tag
    ///
    /// Matching is a case-insensitive substring test against name or
    /// category. An empty query returns a default top-N list.
    fn lookup(&self, query: &str) -> Vec<TagSuggestion>;

    /// Value bound to exactly `name`, if any
    fn value_of(&self, name: &str) -> Option<f64>;
}

impl<T: TagResolver + ?Sized> TagResolver for &T {
    fn lookup(&self, query: &str) -> Vec<TagSuggestion> {
        (**self).lookup(query)
    }

    fn value_of(&self, name: &str) -> Option<f64> {
        (**self).value_of(name)
    }
}

/// Ordered in-memory tag list
#[derive(Debug, Clone)]
pub struct TagCatalog {
    entries: Vec<TagSuggestion>,
    default_limit: usize,
}

impl Default for TagCatalog {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            default_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }
}

impl TagCatalog {
    /// Create a catalog from entries, keeping their order
    pub fn new(entries: Vec<TagSuggestion>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    /// The five reference tags `name 1` through `name 5`
    pub fn sample() -> Self {
        Self::new(vec![
            TagSuggestion::new("name 1", "category 1", 9.0, "1"),
            TagSuggestion::new("name 2", "category 2", 16.0, "2"),
            TagSuggestion::new("name 3", "category 3", 95.0, "3"),
            TagSuggestion::new("name 4", "category 4", 3.0, "4"),
            TagSuggestion::new("name 5", "category 5", 51.0, "5"),
        ])
    }

    /// Set how many entries an empty query returns
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    /// Add a tag; names must be unique
    pub fn insert(&mut self, tag: TagSuggestion) -> Result<()> {
        if self.entries.iter().any(|t| t.name == tag.name) {
            return Err(Error::DuplicateTag(tag.name));
        }
        self.entries.push(tag);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TagSuggestion> {
        self.entries.iter().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagSuggestion> {
        self.entries.iter()
    }
}

impl TagResolver for TagCatalog {
    fn lookup(&self, query: &str) -> Vec<TagSuggestion> {
        if query.is_empty() {
            return self.entries.iter().take(self.default_limit).cloned().collect();
        }

        let query = query.to_lowercase();
        self.entries
            .iter()
            .filter(|t| t.matches(&query))
            .cloned()
            .collect()
    }

    fn value_of(&self, name: &str) -> Option<f64> {
        self.get(name).map(|t| t.value)
    }
}

/// Identifies one suggestion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub seq: u64,
    pub query: String,
}

/// Orders suggestion requests so only the latest response is applied
///
/// Every [`begin`](Self::begin) supersedes the tickets issued before it.
/// [`complete`](Self::complete) hands back the suggestions only for the
/// newest ticket.
#[derive(Debug, Default, Clone)]
pub struct LookupSequencer {
    next_seq: u64,
    latest: Option<LookupTicket>,
}

impl LookupSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `query`
    pub fn begin(&mut self, query: impl Into<String>) -> LookupTicket {
        self.next_seq += 1;
        let ticket = LookupTicket {
            seq: self.next_seq,
            query: query.into(),
        };
        self.latest = Some(ticket.clone());
        ticket
    }

    /// Whether `ticket` is still the newest request
    pub fn is_current(&self, ticket: &LookupTicket) -> bool {
        self.latest.as_ref() == Some(ticket)
    }

    /// Accept a response, or drop it if a newer request exists
    pub fn complete(
        &mut self,
        ticket: &LookupTicket,
        suggestions: Vec<TagSuggestion>,
    ) -> Option<Vec<TagSuggestion>> {
        if !self.is_current(ticket) {
            tracing::debug!(
                seq = ticket.seq,
                query = %ticket.query,
                "discarding stale tag lookup"
            );
            return None;
        }
        Some(suggestions)
    }

    /// Query of the newest request
    pub fn current_query(&self) -> Option<&str> {
        self.latest.as_ref().map(|t| t.query.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(list: &[TagSuggestion]) -> Vec<&str> {
        list.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_lookup_empty_query_returns_default_set() {
        let catalog = TagCatalog::sample();
        assert_eq!(catalog.lookup("").len(), 5);

        let catalog = catalog.with_default_limit(2);
        assert_eq!(names(&catalog.lookup("")), vec!["name 1", "name 2"]);
    }

    #[test]
    fn test_lookup_is_case_insensitive_substring() {
        let catalog = TagCatalog::sample();
        assert_eq!(names(&catalog.lookup("NAME 3")), vec!["name 3"]);
        assert_eq!(names(&catalog.lookup("gory 4")), vec!["name 4"]);
        assert_eq!(catalog.lookup("name").len(), 5);
        assert!(catalog.lookup("revenue").is_empty());
    }

    #[test]
    fn test_value_of_is_exact() {
        let catalog = TagCatalog::sample();
        assert_eq!(catalog.value_of("name 1"), Some(9.0));
        assert_eq!(catalog.value_of("name 5"), Some(51.0));
        assert_eq!(catalog.value_of("Name 1"), None);
        assert_eq!(catalog.value_of("unknown"), None);
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut catalog = TagCatalog::new(Vec::new());
        assert!(catalog.is_empty());
        catalog
            .insert(TagSuggestion::new("rate", "finance", 0.05, "r"))
            .unwrap();
        let err = catalog
            .insert(TagSuggestion::new("rate", "other", 1.0, "x"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateTag(name) if name == "rate"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_sequencer_discards_stale_responses() {
        let catalog = TagCatalog::sample();
        let mut seq = LookupSequencer::new();

        let first = seq.begin("n");
        let second = seq.begin("name 2");
        assert_eq!(seq.current_query(), Some("name 2"));

        // The older response arrives late
        assert!(seq.complete(&first, catalog.lookup(&first.query)).is_none());

        let applied = seq.complete(&second, catalog.lookup(&second.query)).unwrap();
        assert_eq!(names(&applied), vec!["name 2"]);
    }

    #[test]
    fn test_resolver_through_reference() {
        fn value<R: TagResolver>(r: R) -> Option<f64> {
            r.value_of("name 4")
        }
        let catalog = TagCatalog::sample();
        assert_eq!(value(&catalog), Some(3.0));
    }
}
