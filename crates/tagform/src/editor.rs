//! Formula editing session
//!
//! [`Editor`] is the engine behind a formula input: it owns the
//! [`FormulaStore`], the text being typed, the current error and the tag
//! suggestion list. Every mutation is gated by the admission rules, and the
//! result is recomputed after each change.
//!
//! # Example
//!
//! ```rust
//! use tagform::prelude::*;
//!
//! let mut editor = Editor::new(TagCatalog::sample());
//! editor.set_input("name 1");
//! editor.commit_input().unwrap();
//! editor.push_operator(Operator::Add).unwrap();
//! editor.set_input("1");
//! editor.commit_input().unwrap();
//!
//! assert_eq!(editor.result(), Some(10.0));
//! ```

use crate::{
    admit_token, evaluate_formula, is_number_literal, structure_error, AdmissionError,
    Evaluation, FormulaError, FormulaStore, LookupSequencer, LookupTicket, Operator,
    TagResolver, TagSuggestion, Token, TokenKind,
};
use thiserror::Error;

/// What is currently wrong with the formula, as shown to the user
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    /// The last attempted token was refused; the formula is unchanged
    #[error(transparent)]
    Rejected(#[from] AdmissionError),

    /// The formula is malformed
    #[error("Invalid formula structure")]
    InvalidStructure(FormulaError),

    /// The formula is well-formed but has no finite value
    #[error("Invalid calculation result")]
    InvalidResult(FormulaError),
}

impl EditorError {
    /// Underlying formula error, for the structure and result cases
    pub fn formula_error(&self) -> Option<&FormulaError> {
        match self {
            EditorError::Rejected(_) => None,
            EditorError::InvalidStructure(e) | EditorError::InvalidResult(e) => Some(e),
        }
    }
}

/// Tag suggestions with an optional highlighted entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionList {
    items: Vec<TagSuggestion>,
    highlighted: Option<usize>,
}

impl SuggestionList {
    pub fn items(&self) -> &[TagSuggestion] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TagSuggestion> {
        self.items.get(index)
    }

    pub fn highlighted_index(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn highlighted(&self) -> Option<&TagSuggestion> {
        self.highlighted.and_then(|i| self.items.get(i))
    }

    /// Move the highlight down, wrapping to the top
    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.highlighted = match self.highlighted {
            Some(i) if i + 1 < self.items.len() => Some(i + 1),
            _ => Some(0),
        };
    }

    /// Move the highlight up, wrapping to the bottom
    pub fn select_previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.highlighted = match self.highlighted {
            Some(i) if i > 0 => Some(i - 1),
            _ => Some(self.items.len() - 1),
        };
    }

    fn replace(&mut self, items: Vec<TagSuggestion>) {
        self.items = items;
        self.highlighted = None;
    }

    fn clear(&mut self) {
        self.replace(Vec::new());
    }
}

/// Formula editing session over a tag resolver
#[derive(Debug)]
pub struct Editor<R: TagResolver> {
    store: FormulaStore,
    resolver: R,
    input: String,
    error: Option<EditorError>,
    suggestions: SuggestionList,
    lookups: LookupSequencer,
}

impl<R: TagResolver> Editor<R> {
    /// Start with an empty formula
    pub fn new(resolver: R) -> Self {
        Self::with_store(FormulaStore::new(), resolver)
    }

    /// Resume editing an existing formula
    pub fn with_store(store: FormulaStore, resolver: R) -> Self {
        let mut editor = Self {
            store,
            resolver,
            input: String::new(),
            error: None,
            suggestions: SuggestionList::default(),
            lookups: LookupSequencer::new(),
        };
        editor.recalculate();
        editor
    }

    // === Accessors ===

    pub fn formula(&self) -> &[Token] {
        self.store.formula()
    }

    pub fn store(&self) -> &FormulaStore {
        &self.store
    }

    pub fn into_store(self) -> FormulaStore {
        self.store
    }

    /// Text typed but not yet committed
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn error(&self) -> Option<&EditorError> {
        self.error.as_ref()
    }

    /// Last finite result; `None` while the formula is empty or invalid
    pub fn result(&self) -> Option<f64> {
        self.store.result()
    }

    pub fn suggestions(&self) -> &SuggestionList {
        &self.suggestions
    }

    pub fn suggestions_mut(&mut self) -> &mut SuggestionList {
        &mut self.suggestions
    }

    /// Observe the formula store; listeners see each edit with its result
    pub fn subscribe(&mut self, listener: impl FnMut(&FormulaStore) + 'static) {
        self.store.subscribe(listener);
    }

    // === Input ===

    /// Replace the pending text and refresh suggestions for it
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        let query = self.input.clone();
        self.lookup_now(query);
    }

    /// Commit the pending text as a number or tag
    ///
    /// Finite numeric literals become number tokens, anything else a tag.
    /// Blank input is ignored.
    pub fn commit_input(&mut self) -> Result<(), EditorError> {
        let text = self.input.trim();
        if text.is_empty() {
            return Ok(());
        }

        let kind = if is_number_literal(text) {
            TokenKind::Number
        } else {
            TokenKind::Tag
        };
        let token = Token::new(kind, text);

        self.append(token)?;
        self.input.clear();
        self.suggestions.clear();
        Ok(())
    }

    /// Commit any pending text, then append an operator
    pub fn push_operator(&mut self, op: Operator) -> Result<(), EditorError> {
        self.commit_input()?;
        self.append(Token::operator(op))
    }

    /// Append the suggestion at `index` as a tag
    ///
    /// Out-of-range indices are ignored.
    pub fn select_suggestion(&mut self, index: usize) -> Result<(), EditorError> {
        let Some(suggestion) = self.suggestions.get(index) else {
            return Ok(());
        };
        let token = Token::tag(suggestion.name.clone()).with_id(suggestion.id.clone());

        self.append(token)?;
        self.input.clear();
        self.suggestions.clear();
        Ok(())
    }

    /// Append the highlighted suggestion, if any
    pub fn select_highlighted(&mut self) -> Result<(), EditorError> {
        match self.suggestions.highlighted_index() {
            Some(index) => self.select_suggestion(index),
            None => Ok(()),
        }
    }

    /// Delete the last typed character, or the last token when nothing is typed
    pub fn backspace(&mut self) {
        if self.input.pop().is_some() {
            let query = self.input.clone();
            self.lookup_now(query);
            return;
        }

        if !self.store.is_empty() {
            self.update_store(FormulaStore::remove_last);
        }
    }

    /// Rename the tag at `index`
    ///
    /// Returns `false` when there is no tag at `index`.
    pub fn edit_tag(&mut self, index: usize, text: impl Into<String>) -> bool {
        if !self.store.get(index).map_or(false, Token::is_tag) {
            return false;
        }
        let text = text.into();
        self.lookup_now(text.clone());
        self.update_store(|store| store.update_element(index, text));
        true
    }

    /// Finish renaming the tag at `index`, dropping it if left blank
    pub fn finish_tag_edit(&mut self, index: usize) {
        let blank = self
            .store
            .get(index)
            .map_or(false, |t| t.is_tag() && t.value.trim().is_empty());
        if blank {
            self.update_store(|store| store.remove_at_index(index));
        }
        self.suggestions.clear();
    }

    /// Drop the formula, pending text and error
    pub fn clear(&mut self) {
        self.store.clear();
        self.input.clear();
        self.error = None;
        self.suggestions.clear();
    }

    // === Suggestions ===

    /// Start a suggestion lookup for the pending text
    ///
    /// The returned ticket is passed back to
    /// [`receive_suggestions`](Self::receive_suggestions) with the response.
    pub fn request_suggestions(&mut self) -> LookupTicket {
        self.lookups.begin(self.input.clone())
    }

    /// Apply a lookup response; stale responses are dropped
    ///
    /// Returns whether the suggestions were applied.
    pub fn receive_suggestions(
        &mut self,
        ticket: &LookupTicket,
        suggestions: Vec<TagSuggestion>,
    ) -> bool {
        match self.lookups.complete(ticket, suggestions) {
            Some(items) => {
                self.suggestions.replace(items);
                true
            }
            None => false,
        }
    }

    /// Look up suggestions for the pending text against the owned resolver
    pub fn refresh_suggestions(&mut self) {
        let query = self.input.clone();
        self.lookup_now(query);
    }

    fn lookup_now(&mut self, query: String) {
        let ticket = self.lookups.begin(query);
        let items = self.resolver.lookup(&ticket.query);
        self.receive_suggestions(&ticket, items);
    }

    // === Evaluation ===

    fn append(&mut self, token: Token) -> Result<(), EditorError> {
        if let Err(e) = admit_token(self.store.formula(), &token) {
            tracing::debug!(kind = %token.kind, value = %token.value, "token rejected: {}", e);
            self.error = Some(e.into());
            return Err(e.into());
        }

        self.update_store(|store| store.add_element(token));
        Ok(())
    }

    /// Recompute the result and error from the current formula
    pub fn recalculate(&mut self) {
        self.update_store(|_| {});
    }

    /// Mutate the store and recompute its result as one change
    fn update_store(&mut self, f: impl FnOnce(&mut FormulaStore)) {
        let resolver = &self.resolver;
        let error = &mut self.error;
        self.store.batch(|store| {
            f(store);
            *error = compute_result(store, resolver);
        });
    }
}

/// Store the formula's result, returning the error to show instead
fn compute_result<R: TagResolver>(
    store: &mut FormulaStore,
    resolver: &R,
) -> Option<EditorError> {
    if store.is_empty() {
        store.set_result(None);
        return None;
    }

    if let Some(e) = structure_error(store.formula(), resolver) {
        store.set_result(None);
        return Some(EditorError::InvalidStructure(e));
    }

    match evaluate_formula(store.formula(), resolver) {
        Evaluation::Value(value) => {
            store.set_result(Some(value));
            None
        }
        Evaluation::Invalid(e) => {
            store.set_result(None);
            Some(EditorError::InvalidResult(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TagCatalog;

    fn editor() -> Editor<TagCatalog> {
        Editor::new(TagCatalog::sample())
    }

    #[test]
    fn test_suggestion_highlight_wraps() {
        let mut list = SuggestionList::default();
        list.select_next();
        assert_eq!(list.highlighted_index(), None);

        list.replace(TagCatalog::sample().lookup(""));
        list.select_previous();
        assert_eq!(list.highlighted_index(), Some(4));
        list.select_next();
        assert_eq!(list.highlighted_index(), Some(0));
        list.select_next();
        assert_eq!(list.highlighted().map(|t| t.name.as_str()), Some("name 2"));
    }

    #[test]
    fn test_commit_classifies_input() {
        let mut ed = editor();
        ed.set_input(" 12.5 ");
        ed.commit_input().unwrap();
        assert_eq!(ed.formula(), &[Token::number("12.5")][..]);
        assert_eq!(ed.input(), "");

        ed.push_operator(Operator::Multiply).unwrap();
        ed.set_input("name 2");
        ed.commit_input().unwrap();
        assert_eq!(ed.formula()[2], Token::tag("name 2"));
        assert_eq!(ed.result(), Some(200.0));
    }

    #[test]
    fn test_rejection_keeps_formula_and_input() {
        let mut ed = editor();
        ed.set_input("1");
        ed.commit_input().unwrap();
        ed.set_input("2");

        let err = ed.commit_input().unwrap_err();
        assert_eq!(err, EditorError::Rejected(AdmissionError::ConsecutiveNumbers));
        assert_eq!(
            ed.error().map(ToString::to_string).as_deref(),
            Some("Cannot add consecutive numbers without an operator")
        );
        assert_eq!(ed.formula().len(), 1);
        assert_eq!(ed.input(), "2");
    }

    #[test]
    fn test_edit_tag_only_touches_tags() {
        let mut ed = editor();
        ed.set_input("name 1");
        ed.commit_input().unwrap();
        ed.push_operator(Operator::Add).unwrap();

        assert!(!ed.edit_tag(1, "name 2"));
        assert!(ed.edit_tag(0, "name 3"));
        assert_eq!(ed.formula()[0], Token::tag("name 3"));
        assert_eq!(ed.suggestions().len(), 1);
    }
}
