//! Formula store
//!
//! [`FormulaStore`] is the single source of truth for what has been entered:
//! the token sequence, the cursor and the last computed result. It is owned
//! by the editing surface and mutated synchronously.
//!
//! Out-of-range indices are ignored rather than reported, so no mutation can
//! fail. Ignored mutations leave the revision untouched and notify nobody.
//! Mutations made inside [`FormulaStore::batch`] notify listeners once, after
//! the batch completes.

use crate::token::Token;
use std::fmt;

type Listener = Box<dyn FnMut(&FormulaStore)>;

/// Ordered token sequence plus cursor and result
#[derive(Default)]
pub struct FormulaStore {
    formula: Vec<Token>,
    cursor_index: usize,
    result: Option<f64>,
    revision: u64,
    listeners: Vec<Listener>,
    batch_depth: usize,
    pending: bool,
}

impl FormulaStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `formula` with the cursor at its end
    pub fn with_formula(formula: Vec<Token>) -> Self {
        let cursor_index = formula.len();
        Self {
            formula,
            cursor_index,
            ..Self::default()
        }
    }

    // === Accessors ===

    pub fn formula(&self) -> &[Token] {
        &self.formula
    }

    pub fn cursor_index(&self) -> usize {
        self.cursor_index
    }

    pub fn result(&self) -> Option<f64> {
        self.result
    }

    pub fn len(&self) -> usize {
        self.formula.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formula.is_empty()
    }

    pub fn last(&self) -> Option<&Token> {
        self.formula.last()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.formula.get(index)
    }

    /// Number of effective changes applied so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Register a listener called after every effective change
    pub fn subscribe(&mut self, listener: impl FnMut(&FormulaStore) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Apply several mutations, notifying listeners once at the end
    ///
    /// Each mutation still bumps the revision. Nested batches notify when
    /// the outermost one finishes.
    pub fn batch<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.batch_depth += 1;
        let out = f(self);
        self.batch_depth -= 1;

        if self.batch_depth == 0 && self.pending {
            self.pending = false;
            self.notify();
        }
        out
    }

    // === Mutations ===

    /// Replace the whole sequence
    pub fn set_formula(&mut self, formula: Vec<Token>) {
        self.formula = formula;
        self.changed();
    }

    /// Append a token; the cursor moves past it
    pub fn add_element(&mut self, token: Token) {
        self.cursor_index = self.formula.len() + 1;
        self.formula.push(token);
        self.changed();
    }

    /// Insert a token before `index`, clamping `index` to the sequence length
    pub fn add_element_at_index(&mut self, token: Token, index: usize) {
        let index = index.min(self.formula.len());
        self.formula.insert(index, token);
        self.cursor_index = index + 1;
        self.changed();
    }

    /// Drop the final token, if any
    pub fn remove_last(&mut self) {
        if self.formula.pop().is_none() {
            return;
        }
        self.cursor_index = self.formula.len();
        self.changed();
    }

    /// Drop the token at `index`, if it exists
    pub fn remove_at_index(&mut self, index: usize) {
        if index >= self.formula.len() {
            return;
        }
        self.formula.remove(index);
        self.cursor_index = index;
        self.changed();
    }

    /// Replace the value of the token at `index`, keeping its kind and id
    pub fn update_element(&mut self, index: usize, value: impl Into<String>) {
        let Some(token) = self.formula.get_mut(index) else {
            return;
        };
        token.value = value.into();
        self.changed();
    }

    pub fn set_cursor_index(&mut self, index: usize) {
        self.cursor_index = index;
        self.changed();
    }

    pub fn set_result(&mut self, result: Option<f64>) {
        self.result = result;
        self.changed();
    }

    /// Reset to an empty formula with no result
    pub fn clear(&mut self) {
        self.formula.clear();
        self.cursor_index = 0;
        self.result = None;
        self.changed();
    }

    fn changed(&mut self) {
        self.revision += 1;
        tracing::trace!(
            revision = self.revision,
            len = self.formula.len(),
            cursor = self.cursor_index,
            "formula store changed"
        );

        if self.batch_depth > 0 {
            self.pending = true;
            return;
        }
        self.notify();
    }

    fn notify(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        // Listeners get a shared view of the store, so park them while they run
        let mut listeners = std::mem::take(&mut self.listeners);
        for listener in listeners.iter_mut() {
            listener(self);
        }
        listeners.append(&mut self.listeners);
        self.listeners = listeners;
    }
}

impl Clone for FormulaStore {
    /// Clones the state only; listeners stay with the original
    fn clone(&self) -> Self {
        Self {
            formula: self.formula.clone(),
            cursor_index: self.cursor_index,
            result: self.result,
            revision: self.revision,
            listeners: Vec::new(),
            batch_depth: 0,
            pending: false,
        }
    }
}

impl fmt::Debug for FormulaStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulaStore")
            .field("formula", &self.formula)
            .field("cursor_index", &self.cursor_index)
            .field("result", &self.result)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Operator;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sample() -> FormulaStore {
        let mut store = FormulaStore::new();
        store.add_element(Token::number("1"));
        store.add_element(Token::operator(Operator::Add));
        store.add_element(Token::tag("name 1"));
        store
    }

    #[test]
    fn test_add_element_moves_cursor() {
        let store = sample();
        assert_eq!(store.len(), 3);
        assert_eq!(store.cursor_index(), 3);
        assert_eq!(store.last(), Some(&Token::tag("name 1")));
    }

    #[test]
    fn test_add_element_at_index() {
        let mut store = sample();
        store.add_element_at_index(Token::operator(Operator::OpenParen), 0);
        assert_eq!(store.get(0).map(|t| t.value.as_str()), Some("("));
        assert_eq!(store.cursor_index(), 1);

        // Past the end clamps to an append
        store.add_element_at_index(Token::operator(Operator::CloseParen), 99);
        assert_eq!(store.len(), 5);
        assert_eq!(store.last().map(|t| t.value.as_str()), Some(")"));
        assert_eq!(store.cursor_index(), 5);
    }

    #[test]
    fn test_remove_last() {
        let mut store = sample();
        store.remove_last();
        assert_eq!(store.len(), 2);
        assert_eq!(store.cursor_index(), 2);

        let mut empty = FormulaStore::new();
        let before = empty.revision();
        empty.remove_last();
        assert_eq!(empty.cursor_index(), 0);
        assert_eq!(empty.revision(), before);
    }

    #[test]
    fn test_remove_at_index() {
        let mut store = sample();
        store.remove_at_index(1);
        assert_eq!(
            store.formula(),
            &[Token::number("1"), Token::tag("name 1")][..]
        );
        assert_eq!(store.cursor_index(), 1);

        let revision = store.revision();
        store.remove_at_index(2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.cursor_index(), 1);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_update_element_keeps_kind() {
        let mut store = sample();
        store.update_element(2, "name 2");
        assert_eq!(store.get(2), Some(&Token::tag("name 2")));

        let revision = store.revision();
        store.update_element(10, "x");
        assert_eq!(store.len(), 3);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_update_element_keeps_id() {
        let mut store = FormulaStore::new();
        store.add_element(Token::tag("name 1").with_id("1"));
        store.update_element(0, "name 3");
        assert_eq!(store.get(0), Some(&Token::tag("name 3").with_id("1")));
    }

    #[test]
    fn test_clear() {
        let mut store = sample();
        store.set_result(Some(10.0));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.cursor_index(), 0);
        assert_eq!(store.result(), None);
    }

    #[test]
    fn test_listeners_notified_on_change_only() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = FormulaStore::new();
        let sink = Rc::clone(&seen);
        store.subscribe(move |s| sink.borrow_mut().push(s.len()));

        store.add_element(Token::number("7"));
        store.remove_at_index(5);
        store.add_element(Token::operator(Operator::Multiply));
        store.remove_last();

        assert_eq!(*seen.borrow(), vec![1, 2, 1]);
    }

    #[test]
    fn test_batch_notifies_once_with_final_state() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = FormulaStore::new();
        let sink = Rc::clone(&seen);
        store.subscribe(move |s| sink.borrow_mut().push((s.len(), s.result())));

        let revision = store.revision();
        store.batch(|s| {
            s.add_element(Token::number("4"));
            s.batch(|s| s.set_result(Some(4.0)));
        });

        assert_eq!(*seen.borrow(), vec![(1, Some(4.0))]);
        assert_eq!(store.revision(), revision + 2);

        // A batch with no effective change stays silent
        store.batch(|s| s.remove_at_index(9));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_clone_drops_listeners() {
        let mut store = sample();
        store.subscribe(|_| {});
        let copy = store.clone();
        assert_eq!(copy.formula(), store.formula());
        assert!(format!("{:?}", copy).contains("listeners: 0"));
    }

    fn token_strategy() -> impl Strategy<Value = Token> {
        prop_oneof![
            (0u32..1000).prop_map(|n| Token::number(n.to_string())),
            prop::sample::select(Operator::ALL.to_vec()).prop_map(Token::operator),
            "[a-z]{1,6}".prop_map(Token::tag),
        ]
    }

    proptest! {
        #[test]
        fn remove_last_undoes_add_element(
            tokens in prop::collection::vec(token_strategy(), 0..12),
            extra in token_strategy(),
        ) {
            let mut store = FormulaStore::new();
            for t in tokens {
                store.add_element(t);
            }
            let formula = store.formula().to_vec();
            let cursor = store.cursor_index();

            store.add_element(extra);
            store.remove_last();

            prop_assert_eq!(store.formula(), &formula[..]);
            prop_assert_eq!(store.cursor_index(), cursor);
        }
    }
}
