// File: src/interpreter/environment.rs
//
// Lexical environment frames for the Pithon interpreter.
// A frame maps names to values and links to an optional parent frame,
// forming a singly-linked chain from the innermost scope to the root.
//
// Frames are shared: a function call's frame is parented to the frame its
// closure captured, and any number of closures may hold the same frame.

use super::value::Value;
use crate::errors::{find_closest_match, PithonError, PithonResult};
use ahash::AHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

struct Scope {
    bindings: AHashMap<String, Value>,
    parent: Option<Frame>,
}

/// A handle to one lexical scope. Cloning the handle shares the scope.
///
/// # Examples
///
/// ```
/// use pithon::interpreter::{Frame, Value};
///
/// let root = Frame::root();
/// root.insert("x", Value::Number(1.0));
///
/// let call = Frame::new_child(&root);
/// call.insert("x", Value::Number(2.0));          // shadows, root untouched
/// assert_eq!(call.lookup("x").unwrap(), Value::Number(2.0));
/// assert_eq!(root.lookup("x").unwrap(), Value::Number(1.0));
/// ```
#[derive(Clone)]
pub struct Frame(Rc<RefCell<Scope>>);

impl Frame {
    /// Creates a frame with no parent
    pub fn root() -> Self {
        Frame(Rc::new(RefCell::new(Scope { bindings: AHashMap::new(), parent: None })))
    }

    /// Creates a frame whose single ancestor is `parent`
    pub fn new_child(parent: &Frame) -> Self {
        Frame(Rc::new(RefCell::new(Scope {
            bindings: AHashMap::new(),
            parent: Some(parent.clone()),
        })))
    }

    /// Looks a name up, walking from this frame outward to the root
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut current = Some(self.clone());
        while let Some(frame) = current {
            let scope = frame.0.borrow();
            if let Some(value) = scope.bindings.get(name) {
                return Some(value.clone());
            }
            current = scope.parent.clone();
        }
        None
    }

    /// Like [`Frame::get`], but an unresolved name is an `UnboundName` error
    /// carrying a spelling suggestion when one is close enough.
    pub fn lookup(&self, name: &str) -> PithonResult<Value> {
        match self.get(name) {
            Some(value) => Ok(value),
            None => {
                let mut err = PithonError::unbound_name(name);
                let candidates = self.visible_names();
                if let Some(suggestion) = find_closest_match(name, &candidates) {
                    err = err.with_suggestion(suggestion.to_string());
                }
                Err(err)
            }
        }
    }

    /// Inserts or overwrites `name` in this frame only
    pub fn insert(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().bindings.insert(name.into(), value);
    }

    /// Whether this frame itself (not an ancestor) binds `name`
    pub fn defines(&self, name: &str) -> bool {
        self.0.borrow().bindings.contains_key(name)
    }

    pub fn parent(&self) -> Option<Frame> {
        self.0.borrow().parent.clone()
    }

    /// Bindings of this frame only, sorted by name
    pub fn local_bindings(&self) -> Vec<(String, Value)> {
        let mut bindings: Vec<(String, Value)> = self
            .0
            .borrow()
            .bindings
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        bindings.sort_by(|a, b| a.0.cmp(&b.0));
        bindings
    }

    /// Every identifier-like name reachable from this frame
    pub fn visible_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut current = Some(self.clone());
        while let Some(frame) = current {
            let scope = frame.0.borrow();
            names.extend(
                scope
                    .bindings
                    .keys()
                    .filter(|name| name.starts_with(|c: char| c.is_alphabetic() || c == '_'))
                    .cloned(),
            );
            current = scope.parent.clone();
        }
        names.sort();
        names.dedup();
        names
    }

    /// Whether two handles refer to the same frame
    pub fn ptr_eq(&self, other: &Frame) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.0.borrow();
        let mut names: Vec<&String> = scope.bindings.keys().collect();
        names.sort();
        f.debug_struct("Frame")
            .field("names", &names)
            .field("has_parent", &scope.parent.is_some())
            .finish()
    }
}
