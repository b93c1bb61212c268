//! The generic node shape the (out-of-scope) parser emits: an element kind
//! plus a map from attribute name to attribute value. `ast::Program` is
//! lowered from a tree of these; any missing or mistyped attribute is an
//! `ErrorKind::Internal` failure, since it means the parser violated its
//! own contract rather than that the Brewin program is wrong.

use indexmap::IndexMap;

use crate::error::{BrewinError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Str(String),
    Int(i64),
    Bool(bool),
    Node(Box<Element>),
    List(Vec<Element>),
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub kind: String,
    pub attrs: IndexMap<String, AttrValue>,
}

impl Element {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attrs: IndexMap::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        self.attrs.insert(name.into(), value);
        self
    }

    fn missing(&self, name: &str) -> BrewinError {
        BrewinError::internal(format!(
            "element of kind '{}' is missing required attribute '{name}'",
            self.kind
        ))
    }

    fn wrong_type(&self, name: &str, expected: &str) -> BrewinError {
        BrewinError::internal(format!(
            "element of kind '{}' attribute '{name}' is not a {expected}",
            self.kind
        ))
    }

    pub fn get(&self, name: &str) -> Result<&AttrValue> {
        self.attrs.get(name).ok_or_else(|| self.missing(name))
    }

    pub fn get_str(&self, name: &str) -> Result<&str> {
        match self.get(name)? {
            AttrValue::Str(s) => Ok(s.as_str()),
            _ => Err(self.wrong_type(name, "string")),
        }
    }

    pub fn get_int(&self, name: &str) -> Result<i64> {
        match self.get(name)? {
            AttrValue::Int(i) => Ok(*i),
            _ => Err(self.wrong_type(name, "int")),
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        match self.get(name)? {
            AttrValue::Bool(b) => Ok(*b),
            _ => Err(self.wrong_type(name, "bool")),
        }
    }

    pub fn get_node(&self, name: &str) -> Result<&Element> {
        match self.get(name)? {
            AttrValue::Node(n) => Ok(n),
            _ => Err(self.wrong_type(name, "node")),
        }
    }

    /// Like `get_node`, but `AttrValue::None` (an explicitly absent optional
    /// child, e.g. a missing `else` block) is `Ok(None)` rather than an error.
    pub fn get_opt_node(&self, name: &str) -> Result<Option<&Element>> {
        match self.attrs.get(name) {
            None | Some(AttrValue::None) => Ok(None),
            Some(AttrValue::Node(n)) => Ok(Some(n)),
            Some(_) => Err(self.wrong_type(name, "node")),
        }
    }

    pub fn get_list(&self, name: &str) -> Result<&[Element]> {
        match self.get(name)? {
            AttrValue::List(items) => Ok(items.as_slice()),
            _ => Err(self.wrong_type(name, "list")),
        }
    }

    /// Like `get_str`, but treats a missing attribute as `None` rather than
    /// an error — used for optional declared-type annotations.
    pub fn get_opt_str(&self, name: &str) -> Result<Option<&str>> {
        match self.attrs.get(name) {
            None | Some(AttrValue::None) => Ok(None),
            Some(AttrValue::Str(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(self.wrong_type(name, "string")),
        }
    }
}
