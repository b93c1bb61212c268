//! The function namespace: lookup is keyed by `(name, arity)` so that
//! overloads distinguished only by parameter count resolve correctly, with
//! a variadic sentinel arity for built-ins like `print` that accept any
//! number of arguments.

use std::rc::Rc;

use ahash::AHashMap;

use crate::callable::Callable;
use crate::error::{BrewinError, Result};

/// Sentinel arity for a variadic function, stored alongside (not instead
/// of) any exact-arity overloads so lookup can fall back to it.
pub const VARIADIC: i64 = -1;

#[derive(Debug, Default)]
pub struct FunctionScope {
    functions: AHashMap<(String, i64), Rc<Callable>>,
    parent: Option<Rc<FunctionScope>>,
}

impl FunctionScope {
    pub fn new(parent: Option<Rc<FunctionScope>>) -> Self {
        Self {
            functions: AHashMap::new(),
            parent,
        }
    }

    pub fn add(&mut self, name: impl Into<String>, arity: i64, callable: Rc<Callable>) {
        self.functions.insert((name.into(), arity), callable);
    }

    /// Resolves `name` called with `argc` arguments: first an exact-arity
    /// match, then a variadic entry, then the parent scope. Kept recursive
    /// for fidelity to the spec's described lookup, even though in
    /// practice Brewin never nests function scopes past the single global
    /// level.
    pub fn lookup(&self, name: &str, argc: usize) -> Result<Rc<Callable>> {
        if let Some(f) = self.functions.get(&(name.to_owned(), argc as i64)) {
            return Ok(Rc::clone(f));
        }
        if let Some(f) = self.functions.get(&(name.to_owned(), VARIADIC)) {
            return Ok(Rc::clone(f));
        }
        match &self.parent {
            Some(parent) => parent.lookup(name, argc),
            None => Err(BrewinError::name(format!(
                "function '{name}' taking {argc} argument(s) is not defined"
            ))),
        }
    }

    pub fn exists(&self, name: &str, argc: usize) -> bool {
        self.lookup(name, argc).is_ok()
    }
}
