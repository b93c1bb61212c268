//! The lexical variable scope chain: one `HashMap` per block/function frame,
//! parented at the enclosing scope (ultimately the global scope), searched
//! outward on read and on plain assignment (`x = ...` climbs to wherever
//! `x` was declared; it never shadows).

use std::cell::RefCell;
use std::rc::Rc;

use ahash::AHashMap;

use crate::error::{BrewinError, Result};
use crate::types::DeclaredType;
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct VarCell {
    pub value: Value,
    pub declared_type: Option<DeclaredType>,
}

#[derive(Debug)]
pub struct VariableScope {
    vars: AHashMap<String, VarCell>,
    parent: Option<Rc<RefCell<VariableScope>>>,
}

impl VariableScope {
    pub fn new(parent: Option<Rc<RefCell<VariableScope>>>) -> Rc<RefCell<VariableScope>> {
        Rc::new(RefCell::new(VariableScope {
            vars: AHashMap::new(),
            parent,
        }))
    }

    /// Declares `name` in this frame only. A redeclaration in the same
    /// frame is a NAME error; shadowing an outer frame's variable of the
    /// same name is allowed (a new block introduces a fresh frame).
    pub fn declare(
        this: &Rc<RefCell<Self>>,
        name: &str,
        declared_type: Option<DeclaredType>,
        default_value: Value,
    ) -> Result<()> {
        let mut scope = this.borrow_mut();
        if scope.vars.contains_key(name) {
            return Err(BrewinError::name(format!(
                "variable '{name}' is already defined in this scope"
            )));
        }
        scope.vars.insert(
            name.to_owned(),
            VarCell {
                value: default_value,
                declared_type,
            },
        );
        Ok(())
    }

    /// Assigns `name`, climbing the parent chain to wherever it was
    /// declared. A NAME error if no enclosing frame declares it.
    pub fn assign(this: &Rc<RefCell<Self>>, name: &str, value: Value) -> Result<()> {
        Self::write_with(this, name, move |cell| cell.value = value)
    }

    /// Runs `f` against the `VarCell` wherever `name` is declared in the
    /// chain, without cloning the current value first. Used by plain
    /// assignment and by thunk-force memoization, which both need to
    /// mutate a cell found by walking the chain.
    pub fn write_with<R>(
        this: &Rc<RefCell<Self>>,
        name: &str,
        f: impl FnOnce(&mut VarCell) -> R,
    ) -> Result<R> {
        let mut scope = this.borrow_mut();
        if let Some(cell) = scope.vars.get_mut(name) {
            return Ok(f(cell));
        }
        let parent = scope.parent.clone();
        drop(scope);
        match parent {
            Some(parent) => Self::write_with(&parent, name, f),
            None => Err(BrewinError::name(format!("variable '{name}' is not defined"))),
        }
    }

    pub fn lookup(this: &Rc<RefCell<Self>>, name: &str) -> Result<Value> {
        let scope = this.borrow();
        if let Some(cell) = scope.vars.get(name) {
            return Ok(cell.value.clone());
        }
        let parent = scope.parent.clone();
        drop(scope);
        match parent {
            Some(parent) => Self::lookup(&parent, name),
            None => Err(BrewinError::name(format!("variable '{name}' is not defined"))),
        }
    }

    pub fn declared_type(this: &Rc<RefCell<Self>>, name: &str) -> Result<Option<DeclaredType>> {
        let scope = this.borrow();
        if let Some(cell) = scope.vars.get(name) {
            return Ok(cell.declared_type.clone());
        }
        let parent = scope.parent.clone();
        drop(scope);
        match parent {
            Some(parent) => Self::declared_type(&parent, name),
            None => Err(BrewinError::name(format!("variable '{name}' is not defined"))),
        }
    }

    pub fn exists(this: &Rc<RefCell<Self>>, name: &str, recursive: bool) -> bool {
        let scope = this.borrow();
        if scope.vars.contains_key(name) {
            return true;
        }
        if !recursive {
            return false;
        }
        match scope.parent.clone() {
            Some(parent) => {
                drop(scope);
                Self::exists(&parent, name, true)
            }
            None => false,
        }
    }

    /// Recursively clones the whole chain up to (and including) the global
    /// scope, for a v4 thunk's captured-scope snapshot. Bounded by lexical
    /// nesting depth within one function, not by call-stack depth: a
    /// frame's scope chain runs block -> function locals -> global, never
    /// through a caller's frames.
    pub fn deep_clone(this: &Rc<RefCell<Self>>) -> Rc<RefCell<Self>> {
        let scope = this.borrow();
        let cloned_parent = scope.parent.as_ref().map(Self::deep_clone);
        Rc::new(RefCell::new(VariableScope {
            vars: scope.vars.clone(),
            parent: cloned_parent,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redeclaring_in_the_same_frame_is_a_name_error() {
        let scope = VariableScope::new(None);
        VariableScope::declare(&scope, "x", None, Value::Int(0)).unwrap();
        let err = VariableScope::declare(&scope, "x", None, Value::Int(1)).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Name);
    }

    #[test]
    fn assign_climbs_to_the_declaring_frame() {
        let global = VariableScope::new(None);
        VariableScope::declare(&global, "x", None, Value::Int(0)).unwrap();
        let block = VariableScope::new(Some(Rc::clone(&global)));
        VariableScope::assign(&block, "x", Value::Int(5)).unwrap();
        assert_eq!(VariableScope::lookup(&global, "x").unwrap().as_int(), Some(5));
    }

    #[test]
    fn a_block_scope_can_shadow_an_outer_variable() {
        let global = VariableScope::new(None);
        VariableScope::declare(&global, "x", None, Value::Int(0)).unwrap();
        let block = VariableScope::new(Some(Rc::clone(&global)));
        VariableScope::declare(&block, "x", None, Value::Int(9)).unwrap();
        assert_eq!(VariableScope::lookup(&block, "x").unwrap().as_int(), Some(9));
        assert_eq!(VariableScope::lookup(&global, "x").unwrap().as_int(), Some(0));
    }

    #[test]
    fn looking_up_an_undeclared_variable_is_a_name_error() {
        let scope = VariableScope::new(None);
        let err = VariableScope::lookup(&scope, "missing").unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Name);
    }

    #[test]
    fn deep_clone_snapshots_values_independently_of_the_source() {
        let global = VariableScope::new(None);
        VariableScope::declare(&global, "x", None, Value::Int(1)).unwrap();
        let clone = VariableScope::deep_clone(&global);
        VariableScope::assign(&global, "x", Value::Int(2)).unwrap();
        assert_eq!(VariableScope::lookup(&clone, "x").unwrap().as_int(), Some(1));
    }
}
