//! v3+ struct instances. A struct value is either "live" (backed by a field
//! scope) or the typed-NIL value for its struct type (`fields: None`) —
//! what you get from `var x: Point` before any `new Point` is assigned, or
//! from assigning literal `nil` to a struct-typed variable.

use std::cell::RefCell;
use std::rc::Rc;

use crate::scope::VariableScope;

#[derive(Debug)]
pub struct StructInstance {
    pub struct_type: Rc<str>,
    pub fields: Option<Rc<RefCell<VariableScope>>>,
}

impl StructInstance {
    pub fn new_live(struct_type: Rc<str>, fields: Rc<RefCell<VariableScope>>) -> Self {
        Self {
            struct_type,
            fields: Some(fields),
        }
    }

    pub fn new_nil(struct_type: Rc<str>) -> Self {
        Self {
            struct_type,
            fields: None,
        }
    }

    pub fn is_nil(&self) -> bool {
        self.fields.is_none()
    }
}
