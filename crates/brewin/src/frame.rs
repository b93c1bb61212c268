//! A function activation: its own variable scope (rooted at the global
//! scope, not at the caller's locals — Brewin scoping is lexical), the
//! function namespace visible from it, and the in-flight return value once
//! a `return` statement has fired.

use std::cell::RefCell;
use std::rc::Rc;

use crate::function::ReturnType;
use crate::function_scope::FunctionScope;
use crate::scope::VariableScope;
use crate::value::Value;

#[derive(Debug)]
pub struct Frame {
    pub variables: Rc<RefCell<VariableScope>>,
    pub functions: Rc<FunctionScope>,
    pub return_value: Value,
    pub has_returned: bool,
    /// The enclosing function's declared return type, `None` for v1/v2
    /// (untyped) and for the synthetic frame a thunk is forced in. Used
    /// only to reject `return <expr>;` inside a `void` function early.
    pub return_type: Option<ReturnType>,
}

impl Frame {
    pub fn new(variables: Rc<RefCell<VariableScope>>, functions: Rc<FunctionScope>) -> Self {
        Self {
            variables,
            functions,
            return_value: Value::Nil,
            has_returned: false,
            return_type: None,
        }
    }

    pub fn with_return_type(
        variables: Rc<RefCell<VariableScope>>,
        functions: Rc<FunctionScope>,
        return_type: Option<ReturnType>,
    ) -> Self {
        Self {
            variables,
            functions,
            return_value: Value::Nil,
            has_returned: false,
            return_type,
        }
    }
}
