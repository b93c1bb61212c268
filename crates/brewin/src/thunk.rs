//! v4 call-by-need bindings: a thunk captures an expression and the
//! enclosing scope chain at the moment it's bound (a deep-cloned snapshot,
//! so later mutation of those names doesn't change what the thunk sees).
//! It's evaluated the first time the cell holding it is read; memoization
//! lives on that cell (see `CodeBlock::force_cell`), not on the thunk
//! itself, so the same thunk expression bound into two different cells
//! (e.g. via two independent `deep_clone` snapshots) forces independently
//! in each — always to the same deterministic result, since both read from
//! their own captured scope.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::Expr;
use crate::scope::VariableScope;

#[derive(Debug)]
pub struct Thunk {
    pub captured_scope: Rc<RefCell<VariableScope>>,
    pub expr: Expr,
}

impl Thunk {
    pub fn new(captured_scope: Rc<RefCell<VariableScope>>, expr: Expr) -> Self {
        Self {
            captured_scope,
            expr,
        }
    }
}
