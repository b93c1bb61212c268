//! Statement and expression evaluation. `Ctx` threads everything a nested
//! evaluation needs (dialect, type registry, global scopes, I/O, call
//! depth) through explicit parameters instead of a global interpreter
//! singleton, so the same evaluator can run multiple independent programs
//! concurrently in one process if the embedder wants to.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{BinOp, Expr, Stmt, StmtKind, UnOp};
use crate::builtins;
use crate::callable::Callable;
use crate::dialect::Dialect;
use crate::error::{BrewinError, Result};
use crate::frame::Frame;
use crate::function_scope::FunctionScope;
use crate::io::{InputSource, OutputSink};
use crate::operators;
use crate::scope::VariableScope;
use crate::struct_value::StructInstance;
use crate::thunk::Thunk;
use crate::types::TypeRegistry;
use crate::value::Value;

/// How deep the call stack is allowed to go before the evaluator gives up
/// with a controlled `ErrorKind::Internal` instead of letting the host
/// process overflow its own stack. The spec leaves host-level stack
/// overflow as undefined/uncaught; this is strictly optional robustness
/// layered on top, off by default.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_call_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_call_depth: usize::MAX,
        }
    }
}

pub struct Ctx<'a> {
    pub dialect: Dialect,
    pub types: &'a TypeRegistry,
    pub global_vars: Rc<RefCell<VariableScope>>,
    pub global_funcs: Rc<FunctionScope>,
    pub output: &'a mut dyn OutputSink,
    pub input: &'a mut dyn InputSource,
    pub call_depth: usize,
    pub limits: Limits,
}

/// A single function/block activation: the evaluator for one `Vec<Stmt>`
/// body against a `Frame`'s variable scope.
pub struct CodeBlock<'a, 'b> {
    pub ctx: &'a mut Ctx<'b>,
    pub frame: Rc<RefCell<Frame>>,
}

impl<'a, 'b> CodeBlock<'a, 'b> {
    pub fn new(ctx: &'a mut Ctx<'b>, frame: Rc<RefCell<Frame>>) -> Self {
        Self { ctx, frame }
    }

    fn scope(&self) -> Rc<RefCell<VariableScope>> {
        Rc::clone(&self.frame.borrow().variables)
    }

    fn functions(&self) -> Rc<FunctionScope> {
        Rc::clone(&self.frame.borrow().functions)
    }

    /// Runs `statements` in order, stopping early once a `return` has set
    /// the frame's return flag (including one that fired inside a nested
    /// `if`/`for`).
    pub fn run(&mut self, statements: &[Stmt]) -> Result<()> {
        for stmt in statements {
            self.exec_stmt(stmt)?;
            if self.frame.borrow().has_returned {
                break;
            }
        }
        Ok(())
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match &stmt.kind {
            StmtKind::VarDef { name, var_type } => self.exec_vardef(name, var_type.as_deref()),
            StmtKind::Assign { target, expr } => self.exec_assign(target, expr),
            StmtKind::FCall(expr) => self.exec_fcall_stmt(expr),
            StmtKind::If {
                cond,
                then_block,
                else_block,
            } => self.exec_if(cond, then_block, else_block.as_deref()),
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => self.exec_for(init, cond, update, body),
            StmtKind::Return { expr } => self.exec_return(expr.as_ref()),
        }
    }

    /// A call used as a whole statement (`foo();`), as opposed to one
    /// nested inside an expression — the only position from which a
    /// `void`-returning user function may legally be called.
    fn exec_fcall_stmt(&mut self, expr: &Expr) -> Result<()> {
        let Expr::Call { name, args } = expr else {
            return Err(BrewinError::internal("fcall statement wraps a non-call expression"));
        };
        self.eval_call(name, args, true).map(|_| ())
    }

    fn exec_vardef(&mut self, name: &str, var_type: Option<&str>) -> Result<()> {
        let scope = self.scope();
        if self.ctx.dialect.has_typed_scopes() {
            let type_name = var_type.ok_or_else(|| {
                BrewinError::internal(format!("variable '{name}' has no declared type"))
            })?;
            let declared = self.ctx.types.resolve_type(type_name)?;
            let default = self.ctx.types.default_value(&declared);
            VariableScope::declare(&scope, name, Some(declared), default)
        } else {
            VariableScope::declare(&scope, name, None, Value::Int(0))
        }
    }

    /// In v4, an assignment's right-hand side is not evaluated here at all
    /// — it's captured as a thunk (the current scope chain, deep-cloned,
    /// plus the unevaluated expression) and only forced the first time the
    /// assigned name is read. Earlier dialects evaluate eagerly.
    fn exec_assign(&mut self, target: &[String], expr: &Expr) -> Result<()> {
        let value = if self.ctx.dialect.has_thunks() {
            let scope = self.scope();
            Value::Thunk(Rc::new(RefCell::new(Thunk::new(
                VariableScope::deep_clone(&scope),
                expr.clone(),
            ))))
        } else {
            self.eval_expr(expr)?
        };
        match target {
            [] => Err(BrewinError::internal("empty assignment target")),
            [name] => self.assign_simple(name, value),
            [base, path @ ..] => self.assign_path(base, path, value),
        }
    }

    fn assign_simple(&mut self, name: &str, value: Value) -> Result<()> {
        let scope = self.scope();
        // A thunk's value isn't known yet; coercion/type-check happens when
        // it's forced on read instead (see `force_cell`).
        let value = match (VariableScope::declared_type(&scope, name), &value) {
            (_, Value::Thunk(_)) => value,
            (Ok(Some(declared)), _) => self.ctx.types.assign_into(&declared, value)?,
            _ => value,
        };
        VariableScope::assign(&scope, name, value)
    }

    /// `a.b.c = expr`: walks the dotted field path on the live struct
    /// reachable from `a`, assigning into the final field's scope.
    fn assign_path(&mut self, base: &str, path: &[String], value: Value) -> Result<()> {
        let scope = self.scope();
        let mut current = self.force_cell(&scope, base)?;
        for field in &path[..path.len() - 1] {
            current = self.field_scope_read(&current, field)?;
        }
        let last = path.last().expect("path is non-empty by construction");
        let field_scope = self.struct_field_scope(&current)?;
        let declared = VariableScope::declared_type(&field_scope, last)?;
        // A thunk's value isn't known yet; coercion/type-check happens when
        // it's forced on read instead (see `force_cell`).
        let value = match (declared, &value) {
            (_, Value::Thunk(_)) => value,
            (Some(declared), _) => self.ctx.types.assign_into(&declared, value)?,
            (None, _) => value,
        };
        VariableScope::assign(&field_scope, last, value)
    }

    fn struct_field_scope(&self, value: &Value) -> Result<Rc<RefCell<VariableScope>>> {
        match value {
            Value::Struct(s) => {
                let s = s.borrow();
                s.fields
                    .clone()
                    .ok_or_else(|| BrewinError::fault("dereferenced a nil struct"))
            }
            _ => Err(BrewinError::type_("field access on a non-struct value")),
        }
    }

    fn field_scope_read(&mut self, value: &Value, field: &str) -> Result<Value> {
        let scope = self.struct_field_scope(value)?;
        self.force_cell(&scope, field)
    }

    fn exec_if(
        &mut self,
        cond: &Expr,
        then_block: &[Stmt],
        else_block: Option<&[Stmt]>,
    ) -> Result<()> {
        if self.eval_condition(cond)? {
            log::trace!("entering if-block");
            self.run_block(then_block)
        } else if let Some(else_block) = else_block {
            log::trace!("entering else-block");
            self.run_block(else_block)
        } else {
            Ok(())
        }
    }

    fn exec_for(&mut self, init: &Stmt, cond: &Expr, update: &Stmt, body: &[Stmt]) -> Result<()> {
        let outer = self.scope();
        let loop_scope = VariableScope::new(Some(outer));
        let saved = Rc::clone(&self.frame.borrow().variables);
        self.frame.borrow_mut().variables = Rc::clone(&loop_scope);

        let result = (|| -> Result<()> {
            self.exec_stmt(init)?;
            while self.eval_condition(cond)? {
                self.run_block(body)?;
                if self.frame.borrow().has_returned {
                    break;
                }
                self.exec_stmt(update)?;
            }
            Ok(())
        })();

        self.frame.borrow_mut().variables = saved;
        result
    }

    fn run_block(&mut self, statements: &[Stmt]) -> Result<()> {
        let outer = self.scope();
        let block_scope = VariableScope::new(Some(outer));
        let saved = Rc::clone(&self.frame.borrow().variables);
        self.frame.borrow_mut().variables = block_scope;
        let result = self.run(statements);
        self.frame.borrow_mut().variables = saved;
        result
    }

    fn exec_return(&mut self, expr: Option<&Expr>) -> Result<()> {
        if expr.is_some() {
            let is_void = matches!(
                self.frame.borrow().return_type,
                Some(crate::function::ReturnType::Void)
            );
            if is_void {
                return Err(BrewinError::type_(
                    "function declared void cannot return a value",
                ));
            }
        }
        let value = match expr {
            Some(expr) => self.eval_expr(expr)?,
            None => Value::Nil,
        };
        let mut frame = self.frame.borrow_mut();
        frame.return_value = value;
        frame.has_returned = true;
        Ok(())
    }

    fn eval_condition(&mut self, cond: &Expr) -> Result<bool> {
        let value = self.eval_expr(cond)?;
        match value {
            Value::Bool(b) => Ok(b),
            Value::Int(i) if self.ctx.dialect.coerces_bool_from_int() => Ok(i != 0),
            other => Err(BrewinError::type_(format!(
                "condition must be a bool, found {}",
                other.type_name()
            ))),
        }
    }

    /// Invokes a function the way the top-level driver invokes `main`: not
    /// nested inside any expression, so a `void`-declared callee is fine.
    pub fn call_top_level(&mut self, name: &str, args: &[Expr]) -> Result<Value> {
        self.eval_call(name, args, true)
    }

    pub fn eval_expr(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Int(i) => Ok(Value::Int(*i)),
            Expr::Str(s) => Ok(Value::Str(Rc::clone(s))),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Nil => Ok(Value::Nil),
            Expr::Var(path) => self.eval_var(path),
            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right),
            Expr::Unary { op, operand } => self.eval_unary(*op, operand),
            Expr::Call { name, args } => self.eval_call(name, args, false),
            Expr::New { struct_type } => self.eval_new(struct_type),
        }
    }

    fn eval_var(&mut self, path: &[String]) -> Result<Value> {
        let scope = self.scope();
        match path {
            [] => Err(BrewinError::internal("empty variable path")),
            [name] => self.force_cell(&scope, name),
            [base, rest @ ..] => {
                let mut current = self.force_cell(&scope, base)?;
                for field in rest {
                    current = self.field_scope_read(&current, field)?;
                }
                Ok(current)
            }
        }
    }

    /// Reads `name` from `scope`. If the cell holds a thunk, forces it by
    /// evaluating its captured expression in its captured scope, then
    /// overwrites *this cell* (not the thunk) with the concrete value —
    /// per-cell memoization, so a second read of the same cell is free
    /// while an independently bound thunk referencing the same expression
    /// elsewhere still forces on its own. Applies the cell's declared type
    /// (coercion + type-check) now that the value is finally known, since
    /// binding a thunk defers that check until this point.
    fn force_cell(&mut self, scope: &Rc<RefCell<VariableScope>>, name: &str) -> Result<Value> {
        let value = VariableScope::lookup(scope, name)?;
        let Value::Thunk(cell) = value else {
            return Ok(value);
        };
        let (captured_scope, expr) = {
            let thunk = cell.borrow();
            (Rc::clone(&thunk.captured_scope), thunk.expr.clone())
        };
        log::debug!("forcing thunk for '{name}'");
        let frame = Rc::new(RefCell::new(Frame::new(captured_scope, self.functions())));
        let forced = CodeBlock::new(self.ctx, frame).eval_expr(&expr)?;
        let forced = match VariableScope::declared_type(scope, name) {
            Ok(Some(declared)) => self.ctx.types.assign_into(&declared, forced)?,
            _ => forced,
        };
        VariableScope::assign(scope, name, forced.clone())?;
        Ok(forced)
    }

    fn eval_binary(&mut self, op: BinOp, left: &Expr, right: &Expr) -> Result<Value> {
        let left = self.eval_expr(left)?;
        let right = self.eval_expr(right)?;
        operators::apply_binary(op, left, right, self.ctx.dialect)
    }

    fn eval_unary(&mut self, op: UnOp, operand: &Expr) -> Result<Value> {
        let operand = self.eval_expr(operand)?;
        operators::apply_unary(op, operand, self.ctx.dialect)
    }

    fn eval_new(&mut self, struct_type: &str) -> Result<Value> {
        let fields = self.ctx.types.struct_fields(struct_type)?;
        let field_scope = VariableScope::new(Some(Rc::clone(&self.ctx.global_vars)));
        for (name, declared) in fields {
            let default = self.ctx.types.default_value(declared);
            VariableScope::declare(&field_scope, name, Some(declared.clone()), default)?;
        }
        Ok(Value::Struct(Rc::new(RefCell::new(StructInstance::new_live(
            Rc::from(struct_type),
            field_scope,
        )))))
    }

    fn eval_call(&mut self, name: &str, args: &[Expr], as_statement: bool) -> Result<Value> {
        let callable = self.functions().lookup(name, args.len())?;
        if self.ctx.call_depth >= self.ctx.limits.max_call_depth {
            return Err(BrewinError::internal("maximum call depth exceeded"));
        }
        if !as_statement {
            if let Callable::User(def) = callable.as_ref() {
                if matches!(def.return_type, Some(crate::function::ReturnType::Void)) {
                    return Err(BrewinError::type_(format!(
                        "'{name}' is declared void and cannot be used as a value"
                    )));
                }
            }
        }
        match callable.as_ref() {
            Callable::Builtin(kind) => {
                let values = args
                    .iter()
                    .map(|a| self.eval_expr(a))
                    .collect::<Result<Vec<_>>>()?;
                builtins::call(*kind, &values, self.ctx.output, self.ctx.input)
            }
            Callable::User(def) => {
                let caller_scope = self.scope();
                let call_args: Vec<Value> = if self.ctx.dialect.has_thunks() {
                    args.iter()
                        .map(|a| {
                            Value::Thunk(Rc::new(RefCell::new(Thunk::new(
                                VariableScope::deep_clone(&caller_scope),
                                a.clone(),
                            ))))
                        })
                        .collect()
                } else {
                    args.iter()
                        .map(|a| self.eval_expr(a))
                        .collect::<Result<Vec<_>>>()?
                };

                let fn_scope = VariableScope::new(Some(Rc::clone(&self.ctx.global_vars)));
                for (param, value) in def.params.iter().zip(call_args) {
                    // A thunk's value isn't known yet, so type-checking happens
                    // when it's forced on read instead of at bind time.
                    let value = match (&param.declared_type, &value) {
                        (Some(_), Value::Thunk(_)) => value,
                        (Some(declared), _) => self.ctx.types.assign_into(declared, value)?,
                        (None, _) => value,
                    };
                    VariableScope::declare(&fn_scope, &param.name, param.declared_type.clone(), value)?;
                }

                let frame = Rc::new(RefCell::new(Frame::with_return_type(
                    fn_scope,
                    self.functions(),
                    def.return_type.clone(),
                )));
                self.ctx.call_depth += 1;
                let result = CodeBlock::new(self.ctx, Rc::clone(&frame)).run(&def.body);
                self.ctx.call_depth -= 1;
                result?;

                let mut frame = frame.borrow_mut();
                let has_returned = frame.has_returned;
                let return_value = std::mem::replace(&mut frame.return_value, Value::Nil);
                match &def.return_type {
                    Some(crate::function::ReturnType::Typed(declared)) => {
                        if !has_returned {
                            return Err(BrewinError::type_(format!(
                                "'{name}' must return a value of type '{}'",
                                declared.name()
                            )));
                        }
                        Ok(self.ctx.types.assign_into(declared, return_value)?)
                    }
                    _ => Ok(return_value),
                }
            }
        }
    }
}
