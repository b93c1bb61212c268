//! Top-level entry point: registers built-ins, user functions, and (v3+)
//! struct types, then invokes `main`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::Program;
use crate::block::{Ctx, Limits};
use crate::callable::{BuiltinKind, Callable};
use crate::dialect::Dialect;
use crate::error::{BrewinError, Result};
use crate::frame::Frame;
use crate::function::FunctionDef;
use crate::function_scope::{FunctionScope, VARIADIC};
use crate::io::{InputSource, OutputSink};
use crate::scope::VariableScope;
use crate::types::TypeRegistry;
use crate::value::Value;

/// Runs a parsed program under `dialect`, using `output`/`input` for the
/// host I/O façade. Returns the program's exit value (`main`'s return
/// value; `Value::Nil` if `main` returns nothing).
pub fn run(
    program: &Program,
    dialect: Dialect,
    output: &mut dyn OutputSink,
    input: &mut dyn InputSource,
) -> Result<Value> {
    run_with_limits(program, dialect, output, input, Limits::default())
}

pub fn run_with_limits(
    program: &Program,
    dialect: Dialect,
    output: &mut dyn OutputSink,
    input: &mut dyn InputSource,
    limits: Limits,
) -> Result<Value> {
    let mut types = TypeRegistry::new();
    if dialect.has_structs() {
        for struct_def in &program.structs {
            types.register_struct(struct_def)?;
        }
    }

    let mut functions = FunctionScope::new(None);
    functions.add("print", VARIADIC, Rc::new(Callable::Builtin(BuiltinKind::Print)));
    functions.add("inputi", 0, Rc::new(Callable::Builtin(BuiltinKind::InputI)));
    functions.add("inputi", 1, Rc::new(Callable::Builtin(BuiltinKind::InputI)));
    functions.add("inputs", 0, Rc::new(Callable::Builtin(BuiltinKind::InputS)));
    functions.add("inputs", 1, Rc::new(Callable::Builtin(BuiltinKind::InputS)));

    for func in &program.functions {
        let resolved = FunctionDef::from_ast(func, dialect, &types)?;
        let arity = resolved.params.len() as i64;
        functions.add(
            resolved.name.clone(),
            arity,
            Rc::new(Callable::User(Rc::new(resolved))),
        );
    }
    let functions = Rc::new(functions);

    if !functions.exists("main", 0) {
        return Err(BrewinError::name("no 'main' function taking 0 arguments is defined"));
    }

    let global_vars = VariableScope::new(None);

    let mut ctx = Ctx {
        dialect,
        types: &types,
        global_vars: Rc::clone(&global_vars),
        global_funcs: Rc::clone(&functions),
        output,
        input,
        call_depth: 0,
        limits,
    };

    let frame = Rc::new(RefCell::new(Frame::new(Rc::clone(&global_vars), Rc::clone(&functions))));
    let mut block = crate::block::CodeBlock::new(&mut ctx, frame);
    let main = functions.lookup("main", 0)?;
    match main.as_ref() {
        Callable::User(_) => block.call_top_level("main", &[]),
        Callable::Builtin(_) => Err(BrewinError::internal("'main' resolved to a builtin")),
    }
}
