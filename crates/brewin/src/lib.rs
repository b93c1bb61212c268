//! Tree-walking evaluator core for Brewin. See the crate README for scope.

mod ast;
mod block;
mod builtins;
mod callable;
mod dialect;
mod driver;
mod element;
mod error;
mod frame;
mod function;
mod function_scope;
mod io;
mod operators;
mod scope;
mod struct_value;
mod thunk;
mod types;
mod value;

pub use ast::{BinOp, Expr, FieldDef, FuncDef, Param as AstParam, Program, Stmt, StmtKind, StructDef, UnOp};
pub use block::Limits;
pub use dialect::Dialect;
pub use driver::{run, run_with_limits};
pub use element::{AttrValue, Element};
pub use error::{BrewinError, ErrorKind, Result};
pub use io::{CollectingSink, InputSource, NoOpSink, OutputSink, ScriptedSource, StdIoSink, StdIoSource};
pub use value::Value;
