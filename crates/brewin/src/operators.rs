//! Binary and unary operator semantics, parameterized by `Dialect`. This is
//! where the handful of genuine version-to-version differences live: `+`'s
//! strictness, and whether `&&`/`||`/`!` expect their operands to already
//! be `Bool` or may coerce an `Int` first.

use std::rc::Rc;

use crate::ast::{BinOp, UnOp};
use crate::dialect::{Dialect, PlusMode};
use crate::error::{BrewinError, Result};
use crate::value::Value;

fn type_err(op: &str, left: &Value, right: &Value) -> BrewinError {
    BrewinError::type_(format!(
        "cannot apply '{op}' to a {} and a {}",
        left.type_name(),
        right.type_name()
    ))
}

fn as_int(v: &Value, op: &str) -> Result<i64> {
    v.as_int()
        .ok_or_else(|| BrewinError::type_(format!("'{op}' expects an int, found {}", v.type_name())))
}

/// Coerces an `Int` to `Bool` (`!= 0`) when the dialect allows it; passes a
/// `Bool` through unchanged; anything else is a TYPE error.
fn as_bool(v: &Value, dialect: Dialect, op: &str) -> Result<bool> {
    match v {
        Value::Bool(b) => Ok(*b),
        Value::Int(i) if dialect.coerces_bool_from_int() => Ok(*i != 0),
        _ => Err(BrewinError::type_(format!(
            "'{op}' expects a bool, found {}",
            v.type_name()
        ))),
    }
}

/// Whether two values of the same primitive tag are equal. Does not handle
/// `Struct`/`Nil` cross-comparison — that lives in `equals`, which calls
/// here only once both sides have been reduced to comparable primitives.
fn primitive_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Nil, Value::Nil) => true,
        _ => false,
    }
}

/// `==`/`!=` semantics, traced from the original interpreter's struct
/// handling: if exactly one side is `Bool`, the other is coerced to bool
/// first. If either side is a struct value (live or typed-NIL) or the
/// literal `nil`, struct rules take over:
///   - literal `nil` compared against a struct: equal iff the struct is
///     typed-NIL.
///   - two structs of different declared types: a TYPE error (v3) — v4
///     additionally permits this and treats it as simply unequal, since
///     dynamic dispatch over heterogeneous structs is expected once
///     thunks make argument types less statically obvious.
///   - two structs of the same declared type, neither a literal `nil`:
///     reference identity. Two independently-`new`'d typed-NIL structs of
///     the same type are therefore NOT equal to each other, even though
///     each individually equals literal `nil`.
fn equals(left: &Value, right: &Value, dialect: Dialect) -> Result<bool> {
    if dialect.coerces_bool_from_int() {
        if let (Value::Bool(_), other) | (other, Value::Bool(_)) = (left, right) {
            if !matches!(other, Value::Bool(_)) {
                let l = as_bool(left, dialect, "==")?;
                let r = as_bool(right, dialect, "==")?;
                return Ok(l == r);
            }
        }
    }

    match (left, right) {
        (Value::Nil, Value::Nil) => Ok(true),
        (Value::Nil, Value::Struct(s)) | (Value::Struct(s), Value::Nil) => Ok(s.borrow().is_nil()),
        (Value::Struct(a), Value::Struct(b)) => {
            if a.borrow().struct_type != b.borrow().struct_type {
                if dialect == Dialect::V4 {
                    Ok(false)
                } else {
                    Err(BrewinError::type_(
                        "cannot compare structs of different types",
                    ))
                }
            } else {
                Ok(Rc::ptr_eq(a, b))
            }
        }
        _ => {
            if std::mem::discriminant(left) != std::mem::discriminant(right) {
                if dialect == Dialect::V4 {
                    return Ok(false);
                }
                return Err(type_err("==", left, right));
            }
            Ok(primitive_eq(left, right))
        }
    }
}

pub fn apply_binary(op: BinOp, left: Value, right: Value, dialect: Dialect) -> Result<Value> {
    match op {
        BinOp::Add => apply_add(left, right, dialect),
        BinOp::Sub => Ok(Value::Int(as_int(&left, "-")? - as_int(&right, "-")?)),
        BinOp::Mul => Ok(Value::Int(as_int(&left, "*")? * as_int(&right, "*")?)),
        BinOp::Div => {
            let r = as_int(&right, "/")?;
            if r == 0 {
                return Err(BrewinError::type_("division by zero"));
            }
            Ok(Value::Int(as_int(&left, "/")? / r))
        }
        BinOp::Eq => Ok(Value::Bool(equals(&left, &right, dialect)?)),
        BinOp::Neq => Ok(Value::Bool(!equals(&left, &right, dialect)?)),
        BinOp::Lt => Ok(Value::Bool(as_int(&left, "<")? < as_int(&right, "<")?)),
        BinOp::Lte => Ok(Value::Bool(as_int(&left, "<=")? <= as_int(&right, "<=")?)),
        BinOp::Gt => Ok(Value::Bool(as_int(&left, ">")? > as_int(&right, ">")?)),
        BinOp::Gte => Ok(Value::Bool(as_int(&left, ">=")? >= as_int(&right, ">=")?)),
        BinOp::And => Ok(Value::Bool(
            as_bool(&left, dialect, "&&")? && as_bool(&right, dialect, "&&")?,
        )),
        BinOp::Or => Ok(Value::Bool(
            as_bool(&left, dialect, "||")? || as_bool(&right, dialect, "||")?,
        )),
    }
}

fn apply_add(left: Value, right: Value, dialect: Dialect) -> Result<Value> {
    match dialect.plus_mode() {
        PlusMode::Strict => match (&left, &right) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a + b)),
            _ => Err(type_err("+", &left, &right)),
        },
        PlusMode::Coerce => {
            let a = as_int(&left, "+")?;
            let b = as_int(&right, "+")?;
            Ok(Value::Int(a + b))
        }
        PlusMode::StringConcat => match (&left, &right) {
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}").into())),
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a + b)),
            _ => Err(type_err("+", &left, &right)),
        },
    }
}

pub fn apply_unary(op: UnOp, operand: Value, dialect: Dialect) -> Result<Value> {
    match op {
        UnOp::Neg => Ok(Value::Int(-as_int(&operand, "neg")?)),
        UnOp::Not => Ok(Value::Bool(!as_bool(&operand, dialect, "!")?)),
    }
}
