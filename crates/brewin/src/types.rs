//! v3+ declared types: `int`, `string`, `bool`, or a named struct type.
//! `TypeRegistry` resolves type names (including forward references between
//! struct definitions) and implements the one coercion rule the language
//! has — int literals/values assigned into a `bool`-typed slot coerce via
//! `!= 0` — plus the type-check that rejects everything else that doesn't
//! match.

use std::rc::Rc;

use ahash::AHashMap;

use crate::ast::StructDef;
use crate::error::{BrewinError, Result};
use crate::struct_value::StructInstance;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    Int,
    String,
    Bool,
    Struct(Rc<str>),
}

impl DeclaredType {
    pub fn name(&self) -> &str {
        match self {
            Self::Int => "int",
            Self::String => "string",
            Self::Bool => "bool",
            Self::Struct(name) => name,
        }
    }
}

#[derive(Debug, Default)]
pub struct TypeRegistry {
    structs: AHashMap<Rc<str>, Vec<(Rc<str>, DeclaredType)>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_defined(&self, name: &str) -> bool {
        matches!(name, "int" | "string" | "bool") || self.structs.contains_key(name)
    }

    pub fn resolve_type(&self, name: &str) -> Result<DeclaredType> {
        match name {
            "int" => Ok(DeclaredType::Int),
            "string" => Ok(DeclaredType::String),
            "bool" => Ok(DeclaredType::Bool),
            other => {
                if let Some((key, _)) = self.structs.get_key_value(other) {
                    Ok(DeclaredType::Struct(Rc::clone(key)))
                } else {
                    Err(BrewinError::type_(format!("undefined type '{other}'")))
                }
            }
        }
    }

    /// Registers a struct's field schema. Field types are resolved with a
    /// shared borrow only, so every struct (including ones referencing
    /// other not-yet-registered structs defined earlier in program order)
    /// can be registered in a single left-to-right pass before any struct
    /// is instantiated.
    pub fn register_struct(&mut self, def: &StructDef) -> Result<()> {
        if self.structs.contains_key(def.name.as_str()) {
            return Err(BrewinError::type_(format!(
                "struct '{}' is already defined",
                def.name
            )));
        }
        let name: Rc<str> = Rc::from(def.name.as_str());
        let mut fields = Vec::with_capacity(def.fields.len());
        for field in &def.fields {
            let field_type = self.resolve_type(&field.var_type)?;
            fields.push((Rc::from(field.name.as_str()), field_type));
        }
        self.structs.insert(name, fields);
        Ok(())
    }

    pub fn struct_fields(&self, name: &str) -> Result<&[(Rc<str>, DeclaredType)]> {
        self.structs
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| BrewinError::type_(format!("undefined struct type '{name}'")))
    }

    /// The value a freshly declared, not-yet-assigned variable/field of
    /// `ty` holds: zero, empty string, false, or typed-NIL for a struct.
    pub fn default_value(&self, ty: &DeclaredType) -> Value {
        match ty {
            DeclaredType::Int => Value::Int(0),
            DeclaredType::String => Value::Str("".into()),
            DeclaredType::Bool => Value::Bool(false),
            DeclaredType::Struct(name) => {
                Value::Struct(std::rc::Rc::new(std::cell::RefCell::new(
                    StructInstance::new_nil(Rc::clone(name)),
                )))
            }
        }
    }

    /// The language's one implicit coercion: an `Int` assigned into a
    /// `bool`-typed slot becomes `value != 0`. Everything else passes
    /// through unchanged (`type_check` is what rejects mismatches).
    pub fn coerce(&self, target: &DeclaredType, value: Value) -> Value {
        match (target, &value) {
            (DeclaredType::Bool, Value::Int(i)) => Value::Bool(*i != 0),
            _ => value,
        }
    }

    /// Coerces, type-checks, and — the one non-obvious step — turns the
    /// literal `nil` into a typed-NIL struct instance of `target` once it's
    /// known to be headed into a struct-typed slot, so a later field access
    /// on that cell reports FAULT (dereferenced nil struct) rather than
    /// TYPE (not a struct at all).
    pub fn assign_into(&self, target: &DeclaredType, value: Value) -> Result<Value> {
        let value = self.coerce(target, value);
        self.type_check(target, &value)?;
        let value = match (target, value) {
            (DeclaredType::Struct(name), Value::Nil) => {
                Value::Struct(Rc::new(std::cell::RefCell::new(StructInstance::new_nil(
                    Rc::clone(name),
                ))))
            }
            (_, value) => value,
        };
        Ok(value)
    }

    pub fn type_check(&self, target: &DeclaredType, value: &Value) -> Result<()> {
        let ok = match (target, value) {
            (DeclaredType::Int, Value::Int(_)) => true,
            (DeclaredType::String, Value::Str(_)) => true,
            (DeclaredType::Bool, Value::Bool(_)) => true,
            (DeclaredType::Struct(name), Value::Struct(s)) => {
                s.borrow().struct_type.as_ref() == name.as_ref()
            }
            (DeclaredType::Struct(_), Value::Nil) => true,
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(BrewinError::type_(format!(
                "cannot use a value of type '{}' where '{}' is expected",
                value.type_name(),
                target.name()
            )))
        }
    }
}
