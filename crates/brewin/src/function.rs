//! The resolved, type-checked function definition built from `ast::FuncDef`
//! once a `TypeRegistry` is available — as opposed to `ast::FuncDef`, which
//! only carries the raw type-name strings the parser produced.

use crate::ast;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::types::{DeclaredType, TypeRegistry};

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub declared_type: Option<DeclaredType>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReturnType {
    Void,
    Typed(DeclaredType),
}

#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<ReturnType>,
    pub body: Vec<ast::Stmt>,
}

impl FunctionDef {
    pub fn from_ast(
        def: &ast::FuncDef,
        dialect: Dialect,
        registry: &TypeRegistry,
    ) -> Result<FunctionDef> {
        let params = def
            .params
            .iter()
            .map(|p| {
                let declared_type = if dialect.has_typed_scopes() {
                    match &p.var_type {
                        Some(t) => Some(registry.resolve_type(t)?),
                        None => None,
                    }
                } else {
                    None
                };
                Ok(Param {
                    name: p.name.clone(),
                    declared_type,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let return_type = if dialect.has_typed_scopes() {
            Some(match &def.return_type {
                Some(t) if t == "void" => ReturnType::Void,
                Some(t) => ReturnType::Typed(registry.resolve_type(t)?),
                None => ReturnType::Void,
            })
        } else {
            None
        };

        Ok(FunctionDef {
            name: def.name.clone(),
            params,
            return_type,
            body: def.body.clone(),
        })
    }
}
