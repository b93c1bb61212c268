//! The typed AST the evaluator actually walks, lowered once from the
//! generic `Element` tree the parser produces.

use std::rc::Rc;

use crate::element::Element;
use crate::error::{BrewinError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64),
    Str(Rc<str>),
    Bool(bool),
    Nil,
    /// A (possibly dotted, v3+ field-access) variable path: `a`, `a.b.c`.
    Var(Vec<String>),
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    New {
        struct_type: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    VarDef {
        name: String,
        var_type: Option<String>,
    },
    Assign {
        target: Vec<String>,
        expr: Expr,
    },
    FCall(Expr),
    If {
        cond: Expr,
        then_block: Vec<Stmt>,
        else_block: Option<Vec<Stmt>>,
    },
    For {
        init: Box<Stmt>,
        cond: Expr,
        update: Box<Stmt>,
        body: Vec<Stmt>,
    },
    Return {
        expr: Option<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub var_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDef {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<String>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub var_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub functions: Vec<Rc<FuncDef>>,
    pub structs: Vec<StructDef>,
}

fn var_path(name: &str) -> Vec<String> {
    name.split('.').map(str::to_owned).collect()
}

impl Program {
    pub fn from_element(root: &Element) -> Result<Program> {
        if root.kind != "program" {
            return Err(BrewinError::internal(format!(
                "expected a 'program' element at the root, found '{}'",
                root.kind
            )));
        }
        let functions = root
            .get_list("functions")?
            .iter()
            .map(|e| FuncDef::from_element(e).map(Rc::new))
            .collect::<Result<Vec<_>>>()?;
        let structs = root
            .get_list("structs")
            .unwrap_or(&[])
            .iter()
            .map(StructDef::from_element)
            .collect::<Result<Vec<_>>>()?;
        Ok(Program { functions, structs })
    }
}

impl FuncDef {
    fn from_element(e: &Element) -> Result<FuncDef> {
        if e.kind != "func" {
            return Err(BrewinError::internal(format!(
                "expected a 'func' element, found '{}'",
                e.kind
            )));
        }
        let name = e.get_str("name")?.to_owned();
        let params = e
            .get_list("args")
            .unwrap_or(&[])
            .iter()
            .map(Param::from_element)
            .collect::<Result<Vec<_>>>()?;
        let return_type = e.get_opt_str("return_type")?.map(str::to_owned);
        let body = e
            .get_list("statements")
            .unwrap_or(&[])
            .iter()
            .map(Stmt::from_element)
            .collect::<Result<Vec<_>>>()?;
        Ok(FuncDef {
            name,
            params,
            return_type,
            body,
        })
    }
}

impl Param {
    fn from_element(e: &Element) -> Result<Param> {
        let name = e.get_str("name")?.to_owned();
        let var_type = e.get_opt_str("var_type")?.map(str::to_owned);
        Ok(Param { name, var_type })
    }
}

impl StructDef {
    fn from_element(e: &Element) -> Result<StructDef> {
        if e.kind != "struct" {
            return Err(BrewinError::internal(format!(
                "expected a 'struct' element, found '{}'",
                e.kind
            )));
        }
        let name = e.get_str("name")?.to_owned();
        let fields = e
            .get_list("fields")
            .unwrap_or(&[])
            .iter()
            .map(FieldDef::from_element)
            .collect::<Result<Vec<_>>>()?;
        Ok(StructDef { name, fields })
    }
}

impl FieldDef {
    fn from_element(e: &Element) -> Result<FieldDef> {
        let name = e.get_str("name")?.to_owned();
        let var_type = e.get_str("var_type")?.to_owned();
        Ok(FieldDef { name, var_type })
    }
}

impl Stmt {
    fn from_element(e: &Element) -> Result<Stmt> {
        let kind = match e.kind.as_str() {
            "vardef" => StmtKind::VarDef {
                name: e.get_str("name")?.to_owned(),
                var_type: e.get_opt_str("var_type")?.map(str::to_owned),
            },
            "=" => StmtKind::Assign {
                target: var_path(e.get_str("name")?),
                expr: Expr::from_element(e.get_node("expression")?)?,
            },
            "fcall" => StmtKind::FCall(Expr::from_element(e)?),
            "if" => StmtKind::If {
                cond: Expr::from_element(e.get_node("condition")?)?,
                then_block: e
                    .get_list("statements")
                    .unwrap_or(&[])
                    .iter()
                    .map(Stmt::from_element)
                    .collect::<Result<Vec<_>>>()?,
                else_block: match e.get_list("else_statements") {
                    Ok(items) => Some(
                        items
                            .iter()
                            .map(Stmt::from_element)
                            .collect::<Result<Vec<_>>>()?,
                    ),
                    Err(_) => None,
                },
            },
            "for" => StmtKind::For {
                init: Box::new(Stmt::from_element(e.get_node("init")?)?),
                cond: Expr::from_element(e.get_node("condition")?)?,
                update: Box::new(Stmt::from_element(e.get_node("update")?)?),
                body: e
                    .get_list("statements")
                    .unwrap_or(&[])
                    .iter()
                    .map(Stmt::from_element)
                    .collect::<Result<Vec<_>>>()?,
            },
            "return" => StmtKind::Return {
                expr: e
                    .get_opt_node("expression")?
                    .map(Expr::from_element)
                    .transpose()?,
            },
            other => {
                return Err(BrewinError::internal(format!(
                    "unrecognized statement kind '{other}'"
                )))
            }
        };
        Ok(Stmt { kind })
    }
}

impl Expr {
    fn from_element(e: &Element) -> Result<Expr> {
        let bin = |op: BinOp, e: &Element| -> Result<Expr> {
            Ok(Expr::Binary {
                op,
                left: Box::new(Expr::from_element(e.get_node("op1")?)?),
                right: Box::new(Expr::from_element(e.get_node("op2")?)?),
            })
        };
        let un = |op: UnOp, e: &Element| -> Result<Expr> {
            Ok(Expr::Unary {
                op,
                operand: Box::new(Expr::from_element(e.get_node("op1")?)?),
            })
        };
        match e.kind.as_str() {
            "int" => Ok(Expr::Int(e.get_int("val")?)),
            "string" => Ok(Expr::Str(e.get_str("val")?.into())),
            "bool" => Ok(Expr::Bool(e.get_bool("val")?)),
            "nil" => Ok(Expr::Nil),
            "var" => Ok(Expr::Var(var_path(e.get_str("name")?))),
            "+" => bin(BinOp::Add, e),
            "-" => bin(BinOp::Sub, e),
            "*" => bin(BinOp::Mul, e),
            "/" => bin(BinOp::Div, e),
            "==" => bin(BinOp::Eq, e),
            "!=" => bin(BinOp::Neq, e),
            "<" => bin(BinOp::Lt, e),
            "<=" => bin(BinOp::Lte, e),
            ">" => bin(BinOp::Gt, e),
            ">=" => bin(BinOp::Gte, e),
            "&&" => bin(BinOp::And, e),
            "||" => bin(BinOp::Or, e),
            "neg" => un(UnOp::Neg, e),
            "!" => un(UnOp::Not, e),
            "fcall" => Ok(Expr::Call {
                name: e.get_str("name")?.to_owned(),
                args: e
                    .get_list("args")
                    .unwrap_or(&[])
                    .iter()
                    .map(Expr::from_element)
                    .collect::<Result<Vec<_>>>()?,
            }),
            "new" => Ok(Expr::New {
                struct_type: e.get_str("struct_type")?.to_owned(),
            }),
            other => Err(BrewinError::internal(format!(
                "unrecognized expression kind '{other}'"
            ))),
        }
    }
}
