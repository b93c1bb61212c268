//! Exercises several of the documented invariants end to end: recursion,
//! redeclaration, undefined-name lookup, and struct type mismatches.

use brewin::{AttrValue, CollectingSink, Dialect, Element, Program, ScriptedSource};

fn func(name: &str, params: Vec<Element>, body: Vec<Element>) -> Element {
    Element::new("func")
        .with("name", AttrValue::Str(name.to_owned()))
        .with("args", AttrValue::List(params))
        .with("statements", AttrValue::List(body))
}

fn main_func(body: Vec<Element>) -> Element {
    func("main", Vec::new(), body)
}

fn program(functions: Vec<Element>, structs: Vec<Element>) -> Element {
    Element::new("program")
        .with("functions", AttrValue::List(functions))
        .with("structs", AttrValue::List(structs))
}

fn int_lit(v: i64) -> Element {
    Element::new("int").with("val", AttrValue::Int(v))
}

fn var(name: &str) -> Element {
    Element::new("var").with("name", AttrValue::Str(name.to_owned()))
}

fn fcall(name: &str, args: Vec<Element>) -> Element {
    Element::new("fcall")
        .with("name", AttrValue::Str(name.to_owned()))
        .with("args", AttrValue::List(args))
}

fn binop(kind: &str, op1: Element, op2: Element) -> Element {
    Element::new(kind)
        .with("op1", AttrValue::Node(Box::new(op1)))
        .with("op2", AttrValue::Node(Box::new(op2)))
}

fn assign(name: &str, expr: Element) -> Element {
    Element::new("=")
        .with("name", AttrValue::Str(name.to_owned()))
        .with("expression", AttrValue::Node(Box::new(expr)))
}

fn vardef(name: &str, var_type: Option<&str>) -> Element {
    let mut e = Element::new("vardef").with("name", AttrValue::Str(name.to_owned()));
    if let Some(t) = var_type {
        e = e.with("var_type", AttrValue::Str(t.to_owned()));
    }
    e
}

fn ret(expr: Option<Element>) -> Element {
    match expr {
        Some(e) => Element::new("return").with("expression", AttrValue::Node(Box::new(e))),
        None => Element::new("return"),
    }
}

fn if_stmt(cond: Element, then_block: Vec<Element>, else_block: Option<Vec<Element>>) -> Element {
    let mut e = Element::new("if")
        .with("condition", AttrValue::Node(Box::new(cond)))
        .with("statements", AttrValue::List(then_block));
    if let Some(eb) = else_block {
        e = e.with("else_statements", AttrValue::List(eb));
    }
    e
}

fn for_stmt(init: Element, cond: Element, update: Element, body: Vec<Element>) -> Element {
    Element::new("for")
        .with("init", AttrValue::Node(Box::new(init)))
        .with("condition", AttrValue::Node(Box::new(cond)))
        .with("update", AttrValue::Node(Box::new(update)))
        .with("statements", AttrValue::List(body))
}

#[test]
fn recursive_factorial() {
    // func fact(n) { if (n <= 1) { return 1; } return n * fact(n - 1); }
    // func main() { print(fact(5)); }
    let fact = func(
        "fact",
        vec![vardef("n", None)],
        vec![
            if_stmt(binop("<=", var("n"), int_lit(1)), vec![ret(Some(int_lit(1)))], None),
            ret(Some(binop(
                "*",
                var("n"),
                fcall("fact", vec![binop("-", var("n"), int_lit(1))]),
            ))),
        ],
    );
    let root = program(
        vec![fact, main_func(vec![fcall("print", vec![fcall("fact", vec![int_lit(5)])])])],
        vec![],
    );
    let p = Program::from_element(&root).unwrap();
    let mut out = CollectingSink::default();
    let mut input = ScriptedSource::new(Vec::<String>::new());
    brewin::run(&p, Dialect::V2, &mut out, &mut input).unwrap();
    assert_eq!(out.lines, vec!["120"]);
}

#[test]
fn redeclaring_a_variable_in_the_same_scope_is_a_name_error() {
    // func main() { vardef x; vardef x; }
    let root = program(
        vec![main_func(vec![vardef("x", None), vardef("x", None)])],
        vec![],
    );
    let p = Program::from_element(&root).unwrap();
    let mut out = CollectingSink::default();
    let mut input = ScriptedSource::new(Vec::<String>::new());
    let err = brewin::run(&p, Dialect::V1, &mut out, &mut input).unwrap_err();
    assert_eq!(err.kind, brewin::ErrorKind::Name);
}

#[test]
fn calling_an_undefined_function_is_a_name_error() {
    // func main() { mystery(); }
    let root = program(vec![main_func(vec![fcall("mystery", vec![])])], vec![]);
    let p = Program::from_element(&root).unwrap();
    let mut out = CollectingSink::default();
    let mut input = ScriptedSource::new(Vec::<String>::new());
    let err = brewin::run(&p, Dialect::V1, &mut out, &mut input).unwrap_err();
    assert_eq!(err.kind, brewin::ErrorKind::Name);
}

#[test]
fn missing_main_is_a_name_error() {
    let root = program(vec![func("helper", vec![], vec![])], vec![]);
    let p = Program::from_element(&root).unwrap();
    let mut out = CollectingSink::default();
    let mut input = ScriptedSource::new(Vec::<String>::new());
    let err = brewin::run(&p, Dialect::V1, &mut out, &mut input).unwrap_err();
    assert_eq!(err.kind, brewin::ErrorKind::Name);
}

#[test]
fn v3_assigning_a_string_to_an_int_variable_is_a_type_error() {
    // func main() { vardef x: int; x = "oops"; }
    let root = program(
        vec![main_func(vec![
            vardef("x", Some("int")),
            assign("x", Element::new("string").with("val", AttrValue::Str("oops".to_owned()))),
        ])],
        vec![],
    );
    let p = Program::from_element(&root).unwrap();
    let mut out = CollectingSink::default();
    let mut input = ScriptedSource::new(Vec::<String>::new());
    let err = brewin::run(&p, Dialect::V3, &mut out, &mut input).unwrap_err();
    assert_eq!(err.kind, brewin::ErrorKind::Type);
}

#[test]
fn for_loop_accumulates_across_iterations() {
    // func main() { vardef sum; vardef i; for (i = 0; i < 5; i = i + 1) { sum = sum + i; } print(sum); }
    let root = program(
        vec![main_func(vec![
            vardef("sum", None),
            vardef("i", None),
            for_stmt(
                assign("i", int_lit(0)),
                binop("<", var("i"), int_lit(5)),
                assign("i", binop("+", var("i"), int_lit(1))),
                vec![assign("sum", binop("+", var("sum"), var("i")))],
            ),
            fcall("print", vec![var("sum")]),
        ])],
        vec![],
    );
    let p = Program::from_element(&root).unwrap();
    let mut out = CollectingSink::default();
    let mut input = ScriptedSource::new(Vec::<String>::new());
    brewin::run(&p, Dialect::V1, &mut out, &mut input).unwrap();
    assert_eq!(out.lines, vec!["10"]);
}
