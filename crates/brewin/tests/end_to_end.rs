//! Builds small `Element` trees by hand (standing in for a parser's
//! output) and runs them end to end through `brewin::run`, covering one
//! scenario per dialect plus the v3/v4 feature set.

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

fn func_returning(name: &str, params: Vec<Element>, body: Vec<Element>, return_type: &str) -> Element {
    func(name, params, body).with("return_type", AttrValue::Str(return_type.to_owned()))
}

fn program(functions: Vec<Element>, structs: Vec<Element>) -> Element {
    Element::new("program")
        .with("functions", AttrValue::List(functions))
        .with("structs", AttrValue::List(structs))
}

fn int_lit(v: i64) -> Element {
    Element::new("int").with("val", AttrValue::Int(v))
}

fn str_lit(s: &str) -> Element {
    Element::new("string").with("val", AttrValue::Str(s.to_owned()))
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

#[test]
fn v1_arithmetic_and_print() {
    // func main() { print(1 + 2); }
    let root = program(
        vec![main_func(vec![fcall(
            "print",
            vec![binop("+", int_lit(1), int_lit(2))],
        )])],
        vec![],
    );
    let p = Program::from_element(&root).unwrap();
    let mut out = CollectingSink::default();
    let mut input = ScriptedSource::new(Vec::<String>::new());
    brewin::run(&p, Dialect::V1, &mut out, &mut input).unwrap();
    assert_eq!(out.lines, vec!["3"]);
}

#[test]
fn v1_plus_rejects_non_int() {
    let root = program(
        vec![main_func(vec![fcall(
            "print",
            vec![binop("+", int_lit(1), str_lit("x"))],
        )])],
        vec![],
    );
    let p = Program::from_element(&root).unwrap();
    let mut out = CollectingSink::default();
    let mut input = ScriptedSource::new(Vec::<String>::new());
    let err = brewin::run(&p, Dialect::V1, &mut out, &mut input).unwrap_err();
    assert_eq!(err.kind, brewin::ErrorKind::Type);
}

#[test]
fn v2_return_value_used_by_caller() {
    // func add(a, b) { return a + b; }
    // func main() { vardef x; x = add(2, 3); print(x); }
    let root = program(
        vec![
            func(
                "add",
                vec![vardef("a", None), vardef("b", None)],
                vec![ret(Some(binop("+", var("a"), var("b"))))],
            ),
            main_func(vec![
                vardef("x", None),
                assign("x", fcall("add", vec![int_lit(2), int_lit(3)])),
                fcall("print", vec![var("x")]),
            ]),
        ],
        vec![],
    );
    let p = Program::from_element(&root).unwrap();
    let mut out = CollectingSink::default();
    let mut input = ScriptedSource::new(Vec::<String>::new());
    brewin::run(&p, Dialect::V2, &mut out, &mut input).unwrap();
    assert_eq!(out.lines, vec!["5"]);
}

#[test]
fn v3_struct_field_fault_on_nil_access() {
    // struct Point { x: int }
    // func main() { vardef p: Point; print(p.x); }
    let struct_def = Element::new("struct")
        .with("name", AttrValue::Str("Point".to_owned()))
        .with(
            "fields",
            AttrValue::List(vec![Element::new("field")
                .with("name", AttrValue::Str("x".to_owned()))
                .with("var_type", AttrValue::Str("int".to_owned()))]),
        );
    let root = program(
        vec![main_func(vec![
            vardef("p", Some("Point")),
            fcall(
                "print",
                vec![Element::new("var").with("name", AttrValue::Str("p.x".to_owned()))],
            ),
        ])],
        vec![struct_def],
    );
    let p = Program::from_element(&root).unwrap();
    let mut out = CollectingSink::default();
    let mut input = ScriptedSource::new(Vec::<String>::new());
    let err = brewin::run(&p, Dialect::V3, &mut out, &mut input).unwrap_err();
    assert_eq!(err.kind, brewin::ErrorKind::Fault);
}

#[test]
fn v3_nil_struct_equals_literal_nil() {
    // struct Point { x: int }
    // func main() { vardef p: Point; print(p == nil); }
    let struct_def = Element::new("struct")
        .with("name", AttrValue::Str("Point".to_owned()))
        .with(
            "fields",
            AttrValue::List(vec![Element::new("field")
                .with("name", AttrValue::Str("x".to_owned()))
                .with("var_type", AttrValue::Str("int".to_owned()))]),
        );
    let root = program(
        vec![main_func(vec![
            vardef("p", Some("Point")),
            fcall("print", vec![binop("==", var("p"), Element::new("nil"))]),
        ])],
        vec![struct_def],
    );
    let p = Program::from_element(&root).unwrap();
    let mut out = CollectingSink::default();
    let mut input = ScriptedSource::new(Vec::<String>::new());
    brewin::run(&p, Dialect::V3, &mut out, &mut input).unwrap();
    assert_eq!(out.lines, vec!["true"]);
}

#[test]
fn v3_int_coerces_to_bool_field() {
    // struct Flag { on: bool }
    // func main() { vardef f: Flag; f.on = 5; print(f.on); }
    let struct_def = Element::new("struct")
        .with("name", AttrValue::Str("Flag".to_owned()))
        .with(
            "fields",
            AttrValue::List(vec![Element::new("field")
                .with("name", AttrValue::Str("on".to_owned()))
                .with("var_type", AttrValue::Str("bool".to_owned()))]),
        );
    let new_flag = Element::new("new").with("struct_type", AttrValue::Str("Flag".to_owned()));
    let root = program(
        vec![main_func(vec![
            vardef("f", Some("Flag")),
            assign("f", new_flag),
            Element::new("=")
                .with("name", AttrValue::Str("f.on".to_owned()))
                .with("expression", AttrValue::Node(Box::new(int_lit(5)))),
            fcall(
                "print",
                vec![Element::new("var").with("name", AttrValue::Str("f.on".to_owned()))],
            ),
        ])],
        vec![struct_def],
    );
    let p = Program::from_element(&root).unwrap();
    let mut out = CollectingSink::default();
    let mut input = ScriptedSource::new(Vec::<String>::new());
    brewin::run(&p, Dialect::V3, &mut out, &mut input).unwrap();
    assert_eq!(out.lines, vec!["true"]);
}

#[test]
fn v4_argument_is_evaluated_at_most_once() {
    // func sideeffect() { print("evaluated"); return 7; }
    // func useonce(x) { print(x); print(x); }
    // func main() { useonce(sideeffect()); }
    let root = program(
        vec![
            func_returning(
                "sideeffect",
                vec![],
                vec![
                    fcall("print", vec![str_lit("evaluated")]),
                    ret(Some(int_lit(7))),
                ],
                "int",
            ),
            func_returning(
                "useonce",
                vec![vardef("x", None)],
                vec![
                    fcall("print", vec![var("x")]),
                    fcall("print", vec![var("x")]),
                ],
                "void",
            ),
            main_func(vec![fcall(
                "useonce",
                vec![fcall("sideeffect", vec![])],
            )]),
        ],
        vec![],
    );
    let p = Program::from_element(&root).unwrap();
    let mut out = CollectingSink::default();
    let mut input = ScriptedSource::new(Vec::<String>::new());
    brewin::run(&p, Dialect::V4, &mut out, &mut input).unwrap();
    assert_eq!(out.lines, vec!["evaluated", "7", "7"]);
}

#[test]
fn inputi_reads_and_parses_an_integer() {
    // func main() { vardef x; x = inputi(); print(x + 1); }
    let root = program(
        vec![main_func(vec![
            vardef("x", None),
            assign("x", fcall("inputi", vec![])),
            fcall("print", vec![binop("+", var("x"), int_lit(1))]),
        ])],
        vec![],
    );
    let p = Program::from_element(&root).unwrap();
    let mut out = CollectingSink::default();
    let mut input = ScriptedSource::new(vec!["41"]);
    brewin::run(&p, Dialect::V1, &mut out, &mut input).unwrap();
    assert_eq!(out.lines, vec!["42"]);
}
