//! Runs a Brewin program whose AST has already been produced by an
//! external front end and serialized to JSON as a tree of
//! `{"kind": "...", "attrs": {...}}` nodes — the `Element` contract
//! `brewin` expects, just carried over the wire as JSON rather than built
//! in-process. Parsing Brewin source text itself is out of this crate's
//! scope.

use std::env;
use std::fs;
use std::process::ExitCode;

use brewin::{AttrValue, Dialect, Element, Program, StdIoSink, StdIoSource};

fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args().skip(1);
    let file_path = match args.next() {
        Some(p) => p,
        None => {
            eprintln!("usage: brewin-cli <program.json> [v1|v2|v3|v4]");
            return ExitCode::FAILURE;
        }
    };
    let dialect = match args.next().as_deref() {
        Some("v1") => Dialect::V1,
        Some("v2") => Dialect::V2,
        Some("v3") => Dialect::V3,
        Some("v4") | None => Dialect::V4,
        Some(other) => {
            eprintln!("error: unrecognized dialect '{other}'");
            return ExitCode::FAILURE;
        }
    };

    let json_text = match read_file(&file_path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let json: serde_json::Value = match serde_json::from_str(&json_text) {
        Ok(v) => v,
        Err(err) => {
            eprintln!("error: '{file_path}' is not valid JSON: {err}");
            return ExitCode::FAILURE;
        }
    };

    let root = element_from_json(&json);
    let program = match Program::from_element(&root) {
        Ok(p) => p,
        Err(err) => {
            eprintln!("error:\n{err}");
            return ExitCode::FAILURE;
        }
    };

    let mut output = StdIoSink;
    let mut input = StdIoSource::new();
    match brewin::run(&program, dialect, &mut output, &mut input) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error:\n{err}");
            ExitCode::FAILURE
        }
    }
}

fn read_file(file_path: &str) -> Result<String, String> {
    match fs::metadata(file_path) {
        Ok(metadata) if !metadata.is_file() => {
            return Err(format!("{file_path} is not a file"));
        }
        Err(err) => return Err(format!("reading {file_path}: {err}")),
        Ok(_) => {}
    }
    fs::read_to_string(file_path).map_err(|err| format!("reading {file_path}: {err}"))
}

/// Converts the JSON interchange form into an `Element`. A JSON object with
/// a `"kind"` string is a node; its `"attrs"` object's values are converted
/// recursively: JSON strings/ints/bools map to the matching `AttrValue`,
/// `null` to `AttrValue::None`, nested node objects to `AttrValue::Node`,
/// and arrays to `AttrValue::List`.
fn element_from_json(value: &serde_json::Value) -> Element {
    let kind = value
        .get("kind")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("")
        .to_owned();
    let mut element = Element::new(kind);
    if let Some(attrs) = value.get("attrs").and_then(serde_json::Value::as_object) {
        for (name, attr) in attrs {
            element = element.with(name.clone(), attr_value_from_json(attr));
        }
    }
    element
}

fn attr_value_from_json(value: &serde_json::Value) -> AttrValue {
    match value {
        serde_json::Value::Null => AttrValue::None,
        serde_json::Value::Bool(b) => AttrValue::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => AttrValue::Int(i),
            None => AttrValue::Str(n.to_string()),
        },
        serde_json::Value::String(s) => AttrValue::Str(s.clone()),
        serde_json::Value::Array(items) => {
            AttrValue::List(items.iter().map(element_from_json).collect())
        }
        serde_json::Value::Object(_) => AttrValue::Node(Box::new(element_from_json(value))),
    }
}
