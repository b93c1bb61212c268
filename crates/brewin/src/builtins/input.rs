use crate::error::{BrewinError, Result};
use crate::io::{InputSource, OutputSink};
use crate::value::Value;

fn prompt(args: &[Value], output: &mut dyn OutputSink) {
    if let Some(p) = args.first() {
        output.emit_line(&p.to_string());
    }
}

fn read_line(input: &mut dyn InputSource) -> Result<String> {
    input
        .read_line()
        .ok_or_else(|| BrewinError::fault("no more input available"))
}

/// `inputi()` / `inputi(prompt)`: reads one line, parses it as an integer.
/// A FAULT if input is exhausted; a TYPE error if the line isn't an int.
pub fn call_inputi(
    args: &[Value],
    output: &mut dyn OutputSink,
    input: &mut dyn InputSource,
) -> Result<Value> {
    prompt(args, output);
    let line = read_line(input)?;
    line.trim()
        .parse::<i64>()
        .map(Value::Int)
        .map_err(|_| BrewinError::type_(format!("'{line}' is not a valid integer")))
}

/// `inputs()` / `inputs(prompt)`: reads one line verbatim as a string.
pub fn call_inputs(
    args: &[Value],
    output: &mut dyn OutputSink,
    input: &mut dyn InputSource,
) -> Result<Value> {
    prompt(args, output);
    let line = read_line(input)?;
    Ok(Value::Str(line.into()))
}
