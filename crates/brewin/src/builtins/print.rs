use crate::error::Result;
use crate::io::OutputSink;
use crate::value::Value;

/// Concatenates every argument's display form and emits one output line.
/// Variadic: `print()` emits an empty line.
pub fn call(args: &[Value], output: &mut dyn OutputSink) -> Result<Value> {
    let mut line = String::new();
    for arg in args {
        line.push_str(&arg.to_string());
    }
    output.emit_line(&line);
    Ok(Value::Nil)
}
