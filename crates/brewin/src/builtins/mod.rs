//! The three built-in functions every dialect registers globally:
//! `print`, `inputi`, `inputs`.

mod input;
mod print;

use crate::callable::BuiltinKind;
use crate::error::Result;
use crate::io::{InputSource, OutputSink};
use crate::value::Value;

pub fn call(
    kind: BuiltinKind,
    args: &[Value],
    output: &mut dyn OutputSink,
    input: &mut dyn InputSource,
) -> Result<Value> {
    match kind {
        BuiltinKind::Print => print::call(args, output),
        BuiltinKind::InputI => input::call_inputi(args, output, input),
        BuiltinKind::InputS => input::call_inputs(args, output, input),
    }
}
