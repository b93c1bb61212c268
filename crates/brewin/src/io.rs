//! The host I/O façade: console output, line input. Out of scope to
//! implement for real (the embedding application owns the actual
//! terminal/file descriptors), but the evaluator needs *something* to call,
//! so it depends only on these two traits.

use std::collections::VecDeque;
use std::io::BufRead;

/// One emitted program output line. `print` emits exactly one line per call.
pub trait OutputSink {
    fn emit_line(&mut self, line: &str);
}

/// One line of input, line-oriented per the spec. `None` means end-of-input.
pub trait InputSource {
    fn read_line(&mut self) -> Option<String>;
}

/// Writes to the real process stdout.
pub struct StdIoSink;

impl OutputSink for StdIoSink {
    fn emit_line(&mut self, line: &str) {
        println!("{line}");
    }
}

/// Reads from the real process stdin.
pub struct StdIoSource {
    stdin: std::io::Stdin,
}

impl StdIoSource {
    pub fn new() -> Self {
        Self { stdin: std::io::stdin() }
    }
}

impl Default for StdIoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for StdIoSource {
    fn read_line(&mut self) -> Option<String> {
        let mut buf = String::new();
        match self.stdin.lock().read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => {
                while buf.ends_with(['\n', '\r']) {
                    buf.pop();
                }
                Some(buf)
            }
            Err(_) => None,
        }
    }
}

/// Buffers every emitted line instead of printing it. Used by tests to
/// assert on program output.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub lines: Vec<String>,
}

impl OutputSink for CollectingSink {
    fn emit_line(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }
}

/// Feeds a fixed, pre-scripted sequence of input lines. Used by tests that
/// exercise `inputi`/`inputs`.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    lines: VecDeque<String>,
}

impl ScriptedSource {
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl InputSource for ScriptedSource {
    fn read_line(&mut self) -> Option<String> {
        self.lines.pop_front()
    }
}

/// Discards all output. Useful when only the return value matters.
pub struct NoOpSink;

impl OutputSink for NoOpSink {
    fn emit_line(&mut self, _line: &str) {}
}
