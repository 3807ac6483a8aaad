use crate::interpreter::{Context, Value};
use crate::lexer::Range;

use super::pad;

#[derive(Debug, Clone, PartialEq)]
pub struct Str {
    pub value: String,
    pub source_range: Range,
}

impl Str {
    pub fn run(&self, _context: &mut Context) -> Value {
        Value::Str(self.value.clone())
    }

    pub fn dump(&self, indent: usize) -> String {
        format!("{}String {:?}\n", pad(indent), self.value)
    }
}
