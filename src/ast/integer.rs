use num_bigint::BigInt;

use crate::interpreter::{Context, Value};
use crate::lexer::Range;

use super::pad;

#[derive(Debug, Clone, PartialEq)]
pub struct Integer {
    pub value: BigInt,
    pub source_range: Range,
}

impl Integer {
    pub fn run(&self, _context: &mut Context) -> Value {
        Value::Number(self.value.clone())
    }

    pub fn dump(&self, indent: usize) -> String {
        format!("{}Integer {}\n", pad(indent), self.value)
    }
}
