use crate::interpreter::{Context, Value};
use crate::lexer::Range;

use super::pad;

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub source_range: Range,
}

impl Ident {
    /// Plain lookup: the innermost frame holding the name wins. A name bound
    /// more than once in that frame is already ambiguous and yields the
    /// resolution set of its binding history. Unbound names yield `Empty`.
    pub fn run(&self, context: &mut Context) -> Value {
        context.lookup(&self.name)
    }

    pub fn dump(&self, indent: usize) -> String {
        format!("{}Ident {}\n", pad(indent), self.name)
    }
}
