use crate::interpreter::{Context, Value};
use crate::lexer::Range;

use super::pad;

/// A name written inside mention brackets, e.g. `[x loudly]`. The words
/// after the name are matched as substrings against the comments associated
/// with each candidate binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Mention {
    pub name: String,
    pub words: Vec<String>,
    /// Direct mentions (`[x]`) flatten a single survivor; indirect mentions
    /// (`#[x]`) always keep the resolution set.
    pub direct: bool,
    pub source_range: Range,
}

impl Mention {
    pub fn run(&self, context: &mut Context) -> Value {
        context.resolve_mention(&self.name, &self.words, self.direct)
    }

    pub fn dump(&self, indent: usize) -> String {
        let kind = if self.direct { "Mention" } else { "IndirectMention" };
        if self.words.is_empty() {
            format!("{}{} {}\n", pad(indent), kind, self.name)
        } else {
            format!(
                "{}{} {} ({})\n",
                pad(indent),
                kind,
                self.name,
                self.words.join(" ")
            )
        }
    }
}
