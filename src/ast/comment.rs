use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::lexer::Range;

use super::pad;

static NEXT_COMMENT_ID: AtomicUsize = AtomicUsize::new(0);

/// A source comment. Comments survive parsing: they attach to bindings at
/// runtime and are queried by mentions and by `is`.
#[derive(Debug, PartialEq)]
pub struct Comment {
    /// Process-unique id, used to key comment scope entries.
    pub id: usize,
    pub text: String,
    /// Whether some statement adopted this comment; unhosted comments push
    /// themselves onto the unassigned queue when they run.
    pub hosted: Cell<bool>,
    pub source_range: Range,
}

impl Comment {
    pub fn new(text: impl Into<String>, source_range: Range) -> Comment {
        Comment {
            id: NEXT_COMMENT_ID.fetch_add(1, Ordering::Relaxed),
            text: text.into(),
            hosted: Cell::new(false),
            source_range,
        }
    }

    pub fn dump(&self, indent: usize) -> String {
        format!("{}Comment {:?}\n", pad(indent), self.text)
    }
}
